//! Translation of OpenAPI v3 schema nodes into type descriptors
//!
//! `resolve_type` walks a schema recursively and returns the descriptor of
//! the value it describes. Every object schema with declared properties met
//! along the way is registered in the `TypeRegistry` under a synthesized
//! name, so the returned descriptor can refer to it by name.

use crate::combinator::combine_schemas;
use crate::naming::{one_of_type_name, property_type_name};
use crate::schema_node::{SchemaNodeExt, SchemaType, INT_OR_STRING, PRESERVE_UNKNOWN_FIELDS};
use crd2schema_common::{
    ObjectTypeDefinition, PropertyDefinition, SchemaNode, TypeDescriptor, TypeRegistry,
};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Resolve `schema` to a type descriptor, registering nested object types
///
/// Rules are tried in a fixed order and the first match wins:
///
/// 1. absent or empty schema: `Any`
/// 2. `x-kubernetes-int-or-string: true`: `IntOrString`
/// 3. `oneOf`: a union of the alternatives, or `Any` if any alternative is `Any`
/// 4. `allOf`: the merged sub-schemas (required lists merged), same name
/// 5. `anyOf`: the merged sub-schemas (required lists dropped), same name
/// 6. `x-kubernetes-preserve-unknown-fields: true`: map of `Any`
/// 7. no `type`: `Any`
/// 8. `array`: array of the resolved `items`, same name
/// 9. `object`: registered under `name`, then a map or a reference
/// 10. scalar `type`: the primitive
/// 11. any other `type`: `Any`
pub fn resolve_type(
    schema: Option<&SchemaNode>,
    name: &str,
    registry: &mut TypeRegistry,
) -> TypeDescriptor {
    let schema = match schema {
        Some(schema) if !schema.is_empty() => schema,
        _ => return TypeDescriptor::Any,
    };

    if schema.flag(INT_OR_STRING) {
        return TypeDescriptor::IntOrString;
    }

    if let Some(alternatives) = schema.nested_map_slice("oneOf") {
        return resolve_one_of(&alternatives, name, registry);
    }

    if let Some(parts) = schema.nested_map_slice("allOf") {
        let combined = combine_schemas(true, &parts);
        return resolve_type(combined.as_deref(), name, registry);
    }

    if let Some(parts) = schema.nested_map_slice("anyOf") {
        let combined = combine_schemas(false, &parts);
        return resolve_type(combined.as_deref(), name, registry);
    }

    if schema.flag(PRESERVE_UNKNOWN_FIELDS) {
        return TypeDescriptor::arbitrary_json();
    }

    let Some(schema_type) = schema.schema_type() else {
        trace!(name, "schema has no type, resolving to any");
        return TypeDescriptor::Any;
    };

    match schema_type {
        SchemaType::Array => {
            let items = resolve_type(schema.nested_map("items"), name, registry);
            TypeDescriptor::Array(Box::new(items))
        }
        SchemaType::Object => resolve_object(schema, name, registry),
        SchemaType::Primitive(primitive) => TypeDescriptor::Primitive(primitive),
        SchemaType::Unsupported => {
            trace!(name, "unsupported schema type, resolving to any");
            TypeDescriptor::Any
        }
    }
}

fn resolve_one_of(
    alternatives: &[&SchemaNode],
    name: &str,
    registry: &mut TypeRegistry,
) -> TypeDescriptor {
    let mut members = Vec::with_capacity(alternatives.len());
    for (index, alternative) in alternatives.iter().copied().enumerate() {
        let member = resolve_type(Some(alternative), &one_of_type_name(name, index), registry);
        // One imprecise member makes the whole union imprecise
        if member.is_any() {
            return TypeDescriptor::Any;
        }
        members.push(member);
    }
    TypeDescriptor::Union(members)
}

fn resolve_object(schema: &SchemaNode, name: &str, registry: &mut TypeRegistry) -> TypeDescriptor {
    register_type(schema, name, registry);

    if let Some(additional) = schema.nested_map("additionalProperties") {
        let values = resolve_type(Some(additional), name, registry);
        return TypeDescriptor::ObjectMap(Box::new(values));
    }

    if schema.nested_bool("additionalProperties") == Some(true) {
        return TypeDescriptor::arbitrary_json();
    }

    if schema.nested_map("properties").is_none() {
        return TypeDescriptor::arbitrary_json();
    }

    TypeDescriptor::ObjectRef(name.to_string())
}

/// Convert `schema` into an object type and register it under `name`
///
/// Each property is resolved under `<name><Property>`; its description and
/// default value are copied as they are. An existing definition under
/// `name` is replaced.
pub fn register_type(schema: &SchemaNode, name: &str, registry: &mut TypeRegistry) {
    let mut properties = BTreeMap::new();

    if let Some(property_schemas) = schema.nested_map("properties") {
        for (property_name, property_value) in property_schemas {
            let property_schema = property_value.as_object();
            let type_descriptor = resolve_type(
                property_schema,
                &property_type_name(name, property_name),
                registry,
            );
            properties.insert(
                property_name.clone(),
                PropertyDefinition {
                    type_descriptor,
                    description: property_schema
                        .and_then(|s| s.nested_str("description"))
                        .map(String::from),
                    default: property_schema.and_then(|s| s.get("default")).cloned(),
                    constant: None,
                },
            );
        }
    }

    let definition = ObjectTypeDefinition {
        properties,
        required: schema
            .nested_string_slice("required")
            .unwrap_or_default()
            .into_iter()
            .collect(),
        description: schema.nested_str("description").map(String::from),
    };

    if let Some(previous) = registry.insert(name, definition) {
        if registry.get(name) != Some(&previous) {
            debug!(name, "replaced existing type definition");
        }
    } else {
        debug!(name, "registered type");
    }
}
