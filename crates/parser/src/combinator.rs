//! Flattening of `allOf` / `anyOf` sub-schemas into one object schema

use crate::schema_node::SchemaNodeExt;
use crd2schema_common::SchemaNode;
use serde_json::{json, Map, Value};
use std::borrow::Cow;

/// Combine the `properties` of `schemas` into a single object schema
///
/// Returns `None` for no schemas and the schema itself for exactly one. With
/// two or more, properties are merged in order with later schemas winning on
/// a name collision. When `merge_required` is set, every sub-schema's
/// `required` list is concatenated into the result; otherwise the result has
/// no `required` list at all.
pub fn combine_schemas<'a>(
    merge_required: bool,
    schemas: &[&'a SchemaNode],
) -> Option<Cow<'a, SchemaNode>> {
    match schemas {
        [] => None,
        [single] => Some(Cow::Borrowed(*single)),
        _ => Some(Cow::Owned(merge(merge_required, schemas))),
    }
}

fn merge(merge_required: bool, schemas: &[&SchemaNode]) -> SchemaNode {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for schema in schemas {
        if let Some(sub_properties) = schema.nested_map("properties") {
            for (name, property) in sub_properties {
                properties.insert(name.clone(), property.clone());
            }
        }
        if merge_required {
            if let Some(sub_required) = schema.nested_string_slice("required") {
                required.extend(sub_required);
            }
        }
    }

    let mut combined = Map::new();
    combined.insert("type".to_string(), json!("object"));
    combined.insert("properties".to_string(), Value::Object(properties));
    if merge_required {
        combined.insert("required".to_string(), json!(required));
    }
    combined
}
