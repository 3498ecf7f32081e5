//! Registration of custom resource root types
//!
//! Every CRD version with a usable schema becomes one object type keyed by
//! its resource token, extended with the `apiVersion`, `kind` and `metadata`
//! fields every Kubernetes object carries.

use crate::resolver::register_type;
use crate::schema_node::{SchemaNodeExt, PRESERVE_UNKNOWN_FIELDS};
use crd2schema_common::{
    group_prefix, CustomResource, ObjectTypeDefinition, PropertyDefinition, SchemaNode,
    TypeDescriptor, TypeRegistry, OBJECT_META_TOKEN,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Registry and resource list produced from a set of custom resources
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssembledTypes {
    /// Every registered object type, resource roots included
    pub registry: TypeRegistry,

    /// Tokens of registered resources, in registration order
    pub resource_tokens: Vec<String>,

    /// Every `group/version` seen among registered resources
    pub group_versions: BTreeSet<String>,
}

impl AssembledTypes {
    /// Map each `group/version` module to `<group prefix>/<version>`
    pub fn module_to_package(&self) -> BTreeMap<String, String> {
        self.group_versions
            .iter()
            .filter_map(|group_version| {
                let (group, version) = group_version.rsplit_once('/')?;
                Some((
                    group_version.clone(),
                    format!("{}/{}", group_prefix(group), version),
                ))
            })
            .collect()
    }
}

/// Accumulates resource root types into one registry
#[derive(Debug, Default)]
pub struct ResourceAssembler {
    assembled: AssembledTypes,
}

impl ResourceAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every version of `resource` that has a usable schema
    ///
    /// A version whose schema sets `x-kubernetes-preserve-unknown-fields`
    /// gets an empty object type, even if it also declares properties.
    /// Otherwise a version with `properties` is registered from them. Versions
    /// matching neither are skipped.
    pub fn add_resource(&mut self, resource: &CustomResource) {
        for (version, schema) in &resource.versions {
            let token = resource.token(version);
            if !register_root(schema, &token, &mut self.assembled.registry) {
                debug!(token = %token, "skipping resource without properties");
                continue;
            }

            inject_object_fields(resource, version, &token, &mut self.assembled.registry);

            if !self.assembled.resource_tokens.contains(&token) {
                self.assembled.resource_tokens.push(token);
            }
            self.assembled
                .group_versions
                .insert(resource.api_version(version));
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.assembled.registry
    }

    pub fn resource_tokens(&self) -> &[String] {
        &self.assembled.resource_tokens
    }

    pub fn finish(self) -> AssembledTypes {
        self.assembled
    }
}

/// Assemble the types of all `resources` into a fresh registry
pub fn assemble_types<'a>(resources: impl IntoIterator<Item = &'a CustomResource>) -> AssembledTypes {
    let mut assembler = ResourceAssembler::new();
    for resource in resources {
        assembler.add_resource(resource);
    }
    assembler.finish()
}

fn register_root(schema: &SchemaNode, token: &str, registry: &mut TypeRegistry) -> bool {
    if schema.flag(PRESERVE_UNKNOWN_FIELDS) {
        registry.insert(token, ObjectTypeDefinition::empty());
        return true;
    }
    if schema.nested_map("properties").is_some() {
        register_type(schema, token, registry);
        return true;
    }
    false
}

fn inject_object_fields(
    resource: &CustomResource,
    version: &str,
    token: &str,
    registry: &mut TypeRegistry,
) {
    let Some(root) = registry.get_mut(token) else {
        unreachable!("resource type {} was registered just before", token);
    };

    root.properties.insert(
        "apiVersion".to_string(),
        PropertyDefinition::string_constant(resource.api_version(version)),
    );
    root.properties.insert(
        "kind".to_string(),
        PropertyDefinition::string_constant(resource.kind.clone()),
    );
    root.properties.insert(
        "metadata".to_string(),
        PropertyDefinition::new(TypeDescriptor::ObjectRef(OBJECT_META_TOKEN.to_string())),
    );
}
