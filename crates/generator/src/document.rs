//! Normalized package document consumed by per-language generators

use crd2schema_common::{ObjectTypeDefinition, PropertyDefinition};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Everything a per-language generator needs to emit an SDK
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDocument {
    /// Package name
    pub name: String,

    /// Package version, if one was given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Every named object type
    #[serde(default)]
    pub types: BTreeMap<String, ObjectTypeDefinition>,

    /// Resources by token
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceSpec>,

    /// Package prefixes tokens may use
    #[serde(default)]
    pub allowed_package_names: Vec<String>,

    /// Opaque per-language settings
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub language: BTreeMap<String, Value>,
}

impl PackageDocument {
    /// Resource tokens in document order
    pub fn resource_tokens(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }
}

/// A resource: its object shape plus the properties accepted as inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSpec {
    #[serde(flatten)]
    pub object: ObjectTypeDefinition,

    #[serde(default)]
    pub input_properties: BTreeMap<String, PropertyDefinition>,
}

impl From<&ObjectTypeDefinition> for ResourceSpec {
    fn from(object: &ObjectTypeDefinition) -> Self {
        Self {
            object: object.clone(),
            input_properties: object.properties.clone(),
        }
    }
}
