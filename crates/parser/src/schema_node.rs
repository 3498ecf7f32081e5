//! Defensive accessors over untyped schema nodes
//!
//! Every lookup returns `None` when the key is missing or holds a value of
//! the wrong shape; nothing here fails.

use crd2schema_common::{PrimitiveType, SchemaNode};
use serde_json::Value;

pub const INT_OR_STRING: &str = "x-kubernetes-int-or-string";
pub const PRESERVE_UNKNOWN_FIELDS: &str = "x-kubernetes-preserve-unknown-fields";

/// Value of a schema's `type` keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaType {
    Primitive(PrimitiveType),
    Array,
    Object,
    /// A `type` string this translator cannot represent
    Unsupported,
}

impl SchemaType {
    pub fn parse(s: &str) -> Self {
        match s {
            "array" => Self::Array,
            "object" => Self::Object,
            other => PrimitiveType::parse(other)
                .map(Self::Primitive)
                .unwrap_or(Self::Unsupported),
        }
    }
}

/// Presence-returning lookups on a schema node
pub trait SchemaNodeExt {
    /// Nested mapping under `key`
    fn nested_map(&self, key: &str) -> Option<&SchemaNode>;

    fn nested_str(&self, key: &str) -> Option<&str>;

    fn nested_bool(&self, key: &str) -> Option<bool>;

    /// List of strings under `key`; absent if any element is not a string
    fn nested_string_slice(&self, key: &str) -> Option<Vec<String>>;

    /// List of mappings under `key`; absent if any element is not a mapping
    fn nested_map_slice(&self, key: &str) -> Option<Vec<&SchemaNode>>;

    /// True only when the flag is present and set to `true`
    fn flag(&self, key: &str) -> bool {
        self.nested_bool(key).unwrap_or(false)
    }

    /// Parsed `type` keyword
    fn schema_type(&self) -> Option<SchemaType> {
        self.nested_str("type").map(SchemaType::parse)
    }
}

impl SchemaNodeExt for SchemaNode {
    fn nested_map(&self, key: &str) -> Option<&SchemaNode> {
        self.get(key).and_then(Value::as_object)
    }

    fn nested_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    fn nested_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    fn nested_string_slice(&self, key: &str) -> Option<Vec<String>> {
        self.get(key)
            .and_then(Value::as_array)?
            .iter()
            .map(|v| v.as_str().map(String::from))
            .collect()
    }

    fn nested_map_slice(&self, key: &str) -> Option<Vec<&SchemaNode>> {
        self.get(key)
            .and_then(Value::as_array)?
            .iter()
            .map(Value::as_object)
            .collect()
    }
}
