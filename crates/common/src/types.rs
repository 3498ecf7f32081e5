//! Type model produced by schema translation
//!
//! `TypeDescriptor` is the in-memory form; `TypeSpec` is its wire shape in a
//! serialized package document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// An untyped OpenAPI schema fragment
pub type SchemaNode = Map<String, Value>;

/// Reference used on the wire for the "any" escape hatch
pub const ANY_TYPE_REF: &str = "pulumi.json#/Any";

/// Prefix of references to named object types
pub const TYPE_REF_PREFIX: &str = "#/types/";

/// Scalar schema types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Boolean,
    Integer,
    Number,
    String,
}

impl PrimitiveType {
    /// Parse an OpenAPI `type` value, `None` for non-scalar types
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "boolean" => Some(Self::Boolean),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "string" => Some(Self::String),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference-or-inline type of a property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "TypeSpec", try_from = "TypeSpec")]
pub enum TypeDescriptor {
    /// boolean, integer, number or string
    Primitive(PrimitiveType),

    /// Array of the element type
    Array(Box<TypeDescriptor>),

    /// Reference to a named object type in the registry
    ObjectRef(String),

    /// Map from arbitrary string keys to the value type
    ObjectMap(Box<TypeDescriptor>),

    /// Exactly one of the member types (`oneOf`)
    Union(Vec<TypeDescriptor>),

    /// Arbitrary JSON
    Any,

    /// Kubernetes int-or-string
    IntOrString,
}

impl TypeDescriptor {
    /// Map from string to arbitrary JSON
    pub fn arbitrary_json() -> Self {
        Self::ObjectMap(Box::new(Self::Any))
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Names of every object type this descriptor refers to, depth first
    pub fn references(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        self.collect_references(&mut refs);
        refs
    }

    fn collect_references<'a>(&'a self, refs: &mut Vec<&'a str>) {
        match self {
            Self::ObjectRef(name) => refs.push(name),
            Self::Array(inner) | Self::ObjectMap(inner) => inner.collect_references(refs),
            Self::Union(members) => {
                for member in members {
                    member.collect_references(refs);
                }
            }
            Self::Primitive(_) | Self::Any | Self::IntOrString => {}
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "{}", p),
            Self::Array(inner) => match inner.as_ref() {
                Self::Union(_) | Self::IntOrString => write!(f, "({})[]", inner),
                _ => write!(f, "{}[]", inner),
            },
            Self::ObjectRef(name) => f.write_str(name),
            Self::ObjectMap(inner) => write!(f, "map[{}]", inner),
            Self::Union(members) => {
                let labels: Vec<String> = members.iter().map(ToString::to_string).collect();
                f.write_str(&labels.join(" | "))
            }
            Self::Any => f.write_str("any"),
            Self::IntOrString => f.write_str("integer | string"),
        }
    }
}

/// Serialized shape of a `TypeDescriptor`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSpec {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<TypeSpec>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<TypeSpec>>,

    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<TypeSpec>>,
}

impl TypeSpec {
    fn of_type(type_name: &str) -> Self {
        Self {
            type_name: Some(type_name.to_string()),
            ..Default::default()
        }
    }
}

impl From<TypeDescriptor> for TypeSpec {
    fn from(descriptor: TypeDescriptor) -> Self {
        match descriptor {
            TypeDescriptor::Primitive(p) => TypeSpec::of_type(p.as_str()),
            TypeDescriptor::Array(items) => TypeSpec {
                items: Some(Box::new(TypeSpec::from(*items))),
                ..TypeSpec::of_type("array")
            },
            TypeDescriptor::ObjectRef(name) => TypeSpec {
                reference: Some(format!("{}{}", TYPE_REF_PREFIX, name)),
                ..TypeSpec::of_type("object")
            },
            TypeDescriptor::ObjectMap(values) => TypeSpec {
                additional_properties: Some(Box::new(TypeSpec::from(*values))),
                ..TypeSpec::of_type("object")
            },
            TypeDescriptor::Union(members) => TypeSpec {
                one_of: Some(members.into_iter().map(TypeSpec::from).collect()),
                ..Default::default()
            },
            TypeDescriptor::Any => TypeSpec {
                reference: Some(ANY_TYPE_REF.to_string()),
                ..Default::default()
            },
            TypeDescriptor::IntOrString => TypeSpec {
                one_of: Some(vec![
                    TypeSpec::of_type("integer"),
                    TypeSpec::of_type("string"),
                ]),
                ..Default::default()
            },
        }
    }
}

impl TryFrom<TypeSpec> for TypeDescriptor {
    type Error = String;

    fn try_from(spec: TypeSpec) -> std::result::Result<Self, Self::Error> {
        if let Some(reference) = spec.reference {
            if reference == ANY_TYPE_REF {
                return Ok(TypeDescriptor::Any);
            }
            return reference
                .strip_prefix(TYPE_REF_PREFIX)
                .map(|name| TypeDescriptor::ObjectRef(name.to_string()))
                .ok_or_else(|| format!("unsupported type reference {}", reference));
        }

        if let Some(members) = spec.one_of {
            // A union of exactly integer then string is indistinguishable on the wire
            if members == [TypeSpec::of_type("integer"), TypeSpec::of_type("string")] {
                return Ok(TypeDescriptor::IntOrString);
            }
            return members
                .into_iter()
                .map(TypeDescriptor::try_from)
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(TypeDescriptor::Union);
        }

        match spec.type_name.as_deref() {
            Some("array") => {
                let items = spec
                    .items
                    .ok_or_else(|| "array type without items".to_string())?;
                Ok(TypeDescriptor::Array(Box::new(TypeDescriptor::try_from(
                    *items,
                )?)))
            }
            Some("object") => {
                let values = spec
                    .additional_properties
                    .ok_or_else(|| "object type without $ref or additionalProperties".to_string())?;
                Ok(TypeDescriptor::ObjectMap(Box::new(
                    TypeDescriptor::try_from(*values)?,
                )))
            }
            Some(other) => PrimitiveType::parse(other)
                .map(TypeDescriptor::Primitive)
                .ok_or_else(|| format!("unsupported type {}", other)),
            None => Err("type spec without type, $ref or oneOf".to_string()),
        }
    }
}

/// A property of an object type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    #[serde(flatten)]
    pub type_descriptor: TypeDescriptor,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Default value, passed through uninterpreted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Fixed value the property must always hold
    #[serde(rename = "const", default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<Value>,
}

impl PropertyDefinition {
    pub fn new(type_descriptor: TypeDescriptor) -> Self {
        Self {
            type_descriptor,
            description: None,
            default: None,
            constant: None,
        }
    }

    /// A string property pinned to `value`
    pub fn string_constant(value: impl Into<String>) -> Self {
        Self {
            constant: Some(Value::String(value.into())),
            ..Self::new(TypeDescriptor::Primitive(PrimitiveType::String))
        }
    }
}

/// A named object type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "object")]
pub struct ObjectTypeDefinition {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertyDefinition>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub required: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ObjectTypeDefinition {
    /// An object type with no properties
    pub fn empty() -> Self {
        Self::default()
    }

    /// Object types referenced by any of this type's properties
    pub fn references(&self) -> Vec<&str> {
        self.properties
            .values()
            .flat_map(|p| p.type_descriptor.references())
            .collect()
    }
}
