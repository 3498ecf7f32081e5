//! Common types and utilities for crd2schema
//!
//! This crate contains the type model shared by the parser, the package
//! generator and the CLI: type descriptors, object type definitions, the
//! type registry, resource descriptors, configuration and error types.

mod config;
mod registry;
mod resource;
mod types;

pub use config::GeneratorConfig;
pub use registry::TypeRegistry;
pub use resource::{group_prefix, resource_token, token_package, CustomResource};
pub use types::{
    ObjectTypeDefinition, PrimitiveType, PropertyDefinition, SchemaNode, TypeDescriptor, TypeSpec,
    ANY_TYPE_REF, TYPE_REF_PREFIX,
};

use thiserror::Error;

/// Default package name of a generated package
pub const DEFAULT_PACKAGE_NAME: &str = "crds";

/// Package that owns every resource token and the object metadata type
pub const KUBERNETES_PACKAGE: &str = "kubernetes";

/// Token of the well-known Kubernetes object metadata type
pub const OBJECT_META_TOKEN: &str = "kubernetes:meta/v1:ObjectMeta";

/// Errors that can occur while translating CRDs into a package
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("could not assemble package: {0}")]
    Build(ValidationError),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Structural problems found while validating a package document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", diagnostics.join("; "))]
pub struct ValidationError {
    pub diagnostics: Vec<String>,
}

impl ValidationError {
    pub fn new(diagnostic: impl Into<String>) -> Self {
        Self {
            diagnostics: vec![diagnostic.into()],
        }
    }
}

/// Result type for crd2schema operations
pub type Result<T> = std::result::Result<T, GeneratorError>;
