//! Custom resource descriptors and resource tokens

use crate::types::SchemaNode;
use crate::KUBERNETES_PACKAGE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One custom resource kind with the validation schema of each version
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomResource {
    /// API group (e.g., "stable.example.com")
    pub group: String,

    /// Kind (e.g., "CronTab")
    pub kind: String,

    /// OpenAPI v3 schema per version name
    #[serde(default)]
    pub versions: BTreeMap<String, SchemaNode>,
}

impl CustomResource {
    pub fn new(group: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            kind: kind.into(),
            versions: BTreeMap::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>, schema: SchemaNode) -> Self {
        self.versions.insert(version.into(), schema);
        self
    }

    /// Token of this resource at `version`
    pub fn token(&self, version: &str) -> String {
        resource_token(&self.group, version, &self.kind)
    }

    /// `group/version` of this resource at `version`
    pub fn api_version(&self, version: &str) -> String {
        format!("{}/{}", self.group, version)
    }
}

/// Stable identifier of a (group, version, kind) triple
///
/// # Examples
/// ```
/// use crd2schema_common::resource_token;
///
/// assert_eq!(
///     resource_token("stable.example.com", "v1", "CronTab"),
///     "kubernetes:stable.example.com/v1:CronTab"
/// );
/// ```
pub fn resource_token(group: &str, version: &str, kind: &str) -> String {
    format!("{}:{}/{}:{}", KUBERNETES_PACKAGE, group, version, kind)
}

/// Package part of a token (everything before the first `:`)
pub fn token_package(token: &str) -> Option<&str> {
    token.split_once(':').map(|(package, _)| package)
}

/// First DNS label of an API group (e.g., "cert-manager.io" -> "cert-manager")
pub fn group_prefix(group: &str) -> &str {
    group.split('.').next().unwrap_or(group)
}
