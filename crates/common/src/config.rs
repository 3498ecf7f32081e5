//! Generator configuration loaded from YAML files
//!
//! Every field is optional in the file; command-line flags are applied on
//! top of whatever the file provides.

use crate::{GeneratorError, Result, DEFAULT_PACKAGE_NAME};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for one package generation run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Package name written into the document (e.g., "crds")
    pub name: String,

    /// Package version, passed through verbatim
    pub version: Option<String>,

    /// Include the object metadata placeholder type while building
    pub include_object_meta: bool,

    /// Output directory for generated files
    pub output: Option<PathBuf>,

    /// Languages that receive a `moduleNameOverrides` block
    pub languages: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_PACKAGE_NAME.to_string(),
            version: None,
            include_object_meta: true,
            output: None,
            languages: Vec::new(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        Self::from_yaml(&content).map_err(|e| match e {
            GeneratorError::Config(msg) => {
                GeneratorError::Config(format!("{} (in {:?})", msg, path))
            }
            other => other,
        })
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| GeneratorError::Config(format!("Failed to parse config YAML: {}", e)))?;

        if config.name.trim().is_empty() {
            return Err(GeneratorError::Config(
                "package name must not be empty".to_string(),
            ));
        }

        Ok(config)
    }
}
