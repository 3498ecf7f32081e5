//! CRD manifest loader

use crd2schema_common::{CustomResource, GeneratorError, Result, SchemaNode};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const CRD_KIND: &str = "CustomResourceDefinition";

/// Loads `CustomResource`s from CRD manifests
///
/// Accepts multi-document YAML (JSON is valid YAML), `List` documents
/// wrapping several CRDs, and both `apiextensions.k8s.io/v1` and `v1beta1`
/// layouts. Documents of any other kind are skipped.
pub struct CrdLoader;

impl CrdLoader {
    /// Load every CRD in a manifest file
    ///
    /// # Example
    /// ```rust,ignore
    /// let resources = CrdLoader::from_file("crontab-crd.yaml")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Vec<CustomResource>> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            GeneratorError::Parse(format!(
                "Failed to read CRD file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_yaml(&content).map_err(|e| match e {
            GeneratorError::Parse(msg) => {
                GeneratorError::Parse(format!("{}: {}", path.as_ref().display(), msg))
            }
            other => other,
        })
    }

    /// Load every CRD in a (multi-document) YAML string
    pub fn from_yaml(yaml: &str) -> Result<Vec<CustomResource>> {
        let mut resources = Vec::new();

        for (index, document) in serde_yaml::Deserializer::from_str(yaml).enumerate() {
            let value = Value::deserialize(document).map_err(|e| {
                GeneratorError::Parse(format!("Invalid YAML in document {}: {}", index, e))
            })?;
            Self::collect(&value, &mut resources)?;
        }

        Ok(resources)
    }

    /// Load a single CRD from an already decoded document
    ///
    /// Returns `None` when the document is not a CustomResourceDefinition.
    pub fn from_value(value: &Value) -> Result<Option<CustomResource>> {
        let kind = value.get("kind").and_then(Value::as_str);
        if kind != Some(CRD_KIND) {
            return Ok(None);
        }

        let name = value
            .get("metadata")
            .and_then(|m| m.get("name"))
            .and_then(Value::as_str)
            .unwrap_or("<unnamed>");

        let spec = value.get("spec").ok_or_else(|| {
            GeneratorError::Parse(format!("CRD {} is missing 'spec'", name))
        })?;

        let group = spec
            .get("group")
            .and_then(Value::as_str)
            .ok_or_else(|| GeneratorError::Parse(format!("CRD {} is missing 'spec.group'", name)))?;

        let resource_kind = spec
            .get("names")
            .and_then(|n| n.get("kind"))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                GeneratorError::Parse(format!("CRD {} is missing 'spec.names.kind'", name))
            })?;

        let mut resource = CustomResource::new(group, resource_kind);
        for (version, schema) in Self::parse_versions(spec) {
            resource.versions.insert(version, schema);
        }

        if resource.versions.is_empty() {
            warn!(crd = name, "CRD declares no versions");
        }
        debug!(
            crd = name,
            versions = resource.versions.len(),
            "loaded custom resource definition"
        );

        Ok(Some(resource))
    }

    fn collect(value: &Value, resources: &mut Vec<CustomResource>) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }

        if value.get("kind").and_then(Value::as_str) == Some("List") {
            for item in value
                .get("items")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
            {
                Self::collect(item, resources)?;
            }
            return Ok(());
        }

        match Self::from_value(value)? {
            Some(resource) => resources.push(resource),
            None => warn!(
                kind = value.get("kind").and_then(serde_json::Value::as_str).unwrap_or("<none>"),
                "skipping document that is not a CustomResourceDefinition"
            ),
        }
        Ok(())
    }

    /// Version name and schema of every declared version
    ///
    /// A per-version `schema.openAPIV3Schema` wins over the CRD-wide
    /// `validation.openAPIV3Schema` of the v1beta1 layout.
    fn parse_versions(spec: &Value) -> Vec<(String, SchemaNode)> {
        let shared = spec
            .get("validation")
            .and_then(|v| v.get("openAPIV3Schema"))
            .and_then(Value::as_object);

        let versions = spec.get("versions").and_then(Value::as_array);

        match versions {
            Some(versions) => versions
                .iter()
                .filter_map(|version| {
                    let name = version.get("name").and_then(Value::as_str)?;
                    let schema = version
                        .get("schema")
                        .and_then(|s| s.get("openAPIV3Schema"))
                        .and_then(Value::as_object)
                        .or(shared)
                        .cloned()
                        .unwrap_or_default();
                    Some((name.to_string(), schema))
                })
                .collect(),
            None => spec
                .get("version")
                .and_then(Value::as_str)
                .map(|name| vec![(name.to_string(), shared.cloned().unwrap_or_default())])
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_crd_value_is_ignored() {
        let value = json!({ "kind": "ConfigMap", "metadata": { "name": "x" } });
        assert!(CrdLoader::from_value(&value).unwrap().is_none());
    }

    #[test]
    fn test_missing_group_is_an_error() {
        let value = json!({
            "kind": "CustomResourceDefinition",
            "metadata": { "name": "widgets.example.com" },
            "spec": { "names": { "kind": "Widget" } }
        });
        let err = CrdLoader::from_value(&value).unwrap_err();
        assert!(err.to_string().contains("spec.group"));
    }

    #[test]
    fn test_v1beta1_single_version() {
        let value = json!({
            "kind": "CustomResourceDefinition",
            "spec": {
                "group": "example.com",
                "version": "v1beta1",
                "names": { "kind": "Widget" },
                "validation": { "openAPIV3Schema": { "properties": { "spec": {} } } }
            }
        });
        let resource = CrdLoader::from_value(&value).unwrap().unwrap();
        assert_eq!(resource.versions.len(), 1);
        assert!(resource.versions["v1beta1"].contains_key("properties"));
    }
}
