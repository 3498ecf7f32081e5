//! Package document assembly

use crate::document::{PackageDocument, ResourceSpec};
use crate::validator::{PackageValidator, ReferenceValidator};
use crd2schema_common::{
    token_package, GeneratorError, ObjectTypeDefinition, Result, TypeRegistry, ValidationError,
    DEFAULT_PACKAGE_NAME, KUBERNETES_PACKAGE, OBJECT_META_TOKEN,
};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

/// Builds a `PackageDocument` from a type registry and resource tokens
///
/// ```rust,ignore
/// let package = PackageBuilder::new()
///     .with_version(Some("0.1.0".to_string()))
///     .build(&mut assembled.registry, &assembled.resource_tokens, true)?;
/// ```
#[derive(Debug, Clone)]
pub struct PackageBuilder<V = ReferenceValidator> {
    name: String,
    version: Option<String>,
    language: BTreeMap<String, Value>,
    validator: V,
}

impl PackageBuilder<ReferenceValidator> {
    pub fn new() -> Self {
        Self {
            name: DEFAULT_PACKAGE_NAME.to_string(),
            version: None,
            language: BTreeMap::new(),
            validator: ReferenceValidator,
        }
    }
}

impl Default for PackageBuilder<ReferenceValidator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: PackageValidator> PackageBuilder<V> {
    /// Replace the validator run on every built document
    pub fn with_validator<W: PackageValidator>(self, validator: W) -> PackageBuilder<W> {
        PackageBuilder {
            name: self.name,
            version: self.version,
            language: self.language,
            validator,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }

    /// Attach opaque settings for one target language
    pub fn with_language(mut self, language: impl Into<String>, settings: Value) -> Self {
        self.language.insert(language.into(), settings);
        self
    }

    /// Build and validate the package document
    ///
    /// With `include_object_meta`, a stub object metadata type is present in
    /// `registry` while the document is built, so references to it resolve;
    /// it is part of the returned document's types. `registry` is restored to
    /// its previous contents before returning, whether the build succeeds or
    /// not.
    pub fn build(
        &self,
        registry: &mut TypeRegistry,
        resource_tokens: &[String],
        include_object_meta: bool,
    ) -> Result<PackageDocument> {
        if !include_object_meta {
            return self.assemble(registry, resource_tokens);
        }

        let displaced = registry.insert(OBJECT_META_TOKEN, ObjectTypeDefinition::empty());
        let result = self.assemble(registry, resource_tokens);
        match displaced {
            Some(previous) => {
                registry.insert(OBJECT_META_TOKEN, previous);
            }
            None => {
                registry.remove(OBJECT_META_TOKEN);
            }
        }
        result
    }

    fn assemble(
        &self,
        registry: &TypeRegistry,
        resource_tokens: &[String],
    ) -> Result<PackageDocument> {
        let mut packages: BTreeSet<String> = [DEFAULT_PACKAGE_NAME, KUBERNETES_PACKAGE]
            .into_iter()
            .map(String::from)
            .collect();
        let mut resources = BTreeMap::new();

        for token in resource_tokens {
            let definition = registry.get(token).ok_or_else(|| {
                GeneratorError::Build(ValidationError::new(format!(
                    "resource {} has no type definition",
                    token
                )))
            })?;
            resources.insert(token.clone(), ResourceSpec::from(definition));
            if let Some(package) = token_package(token) {
                packages.insert(package.to_string());
            }
        }

        let package = PackageDocument {
            name: self.name.clone(),
            version: self.version.clone(),
            types: registry.as_map().clone(),
            resources,
            allowed_package_names: packages.into_iter().collect(),
            language: self.language.clone(),
        };

        self.validator
            .validate(&package)
            .map_err(GeneratorError::Build)?;

        info!(
            name = %package.name,
            types = package.types.len(),
            resources = package.resources.len(),
            "assembled package"
        );
        Ok(package)
    }
}

/// Build a package with the default name and validator
pub fn build_package(
    registry: &mut TypeRegistry,
    resource_tokens: &[String],
    include_object_meta: bool,
) -> Result<PackageDocument> {
    PackageBuilder::new().build(registry, resource_tokens, include_object_meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::MockPackageValidator;
    use crd2schema_common::{PropertyDefinition, TypeDescriptor};

    fn registry_with_resource(token: &str) -> TypeRegistry {
        let mut root = ObjectTypeDefinition::empty();
        root.properties.insert(
            "metadata".to_string(),
            PropertyDefinition::new(TypeDescriptor::ObjectRef(OBJECT_META_TOKEN.to_string())),
        );
        let mut registry = TypeRegistry::new();
        registry.insert(token, root);
        registry
    }

    #[test]
    fn test_validator_sees_placeholder() {
        let token = "kubernetes:example.com/v1:Widget".to_string();
        let mut registry = registry_with_resource(&token);

        let mut validator = MockPackageValidator::new();
        validator
            .expect_validate()
            .withf(|package| package.types.contains_key(OBJECT_META_TOKEN))
            .times(1)
            .returning(|_| Ok(()));

        let package = PackageBuilder::new()
            .with_validator(validator)
            .build(&mut registry, &[token], true)
            .unwrap();

        assert!(package.types.contains_key(OBJECT_META_TOKEN));
        assert!(!registry.contains(OBJECT_META_TOKEN));
    }

    #[test]
    fn test_validator_failure_is_wrapped_and_registry_restored() {
        let token = "kubernetes:example.com/v1:Widget".to_string();
        let mut registry = registry_with_resource(&token);
        let before = registry.clone();

        let mut validator = MockPackageValidator::new();
        validator
            .expect_validate()
            .returning(|_| Err(ValidationError::new("boom")));

        let err = PackageBuilder::new()
            .with_validator(validator)
            .build(&mut registry, &[token], true)
            .unwrap_err();

        assert_eq!(err.to_string(), "could not assemble package: boom");
        assert_eq!(registry, before);
    }

    #[test]
    fn test_existing_metadata_type_is_put_back() {
        let mut registry = TypeRegistry::new();
        let mut real = ObjectTypeDefinition::empty();
        real.description = Some("real metadata".to_string());
        registry.insert(OBJECT_META_TOKEN, real.clone());

        let package = build_package(&mut registry, &[], true).unwrap();

        assert_eq!(package.types[OBJECT_META_TOKEN], ObjectTypeDefinition::empty());
        assert_eq!(registry.get(OBJECT_META_TOKEN), Some(&real));
    }

    #[test]
    fn test_missing_resource_type_is_a_build_error() {
        let mut registry = TypeRegistry::new();
        let err = build_package(&mut registry, &["kubernetes:a/v1:Gone".to_string()], true)
            .unwrap_err();
        assert!(matches!(err, GeneratorError::Build(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_options_flow_into_document() {
        let mut registry = TypeRegistry::new();
        let package = PackageBuilder::new()
            .with_name("widgets")
            .with_version(Some("1.0.0".to_string()))
            .with_language("python", serde_json::json!({ "moduleNameOverrides": {} }))
            .build(&mut registry, &[], false)
            .unwrap();

        assert_eq!(package.name, "widgets");
        assert_eq!(package.version.as_deref(), Some("1.0.0"));
        assert!(package.language.contains_key("python"));
        assert_eq!(package.allowed_package_names, vec!["crds", "kubernetes"]);
    }
}
