//! Structural validation of package documents

use crate::document::PackageDocument;
use crd2schema_common::{token_package, ObjectTypeDefinition, ValidationError, OBJECT_META_TOKEN};

/// Checks a package document before it is handed out
#[cfg_attr(test, mockall::automock)]
pub trait PackageValidator {
    fn validate(&self, package: &PackageDocument) -> Result<(), ValidationError>;
}

/// Default validator: names, references and package prefixes
///
/// - the package name is not empty
/// - every object reference in a type or resource names a type in `types`,
///   except the object metadata type, which may be provided externally
/// - every resource token names a type in `types`
/// - every token with a package prefix uses an allowed package name
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceValidator;

impl PackageValidator for ReferenceValidator {
    fn validate(&self, package: &PackageDocument) -> Result<(), ValidationError> {
        let mut diagnostics = Vec::new();

        if package.name.trim().is_empty() {
            diagnostics.push("package name is empty".to_string());
        }

        for (name, definition) in &package.types {
            check_package(package, "type", name, &mut diagnostics);
            check_references(package, name, definition, &mut diagnostics);
        }

        for (token, resource) in &package.resources {
            check_package(package, "resource", token, &mut diagnostics);
            if !package.types.contains_key(token) {
                diagnostics.push(format!("resource {} has no type definition", token));
            }
            for (property, input) in &resource.input_properties {
                for reference in input.type_descriptor.references() {
                    if !resolves(package, reference) {
                        diagnostics.push(format!(
                            "input property {} of {} refers to undefined type {}",
                            property, token, reference
                        ));
                    }
                }
            }
        }

        if diagnostics.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { diagnostics })
        }
    }
}

fn check_references(
    package: &PackageDocument,
    owner: &str,
    definition: &ObjectTypeDefinition,
    diagnostics: &mut Vec<String>,
) {
    for (property, spec) in &definition.properties {
        for reference in spec.type_descriptor.references() {
            if !resolves(package, reference) {
                diagnostics.push(format!(
                    "property {} of {} refers to undefined type {}",
                    property, owner, reference
                ));
            }
        }
    }
}

fn resolves(package: &PackageDocument, reference: &str) -> bool {
    reference == OBJECT_META_TOKEN || package.types.contains_key(reference)
}

fn check_package(package: &PackageDocument, what: &str, token: &str, diagnostics: &mut Vec<String>) {
    if let Some(prefix) = token_package(token) {
        if !package.allowed_package_names.iter().any(|p| p == prefix) {
            diagnostics.push(format!(
                "{} {} uses package {} which is not allowed",
                what, token, prefix
            ));
        }
    }
}
