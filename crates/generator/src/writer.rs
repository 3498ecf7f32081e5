//! Writing a package document to disk

use crate::document::PackageDocument;
use crate::templates;
use crd2schema_common::{GeneratorError, PropertyDefinition, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tera::Tera;
use tracing::debug;

/// File name of the serialized package document
pub const SCHEMA_FILE: &str = "schema.json";

/// File name of the rendered package summary
pub const README_FILE: &str = "README.md";

/// Writes a package document and its summary to a directory
///
/// Output layout:
/// - schema.json (the package document, pretty-printed)
/// - README.md (resources and types overview)
pub struct PackageWriter {
    package: PackageDocument,
    tera: Tera,
}

#[derive(Serialize)]
struct ResourceView<'a> {
    token: &'a str,
    description: Option<&'a str>,
    properties: Vec<PropertyView<'a>>,
}

#[derive(Serialize)]
struct PropertyView<'a> {
    name: &'a str,
    spec: &'a PropertyDefinition,
    required: bool,
}

#[derive(Serialize)]
struct TypeView<'a> {
    name: &'a str,
    property_count: usize,
}

impl PackageWriter {
    pub fn new(package: PackageDocument) -> Result<Self> {
        let tera = templates::load_templates()?;
        Ok(Self { package, tera })
    }

    pub fn package(&self) -> &PackageDocument {
        &self.package
    }

    /// Write all package files to a directory
    pub fn generate_to_directory(&self, output_dir: &Path) -> Result<()> {
        fs::create_dir_all(output_dir).map_err(|e| {
            GeneratorError::Generation(format!("Failed to create output directory: {}", e))
        })?;

        self.write_schema(output_dir)?;
        self.write_readme(output_dir)?;

        Ok(())
    }

    /// Write schema.json
    fn write_schema(&self, output_dir: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.package)?;

        let output_path = output_dir.join(SCHEMA_FILE);
        fs::write(&output_path, json + "\n").map_err(|e| {
            GeneratorError::Generation(format!("Failed to write {}: {}", SCHEMA_FILE, e))
        })?;
        debug!(path = %output_path.display(), "wrote package schema");

        Ok(())
    }

    /// Write README.md
    fn write_readme(&self, output_dir: &Path) -> Result<()> {
        let rendered = self.render_readme()?;

        let output_path = output_dir.join(README_FILE);
        fs::write(&output_path, rendered).map_err(|e| {
            GeneratorError::Generation(format!("Failed to write {}: {}", README_FILE, e))
        })?;
        debug!(path = %output_path.display(), "wrote package readme");

        Ok(())
    }

    /// Render the package summary
    pub fn render_readme(&self) -> Result<String> {
        let context = self.create_context();
        self.tera
            .render("README.md", &context)
            .map_err(|e| GeneratorError::Generation(format!("Template error: {:?}", e)))
    }

    /// Create template context from the package document
    fn create_context(&self) -> tera::Context {
        let resources: Vec<ResourceView> = self
            .package
            .resources
            .iter()
            .map(|(token, resource)| ResourceView {
                token,
                description: resource.object.description.as_deref(),
                properties: resource
                    .input_properties
                    .iter()
                    .map(|(name, spec)| PropertyView {
                        name,
                        spec,
                        required: resource.object.required.contains(name),
                    })
                    .collect(),
            })
            .collect();

        let types: Vec<TypeView> = self
            .package
            .types
            .iter()
            .map(|(name, definition)| TypeView {
                name,
                property_count: definition.properties.len(),
            })
            .collect();

        let mut context = tera::Context::new();
        context.insert("name", &self.package.name);
        context.insert("version", &self.package.version);
        context.insert("resources", &resources);
        context.insert("types", &types);
        context
    }
}

/// Write package files (convenience function)
pub fn write_package(package: PackageDocument, output_dir: &Path) -> Result<()> {
    PackageWriter::new(package)?.generate_to_directory(output_dir)
}
