//! crd2schema CLI
//!
//! Command-line interface for turning Kubernetes CustomResourceDefinitions
//! into a package schema.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use crd2schema_common::{CustomResource, GeneratorConfig, TypeDescriptor};
use crd2schema_generator::{PackageBuilder, PackageWriter, README_FILE, SCHEMA_FILE};
use crd2schema_parser::{assemble_types, CrdLoader};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use walkdir::WalkDir;

const DEFAULT_OUTPUT: &str = "./output";

#[derive(Parser)]
#[command(name = "crd2schema")]
#[command(version, about = "Generate package schemas from Kubernetes CRDs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a package schema from CRD manifests
    #[command(after_help = "EXAMPLES:\n  \
        # Generate from a single manifest\n  \
        crd2schema generate --crds crontab.yaml --output ./crontabs\n\n  \
        # Scan a directory and attach Python module overrides\n  \
        crd2schema generate \\\n    \
        --crd-dir ./crds/ \\\n    \
        --name certmanager \\\n    \
        --language python \\\n    \
        --output ./certmanager")]
    Generate {
        /// Comma-separated list of CRD manifest paths
        #[arg(short, long, value_delimiter = ',')]
        crds: Vec<PathBuf>,

        /// Directory scanned recursively for .yaml, .yml and .json manifests
        #[arg(long)]
        crd_dir: Option<PathBuf>,

        /// YAML configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Package name
        #[arg(short, long)]
        name: Option<String>,

        /// Package version
        #[arg(long)]
        version: Option<String>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Leave out the object metadata placeholder type
        #[arg(long)]
        no_object_meta: bool,

        /// Languages that receive module name overrides
        #[arg(short, long, value_delimiter = ',')]
        language: Vec<String>,
    },

    /// Print the resources and types found in CRD manifests
    Inspect {
        /// Comma-separated list of CRD manifest paths
        #[arg(short, long, value_delimiter = ',')]
        crds: Vec<PathBuf>,

        /// Directory scanned recursively for .yaml, .yml and .json manifests
        #[arg(long)]
        crd_dir: Option<PathBuf>,
    },
}

/// Command-line values that take precedence over the config file
#[derive(Default)]
struct Overrides {
    name: Option<String>,
    version: Option<String>,
    output: Option<PathBuf>,
    no_object_meta: bool,
    languages: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Commands::Generate {
            crds,
            crd_dir,
            config,
            name,
            version,
            output,
            no_object_meta,
            language,
        } => {
            let overrides = Overrides {
                name,
                version,
                output,
                no_object_meta,
                languages: language,
            };
            let config = resolve_config(config.as_deref(), overrides)?;
            generate_command(&crds, crd_dir.as_deref(), &config, cli.verbose)?;
        }
        Commands::Inspect { crds, crd_dir } => {
            inspect_command(&crds, crd_dir.as_deref(), cli.verbose)?;
        }
    }

    Ok(())
}

/// Install the stderr log subscriber; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install log subscriber")
}

/// Load the config file, if any, and apply command-line overrides
fn resolve_config(path: Option<&Path>, overrides: Overrides) -> Result<GeneratorConfig> {
    let mut config = match path {
        Some(path) => GeneratorConfig::load(path).context("Failed to load configuration")?,
        None => GeneratorConfig::default(),
    };

    if let Some(name) = overrides.name {
        if name.trim().is_empty() {
            anyhow::bail!("Package name must not be empty");
        }
        config.name = name;
    }
    if overrides.version.is_some() {
        config.version = overrides.version;
    }
    if overrides.output.is_some() {
        config.output = overrides.output;
    }
    if overrides.no_object_meta {
        config.include_object_meta = false;
    }
    for language in overrides.languages {
        if !config.languages.contains(&language) {
            config.languages.push(language);
        }
    }

    Ok(config)
}

fn generate_command(
    crd_paths: &[PathBuf],
    crd_dir: Option<&Path>,
    config: &GeneratorConfig,
    verbose: bool,
) -> Result<()> {
    let output = config
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    debug!(
        name = %config.name,
        version = config.version.as_deref().unwrap_or("-"),
        include_object_meta = config.include_object_meta,
        output = %output.display(),
        "resolved generator configuration"
    );

    let resources = load_resources(crd_paths, crd_dir, verbose)?;

    println!("{} Resolving schemas...", "→".cyan());
    let mut assembled = assemble_types(&resources);
    println!(
        "{} Registered {} resources and {} types",
        "✓".green(),
        assembled.resource_tokens.len(),
        assembled.registry.len()
    );

    let mut builder = PackageBuilder::new()
        .with_name(config.name.clone())
        .with_version(config.version.clone());
    if !config.languages.is_empty() {
        let modules = assembled.module_to_package();
        for language in &config.languages {
            builder = builder.with_language(
                language.clone(),
                serde_json::json!({ "moduleNameOverrides": modules }),
            );
        }
    }

    println!("{} Building package...", "→".cyan());
    let package = builder
        .build(
            &mut assembled.registry,
            &assembled.resource_tokens,
            config.include_object_meta,
        )
        .context("Failed to build package")?;

    println!("{} Writing package files...", "→".cyan());
    PackageWriter::new(package)
        .context("Failed to create package writer")?
        .generate_to_directory(&output)
        .context("Failed to write package")?;

    println!("\n{}", "✓ Generation complete!".green().bold());
    println!("\n{}", "Generated files:".bold());
    println!("  {}/{}", output.display(), SCHEMA_FILE);
    println!("  {}/{}", output.display(), README_FILE);

    Ok(())
}

fn inspect_command(crd_paths: &[PathBuf], crd_dir: Option<&Path>, verbose: bool) -> Result<()> {
    let resources = load_resources(crd_paths, crd_dir, verbose)?;
    let assembled = assemble_types(&resources);

    println!("\n{}", "Resources:".bold());
    if assembled.resource_tokens.is_empty() {
        println!("  (none)");
    }
    for token in &assembled.resource_tokens {
        println!("  • {}", token.cyan());
    }

    println!("\n{}", "Types:".bold());
    for (name, definition) in &assembled.registry {
        println!("  {}", name.yellow());
        if let Some(description) = &definition.description {
            if verbose {
                println!("    {}", description.dimmed());
            }
        }
        for (property, spec) in &definition.properties {
            let marker = if definition.required.contains(property) {
                "*"
            } else {
                " "
            };
            println!(
                "    {}{}: {}",
                marker,
                property,
                describe(&spec.type_descriptor)
            );
        }
    }

    Ok(())
}

fn describe(descriptor: &TypeDescriptor) -> ColoredString {
    match descriptor {
        TypeDescriptor::Any => descriptor.to_string().red(),
        TypeDescriptor::ObjectRef(_) => descriptor.to_string().cyan(),
        _ => descriptor.to_string().normal(),
    }
}

/// Gather manifest paths and load every CRD they contain
fn load_resources(
    crd_paths: &[PathBuf],
    crd_dir: Option<&Path>,
    verbose: bool,
) -> Result<Vec<CustomResource>> {
    let mut paths = crd_paths.to_vec();
    if let Some(dir) = crd_dir {
        println!(
            "{} Scanning directory for CRDs: {}",
            "→".cyan(),
            dir.display()
        );
        paths.extend(discover_crds(dir, verbose)?);
    }

    if paths.is_empty() {
        anyhow::bail!("No CRD manifests given; use --crds or --crd-dir");
    }

    let mut resources = Vec::new();
    for (i, path) in paths.iter().enumerate() {
        println!(
            "{} Parsing manifest {}/{}: {}",
            "→".cyan(),
            i + 1,
            paths.len(),
            path.display()
        );
        let loaded = CrdLoader::from_file(path)
            .with_context(|| format!("Failed to load CRDs from {}", path.display()))?;
        debug!(path = %path.display(), count = loaded.len(), "loaded manifest");
        resources.extend(loaded);
    }

    println!("{} Loaded {} CRDs", "✓".green(), resources.len());
    Ok(resources)
}

/// Find manifest files below `dir`, sorted by path
fn discover_crds(dir: &Path, verbose: bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("Not a directory: {}", dir.display());
    }

    let mut manifests = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to scan {}", dir.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_manifest(path) {
            continue;
        }
        if verbose {
            println!("  Found: {}", path.display());
        }
        manifests.push(path.to_path_buf());
    }

    println!(
        "{} Discovered {} manifest files",
        "✓".green(),
        manifests.len()
    );
    Ok(manifests)
}

fn is_manifest(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml" | "json")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_crds_filters_extensions() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp_dir.path().join("b.yaml"), "").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "").unwrap();
        fs::write(nested.join("a.json"), "{}").unwrap();
        fs::write(nested.join("c.yml"), "").unwrap();

        let found = discover_crds(temp_dir.path(), false).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();

        assert_eq!(names.len(), 3);
        assert!(names.contains(&"a.json"));
        assert!(names.contains(&"b.yaml"));
        assert!(names.contains(&"c.yml"));
    }

    #[test]
    fn test_discover_crds_rejects_files() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("crd.yaml");
        fs::write(&file, "").unwrap();
        assert!(discover_crds(&file, false).is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("crd2schema.yaml");
        fs::write(
            &path,
            "name: certmanager\nversion: 1.0.0\nlanguages: [python]\n",
        )
        .unwrap();

        let config = resolve_config(
            Some(&path),
            Overrides {
                version: Some("2.0.0".to_string()),
                no_object_meta: true,
                languages: vec!["python".to_string(), "nodejs".to_string()],
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(config.name, "certmanager");
        assert_eq!(config.version.as_deref(), Some("2.0.0"));
        assert!(!config.include_object_meta);
        assert_eq!(config.languages, vec!["python", "nodejs"]);
        assert_eq!(config.output, None);
    }

    #[test]
    fn test_empty_name_flag_is_rejected() {
        let overrides = Overrides {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(resolve_config(None, overrides).is_err());
    }

    fn write_widget_manifest(dir: &Path) -> PathBuf {
        let manifest = dir.join("widget.yaml");
        fs::write(
            &manifest,
            "apiVersion: apiextensions.k8s.io/v1\n\
             kind: CustomResourceDefinition\n\
             spec:\n  \
               group: example.com\n  \
               names:\n    \
                 kind: Widget\n  \
               versions:\n    \
                 - name: v1\n      \
                   schema:\n        \
                     openAPIV3Schema:\n          \
                       type: object\n          \
                       properties:\n            \
                         size:\n              \
                           type: integer\n",
        )
        .unwrap();
        manifest
    }

    #[test]
    fn test_generate_writes_package() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = write_widget_manifest(temp_dir.path());

        let output = temp_dir.path().join("out");
        let config = GeneratorConfig {
            output: Some(output.clone()),
            languages: vec!["python".to_string()],
            ..Default::default()
        };
        generate_command(&[manifest], None, &config, false).unwrap();

        let schema: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(output.join(SCHEMA_FILE)).unwrap()).unwrap();
        assert!(schema["resources"]["kubernetes:example.com/v1:Widget"].is_object());
        assert_eq!(
            schema["language"]["python"]["moduleNameOverrides"]["example.com/v1"],
            "example/v1"
        );
        assert!(output.join(README_FILE).exists());
    }

    #[test]
    fn test_generate_without_object_meta() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = write_widget_manifest(temp_dir.path());

        let output = temp_dir.path().join("out");
        let config = resolve_config(
            None,
            Overrides {
                output: Some(output.clone()),
                no_object_meta: true,
                ..Default::default()
            },
        )
        .unwrap();
        generate_command(&[manifest], None, &config, false).unwrap();

        let schema: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(output.join(SCHEMA_FILE)).unwrap()).unwrap();
        assert!(schema["types"]["kubernetes:meta/v1:ObjectMeta"].is_null());
        assert!(schema["resources"]["kubernetes:example.com/v1:Widget"]["properties"]["metadata"]
            .is_object());
    }
}
