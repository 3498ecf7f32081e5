//! Integration tests for package assembly and output

use crd2schema_common::{GeneratorError, TypeDescriptor, OBJECT_META_TOKEN};
use crd2schema_generator::{
    build_package, PackageBuilder, PackageDocument, PackageWriter, README_FILE, SCHEMA_FILE,
};
use crd2schema_parser::{assemble_types, AssembledTypes, CrdLoader};
use std::fs;
use tempfile::TempDir;

const CRONTAB_V1: &str = "kubernetes:stable.example.com/v1:CronTab";
const CRONTAB_V2: &str = "kubernetes:stable.example.com/v2:CronTab";

const MANIFEST: &str = r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: crontabs.stable.example.com
spec:
  group: stable.example.com
  names:
    kind: CronTab
    plural: crontabs
  versions:
    - name: v1
      schema:
        openAPIV3Schema:
          type: object
          description: A scheduled job
          properties:
            spec:
              type: object
              properties:
                cronSpec:
                  type: string
                replicas:
                  type: integer
                selector:
                  type: object
                  properties:
                    matchLabels:
                      type: object
                      additionalProperties:
                        type: string
              required:
                - cronSpec
    - name: v2
      schema:
        openAPIV3Schema:
          type: object
          x-kubernetes-preserve-unknown-fields: true
---
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: blobs.example.com
spec:
  group: example.com
  names:
    kind: Blob
    plural: blobs
  versions:
    - name: v1
      schema:
        openAPIV3Schema:
          type: object
"#;

fn assembled() -> AssembledTypes {
    let resources = CrdLoader::from_yaml(MANIFEST).unwrap();
    assemble_types(&resources)
}

fn package() -> PackageDocument {
    let mut assembled = assembled();
    build_package(&mut assembled.registry, &assembled.resource_tokens, true).unwrap()
}

#[test]
fn test_every_reference_resolves() {
    let package = package();

    for definition in package.types.values() {
        for reference in definition.references() {
            assert!(
                package.types.contains_key(reference),
                "dangling reference {}",
                reference
            );
        }
    }
    assert!(package.types.contains_key(OBJECT_META_TOKEN));
}

#[test]
fn test_resources_and_packages() {
    let package = package();

    let tokens: Vec<&str> = package.resource_tokens().collect();
    assert_eq!(tokens, vec![CRONTAB_V1, CRONTAB_V2]);
    assert!(!package.types.contains_key("kubernetes:example.com/v1:Blob"));
    assert_eq!(package.allowed_package_names, vec!["crds", "kubernetes"]);

    for resource in package.resources.values() {
        assert_eq!(resource.input_properties, resource.object.properties);
    }
}

#[test]
fn test_nested_types_are_named_after_their_path() {
    let package = package();

    let spec = &package.types["kubernetes:stable.example.com/v1:CronTabSpec"];
    assert!(spec.required.contains("cronSpec"));
    assert_eq!(
        spec.properties["selector"].type_descriptor,
        TypeDescriptor::ObjectRef("kubernetes:stable.example.com/v1:CronTabSpecSelector".to_string())
    );
    assert!(package
        .types
        .contains_key("kubernetes:stable.example.com/v1:CronTabSpecSelector"));
}

#[test]
fn test_document_wire_shape() {
    let value = serde_json::to_value(package()).unwrap();

    assert_eq!(value["name"], "crds");
    assert!(value.get("version").is_none());

    let resource = &value["resources"][CRONTAB_V1];
    assert_eq!(resource["type"], "object");
    assert_eq!(resource["description"], "A scheduled job");
    assert_eq!(resource["inputProperties"]["apiVersion"]["const"], "stable.example.com/v1");
    assert_eq!(resource["properties"]["kind"]["const"], "CronTab");
    assert_eq!(
        resource["properties"]["metadata"]["$ref"],
        format!("#/types/{}", OBJECT_META_TOKEN)
    );

    let preserved = &value["types"][CRONTAB_V2]["properties"];
    assert_eq!(preserved.as_object().unwrap().len(), 3);
}

#[test]
fn test_registry_is_left_untouched() {
    let mut assembled = assembled();
    let before = assembled.registry.clone();

    build_package(&mut assembled.registry, &assembled.resource_tokens, true).unwrap();

    assert_eq!(assembled.registry, before);
    assert!(!assembled.registry.contains(OBJECT_META_TOKEN));
}

#[test]
fn test_build_without_object_meta_placeholder() {
    let mut assembled = assembled();

    let package =
        build_package(&mut assembled.registry, &assembled.resource_tokens, false).unwrap();

    assert!(!package.types.contains_key(OBJECT_META_TOKEN));
    assert_eq!(
        package.resources[CRONTAB_V1].object.properties["metadata"].type_descriptor,
        TypeDescriptor::ObjectRef(OBJECT_META_TOKEN.to_string())
    );
}

#[test]
fn test_dangling_reference_is_reported() {
    let mut assembled = assembled();
    assembled
        .registry
        .remove("kubernetes:stable.example.com/v1:CronTabSpecSelector");

    let err = build_package(&mut assembled.registry, &assembled.resource_tokens, true)
        .unwrap_err();

    assert!(matches!(err, GeneratorError::Build(_)));
    let message = err.to_string();
    assert!(message.starts_with("could not assemble package: "));
    assert!(message.contains("CronTabSpecSelector"));
}

#[test]
fn test_language_settings_are_kept() {
    let mut assembled = assembled();
    let modules = assembled.module_to_package();

    let package = PackageBuilder::new()
        .with_name("crontabs")
        .with_version(Some("0.2.0".to_string()))
        .with_language("python", serde_json::json!({ "moduleNameOverrides": modules }))
        .build(&mut assembled.registry, &assembled.resource_tokens, true)
        .unwrap();

    let value = serde_json::to_value(&package).unwrap();
    assert_eq!(value["version"], "0.2.0");
    assert_eq!(
        value["language"]["python"]["moduleNameOverrides"]["stable.example.com/v1"],
        "stable/v1"
    );
}

#[test]
fn test_write_package_files() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("crontabs");
    let package = package();

    PackageWriter::new(package.clone())
        .unwrap()
        .generate_to_directory(&output)
        .unwrap();

    let schema = fs::read_to_string(output.join(SCHEMA_FILE)).unwrap();
    let reloaded: PackageDocument = serde_json::from_str(&schema).unwrap();
    assert_eq!(reloaded, package);

    let readme = fs::read_to_string(output.join(README_FILE)).unwrap();
    assert!(readme.starts_with("# crds"));
    assert!(readme.contains(&format!("### `{}`", CRONTAB_V1)));
    assert!(readme.contains("A scheduled job"));
    assert!(readme.contains("| `metadata` | `kubernetes:meta/v1:ObjectMeta` | no |"));
    assert!(readme.contains("`kubernetes:stable.example.com/v1:CronTabSpec` (3 properties)"));
}

#[test]
fn test_readme_without_resources() {
    let mut registry = Default::default();
    let package = build_package(&mut registry, &[], false).unwrap();

    let readme = PackageWriter::new(package).unwrap().render_readme().unwrap();
    assert!(readme.contains("No resources."));
}
