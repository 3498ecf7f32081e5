//! CustomResourceDefinition manifest loading
//!
//! Turns CRD manifests into `CustomResource` descriptors: the API group, the
//! kind, and the OpenAPI v3 schema of every declared version.
//!
//! ## Supported layouts
//! - **apiextensions.k8s.io/v1**: `spec.versions[].schema.openAPIV3Schema`
//! - **apiextensions.k8s.io/v1beta1**: `spec.validation.openAPIV3Schema`
//!   shared by `spec.versions[]` (or the single `spec.version`)
//!
//! ## Usage
//! ```rust,ignore
//! use crd2schema_parser::crd::CrdLoader;
//!
//! let resources = CrdLoader::from_file("crontab-crd.yaml")?;
//! ```

mod loader;

pub use loader::CrdLoader;
