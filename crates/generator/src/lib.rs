//! Package assembly for crd2schema
//!
//! This crate turns a populated `TypeRegistry` and the list of resource
//! tokens into a validated `PackageDocument`, the normalized input of
//! per-language SDK generators, and writes it out.

mod builder;
mod document;
mod templates;
mod validator;
mod writer;

pub use builder::{build_package, PackageBuilder};
pub use document::{PackageDocument, ResourceSpec};
pub use validator::{PackageValidator, ReferenceValidator};
pub use writer::{write_package, PackageWriter, README_FILE, SCHEMA_FILE};
