//! CRD schema translation
//!
//! This crate turns the OpenAPI v3 validation schemas attached to
//! CustomResourceDefinitions into a named type model (`TypeRegistry`).
//!
//! ## Translation Strategy
//!
//! Schemas are untyped JSON trees. They are walked recursively and every
//! object schema with declared properties becomes a named object type:
//! - resource roots are named by their resource token
//!   (`kubernetes:<group>/<version>:<Kind>`)
//! - nested objects append the title-cased property name
//!   (`...:CronTabSpec`)
//! - `oneOf` alternatives append `OneOf<index>`
//! - arrays, `allOf` and `anyOf` keep the enclosing name
//!
//! Shapes that cannot be represented resolve to `TypeDescriptor::Any`
//! instead of failing.

mod assembler;
mod combinator;
pub mod crd;
mod naming;
mod resolver;
mod schema_node;

pub use assembler::{assemble_types, AssembledTypes, ResourceAssembler};
pub use combinator::combine_schemas;
pub use crd::CrdLoader;
pub use naming::{one_of_type_name, property_type_name, title_case};
pub use resolver::{register_type, resolve_type};
pub use schema_node::{SchemaNodeExt, SchemaType, INT_OR_STRING, PRESERVE_UNKNOWN_FIELDS};
