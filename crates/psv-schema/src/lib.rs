//! # psv-schema — Schema Engines and Mismatch Marking
//!
//! Adapts two validation engines to the common [`SchemaIssue`] shape and
//! marks the fields they flag inside the response body.
//!
//! ## Engines
//!
//! - [`json_schema`] — JSON Schema via the `jsonschema` crate. Accepts a
//!   plain schema or an OpenAPI 3 / Swagger 2 document plus an [`ApiPath`]
//!   naming the response to validate against.
//! - [`typedef`] — JSON Type Definition (RFC 8927) schema objects via the
//!   `jtd` crate. Strict by default: undeclared properties are errors.
//!
//! Both produce [`SchemaIssue`]s in engine order, each carrying the
//! [`FieldMark`](psv_core::FieldMark)s it implies.
//!
//! ## Marking (`mismatch`)
//!
//! [`mark_mismatches`] rebuilds the body with every flagged key renamed to
//! `<icon><key>` and every missing required field synthesised as
//! `<missingIcon><field>: null`.
//!
//! ## Crate Policy
//!
//! - Depends only on `psv-core` internally.
//! - Engine failures (bad schema, unknown endpoint) are [`SchemaError`]s and
//!   are never turned into issues.

pub mod document;
pub mod error;
pub mod json_schema;
pub mod mismatch;
pub mod typedef;

pub use document::{load_document, resolve_schema, ApiPath};
pub use error::SchemaError;
pub use json_schema::JsonSchemaEngine;
pub use mismatch::mark_mismatches;
pub use psv_core::SchemaIssue;
pub use typedef::TypedefSchema;
