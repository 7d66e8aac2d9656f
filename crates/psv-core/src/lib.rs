//! # psv-core — Shared Types for Response-Body Schema Checks
//!
//! Defines the vocabulary every other `psv-*` crate speaks: the issues an
//! engine reports, the outcome handed back to a test, the marker styles used
//! to flag fields, and the run configuration snapshot.
//!
//! ## Key Design Principles
//!
//! 1. **Engines are opaque.** A [`SchemaIssue`] keeps the engine's paths and
//!    message as text. The only structure the report relies on is the list
//!    of [`FieldMark`]s attached to each issue.
//!
//! 2. **No ambient state.** Environment toggles are read once into a
//!    [`RunConfig`] and passed by reference. Styles are merged by a pure
//!    function ([`IssueStyles::resolve`]).
//!
//! 3. **Outcome mirrors the test contract.** [`ValidationOutcome::errors`] is
//!    `None` on success and a non-empty list otherwise.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `psv-*` crates (leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod error;
pub mod issue;
pub mod outcome;
pub mod styles;

pub use config::RunConfig;
pub use error::StyleError;
pub use issue::{FieldMark, InstancePath, IssueKind, SchemaIssue};
pub use outcome::ValidationOutcome;
pub use styles::{IssueStyles, IssueStylesOverride};
