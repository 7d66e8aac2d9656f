//! # Error Types
//!
//! Errors raised while preparing a validation run. Engine and rendering
//! errors live next to the code that produces them (`psv-schema`,
//! `psv-report`).

use thiserror::Error;

/// The merged issue styles cannot be used to build a report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    /// An icon is empty; an empty marker would match every key.
    #[error("icon for {field} must not be empty")]
    EmptyIcon {
        /// Name of the style field.
        field: &'static str,
    },

    /// Error and missing icons are identical, so markers would be ambiguous.
    #[error("error and missing icons must differ, both are '{icon}'")]
    DuplicateIcon {
        /// The shared icon.
        icon: String,
    },

    /// A colour is not a `#rgb` or `#rrggbb` hex value.
    #[error("{field} must be a hex colour like #c10000, got '{value}'")]
    InvalidColor {
        /// Name of the style field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },
}
