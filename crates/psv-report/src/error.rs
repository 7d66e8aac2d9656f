//! Error types for report delivery and the validation entry points.
//!
//! A schema mismatch is never an error here: it is reported and then
//! signalled through the host's assertion. Errors are reserved for engine
//! failures, bad style overrides, and HTML delivery problems.

use thiserror::Error;

use psv_core::StyleError;
use psv_schema::SchemaError;

/// Failure of a validation call before any verdict was reached.
#[derive(Error, Debug)]
pub enum CheckError {
    /// The engine could not judge the body (bad schema, unknown API path,
    /// recursion limit).
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The style override does not describe usable markers.
    #[error("invalid issue styles: {0}")]
    Style(#[from] StyleError),
}

/// Failure while building or delivering the HTML report.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("cannot serialize report data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("cannot build marker pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("serialized report data is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("attachment failed: {0}")]
    Attach(#[from] HostError),

    #[error("page injection failed: {0}")]
    Page(#[from] PageError),
}

/// Failure reported by a [`TestHost`](crate::host::TestHost).
#[derive(Error, Debug)]
pub enum HostError {
    #[error("cannot write attachment '{name}' to {path}: {source}")]
    Write {
        name: String,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("attachment '{name}' rejected: {reason}")]
    Rejected { name: String, reason: String },
}

/// Failure reported by a [`LivePage`](crate::page::LivePage).
#[derive(Error, Debug)]
pub enum PageError {
    #[error("cannot encode page script: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("page evaluation failed: {0}")]
    Evaluation(String),

    #[error("page is closed")]
    Closed,
}
