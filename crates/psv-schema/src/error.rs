//! Errors raised by the schema engines before any data is judged.

use thiserror::Error;

/// The engine could not be prepared or run.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The schema is not acceptable to the engine.
    #[error("invalid {engine} schema: {reason}")]
    InvalidSchema {
        /// Engine name (`json-schema`, `jtd`).
        engine: &'static str,
        /// Reason reported by the engine.
        reason: String,
    },

    /// The API path does not name a response schema in the document.
    #[error("no response schema for {method} {endpoint} ({status}): {reason}")]
    PathNotFound {
        /// Endpoint as given by the caller.
        endpoint: String,
        /// HTTP method, upper-cased.
        method: String,
        /// Expected response status.
        status: u16,
        /// Which lookup step failed.
        reason: String,
    },

    /// The engine stopped before finishing (e.g. depth limit).
    #[error("{engine} validation aborted: {reason}")]
    Aborted {
        /// Engine name.
        engine: &'static str,
        /// Reason reported by the engine.
        reason: String,
    },

    /// A schema document file could not be read or parsed.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoad {
        /// Path to the document.
        path: String,
        /// Reason the document could not be loaded.
        reason: String,
    },
}
