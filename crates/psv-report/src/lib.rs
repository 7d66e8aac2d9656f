//! # psv-report — Schema Checks with Annotated Failure Reports
//!
//! Entry points for tests that check an API response body against a schema,
//! and everything that happens when the check fails.
//!
//! ## Usage
//!
//! ```no_run
//! # async fn demo(body: serde_json::Value, openapi: serde_json::Value) -> Result<(), psv_report::CheckError> {
//! use psv_core::RunConfig;
//! use psv_report::{validate_schema, ArtifactDirHost, Fixtures};
//! use psv_schema::ApiPath;
//!
//! let config = RunConfig::from_env();
//! let host = ArtifactDirHost::new("target/psv-reports");
//! let fixtures = Fixtures::new(&host, &config);
//! let path = ApiPath::endpoint("/pet/findByStatus");
//! validate_schema(&fixtures, &body, &openapi, Some(&path), None).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## On Failure
//!
//! 1. Flagged fields are marked in a copy of the body
//!    ([`psv_schema::mark_mismatches`]).
//! 2. The error count, marked data and raw errors are logged inside a
//!    failure step.
//! 3. With `LOG_API_REPORT=true` an HTML page is attached to the host.
//! 4. With a live page (and `LOG_API_UI` not `false`) the report is injected.
//! 5. The host's assertion fails the test.
//!
//! ## Crate Policy
//!
//! - Runtime-agnostic `async fn`s; `tokio` is used for file I/O only.
//! - HTML delivery problems are warnings, never errors.

mod assemble;
pub mod error;
pub mod highlight;
pub mod host;
pub mod html;
pub mod page;
pub mod render;
pub mod telemetry;
pub mod validate;

pub use assemble::{DISABLED_DETAIL, DISABLED_WARNING, FAILED_TITLE, PASSED_TITLE};
pub use error::{CheckError, HostError, PageError, RenderError};
pub use host::{ArtifactDirHost, Attachment, TestHost};
pub use page::{LivePage, PageScript, Placement};
pub use render::MismatchRenderer;
pub use validate::{validate_schema, validate_schema_json, validate_schema_typedef, Fixtures};
