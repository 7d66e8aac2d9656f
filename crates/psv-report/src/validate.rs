//! # Validation Entry Points
//!
//! One check per call:
//!
//! ```text
//! disabled? ── yes ──> warn, pass-shaped outcome
//!     │ no
//! resolve styles ──> run engine ──> no issues ──> passed step, assert
//!                                   issues ─────> mark, report, assert
//! ```
//!
//! Engine failures are returned as [`CheckError::Schema`] without any
//! reporting. A mismatch is returned as an outcome *after* the host's
//! assertion has run, so with the default [`TestHost::assert_valid`] the
//! calling test fails before it sees the value.

use serde_json::Value;

use psv_core::{IssueStyles, IssueStylesOverride, RunConfig, SchemaIssue, ValidationOutcome};
use psv_schema::{mark_mismatches, ApiPath, JsonSchemaEngine, SchemaError, TypedefSchema};

use crate::assemble;
use crate::error::CheckError;
use crate::host::TestHost;
use crate::page::LivePage;

/// Harness handles for one check.
#[derive(Clone, Copy)]
pub struct Fixtures<'a> {
    pub host: &'a dyn TestHost,
    /// Page to show the report in; `None` skips UI injection.
    pub page: Option<&'a dyn LivePage>,
    pub config: &'a RunConfig,
}

impl<'a> Fixtures<'a> {
    pub fn new(host: &'a dyn TestHost, config: &'a RunConfig) -> Self {
        Self {
            host,
            page: None,
            config,
        }
    }

    pub fn with_page(mut self, page: &'a dyn LivePage) -> Self {
        self.page = Some(page);
        self
    }
}

enum Engine<'s> {
    JsonSchema {
        document: &'s Value,
        path: Option<&'s ApiPath>,
    },
    Typedef(&'s TypedefSchema),
}

impl Engine<'_> {
    fn run(&self, data: &Value) -> Result<Vec<SchemaIssue>, SchemaError> {
        match self {
            Engine::JsonSchema { document, path } => {
                Ok(JsonSchemaEngine::compile(document, *path)?.validate(data))
            }
            Engine::Typedef(schema) => schema.validate(data),
        }
    }
}

/// Validate `data` against a JSON Schema or an OpenAPI / Swagger document.
///
/// With `path` naming an endpoint, the response schema is looked up inside
/// `document`; otherwise `document` is the schema.
///
/// # Errors
///
/// [`CheckError::Style`] for an unusable style override and
/// [`CheckError::Schema`] when the engine cannot judge the body.
pub async fn validate_schema_json(
    fixtures: &Fixtures<'_>,
    data: &Value,
    document: &Value,
    path: Option<&ApiPath>,
    styles: Option<&IssueStylesOverride>,
) -> Result<ValidationOutcome, CheckError> {
    check(fixtures, data, Engine::JsonSchema { document, path }, styles).await
}

/// Same as [`validate_schema_json`].
pub async fn validate_schema(
    fixtures: &Fixtures<'_>,
    data: &Value,
    document: &Value,
    path: Option<&ApiPath>,
    styles: Option<&IssueStylesOverride>,
) -> Result<ValidationOutcome, CheckError> {
    validate_schema_json(fixtures, data, document, path, styles).await
}

/// Validate `data` against a compiled JSON Type Definition schema.
///
/// # Errors
///
/// As for [`validate_schema_json`].
pub async fn validate_schema_typedef(
    fixtures: &Fixtures<'_>,
    data: &Value,
    schema: &TypedefSchema,
    styles: Option<&IssueStylesOverride>,
) -> Result<ValidationOutcome, CheckError> {
    check(fixtures, data, Engine::Typedef(schema), styles).await
}

async fn check(
    fixtures: &Fixtures<'_>,
    data: &Value,
    engine: Engine<'_>,
    styles: Option<&IssueStylesOverride>,
) -> Result<ValidationOutcome, CheckError> {
    if fixtures.config.disable_validation {
        assemble::report_disabled();
        return Ok(ValidationOutcome::passed(data.clone()));
    }

    let styles = IssueStyles::resolve(styles)?;
    let issues = engine.run(data)?;

    if issues.is_empty() {
        assemble::report_passed(fixtures.host).await;
        fixtures.host.assert_valid(None);
        return Ok(ValidationOutcome::passed(data.clone()));
    }

    let data_mismatches = mark_mismatches(data, &issues, &styles);
    assemble::report_failed(fixtures, &issues, &data_mismatches, &styles).await;
    fixtures.host.assert_valid(Some(&issues));
    Ok(ValidationOutcome::failed(issues, data_mismatches))
}
