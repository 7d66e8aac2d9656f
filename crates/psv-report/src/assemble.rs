//! # Report Assembler
//!
//! Decides where the diagnostics of one check go: the log, the host's step
//! list, an HTML attachment, and the live page.
//!
//! Console diagnostics are emitted before any HTML is built. A failure while
//! building or delivering the HTML is logged as a warning and never hides
//! the verdict.

use serde_json::Value;
use tracing::Instrument;

use psv_core::{IssueStyles, SchemaIssue};

use crate::error::RenderError;
use crate::host::{Attachment, TestHost};
use crate::html::render_document;
use crate::page::PageScript;
use crate::render::MismatchRenderer;
use crate::validate::Fixtures;

pub const PASSED_TITLE: &str = "✔️   PASSED - THE RESPONSE BODY IS VALID AGAINST THE SCHEMA!";
pub const FAILED_TITLE: &str = "❌   FAILED - THE RESPONSE BODY IS NOT VALID AGAINST THE SCHEMA!";
pub const DISABLED_WARNING: &str = "⚠️ API SCHEMA VALIDATION DISABLED ⚠️";
pub const DISABLED_DETAIL: &str =
    "The environment variable \"DISABLE_SCHEMA_VALIDATION\" has been set to true.";

pub(crate) fn report_disabled() {
    tracing::warn!("{DISABLED_WARNING} - {DISABLED_DETAIL}");
}

pub(crate) async fn report_passed(host: &dyn TestHost) {
    let span = tracing::info_span!("schema_check", step = PASSED_TITLE);
    async {
        host.step(PASSED_TITLE).await;
        tracing::info!("{PASSED_TITLE}");
    }
    .instrument(span)
    .await
}

pub(crate) async fn report_failed(
    fixtures: &Fixtures<'_>,
    issues: &[SchemaIssue],
    data_mismatches: &Value,
    styles: &IssueStyles,
) {
    let span = tracing::error_span!("schema_check", step = FAILED_TITLE);
    async {
        fixtures.host.step(FAILED_TITLE).await;
        tracing::error!("{FAILED_TITLE}");
        tracing::error!(errors = issues.len(), "Number of schema errors: {}", issues.len());
        tracing::error!("Schema mismatches in data:\n{data_mismatches:#}");
        for issue in issues {
            tracing::error!(
                instance_path = %issue.instance_path,
                schema_path = %issue.schema_path,
                keyword = %issue.keyword,
                "{}",
                issue.message
            );
        }

        if let Err(e) = deliver_html(fixtures, issues, data_mismatches, styles).await {
            tracing::warn!(error = %e, "schema report HTML was not delivered");
        }
    }
    .instrument(span)
    .await
}

async fn deliver_html(
    fixtures: &Fixtures<'_>,
    issues: &[SchemaIssue],
    data_mismatches: &Value,
    styles: &IssueStyles,
) -> Result<(), RenderError> {
    let page = fixtures.page.filter(|_| fixtures.config.show_in_ui);
    if !fixtures.config.attach_report && page.is_none() {
        return Ok(());
    }

    let fragment = MismatchRenderer::new(styles)?.render(data_mismatches)?;
    let document_html = render_document(&fragment, issues)?;

    if fixtures.config.attach_report {
        fixtures
            .host
            .attach(Attachment::html(FAILED_TITLE, document_html.clone()))
            .await?;
    }
    if let Some(page) = page {
        page.evaluate(&PageScript::new(document_html, fragment, issues.len()))
            .await?;
    }
    Ok(())
}
