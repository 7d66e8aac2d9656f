//! # Live Page Injection
//!
//! A failing check can show its report inside the browser page the test is
//! driving. The injection is described by a [`PageScript`] and handed to a
//! [`LivePage`] in a single call.
//!
//! ## Placement
//!
//! - Empty page (no markup, or the bare `<head></head><body></body>` shell)
//!   → the whole document is replaced by the report page.
//! - Page already showing API request/response cards → the last response
//!   body container receives the mismatch fragment, and the last response
//!   title gets an error-count label.
//!
//! Drivers that can evaluate JavaScript use [`PageScript::to_javascript`].
//! Drivers that edit a DOM natively use [`PageScript::plan`].

use async_trait::async_trait;
use serde::Serialize;

use crate::error::PageError;

/// Last response-body container on a page showing API cards.
pub const RESPONSE_BODY_SELECTOR: &str = r#"[id^="res-body-"]:last-of-type"#;

/// Last title label of the last API response card.
pub const RESPONSE_TITLE_SELECTOR: &str =
    ".pw-api-response:last-of-type label.title-property:last-of-type";

/// Inner HTML of a page nothing has been rendered into.
pub const EMPTY_DOCUMENT_MARKUP: &str = "<head></head><body></body>";

/// A page under test that can receive a report.
#[async_trait]
pub trait LivePage: Send + Sync {
    /// Apply `script` to the page.
    async fn evaluate(&self, script: &PageScript) -> Result<(), PageError>;
}

/// Everything a page needs to show one failure report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageScript {
    /// Full report page, used when the page is empty.
    pub document_html: String,
    /// Highlighted mismatch fragment, used on pages with API cards.
    pub fragment: String,
    pub error_count: usize,
}

/// Where a [`PageScript`] lands on a given page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    ReplaceDocument,
    AnnotateLastResponse,
}

impl PageScript {
    pub fn new(document_html: String, fragment: String, error_count: usize) -> Self {
        Self {
            document_html,
            fragment,
            error_count,
        }
    }

    /// Label appended to the last response title.
    pub fn error_label(&self) -> String {
        format!(
            r#"- <label style="color: #c10000;">Number schema errors: {}</label>"#,
            self.error_count
        )
    }

    /// Decide placement from the current `documentElement.innerHTML`.
    pub fn plan(current_markup: &str) -> Placement {
        if current_markup.trim().is_empty() || current_markup.contains(EMPTY_DOCUMENT_MARKUP) {
            Placement::ReplaceDocument
        } else {
            Placement::AnnotateLastResponse
        }
    }

    /// Self-contained JavaScript performing the injection.
    ///
    /// Every string is embedded as a JSON literal.
    pub fn to_javascript(&self) -> Result<String, PageError> {
        let document_html = serde_json::to_string(&self.document_html)?;
        let fragment = serde_json::to_string(&self.fragment)?;
        let label = serde_json::to_string(&self.error_label())?;
        let empty = serde_json::to_string(EMPTY_DOCUMENT_MARKUP)?;
        let body_selector = serde_json::to_string(RESPONSE_BODY_SELECTOR)?;
        let title_selector = serde_json::to_string(RESPONSE_TITLE_SELECTOR)?;

        Ok(format!(
            r#"(() => {{
    const root = document.documentElement;
    if (!root) return;
    const current = root.innerHTML;
    if (current.trim() === '' || current.includes({empty})) {{
        root.innerHTML = {document_html};
        return;
    }}
    const body = document.querySelector({body_selector});
    if (body) body.innerHTML = {fragment};
    const title = document.querySelector({title_selector});
    if (title) title.innerHTML = title.innerHTML + {label};
}})();"#
        ))
    }
}
