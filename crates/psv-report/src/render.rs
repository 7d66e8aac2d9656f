//! # HTML Renderer
//!
//! Turns marked response data into a highlighted `<pre class="hljs">`
//! fragment in which flagged keys are emphasised in their marker colour.
//!
//! ## Pipeline
//!
//! 1. Serialize with a 4-space indent, preserving member order.
//! 2. Highlight with [`highlight_json`](crate::highlight::highlight_json).
//! 3. One regex pass over the key spans: a key whose text starts (after
//!    optional whitespace) with a marker icon gets an inline `style`.
//! 4. Wrap in `<pre class="hljs">`.
//!
//! The pattern is anchored on the opening `hljs-attr` span, so icons that
//! appear inside string values are left alone. Alternatives are ordered
//! longest icon first.

use regex::{Captures, Regex};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use psv_core::{IssueKind, IssueStyles};

use crate::error::RenderError;
use crate::highlight::{highlight_json, html_escape, CLASS_ATTR};

const INDENT: &[u8] = b"    ";

/// Renders marked data for one set of marker styles.
#[derive(Debug, Clone)]
pub struct MismatchRenderer {
    styles: IssueStyles,
    escaped_error_icon: String,
    marker: Regex,
}

impl MismatchRenderer {
    /// Build the key-marker pattern for `styles`.
    pub fn new(styles: &IssueStyles) -> Result<Self, RenderError> {
        let escaped_error_icon = html_escape(styles.icon(IssueKind::Error));
        let escaped_missing_icon = html_escape(styles.icon(IssueKind::Missing));

        let mut icons = [escaped_error_icon.as_str(), escaped_missing_icon.as_str()];
        icons.sort_by_key(|icon| std::cmp::Reverse(icon.len()));
        let alternatives = icons
            .iter()
            .map(|icon| regex::escape(icon))
            .collect::<Vec<_>>()
            .join("|");

        let pattern = format!(
            r#"{open}(>&quot;\s*)({alternatives})"#,
            open = regex::escape(&key_open()),
        );
        let marker = Regex::new(&pattern)?;

        Ok(Self {
            styles: styles.clone(),
            escaped_error_icon,
            marker,
        })
    }

    /// Render `marked` as a highlighted fragment.
    pub fn render(&self, marked: &Value) -> Result<String, RenderError> {
        let text = to_indented_json(marked)?;
        let highlighted = highlight_json(&text);
        let styled = self.marker.replace_all(&highlighted, |caps: &Captures<'_>| {
            let icon = &caps[2];
            let kind = if icon == self.escaped_error_icon {
                IssueKind::Error
            } else {
                IssueKind::Missing
            };
            format!(
                r#"{open} style="{style}"{rest}{icon}"#,
                open = key_open(),
                style = self.key_style(kind),
                rest = &caps[1],
            )
        });
        Ok(format!(r#"<pre class="hljs">{styled}</pre>"#))
    }

    fn key_style(&self, kind: IssueKind) -> String {
        format!(
            "font-weight: bold; font-size: 1.3em; color: {};",
            html_escape(self.styles.color(kind))
        )
    }
}

fn key_open() -> String {
    format!(r#"<span class="{CLASS_ATTR}""#)
}

fn to_indented_json(value: &Value) -> Result<String, RenderError> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}
