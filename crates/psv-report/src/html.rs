//! Standalone HTML report page.
//!
//! The page is self-contained apart from the highlight.js `vs` theme, which
//! is linked from the CDN at a pinned version so the fragment's `hljs-*`
//! classes are coloured.

use psv_core::SchemaIssue;

use crate::error::RenderError;
use crate::highlight::html_escape;

/// highlight.js release whose stylesheet the page links.
pub const HLJS_VERSION: &str = "11.11.1";

const INLINE_STYLES: &str = r#"<style>
        body { font-family: monospace; margin: 20px; }
        h3 { font-size: 1.5em; margin-bottom: 10px; }
        .card { margin-bottom: 10px; list-style: none; padding: 10px; border: 1px solid #ddd; border-radius: 8px; background-color: rgb(238, 251, 255); text-align: left; box-shadow: 0 4px 8px 0 rgba(0, 0, 0, 0.3); transition: 0.3s; }
        .total-errors { font-size: 1.5em; font-weight: bold; color: #c10000; margin-left: 20px; padding-left: 15px; }
        .total-errors:hover { background-color: rgb(220, 240, 250); }
        .hljs { margin-bottom: 10px; padding: 10px; margin-left: 20px; border: 1px solid #ddd; border-radius: 8px; background-color: rgb(238, 251, 255); box-shadow: 0 4px 8px 0 rgba(0, 0, 0, 0.3); transition: 0.3s; }
        .hljs:hover { background-color: rgb(220, 240, 250); }
        ul { padding-left: 20px; }
        li { font-size: 1.1em; text-wrap: wrap; overflow-wrap: break-word; margin-bottom: 10px; list-style: none; padding: 10px; border: 1px solid #ddd; border-radius: 8px; background-color: rgb(238, 251, 255); text-align: left; box-shadow: 0 4px 8px 0 rgba(0, 0, 0, 0.3); transition: 0.3s; }
        li:hover { background-color: rgb(220, 240, 250); }
    </style>"#;

/// Link to the pinned highlight.js theme.
pub fn stylesheet_href() -> String {
    format!("https://cdnjs.cloudflare.com/ajax/libs/highlight.js/{HLJS_VERSION}/styles/vs.min.css")
}

/// Build the full failure page around a rendered mismatch fragment.
///
/// Each issue is dumped as JSON into its own `<li class="card">`.
pub fn render_document(fragment: &str, issues: &[SchemaIssue]) -> Result<String, RenderError> {
    let items = issues
        .iter()
        .map(|issue| {
            serde_json::to_string(issue)
                .map(|dump| format!(r#"<li class="card">{}</li>"#, html_escape(&dump)))
        })
        .collect::<Result<Vec<_>, _>>()?
        .join("\n            ");

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
    <head>
        <meta charset="utf-8">
        <meta name="viewport" content="width=device-width, initial-scale=1.0">
        <link rel="stylesheet" href="{href}"/>
        {INLINE_STYLES}
    </head>
    <body>
        <h3>Number of schema errors</h3>
        <div class="card total-errors">{count}</div>
        <h3>Schema mismatches in data</h3>
        {fragment}
        <h3>Schema errors</h3>
        <ul>
            {items}
        </ul>
    </body>
</html>
"#,
        href = stylesheet_href(),
        count = issues.len(),
    ))
}
