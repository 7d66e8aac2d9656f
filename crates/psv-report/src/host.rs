//! # Test Host
//!
//! The harness running the test owns steps, attachments, and the final
//! assertion. [`TestHost`] is the seam; [`ArtifactDirHost`] is a ready
//! implementation for plain `cargo test` runs.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use psv_core::SchemaIssue;

use crate::error::HostError;

pub const HTML_CONTENT_TYPE: &str = "text/html";

/// A named artifact attached to the test report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub body: String,
    pub content_type: String,
}

impl Attachment {
    pub fn html(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
            content_type: HTML_CONTENT_TYPE.to_string(),
        }
    }
}

/// Reporting primitives of the harness running the test.
#[async_trait]
pub trait TestHost: Send + Sync {
    /// Open a named step in the test report.
    async fn step(&self, title: &str);

    async fn attach(&self, attachment: Attachment) -> Result<(), HostError>;

    /// Fail the test unless `errors` is empty.
    ///
    /// The default panics through `assert!`, which is how `cargo test`
    /// records a failure.
    fn assert_valid(&self, errors: Option<&[SchemaIssue]>) {
        let errors = errors.unwrap_or_default();
        assert!(
            errors.is_empty(),
            "response body is not valid against the schema ({} errors):\n{}",
            errors.len(),
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
}

/// Host that writes attachments as files under one directory.
///
/// Steps are recorded as `tracing` events. Files are numbered in attach
/// order: `001-<name>.html`, `002-<name>.html`, ...
#[derive(Debug)]
pub struct ArtifactDirHost {
    dir: PathBuf,
    attached: AtomicUsize,
}

impl ArtifactDirHost {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            attached: AtomicUsize::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name(&self, attachment: &Attachment) -> String {
        let n = self.attached.fetch_add(1, Ordering::SeqCst) + 1;
        format!(
            "{n:03}-{}.{}",
            slug(&attachment.name),
            extension(&attachment.content_type)
        )
    }
}

#[async_trait]
impl TestHost for ArtifactDirHost {
    async fn step(&self, title: &str) {
        tracing::info!(step = title, "test step");
    }

    async fn attach(&self, attachment: Attachment) -> Result<(), HostError> {
        let path = self.dir.join(self.file_name(&attachment));
        let write_error = |source| HostError::Write {
            name: attachment.name.clone(),
            path: path.display().to_string(),
            source,
        };
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(write_error)?;
        tokio::fs::write(&path, attachment.body.as_bytes())
            .await
            .map_err(write_error)?;
        tracing::info!(name = %attachment.name, path = %path.display(), "attached report");
        Ok(())
    }
}

/// File-name-safe form of an attachment name.
fn slug(name: &str) -> String {
    let mut out = String::new();
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    let trimmed = out.trim_end_matches('-');
    if trimmed.is_empty() {
        "attachment".to_string()
    } else {
        trimmed.to_string()
    }
}

fn extension(content_type: &str) -> &'static str {
    match content_type {
        HTML_CONTENT_TYPE => "html",
        "application/json" => "json",
        _ => "txt",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullHost;

    #[async_trait]
    impl TestHost for NullHost {
        async fn step(&self, _title: &str) {}

        async fn attach(&self, _attachment: Attachment) -> Result<(), HostError> {
            Ok(())
        }
    }

    #[test]
    fn slug_keeps_words_only() {
        assert_eq!(
            slug("❌   FAILED - THE RESPONSE BODY IS NOT VALID AGAINST THE SCHEMA!"),
            "failed-the-response-body-is-not-valid-against-the-schema"
        );
        assert_eq!(slug("⚠️"), "attachment");
    }

    #[test]
    fn assert_valid_accepts_none_and_empty() {
        NullHost.assert_valid(None);
        NullHost.assert_valid(Some(&[]));
    }

    #[test]
    #[should_panic(expected = "not valid against the schema (1 errors)")]
    fn assert_valid_panics_on_errors() {
        let issue = SchemaIssue {
            instance_path: "/age".into(),
            schema_path: "/properties/age/type".into(),
            keyword: "type".into(),
            message: "\"3\" is not of type \"number\"".into(),
            marks: Vec::new(),
        };
        NullHost.assert_valid(Some(&[issue]));
    }

    #[tokio::test]
    async fn artifact_host_writes_numbered_files() {
        let dir = tempfile::tempdir().unwrap();
        let host = ArtifactDirHost::new(dir.path().join("reports"));
        host.attach(Attachment::html("First report", "<p>1</p>"))
            .await
            .unwrap();
        host.attach(Attachment::html("First report", "<p>2</p>"))
            .await
            .unwrap();

        let first = std::fs::read_to_string(host.dir().join("001-first-report.html")).unwrap();
        let second = std::fs::read_to_string(host.dir().join("002-first-report.html")).unwrap();
        assert_eq!(first, "<p>1</p>");
        assert_eq!(second, "<p>2</p>");
    }
}
