//! # Schema Issues
//!
//! One [`SchemaIssue`] per error reported by an engine, in engine order.
//! Besides the textual fields that end up in the raw error dump, each issue
//! lists the fields it flags in the response body ([`FieldMark`]).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Issue class of a flagged field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// The field is present but its value does not satisfy the schema.
    Error,
    /// A required field is absent.
    Missing,
}

/// Location of a value inside a JSON document.
///
/// Stored as unescaped reference tokens. Whether a token addresses an object
/// member or an array position depends on the container it is applied to,
/// so `"200"` matches both a status-code key and the 201st array element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstancePath(Vec<String>);

impl InstancePath {
    /// The document root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Build a path from a JSON pointer such as `/0/address/city`.
    ///
    /// `~1` and `~0` escapes are decoded. The empty pointer is the root.
    pub fn from_pointer(pointer: &str) -> Self {
        Self(
            pointer
                .split('/')
                .skip(1)
                .map(|raw| raw.replace("~1", "/").replace("~0", "~"))
                .collect(),
        )
    }

    /// Build a path from already-split tokens (e.g. JTD instance paths).
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(tokens.into_iter().map(|t| t.as_ref().to_string()).collect())
    }

    /// Append a member name or array position.
    pub fn child(&self, token: impl Into<String>) -> Self {
        let mut tokens = self.0.clone();
        tokens.push(token.into());
        Self(tokens)
    }

    /// The reference tokens, root first.
    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// Split into parent path and last token.
    pub fn split_last(&self) -> Option<(InstancePath, &str)> {
        self.0
            .split_last()
            .map(|(last, parent)| (Self(parent.to_vec()), last.as_str()))
    }

    /// Follow the path inside `value`.
    pub fn lookup<'v>(&self, value: &'v serde_json::Value) -> Option<&'v serde_json::Value> {
        self.0.iter().try_fold(value, |current, token| match current {
            serde_json::Value::Object(map) => map.get(token),
            serde_json::Value::Array(items) => {
                token.parse::<usize>().ok().and_then(|i| items.get(i))
            }
            _ => None,
        })
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for InstancePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.0 {
            write!(f, "/{}", token.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

/// A field flagged by an issue.
///
/// For [`IssueKind::Error`] the path points at the offending member. For
/// [`IssueKind::Missing`] it points at where the absent member should be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMark {
    pub path: InstancePath,
    pub kind: IssueKind,
}

/// A single error reported by a schema engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaIssue {
    /// JSON pointer to the offending value in the response body.
    pub instance_path: String,
    /// JSON pointer to the schema rule that rejected it.
    pub schema_path: String,
    /// Schema keyword of the failing rule (`type`, `required`, ...).
    pub keyword: String,
    /// Human-readable description from the engine.
    pub message: String,
    /// Fields this issue flags in the response body.
    #[serde(skip)]
    pub marks: Vec<FieldMark>,
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pointer_round_trips_escaped_keys() {
        let path = InstancePath::from_pointer("/0/a~1b/c~0d");
        assert_eq!(path.tokens(), &["0", "a/b", "c~d"]);
        assert_eq!(path.to_string(), "/0/a~1b/c~0d");
    }

    #[test]
    fn empty_pointer_is_root() {
        assert!(InstancePath::from_pointer("").is_root());
        assert_eq!(InstancePath::root().to_string(), "");
    }

    #[test]
    fn tokens_with_slashes_stay_single_keys() {
        let path = InstancePath::from_tokens(["paths", "/pet/{id}"]);
        assert_eq!(path.tokens().len(), 2);
        assert_eq!(path.to_string(), "/paths/~1pet~1{id}");
    }

    #[test]
    fn split_last_returns_parent_and_token() {
        let path = InstancePath::from_pointer("/items/2/name");
        let (parent, last) = path.split_last().unwrap();
        assert_eq!(last, "name");
        assert_eq!(parent.to_string(), "/items/2");
        assert!(InstancePath::root().split_last().is_none());
    }

    #[test]
    fn numeric_tokens_address_object_members_too() {
        let doc = json!({"responses": {"200": {"ok": true}}});
        let path = InstancePath::from_pointer("/responses/200/ok");
        assert_eq!(path.lookup(&doc), Some(&json!(true)));
    }

    #[test]
    fn lookup_follows_keys_and_indices() {
        let doc = json!({"items": [{"name": "a"}, {"name": "b"}]});
        let path = InstancePath::from_pointer("/items/1/name");
        assert_eq!(path.lookup(&doc), Some(&json!("b")));
        assert_eq!(InstancePath::from_pointer("/items/5").lookup(&doc), None);
    }

    #[test]
    fn issue_dump_omits_marks() {
        let issue = SchemaIssue {
            instance_path: "/0".into(),
            schema_path: "/items/required".into(),
            keyword: "required".into(),
            message: "\"id\" is a required property".into(),
            marks: vec![FieldMark {
                path: InstancePath::from_pointer("/0/id"),
                kind: IssueKind::Missing,
            }],
        };
        let dump = serde_json::to_value(&issue).unwrap();
        assert_eq!(
            dump,
            json!({
                "instancePath": "/0",
                "schemaPath": "/items/required",
                "keyword": "required",
                "message": "\"id\" is a required property"
            })
        );
        assert_eq!(issue.to_string(), "/0: \"id\" is a required property");
    }
}
