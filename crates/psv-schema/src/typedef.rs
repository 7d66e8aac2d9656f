//! # JSON Type Definition Engine
//!
//! Schema-object validation backed by the `jtd` crate (RFC 8927). A
//! [`TypedefSchema`] is compiled once and reused across bodies.
//!
//! JTD reports errors as a pair of paths only. Messages and field marks are
//! derived from the failing schema node:
//!
//! - schema path `…/properties/<name>` with the member absent from the
//!   instance → `Missing` mark for `<name>`;
//! - instance path pointing at a member the properties form does not declare
//!   → `Error` mark on that member (JTD objects are strict);
//! - everything else → `Error` mark at the instance path.

use jtd::{Schema, SerdeSchema, ValidateOptions};
use serde_json::Value;

use psv_core::{FieldMark, InstancePath, IssueKind, SchemaIssue};

use crate::error::SchemaError;

const ENGINE: &str = "jtd";

/// Recursion limit for `ref` chains.
const MAX_DEPTH: usize = 64;

/// A compiled JSON Type Definition schema.
#[derive(Debug, Clone)]
pub struct TypedefSchema {
    schema: Schema,
    source: Value,
}

impl TypedefSchema {
    /// Compile and check a JTD schema given as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidSchema`] when the value is not a
    /// well-formed JTD schema.
    pub fn compile(source: &Value) -> Result<Self, SchemaError> {
        let invalid = |reason: String| SchemaError::InvalidSchema {
            engine: ENGINE,
            reason,
        };
        let serde_schema: SerdeSchema =
            serde_json::from_value(source.clone()).map_err(|e| invalid(e.to_string()))?;
        let schema = Schema::from_serde_schema(serde_schema).map_err(|e| invalid(e.to_string()))?;
        schema.validate().map_err(|e| invalid(e.to_string()))?;
        Ok(Self {
            schema,
            source: source.clone(),
        })
    }

    /// The schema as it was supplied.
    pub fn source(&self) -> &Value {
        &self.source
    }

    /// Judge `data`; issues come back in engine order.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Aborted`] when `ref` recursion exceeds the
    /// depth limit.
    pub fn validate(&self, data: &Value) -> Result<Vec<SchemaIssue>, SchemaError> {
        let options = ValidateOptions::new().with_max_depth(MAX_DEPTH);
        let indicators =
            jtd::validate(&self.schema, data, options).map_err(|e| SchemaError::Aborted {
                engine: ENGINE,
                reason: e.to_string(),
            })?;

        let issues: Vec<SchemaIssue> = indicators
            .iter()
            .map(|indicator| {
                self.to_issue(
                    data,
                    InstancePath::from_tokens(indicator.instance_path.iter()),
                    InstancePath::from_tokens(indicator.schema_path.iter()),
                )
            })
            .collect();
        tracing::debug!(engine = ENGINE, issues = issues.len(), "validated response body");
        Ok(issues)
    }

    fn to_issue(&self, data: &Value, at: InstancePath, schema_at: InstancePath) -> SchemaIssue {
        let (keyword, message, mark) = self.classify(data, &at, &schema_at);
        SchemaIssue {
            instance_path: at.to_string(),
            schema_path: schema_at.to_string(),
            keyword: keyword.to_string(),
            message,
            marks: vec![mark],
        }
    }

    fn classify(
        &self,
        data: &Value,
        at: &InstancePath,
        schema_at: &InstancePath,
    ) -> (&'static str, String, FieldMark) {
        let error_here = || FieldMark {
            path: at.clone(),
            kind: IssueKind::Error,
        };

        if let Some((parent, member)) = schema_at.split_last() {
            let required_member = parent
                .split_last()
                .is_some_and(|(_, form)| form == "properties");
            let absent = at
                .lookup(data)
                .and_then(Value::as_object)
                .is_some_and(|object| !object.contains_key(member));
            if required_member && absent {
                return (
                    "properties",
                    format!("missing required property \"{member}\""),
                    FieldMark {
                        path: at.child(member),
                        kind: IssueKind::Missing,
                    },
                );
            }
        }

        let node = schema_at.lookup(&self.source);
        if let (Some(node), Some((_, member))) = (node, at.split_last()) {
            if is_properties_form(node) && !declares(node, member) {
                return (
                    "additionalProperties",
                    format!("unexpected property \"{member}\""),
                    error_here(),
                );
            }
        }

        let last = schema_at.tokens().last().map(String::as_str).unwrap_or("");
        let (keyword, message) = match last {
            "type" => (
                "type",
                format!("expected type {}", node.map(Value::to_string).unwrap_or_default()),
            ),
            "enum" => (
                "enum",
                format!("expected one of {}", node.map(Value::to_string).unwrap_or_default()),
            ),
            "elements" => ("elements", "expected an array".to_string()),
            "values" => ("values", "expected an object".to_string()),
            "properties" | "optionalProperties" => ("properties", "expected an object".to_string()),
            "discriminator" => (
                "discriminator",
                "expected an object with a string discriminator tag".to_string(),
            ),
            "mapping" => ("mapping", "discriminator tag is not in the mapping".to_string()),
            _ => ("schema", format!("value does not satisfy the schema at {schema_at}")),
        };
        (keyword, message, error_here())
    }
}

fn is_properties_form(node: &Value) -> bool {
    node.get("properties").is_some() || node.get("optionalProperties").is_some()
}

fn declares(node: &Value, member: &str) -> bool {
    ["properties", "optionalProperties"]
        .iter()
        .any(|form| node.get(*form).and_then(|p| p.get(member)).is_some())
}
