//! Result handed back to the test after a schema check.

use serde::Serialize;
use serde_json::Value;

use crate::issue::SchemaIssue;

/// Outcome of one validation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    /// `None` when the body satisfied the schema, otherwise the engine's
    /// issues in engine order. Never `Some` of an empty list.
    pub errors: Option<Vec<SchemaIssue>>,
    /// The response body with flagged keys renamed to carry marker icons.
    pub data_mismatches: Value,
}

impl ValidationOutcome {
    /// A passing outcome; the data is returned untouched.
    pub fn passed(data: Value) -> Self {
        Self {
            errors: None,
            data_mismatches: data,
        }
    }

    /// A failing outcome. An empty issue list is normalised to a pass.
    pub fn failed(errors: Vec<SchemaIssue>, data_mismatches: Value) -> Self {
        Self {
            errors: (!errors.is_empty()).then_some(errors),
            data_mismatches,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_none()
    }

    pub fn error_count(&self) -> usize {
        self.errors.as_ref().map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_failure_is_a_pass() {
        let outcome = ValidationOutcome::failed(Vec::new(), json!({"a": 1}));
        assert!(outcome.is_valid());
        assert_eq!(outcome.error_count(), 0);
    }

    #[test]
    fn passed_outcome_serializes_null_errors() {
        let outcome = ValidationOutcome::passed(json!([1, 2]));
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"errors": null, "dataMismatches": [1, 2]})
        );
    }
}
