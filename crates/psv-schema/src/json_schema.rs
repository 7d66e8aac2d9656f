//! # JSON Schema Engine
//!
//! Validates response bodies with the `jsonschema` crate and translates its
//! errors into [`SchemaIssue`]s.
//!
//! ## Field Marks
//!
//! | Engine error                   | Mark                                          |
//! |--------------------------------|-----------------------------------------------|
//! | `required`                     | `Missing` at `<instance path>/<property>`     |
//! | `additionalProperties`         | `Error` at each unexpected member             |
//! | anything else                  | `Error` at the instance path                  |
//!
//! ## Offline Resolution
//!
//! Remote `$ref`s are never fetched. The retriever refuses every URI, so a
//! schema that depends on one fails to compile with
//! [`SchemaError::InvalidSchema`].

use std::fmt;

use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, Retrieve, Uri, ValidationError, Validator};
use serde_json::Value;

use psv_core::{FieldMark, InstancePath, IssueKind, SchemaIssue};

use crate::document::{resolve_schema, ApiPath, Dialect};
use crate::error::SchemaError;

const ENGINE: &str = "json-schema";

/// Retriever that keeps validation offline.
struct OfflineRetriever;

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("external reference '{}' is not available offline", uri.as_str()).into())
    }
}

/// A compiled JSON Schema ready to judge response bodies.
pub struct JsonSchemaEngine {
    validator: Validator,
}

impl fmt::Debug for JsonSchemaEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchemaEngine").finish_non_exhaustive()
    }
}

impl JsonSchemaEngine {
    /// Compile the schema named by `path` inside `document`.
    ///
    /// Without an endpoint in `path` the document itself is the schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::PathNotFound`] when the API path does not
    /// resolve and [`SchemaError::InvalidSchema`] when the engine rejects
    /// the schema.
    pub fn compile(document: &Value, path: Option<&ApiPath>) -> Result<Self, SchemaError> {
        let resolved = resolve_schema(document, path)?;

        let mut opts = jsonschema::options();
        if resolved.dialect == Dialect::Draft4 {
            opts.with_draft(Draft::Draft4);
        }
        opts.with_retriever(OfflineRetriever);

        let validator = opts
            .build(&resolved.schema)
            .map_err(|e| SchemaError::InvalidSchema {
                engine: ENGINE,
                reason: e.to_string(),
            })?;
        Ok(Self { validator })
    }

    /// Judge `data`; issues come back in engine order.
    pub fn validate(&self, data: &Value) -> Vec<SchemaIssue> {
        let issues: Vec<SchemaIssue> = self.validator.iter_errors(data).map(to_issue).collect();
        tracing::debug!(engine = ENGINE, issues = issues.len(), "validated response body");
        issues
    }
}

fn to_issue(error: ValidationError<'_>) -> SchemaIssue {
    let instance_path = error.instance_path.to_string();
    let schema_path = error.schema_path.to_string();
    let keyword = schema_path.rsplit('/').next().unwrap_or_default().to_string();
    let at = InstancePath::from_pointer(&instance_path);

    let marks = match &error.kind {
        ValidationErrorKind::Required { property } => {
            let name = property
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| property.to_string());
            vec![FieldMark {
                path: at.child(name),
                kind: IssueKind::Missing,
            }]
        }
        ValidationErrorKind::AdditionalProperties { unexpected } => unexpected
            .iter()
            .map(|member| FieldMark {
                path: at.child(member.as_str()),
                kind: IssueKind::Error,
            })
            .collect(),
        _ => vec![FieldMark {
            path: at,
            kind: IssueKind::Error,
        }],
    };

    SchemaIssue {
        message: error.to_string(),
        instance_path,
        schema_path,
        keyword,
        marks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person_list_schema() -> Value {
        json!({
            "type": "array",
            "items": {
                "type": "object",
                "required": ["id", "age"],
                "properties": {
                    "id": {"type": "string"},
                    "age": {"type": "number"}
                }
            }
        })
    }

    #[test]
    fn valid_body_has_no_issues() {
        let engine = JsonSchemaEngine::compile(&person_list_schema(), None).unwrap();
        assert!(engine.validate(&json!([{"id": "a", "age": 3}])).is_empty());
    }

    #[test]
    fn missing_required_property_marks_missing_field() {
        let engine = JsonSchemaEngine::compile(&person_list_schema(), None).unwrap();
        let issues = engine.validate(&json!([{"age": 3}]));
        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(issue.instance_path, "/0");
        assert_eq!(issue.keyword, "required");
        assert!(issue.message.contains("id"), "message: {}", issue.message);
        assert_eq!(
            issue.marks,
            vec![FieldMark {
                path: InstancePath::from_pointer("/0/id"),
                kind: IssueKind::Missing,
            }]
        );
    }

    #[test]
    fn type_mismatch_marks_the_member() {
        let schema = json!({
            "type": "object",
            "properties": {"age": {"type": "number"}},
            "required": ["age"]
        });
        let engine = JsonSchemaEngine::compile(&schema, None).unwrap();
        let issues = engine.validate(&json!({"age": "3"}));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].instance_path, "/age");
        assert_eq!(issues[0].keyword, "type");
        assert_eq!(
            issues[0].marks,
            vec![FieldMark {
                path: InstancePath::from_pointer("/age"),
                kind: IssueKind::Error,
            }]
        );
    }

    #[test]
    fn additional_properties_mark_each_unexpected_member() {
        let schema = json!({
            "type": "object",
            "properties": {"a": {}},
            "additionalProperties": false
        });
        let engine = JsonSchemaEngine::compile(&schema, None).unwrap();
        let issues = engine.validate(&json!({"a": 1, "b": 2, "c": 3}));
        let marked: Vec<String> = issues
            .iter()
            .flat_map(|i| i.marks.iter().map(|m| m.path.to_string()))
            .collect();
        assert_eq!(marked, vec!["/b", "/c"]);
        assert!(issues
            .iter()
            .flat_map(|i| &i.marks)
            .all(|m| m.kind == IssueKind::Error));
    }

    #[test]
    fn swagger_definitions_resolve() {
        let doc = json!({
            "swagger": "2.0",
            "paths": {"/pet/{petId}": {"get": {"responses": {"200": {
                "schema": {"$ref": "#/definitions/Pet"}
            }}}}},
            "definitions": {
                "Pet": {
                    "type": "object",
                    "required": ["name"],
                    "properties": {"name": {"type": "string"}}
                }
            }
        });
        let path = ApiPath::endpoint("/pet/{petId}");
        let engine = JsonSchemaEngine::compile(&doc, Some(&path)).unwrap();
        assert!(engine.validate(&json!({"name": "rex"})).is_empty());
        let issues = engine.validate(&json!({"name": 7}));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].instance_path, "/name");
    }

    #[test]
    fn openapi_3_0_nullable_fields_accept_null() {
        let doc = json!({
            "openapi": "3.0.3",
            "paths": {"/users": {"get": {"responses": {"200": {"content": {
                "application/json": {"schema": {
                    "type": "array",
                    "items": {"$ref": "#/components/schemas/User"}
                }}
            }}}}}},
            "components": {"schemas": {"User": {
                "type": "object",
                "required": ["id"],
                "properties": {
                    "id": {"type": "integer"},
                    "nickname": {"type": "string", "nullable": true}
                }
            }}}
        });
        let engine = JsonSchemaEngine::compile(&doc, Some(&ApiPath::endpoint("/users"))).unwrap();

        assert!(engine.validate(&json!([{"id": 1, "nickname": null}])).is_empty());
        assert!(engine.validate(&json!([{"id": 1, "nickname": "bo"}])).is_empty());

        let wrong_type = engine.validate(&json!([{"id": 1, "nickname": 7}]));
        assert_eq!(wrong_type.len(), 1);
        assert_eq!(wrong_type[0].instance_path, "/0/nickname");

        let missing = engine.validate(&json!([{"nickname": null}]));
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].marks[0].kind, IssueKind::Missing);
    }

    #[test]
    fn invalid_schema_is_an_engine_failure() {
        let err = JsonSchemaEngine::compile(&json!({"type": 12}), None).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidSchema { .. }), "got: {err}");
    }

    #[test]
    fn remote_refs_are_not_fetched() {
        let schema = json!({"$ref": "https://example.invalid/schemas/pet.json"});
        assert!(JsonSchemaEngine::compile(&schema, None).is_err());
    }
}
