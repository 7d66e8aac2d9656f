//! # Schema Documents
//!
//! Loading of schema documents from disk and lookup of a response schema
//! inside an OpenAPI 3 or Swagger 2 document.
//!
//! ## Response Lookup
//!
//! With an [`ApiPath`] whose `endpoint` is set, the schema is taken from
//! `paths[endpoint][method].responses[status]` (falling back to the
//! `default` response). A response given as `$ref` is followed once. The
//! schema is `schema` (Swagger 2) or `content["application/json"].schema`
//! (OpenAPI 3, first content entry when JSON is not declared).
//!
//! The extracted schema is detached from its document, so the document's
//! `definitions` and `components` sections are grafted onto it. Local
//! `$ref`s such as `#/definitions/Pet` or `#/components/schemas/Pet` then
//! resolve against the new root.

use std::borrow::Cow;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SchemaError;

/// Sections of an API document that local `$ref`s point into.
const REFERENCE_SECTIONS: [&str; 2] = ["definitions", "components"];

/// Keywords holding instance data rather than subschemas.
const DATA_KEYWORDS: [&str; 5] = ["enum", "const", "default", "example", "examples"];

/// Locates a response schema inside an API document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiPath {
    /// Endpoint as declared under `paths` (e.g. `/pet/findByStatus`).
    /// `None` means the document is a plain schema.
    pub endpoint: Option<String>,
    /// HTTP method, case-insensitive.
    pub method: String,
    /// Response status code.
    pub status: u16,
}

impl Default for ApiPath {
    fn default() -> Self {
        Self {
            endpoint: None,
            method: "GET".to_string(),
            status: 200,
        }
    }
}

impl ApiPath {
    /// `GET <endpoint>` answering `200`.
    pub fn endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            ..Self::default()
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }
}

/// JSON Schema dialect to compile a resolved schema with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Swagger 2 and OpenAPI 3.0 schema objects follow draft 4.
    Draft4,
    /// Let the engine pick (`$schema`, else its latest draft).
    EngineDefault,
}

/// A schema ready to compile.
#[derive(Debug, Clone)]
pub struct ResolvedSchema<'a> {
    pub schema: Cow<'a, Value>,
    pub dialect: Dialect,
}

/// Pick the schema to validate against.
///
/// Without an endpoint the document itself is the schema.
///
/// # Errors
///
/// Returns [`SchemaError::PathNotFound`] when a lookup step fails.
pub fn resolve_schema<'a>(
    document: &'a Value,
    path: Option<&ApiPath>,
) -> Result<ResolvedSchema<'a>, SchemaError> {
    let Some((endpoint, path)) = path.and_then(|p| p.endpoint.as_deref().map(|e| (e, p))) else {
        return Ok(ResolvedSchema {
            schema: Cow::Borrowed(document),
            dialect: Dialect::EngineDefault,
        });
    };

    let not_found = |reason: &str| SchemaError::PathNotFound {
        endpoint: endpoint.to_string(),
        method: path.method.to_uppercase(),
        status: path.status,
        reason: reason.to_string(),
    };

    let operation = document
        .get("paths")
        .and_then(Value::as_object)
        .ok_or_else(|| not_found("document has no `paths` object"))?
        .get(endpoint)
        .ok_or_else(|| not_found("endpoint is not declared under `paths`"))?
        .get(path.method.to_lowercase())
        .ok_or_else(|| not_found("method is not declared for the endpoint"))?;

    let responses = operation
        .get("responses")
        .and_then(Value::as_object)
        .ok_or_else(|| not_found("operation has no `responses`"))?;
    let response = responses
        .get(&path.status.to_string())
        .or_else(|| responses.get("default"))
        .ok_or_else(|| not_found("status is not declared and there is no `default` response"))?;
    let response = follow_local_ref(document, response)
        .ok_or_else(|| not_found("response `$ref` does not resolve"))?;

    let schema = response
        .get("schema")
        .or_else(|| {
            let content = response.get("content")?.as_object()?;
            content
                .get("application/json")
                .or_else(|| content.values().next())?
                .get("schema")
        })
        .ok_or_else(|| not_found("response declares no schema"))?;

    let dialect = dialect_of(document);
    let mut schema = schema.clone();
    let mut sections: Vec<(&str, Value)> = REFERENCE_SECTIONS
        .iter()
        .filter_map(|section| document.get(*section).map(|v| (*section, v.clone())))
        .collect();
    if dialect == Dialect::Draft4 && document.get("openapi").is_some() {
        translate_nullable(&mut schema);
        for (_, section) in &mut sections {
            translate_nullable(section);
        }
    }

    Ok(ResolvedSchema {
        schema: Cow::Owned(graft_reference_sections(schema, sections)),
        dialect,
    })
}

/// Follow a single `{"$ref": "#/..."}` indirection inside `document`.
fn follow_local_ref<'a>(document: &'a Value, value: &'a Value) -> Option<&'a Value> {
    match value.get("$ref").and_then(Value::as_str) {
        Some(reference) => document.pointer(reference.strip_prefix('#')?),
        None => Some(value),
    }
}

fn graft_reference_sections(schema: Value, sections: Vec<(&str, Value)>) -> Value {
    let mut root = match schema {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("allOf".to_string(), Value::Array(vec![other]));
            map
        }
    };
    for (section, value) in sections {
        root.entry(section).or_insert(value);
    }
    Value::Object(root)
}

/// Rewrite the OpenAPI 3.0 `nullable` keyword into plain draft 4.
///
/// - `{"type": T, "nullable": true}` → `{"type": [T, "null"]}`;
/// - no `type` → `{"anyOf": [<schema>, {"type": "null"}]}`;
/// - an `enum` on a nullable schema also admits `null`;
/// - `nullable: false` is dropped.
fn translate_nullable(schema: &mut Value) {
    match schema {
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                if !DATA_KEYWORDS.contains(&key.as_str()) {
                    translate_nullable(child);
                }
            }

            let nullable = match map.get("nullable") {
                Some(Value::Bool(flag)) => *flag,
                _ => return,
            };
            map.remove("nullable");
            if !nullable {
                return;
            }

            let null = Value::String("null".to_string());
            let types = match map.remove("type") {
                Some(Value::String(name)) => vec![Value::String(name), null],
                Some(Value::Array(mut names)) => {
                    if !names.contains(&null) {
                        names.push(null);
                    }
                    names
                }
                other => {
                    if let Some(other) = other {
                        map.insert("type".to_string(), other);
                    }
                    let rest = std::mem::take(map);
                    let mut null_schema = Map::new();
                    null_schema.insert("type".to_string(), null);
                    map.insert(
                        "anyOf".to_string(),
                        Value::Array(vec![Value::Object(rest), Value::Object(null_schema)]),
                    );
                    return;
                }
            };
            map.insert("type".to_string(), Value::Array(types));
            if let Some(Value::Array(values)) = map.get_mut("enum") {
                if !values.contains(&Value::Null) {
                    values.push(Value::Null);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(translate_nullable),
        _ => {}
    }
}

fn dialect_of(document: &Value) -> Dialect {
    let openapi_3_0 = document
        .get("openapi")
        .and_then(Value::as_str)
        .is_some_and(|v| v.starts_with("3.0"));
    if document.get("swagger").is_some() || openapi_3_0 {
        Dialect::Draft4
    } else {
        Dialect::EngineDefault
    }
}

/// Load a schema document from a `.json`, `.yaml` or `.yml` file.
///
/// # Errors
///
/// Returns [`SchemaError::DocumentLoad`] if the file cannot be read or
/// parsed.
pub fn load_document(path: &Path) -> Result<Value, SchemaError> {
    let load_error = |reason: String| SchemaError::DocumentLoad {
        path: path.display().to_string(),
        reason,
    };

    let content =
        std::fs::read_to_string(path).map_err(|e| load_error(format!("cannot read file: {e}")))?;

    match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
        "yaml" | "yml" => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(&content)
                .map_err(|e| load_error(format!("invalid YAML: {e}")))?;
            let yaml = stringify_keys(yaml).map_err(load_error)?;
            serde_yaml::from_value(yaml).map_err(|e| load_error(format!("invalid document: {e}")))
        }
        _ => serde_json::from_str(&content).map_err(|e| load_error(format!("invalid JSON: {e}"))),
    }
}

/// Give every YAML mapping string keys so the tree deserializes as JSON.
///
/// Status codes written as bare numbers (`200:`) are the usual case. Tags
/// are dropped.
fn stringify_keys(yaml: serde_yaml::Value) -> Result<serde_yaml::Value, String> {
    use serde_yaml::Value as Yaml;

    Ok(match yaml {
        Yaml::Mapping(map) => Yaml::Mapping(
            map.into_iter()
                .map(|(key, value)| {
                    let key = match key {
                        Yaml::String(s) => s,
                        Yaml::Number(n) => n.to_string(),
                        Yaml::Bool(b) => b.to_string(),
                        other => return Err(format!("unsupported mapping key {other:?}")),
                    };
                    Ok((Yaml::String(key), stringify_keys(value)?))
                })
                .collect::<Result<_, String>>()?,
        ),
        Yaml::Sequence(items) => Yaml::Sequence(
            items
                .into_iter()
                .map(stringify_keys)
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Tagged(tagged) => stringify_keys(tagged.value)?,
        scalar => scalar,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn swagger() -> Value {
        json!({
            "swagger": "2.0",
            "paths": {
                "/pet/findByStatus": {
                    "get": {
                        "responses": {
                            "200": {
                                "description": "ok",
                                "schema": {"type": "array", "items": {"$ref": "#/definitions/Pet"}}
                            }
                        }
                    }
                }
            },
            "definitions": {
                "Pet": {"type": "object", "required": ["name"]}
            }
        })
    }

    #[test]
    fn plain_schema_is_borrowed_unchanged() {
        let doc = json!({"type": "object"});
        let resolved = resolve_schema(&doc, None).unwrap();
        assert!(matches!(resolved.schema, Cow::Borrowed(_)));
        assert_eq!(resolved.dialect, Dialect::EngineDefault);

        let no_endpoint = ApiPath::default();
        let resolved = resolve_schema(&doc, Some(&no_endpoint)).unwrap();
        assert_eq!(*resolved.schema, doc);
    }

    #[test]
    fn swagger_response_schema_gets_definitions() {
        let doc = swagger();
        let path = ApiPath::endpoint("/pet/findByStatus").with_method("get");
        let resolved = resolve_schema(&doc, Some(&path)).unwrap();
        assert_eq!(resolved.dialect, Dialect::Draft4);
        assert_eq!(resolved.schema["type"], "array");
        assert_eq!(resolved.schema["definitions"]["Pet"]["required"], json!(["name"]));
    }

    #[test]
    fn openapi_content_schema_and_response_ref() {
        let doc = json!({
            "openapi": "3.1.0",
            "paths": {
                "/orders": {
                    "post": {
                        "responses": {
                            "201": {"$ref": "#/components/responses/Created"}
                        }
                    }
                }
            },
            "components": {
                "responses": {
                    "Created": {
                        "content": {
                            "application/json": {"schema": {"$ref": "#/components/schemas/Order"}}
                        }
                    }
                },
                "schemas": {"Order": {"type": "object"}}
            }
        });
        let path = ApiPath::endpoint("/orders").with_method("POST").with_status(201);
        let resolved = resolve_schema(&doc, Some(&path)).unwrap();
        assert_eq!(resolved.dialect, Dialect::EngineDefault);
        assert_eq!(resolved.schema["$ref"], "#/components/schemas/Order");
        assert!(resolved.schema["components"]["schemas"]["Order"].is_object());
    }

    #[test]
    fn default_response_is_used_for_undeclared_status() {
        let doc = json!({
            "openapi": "3.0.3",
            "paths": {"/ping": {"get": {"responses": {
                "default": {"content": {"application/problem+json": {"schema": {"type": "string"}}}}
            }}}}
        });
        let resolved = resolve_schema(&doc, Some(&ApiPath::endpoint("/ping"))).unwrap();
        assert_eq!(resolved.dialect, Dialect::Draft4);
        assert_eq!(resolved.schema["type"], "string");
    }

    #[test]
    fn unknown_endpoint_method_and_status_are_reported() {
        let doc = swagger();
        for (path, needle) in [
            (ApiPath::endpoint("/store/order"), "endpoint"),
            (ApiPath::endpoint("/pet/findByStatus").with_method("delete"), "method"),
            (ApiPath::endpoint("/pet/findByStatus").with_status(404), "status"),
        ] {
            let err = resolve_schema(&doc, Some(&path)).unwrap_err();
            match err {
                SchemaError::PathNotFound { reason, .. } => {
                    assert!(reason.contains(needle), "unexpected reason: {reason}")
                }
                other => panic!("expected PathNotFound, got: {other}"),
            }
        }
    }

    fn users_api(version: &str) -> Value {
        json!({
            "openapi": version,
            "paths": {"/users": {"get": {"responses": {"200": {"content": {
                "application/json": {"schema": {
                    "type": "array",
                    "items": {"$ref": "#/components/schemas/User"}
                }}
            }}}}}},
            "components": {"schemas": {
                "User": {
                    "type": "object",
                    "properties": {
                        "nickname": {"type": "string", "nullable": true},
                        "role": {"type": "string", "enum": ["admin", "user"], "nullable": true},
                        "team": {"$ref": "#/components/schemas/Team", "nullable": true},
                        "email": {"type": "string", "nullable": false, "example": {"nullable": true}}
                    }
                },
                "Team": {"type": "object"}
            }}
        })
    }

    #[test]
    fn openapi_3_0_nullable_becomes_draft4_null_type() {
        let doc = users_api("3.0.3");
        let resolved = resolve_schema(&doc, Some(&ApiPath::endpoint("/users"))).unwrap();
        let user = &resolved.schema["components"]["schemas"]["User"]["properties"];

        assert_eq!(user["nickname"], json!({"type": ["string", "null"]}));
        assert_eq!(user["role"]["type"], json!(["string", "null"]));
        assert_eq!(user["role"]["enum"], json!(["admin", "user", null]));
        assert_eq!(
            user["team"],
            json!({"anyOf": [{"$ref": "#/components/schemas/Team"}, {"type": "null"}]})
        );
        assert_eq!(user["email"], json!({"type": "string", "example": {"nullable": true}}));
    }

    #[test]
    fn nullable_is_left_alone_outside_openapi_3_0() {
        let doc = users_api("3.1.0");
        let resolved = resolve_schema(&doc, Some(&ApiPath::endpoint("/users"))).unwrap();
        let nickname = &resolved.schema["components"]["schemas"]["User"]["properties"]["nickname"];
        assert_eq!(nickname["nullable"], true);
        assert_eq!(nickname["type"], "string");
    }

    #[test]
    fn nullable_response_root_keeps_components_at_root() {
        let doc = json!({
            "openapi": "3.0.0",
            "paths": {"/me": {"get": {"responses": {"200": {"content": {
                "application/json": {"schema": {"$ref": "#/components/schemas/Team", "nullable": true}}
            }}}}}},
            "components": {"schemas": {"Team": {"type": "object"}}}
        });
        let resolved = resolve_schema(&doc, Some(&ApiPath::endpoint("/me"))).unwrap();
        assert!(resolved.schema["anyOf"].is_array());
        assert!(resolved.schema["components"]["schemas"]["Team"].is_object());
    }

    #[test]
    fn load_yaml_document_with_numeric_keys() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("api.yaml");
        std::fs::write(
            &file,
            "openapi: 3.0.0\npaths:\n  /x:\n    get:\n      responses:\n        200:\n          description: ok\n",
        )
        .unwrap();
        let doc = load_document(&file).unwrap();
        assert_eq!(doc["openapi"], "3.0.0");
        assert_eq!(doc["paths"]["/x"]["get"]["responses"]["200"]["description"], "ok");
    }

    #[test]
    fn load_yaml_keeps_scalars_and_drops_tags() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("schema.yml");
        std::fs::write(
            &file,
            "type: object\nmaximum: 2.5\nrequired: [id]\ntrue: yes-key\nnote: !custom tagged\n",
        )
        .unwrap();
        let doc = load_document(&file).unwrap();
        assert_eq!(doc["maximum"], 2.5);
        assert_eq!(doc["required"], json!(["id"]));
        assert_eq!(doc["true"], "yes-key");
        assert_eq!(doc["note"], "tagged");
    }

    #[test]
    fn load_reports_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("schema.json");
        std::fs::write(&file, "{not json").unwrap();
        assert!(matches!(
            load_document(&file),
            Err(SchemaError::DocumentLoad { .. })
        ));
    }
}
