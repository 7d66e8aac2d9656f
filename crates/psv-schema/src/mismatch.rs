//! # Mismatch Marker Injector
//!
//! Rebuilds a response body with the fields flagged by an engine made
//! visible in the key names:
//!
//! - a member whose value failed validation is renamed `<errorIcon><key>`;
//! - a required member that is absent is synthesised as
//!   `<missingIcon><key>: null`, after the existing members of its object.
//!
//! Only object keys are ever renamed. Marks on array positions or on the
//! root are ignored. The first mark seen for a path wins; an unflagged key
//! is copied byte for byte. When the marked name is already a key of the
//! body, the icon is repeated (`⚠️⚠️age`) so the mark is never lost.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use psv_core::{InstancePath, IssueKind, IssueStyles, SchemaIssue};

/// Per-path classification gathered from the issues.
#[derive(Debug, Default)]
struct MarkTable {
    errors: HashSet<InstancePath>,
    missing: HashMap<InstancePath, Vec<String>>,
}

impl MarkTable {
    fn from_issues(issues: &[SchemaIssue]) -> Self {
        let mut table = Self::default();
        let mut seen = HashSet::new();
        for mark in issues.iter().flat_map(|issue| &issue.marks) {
            if !seen.insert(mark.path.clone()) {
                continue;
            }
            match mark.kind {
                IssueKind::Error => {
                    table.errors.insert(mark.path.clone());
                }
                IssueKind::Missing => {
                    if let Some((parent, member)) = mark.path.split_last() {
                        table
                            .missing
                            .entry(parent)
                            .or_default()
                            .push(member.to_string());
                    }
                }
            }
        }
        table
    }
}

/// Copy `data` with every field flagged by `issues` marked.
pub fn mark_mismatches(data: &Value, issues: &[SchemaIssue], styles: &IssueStyles) -> Value {
    let table = MarkTable::from_issues(issues);
    if table.errors.is_empty() && table.missing.is_empty() {
        return data.clone();
    }
    Marker { table: &table, styles }.mark(data, &InstancePath::root())
}

struct Marker<'a> {
    table: &'a MarkTable,
    styles: &'a IssueStyles,
}

impl Marker<'_> {
    fn mark(&self, value: &Value, at: &InstancePath) -> Value {
        match value {
            Value::Object(members) => Value::Object(self.mark_object(members, at)),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| self.mark(item, &at.child(index.to_string())))
                    .collect(),
            ),
            scalar => scalar.clone(),
        }
    }

    fn mark_object(&self, members: &Map<String, Value>, at: &InstancePath) -> Map<String, Value> {
        let error_icon = self.styles.icon(IssueKind::Error);
        let missing_icon = self.styles.icon(IssueKind::Missing);

        let mut marked = Map::new();
        for (key, value) in members {
            let member_at = at.child(key.as_str());
            let child = self.mark(value, &member_at);
            let name = if self.table.errors.contains(&member_at) {
                free_name(error_icon, key, members, &marked)
            } else {
                key.clone()
            };
            marked.insert(name, child);
        }

        if let Some(absent) = self.table.missing.get(at) {
            for member in absent {
                if members.contains_key(member) {
                    continue;
                }
                let name = free_name(missing_icon, member, members, &marked);
                marked.insert(name, Value::Null);
            }
        }
        marked
    }
}

/// `<icon><key>`, with the icon repeated until the name is not taken by
/// the body or by an earlier mark.
fn free_name(
    icon: &str,
    key: &str,
    members: &Map<String, Value>,
    marked: &Map<String, Value>,
) -> String {
    if icon.is_empty() {
        return key.to_string();
    }
    let mut prefix = icon.to_string();
    loop {
        let name = format!("{prefix}{key}");
        if !members.contains_key(&name) && !marked.contains_key(&name) {
            return name;
        }
        tracing::debug!(key, taken = %name, "marked name already in use, repeating icon");
        prefix.push_str(icon);
    }
}
