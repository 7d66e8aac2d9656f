//! # Issue Marker Styles
//!
//! Icons prepended to flagged keys and the colours used to highlight them in
//! the HTML report. Callers pass a partial [`IssueStylesOverride`]; every
//! unset field falls back to the default independently.

use serde::{Deserialize, Serialize};

use crate::error::StyleError;
use crate::issue::IssueKind;

/// Default icon for fields whose value does not satisfy the schema.
pub const DEFAULT_ICON_PROPERTY_ERROR: &str = "⚠️";
/// Default colour for fields whose value does not satisfy the schema.
pub const DEFAULT_COLOR_PROPERTY_ERROR: &str = "#d67e09";
/// Default icon for required fields that are absent.
pub const DEFAULT_ICON_PROPERTY_MISSING: &str = "❌";
/// Default colour for required fields that are absent.
pub const DEFAULT_COLOR_PROPERTY_MISSING: &str = "#c10000";

/// Fully resolved marker styles for one validation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueStyles {
    pub icon_property_error: String,
    pub color_property_error: String,
    pub icon_property_missing: String,
    pub color_property_missing: String,
}

/// Partial style override supplied by a test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IssueStylesOverride {
    pub icon_property_error: Option<String>,
    pub color_property_error: Option<String>,
    pub icon_property_missing: Option<String>,
    pub color_property_missing: Option<String>,
}

impl Default for IssueStyles {
    fn default() -> Self {
        Self {
            icon_property_error: DEFAULT_ICON_PROPERTY_ERROR.to_string(),
            color_property_error: DEFAULT_COLOR_PROPERTY_ERROR.to_string(),
            icon_property_missing: DEFAULT_ICON_PROPERTY_MISSING.to_string(),
            color_property_missing: DEFAULT_COLOR_PROPERTY_MISSING.to_string(),
        }
    }
}

impl IssueStyles {
    /// Merge an optional override over the defaults, field by field.
    pub fn merged(overrides: Option<&IssueStylesOverride>) -> Self {
        let defaults = Self::default();
        let Some(o) = overrides else {
            return defaults;
        };
        Self {
            icon_property_error: o
                .icon_property_error
                .clone()
                .unwrap_or(defaults.icon_property_error),
            color_property_error: o
                .color_property_error
                .clone()
                .unwrap_or(defaults.color_property_error),
            icon_property_missing: o
                .icon_property_missing
                .clone()
                .unwrap_or(defaults.icon_property_missing),
            color_property_missing: o
                .color_property_missing
                .clone()
                .unwrap_or(defaults.color_property_missing),
        }
    }

    /// Merge and check that the result can be used to mark a report.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError`] when an icon is empty, both icons are equal, or
    /// a colour is not a hex value.
    pub fn resolve(overrides: Option<&IssueStylesOverride>) -> Result<Self, StyleError> {
        let styles = Self::merged(overrides);
        styles.check()?;
        Ok(styles)
    }

    fn check(&self) -> Result<(), StyleError> {
        if self.icon_property_error.trim().is_empty() {
            return Err(StyleError::EmptyIcon {
                field: "iconPropertyError",
            });
        }
        if self.icon_property_missing.trim().is_empty() {
            return Err(StyleError::EmptyIcon {
                field: "iconPropertyMissing",
            });
        }
        if self.icon_property_error == self.icon_property_missing {
            return Err(StyleError::DuplicateIcon {
                icon: self.icon_property_error.clone(),
            });
        }
        check_color("colorPropertyError", &self.color_property_error)?;
        check_color("colorPropertyMissing", &self.color_property_missing)
    }

    /// Icon used for the given issue class.
    pub fn icon(&self, kind: IssueKind) -> &str {
        match kind {
            IssueKind::Error => &self.icon_property_error,
            IssueKind::Missing => &self.icon_property_missing,
        }
    }

    /// Colour used for the given issue class.
    pub fn color(&self, kind: IssueKind) -> &str {
        match kind {
            IssueKind::Error => &self.color_property_error,
            IssueKind::Missing => &self.color_property_missing,
        }
    }
}

fn check_color(field: &'static str, value: &str) -> Result<(), StyleError> {
    let valid = value
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()));
    if valid {
        Ok(())
    } else {
        Err(StyleError::InvalidColor {
            field,
            value: value.to_string(),
        })
    }
}
