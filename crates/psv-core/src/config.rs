//! Run configuration.
//!
//! Snapshot of the process-wide toggles that steer a validation call. Take
//! it once per test run with [`RunConfig::from_env`] and pass it by
//! reference; nothing in the workspace reads the environment afterwards.

/// Disables every schema check when set to `true`.
pub const ENV_DISABLE_SCHEMA_VALIDATION: &str = "DISABLE_SCHEMA_VALIDATION";
/// Attaches the HTML report to the test result when set to `true`.
pub const ENV_LOG_API_REPORT: &str = "LOG_API_REPORT";
/// Suppresses live page injection when set to `false`.
pub const ENV_LOG_API_UI: &str = "LOG_API_UI";

/// Toggles read at the start of a test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Skip validation entirely and report a pass.
    pub disable_validation: bool,
    /// Attach the full HTML report to the test result on failure.
    pub attach_report: bool,
    /// Inject the failure report into the live page, when one is available.
    pub show_in_ui: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            disable_validation: false,
            attach_report: false,
            show_in_ui: true,
        }
    }
}

impl RunConfig {
    /// Load the toggles from environment variables.
    ///
    /// Variables:
    /// - `DISABLE_SCHEMA_VALIDATION` (default: `false`)
    /// - `LOG_API_REPORT` (default: `false`)
    /// - `LOG_API_UI` (default: `true`; only `false` disables it)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load the toggles through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let is = |name: &str, expected: &str| {
            lookup(name).is_some_and(|v| v.trim().eq_ignore_ascii_case(expected))
        };
        Self {
            disable_validation: is(ENV_DISABLE_SCHEMA_VALIDATION, "true"),
            attach_report: is(ENV_LOG_API_REPORT, "true"),
            show_in_ui: !is(ENV_LOG_API_UI, "false"),
        }
    }
}
