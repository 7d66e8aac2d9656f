//! Tracing subscriber setup for test binaries.
//!
//! Filtering follows `RUST_LOG` (default `info`). Setting
//! `PSV_LOG_FORMAT=json` switches to one JSON object per event.
//! Output goes through the test writer so `cargo test` captures it per test.

use tracing_subscriber::EnvFilter;

pub const ENV_LOG_FORMAT: &str = "PSV_LOG_FORMAT";

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed, which is the
/// normal case for every test after the first.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(ENV_LOG_FORMAT).is_ok_and(|v| v.trim().eq_ignore_ascii_case("json"));

    let installed = if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
    };
    installed.is_ok()
}
