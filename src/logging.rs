//! Logging bootstrap
//!
//! Events go to stderr: stdout carries the MCP stream. `RUST_LOG` takes
//! precedence over the level passed on the command line.

use tracing_subscriber::EnvFilter;

/// Levels accepted by `--log-level`
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Check a `--log-level` value
pub fn parse_level(level: &str) -> Result<String, String> {
    let normalized = level.trim().to_ascii_lowercase();
    if LOG_LEVELS.contains(&normalized.as_str()) {
        Ok(normalized)
    } else {
        Err(format!(
            "Invalid log level '{}'. Valid levels: {}",
            level,
            LOG_LEVELS.join(", ")
        ))
    }
}

/// Install the global subscriber
///
/// Calling this more than once is harmless; later calls keep the first
/// subscriber and return `false`.
pub fn init_logging(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .is_ok()
}
