//! Logging for signet tools
//!
//! Installs a `tracing` subscriber that writes to stderr, so command output on
//! stdout (including `--json` reports) stays machine-readable.
//! `RUST_LOG` overrides the configured level.

use once_cell::sync::Lazy;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

/// Global session ID for correlating logs
static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Initialize logging with custom configuration
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(config.show_target)
                    .with_file(config.show_file)
                    .with_line_number(config.show_line_number),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(config.show_target)
                    .with_file(config.show_file)
                    .with_line_number(config.show_line_number)
                    .compact(),
            )
            .try_init()
    };
    result.map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::debug!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        "Telemetry initialized"
    );

    Ok(())
}

/// Get the current session ID
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Telemetry configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit one JSON object per event
    pub json: bool,
    /// Include the event target
    pub show_target: bool,
    /// Include the source file
    pub show_file: bool,
    /// Include the source line
    pub show_line_number: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
            show_target: false,
            show_file: false,
            show_line_number: false,
        }
    }
}

impl TelemetryConfig {
    /// Config for a CLI run: `-q` drops to warnings, each `-v` raises one level.
    ///
    /// `-vv` adds targets, `-vvv` adds source locations.
    pub fn for_cli(base_level: &str, verbose: u8, quiet: bool, json: bool) -> Self {
        Self {
            log_level: effective_level(base_level, verbose, quiet).to_string(),
            json,
            show_target: verbose >= 2,
            show_file: verbose >= 3,
            show_line_number: verbose >= 3,
        }
    }
}

fn effective_level(base_level: &str, verbose: u8, quiet: bool) -> &str {
    if quiet {
        return "warn";
    }
    match verbose {
        0 => base_level,
        1 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_level() {
        assert_eq!(effective_level("info", 0, false), "info");
        assert_eq!(effective_level("info", 1, false), "debug");
        assert_eq!(effective_level("info", 3, false), "trace");
        assert_eq!(effective_level("debug", 2, true), "warn");
    }

    #[test]
    fn test_cli_config_detail_grows_with_verbosity() {
        let one = TelemetryConfig::for_cli("info", 1, false, false);
        assert!(!one.show_target);
        assert!(!one.show_file);

        let two = TelemetryConfig::for_cli("info", 2, false, false);
        assert!(two.show_target);
        assert!(!two.show_line_number);

        let three = TelemetryConfig::for_cli("info", 3, false, true);
        assert!(three.json);
        assert!(three.show_file && three.show_line_number);
    }

    #[test]
    fn test_session_id() {
        let id = session_id();
        assert!(!id.is_empty());
        assert!(Uuid::parse_str(id).is_ok());
    }
}
