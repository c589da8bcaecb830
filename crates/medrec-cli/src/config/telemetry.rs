//! Logging configuration.

use clap::Args;
use serde::{Deserialize, Serialize};

/// Controls how log records are filtered and rendered.
///
/// `RUST_LOG` always wins over `--log-filter`; without either the filter is
/// `info`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Args)]
pub struct TelemetryConfig {
    /// Emits log records as JSON lines instead of human-readable text.
    #[arg(long, env = "LOG_JSON")]
    #[serde(default)]
    pub log_json: bool,

    /// Fallback filter directives, e.g. `info,medrec_server=debug`.
    #[arg(long, env = "LOG_FILTER")]
    pub log_filter: Option<String>,
}

impl TelemetryConfig {
    /// Default filter directives.
    pub const DEFAULT_FILTER: &'static str = "info";

    /// Returns the filter directives used when `RUST_LOG` is unset.
    pub fn fallback_filter(&self) -> &str {
        self.log_filter
            .as_deref()
            .filter(|filter| !filter.trim().is_empty())
            .unwrap_or(Self::DEFAULT_FILTER)
    }
}
