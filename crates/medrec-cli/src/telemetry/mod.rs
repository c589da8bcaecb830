//! Tracing subscriber setup.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::TelemetryConfig;

/// Initializes the global tracing subscriber.
///
/// The filter comes from `RUST_LOG`, then from the configured fallback.
///
/// ```bash
/// RUST_LOG=debug medrec
/// RUST_LOG=medrec_server=trace,tower_http=debug medrec --log-json
/// ```
///
/// # Errors
///
/// Returns an error if the filter directives are invalid or a global
/// subscriber is already installed.
pub(crate) fn init_tracing(config: &TelemetryConfig) -> anyhow::Result<()> {
    let env_filter = create_env_filter(config)?;

    let (plain_layer, json_layer) = if config.log_json {
        let layer = fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false);
        (None, Some(layer))
    } else {
        let layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true);
        (Some(layer), None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(plain_layer)
        .with(json_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    Ok(())
}

fn create_env_filter(config: &TelemetryConfig) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.fallback_filter()))
        .map_err(|e| anyhow::anyhow!("Failed to create env filter: {e}"))
}
