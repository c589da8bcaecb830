#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;
mod telemetry;

use std::process;

use anyhow::Context;
use axum::Router;
use medrec_server::handler::routes;
use medrec_server::middleware::{
    RouterIntrospectionExt, RouterObservabilityExt, RouterRecoveryExt,
};
use medrec_server::service::{ServiceConfig, ServiceState};

use crate::config::{Cli, MiddlewareConfig};
use crate::server::ServerError;

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "medrec_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "medrec_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "medrec_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        match error.downcast_ref::<ServerError>() {
            Some(server_error) => tracing::error!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                error = %server_error,
                error_code = server_error.error_code(),
                suggestion = server_error.suggestion(),
                "server terminated with error"
            ),
            None => tracing::error!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                error = format!("{error:#}"),
                "application terminated with error"
            ),
        }
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    telemetry::init_tracing(&cli.telemetry)?;
    cli.log();
    cli.validate()?;

    let state = create_service_state(&cli.service).await?;
    let router = create_router(state, &cli.middleware);

    server::serve(router, cli.server).await?;

    Ok(())
}

/// Creates the service state from configuration.
async fn create_service_state(config: &ServiceConfig) -> anyhow::Result<ServiceState> {
    ServiceState::from_config(config)
        .await
        .context("failed to create service state")
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Observability (outermost) - request ids and tracing spans
/// 2. Introspection - unmasks failures on monitor routes
/// 3. Recovery - catches panics and enforces timeouts
/// 4. Routes (innermost) - actual request handlers
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    routes()
        .with_recovery(&middleware.recovery)
        .with_introspection()
        .with_observability()
        .with_state(state)
}
