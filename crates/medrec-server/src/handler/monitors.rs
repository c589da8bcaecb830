//! Health monitoring handlers.
//!
//! Responses from these routes are introspection output: failures keep their
//! underlying detail instead of the generic message.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use jiff::Timestamp;
use medrec_postgres::PgClient;

use crate::extract::Json;
use crate::handler::response::MonitorStatus;
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "medrec_server::handler::monitors";

/// Pings the database and reports pool statistics.
#[tracing::instrument(skip_all)]
async fn health_status(
    State(pg_client): State<PgClient>,
) -> Result<(StatusCode, Json<MonitorStatus>)> {
    if let Err(error) = pg_client.ping().await {
        tracing::warn!(
            target: TRACING_TARGET,
            error = %error,
            "database health check failed"
        );

        return Err(ErrorKind::ServiceUnavailable.with_context(error.to_string()));
    }

    let response = MonitorStatus {
        is_healthy: true,
        checked_at: Timestamp::now(),
        pool: pg_client.pool_status(),
    };

    tracing::debug!(
        target: TRACING_TARGET,
        pool_size = response.pool.size,
        pool_available = response.pool.available,
        "database health check passed"
    );

    Ok((StatusCode::OK, Json(response)))
}

/// Returns a [`Router`] with all health monitoring routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/monitors/health", get(health_status))
}
