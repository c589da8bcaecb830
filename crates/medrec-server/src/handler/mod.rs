//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use medrec_server::handler::routes;
//! use medrec_server::service::{ServiceConfig, ServiceState};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServiceConfig::default();
//! let state = ServiceState::from_config(&config).await?;
//! let router: axum::Router = routes().with_state(state);
//! # Ok(())
//! # }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod error;
mod monitors;
mod patients;
mod request;
mod response;

use axum::Router;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, FailureDetail, Result};
pub use crate::handler::request::{Pagination, PatientPathParams, PatientRequest};
pub use crate::handler::response::{
    ErrorDetail, ErrorResponse, MonitorStatus, PatientResponse, PatientsResponse,
};
use crate::service::ServiceState;

/// Answers every unrouted request.
///
/// Browsers probe for `favicon.ico` on their own; those probes get an empty 404.
async fn fallback(uri: Uri) -> Response {
    let path = uri.path();
    if path.ends_with("/favicon.ico") {
        return StatusCode::NOT_FOUND.into_response();
    }

    ErrorKind::NotFound
        .with_resource(path.to_owned())
        .into_response()
}

/// Returns a [`Router`] with all routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .merge(patients::routes())
        .merge(monitors::routes())
        .fallback(fallback)
}
