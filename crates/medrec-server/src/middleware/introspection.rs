//! Unmasking of failures on introspection routes.
//!
//! Server failures normally answer with a generic message. Introspection
//! routes exist to report what is wrong, so their 5xx envelopes are rebuilt
//! around the [`FailureDetail`] the error left in the response extensions.

use axum::Router;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::{Next, from_fn};
use axum::response::{IntoResponse, Response};

use super::RouteCategory;
use crate::handler::{ErrorDetail, ErrorResponse, FailureDetail};

/// Tracing target for introspection unmasking.
const TRACING_TARGET: &str = "medrec_server::middleware::introspection";

/// Extension trait for `axum::`[`Router`] to unmask introspection failures.
pub trait RouterIntrospectionExt<S> {
    /// Layers [`unmask_introspection_failures`].
    fn with_introspection(self) -> Self;
}

impl<S> RouterIntrospectionExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_introspection(self) -> Self {
        self.layer(from_fn(unmask_introspection_failures))
    }
}

/// Replaces the generic message of a 5xx introspection response with its
/// underlying failure detail.
pub async fn unmask_introspection_failures(request: Request, next: Next) -> Response {
    let category = RouteCategory::from_uri(request.uri());
    let response = next.run(request).await;

    let status = response.status();
    if !category.is_introspection() || !status.is_server_error() {
        return response;
    }

    let Some(FailureDetail(detail)) = response.extensions().get::<FailureDetail>().cloned() else {
        return response;
    };

    tracing::debug!(
        target: TRACING_TARGET,
        status = status.as_u16(),
        "exposing failure detail on introspection route"
    );

    let template = match status {
        StatusCode::SERVICE_UNAVAILABLE => ErrorResponse::SERVICE_UNAVAILABLE,
        _ => ErrorResponse::INTERNAL_SERVER_ERROR,
    };

    let mut unmasked = template.with_detail(ErrorDetail::new(detail)).into_response();
    *unmasked.status_mut() = status;
    unmasked
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::get;
    use serde_json::{Value, json};

    use super::*;
    use crate::handler::ErrorKind;
    use crate::handler::test::create_test_server_with_router;
    use crate::middleware::{RecoveryConfig, RouterRecoveryExt};

    async fn masked() -> ErrorKind {
        ErrorKind::InternalServerError
    }

    async fn failing() -> crate::handler::Error<'static> {
        ErrorKind::InternalServerError.with_context("disk quota exceeded")
    }

    async fn panics() -> &'static str {
        panic!("pool poisoned")
    }

    fn router() -> Router<crate::service::ServiceState> {
        crate::handler::routes()
            .route("/monitors/failing", get(failing))
            .route("/monitors/panic", get(panics))
            .route("/monitors/masked", get(masked))
            .route("/v1/failing", get(failing))
            .with_recovery(&RecoveryConfig::default())
            .with_introspection()
    }

    #[tokio::test]
    async fn introspection_failures_are_unmasked() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| router()).await?;

        let response = server.get("/monitors/failing").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<Value>()["errors"],
            json!([{ "mensaje": "disk quota exceeded" }])
        );

        let response = server.get("/monitors/panic").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<Value>()["errors"][0]["mensaje"],
            "handler panicked: pool poisoned"
        );

        let response = server.get("/monitors/health").await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let envelope = response.json::<Value>();
        assert_eq!(envelope["error"], "Servicio no disponible");
        assert_ne!(
            envelope["errors"][0]["mensaje"],
            "El servicio no está disponible en este momento."
        );
        Ok(())
    }

    #[tokio::test]
    async fn other_failures_stay_masked() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| router()).await?;
        let generic = json!([{ "mensaje": "Ocurrió un error inesperado. Contacte con soporte." }]);

        let response = server.get("/v1/failing").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.json::<Value>()["errors"], generic);

        let response = server.get("/monitors/masked").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.json::<Value>()["errors"], generic);
        Ok(())
    }
}
