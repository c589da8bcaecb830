//! Observability middleware: request ids and per-request trace spans.

use axum::Router;
use axum::extract::Request;
use axum::http::header::{self, HeaderName};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;

use super::RouteCategory;

/// Header carrying the request id, generated when the client sends none.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Extension trait for `axum::`[`Router`] to apply observability middleware.
pub trait RouterObservabilityExt<S> {
    /// Layers request id generation and propagation, a trace span per request
    /// carrying that id, and redaction of sensitive headers.
    fn with_observability(self) -> Self;
}

impl<S> RouterObservabilityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_observability(self) -> Self {
        let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

        self.layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(SetSensitiveRequestHeadersLayer::new([
                header::AUTHORIZATION,
                header::COOKIE,
            ]))
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
    }
}

fn make_request_span(request: &Request) -> tracing::Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        category = RouteCategory::from_uri(request.uri()).as_str(),
        request_id = %request_id,
    )
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::http::HeaderValue;
    use axum::routing::get;
    use axum_test::TestServer;

    use super::*;

    #[tokio::test]
    async fn request_ids_are_generated_and_propagated() -> anyhow::Result<()> {
        let app = Router::new()
            .route("/ping", get(|| async { "pong" }))
            .with_observability();
        let server = TestServer::new(app)?;
        let header = HeaderName::from_static(REQUEST_ID_HEADER);

        let response = server.get("/ping").await;
        let generated = response.header(header.clone());
        assert!(!generated.is_empty());

        let response = server
            .get("/ping")
            .add_header(header.clone(), HeaderValue::from_static("trace-123"))
            .await;
        assert_eq!(response.header(header), HeaderValue::from_static("trace-123"));
        Ok(())
    }
}
