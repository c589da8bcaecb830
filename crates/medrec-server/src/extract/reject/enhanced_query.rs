use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRequestParts, Query as AxumQuery};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;

use super::sanitize_error_message;
use crate::handler::{Error, ErrorKind};

/// Tracing target for query string extraction.
const TRACING_TARGET: &str = "medrec_server::extract::query";

/// Query string extractor that rejects with the error envelope.
///
/// A query string that does not deserialize, such as `limit=abc`, is a
/// parameter validation failure and becomes [`ErrorKind::Validation`].
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Query<T>(pub T);

impl<T> Query<T> {
    /// Creates a new [`Query`] wrapper around the provided query parameters.
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Consumes the wrapper and returns the inner query parameters.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AxumQuery::<T>::from_request_parts(parts, state).await {
            Ok(AxumQuery(query)) => Ok(Query(query)),
            Err(rejection) => Err(rejection.into()),
        }
    }
}

impl From<QueryRejection> for Error<'static> {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(
            target: TRACING_TARGET,
            error = %rejection,
            "query string parsing failed"
        );

        match rejection {
            QueryRejection::FailedToDeserializeQueryString(err) => ErrorKind::Validation
                .with_message("Los parámetros de la consulta no tienen un formato válido.")
                .with_context(sanitize_error_message(&err.body_text())),
            other => ErrorKind::BadRequest
                .with_context(format!("unexpected query rejection: {other:?}")),
        }
    }
}
