use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequestParts, Path as AxumPath};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;

use super::sanitize_error_message;
use crate::handler::{Error, ErrorKind};

/// Path parameter extractor that rejects with the error envelope.
///
/// Every route parameter of this service is a UUID, so a parameter that fails
/// to deserialize is reported as [`ErrorKind::MalformedId`] on field `id`.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Path<T>(pub T);

impl<T> Path<T> {
    /// Creates a new instance of [`Path`].
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Returns the inner path parameters.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let extractor =
            <AxumPath<T> as FromRequestParts<S>>::from_request_parts(parts, state).await;
        extractor.map(|x| Self(x.0)).map_err(Into::into)
    }
}

impl From<PathRejection> for Error<'static> {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(err) => ErrorKind::MalformedId
                .with_field("id")
                .with_context(format!(
                    "path parameter deserialization failed: {}",
                    sanitize_error_message(&err.body_text())
                )),
            PathRejection::MissingPathParams(err) => ErrorKind::InternalServerError
                .with_context(format!(
                    "route is missing its path parameters: {}",
                    sanitize_error_message(&err.body_text())
                )),
            other => ErrorKind::InternalServerError
                .with_context(format!("unexpected path rejection: {other:?}")),
        }
    }
}
