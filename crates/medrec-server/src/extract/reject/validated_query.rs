use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use validator::Validate;

use super::Query;
use crate::handler::Error;

/// Query string extractor that validates the parameters after deserializing them.
///
/// Both failure modes are parameter validation errors and share
/// [`ErrorKind::Validation`].
///
/// [`ErrorKind::Validation`]: crate::handler::ErrorKind::Validation
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct ValidateQuery<T>(pub T);

impl<T> ValidateQuery<T> {
    /// Creates a new instance of [`ValidateQuery`].
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Returns the inner validated parameters.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequestParts<S> for ValidateQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = <Query<T> as FromRequestParts<S>>::from_request_parts(parts, state).await?;

        params.validate()?;
        Ok(Self::new(params))
    }
}
