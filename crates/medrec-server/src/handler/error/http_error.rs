//! HTTP error handling with builder pattern for dynamic error responses.

use std::borrow::Cow;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::handler::response::{ErrorDetail, ErrorResponse};

/// Tracing target for error responses.
const TRACING_TARGET: &str = "medrec_server::handler::error";

/// Underlying failure detail of a 5xx response.
///
/// Stored in the response extensions so that introspection routes can expose
/// it instead of the generic message.
#[derive(Debug, Clone)]
pub struct FailureDetail(pub String);

/// The error type for HTTP handlers in the server.
///
/// A response carries either the explicit [`ErrorDetail`] entries attached to
/// the error, or one entry built from its field, message and resource.
#[derive(Clone)]
#[must_use = "errors do nothing unless serialized"]
pub struct Error<'a> {
    kind: ErrorKind,
    context: Option<Cow<'a, str>>,
    message: Option<Cow<'a, str>>,
    field: Option<Cow<'a, str>>,
    resource: Option<Cow<'a, str>>,
    details: Vec<ErrorDetail<'a>>,
}

impl Error<'static> {
    /// Creates a new [`Error`] with the specified kind.
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
            message: None,
            field: None,
            resource: None,
            details: Vec::new(),
        }
    }
}

impl<'a> Error<'a> {
    /// Attaches internal context; it is logged and never sent to clients.
    #[inline]
    pub fn with_context(self, context: impl Into<Cow<'a, str>>) -> Self {
        Self {
            context: Some(context.into()),
            ..self
        }
    }

    /// Replaces the kind's default message.
    #[inline]
    pub fn with_message(self, message: impl Into<Cow<'a, str>>) -> Self {
        Self {
            message: Some(message.into()),
            ..self
        }
    }

    /// Sets the field the error refers to.
    #[inline]
    pub fn with_field(self, field: impl Into<Cow<'a, str>>) -> Self {
        Self {
            field: Some(field.into()),
            ..self
        }
    }

    /// Sets the resource that caused the error.
    #[inline]
    pub fn with_resource(self, resource: impl Into<Cow<'a, str>>) -> Self {
        Self {
            resource: Some(resource.into()),
            ..self
        }
    }

    /// Appends explicit entries; when present they replace the single entry.
    #[inline]
    pub fn with_details(mut self, details: impl IntoIterator<Item = ErrorDetail<'a>>) -> Self {
        self.details.extend(details);
        self
    }

    /// Returns the error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the context if present.
    #[inline]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Returns the custom message if present.
    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the field if present.
    #[inline]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns the resource if present.
    #[inline]
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// Returns the explicit entries.
    #[inline]
    pub fn details(&self) -> &[ErrorDetail<'a>] {
        &self.details
    }

    /// Converts this error into a static version by cloning all borrowed data.
    pub fn into_static(self) -> Error<'static> {
        Error {
            kind: self.kind,
            context: self.context.map(|c| Cow::Owned(c.into_owned())),
            message: self.message.map(|m| Cow::Owned(m.into_owned())),
            field: self.field.map(|f| Cow::Owned(f.into_owned())),
            resource: self.resource.map(|r| Cow::Owned(r.into_owned())),
            details: self.details.into_iter().map(ErrorDetail::into_static).collect(),
        }
    }

    /// Builds the envelope for this error.
    pub fn into_error_response(self) -> ErrorResponse<'a> {
        let mut response: ErrorResponse<'a> = self.kind.response();

        if let Some(context) = self.context {
            response = response.with_context(context);
        }

        if !self.details.is_empty() {
            return response.with_details(self.details);
        }

        if self.message.is_none() && self.field.is_none() && self.resource.is_none() {
            return response;
        }

        let mut detail = ErrorDetail::new(self.message.unwrap_or(response.message.clone()));
        if let Some(field) = self.field.or_else(|| self.kind.default_field().map(Cow::Borrowed)) {
            detail = detail.with_field(field);
        }
        if let Some(resource) = self.resource {
            detail = detail.with_resource(resource);
        }

        response.with_detail(detail)
    }
}

impl Default for Error<'static> {
    #[inline]
    fn default() -> Self {
        Self::new(ErrorKind::default())
    }
}

impl fmt::Debug for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let response = self.kind.response();

        let mut debug_struct = f.debug_struct("Error");
        debug_struct
            .field("kind", &self.kind)
            .field("label", &response.error)
            .field("status", &response.status);

        if let Some(ref context) = self.context {
            debug_struct.field("context", context);
        }

        if let Some(ref message) = self.message {
            debug_struct.field("custom_message", message);
        }

        if let Some(ref field) = self.field {
            debug_struct.field("field", field);
        }

        if let Some(ref resource) = self.resource {
            debug_struct.field("resource", resource);
        }

        if !self.details.is_empty() {
            debug_struct.field("details", &self.details.len());
        }

        debug_struct.finish()
    }
}

impl fmt::Display for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let response = self.kind.response();
        let message = self.message.as_deref().unwrap_or(response.message.as_ref());

        write!(f, "{} ({}): {}", response.error, response.status.as_u16(), message)?;

        if let Some(ref field) = self.field {
            write!(f, " [field: {}]", field)?;
        }

        if let Some(ref context) = self.context {
            write!(f, " - {}", context)?;
        }

        if let Some(ref resource) = self.resource {
            write!(f, " [resource: {}]", resource)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error<'_> {}

impl IntoResponse for Error<'_> {
    fn into_response(self) -> Response {
        let kind = self.kind;
        let response = self.into_error_response();
        let status = response.status;
        let detail = response
            .context
            .as_deref()
            .map(str::to_owned)
            .or_else(|| response.errors.first().map(|e| e.message.to_string()));

        if status.is_server_error() {
            tracing::error!(
                target: TRACING_TARGET,
                kind = ?kind,
                status = status.as_u16(),
                context = detail.as_deref().unwrap_or_default(),
                "request failed"
            );
        } else {
            tracing::warn!(
                target: TRACING_TARGET,
                kind = ?kind,
                status = status.as_u16(),
                entries = response.errors.len(),
                "request rejected"
            );
        }

        let mut http_response = response.into_response();
        if status.is_server_error()
            && let Some(detail) = detail
        {
            http_response.extensions_mut().insert(FailureDetail(detail));
        }

        http_response
    }
}

impl From<ErrorKind> for Error<'static> {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// A specialized [`Result`] type for HTTP operations.
///
/// [`Result`]: std::result::Result
pub type Result<T, E = Error<'static>> = std::result::Result<T, E>;

/// Every kind of failure a request can end in.
#[must_use = "error kinds do nothing unless used to create errors"]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // 4xx Client Errors
    /// 400 - Request body or query failed validation
    Validation,
    /// 400 - Request could not be read
    BadRequest,
    /// 400 - Identifier is not a UUID
    MalformedId,
    /// 404 - Resource not found
    NotFound,
    /// 409 - A storage rule rejected the write
    Conflict,

    // 5xx Server Errors
    /// 500 - Unexpected server error
    #[default]
    InternalServerError,
    /// 503 - A dependency is unreachable
    ServiceUnavailable,
}

impl ErrorKind {
    /// Converts this error kind into a full [`Error`].
    #[inline]
    pub fn into_error(self) -> Error<'static> {
        Error::new(self)
    }

    /// Creates an [`Error`] with the specified context.
    #[inline]
    pub fn with_context<'a>(self, context: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_context(context)
    }

    /// Creates an [`Error`] with the specified message.
    #[inline]
    pub fn with_message<'a>(self, message: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_message(message)
    }

    /// Creates an [`Error`] for the specified field.
    #[inline]
    pub fn with_field<'a>(self, field: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_field(field)
    }

    /// Creates an [`Error`] with the specified resource.
    #[inline]
    pub fn with_resource<'a>(self, resource: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_resource(resource)
    }

    /// Returns the HTTP status code for this error kind.
    #[inline]
    pub fn status_code(self) -> StatusCode {
        self.response().status
    }

    /// Field reported when none is given explicitly.
    fn default_field(self) -> Option<&'static str> {
        match self {
            Self::MalformedId => Some("id"),
            _ => None,
        }
    }

    /// Returns the envelope template for this error kind.
    #[inline]
    pub fn response(self) -> ErrorResponse<'static> {
        match self {
            Self::Validation => ErrorResponse::VALIDATION,
            Self::BadRequest => ErrorResponse::BAD_REQUEST,
            Self::MalformedId => ErrorResponse::MALFORMED_ID,
            Self::NotFound => ErrorResponse::NOT_FOUND,
            Self::Conflict => ErrorResponse::CONFLICT,
            Self::InternalServerError => ErrorResponse::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => ErrorResponse::SERVICE_UNAVAILABLE,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.response().error)
    }
}

impl IntoResponse for ErrorKind {
    #[inline]
    fn into_response(self) -> Response {
        Error::new(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_http_error() {
        let error = Error::default();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert_eq!(error.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn every_kind_has_its_status() {
        let expected = [
            (ErrorKind::Validation, 400),
            (ErrorKind::BadRequest, 400),
            (ErrorKind::MalformedId, 400),
            (ErrorKind::NotFound, 404),
            (ErrorKind::Conflict, 409),
            (ErrorKind::InternalServerError, 500),
            (ErrorKind::ServiceUnavailable, 503),
        ];

        for (kind, status) in expected {
            assert_eq!(kind.status_code().as_u16(), status, "{kind:?}");
            assert!(!kind.response().error.is_empty());
        }
    }

    #[test]
    fn bare_error_uses_the_default_message() {
        let response = ErrorKind::InternalServerError.into_error().into_error_response().finalize();
        assert_eq!(response.errors.len(), 1);
        assert_eq!(
            response.errors[0].message,
            "Ocurrió un error inesperado. Contacte con soporte."
        );
        assert_eq!(response.errors[0].field, None);
    }

    #[test]
    fn malformed_id_names_the_id_field() {
        let response = ErrorKind::MalformedId.into_error().into_error_response().finalize();
        assert_eq!(response.errors[0].field.as_deref(), Some("id"));
        assert_eq!(
            response.errors[0].message,
            "El ID proporcionado no tiene un formato válido de UUID."
        );
    }

    #[test]
    fn error_builder_chaining() {
        let error = ErrorKind::NotFound
            .with_message("Paciente no encontrado con id: 42")
            .with_field("id")
            .with_context("lookup by id");

        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.message(), Some("Paciente no encontrado con id: 42"));
        assert_eq!(error.field(), Some("id"));
        assert_eq!(error.context(), Some("lookup by id"));

        let response = error.into_error_response();
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].field.as_deref(), Some("id"));
    }

    #[test]
    fn explicit_details_win() {
        let error = ErrorKind::Validation
            .with_message("ignored")
            .with_details([
                ErrorDetail::new("El nombre no puede estar vacío").with_field("firstName"),
                ErrorDetail::new("Formato de email inválido").with_field("email"),
            ]);

        let response = error.into_error_response();
        assert_eq!(response.errors.len(), 2);
        assert_eq!(response.errors[1].field.as_deref(), Some("email"));
    }

    #[test]
    fn server_errors_carry_their_detail() {
        let response = ErrorKind::InternalServerError
            .with_context("connection refused")
            .into_response();

        let detail = response.extensions().get::<FailureDetail>();
        assert_eq!(detail.map(|d| d.0.as_str()), Some("connection refused"));

        let response = ErrorKind::NotFound.with_context("missing").into_response();
        assert!(response.extensions().get::<FailureDetail>().is_none());
    }

    #[test]
    fn std_fmt_display() {
        let error = ErrorKind::NotFound
            .with_message("Paciente no encontrado")
            .with_resource("/v1/patients/1")
            .with_context("ID: 1");

        let display = error.to_string();
        assert!(display.contains("Recurso no encontrado"));
        assert!(display.contains("404"));
        assert!(display.contains("Paciente no encontrado"));
        assert!(display.contains("ID: 1"));
        assert!(display.contains("/v1/patients/1"));
    }

    #[test]
    fn error_into_static() {
        let message = String::from("Test message");
        let error = ErrorKind::Conflict.with_message(message.as_str()).into_static();
        assert_eq!(error.message(), Some("Test message"));
    }
}
