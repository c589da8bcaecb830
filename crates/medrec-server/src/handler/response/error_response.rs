use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use jiff::Timestamp;
use serde::{Serialize, Serializer};

/// One entry of the `errors` list.
///
/// Keys are serialized in Spanish to match the rest of the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail<'a> {
    /// API field the entry refers to.
    #[serde(rename = "campo", skip_serializing_if = "Option::is_none")]
    pub field: Option<Cow<'a, str>>,
    /// Human-readable description, always present.
    #[serde(rename = "mensaje")]
    pub message: Cow<'a, str>,
    /// Offending value, when known.
    #[serde(rename = "valor", skip_serializing_if = "Option::is_none")]
    pub value: Option<Cow<'a, str>>,
    /// Requested resource, for unrouted paths.
    #[serde(rename = "recurso", skip_serializing_if = "Option::is_none")]
    pub resource: Option<Cow<'a, str>>,
}

impl<'a> ErrorDetail<'a> {
    /// Creates an entry with only a message.
    pub fn new(message: impl Into<Cow<'a, str>>) -> Self {
        Self {
            field: None,
            message: message.into(),
            value: None,
            resource: None,
        }
    }

    /// Sets the field.
    pub fn with_field(mut self, field: impl Into<Cow<'a, str>>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Sets the offending value.
    pub fn with_value(mut self, value: impl Into<Cow<'a, str>>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the requested resource.
    pub fn with_resource(mut self, resource: impl Into<Cow<'a, str>>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Converts into an owned entry.
    pub fn into_static(self) -> ErrorDetail<'static> {
        ErrorDetail {
            field: self.field.map(|f| Cow::Owned(f.into_owned())),
            message: Cow::Owned(self.message.into_owned()),
            value: self.value.map(|v| Cow::Owned(v.into_owned())),
            resource: self.resource.map(|r| Cow::Owned(r.into_owned())),
        }
    }
}

/// The error envelope returned for every failed request.
///
/// ```json
/// { "timestamp": "...", "status": 404, "error": "Recurso no encontrado", "errors": [ ... ] }
/// ```
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse<'a> {
    /// Moment the response was produced; set when the response is sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
    /// HTTP status code, serialized as a number.
    #[serde(serialize_with = "serialize_status")]
    pub status: StatusCode,
    /// Category label.
    pub error: Cow<'a, str>,
    /// Entries describing the failure; never empty once sent.
    pub errors: Vec<ErrorDetail<'a>>,
    /// Default message for the single entry of a bare response.
    #[serde(skip)]
    pub message: Cow<'a, str>,
    /// Internal detail; logged, never serialized.
    #[serde(skip)]
    pub context: Option<Cow<'a, str>>,
}

impl<'a> ErrorResponse<'a> {
    pub const BAD_REQUEST: Self = Self::new(
        "Solicitud incorrecta",
        "La solicitud no es válida.",
        StatusCode::BAD_REQUEST,
    );
    pub const CONFLICT: Self = Self::new(
        "Violación de restricciones",
        "Se ha producido un error al procesar los datos. \
         Por favor, verifique la información e intente nuevamente.",
        StatusCode::CONFLICT,
    );
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "Error interno del servidor",
        "Ocurrió un error inesperado. Contacte con soporte.",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const MALFORMED_ID: Self = Self::new(
        "Solicitud incorrecta",
        "El ID proporcionado no tiene un formato válido de UUID.",
        StatusCode::BAD_REQUEST,
    );
    pub const NOT_FOUND: Self = Self::new(
        "Recurso no encontrado",
        "El recurso solicitado no existe",
        StatusCode::NOT_FOUND,
    );
    pub const SERVICE_UNAVAILABLE: Self = Self::new(
        "Servicio no disponible",
        "El servicio no está disponible en este momento.",
        StatusCode::SERVICE_UNAVAILABLE,
    );
    pub const VALIDATION: Self = Self::new(
        "Errores de validación",
        "Los datos enviados no son válidos.",
        StatusCode::BAD_REQUEST,
    );

    /// Creates a new error response without entries.
    #[inline]
    pub const fn new(label: &'a str, message: &'a str, status: StatusCode) -> Self {
        Self {
            timestamp: None,
            status,
            error: Cow::Borrowed(label),
            errors: Vec::new(),
            message: Cow::Borrowed(message),
            context: None,
        }
    }

    /// Appends an entry.
    pub fn with_detail(mut self, detail: ErrorDetail<'a>) -> Self {
        self.errors.push(detail);
        self
    }

    /// Appends several entries.
    pub fn with_details(mut self, details: impl IntoIterator<Item = ErrorDetail<'a>>) -> Self {
        self.errors.extend(details);
        self
    }

    /// Attaches context to the error response.
    /// If context already exists, it merges them with a separator.
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        let new_context = context.into();
        self.context = Some(match self.context {
            Some(existing) => Cow::Owned(format!("{}; {}", existing, new_context)),
            None => new_context,
        });
        self
    }

    /// Stamps the response and guarantees at least one entry.
    pub fn finalize(mut self) -> Self {
        if self.errors.is_empty() {
            self.errors.push(ErrorDetail::new(self.message.clone()));
        }

        self.timestamp.get_or_insert_with(Timestamp::now);
        self
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    #[inline]
    fn into_response(self) -> Response {
        let response = self.finalize();
        (response.status, Json(response)).into_response()
    }
}

fn serialize_status<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u16(status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalized_response_has_an_entry_and_timestamp() {
        let response = ErrorResponse::NOT_FOUND.finalize();
        assert!(response.timestamp.is_some());
        assert_eq!(response.errors, vec![ErrorDetail::new("El recurso solicitado no existe")]);
    }

    #[test]
    fn explicit_entries_replace_the_default_message() {
        let response = ErrorResponse::VALIDATION
            .with_detail(ErrorDetail::new("El email no puede estar vacío").with_field("email"))
            .finalize();

        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].field.as_deref(), Some("email"));
    }

    #[test]
    fn envelope_serialization() {
        let response = ErrorResponse::CONFLICT
            .with_detail(
                ErrorDetail::new("El valor ya existe en la base de datos.")
                    .with_field("email")
                    .with_value("x@y.com"),
            )
            .with_context("duplicate key value")
            .finalize();

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], 409);
        assert_eq!(json["error"], "Violación de restricciones");
        assert_eq!(json["errors"][0]["campo"], "email");
        assert_eq!(json["errors"][0]["valor"], "x@y.com");
        assert!(json["timestamp"].is_string());

        // Internal context and the default message stay private.
        assert!(json.get("context").is_none());
        assert!(json.get("message").is_none());
        assert!(json["errors"][0].get("recurso").is_none());
    }
}
