//! Validated JSON extractor.
//!
//! [`ValidateJson`] deserializes with [`Json`] and then runs
//! [`validator::Validate`]; failures are reported as one envelope entry per
//! failing field.

use axum::extract::{FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use super::Json;
use crate::handler::{Error, ErrorDetail, ErrorKind};

/// JSON extractor that validates the body after deserializing it.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct ValidateJson<T>(pub T);

impl<T> ValidateJson<T> {
    /// Creates a new instance of [`ValidateJson`].
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Returns the inner validated value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;

        data.validate()?;
        Ok(Self::new(data))
    }
}

impl From<ValidationErrors> for Error<'static> {
    /// Reports the first message of every failing field, ordered by field name.
    fn from(errors: ValidationErrors) -> Self {
        let mut details: Vec<ErrorDetail<'static>> = errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, errors)| {
                let error = errors.first()?;
                Some(ErrorDetail::new(validation_message(error)).with_field(to_camel_case(&field)))
            })
            .collect();

        details.sort_by(|a, b| a.field.cmp(&b.field));

        ErrorKind::Validation
            .into_error()
            .with_context(errors.to_string())
            .with_details(details)
    }
}

fn validation_message(error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => match error.code.as_ref() {
            "required" => "El campo es obligatorio".to_owned(),
            "range" => "El valor está fuera del rango permitido".to_owned(),
            "email" => "Formato de email inválido".to_owned(),
            _ => "El valor no es válido".to_owned(),
        },
    }
}

/// Converts a struct field name into the camelCase name clients send.
pub(crate) fn to_camel_case(field: &str) -> String {
    let mut camel = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = !camel.is_empty();
        } else if upper {
            camel.extend(c.to_uppercase());
            upper = false;
        } else {
            camel.push(c);
        }
    }

    camel
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, header};

    use super::*;
    use crate::handler::PatientRequest;

    #[test]
    fn field_names_become_camel_case() {
        assert_eq!(to_camel_case("first_name"), "firstName");
        assert_eq!(to_camel_case("emergency_contact_phone2"), "emergencyContactPhone2");
        assert_eq!(to_camel_case("email"), "email");
    }

    #[tokio::test]
    async fn invalid_body_reports_each_field() {
        let body = serde_json::json!({
            "lastName": "Ruiz",
            "birthDate": "1985-02-28",
            "gender": "Z",
            "phone": "+34600111222",
            "email": "ana@example.com",
            "address": "Calle Mayor 1",
            "city": "Madrid",
            "country": "España",
            "postalCode": "28001"
        });

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let error = ValidateJson::<PatientRequest>::from_request(request, &())
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Validation);
        let fields: Vec<_> = error.details().iter().filter_map(|d| d.field.as_deref()).collect();
        assert_eq!(fields, vec!["firstName", "gender"]);
        assert_eq!(error.details()[0].message, "El nombre no puede estar vacío");
        assert_eq!(error.details()[1].message, "El género debe ser M, F, O, NB o X");
    }
}
