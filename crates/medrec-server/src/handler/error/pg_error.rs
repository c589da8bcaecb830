//! Database error to HTTP error conversion.
//!
//! Integrity violations are described field by field through the
//! [`ViolationClassifier`]; every other database failure becomes a generic
//! internal error whose detail is kept as context.

use medrec_postgres::{PgError, ViolationClassifier, ViolationEntry, ViolationReport};

use crate::handler::response::ErrorDetail;
use crate::handler::{Error, ErrorKind};

/// Tracing target for database error conversions.
const TRACING_TARGET: &str = "medrec_server::handler::postgres";

impl From<ViolationEntry> for ErrorDetail<'static> {
    fn from(entry: ViolationEntry) -> Self {
        let detail = ErrorDetail::new(entry.message).with_field(entry.field.into_string());
        match entry.value {
            Some(value) => detail.with_value(value),
            None => detail,
        }
    }
}

impl From<ViolationReport> for Error<'static> {
    fn from(report: ViolationReport) -> Self {
        ErrorKind::Conflict
            .into_error()
            .with_details(report.into_iter().map(ErrorDetail::from))
    }
}

impl From<PgError> for Error<'static> {
    fn from(error: PgError) -> Self {
        if error.is_integrity_violation()
            && let Some(raw) = error.raw_failure()
        {
            let category = error
                .constraint_violation()
                .map(|constraint| constraint.categorize());
            tracing::warn!(
                target: TRACING_TARGET,
                constraint = error.constraint().unwrap_or_default(),
                category = ?category,
                failure = %raw.first_line(),
                "write rejected by a data rule"
            );

            let report = ViolationClassifier::new().classify(&raw);
            return Error::from(report).with_context(raw.into_string());
        }

        match error {
            PgError::Config(ref config_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %config_error,
                    "database configuration error"
                );
            }
            PgError::Timeout(ref timeout) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    timeout = ?timeout,
                    "database timeout"
                );
            }
            PgError::Connection(ref connection_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %connection_error,
                    "database connection error"
                );
            }
            PgError::Migration(ref migration_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %migration_error,
                    "database migration error"
                );
            }
            PgError::Query(ref query_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %query_error,
                    "query error"
                );
            }
            PgError::Unexpected(ref unexpected_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %unexpected_error,
                    "unexpected database error"
                );
            }
        }

        ErrorKind::InternalServerError.with_context(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

    use super::*;

    struct Info {
        message: &'static str,
        details: Option<&'static str>,
        constraint: Option<&'static str>,
    }

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.message
        }

        fn details(&self) -> Option<&str> {
            self.details
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            Some("patients")
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, info: Info) -> PgError {
        PgError::Query(DieselError::DatabaseError(kind, Box::new(info)))
    }

    #[test]
    fn unique_violation_becomes_conflict_with_value() {
        let error = Error::from(database_error(
            DatabaseErrorKind::UniqueViolation,
            Info {
                message: r#"duplicate key value violates unique constraint "patients_email_key""#,
                details: Some("Key (email)=(x@y.com) already exists."),
                constraint: Some("patients_email_key"),
            },
        ));

        assert_eq!(error.kind(), ErrorKind::Conflict);
        assert_eq!(error.details().len(), 1);
        assert_eq!(error.details()[0].field.as_deref(), Some("email"));
        assert_eq!(error.details()[0].value.as_deref(), Some("x@y.com"));
        assert_eq!(
            error.details()[0].message,
            "El valor ya existe en la base de datos."
        );
    }

    #[test]
    fn check_violation_uses_curated_message() {
        let error = Error::from(database_error(
            DatabaseErrorKind::CheckViolation,
            Info {
                message: r#"new row for relation "patients" violates check constraint "patients_first_name_check""#,
                details: None,
                constraint: Some("patients_first_name_check"),
            },
        ));

        assert_eq!(error.kind(), ErrorKind::Conflict);
        assert_eq!(error.details()[0].field.as_deref(), Some("firstName"));
        assert!(error.details()[0].message.contains("'Carlos E.'"));
    }

    #[test]
    fn unrecognized_violation_is_a_generic_conflict() {
        let error = Error::from(database_error(
            DatabaseErrorKind::NotNullViolation,
            Info {
                message: "null value in column \"email\" of relation \"patients\"",
                details: None,
                constraint: None,
            },
        ));

        let response = error.into_error_response();
        assert_eq!(response.status.as_u16(), 409);
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].field.as_deref(), Some("unknown"));
    }

    #[test]
    fn other_failures_are_masked() {
        let error = Error::from(PgError::Config("bad url".into()));
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert!(error.details().is_empty());
        assert!(error.context().is_some_and(|c| c.contains("bad url")));

        let error = Error::from(database_error(
            DatabaseErrorKind::SerializationFailure,
            Info {
                message: "could not serialize access",
                details: None,
                constraint: None,
            },
        ));
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
    }
}
