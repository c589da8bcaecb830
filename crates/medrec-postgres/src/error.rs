//! Error types and utilities for database operations.
//!
//! This module provides error handling for all database operations, including
//! connection errors, query errors, migration errors, and timeout errors.

use std::borrow::Cow;

use deadpool::managed::TimeoutType;
use diesel::result::{ConnectionError, DatabaseErrorKind, Error};
use diesel_async::pooled_connection::PoolError as DieselPoolError;
use diesel_async::pooled_connection::deadpool::PoolError as DeadpoolError;

use crate::types::PatientConstraints;
use crate::violation::RawFailure;

/// Type-erased error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for all PostgreSQL database operations.
///
/// This enum covers all possible error conditions that can occur when working
/// with the database, including connection issues, query failures, timeouts,
/// and migration problems.
#[derive(Debug, thiserror::Error)]
#[must_use = "database errors should be handled appropriately"]
pub enum PgError {
    /// Configuration error.
    ///
    /// This includes invalid configuration parameters, missing required settings,
    /// or other issues related to the database configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database operation timed out.
    ///
    /// This can occur during connection creation, waiting for available connections,
    /// or connection recycling operations.
    #[error("Database operation timed out")]
    Timeout(TimeoutType),

    /// Failed to establish or maintain a database connection.
    #[error("Database connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// Database migration operation failed.
    #[error("Database migration error: {0}")]
    Migration(BoxError),

    /// Database query execution failed.
    ///
    /// This includes SQL syntax errors, constraint violations, type mismatches,
    /// and other query-related failures.
    #[error("Database query error: {0}")]
    Query(#[from] Error),

    /// Unexpected error occurred.
    #[error("Unexpected error: {0}")]
    Unexpected(Cow<'static, str>),
}

impl PgError {
    /// Extracts the constraint name from a constraint violation error.
    ///
    /// # Returns
    ///
    /// - `Some(constraint_name)` if this error represents a constraint violation
    /// - `None` if this error is not related to a constraint violation
    pub fn constraint(&self) -> Option<&str> {
        let PgError::Query(Error::DatabaseError(_, info)) = self else {
            return None;
        };

        info.constraint_name()
    }

    /// Returns the known patients constraint this error violates, if any.
    pub fn constraint_violation(&self) -> Option<PatientConstraints> {
        self.constraint().and_then(PatientConstraints::new)
    }

    /// Returns whether a write was rejected by a declared data rule.
    ///
    /// Unique, check, foreign key and not-null violations all qualify; these
    /// are the failures the violation classifier knows how to describe.
    pub fn is_integrity_violation(&self) -> bool {
        let PgError::Query(Error::DatabaseError(kind, _)) = self else {
            return false;
        };

        matches!(
            kind,
            DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::CheckViolation
                | DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::NotNullViolation
        )
    }

    /// Returns the storage engine's free-text report for a database error.
    ///
    /// The message, detail and hint lines are joined in the order the server
    /// emits them, so the classifier sees the same text an operator would.
    pub fn raw_failure(&self) -> Option<RawFailure> {
        let PgError::Query(Error::DatabaseError(_, info)) = self else {
            return None;
        };

        Some(RawFailure::from_database_error(&**info))
    }
}

impl From<DeadpoolError> for PgError {
    fn from(value: DeadpoolError) -> Self {
        match value {
            DeadpoolError::Timeout(timeout) => Self::Timeout(timeout),
            DeadpoolError::Backend(DieselPoolError::QueryError(error)) => Self::Query(error),
            DeadpoolError::Backend(DieselPoolError::ConnectionError(error)) => {
                Self::Connection(error)
            }
            DeadpoolError::PostCreateHook(err) => {
                tracing::warn!("Unexpected post-create hook error: {}", err);
                Self::Unexpected(err.to_string().into())
            }
            DeadpoolError::NoRuntimeSpecified => {
                tracing::error!("No tokio runtime specified for connection pool");
                Self::Unexpected("No runtime specified".into())
            }
            DeadpoolError::Closed => Self::Connection(ConnectionError::InvalidConnectionUrl(
                "Connection pool is closed".into(),
            )),
        }
    }
}

/// Specialized [`Result`] type for database operations.
pub type PgResult<T, E = PgError> = Result<T, E>;

#[cfg(test)]
mod tests {
    use diesel::result::DatabaseErrorInformation;

    use super::*;
    use crate::types::ConstraintCategory;

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
        PgError::Query(Error::DatabaseError(kind, Box::new(info)))
    }

    #[test]
    fn unique_violation_is_classified_as_integrity() {
        let error = database_error(
            DatabaseErrorKind::UniqueViolation,
            Info {
                message: r#"duplicate key value violates unique constraint "patients_email_key""#,
                details: Some("Key (email)=(x@y.com) already exists."),
                constraint: Some("patients_email_key"),
            },
        );

        assert!(error.is_integrity_violation());
        assert_eq!(error.constraint(), Some("patients_email_key"));
        assert_eq!(
            error.constraint_violation(),
            Some(PatientConstraints::EmailUnique)
        );
        assert_eq!(
            error.constraint_violation().map(|c| c.categorize()),
            Some(ConstraintCategory::Uniqueness)
        );

        let raw = error.raw_failure().expect("database errors carry text");
        assert!(raw.as_str().contains("Key (email)=(x@y.com)"));
        assert!(raw.as_str().contains("patients_email_key"));
    }

    #[test]
    fn other_errors_are_not_integrity_violations() {
        let error = PgError::Query(Error::NotFound);
        assert!(!error.is_integrity_violation());
        assert!(error.raw_failure().is_none());
        assert!(error.constraint().is_none());

        let error = database_error(
            DatabaseErrorKind::SerializationFailure,
            Info {
                message: "could not serialize access",
                details: None,
                constraint: None,
            },
        );
        assert!(!error.is_integrity_violation());
        assert!(error.constraint_violation().is_none());
    }
}
