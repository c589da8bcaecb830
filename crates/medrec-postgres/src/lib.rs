#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Embeds all migrations into the final binary.
pub(crate) const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
    diesel_migrations::embed_migrations!();

// Tracing target constants for consistent logging.

/// Tracing target for database query operations.
pub const TRACING_TARGET_QUERY: &str = "medrec_postgres::queries";

/// Tracing target for database migration operations.
///
/// Use this target for logging migration application and migration status checks.
pub const TRACING_TARGET_MIGRATION: &str = "medrec_postgres::migrations";

/// Tracing target for database connection operations.
///
/// Use this target for logging connection establishment, pool management, and connection errors.
pub const TRACING_TARGET_CONNECTION: &str = "medrec_postgres::connection";

/// Tracing target for the constraint violation classifier.
///
/// Every rule attempt, resolved field and sensitive value sighting is reported here
/// by [`TracingObserver`].
pub const TRACING_TARGET_VIOLATION: &str = "medrec_postgres::violation";

mod client;
mod error;
pub mod model;
pub mod query;
mod schema;
pub mod types;
pub mod violation;

pub use diesel_async::AsyncPgConnection as PgConnection;

pub use crate::client::{
    ConnectionPool, MigrationResult, MigrationStatus, PgClient, PgClientMigrationExt, PgConfig,
    PgConn, PgPoolStatus, PooledConnection, get_migration_status, run_pending_migrations,
};
pub use crate::error::{BoxError, PgError, PgResult};
pub use crate::violation::{
    ClassificationRule, ExtractedValue, LogicalField, NoopObserver, RawFailure, TracingObserver,
    ViolationClassifier, ViolationEntry, ViolationKind, ViolationObserver, ViolationReport,
};
