//! Embedded schema migrations.
//!
//! Migrations are compiled into the binary and applied on a blocking task
//! through diesel's synchronous [`MigrationHarness`].
//!
//! [`MigrationHarness`]: diesel_migrations::MigrationHarness

mod client_ext;
mod migrate_result;
mod run_migration;

pub use client_ext::PgClientMigrationExt;
pub use migrate_result::{MigrationResult, MigrationStatus};
pub use run_migration::{get_migration_status, run_pending_migrations};
