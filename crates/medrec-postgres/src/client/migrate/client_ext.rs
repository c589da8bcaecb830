use crate::{MigrationResult, MigrationStatus, PgClient, PgResult};

/// Extension trait adding migration management to [`PgClient`].
pub trait PgClientMigrationExt {
    /// Applies every embedded migration that has not run yet.
    ///
    /// Safe to call on every startup; an up-to-date schema is a no-op.
    fn run_pending_migrations(&self) -> impl Future<Output = PgResult<MigrationResult>> + Send;

    /// Reports which embedded migrations are applied and which are pending.
    fn get_migration_status(&self) -> impl Future<Output = PgResult<MigrationStatus>> + Send;
}

impl PgClientMigrationExt for PgClient {
    async fn run_pending_migrations(&self) -> PgResult<MigrationResult> {
        super::run_pending_migrations(self).await
    }

    async fn get_migration_status(&self) -> PgResult<MigrationStatus> {
        super::get_migration_status(self).await
    }
}
