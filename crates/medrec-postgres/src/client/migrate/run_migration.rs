use std::time::Instant;

use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::MigrationHarness;
use tokio::task::spawn_blocking;

use super::{MigrationResult, MigrationStatus};
use crate::{MIGRATIONS, PgClient, PgError, PgResult, PooledConnection, TRACING_TARGET_MIGRATION};

type BlockingConnection = AsyncConnectionWrapper<PooledConnection>;

/// Runs a synchronous migration harness call on the blocking pool.
async fn with_harness<T, F>(pg: &PgClient, f: F) -> PgResult<T>
where
    T: Send + 'static,
    F: FnOnce(&mut BlockingConnection) -> PgResult<T> + Send + 'static,
{
    let conn = pg.get_pooled_connection().await?;
    let mut conn: BlockingConnection = conn.into();

    spawn_blocking(move || f(&mut conn))
        .await
        .map_err(|err| {
            tracing::error!(
                target: TRACING_TARGET_MIGRATION,
                error = %err,
                "Migration task panicked"
            );
            PgError::Migration(err.into())
        })?
}

/// Reports applied and pending migrations.
#[tracing::instrument(skip(pg), target = TRACING_TARGET_MIGRATION)]
pub async fn get_migration_status(pg: &PgClient) -> PgResult<MigrationStatus> {
    let status = with_harness(pg, |conn| {
        let applied = conn
            .applied_migrations()
            .map_err(PgError::Migration)?
            .into_iter()
            .map(|version| version.to_string())
            .collect::<Vec<_>>();

        let pending = conn
            .pending_migrations(MIGRATIONS)
            .map_err(PgError::Migration)?
            .iter()
            .map(|migration| migration.name().to_string())
            .collect::<Vec<_>>();

        Ok(MigrationStatus::new(applied, pending))
    })
    .await?;

    tracing::debug!(
        target: TRACING_TARGET_MIGRATION,
        applied = status.applied_versions.len(),
        pending = status.pending_migrations(),
        "Migration status retrieved"
    );

    Ok(status)
}

/// Runs all pending migrations on the database.
#[tracing::instrument(skip(pg), target = TRACING_TARGET_MIGRATION)]
pub async fn run_pending_migrations(pg: &PgClient) -> PgResult<MigrationResult> {
    let start = Instant::now();
    let status = get_migration_status(pg).await?;

    if status.is_up_to_date() {
        tracing::info!(
            target: TRACING_TARGET_MIGRATION,
            applied = status.applied_versions.len(),
            "Database schema is already up to date"
        );
        return Ok(MigrationResult::success(start.elapsed(), vec![]));
    }

    tracing::info!(
        target: TRACING_TARGET_MIGRATION,
        pending = status.pending_migrations(),
        "Applying pending migrations"
    );

    let versions = with_harness(pg, |conn| {
        conn.run_pending_migrations(MIGRATIONS)
            .map(|versions| versions.into_iter().map(|v| v.to_string()).collect::<Vec<_>>())
            .map_err(PgError::Migration)
    })
    .await
    .inspect_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            error = %err,
            "Database migration failed"
        );
    })?;

    let duration = start.elapsed();
    tracing::info!(
        target: TRACING_TARGET_MIGRATION,
        duration = ?duration,
        migrations_count = versions.len(),
        "Database migrations applied"
    );

    Ok(MigrationResult::success(duration, versions))
}
