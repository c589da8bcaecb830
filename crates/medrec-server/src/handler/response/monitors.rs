use jiff::Timestamp;
use medrec_postgres::PgPoolStatus;
use serde::Serialize;

/// Health report of the service and its database.
#[must_use]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStatus {
    /// Whether the database answered.
    pub is_healthy: bool,
    /// When the check ran.
    pub checked_at: Timestamp,
    /// Connection pool statistics at check time.
    pub pool: PgPoolStatus,
}
