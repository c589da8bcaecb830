//! Application state and dependency injection.

mod config;

use medrec_postgres::PgClient;

pub use crate::service::config::{ServiceConfig, ServiceConfigBuilder};
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    // External services:
    pub postgres: PgClient,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Builds the connection pool and brings the schema up to date.
    pub async fn from_config(service_config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            postgres: service_config.connect_postgres().await?,
        })
    }

    /// Initializes application state without touching the database.
    ///
    /// Connections are opened on first use, so a missing database surfaces as
    /// request failures rather than a startup error.
    pub fn lazy(service_config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            postgres: service_config.build_postgres()?,
        })
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

// External services:
impl_di!(postgres: PgClient);
