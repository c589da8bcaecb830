//! Middleware for `axum::Router` and HTTP request processing.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::Router;
//! use medrec_server::middleware::{
//!     RecoveryConfig, RouterIntrospectionExt, RouterObservabilityExt, RouterRecoveryExt,
//! };
//!
//! let app: Router = Router::new()
//!     .with_recovery(&RecoveryConfig::default())
//!     .with_introspection()
//!     .with_observability();
//! ```
//!
//! Recovery must sit inside introspection so that timeouts and panics on
//! introspection routes are unmasked too.

mod introspection;
mod observability;
mod recovery;
mod route_category;

pub use introspection::{RouterIntrospectionExt, unmask_introspection_failures};
pub use observability::{REQUEST_ID_HEADER, RouterObservabilityExt};
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use route_category::RouteCategory;
