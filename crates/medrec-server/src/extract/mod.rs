//! Request extractors that reject with the service's error envelope.
//!
//! Each extractor wraps its axum counterpart and converts the rejection into
//! an [`Error`], so malformed bodies, identifiers and query strings all
//! produce the same response shape as handler failures.
//!
//! - [`Json`] - JSON body deserialization
//! - [`ValidateJson`] - JSON body deserialization followed by validation
//! - [`Path`] - path parameters; a non-UUID identifier is a malformed id
//! - [`Query`] - query string deserialization
//! - [`ValidateQuery`] - query string deserialization followed by validation
//!
//! [`Error`]: crate::handler::Error

pub mod reject;

pub use crate::extract::reject::{Json, Path, Query, ValidateJson, ValidateQuery};
