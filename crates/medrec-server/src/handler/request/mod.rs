//! Request types for HTTP handlers.

mod paginations;
mod paths;
mod patients;
mod validations;

pub use paginations::*;
pub use paths::*;
pub use patients::*;
