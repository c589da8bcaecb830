//! Response types for HTTP handlers.

mod error_response;
mod monitors;
mod patients;

pub use error_response::{ErrorDetail, ErrorResponse};
pub use monitors::*;
pub use patients::*;
