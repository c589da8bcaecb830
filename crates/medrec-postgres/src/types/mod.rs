//! Contains constraints and other custom types.

mod constraints;

pub use constraints::{ConstraintCategory, PatientConstraints};
