//! Database constraints organized by table.

mod patients;

pub use patients::PatientConstraints;
use serde::{Deserialize, Serialize};

/// Purpose of a database constraint.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintCategory {
    /// Data validation constraints (format, length, range checks).
    Validation,
    /// Uniqueness constraints (primary keys, unique indexes).
    Uniqueness,
}
