//! Path parameter types for HTTP handlers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Path parameters for single patient operations.
///
/// A segment that is not a UUID is rejected by [`Path`] as a malformed id
/// before the handler runs.
///
/// [`Path`]: crate::extract::Path
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientPathParams {
    /// Unique identifier of the patient.
    pub patient_id: Uuid,
}
