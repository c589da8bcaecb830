use serde::Serialize;

use super::extractor::{check_value, extract};
use super::resolver::resolve;
use super::{LogicalField, RawFailure, ViolationKind, ViolationObserver};
use crate::types::PatientConstraints;

/// HTTP status every violation report is delivered with.
pub const CONFLICT_STATUS: u16 = 409;

/// Category label of a violation report.
pub const CONFLICT_LABEL: &str = "Violación de restricciones";

/// Message for a duplicated key value.
pub const DUPLICATE_VALUE_MESSAGE: &str = "El valor ya existe en la base de datos.";

/// Message for a check constraint without a curated message.
pub const CHECK_DEFAULT_MESSAGE: &str = "El valor no cumple con las restricciones establecidas.";

/// Message when nothing in the failure could be identified.
pub const GENERIC_MESSAGE: &str = "Se ha producido un error al procesar los datos. \
    Por favor, verifique la información e intente nuevamente.";

/// One field-scoped problem found in a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViolationEntry {
    /// Field the problem is attached to, possibly `unknown`.
    pub field: LogicalField,
    /// Human-readable description.
    pub message: String,
    /// Offending value, when it could be recovered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ViolationEntry {
    /// Creates an entry without a value.
    pub fn new(field: LogicalField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
            value: None,
        }
    }

    /// Attaches the offending value.
    pub fn with_value(mut self, value: Option<String>) -> Self {
        self.value = value;
        self
    }

    /// The entry used when a failure cannot be explained.
    pub fn generic() -> Self {
        Self::new(LogicalField::unknown(), GENERIC_MESSAGE)
    }
}

/// Ordered, never-empty list of entries describing one failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViolationReport {
    entries: Vec<ViolationEntry>,
}

impl ViolationReport {
    /// Wraps the entries, substituting the generic entry for an empty list.
    pub fn new(entries: Vec<ViolationEntry>) -> Self {
        if entries.is_empty() {
            return Self::generic();
        }

        Self { entries }
    }

    /// A report with the single generic entry.
    pub fn generic() -> Self {
        Self {
            entries: vec![ViolationEntry::generic()],
        }
    }

    /// Builds the report for an already classified failure.
    pub(crate) fn assemble<O>(kind: &ViolationKind, raw: &RawFailure, observer: &O) -> Self
    where
        O: ViolationObserver + ?Sized,
    {
        let field_of = |token: &str| {
            let field = resolve(token);
            observer.on_field_resolved(token, &field);
            field
        };

        let entries = match kind {
            ViolationKind::Check { constraint } => {
                let field = field_of(constraint);
                let message = PatientConstraints::new(constraint)
                    .and_then(|rule| rule.message())
                    .unwrap_or(CHECK_DEFAULT_MESSAGE);

                vec![ViolationEntry::new(field, message).with_value(check_value(raw))]
            }
            ViolationKind::Direct { token } => {
                let field = field_of(token);
                let value = extract(raw, &field, observer).into_option();
                vec![ViolationEntry::new(field, DUPLICATE_VALUE_MESSAGE).with_value(value)]
            }
            ViolationKind::Unique { constraints } => constraints
                .iter()
                .map(|constraint| {
                    let field = field_of(constraint);
                    let value = extract(raw, &field, observer).into_option();
                    ViolationEntry::new(field, DUPLICATE_VALUE_MESSAGE).with_value(value)
                })
                .collect(),
            ViolationKind::Unknown => vec![ViolationEntry::generic()],
        };

        Self::new(entries)
    }

    /// Returns the entries in detection order.
    #[inline]
    pub fn entries(&self) -> &[ViolationEntry] {
        &self.entries
    }

    /// Returns the HTTP status for this report.
    #[inline]
    pub fn status(&self) -> u16 {
        CONFLICT_STATUS
    }

    /// Returns the category label for this report.
    #[inline]
    pub fn label(&self) -> &'static str {
        CONFLICT_LABEL
    }
}

impl IntoIterator for ViolationReport {
    type IntoIter = std::vec::IntoIter<ViolationEntry>;
    type Item = ViolationEntry;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_reports_fall_back_to_generic() {
        let report = ViolationReport::new(Vec::new());
        assert_eq!(report.entries(), &[ViolationEntry::generic()]);
        assert_eq!(report.status(), 409);
        assert_eq!(report.label(), CONFLICT_LABEL);
    }

    #[test]
    fn entries_serialize_without_missing_values() {
        let entry = ViolationEntry::new(LogicalField::new("email"), DUPLICATE_VALUE_MESSAGE);
        let json = serde_json::to_value(&entry).expect("serializes");
        assert_eq!(
            json,
            serde_json::json!({ "field": "email", "message": DUPLICATE_VALUE_MESSAGE })
        );
    }
}
