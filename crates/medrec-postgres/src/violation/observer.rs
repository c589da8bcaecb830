use super::{ClassificationRule, LogicalField, ViolationKind};
use crate::TRACING_TARGET_VIOLATION;

/// Receives diagnostics from the classification pipeline.
///
/// Observers only watch; nothing they do can change the produced report.
/// Every method defaults to doing nothing.
pub trait ViolationObserver {
    /// A rule was tried against the failure text.
    fn on_rule(&self, rule: ClassificationRule, matched: bool) {
        let _ = (rule, matched);
    }

    /// The failure text was assigned a handling path.
    fn on_classified(&self, kind: &ViolationKind) {
        let _ = kind;
    }

    /// A constraint name or key token was mapped to an API field.
    fn on_field_resolved(&self, token: &str, field: &LogicalField) {
        let _ = (token, field);
    }

    /// An identifying value (phone, insurance number) was pulled from the text.
    fn on_sensitive_value(&self, field: &LogicalField, value: &str) {
        let _ = (field, value);
    }

    /// No offending value could be recovered for a known field.
    fn on_value_missing(&self, field: &LogicalField) {
        let _ = field;
    }
}

/// Discards every diagnostic.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ViolationObserver for NoopObserver {}

/// Emits diagnostics as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ViolationObserver for TracingObserver {
    fn on_rule(&self, rule: ClassificationRule, matched: bool) {
        tracing::trace!(target: TRACING_TARGET_VIOLATION, rule = %rule, matched, "Classification rule evaluated");
    }

    fn on_classified(&self, kind: &ViolationKind) {
        tracing::debug!(target: TRACING_TARGET_VIOLATION, kind = ?kind, "Constraint violation classified");
    }

    fn on_field_resolved(&self, token: &str, field: &LogicalField) {
        tracing::debug!(target: TRACING_TARGET_VIOLATION, token, field = %field, "Constraint field resolved");
    }

    fn on_sensitive_value(&self, field: &LogicalField, value: &str) {
        tracing::warn!(
            target: TRACING_TARGET_VIOLATION,
            field = %field,
            value,
            "Duplicate identifying value rejected"
        );
    }

    fn on_value_missing(&self, field: &LogicalField) {
        tracing::debug!(target: TRACING_TARGET_VIOLATION, field = %field, "Offending value not identified");
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Keeps every diagnostic as a line of text.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingObserver {
        events: Mutex<Vec<String>>,
    }

    impl RecordingObserver {
        pub(crate) fn events(&self) -> Vec<String> {
            self.events.lock().expect("observer lock").clone()
        }

        fn push(&self, event: String) {
            self.events.lock().expect("observer lock").push(event);
        }
    }

    impl ViolationObserver for RecordingObserver {
        fn on_rule(&self, rule: ClassificationRule, matched: bool) {
            self.push(format!("rule {rule} {matched}"));
        }

        fn on_classified(&self, kind: &ViolationKind) {
            self.push(format!("classified {}", kind.rule()));
        }

        fn on_field_resolved(&self, token: &str, field: &LogicalField) {
            self.push(format!("resolved {token} {field}"));
        }

        fn on_sensitive_value(&self, field: &LogicalField, value: &str) {
            self.push(format!("sensitive {field} {value}"));
        }

        fn on_value_missing(&self, field: &LogicalField) {
            self.push(format!("missing {field}"));
        }
    }
}
