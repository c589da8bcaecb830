//! Classification of constraint violations reported by the storage engine.
//!
//! A rejected write arrives as free text, e.g.
//!
//! ```text
//! ERROR: duplicate key value violates unique constraint "patients_email_key"
//!   Detail: Key (email)=(x@y.com) already exists.
//! ```
//!
//! [`ViolationClassifier`] turns that text into a [`ViolationReport`]: the
//! [`ClassificationRule`]s pick a handling path, the resolver maps constraint
//! names to API fields, and the extractor recovers the offending value.
//!
//! The pipeline is pure. It never fails, holds no state between calls, and
//! reports diagnostics only through a [`ViolationObserver`].

mod extractor;
mod observer;
mod raw_failure;
mod report;
mod resolver;
mod rules;

pub use extractor::{ExtractedValue, VALUE_NOT_IDENTIFIED, extract};
pub use observer::{NoopObserver, TracingObserver, ViolationObserver};
pub use raw_failure::RawFailure;
pub use report::{
    CHECK_DEFAULT_MESSAGE, CONFLICT_LABEL, CONFLICT_STATUS, DUPLICATE_VALUE_MESSAGE,
    GENERIC_MESSAGE, ViolationEntry, ViolationReport,
};
pub use resolver::{LogicalField, UNKNOWN_FIELD, resolve};
pub use rules::{ClassificationRule, ViolationKind};

/// Entry point of the classification pipeline.
#[derive(Debug, Default, Clone)]
pub struct ViolationClassifier<O = TracingObserver> {
    observer: O,
}

impl ViolationClassifier {
    /// Creates a classifier that reports to `tracing`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<O: ViolationObserver> ViolationClassifier<O> {
    /// Creates a classifier reporting to `observer`.
    pub fn with_observer(observer: O) -> Self {
        Self { observer }
    }

    /// Returns the observer.
    #[inline]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Picks the handling path: the first rule in [`ClassificationRule::ORDERED`]
    /// that matches.
    pub fn kind(&self, raw: &RawFailure) -> ViolationKind {
        let kind = ClassificationRule::ORDERED
            .into_iter()
            .find_map(|rule| {
                let outcome = rule.apply(raw);
                self.observer.on_rule(rule, outcome.is_some());
                outcome
            })
            .unwrap_or(ViolationKind::Unknown);

        self.observer.on_classified(&kind);
        kind
    }

    /// Classifies the failure and assembles its report.
    pub fn classify(&self, raw: &RawFailure) -> ViolationReport {
        let kind = self.kind(raw);
        ViolationReport::assemble(&kind, raw, &self.observer)
    }
}
