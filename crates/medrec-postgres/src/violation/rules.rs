use std::sync::LazyLock;

use regex::Regex;
use strum::{Display, EnumIter};

use super::RawFailure;

static CHECK_CONSTRAINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"violates check constraint "(.+?)""#).expect("check constraint pattern")
});

static UNIQUE_CONSTRAINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"violates unique constraint "(.+?)""#).expect("unique constraint pattern")
});

static KEY_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Key \((.*?)\)=").expect("key field pattern"));

static CONSTRAINT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"constraint "(.*?)""#).expect("constraint name pattern"));

/// Handling path chosen for a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// A check constraint rejected the row.
    Check {
        /// Name of the violated check constraint.
        constraint: String,
    },
    /// A single key field or constraint name was read straight from the text.
    Direct {
        /// Column list of a `Key (...)=` fragment or a constraint name.
        token: String,
    },
    /// One or more unique constraints were reported, deduplicated in order.
    Unique {
        /// Distinct constraint names in order of first appearance.
        constraints: Vec<String>,
    },
    /// Nothing recognizable was found.
    Unknown,
}

impl ViolationKind {
    /// Returns the rule that produces this kind.
    pub fn rule(&self) -> ClassificationRule {
        match self {
            ViolationKind::Check { .. } => ClassificationRule::Check,
            ViolationKind::Direct { .. } => ClassificationRule::Direct,
            ViolationKind::Unique { .. } => ClassificationRule::Unique,
            ViolationKind::Unknown => ClassificationRule::Unknown,
        }
    }
}

/// One step of the classifier. Rules are tried in [`ClassificationRule::ORDERED`]
/// order and the first one that matches decides the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ClassificationRule {
    /// `violates check constraint "<name>"`.
    Check,
    /// `Key (<field>)=`, then `constraint "<name>"`.
    Direct,
    /// Every `violates unique constraint "<name>"`.
    Unique,
    /// Always matches.
    Unknown,
}

impl ClassificationRule {
    /// Rules in priority order.
    pub const ORDERED: [ClassificationRule; 4] = [
        ClassificationRule::Check,
        ClassificationRule::Direct,
        ClassificationRule::Unique,
        ClassificationRule::Unknown,
    ];

    /// Applies this rule alone, returning the path it selects if it matches.
    pub fn apply(self, raw: &RawFailure) -> Option<ViolationKind> {
        let text = raw.as_str();
        match self {
            ClassificationRule::Check => first_capture(&CHECK_CONSTRAINT, text)
                .map(|constraint| ViolationKind::Check { constraint }),
            ClassificationRule::Direct => direct_token(text).map(|token| ViolationKind::Direct { token }),
            ClassificationRule::Unique => {
                let constraints = unique_constraints(text);
                (!constraints.is_empty()).then_some(ViolationKind::Unique { constraints })
            }
            ClassificationRule::Unknown => Some(ViolationKind::Unknown),
        }
    }
}

/// Returns the trimmed first capture group of `pattern`, if it is non-empty.
fn first_capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|group| group.as_str().trim())
        .filter(|group| !group.is_empty())
        .map(str::to_owned)
}

/// Distinct unique constraint names in order of first appearance.
fn unique_constraints(text: &str) -> Vec<String> {
    let mut constraints: Vec<String> = Vec::new();
    for captures in UNIQUE_CONSTRAINT.captures_iter(text) {
        let name = captures[1].trim();
        if !name.is_empty() && !constraints.iter().any(|known| known == name) {
            constraints.push(name.to_owned());
        }
    }

    constraints
}

/// A report naming two or more distinct unique constraints is left to the
/// unique rule, which can describe every hit instead of the first one.
fn direct_token(text: &str) -> Option<String> {
    if unique_constraints(text).len() > 1 {
        return None;
    }

    first_capture(&KEY_FIELD, text).or_else(|| first_capture(&CONSTRAINT_NAME, text))
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    fn apply(rule: ClassificationRule, text: &str) -> Option<ViolationKind> {
        rule.apply(&RawFailure::new(text))
    }

    #[test]
    fn ordered_covers_every_rule_once() {
        let ordered: Vec<_> = ClassificationRule::ORDERED.to_vec();
        let declared: Vec<_> = ClassificationRule::iter().collect();
        assert_eq!(ordered, declared);
    }

    #[test]
    fn check_rule_reads_constraint_name() {
        let kind = apply(
            ClassificationRule::Check,
            r#"new row for relation "patients" violates check constraint "patients_gender_check""#,
        );
        assert_eq!(
            kind,
            Some(ViolationKind::Check {
                constraint: "patients_gender_check".to_owned()
            })
        );

        assert_eq!(apply(ClassificationRule::Check, "Key (email)=(a@b.c)"), None);
    }

    #[test]
    fn direct_rule_prefers_key_fragment() {
        let kind = apply(
            ClassificationRule::Direct,
            "duplicate key value violates unique constraint \"patients_email_key\"\n  Detail: Key (email)=(x@y.com) already exists.",
        );
        assert_eq!(
            kind,
            Some(ViolationKind::Direct {
                token: "email".to_owned()
            })
        );
    }

    #[test]
    fn direct_rule_falls_back_to_constraint_name() {
        let kind = apply(
            ClassificationRule::Direct,
            r#"duplicate key value violates unique constraint "patients_phone_key""#,
        );
        assert_eq!(
            kind,
            Some(ViolationKind::Direct {
                token: "patients_phone_key".to_owned()
            })
        );
    }

    #[test]
    fn direct_rule_declines_multiple_unique_hits() {
        let text = r#"violates unique constraint "patients_email_key"; violates unique constraint "patients_phone_key""#;
        assert_eq!(apply(ClassificationRule::Direct, text), None);

        let repeated = r#"violates unique constraint "patients_email_key"; violates unique constraint "patients_email_key""#;
        assert!(apply(ClassificationRule::Direct, repeated).is_some());
    }

    #[test]
    fn direct_rule_ignores_empty_tokens() {
        assert_eq!(apply(ClassificationRule::Direct, r#"Key ()=(x) constraint """#), None);
    }

    #[test]
    fn unique_rule_deduplicates_in_order() {
        let text = concat!(
            r#"violates unique constraint "patients_phone_key" "#,
            r#"violates unique constraint "patients_email_key" "#,
            r#"violates unique constraint "patients_phone_key""#,
        );
        assert_eq!(
            apply(ClassificationRule::Unique, text),
            Some(ViolationKind::Unique {
                constraints: vec![
                    "patients_phone_key".to_owned(),
                    "patients_email_key".to_owned()
                ]
            })
        );

        assert_eq!(apply(ClassificationRule::Unique, "connection reset"), None);
    }

    #[test]
    fn unknown_rule_always_matches() {
        assert_eq!(apply(ClassificationRule::Unknown, ""), Some(ViolationKind::Unknown));
        assert_eq!(ViolationKind::Unknown.rule(), ClassificationRule::Unknown);
    }
}
