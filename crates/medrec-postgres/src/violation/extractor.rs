use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::{LogicalField, RawFailure, ViolationObserver};

/// Rendering of a value that could not be recovered.
pub const VALUE_NOT_IDENTIFIED: &str = "Value not identified";

static ANY_KEY_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Key \(.*?\)=\((.*?)\)").expect("generic key pattern"));

static CHECK_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"value=\(([^)]*)\)").expect("check value pattern"));

/// Offending value recovered from a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedValue {
    /// The literal value the storage engine reported.
    Found(String),
    /// No strategy produced a value.
    NotIdentified,
}

impl ExtractedValue {
    /// Returns whether a value was recovered.
    #[inline]
    pub fn is_identified(&self) -> bool {
        matches!(self, ExtractedValue::Found(_))
    }

    /// Returns the value, or [`VALUE_NOT_IDENTIFIED`].
    pub fn as_str(&self) -> &str {
        match self {
            ExtractedValue::Found(value) => value,
            ExtractedValue::NotIdentified => VALUE_NOT_IDENTIFIED,
        }
    }

    /// Converts into the value, dropping the not-identified case.
    pub fn into_option(self) -> Option<String> {
        match self {
            ExtractedValue::Found(value) => Some(value),
            ExtractedValue::NotIdentified => None,
        }
    }
}

impl fmt::Display for ExtractedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recovers the value that collided for `field`.
///
/// Strategies run in order until one yields a non-empty value:
///
/// 1. the exact `Key (<field>)=(<value>)` fragment;
/// 2. a scan from `Key (<field>)=` to the next opening parenthesis, which
///    tolerates spacing between `=` and the value;
/// 3. the first `Key (<any>)=(<value>)` fragment, whatever its column.
///
/// Strategies 1 and 2 read up to the matching closing parenthesis, so values
/// with nested parentheses survive intact. Both accept the API spelling and
/// the column spelling of the field. An `unknown` field skips extraction.
pub fn extract<O>(raw: &RawFailure, field: &LogicalField, observer: &O) -> ExtractedValue
where
    O: ViolationObserver + ?Sized,
{
    if field.is_unknown() {
        return ExtractedValue::NotIdentified;
    }

    let text = raw.as_str();
    let mut spellings = vec![field.as_str().to_owned()];
    let column = field.column_name();
    if column != field.as_str() {
        spellings.push(column);
    }

    let value = spellings
        .iter()
        .find_map(|name| exact_match(text, name))
        .or_else(|| spellings.iter().find_map(|name| positional_scan(text, name)))
        .or_else(|| generic_capture(text));

    match value {
        Some(value) => {
            if field.is_sensitive() {
                observer.on_sensitive_value(field, &value);
            }
            ExtractedValue::Found(value)
        }
        None => {
            observer.on_value_missing(field);
            ExtractedValue::NotIdentified
        }
    }
}

/// Returns the `value=(...)` detail some check violations carry.
pub fn check_value(raw: &RawFailure) -> Option<String> {
    CHECK_VALUE
        .captures(raw.as_str())
        .and_then(|captures| non_empty(captures.get(1)?.as_str()))
}

fn exact_match(text: &str, name: &str) -> Option<String> {
    let marker = format!("Key ({name})=(");
    let start = text.find(&marker)? + marker.len();
    balanced_value(&text[start..])
}

fn positional_scan(text: &str, name: &str) -> Option<String> {
    let marker = format!("Key ({name})=");
    let after = text.find(&marker)? + marker.len();

    let rest = &text[after..];
    let open = rest.find('(')?;
    balanced_value(&rest[open + 1..])
}

/// Reads `body` up to the parenthesis closing the one just before it.
fn balanced_value(body: &str) -> Option<String> {
    let mut depth = 0usize;
    for (index, c) in body.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return non_empty(&body[..index]),
            ')' => depth -= 1,
            _ => {}
        }
    }

    None
}

fn generic_capture(text: &str) -> Option<String> {
    ANY_KEY_VALUE
        .captures(text)
        .and_then(|captures| non_empty(captures.get(1)?.as_str()))
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::NoopObserver;
    use crate::violation::observer::testing::RecordingObserver;

    fn run(text: &str, field: &str) -> ExtractedValue {
        extract(&RawFailure::new(text), &LogicalField::new(field), &NoopObserver)
    }

    #[test]
    fn exact_fragment_is_preferred() {
        assert_eq!(
            run("Key (email)=(x@y.com) already exists.", "email"),
            ExtractedValue::Found("x@y.com".to_owned())
        );
    }

    #[test]
    fn exact_fragment_keeps_nested_parentheses() {
        assert_eq!(
            run("Key (address)=(Calle 5 (bis)) already exists.", "address"),
            ExtractedValue::Found("Calle 5 (bis)".to_owned())
        );
        assert_eq!(exact_match("Key (address)=(Calle 5 (bis", "address"), None);
    }

    #[test]
    fn column_spelling_is_accepted() {
        assert_eq!(
            run("Key (insurance_number)=(INS-123) already exists.", "insuranceNumber"),
            ExtractedValue::Found("INS-123".to_owned())
        );
    }

    #[test]
    fn positional_scan_tolerates_spacing_and_nesting() {
        assert_eq!(
            run("Key (email)= ( x@y.com ) already exists.", "email"),
            ExtractedValue::Found("x@y.com".to_owned())
        );
        assert_eq!(
            positional_scan("Key (address)= (Calle 5 (bis)) already exists.", "address"),
            Some("Calle 5 (bis)".to_owned())
        );
        assert_eq!(positional_scan("Key (address)= (unterminated", "address"), None);
    }

    #[test]
    fn generic_capture_ignores_the_field() {
        assert_eq!(
            run("Key (phone)=(+34600111222) already exists.", "email"),
            ExtractedValue::Found("+34600111222".to_owned())
        );
    }

    #[test]
    fn missing_values_use_the_sentinel() {
        let value = run(r#"violates unique constraint "patients_email_key""#, "email");
        assert_eq!(value, ExtractedValue::NotIdentified);
        assert_eq!(value.as_str(), VALUE_NOT_IDENTIFIED);
        assert_eq!(value.into_option(), None);

        assert_eq!(run("Key (email)=() already exists.", "email"), ExtractedValue::NotIdentified);
    }

    #[test]
    fn unknown_field_skips_extraction() {
        let observer = RecordingObserver::default();
        let value = extract(
            &RawFailure::new("Key (email)=(x@y.com) already exists."),
            &LogicalField::unknown(),
            &observer,
        );

        assert_eq!(value, ExtractedValue::NotIdentified);
        assert!(observer.events().is_empty());
    }

    #[test]
    fn sensitive_values_are_reported() {
        let observer = RecordingObserver::default();
        let value = extract(
            &RawFailure::new("Key (phone)=(+34600111222) already exists."),
            &LogicalField::new("phone"),
            &observer,
        );

        assert!(value.is_identified());
        assert_eq!(observer.events(), vec!["sensitive phone +34600111222"]);

        let observer = RecordingObserver::default();
        let value = extract(
            &RawFailure::new("Key (insurance_number)=(INS-123) already exists."),
            &LogicalField::new("insuranceNumber"),
            &observer,
        );

        assert_eq!(value, ExtractedValue::Found("INS-123".to_owned()));
        assert_eq!(observer.events(), vec!["sensitive insuranceNumber INS-123"]);
    }

    #[test]
    fn check_value_fragment() {
        let raw = RawFailure::new(r#"violates check constraint "patients_gender_check" value=(Z)"#);
        assert_eq!(check_value(&raw), Some("Z".to_owned()));
        assert_eq!(check_value(&RawFailure::new("value=()")), None);
        assert_eq!(check_value(&RawFailure::new("no detail")), None);
    }
}
