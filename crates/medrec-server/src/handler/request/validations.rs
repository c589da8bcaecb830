//! Shared patterns and custom validators for request payloads.

use std::sync::LazyLock;

use jiff::civil::Date;
use regex::Regex;
use validator::ValidationError;

/// Letters (including Spanish accents), inner spaces, dots, hyphens and apostrophes.
pub(crate) static PERSON_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-ZáéíóúÁÉÍÓÚñÑ][a-zA-ZáéíóúÁÉÍÓÚñÑ\s.\-']{0,48}[a-zA-ZáéíóúÁÉÍÓÚñÑ'.\-]$")
        .expect("person name pattern")
});

pub(crate) static GENDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([MFOXmfox]|[Nn][Bb])$").expect("gender pattern"));

pub(crate) static BLOOD_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(A|B|AB|O)[+-]$").expect("blood type pattern"));

/// International digits with an optional leading `+`.
pub(crate) static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{7,14}$").expect("phone pattern"));

pub(crate) static POSTAL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9\-\s]{3,10}$").expect("postal code pattern"));

/// Rejects strings made only of whitespace.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }

    Ok(())
}

/// Accepts dates strictly before today.
pub(crate) fn past_date(value: &Date) -> Result<(), ValidationError> {
    if *value >= jiff::Zoned::now().date() {
        return Err(ValidationError::new("past"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;

    use super::*;

    #[test]
    fn person_names() {
        for name in ["Carlos E.", "María José", "O'Neil", "Lott S.", "Ñu"] {
            assert!(PERSON_NAME.is_match(name), "{name}");
        }

        for name in ["C", "Carlos ", " Carlos", "R2D2", "Ana_María"] {
            assert!(!PERSON_NAME.is_match(name), "{name}");
        }
    }

    #[test]
    fn codes_and_numbers() {
        assert!(GENDER.is_match("NB"));
        assert!(GENDER.is_match("f"));
        assert!(!GENDER.is_match("Z"));
        assert!(!GENDER.is_match("FM"));

        assert!(BLOOD_TYPE.is_match("AB-"));
        assert!(!BLOOD_TYPE.is_match("C+"));

        assert!(PHONE.is_match("+34600111222"));
        assert!(!PHONE.is_match("0600111222"));
        assert!(!PHONE.is_match("12345"));

        assert!(POSTAL_CODE.is_match("28001"));
        assert!(POSTAL_CODE.is_match("SW1A 1AA"));
        assert!(!POSTAL_CODE.is_match("12"));
    }

    #[test]
    fn blank_and_past_checks() {
        assert!(not_blank("  ").is_err());
        assert!(not_blank(" x ").is_ok());

        let today = jiff::Zoned::now().date();
        assert!(past_date(&today).is_err());
        assert!(past_date(&today.saturating_sub(1.day())).is_ok());
    }
}
