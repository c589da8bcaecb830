use std::fmt;

use serde::Serialize;

use crate::types::PatientConstraints;

/// Field name reported when a constraint cannot be tied to any field.
pub const UNKNOWN_FIELD: &str = "unknown";

/// Table prefix carried by every patients constraint name.
const ENTITY_PREFIX: &str = "patients_";

/// Constraint kind suffixes, as Postgres appends them to generated names.
const CONSTRAINT_SUFFIXES: [&str; 4] = ["_fkey", "_key", "_check", "_idx"];

/// API-facing field name, e.g. `insuranceNumber`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LogicalField(String);

impl LogicalField {
    /// Creates a field from an already API-facing name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the `unknown` field.
    pub fn unknown() -> Self {
        Self(UNKNOWN_FIELD.to_owned())
    }

    /// Returns whether no real field could be identified.
    #[inline]
    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_FIELD
    }

    /// Returns whether the field holds identifying data that deserves an
    /// operational warning when it collides.
    pub fn is_sensitive(&self) -> bool {
        matches!(self.0.as_str(), "insuranceNumber" | "phone")
    }

    /// Returns the field name.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the snake_case column spelling, e.g. `insurance_number`.
    pub fn column_name(&self) -> String {
        let mut column = String::with_capacity(self.0.len() + 4);
        for c in self.0.chars() {
            if c.is_uppercase() {
                if !column.is_empty() {
                    column.push('_');
                }
                column.extend(c.to_lowercase());
            } else {
                column.push(c);
            }
        }

        column
    }

    /// Consumes the field, returning its name.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<LogicalField> for String {
    fn from(value: LogicalField) -> Self {
        value.0
    }
}

/// Maps a constraint name or key token to the API field it refers to.
///
/// Plain identifiers pass through untouched. Anything else goes through the
/// constraint table first, then loses its `patients_` prefix and kind suffix
/// and is camel-cased. Tokens that are not identifiers at all, such as the
/// column list of a composite key, resolve to [`UNKNOWN_FIELD`].
pub fn resolve(token: &str) -> LogicalField {
    let token = token.trim();
    if token.is_empty() || !token.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return LogicalField::unknown();
    }

    if !token.contains('_') {
        return LogicalField::new(token);
    }

    if let Some(constraint) = PatientConstraints::new(token) {
        return LogicalField::new(constraint.field());
    }

    let name = token.strip_prefix(ENTITY_PREFIX).unwrap_or(token);
    let name = CONSTRAINT_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .unwrap_or(name);

    let field = snake_to_camel(name);
    if field.is_empty() {
        LogicalField::unknown()
    } else {
        LogicalField::new(field)
    }
}

/// `some_new_field` becomes `someNewField`; empty segments are dropped.
fn snake_to_camel(name: &str) -> String {
    let mut segments = name.split('_').filter(|segment| !segment.is_empty());
    let Some(first) = segments.next() else {
        return String::new();
    };

    let mut camel = first.to_lowercase();
    for segment in segments {
        let mut chars = segment.chars();
        if let Some(head) = chars.next() {
            camel.extend(head.to_uppercase());
            camel.push_str(chars.as_str());
        }
    }

    camel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(resolve("email").as_str(), "email");
        assert_eq!(resolve(" phone ").as_str(), "phone");
    }

    #[test]
    fn table_entries_win() {
        assert_eq!(resolve("patients_first_name_check").as_str(), "firstName");
        assert_eq!(resolve("patients_email_key").as_str(), "email");
        assert_eq!(resolve("patients_pkey").as_str(), "id");
    }

    #[test]
    fn unlisted_names_are_camel_cased() {
        assert_eq!(resolve("insurance_number").as_str(), "insuranceNumber");
        assert_eq!(resolve("patients_some_new_field_key").as_str(), "someNewField");
        assert_eq!(resolve("patients_doctor_id_fkey").as_str(), "doctorId");
        assert_eq!(resolve("emergency_contact_phone2").as_str(), "emergencyContactPhone2");
        assert_eq!(resolve("patients__odd__name_check").as_str(), "oddName");
        assert_eq!(resolve("correo_electrónico").as_str(), "correoElectrónico");
        assert_eq!(resolve("patients_año_nacimiento_check").as_str(), "añoNacimiento");
    }

    #[test]
    fn unresolvable_tokens_are_unknown() {
        assert!(resolve("").is_unknown());
        assert!(resolve("email, phone").is_unknown());
        assert!(resolve("lower(email::text)").is_unknown());
        assert!(resolve("___").is_unknown());
    }

    #[test]
    fn column_name_reverses_camel_case() {
        assert_eq!(LogicalField::new("insuranceNumber").column_name(), "insurance_number");
        assert_eq!(LogicalField::new("email").column_name(), "email");
        assert_eq!(
            LogicalField::new("emergencyContactName2").column_name(),
            "emergency_contact_name2"
        );
        assert_eq!(
            LogicalField::new("correoElectrónico").column_name(),
            "correo_electrónico"
        );
    }

    #[test]
    fn sensitive_fields() {
        assert!(LogicalField::new("phone").is_sensitive());
        assert!(LogicalField::new("insuranceNumber").is_sensitive());
        assert!(!LogicalField::new("email").is_sensitive());
    }
}
