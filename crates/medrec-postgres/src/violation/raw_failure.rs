use std::fmt;

use diesel::result::DatabaseErrorInformation;

/// Free-text report of a rejected write, exactly as the storage engine worded it.
///
/// Nothing about its structure is guaranteed beyond the phrasing conventions
/// the classification rules look for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFailure(String);

impl RawFailure {
    /// Wraps arbitrary failure text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Renders a database error the way the server log prints it.
    ///
    /// ```text
    /// ERROR: duplicate key value violates unique constraint "patients_email_key"
    ///   Detail: Key (email)=(x@y.com) already exists.
    /// ```
    pub fn from_database_error(info: &(dyn DatabaseErrorInformation + Send + Sync)) -> Self {
        let mut text = format!("ERROR: {}", info.message());

        if let Some(details) = info.details() {
            text.push_str("\n  Detail: ");
            text.push_str(details);
        }

        if let Some(hint) = info.hint() {
            text.push_str("\n  Hint: ");
            text.push_str(hint);
        }

        Self(text)
    }

    /// Returns the full failure text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the first line, which carries the summary of the failure.
    pub fn first_line(&self) -> &str {
        self.0.lines().next().unwrap_or_default()
    }

    /// Consumes the failure, returning its text.
    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RawFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RawFailure {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RawFailure {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}
