//! Route categorization for logging and failure introspection.

use axum::http::Uri;
use strum::IntoStaticStr;

/// Route classification by functional area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum RouteCategory {
    /// Patient registry routes (`/v1/patients`).
    Patients,
    /// Health and monitoring routes (`/monitors/*`).
    Monitors,
    /// Unknown or uncategorized routes.
    Unknown,
}

impl RouteCategory {
    /// Categorizes a route based on its URI path.
    pub fn from_uri(uri: &Uri) -> Self {
        let path = uri.path();

        if path == "/v1/patients" || path.starts_with("/v1/patients/") {
            Self::Patients
        } else if path.starts_with("/monitors/") {
            Self::Monitors
        } else {
            Self::Unknown
        }
    }

    /// Returns whether failures on this route expose their underlying detail.
    #[inline]
    pub fn is_introspection(self) -> bool {
        matches!(self, Self::Monitors)
    }

    /// Returns the string representation for logging.
    #[inline]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_are_categorized_by_prefix() {
        let category = |path: &str| RouteCategory::from_uri(&path.parse::<Uri>().unwrap());

        assert_eq!(category("/v1/patients"), RouteCategory::Patients);
        assert_eq!(category("/v1/patients/abc?x=1"), RouteCategory::Patients);
        assert_eq!(category("/v1/patientsx"), RouteCategory::Unknown);
        assert_eq!(category("/monitors/health"), RouteCategory::Monitors);
        assert_eq!(category("/"), RouteCategory::Unknown);

        assert_eq!(RouteCategory::Monitors.as_str(), "monitors");
        assert!(RouteCategory::Monitors.is_introspection());
        assert!(!RouteCategory::Patients.is_introspection());
    }
}
