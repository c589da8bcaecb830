//! Patient model for PostgreSQL database operations.
//!
//! ## Models
//!
//! - [`Patient`] - A registered patient with demographics, contacts and insurance details
//! - [`NewPatient`] - Data structure for registering a patient
//! - [`UpdatePatient`] - Full replacement of a patient's editable fields

use diesel::prelude::*;
use jiff::civil::Date;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::patients;

/// A patient as stored in the `patients` table.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = patients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Patient {
    /// Unique patient identifier.
    pub id: Uuid,
    /// Given name, letters with optional spaces, dots, hyphens and apostrophes.
    pub first_name: String,
    /// Family name, same alphabet as the given name.
    pub last_name: String,
    /// Date of birth.
    pub birth_date: jiff_diesel::Date,
    /// One of M, F, O, NB or X (either case).
    pub gender: String,
    /// ABO group with Rh factor, e.g. `AB+`.
    pub blood_type: Option<String>,
    /// Contact phone in international digits, unique per patient.
    pub phone: String,
    /// Contact email, unique per patient.
    pub email: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_name2: Option<String>,
    pub emergency_contact_phone2: Option<String>,
    pub emergency_contact_name3: Option<String>,
    pub emergency_contact_phone3: Option<String>,
    /// Free-text clinical history.
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    pub insurance_provider: Option<String>,
    /// Insurance policy number, unique when present.
    pub insurance_number: Option<String>,
    /// Timestamp when the patient was registered.
    pub registration_date: Timestamp,
    /// Timestamp when the patient was last updated.
    pub updated_at: Timestamp,
    /// Record status flag, always set on write.
    pub status: bool,
    /// False once the patient has been soft deleted.
    pub active: bool,
}

/// Data for registering a new patient.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = patients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: jiff_diesel::Date,
    pub gender: String,
    pub blood_type: Option<String>,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_name2: Option<String>,
    pub emergency_contact_phone2: Option<String>,
    pub emergency_contact_name3: Option<String>,
    pub emergency_contact_phone3: Option<String>,
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    pub insurance_provider: Option<String>,
    pub insurance_number: Option<String>,
    pub status: bool,
    pub active: bool,
}

/// Full replacement of a patient's editable fields.
///
/// `None` clears the column; updates are never partial.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = patients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct UpdatePatient {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: jiff_diesel::Date,
    pub gender: String,
    pub blood_type: Option<String>,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_name2: Option<String>,
    pub emergency_contact_phone2: Option<String>,
    pub emergency_contact_name3: Option<String>,
    pub emergency_contact_phone3: Option<String>,
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    pub insurance_provider: Option<String>,
    pub insurance_number: Option<String>,
    pub status: bool,
    pub active: bool,
    pub updated_at: Timestamp,
}

impl Patient {
    /// Returns the date of birth.
    #[inline]
    pub fn birth_date(&self) -> Date {
        self.birth_date.into()
    }

    /// Returns the patient's age in whole years on the given day.
    ///
    /// Birth dates in the future yield zero.
    pub fn age_on(&self, today: Date) -> i16 {
        age_between(self.birth_date(), today)
    }

    /// Returns the registration timestamp.
    #[inline]
    pub fn registered_at(&self) -> jiff::Timestamp {
        self.registration_date.into()
    }

    /// Returns the last update timestamp.
    #[inline]
    pub fn updated_at(&self) -> jiff::Timestamp {
        self.updated_at.into()
    }
}

/// Whole years elapsed from `birth` to `today`.
pub(crate) fn age_between(birth: Date, today: Date) -> i16 {
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }

    years.max(0)
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn age_counts_completed_years() {
        let birth = date(1990, 6, 15);
        assert_eq!(age_between(birth, date(2025, 6, 14)), 34);
        assert_eq!(age_between(birth, date(2025, 6, 15)), 35);
        assert_eq!(age_between(birth, date(2025, 12, 31)), 35);
    }

    #[test]
    fn age_is_never_negative() {
        assert_eq!(age_between(date(2030, 1, 1), date(2025, 1, 1)), 0);
    }

    #[test]
    fn leap_day_birthdays_roll_over_on_march_first() {
        let birth = date(2000, 2, 29);
        assert_eq!(age_between(birth, date(2021, 2, 28)), 20);
        assert_eq!(age_between(birth, date(2021, 3, 1)), 21);
    }
}
