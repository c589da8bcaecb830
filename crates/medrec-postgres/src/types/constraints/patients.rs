//! Patients table constraints.
//!
//! This is the single rule table the violation classifier consults: each
//! constraint name maps to the API field it guards and, for a curated subset,
//! a localized message.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Patients table constraints, named exactly as the migration declares them.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum PatientConstraints {
    // Patient validation constraints
    #[strum(serialize = "patients_first_name_check")]
    FirstNameFormat,
    #[strum(serialize = "patients_last_name_check")]
    LastNameFormat,
    #[strum(serialize = "patients_gender_check")]
    GenderFormat,
    #[strum(serialize = "patients_blood_type_check")]
    BloodTypeFormat,
    #[strum(serialize = "patients_phone_check")]
    PhoneFormat,
    #[strum(serialize = "patients_city_check")]
    CityFormat,
    #[strum(serialize = "patients_country_check")]
    CountryFormat,
    #[strum(serialize = "patients_postal_code_check")]
    PostalCodeFormat,

    // Patient unique constraints
    #[strum(serialize = "patients_pkey")]
    PrimaryKey,
    #[strum(serialize = "patients_email_key")]
    EmailUnique,
    #[strum(serialize = "patients_phone_key")]
    PhoneUnique,
    #[strum(serialize = "patients_insurance_number_key")]
    InsuranceNumberUnique,
}

impl PatientConstraints {
    /// Creates a new [`PatientConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the API field name this constraint guards.
    pub fn field(&self) -> &'static str {
        match self {
            PatientConstraints::FirstNameFormat => "firstName",
            PatientConstraints::LastNameFormat => "lastName",
            PatientConstraints::GenderFormat => "gender",
            PatientConstraints::BloodTypeFormat => "bloodType",
            PatientConstraints::PhoneFormat | PatientConstraints::PhoneUnique => "phone",
            PatientConstraints::CityFormat => "city",
            PatientConstraints::CountryFormat => "country",
            PatientConstraints::PostalCodeFormat => "postalCode",
            PatientConstraints::PrimaryKey => "id",
            PatientConstraints::EmailUnique => "email",
            PatientConstraints::InsuranceNumberUnique => "insuranceNumber",
        }
    }

    /// Returns the curated user-facing message, if this constraint has one.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            PatientConstraints::FirstNameFormat => Some(
                "El formato del nombre es incorrecto. Debe contener solo letras, espacios, \
                 puntos y guiones. Ejemplo válido: 'Carlos E.'",
            ),
            PatientConstraints::LastNameFormat => Some(
                "El formato del apellido es incorrecto. Debe contener solo letras, espacios, \
                 puntos y guiones. Ejemplo válido: 'Lott S.'",
            ),
            _ => None,
        }
    }

    /// Returns the category of this constraint.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            PatientConstraints::FirstNameFormat
            | PatientConstraints::LastNameFormat
            | PatientConstraints::GenderFormat
            | PatientConstraints::BloodTypeFormat
            | PatientConstraints::PhoneFormat
            | PatientConstraints::CityFormat
            | PatientConstraints::CountryFormat
            | PatientConstraints::PostalCodeFormat => ConstraintCategory::Validation,

            PatientConstraints::PrimaryKey
            | PatientConstraints::EmailUnique
            | PatientConstraints::PhoneUnique
            | PatientConstraints::InsuranceNumberUnique => ConstraintCategory::Uniqueness,
        }
    }
}

impl From<PatientConstraints> for String {
    #[inline]
    fn from(val: PatientConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for PatientConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
