use jiff::Timestamp;
use jiff::civil::Date;
use medrec_postgres::model::Patient;
use serde::Serialize;
use uuid::Uuid;

/// A patient as returned by the API.
///
/// Optional attributes that are not set are left out of the body.
#[must_use]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Date,
    /// Whole years from the birth date to today.
    pub age: i16,
    pub gender: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact_name2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact_phone2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact_name3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact_phone3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance_number: Option<String>,
    pub registration_date: Timestamp,
    pub updated_at: Timestamp,
    pub active: bool,
    pub status: bool,
}

impl PatientResponse {
    /// Builds the response, computing the age as of `today`.
    pub fn new(patient: Patient, today: Date) -> Self {
        Self {
            id: patient.id,
            birth_date: patient.birth_date(),
            age: patient.age_on(today),
            registration_date: patient.registered_at(),
            updated_at: patient.updated_at(),
            first_name: patient.first_name,
            last_name: patient.last_name,
            gender: patient.gender,
            blood_type: patient.blood_type,
            phone: patient.phone,
            email: patient.email,
            address: patient.address,
            city: patient.city,
            country: patient.country,
            postal_code: patient.postal_code,
            emergency_contact_name: patient.emergency_contact_name,
            emergency_contact_phone: patient.emergency_contact_phone,
            emergency_contact_name2: patient.emergency_contact_name2,
            emergency_contact_phone2: patient.emergency_contact_phone2,
            emergency_contact_name3: patient.emergency_contact_name3,
            emergency_contact_phone3: patient.emergency_contact_phone3,
            medical_history: patient.medical_history,
            allergies: patient.allergies,
            insurance_provider: patient.insurance_provider,
            insurance_number: patient.insurance_number,
            active: patient.active,
            status: patient.status,
        }
    }
}

impl From<Patient> for PatientResponse {
    fn from(patient: Patient) -> Self {
        Self::new(patient, jiff::Zoned::now().date())
    }
}

/// A page of active patients.
pub type PatientsResponse = Vec<PatientResponse>;
