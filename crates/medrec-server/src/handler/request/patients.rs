use jiff::civil::Date;
use medrec_postgres::model::{NewPatient, UpdatePatient};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validations::{
    BLOOD_TYPE, GENDER, PERSON_NAME, PHONE, POSTAL_CODE, not_blank, past_date,
};

/// Request payload for registering or replacing a patient.
///
/// Required attributes are optional here so that a missing value is reported
/// as a validation error on its field rather than as an unreadable body.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PatientRequest {
    #[validate(
        required(message = "El nombre no puede estar vacío"),
        custom(function = "not_blank", message = "El nombre no puede estar vacío"),
        regex(
            path = *PERSON_NAME,
            message = "El nombre debe contener caracteres alfabéticos y no puede terminar con punto o espacio"
        )
    )]
    pub first_name: Option<String>,

    #[validate(
        required(message = "El apellido no puede estar vacío"),
        custom(function = "not_blank", message = "El apellido no puede estar vacío"),
        regex(
            path = *PERSON_NAME,
            message = "El apellido debe contener caracteres alfabéticos y no puede terminar con punto o espacio"
        )
    )]
    pub last_name: Option<String>,

    #[validate(
        required(message = "La fecha de nacimiento es obligatoria"),
        custom(function = "past_date", message = "La fecha de nacimiento debe ser en el pasado")
    )]
    pub birth_date: Option<Date>,

    #[validate(
        required(message = "El género es obligatorio"),
        regex(path = *GENDER, message = "El género debe ser M, F, O, NB o X")
    )]
    pub gender: Option<String>,

    #[validate(regex(
        path = *BLOOD_TYPE,
        message = "Tipo de sangre inválido (debe ser A+, A-, B+, B-, AB+, AB-, O+, O-)"
    ))]
    pub blood_type: Option<String>,

    #[validate(
        required(message = "El teléfono no puede estar vacío"),
        custom(function = "not_blank", message = "El teléfono no puede estar vacío"),
        regex(path = *PHONE, message = "Formato de teléfono inválido")
    )]
    pub phone: Option<String>,

    #[validate(
        required(message = "El email no puede estar vacío"),
        custom(function = "not_blank", message = "El email no puede estar vacío"),
        email(message = "Formato de email inválido")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "La dirección no puede estar vacía"),
        custom(function = "not_blank", message = "La dirección no puede estar vacía")
    )]
    pub address: Option<String>,

    #[validate(
        required(message = "La ciudad no puede estar vacía"),
        custom(function = "not_blank", message = "La ciudad no puede estar vacía"),
        regex(path = *PERSON_NAME, message = "La ciudad debe contener caracteres alfabéticos")
    )]
    pub city: Option<String>,

    #[validate(
        required(message = "El país no puede estar vacío"),
        custom(function = "not_blank", message = "El país no puede estar vacío"),
        regex(
            path = *PERSON_NAME,
            message = "El país debe contener de 2 a 50 caracteres alfabéticos, puntos, comas, guiones o apóstrofes"
        )
    )]
    pub country: Option<String>,

    #[validate(
        required(message = "El código postal es obligatorio"),
        regex(
            path = *POSTAL_CODE,
            message = "Código postal inválido. Debe contener entre 3 y 10 caracteres alfanuméricos"
        )
    )]
    pub postal_code: Option<String>,

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

    /// Defaults to `true`.
    pub active: Option<bool>,
}

impl PatientRequest {
    /// Converts a validated request into a new patient row.
    ///
    /// Returns `None` if a required attribute is missing, which validation
    /// already rules out.
    pub fn into_new_patient(self) -> Option<NewPatient> {
        Some(NewPatient {
            first_name: self.first_name?,
            last_name: self.last_name?,
            birth_date: self.birth_date?.into(),
            gender: self.gender?,
            blood_type: blank_to_none(self.blood_type),
            phone: self.phone?,
            email: self.email?,
            address: self.address?,
            city: self.city?,
            country: self.country?,
            postal_code: self.postal_code?,
            emergency_contact_name: blank_to_none(self.emergency_contact_name),
            emergency_contact_phone: blank_to_none(self.emergency_contact_phone),
            emergency_contact_name2: blank_to_none(self.emergency_contact_name2),
            emergency_contact_phone2: blank_to_none(self.emergency_contact_phone2),
            emergency_contact_name3: blank_to_none(self.emergency_contact_name3),
            emergency_contact_phone3: blank_to_none(self.emergency_contact_phone3),
            medical_history: blank_to_none(self.medical_history),
            allergies: blank_to_none(self.allergies),
            insurance_provider: blank_to_none(self.insurance_provider),
            insurance_number: blank_to_none(self.insurance_number),
            status: true,
            active: self.active.unwrap_or(true),
        })
    }

    /// Converts a validated request into a full replacement of a patient.
    pub fn into_update_patient(self) -> Option<UpdatePatient> {
        let patient = self.into_new_patient()?;
        Some(UpdatePatient {
            first_name: patient.first_name,
            last_name: patient.last_name,
            birth_date: patient.birth_date,
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
            status: patient.status,
            active: patient.active,
            updated_at: jiff::Timestamp::now().into(),
        })
    }
}

/// Optional attributes sent as empty strings are stored as absent.
///
/// An empty insurance number would otherwise collide with every other empty one.
fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
