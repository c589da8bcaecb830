//! Patient repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::Pagination;
use crate::model::{NewPatient, Patient, UpdatePatient};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Repository for patient database operations.
///
/// Writes surface constraint violations as [`PgError::Query`]; callers turn
/// those into field-scoped reports through [`PgError::raw_failure`].
pub trait PatientRepository {
    /// Registers a new patient.
    fn create_patient(
        &mut self,
        new_patient: NewPatient,
    ) -> impl Future<Output = PgResult<Patient>> + Send;

    /// Finds a patient by identifier, whether active or not.
    fn find_patient_by_id(
        &mut self,
        patient_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Patient>>> + Send;

    /// Lists active patients, most recently registered first.
    fn list_active_patients(
        &mut self,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<Patient>>> + Send;

    /// Replaces every editable field of a patient.
    ///
    /// Returns `None` if the patient does not exist.
    fn update_patient(
        &mut self,
        patient_id: Uuid,
        changes: UpdatePatient,
    ) -> impl Future<Output = PgResult<Option<Patient>>> + Send;

    /// Soft deletes a patient by clearing its `active` flag.
    ///
    /// Returns `None` if the patient does not exist.
    fn deactivate_patient(
        &mut self,
        patient_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Patient>>> + Send;
}

impl PatientRepository for PgConnection {
    async fn create_patient(&mut self, mut new_patient: NewPatient) -> PgResult<Patient> {
        use schema::patients;

        new_patient.email = new_patient.email.trim().to_owned();
        new_patient.phone = new_patient.phone.trim().to_owned();

        let patient = diesel::insert_into(patients::table)
            .values(&new_patient)
            .returning(Patient::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        tracing::debug!(target: TRACING_TARGET_QUERY, patient_id = %patient.id, "Patient created");
        Ok(patient)
    }

    async fn find_patient_by_id(&mut self, patient_id: Uuid) -> PgResult<Option<Patient>> {
        use schema::patients::{self, dsl};

        patients::table
            .filter(dsl::id.eq(patient_id))
            .select(Patient::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_active_patients(&mut self, pagination: Pagination) -> PgResult<Vec<Patient>> {
        use schema::patients::{self, dsl};

        patients::table
            .filter(dsl::active.eq(true))
            .order((dsl::registration_date.desc(), dsl::id.asc()))
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(Patient::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn update_patient(
        &mut self,
        patient_id: Uuid,
        mut changes: UpdatePatient,
    ) -> PgResult<Option<Patient>> {
        use schema::patients::{self, dsl};

        changes.email = changes.email.trim().to_owned();
        changes.phone = changes.phone.trim().to_owned();

        diesel::update(patients::table.filter(dsl::id.eq(patient_id)))
            .set(&changes)
            .returning(Patient::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn deactivate_patient(&mut self, patient_id: Uuid) -> PgResult<Option<Patient>> {
        use schema::patients::{self, dsl};

        let now = jiff_diesel::Timestamp::from(jiff::Timestamp::now());
        diesel::update(patients::table.filter(dsl::id.eq(patient_id)))
            .set((dsl::active.eq(false), dsl::updated_at.eq(now)))
            .returning(Patient::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }
}
