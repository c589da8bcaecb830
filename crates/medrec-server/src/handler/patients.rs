//! Patient registry handlers.
//!
//! Deleting a patient only clears its `active` flag: the listing hides it,
//! while lookups by id keep returning it.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use medrec_postgres::PgClient;
use medrec_postgres::query::PatientRepository;
use uuid::Uuid;

use crate::extract::{Json, Path, ValidateJson, ValidateQuery};
use crate::handler::request::{Pagination, PatientPathParams, PatientRequest};
use crate::handler::response::{PatientResponse, PatientsResponse};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for patient operations.
const TRACING_TARGET: &str = "medrec_server::handler::patients";

fn patient_not_found(patient_id: Uuid) -> Error<'static> {
    ErrorKind::NotFound
        .with_field("id")
        .with_message(format!("Paciente no encontrado con id: {patient_id}"))
}

fn incomplete_request() -> Error<'static> {
    ErrorKind::Validation.with_context("validated patient request is missing a required field")
}

/// Registers a new patient.
#[tracing::instrument(skip_all)]
async fn create_patient(
    State(pg_client): State<PgClient>,
    ValidateJson(request): ValidateJson<PatientRequest>,
) -> Result<(StatusCode, Json<PatientResponse>)> {
    let new_patient = request.into_new_patient().ok_or_else(incomplete_request)?;

    let mut conn = pg_client.get_connection().await?;
    let patient = conn.create_patient(new_patient).await?;

    tracing::info!(
        target: TRACING_TARGET,
        patient_id = %patient.id,
        "patient registered"
    );

    Ok((StatusCode::CREATED, Json(patient.into())))
}

/// Lists active patients, most recently registered first.
#[tracing::instrument(skip_all)]
async fn list_patients(
    State(pg_client): State<PgClient>,
    ValidateQuery(pagination): ValidateQuery<Pagination>,
) -> Result<(StatusCode, Json<PatientsResponse>)> {
    let mut conn = pg_client.get_connection().await?;
    let patients = conn.list_active_patients(pagination.into()).await?;

    tracing::debug!(
        target: TRACING_TARGET,
        count = patients.len(),
        "listed active patients"
    );

    let response = patients.into_iter().map(PatientResponse::from).collect();
    Ok((StatusCode::OK, Json(response)))
}

/// Returns a patient by id, including deactivated ones.
#[tracing::instrument(skip_all, fields(patient_id = %path_params.patient_id))]
async fn read_patient(
    State(pg_client): State<PgClient>,
    Path(path_params): Path<PatientPathParams>,
) -> Result<(StatusCode, Json<PatientResponse>)> {
    let mut conn = pg_client.get_connection().await?;

    let Some(patient) = conn.find_patient_by_id(path_params.patient_id).await? else {
        return Err(patient_not_found(path_params.patient_id));
    };

    Ok((StatusCode::OK, Json(patient.into())))
}

/// Replaces every editable field of a patient.
#[tracing::instrument(skip_all, fields(patient_id = %path_params.patient_id))]
async fn update_patient(
    State(pg_client): State<PgClient>,
    Path(path_params): Path<PatientPathParams>,
    ValidateJson(request): ValidateJson<PatientRequest>,
) -> Result<(StatusCode, Json<PatientResponse>)> {
    let changes = request.into_update_patient().ok_or_else(incomplete_request)?;

    let mut conn = pg_client.get_connection().await?;
    let Some(patient) = conn.update_patient(path_params.patient_id, changes).await? else {
        return Err(patient_not_found(path_params.patient_id));
    };

    tracing::info!(target: TRACING_TARGET, "patient updated");

    Ok((StatusCode::OK, Json(patient.into())))
}

/// Soft deletes a patient.
#[tracing::instrument(skip_all, fields(patient_id = %path_params.patient_id))]
async fn delete_patient(
    State(pg_client): State<PgClient>,
    Path(path_params): Path<PatientPathParams>,
) -> Result<StatusCode> {
    let mut conn = pg_client.get_connection().await?;
    if conn.deactivate_patient(path_params.patient_id).await?.is_none() {
        return Err(patient_not_found(path_params.patient_id));
    }

    tracing::info!(target: TRACING_TARGET, "patient deactivated");

    Ok(StatusCode::NO_CONTENT)
}

/// Returns a [`Router`] with all patient routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/v1/patients", post(create_patient).get(list_patients))
        .route(
            "/v1/patients/{patientId}",
            get(read_patient).put(update_patient).delete(delete_patient),
        )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::handler::patients::routes;
    use crate::handler::test::create_test_server_with_router;

    fn valid_body() -> Value {
        json!({
            "firstName": "Ana",
            "lastName": "Ruiz",
            "birthDate": "1985-02-28",
            "gender": "F",
            "phone": "+34600111222",
            "email": "ana@example.com",
            "address": "Calle Mayor 1",
            "city": "Madrid",
            "country": "España",
            "postalCode": "28001"
        })
    }

    #[tokio::test]
    async fn invalid_body_is_a_validation_error() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes()).await?;

        let mut body = valid_body();
        body["email"] = json!("not-an-email");
        body["postalCode"] = json!("!");

        let response = server.post("/v1/patients").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let envelope = response.json::<Value>();
        assert_eq!(envelope["status"], 400);
        assert_eq!(envelope["error"], "Errores de validación");
        assert_eq!(
            envelope["errors"],
            json!([
                { "campo": "email", "mensaje": "Formato de email inválido" },
                {
                    "campo": "postalCode",
                    "mensaje": "Código postal inválido. Debe contener entre 3 y 10 caracteres alfanuméricos"
                }
            ])
        );
        assert!(envelope["timestamp"].is_string());
        Ok(())
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes()).await?;

        let response = server
            .post("/v1/patients")
            .text("{\"firstName\":")
            .content_type("application/json")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], "Solicitud incorrecta");
        Ok(())
    }

    #[tokio::test]
    async fn malformed_ids_are_rejected_before_the_database() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes()).await?;
        let expected = json!([{
            "campo": "id",
            "mensaje": "El ID proporcionado no tiene un formato válido de UUID."
        }]);

        let response = server.get("/v1/patients/not-a-uuid").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["errors"], expected);

        let response = server.put("/v1/patients/123").json(&valid_body()).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["errors"], expected);

        let response = server.delete("/v1/patients/abc").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["errors"], expected);
        Ok(())
    }

    #[tokio::test]
    async fn out_of_range_pagination_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes()).await?;

        let response = server.get("/v1/patients").add_query_param("limit", 0).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let envelope = response.json::<Value>();
        assert_eq!(envelope["error"], "Errores de validación");
        assert_eq!(envelope["errors"][0]["campo"], "limit");

        let response = server.get("/v1/patients").add_query_param("offset", "abc").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], "Errores de validación");
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_database_is_masked() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes()).await?;

        let response = server
            .get("/v1/patients/3f2504e0-4f89-11d3-9a0c-0305e82c3301")
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        let envelope = response.json::<Value>();
        assert_eq!(envelope["error"], "Error interno del servidor");
        assert_eq!(
            envelope["errors"],
            json!([{ "mensaje": "Ocurrió un error inesperado. Contacte con soporte." }])
        );
        Ok(())
    }
}
