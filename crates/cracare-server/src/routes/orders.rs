//! Medication and treatment order endpoints.
//!
//! Orders are listed and created under their resident
//! (`/api/patients/:id/medications`), and edited by their own id
//! (`/api/medications/:id`). `/api/medications` and
//! `/api/medication-diary` span every resident the caller may see.

use axum::Extension;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use cracare_care::{MedicationPatch, NewMedication, TreatmentPatch};
use cracare_core::access::Caller;
use serde::Deserialize;
use surrealdb::Connection;
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::{ApiJson, ApiPath, data, nullable};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateMedicationRequest {
    #[serde(default)]
    pub medication: String,
    pub dose: Option<String>,
    pub frequency: Option<String>,
    pub instructions: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMedicationRequest {
    pub medication: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub dose: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub frequency: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub instructions: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub scheduled_at: Option<Option<DateTime<Utc>>>,
    pub administered: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTreatmentRequest {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTreatmentRequest {
    pub description: Option<String>,
    pub administered: Option<bool>,
}

// -- Medications -----------------------------------------------------------

/// `GET /api/medications`
pub async fn medication_grid<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(data(state.medications().grid(&caller).await?))
}

/// `GET /api/medication-diary`
pub async fn medication_diary<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(data(state.medications().diary(&caller).await?))
}

/// `GET /api/patients/:id/medications`
pub async fn list_medications<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiPath(patient_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(data(state.medications().list(&caller, patient_id).await?))
}

/// `POST /api/patients/:id/medications`
pub async fn create_medication<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiPath(patient_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<CreateMedicationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .medications()
        .create(
            &caller,
            patient_id,
            NewMedication {
                medication: body.medication,
                dose: body.dose,
                frequency: body.frequency,
                instructions: body.instructions,
                scheduled_at: body.scheduled_at,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, data(order)))
}

/// `PATCH /api/medications/:id`
pub async fn update_medication<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<UpdateMedicationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .medications()
        .update(
            &caller,
            id,
            MedicationPatch {
                medication: body.medication,
                dose: body.dose,
                frequency: body.frequency,
                instructions: body.instructions,
                scheduled_at: body.scheduled_at,
                administered: body.administered,
            },
        )
        .await?;

    Ok(data(order))
}

/// `DELETE /api/medications/:id`
pub async fn delete_medication<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.medications().delete(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// -- Treatments ------------------------------------------------------------

/// `GET /api/patients/:id/treatments`
pub async fn list_treatments<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiPath(patient_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(data(state.treatments().list(&caller, patient_id).await?))
}

/// `POST /api/patients/:id/treatments`
pub async fn create_treatment<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiPath(patient_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<CreateTreatmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .treatments()
        .create(&caller, patient_id, &body.description)
        .await?;

    Ok((StatusCode::CREATED, data(order)))
}

/// `PATCH /api/treatments/:id`
pub async fn update_treatment<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<UpdateTreatmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .treatments()
        .update(
            &caller,
            id,
            TreatmentPatch {
                description: body.description,
                administered: body.administered,
            },
        )
        .await?;

    Ok(data(order))
}

/// `DELETE /api/treatments/:id`
pub async fn delete_treatment<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.treatments().delete(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
