//! Resident endpoints.

use axum::Extension;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::NaiveDate;
use cracare_core::access::Caller;
use cracare_core::models::patient::{CreatePatient, UpdatePatient};
use serde::Deserialize;
use surrealdb::Connection;
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::{ApiJson, ApiPath, data, nullable};
use crate::state::AppState;

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CreatePatientRequest {
    pub first_name: String,
    pub last_name: Option<String>,
    pub national_id: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub admission_date: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub active: bool,
    pub team_lead_id: Option<Uuid>,
    pub allergies: Option<String>,
    pub conditions: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePatientRequest {
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub national_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub birth_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    pub admission_date: Option<Option<NaiveDate>>,
    pub active: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub team_lead_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "nullable")]
    pub allergies: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub conditions: Option<Option<String>>,
}

/// `GET /api/patients`
pub async fn list<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(data(state.patients().list(&caller).await?))
}

/// `GET /api/patients/:id`
pub async fn get<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(data(state.patients().get(&caller, id).await?))
}

/// `POST /api/patients`
pub async fn create<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiJson(body): ApiJson<CreatePatientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let patient = state
        .patients()
        .create(
            &caller,
            CreatePatient {
                first_name: body.first_name,
                last_name: body.last_name,
                national_id: body.national_id,
                birth_date: body.birth_date,
                admission_date: body.admission_date,
                active: body.active,
                team_lead_id: body.team_lead_id,
                allergies: body.allergies,
                conditions: body.conditions,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, data(patient)))
}

/// `PATCH /api/patients/:id`
pub async fn update<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<UpdatePatientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let patient = state
        .patients()
        .update(
            &caller,
            id,
            UpdatePatient {
                first_name: body.first_name,
                last_name: body.last_name,
                national_id: body.national_id,
                birth_date: body.birth_date,
                admission_date: body.admission_date,
                active: body.active,
                team_lead_id: body.team_lead_id,
                allergies: body.allergies,
                conditions: body.conditions,
            },
        )
        .await?;

    Ok(data(patient))
}

/// `DELETE /api/patients/:id`
pub async fn delete<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.patients().delete(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
