//! Staff administration endpoints.

use axum::Extension;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use cracare_auth::password;
use cracare_core::access::{Action, Caller};
use cracare_core::error::CraError;
use cracare_core::models::role::Role;
use cracare_core::models::staff::{CreateStaff, UpdateStaff};
use serde::Deserialize;
use surrealdb::Connection;
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::{ApiJson, ApiPath, data, nullable};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateStaffRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub national_id: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub supervisor_id: Option<Uuid>,
    pub license_number: Option<String>,
    pub specialty: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStaffRequest {
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub national_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub phone: Option<Option<String>>,
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "nullable")]
    pub supervisor_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "nullable")]
    pub license_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub specialty: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub department: Option<Option<String>>,
    pub active: Option<bool>,
    pub password: Option<String>,
}

/// `GET /api/staff`
pub async fn list<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(data(state.staff().list(&caller).await?))
}

/// `GET /api/staff/:id`
pub async fn get<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(data(state.staff().get(&caller, id).await?))
}

/// `POST /api/staff`
pub async fn create<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiJson(body): ApiJson<CreateStaffRequest>,
) -> Result<impl IntoResponse, ApiError> {
    caller.require(Action::StaffManage)?;
    password::check_policy(&body.password, state.auth_config()).map_err(CraError::from)?;

    let staff = state
        .staff()
        .create(
            &caller,
            CreateStaff {
                email: body.email,
                password: body.password,
                first_name: body.first_name,
                last_name: body.last_name,
                national_id: body.national_id,
                phone: body.phone,
                role: body.role,
                supervisor_id: body.supervisor_id,
                license_number: body.license_number,
                specialty: body.specialty,
                department: body.department,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, data(staff)))
}

/// `PATCH /api/staff/:id`
pub async fn update<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<UpdateStaffRequest>,
) -> Result<impl IntoResponse, ApiError> {
    caller.require(Action::StaffManage)?;
    if let Some(new_password) = &body.password {
        password::check_policy(new_password, state.auth_config()).map_err(CraError::from)?;
    }

    let staff = state
        .staff()
        .update(
            &caller,
            id,
            UpdateStaff {
                first_name: body.first_name,
                last_name: body.last_name,
                national_id: body.national_id,
                phone: body.phone,
                role: body.role,
                supervisor_id: body.supervisor_id,
                license_number: body.license_number,
                specialty: body.specialty,
                department: body.department,
                active: body.active,
                password: body.password,
            },
        )
        .await?;

    Ok(data(staff))
}

/// `DELETE /api/staff/:id` (soft delete)
pub async fn deactivate<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.staff().deactivate(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
