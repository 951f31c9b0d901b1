//! Login and current-identity endpoints.

use axum::Extension;
use axum::extract::State;
use axum::response::IntoResponse;
use cracare_core::access::Caller;
use cracare_core::models::staff::StaffMember;
use serde::{Deserialize, Serialize};
use surrealdb::Connection;

use crate::error::ApiError;
use crate::routes::{ApiJson, data};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: u64,
    pub user: StaffMember,
}

/// `POST /api/auth/login`
pub async fn login<C: Connection>(
    State(state): State<AppState<C>>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let output = state.auth().login(&body.email, &body.password).await?;

    Ok(data(LoginResponse {
        token: output.access_token,
        expires_in: output.expires_in,
        user: output.staff,
    }))
}

/// `GET /api/auth/me`
pub async fn me<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
) -> Result<impl IntoResponse, ApiError> {
    let staff = state.auth().current(&caller).await?;
    Ok(data(staff))
}
