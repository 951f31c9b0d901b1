//! Supply request endpoints.

use axum::Extension;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use cracare_core::access::{Action, Caller};
use cracare_core::models::supply_request::SupplyRequestStatus;
use serde::Deserialize;
use surrealdb::Connection;
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::{ApiJson, ApiPath, data};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RaiseRequest {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

/// `GET /api/supply-requests`
pub async fn list<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(data(state.supply_requests().list(&caller).await?))
}

/// `POST /api/supply-requests`
pub async fn raise<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiJson(body): ApiJson<RaiseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let request = state
        .supply_requests()
        .raise(&caller, &body.description)
        .await?;
    Ok((StatusCode::CREATED, data(request)))
}

/// `PATCH /api/supply-requests/:id/status`
pub async fn advance<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<StatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    caller.require(Action::SupplyRequestAdvance)?;
    let status: SupplyRequestStatus = body.status.trim().parse()?;
    let request = state.supply_requests().advance(&caller, id, status).await?;
    Ok(data(request))
}

/// `PATCH /api/supply-requests/:id/complete`
pub async fn complete<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let request = state.supply_requests().complete(&caller, id).await?;
    Ok(data(request))
}
