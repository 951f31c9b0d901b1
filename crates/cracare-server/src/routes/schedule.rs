//! Shift calendar endpoints.
//!
//! The same handlers serve `/api/schedule` (operational track) and
//! `/api/nursing-schedule` (nursing track); each nested router carries its
//! [`ShiftTrack`] as a request extension.

use axum::Extension;
use axum::extract::State;
use axum::response::IntoResponse;
use cracare_core::access::Caller;
use cracare_core::models::shift::{SetDay, ShiftTrack};
use serde::Deserialize;
use surrealdb::Connection;

use crate::error::ApiError;
use crate::routes::{ApiJson, ApiQuery, data};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u32,
}

/// `GET /api/{schedule,nursing-schedule}/team`
pub async fn team<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(track): Extension<ShiftTrack>,
    Extension(caller): Extension<Caller>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(data(state.schedule(track).team(&caller).await?))
}

/// `GET /api/{schedule,nursing-schedule}/month?year=&month=`
pub async fn month<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(track): Extension<ShiftTrack>,
    Extension(caller): Extension<Caller>,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .schedule(track)
        .month(&caller, query.year, query.month)
        .await?;
    Ok(data(rows))
}

/// `GET /api/{schedule,nursing-schedule}/mine?year=&month=`
pub async fn mine<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(track): Extension<ShiftTrack>,
    Extension(caller): Extension<Caller>,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .schedule(track)
        .mine(&caller, query.year, query.month)
        .await?;
    Ok(data(rows))
}

/// `POST /api/{schedule,nursing-schedule}/day`
pub async fn set_day<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(track): Extension<ShiftTrack>,
    Extension(caller): Extension<Caller>,
    ApiJson(body): ApiJson<SetDay>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(data(state.schedule(track).set_day(&caller, body).await?))
}
