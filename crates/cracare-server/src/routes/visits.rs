//! Reception endpoints: visitors and appointments.

use axum::Extension;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, NaiveDate, Utc};
use cracare_care::AppointmentQuery;
use cracare_core::access::Caller;
use cracare_core::models::visit::{
    AppointmentStatus, CreateAppointment, CreateVisitor, UpdateAppointment, UpdateVisitor,
};
use serde::Deserialize;
use surrealdb::Connection;
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::{ApiJson, ApiPath, ApiQuery, data, nullable};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateVisitorRequest {
    #[serde(default)]
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub relationship: Option<String>,
    pub document: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateVisitorRequest {
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub relationship: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub document: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct AppointmentListQuery {
    pub patient_id: Option<Uuid>,
    pub status: Option<AppointmentStatus>,
    pub date: Option<NaiveDate>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAppointmentRequest {
    pub patient_id: Uuid,
    pub visitor_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub scheduled_at: Option<DateTime<Utc>>,
    pub status: Option<AppointmentStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

// -- Visitors --------------------------------------------------------------

/// `GET /api/visitors?q=`
pub async fn list_visitors<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let visitors = state
        .visits()
        .search_visitors(&caller, query.q.as_deref())
        .await?;
    Ok(data(visitors))
}

/// `GET /api/visitors/:id`
pub async fn get_visitor<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(data(state.visits().get_visitor(&caller, id).await?))
}

/// `POST /api/visitors`
pub async fn create_visitor<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiJson(body): ApiJson<CreateVisitorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let visitor = state
        .visits()
        .create_visitor(
            &caller,
            CreateVisitor {
                first_name: body.first_name,
                last_name: body.last_name,
                phone: body.phone,
                email: body.email,
                relationship: body.relationship,
                document: body.document,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, data(visitor)))
}

/// `PATCH /api/visitors/:id`
pub async fn update_visitor<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<UpdateVisitorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let visitor = state
        .visits()
        .update_visitor(
            &caller,
            id,
            UpdateVisitor {
                first_name: body.first_name,
                last_name: body.last_name,
                phone: body.phone,
                email: body.email,
                relationship: body.relationship,
                document: body.document,
            },
        )
        .await?;
    Ok(data(visitor))
}

// -- Appointments ----------------------------------------------------------

/// `GET /api/appointments?patient_id=&status=&date=&from=&to=`
pub async fn list_appointments<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiQuery(query): ApiQuery<AppointmentListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let appointments = state
        .visits()
        .list_appointments(
            &caller,
            AppointmentQuery {
                patient_id: query.patient_id,
                status: query.status,
                date: query.date,
                from: query.from,
                to: query.to,
            },
        )
        .await?;
    Ok(data(appointments))
}

/// `GET /api/appointments/upcoming`
pub async fn upcoming<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(data(state.visits().upcoming(&caller).await?))
}

/// `GET /api/appointments/:id`
pub async fn get_appointment<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(data(state.visits().get_appointment(&caller, id).await?))
}

/// `POST /api/appointments`
pub async fn create_appointment<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiJson(body): ApiJson<CreateAppointmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let appointment = state
        .visits()
        .create_appointment(
            &caller,
            CreateAppointment {
                patient_id: body.patient_id,
                visitor_id: body.visitor_id,
                scheduled_at: body.scheduled_at,
                notes: body.notes,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, data(appointment)))
}

/// `PATCH /api/appointments/:id`
pub async fn update_appointment<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<UpdateAppointmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let appointment = state
        .visits()
        .update_appointment(
            &caller,
            id,
            UpdateAppointment {
                scheduled_at: body.scheduled_at,
                status: body.status,
                notes: body.notes,
            },
        )
        .await?;
    Ok(data(appointment))
}

/// `DELETE /api/appointments/:id`
pub async fn delete_appointment<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(caller): Extension<Caller>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.visits().delete_appointment(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
