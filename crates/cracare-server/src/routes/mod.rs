//! HTTP routes.
//!
//! Every protected handler receives the authenticated [`Caller`] from the
//! auth middleware and delegates to a domain service. Success bodies are
//! wrapped as `{ "data": ... }`.
//!
//! NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
//!
//! [`Caller`]: cracare_core::access::Caller

pub mod auth;
pub mod orders;
pub mod patients;
pub mod schedule;
pub mod staff;
pub mod supply;
pub mod visits;

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ApiError;

/// Success envelope.
#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub data: T,
}

pub fn data<T: Serialize>(value: T) -> Json<Data<T>> {
    Json(Data { data: value })
}

/// `axum::Json` with rejections reported as [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Path` with rejections reported as [`ApiError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// `axum::extract::Query` with rejections reported as [`ApiError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`) in PATCH bodies. Use with `#[serde(default)]`.
pub(crate) fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
