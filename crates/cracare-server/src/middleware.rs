//! Bearer token authentication middleware.
//!
//! Extracts `Authorization: Bearer <token>`, resolves it against the
//! current staff row and injects the resulting [`Caller`] into request
//! extensions for downstream handlers.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use cracare_auth::AuthError;
use cracare_core::access::Caller;
use cracare_core::error::CraError;
use surrealdb::Connection;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn require_auth<C: Connection>(
    State(state): State<AppState<C>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| CraError::from(AuthError::MissingToken))?;

    let staff = state.auth().authenticate(&token).await?;
    let caller: Caller = staff.caller();
    req.extensions_mut().insert(caller);

    Ok(next.run(req).await)
}
