//! CRACare HTTP API.
//!
//! Returns a composable `Router` over any SurrealDB engine: the binary
//! mounts it on a remote WebSocket connection, tests on the in-memory
//! engine.

pub mod bootstrap;
pub mod config;
pub mod error;
mod middleware;
pub mod routes;
mod state;

use axum::routing::{get, patch, post};
use axum::{Extension, Json, Router};
use cracare_core::models::shift::ShiftTrack;
use serde_json::{Value, json};
use surrealdb::Connection;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use state::AppState;

use routes::{auth, orders, patients, schedule, staff, supply, visits};

/// Build the API router.
///
/// Everything under `/api` except `/api/auth/login` requires a bearer token.
pub fn router<C: Connection>(state: AppState<C>) -> Router {
    let protected = Router::new()
        .route("/auth/me", get(auth::me::<C>))
        .route("/staff", get(staff::list::<C>).post(staff::create::<C>))
        .route(
            "/staff/:id",
            get(staff::get::<C>)
                .patch(staff::update::<C>)
                .delete(staff::deactivate::<C>),
        )
        .route(
            "/patients",
            get(patients::list::<C>).post(patients::create::<C>),
        )
        .route(
            "/patients/:id",
            get(patients::get::<C>)
                .patch(patients::update::<C>)
                .delete(patients::delete::<C>),
        )
        .route(
            "/patients/:id/medications",
            get(orders::list_medications::<C>).post(orders::create_medication::<C>),
        )
        .route("/medications", get(orders::medication_grid::<C>))
        .route("/medication-diary", get(orders::medication_diary::<C>))
        .route(
            "/medications/:id",
            patch(orders::update_medication::<C>).delete(orders::delete_medication::<C>),
        )
        .route(
            "/patients/:id/treatments",
            get(orders::list_treatments::<C>).post(orders::create_treatment::<C>),
        )
        .route(
            "/treatments/:id",
            patch(orders::update_treatment::<C>).delete(orders::delete_treatment::<C>),
        )
        .route(
            "/supply-requests",
            get(supply::list::<C>).post(supply::raise::<C>),
        )
        .route("/supply-requests/:id/status", patch(supply::advance::<C>))
        .route("/supply-requests/:id/complete", patch(supply::complete::<C>))
        .nest("/schedule", schedule_router::<C>(ShiftTrack::Operational))
        .nest("/nursing-schedule", schedule_router::<C>(ShiftTrack::Nursing))
        .route(
            "/visitors",
            get(visits::list_visitors::<C>).post(visits::create_visitor::<C>),
        )
        .route(
            "/visitors/:id",
            get(visits::get_visitor::<C>).patch(visits::update_visitor::<C>),
        )
        .route(
            "/appointments",
            get(visits::list_appointments::<C>).post(visits::create_appointment::<C>),
        )
        .route("/appointments/upcoming", get(visits::upcoming::<C>))
        .route(
            "/appointments/:id",
            get(visits::get_appointment::<C>)
                .patch(visits::update_appointment::<C>)
                .delete(visits::delete_appointment::<C>),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth::<C>,
        ));

    let public = Router::new().route("/auth/login", post(auth::login::<C>));

    Router::new()
        .route("/", get(index))
        .nest("/api", public.merge(protected))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn schedule_router<C: Connection>(track: ShiftTrack) -> Router<AppState<C>> {
    Router::new()
        .route("/team", get(schedule::team::<C>))
        .route("/month", get(schedule::month::<C>))
        .route("/mine", get(schedule::mine::<C>))
        .route("/day", post(schedule::set_day::<C>))
        .layer(Extension(track))
}

async fn index() -> Json<Value> {
    Json(json!({
        "name": "CRACare API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
