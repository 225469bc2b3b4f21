//! Router for the single-page app and its JSON API.
//!
//! Routes:
//! - `GET  /` — the page
//! - `GET  /api/health` — liveness + version
//! - `GET  /api/advisor` — current controller snapshot
//! - `POST /api/advisor/complaint` — replace the complaint text
//! - `POST /api/advisor/submit` — run the submission lifecycle

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::advisor::{AdvisorController, AdvisorSnapshot, SubmitOutcome};
use crate::api::error::ApiError;
use crate::config;

const INDEX_HTML: &str = include_str!("../../web/index.html");

/// Build the advisor router.
pub fn advisor_router(controller: Arc<AdvisorController>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/advisor", get(snapshot))
        .route("/api/advisor/complaint", post(update_complaint))
        .route("/api/advisor/submit", post(submit))
        .with_state(controller)
        .layer(TraceLayer::new_for_http())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: config::APP_VERSION,
    })
}

async fn snapshot(
    State(controller): State<Arc<AdvisorController>>,
) -> Result<Json<AdvisorSnapshot>, ApiError> {
    Ok(Json(controller.snapshot()?))
}

#[derive(Debug, Deserialize)]
pub struct UpdateComplaintRequest {
    pub text: String,
}

async fn update_complaint(
    State(controller): State<Arc<AdvisorController>>,
    Json(req): Json<UpdateComplaintRequest>,
) -> Result<Json<AdvisorSnapshot>, ApiError> {
    Ok(Json(controller.update_complaint_text(req.text)?))
}

/// Run the lifecycle and return the final snapshot.
///
/// Validation failure is controller state, not an HTTP error — the page
/// renders the message from the snapshot. Suppression is surfaced as 409 so
/// non-browser clients can tell it apart from completion.
async fn submit(
    State(controller): State<Arc<AdvisorController>>,
) -> Result<Json<AdvisorSnapshot>, ApiError> {
    match controller.submit().await? {
        SubmitOutcome::SuppressedInFlight(_) => Err(ApiError::SubmissionInFlight),
        outcome => Ok(Json(outcome.snapshot().clone())),
    }
}
