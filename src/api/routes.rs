//! All routes for the HTTP API.

use axum::{routing::post, Router};

use crate::{api::Error, AppState};

pub mod apply;
pub mod verify;

/// Builds the API router over the shared application state.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/apply/:application_type", post(apply::post))
        .route("/api/verify/:application_type", post(verify::post))
        .fallback(|| async { Error::RouteNotFound })
        .with_state(state)
}
