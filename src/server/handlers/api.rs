//! API endpoint handlers.

use axum::{http::StatusCode, response::IntoResponse};

/// Health check endpoint for container orchestration.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}
