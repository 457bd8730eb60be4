//! HTTP API handlers for code issuance and validation

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::codes::{issuer, validator};
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct GenerateCodeResponse {
    code: String,
}

#[derive(Debug, Deserialize)]
pub struct ValidateCodeRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
struct ValidateCodeResponse {
    valid: bool,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    sessions: usize,
}

/// POST /api/generate-code
///
/// Issues a fresh single-use code. Store failures come back as a generic 500.
pub async fn generate_code(State(state): State<Arc<AppState>>) -> Response {
    match issuer::issue(&state.store).await {
        Ok(code) => (StatusCode::OK, Json(GenerateCodeResponse { code })).into_response(),
        Err(e) => {
            error!(error = %e, "code generation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to generate code".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// POST /api/validate-code
///
/// Consumes the submitted code at most once. The response never says why a
/// code was rejected.
pub async fn validate_code(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ValidateCodeRequest>,
) -> Response {
    match validator::validate(&state.store, &req.code).await {
        Ok(valid) => (StatusCode::OK, Json(ValidateCodeResponse { valid })).into_response(),
        Err(e) => {
            error!(error = %e, "code validation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to validate code".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Health check endpoint
pub async fn health(State(state): State<Arc<AppState>>) -> Json<impl Serialize> {
    Json(HealthResponse {
        status: "ok",
        sessions: state.session_count(),
    })
}
