//! Request handlers for the reconnaissance API.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use osprey_recon::ReconEngine;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

/// Body of `POST /api/reconnaissance`.
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    /// Domain or IPv4 address to analyze.
    #[serde(default)]
    pub target: Option<String>,
}

/// Liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Run one reconnaissance pass.
///
/// Responds 400 for a missing or invalid target, 500 for an unexpected
/// internal fault, and 200 with best-effort data plus the per-source
/// error map otherwise.
pub async fn reconnaissance(
    State(engine): State<Arc<ReconEngine>>,
    Json(request): Json<ScanRequest>,
) -> Response {
    let Some(target) = request.target.filter(|t| !t.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Target is required", None);
    };

    match engine.analyze(&target).await {
        Ok(report) => {
            info!(target = %target, report_type = ?report.report_type, "analysis complete");
            (StatusCode::OK, Json(report)).into_response()
        }
        Err(err) if err.is_client_error() => {
            error_response(StatusCode::BAD_REQUEST, &err.to_string(), None)
        }
        Err(err) => {
            error!(target = %target, error = %err, "analysis failed unexpectedly");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error during analysis",
                Some(&err.to_string()),
            )
        }
    }
}

fn error_response(status: StatusCode, message: &str, details: Option<&str>) -> Response {
    let mut body = json!({ "error": message });
    if let Some(details) = details {
        body["details"] = json!(details);
    }
    (status, Json(body)).into_response()
}
