//! # HTTP Routes
//!
//! | Method | Path            | Response                                  |
//! |--------|-----------------|-------------------------------------------|
//! | POST   | `/generate`     | `{ "generated_code": "..." }`             |
//! | GET    | `/history`      | `{ "history": [IssuanceRecord, ...] }`    |
//! | GET    | `/export`       | CSV download, `generated_codes.csv`       |
//! | GET    | `/export/{sku}` | CSV download, `report_{sku}.csv`          |
//! | GET    | `/health`       | `{ "status": "ok" }`                      |
//!
//! `/export-excel` and `/export-excel/{sku}` serve the same downloads for
//! existing clients.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use ident_core::export::{to_csv, ExportRow};
use ident_core::{GenerateRequest, IssuanceRecord};
use ident_db::CodeIssuer;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub issuer: CodeIssuer,
}

impl AppState {
    pub fn new(issuer: CodeIssuer) -> Self {
        AppState { issuer }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/generate", post(generate))
        .route("/history", get(history))
        .route("/export", get(export_all))
        .route("/export/{sku}", get(export_for_sku))
        .route("/export-excel", get(export_all))
        .route("/export-excel/{sku}", get(export_for_sku))
        .route("/health", get(health))
        .with_state(state)
}

// =============================================================================
// Response bodies
// =============================================================================

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub generated_code: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<IssuanceRecord>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

// =============================================================================
// Handlers
// =============================================================================

async fn generate(
    State(state): State<AppState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(req) = body.map_err(|rejection| ApiError::format(rejection.body_text()))?;

    let record = state.issuer.generate(&req).await?;
    Ok(Json(GenerateResponse {
        generated_code: record.generated_code,
    }))
}

async fn history(State(state): State<AppState>) -> Result<Json<HistoryResponse>, ApiError> {
    let history = state.issuer.history().await?;
    Ok(Json(HistoryResponse { history }))
}

async fn export_all(State(state): State<AppState>) -> Result<Response, ApiError> {
    let rows = state.issuer.export_all().await?;
    Ok(csv_download("generated_codes.csv", &rows))
}

async fn export_for_sku(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> Result<Response, ApiError> {
    let rows = state.issuer.export_for_sku(&sku).await?;
    Ok(csv_download(
        &format!("report_{}.csv", filename_safe(&sku)),
        &rows,
    ))
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    if state.issuer.database().health_check().await {
        (StatusCode::OK, Json(HealthResponse { status: "ok" }))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unavailable",
            }),
        )
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn csv_download(filename: &str, rows: &[ExportRow]) -> Response {
    debug!(filename, rows = rows.len(), "Serving export");
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        to_csv(rows),
    )
        .into_response()
}

/// Replaces anything outside `[A-Za-z0-9._-]` so the SKU can sit inside a
/// quoted header value.
fn filename_safe(sku: &str) -> String {
    sku.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

// =============================================================================
// Handler Tests
// =============================================================================
