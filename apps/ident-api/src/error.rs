//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in ident-api                              │
//! │                                                                         │
//! │  Client                      Rust Backend                               │
//! │  ──────                      ────────────                               │
//! │                                                                         │
//! │  POST /generate                                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler                                                         │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  IssueError ── kind() ──► ErrorKind ──► ApiError ──► status ────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄────────────────────────────────────────────────────────────────────  │
//! │                                                                         │
//! │  HTTP 409                                                               │
//! │  { "code": "DUPLICATE_SKU",                                             │
//! │    "message": "SKU 'COKE-330' already has code: 6141411000006" }        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use ident_db::{ErrorKind, IssueError};

/// API error returned from handlers.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "SKU not found: SKU-123"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorKind,

    /// Human-readable error message for display
    pub message: String,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorKind, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a request-format error.
    pub fn format(message: impl Into<String>) -> Self {
        ApiError::new(ErrorKind::FormatError, message)
    }

    /// HTTP status for this error.
    ///
    /// ```text
    /// INVALID_CODE_TYPE, FORMAT_ERROR → 400
    /// NOT_FOUND                       → 404
    /// DUPLICATE_SKU                   → 409
    /// STORE_*, INTERNAL               → 500
    /// ```
    pub fn status(&self) -> StatusCode {
        match self.code {
            ErrorKind::InvalidCodeType | ErrorKind::FormatError => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::DuplicateSku => StatusCode::CONFLICT,
            ErrorKind::StoreReadError
            | ErrorKind::StoreWriteError
            | ErrorKind::StoreCorruptError
            | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Converts issuer errors to API errors.
///
/// Store and internal failures are logged in full and reported with a
/// generic message.
impl From<IssueError> for ApiError {
    fn from(err: IssueError) -> Self {
        let code = err.kind();
        match code {
            ErrorKind::StoreReadError => {
                tracing::error!(error = %err, "Store read failed");
                ApiError::new(code, "Could not read the code store")
            }
            ErrorKind::StoreWriteError => {
                tracing::error!(error = %err, "Store write failed");
                ApiError::new(code, "Could not write to the code store")
            }
            ErrorKind::StoreCorruptError => {
                tracing::error!(error = %err, "Store is corrupt");
                ApiError::new(code, "The code store is corrupt")
            }
            ErrorKind::Internal => {
                tracing::error!(error = %err, "Internal error");
                ApiError::new(code, "Internal error")
            }
            _ => ApiError::new(code, err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
