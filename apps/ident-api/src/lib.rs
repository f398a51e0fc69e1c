//! # ident-api
//!
//! HTTP surface over [`ident_db::CodeIssuer`].
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ident API Server                                 │
//! │                                                                         │
//! │  Client ───► HTTP (8000) ───► routes ───► CodeIssuer ───► SQLite       │
//! │                                  │                                      │
//! │                                  └──► ApiError (400/404/409/500)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod routes;

pub use config::{ApiConfig, ConfigError};
pub use error::ApiError;
pub use routes::{router, AppState};
