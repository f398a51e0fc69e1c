//! # ident-db: Database Layer for Ident
//!
//! Durable state for the code issuer: the item reference counter and the
//! issuance record store, both in one SQLite file accessed through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ident Data Flow                                  │
//! │                                                                         │
//! │  POST /generate (ident-api)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     ident-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  CodeIssuer   │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │  (issuer.rs)  │───►│ SequenceRepo  │    │  (embedded)  │  │   │
//! │  │   │               │    │ IssuanceRepo  │    │ 001_init.sql │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                               │   │
//! │  │                        ┌───────▼───────┐                       │   │
//! │  │                        │   Database    │                       │   │
//! │  │                        │   (pool.rs)   │                       │   │
//! │  │                        └───────────────┘                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (ident.db)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Sequence allocator and record store
//! - [`issuer`] - The serialized generate path, history and export
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ident_db::{CodeIssuer, Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/ident.db")).await?;
//! let issuer = CodeIssuer::new(db);
//!
//! let record = issuer.generate(&request).await?;
//! let rows = issuer.export_all().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod issuer;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use issuer::{CodeIssuer, ErrorKind, IssueError, IssueResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::issuance::IssuanceRepository;
pub use repository::sequence::SequenceRepository;
