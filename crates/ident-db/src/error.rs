//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← read / write / corrupt categorization         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  IssueError (issuer.rs) ← tagged with an ErrorKind                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (ident-api) ← HTTP status + JSON body                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is deliberately no blanket `From<sqlx::Error>`: every call site
//! picks [`DbError::read`] or [`DbError::write`], because the two map to
//! different error kinds upstream.

use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Appending a record whose SKU is already stored
    /// - Appending a record whose item reference is already stored
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created or opened
    /// - File permissions issue
    /// - Pool already closed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// The store could not be read.
    #[error("Read failed: {0}")]
    ReadFailed(String),

    /// The store could not be written.
    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// Stored content is unreadable or violates its own invariants.
    ///
    /// ## When This Occurs
    /// - The file is not a SQLite database, or is damaged
    /// - A stored column fails to decode (unknown code type, bad timestamp)
    /// - The counter holds a value below the initial reference
    #[error("Store is corrupt: {0}")]
    Corrupt(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl DbError {
    /// Classifies an error raised while reading.
    ///
    /// ## Error Mapping
    /// ```text
    /// Decode / ColumnDecode       → DbError::Corrupt
    /// SQLITE_CORRUPT / NOTADB     → DbError::Corrupt
    /// PoolTimedOut                → DbError::PoolExhausted
    /// PoolClosed                  → DbError::ConnectionFailed
    /// Other                       → DbError::ReadFailed
    /// ```
    pub fn read(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Decode(_)
            | sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_) => DbError::Corrupt(err.to_string()),
            sqlx::Error::Database(db_err) if is_corruption(db_err.code().as_deref()) => {
                DbError::Corrupt(db_err.message().to_string())
            }
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),
            _ => DbError::ReadFailed(err.to_string()),
        }
    }

    /// Classifies an error raised while writing.
    ///
    /// ## Error Mapping
    /// ```text
    /// "UNIQUE constraint failed: t.c" → DbError::UniqueViolation { field: "t.c" }
    /// SQLITE_CORRUPT / NOTADB         → DbError::Corrupt
    /// PoolTimedOut                    → DbError::PoolExhausted
    /// PoolClosed                      → DbError::ConnectionFailed
    /// Other                           → DbError::WriteFailed
    /// ```
    ///
    /// The offending value is not part of SQLite's message, so
    /// `UniqueViolation::value` is `"unknown"` until the caller fills it in.
    pub fn write(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite: "UNIQUE constraint failed: <table>.<column>"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if is_corruption(db_err.code().as_deref()) {
                    DbError::Corrupt(msg.to_string())
                } else {
                    DbError::WriteFailed(msg.to_string())
                }
            }
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),
            _ => DbError::WriteFailed(err.to_string()),
        }
    }
}

/// SQLITE_CORRUPT (11) and SQLITE_NOTADB (26), including extended codes.
fn is_corruption(code: Option<&str>) -> bool {
    code.and_then(|c| c.parse::<i32>().ok())
        .map(|c| matches!(c & 0xff, 11 | 26))
        .unwrap_or(false)
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
