//! # Code Issuer
//!
//! The boundary service: validates a request, checks the SKU, allocates a
//! reference, encodes, and appends the record.
//!
//! ## Generate Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CodeIssuer::generate                                 │
//! │                                                                         │
//! │  validate_generate_request()     ← unknown code type / bad fields      │
//! │       │                            rejected here, nothing allocated    │
//! │       ▼                                                                 │
//! │  ┌──────── issue_lock (one request per database) ─────────────────┐    │
//! │  │                                                                 │    │
//! │  │  get_by_sku(sku) ── found ──► DuplicateSku { existing_code }   │    │
//! │  │       │                                                         │    │
//! │  │       ▼                                                         │    │
//! │  │  next_reference_with(encode) ← oversized GMN/UDI-DI rolls back  │    │
//! │  │       │                        the allocation; durable after    │    │
//! │  │       ▼                                                         │    │
//! │  │  append()                  ← write failure burns the reference  │    │
//! │  │                                                                 │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  IssuanceRecord                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The issue lock lives on [`Database`], so every issuer built over the same
//! handle or its clones shares it. History and export only read the record
//! store and never take the lock.

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::DbError;
use crate::pool::Database;
use ident_core::encoder::encode;
use ident_core::export::{self, ExportRow};
use ident_core::validation::validate_generate_request;
use ident_core::{CoreError, GenerateRequest, IssuanceRecord, IssueOrder, ValidationError};

// =============================================================================
// Errors
// =============================================================================

/// Errors returned by [`CodeIssuer`] operations.
#[derive(Debug, Error)]
pub enum IssueError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<ValidationError> for IssueError {
    fn from(err: ValidationError) -> Self {
        IssueError::Core(CoreError::Validation(err))
    }
}

/// Machine-readable error category.
///
/// Serialized in SCREAMING_SNAKE_CASE, e.g. `"DUPLICATE_SKU"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    DuplicateSku,
    InvalidCodeType,
    FormatError,
    StoreReadError,
    StoreWriteError,
    StoreCorruptError,
    NotFound,
    Internal,
}

impl ErrorKind {
    /// Returns the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::DuplicateSku => "DUPLICATE_SKU",
            ErrorKind::InvalidCodeType => "INVALID_CODE_TYPE",
            ErrorKind::FormatError => "FORMAT_ERROR",
            ErrorKind::StoreReadError => "STORE_READ_ERROR",
            ErrorKind::StoreWriteError => "STORE_WRITE_ERROR",
            ErrorKind::StoreCorruptError => "STORE_CORRUPT_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IssueError {
    /// Categorizes the error.
    ///
    /// ## Mapping
    /// ```text
    /// CoreError::DuplicateSku        → DUPLICATE_SKU
    /// CoreError::InvalidCodeType     → INVALID_CODE_TYPE
    /// CoreError::Validation          → FORMAT_ERROR
    /// CoreError::SkuNotFound         → NOT_FOUND
    /// DbError::ReadFailed / pool     → STORE_READ_ERROR
    /// DbError::WriteFailed / unique  → STORE_WRITE_ERROR
    /// DbError::Corrupt               → STORE_CORRUPT_ERROR
    /// DbError::MigrationFailed       → INTERNAL
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            IssueError::Core(err) => match err {
                CoreError::DuplicateSku { .. } => ErrorKind::DuplicateSku,
                CoreError::InvalidCodeType(_) => ErrorKind::InvalidCodeType,
                CoreError::Validation(_) => ErrorKind::FormatError,
                CoreError::SkuNotFound(_) => ErrorKind::NotFound,
            },
            IssueError::Db(err) => match err {
                DbError::ReadFailed(_)
                | DbError::ConnectionFailed(_)
                | DbError::PoolExhausted => ErrorKind::StoreReadError,
                DbError::WriteFailed(_) | DbError::UniqueViolation { .. } => {
                    ErrorKind::StoreWriteError
                }
                DbError::Corrupt(_) => ErrorKind::StoreCorruptError,
                DbError::MigrationFailed(_) => ErrorKind::Internal,
            },
        }
    }
}

/// Result type for issuer operations.
pub type IssueResult<T> = Result<T, IssueError>;

// =============================================================================
// CodeIssuer
// =============================================================================

/// Issues codes against one database.
///
/// The issue lock belongs to the [`Database`], so clones of an issuer and
/// separate issuers over the same database all serialize on it.
///
/// ## Usage
/// ```rust,ignore
/// let issuer = CodeIssuer::new(db);
/// let record = issuer.generate(&request).await?;
/// println!("{}", record.generated_code);
/// ```
#[derive(Debug, Clone)]
pub struct CodeIssuer {
    db: Database,
    issue_lock: Arc<Mutex<()>>,
}

impl CodeIssuer {
    /// Creates an issuer over an open database.
    pub fn new(db: Database) -> Self {
        let issue_lock = db.issue_lock();
        CodeIssuer { db, issue_lock }
    }

    /// Returns the underlying database.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Issues a code for a new SKU and returns the stored record.
    ///
    /// ## Returns
    /// * `Ok(record)` - `record.generated_code` is the new code
    /// * `Err(kind = INVALID_CODE_TYPE | FORMAT_ERROR)` - nothing allocated
    /// * `Err(kind = DUPLICATE_SKU)` - SKU already has a code; nothing allocated
    /// * `Err(kind = STORE_*)` - store failure
    pub async fn generate(&self, req: &GenerateRequest) -> IssueResult<IssuanceRecord> {
        let order = validate_generate_request(req)?;

        let _guard = self.issue_lock.lock().await;

        let records = self.db.issuances();
        if let Some(existing) = records.get_by_sku(&order.sku).await? {
            warn!(sku = %order.sku, existing_code = %existing.generated_code, "Rejected duplicate SKU");
            return Err(duplicate(existing).into());
        }

        let (reference, code) = self
            .db
            .sequence()
            .next_reference_with(|reference| {
                encode_order(&order, reference).map_err(IssueError::from)
            })
            .await?;

        let record = IssuanceRecord::new(
            Uuid::new_v4().to_string(),
            &order,
            reference.as_str(),
            code,
            Utc::now(),
        );

        if let Err(err) = records.append(&record).await {
            warn!(
                reference = %reference,
                sku = %order.sku,
                error = %err,
                "Record write failed, item reference burned"
            );

            // Another process sharing the file issued this SKU first.
            if matches!(&err, DbError::UniqueViolation { field, .. } if field.ends_with("sku")) {
                if let Some(existing) = records.get_by_sku(&order.sku).await? {
                    return Err(duplicate(existing).into());
                }
            }
            return Err(err.into());
        }

        info!(
            code_type = %order.code_type,
            sku = %order.sku,
            reference = %reference,
            code = %record.generated_code,
            "Issued code"
        );
        Ok(record)
    }

    /// Every record ever issued, in issuance order.
    pub async fn history(&self) -> IssueResult<Vec<IssuanceRecord>> {
        Ok(self.db.issuances().list().await?)
    }

    /// One export row per issued record, in issuance order.
    pub async fn export_all(&self) -> IssueResult<Vec<ExportRow>> {
        let records = self.history().await?;
        Ok(export::format(&records))
    }

    /// Export rows for an exact SKU.
    ///
    /// The key is trimmed the same way `generate` trims it.
    ///
    /// ## Returns
    /// * `Err(kind = NOT_FOUND)` - no record has this SKU
    pub async fn export_for_sku(&self, sku: &str) -> IssueResult<Vec<ExportRow>> {
        let sku = sku.trim();
        let records = self.db.issuances().list_by_sku(sku).await?;
        if records.is_empty() {
            return Err(CoreError::SkuNotFound(sku.to_string()).into());
        }
        Ok(export::format(&records))
    }
}

fn encode_order(order: &IssueOrder, reference: &str) -> Result<String, ValidationError> {
    encode(
        order.code_type,
        &order.prefix,
        order.indicator.as_deref(),
        reference,
    )
}

fn duplicate(existing: IssuanceRecord) -> CoreError {
    CoreError::DuplicateSku {
        sku: existing.sku,
        existing_code: existing.generated_code,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
