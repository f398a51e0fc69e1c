//! # Sequence Repository
//!
//! The item reference counter. Every successful allocation returns a value
//! no other allocation ever returns, across restarts and across processes
//! sharing the database file.
//!
//! ## Allocation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    next_reference()                                     │
//! │                                                                         │
//! │  sequence_lock (in-process)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                 │
//! │  ├── INSERT (1, 10000) ON CONFLICT DO NOTHING   ← recreate if missing  │
//! │  ├── UPDATE next_reference = next_reference + 1                        │
//! │  │   RETURNING next_reference - 1               ← the allocated value  │
//! │  ├── check(reference)?                          ← ROLLBACK on error    │
//! │  COMMIT                                          ← durable before use  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  "10000", "10001", ... (decimal, no padding)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The increment is one SQL statement inside a write transaction, so a second
//! process on the same file serializes on SQLite's write lock. The in-process
//! mutex keeps this process's own tasks from contending for that lock.
//!
//! A reference that was allocated but never recorded (the record write failed
//! afterwards) is simply gone. Gaps are allowed; reuse is not.

use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{DbError, DbResult};
use ident_core::INITIAL_REFERENCE;

/// Repository for the singleton counter row.
#[derive(Debug, Clone)]
pub struct SequenceRepository {
    pool: SqlitePool,
    lock: Arc<Mutex<()>>,
}

impl SequenceRepository {
    /// Creates a new SequenceRepository.
    ///
    /// Use [`Database::sequence`](crate::Database::sequence) instead; it
    /// hands every caller the same lock.
    pub fn new(pool: SqlitePool, lock: Arc<Mutex<()>>) -> Self {
        SequenceRepository { pool, lock }
    }

    /// Returns the value the next allocation will return, without consuming it.
    ///
    /// A missing counter row reads as the initial reference.
    pub async fn peek(&self) -> DbResult<u64> {
        let stored: Option<i64> =
            sqlx::query_scalar("SELECT next_reference FROM sequence_state WHERE id = 1")
                .fetch_optional(&self.pool)
                .await
                .map_err(DbError::read)?;

        match stored {
            Some(value) => checked_reference(value),
            None => Ok(INITIAL_REFERENCE),
        }
    }

    /// Allocates the next item reference.
    ///
    /// ## Returns
    /// * `Ok("10000")` on first use, then `"10001"`, `"10002"`, ...
    /// * `Err(DbError::WriteFailed)` - the increment did not persist; nothing
    ///   was allocated
    /// * `Err(DbError::Corrupt)` - the stored counter is out of range
    pub async fn next_reference(&self) -> DbResult<String> {
        let (reference, ()) = self.next_reference_with(|_| Ok::<_, DbError>(())).await?;
        Ok(reference)
    }

    /// Allocates the next item reference only if `check` accepts it.
    ///
    /// `check` runs inside the allocation transaction, after the counter row
    /// is write-locked. If it returns an error the transaction rolls back and
    /// nothing is consumed, even when another process shares the file.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let (reference, code) = db
    ///     .sequence()
    ///     .next_reference_with(|r| encode(CodeType::UdiDi, "0861", None, r))
    ///     .await?;
    /// ```
    pub async fn next_reference_with<T, E>(
        &self,
        check: impl FnOnce(&str) -> Result<T, E>,
    ) -> Result<(String, T), E>
    where
        E: From<DbError>,
    {
        let _guard = self.lock.lock().await;

        let mut tx = self.pool.begin().await.map_err(DbError::write)?;

        sqlx::query(
            "INSERT INTO sequence_state (id, next_reference) VALUES (1, ?1) \
             ON CONFLICT(id) DO NOTHING",
        )
        .bind(INITIAL_REFERENCE as i64)
        .execute(&mut *tx)
        .await
        .map_err(DbError::write)?;

        let allocated: i64 = sqlx::query_scalar(
            "UPDATE sequence_state SET next_reference = next_reference + 1 \
             WHERE id = 1 RETURNING next_reference - 1",
        )
        .fetch_one(&mut *tx)
        .await
        .map_err(DbError::write)?;

        let reference = checked_reference(allocated)?.to_string();

        let checked = match check(&reference) {
            Ok(value) => value,
            Err(err) => {
                tx.rollback().await.map_err(DbError::write)?;
                debug!(reference = %reference, "Allocation rejected, rolled back");
                return Err(err);
            }
        };

        tx.commit().await.map_err(DbError::write)?;

        debug!(reference = %reference, "Allocated item reference");
        Ok((reference, checked))
    }
}

fn checked_reference(value: i64) -> DbResult<u64> {
    u64::try_from(value)
        .ok()
        .filter(|v| *v >= INITIAL_REFERENCE)
        .ok_or_else(|| {
            DbError::Corrupt(format!(
                "sequence counter holds {value}, expected at least {INITIAL_REFERENCE}"
            ))
        })
}

// =============================================================================
// Unit Tests
// =============================================================================
