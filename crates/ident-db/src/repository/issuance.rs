//! # Issuance Repository
//!
//! The append-only log of issued codes.
//!
//! ## Key Operations
//! - Duplicate-SKU lookup before allocation
//! - Append after encoding
//! - Full listing in insertion order, for history and export
//!
//! Records are never updated or deleted. `list` returns them in the order
//! they were appended (`rowid` order), which for codes issued by one store
//! is also ascending item reference order.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use ident_core::{CodeType, IssuanceRecord};

/// Row shape of `issuance_records`.
///
/// `item_reference` is stored as INTEGER and surfaced as its decimal string.
#[derive(Debug, sqlx::FromRow)]
struct IssuanceRow {
    id: String,
    code_type: CodeType,
    prefix: String,
    sku: String,
    indicator: Option<String>,
    item_reference: i64,
    generated_code: String,
    created_at: DateTime<Utc>,
}

impl From<IssuanceRow> for IssuanceRecord {
    fn from(row: IssuanceRow) -> Self {
        IssuanceRecord {
            id: row.id,
            code_type: row.code_type,
            prefix: row.prefix,
            sku: row.sku,
            indicator: row.indicator,
            item_reference: row.item_reference.to_string(),
            generated_code: row.generated_code,
            created_at: row.created_at,
        }
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT
        id,
        code_type,
        prefix,
        sku,
        indicator,
        item_reference,
        generated_code,
        created_at
    FROM issuance_records
"#;

/// Repository for issuance record operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.issuances();
///
/// if !repo.exists("COKE-330").await? {
///     repo.append(&record).await?;
/// }
/// let all = repo.list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct IssuanceRepository {
    pool: SqlitePool,
}

impl IssuanceRepository {
    /// Creates a new IssuanceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        IssuanceRepository { pool }
    }

    /// Returns true if any record has exactly this SKU.
    pub async fn exists(&self, sku: &str) -> DbResult<bool> {
        let found: i64 =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM issuance_records WHERE sku = ?1)")
                .bind(sku)
                .fetch_one(&self.pool)
                .await
                .map_err(DbError::read)?;

        Ok(found != 0)
    }

    /// Gets the record issued for a SKU.
    ///
    /// ## Returns
    /// * `Ok(Some(record))` - SKU has a code
    /// * `Ok(None)` - SKU has never been issued
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<IssuanceRecord>> {
        let row = sqlx::query_as::<_, IssuanceRow>(&format!("{SELECT_COLUMNS} WHERE sku = ?1"))
            .bind(sku)
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::read)?;

        Ok(row.map(IssuanceRecord::from))
    }

    /// Appends a record. Durable once this returns `Ok`.
    ///
    /// ## Returns
    /// * `Ok(())` - Record stored
    /// * `Err(DbError::UniqueViolation)` - SKU or item reference already stored
    /// * `Err(DbError::WriteFailed)` - Store could not be written
    pub async fn append(&self, record: &IssuanceRecord) -> DbResult<()> {
        debug!(sku = %record.sku, code = %record.generated_code, "Appending issuance record");

        let item_reference: i64 = record.item_reference.parse().map_err(|_| {
            DbError::WriteFailed(format!(
                "item reference '{}' is not a decimal integer",
                record.item_reference
            ))
        })?;

        sqlx::query(
            r#"
            INSERT INTO issuance_records (
                id, code_type, prefix, sku, indicator,
                item_reference, generated_code, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&record.id)
        .bind(record.code_type)
        .bind(&record.prefix)
        .bind(&record.sku)
        .bind(&record.indicator)
        .bind(item_reference)
        .bind(&record.generated_code)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|err| match DbError::write(err) {
            DbError::UniqueViolation { field, .. } => {
                let value = if field.ends_with("item_reference") {
                    record.item_reference.clone()
                } else {
                    record.sku.clone()
                };
                DbError::UniqueViolation { field, value }
            }
            other => other,
        })?;

        Ok(())
    }

    /// Lists every record in insertion order.
    pub async fn list(&self) -> DbResult<Vec<IssuanceRecord>> {
        let rows = sqlx::query_as::<_, IssuanceRow>(&format!("{SELECT_COLUMNS} ORDER BY rowid"))
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::read)?;

        debug!(count = rows.len(), "Listed issuance records");
        Ok(rows.into_iter().map(IssuanceRecord::from).collect())
    }

    /// Lists records whose SKU equals `sku` exactly, in insertion order.
    ///
    /// At most one record matches while the UNIQUE(sku) constraint holds.
    pub async fn list_by_sku(&self, sku: &str) -> DbResult<Vec<IssuanceRecord>> {
        let rows = sqlx::query_as::<_, IssuanceRow>(&format!(
            "{SELECT_COLUMNS} WHERE sku = ?1 ORDER BY rowid"
        ))
        .bind(sku)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::read)?;

        Ok(rows.into_iter().map(IssuanceRecord::from).collect())
    }

    /// Returns the number of stored records.
    pub async fn count(&self) -> DbResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM issuance_records")
            .fetch_one(&self.pool)
            .await
            .map_err(DbError::read)?;

        Ok(count.max(0) as u64)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use ident_core::IssueOrder;

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn record(sku: &str, reference: &str, code_type: CodeType) -> IssuanceRecord {
        let order = IssueOrder {
            code_type,
            prefix: "614141".to_string(),
            sku: sku.to_string(),
            indicator: code_type.uses_indicator().then(|| "1".to_string()),
        };
        IssuanceRecord::new(
            uuid::Uuid::new_v4().to_string(),
            &order,
            reference,
            format!("code-{reference}"),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_append_then_get() {
        let db = setup().await;
        let repo = db.issuances();

        let rec = record("COKE-330", "10000", CodeType::Gtin14);
        repo.append(&rec).await.unwrap();

        let found = repo.get_by_sku("COKE-330").await.unwrap().unwrap();
        assert_eq!(found.id, rec.id);
        assert_eq!(found.code_type, CodeType::Gtin14);
        assert_eq!(found.indicator.as_deref(), Some("1"));
        assert_eq!(found.item_reference, "10000");
        assert_eq!(found.created_at, rec.created_at);
    }

    #[tokio::test]
    async fn test_exists_is_exact_match() {
        let db = setup().await;
        let repo = db.issuances();
        repo.append(&record("COKE-330", "10000", CodeType::Gtin13)).await.unwrap();

        assert!(repo.exists("COKE-330").await.unwrap());
        assert!(!repo.exists("coke-330").await.unwrap());
        assert!(!repo.exists("COKE").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let db = setup().await;
        let repo = db.issuances();

        assert!(repo.list().await.unwrap().is_empty());

        for (sku, reference) in [("B", "10000"), ("A", "10001"), ("C", "10002")] {
            repo.append(&record(sku, reference, CodeType::Gmn)).await.unwrap();
        }

        let skus: Vec<String> = repo.list().await.unwrap().into_iter().map(|r| r.sku).collect();
        assert_eq!(skus, ["B", "A", "C"]);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_sku_is_rejected() {
        let db = setup().await;
        let repo = db.issuances();
        repo.append(&record("A", "10000", CodeType::Gtin13)).await.unwrap();

        let err = repo
            .append(&record("A", "10001", CodeType::Gtin13))
            .await
            .unwrap_err();

        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "issuance_records.sku");
                assert_eq!(value, "A");
            }
            other => panic!("expected UniqueViolation, got {other:?}"),
        }
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_reference_is_rejected() {
        let db = setup().await;
        let repo = db.issuances();
        repo.append(&record("A", "10000", CodeType::Gtin13)).await.unwrap();

        let err = repo
            .append(&record("B", "10000", CodeType::Gtin13))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::UniqueViolation { ref value, .. } if value == "10000"
        ));
    }

    #[tokio::test]
    async fn test_list_by_sku() {
        let db = setup().await;
        let repo = db.issuances();
        repo.append(&record("A", "10000", CodeType::UdiDi)).await.unwrap();
        repo.append(&record("B", "10001", CodeType::UdiDi)).await.unwrap();

        let only_b = repo.list_by_sku("B").await.unwrap();
        assert_eq!(only_b.len(), 1);
        assert_eq!(only_b[0].item_reference, "10001");

        assert!(repo.list_by_sku("Z").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_row_is_corrupt() {
        let db = setup().await;
        sqlx::query(
            "INSERT INTO issuance_records VALUES \
             ('x', 'GTIN-13', '614141', 'A', NULL, 10000, '6141411000006', 'not-a-timestamp')",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let err = db.issuances().list().await.unwrap_err();
        assert!(matches!(err, DbError::Corrupt(_)), "got {err:?}");
    }
}
