//! Concurrency tests for reference allocation and issuance.
//!
//! These run against a file-backed database so the pool really has several
//! connections, and use a multi-threaded runtime so tasks run in parallel.
//! Run with: cargo test -p ident-db --test concurrency_tests

use std::collections::HashSet;

use ident_core::GenerateRequest;
use ident_db::{CodeIssuer, Database, DbConfig, ErrorKind};
use tempfile::TempDir;

async fn create_test_db() -> (Database, TempDir) {
    let dir = TempDir::new().unwrap();
    let db = Database::new(DbConfig::new(dir.path().join("ident.db")))
        .await
        .unwrap();
    (db, dir)
}

fn request(sku: &str) -> GenerateRequest {
    GenerateRequest {
        code_type: "GTIN-13".to_string(),
        prefix: "614141".to_string(),
        sku: sku.to_string(),
        indicator: None,
    }
}

/// A 9-digit UDI-DI prefix fits references up to 99999 and nothing longer.
fn udi_request(sku: &str) -> GenerateRequest {
    GenerateRequest {
        code_type: "UDI-DI".to_string(),
        prefix: "123456789".to_string(),
        sku: sku.to_string(),
        indicator: None,
    }
}

async fn set_counter(db: &Database, value: i64) {
    sqlx::query("UPDATE sequence_state SET next_reference = ?1 WHERE id = 1")
        .bind(value)
        .execute(db.pool())
        .await
        .unwrap();
}

/// Races two issuers for the last reference that still fits, then checks
/// that the loser consumed nothing.
async fn race_for_last_fitting_reference(first: CodeIssuer, second: CodeIssuer) {
    let a = tokio::spawn(async move { first.generate(&udi_request("A")).await });
    let b = tokio::spawn(async move { second.generate(&udi_request("B")).await });

    let results = [a.await.unwrap(), b.await.unwrap()];
    let issued: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    let rejected: Vec<_> = results.iter().filter_map(|r| r.as_ref().err()).collect();

    assert_eq!(issued.len(), 1);
    assert_eq!(issued[0].item_reference, "99999");
    assert_eq!(issued[0].generated_code, "12345678999999");
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].kind(), ErrorKind::FormatError);
}

/// Sorted references must be exactly `start..start + n`.
fn assert_contiguous(mut refs: Vec<u64>, start: u64, n: u64) {
    refs.sort_unstable();
    let expected: Vec<u64> = (start..start + n).collect();
    assert_eq!(refs, expected, "references are not a contiguous run");
}

// =============================================================================
// Sequence Allocator
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn parallel_allocations_are_distinct_and_contiguous() {
    let (db, _dir) = create_test_db().await;
    let num_tasks = 16;
    let allocations_per_task = 25;

    let start = db.sequence().peek().await.unwrap();

    let handles: Vec<_> = (0..num_tasks)
        .map(|_| {
            let db = db.clone();
            tokio::spawn(async move {
                let mut refs = Vec::with_capacity(allocations_per_task);
                for _ in 0..allocations_per_task {
                    let r = db.sequence().next_reference().await.unwrap();
                    refs.push(r.parse::<u64>().unwrap());
                }
                refs
            })
        })
        .collect();

    let mut all_refs = Vec::new();
    for handle in handles {
        all_refs.extend(handle.await.unwrap());
    }

    let total = (num_tasks * allocations_per_task) as u64;
    assert_contiguous(all_refs, start, total);
    assert_eq!(db.sequence().peek().await.unwrap(), start + total);
}

/// Two handles on one file have separate in-process locks; SQLite's write
/// lock still serializes them.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn separate_handles_on_one_file_never_collide() {
    let (first, dir) = create_test_db().await;
    let second = Database::new(DbConfig::new(dir.path().join("ident.db")))
        .await
        .unwrap();
    let allocations_per_task = 20;

    let handles: Vec<_> = [first.clone(), second.clone(), first, second]
        .into_iter()
        .map(|db| {
            tokio::spawn(async move {
                let mut refs = Vec::with_capacity(allocations_per_task);
                for _ in 0..allocations_per_task {
                    let r = db.sequence().next_reference().await.unwrap();
                    refs.push(r.parse::<u64>().unwrap());
                }
                refs
            })
        })
        .collect();

    let mut all_refs = Vec::new();
    for handle in handles {
        all_refs.extend(handle.await.unwrap());
    }

    assert_contiguous(all_refs, 10_000, 4 * allocations_per_task as u64);
}

// =============================================================================
// Issuer
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn parallel_generates_for_distinct_skus() {
    let (db, _dir) = create_test_db().await;
    let issuer = CodeIssuer::new(db);
    let n = 40;

    let handles: Vec<_> = (0..n)
        .map(|i| {
            let issuer = issuer.clone();
            tokio::spawn(async move { issuer.generate(&request(&format!("SKU-{i}"))).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let history = issuer.history().await.unwrap();
    assert_eq!(history.len(), n);

    let codes: HashSet<&str> = history.iter().map(|r| r.generated_code.as_str()).collect();
    assert_eq!(codes.len(), n, "two SKUs received the same code");

    let refs: Vec<u64> = history
        .iter()
        .map(|r| r.item_reference.parse().unwrap())
        .collect();

    // History is in issuance order, which is allocation order.
    assert!(refs.windows(2).all(|w| w[0] < w[1]));
    assert_contiguous(refs, 10_000, n as u64);

    assert_eq!(issuer.export_all().await.unwrap().len(), n);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn parallel_generates_for_one_sku_store_one_record() {
    let (db, _dir) = create_test_db().await;
    let issuer = CodeIssuer::new(db);
    let n = 20;

    let handles: Vec<_> = (0..n)
        .map(|_| {
            let issuer = issuer.clone();
            tokio::spawn(async move { issuer.generate(&request("SAME-SKU")).await })
        })
        .collect();

    let mut issued = Vec::new();
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(record) => issued.push(record),
            Err(err) => {
                assert_eq!(err.kind(), ErrorKind::DuplicateSku);
                duplicates += 1;
            }
        }
    }

    assert_eq!(issued.len(), 1);
    assert_eq!(duplicates, n - 1);

    let history = issuer.history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].generated_code, issued[0].generated_code);

    // Rejected duplicates never reach the allocator.
    assert_eq!(issuer.database().sequence().peek().await.unwrap(), 10_001);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn readers_run_alongside_writers() {
    let (db, _dir) = create_test_db().await;
    let issuer = CodeIssuer::new(db);

    let writer = {
        let issuer = issuer.clone();
        tokio::spawn(async move {
            for i in 0..30 {
                issuer.generate(&request(&format!("W-{i}"))).await.unwrap();
            }
        })
    };

    let reader = {
        let issuer = issuer.clone();
        tokio::spawn(async move {
            let mut last = 0;
            for _ in 0..30 {
                let len = issuer.history().await.unwrap().len();
                assert!(len >= last, "history shrank from {last} to {len}");
                last = len;
                tokio::task::yield_now().await;
            }
        })
    };

    writer.await.unwrap();
    reader.await.unwrap();

    assert_eq!(issuer.history().await.unwrap().len(), 30);
}

// =============================================================================
// Several issuers on one store
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn issuers_sharing_a_database_never_burn_on_format_errors() {
    for _ in 0..20 {
        let (db, _dir) = create_test_db().await;
        set_counter(&db, 99_999).await;

        race_for_last_fitting_reference(CodeIssuer::new(db.clone()), CodeIssuer::new(db.clone()))
            .await;

        assert_eq!(db.sequence().peek().await.unwrap(), 100_000);
        assert_eq!(db.issuances().count().await.unwrap(), 1);
    }
}

/// Separate handles do not share in-process locks; the allocation
/// transaction still rolls back a rejected reference.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn issuers_on_separate_handles_never_burn_on_format_errors() {
    for _ in 0..10 {
        let (first, dir) = create_test_db().await;
        let second = Database::new(DbConfig::new(dir.path().join("ident.db")))
            .await
            .unwrap();
        set_counter(&first, 99_999).await;

        race_for_last_fitting_reference(CodeIssuer::new(first.clone()), CodeIssuer::new(second))
            .await;

        assert_eq!(first.sequence().peek().await.unwrap(), 100_000);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn issuers_sharing_a_database_store_one_record_per_sku() {
    let (db, _dir) = create_test_db().await;
    let n = 20;

    let handles: Vec<_> = (0..n)
        .map(|_| {
            let issuer = CodeIssuer::new(db.clone());
            tokio::spawn(async move { issuer.generate(&request("SAME-SKU")).await })
        })
        .collect();

    let mut issued = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => issued += 1,
            Err(err) => assert_eq!(err.kind(), ErrorKind::DuplicateSku),
        }
    }

    assert_eq!(issued, 1);
    // Duplicates are caught before allocation, not by the UNIQUE fallback.
    assert_eq!(db.sequence().peek().await.unwrap(), 10_001);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn issuers_on_separate_handles_issue_distinct_codes() {
    let (first, dir) = create_test_db().await;
    let second = Database::new(DbConfig::new(dir.path().join("ident.db")))
        .await
        .unwrap();
    let per_issuer = 10;

    let issuers = [
        CodeIssuer::new(first.clone()),
        CodeIssuer::new(second.clone()),
        CodeIssuer::new(first.clone()),
        CodeIssuer::new(second),
    ];
    let handles: Vec<_> = issuers
        .into_iter()
        .enumerate()
        .map(|(i, issuer)| {
            tokio::spawn(async move {
                for j in 0..per_issuer {
                    issuer
                        .generate(&request(&format!("I{i}-{j}")))
                        .await
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    let history = CodeIssuer::new(first).history().await.unwrap();
    let codes: HashSet<&str> = history.iter().map(|r| r.generated_code.as_str()).collect();
    assert_eq!(codes.len(), 4 * per_issuer);

    let refs: Vec<u64> = history
        .iter()
        .map(|r| r.item_reference.parse().unwrap())
        .collect();
    assert_contiguous(refs, 10_000, 4 * per_issuer as u64);
}
