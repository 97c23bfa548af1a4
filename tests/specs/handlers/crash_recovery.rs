// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! S4 — crash recovery (§8): a mutation that never synced is lost on
//! restart; the same mutation followed by a sync survives.

use adb_core::Value;
use adb_engine::wrap::wrap_table_name;
use adb_wire::{ColumnDef, ResponsePayload};

use crate::prelude::{Harness, TestHandlers};

async fn create_and_insert(h: &Harness) {
    let columns = vec![
        ColumnDef { name: "id".to_string(), type_name: "INT".to_string() },
        ColumnDef { name: "name".to_string(), type_name: "VARCHAR".to_string() },
    ];
    assert!(h.handlers.create_database("u1", "mydb").await.success);
    assert!(h.handlers.create_table("u1", "mydb", "users", columns, false).await.success);
    let wrapped = wrap_table_name("u1", "users");
    let insert = h.handlers.execute_statement("u1", "mydb", &format!("INSERT INTO {wrapped} VALUES (1, 'a')")).await;
    assert!(insert.success, "{insert:?}");
}

async fn row_count(handlers: &TestHandlers) -> i64 {
    let wrapped = wrap_table_name("u1", "users");
    let query = handlers.execute_query("u1", "mydb", &format!("SELECT COUNT(*) AS n FROM {wrapped}")).await;
    match query.payload {
        Some(ResponsePayload::QueryResult { rows, .. }) => match rows[0][0] {
            Value::Int(n) => n,
            ref other => panic!("unexpected count cell: {other:?}"),
        },
        other => panic!("unexpected payload: {other:?}"),
    }
}

/// Restart (a fresh store bound to the same object store, scratch
/// cleared) without an intervening sync: the insert never reached the
/// object store, so it is absent post-restart. This is the documented
/// trade-off, not a bug.
#[tokio::test]
async fn restart_without_sync_loses_the_unsynced_row() {
    let h = Harness::new();
    create_and_insert(&h).await;

    // No sync tick, no backup: simulate a crash by standing up a fresh
    // store against the same (fake) object store, as a restarted
    // process would re-download from.
    let object_store = h.object_store.clone();
    let clock = h.clock.clone();
    let scratch_dir = tempfile::tempdir().expect("scratch dir");
    let config = adb_store::HandleStoreConfig::new(scratch_dir.path().to_path_buf());
    let restarted_store = std::sync::Arc::new(adb_store::HandleStore::new(
        object_store,
        std::sync::Arc::new(adb_store::DuckDbEngineFactory),
        clock.clone(),
        config,
    ));
    let restarted_handlers = adb_engine::Handlers::new(restarted_store, clock);

    let wrapped = wrap_table_name("u1", "users");
    let query = restarted_handlers.execute_query("u1", "mydb", &format!("SELECT * FROM {wrapped}")).await;
    assert!(!query.success, "table should not exist after an unsynced restart: {query:?}");
}

/// Same sequence, but with a successful sync before the simulated
/// restart: the row survives.
#[tokio::test]
async fn restart_after_sync_preserves_the_row() {
    let h = Harness::new();
    create_and_insert(&h).await;

    let key = ("u1".to_string(), "mydb".to_string());
    let handle = h
        .store
        .peek_all()
        .await
        .into_iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
        .expect("handle present after insert");
    handle.force_sync(h.object_store.as_ref(), h.clock.epoch_secs()).await.expect("sync succeeds");

    let object_store = h.object_store.clone();
    let clock = h.clock.clone();
    let scratch_dir = tempfile::tempdir().expect("scratch dir");
    let config = adb_store::HandleStoreConfig::new(scratch_dir.path().to_path_buf());
    let restarted_store = std::sync::Arc::new(adb_store::HandleStore::new(
        object_store,
        std::sync::Arc::new(adb_store::DuckDbEngineFactory),
        clock.clone(),
        config,
    ));
    let restarted_handlers = adb_engine::Handlers::new(restarted_store, clock);

    assert_eq!(row_count(&restarted_handlers).await, 1);
}
