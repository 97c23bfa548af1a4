// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use adb_adapters::FakeObjectStore;
use adb_core::FakeClock;
use adb_store::{FakeEngineFactory, HandleStoreConfig};
use adb_wire::ResponsePayload;
use tempfile::tempdir;

use super::super::Handlers;

fn make_handlers() -> (tempfile::TempDir, Handlers<FakeObjectStore, FakeEngineFactory, FakeClock>) {
    let dir = tempdir().unwrap();
    let config = HandleStoreConfig::new(dir.path().to_path_buf());
    let clock = std::sync::Arc::new(FakeClock::new());
    let store = std::sync::Arc::new(adb_store::HandleStore::new(
        std::sync::Arc::new(FakeObjectStore::new()),
        std::sync::Arc::new(FakeEngineFactory),
        clock.clone(),
        config,
    ));
    (dir, Handlers::new(store, clock))
}

#[tokio::test]
async fn create_database_opens_a_handle_and_reports_its_location() {
    let (_dir, handlers) = make_handlers();
    let response = handlers.create_database("t1", "mydb").await;
    assert!(response.success);
    match response.payload {
        Some(ResponsePayload::DatabaseCreated { container, object_key }) => {
            assert_eq!(container, "user-t1-duckdb");
            assert_eq!(object_key, "mydb.duckdb");
        }
        other => panic!("unexpected payload: {other:?}"),
    }
}

#[tokio::test]
async fn create_database_rejects_empty_tenant() {
    let (_dir, handlers) = make_handlers();
    let response = handlers.create_database("", "mydb").await;
    assert!(!response.success);
}

#[tokio::test]
async fn list_databases_is_empty_before_any_container_exists() {
    let (_dir, handlers) = make_handlers();
    let response = handlers.list_databases("t1", None).await;
    assert!(response.success);
    match response.payload {
        Some(ResponsePayload::Databases { databases }) => assert!(databases.is_empty()),
        other => panic!("unexpected payload: {other:?}"),
    }
}

#[tokio::test]
async fn list_databases_excludes_backups_and_strips_the_suffix() {
    let (_dir, handlers) = make_handlers();
    handlers.create_database("t1", "orders").await;
    handlers.create_database("t1", "widgets").await;
    let object_store = handlers.object_store();
    object_store.put_object("user-t1-duckdb", "backups/orders-1.duckdb", b"x").await.unwrap();

    let response = handlers.list_databases("t1", None).await;
    match response.payload {
        Some(ResponsePayload::Databases { databases }) => {
            let names: Vec<_> = databases.iter().map(|d| d.name.as_str()).collect();
            assert!(names.contains(&"orders"));
            assert!(names.contains(&"widgets"));
            assert_eq!(databases.len(), 2);
        }
        other => panic!("unexpected payload: {other:?}"),
    }
}

#[tokio::test]
async fn list_databases_applies_the_substring_filter() {
    let (_dir, handlers) = make_handlers();
    handlers.create_database("t1", "orders").await;
    handlers.create_database("t1", "widgets").await;

    let response = handlers.list_databases("t1", Some("ord")).await;
    match response.payload {
        Some(ResponsePayload::Databases { databases }) => {
            assert_eq!(databases.len(), 1);
            assert_eq!(databases[0].name, "orders");
        }
        other => panic!("unexpected payload: {other:?}"),
    }
}

#[tokio::test]
async fn delete_database_tears_down_the_handle_before_deleting_the_object() {
    let (_dir, handlers) = make_handlers();
    handlers.create_database("t1", "mydb").await;
    let response = handlers.delete_database("t1", "mydb").await;
    assert!(response.success);
    assert_eq!(handlers.store().len().await, 0);
    assert!(!handlers.object_store().bucket_exists("user-t1-duckdb").await.unwrap()
        || !handlers
            .object_store()
            .stat_object("user-t1-duckdb", "mydb.duckdb")
            .await
            .unwrap()
            .is_some());
}

#[tokio::test]
async fn get_database_info_derives_metadata_without_touching_a_handle() {
    let (_dir, handlers) = make_handlers();
    let response = handlers.get_database_info("t1", "mydb");
    assert!(response.success);
    match response.payload {
        Some(ResponsePayload::DatabaseInfo(info)) => {
            assert_eq!(info.identifier, "t1-mydb");
            assert_eq!(info.container, "user-t1-duckdb");
            assert_eq!(info.object_key, "mydb.duckdb");
        }
        other => panic!("unexpected payload: {other:?}"),
    }
    assert_eq!(handlers.store().len().await, 0);
}

#[tokio::test]
async fn backup_database_skips_copy_when_nothing_was_modified() {
    let (_dir, handlers) = make_handlers();
    handlers.create_database("t1", "mydb").await;
    let response = handlers.backup_database("t1", "mydb", "nightly").await;
    assert!(response.success);
    match response.payload {
        Some(ResponsePayload::BackupCreated { backup_key }) => {
            assert!(backup_key.starts_with("backups/nightly-"));
        }
        other => panic!("unexpected payload: {other:?}"),
    }
}

#[tokio::test]
async fn restore_database_copies_the_backup_object_to_a_new_key() {
    let (_dir, handlers) = make_handlers();
    handlers.create_database("t1", "mydb").await;
    let object_store = handlers.object_store();
    object_store
        .put_object("user-t1-duckdb", "backups/nightly-1700000000.duckdb", b"snapshot")
        .await
        .unwrap();

    let response = handlers.restore_database("t1", "backups/nightly-1700000000.duckdb", "mydb-restored").await;
    assert!(response.success);
    assert!(object_store
        .stat_object("user-t1-duckdb", "mydb-restored.duckdb")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn restore_database_reports_failure_when_the_backup_object_is_missing() {
    let (_dir, handlers) = make_handlers();
    handlers.create_database("t1", "mydb").await;
    let response = handlers.restore_database("t1", "backups/missing.duckdb", "mydb-restored").await;
    assert!(!response.success);
}
