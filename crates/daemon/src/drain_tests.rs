// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use adb_adapters::FakeObjectStore;
use adb_core::FakeClock;
use adb_store::{sync_worker, FakeEngineFactory, HandleStore, HandleStoreConfig, SyncWorkerConfig};
use tempfile::tempdir;

#[tokio::test]
async fn run_empties_the_handle_store() {
    let dir = tempdir().unwrap();
    let config = HandleStoreConfig::new(dir.path().to_path_buf());
    let clock = Arc::new(FakeClock::new());
    let store = Arc::new(HandleStore::new(
        Arc::new(FakeObjectStore::new()),
        Arc::new(FakeEngineFactory),
        clock.clone(),
        config,
    ));

    store.get_or_create("t1", "mydb").await.unwrap();
    assert_eq!(store.len().await, 1);

    let worker = sync_worker::spawn(store.clone(), SyncWorkerConfig::default());
    super::run(&store, worker).await;

    assert_eq!(store.len().await, 0);
}
