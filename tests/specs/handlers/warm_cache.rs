// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! S2 — warm cache, S5 — concurrent open (§8, invariant 5).

use std::sync::Arc;

use crate::prelude::Harness;

#[tokio::test]
async fn second_query_on_a_warm_handle_does_not_reopen_the_engine() {
    let h = Harness::new();
    h.handlers.create_database("u1", "mydb").await;

    let first = h.store.get_or_create("u1", "mydb").await.unwrap();
    let first_query = h.handlers.execute_query("u1", "mydb", "SELECT 1").await;
    assert!(first_query.success);

    let second = h.store.get_or_create("u1", "mydb").await.unwrap();
    let second_query = h.handlers.execute_query("u1", "mydb", "SELECT 1").await;
    assert!(second_query.success);

    // Same engine instance both times: no re-download, no re-open.
    assert!(Arc::ptr_eq(&first.engine, &second.engine));
    assert_eq!(h.store.len().await, 1);
}

#[tokio::test]
async fn concurrent_open_on_a_cold_key_yields_one_engine_instance() {
    let h = Harness::new();
    let store = h.store.clone();
    let store2 = h.store.clone();

    let (a, b) = tokio::join!(
        tokio::spawn(async move { store.get_or_create("u1", "mydb").await.unwrap() }),
        tokio::spawn(async move { store2.get_or_create("u1", "mydb").await.unwrap() }),
    );
    let (handle_a, handle_b) = (a.unwrap(), b.unwrap());

    assert!(Arc::ptr_eq(&handle_a, &handle_b));
    assert_eq!(h.store.len().await, 1);

    let query_a = h.handlers.execute_query("u1", "mydb", "SELECT 1").await;
    let query_b = h.handlers.execute_query("u1", "mydb", "SELECT 1").await;
    assert!(query_a.success);
    assert!(query_b.success);
}
