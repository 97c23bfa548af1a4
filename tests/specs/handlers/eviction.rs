// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! S3 — LRU eviction with dirty flush (§8).
//!
//! Capacity is scaled down from the real 100 to 3 so the scenario
//! doesn't require opening 101 real DuckDB engines; the eviction
//! mechanics (`least_recently_accessed`, the dirty-flush-on-evict
//! callback) are identical regardless of capacity.

use std::time::Duration;

use adb_adapters::ObjectStore;
use adb_wire::ColumnDef;

use crate::prelude::Harness;

const CAPACITY: usize = 3;

#[tokio::test]
async fn evicting_a_dirty_handle_flushes_it_and_preserves_capacity() {
    let h = Harness::with_config(|mut c| {
        c.capacity = CAPACITY;
        c
    });

    let first = h.store.get_or_create("u1", "db0").await.unwrap();
    let columns =
        vec![ColumnDef { name: "id".to_string(), type_name: "INT".to_string() }.into()];
    first.engine.create_table("user_u1_marker", &columns).unwrap();
    first.mark_modified().await;
    assert!(h.object_store.stat_object("user-u1-duckdb", "db0.duckdb").await.unwrap().is_none());

    // Open CAPACITY more distinct keys, advancing the clock between
    // each so `db0`'s `last_accessed` is unambiguously the oldest —
    // the only thing `least_recently_accessed` breaks ties on.
    for i in 1..=CAPACITY {
        h.clock.advance(Duration::from_secs(1));
        h.store.get_or_create("u1", &format!("db{i}")).await.unwrap();
    }

    assert_eq!(h.store.len().await, CAPACITY);
    assert!(h.object_store.stat_object("user-u1-duckdb", "db0.duckdb").await.unwrap().is_some());

    let keys: Vec<_> = h.store.peek_all().await.into_iter().map(|(k, _)| k).collect();
    assert!(!keys.iter().any(|(tenant, name)| tenant == "u1" && name == "db0"));
}
