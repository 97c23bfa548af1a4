// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Invariant 6 (§8): a request for tenant A cannot reach an
//! object derived from tenant B's container.

use adb_adapters::ObjectStore;
use adb_wire::ResponsePayload;

use crate::prelude::Harness;

#[tokio::test]
async fn tenants_see_only_their_own_container() {
    let h = Harness::new();

    h.handlers.create_database("u1", "mydb").await;
    h.handlers.create_database("u2", "mydb").await;

    assert!(h.object_store.bucket_exists("user-u1-duckdb").await.unwrap());
    assert!(h.object_store.bucket_exists("user-u2-duckdb").await.unwrap());

    let listed_u1 = h.handlers.list_databases("u1", None).await;
    match listed_u1.payload {
        Some(ResponsePayload::Databases { databases }) => {
            assert_eq!(databases.len(), 1);
            assert_eq!(databases[0].name, "mydb");
        }
        other => panic!("unexpected payload: {other:?}"),
    }

    // Deleting u2's database must not touch u1's object.
    h.handlers.delete_database("u2", "mydb").await;
    assert!(h.object_store.stat_object("user-u1-duckdb", "mydb.duckdb").await.unwrap().is_some());
}
