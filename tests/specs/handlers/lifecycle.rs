// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! S1 — cold create -> query -> delete (§8).

use adb_adapters::ObjectStore;
use adb_core::Value;
use adb_engine::wrap::wrap_table_name;
use adb_wire::{ColumnDef, Response, ResponsePayload};

use crate::prelude::Harness;

#[tokio::test]
async fn cold_create_query_delete_round_trip() {
    let h = Harness::new();

    let created = h.handlers.create_database("u1", "mydb").await;
    assert!(created.success);
    match created.payload {
        Some(ResponsePayload::DatabaseCreated { container, object_key }) => {
            assert_eq!(container, "user-u1-duckdb");
            assert_eq!(object_key, "mydb.duckdb");
        }
        other => panic!("unexpected payload: {other:?}"),
    }
    assert!(h.object_store.stat_object("user-u1-duckdb", "mydb.duckdb").await.unwrap().is_none());

    let columns = vec![
        ColumnDef { name: "id".to_string(), type_name: "INT".to_string() },
        ColumnDef { name: "name".to_string(), type_name: "VARCHAR".to_string() },
    ];
    let table_created = h.handlers.create_table("u1", "mydb", "users", columns, false).await;
    assert!(table_created.success, "{table_created:?}");

    let wrapped = wrap_table_name("u1", "users");
    let insert = h.handlers.execute_statement("u1", "mydb", &format!("INSERT INTO {wrapped} VALUES (1, 'a')")).await;
    assert!(insert.success, "{insert:?}");

    let query = h.handlers.execute_query("u1", "mydb", &format!("SELECT * FROM {wrapped}")).await;
    assert!(query.success, "{query:?}");
    match query.payload {
        Some(ResponsePayload::QueryResult { columns, rows, row_count }) => {
            let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
            assert_eq!(names, vec!["id", "name"]);
            assert_eq!(row_count, 1);
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0][0], Value::Int(1));
            assert_eq!(rows[0][1], Value::String("a".to_string()));
        }
        other => panic!("unexpected payload: {other:?}"),
    }

    let deleted = h.handlers.delete_database("u1", "mydb").await;
    assert!(deleted.success, "{deleted:?}");

    let listed = h.handlers.list_databases("u1", None).await;
    match listed.payload {
        Some(ResponsePayload::Databases { databases }) => assert!(databases.is_empty()),
        other => panic!("unexpected payload: {other:?}"),
    }
    assert!(h.object_store.stat_object("user-u1-duckdb", "mydb.duckdb").await.unwrap().is_none());
}

#[tokio::test]
async fn create_database_rejects_empty_tenant_via_auth_gate() {
    let h = Harness::new();
    let response: Response = h.handlers.create_database("", "mydb").await;
    assert!(!response.success);
    assert!(response.error.is_some());
}
