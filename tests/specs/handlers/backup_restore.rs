// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! S6 — backup round-trip (§8).

use adb_engine::wrap::wrap_table_name;
use adb_wire::{ColumnDef, ResponsePayload as RP};

use crate::prelude::Harness;

#[tokio::test]
async fn backup_then_restore_preserves_data() {
    let h = Harness::new();
    h.handlers.create_database("u1", "db1").await;

    let columns = vec![ColumnDef { name: "id".to_string(), type_name: "INT".to_string() }];
    h.handlers.create_table("u1", "db1", "users", columns, false).await;
    let wrapped = wrap_table_name("u1", "users");
    let insert = h.handlers.execute_statement("u1", "db1", &format!("INSERT INTO {wrapped} VALUES (1)")).await;
    assert!(insert.success, "{insert:?}");

    let backup = h.handlers.backup_database("u1", "db1", "L").await;
    let backup_key = match backup.payload {
        Some(RP::BackupCreated { backup_key }) => backup_key,
        other => panic!("unexpected payload: {other:?}"),
    };
    assert!(backup_key.starts_with("backups/L-"));

    let restore = h.handlers.restore_database("u1", &backup_key, "db2").await;
    assert!(restore.success, "{restore:?}");

    let count = h
        .handlers
        .execute_query("u1", "db2", &format!("SELECT COUNT(*) FROM {wrapped}"))
        .await;
    assert!(count.success, "{count:?}");
    match count.payload {
        Some(RP::QueryResult { rows, .. }) => {
            assert_eq!(rows[0][0], adb_core::Value::Int(1));
        }
        other => panic!("unexpected payload: {other:?}"),
    }
}
