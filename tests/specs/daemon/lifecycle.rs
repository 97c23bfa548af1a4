// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exercises the real `Listener` accept loop and wire codec (§6) end
//! to end, rather than calling `Handlers` methods directly.

use adb_wire::{Request, ResponsePayload};

use crate::prelude::{Harness, RunningDaemon};

#[tokio::test]
async fn ping_create_query_delete_over_the_real_socket() {
    let h = Harness::new();
    let daemon = RunningDaemon::spawn(h.store.clone(), h.clock.clone()).await;
    let mut conn = daemon.connect().await;

    let pong = conn.send(&Request::Ping).await;
    assert!(pong.success);
    assert!(matches!(pong.payload, Some(ResponsePayload::Pong)));

    let created = conn
        .send(&Request::CreateDatabase { tenant: "u1".to_string(), database: "mydb".to_string() })
        .await;
    assert!(created.success, "{created:?}");

    let query = conn
        .send(&Request::ExecuteQuery {
            tenant: "u1".to_string(),
            database: "mydb".to_string(),
            sql: "SELECT 1".to_string(),
        })
        .await;
    assert!(query.success, "{query:?}");
    assert!(query.duration_ms.is_some());

    let deleted = conn
        .send(&Request::DeleteDatabase { tenant: "u1".to_string(), database: "mydb".to_string() })
        .await;
    assert!(deleted.success, "{deleted:?}");
}

#[tokio::test]
async fn unauthenticated_requests_are_accepted_on_the_trusted_unix_path() {
    // Unlike TCP, a Unix-socket connection needs no `Hello` handshake
    // (listener.rs: `authenticated = source == ConnectionSource::Unix`).
    let h = Harness::new();
    let daemon = RunningDaemon::spawn(h.store.clone(), h.clock.clone()).await;
    let mut conn = daemon.connect().await;

    let response = conn.send(&Request::Ping).await;
    assert!(response.success);
}
