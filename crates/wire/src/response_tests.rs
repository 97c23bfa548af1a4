// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn failed_response_has_success_false_and_matching_error_message() {
    let resp = Response::failed(Status::Internal, "engine error: syntax error");
    assert!(!resp.success);
    assert_eq!(resp.status, Status::Internal);
    assert_eq!(resp.error.as_deref(), Some("engine error: syntax error"));
    assert!(resp.payload.is_none());
}

#[test]
fn ok_response_round_trips_with_flattened_payload() {
    let resp = Response::ok(
        "created",
        ResponsePayload::DatabaseCreated {
            container: "user-u1-duckdb".to_string(),
            object_key: "mydb.duckdb".to_string(),
        },
    )
    .with_duration(1.5);

    let json = serde_json::to_value(&resp).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["type"], "DatabaseCreated");
    assert_eq!(json["container"], "user-u1-duckdb");

    let back: Response = serde_json::from_value(json).unwrap();
    assert_eq!(back, resp);
    assert_eq!(resp.status, Status::Ok);
}

#[test]
fn query_chunk_omits_columns_when_not_first() {
    let resp = Response::ok(
        "chunk",
        ResponsePayload::QueryChunk { columns: None, rows: vec![], is_last: false },
    );
    let json = serde_json::to_value(&resp).unwrap();
    assert!(json.get("columns").is_none());
}
