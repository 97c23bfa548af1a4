// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use adb_core::{Column, Row, Status};
use serde::{Deserialize, Serialize};

/// Summary of one database, for `ListDatabases` (§4.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSummary {
    pub identifier: String,
    pub name: String,
}

/// Derived metadata only (§4.5 `GetDatabaseInfo`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseInfo {
    pub identifier: String,
    pub container: String,
    pub object_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableInfo {
    pub name: String,
    pub schema: String,
    pub row_count: u64,
}

/// Per-statement outcome in a non-transactional `ExecuteBatch` (§4.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStatementResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub affected_rows: u64,
}

/// Operation-specific payload, flattened into the envelope below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResponsePayload {
    Pong,
    Hello { version: String },
    DatabaseCreated { container: String, object_key: String },
    Databases { databases: Vec<DatabaseSummary> },
    DatabaseDeleted { identifier: String },
    DatabaseInfo(DatabaseInfo),
    BackupCreated { backup_key: String },
    Restored { object_key: String },
    AffectedRows { affected_rows: u64 },
    StatementPrepared { statement_id: String },
    QueryResult { columns: Vec<Column>, rows: Vec<Row>, row_count: u64 },
    /// One chunk of a streamed query. Column metadata is attached only
    /// to the first chunk; `duration_ms` only to the last (§4.5).
    QueryChunk {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        columns: Option<Vec<Column>>,
        rows: Vec<Row>,
        is_last: bool,
    },
    Schema { columns: Vec<Column> },
    RowCount { row_count: u64 },
    Tables { tables: Vec<TableInfo> },
    Views { views: Vec<String> },
    Extensions { extensions: Vec<String> },
    BatchResult { transactional: bool, results: Vec<BatchStatementResult> },
    ShuttingDown,
}

/// Uniform response envelope (§6, §7): every response carries `success`,
/// a `status` drawn from the §7 error taxonomy, an optional `error`, a
/// human `message`, and operation-specific fields via `payload`.
/// Callers must check `success` even when the transport itself returned
/// ok.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<f64>,
    #[serde(flatten, default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<ResponsePayload>,
}

impl Response {
    pub fn ok(message: impl Into<String>, payload: ResponsePayload) -> Self {
        Self {
            success: true,
            status: Status::Ok,
            error: None,
            message: message.into(),
            duration_ms: None,
            payload: Some(payload),
        }
    }

    pub fn ok_empty(message: impl Into<String>) -> Self {
        Self { success: true, status: Status::Ok, error: None, message: message.into(), duration_ms: None, payload: None }
    }

    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Engine or store failure reported in-body (§4.7, §7): transport
    /// stays `ok`, the caller must check `success`. `status` is the
    /// §7 taxonomy mapping of the originating error, so a client can
    /// distinguish auth/identifier/engine/store failures without
    /// parsing `error`'s text.
    pub fn failed(status: Status, error: impl Into<String>) -> Self {
        let error = error.into();
        Self { success: false, status, error: Some(error.clone()), message: error, duration_ms: None, payload: None }
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
