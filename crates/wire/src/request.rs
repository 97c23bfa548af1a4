// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use adb_core::Column;
use serde::{Deserialize, Serialize};

/// A column definition for `CreateTable`, mirroring the embedded
/// engine's `col_info` contract (§6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub type_name: String,
}

impl From<ColumnDef> for Column {
    fn from(c: ColumnDef) -> Self {
        Column::with_type(c.name, c.type_name)
    }
}

/// Import/export/query-file format selector (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreFormat {
    Csv,
    Parquet,
    Json,
}

impl StoreFormat {
    /// The `read_<fmt>_auto` / `COPY ... (FORMAT <fmt>)` token.
    pub fn as_sql_token(self) -> &'static str {
        match self {
            StoreFormat::Csv => "csv",
            StoreFormat::Parquet => "parquet",
            StoreFormat::Json => "json",
        }
    }
}

/// Request from a client to the daemon. Every variant's first two
/// fields are `tenant` and (when it targets a database) `database`,
/// reflecting §6's "every request carries at least a tenant identifier".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    /// Health check; also exercises the object store's `health_check()`.
    Ping,

    /// Version handshake.
    Hello {
        version: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token: Option<String>,
    },

    /// Open-or-return the database file, creating the container and
    /// seeding the object if needed (§4.3).
    CreateDatabase { tenant: String, database: String },

    /// List databases in the tenant's container, optionally filtered by
    /// substring (§4.5).
    ListDatabases {
        tenant: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filter: Option<String>,
    },

    /// Tear down the in-memory Handle, then delete the object (§4.5:
    /// order matters, local state dies first).
    DeleteDatabase { tenant: String, database: String },

    /// Derived metadata only — no I/O besides sanitization.
    GetDatabaseInfo { tenant: String, database: String },

    /// Synchronously sync, then object-store-side COPY to a backup key.
    BackupDatabase { tenant: String, database: String, label: String },

    /// Object-store-side COPY from a backup key to a new database object.
    /// No engine interaction.
    RestoreDatabase { tenant: String, backup_key: String, new_database: String },

    CreateTable {
        tenant: String,
        database: String,
        table: String,
        columns: Vec<ColumnDef>,
        #[serde(default)]
        if_not_exists: bool,
    },
    DropTable { tenant: String, database: String, table: String, if_exists: bool },

    CreateView { tenant: String, database: String, view: String, query: String },
    DropView { tenant: String, database: String, view: String, if_exists: bool },

    CreateFunction { tenant: String, database: String, sql: String },

    InstallExtension { tenant: String, database: String, extension: String },

    GetSchema { tenant: String, database: String, table: String },
    GetRowCount { tenant: String, database: String, table: String },
    ListTables { tenant: String, database: String },
    ListViews { tenant: String, database: String },
    ListExtensions { tenant: String, database: String },

    /// Read-only SELECT; full result materialized (§4.5).
    ExecuteQuery { tenant: String, database: String, sql: String },

    /// Same semantics, delivered as a stream of 100-row chunks.
    ExecuteQueryStream { tenant: String, database: String, sql: String },

    /// One DML/DDL statement; reports affected-row count.
    ExecuteStatement { tenant: String, database: String, sql: String },

    /// Either one transaction over all statements, or independent
    /// per-statement execution (§4.5).
    ExecuteBatch { tenant: String, database: String, statements: Vec<String>, transactional: bool },

    /// Allocates an opaque statement id; no cache (§4.5, §9 Open
    /// Question 2).
    PrepareStatement { tenant: String, database: String, sql: String },

    /// `CREATE TABLE <wrapped> AS SELECT * FROM read_<fmt>_auto(...)`.
    ImportFromStore {
        tenant: String,
        database: String,
        table: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        container: Option<String>,
        object: String,
        format: StoreFormat,
    },

    /// `COPY (<query>) TO '<path>' (FORMAT <fmt>)`; read-only locally.
    ExportToStore {
        tenant: String,
        database: String,
        query: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        container: Option<String>,
        object: String,
        format: StoreFormat,
    },

    /// `query_template` must contain the literal token `$FILE`.
    QueryFile {
        tenant: String,
        database: String,
        query_template: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        container: Option<String>,
        object: String,
        format: StoreFormat,
    },

    /// First message of a streaming import: metadata only.
    ImportDataBegin { tenant: String, database: String, table: String, format: StoreFormat },
    /// Subsequent messages: raw byte chunks.
    ImportDataChunk { bytes: Vec<u8> },
    /// Final message: buffered bytes are (nominally) imported — see
    /// §E.1 for the documented no-op placeholder.
    ImportDataEnd,

    /// Request daemon shutdown; drains the Handle Store first.
    Shutdown,
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
