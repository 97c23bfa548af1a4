// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Embedded-engine contract (§6): opens a local file as a database,
//! executes SQL, lists tables/extensions.
//!
//! DuckDB's own API is blocking, so this trait is synchronous; callers
//! that need to stay off an async executor's thread wrap calls in
//! `tokio::task::spawn_blocking` (done in `adb-store`, not here).

pub mod duckdb;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

use adb_core::{Column, Row};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine error: {0}")]
    Execution(String),
}

/// Per-handle engine configuration applied at open (§4.3 step 4).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub memory_limit: String,
    pub threads: u32,
    pub extensions: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { memory_limit: "512MB".to_string(), threads: 2, extensions: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    pub row_count: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableInfo {
    pub name: String,
    pub schema: String,
    pub row_count: u64,
}

pub trait Engine: Send + Sync {
    fn exec(&self, sql: &str) -> Result<u64, EngineError>;
    fn query_to_struct(&self, sql: &str) -> Result<QueryResult, EngineError>;
    fn exec_multi(&self, statements: &[String]) -> Result<(), EngineError>;
    fn create_table(&self, name: &str, columns: &[Column]) -> Result<(), EngineError>;
    fn drop_table(&self, name: &str, if_exists: bool) -> Result<(), EngineError>;
    fn list_tables(&self, name_prefix: Option<&str>) -> Result<Vec<TableInfo>, EngineError>;
    fn get_table_schema(&self, table: &str) -> Result<Vec<Column>, EngineError>;
    fn create_view(&self, name: &str, query: &str) -> Result<(), EngineError>;
    fn drop_view(&self, name: &str, if_exists: bool) -> Result<(), EngineError>;
    fn list_views(&self, name_prefix: Option<&str>) -> Result<Vec<String>, EngineError>;
    fn install_extension(&self, name: &str) -> Result<(), EngineError>;
    fn load_extension(&self, name: &str) -> Result<(), EngineError>;
    fn list_extensions(&self) -> Result<Vec<String>, EngineError>;
    /// Applies a sequence of `SET ...` statements; the caller (§4.3
    /// step 5) treats failures here as warnings, not open failures.
    fn configure_remote(&self, statements: &[String]) -> Result<(), EngineError>;
    fn ping(&self) -> Result<(), EngineError>;
    fn close(&self) -> Result<(), EngineError>;
}
