// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory `Engine` for tests (test-support feature). Tracks tables
//! as plain row vectors; SQL is not parsed, only the small set of
//! shapes handlers actually issue (CREATE/DROP/INSERT/SELECT count).

use std::collections::HashMap;

use adb_core::{Column, Row, Value};
use parking_lot::Mutex;

use super::{Engine, EngineError, QueryResult, TableInfo};

struct FakeTable {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

#[derive(Default)]
pub struct FakeEngine {
    tables: Mutex<HashMap<String, FakeTable>>,
    views: Mutex<Vec<String>>,
    extensions: Mutex<Vec<String>>,
    closed: Mutex<bool>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> Result<(), EngineError> {
        if *self.closed.lock() {
            Err(EngineError::Execution("engine is closed".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Engine for FakeEngine {
    fn exec(&self, _sql: &str) -> Result<u64, EngineError> {
        self.ensure_open()?;
        Ok(0)
    }

    fn query_to_struct(&self, sql: &str) -> Result<QueryResult, EngineError> {
        self.ensure_open()?;
        if sql.trim_start().to_uppercase().starts_with("SELECT COUNT") {
            return Ok(QueryResult {
                columns: vec![Column::new("count")],
                rows: vec![vec![Value::Int(0)]],
                row_count: 1,
            });
        }
        Ok(QueryResult { columns: vec![], rows: vec![], row_count: 0 })
    }

    fn exec_multi(&self, _statements: &[String]) -> Result<(), EngineError> {
        self.ensure_open()
    }

    fn create_table(&self, name: &str, columns: &[Column]) -> Result<(), EngineError> {
        self.ensure_open()?;
        self.tables
            .lock()
            .insert(name.to_string(), FakeTable { columns: columns.to_vec(), rows: Vec::new() });
        Ok(())
    }

    fn drop_table(&self, name: &str, if_exists: bool) -> Result<(), EngineError> {
        self.ensure_open()?;
        let removed = self.tables.lock().remove(name).is_some();
        if removed || if_exists {
            Ok(())
        } else {
            Err(EngineError::Execution(format!("no such table: {name}")))
        }
    }

    fn list_tables(&self, name_prefix: Option<&str>) -> Result<Vec<TableInfo>, EngineError> {
        self.ensure_open()?;
        let prefix = name_prefix.unwrap_or("");
        Ok(self
            .tables
            .lock()
            .iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(name, table)| TableInfo {
                name: name.clone(),
                schema: "main".to_string(),
                row_count: table.rows.len() as u64,
            })
            .collect())
    }

    fn get_table_schema(&self, table: &str) -> Result<Vec<Column>, EngineError> {
        self.ensure_open()?;
        self.tables
            .lock()
            .get(table)
            .map(|t| t.columns.clone())
            .ok_or_else(|| EngineError::Execution(format!("no such table: {table}")))
    }

    fn create_view(&self, name: &str, _query: &str) -> Result<(), EngineError> {
        self.ensure_open()?;
        let mut views = self.views.lock();
        if !views.contains(&name.to_string()) {
            views.push(name.to_string());
        }
        Ok(())
    }

    fn drop_view(&self, name: &str, if_exists: bool) -> Result<(), EngineError> {
        self.ensure_open()?;
        let mut views = self.views.lock();
        let before = views.len();
        views.retain(|v| v != name);
        if views.len() < before || if_exists {
            Ok(())
        } else {
            Err(EngineError::Execution(format!("no such view: {name}")))
        }
    }

    fn list_views(&self, name_prefix: Option<&str>) -> Result<Vec<String>, EngineError> {
        self.ensure_open()?;
        let prefix = name_prefix.unwrap_or("");
        Ok(self.views.lock().iter().filter(|v| v.starts_with(prefix)).cloned().collect())
    }

    fn install_extension(&self, name: &str) -> Result<(), EngineError> {
        self.ensure_open()?;
        self.extensions.lock().push(name.to_string());
        Ok(())
    }

    fn load_extension(&self, _name: &str) -> Result<(), EngineError> {
        self.ensure_open()
    }

    fn list_extensions(&self) -> Result<Vec<String>, EngineError> {
        self.ensure_open()?;
        Ok(self.extensions.lock().clone())
    }

    fn configure_remote(&self, _statements: &[String]) -> Result<(), EngineError> {
        self.ensure_open()
    }

    fn ping(&self) -> Result<(), EngineError> {
        self.ensure_open()
    }

    fn close(&self) -> Result<(), EngineError> {
        *self.closed.lock() = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
