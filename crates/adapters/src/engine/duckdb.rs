// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Real `Engine` backed by DuckDB, with the `httpfs`/`parquet`/`json`
//! extensions bundled at build time.

use std::path::Path;

use adb_core::{Column, Row, Value};
use duckdb::types::Value as DuckValue;
use duckdb::Connection;
use parking_lot::Mutex;

use super::{Engine, EngineConfig, EngineError, QueryResult, TableInfo};

pub struct DuckDbEngine {
    conn: Mutex<Option<Connection>>,
}

impl DuckDbEngine {
    /// Opens `path`, applying the memory/thread caps from `config`
    /// (§4.3 step 4). Extensions named in `config.extensions` are
    /// installed and loaded immediately.
    pub fn open(path: &Path, config: &EngineConfig) -> Result<Self, EngineError> {
        let duck_config = duckdb::Config::default()
            .with("memory_limit", &config.memory_limit)
            .map_err(|e| EngineError::Execution(e.to_string()))?
            .with("threads", &config.threads.to_string())
            .map_err(|e| EngineError::Execution(e.to_string()))?;
        let conn = Connection::open_with_flags(path, duck_config)
            .map_err(|e| EngineError::Execution(e.to_string()))?;
        let engine = Self { conn: Mutex::new(Some(conn)) };
        for ext in &config.extensions {
            engine.install_extension(ext)?;
            engine.load_extension(ext)?;
        }
        Ok(engine)
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T, duckdb::Error>) -> Result<T, EngineError> {
        let guard = self.conn.lock();
        let conn = guard.as_ref().ok_or_else(|| EngineError::Execution("engine is closed".to_string()))?;
        f(conn).map_err(|e| EngineError::Execution(e.to_string()))
    }
}

impl Engine for DuckDbEngine {
    fn exec(&self, sql: &str) -> Result<u64, EngineError> {
        self.with_conn(|conn| conn.execute(sql, []).map(|n| n as u64))
    }

    fn query_to_struct(&self, sql: &str) -> Result<QueryResult, EngineError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let columns: Vec<Column> = stmt
                .column_names()
                .into_iter()
                .map(|name| Column::new(name))
                .collect();
            let column_count = columns.len();
            let mut rows_out: Vec<Row> = Vec::new();
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let mut cells = Vec::with_capacity(column_count);
                for idx in 0..column_count {
                    let value: DuckValue = row.get(idx)?;
                    cells.push(duck_value_to_core(value));
                }
                rows_out.push(cells);
            }
            let row_count = rows_out.len() as u64;
            Ok(QueryResult { columns, rows: rows_out, row_count })
        })
    }

    fn exec_multi(&self, statements: &[String]) -> Result<(), EngineError> {
        let guard = self.conn.lock();
        let conn = guard.as_ref().ok_or_else(|| EngineError::Execution("engine is closed".to_string()))?;
        (|| -> Result<(), duckdb::Error> {
            conn.execute_batch("BEGIN TRANSACTION")?;
            for stmt in statements {
                if let Err(e) = conn.execute(stmt, []) {
                    conn.execute_batch("ROLLBACK").ok();
                    return Err(e);
                }
            }
            conn.execute_batch("COMMIT")
        })()
        .map_err(|e| EngineError::Execution(e.to_string()))
    }

    fn create_table(&self, name: &str, columns: &[Column]) -> Result<(), EngineError> {
        let column_defs: Vec<String> =
            columns.iter().map(|c| format!("\"{}\" {}", c.name, c.type_name)).collect();
        let sql = format!("CREATE TABLE \"{}\" ({})", name, column_defs.join(", "));
        self.exec(&sql).map(|_| ())
    }

    fn drop_table(&self, name: &str, if_exists: bool) -> Result<(), EngineError> {
        let clause = if if_exists { "IF EXISTS " } else { "" };
        self.exec(&format!("DROP TABLE {clause}\"{name}\"")).map(|_| ())
    }

    fn list_tables(&self, name_prefix: Option<&str>) -> Result<Vec<TableInfo>, EngineError> {
        let sql = match name_prefix {
            Some(prefix) => format!(
                "SELECT table_name FROM information_schema.tables WHERE table_schema = 'main' AND table_type = 'BASE TABLE' AND table_name LIKE '{prefix}%' ORDER BY table_name"
            ),
            None => "SELECT table_name FROM information_schema.tables WHERE table_schema = 'main' AND table_type = 'BASE TABLE' ORDER BY table_name".to_string(),
        };
        let names = self.query_to_struct(&sql)?;
        let mut tables = Vec::with_capacity(names.rows.len());
        for row in names.rows {
            let name = match row.first() {
                Some(Value::String(s)) => s.clone(),
                _ => continue,
            };
            let count = self.query_to_struct(&format!("SELECT count(*) FROM \"{name}\""))?;
            let row_count = match count.rows.first().and_then(|r| r.first()) {
                Some(Value::Int(n)) => *n as u64,
                _ => 0,
            };
            tables.push(TableInfo { name, schema: "main".to_string(), row_count });
        }
        Ok(tables)
    }

    fn get_table_schema(&self, table: &str) -> Result<Vec<Column>, EngineError> {
        let described = self.query_to_struct(&format!("DESCRIBE \"{table}\""))?;
        Ok(described
            .rows
            .into_iter()
            .filter_map(|row| match (row.first(), row.get(1)) {
                (Some(Value::String(name)), Some(Value::String(type_name))) => {
                    Some(Column::with_type(name.clone(), type_name.clone()))
                }
                _ => None,
            })
            .collect())
    }

    fn create_view(&self, name: &str, query: &str) -> Result<(), EngineError> {
        self.exec(&format!("CREATE VIEW \"{name}\" AS {query}")).map(|_| ())
    }

    fn drop_view(&self, name: &str, if_exists: bool) -> Result<(), EngineError> {
        let clause = if if_exists { "IF EXISTS " } else { "" };
        self.exec(&format!("DROP VIEW {clause}\"{name}\"")).map(|_| ())
    }

    fn list_views(&self, name_prefix: Option<&str>) -> Result<Vec<String>, EngineError> {
        let sql = match name_prefix {
            Some(prefix) => format!(
                "SELECT table_name FROM information_schema.tables WHERE table_schema = 'main' AND table_type = 'VIEW' AND table_name LIKE '{prefix}%' ORDER BY table_name"
            ),
            None => "SELECT table_name FROM information_schema.tables WHERE table_schema = 'main' AND table_type = 'VIEW' ORDER BY table_name".to_string(),
        };
        let names = self.query_to_struct(&sql)?;
        Ok(names
            .rows
            .into_iter()
            .filter_map(|row| match row.into_iter().next() {
                Some(Value::String(s)) => Some(s),
                _ => None,
            })
            .collect())
    }

    fn install_extension(&self, name: &str) -> Result<(), EngineError> {
        self.exec(&format!("INSTALL {name}")).map(|_| ())
    }

    fn load_extension(&self, name: &str) -> Result<(), EngineError> {
        self.exec(&format!("LOAD {name}")).map(|_| ())
    }

    fn list_extensions(&self) -> Result<Vec<String>, EngineError> {
        let result = self.query_to_struct("SELECT extension_name FROM duckdb_extensions() WHERE loaded = true")?;
        Ok(result
            .rows
            .into_iter()
            .filter_map(|row| match row.into_iter().next() {
                Some(Value::String(s)) => Some(s),
                _ => None,
            })
            .collect())
    }

    fn configure_remote(&self, statements: &[String]) -> Result<(), EngineError> {
        for stmt in statements {
            self.exec(stmt)?;
        }
        Ok(())
    }

    fn ping(&self) -> Result<(), EngineError> {
        self.query_to_struct("SELECT 1").map(|_| ())
    }

    fn close(&self) -> Result<(), EngineError> {
        let taken = self.conn.lock().take();
        match taken {
            None => Ok(()),
            Some(conn) => conn.close().map_err(|(_, e)| EngineError::Execution(e.to_string())),
        }
    }
}

fn duck_value_to_core(value: DuckValue) -> Value {
    match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(b) => Value::Bool(b),
        DuckValue::TinyInt(n) => Value::Int(n as i64),
        DuckValue::SmallInt(n) => Value::Int(n as i64),
        DuckValue::Int(n) => Value::Int(n as i64),
        DuckValue::BigInt(n) => Value::Int(n),
        DuckValue::HugeInt(n) => Value::String(n.to_string()),
        DuckValue::UTinyInt(n) => Value::Int(n as i64),
        DuckValue::USmallInt(n) => Value::Int(n as i64),
        DuckValue::UInt(n) => Value::Int(n as i64),
        DuckValue::UBigInt(n) => Value::String(n.to_string()),
        DuckValue::Float(f) => Value::Double(f as f64),
        DuckValue::Double(f) => Value::Double(f),
        DuckValue::Text(s) => Value::String(s),
        DuckValue::Blob(b) => Value::Bytes(b),
        // `Value::Timestamp` is milliseconds since the epoch (§4.6);
        // DuckDB reports microseconds, truncated toward negative
        // infinity so pre-epoch timestamps round the same direction.
        DuckValue::Timestamp(_, micros) => Value::Timestamp(micros.div_euclid(1000)),
        other => Value::String(format!("{other:?}")),
    }
}

#[cfg(test)]
#[path = "duckdb_tests.rs"]
mod tests;
