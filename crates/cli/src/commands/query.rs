// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `adb query` — read-only `ExecuteQuery` (§4.5 Query execution).

use adb_core::Value;
use serde::Serialize;

use crate::client::DaemonClient;
use crate::exit_error::ExitError;
use crate::output::OutputFormat;

pub async fn execute(
    client: &DaemonClient,
    tenant: &str,
    database: &str,
    sql: &str,
    format: OutputFormat,
) -> Result<(), ExitError> {
    let outcome = client.execute_query(tenant, database, sql).await?;

    match format {
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Out<'a> {
                columns: &'a [adb_core::Column],
                rows: &'a [adb_core::Row],
                row_count: u64,
                duration_ms: Option<f64>,
            }
            let out = Out {
                columns: &outcome.columns,
                rows: &outcome.rows,
                row_count: outcome.row_count,
                duration_ms: outcome.duration_ms,
            };
            println!("{}", serde_json::to_string_pretty(&out).map_err(|e| ExitError::new(1, e.to_string()))?);
        }
        OutputFormat::Text => {
            println!("{}", outcome.columns.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join("\t"));
            for row in &outcome.rows {
                let rendered: Vec<String> = row.iter().map(render_value).collect();
                println!("{}", rendered.join("\t"));
            }
            let duration =
                outcome.duration_ms.map(|ms| format!(" in {ms:.1}ms")).unwrap_or_default();
            println!("\n{} row(s){duration}", outcome.row_count);
        }
    }
    Ok(())
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Int(i) => i.to_string(),
        Value::Double(d) => d.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Bytes(b) => format!("0x{}", b.iter().map(|byte| format!("{byte:02x}")).collect::<String>()),
        Value::String(s) => s.clone(),
        Value::Timestamp(ms) => ms.to_string(),
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
