// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Query execution (§4.5): raw SQL passthrough, unwrapped — the caller
//! supplies full statement text, so none of the `user_<tenant>_<name>`
//! wrapping from `tables.rs` applies here.

use std::time::Instant;

use adb_core::id;
use adb_wire::{BatchStatementResult, Response, ResponsePayload};
use tokio_util::sync::CancellationToken;

use super::{fail, run_blocking, Handlers};
use crate::auth;

/// Query results are delivered in chunks of this many rows when
/// streamed (§4.5 `ExecuteQueryStream`).
const STREAM_CHUNK_ROWS: usize = 100;

impl<O, F, C> Handlers<O, F, C>
where
    O: adb_adapters::ObjectStore + 'static,
    F: adb_store::EngineFactory + 'static,
    C: adb_core::Clock + 'static,
{
    /// Read-only; does not mark dirty.
    pub async fn execute_query(&self, tenant: &str, database: &str, sql: &str) -> Response {
        if let Err(e) = auth::validate_tenant(tenant) {
            return fail(e);
        }
        let handle = match self.store().get_or_create(tenant, database).await {
            Ok(h) => h,
            Err(e) => return fail(e),
        };
        let sql = sql.to_string();
        let started = Instant::now();
        match run_blocking(&handle, move |e| e.query_to_struct(&sql)).await {
            Ok(result) => Response::ok(
                "query executed",
                ResponsePayload::QueryResult {
                    columns: result.columns,
                    rows: result.rows,
                    row_count: result.row_count,
                },
            )
            .with_duration(started.elapsed().as_secs_f64() * 1000.0),
            Err(e) => fail(e),
        }
    }

    /// Materializes the full result the same way `execute_query` does,
    /// then chunks it client-side into the wire's streamed-response
    /// shape — the `Engine` contract has no true row-streaming iterator
    /// (see DESIGN.md). Column metadata rides only on the first chunk;
    /// `duration_ms` only on the last.
    pub async fn execute_query_stream(&self, tenant: &str, database: &str, sql: &str) -> Vec<Response> {
        if let Err(e) = auth::validate_tenant(tenant) {
            return vec![fail(e)];
        }
        let handle = match self.store().get_or_create(tenant, database).await {
            Ok(h) => h,
            Err(e) => return vec![fail(e)],
        };
        let sql = sql.to_string();
        let started = Instant::now();
        let result = match run_blocking(&handle, move |e| e.query_to_struct(&sql)).await {
            Ok(result) => result,
            Err(e) => return vec![fail(e)],
        };

        if result.rows.is_empty() {
            return vec![Response::ok(
                "query executed",
                ResponsePayload::QueryChunk { columns: Some(result.columns), rows: vec![], is_last: true },
            )
            .with_duration(started.elapsed().as_secs_f64() * 1000.0)];
        }

        let mut chunks: Vec<Response> = Vec::new();
        let mut rows = result.rows.into_iter().peekable();
        let mut first = true;
        while rows.peek().is_some() {
            let chunk: Vec<_> = rows.by_ref().take(STREAM_CHUNK_ROWS).collect();
            let is_last = rows.peek().is_none();
            let columns = if first { Some(result.columns.clone()) } else { None };
            let mut response =
                Response::ok("query executed", ResponsePayload::QueryChunk { columns, rows: chunk, is_last });
            if is_last {
                response = response.with_duration(started.elapsed().as_secs_f64() * 1000.0);
            }
            chunks.push(response);
            first = false;
        }
        chunks
    }

    /// One DML/DDL statement; reports affected-row count; marks dirty.
    pub async fn execute_statement(&self, tenant: &str, database: &str, sql: &str) -> Response {
        if let Err(e) = auth::validate_tenant(tenant) {
            return fail(e);
        }
        let handle = match self.store().get_or_create(tenant, database).await {
            Ok(h) => h,
            Err(e) => return fail(e),
        };
        let sql = sql.to_string();
        match run_blocking(&handle, move |e| e.exec(&sql)).await {
            Ok(affected_rows) => {
                handle.mark_modified().await;
                Response::ok("statement executed", ResponsePayload::AffectedRows { affected_rows })
            }
            Err(e) => fail(e),
        }
    }

    /// Either a single transaction over all statements, or independent
    /// per-statement execution, per the caller's `transactional` flag
    /// (§4.5). `cancel` is checked between statements in the
    /// independent-execution path (§5: a handler abandons in-flight
    /// work once the request's cancellation token fires); already
    /// a transaction cannot be cancelled once started without leaving
    /// the engine mid-transaction, so the transactional path runs to
    /// completion regardless.
    pub async fn execute_batch(
        &self,
        tenant: &str,
        database: &str,
        statements: Vec<String>,
        transactional: bool,
        cancel: CancellationToken,
    ) -> Response {
        if let Err(e) = auth::validate_tenant(tenant) {
            return fail(e);
        }
        let handle = match self.store().get_or_create(tenant, database).await {
            Ok(h) => h,
            Err(e) => return fail(e),
        };

        if transactional {
            let stmts = statements.clone();
            return match run_blocking(&handle, move |e| e.exec_multi(&stmts)).await {
                Ok(()) => {
                    handle.mark_modified().await;
                    let results = statements
                        .iter()
                        .map(|_| BatchStatementResult { success: true, error: None, affected_rows: 0 })
                        .collect();
                    Response::ok("batch executed", ResponsePayload::BatchResult { transactional: true, results })
                }
                Err(e) => fail(e),
            };
        }

        let mut results = Vec::with_capacity(statements.len());
        let mut any_succeeded = false;
        for sql in statements {
            if cancel.is_cancelled() {
                break;
            }
            match run_blocking(&handle, move |e| e.exec(&sql)).await {
                Ok(affected_rows) => {
                    any_succeeded = true;
                    results.push(BatchStatementResult { success: true, error: None, affected_rows });
                }
                Err(e) => {
                    results.push(BatchStatementResult { success: false, error: Some(e.to_string()), affected_rows: 0 });
                }
            }
        }
        if any_succeeded {
            handle.mark_modified().await;
        }
        Response::ok("batch executed", ResponsePayload::BatchResult { transactional: false, results })
    }

    /// Allocates an opaque statement id; no cache maintained (§4.5, §9
    /// Open Question 2 / §E.2).
    pub fn prepare_statement(&self, tenant: &str, _database: &str, _sql: &str) -> Response {
        if let Err(e) = auth::validate_tenant(tenant) {
            return fail(e);
        }
        let statement_id = id::prepared_statement_id(tenant);
        Response::ok("statement prepared", ResponsePayload::StatementPrepared { statement_id })
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
