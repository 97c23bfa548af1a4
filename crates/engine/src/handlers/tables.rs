// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Table/view/schema/extension passthrough (§4.5): thin adapters over
//! the embedded engine, wrapping caller-supplied table/view identifiers
//! per-tenant before they ever reach the engine.

use adb_adapters::{EngineError, TableInfo as EngineTableInfo};
use adb_core::{Column, Error};
use adb_wire::{ColumnDef, Response, ResponsePayload, TableInfo};

use super::{fail, run_blocking, Handlers};
use crate::auth;
use crate::wrap::{tenant_prefix, unwrap_table_name, wrap_table_name};

impl<O, F, C> Handlers<O, F, C>
where
    O: adb_adapters::ObjectStore + 'static,
    F: adb_store::EngineFactory + 'static,
    C: adb_core::Clock + 'static,
{
    pub async fn create_table(
        &self,
        tenant: &str,
        database: &str,
        table: &str,
        columns: Vec<ColumnDef>,
        if_not_exists: bool,
    ) -> Response {
        if let Err(e) = auth::validate_tenant(tenant) {
            return fail(e);
        }
        let handle = match self.store().get_or_create(tenant, database).await {
            Ok(h) => h,
            Err(e) => return fail(e),
        };
        let wrapped = wrap_table_name(tenant, table);
        let cols: Vec<Column> = columns.into_iter().map(Column::from).collect();
        let result = run_blocking(&handle, move |e| {
            if if_not_exists && e.get_table_schema(&wrapped).is_ok() {
                return Ok(());
            }
            e.create_table(&wrapped, &cols)
        })
        .await;
        match result {
            Ok(()) => {
                handle.mark_modified().await;
                Response::ok_empty("table created")
            }
            Err(e) => fail(e),
        }
    }

    pub async fn drop_table(&self, tenant: &str, database: &str, table: &str, if_exists: bool) -> Response {
        if let Err(e) = auth::validate_tenant(tenant) {
            return fail(e);
        }
        let handle = match self.store().get_or_create(tenant, database).await {
            Ok(h) => h,
            Err(e) => return fail(e),
        };
        let wrapped = wrap_table_name(tenant, table);
        let result = run_blocking(&handle, move |e| e.drop_table(&wrapped, if_exists)).await;
        match result {
            Ok(()) => {
                handle.mark_modified().await;
                Response::ok_empty("table dropped")
            }
            Err(e) => fail(e),
        }
    }

    pub async fn create_view(&self, tenant: &str, database: &str, view: &str, query: &str) -> Response {
        if let Err(e) = auth::validate_tenant(tenant) {
            return fail(e);
        }
        let handle = match self.store().get_or_create(tenant, database).await {
            Ok(h) => h,
            Err(e) => return fail(e),
        };
        let wrapped = wrap_table_name(tenant, view);
        let query = query.to_string();
        let result = run_blocking(&handle, move |e| e.create_view(&wrapped, &query)).await;
        match result {
            Ok(()) => {
                handle.mark_modified().await;
                Response::ok_empty("view created")
            }
            Err(e) => fail(e),
        }
    }

    pub async fn drop_view(&self, tenant: &str, database: &str, view: &str, if_exists: bool) -> Response {
        if let Err(e) = auth::validate_tenant(tenant) {
            return fail(e);
        }
        let handle = match self.store().get_or_create(tenant, database).await {
            Ok(h) => h,
            Err(e) => return fail(e),
        };
        let wrapped = wrap_table_name(tenant, view);
        let result = run_blocking(&handle, move |e| e.drop_view(&wrapped, if_exists)).await;
        match result {
            Ok(()) => {
                handle.mark_modified().await;
                Response::ok_empty("view dropped")
            }
            Err(e) => fail(e),
        }
    }

    /// Raw SQL, unwrapped — the caller supplies the full `CREATE
    /// FUNCTION` statement (§4.5).
    pub async fn create_function(&self, tenant: &str, database: &str, sql: &str) -> Response {
        if let Err(e) = auth::validate_tenant(tenant) {
            return fail(e);
        }
        let handle = match self.store().get_or_create(tenant, database).await {
            Ok(h) => h,
            Err(e) => return fail(e),
        };
        let sql = sql.to_string();
        let result = run_blocking(&handle, move |e| e.exec(&sql)).await;
        match result {
            Ok(_) => {
                handle.mark_modified().await;
                Response::ok_empty("function created")
            }
            Err(e) => fail(e),
        }
    }

    /// Install followed by a load, per §4.5.
    pub async fn install_extension(&self, tenant: &str, database: &str, extension: &str) -> Response {
        if let Err(e) = auth::validate_tenant(tenant) {
            return fail(e);
        }
        let handle = match self.store().get_or_create(tenant, database).await {
            Ok(h) => h,
            Err(e) => return fail(e),
        };
        let extension = extension.to_string();
        let result = run_blocking(&handle, move |e| {
            e.install_extension(&extension)?;
            e.load_extension(&extension)
        })
        .await;
        match result {
            Ok(()) => {
                handle.mark_modified().await;
                Response::ok_empty("extension installed")
            }
            Err(e) => fail(e),
        }
    }

    pub async fn get_schema(&self, tenant: &str, database: &str, table: &str) -> Response {
        if let Err(e) = auth::validate_tenant(tenant) {
            return fail(e);
        }
        let handle = match self.store().get_or_create(tenant, database).await {
            Ok(h) => h,
            Err(e) => return fail(e),
        };
        let wrapped = wrap_table_name(tenant, table);
        match run_blocking(&handle, move |e| e.get_table_schema(&wrapped)).await {
            Ok(columns) => Response::ok("schema fetched", ResponsePayload::Schema { columns }),
            Err(e) => fail(e),
        }
    }

    pub async fn get_row_count(&self, tenant: &str, database: &str, table: &str) -> Response {
        if let Err(e) = auth::validate_tenant(tenant) {
            return fail(e);
        }
        let handle = match self.store().get_or_create(tenant, database).await {
            Ok(h) => h,
            Err(e) => return fail(e),
        };
        let wrapped = wrap_table_name(tenant, table);
        let result = run_blocking(&handle, move |e| {
            let sql = format!("SELECT COUNT(*) FROM {wrapped}");
            e.query_to_struct(&sql)
        })
        .await;
        match result {
            Ok(result) => {
                let row_count = match result.rows.first().and_then(|r| r.first()) {
                    Some(adb_core::Value::Int(n)) => *n as u64,
                    _ => 0,
                };
                Response::ok("row count fetched", ResponsePayload::RowCount { row_count })
            }
            Err(e) => fail(e),
        }
    }

    pub async fn list_tables(&self, tenant: &str, database: &str) -> Response {
        if let Err(e) = auth::validate_tenant(tenant) {
            return fail(e);
        }
        let handle = match self.store().get_or_create(tenant, database).await {
            Ok(h) => h,
            Err(e) => return fail(e),
        };
        let prefix = tenant_prefix(tenant);
        let result = run_blocking(&handle, move |e| e.list_tables(Some(&prefix))).await;
        match result {
            Ok(infos) => {
                let tables = infos
                    .into_iter()
                    .map(|info: EngineTableInfo| TableInfo {
                        name: unwrap_table_name(tenant, &info.name).to_string(),
                        schema: info.schema,
                        row_count: info.row_count,
                    })
                    .collect();
                Response::ok("tables listed", ResponsePayload::Tables { tables })
            }
            Err(e) => fail(e),
        }
    }

    pub async fn list_views(&self, tenant: &str, database: &str) -> Response {
        if let Err(e) = auth::validate_tenant(tenant) {
            return fail(e);
        }
        let handle = match self.store().get_or_create(tenant, database).await {
            Ok(h) => h,
            Err(e) => return fail(e),
        };
        let prefix = tenant_prefix(tenant);
        let result = run_blocking(&handle, move |e| e.list_views(Some(&prefix))).await;
        match result {
            Ok(names) => {
                let views = names.into_iter().map(|n| unwrap_table_name(tenant, &n).to_string()).collect();
                Response::ok("views listed", ResponsePayload::Views { views })
            }
            Err(e) => fail(e),
        }
    }

    pub async fn list_extensions(&self, tenant: &str, database: &str) -> Response {
        if let Err(e) = auth::validate_tenant(tenant) {
            return fail(e);
        }
        let handle = match self.store().get_or_create(tenant, database).await {
            Ok(h) => h,
            Err(e) => return fail(e),
        };
        match run_blocking(&handle, |e| e.list_extensions()).await {
            Ok(extensions) => Response::ok("extensions listed", ResponsePayload::Extensions { extensions }),
            Err(e) => fail(e),
        }
    }
}

#[cfg(test)]
#[path = "tables_tests.rs"]
mod tests;
