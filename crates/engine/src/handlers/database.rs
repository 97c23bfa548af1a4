// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Database lifecycle handlers (§4.5): Create/List/Delete/Info/Backup/
//! Restore.

use adb_adapters::ObjectStore;
use adb_core::{Clock, Error, TenantId};
use adb_store::EngineFactory;
use adb_wire::{DatabaseInfo, DatabaseSummary, Response, ResponsePayload};

use super::{fail, Handlers};
use crate::auth;

impl<O, F, C> Handlers<O, F, C>
where
    O: ObjectStore + 'static,
    F: EngineFactory + 'static,
    C: Clock + 'static,
{
    /// Open-or-return the database file (§4.3), reporting where it lives.
    pub async fn create_database(&self, tenant: &str, database: &str) -> Response {
        if let Err(e) = auth::validate_tenant(tenant) {
            return fail(e);
        }
        let handle = match self.store().get_or_create(tenant, database).await {
            Ok(h) => h,
            Err(e) => return fail(e),
        };
        Response::ok(
            "database ready",
            ResponsePayload::DatabaseCreated {
                container: handle.container.clone(),
                object_key: handle.object_key.clone(),
            },
        )
    }

    /// LIST the tenant's container, stripping the `.duckdb` suffix and
    /// excluding the `backups/` prefix, with an optional substring
    /// filter (§4.5).
    pub async fn list_databases(&self, tenant: &str, filter: Option<&str>) -> Response {
        if let Err(e) = auth::validate_tenant(tenant) {
            return fail(e);
        }
        let container = TenantId::new(tenant).container_name();
        let object_store = self.object_store();
        match object_store.bucket_exists(&container).await {
            Ok(false) => return Response::ok("databases listed", ResponsePayload::Databases { databases: vec![] }),
            Err(e) => return fail(Error::Internal(e.to_string())),
            Ok(true) => {}
        }
        let keys = match object_store.list_objects(&container, "").await {
            Ok(k) => k,
            Err(e) => return fail(Error::Internal(e.to_string())),
        };
        let databases: Vec<DatabaseSummary> = keys
            .into_iter()
            .filter(|k| !k.starts_with("backups/"))
            .filter_map(|k| k.strip_suffix(".duckdb").map(|n| n.to_string()))
            .filter(|name| filter.map(|f| name.contains(f)).unwrap_or(true))
            .map(|name| DatabaseSummary { identifier: format!("{tenant}-{name}"), name })
            .collect();
        Response::ok("databases listed", ResponsePayload::Databases { databases })
    }

    /// Tear down the in-memory Handle before deleting the object, so an
    /// in-flight sync cannot resurrect it afterward (§4.5, §5).
    pub async fn delete_database(&self, tenant: &str, database: &str) -> Response {
        if let Err(e) = auth::validate_tenant(tenant) {
            return fail(e);
        }
        self.store().remove(tenant, database).await;
        let container = TenantId::new(tenant).container_name();
        let object_key = format!("{database}.duckdb");
        if let Err(e) = self.object_store().delete_object(&container, &object_key).await {
            return fail(Error::Internal(e.to_string()));
        }
        Response::ok(
            "database deleted",
            ResponsePayload::DatabaseDeleted { identifier: format!("{tenant}-{database}") },
        )
    }

    /// Derived metadata only — no I/O besides sanitization (§4.5).
    pub fn get_database_info(&self, tenant: &str, database: &str) -> Response {
        if let Err(e) = auth::validate_tenant(tenant) {
            return fail(e);
        }
        let container = TenantId::new(tenant).container_name();
        let object_key = format!("{database}.duckdb");
        Response::ok(
            "database info",
            ResponsePayload::DatabaseInfo(DatabaseInfo {
                identifier: format!("{tenant}-{database}"),
                container,
                object_key,
            }),
        )
    }

    /// Acquire the handle, synchronously sync, then object-store-side
    /// COPY to a timestamped backup key (§4.5). A sync failure is
    /// reported to the caller and no copy is attempted (§4.7).
    pub async fn backup_database(&self, tenant: &str, database: &str, label: &str) -> Response {
        if let Err(e) = auth::validate_tenant(tenant) {
            return fail(e);
        }
        let handle = match self.store().get_or_create(tenant, database).await {
            Ok(h) => h,
            Err(e) => return fail(e),
        };
        let object_store = self.object_store();
        if let Err(e) = handle.force_sync(object_store.as_ref(), self.clock.epoch_secs()).await {
            return fail(Error::Internal(e));
        }
        let backup_key = format!("backups/{label}-{}.duckdb", self.clock.epoch_secs());
        if let Err(e) =
            object_store.copy_object(&handle.container, &handle.object_key, &handle.container, &backup_key).await
        {
            return fail(Error::Internal(e.to_string()));
        }
        Response::ok("backup created", ResponsePayload::BackupCreated { backup_key })
    }

    /// Object-store-side COPY from a backup key to a new database
    /// object; no engine interaction (§4.5).
    pub async fn restore_database(&self, tenant: &str, backup_key: &str, new_database: &str) -> Response {
        if let Err(e) = auth::validate_tenant(tenant) {
            return fail(e);
        }
        let container = TenantId::new(tenant).container_name();
        let object_key = format!("{new_database}.duckdb");
        if let Err(e) = self.object_store().copy_object(&container, backup_key, &container, &object_key).await {
            return fail(Error::Internal(e.to_string()));
        }
        Response::ok("database restored", ResponsePayload::Restored { object_key })
    }
}

#[cfg(test)]
#[path = "database_tests.rs"]
mod tests;
