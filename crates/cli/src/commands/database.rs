// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `adb create|list|delete|info|backup|restore` — database lifecycle
//! commands (§4.5 Database lifecycle).

use serde::Serialize;

use crate::client::DaemonClient;
use crate::exit_error::ExitError;
use crate::output::{format_or_json, handle_list, OutputFormat};

pub async fn ping(client: &DaemonClient) -> Result<(), ExitError> {
    client.ping().await?;
    println!("daemon reachable");
    Ok(())
}

pub async fn create(client: &DaemonClient, tenant: &str, database: &str, format: OutputFormat) -> Result<(), ExitError> {
    let (container, object_key) = client.create_database(tenant, database).await?;

    #[derive(Serialize)]
    struct Created {
        container: String,
        object_key: String,
    }
    format_or_json(format, &Created { container: container.clone(), object_key: object_key.clone() }, || {
        println!("created {database} in container {container} (object {object_key})");
    })
    .map_err(|e| ExitError::new(1, e.to_string()))
}

pub async fn list(
    client: &DaemonClient,
    tenant: &str,
    filter: Option<&str>,
    format: OutputFormat,
) -> Result<(), ExitError> {
    let databases = client.list_databases(tenant, filter).await?;
    handle_list(format, &databases, "no databases found", |rows| {
        for db in rows {
            println!("{}", db.identifier);
        }
    })
    .map_err(|e| ExitError::new(1, e.to_string()))
}

pub async fn delete(client: &DaemonClient, tenant: &str, database: &str, format: OutputFormat) -> Result<(), ExitError> {
    let identifier = client.delete_database(tenant, database).await?;

    #[derive(Serialize)]
    struct Deleted {
        identifier: String,
    }
    format_or_json(format, &Deleted { identifier: identifier.clone() }, || println!("deleted {identifier}"))
        .map_err(|e| ExitError::new(1, e.to_string()))
}

pub async fn info(client: &DaemonClient, tenant: &str, database: &str, format: OutputFormat) -> Result<(), ExitError> {
    let info = client.get_database_info(tenant, database).await?;
    format_or_json(format, &info, || {
        println!("identifier: {}", info.identifier);
        println!("container:  {}", info.container);
        println!("object_key: {}", info.object_key);
    })
    .map_err(|e| ExitError::new(1, e.to_string()))
}

pub async fn backup(
    client: &DaemonClient,
    tenant: &str,
    database: &str,
    label: &str,
    format: OutputFormat,
) -> Result<(), ExitError> {
    let backup_key = client.backup_database(tenant, database, label).await?;

    #[derive(Serialize)]
    struct Backed {
        backup_key: String,
    }
    format_or_json(format, &Backed { backup_key: backup_key.clone() }, || println!("backed up to {backup_key}"))
        .map_err(|e| ExitError::new(1, e.to_string()))
}

pub async fn restore(
    client: &DaemonClient,
    tenant: &str,
    backup_key: &str,
    new_database: &str,
    format: OutputFormat,
) -> Result<(), ExitError> {
    let object_key = client.restore_database(tenant, backup_key, new_database).await?;

    #[derive(Serialize)]
    struct Restored {
        object_key: String,
    }
    format_or_json(format, &Restored { object_key: object_key.clone() }, || println!("restored into {object_key}"))
        .map_err(|e| ExitError::new(1, e.to_string()))
}

#[cfg(test)]
#[path = "database_tests.rs"]
mod tests;
