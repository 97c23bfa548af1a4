// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `adb` subcommands: database lifecycle and query, the CLI's
//! deliberately small scope (§D.3).

pub mod database;
pub mod query;

use clap::Subcommand;

use crate::exit_error::ExitError;
use crate::output::OutputFormat;

#[derive(Subcommand)]
pub enum Command {
    /// Check that the daemon and its object store are reachable.
    Ping,

    /// Open-or-create a tenant database.
    Create {
        tenant: String,
        database: String,
    },

    /// List a tenant's databases.
    List {
        tenant: String,
        /// Only show databases whose name contains this substring.
        #[arg(long)]
        filter: Option<String>,
    },

    /// Delete a database, identified as `<tenant>-<name>` (as printed
    /// by `adb list`).
    Delete {
        database: String,
    },

    /// Show derived container/object-key metadata for a database,
    /// identified as `<tenant>-<name>`.
    Info {
        database: String,
    },

    /// Run a read-only SQL query against a database, identified as
    /// `<tenant>-<name>`.
    Query {
        database: String,
        sql: String,
    },

    /// Sync a database and copy it to a labeled backup key, identified
    /// as `<tenant>-<name>`.
    Backup {
        database: String,
        label: String,
    },

    /// Restore a backup key as a new database.
    Restore {
        tenant: String,
        backup_key: String,
        new_database: String,
    },
}

pub async fn run(command: Command, client: &crate::client::DaemonClient, format: OutputFormat) -> Result<(), ExitError> {
    match command {
        Command::Ping => database::ping(client).await,
        Command::Create { tenant, database } => database::create(client, &tenant, &database, format).await,
        Command::List { tenant, filter } => database::list(client, &tenant, filter.as_deref(), format).await,
        Command::Delete { database } => {
            let id = parse_identifier(&database)?;
            database::delete(client, &id.tenant, &id.name, format).await
        }
        Command::Info { database } => {
            let id = parse_identifier(&database)?;
            database::info(client, &id.tenant, &id.name, format).await
        }
        Command::Backup { database, label } => {
            let id = parse_identifier(&database)?;
            database::backup(client, &id.tenant, &id.name, &label, format).await
        }
        Command::Restore { tenant, backup_key, new_database } => {
            database::restore(client, &tenant, &backup_key, &new_database, format).await
        }
        Command::Query { database, sql } => {
            let id = parse_identifier(&database)?;
            query::execute(client, &id.tenant, &id.name, &sql, format).await
        }
    }
}

/// Recovers `(tenant, name)` from a `<tenant>-<name>` database
/// identifier (§3, §9 Open Question 3): the CLI is the layer
/// that performs this split, since the wire protocol itself carries
/// `tenant`/`database` as already-separated fields.
fn parse_identifier(raw: &str) -> Result<adb_core::DatabaseId, ExitError> {
    adb_core::DatabaseId::parse(raw).map_err(|e| ExitError::new(2, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_identifier_splits_on_first_separator() {
        let id = parse_identifier("u1-mydb").unwrap();
        assert_eq!(id.tenant, "u1");
        assert_eq!(id.name, "mydb");
    }

    #[test]
    fn parse_identifier_rejects_missing_separator() {
        let err = parse_identifier("nodash").unwrap_err();
        assert_eq!(err.code, 2);
    }
}
