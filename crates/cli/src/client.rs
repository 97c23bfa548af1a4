// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thin client over `adb-wire`'s framed protocol: connects to the
//! daemon's Unix socket, writes one `Request`, and reads back its
//! `Response`(s). Used only by `adb` — the daemon itself never goes
//! through this path.

use std::path::PathBuf;

use adb_core::{Column, Row};
use adb_wire::{DatabaseInfo, DatabaseSummary, ProtocolError, Request, Response, ResponsePayload};
use thiserror::Error;
use tokio::net::UnixStream;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to connect to daemon at {path}: {source}")]
    Connect { path: PathBuf, source: std::io::Error },
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("unexpected response from daemon: {0:?}")]
    Unexpected(Response),
    #[error("{0}")]
    Failed(String),
}

pub struct DaemonClient {
    socket_path: PathBuf,
}

pub struct QueryOutcome {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    pub row_count: u64,
    pub duration_ms: Option<f64>,
}

impl DaemonClient {
    pub fn new(socket_path: PathBuf) -> Self {
        Self { socket_path }
    }

    /// Connects, writes one request, and reads exactly one response.
    /// A fresh connection per request keeps the CLI stateless — the
    /// daemon's `ImportDataBegin`/`Chunk`/`End` session affinity is not
    /// exercised by this client (§D.3 scopes the CLI to
    /// create/list/delete/query/backup/restore).
    async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        let mut stream = UnixStream::connect(&self.socket_path)
            .await
            .map_err(|source| ClientError::Connect { path: self.socket_path.clone(), source })?;
        let bytes = adb_wire::encode(request)?;
        adb_wire::write_message(&mut stream, &bytes).await?;
        let reply = adb_wire::read_message(&mut stream).await?;
        Ok(adb_wire::decode(&reply)?)
    }

    fn reject(response: Response) -> ClientError {
        match response.error {
            Some(error) => ClientError::Failed(error),
            None => ClientError::Unexpected(response),
        }
    }

    pub async fn ping(&self) -> Result<(), ClientError> {
        let response = self.send(&Request::Ping).await?;
        if response.success {
            Ok(())
        } else {
            Err(Self::reject(response))
        }
    }

    pub async fn create_database(&self, tenant: &str, database: &str) -> Result<(String, String), ClientError> {
        let response = self
            .send(&Request::CreateDatabase { tenant: tenant.to_string(), database: database.to_string() })
            .await?;
        if !response.success {
            return Err(Self::reject(response));
        }
        match response.payload {
            Some(ResponsePayload::DatabaseCreated { container, object_key }) => Ok((container, object_key)),
            _ => Err(ClientError::Unexpected(response)),
        }
    }

    pub async fn list_databases(
        &self,
        tenant: &str,
        filter: Option<&str>,
    ) -> Result<Vec<DatabaseSummary>, ClientError> {
        let response = self
            .send(&Request::ListDatabases { tenant: tenant.to_string(), filter: filter.map(str::to_string) })
            .await?;
        if !response.success {
            return Err(Self::reject(response));
        }
        match response.payload {
            Some(ResponsePayload::Databases { databases }) => Ok(databases),
            _ => Err(ClientError::Unexpected(response)),
        }
    }

    pub async fn delete_database(&self, tenant: &str, database: &str) -> Result<String, ClientError> {
        let response = self
            .send(&Request::DeleteDatabase { tenant: tenant.to_string(), database: database.to_string() })
            .await?;
        if !response.success {
            return Err(Self::reject(response));
        }
        match response.payload {
            Some(ResponsePayload::DatabaseDeleted { identifier }) => Ok(identifier),
            _ => Err(ClientError::Unexpected(response)),
        }
    }

    pub async fn get_database_info(&self, tenant: &str, database: &str) -> Result<DatabaseInfo, ClientError> {
        let response = self
            .send(&Request::GetDatabaseInfo { tenant: tenant.to_string(), database: database.to_string() })
            .await?;
        if !response.success {
            return Err(Self::reject(response));
        }
        match response.payload {
            Some(ResponsePayload::DatabaseInfo(info)) => Ok(info),
            _ => Err(ClientError::Unexpected(response)),
        }
    }

    pub async fn backup_database(&self, tenant: &str, database: &str, label: &str) -> Result<String, ClientError> {
        let response = self
            .send(&Request::BackupDatabase {
                tenant: tenant.to_string(),
                database: database.to_string(),
                label: label.to_string(),
            })
            .await?;
        if !response.success {
            return Err(Self::reject(response));
        }
        match response.payload {
            Some(ResponsePayload::BackupCreated { backup_key }) => Ok(backup_key),
            _ => Err(ClientError::Unexpected(response)),
        }
    }

    pub async fn restore_database(
        &self,
        tenant: &str,
        backup_key: &str,
        new_database: &str,
    ) -> Result<String, ClientError> {
        let response = self
            .send(&Request::RestoreDatabase {
                tenant: tenant.to_string(),
                backup_key: backup_key.to_string(),
                new_database: new_database.to_string(),
            })
            .await?;
        if !response.success {
            return Err(Self::reject(response));
        }
        match response.payload {
            Some(ResponsePayload::Restored { object_key }) => Ok(object_key),
            _ => Err(ClientError::Unexpected(response)),
        }
    }

    pub async fn execute_query(&self, tenant: &str, database: &str, sql: &str) -> Result<QueryOutcome, ClientError> {
        let response = self
            .send(&Request::ExecuteQuery { tenant: tenant.to_string(), database: database.to_string(), sql: sql.to_string() })
            .await?;
        if !response.success {
            return Err(Self::reject(response));
        }
        let duration_ms = response.duration_ms;
        match response.payload {
            Some(ResponsePayload::QueryResult { columns, rows, row_count }) => {
                Ok(QueryOutcome { columns, rows, row_count, duration_ms })
            }
            _ => Err(ClientError::Unexpected(response)),
        }
    }
}

/// Shared by this crate's other test modules: a one-shot fake daemon
/// that accepts a single connection, reads one request, and writes
/// back a canned response.
#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use tokio::net::UnixListener;

    pub async fn spawn_fake_daemon(response: Response) -> PathBuf {
        let dir = tempfile::tempdir().expect("tempdir");
        let socket_path = dir.path().join("fake.sock");
        let listener = UnixListener::bind(&socket_path).expect("bind");
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("accept");
            let _req = adb_wire::read_message(&mut stream).await.expect("read request");
            let bytes = adb_wire::encode(&response).expect("encode response");
            adb_wire::write_message(&mut stream, &bytes).await.expect("write response");
            drop(dir);
        });
        socket_path
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
