// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener task (§6): an accept loop over a Unix socket and, when
//! `ADB_TCP_PORT` is set, a TCP socket alongside it, dispatching each
//! request to `adb_engine::Handlers`.
//!
//! One spawned task per connection, racing the request handler against
//! client-disconnect detection so a client that hangs up mid-request
//! doesn't leave an orphaned handler running.

use std::sync::Arc;
use std::time::Duration;

use adb_adapters::ObjectStore;
use adb_core::Clock;
use adb_engine::{Handlers, ImportSession};
use adb_store::EngineFactory;
use adb_wire::{Request, Response, ResponsePayload, Status};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, UnixListener};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub const PROTOCOL_VERSION: &str = "1";

/// Budget for reading one request / writing one response. `adb_wire`
/// itself has no timeout built in, so it is applied here.
const IPC_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared daemon context handed to every connection task.
pub struct ListenCtx<O, F, C> {
    pub handlers: Arc<Handlers<O, F, C>>,
    pub auth_token: Option<String>,
    pub shutdown: Arc<Notify>,
}

pub struct Listener<O, F, C> {
    unix: UnixListener,
    tcp: Option<TcpListener>,
    ctx: Arc<ListenCtx<O, F, C>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectionSource {
    /// Local Unix socket — trusted, no auth handshake required.
    Unix,
    /// Remote TCP — requires a matching token in the Hello handshake.
    Tcp,
}

impl<O, F, C> Listener<O, F, C>
where
    O: ObjectStore + 'static,
    F: EngineFactory + 'static,
    C: Clock + 'static,
{
    pub fn new(unix: UnixListener, ctx: Arc<ListenCtx<O, F, C>>) -> Self {
        Self { unix, tcp: None, ctx }
    }

    pub fn with_tcp(unix: UnixListener, tcp: TcpListener, ctx: Arc<ListenCtx<O, F, C>>) -> Self {
        Self { unix, tcp: Some(tcp), ctx }
    }

    pub async fn run(mut self) {
        match self.tcp.take() {
            Some(tcp) => self.run_dual(tcp).await,
            None => self.run_unix_only().await,
        }
    }

    async fn run_unix_only(self) {
        loop {
            match self.unix.accept().await {
                Ok((stream, _)) => {
                    let ctx = Arc::clone(&self.ctx);
                    tokio::spawn(async move {
                        let (reader, writer) = stream.into_split();
                        handle_connection(reader, writer, ConnectionSource::Unix, ctx).await;
                    });
                }
                Err(e) => error!(error = %e, "unix accept error"),
            }
        }
    }

    async fn run_dual(self, tcp: TcpListener) {
        loop {
            tokio::select! {
                result = self.unix.accept() => {
                    match result {
                        Ok((stream, _)) => {
                            let ctx = Arc::clone(&self.ctx);
                            tokio::spawn(async move {
                                let (reader, writer) = stream.into_split();
                                handle_connection(reader, writer, ConnectionSource::Unix, ctx).await;
                            });
                        }
                        Err(e) => error!(error = %e, "unix accept error"),
                    }
                }
                result = tcp.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            debug!(%addr, "tcp connection accepted");
                            let ctx = Arc::clone(&self.ctx);
                            tokio::spawn(async move {
                                let (reader, writer) = stream.into_split();
                                handle_connection(reader, writer, ConnectionSource::Tcp, ctx).await;
                            });
                        }
                        Err(e) => error!(error = %e, "tcp accept error"),
                    }
                }
            }
        }
    }
}

/// Services one connection for as long as the peer keeps sending
/// requests. A persistent connection lets `ImportDataBegin`/`Chunk`/
/// `End` share one `ImportSession` across several frames; every other
/// request is handled independently within the same loop.
async fn handle_connection<R, W, O, F, C>(mut reader: R, mut writer: W, source: ConnectionSource, ctx: Arc<ListenCtx<O, F, C>>)
where
    R: AsyncRead + AsyncReadExt + Unpin + Send + 'static,
    W: AsyncWrite + AsyncWriteExt + Unpin + Send + 'static,
    O: ObjectStore + 'static,
    F: EngineFactory + 'static,
    C: Clock + 'static,
{
    let mut authenticated = source == ConnectionSource::Unix;
    let mut import: Option<ImportSession> = None;

    loop {
        let request = match tokio::time::timeout(IPC_TIMEOUT, adb_wire::read_request(&mut reader)).await {
            Ok(Ok(request)) => request,
            Ok(Err(_)) => {
                debug!("client disconnected");
                return;
            }
            Err(_) => {
                warn!("timed out waiting for a request");
                return;
            }
        };

        if !authenticated {
            match &request {
                Request::Hello { token, .. } => {
                    let expected = ctx.auth_token.as_deref();
                    let provided = token.as_deref();
                    if expected.is_none() || expected == provided {
                        authenticated = true;
                    } else {
                        let _ = write(&mut writer, &Response::failed(Status::PermissionDenied, "unauthorized")).await;
                        return;
                    }
                }
                _ => {
                    let _ = write(
                        &mut writer,
                        &Response::failed(Status::InvalidArgument, "tcp connections must start with Hello"),
                    )
                    .await;
                    return;
                }
            }
        }

        if matches!(request, Request::ExecuteQuery { .. } | Request::ExecuteQueryStream { .. }) {
            debug!(request = ?request, "received query");
        } else {
            info!(request = ?request, "received request");
        }

        let is_shutdown = matches!(request, Request::Shutdown);

        // Races the handler against client-disconnect detection (§5:
        // abandon in-flight engine/store calls once the request's
        // cancellation token fires). `dispatch` never touches `reader`,
        // so reading ahead here for EOF cannot race with it.
        let cancel = CancellationToken::new();
        let dispatch_fut = dispatch(request, &ctx.handlers, &mut import, cancel.clone());
        tokio::pin!(dispatch_fut);
        let responses = tokio::select! {
            responses = &mut dispatch_fut => responses,
            _ = detect_disconnect(&mut reader) => {
                cancel.cancel();
                debug!("client disconnected mid-request, abandoning handler");
                return;
            }
        };

        for response in &responses {
            if write(&mut writer, response).await.is_err() {
                return;
            }
        }
        if is_shutdown {
            ctx.shutdown.notify_one();
            return;
        }
    }
}

/// Detects a client hanging up while its request is still being served:
/// in this request/response protocol, the client does not send further
/// bytes until it receives a response, so any successful read here means
/// EOF (disconnect) rather than a legitimate next frame.
async fn detect_disconnect<R: AsyncReadExt + Unpin>(reader: &mut R) {
    let mut buf = [0u8; 1];
    let _ = reader.read(&mut buf).await;
}

async fn write<W: AsyncWrite + Unpin>(writer: &mut W, response: &Response) -> Result<(), ()> {
    tokio::time::timeout(IPC_TIMEOUT, adb_wire::write_response(writer, response)).await.map_err(|_| ())?.map_err(|_| ())
}

/// Dispatches one request, returning the response(s) to write in order.
/// Every variant but `ExecuteQueryStream` produces exactly one.
async fn dispatch<O, F, C>(
    request: Request,
    handlers: &Handlers<O, F, C>,
    import: &mut Option<ImportSession>,
    cancel: CancellationToken,
) -> Vec<Response>
where
    O: ObjectStore + 'static,
    F: EngineFactory + 'static,
    C: Clock + 'static,
{
    let one = |r: Response| vec![r];

    match request {
        Request::Ping => one(handlers.ping().await),

        Request::Hello { version: _, token: _ } => {
            one(Response::ok("hello", ResponsePayload::Hello { version: PROTOCOL_VERSION.to_string() }))
        }

        Request::CreateDatabase { tenant, database } => one(handlers.create_database(&tenant, &database).await),
        Request::ListDatabases { tenant, filter } => one(handlers.list_databases(&tenant, filter.as_deref()).await),
        Request::DeleteDatabase { tenant, database } => one(handlers.delete_database(&tenant, &database).await),
        Request::GetDatabaseInfo { tenant, database } => one(handlers.get_database_info(&tenant, &database)),
        Request::BackupDatabase { tenant, database, label } => {
            one(handlers.backup_database(&tenant, &database, &label).await)
        }
        Request::RestoreDatabase { tenant, backup_key, new_database } => {
            one(handlers.restore_database(&tenant, &backup_key, &new_database).await)
        }

        Request::CreateTable { tenant, database, table, columns, if_not_exists } => {
            one(handlers.create_table(&tenant, &database, &table, columns, if_not_exists).await)
        }
        Request::DropTable { tenant, database, table, if_exists } => {
            one(handlers.drop_table(&tenant, &database, &table, if_exists).await)
        }
        Request::CreateView { tenant, database, view, query } => {
            one(handlers.create_view(&tenant, &database, &view, &query).await)
        }
        Request::DropView { tenant, database, view, if_exists } => {
            one(handlers.drop_view(&tenant, &database, &view, if_exists).await)
        }
        Request::CreateFunction { tenant, database, sql } => {
            one(handlers.create_function(&tenant, &database, &sql).await)
        }
        Request::InstallExtension { tenant, database, extension } => {
            one(handlers.install_extension(&tenant, &database, &extension).await)
        }
        Request::GetSchema { tenant, database, table } => one(handlers.get_schema(&tenant, &database, &table).await),
        Request::GetRowCount { tenant, database, table } => {
            one(handlers.get_row_count(&tenant, &database, &table).await)
        }
        Request::ListTables { tenant, database } => one(handlers.list_tables(&tenant, &database).await),
        Request::ListViews { tenant, database } => one(handlers.list_views(&tenant, &database).await),
        Request::ListExtensions { tenant, database } => one(handlers.list_extensions(&tenant, &database).await),

        Request::ExecuteQuery { tenant, database, sql } => one(handlers.execute_query(&tenant, &database, &sql).await),
        Request::ExecuteQueryStream { tenant, database, sql } => {
            handlers.execute_query_stream(&tenant, &database, &sql).await
        }
        Request::ExecuteStatement { tenant, database, sql } => {
            one(handlers.execute_statement(&tenant, &database, &sql).await)
        }
        Request::ExecuteBatch { tenant, database, statements, transactional } => {
            one(handlers.execute_batch(&tenant, &database, statements, transactional, cancel).await)
        }
        Request::PrepareStatement { tenant, database, sql } => {
            one(handlers.prepare_statement(&tenant, &database, &sql))
        }

        Request::ImportFromStore { tenant, database, table, container, object, format } => one(
            handlers.import_from_store(&tenant, &database, &table, container.as_deref(), &object, format).await,
        ),
        Request::ExportToStore { tenant, database, query, container, object, format } => one(
            handlers.export_to_store(&tenant, &database, &query, container.as_deref(), &object, format).await,
        ),
        Request::QueryFile { tenant, database, query_template, container, object, format } => one(handlers
            .query_file(&tenant, &database, &query_template, container.as_deref(), &object, format)
            .await),

        Request::ImportDataBegin { tenant, database, table, format } => {
            *import = Some(ImportSession::begin(tenant, database, table, format));
            one(Response::ok_empty("import started"))
        }
        Request::ImportDataChunk { bytes } => {
            match import.as_mut() {
                Some(session) => session.push_chunk(&bytes),
                None => {
                    return one(Response::failed(
                        Status::InvalidArgument,
                        "ImportDataChunk received with no session in progress",
                    ))
                }
            }
            one(Response::ok_empty("chunk received"))
        }
        Request::ImportDataEnd => match import.take() {
            Some(session) => one(session.finish()),
            None => one(Response::failed(
                Status::InvalidArgument,
                "ImportDataEnd received with no session in progress",
            )),
        },

        Request::Shutdown => one(Response::ok("shutting down", ResponsePayload::ShuttingDown)),
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
