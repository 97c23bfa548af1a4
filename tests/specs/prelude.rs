// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared harness for the workspace-level specs: a `HandleStore` wired
//! to the real `DuckDbEngine` (embedded, no network) over a
//! `FakeObjectStore` (stands in for S3) and a `FakeClock` (stands in
//! for wall-clock time), plus a raw socket client for driving the
//! daemon's `Listener` end to end.

use std::path::PathBuf;
use std::sync::Arc;

use adb_adapters::FakeObjectStore;
use adb_core::FakeClock;
use adb_daemon::{ListenCtx, Listener};
use adb_engine::Handlers;
use adb_store::{DuckDbEngineFactory, HandleStore, HandleStoreConfig};
use adb_wire::{Request, Response};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Notify;

pub type TestStore = HandleStore<FakeObjectStore, DuckDbEngineFactory, FakeClock>;
pub type TestHandlers = Handlers<FakeObjectStore, DuckDbEngineFactory, FakeClock>;

/// A store plus the scratch/object-store directories backing it,
/// kept alive for the caller's lifetime.
pub struct Harness {
    pub store: Arc<TestStore>,
    pub object_store: Arc<FakeObjectStore>,
    pub clock: Arc<FakeClock>,
    pub handlers: TestHandlers,
    _scratch_dir: tempfile::TempDir,
}

impl Harness {
    /// Default capacity (100), the real embedded engine, a fresh fake
    /// object store and clock.
    pub fn new() -> Self {
        Self::with_config(|c| c)
    }

    /// Same as `new`, but lets the caller shrink `capacity` or other
    /// config fields (S3 scales capacity down so the eviction scenario
    /// doesn't require opening 101 real DuckDB files).
    pub fn with_config(f: impl FnOnce(HandleStoreConfig) -> HandleStoreConfig) -> Self {
        let scratch_dir = tempfile::tempdir().expect("scratch dir");
        let config = f(HandleStoreConfig::new(scratch_dir.path().to_path_buf()));
        let object_store = Arc::new(FakeObjectStore::new());
        let clock = Arc::new(FakeClock::new());
        let store = Arc::new(HandleStore::new(
            object_store.clone(),
            Arc::new(DuckDbEngineFactory),
            clock.clone(),
            config,
        ));
        let handlers = Handlers::new(store.clone(), clock.clone());
        Self { store, object_store, clock, handlers, _scratch_dir: scratch_dir }
    }
}

/// Binds a `Listener` on a fresh Unix socket inside a tempdir and runs
/// its accept loop on a background task. Returns the socket path and a
/// handle to abort the accept loop, plus the `TempDir` keeping the
/// socket file alive.
pub struct RunningDaemon {
    pub socket_path: PathBuf,
    accept_loop: tokio::task::JoinHandle<()>,
    _dir: tempfile::TempDir,
}

impl RunningDaemon {
    pub async fn spawn(store: Arc<TestStore>, clock: Arc<FakeClock>) -> Self {
        let dir = tempfile::tempdir().expect("socket dir");
        let socket_path = dir.path().join("adbd.sock");
        let unix = UnixListener::bind(&socket_path).expect("bind unix socket");
        let handlers = Arc::new(Handlers::new(store, clock));
        let ctx = Arc::new(ListenCtx { handlers, auth_token: None, shutdown: Arc::new(Notify::new()) });
        let listener = Listener::new(unix, ctx);
        let accept_loop = tokio::spawn(listener.run());
        Self { socket_path, accept_loop, _dir: dir }
    }

    pub async fn connect(&self) -> DaemonConn {
        let stream = UnixStream::connect(&self.socket_path).await.expect("connect to daemon socket");
        DaemonConn { stream }
    }
}

impl Drop for RunningDaemon {
    fn drop(&mut self) {
        self.accept_loop.abort();
    }
}

/// One request/response round trip over the real wire codec.
pub struct DaemonConn {
    stream: UnixStream,
}

impl DaemonConn {
    pub async fn send(&mut self, request: &Request) -> Response {
        let bytes = adb_wire::encode(request).expect("encode request");
        adb_wire::write_message(&mut self.stream, &bytes).await.expect("write request");
        let reply = adb_wire::read_message(&mut self.stream).await.expect("read response");
        adb_wire::decode(&reply).expect("decode response")
    }
}
