// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request Handlers (§4.5): one `Handlers<O, F, C>` per daemon,
//! generic over the same `ObjectStore`/`EngineFactory`/`Clock` type
//! parameters as `adb_store::HandleStore` so the daemon binary plugs
//! in the real adapters while tests plug in the fakes.

mod analytics;
mod database;
mod query;
mod tables;

pub use analytics::ImportSession;

use std::sync::Arc;

use adb_adapters::{Engine, EngineError, ObjectStore};
use adb_core::{Clock, Error};
use adb_store::{EngineFactory, Handle, HandleStore};
use adb_wire::Response;

pub struct Handlers<O, F, C> {
    store: Arc<HandleStore<O, F, C>>,
    clock: Arc<C>,
}

impl<O, F, C> Handlers<O, F, C>
where
    O: ObjectStore + 'static,
    F: EngineFactory + 'static,
    C: Clock + 'static,
{
    pub fn new(store: Arc<HandleStore<O, F, C>>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &Arc<HandleStore<O, F, C>> {
        &self.store
    }

    fn object_store(&self) -> Arc<O> {
        self.store.object_store()
    }

    /// Object-Store Client health check, exposed as `Ping` (§D.2).
    pub async fn ping(&self) -> Response {
        match self.object_store().health_check().await {
            Ok(()) => Response::ok("pong", adb_wire::ResponsePayload::Pong),
            Err(e) => fail(Error::Internal(e.to_string())),
        }
    }
}

/// Engine calls are blocking (DuckDB's own API is synchronous);
/// handlers run them on the blocking pool so the connection task never
/// stalls the executor. Holds `handle`'s state lock for the duration of
/// the call (spec.md §5, §9): this is what serializes a handler's
/// in-flight engine call against a concurrent `evict`/`remove` for the
/// same handle, so eviction can never close the engine or delete the
/// scratch file while this call is running.
async fn run_blocking<T, Func>(handle: &Handle, f: Func) -> Result<T, Error>
where
    T: Send + 'static,
    Func: FnOnce(&dyn Engine) -> Result<T, EngineError> + Send + 'static,
{
    let _guard = handle.lock_state().await;
    let engine = handle.engine.clone();
    tokio::task::spawn_blocking(move || f(engine.as_ref()))
        .await
        .map_err(|e| Error::Internal(format!("engine task panicked: {e}")))?
        .map_err(|e| Error::Engine(e.to_string()))
}

/// Collapses an `adb_core::Error` into the wire's uniform `success=false`
/// envelope — the single channel every error kind above this crate
/// eventually lands on (§7).
fn fail(err: Error) -> Response {
    Response::failed(err.wire_status(), err.to_string())
}
