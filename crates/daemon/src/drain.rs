// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shutdown drain sequence (§4.4, §5): stop the Sync Worker, then flush
//! every remaining Handle so no dirty database is left un-synced when
//! the process exits.

use std::sync::Arc;

use adb_adapters::ObjectStore;
use adb_core::Clock;
use adb_store::{EngineFactory, HandleStore};
use tracing::info;

/// Aborts the Sync Worker's background task, then synchronously syncs
/// and evicts every Handle still held by the store. The worker's own
/// ticks and this drain never run concurrently: the abort happens
/// first, so any tick already in flight is allowed to finish (per
/// `sync_worker`'s doc comment) before this function starts removing
/// keys out from under it.
pub async fn run<O, F, C>(store: &Arc<HandleStore<O, F, C>>, sync_worker: tokio::task::JoinHandle<()>)
where
    O: ObjectStore + 'static,
    F: EngineFactory + 'static,
    C: Clock + 'static,
{
    sync_worker.abort();
    let _ = sync_worker.await;

    let handles = store.peek_all().await;
    info!(count = handles.len(), "draining handle store before shutdown");
    for ((tenant, name), _handle) in handles {
        store.remove(&tenant, &name).await;
    }
}

#[cfg(test)]
#[path = "drain_tests.rs"]
mod tests;
