// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Sync Worker (§4.4): a single long-running task on a 5-minute
//! tick. Normal-operation durability runs entirely through this path —
//! handlers only mark handles dirty, they never upload inline.

use std::sync::Arc;
use std::time::Duration;

use adb_adapters::ObjectStore;
use adb_core::Clock;

use crate::engine_factory::EngineFactory;
use crate::handle_store::HandleStore;

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_DIRTY_THRESHOLD_SECS: u64 = 2 * 60;
pub const DEFAULT_IDLE_THRESHOLD_SECS: u64 = 30 * 60;

#[derive(Debug, Clone)]
pub struct SyncWorkerConfig {
    pub tick_period: Duration,
    pub dirty_threshold_secs: u64,
    pub idle_threshold_secs: u64,
}

impl Default for SyncWorkerConfig {
    fn default() -> Self {
        Self {
            tick_period: DEFAULT_TICK_PERIOD,
            dirty_threshold_secs: DEFAULT_DIRTY_THRESHOLD_SECS,
            idle_threshold_secs: DEFAULT_IDLE_THRESHOLD_SECS,
        }
    }
}

/// Spawns the worker loop. The returned handle is aborted on daemon
/// shutdown; in-flight ticks are allowed to finish as part of the
/// drain (handled by the caller in `adb-daemon`).
pub fn spawn<O, F, C>(store: Arc<HandleStore<O, F, C>>, config: SyncWorkerConfig) -> tokio::task::JoinHandle<()>
where
    O: ObjectStore + 'static,
    F: EngineFactory + 'static,
    C: Clock + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(config.tick_period);
        loop {
            interval.tick().await;
            store.run_sync_tick(config.dirty_threshold_secs, config.idle_threshold_secs).await;
        }
    })
}

#[cfg(test)]
#[path = "sync_worker_tests.rs"]
mod tests;
