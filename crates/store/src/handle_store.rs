// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Handle Store (§4.2): a bounded, LRU-by-`last_accessed` cache of
//! open database handles, with the double-checked open path and
//! capacity-triggered eviction described there.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use adb_adapters::{Engine, EngineConfig, ObjectStore};
use adb_core::{id, Clock, Error, Result};
use tokio::sync::RwLock;

use crate::engine_factory::EngineFactory;
use crate::handle::Handle;

pub const DEFAULT_CAPACITY: usize = 100;

type HandleKey = (String, String);

#[derive(Debug, Clone)]
pub struct HandleStoreConfig {
    pub capacity: usize,
    pub scratch_dir: PathBuf,
    pub memory_limit: String,
    pub threads: u32,
    pub extensions: Vec<String>,
    /// `SET ...` statements applying the object store's S3-compatible
    /// endpoint and credentials (§4.3 step 5). Failures here are
    /// warnings, never open failures.
    pub remote_config_statements: Vec<String>,
}

impl HandleStoreConfig {
    pub fn new(scratch_dir: PathBuf) -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            scratch_dir,
            memory_limit: "512MB".to_string(),
            threads: 2,
            extensions: vec!["httpfs".to_string(), "parquet".to_string(), "json".to_string()],
            remote_config_statements: Vec::new(),
        }
    }
}

pub struct HandleStore<O, F, C> {
    object_store: Arc<O>,
    engine_factory: Arc<F>,
    clock: Arc<C>,
    config: HandleStoreConfig,
    inner: RwLock<HashMap<HandleKey, Arc<Handle>>>,
}

impl<O, F, C> HandleStore<O, F, C>
where
    O: ObjectStore + 'static,
    F: EngineFactory + 'static,
    C: Clock + 'static,
{
    pub fn new(object_store: Arc<O>, engine_factory: Arc<F>, clock: Arc<C>, config: HandleStoreConfig) -> Self {
        Self { object_store, engine_factory, clock, config, inner: RwLock::new(HashMap::new()) }
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// The object store backing this instance, for callers (database
    /// lifecycle handlers — §4.5 List/Delete/Backup/Restore) that need
    /// container-level operations the Handle abstraction doesn't expose.
    pub fn object_store(&self) -> Arc<O> {
        self.object_store.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Snapshot for background scans (§4.2): does not promote.
    pub async fn peek_all(&self) -> Vec<(HandleKey, Arc<Handle>)> {
        self.inner.read().await.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Returns the existing Handle if keyed, else opens one (§4.3).
    /// Double-checked under the store-level lock to prevent two
    /// concurrent misses both downloading and creating a Handle for
    /// the same key.
    pub async fn get_or_create(&self, tenant: &str, name: &str) -> Result<Arc<Handle>> {
        let key = Handle::key(tenant, name);
        let now = self.clock.epoch_secs();

        if let Some(handle) = self.inner.read().await.get(&key) {
            handle.touch_accessed(now).await;
            return Ok(handle.clone());
        }

        let mut guard = self.inner.write().await;
        if let Some(handle) = guard.get(&key) {
            handle.touch_accessed(now).await;
            return Ok(handle.clone());
        }

        if guard.len() >= self.config.capacity {
            if let Some(victim_key) = least_recently_accessed(&guard).await {
                if let Some(victim) = guard.remove(&victim_key) {
                    victim.evict(self.object_store.as_ref(), now).await;
                }
            }
        }

        let handle = Arc::new(self.open_handle(tenant, name, now).await?);
        guard.insert(key, handle.clone());
        Ok(handle)
    }

    /// Synchronous teardown (§4.2, §4.5 Delete): runs the eviction
    /// callback, then removes the key. Callers that delete the backing
    /// object must call this *before* deleting it, so an in-flight sync
    /// cannot resurrect the object afterward.
    pub async fn remove(&self, tenant: &str, name: &str) {
        let key = Handle::key(tenant, name);
        let removed = self.inner.write().await.remove(&key);
        if let Some(handle) = removed {
            handle.evict(self.object_store.as_ref(), self.clock.epoch_secs()).await;
        }
    }

    /// One Sync Worker tick (§4.4): snapshots keys without promoting,
    /// flushes handles dirty past `dirty_threshold_secs`, and schedules
    /// handles idle past `idle_threshold_secs` for removal. Removals
    /// run after the scan so the store is not mutated while iterating.
    pub async fn run_sync_tick(&self, dirty_threshold_secs: u64, idle_threshold_secs: u64) {
        let now = self.clock.epoch_secs();
        let snapshot = self.peek_all().await;

        let mut stale = Vec::new();
        for (key, handle) in &snapshot {
            handle.sync_if_stale(self.object_store.as_ref(), now, dirty_threshold_secs).await;
            if now.saturating_sub(handle.last_accessed().await) > idle_threshold_secs {
                stale.push(key.clone());
            }
        }

        for key in stale {
            let removed = self.inner.write().await.remove(&key);
            if let Some(handle) = removed {
                handle.evict(self.object_store.as_ref(), now).await;
            }
        }
    }

    async fn open_handle(&self, tenant: &str, name: &str, now: u64) -> Result<Handle> {
        let container = adb_core::TenantId::new(tenant).container_name();
        let object_key = format!("{name}.duckdb");

        if !self
            .object_store
            .bucket_exists(&container)
            .await
            .map_err(|e| Error::Internal(format!("bucket_exists failed: {e}")))?
        {
            self.object_store
                .create_bucket(&container)
                .await
                .map_err(|e| Error::Internal(format!("create_bucket failed: {e}")))?;
        }

        let local_path =
            self.config.scratch_dir.join(format!("{tenant}-{name}-{}.duckdb", id::object_key_suffix()));

        let existed = match self
            .object_store
            .stat_object(&container, &object_key)
            .await
            .map_err(|e| Error::Internal(format!("stat_object failed: {e}")))?
        {
            Some(_) => {
                let bytes = self
                    .object_store
                    .get_object(&container, &object_key)
                    .await
                    .map_err(|e| Error::Internal(format!("get_object failed: {e}")))?;
                tokio::fs::write(&local_path, &bytes)
                    .await
                    .map_err(|e| Error::Internal(format!("failed to write scratch file: {e}")))?;
                true
            }
            None => false,
        };

        let engine_config = EngineConfig {
            memory_limit: self.config.memory_limit.clone(),
            threads: self.config.threads,
            extensions: self.config.extensions.clone(),
        };
        let local_path_for_blocking = local_path.clone();
        let factory = self.engine_factory.clone();
        let engine: Arc<dyn Engine> = tokio::task::spawn_blocking(move || {
            factory.open(&local_path_for_blocking, &engine_config)
        })
        .await
        .map_err(|e| Error::Internal(format!("engine open task panicked: {e}")))?
        .map_err(|e| Error::Internal(format!("engine open failed: {e}")))?;

        if !self.config.remote_config_statements.is_empty() {
            let statements = self.config.remote_config_statements.clone();
            let engine_for_config = engine.clone();
            let result = tokio::task::spawn_blocking(move || engine_for_config.configure_remote(&statements)).await;
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!(error = %e, tenant, name, "remote configuration failed, continuing"),
                Err(e) => tracing::warn!(error = %e, tenant, name, "remote configuration task panicked, continuing"),
            }
        }

        // Step 6 (§4.3): this seed upload must succeed; on failure the
        // engine is closed before returning so a failed open never
        // leaks an open connection with no Handle to release it.
        if !existed {
            if let Err(err) = self.seed_object(&container, &object_key, &local_path).await {
                if let Err(close_err) = engine.close() {
                    tracing::warn!(error = %close_err, tenant, name, "engine close failed after failed seed upload");
                }
                return Err(err);
            }
        }

        Ok(Handle::new(
            tenant.to_string(),
            name.to_string(),
            container,
            object_key,
            local_path,
            engine,
            now,
        ))
    }

    /// Uploads the freshly created local file to seed `object_key`
    /// (§4.3 step 6).
    async fn seed_object(&self, container: &str, object_key: &str, local_path: &std::path::Path) -> Result<()> {
        let bytes = tokio::fs::read(local_path)
            .await
            .map_err(|e| Error::Internal(format!("failed to read freshly created scratch file: {e}")))?;
        self.object_store
            .put_object(container, object_key, &bytes)
            .await
            .map_err(|e| Error::Internal(format!("failed to seed object key: {e}")))
    }
}

async fn least_recently_accessed(map: &HashMap<HandleKey, Arc<Handle>>) -> Option<HandleKey> {
    let mut oldest: Option<(HandleKey, u64)> = None;
    for (key, handle) in map.iter() {
        let accessed = handle.last_accessed().await;
        if oldest.as_ref().map(|(_, a)| accessed < *a).unwrap_or(true) {
            oldest = Some((key.clone(), accessed));
        }
    }
    oldest.map(|(key, _)| key)
}

#[cfg(test)]
#[path = "handle_store_tests.rs"]
mod tests;
