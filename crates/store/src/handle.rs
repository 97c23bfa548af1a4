// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A `Handle` binds one tenant database to a running engine over a
//! local scratch file (§4.2).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use adb_adapters::{Engine, ObjectStore};
use tokio::sync::Mutex;

const EVICTION_UPLOAD_DEADLINE: Duration = Duration::from_secs(30);

/// Mutable bookkeeping guarded by the handle's own mutex (§4.2): any
/// reader of these fields, and any engine call that mutates the file,
/// holds this lock for the duration of the operation.
pub struct HandleState {
    pub last_accessed: u64,
    pub last_synced: u64,
    pub modified: bool,
}

pub struct Handle {
    pub tenant: String,
    pub name: String,
    pub container: String,
    pub object_key: String,
    pub local_path: PathBuf,
    pub engine: Arc<dyn Engine>,
    state: Mutex<HandleState>,
}

impl Handle {
    pub fn new(
        tenant: String,
        name: String,
        container: String,
        object_key: String,
        local_path: PathBuf,
        engine: Arc<dyn Engine>,
        now: u64,
    ) -> Self {
        Self {
            tenant,
            name,
            container,
            object_key,
            local_path,
            engine,
            state: Mutex::new(HandleState { last_accessed: now, last_synced: now, modified: false }),
        }
    }

    pub fn key(tenant: &str, name: &str) -> (String, String) {
        (tenant.to_string(), name.to_string())
    }

    pub async fn touch_accessed(&self, now: u64) {
        self.state.lock().await.last_accessed = now;
    }

    pub async fn mark_modified(&self) {
        self.state.lock().await.modified = true;
    }

    pub async fn last_accessed(&self) -> u64 {
        self.state.lock().await.last_accessed
    }

    pub async fn is_modified(&self) -> bool {
        self.state.lock().await.modified
    }

    pub async fn last_synced(&self) -> u64 {
        self.state.lock().await.last_synced
    }

    /// Locks state for the duration of `f`. Used directly by tests and
    /// by callers that only need to inspect or patch bookkeeping
    /// without touching the engine or the object store.
    pub async fn with_state_locked<T>(&self, f: impl FnOnce(&mut HandleState) -> T) -> T {
        let mut guard = self.state.lock().await;
        f(&mut guard)
    }

    /// Acquires the state lock for the duration of a blocking engine
    /// call (spec.md §5, §4.2): holding it for the full call serializes
    /// the call against `evict`/`remove`, so a handler mid-query or
    /// mid-statement always finishes before an eviction can close the
    /// engine and delete the scratch file out from under it.
    pub async fn lock_state(&self) -> tokio::sync::MutexGuard<'_, HandleState> {
        self.state.lock().await
    }

    /// Sync Worker normal-tick path (§4.4): releases the mutex before
    /// uploading and reacquires it to clear the dirty flag, so a slow
    /// upload does not block readers of `last_accessed`/`modified` in
    /// the meantime. Returns whether an upload was attempted.
    pub async fn sync_if_stale(
        &self,
        object_store: &dyn ObjectStore,
        now: u64,
        dirty_threshold_secs: u64,
    ) -> bool {
        let should_upload = {
            let guard = self.state.lock().await;
            guard.modified && now.saturating_sub(guard.last_synced) > dirty_threshold_secs
        };
        if !should_upload {
            return false;
        }
        let bytes = match tokio::fs::read(&self.local_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, tenant = %self.tenant, name = %self.name, "failed to read local file for sync upload");
                return true;
            }
        };
        match object_store.put_object(&self.container, &self.object_key, &bytes).await {
            Ok(_) => {
                let mut guard = self.state.lock().await;
                guard.modified = false;
                guard.last_synced = now;
            }
            Err(e) => {
                tracing::warn!(error = %e, tenant = %self.tenant, name = %self.name, "sync upload failed, will retry next tick");
            }
        }
        true
    }

    /// Backup/explicit-sync path (§4.4 exception, §4.5 Backup): syncs
    /// unconditionally on staleness (only the dirty flag gates it), and
    /// propagates failures to the caller instead of logging and
    /// continuing — a failed backup must be reported, not swallowed
    /// (§4.7).
    pub async fn force_sync(&self, object_store: &dyn ObjectStore, now: u64) -> Result<(), String> {
        let modified = self.state.lock().await.modified;
        if !modified {
            return Ok(());
        }
        let bytes = tokio::fs::read(&self.local_path)
            .await
            .map_err(|e| format!("failed to read local file for sync: {e}"))?;
        object_store
            .put_object(&self.container, &self.object_key, &bytes)
            .await
            .map_err(|e| format!("sync upload failed: {e}"))?;
        let mut guard = self.state.lock().await;
        guard.modified = false;
        guard.last_synced = now;
        Ok(())
    }

    /// Eviction callback (§4.2): holds the mutex across the upload
    /// attempt, then tears the handle down unconditionally. Errors are
    /// logged and never prevent removal.
    pub async fn evict(&self, object_store: &dyn ObjectStore, now: u64) {
        let mut guard = self.state.lock().await;
        if guard.modified {
            match tokio::fs::read(&self.local_path).await {
                Ok(bytes) => {
                    let upload = object_store.put_object(&self.container, &self.object_key, &bytes);
                    match tokio::time::timeout(EVICTION_UPLOAD_DEADLINE, upload).await {
                        Ok(Ok(_)) => {
                            guard.modified = false;
                            guard.last_synced = now;
                        }
                        Ok(Err(e)) => {
                            tracing::warn!(error = %e, tenant = %self.tenant, name = %self.name, "eviction upload failed, local changes are lost");
                        }
                        Err(_) => {
                            tracing::warn!(tenant = %self.tenant, name = %self.name, "eviction upload timed out, local changes are lost");
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, tenant = %self.tenant, name = %self.name, "failed to read local file for eviction upload");
                }
            }
        }
        // Held across close()/remove_file (spec.md:189): a handler's
        // in-flight `run_blocking` call holds this same lock for its
        // whole duration, so the engine is never closed nor the scratch
        // file deleted while a call is still running against it.
        if let Err(e) = self.engine.close() {
            tracing::warn!(error = %e, tenant = %self.tenant, name = %self.name, "engine close failed during eviction");
        }
        if let Err(e) = tokio::fs::remove_file(&self.local_path).await {
            tracing::warn!(error = %e, path = %self.local_path.display(), "failed to delete scratch file during eviction");
        }
        drop(guard);
    }
}

#[cfg(test)]
#[path = "handle_tests.rs"]
mod tests;
