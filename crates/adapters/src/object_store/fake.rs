// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory `ObjectStore` for tests (test-support feature).

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{ObjectMetadata, ObjectStore, ObjectStoreError};

#[derive(Default)]
pub struct FakeObjectStore {
    buckets: Mutex<HashMap<String, HashMap<String, Vec<u8>>>>,
}

impl FakeObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object without going through the trait, for test setup.
    pub fn seed(&self, container: &str, key: &str, bytes: Vec<u8>) {
        self.buckets.lock().entry(container.to_string()).or_default().insert(key.to_string(), bytes);
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn bucket_exists(&self, container: &str) -> Result<bool, ObjectStoreError> {
        Ok(self.buckets.lock().contains_key(container))
    }

    async fn create_bucket(&self, container: &str) -> Result<(), ObjectStoreError> {
        self.buckets.lock().entry(container.to_string()).or_default();
        Ok(())
    }

    async fn stat_object(
        &self,
        container: &str,
        key: &str,
    ) -> Result<Option<ObjectMetadata>, ObjectStoreError> {
        Ok(self
            .buckets
            .lock()
            .get(container)
            .and_then(|bucket| bucket.get(key))
            .map(|bytes| ObjectMetadata { size: bytes.len() as u64, e_tag: None }))
    }

    async fn get_object(&self, container: &str, key: &str) -> Result<Vec<u8>, ObjectStoreError> {
        self.buckets
            .lock()
            .get(container)
            .and_then(|bucket| bucket.get(key))
            .cloned()
            .ok_or_else(|| ObjectStoreError::ContainerNotFound(format!("{container}/{key}")))
    }

    async fn put_object(
        &self,
        container: &str,
        key: &str,
        bytes: &[u8],
    ) -> Result<ObjectMetadata, ObjectStoreError> {
        self.buckets
            .lock()
            .entry(container.to_string())
            .or_default()
            .insert(key.to_string(), bytes.to_vec());
        Ok(ObjectMetadata { size: bytes.len() as u64, e_tag: None })
    }

    async fn delete_object(&self, container: &str, key: &str) -> Result<(), ObjectStoreError> {
        if let Some(bucket) = self.buckets.lock().get_mut(container) {
            bucket.remove(key);
        }
        Ok(())
    }

    async fn copy_object(
        &self,
        src_container: &str,
        src_key: &str,
        dst_container: &str,
        dst_key: &str,
    ) -> Result<(), ObjectStoreError> {
        let bytes = self.get_object(src_container, src_key).await?;
        self.put_object(dst_container, dst_key, &bytes).await?;
        Ok(())
    }

    async fn list_objects(&self, container: &str, prefix: &str) -> Result<Vec<String>, ObjectStoreError> {
        Ok(self
            .buckets
            .lock()
            .get(container)
            .map(|bucket| bucket.keys().filter(|k| k.starts_with(prefix)).cloned().collect())
            .unwrap_or_default())
    }

    async fn health_check(&self) -> Result<(), ObjectStoreError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
