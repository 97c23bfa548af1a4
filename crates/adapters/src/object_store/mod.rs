// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Object-store client contract (§6): blob GET/PUT/STAT/DELETE/COPY over
//! named containers, plus container existence/creation.

pub mod s3;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("object store io error: {0}")]
    Io(String),
    #[error("container {0} not found")]
    ContainerNotFound(String),
}

/// Connection details for the backing S3-compatible store (§6 Environment).
#[derive(Debug, Clone)]
pub struct ObjectStoreConfig {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub path_style: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub size: u64,
    pub e_tag: Option<String>,
}

/// Blob operations over named containers (§6). One tenant database maps
/// to one container (`TenantId::container_name`); object keys are
/// `<name>.duckdb` or `backups/<label>-<unix-seconds>.duckdb`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn bucket_exists(&self, container: &str) -> Result<bool, ObjectStoreError>;
    async fn create_bucket(&self, container: &str) -> Result<(), ObjectStoreError>;
    async fn stat_object(
        &self,
        container: &str,
        key: &str,
    ) -> Result<Option<ObjectMetadata>, ObjectStoreError>;
    async fn get_object(&self, container: &str, key: &str) -> Result<Vec<u8>, ObjectStoreError>;
    async fn put_object(
        &self,
        container: &str,
        key: &str,
        bytes: &[u8],
    ) -> Result<ObjectMetadata, ObjectStoreError>;
    async fn delete_object(&self, container: &str, key: &str) -> Result<(), ObjectStoreError>;
    async fn copy_object(
        &self,
        src_container: &str,
        src_key: &str,
        dst_container: &str,
        dst_key: &str,
    ) -> Result<(), ObjectStoreError>;
    /// Lists object keys in `container` starting with `prefix` (empty
    /// prefix lists everything). Backs `ListDatabases` (§4.5): not one
    /// of the six primitives named in §6, but required to enumerate a
    /// tenant's container — added as a natural extension of the same
    /// contract rather than a bespoke one-off (see DESIGN.md).
    async fn list_objects(&self, container: &str, prefix: &str) -> Result<Vec<String>, ObjectStoreError>;
    async fn health_check(&self) -> Result<(), ObjectStoreError>;
}
