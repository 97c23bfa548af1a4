// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Real `ObjectStore` over an S3-compatible endpoint.
//!
//! Bucket lifecycle (`bucket_exists`/`create_bucket`) goes through
//! `aws-sdk-s3`, which is the only client in this ecosystem that
//! exposes control-plane bucket operations. Everything else (get/put/
//! stat/delete/copy) goes through `object_store`'s `AmazonS3`, one
//! instance per container, cached by container name.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::config::Credentials;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use futures_util::TryStreamExt;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore as _, PutPayload};
use parking_lot::Mutex;

use super::{ObjectMetadata, ObjectStore, ObjectStoreConfig, ObjectStoreError};

pub struct S3ObjectStore {
    config: ObjectStoreConfig,
    control: aws_sdk_s3::Client,
    data: Mutex<HashMap<String, Arc<AmazonS3>>>,
}

impl S3ObjectStore {
    pub async fn new(config: ObjectStoreConfig) -> Result<Self, ObjectStoreError> {
        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "adb-config",
        );
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .endpoint_url(config.endpoint.clone())
            .region(aws_sdk_s3::config::Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;
        let control = aws_sdk_s3::Client::from_conf(
            aws_sdk_s3::config::Builder::from(&sdk_config)
                .force_path_style(config.path_style)
                .build(),
        );
        Ok(Self { config, control, data: Mutex::new(HashMap::new()) })
    }

    fn client_for(&self, container: &str) -> Result<Arc<AmazonS3>, ObjectStoreError> {
        if let Some(existing) = self.data.lock().get(container) {
            return Ok(existing.clone());
        }
        let built = AmazonS3Builder::new()
            .with_endpoint(self.config.endpoint.clone())
            .with_bucket_name(container)
            .with_access_key_id(self.config.access_key.clone())
            .with_secret_access_key(self.config.secret_key.clone())
            .with_region(self.config.region.clone())
            .with_virtual_hosted_style_request(!self.config.path_style)
            .with_allow_http(true)
            .build()
            .map_err(|e| ObjectStoreError::Io(e.to_string()))?;
        let built = Arc::new(built);
        self.data.lock().insert(container.to_string(), built.clone());
        Ok(built)
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn bucket_exists(&self, container: &str) -> Result<bool, ObjectStoreError> {
        match self.control.head_bucket().bucket(container).send().await {
            Ok(_) => Ok(true),
            Err(e) => {
                if e.as_service_error().map(|se| se.is_not_found()).unwrap_or(false) {
                    Ok(false)
                } else {
                    Err(ObjectStoreError::Io(e.to_string()))
                }
            }
        }
    }

    async fn create_bucket(&self, container: &str) -> Result<(), ObjectStoreError> {
        self.control
            .create_bucket()
            .bucket(container)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| ObjectStoreError::Io(e.to_string()))
    }

    async fn stat_object(
        &self,
        container: &str,
        key: &str,
    ) -> Result<Option<ObjectMetadata>, ObjectStoreError> {
        let client = self.client_for(container)?;
        match client.head(&StorePath::from(key)).await {
            Ok(meta) => Ok(Some(ObjectMetadata { size: meta.size as u64, e_tag: meta.e_tag })),
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(ObjectStoreError::Io(e.to_string())),
        }
    }

    async fn get_object(&self, container: &str, key: &str) -> Result<Vec<u8>, ObjectStoreError> {
        let client = self.client_for(container)?;
        let result = client
            .get(&StorePath::from(key))
            .await
            .map_err(|e| ObjectStoreError::Io(e.to_string()))?;
        let bytes = result.bytes().await.map_err(|e| ObjectStoreError::Io(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn put_object(
        &self,
        container: &str,
        key: &str,
        bytes: &[u8],
    ) -> Result<ObjectMetadata, ObjectStoreError> {
        let client = self.client_for(container)?;
        let result = client
            .put(&StorePath::from(key), PutPayload::from(bytes.to_vec()))
            .await
            .map_err(|e| ObjectStoreError::Io(e.to_string()))?;
        Ok(ObjectMetadata { size: bytes.len() as u64, e_tag: result.e_tag })
    }

    async fn delete_object(&self, container: &str, key: &str) -> Result<(), ObjectStoreError> {
        let client = self.client_for(container)?;
        match client.delete(&StorePath::from(key)).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(ObjectStoreError::Io(e.to_string())),
        }
    }

    async fn copy_object(
        &self,
        src_container: &str,
        src_key: &str,
        dst_container: &str,
        dst_key: &str,
    ) -> Result<(), ObjectStoreError> {
        if src_container == dst_container {
            let client = self.client_for(src_container)?;
            client
                .copy(&StorePath::from(src_key), &StorePath::from(dst_key))
                .await
                .map_err(|e| ObjectStoreError::Io(e.to_string()))
        } else {
            // object_store's `copy` is intra-store; cross-container
            // copy falls back to a download/upload pair.
            let bytes = self.get_object(src_container, src_key).await?;
            self.put_object(dst_container, dst_key, &bytes).await?;
            Ok(())
        }
    }

    async fn list_objects(&self, container: &str, prefix: &str) -> Result<Vec<String>, ObjectStoreError> {
        let client = self.client_for(container)?;
        let prefix_path = if prefix.is_empty() { None } else { Some(StorePath::from(prefix)) };
        let entries: Vec<_> = client
            .list(prefix_path.as_ref())
            .map_ok(|meta| meta.location.to_string())
            .try_collect()
            .await
            .map_err(|e| ObjectStoreError::Io(e.to_string()))?;
        Ok(entries)
    }

    async fn health_check(&self) -> Result<(), ObjectStoreError> {
        self.control
            .list_buckets()
            .max_buckets(1)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| ObjectStoreError::Io(e.to_string()))
    }
}
