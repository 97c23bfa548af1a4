// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapters over the two external dependencies named in §6: an
//! S3-compatible object store and an embedded analytics engine.
//!
//! Everything above this crate talks to the `ObjectStore` and `Engine`
//! traits only; the real implementations here (`S3ObjectStore`,
//! `DuckDbEngine`) are the only code in the workspace that knows about
//! `object_store` or `duckdb`.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod engine;
pub mod object_store;

pub use engine::{duckdb::DuckDbEngine, Engine, EngineConfig, EngineError, QueryResult, TableInfo};
pub use object_store::{s3::S3ObjectStore, ObjectMetadata, ObjectStore, ObjectStoreConfig, ObjectStoreError};

#[cfg(any(test, feature = "test-support"))]
pub use engine::fake::FakeEngine;
#[cfg(any(test, feature = "test-support"))]
pub use object_store::fake::FakeObjectStore;
