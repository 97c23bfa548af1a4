// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Handle Store and Sync Worker (§4.2, §4.4): the process-wide
//! cache of open tenant database handles and the background task that
//! keeps them durable without uploading on every mutating request.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod engine_factory;
pub mod handle;
pub mod handle_store;
pub mod sync_worker;

pub use engine_factory::{DuckDbEngineFactory, EngineFactory};
pub use handle::{Handle, HandleState};
pub use handle_store::{HandleStore, HandleStoreConfig, DEFAULT_CAPACITY};
pub use sync_worker::{SyncWorkerConfig, DEFAULT_DIRTY_THRESHOLD_SECS, DEFAULT_IDLE_THRESHOLD_SECS, DEFAULT_TICK_PERIOD};

#[cfg(any(test, feature = "test-support"))]
pub use engine_factory::FakeEngineFactory;
