// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Indirection over `DuckDbEngine::open` so the Handle Store can be
//! exercised against a `FakeEngine` in tests without touching disk.

use std::path::Path;
use std::sync::Arc;

use adb_adapters::{DuckDbEngine, Engine, EngineConfig, EngineError};

pub trait EngineFactory: Send + Sync {
    fn open(&self, path: &Path, config: &EngineConfig) -> Result<Arc<dyn Engine>, EngineError>;
}

pub struct DuckDbEngineFactory;

impl EngineFactory for DuckDbEngineFactory {
    fn open(&self, path: &Path, config: &EngineConfig) -> Result<Arc<dyn Engine>, EngineError> {
        Ok(Arc::new(DuckDbEngine::open(path, config)?))
    }
}

#[cfg(any(test, feature = "test-support"))]
pub struct FakeEngineFactory;

#[cfg(any(test, feature = "test-support"))]
impl EngineFactory for FakeEngineFactory {
    fn open(&self, _path: &Path, _config: &EngineConfig) -> Result<Arc<dyn Engine>, EngineError> {
        Ok(Arc::new(adb_adapters::FakeEngine::new()))
    }
}
