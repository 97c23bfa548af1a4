// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate
//! (§B Configuration): no config-file parser, environment variables
//! only.

use std::path::PathBuf;

use adb_adapters::ObjectStoreConfig;
use adb_store::HandleStoreConfig;

/// `ADB_STATE_DIR` > `XDG_STATE_HOME/adb` > `~/.local/state/adb`.
pub fn state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("ADB_STATE_DIR") {
        return PathBuf::from(dir);
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join("adb");
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".local/state/adb")
}

/// `ADB_SOCKET_PATH`, defaulting to `<state_dir>/adbd.sock`.
pub fn socket_path() -> PathBuf {
    std::env::var("ADB_SOCKET_PATH").map(PathBuf::from).unwrap_or_else(|_| state_dir().join("adbd.sock"))
}

/// TCP port for remote connections. When set, the daemon listens on
/// this port in addition to the Unix socket.
pub fn tcp_port() -> Option<u16> {
    std::env::var("ADB_TCP_PORT").ok().and_then(|s| s.parse::<u16>().ok())
}

/// Auth token for TCP connections, validated in the Hello handshake.
pub fn auth_token() -> Option<String> {
    std::env::var("ADB_AUTH_TOKEN").ok().filter(|s| !s.is_empty())
}

/// `ADB_SCRATCH_DIR`, defaulting to a process-writable path under the
/// system temp root (§6 Environment).
pub fn scratch_dir() -> PathBuf {
    std::env::var("ADB_SCRATCH_DIR").map(PathBuf::from).unwrap_or_else(|_| std::env::temp_dir().join("adb-scratch"))
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name).ok().and_then(|s| s.parse::<u64>().ok()).unwrap_or(default)
}

/// Sync Worker tick period in seconds (`ADB_SYNC_INTERVAL_SECS`,
/// default 5 minutes per §4.4).
pub fn sync_interval_secs() -> u64 {
    env_u64("ADB_SYNC_INTERVAL_SECS", adb_store::DEFAULT_TICK_PERIOD.as_secs())
}

/// Idle-handle removal threshold in seconds (`ADB_IDLE_TIMEOUT_SECS`,
/// default 30 minutes per §4.4).
pub fn idle_timeout_secs() -> u64 {
    env_u64("ADB_IDLE_TIMEOUT_SECS", adb_store::DEFAULT_IDLE_THRESHOLD_SECS)
}

/// Dirty-handle flush threshold in seconds (`ADB_DIRTY_THRESHOLD_SECS`,
/// default 2 minutes per §4.4).
pub fn dirty_threshold_secs() -> u64 {
    env_u64("ADB_DIRTY_THRESHOLD_SECS", adb_store::DEFAULT_DIRTY_THRESHOLD_SECS)
}

/// Builds the `ObjectStoreConfig` from `ADB_OBJECT_STORE_ENDPOINT`/
/// `_ACCESS_KEY`/`_SECRET_KEY` (§6 Environment), plus a region and
/// path-style toggle that the S3-compatible client needs but §6
/// leaves unnamed (documented in DESIGN.md).
pub fn object_store_config() -> ObjectStoreConfig {
    ObjectStoreConfig {
        endpoint: std::env::var("ADB_OBJECT_STORE_ENDPOINT").unwrap_or_else(|_| "http://localhost:9000".to_string()),
        access_key: std::env::var("ADB_OBJECT_STORE_ACCESS_KEY").unwrap_or_default(),
        secret_key: std::env::var("ADB_OBJECT_STORE_SECRET_KEY").unwrap_or_default(),
        region: std::env::var("ADB_OBJECT_STORE_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
        path_style: std::env::var("ADB_OBJECT_STORE_PATH_STYLE").map(|v| v != "0").unwrap_or(true),
    }
}

/// `HandleStoreConfig` with the fixed capacity-100 cache from §3/§4.2,
/// the memory/thread/extension defaults from §4.3 step 4, and the
/// `SET` statements derived from `object_store` that configure each
/// opened engine's httpfs extension against the object store (§4.3
/// step 5).
pub fn handle_store_config(object_store: &ObjectStoreConfig) -> HandleStoreConfig {
    let mut config = HandleStoreConfig::new(scratch_dir());
    config.remote_config_statements = s3_config_statements(object_store);
    config
}

/// Translates an `ObjectStoreConfig` into the `SET` statements DuckDB's
/// `httpfs` extension expects (endpoint host without scheme, a
/// separate SSL toggle, credentials, region, and URL style).
fn s3_config_statements(config: &ObjectStoreConfig) -> Vec<String> {
    let use_ssl = config.endpoint.starts_with("https://");
    let host = config
        .endpoint
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    vec![
        format!("SET s3_endpoint='{host}'"),
        format!("SET s3_access_key_id='{}'", config.access_key),
        format!("SET s3_secret_access_key='{}'", config.secret_key),
        format!("SET s3_region='{}'", config.region),
        format!("SET s3_use_ssl={use_ssl}"),
        format!("SET s3_url_style='{}'", if config.path_style { "path" } else { "vhost" }),
    ]
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
