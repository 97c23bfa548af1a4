// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `adbd`: the multi-tenant analytics database daemon (§4, §6).

use std::sync::Arc;

use adb_adapters::S3ObjectStore;
use adb_core::SystemClock;
use adb_daemon::{env, ListenCtx, Listener};
use adb_engine::Handlers;
use adb_store::{sync_worker, DuckDbEngineFactory, HandleStore, SyncWorkerConfig};
use tokio::net::{TcpListener, UnixListener};
use tokio::sync::Notify;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let state_dir = env::state_dir();
    std::fs::create_dir_all(&state_dir)?;
    std::fs::create_dir_all(env::scratch_dir())?;

    let socket_path = env::socket_path();
    if socket_path.exists() {
        std::fs::remove_file(&socket_path)?;
    }

    let object_store_config = env::object_store_config();
    let object_store = Arc::new(S3ObjectStore::new(object_store_config.clone()).await?);
    let engine_factory = Arc::new(DuckDbEngineFactory);
    let clock = Arc::new(SystemClock);
    let store = Arc::new(HandleStore::new(
        object_store,
        engine_factory,
        clock.clone(),
        env::handle_store_config(&object_store_config),
    ));

    let sync_worker_handle = sync_worker::spawn(
        store.clone(),
        SyncWorkerConfig {
            tick_period: std::time::Duration::from_secs(env::sync_interval_secs()),
            dirty_threshold_secs: env::dirty_threshold_secs(),
            idle_threshold_secs: env::idle_timeout_secs(),
        },
    );

    let handlers = Arc::new(Handlers::new(store.clone(), clock));
    let shutdown = Arc::new(Notify::new());
    let ctx = Arc::new(ListenCtx { handlers, auth_token: env::auth_token(), shutdown: shutdown.clone() });

    let unix = UnixListener::bind(&socket_path)?;
    tracing::info!(socket = %socket_path.display(), "listening on unix socket");

    let listener = match env::tcp_port() {
        Some(port) => {
            let tcp = TcpListener::bind(("0.0.0.0", port)).await?;
            tracing::info!(port, "listening on tcp");
            Listener::with_tcp(unix, tcp, ctx)
        }
        None => Listener::new(unix, ctx),
    };

    let accept_loop = tokio::spawn(listener.run());

    tokio::select! {
        _ = shutdown.notified() => {
            tracing::info!("shutdown requested");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received ctrl-c");
        }
    }

    accept_loop.abort();
    adb_daemon::drain::run(&store, sync_worker_handle).await;
    let _ = std::fs::remove_file(&socket_path);

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
