// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `adb`: a thin client for `adbd`, the multi-tenant analytics
//! database daemon. Frames `adb-wire::Request`s over the daemon's
//! Unix socket and prints `adb-wire::Response`s — an operational
//! convenience, not a spec'd surface (§D.3). Carries no
//! business logic of its own.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod commands;
mod exit_error;
mod output;

use clap::Parser;

use client::DaemonClient;
use commands::Command;
use exit_error::ExitError;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "adb", about = "Client for the multi-tenant analytics database daemon")]
struct Cli {
    /// Path to the daemon's Unix socket (defaults to `adb-daemon::env::socket_path()`).
    #[arg(long, global = true)]
    socket: Option<std::path::PathBuf>,

    /// Output format for machine consumption.
    #[arg(long, global = true, value_enum, default_value = "text")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let socket_path = cli.socket.unwrap_or_else(adb_daemon::env::socket_path);
    let client = DaemonClient::new(socket_path);

    if let Err(err) = commands::run(cli.command, &client, cli.output).await {
        report(err);
    }
}

fn report(err: ExitError) -> ! {
    eprintln!("error: {}", err.message);
    std::process::exit(err.code);
}
