// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! crosspost daemon (crosspostd)
//!
//! Background process that keeps stored platform credentials fresh: it
//! runs the refresh scheduler against the shared JSON store and drives
//! the external credential helper for unattended renewals.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;

use crate::config::Config;
use crosspost_adapters::CommandCredentialClient;
use crosspost_core::{SystemClock, UuidIdGen};
use crosspost_engine::{CredentialRegistry, RefreshScheduler, RefreshService, SchedulerConfig};
use crosspost_store::JsonStore;
use std::path::PathBuf;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let config_path = if args.len() > 1 {
        PathBuf::from(&args[1])
    } else {
        PathBuf::from("crosspostd.toml")
    };
    let config = Config::load(&config_path)?;

    let _log_guard = setup_logging(&config)?;
    info!(config = %config_path.display(), "starting crosspostd");

    let store = JsonStore::open(&config.data_dir)?;
    let clock = SystemClock;
    let ids = UuidIdGen;
    let registry = CredentialRegistry::new(store, clock.clone(), ids.clone());
    let credentials = CommandCredentialClient::new(
        config.credentials_helper.command.clone(),
        config.credentials_helper.args.clone(),
    );
    let service = RefreshService::new(
        registry.clone(),
        credentials,
        clock,
        ids,
        config.cookies_dir.clone(),
    );
    let scheduler = RefreshScheduler::new(
        registry,
        service,
        SchedulerConfig {
            check_interval: config.scheduler.check_interval,
            concurrency: config.scheduler.concurrency,
            error_backoff: config.scheduler.error_backoff,
        },
    );

    let (stop_tx, stop_rx) = watch::channel(false);
    let runner = tokio::spawn(async move { scheduler.run(stop_rx).await });

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        _ = sigint.recv() => info!("received SIGINT, shutting down"),
    }

    // The scheduler finishes any in-flight batch before returning
    let _ = stop_tx.send(true);
    runner.await?;
    info!("crosspostd stopped");
    Ok(())
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, std::io::Error> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    std::fs::create_dir_all(&config.log_dir)?;
    let file_appender = tracing_appender::rolling::never(&config.log_dir, "crosspostd.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
