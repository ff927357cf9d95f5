//! `proxyq` - inspect and operate a shared proxy queue from the shell.
//!
//! Configuration comes from `PROXYQ_*` environment variables (a `.env` file
//! is honoured) or a `config.toml`/`proxyq.toml` file.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod args;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use proxyq_core::{ProxyPool, QueueError, RemoteQueue};
use proxyq_domain::{BlockMode, ProxyEndpoint};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::args::Command;

/// Exit status for an empty, full or timed-out queue.
const EXIT_UNAVAILABLE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(_) => tracing::debug!("no .env file found"),
    }

    let command = match args::parse(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("proxyq: {e:#}\n");
            print_help();
            return ExitCode::FAILURE;
        }
    };

    if command == Command::Help {
        print_help();
        return ExitCode::SUCCESS;
    }

    match run(command).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "command failed");
            eprintln!("proxyq: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> anyhow::Result<ExitCode> {
    let config = proxyq_infra::config::load().context("failed to load configuration")?;
    let store = proxyq_infra::open(&config.store)
        .await
        .with_context(|| format!("failed to open store {}", config.store.url))?;
    let queue = Arc::new(RemoteQueue::from_config(store, &config.queue)?);
    let pool = ProxyPool::new(Arc::clone(&queue), &config.pool, &config.acquire)?;

    match command {
        Command::Seed { proxies } => seed(&pool, &proxies).await,
        Command::Stats => stats(&queue).await,
        Command::Acquire { mode, standby } => {
            acquire(&pool, mode.unwrap_or_else(|| pool.acquire_mode()), standby).await
        }
        Command::Release { proxy, mode } => {
            outcome(pool.release(&proxy, mode).await.map(|()| println!("released {proxy}")))
        }
        Command::Drain => drain(&queue).await,
        Command::Help => {
            print_help();
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn seed(pool: &ProxyPool, proxies: &[ProxyEndpoint]) -> anyhow::Result<ExitCode> {
    let mut seeded = 0usize;
    for proxy in proxies {
        match pool.release(proxy, BlockMode::NonBlocking).await {
            Ok(()) => seeded += 1,
            Err(QueueError::Full { capacity }) => {
                eprintln!("queue is full ({capacity}); seeded {seeded} of {}", proxies.len());
                return Ok(ExitCode::from(EXIT_UNAVAILABLE));
            }
            Err(e) => return Err(e.into()),
        }
    }
    println!("seeded {seeded} proxies");
    Ok(ExitCode::SUCCESS)
}

async fn stats(queue: &RemoteQueue) -> anyhow::Result<ExitCode> {
    let report = json!({
        "name": queue.name().as_str(),
        "size": queue.size().await?,
        "capacity": queue.capacity().limit(),
        "ordering": queue.ordering().to_string(),
        "is_full": queue.is_full().await?,
        "metrics": queue.metrics().snapshot(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(ExitCode::SUCCESS)
}

async fn acquire(pool: &ProxyPool, mode: BlockMode, standby: bool) -> anyhow::Result<ExitCode> {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let acquired = match pool.acquire_cancellable(mode, &cancel).await {
        Err(QueueError::Empty | QueueError::Timeout { .. }) if standby => {
            pool.acquire_or_standby(BlockMode::NonBlocking).await
        }
        other => other,
    };

    outcome(acquired.map(|proxy| {
        let report = json!({
            "proxy": proxy.address(),
            "url": proxy.proxy_url(),
            "authorization": proxy.authorization_header(),
            "retry_count": proxy.retry_count,
        });
        println!("{report}");
    }))
}

async fn drain(queue: &RemoteQueue) -> anyhow::Result<ExitCode> {
    let mut drained = 0u64;
    loop {
        match queue.get(BlockMode::NonBlocking).await {
            Ok(_) => drained += 1,
            Err(QueueError::Empty) => break,
            Err(e) => return Err(e.into()),
        }
    }
    println!("drained {drained} items");
    Ok(ExitCode::SUCCESS)
}

/// Queue conditions a caller can retry map to [`EXIT_UNAVAILABLE`].
fn outcome(result: Result<(), QueueError>) -> anyhow::Result<ExitCode> {
    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e @ (QueueError::Empty | QueueError::Full { .. } | QueueError::Timeout { .. })) => {
            eprintln!("proxyq: {e}");
            Ok(ExitCode::from(EXIT_UNAVAILABLE))
        }
        Err(QueueError::Cancelled { .. }) => {
            eprintln!("proxyq: interrupted");
            Ok(ExitCode::from(130))
        }
        Err(e) => Err(e.into()),
    }
}

fn print_help() {
    println!("proxyq - shared proxy queue");
    println!();
    println!("Usage: proxyq <command> [options]");
    println!();
    println!("Commands:");
    println!("  seed <proxy>...                  Push proxies without blocking");
    println!("  stats                            Print queue size, bound and counters as JSON");
    println!("  acquire [--block] [--timeout S] [--standby]");
    println!("                                   Take one proxy (falls back to standby with --standby)");
    println!("  release <proxy> [--block] [--timeout S]");
    println!("                                   Return one proxy");
    println!("  drain                            Remove every queued item");
    println!("  help                             Show this help message");
    println!();
    println!("Proxies are written host:port or host:port:user:pass.");
    println!("Exit status 2 means the queue was empty, full or timed out.");
}
