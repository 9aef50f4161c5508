//! # Event Stream Server
//!
//! Rust web service pushing typed real-time events to browsers over
//! Server-Sent Events. One long-lived HTTP response per client carries a
//! sequence of timestamped, typed frames produced on a server-controlled
//! cadence.
//!
//! ## Features
//!
//! - **Five stream kinds** sharing one transport: periodic ticker, log
//!   replay, progress simulation, multiplexed heterogeneous events and
//!   chat-style incremental text
//! - **Per-connection sessions** with cooperative cancellation: a vanished
//!   client stops event production within one pacing interval
//! - **Hand-built wire codec** for the text/event-stream frame grammar
//! - **Prometheus metrics** for session and event counts
//! - **TOML configuration** for per-stream cadence and sizing
//!
//! ## Architecture
//!
//! - **Codec**: encodes typed frames into the wire format
//! - **Generators**: one per stream kind, producing events plus pacing
//! - **Session**: drives one generator for one connection
//! - **Web layer**: Axum router mapping `/stream/*` paths to generators

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod codec;
mod config;
mod error;
mod generators;
mod metrics;
mod models;
mod session;
mod web;

use config::AppConfig;
use metrics::Metrics;
use web::WebServer;

/// Command line arguments for the application
#[derive(Parser)]
#[command(
    name = "event-stream-server",
    version = env!("CARGO_PKG_VERSION"),
    about = "Real-time Server-Sent Events streaming server",
    long_about = "Streams typed real-time events to clients over long-lived HTTP responses, with ticker, log replay, progress, multiplexed and chat-style demo streams"
)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable JSON logging format
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::from_default_env().add_directive(
            if args.debug {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            },
        ),
    );

    if args.json_logs {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer()).init();
    }

    info!("Starting Event Stream Server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration; a missing file means defaults
    let config = if args.config.exists() {
        let config = AppConfig::from_file(&args.config)?;
        info!("Configuration loaded from: {}", args.config.display());
        config
    } else {
        info!(
            "Configuration file '{}' not found, using defaults",
            args.config.display()
        );
        AppConfig::default()
    };

    config.validate()?;

    let metrics = Arc::new(Metrics::new());
    let server = WebServer::new(config, metrics);

    tokio::select! {
        result = server.start() => {
            result?;
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("Event Stream Server shutdown complete");
    Ok(())
}
