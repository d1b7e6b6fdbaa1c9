//! Todo gateway (v1)
//!
//! An HTTP gateway in front of a remote todo service. Every outbound call
//! goes through a per-target circuit breaker so a failing upstream is shed
//! quickly instead of tying up request handlers.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌───────────────────────────────────────────────────┐
//!                     │                   TODO GATEWAY                    │
//!                     │                                                   │
//!  Client Request     │  ┌─────────┐   ┌──────────┐   ┌───────────────┐  │
//!  ───────────────────┼─▶│  http   │──▶│   todo   │──▶│  resilience   │  │
//!                     │  │ router  │   │ service  │   │ breaker/retry │  │
//!                     │  └─────────┘   └──────────┘   └───────┬───────┘  │
//!                     │                                       │          │
//!                     │                                       ▼          │
//!  Client Response    │  ┌─────────┐                  ┌───────────────┐  │
//!  ◀──────────────────┼──│  error  │◀─────────────────│   upstream    │◀─┼── Todo
//!                     │  │ mapping │                  │  http client  │  │   Service
//!                     │  └─────────┘                  └───────────────┘  │
//!                     │                                                   │
//!                     │  ┌─────────────────────────────────────────────┐ │
//!                     │  │ config · security · observability · lifecycle│ │
//!                     │  └─────────────────────────────────────────────┘ │
//!                     └───────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use todo_gateway::config::load_config;
use todo_gateway::lifecycle::{signals, Shutdown};
use todo_gateway::observability::init_logging;
use todo_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "todo-gateway")]
#[command(about = "HTTP gateway for the todo service with per-target circuit breakers", long_about = None)]
struct Args {
    /// Optional TOML config file. Environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    init_logging(&config.observability.log_level)?;

    tracing::info!("todo-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        api = %config.api_base_path(),
        failure_threshold = config.circuit_breaker.failure_threshold,
        success_threshold = config.circuit_breaker.success_threshold,
        open_duration_ms = config.circuit_breaker.open_duration_ms,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(signals::wait_for_signal(shutdown.clone()));

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
