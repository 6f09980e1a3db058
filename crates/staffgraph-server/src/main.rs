//! CLI entry point for the staffgraph HTTP server.

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

use staffgraph_graph::{GraphClient, MemoryStore};
use staffgraph_server::build_router;
use staffgraph_server::config;
use staffgraph_server::http::SharedStore;

#[derive(Parser)]
#[command(name = "staffgraph-server")]
#[command(about = "HTTP API over the employee/department graph")]
struct Cli {
    /// Config file prefix (default: staffgraph).
    #[arg(short, long, default_value = "staffgraph")]
    config: String,

    /// Listen address, overriding `server.bind_addr`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Serve from an empty in-process graph instead of Neo4j.
    ///
    /// The API never creates MANAGES edges, so in this mode no employee
    /// manages a department: subordinates lookups return 404 and deletes
    /// never cascade.
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().init();

    let cli = Cli::parse();
    let service_config = config::load(&cli.config)?;
    let bind_addr = cli.bind.unwrap_or(service_config.server.bind_addr);

    let store: SharedStore = if cli.in_memory {
        tracing::warn!("Using in-memory store; data is lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        let graph = GraphClient::connect(&service_config.neo4j).await?;
        graph.ensure_schema().await?;
        Arc::new(graph)
    };

    let app = build_router(store);
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
