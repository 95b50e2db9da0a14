use std::{net::SocketAddr, sync::Arc};

use clap::Parser;
use color_eyre::{Result, eyre::Context};
use geogate::{OpenCageAdapter, SearchService, adapters::build_router, config, tracing_setup};

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Optional configuration file (TOML / YAML / JSON). Environment
    /// variables with the GEOGATE prefix override file values.
    #[clap(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() {
    // Supervisory boundary: an error that escapes the request pipeline's
    // recovery path leaves process state unverifiable, so log and exit.
    if let Err(report) = run().await {
        tracing::error!(error = ?report, "fatal error, terminating");
        eprintln!("Error: {report:?}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let cfg = config::load_config(args.config.as_deref()).context("Failed to load config")?;

    tracing_setup::init_tracing(cfg.mode)?;

    let geocoder =
        Arc::new(OpenCageAdapter::new(&cfg.geocoder).context("Failed to create geocoder")?);
    let service = Arc::new(SearchService::new(geocoder));
    let app = build_router(cfg.mode, service);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.listen_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    tracing::info!(%addr, mode = ?cfg.mode, "Geogate API gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Graceful shutdown completed");
    Ok(())
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
