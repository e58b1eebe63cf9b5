//! Cubby API entry point.
//!
//! Binary name: `cubby`
//!
//! Parses CLI arguments, loads settings from the environment, wires
//! the application state, then starts the REST API server.

mod http;
mod state;

use std::time::Duration;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cubby_infra::config::Settings;
use state::AppState;

/// How often expired sessions and transcript rows are swept.
const MAINTENANCE_INTERVAL: Duration = Duration::from_secs(3600);

/// A cloud-buddy backend that keeps kids' conversations safe.
#[derive(Parser)]
#[command(name = "cubby", version, about, long_about = None)]
struct Cli {
    /// Suppress all output except errors.
    #[arg(long, global = true)]
    quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(long, default_value = "8080")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "info,cubby=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let settings = Settings::from_env()?;
    let state = AppState::init(&settings).await?;

    spawn_maintenance(state.clone());

    match cli.command {
        Commands::Serve { port, host } => {
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!(%addr, dev_mode = settings.dev_mode, "cubby listening");

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            tracing::info!("server stopped");
        }
    }

    Ok(())
}

/// Periodic sweep of expired sessions and transcript rows.
///
/// Both also expire lazily (sessions on lookup, transcript rows on
/// write); the sweep bounds memory and disk for idle deployments.
fn spawn_maintenance(state: AppState) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(MAINTENANCE_INTERVAL);
        ticker.tick().await; // first tick fires immediately
        loop {
            ticker.tick().await;
            let now = Utc::now();
            let evicted = state.sessions.evict_expired(now);
            if evicted > 0 {
                tracing::info!(evicted, "swept expired sessions");
            }
            if let Err(err) = state.translog.purge_expired(now).await {
                tracing::warn!(error = %err, "transcript purge failed");
            }
        }
    });
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
