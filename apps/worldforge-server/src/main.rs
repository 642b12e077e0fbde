//! HTTP entry point for worldforge.
//!
//! Run with: cargo run --bin worldforge-server -- --config worldforge.yaml
//!
//! The world document is autosaved on an interval and flushed once more when
//! the server shuts down (Ctrl-C or SIGTERM).

mod config;
mod error;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use worldforge_assets::TemplateStore;
use worldforge_persist::{Autosave, WorldStore};

use config::Config;
use state::AppState;

#[derive(Parser)]
#[command(name = "worldforge-server", about = "Serve the structure world over HTTP")]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind the server to
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Backing world document
    #[arg(long)]
    world: Option<PathBuf>,

    /// Directory of structure templates
    #[arg(long)]
    structures: Option<PathBuf>,

    /// Seconds between autosaves
    #[arg(long)]
    autosave_secs: Option<u64>,

    /// Create an empty world document if none exists
    #[arg(long)]
    create_if_missing: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(world) = &self.world {
            config.world_path = world.clone();
        }
        if let Some(structures) = &self.structures {
            config.structures_dir = structures.clone();
        }
        if let Some(secs) = self.autosave_secs {
            config.autosave_secs = secs;
        }
        config.create_if_missing |= self.create_if_missing;
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config = cli.load_config()?;
    tracing::debug!(?config, "configuration loaded");

    let store = Arc::new(WorldStore::new(&config.world_path));
    if config.create_if_missing {
        store.initialize()?;
    }
    let autosave = Autosave::start(store.clone(), config.autosave_interval())?;

    let state = Arc::new(AppState::new(
        store,
        TemplateStore::new(&config.structures_dir),
    ));
    let app = routes::app(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!("worldforge listening on http://{}", config.bind);
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // The final flush joins the autosave thread; keep it off the async workers.
    tokio::task::spawn_blocking(move || autosave.shutdown()).await?;
    served?;
    tracing::info!("worldforge stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
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
    tracing::info!("shutdown signal received");
}
