//! jobtrack API Server
//!
//! Run with: cargo run --bin jobtrack -- [--config path/to/config.toml]
//!
//! Configuration comes from the given TOML file, or the first of
//! `~/.config/jobtrack/config.toml`, `/etc/jobtrack/config.toml` and
//! `./config.toml`, with `JOBTRACK_*` environment overrides on top.
//! `RUST_LOG` takes precedence over the configured log level.

use anyhow::Context;
use clap::Parser;
use jobtrack::api::{serve, AppState};
use jobtrack::auth::AuthService;
use jobtrack::config::{Config, LoggingConfig};
use jobtrack::store::JobStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "jobtrack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Job application tracker API server")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config_path = args.config.or_else(Config::find_default_path);
    let config = match &config_path {
        Some(path) => Config::load_with_env(path)?,
        None => Config::from_env(),
    };

    init_tracing(&config.logging);

    tracing::info!("Starting jobtrack API server v{}", env!("CARGO_PKG_VERSION"));
    match &config_path {
        Some(path) => tracing::info!("Loaded config from {}", path.display()),
        None => tracing::info!("Using default config with environment overrides"),
    }

    let store = Arc::new(
        JobStore::open(&config.store.data_path())
            .with_context(|| format!("opening store in {}", config.store.data_path().display()))?,
    );

    match store.purge_expired_sessions().await {
        Ok(0) => {}
        Ok(purged) => tracing::info!(purged, "Removed expired sessions"),
        Err(e) => tracing::warn!(error = %e, "Failed to purge expired sessions"),
    }

    let auth = AuthService::new(Arc::clone(&store), config.auth.session_ttl());
    let state = AppState::new(store, auth, config.api.clone());

    serve(state, &config.api).await?;

    tracing::info!("jobtrack API server stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("jobtrack={},tower_http=info", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
