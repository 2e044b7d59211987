//! BREWCAST — Coffee shop sales and commodity price forecasting
//!
//! Entry point. Loads configuration, initialises structured logging,
//! loads every model artifact (fatal on any failure) and serves the
//! dashboard until Ctrl+C.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use brewcast::config;
use brewcast::dashboard::{self, routes::DashboardState};
use brewcast::registry::ModelRegistry;

const BANNER: &str = r#"
 ____  ____  _______        ______    _    ____ _____
| __ )|  _ \| ____\ \      / / ___|  / \  / ___|_   _|
|  _ \| |_) |  _|  \ \ /\ / / |     / _ \ \___ \ | |
| |_) |  _ <| |___  \ V  V /| |___ / ___ \ ___) || |
|____/|_| \_\_____|  \_/\_/  \____/_/   \_\____/ |_|

  Coffee Shop Sales and Price Predicting
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let config_path =
        std::env::var("BREWCAST_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let cfg = config::AppConfig::load(&config_path)?;

    init_logging();

    println!("{BANNER}");
    info!(
        name = %cfg.app.name,
        config = %config_path,
        models_dir = %cfg.models.dir.display(),
        "BREWCAST starting up"
    );

    // A missing or corrupt artifact aborts startup; there is no
    // partial-registry mode.
    let registry = ModelRegistry::load(&cfg.models).context("Failed to load model registry")?;

    let state = Arc::new(DashboardState::new(registry, &cfg));
    dashboard::serve(state, &cfg.dashboard).await?;

    info!("BREWCAST shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("brewcast=info"));

    let json_logging = std::env::var("BREWCAST_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
