//! FPL League Tracker
//!
//! Entry point. Loads configuration, initialises structured logging,
//! opens the API cache and serves the league dashboard with graceful
//! shutdown.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use fpl_tracker::api::{CachedFplClient, FplApi, FplClient};
use fpl_tracker::config::AppConfig;
use fpl_tracker::dashboard::{self, DashboardState};
use fpl_tracker::engine::LeagueService;
use fpl_tracker::storage::CacheStore;

const BANNER: &str = r#"
  _____ ____  _       _____               _
 |  ___|  _ \| |     |_   _| __ __ _  ___| | _____ _ __
 | |_  | |_) | |       | || '__/ _` |/ __| |/ / _ \ '__|
 |  _| |  __/| |___    | || | | (_| | (__|   <  __/ |
 |_|   |_|   |_____|   |_||_|  \__,_|\___|_|\_\___|_|

  Mini-league standings, winners and captain regret
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    let cfg = AppConfig::load_or_default("config.toml")?;

    println!("{BANNER}");
    info!(
        league_id = cfg.league_id(),
        manager_id = ?cfg.league.manager_id,
        api = %cfg.api.base_url,
        cache_enabled = cfg.cache.enabled,
        "FPL tracker starting up"
    );

    // -- API client, optionally behind the cache -------------------------

    let client: Arc<dyn FplApi> = Arc::new(FplClient::new(&cfg.api)?);
    let api: Arc<dyn FplApi> = if cfg.cache.enabled {
        match CacheStore::connect(&cfg.cache.database_url).await {
            Ok(store) => Arc::new(CachedFplClient::new(client, store, &cfg.cache)),
            Err(e) => {
                warn!(error = %e, "Cache unavailable, using the FPL API directly");
                client
            }
        }
    } else {
        info!("API cache disabled");
        client
    };

    // -- Dashboard -------------------------------------------------------

    let state = Arc::new(DashboardState::new(
        LeagueService::new(api, cfg.league_id()),
        cfg.league.manager_id,
    ));

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for shutdown signal");
        }
        info!("Shutdown signal received.");
    };

    info!("Serving dashboard. Press Ctrl+C to stop.");
    dashboard::serve(state, &cfg.dashboard.host, cfg.dashboard.port, shutdown).await?;

    info!("FPL tracker shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("fpl_tracker=info"));

    let json_logging = std::env::var("FPL_LOG_JSON").is_ok();

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
