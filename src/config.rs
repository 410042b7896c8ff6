//! Configuration loading from TOML with environment variable overrides.
//!
//! Reads `config.toml` into strongly-typed structs. Every section has
//! defaults, so a missing file is not fatal; the league id must come from
//! either the file or `FPL_LEAGUE_ID`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub league: LeagueConfig,
    pub api: ApiConfig,
    pub cache: CacheConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct LeagueConfig {
    /// Classic league id.
    pub id: Option<u64>,
    /// Manager whose captain choices are analysed by default.
    pub manager_id: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://fantasy.premierleague.com/api".to_string(),
            timeout_secs: 15,
            user_agent: "fpl-tracker/0.1.0".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub database_url: String,
    /// Freshness window for bootstrap-static data.
    pub bootstrap_ttl_secs: i64,
    /// Freshness window for picks of a gameweek still in progress.
    pub picks_ttl_secs: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            database_url: "sqlite://fpl_cache.db".to_string(),
            bootstrap_ttl_secs: 3600,
            picks_ttl_secs: 600,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardConfig {
    pub host: String,
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load from `path` when it exists, otherwise start from defaults;
    /// then apply environment overrides and validate.
    pub fn load_or_default(path: &str) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::load(path)?
        } else {
            info!(path, "No config file found, using defaults");
            Self::default()
        };
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the environment. `lookup` is injected so tests
    /// don't have to mutate the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("FPL_LEAGUE_ID") {
            self.league.id = Some(v.trim().parse().context("FPL_LEAGUE_ID must be a number")?);
        }
        if let Some(v) = lookup("FPL_MANAGER_ID") {
            self.league.manager_id =
                Some(v.trim().parse().context("FPL_MANAGER_ID must be a number")?);
        }
        if let Some(v) = lookup("FPL_API_BASE_URL") {
            self.api.base_url = v;
        }
        if let Some(v) = lookup("ENABLE_API_CACHE") {
            self.cache.enabled = v.trim() != "false";
        }
        if let Some(v) = lookup("FPL_CACHE_DATABASE_URL") {
            self.cache.database_url = v;
        }
        if let Some(v) = lookup("FPL_DASHBOARD_PORT") {
            self.dashboard.port = v.trim().parse().context("FPL_DASHBOARD_PORT must be a port number")?;
        }
        Ok(())
    }

    /// Check required settings are present.
    pub fn validate(&self) -> Result<()> {
        if self.league.id.is_none() {
            anyhow::bail!("FPL_LEAGUE_ID environment variable (or [league].id) is required");
        }
        if self.api.base_url.trim().is_empty() {
            anyhow::bail!("API base URL must not be empty");
        }
        Ok(())
    }

    /// The configured league id. Only valid after [`AppConfig::validate`].
    pub fn league_id(&self) -> u64 {
        self.league.id.unwrap_or_default()
    }
}
