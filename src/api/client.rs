//! HTTP client for the public Fantasy Premier League API.
//!
//! Base URL: https://fantasy.premierleague.com/api
//! Auth: none; every endpoint used here is public and read-only.
//! Paths carry a trailing slash, the API redirects without one.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::FplApi;
use crate::config::ApiConfig;
use crate::types::{
    BootstrapStatic, Entry, EventLive, GameweekPicks, LeagueStandings, ManagerHistory, Transfer,
};

/// Direct, uncached FPL API client.
pub struct FplClient {
    http: Client,
    base_url: String,
}

impl FplClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client for FPL API")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `path` and decode the JSON body. `what` names the resource in
    /// error messages, e.g. "Failed to fetch league standings: 404 Not Found".
    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        let url = self.url(path);
        debug!(url = %url, "FPL API request");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {what}"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            anyhow::bail!("Failed to fetch {what}: {status}");
        }

        resp.json()
            .await
            .with_context(|| format!("Failed to parse {what} response"))
    }
}

/// Standings path; the page parameter is only sent past the first page.
fn standings_path(league_id: u64, page: Option<u32>) -> String {
    match page {
        Some(page) if page > 1 => {
            format!("/leagues-classic/{league_id}/standings/?page_standings={page}")
        }
        _ => format!("/leagues-classic/{league_id}/standings/"),
    }
}

#[async_trait]
impl FplApi for FplClient {
    async fn bootstrap_static(&self) -> Result<BootstrapStatic> {
        self.get_json("/bootstrap-static/", "bootstrap data").await
    }

    async fn league_standings(&self, league_id: u64, page: Option<u32>) -> Result<LeagueStandings> {
        self.get_json(&standings_path(league_id, page), "league standings")
            .await
    }

    async fn manager_entry(&self, manager_id: u64) -> Result<Entry> {
        self.get_json(&format!("/entry/{manager_id}/"), "manager entry")
            .await
    }

    async fn manager_history(&self, manager_id: u64) -> Result<ManagerHistory> {
        self.get_json(&format!("/entry/{manager_id}/history/"), "manager history")
            .await
    }

    async fn manager_transfers(&self, manager_id: u64) -> Result<Vec<Transfer>> {
        self.get_json(&format!("/entry/{manager_id}/transfers/"), "manager transfers")
            .await
    }

    async fn manager_picks(&self, manager_id: u64, gameweek: u32) -> Result<GameweekPicks> {
        self.get_json(
            &format!("/entry/{manager_id}/event/{gameweek}/picks/"),
            "manager picks",
        )
        .await
    }

    async fn event_live(&self, gameweek: u32) -> Result<EventLive> {
        self.get_json(&format!("/event/{gameweek}/live/"), "live gameweek data")
            .await
    }
}
