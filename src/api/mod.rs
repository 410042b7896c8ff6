//! FPL API access.
//!
//! Defines the `FplApi` trait and provides implementations for:
//! - `FplClient`: direct HTTP access to the public FPL API
//! - `CachedFplClient`: a read-through SQLite cache wrapping any `FplApi`

pub mod cached;
pub mod client;

use anyhow::Result;
use async_trait::async_trait;
use futures::future::join_all;
use std::collections::BTreeMap;
use tracing::warn;

use crate::types::{
    BootstrapStatic, Entry, EventLive, GameweekPicks, LeagueStandings, ManagerHistory, Transfer,
};

pub use cached::CachedFplClient;
pub use client::FplClient;

/// Read-only access to the Fantasy Premier League API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FplApi: Send + Sync {
    /// Season-wide reference data: gameweeks, teams, players.
    async fn bootstrap_static(&self) -> Result<BootstrapStatic>;

    /// One page of a classic league's standings. `None` means the first page.
    async fn league_standings(&self, league_id: u64, page: Option<u32>) -> Result<LeagueStandings>;

    async fn manager_entry(&self, manager_id: u64) -> Result<Entry>;

    async fn manager_history(&self, manager_id: u64) -> Result<ManagerHistory>;

    async fn manager_transfers(&self, manager_id: u64) -> Result<Vec<Transfer>>;

    async fn manager_picks(&self, manager_id: u64, gameweek: u32) -> Result<GameweekPicks>;

    /// Per-player points for one gameweek.
    async fn event_live(&self, gameweek: u32) -> Result<EventLive>;

    /// Picks for several gameweeks of one manager, keyed by gameweek.
    ///
    /// Each entry of `gameweeks` pairs a gameweek with whether it has
    /// finished. The default implementation ignores the flag and fetches
    /// everything concurrently; caching implementations use it to decide
    /// what may be served from storage. A gameweek that fails to load is
    /// left out, see [`collect_gameweeks`].
    async fn manager_picks_batch(
        &self,
        manager_id: u64,
        gameweeks: &[(u32, bool)],
    ) -> Result<BTreeMap<u32, GameweekPicks>> {
        let fetches = gameweeks.iter().map(|&(gameweek, _)| async move {
            (gameweek, self.manager_picks(manager_id, gameweek).await)
        });
        collect_gameweeks(BTreeMap::new(), join_all(fetches).await, "manager picks")
    }
}

/// Merge per-gameweek fetch results into `loaded`.
///
/// Failed gameweeks are logged and dropped. The call only fails when
/// nothing at all loaded, in which case the last error is returned.
pub fn collect_gameweeks<T>(
    mut loaded: BTreeMap<u32, T>,
    results: Vec<(u32, Result<T>)>,
    what: &str,
) -> Result<BTreeMap<u32, T>> {
    let mut last_err = None;
    for (gameweek, result) in results {
        match result {
            Ok(value) => {
                loaded.insert(gameweek, value);
            }
            Err(e) => {
                warn!(gameweek, what, error = %format!("{e:#}"), "Skipping gameweek that failed to load");
                last_err = Some(e);
            }
        }
    }
    match last_err {
        Some(e) if loaded.is_empty() => Err(e),
        _ => Ok(loaded),
    }
}
