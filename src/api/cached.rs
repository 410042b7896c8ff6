//! Read-through cache in front of the FPL API.
//!
//! Bootstrap data and gameweek picks are the expensive, frequently
//! repeated requests, so only those two go through the store. Everything
//! else passes straight to the upstream client.
//!
//! The store is best-effort: a failed read counts as a miss and a failed
//! write is logged, neither fails the request.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use futures::future::join_all;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{collect_gameweeks, FplApi};
use crate::config::CacheConfig;
use crate::storage::{CacheRecord, CacheStore};
use crate::types::{
    BootstrapStatic, Entry, EventLive, GameweekPicks, LeagueStandings, ManagerHistory, Transfer,
};

/// Bootstrap key used when the gameweek isn't known up front.
const LATEST_BOOTSTRAP: u32 = 0;

pub struct CachedFplClient {
    upstream: Arc<dyn FplApi>,
    store: CacheStore,
    bootstrap_ttl: Duration,
    picks_ttl: Duration,
}

impl CachedFplClient {
    pub fn new(upstream: Arc<dyn FplApi>, store: CacheStore, config: &CacheConfig) -> Self {
        Self {
            upstream,
            store,
            bootstrap_ttl: Duration::seconds(config.bootstrap_ttl_secs),
            picks_ttl: Duration::seconds(config.picks_ttl_secs),
        }
    }

    async fn cached_bootstrap(&self) -> Option<CacheRecord<BootstrapStatic>> {
        match self.store.get_bootstrap(LATEST_BOOTSTRAP).await {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Bootstrap cache read failed");
                None
            }
        }
    }

    async fn cached_picks(&self, manager_id: u64, gameweek: u32) -> Option<CacheRecord<GameweekPicks>> {
        match self.store.get_picks(manager_id, gameweek).await {
            Ok(record) => record,
            Err(e) => {
                warn!(manager_id, gameweek, error = %e, "Picks cache read failed");
                None
            }
        }
    }

    /// Whether the last cached bootstrap marks `gameweek` as finished.
    /// A finished flag never flips back, so the snapshot's age doesn't matter.
    async fn gameweek_finished(&self, gameweek: u32) -> bool {
        self.cached_bootstrap().await.is_some_and(|record| {
            record
                .data
                .events
                .iter()
                .any(|e| e.id == gameweek && e.finished)
        })
    }

    /// Fetch picks upstream and write them back to the store.
    async fn refresh_picks(
        &self,
        manager_id: u64,
        gameweek: u32,
        is_completed: bool,
    ) -> Result<GameweekPicks> {
        let picks = self.upstream.manager_picks(manager_id, gameweek).await?;
        if let Err(e) = self
            .store
            .put_picks(manager_id, gameweek, &picks, is_completed, Utc::now())
            .await
        {
            warn!(manager_id, gameweek, error = %e, "Picks cache write failed");
        }
        Ok(picks)
    }
}

#[async_trait]
impl FplApi for CachedFplClient {
    async fn bootstrap_static(&self) -> Result<BootstrapStatic> {
        let now = Utc::now();
        if let Some(record) = self.cached_bootstrap().await {
            if record.is_fresh(self.bootstrap_ttl, now) {
                debug!(age_secs = record.age(now).num_seconds(), "Bootstrap cache hit");
                return Ok(record.data);
            }
            debug!("Bootstrap cache stale");
        }

        let bootstrap = self.upstream.bootstrap_static().await?;

        // Keep the latest snapshot plus one per gameweek.
        let mut keys = vec![LATEST_BOOTSTRAP];
        keys.extend(bootstrap.current_event().map(|e| e.id));
        for key in keys {
            if let Err(e) = self.store.put_bootstrap(key, &bootstrap, now).await {
                warn!(gameweek = key, error = %e, "Bootstrap cache write failed");
            }
        }

        Ok(bootstrap)
    }

    async fn league_standings(&self, league_id: u64, page: Option<u32>) -> Result<LeagueStandings> {
        self.upstream.league_standings(league_id, page).await
    }

    async fn manager_entry(&self, manager_id: u64) -> Result<Entry> {
        self.upstream.manager_entry(manager_id).await
    }

    async fn manager_history(&self, manager_id: u64) -> Result<ManagerHistory> {
        self.upstream.manager_history(manager_id).await
    }

    async fn manager_transfers(&self, manager_id: u64) -> Result<Vec<Transfer>> {
        self.upstream.manager_transfers(manager_id).await
    }

    async fn manager_picks(&self, manager_id: u64, gameweek: u32) -> Result<GameweekPicks> {
        if let Some(record) = self.cached_picks(manager_id, gameweek).await {
            if record.is_fresh(self.picks_ttl, Utc::now()) {
                debug!(manager_id, gameweek, "Picks cache hit");
                return Ok(record.data);
            }
        }
        let is_completed = self.gameweek_finished(gameweek).await;
        self.refresh_picks(manager_id, gameweek, is_completed).await
    }

    async fn event_live(&self, gameweek: u32) -> Result<EventLive> {
        self.upstream.event_live(gameweek).await
    }

    async fn manager_picks_batch(
        &self,
        manager_id: u64,
        gameweeks: &[(u32, bool)],
    ) -> Result<BTreeMap<u32, GameweekPicks>> {
        let mut cached: HashMap<u32, CacheRecord<GameweekPicks>> =
            match self.store.all_picks(manager_id).await {
                Ok(rows) => rows.into_iter().collect(),
                Err(e) => {
                    warn!(manager_id, error = %e, "Picks cache read failed");
                    HashMap::new()
                }
            };

        let now = Utc::now();
        let mut picks = BTreeMap::new();
        let mut missing = Vec::new();

        for &(gameweek, is_completed) in gameweeks {
            match cached.remove(&gameweek) {
                Some(record) if record.is_fresh(self.picks_ttl, now) => {
                    picks.insert(gameweek, record.data);
                }
                _ => missing.push((gameweek, is_completed)),
            }
        }

        info!(
            manager_id,
            hits = picks.len(),
            misses = missing.len(),
            "Picks batch cache lookup"
        );

        let fetches = missing.iter().map(|&(gameweek, is_completed)| async move {
            (gameweek, self.refresh_picks(manager_id, gameweek, is_completed).await)
        });
        collect_gameweeks(picks, join_all(fetches).await, "manager picks")
    }
}
