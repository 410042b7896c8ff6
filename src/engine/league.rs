//! League service: loads league data through an `FplApi` and hands it to
//! the statistics functions.

use anyhow::{Context, Result};
use futures::future::{join_all, try_join_all};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::{collect_gameweeks, FplApi};
use crate::stats::captain::{
    roster_for_gameweek, season_captain_regret, GameweekCaptainData, SeasonCaptainRegret,
};
use crate::stats::standings::{available_gameweeks, historical_standings, GameweekLeagueData};
use crate::stats::transfers::{
    enrich_transfers, group_by_gameweek, transfer_summary, EnrichedTransfer, TransferSummary,
};
use crate::stats::winner::gameweek_winners;
use crate::stats::ManagerSeries;
use crate::types::{LeagueStandings, StandingsResult};

/// Upper bound on standings pages followed for one league.
const MAX_STANDINGS_PAGES: u32 = 50;

/// Historical standings for one gameweek plus what the navigator needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StandingsPage {
    pub available_gameweeks: Vec<u32>,
    pub selected_gameweek: Option<u32>,
    pub previous_gameweek: Option<u32>,
    pub next_gameweek: Option<u32>,
    /// `None` when the league has no managers or no gameweeks yet.
    pub data: Option<GameweekLeagueData>,
}

impl StandingsPage {
    fn navigate(available: Vec<u32>, selected: Option<u32>) -> Self {
        let (previous_gameweek, next_gameweek) = match selected {
            Some(gw) => (
                available.iter().rev().find(|&&g| g < gw).copied(),
                available.iter().find(|&&g| g > gw).copied(),
            ),
            None => (None, None),
        };
        Self {
            available_gameweeks: available,
            selected_gameweek: selected,
            previous_gameweek,
            next_gameweek,
            data: None,
        }
    }
}

pub struct LeagueService {
    api: Arc<dyn FplApi>,
    league_id: u64,
}

impl LeagueService {
    pub fn new(api: Arc<dyn FplApi>, league_id: u64) -> Self {
        Self { api, league_id }
    }

    pub fn league_id(&self) -> u64 {
        self.league_id
    }

    /// The league table with every standings page merged into the first.
    pub async fn league_table(&self) -> Result<LeagueStandings> {
        let mut table = self.api.league_standings(self.league_id, None).await?;
        let mut page = 1;

        while table.standings.has_next && page < MAX_STANDINGS_PAGES {
            page += 1;
            let next = self.api.league_standings(self.league_id, Some(page)).await?;
            table.standings.results.extend(next.standings.results);
            table.standings.has_next = next.standings.has_next;
        }

        debug!(
            league_id = self.league_id,
            managers = table.standings.results.len(),
            pages = page,
            "League table loaded"
        );
        Ok(table)
    }

    /// Every manager's gameweek history, in league table order.
    pub async fn manager_series(&self) -> Result<Vec<ManagerSeries>> {
        let table = self.league_table().await?;
        self.series_for(&table.standings.results).await
    }

    async fn series_for(&self, managers: &[StandingsResult]) -> Result<Vec<ManagerSeries>> {
        let fetches = managers.iter().map(|m| async move {
            let history = self
                .api
                .manager_history(m.entry)
                .await
                .with_context(|| format!("Failed to load history for {}", m.player_name))?;
            Ok::<_, anyhow::Error>(ManagerSeries {
                entry_id: m.entry,
                name: m.player_name.clone(),
                team_name: m.entry_name.clone(),
                gameweeks: history.current,
            })
        });
        try_join_all(fetches).await
    }

    /// League table as of `gameweek`, defaulting to the latest one any
    /// manager has played.
    pub async fn historical_standings(&self, gameweek: Option<u32>) -> Result<StandingsPage> {
        let series = self.manager_series().await?;
        let available = available_gameweeks(&series);
        let selected = gameweek.or_else(|| available.last().copied());

        let mut page = StandingsPage::navigate(available, selected);
        if series.is_empty() {
            return Ok(page);
        }
        if let Some(gw) = selected {
            page.data = Some(historical_standings(&series, gw)?);
        }
        Ok(page)
    }

    pub async fn gameweek_winners(&self, gameweek: u32) -> Result<Vec<String>> {
        let series = self.manager_series().await?;
        Ok(gameweek_winners(&series, gameweek))
    }

    /// Transfer counts per manager, in league table order.
    pub async fn transfer_activity(&self) -> Result<Vec<TransferSummary>> {
        let table = self.league_table().await?;
        let fetches = table.standings.results.iter().map(|m| async move {
            let transfers = self.api.manager_transfers(m.entry).await?;
            Ok::<_, anyhow::Error>(transfer_summary(&m.player_name, &m.entry_name, &transfers))
        });
        try_join_all(fetches).await
    }

    /// Every transfer in the league with player names, newest gameweek first.
    pub async fn transfer_list(&self) -> Result<Vec<(u32, Vec<EnrichedTransfer>)>> {
        let (table, bootstrap) =
            tokio::try_join!(self.league_table(), self.api.bootstrap_static())?;

        let fetches = table.standings.results.iter().map(|m| async move {
            self.api
                .manager_transfers(m.entry)
                .await
                .map(|transfers| (m.player_name.as_str(), transfers))
        });
        let per_manager = try_join_all(fetches).await?;

        let enriched: Vec<EnrichedTransfer> = per_manager
            .iter()
            .flat_map(|(name, transfers)| enrich_transfers(name, transfers, &bootstrap.elements))
            .collect();
        Ok(group_by_gameweek(enriched))
    }

    /// Season captain regret for one manager over every finished gameweek
    /// and the one in progress, starting from the manager's first played
    /// gameweek.
    ///
    /// A gameweek whose picks or live points fail to load is skipped; the
    /// call only fails when no gameweek loads at all.
    pub async fn captain_regret(&self, manager_id: u64) -> Result<SeasonCaptainRegret> {
        let (bootstrap, history) = tokio::try_join!(self.api.bootstrap_static(), async {
            self.api
                .manager_history(manager_id)
                .await
                .with_context(|| format!("Failed to load history for manager {manager_id}"))
        })?;

        let Some(first_played) = history.current.iter().map(|gw| gw.event).min() else {
            info!(manager_id, "Manager has not played a gameweek yet");
            return Ok(SeasonCaptainRegret::default());
        };

        let mut gameweeks: Vec<(u32, bool)> = bootstrap
            .events
            .iter()
            .filter(|e| e.id >= first_played && (e.finished || e.is_current))
            .map(|e| (e.id, e.finished))
            .collect();
        gameweeks.sort_unstable();

        if gameweeks.is_empty() {
            info!(manager_id, "No gameweeks played yet");
            return Ok(SeasonCaptainRegret::default());
        }

        let live_fetches = gameweeks
            .iter()
            .map(|&(gw, _)| async move { (gw, self.api.event_live(gw).await) });
        let (picks, live) = tokio::join!(
            self.api.manager_picks_batch(manager_id, &gameweeks),
            join_all(live_fetches),
        );
        let mut picks = picks?;
        let live = collect_gameweeks(BTreeMap::new(), live, "live gameweek data")?;

        let season: Vec<GameweekCaptainData> = live
            .into_iter()
            .filter_map(|(gw, live)| {
                picks.remove(&gw).map(|gw_picks| GameweekCaptainData {
                    picks: gw_picks,
                    players: roster_for_gameweek(&bootstrap.elements, &live),
                })
            })
            .collect();

        let regret = season_captain_regret(&season);
        info!(
            manager_id,
            first_played,
            requested = gameweeks.len(),
            gameweeks = regret.gameweeks.len(),
            total_regret = regret.total_regret,
            "Captain regret calculated"
        );
        Ok(regret)
    }
}
