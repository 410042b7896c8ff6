//! Captain regret.
//!
//! Measures how many points a manager left on the table by captaining
//! someone other than the top scorer of their own starting XI.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::types::{Element, EventLive, GameweekPicks, StatsError};

/// A player's name and points for one gameweek.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerPoints {
    pub id: u32,
    pub web_name: String,
    pub event_points: i32,
}

impl From<&Element> for PlayerPoints {
    fn from(element: &Element) -> Self {
        Self {
            id: element.id,
            web_name: element.web_name.clone(),
            event_points: element.event_points,
        }
    }
}

/// Captain regret for a single gameweek.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptainRegret {
    pub gameweek: u32,
    /// 2 normally, 3 with the triple captain chip.
    pub multiplier: u32,
    pub captain_id: u32,
    pub captain_name: String,
    pub captain_points: i32,
    /// Captain points with the multiplier applied.
    pub captain_total_points: i32,
    pub best_player_id: u32,
    pub best_player_name: String,
    pub best_player_points: i32,
    /// What the best player would have scored with the captain's multiplier.
    pub best_player_potential_points: i32,
    pub regret_points: i32,
}

/// Captain regret summed over a season.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SeasonCaptainRegret {
    pub total_regret: i32,
    pub gameweeks: Vec<CaptainRegret>,
}

/// Input for one gameweek of [`season_captain_regret`].
#[derive(Debug, Clone)]
pub struct GameweekCaptainData {
    pub picks: GameweekPicks,
    pub players: Vec<PlayerPoints>,
}

/// Build the roster for a past gameweek: names from bootstrap data,
/// points from that gameweek's live feed.
pub fn roster_for_gameweek(elements: &[Element], live: &EventLive) -> Vec<PlayerPoints> {
    let names: HashMap<u32, &str> = elements
        .iter()
        .map(|e| (e.id, e.web_name.as_str()))
        .collect();

    live.elements
        .iter()
        .map(|le| PlayerPoints {
            id: le.id,
            web_name: names
                .get(&le.id)
                .map(|name| name.to_string())
                .unwrap_or_else(|| format!("#{}", le.id)),
            event_points: le.stats.total_points,
        })
        .collect()
}

/// Compute captain regret for one gameweek's picks.
pub fn captain_regret(
    picks: &GameweekPicks,
    players: &[PlayerPoints],
) -> Result<CaptainRegret, StatsError> {
    let captain_pick = picks
        .picks
        .iter()
        .find(|p| p.is_captain)
        .ok_or(StatsError::CaptainNotFound)?;

    let find_player = |id: u32| players.iter().find(|p| p.id == id);

    let captain = find_player(captain_pick.element).ok_or(StatsError::CaptainPlayerNotFound)?;

    let multiplier = captain_pick.multiplier as i32;
    let captain_total_points = captain.event_points * multiplier;

    let mut best: Option<&PlayerPoints> = None;
    for pick in picks.picks.iter().filter(|p| p.is_starting()) {
        let Some(player) = find_player(pick.element) else {
            continue;
        };
        if best.map_or(true, |b| player.event_points > b.event_points) {
            best = Some(player);
        }
    }
    let best = best.ok_or(StatsError::NoStartingPlayers)?;

    let best_player_potential_points = best.event_points * multiplier;

    Ok(CaptainRegret {
        gameweek: picks.entry_history.event,
        multiplier: captain_pick.multiplier,
        captain_id: captain.id,
        captain_name: captain.web_name.clone(),
        captain_points: captain.event_points,
        captain_total_points,
        best_player_id: best.id,
        best_player_name: best.web_name.clone(),
        best_player_points: best.event_points,
        best_player_potential_points,
        regret_points: best_player_potential_points - captain_total_points,
    })
}

/// Sum captain regret over many gameweeks.
///
/// A gameweek whose calculation fails is logged and skipped; it never
/// aborts the rest of the season.
pub fn season_captain_regret(gameweeks: &[GameweekCaptainData]) -> SeasonCaptainRegret {
    let mut season = SeasonCaptainRegret::default();

    for gw in gameweeks {
        match captain_regret(&gw.picks, &gw.players) {
            Ok(regret) => {
                season.total_regret += regret.regret_points;
                season.gameweeks.push(regret);
            }
            Err(e) => {
                warn!(
                    gameweek = gw.picks.entry_history.event,
                    error = %e,
                    "Skipping gameweek in captain regret"
                );
            }
        }
    }

    season
}
