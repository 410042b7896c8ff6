//! Historical league standings.
//!
//! Rebuilds the league table as it stood after any past gameweek, with
//! rank movement relative to the gameweek before and summary statistics
//! for the round.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::ManagerSeries;
use crate::types::StatsError;

/// One row of a historical league table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameweekStanding {
    pub manager_name: String,
    pub team_name: String,
    pub rank: u32,
    pub prev_rank: Option<u32>,
    /// `prev_rank - rank`; positive means the manager climbed.
    pub rank_change: i64,
    pub gameweek_points: i32,
    pub total_points: i32,
    pub is_gameweek_winner: bool,
}

/// The league table after one gameweek plus that round's statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameweekLeagueData {
    pub gameweek_number: u32,
    pub standings: Vec<GameweekStanding>,
    pub average_points: f64,
    pub highest_points: i32,
    pub lowest_points: i32,
}

/// Sorted, de-duplicated gameweek numbers any manager has a result for.
pub fn available_gameweeks(managers: &[ManagerSeries]) -> Vec<u32> {
    managers
        .iter()
        .flat_map(|m| m.gameweeks.iter().map(|gw| gw.event))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Build the league table as of `gameweek`.
///
/// Every manager must have a result for `gameweek`; the previous
/// gameweek is optional and only feeds the rank change. Rows come back
/// ordered by rank.
pub fn historical_standings(
    managers: &[ManagerSeries],
    gameweek: u32,
) -> Result<GameweekLeagueData, StatsError> {
    if managers.is_empty() {
        return Err(StatsError::NoManagers);
    }

    let previous = gameweek.checked_sub(1);
    let mut rows = Vec::with_capacity(managers.len());

    for manager in managers {
        let current = manager
            .gameweek(gameweek)
            .ok_or(StatsError::GameweekNotFound(gameweek))?;
        let prev_rank = previous
            .and_then(|p| manager.gameweek(p))
            .map(|gw| gw.rank);

        rows.push(GameweekStanding {
            manager_name: manager.name.clone(),
            team_name: manager.team_name.clone(),
            rank: current.rank,
            prev_rank,
            rank_change: prev_rank.map_or(0, |prev| i64::from(prev) - i64::from(current.rank)),
            gameweek_points: current.points,
            total_points: current.total_points,
            is_gameweek_winner: false,
        });
    }

    rows.sort_by_key(|row| row.rank);

    let points = rows.iter().map(|row| row.gameweek_points);
    let highest_points = points.clone().max().unwrap_or_default();
    let lowest_points = points.clone().min().unwrap_or_default();
    let average_points = points.map(f64::from).sum::<f64>() / rows.len() as f64;

    for row in &mut rows {
        row.is_gameweek_winner = row.gameweek_points == highest_points;
    }

    Ok(GameweekLeagueData {
        gameweek_number: gameweek,
        standings: rows,
        average_points,
        highest_points,
        lowest_points,
    })
}
