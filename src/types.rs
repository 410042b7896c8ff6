//! Shared types for the league tracker.
//!
//! Payload types mirror the JSON returned by the Fantasy Premier League
//! API. Only the fields the tracker reads are declared; everything else
//! in the upstream response is ignored during deserialization.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Deserialize a nullable JSON value into `T::default()` when null.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Render a player cost given in tenths of a million (130 -> "£13.0m").
pub fn format_cost(tenths: u32) -> String {
    format!("£{}.{}m", tenths / 10, tenths % 10)
}

// ---------------------------------------------------------------------------
// Bootstrap static
// ---------------------------------------------------------------------------

/// A gameweek ("event" in API terms).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub deadline_time: String,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub is_previous: bool,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub is_next: bool,
    #[serde(default)]
    pub average_entry_score: i32,
    #[serde(default)]
    pub highest_score: Option<i32>,
}

/// A Premier League club.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub short_name: String,
}

/// A player ("element").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Element {
    pub id: u32,
    pub web_name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub second_name: String,
    #[serde(default)]
    pub team: u32,
    /// 1=GK, 2=DEF, 3=MID, 4=FWD
    #[serde(default)]
    pub element_type: u32,
    /// Price in tenths of a million.
    #[serde(default)]
    pub now_cost: u32,
    #[serde(default)]
    pub total_points: i32,
    /// Points scored in the current gameweek.
    #[serde(default)]
    pub event_points: i32,
}

/// A squad position (GK/DEF/MID/FWD).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementType {
    pub id: u32,
    #[serde(default)]
    pub singular_name_short: String,
    #[serde(default)]
    pub plural_name: String,
}

/// `GET /bootstrap-static/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BootstrapStatic {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub element_types: Vec<ElementType>,
    #[serde(default)]
    pub total_players: u64,
}

impl BootstrapStatic {
    /// The gameweek flagged as current, if the season has started.
    pub fn current_event(&self) -> Option<&Event> {
        self.events.iter().find(|e| e.is_current)
    }

    /// Look up a player by id.
    pub fn element(&self, id: u32) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }
}

// ---------------------------------------------------------------------------
// League standings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct League {
    pub id: u64,
    pub name: String,
}

/// One manager's row in a classic league table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StandingsResult {
    pub id: u64,
    #[serde(default)]
    pub event_total: i32,
    pub player_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rank: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_rank: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rank_sort: u32,
    #[serde(default)]
    pub total: i32,
    /// Manager (entry) id.
    pub entry: u64,
    pub entry_name: String,
}

impl fmt::Display for StandingsResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} ({}) GW={} total={}",
            self.rank, self.player_name, self.entry_name, self.event_total, self.total,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Standings {
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<StandingsResult>,
}

/// `GET /leagues-classic/{id}/standings/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeagueStandings {
    pub league: League,
    pub standings: Standings,
}

// ---------------------------------------------------------------------------
// Manager entry & history
// ---------------------------------------------------------------------------

/// `GET /entry/{id}/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub id: u64,
    #[serde(default)]
    pub player_first_name: String,
    #[serde(default)]
    pub player_last_name: String,
    /// Team name.
    pub name: String,
    #[serde(default)]
    pub summary_overall_points: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary_overall_rank: u64,
    #[serde(default)]
    pub summary_event_points: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_event: u32,
}

/// A manager's result for one gameweek.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManagerGameweek {
    pub event: u32,
    pub points: i32,
    pub total_points: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rank: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rank_sort: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overall_rank: u64,
    #[serde(default)]
    pub bank: i32,
    #[serde(default)]
    pub value: i32,
    #[serde(default)]
    pub event_transfers: u32,
    #[serde(default)]
    pub event_transfers_cost: i32,
    #[serde(default)]
    pub points_on_bench: i32,
}

impl fmt::Display for ManagerGameweek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GW{}: {} pts (total {}, rank {}, bench {})",
            self.event, self.points, self.total_points, self.rank, self.points_on_bench,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PastSeason {
    pub season_name: String,
    pub total_points: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rank: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chip {
    pub name: String,
    #[serde(default)]
    pub time: String,
    pub event: u32,
}

/// `GET /entry/{id}/history/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ManagerHistory {
    #[serde(default)]
    pub current: Vec<ManagerGameweek>,
    #[serde(default)]
    pub past: Vec<PastSeason>,
    #[serde(default)]
    pub chips: Vec<Chip>,
}

/// One transfer; `GET /entry/{id}/transfers/` returns a list of these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transfer {
    pub element_in: u32,
    /// Tenths of a million.
    pub element_in_cost: u32,
    pub element_out: u32,
    pub element_out_cost: u32,
    pub entry: u64,
    pub event: u32,
    #[serde(default)]
    pub time: String,
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GW{} entry={} out=#{} ({}) in=#{} ({})",
            self.event,
            self.entry,
            self.element_out,
            format_cost(self.element_out_cost),
            self.element_in,
            format_cost(self.element_in_cost),
        )
    }
}

// ---------------------------------------------------------------------------
// Gameweek picks
// ---------------------------------------------------------------------------

/// A player selected in a manager's 15-man squad for one gameweek.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pick {
    /// Player id.
    pub element: u32,
    /// 1-11 starting, 12-15 bench.
    pub position: u32,
    /// 0=not playing, 1=playing, 2=captain, 3=triple captain.
    pub multiplier: u32,
    #[serde(default)]
    pub is_captain: bool,
    #[serde(default)]
    pub is_vice_captain: bool,
}

impl Pick {
    /// Whether this pick is part of the scoring starting XI.
    pub fn is_starting(&self) -> bool {
        self.position <= 11 && self.multiplier > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AutomaticSub {
    pub entry: u64,
    pub element_in: u32,
    pub element_out: u32,
    pub event: u32,
}

/// `GET /entry/{id}/event/{gw}/picks/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameweekPicks {
    #[serde(default)]
    pub active_chip: Option<String>,
    #[serde(default)]
    pub automatic_subs: Vec<AutomaticSub>,
    pub entry_history: ManagerGameweek,
    pub picks: Vec<Pick>,
}

// ---------------------------------------------------------------------------
// Live gameweek data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LiveStats {
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub total_points: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LiveElement {
    pub id: u32,
    #[serde(default)]
    pub stats: LiveStats,
}

/// `GET /event/{gw}/live/`: every player's points for one gameweek.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EventLive {
    #[serde(default)]
    pub elements: Vec<LiveElement>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Failures raised by the statistics functions for missing required input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    #[error("No managers provided")]
    NoManagers,

    #[error("Gameweek {0} not found")]
    GameweekNotFound(u32),

    #[error("Captain not found in picks")]
    CaptainNotFound,

    #[error("Captain player data not found")]
    CaptainPlayerNotFound,

    #[error("No starting XI players found")]
    NoStartingPlayers,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
