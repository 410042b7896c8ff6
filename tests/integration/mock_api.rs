//! Mock FPL API for integration testing.
//!
//! Provides a deterministic `FplApi` implementation backed by a small
//! three-manager league, all in memory with no network access.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use fpl_tracker::api::FplApi;
use fpl_tracker::types::*;

pub const LEAGUE_ID: u64 = 314;
pub const ALICE: u64 = 1;
pub const BOB: u64 = 2;
pub const CHARLIE: u64 = 3;
/// Not in the league table; joined the game in gameweek 2.
pub const DANI: u64 = 4;

const HAALAND: u32 = 1;
const SALAH: u32 = 2;
const PALMER: u32 = 3;
const SAKA: u32 = 4;
const RAYA: u32 = 5;

/// (event, points, total_points, rank) per gameweek.
type Row = (u32, i32, i32, u32);

const ALICE_HISTORY: [Row; 3] = [(1, 65, 65, 2), (2, 92, 157, 1), (3, 50, 207, 2)];
const BOB_HISTORY: [Row; 3] = [(1, 78, 78, 1), (2, 62, 140, 2), (3, 88, 228, 1)];
const CHARLIE_HISTORY: [Row; 3] = [(1, 60, 60, 3), (2, 54, 114, 3), (3, 41, 155, 3)];
const DANI_HISTORY: [Row; 2] = [(2, 70, 70, 1), (3, 45, 115, 2)];

/// A deterministic FPL API. Gameweeks 1 and 2 are finished, 3 is live.
pub struct MockFplApi {
    picks_calls: AtomicUsize,
    /// If set, every call returns this error.
    force_error: Mutex<Option<String>>,
    /// Gameweek whose picks requests fail.
    failing_picks: Mutex<Option<u32>>,
}

impl MockFplApi {
    pub fn new() -> Self {
        Self {
            picks_calls: AtomicUsize::new(0),
            force_error: Mutex::new(None),
            failing_picks: Mutex::new(None),
        }
    }

    /// Force all subsequent calls to return an error.
    pub fn set_error(&self, msg: &str) {
        *self.force_error.lock().unwrap() = Some(msg.to_string());
    }

    /// Make picks requests for one gameweek fail with a 500.
    pub fn fail_picks_for(&self, gameweek: u32) {
        *self.failing_picks.lock().unwrap() = Some(gameweek);
    }

    /// Number of picks requests that reached this mock.
    pub fn picks_calls(&self) -> usize {
        self.picks_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        match self.force_error.lock().unwrap().as_ref() {
            Some(err) => Err(anyhow!("{}", err)),
            None => Ok(()),
        }
    }

    fn history_rows(manager_id: u64) -> Result<&'static [Row]> {
        match manager_id {
            ALICE => Ok(&ALICE_HISTORY),
            BOB => Ok(&BOB_HISTORY),
            CHARLIE => Ok(&CHARLIE_HISTORY),
            DANI => Ok(&DANI_HISTORY),
            other => Err(anyhow!("Failed to fetch manager history: 404 Not Found ({other})")),
        }
    }

    /// Alice switches captain each week; everyone else always picks Haaland.
    fn captain(manager_id: u64, gameweek: u32) -> u32 {
        match (manager_id, gameweek) {
            (ALICE, 3) => SALAH,
            _ => HAALAND,
        }
    }
}

fn manager_gameweek(&(event, points, total_points, rank): &Row) -> ManagerGameweek {
    ManagerGameweek {
        event,
        points,
        total_points,
        rank,
        rank_sort: rank,
        overall_rank: 250_000,
        bank: 5,
        value: 1002,
        event_transfers: 0,
        event_transfers_cost: 0,
        points_on_bench: 3,
    }
}

fn event(id: u32, finished: bool, is_current: bool) -> Event {
    Event {
        id,
        name: format!("Gameweek {id}"),
        deadline_time: format!("2024-08-{:02}T17:30:00Z", 10 + id * 7),
        finished,
        is_previous: id == 2,
        is_current,
        is_next: id == 4,
        average_entry_score: 55,
        highest_score: finished.then_some(120),
    }
}

fn element(id: u32, web_name: &str, now_cost: u32) -> Element {
    Element {
        id,
        web_name: web_name.to_string(),
        first_name: String::new(),
        second_name: web_name.to_string(),
        team: id,
        element_type: 3,
        now_cost,
        total_points: 100,
        event_points: 0,
    }
}

fn standing(entry: u64, name: &str, rank: u32, last_rank: u32, history: &[Row]) -> StandingsResult {
    let latest = &history[history.len() - 1];
    StandingsResult {
        id: entry * 10,
        event_total: latest.1,
        player_name: name.to_string(),
        rank,
        last_rank,
        rank_sort: rank,
        total: latest.2,
        entry,
        entry_name: format!("{name} FC"),
    }
}

fn transfer(entry: u64, event: u32, element_in: u32, element_out: u32) -> Transfer {
    Transfer {
        element_in,
        element_in_cost: 105,
        element_out,
        element_out_cost: 85,
        entry,
        event,
        time: format!("2024-08-{:02}T09:00:00Z", 10 + event * 7),
    }
}

fn pick(element: u32, position: u32, captain: u32) -> Pick {
    let is_captain = element == captain;
    Pick {
        element,
        position,
        multiplier: if position > 11 { 0 } else if is_captain { 2 } else { 1 },
        is_captain,
        is_vice_captain: false,
    }
}

#[async_trait]
impl FplApi for MockFplApi {
    async fn bootstrap_static(&self) -> Result<BootstrapStatic> {
        self.check()?;
        Ok(BootstrapStatic {
            events: vec![
                event(1, true, false),
                event(2, true, false),
                event(3, false, true),
                event(4, false, false),
            ],
            teams: Vec::new(),
            elements: vec![
                element(HAALAND, "Haaland", 150),
                element(SALAH, "Salah", 130),
                element(PALMER, "Palmer", 105),
                element(SAKA, "Saka", 100),
                element(RAYA, "Raya", 55),
            ],
            element_types: Vec::new(),
            total_players: 11_000_000,
        })
    }

    async fn league_standings(&self, league_id: u64, _page: Option<u32>) -> Result<LeagueStandings> {
        self.check()?;
        if league_id != LEAGUE_ID {
            return Err(anyhow!("Failed to fetch league standings: 404 Not Found"));
        }
        Ok(LeagueStandings {
            league: League { id: LEAGUE_ID, name: "Office League".to_string() },
            standings: Standings {
                has_next: false,
                page: 1,
                results: vec![
                    standing(BOB, "Bob", 1, 2, &BOB_HISTORY),
                    standing(ALICE, "Alice", 2, 1, &ALICE_HISTORY),
                    standing(CHARLIE, "Charlie", 3, 3, &CHARLIE_HISTORY),
                ],
            },
        })
    }

    async fn manager_entry(&self, manager_id: u64) -> Result<Entry> {
        self.check()?;
        let rows = Self::history_rows(manager_id)?;
        Ok(Entry {
            id: manager_id,
            player_first_name: String::new(),
            player_last_name: String::new(),
            name: format!("Manager {manager_id} FC"),
            summary_overall_points: rows[rows.len() - 1].2,
            summary_overall_rank: 250_000,
            summary_event_points: rows[rows.len() - 1].1,
            current_event: 3,
        })
    }

    async fn manager_history(&self, manager_id: u64) -> Result<ManagerHistory> {
        self.check()?;
        Ok(ManagerHistory {
            current: Self::history_rows(manager_id)?.iter().map(manager_gameweek).collect(),
            past: Vec::new(),
            chips: Vec::new(),
        })
    }

    async fn manager_transfers(&self, manager_id: u64) -> Result<Vec<Transfer>> {
        self.check()?;
        Ok(match manager_id {
            ALICE => vec![transfer(ALICE, 2, PALMER, SAKA), transfer(ALICE, 3, SAKA, RAYA)],
            CHARLIE => vec![transfer(CHARLIE, 2, SALAH, PALMER)],
            _ => Vec::new(),
        })
    }

    async fn manager_picks(&self, manager_id: u64, gameweek: u32) -> Result<GameweekPicks> {
        self.check()?;
        self.picks_calls.fetch_add(1, Ordering::SeqCst);
        if *self.failing_picks.lock().unwrap() == Some(gameweek) {
            return Err(anyhow!("Failed to fetch manager picks: 500 Internal Server Error"));
        }

        let rows = Self::history_rows(manager_id)?;
        let row = rows
            .iter()
            .find(|r| r.0 == gameweek)
            .ok_or_else(|| anyhow!("Failed to fetch manager picks: 404 Not Found"))?;
        let captain = Self::captain(manager_id, gameweek);

        Ok(GameweekPicks {
            active_chip: None,
            automatic_subs: Vec::new(),
            entry_history: manager_gameweek(row),
            picks: vec![
                pick(HAALAND, 1, captain),
                pick(SALAH, 2, captain),
                pick(PALMER, 3, captain),
                pick(SAKA, 4, captain),
                pick(RAYA, 12, captain),
            ],
        })
    }

    async fn event_live(&self, gameweek: u32) -> Result<EventLive> {
        self.check()?;
        let points: [(u32, i32); 5] = match gameweek {
            1 => [(HAALAND, 2), (SALAH, 13), (PALMER, 6), (SAKA, 8), (RAYA, 1)],
            2 => [(HAALAND, 16), (SALAH, 4), (PALMER, 9), (SAKA, 2), (RAYA, 6)],
            3 => [(HAALAND, 5), (SALAH, 5), (PALMER, 20), (SAKA, 3), (RAYA, 30)],
            _ => return Err(anyhow!("Failed to fetch live gameweek data: 404 Not Found")),
        };
        Ok(EventLive {
            elements: points
                .iter()
                .map(|&(id, total_points)| LiveElement {
                    id,
                    stats: LiveStats { minutes: 90, total_points },
                })
                .collect(),
        })
    }
}
