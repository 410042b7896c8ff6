//! View models for the dashboard.
//!
//! Turns league data into display-ready JSON: formatted numbers, emoji
//! badges, rank movement and empty-state messages. The HTML page renders
//! these as-is.

use serde::Serialize;

use crate::engine::StandingsPage;
use crate::stats::captain::{CaptainRegret, SeasonCaptainRegret};
use crate::stats::transfers::{EnrichedTransfer, TransferSummary};
use crate::stats::ManagerSeries;
use crate::types::{format_cost, LeagueStandings, ManagerGameweek};

const NO_MANAGERS: &str = "🤷 No managers found. Did everyone rage quit?";
const NO_GAMEWEEKS: &str = "📅 No gameweeks yet. Season hasn't started or we're in a time loop! ⏰";
const NO_STANDINGS: &str = "📊 No data available for this gameweek";
const NO_TRANSFER_ACTIVITY: &str = "🤐 No transfer activity yet. Everyone's being patient... or lazy! 😴";
const NO_TRANSFERS: &str = "🦗 Crickets... Nobody's made any transfers yet! Set and forget? 📊";
const NO_CAPTAIN_DATA: &str = "🧢 No captain picks to judge yet.";

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RankMovement {
    Up,
    Down,
    Same,
}

pub fn rank_movement(change: i64) -> RankMovement {
    match change {
        c if c > 0 => RankMovement::Up,
        c if c < 0 => RankMovement::Down,
        _ => RankMovement::Same,
    }
}

/// "+2", "-1", or empty when unchanged.
pub fn rank_change_text(change: i64) -> String {
    match change {
        0 => String::new(),
        c if c > 0 => format!("+{c}"),
        c => c.to_string(),
    }
}

/// Podium emoji by table position, with a consolation for last place.
pub fn podium_emoji(index: usize, len: usize) -> &'static str {
    match index {
        0 => "👑",
        1 => "🥈",
        2 => "🥉",
        i if i + 1 == len => "😅",
        _ => "",
    }
}

/// Badge for a manager's rank in one gameweek.
pub fn gameweek_rank_emoji(rank: u32) -> &'static str {
    match rank {
        1 => "🏆",
        2 => "🥈",
        3 => "🥉",
        4 | 5 => "⭐",
        _ => "",
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PointsBand {
    High,
    Mid,
    Low,
}

pub fn points_band(points: i32) -> PointsBand {
    if points >= 80 {
        PointsBand::High
    } else if points >= 60 {
        PointsBand::Mid
    } else {
        PointsBand::Low
    }
}

/// Thousands-separated points, e.g. 1234 -> "1,234".
pub fn format_points(points: i32) -> String {
    let digits = points.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if points < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn activity_level(count: usize, max: usize) -> &'static str {
    if count == max && count > 5 {
        "🔥 Most Active"
    } else if count > 8 {
        "⚡ Very Active"
    } else if count > 4 {
        "📈 Active"
    } else {
        "💤 Quiet"
    }
}

fn plural(count: usize, singular: &'static str, plural: &'static str) -> &'static str {
    if count == 1 {
        singular
    } else {
        plural
    }
}

/// "🔄 2 transfers (-4 pts)"; `None` when no transfers were made.
pub fn transfers_text(transfers: u32, cost: i32) -> Option<String> {
    if transfers == 0 {
        return None;
    }
    let mut text = format!("🔄 {transfers} {}", plural(transfers as usize, "transfer", "transfers"));
    if cost > 0 {
        text.push_str(&format!(" (-{cost} pts)"));
    }
    Some(text)
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RegretSeverity {
    Perfect,
    Minor,
    Painful,
}

impl RegretSeverity {
    pub fn icon(self) -> &'static str {
        match self {
            Self::Perfect => "✅",
            Self::Minor => "⚠️",
            Self::Painful => "😭",
        }
    }
}

pub fn regret_severity(regret_points: i32) -> RegretSeverity {
    match regret_points {
        0 => RegretSeverity::Perfect,
        r if r <= 6 => RegretSeverity::Minor,
        _ => RegretSeverity::Painful,
    }
}

// ---------------------------------------------------------------------------
// League table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct LeagueRow {
    pub rank: u32,
    pub emoji: &'static str,
    pub manager_name: String,
    pub team_name: String,
    pub gameweek_points: i32,
    pub points_band: PointsBand,
    pub total_points: String,
    pub rank_change: i64,
    pub rank_change_text: String,
    pub movement: RankMovement,
    pub is_leader: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeagueView {
    pub league_name: String,
    pub default_manager_id: Option<u64>,
    pub rows: Vec<LeagueRow>,
    pub banter: Option<String>,
    pub empty_message: Option<&'static str>,
}

pub fn league_view(table: &LeagueStandings, default_manager_id: Option<u64>) -> LeagueView {
    let results = &table.standings.results;
    let len = results.len();

    let rows = results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            // A last_rank of 0 means the league has no previous gameweek yet.
            let change = if r.last_rank == 0 {
                0
            } else {
                i64::from(r.last_rank) - i64::from(r.rank)
            };
            LeagueRow {
                rank: r.rank,
                emoji: podium_emoji(i, len),
                manager_name: r.player_name.clone(),
                team_name: r.entry_name.clone(),
                gameweek_points: r.event_total,
                points_band: points_band(r.event_total),
                total_points: format_points(r.total),
                rank_change: change,
                rank_change_text: rank_change_text(change),
                movement: rank_movement(change),
                is_leader: i == 0,
            }
        })
        .collect();

    let banter = results.first().map(|leader| {
        let mut text = format!("🎉 {} is living their best life at the top!", leader.player_name);
        if len > 1 {
            if let Some(last) = results.last() {
                text.push_str(&format!(" {} might need a hug 💙", last.player_name));
            }
        }
        text
    });

    LeagueView {
        league_name: table.league.name.clone(),
        default_manager_id,
        rows,
        banter,
        empty_message: (len == 0).then_some(NO_MANAGERS),
    }
}

// ---------------------------------------------------------------------------
// Gameweek history
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct GameweekCard {
    pub gameweek: u32,
    pub points: i32,
    pub points_band: PointsBand,
    pub rank: u32,
    pub rank_emoji: &'static str,
    pub points_on_bench: i32,
    pub transfers: Option<String>,
    pub is_winner: bool,
}

impl From<&ManagerGameweek> for GameweekCard {
    fn from(gw: &ManagerGameweek) -> Self {
        Self {
            gameweek: gw.event,
            points: gw.points,
            points_band: points_band(gw.points),
            rank: gw.rank,
            rank_emoji: gameweek_rank_emoji(gw.rank),
            points_on_bench: gw.points_on_bench,
            transfers: transfers_text(gw.event_transfers, gw.event_transfers_cost),
            is_winner: gw.rank == 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ManagerHistoryView {
    pub manager_name: String,
    pub team_name: String,
    pub cards: Vec<GameweekCard>,
    pub summary: String,
    pub empty_message: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameweeksView {
    pub managers: Vec<ManagerHistoryView>,
    pub empty_message: Option<&'static str>,
}

pub fn gameweeks_view(series: &[ManagerSeries]) -> GameweeksView {
    let managers = series
        .iter()
        .map(|m| {
            let wins = m.gameweeks.iter().filter(|gw| gw.rank == 1).count();
            ManagerHistoryView {
                manager_name: m.name.clone(),
                team_name: m.team_name.clone(),
                cards: m.gameweeks.iter().map(GameweekCard::from).collect(),
                summary: format!(
                    "🎯 {} gameweeks played • {wins} {} 🏆",
                    m.gameweeks.len(),
                    plural(wins, "win", "wins"),
                ),
                empty_message: m.gameweeks.is_empty().then_some(NO_GAMEWEEKS),
            }
        })
        .collect();

    GameweeksView {
        managers,
        empty_message: series.is_empty().then_some(NO_MANAGERS),
    }
}

// ---------------------------------------------------------------------------
// Historical standings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Navigator {
    pub label: String,
    pub current: Option<u32>,
    pub available: Vec<u32>,
    pub previous: Option<u32>,
    pub next: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatisticsPanel {
    pub average_points: String,
    pub highest_points: i32,
    pub lowest_points: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoricalRow {
    pub rank: u32,
    pub emoji: &'static str,
    pub manager_name: String,
    pub team_name: String,
    pub gameweek_points: i32,
    pub total_points: String,
    pub rank_change: i64,
    pub rank_change_text: String,
    pub movement: RankMovement,
    pub is_gameweek_winner: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StandingsView {
    pub navigator: Navigator,
    pub statistics: Option<StatisticsPanel>,
    pub rows: Vec<HistoricalRow>,
    pub empty_message: Option<&'static str>,
}

pub fn standings_view(page: &StandingsPage) -> StandingsView {
    let navigator = Navigator {
        label: page
            .selected_gameweek
            .map(|gw| format!("Gameweek {gw}"))
            .unwrap_or_default(),
        current: page.selected_gameweek,
        available: page.available_gameweeks.clone(),
        previous: page.previous_gameweek,
        next: page.next_gameweek,
    };

    let Some(data) = page.data.as_ref().filter(|d| !d.standings.is_empty()) else {
        return StandingsView {
            navigator,
            statistics: None,
            rows: Vec::new(),
            empty_message: Some(NO_STANDINGS),
        };
    };

    let rows = data
        .standings
        .iter()
        .enumerate()
        .map(|(i, s)| HistoricalRow {
            rank: s.rank,
            emoji: if i < 3 { podium_emoji(i, usize::MAX) } else { "" },
            manager_name: s.manager_name.clone(),
            team_name: s.team_name.clone(),
            gameweek_points: s.gameweek_points,
            total_points: format_points(s.total_points),
            rank_change: s.rank_change,
            rank_change_text: rank_change_text(s.rank_change),
            movement: rank_movement(s.rank_change),
            is_gameweek_winner: s.is_gameweek_winner,
        })
        .collect();

    StandingsView {
        navigator,
        statistics: Some(StatisticsPanel {
            average_points: format!("{:.1}", data.average_points),
            highest_points: data.highest_points,
            lowest_points: data.lowest_points,
        }),
        rows,
        empty_message: None,
    }
}

// ---------------------------------------------------------------------------
// Transfers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct TransferActivityRow {
    pub manager_name: String,
    pub team_name: String,
    pub transfer_count: usize,
    pub count_label: &'static str,
    pub activity_level: &'static str,
    pub last_transfer_gameweek: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransferActivityView {
    pub rows: Vec<TransferActivityRow>,
    pub total_transfers: usize,
    pub most_active: String,
    pub empty_message: Option<&'static str>,
}

/// Most active managers first; ties keep league order.
pub fn transfer_activity_view(summaries: &[TransferSummary]) -> TransferActivityView {
    let max = summaries.iter().map(|s| s.transfer_count).max().unwrap_or(0);

    let mut sorted: Vec<&TransferSummary> = summaries.iter().collect();
    sorted.sort_by(|a, b| b.transfer_count.cmp(&a.transfer_count));

    let rows: Vec<TransferActivityRow> = sorted
        .iter()
        .map(|s| TransferActivityRow {
            manager_name: s.manager_name.clone(),
            team_name: s.team_name.clone(),
            transfer_count: s.transfer_count,
            count_label: plural(s.transfer_count, "transfer", "transfers"),
            activity_level: activity_level(s.transfer_count, max),
            last_transfer_gameweek: s.last_transfer_gameweek,
        })
        .collect();

    TransferActivityView {
        total_transfers: summaries.iter().map(|s| s.transfer_count).sum(),
        most_active: rows
            .first()
            .map(|r| r.manager_name.clone())
            .unwrap_or_else(|| "Nobody".to_string()),
        rows,
        empty_message: summaries.is_empty().then_some(NO_TRANSFER_ACTIVITY),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransferLine {
    pub manager_name: String,
    pub player_out: String,
    pub player_out_cost: String,
    pub player_in: String,
    pub player_in_cost: String,
    pub time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransferGroup {
    pub gameweek: u32,
    pub label: String,
    pub transfers: Vec<TransferLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransferListView {
    pub groups: Vec<TransferGroup>,
    pub total_transfers: usize,
    pub empty_message: Option<&'static str>,
}

pub fn transfer_list_view(grouped: &[(u32, Vec<EnrichedTransfer>)]) -> TransferListView {
    let groups: Vec<TransferGroup> = grouped
        .iter()
        .map(|(gameweek, transfers)| TransferGroup {
            gameweek: *gameweek,
            label: format!("GW {gameweek}"),
            transfers: transfers
                .iter()
                .map(|t| TransferLine {
                    manager_name: t.manager_name.clone(),
                    player_out: t.player_out.name.clone(),
                    player_out_cost: format_cost(t.player_out.cost),
                    player_in: t.player_in.name.clone(),
                    player_in_cost: format_cost(t.player_in.cost),
                    time: t.time.clone(),
                })
                .collect(),
        })
        .collect();

    let total_transfers = groups.iter().map(|g| g.transfers.len()).sum();
    TransferListView {
        groups,
        total_transfers,
        empty_message: (total_transfers == 0).then_some(NO_TRANSFERS),
    }
}

// ---------------------------------------------------------------------------
// Captain regret
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct CaptainBadge {
    pub gameweek: u32,
    pub severity: RegretSeverity,
    pub icon: &'static str,
    pub captain: String,
    pub best_choice: Option<String>,
    pub regret_label: Option<String>,
    pub message: Option<&'static str>,
}

impl From<&CaptainRegret> for CaptainBadge {
    fn from(r: &CaptainRegret) -> Self {
        let severity = regret_severity(r.regret_points);
        let regretted = r.regret_points > 0;
        Self {
            gameweek: r.gameweek,
            severity,
            icon: severity.icon(),
            captain: format!(
                "{} ({} × {} = {})",
                r.captain_name, r.captain_points, r.multiplier, r.captain_total_points
            ),
            best_choice: regretted.then(|| {
                format!(
                    "{} ({} × {} = {})",
                    r.best_player_name,
                    r.best_player_points,
                    r.multiplier,
                    r.best_player_potential_points
                )
            }),
            regret_label: regretted.then(|| format!("-{} pts", r.regret_points)),
            message: (r.regret_points == 0).then_some("Perfect captain choice!"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CaptainRegretView {
    pub manager_id: u64,
    pub total_regret: i32,
    pub perfect_picks: usize,
    pub badges: Vec<CaptainBadge>,
    pub empty_message: Option<&'static str>,
}

pub fn captain_regret_view(manager_id: u64, season: &SeasonCaptainRegret) -> CaptainRegretView {
    CaptainRegretView {
        manager_id,
        total_regret: season.total_regret,
        perfect_picks: season.gameweeks.iter().filter(|r| r.regret_points == 0).count(),
        badges: season.gameweeks.iter().map(CaptainBadge::from).collect(),
        empty_message: season.gameweeks.is_empty().then_some(NO_CAPTAIN_DATA),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
