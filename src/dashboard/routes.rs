//! Dashboard API route handlers.
//!
//! All endpoints return JSON view models. State is shared via
//! `Arc<DashboardState>`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::error::{ApiError, ApiResult};
use super::views::{
    captain_regret_view, gameweeks_view, league_view, standings_view, transfer_activity_view,
    transfer_list_view, CaptainRegretView, GameweeksView, LeagueView, StandingsView,
    TransferActivityView, TransferListView,
};
use crate::engine::LeagueService;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct DashboardState {
    pub league: LeagueService,
    /// Manager preselected for captain regret on the dashboard page.
    pub default_manager_id: Option<u64>,
}

impl DashboardState {
    pub fn new(league: LeagueService, default_manager_id: Option<u64>) -> Self {
        Self {
            league,
            default_manager_id,
        }
    }
}

pub type AppState = Arc<DashboardState>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct GameweekQuery {
    pub gameweek: Option<String>,
}

impl GameweekQuery {
    fn parse(&self) -> ApiResult<Option<u32>> {
        match self.gameweek.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => match raw.parse::<u32>() {
                Ok(gw) if gw > 0 => Ok(Some(gw)),
                _ => Err(ApiError::BadRequest(format!("Invalid gameweek: {raw}"))),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WinnersResponse {
    pub gameweek: u32,
    pub winners: Vec<String>,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// GET /api/league
pub async fn get_league(State(state): State<AppState>) -> ApiResult<Json<LeagueView>> {
    let table = state.league.league_table().await?;
    Ok(Json(league_view(&table, state.default_manager_id)))
}

/// GET /api/gameweeks
pub async fn get_gameweeks(State(state): State<AppState>) -> ApiResult<Json<GameweeksView>> {
    let series = state.league.manager_series().await?;
    Ok(Json(gameweeks_view(&series)))
}

/// GET /api/standings?gameweek=N
pub async fn get_standings(
    State(state): State<AppState>,
    Query(query): Query<GameweekQuery>,
) -> ApiResult<Json<StandingsView>> {
    let gameweek = query.parse()?;
    let page = state.league.historical_standings(gameweek).await?;
    Ok(Json(standings_view(&page)))
}

/// GET /api/winners?gameweek=N
pub async fn get_winners(
    State(state): State<AppState>,
    Query(query): Query<GameweekQuery>,
) -> ApiResult<Json<WinnersResponse>> {
    let gameweek = query
        .parse()?
        .ok_or_else(|| ApiError::BadRequest("gameweek query parameter is required".into()))?;
    let winners = state.league.gameweek_winners(gameweek).await?;
    debug!(gameweek, winners = winners.len(), "Gameweek winners resolved");
    Ok(Json(WinnersResponse { gameweek, winners }))
}

/// GET /api/transfers
pub async fn get_transfers(State(state): State<AppState>) -> ApiResult<Json<TransferActivityView>> {
    let activity = state.league.transfer_activity().await?;
    Ok(Json(transfer_activity_view(&activity)))
}

/// GET /api/transfers/list
pub async fn get_transfer_list(State(state): State<AppState>) -> ApiResult<Json<TransferListView>> {
    let grouped = state.league.transfer_list().await?;
    Ok(Json(transfer_list_view(&grouped)))
}

/// GET /api/captain-regret/:manager_id
pub async fn get_captain_regret(
    State(state): State<AppState>,
    Path(manager_id): Path<String>,
) -> ApiResult<Json<CaptainRegretView>> {
    let manager_id: u64 = manager_id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid manager id: {manager_id}")))?;
    let season = state.league.captain_regret(manager_id).await?;
    Ok(Json(captain_regret_view(manager_id, &season)))
}
