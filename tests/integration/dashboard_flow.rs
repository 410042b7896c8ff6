//! Every dashboard route, end to end through the router.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use fpl_tracker::dashboard::{build_router, DashboardState};
use fpl_tracker::engine::LeagueService;

use crate::mock_api::{MockFplApi, ALICE, LEAGUE_ID};

fn app(mock: Arc<MockFplApi>) -> Router {
    let state = DashboardState::new(LeagueService::new(mock, LEAGUE_ID), Some(ALICE));
    build_router(Arc::new(state))
}

async fn get_json(uri: &str) -> (StatusCode, Value) {
    let resp = app(Arc::new(MockFplApi::new()))
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), 1_000_000).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_league_table() {
    let (status, json) = get_json("/api/league").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["league_name"], "Office League");
    assert_eq!(json["default_manager_id"], ALICE);

    let rows = json["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["manager_name"], "Bob");
    assert_eq!(rows[0]["is_leader"], true);
    assert_eq!(rows[0]["emoji"], "👑");
    assert_eq!(rows[0]["movement"], "up");
    assert_eq!(rows[1]["movement"], "down");
    assert_eq!(rows[2]["movement"], "same");
    assert_eq!(rows[2]["emoji"], "🥉");
    assert!(json["empty_message"].is_null());
}

#[tokio::test]
async fn test_gameweek_history() {
    let (status, json) = get_json("/api/gameweeks").await;
    assert_eq!(status, StatusCode::OK);

    let bob = &json["managers"][0];
    assert_eq!(bob["manager_name"], "Bob");
    assert_eq!(bob["cards"].as_array().unwrap().len(), 3);
    assert_eq!(bob["cards"][0]["is_winner"], true);
    assert!(bob["summary"].as_str().unwrap().contains("3 gameweeks played"));
}

#[tokio::test]
async fn test_historical_standings_navigation() {
    let (status, json) = get_json("/api/standings?gameweek=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["navigator"]["label"], "Gameweek 2");
    assert_eq!(json["navigator"]["previous"], 1);
    assert_eq!(json["navigator"]["next"], 3);
    assert_eq!(json["statistics"]["highest_points"], 92);
    assert_eq!(json["rows"][0]["manager_name"], "Alice");
    assert_eq!(json["rows"][0]["is_gameweek_winner"], true);

    let (status, json) = get_json("/api/standings?gameweek=30").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "GAMEWEEK_NOT_FOUND");

    let (status, _) = get_json("/api/standings?gameweek=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_winners() {
    let (status, json) = get_json("/api/winners?gameweek=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["gameweek"], 3);
    assert_eq!(json["winners"], serde_json::json!(["Bob"]));
}

#[tokio::test]
async fn test_transfer_views() {
    let (status, json) = get_json("/api/transfers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_transfers"], 3);
    assert_eq!(json["most_active"], "Alice");
    assert_eq!(json["rows"][0]["transfer_count"], 2);

    let (status, json) = get_json("/api/transfers/list").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_transfers"], 3);
    assert_eq!(json["groups"][0]["label"], "GW 3");
    assert_eq!(json["groups"][0]["transfers"][0]["player_in"], "Saka");
    assert_eq!(json["groups"][0]["transfers"][0]["player_in_cost"], "£10.5m");
}

#[tokio::test]
async fn test_captain_regret() {
    let (status, json) = get_json(&format!("/api/captain-regret/{ALICE}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_regret"], 52);
    assert_eq!(json["perfect_picks"], 1);

    let badges = json["badges"].as_array().unwrap();
    assert_eq!(badges.len(), 3);
    assert_eq!(badges[0]["captain"], "Haaland (2 × 2 = 4)");
    assert_eq!(badges[0]["regret_label"], "-22 pts");
    assert_eq!(badges[1]["message"], "Perfect captain choice!");
    assert_eq!(badges[2]["best_choice"], "Palmer (20 × 2 = 40)");
}

#[tokio::test]
async fn test_upstream_outage_is_bad_gateway() {
    let mock = Arc::new(MockFplApi::new());
    mock.set_error("Failed to fetch league standings: 500 Internal Server Error");

    let resp = app(mock)
        .oneshot(Request::builder().uri("/api/league").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
}
