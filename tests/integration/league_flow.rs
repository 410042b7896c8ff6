//! League service flows over the mock league.

use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

use fpl_tracker::engine::LeagueService;
use fpl_tracker::types::StatsError;

use crate::mock_api::{MockFplApi, ALICE, BOB, DANI, LEAGUE_ID};

fn service(mock: Arc<MockFplApi>) -> LeagueService {
    LeagueService::new(mock, LEAGUE_ID)
}

#[tokio::test]
async fn test_standings_default_to_latest_gameweek() {
    let league = service(Arc::new(MockFplApi::new()));

    let page = assert_ok!(league.historical_standings(None).await);
    assert_eq!(page.available_gameweeks, vec![1, 2, 3]);
    assert_eq!(page.selected_gameweek, Some(3));
    assert_eq!(page.previous_gameweek, Some(2));
    assert_eq!(page.next_gameweek, None);

    let data = page.data.expect("standings for gameweek 3");
    let names: Vec<&str> = data.standings.iter().map(|s| s.manager_name.as_str()).collect();
    assert_eq!(names, vec!["Bob", "Alice", "Charlie"]);
    assert_eq!(data.highest_points, 88);
    assert_eq!(data.lowest_points, 41);
    assert!(data.standings[0].is_gameweek_winner);

    // Bob climbed from 2nd to 1st, Alice dropped from 1st to 2nd.
    assert_eq!(data.standings[0].rank_change, 1);
    assert_eq!(data.standings[1].rank_change, -1);
    assert_eq!(data.standings[2].rank_change, 0);
}

#[tokio::test]
async fn test_first_gameweek_has_no_previous_rank() {
    let league = service(Arc::new(MockFplApi::new()));

    let page = assert_ok!(league.historical_standings(Some(1)).await);
    assert_eq!(page.previous_gameweek, None);
    assert_eq!(page.next_gameweek, Some(2));

    let data = page.data.expect("standings for gameweek 1");
    assert!(data.standings.iter().all(|s| s.prev_rank.is_none() && s.rank_change == 0));
    assert!((data.average_points - 203.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_unknown_gameweek_is_not_found() {
    let league = service(Arc::new(MockFplApi::new()));

    let err = assert_err!(league.historical_standings(Some(12)).await);
    assert_eq!(
        err.downcast_ref::<StatsError>(),
        Some(&StatsError::GameweekNotFound(12))
    );
}

#[tokio::test]
async fn test_gameweek_winners() {
    let league = service(Arc::new(MockFplApi::new()));

    assert_eq!(assert_ok!(league.gameweek_winners(1).await), vec!["Bob"]);
    assert_eq!(assert_ok!(league.gameweek_winners(2).await), vec!["Alice"]);
    assert!(assert_ok!(league.gameweek_winners(9).await).is_empty());
}

#[tokio::test]
async fn test_captain_regret_over_the_season() {
    let mock = Arc::new(MockFplApi::new());
    let league = service(mock.clone());

    let season = assert_ok!(league.captain_regret(ALICE).await);
    let per_gameweek: Vec<(u32, i32)> = season
        .gameweeks
        .iter()
        .map(|r| (r.gameweek, r.regret_points))
        .collect();
    // GW1: Haaland 2 vs Salah 13. GW2: Haaland was the best pick.
    // GW3: Salah 5 vs Palmer 20; Raya's 30 on the bench doesn't count.
    assert_eq!(per_gameweek, vec![(1, 22), (2, 0), (3, 30)]);
    assert_eq!(season.total_regret, 52);
    assert_eq!(season.gameweeks[2].best_player_name, "Palmer");
    assert_eq!(mock.picks_calls(), 3);
}

#[tokio::test]
async fn test_captain_regret_for_perfect_captain() {
    let league = service(Arc::new(MockFplApi::new()));

    let season = assert_ok!(league.captain_regret(BOB).await);
    assert_eq!(season.gameweeks.len(), 3);
    assert_eq!(season.gameweeks[1].regret_points, 0);
    assert_eq!(season.total_regret, 22 + 30);
}

#[tokio::test]
async fn test_captain_regret_for_late_joiner() {
    let mock = Arc::new(MockFplApi::new());
    let league = service(mock.clone());

    // Gameweek 1 picks don't exist upstream and are never requested.
    let season = assert_ok!(league.captain_regret(DANI).await);
    let gameweeks: Vec<u32> = season.gameweeks.iter().map(|r| r.gameweek).collect();
    assert_eq!(gameweeks, vec![2, 3]);
    assert_eq!(season.total_regret, 30);
    assert_eq!(mock.picks_calls(), 2);
}

#[tokio::test]
async fn test_captain_regret_survives_one_failing_gameweek() {
    let mock = Arc::new(MockFplApi::new());
    mock.fail_picks_for(1);
    let league = service(mock);

    let season = assert_ok!(league.captain_regret(ALICE).await);
    let gameweeks: Vec<u32> = season.gameweeks.iter().map(|r| r.gameweek).collect();
    assert_eq!(gameweeks, vec![2, 3]);
    assert_eq!(season.total_regret, 30);
}

#[tokio::test]
async fn test_transfer_list_newest_first() {
    let league = service(Arc::new(MockFplApi::new()));

    let grouped = assert_ok!(league.transfer_list().await);
    let gameweeks: Vec<u32> = grouped.iter().map(|(gw, _)| *gw).collect();
    assert_eq!(gameweeks, vec![3, 2]);

    let gw2 = &grouped[1].1;
    assert_eq!(gw2.len(), 2);
    assert_eq!(gw2[0].manager_name, "Alice");
    assert_eq!(gw2[0].player_in.name, "Palmer");
    assert_eq!(gw2[0].player_out.name, "Saka");
    assert_eq!(gw2[1].manager_name, "Charlie");
}

#[tokio::test]
async fn test_upstream_failure_propagates() {
    let mock = Arc::new(MockFplApi::new());
    mock.set_error("Failed to fetch league standings: 503 Service Unavailable");
    let league = service(mock);

    let err = assert_err!(league.manager_series().await);
    assert!(err.to_string().contains("503"));
}
