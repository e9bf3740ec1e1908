//! Integration tests for the League Server HTTP surface
//!
//! These drive the routers end to end over an in-memory database seeded
//! with the default roster.

use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use league_server::{
    api::AppState, create_test_app, create_test_app_with_teams, db::models::NewTeam,
    league::LeagueRepository,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// Helper to create a test server instance
async fn setup() -> (TestServer, Arc<AppState>) {
    let (app, state) = create_test_app().await;
    (TestServer::new(app).unwrap(), state)
}

fn assert_redirect(response: &TestResponse, location: &str) {
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location").to_str().unwrap(), location);
}

async fn current_season_id(state: &AppState) -> i64 {
    state.league.current_season().await.unwrap().id
}

// ============================================================================
// Liveness and Pages
// ============================================================================

#[tokio::test]
async fn test_ping() {
    let (server, _state) = setup().await;

    let response = server.get("/ping").await;

    response.assert_status_ok();
    response.assert_json(&json!({ "message": "pong pong" }));
}

#[tokio::test]
async fn test_home_bootstraps_season() {
    let (server, state) = setup().await;

    let response = server.get("/").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Season 2025"));
    assert!(html.contains("Week 1 of 6"));
    assert!(html.contains("Manchester City"));
    assert!(html.contains("Championship Predictions"));

    let season_id = current_season_id(&state).await;
    assert_eq!(
        state.league.repository().count_fixtures(season_id).await.unwrap(),
        12
    );
}

#[tokio::test]
async fn test_pages_render() {
    let (server, state) = setup().await;

    for path in ["/standings", "/teams", "/matches"] {
        server.get(path).await.assert_status_ok();
    }

    // Only the home page schedules the season
    let season_id = current_season_id(&state).await;
    assert_eq!(
        state.league.repository().count_fixtures(season_id).await.unwrap(),
        0
    );

    let teams = server.get("/teams").await.text();
    assert!(teams.contains("Liverpool"));
    assert!(teams.contains("Win %"));
}

#[tokio::test]
async fn test_team_names_are_escaped() {
    let (app, _state) =
        create_test_app_with_teams(&[NewTeam::new("<Rovers>", 50, 100), NewTeam::new("Town & Co", 50, 100)])
            .await;
    let server = TestServer::new(app).unwrap();

    let html = server.get("/").await.text();
    assert!(html.contains("&lt;Rovers&gt;"));
    assert!(html.contains("Town &amp; Co"));
    assert!(!html.contains("<Rovers>"));
}

// ============================================================================
// Fixtures and Simulation
// ============================================================================

#[tokio::test]
async fn test_play_week_requires_season_and_fixtures() {
    let (server, state) = setup().await;

    // No season at all
    server.post("/play-week").await.assert_status_bad_request();

    // Season without fixtures
    server.get("/standings").await.assert_status_ok();
    let response = server.post("/play-week").await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("No fixtures"));

    let response = server.post("/generate-fixtures").await;
    assert_redirect(&response, "/");

    let response = server.post("/play-week").await;
    assert_redirect(&response, "/");

    let season_id = current_season_id(&state).await;
    assert!(state
        .league
        .repository()
        .all_matches_played_for_week(season_id, 1)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_next_week_gating() {
    let (server, state) = setup().await;
    server.post("/generate-fixtures").await;

    let response = server.post("/next-week").await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("unplayed"));

    server.post("/play-week").await;
    let response = server.post("/next-week").await;
    assert_redirect(&response, "/");

    let season_id = current_season_id(&state).await;
    assert_eq!(
        state.league.repository().get_current_week(season_id).await.unwrap(),
        2
    );
}

#[tokio::test]
async fn test_play_all_then_season_complete() {
    let (server, state) = setup().await;
    server.post("/generate-fixtures").await;

    let response = server.post("/play-all").await;
    assert_redirect(&response, "/");

    let season = state.league.current_season().await.unwrap();
    assert!(season.is_complete);

    let response = server.post("/next-week").await;
    response.assert_status_ok();
    assert!(response.text().contains("Season 2025 complete"));

    let home = server.get("/").await.text();
    assert!(home.contains("is complete"));
    assert!(home.contains("100.0%"));
}

#[tokio::test]
async fn test_banner_champion_matches_predictions() {
    let (app, state) =
        create_test_app_with_teams(&[NewTeam::new("Zulu", 50, 100), NewTeam::new("Alpha", 50, 100)])
            .await;
    let server = TestServer::new(app).unwrap();
    server.post("/generate-fixtures").await;
    server.post("/play-all").await;

    // Level on points and goal difference
    let season_id = current_season_id(&state).await;
    for week in [1, 2] {
        let fixture = state
            .league
            .repository()
            .get_matches_by_week(season_id, week)
            .await
            .unwrap()[0]
            .clone();
        let response = server
            .post(&format!("/matches/{}/edit", fixture.id))
            .form(&[("home_score", "2"), ("guest_score", "2")])
            .await;
        assert_redirect(&response, "/matches");
    }

    let html = server.get("/").await.text();
    assert!(html.contains("Champion: <strong>Zulu</strong>"));
    assert!(html.contains("<tr><td>Zulu</td><td>100.0%</td></tr>"));
}

// ============================================================================
// Manual Edits
// ============================================================================

#[tokio::test]
async fn test_edit_match_result() {
    let (server, state) = setup().await;
    server.post("/generate-fixtures").await;
    server.post("/play-week").await;

    let season_id = current_season_id(&state).await;
    let repo = state.league.repository();
    let fixture = repo.get_matches_by_week(season_id, 1).await.unwrap()[0].clone();

    let response = server
        .post(&format!("/matches/{}/edit", fixture.id))
        .form(&[("home_score", "5"), ("guest_score", "0")])
        .await;
    assert_redirect(&response, "/matches");

    let result = repo.get_match_result(fixture.id).await.unwrap();
    assert_eq!((result.home_score, result.guest_score), (5, 0));
    assert_eq!(result.winner_team_id, Some(fixture.home_team_id));

    let home = repo.get_standing(season_id, fixture.home_team_id).await.unwrap();
    assert_eq!((home.wins, home.points, home.goal_diff), (1, 3, 5));

    let page = server.get("/matches").await.text();
    assert!(page.contains(&format!("/matches/{}/edit", fixture.id)));
}

#[tokio::test]
async fn test_edit_match_rejects_bad_requests() {
    let (server, state) = setup().await;
    server.post("/generate-fixtures").await;

    let season_id = current_season_id(&state).await;
    let repo = state.league.repository();
    let week1 = repo.get_matches_by_week(season_id, 1).await.unwrap()[0].id;
    let week2 = repo.get_matches_by_week(season_id, 2).await.unwrap()[0].id;

    server
        .post(&format!("/matches/{}/edit", week1))
        .form(&[("home_score", "two"), ("guest_score", "0")])
        .await
        .assert_status_bad_request();

    server
        .post(&format!("/matches/{}/edit", week1))
        .form(&[("home_score", "-3"), ("guest_score", "0")])
        .await
        .assert_status_bad_request();

    server
        .post(&format!("/matches/{}/edit", week1))
        .form(&[("home_score", "100"), ("guest_score", "0")])
        .await
        .assert_status_bad_request();

    server
        .post(&format!("/matches/{}/edit", week1))
        .form(&[("home_score", "9223372036854775807"), ("guest_score", "0")])
        .await
        .assert_status_bad_request();

    server
        .post(&format!("/matches/{}/edit", week1))
        .form(&[("home_score", "1")])
        .await
        .assert_status_bad_request();

    server
        .post(&format!("/matches/{}/edit", week2))
        .form(&[("home_score", "1"), ("guest_score", "0")])
        .await
        .assert_status_not_found();

    server
        .post("/matches/4242/edit")
        .form(&[("home_score", "1"), ("guest_score", "0")])
        .await
        .assert_status_not_found();

    assert!(!repo.get_match(week1).await.unwrap().played);
}

// ============================================================================
// Standings Recalculation
// ============================================================================

#[tokio::test]
async fn test_recalculate_standings() {
    let (server, state) = setup().await;
    server.post("/generate-fixtures").await;
    server.post("/play-week").await;

    let response = server.post("/standings/recalculate").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["standings"].as_array().unwrap().len(), 4);

    let season_id = current_season_id(&state).await;
    let response = server
        .post(&format!("/standings/recalculate?season_id={}", season_id))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["season_id"], json!(season_id));

    let played: i64 = body["standings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["wins"].as_i64().unwrap() + s["draws"].as_i64().unwrap() + s["losses"].as_i64().unwrap())
        .sum();
    assert_eq!(played, 4);
}

#[tokio::test]
async fn test_recalculate_single_team() {
    let (server, state) = setup().await;
    server.post("/generate-fixtures").await;
    server.post("/play-week").await;

    let team = state
        .league
        .repository()
        .get_team_by_name("Liverpool")
        .await
        .unwrap();

    let response = server
        .post(&format!("/standings/team/{}", team.id))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["standing"]["team_id"], json!(team.id));

    server.post("/standings/team/999").await.assert_status_not_found();
    server
        .post("/standings/recalculate?season_id=999")
        .await
        .assert_status_not_found();
}

// ============================================================================
// Season Lifecycle
// ============================================================================

#[tokio::test]
async fn test_start_new_season() {
    let (server, state) = setup().await;
    server.post("/generate-fixtures").await;
    server.post("/play-all").await;

    let response = server.post("/start-new-season").await;
    assert_redirect(&response, "/");

    let season = state.league.current_season().await.unwrap();
    assert_eq!(season.year, 2026);
    assert!(!season.is_complete);
    assert_eq!(
        state.league.repository().count_fixtures(season.id).await.unwrap(),
        12
    );
}

#[tokio::test]
async fn test_reset_to_2025() {
    let (server, state) = setup().await;
    server.post("/generate-fixtures").await;
    server.post("/play-all").await;
    server.post("/start-new-season").await;
    server.post("/play-week").await;

    let repo = state.league.repository();
    let teams_before = repo.list_teams().await.unwrap();

    let response = server.post("/reset-to-2025").await;
    assert_redirect(&response, "/");

    let season = state.league.current_season().await.unwrap();
    assert_eq!(season.year, 2025);
    assert!(!season.is_complete);
    assert_eq!(repo.get_current_week(season.id).await.unwrap(), 1);
    assert_eq!(repo.count_fixtures(season.id).await.unwrap(), 12);
    assert!(repo.list_standings(season.id).await.unwrap().is_empty());
    assert_eq!(repo.list_teams().await.unwrap(), teams_before);
    assert!(repo
        .get_unplayed_matches_by_week(season.id, 1)
        .await
        .unwrap()
        .iter()
        .all(|f| !f.played));
}
