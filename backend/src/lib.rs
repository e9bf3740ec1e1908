//! League Server Library
//!
//! This module exposes the server components for integration testing.

pub mod api;
pub mod audit;
pub mod config;
pub mod db;
pub mod error;
pub mod league;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    db::{models::NewTeam, SqliteRepository},
    league::{LeagueManager, LeagueRepository, MatchSimulator},
};

/// Creates the application router with all endpoints
pub fn create_app(state: Arc<api::AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ping", get(ping))
        .merge(api::pages_router())
        .merge(api::fixtures_router())
        .merge(api::matches_router())
        .merge(api::standings_router())
        .merge(api::season_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn ping() -> Json<Value> {
    Json(json!({ "message": "pong pong" }))
}

/// Test helper to create an in-memory database and run migrations
pub async fn create_test_db() -> db::DbPool {
    let pool = db::create_memory_pool()
        .await
        .expect("Failed to create in-memory database");

    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Test helper to create a league over an in-memory database with a
/// fixed PRNG seed and the given roster
pub async fn create_test_league(
    teams: &[NewTeam],
    seed: u64,
) -> LeagueManager<SqliteRepository> {
    let repo = SqliteRepository::new(create_test_db().await);
    for team in teams {
        repo.create_team(team)
            .await
            .expect("Failed to create test team");
    }
    LeagueManager::new(repo, MatchSimulator::seeded(seed))
}

/// Test helper to create an app over the given roster
pub async fn create_test_app_with_teams(teams: &[NewTeam]) -> (Router, Arc<api::AppState>) {
    let league = create_test_league(teams, 42).await;
    let state = Arc::new(api::AppState::new(league, CancellationToken::new()));
    (create_app(state.clone()), state)
}

/// Test helper to create a fully configured test app with the default roster
pub async fn create_test_app() -> (Router, Arc<api::AppState>) {
    let pool = create_test_db().await;
    db::seed_teams(&pool).await.expect("Failed to seed teams");

    let league = LeagueManager::new(SqliteRepository::new(pool), MatchSimulator::seeded(42));
    let state = Arc::new(api::AppState::new(league, CancellationToken::new()));
    (create_app(state.clone()), state)
}
