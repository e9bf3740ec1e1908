//! Schedule and simulation actions driven from the league page.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    routing::post,
    Router,
};
use std::sync::Arc;

use crate::{api::views, error::Result, league::WeekAdvance};

use super::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/generate-fixtures", post(generate_fixtures))
        .route("/play-week", post(play_week))
        .route("/next-week", post(next_week))
        .route("/play-all", post(play_all))
}

async fn generate_fixtures(State(state): State<Arc<AppState>>) -> Result<Redirect> {
    let _guard = state.write_lock.lock().await;

    let season = state.league.ensure_current_season().await?;
    let summary = state
        .league
        .generate_fixtures(season.id, &state.shutdown)
        .await?;
    tracing::debug!(
        "Season {} schedule: {} created, {} total",
        season.year,
        summary.created,
        summary.total
    );

    Ok(Redirect::to("/"))
}

async fn play_week(State(state): State<Arc<AppState>>) -> Result<Redirect> {
    let _guard = state.write_lock.lock().await;

    let season = state.league.current_season().await?;
    let report = state.league.play_week(season.id, &state.shutdown).await?;
    if report.skipped > 0 {
        tracing::warn!(
            "Week {} left {} match(es) unplayed after store errors",
            report.week,
            report.skipped
        );
    }

    Ok(Redirect::to("/"))
}

async fn next_week(State(state): State<Arc<AppState>>) -> Result<Response> {
    let _guard = state.write_lock.lock().await;

    let season = state.league.current_season().await?;
    match state.league.next_week(season.id, &state.shutdown).await? {
        WeekAdvance::Advanced { .. } => Ok(Redirect::to("/").into_response()),
        WeekAdvance::SeasonComplete { .. } => {
            Ok(Html(views::season_complete_page(&season)).into_response())
        }
    }
}

async fn play_all(State(state): State<Arc<AppState>>) -> Result<Redirect> {
    let _guard = state.write_lock.lock().await;

    let season = state.league.current_season().await?;
    let report = state.league.play_all(season.id, &state.shutdown).await?;
    tracing::info!(
        "Played out season {}: {} match(es) through week {}",
        season.year,
        report.matches_played(),
        report.final_week
    );

    Ok(Redirect::to("/"))
}
