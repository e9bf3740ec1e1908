use axum::{extract::State, response::Redirect, routing::post, Router};
use std::sync::Arc;

use crate::error::Result;

use super::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reset-to-2025", post(reset_league))
        .route("/start-new-season", post(start_new_season))
}

async fn reset_league(State(state): State<Arc<AppState>>) -> Result<Redirect> {
    let _guard = state.write_lock.lock().await;

    let (season, summary) = state.league.reset_league(&state.shutdown).await?;
    tracing::info!(
        "League reset to {} with {} fixtures",
        season.year,
        summary.total
    );

    Ok(Redirect::to("/"))
}

async fn start_new_season(State(state): State<Arc<AppState>>) -> Result<Redirect> {
    let _guard = state.write_lock.lock().await;

    let (season, summary) = state.league.start_new_season(&state.shutdown).await?;
    tracing::info!(
        "Started season {} with {} fixtures",
        season.year,
        summary.total
    );

    Ok(Redirect::to("/"))
}
