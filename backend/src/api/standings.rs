use axum::{
    extract::{Path, Query, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    db::models::{Season, Standing},
    error::Result,
    league::LeagueRepository,
};

use super::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SeasonQuery {
    pub season_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RecalculateResponse {
    pub message: String,
    pub season_id: i64,
    pub standings: Vec<Standing>,
}

#[derive(Debug, Serialize)]
pub struct TeamStandingResponse {
    pub message: String,
    pub season_id: i64,
    pub standing: Standing,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/standings/recalculate", post(recalculate_all))
        .route("/standings/team/:team_id", post(recalculate_team))
}

async fn resolve_season(state: &AppState, query: &SeasonQuery) -> Result<Season> {
    let season = match query.season_id {
        Some(id) => state.league.repository().get_season(id).await?,
        None => state.league.current_season().await?,
    };
    Ok(season)
}

async fn recalculate_all(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SeasonQuery>,
) -> Result<Json<RecalculateResponse>> {
    let _guard = state.write_lock.lock().await;

    let season = resolve_season(&state, &query).await?;
    let standings = state
        .league
        .recompute_all(season.id, &state.shutdown)
        .await?;

    Ok(Json(RecalculateResponse {
        message: format!("Recalculated standings for {} teams", standings.len()),
        season_id: season.id,
        standings,
    }))
}

async fn recalculate_team(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<i64>,
    Query(query): Query<SeasonQuery>,
) -> Result<Json<TeamStandingResponse>> {
    let _guard = state.write_lock.lock().await;

    let season = resolve_season(&state, &query).await?;
    let standing = state.league.recompute(season.id, team_id).await?;

    Ok(Json(TeamStandingResponse {
        message: format!("Recalculated standing for team {}", team_id),
        season_id: season.id,
        standing,
    }))
}
