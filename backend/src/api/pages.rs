//! HTML pages. Each page bootstraps the default season when none exists.

use axum::{extract::State, response::Html, routing::get, Router};
use std::sync::Arc;

use crate::{
    api::views::{self, MatchLine, Overview, WeekFixtures},
    db::models::{Fixture, Season},
    error::Result,
    league::{total_weeks, LeagueError, LeagueRepository, SeasonPhase},
};

use super::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home))
        .route("/standings", get(standings))
        .route("/teams", get(teams))
        .route("/matches", get(matches))
}

/// Makes sure a current season exists, optionally scheduling it too.
async fn bootstrap(state: &AppState, schedule: bool) -> Result<Season> {
    let _guard = state.write_lock.lock().await;

    let season = state.league.ensure_current_season().await?;
    if schedule && state.league.repository().count_fixtures(season.id).await? == 0 {
        match state
            .league
            .generate_fixtures(season.id, &state.shutdown)
            .await
        {
            Ok(_) => {}
            Err(LeagueError::InsufficientTeams { found }) => {
                tracing::warn!("Cannot schedule season {}: only {} team(s)", season.year, found);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(season)
}

async fn with_results(state: &AppState, fixtures: Vec<Fixture>) -> Result<Vec<MatchLine>> {
    let mut lines = Vec::with_capacity(fixtures.len());
    for fixture in fixtures {
        let result = if fixture.played {
            match state.league.repository().get_match_result(fixture.id).await {
                Ok(result) => Some(result),
                Err(e) if e.is_not_found() => {
                    return Err(LeagueError::ContractViolation(format!(
                        "Match {} is marked played but has no result",
                        fixture.id
                    ))
                    .into())
                }
                Err(e) => return Err(e.into()),
            }
        } else {
            None
        };
        lines.push(MatchLine { fixture, result });
    }
    Ok(lines)
}

async fn overview(state: &AppState, season: Season) -> Result<Overview> {
    let repo = state.league.repository();
    let current_week = repo.get_current_week(season.id).await?;
    let total_weeks = total_weeks(repo.list_teams().await?.len());
    let phase = state.league.season_phase(season.id).await?;

    let table = state.league.league_table(season.id).await?;
    let week_matches =
        with_results(state, repo.get_matches_by_week(season.id, current_week).await?).await?;
    let predictions = if phase == SeasonPhase::Bootstrapping {
        Vec::new()
    } else {
        state.league.predict(season.id).await?
    };

    Ok(Overview {
        season,
        phase,
        current_week,
        total_weeks,
        table,
        week_matches,
        predictions,
    })
}

async fn home(State(state): State<Arc<AppState>>) -> Result<Html<String>> {
    let season = bootstrap(&state, true).await?;
    let overview = overview(&state, season).await?;
    Ok(Html(views::overview_page(&overview)))
}

async fn standings(State(state): State<Arc<AppState>>) -> Result<Html<String>> {
    let season = bootstrap(&state, false).await?;
    let overview = overview(&state, season).await?;
    Ok(Html(views::overview_page(&overview)))
}

async fn teams(State(state): State<Arc<AppState>>) -> Result<Html<String>> {
    let season = bootstrap(&state, false).await?;
    let rows = state.league.league_table(season.id).await?;
    Ok(Html(views::teams_page(&season, &rows)))
}

async fn matches(State(state): State<Arc<AppState>>) -> Result<Html<String>> {
    let season = bootstrap(&state, false).await?;
    let repo = state.league.repository();
    let current_week = repo.get_current_week(season.id).await?;

    let mut weeks = Vec::new();
    for week in 1..=current_week {
        let fixtures = repo.get_matches_by_week(season.id, week).await?;
        weeks.push(WeekFixtures {
            week,
            matches: with_results(&state, fixtures).await?,
        });
    }

    Ok(Html(views::matches_page(&season, current_week, &weeks)))
}
