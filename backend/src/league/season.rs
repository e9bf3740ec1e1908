//! Season lifecycle: bootstrap, rollover, reset and phase queries.

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::{audit, db::models::Season};

use super::{
    constants::DEFAULT_SEASON_YEAR,
    error::{LeagueError, LeagueResult},
    fixtures::FixtureSummary,
    manager::LeagueManager,
    repository::LeagueRepository,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SeasonPhase {
    /// No fixtures yet
    Bootstrapping,
    InProgress { week: i64 },
    Complete,
}

impl<R: LeagueRepository> LeagueManager<R> {
    pub async fn current_season(&self) -> LeagueResult<Season> {
        match self.repo.get_current_season().await {
            Err(e) if e.is_not_found() => Err(LeagueError::NoActiveSeason),
            other => other,
        }
    }

    /// Returns the current season, creating the default one at week 1
    /// when none exists.
    pub async fn ensure_current_season(&self) -> LeagueResult<Season> {
        match self.repo.get_current_season().await {
            Ok(season) => Ok(season),
            Err(e) if e.is_not_found() => {
                let season = self.open_season(DEFAULT_SEASON_YEAR).await?;
                tracing::info!("Created initial season {}", season.year);
                Ok(season)
            }
            Err(e) => Err(e),
        }
    }

    /// Rolls over to the year after the current season (or the default
    /// year when there is none) and schedules it.
    pub async fn start_new_season(
        &self,
        cancel: &CancellationToken,
    ) -> LeagueResult<(Season, FixtureSummary)> {
        let year = match self.repo.get_current_season().await {
            Ok(current) => current.year + 1,
            Err(e) if e.is_not_found() => DEFAULT_SEASON_YEAR,
            Err(e) => return Err(e),
        };

        if cancel.is_cancelled() {
            return Err(LeagueError::Cancelled);
        }

        let season = self.open_season(year).await?;
        let summary = self.generate_fixtures(season.id, cancel).await?;
        Ok((season, summary))
    }

    /// Drops every season's matches, results, standings and week cursor,
    /// keeps the roster, and restarts the default year at week 1 with a
    /// fresh schedule.
    pub async fn reset_league(
        &self,
        cancel: &CancellationToken,
    ) -> LeagueResult<(Season, FixtureSummary)> {
        if cancel.is_cancelled() {
            return Err(LeagueError::Cancelled);
        }

        let season = self.repo.reset_to_year(DEFAULT_SEASON_YEAR).await?;
        audit::log_season_event(season.id, "reset", &format!("year {}", season.year));

        let summary = self.generate_fixtures(season.id, cancel).await?;
        Ok((season, summary))
    }

    pub async fn season_phase(&self, season_id: i64) -> LeagueResult<SeasonPhase> {
        let season = self.repo.get_season(season_id).await?;
        if season.is_complete {
            return Ok(SeasonPhase::Complete);
        }
        if self.repo.count_fixtures(season_id).await? == 0 {
            return Ok(SeasonPhase::Bootstrapping);
        }

        match self.repo.get_current_week(season_id).await {
            Ok(week) => Ok(SeasonPhase::InProgress { week }),
            Err(e) if e.is_not_found() => Ok(SeasonPhase::Bootstrapping),
            Err(e) => Err(e),
        }
    }

    async fn open_season(&self, year: i64) -> LeagueResult<Season> {
        let season = self.repo.create_season(year).await?;
        self.repo.set_current_season(season.id).await?;
        self.repo.init_game_state(season.id).await?;
        audit::log_season_event(season.id, "started", &format!("year {}", year));

        Ok(Season {
            is_current: true,
            ..season
        })
    }
}
