//! Week cursor advancement.

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::audit;

use super::{
    error::{LeagueError, LeagueResult},
    fixtures::total_weeks,
    manager::LeagueManager,
    repository::LeagueRepository,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WeekAdvance {
    Advanced { week: i64 },
    SeasonComplete { season_id: i64 },
}

impl<R: LeagueRepository> LeagueManager<R> {
    /// Closes the current week once every match in it is played.
    ///
    /// At the final week the season is marked complete instead; calling it
    /// again there reports completion again.
    pub async fn next_week(
        &self,
        season_id: i64,
        cancel: &CancellationToken,
    ) -> LeagueResult<WeekAdvance> {
        let week = self.repo.get_current_week(season_id).await?;
        let fixtures = self.repo.get_matches_by_week(season_id, week).await?;
        if fixtures.is_empty() {
            return Err(LeagueError::NoFixtures { week });
        }

        if !self.repo.all_matches_played_for_week(season_id, week).await? {
            let unplayed = fixtures.iter().filter(|f| !f.played).count();
            return Err(LeagueError::WeekIncomplete { week, unplayed });
        }

        if cancel.is_cancelled() {
            return Err(LeagueError::Cancelled);
        }

        let last_week = total_weeks(self.repo.list_teams().await?.len());
        if week < last_week {
            self.repo.increment_week(season_id).await?;
            audit::log_week_advanced(season_id, week + 1);
            Ok(WeekAdvance::Advanced { week: week + 1 })
        } else {
            self.repo.complete_season(season_id).await?;
            audit::log_season_event(season_id, "completed", &format!("after week {}", week));
            Ok(WeekAdvance::SeasonComplete { season_id })
        }
    }
}
