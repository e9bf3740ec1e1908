//! Double round-robin fixture generation (circle method).

use std::collections::HashSet;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::audit;

use super::{
    error::{LeagueError, LeagueResult},
    manager::LeagueManager,
    repository::LeagueRepository,
};

/// One scheduled pairing before it is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Pairing {
    pub week: i64,
    pub home_team_id: i64,
    pub guest_team_id: i64,
}

impl Pairing {
    fn mirrored(&self, weeks_per_half: i64) -> Self {
        Self {
            week: self.week + weeks_per_half,
            home_team_id: self.guest_team_id,
            guest_team_id: self.home_team_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FixtureSummary {
    pub season_id: i64,
    /// Fixtures written by this call (0 when the schedule already existed)
    pub created: usize,
    pub total: i64,
    pub total_weeks: i64,
}

/// Number of match weeks in a season for `team_count` teams.
///
/// Odd rosters are padded with a bye, so 3 teams play over 6 weeks.
pub fn total_weeks(team_count: usize) -> i64 {
    if team_count < 2 {
        return 0;
    }
    let padded = team_count + team_count % 2;
    2 * (padded as i64 - 1)
}

/// Builds the full home-and-away schedule for `team_ids`.
///
/// Weeks `1..n` come from rotating every slot but the first; weeks
/// `n..2(n-1)` repeat them with home and guest swapped. Pairings against
/// the bye are dropped.
pub fn double_round_robin(team_ids: &[i64]) -> LeagueResult<Vec<Pairing>> {
    if team_ids.len() < 2 {
        return Err(LeagueError::InsufficientTeams {
            found: team_ids.len(),
        });
    }

    let mut seen = HashSet::with_capacity(team_ids.len());
    if let Some(dup) = team_ids.iter().find(|id| !seen.insert(**id)) {
        return Err(LeagueError::Validation(format!(
            "Team {} appears more than once in the roster",
            dup
        )));
    }

    let mut slots: Vec<Option<i64>> = team_ids.iter().copied().map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }
    let n = slots.len();
    let rounds = (n - 1) as i64;

    let mut schedule = Vec::with_capacity(n * (n - 1));
    for week in 1..=rounds {
        for i in 0..n / 2 {
            if let (Some(home), Some(guest)) = (slots[i], slots[n - 1 - i]) {
                schedule.push(Pairing {
                    week,
                    home_team_id: home,
                    guest_team_id: guest,
                });
            }
        }

        // Slot 0 stays put; the last slot moves into position 1.
        if let Some(last) = slots.pop() {
            slots.insert(1, last);
        }
    }

    let second_half: Vec<Pairing> = schedule.iter().map(|p| p.mirrored(rounds)).collect();
    schedule.extend(second_half);

    Ok(schedule)
}

impl<R: LeagueRepository> LeagueManager<R> {
    /// Persists the season's schedule unless one already exists, then makes
    /// sure the week cursor is initialised.
    pub async fn generate_fixtures(
        &self,
        season_id: i64,
        cancel: &CancellationToken,
    ) -> LeagueResult<FixtureSummary> {
        let teams = self.repo.list_teams().await?;
        let weeks = total_weeks(teams.len());

        let existing = self.repo.count_fixtures(season_id).await?;
        if existing > 0 {
            tracing::debug!(
                "Season {} already has {} fixtures, skipping generation",
                season_id,
                existing
            );
            self.repo.init_game_state(season_id).await?;
            return Ok(FixtureSummary {
                season_id,
                created: 0,
                total: existing,
                total_weeks: weeks,
            });
        }

        let team_ids: Vec<i64> = teams.iter().map(|t| t.id).collect();
        let pairings = double_round_robin(&team_ids)?;

        if cancel.is_cancelled() {
            return Err(LeagueError::Cancelled);
        }

        let created = self.repo.create_fixtures(season_id, &pairings).await?;
        self.repo.init_game_state(season_id).await?;

        audit::log_fixtures_generated(season_id, created, weeks);

        Ok(FixtureSummary {
            season_id,
            created,
            total: created as i64,
            total_weeks: weeks,
        })
    }
}
