//! Standings rules, recomputation and manual result edits.

use std::{cmp::Ordering, collections::HashMap};

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::{
    audit,
    db::models::{MatchResult, Standing, Team},
};

use super::{
    constants::{MAX_EDITED_GOALS, POINTS_FOR_DRAW, POINTS_FOR_WIN},
    error::{LeagueError, LeagueResult},
    fixtures::total_weeks,
    manager::LeagueManager,
    repository::LeagueRepository,
};

/// Change to one team's standing caused by a single match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StandingDelta {
    pub points: i64,
    pub wins: i64,
    pub draws: i64,
    pub losses: i64,
    pub goal_diff: i64,
}

impl StandingDelta {
    /// Returns the (home, guest) deltas for a final score.
    pub fn for_match(home_score: i64, guest_score: i64) -> (Self, Self) {
        let margin = home_score - guest_score;
        match home_score.cmp(&guest_score) {
            Ordering::Greater => (Self::win(margin), Self::loss(-margin)),
            Ordering::Less => (Self::loss(margin), Self::win(-margin)),
            Ordering::Equal => (Self::draw(), Self::draw()),
        }
    }

    fn win(margin: i64) -> Self {
        Self {
            points: POINTS_FOR_WIN,
            wins: 1,
            goal_diff: margin,
            ..Self::default()
        }
    }

    fn loss(margin: i64) -> Self {
        Self {
            losses: 1,
            goal_diff: margin,
            ..Self::default()
        }
    }

    fn draw() -> Self {
        Self {
            points: POINTS_FOR_DRAW,
            draws: 1,
            ..Self::default()
        }
    }
}

impl Standing {
    /// Adds a match delta, failing instead of wrapping on overflow.
    pub fn apply(&mut self, delta: &StandingDelta) -> LeagueResult<()> {
        let add = |total: i64, change: i64| {
            total.checked_add(change).ok_or_else(|| {
                LeagueError::ContractViolation(format!(
                    "Standing for team {} in season {} overflows",
                    self.team_id, self.season_id
                ))
            })
        };
        let next = Standing {
            points: add(self.points, delta.points)?,
            wins: add(self.wins, delta.wins)?,
            draws: add(self.draws, delta.draws)?,
            losses: add(self.losses, delta.losses)?,
            goal_diff: add(self.goal_diff, delta.goal_diff)?,
            ..*self
        };
        *self = next;
        Ok(())
    }
}

/// A league table line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub position: usize,
    pub team: Team,
    pub standing: Standing,
}

impl TableRow {
    pub fn played(&self) -> i64 {
        self.standing.played()
    }
}

/// Points desc, goal difference desc, then team id. The predictor picks a
/// finished season's champion with the same order.
pub fn table_order(a: &TableRow, b: &TableRow) -> Ordering {
    b.standing
        .points
        .cmp(&a.standing.points)
        .then_with(|| b.standing.goal_diff.cmp(&a.standing.goal_diff))
        .then_with(|| a.team.id.cmp(&b.team.id))
}

impl<R: LeagueRepository> LeagueManager<R> {
    /// Rebuilds one team's standing from every played result of the season
    /// and stores it.
    pub async fn recompute(&self, season_id: i64, team_id: i64) -> LeagueResult<Standing> {
        let standing = self.fold_standing(season_id, team_id, None).await?;

        self.repo.create_standing(season_id, team_id).await?;
        self.repo.update_standing(&standing).await?;

        tracing::debug!(
            "Recomputed standing for team {} in season {}: {} pts",
            team_id,
            season_id,
            standing.points
        );
        Ok(standing)
    }

    /// Folds the season's played results for one team. `edited` stands in
    /// for the stored result of its match, played or not.
    async fn fold_standing(
        &self,
        season_id: i64,
        team_id: i64,
        edited: Option<&MatchResult>,
    ) -> LeagueResult<Standing> {
        // Fails with NotFound for unknown teams
        self.repo.get_team(team_id).await?;
        let weeks = total_weeks(self.repo.list_teams().await?.len());

        let mut standing = Standing::zeroed(season_id, team_id);
        for week in 1..=weeks {
            let fixtures = self.repo.get_matches_by_week(season_id, week).await?;
            for fixture in fixtures.iter().filter(|f| f.involves(team_id)) {
                let result = match edited {
                    Some(result) if result.match_id == fixture.id => *result,
                    _ if !fixture.played => continue,
                    _ => match self.repo.get_match_result(fixture.id).await {
                        Ok(result) => result,
                        Err(e) if e.is_not_found() => {
                            return Err(LeagueError::ContractViolation(format!(
                                "Match {} is marked played but has no result",
                                fixture.id
                            )))
                        }
                        Err(e) => return Err(e),
                    },
                };

                let (home, guest) = StandingDelta::for_match(result.home_score, result.guest_score);
                if fixture.home_team_id == team_id {
                    standing.apply(&home)?;
                } else {
                    standing.apply(&guest)?;
                }
            }
        }
        Ok(standing)
    }

    /// Recomputes every team in the season.
    pub async fn recompute_all(
        &self,
        season_id: i64,
        cancel: &CancellationToken,
    ) -> LeagueResult<Vec<Standing>> {
        let teams = self.repo.list_teams().await?;
        let mut standings = Vec::with_capacity(teams.len());
        for team in &teams {
            if cancel.is_cancelled() {
                return Err(LeagueError::Cancelled);
            }
            standings.push(self.recompute(season_id, team.id).await?);
        }

        audit::log_standings_recalculated(season_id, standings.len());
        Ok(standings)
    }

    /// Returns the sorted table, creating zero rows for teams without one.
    pub async fn league_table(&self, season_id: i64) -> LeagueResult<Vec<TableRow>> {
        let teams = self.repo.list_teams().await?;
        let mut stored: HashMap<i64, Standing> = self
            .repo
            .list_standings(season_id)
            .await?
            .into_iter()
            .map(|s| (s.team_id, s))
            .collect();

        let mut rows = Vec::with_capacity(teams.len());
        for team in teams {
            let standing = match stored.remove(&team.id) {
                Some(standing) => standing,
                None => self.repo.create_standing(season_id, team.id).await?,
            };
            rows.push(TableRow {
                position: 0,
                team,
                standing,
            });
        }

        rows.sort_by(table_order);
        for (i, row) in rows.iter_mut().enumerate() {
            row.position = i + 1;
        }
        Ok(rows)
    }

    /// Overwrites a match score and rebuilds both teams' standings in one
    /// write.
    ///
    /// Only matches of `season_id` up to its current week can be edited;
    /// anything else reports `NotFound`.
    pub async fn edit_result(
        &self,
        season_id: i64,
        match_id: i64,
        home_score: i64,
        guest_score: i64,
        cancel: &CancellationToken,
    ) -> LeagueResult<MatchResult> {
        if home_score < 0 || guest_score < 0 {
            return Err(LeagueError::Validation(
                "Scores must be non-negative".to_string(),
            ));
        }
        if home_score > MAX_EDITED_GOALS || guest_score > MAX_EDITED_GOALS {
            return Err(LeagueError::Validation(format!(
                "Scores must be at most {}",
                MAX_EDITED_GOALS
            )));
        }

        let fixture = self.repo.get_match(match_id).await?;
        let current_week = self.repo.get_current_week(season_id).await?;
        if fixture.season_id != season_id || fixture.week > current_week {
            return Err(LeagueError::not_found(format!("Match {}", match_id)));
        }

        if cancel.is_cancelled() {
            return Err(LeagueError::Cancelled);
        }

        let result = MatchResult::decide(
            fixture.id,
            fixture.home_team_id,
            fixture.guest_team_id,
            home_score,
            guest_score,
        );
        let home = self
            .fold_standing(season_id, fixture.home_team_id, Some(&result))
            .await?;
        let guest = self
            .fold_standing(season_id, fixture.guest_team_id, Some(&result))
            .await?;

        self.repo.overwrite_result(&result, &[home, guest]).await?;
        audit::log_result_edited(season_id, match_id, home_score, guest_score);

        Ok(result)
    }
}
