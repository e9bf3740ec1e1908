//! Match outcome sampling and week simulation.

use std::sync::{Mutex, PoisonError};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::{
    audit,
    db::models::{Fixture, MatchResult},
};

use super::{
    constants::{GOAL_SPREAD, HOME_ADVANTAGE},
    error::{LeagueError, LeagueResult},
    manager::LeagueManager,
    repository::{LeagueRepository, MatchCommit},
    week::WeekAdvance,
};

/// Probabilities of a home win and a draw; the guest wins otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomeOdds {
    pub home_win: f64,
    pub draw: f64,
}

impl OutcomeOdds {
    pub fn guest_win(&self) -> f64 {
        (1.0 - self.home_win - self.draw).max(0.0)
    }
}

pub fn outcome_probabilities(home_strength: i64, guest_strength: i64) -> OutcomeOdds {
    let mut hs = home_strength.max(0) as f64;
    let mut total = hs + guest_strength.max(0) as f64;
    if total <= 0.0 {
        // Two zero-strength sides are evenly matched
        hs = 1.0;
        total = 2.0;
    }

    let home_win = (HOME_ADVANTAGE * hs / total).clamp(0.0, 1.0);
    OutcomeOdds {
        home_win,
        draw: (1.0 - home_win) / 2.0,
    }
}

/// Draws an outcome from `odds`, then a score consistent with it.
///
/// Winners score 1..=3 and losers strictly fewer; draws are 0-0 to 2-2.
pub fn sample_score<R: Rng + ?Sized>(rng: &mut R, odds: &OutcomeOdds) -> (i64, i64) {
    let u: f64 = rng.gen();
    if u < odds.home_win {
        let home = 1 + rng.gen_range(0..GOAL_SPREAD);
        (home, rng.gen_range(0..home))
    } else if u < odds.home_win + odds.draw {
        let goals = rng.gen_range(0..GOAL_SPREAD);
        (goals, goals)
    } else {
        let guest = 1 + rng.gen_range(0..GOAL_SPREAD);
        (rng.gen_range(0..guest), guest)
    }
}

/// Owns the PRNG used for every simulated match.
pub struct MatchSimulator {
    rng: Mutex<ChaCha20Rng>,
}

impl MatchSimulator {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(ChaCha20Rng::from_entropy()),
        }
    }

    pub fn simulate(&self, fixture: &Fixture) -> MatchResult {
        let odds = outcome_probabilities(fixture.home_strength, fixture.guest_strength);
        let (home_score, guest_score) = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            sample_score(&mut *rng, &odds)
        };

        MatchResult::decide(
            fixture.id,
            fixture.home_team_id,
            fixture.guest_team_id,
            home_score,
            guest_score,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayedMatch {
    pub match_id: i64,
    pub home_team: String,
    pub guest_team: String,
    pub home_score: i64,
    pub guest_score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekReport {
    pub season_id: i64,
    pub week: i64,
    pub played: Vec<PlayedMatch>,
    /// Matches left unplayed after a transient store failure
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonReport {
    pub season_id: i64,
    pub weeks: Vec<WeekReport>,
    pub final_week: i64,
}

impl SeasonReport {
    pub fn matches_played(&self) -> usize {
        self.weeks.iter().map(|w| w.played.len()).sum()
    }
}

impl<R: LeagueRepository> LeagueManager<R> {
    /// Simulates every unplayed match of the season's current week.
    ///
    /// Each match commits on its own; a week that is already fully played
    /// is left untouched.
    pub async fn play_week(
        &self,
        season_id: i64,
        cancel: &CancellationToken,
    ) -> LeagueResult<WeekReport> {
        let week = self.repo.get_current_week(season_id).await?;
        if self.repo.get_matches_by_week(season_id, week).await?.is_empty() {
            return Err(LeagueError::NoFixtures { week });
        }

        let unplayed = self.repo.get_unplayed_matches_by_week(season_id, week).await?;
        let mut report = WeekReport {
            season_id,
            week,
            played: Vec::with_capacity(unplayed.len()),
            skipped: 0,
        };

        for fixture in unplayed {
            if cancel.is_cancelled() {
                tracing::info!(
                    "Week {} of season {} cancelled after {} match(es)",
                    week,
                    season_id,
                    report.played.len()
                );
                return Err(LeagueError::Cancelled);
            }

            let result = self.simulator.simulate(&fixture);
            let commit = MatchCommit::new(&fixture, result);

            match self.repo.commit_match(&commit).await {
                Ok(true) => {
                    audit::log_match_played(
                        season_id,
                        fixture.id,
                        &fixture.home_team_name,
                        &fixture.guest_team_name,
                        result.home_score,
                        result.guest_score,
                    );
                    report.played.push(PlayedMatch {
                        match_id: fixture.id,
                        home_team: fixture.home_team_name,
                        guest_team: fixture.guest_team_name,
                        home_score: result.home_score,
                        guest_score: result.guest_score,
                    });
                }
                Ok(false) => {
                    tracing::debug!("Match {} was played concurrently, skipping", fixture.id);
                }
                Err(e) if e.is_transient() => {
                    tracing::warn!("Failed to commit match {}: {}", fixture.id, e);
                    report.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }

    /// Plays and advances week by week until the season is complete.
    pub async fn play_all(
        &self,
        season_id: i64,
        cancel: &CancellationToken,
    ) -> LeagueResult<SeasonReport> {
        let mut weeks = Vec::new();
        loop {
            let report = self.play_week(season_id, cancel).await?;
            let week = report.week;
            weeks.push(report);

            match self.next_week(season_id, cancel).await? {
                WeekAdvance::Advanced { .. } => continue,
                WeekAdvance::SeasonComplete { .. } => {
                    return Ok(SeasonReport {
                        season_id,
                        weeks,
                        final_week: week,
                    })
                }
            }
        }
    }
}
