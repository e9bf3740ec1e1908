//! Persistence port for the league engine
//!
//! The engine only talks to storage through [`LeagueRepository`]. Absence is
//! reported as [`LeagueError::NotFound`](super::LeagueError::NotFound); every
//! other store failure is surfaced unchanged as `LeagueError::Database`.
//!
//! Operations that must be atomic are explicit methods (`commit_match`,
//! `overwrite_result`, `create_fixtures`, `set_current_season`,
//! `reset_to_year`). Implementations run each of them in one transaction.

use std::future::Future;

use crate::db::models::{Fixture, MatchResult, NewTeam, Season, Standing, Team};

use super::{error::LeagueResult, fixtures::Pairing, standings::StandingDelta};

/// Everything written when a simulated match is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchCommit {
    pub season_id: i64,
    pub home_team_id: i64,
    pub guest_team_id: i64,
    pub result: MatchResult,
    pub home_delta: StandingDelta,
    pub guest_delta: StandingDelta,
}

impl MatchCommit {
    pub fn new(fixture: &Fixture, result: MatchResult) -> Self {
        let (home_delta, guest_delta) =
            StandingDelta::for_match(result.home_score, result.guest_score);
        Self {
            season_id: fixture.season_id,
            home_team_id: fixture.home_team_id,
            guest_team_id: fixture.guest_team_id,
            result,
            home_delta,
            guest_delta,
        }
    }

    pub fn match_id(&self) -> i64 {
        self.result.match_id
    }
}

pub trait LeagueRepository: Send + Sync {
    // Teams
    fn list_teams(&self) -> impl Future<Output = LeagueResult<Vec<Team>>> + Send;
    fn get_team(&self, team_id: i64) -> impl Future<Output = LeagueResult<Team>> + Send;
    fn get_team_by_name(&self, name: &str) -> impl Future<Output = LeagueResult<Team>> + Send;
    fn create_team(&self, team: &NewTeam) -> impl Future<Output = LeagueResult<Team>> + Send;

    // Seasons and the week cursor
    fn get_season(&self, season_id: i64) -> impl Future<Output = LeagueResult<Season>> + Send;
    fn get_current_season(&self) -> impl Future<Output = LeagueResult<Season>> + Send;
    fn create_season(&self, year: i64) -> impl Future<Output = LeagueResult<Season>> + Send;
    /// Makes `season_id` the only current season.
    fn set_current_season(&self, season_id: i64) -> impl Future<Output = LeagueResult<()>> + Send;
    fn complete_season(&self, season_id: i64) -> impl Future<Output = LeagueResult<()>> + Send;
    /// Creates the season's game state at week 1 unless it already exists.
    fn init_game_state(&self, season_id: i64) -> impl Future<Output = LeagueResult<()>> + Send;
    fn get_current_week(&self, season_id: i64) -> impl Future<Output = LeagueResult<i64>> + Send;
    fn increment_week(&self, season_id: i64) -> impl Future<Output = LeagueResult<()>> + Send;

    // Fixtures
    fn create_fixture(
        &self,
        season_id: i64,
        week: i64,
        home_team_id: i64,
        guest_team_id: i64,
    ) -> impl Future<Output = LeagueResult<i64>> + Send;
    /// Persists a whole schedule or nothing.
    fn create_fixtures(
        &self,
        season_id: i64,
        pairings: &[Pairing],
    ) -> impl Future<Output = LeagueResult<usize>> + Send;
    fn count_fixtures(&self, season_id: i64) -> impl Future<Output = LeagueResult<i64>> + Send;
    fn get_match(&self, match_id: i64) -> impl Future<Output = LeagueResult<Fixture>> + Send;
    fn get_matches_by_week(
        &self,
        season_id: i64,
        week: i64,
    ) -> impl Future<Output = LeagueResult<Vec<Fixture>>> + Send;
    fn get_unplayed_matches_by_week(
        &self,
        season_id: i64,
        week: i64,
    ) -> impl Future<Output = LeagueResult<Vec<Fixture>>> + Send;
    fn all_matches_played_for_week(
        &self,
        season_id: i64,
        week: i64,
    ) -> impl Future<Output = LeagueResult<bool>> + Send;
    fn mark_match_played(&self, match_id: i64) -> impl Future<Output = LeagueResult<()>> + Send;

    // Results
    fn save_result(&self, result: &MatchResult) -> impl Future<Output = LeagueResult<()>> + Send;
    fn get_match_result(
        &self,
        match_id: i64,
    ) -> impl Future<Output = LeagueResult<MatchResult>> + Send;

    // Standings
    fn get_standing(
        &self,
        season_id: i64,
        team_id: i64,
    ) -> impl Future<Output = LeagueResult<Standing>> + Send;
    /// Creates a zero row unless one exists, returning the stored row.
    fn create_standing(
        &self,
        season_id: i64,
        team_id: i64,
    ) -> impl Future<Output = LeagueResult<Standing>> + Send;
    fn update_standing(&self, standing: &Standing) -> impl Future<Output = LeagueResult<()>> + Send;
    fn list_standings(
        &self,
        season_id: i64,
    ) -> impl Future<Output = LeagueResult<Vec<Standing>>> + Send;

    // Atomic units
    /// Writes the result, flips `played` and applies both standings deltas.
    /// Returns `false` without writing anything if the match was already played.
    fn commit_match(&self, commit: &MatchCommit) -> impl Future<Output = LeagueResult<bool>> + Send;
    /// Replaces (or creates) a match result, marks the match played and
    /// stores the given standings rows, creating any that are missing.
    fn overwrite_result(
        &self,
        result: &MatchResult,
        standings: &[Standing],
    ) -> impl Future<Output = LeagueResult<()>> + Send;
    /// Wipes all matches, results, standings and game states, keeps the
    /// roster, and leaves a single current season for `year` at week 1.
    fn reset_to_year(&self, year: i64) -> impl Future<Output = LeagueResult<Season>> + Send;
}
