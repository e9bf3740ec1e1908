use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub strength: i64,
    pub budget: i64,
}

/// Roster entry used when seeding teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTeam {
    pub name: String,
    pub strength: i64,
    pub budget: i64,
}

impl NewTeam {
    pub fn new(name: impl Into<String>, strength: i64, budget: i64) -> Self {
        Self {
            name: name.into(),
            strength,
            budget,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Season {
    pub id: i64,
    pub year: i64,
    pub is_current: bool,
    pub is_complete: bool,
    pub created_at: String,
}

impl Season {
    pub fn created_now() -> String {
        Utc::now().to_rfc3339()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct GameState {
    pub season_id: i64,
    pub current_week: i64,
}

/// A scheduled match joined with both teams' names and strengths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Fixture {
    pub id: i64,
    pub season_id: i64,
    pub week: i64,
    pub home_team_id: i64,
    pub guest_team_id: i64,
    pub played: bool,
    pub home_team_name: String,
    pub guest_team_name: String,
    pub home_strength: i64,
    pub guest_strength: i64,
}

impl Fixture {
    pub fn involves(&self, team_id: i64) -> bool {
        self.home_team_id == team_id || self.guest_team_id == team_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MatchResult {
    pub match_id: i64,
    pub home_score: i64,
    pub guest_score: i64,
    pub winner_team_id: Option<i64>,
}

impl MatchResult {
    /// Builds a result whose winner agrees with the score comparison.
    pub fn decide(
        match_id: i64,
        home_team_id: i64,
        guest_team_id: i64,
        home_score: i64,
        guest_score: i64,
    ) -> Self {
        let winner_team_id = match home_score.cmp(&guest_score) {
            std::cmp::Ordering::Greater => Some(home_team_id),
            std::cmp::Ordering::Less => Some(guest_team_id),
            std::cmp::Ordering::Equal => None,
        };
        Self {
            match_id,
            home_score,
            guest_score,
            winner_team_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Standing {
    pub season_id: i64,
    pub team_id: i64,
    pub points: i64,
    pub wins: i64,
    pub draws: i64,
    pub losses: i64,
    pub goal_diff: i64,
}

impl Standing {
    pub fn zeroed(season_id: i64, team_id: i64) -> Self {
        Self {
            season_id,
            team_id,
            points: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            goal_diff: 0,
        }
    }

    pub fn played(&self) -> i64 {
        self.wins + self.draws + self.losses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decide_winner_follows_score() {
        assert_eq!(MatchResult::decide(1, 10, 20, 2, 1).winner_team_id, Some(10));
        assert_eq!(MatchResult::decide(1, 10, 20, 0, 3).winner_team_id, Some(20));
        assert_eq!(MatchResult::decide(1, 10, 20, 1, 1).winner_team_id, None);
    }

    #[test]
    fn test_zeroed_standing_has_no_games() {
        let standing = Standing::zeroed(3, 7);
        assert_eq!(standing.played(), 0);
        assert_eq!(standing.points, 0);
        assert_eq!(standing.team_id, 7);
    }
}
