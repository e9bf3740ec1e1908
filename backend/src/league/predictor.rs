//! Championship Predictor
//!
//! A deterministic heuristic, not a simulation. Season progress
//! `s = current_week / total_weeks` picks one of three scoring curves:
//! - early (`s < 0.3`): mostly budget, every team keeps a floor
//! - mid: strength scaled by how close a team is to the leader
//! - late: strength scaled by the share of the gap a team can still close,
//!   sharpened over the last two weeks
//!
//! Teams that cannot reach the leader's points even by winning out get 0.
//! When nothing is left to play the leader (points, goal difference, then
//! lowest id) gets 1.

use std::collections::HashMap;

use serde::Serialize;

use super::{
    constants::{
        BUDGET_SCALE, EARLY_BASE, EARLY_SEASON_END, EARLY_WEIGHT, LATE_OUT_OF_REACH,
        LATE_SEASON_START, MID_BASE, MID_CATCHUP_WEIGHT, POINTS_FOR_WIN, SHARPEN_WITHIN_WEEKS,
    },
    error::LeagueResult,
    fixtures::total_weeks,
    manager::LeagueManager,
    repository::LeagueRepository,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamForecastInput {
    pub team_id: i64,
    pub name: String,
    pub points: i64,
    pub goal_diff: i64,
    pub remaining_matches: i64,
    pub budget: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChampionshipOdds {
    pub team_id: i64,
    pub team_name: String,
    pub probability: f64,
}

impl ChampionshipOdds {
    pub fn percentage(&self) -> f64 {
        self.probability * 100.0
    }
}

fn season_progress(current_week: i64, total_weeks: i64) -> f64 {
    if total_weeks <= 0 {
        return 1.0;
    }
    (current_week as f64 / total_weeks as f64).clamp(0.0, 1.0)
}

fn team_strength(team: &TeamForecastInput, current_week: i64) -> f64 {
    let max_points_so_far = (current_week * POINTS_FOR_WIN).max(1) as f64;
    (team.budget as f64 / BUDGET_SCALE + team.points as f64 / max_points_so_far) / 2.0
}

fn score(
    team: &TeamForecastInput,
    leader_points: i64,
    progress: f64,
    current_week: i64,
    remaining_weeks: i64,
) -> f64 {
    let strength = team_strength(team, current_week);
    let gap = (leader_points - team.points) as f64;

    if progress < EARLY_SEASON_END {
        EARLY_BASE + EARLY_WEIGHT * strength
    } else if progress < LATE_SEASON_START {
        let max_points_so_far = (current_week * POINTS_FOR_WIN).max(1) as f64;
        let catchup = (1.0 - gap / max_points_so_far).max(0.0);
        strength * (MID_BASE + MID_CATCHUP_WEIGHT * catchup)
    } else {
        let max_gain = (POINTS_FOR_WIN * team.remaining_matches) as f64;
        let mut score = if max_gain < gap {
            strength * LATE_OUT_OF_REACH
        } else if max_gain == 0.0 {
            strength
        } else {
            strength * ((max_gain - gap) / max_gain).powi(2)
        };
        if remaining_weeks <= SHARPEN_WITHIN_WEEKS {
            score = score.powi((3 - remaining_weeks) as i32);
        }
        score
    }
}

/// Computes title odds for every team. Probabilities sum to 1 and come
/// back sorted high to low, ties by team id.
pub fn predict(
    teams: &[TeamForecastInput],
    current_week: i64,
    total_weeks: i64,
) -> Vec<ChampionshipOdds> {
    let Some(leader_points) = teams.iter().map(|t| t.points).max() else {
        return Vec::new();
    };

    let probabilities: Vec<f64> = if teams.iter().all(|t| t.remaining_matches == 0) {
        let leader = teams
            .iter()
            .max_by(|a, b| {
                a.points
                    .cmp(&b.points)
                    .then_with(|| a.goal_diff.cmp(&b.goal_diff))
                    .then_with(|| b.team_id.cmp(&a.team_id))
            })
            .map(|t| t.team_id);
        teams
            .iter()
            .map(|t| if Some(t.team_id) == leader { 1.0 } else { 0.0 })
            .collect()
    } else {
        let progress = season_progress(current_week, total_weeks);
        let remaining_weeks = (total_weeks - current_week).max(0);

        let scores: Vec<Option<f64>> = teams
            .iter()
            .map(|t| {
                let eliminated = t.points + POINTS_FOR_WIN * t.remaining_matches < leader_points;
                (!eliminated)
                    .then(|| score(t, leader_points, progress, current_week, remaining_weeks))
            })
            .collect();
        normalize(&scores)
    };

    let mut odds: Vec<ChampionshipOdds> = teams
        .iter()
        .zip(probabilities)
        .map(|(t, probability)| ChampionshipOdds {
            team_id: t.team_id,
            team_name: t.name.clone(),
            probability,
        })
        .collect();
    odds.sort_by(|a, b| {
        b.probability
            .total_cmp(&a.probability)
            .then_with(|| a.team_id.cmp(&b.team_id))
    });
    odds
}

/// `None` marks an eliminated team. Falls back to a uniform split over
/// the contenders when their scores carry no signal.
fn normalize(scores: &[Option<f64>]) -> Vec<f64> {
    let sum: f64 = scores.iter().flatten().sum();
    if sum > 0.0 && sum.is_finite() {
        return scores.iter().map(|s| s.map_or(0.0, |s| s / sum)).collect();
    }

    let contenders = scores.iter().flatten().count();
    scores
        .iter()
        .map(|s| match s {
            Some(_) => 1.0 / contenders as f64,
            None => 0.0,
        })
        .collect()
}

impl<R: LeagueRepository> LeagueManager<R> {
    /// Title odds for a season from its persisted state.
    pub async fn predict(&self, season_id: i64) -> LeagueResult<Vec<ChampionshipOdds>> {
        let teams = self.repo.list_teams().await?;
        let last_week = total_weeks(teams.len());
        let current_week = self.repo.get_current_week(season_id).await?;

        let standings: HashMap<i64, _> = self
            .repo
            .list_standings(season_id)
            .await?
            .into_iter()
            .map(|s| (s.team_id, s))
            .collect();

        let mut remaining: HashMap<i64, i64> = HashMap::new();
        for week in 1..=last_week {
            for fixture in self.repo.get_matches_by_week(season_id, week).await? {
                if !fixture.played {
                    *remaining.entry(fixture.home_team_id).or_insert(0) += 1;
                    *remaining.entry(fixture.guest_team_id).or_insert(0) += 1;
                }
            }
        }

        let inputs: Vec<TeamForecastInput> = teams
            .into_iter()
            .map(|team| {
                let (points, goal_diff) = standings
                    .get(&team.id)
                    .map_or((0, 0), |s| (s.points, s.goal_diff));
                TeamForecastInput {
                    team_id: team.id,
                    points,
                    goal_diff,
                    remaining_matches: remaining.get(&team.id).copied().unwrap_or(0),
                    budget: team.budget,
                    name: team.name,
                }
            })
            .collect();

        Ok(predict(&inputs, current_week, last_week))
    }
}
