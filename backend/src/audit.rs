//! Structured audit logging for league state changes.
//!
//! Every event that alters persisted league state is logged under the
//! `audit` target with structured fields.

/// Log a freshly generated schedule
pub fn log_fixtures_generated(season_id: i64, matches: usize, weeks: i64) {
    tracing::info!(
        target: "audit",
        event = "fixtures_generated",
        season_id = season_id,
        matches = matches,
        weeks = weeks,
        "Generated {} fixtures over {} weeks for season {}",
        matches,
        weeks,
        season_id
    );
}

/// Log a simulated match
pub fn log_match_played(
    season_id: i64,
    match_id: i64,
    home_team: &str,
    guest_team: &str,
    home_score: i64,
    guest_score: i64,
) {
    tracing::info!(
        target: "audit",
        event = "match_played",
        season_id = season_id,
        match_id = match_id,
        home_score = home_score,
        guest_score = guest_score,
        "Match {}: {} {}-{} {}",
        match_id,
        home_team,
        home_score,
        guest_score,
        guest_team
    );
}

/// Log a manual score override
pub fn log_result_edited(season_id: i64, match_id: i64, home_score: i64, guest_score: i64) {
    tracing::info!(
        target: "audit",
        event = "result_edited",
        season_id = season_id,
        match_id = match_id,
        home_score = home_score,
        guest_score = guest_score,
        "Result of match {} set to {}-{}",
        match_id,
        home_score,
        guest_score
    );
}

pub fn log_week_advanced(season_id: i64, week: i64) {
    tracing::info!(
        target: "audit",
        event = "week_advanced",
        season_id = season_id,
        week = week,
        "Season {} advanced to week {}",
        season_id,
        week
    );
}

/// Log a season lifecycle event (started, reset, completed)
pub fn log_season_event(season_id: i64, event: &str, details: &str) {
    tracing::info!(
        target: "audit",
        event = "season",
        season_id = season_id,
        season_event = event,
        details = details,
        "Season {}: {} - {}",
        season_id,
        event,
        details
    );
}

pub fn log_standings_recalculated(season_id: i64, teams: usize) {
    tracing::info!(
        target: "audit",
        event = "standings_recalculated",
        season_id = season_id,
        teams = teams,
        "Recalculated standings for {} teams in season {}",
        teams,
        season_id
    );
}
