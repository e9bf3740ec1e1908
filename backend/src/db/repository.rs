//! SQLite implementation of the league persistence port.

use sqlx::SqliteConnection;

use crate::{
    db::{
        models::{Fixture, GameState, MatchResult, NewTeam, Season, Standing, Team},
        DbPool,
    },
    league::{
        error::{LeagueError, LeagueResult},
        fixtures::Pairing,
        repository::{LeagueRepository, MatchCommit},
        standings::StandingDelta,
    },
};

const FIXTURE_SELECT: &str = r#"
    SELECT m.id, m.season_id, m.week, m.home_team_id, m.guest_team_id, m.played,
           h.name AS home_team_name, g.name AS guest_team_name,
           h.strength AS home_strength, g.strength AS guest_strength
    FROM matches m
    JOIN teams h ON h.id = m.home_team_id
    JOIN teams g ON g.id = m.guest_team_id
"#;

#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

async fn store_standing(conn: &mut SqliteConnection, standing: &Standing) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO standings (season_id, team_id, points, wins, draws, losses, goal_diff)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(season_id, team_id) DO UPDATE SET
             points = excluded.points, wins = excluded.wins, draws = excluded.draws,
             losses = excluded.losses, goal_diff = excluded.goal_diff",
    )
    .bind(standing.season_id)
    .bind(standing.team_id)
    .bind(standing.points)
    .bind(standing.wins)
    .bind(standing.draws)
    .bind(standing.losses)
    .bind(standing.goal_diff)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn apply_delta(
    conn: &mut SqliteConnection,
    season_id: i64,
    team_id: i64,
    delta: &StandingDelta,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO standings (season_id, team_id) VALUES (?, ?)
         ON CONFLICT(season_id, team_id) DO NOTHING",
    )
    .bind(season_id)
    .bind(team_id)
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        "UPDATE standings
         SET points = points + ?, wins = wins + ?, draws = draws + ?,
             losses = losses + ?, goal_diff = goal_diff + ?
         WHERE season_id = ? AND team_id = ?",
    )
    .bind(delta.points)
    .bind(delta.wins)
    .bind(delta.draws)
    .bind(delta.losses)
    .bind(delta.goal_diff)
    .bind(season_id)
    .bind(team_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn upsert_result(conn: &mut SqliteConnection, result: &MatchResult) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO match_results (match_id, home_score, guest_score, winner_team_id)
         VALUES (?, ?, ?, ?)
         ON CONFLICT(match_id) DO UPDATE SET
             home_score = excluded.home_score,
             guest_score = excluded.guest_score,
             winner_team_id = excluded.winner_team_id",
    )
    .bind(result.match_id)
    .bind(result.home_score)
    .bind(result.guest_score)
    .bind(result.winner_team_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

impl LeagueRepository for SqliteRepository {
    async fn list_teams(&self) -> LeagueResult<Vec<Team>> {
        let teams = sqlx::query_as::<_, Team>("SELECT * FROM teams ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(teams)
    }

    async fn get_team(&self, team_id: i64) -> LeagueResult<Team> {
        sqlx::query_as::<_, Team>("SELECT * FROM teams WHERE id = ?")
            .bind(team_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| LeagueError::not_found(format!("Team {}", team_id)))
    }

    async fn get_team_by_name(&self, name: &str) -> LeagueResult<Team> {
        sqlx::query_as::<_, Team>("SELECT * FROM teams WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| LeagueError::not_found(format!("Team '{}'", name)))
    }

    async fn create_team(&self, team: &NewTeam) -> LeagueResult<Team> {
        let team = sqlx::query_as::<_, Team>(
            "INSERT INTO teams (name, strength, budget) VALUES (?, ?, ?) RETURNING *",
        )
        .bind(&team.name)
        .bind(team.strength)
        .bind(team.budget)
        .fetch_one(&self.pool)
        .await?;
        Ok(team)
    }

    async fn get_season(&self, season_id: i64) -> LeagueResult<Season> {
        sqlx::query_as::<_, Season>("SELECT * FROM seasons WHERE id = ?")
            .bind(season_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| LeagueError::not_found(format!("Season {}", season_id)))
    }

    async fn get_current_season(&self) -> LeagueResult<Season> {
        sqlx::query_as::<_, Season>(
            "SELECT * FROM seasons WHERE is_current = 1 ORDER BY id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| LeagueError::not_found("Current season"))
    }

    async fn create_season(&self, year: i64) -> LeagueResult<Season> {
        let season = sqlx::query_as::<_, Season>(
            "INSERT INTO seasons (year, is_current, is_complete, created_at)
             VALUES (?, 0, 0, ?) RETURNING *",
        )
        .bind(year)
        .bind(Season::created_now())
        .fetch_one(&self.pool)
        .await?;
        Ok(season)
    }

    async fn set_current_season(&self, season_id: i64) -> LeagueResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE seasons SET is_current = 0 WHERE id != ?")
            .bind(season_id)
            .execute(&mut *tx)
            .await?;
        let updated = sqlx::query("UPDATE seasons SET is_current = 1 WHERE id = ?")
            .bind(season_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if updated == 0 {
            return Err(LeagueError::not_found(format!("Season {}", season_id)));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn complete_season(&self, season_id: i64) -> LeagueResult<()> {
        let updated = sqlx::query("UPDATE seasons SET is_complete = 1 WHERE id = ?")
            .bind(season_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        if updated == 0 {
            return Err(LeagueError::not_found(format!("Season {}", season_id)));
        }
        Ok(())
    }

    async fn init_game_state(&self, season_id: i64) -> LeagueResult<()> {
        sqlx::query(
            "INSERT INTO game_states (season_id, current_week) VALUES (?, 1)
             ON CONFLICT(season_id) DO NOTHING",
        )
        .bind(season_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_current_week(&self, season_id: i64) -> LeagueResult<i64> {
        sqlx::query_as::<_, GameState>("SELECT * FROM game_states WHERE season_id = ?")
            .bind(season_id)
            .fetch_optional(&self.pool)
            .await?
            .map(|state| state.current_week)
            .ok_or_else(|| LeagueError::not_found(format!("Game state for season {}", season_id)))
    }

    async fn increment_week(&self, season_id: i64) -> LeagueResult<()> {
        let updated = sqlx::query(
            "UPDATE game_states SET current_week = current_week + 1 WHERE season_id = ?",
        )
        .bind(season_id)
        .execute(&self.pool)
        .await?
        .rows_affected();
        if updated == 0 {
            return Err(LeagueError::not_found(format!(
                "Game state for season {}",
                season_id
            )));
        }
        Ok(())
    }

    async fn create_fixture(
        &self,
        season_id: i64,
        week: i64,
        home_team_id: i64,
        guest_team_id: i64,
    ) -> LeagueResult<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO matches (season_id, week, home_team_id, guest_team_id, played)
             VALUES (?, ?, ?, ?, 0) RETURNING id",
        )
        .bind(season_id)
        .bind(week)
        .bind(home_team_id)
        .bind(guest_team_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn create_fixtures(&self, season_id: i64, pairings: &[Pairing]) -> LeagueResult<usize> {
        let mut tx = self.pool.begin().await?;

        for pairing in pairings {
            sqlx::query(
                "INSERT INTO matches (season_id, week, home_team_id, guest_team_id, played)
                 VALUES (?, ?, ?, ?, 0)",
            )
            .bind(season_id)
            .bind(pairing.week)
            .bind(pairing.home_team_id)
            .bind(pairing.guest_team_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(pairings.len())
    }

    async fn count_fixtures(&self, season_id: i64) -> LeagueResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM matches WHERE season_id = ?")
            .bind(season_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn get_match(&self, match_id: i64) -> LeagueResult<Fixture> {
        let sql = format!("{} WHERE m.id = ?", FIXTURE_SELECT);
        sqlx::query_as::<_, Fixture>(&sql)
            .bind(match_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| LeagueError::not_found(format!("Match {}", match_id)))
    }

    async fn get_matches_by_week(&self, season_id: i64, week: i64) -> LeagueResult<Vec<Fixture>> {
        let sql = format!(
            "{} WHERE m.season_id = ? AND m.week = ? ORDER BY m.id",
            FIXTURE_SELECT
        );
        let fixtures = sqlx::query_as::<_, Fixture>(&sql)
            .bind(season_id)
            .bind(week)
            .fetch_all(&self.pool)
            .await?;
        Ok(fixtures)
    }

    async fn get_unplayed_matches_by_week(
        &self,
        season_id: i64,
        week: i64,
    ) -> LeagueResult<Vec<Fixture>> {
        let sql = format!(
            "{} WHERE m.season_id = ? AND m.week = ? AND m.played = 0 ORDER BY m.id",
            FIXTURE_SELECT
        );
        let fixtures = sqlx::query_as::<_, Fixture>(&sql)
            .bind(season_id)
            .bind(week)
            .fetch_all(&self.pool)
            .await?;
        Ok(fixtures)
    }

    async fn all_matches_played_for_week(&self, season_id: i64, week: i64) -> LeagueResult<bool> {
        let unplayed = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM matches WHERE season_id = ? AND week = ? AND played = 0",
        )
        .bind(season_id)
        .bind(week)
        .fetch_one(&self.pool)
        .await?;
        Ok(unplayed == 0)
    }

    async fn mark_match_played(&self, match_id: i64) -> LeagueResult<()> {
        let updated = sqlx::query("UPDATE matches SET played = 1 WHERE id = ?")
            .bind(match_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        if updated == 0 {
            return Err(LeagueError::not_found(format!("Match {}", match_id)));
        }
        Ok(())
    }

    async fn save_result(&self, result: &MatchResult) -> LeagueResult<()> {
        let mut conn = self.pool.acquire().await?;
        upsert_result(&mut conn, result).await?;
        Ok(())
    }

    async fn get_match_result(&self, match_id: i64) -> LeagueResult<MatchResult> {
        sqlx::query_as::<_, MatchResult>("SELECT * FROM match_results WHERE match_id = ?")
            .bind(match_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| LeagueError::not_found(format!("Result for match {}", match_id)))
    }

    async fn get_standing(&self, season_id: i64, team_id: i64) -> LeagueResult<Standing> {
        sqlx::query_as::<_, Standing>(
            "SELECT * FROM standings WHERE season_id = ? AND team_id = ?",
        )
        .bind(season_id)
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            LeagueError::not_found(format!("Standing for team {} in season {}", team_id, season_id))
        })
    }

    async fn create_standing(&self, season_id: i64, team_id: i64) -> LeagueResult<Standing> {
        sqlx::query(
            "INSERT INTO standings (season_id, team_id) VALUES (?, ?)
             ON CONFLICT(season_id, team_id) DO NOTHING",
        )
        .bind(season_id)
        .bind(team_id)
        .execute(&self.pool)
        .await?;

        self.get_standing(season_id, team_id).await
    }

    async fn update_standing(&self, standing: &Standing) -> LeagueResult<()> {
        let updated = sqlx::query(
            "UPDATE standings
             SET points = ?, wins = ?, draws = ?, losses = ?, goal_diff = ?
             WHERE season_id = ? AND team_id = ?",
        )
        .bind(standing.points)
        .bind(standing.wins)
        .bind(standing.draws)
        .bind(standing.losses)
        .bind(standing.goal_diff)
        .bind(standing.season_id)
        .bind(standing.team_id)
        .execute(&self.pool)
        .await?
        .rows_affected();
        if updated == 0 {
            return Err(LeagueError::not_found(format!(
                "Standing for team {} in season {}",
                standing.team_id, standing.season_id
            )));
        }
        Ok(())
    }

    async fn list_standings(&self, season_id: i64) -> LeagueResult<Vec<Standing>> {
        let standings = sqlx::query_as::<_, Standing>(
            "SELECT * FROM standings WHERE season_id = ? ORDER BY team_id",
        )
        .bind(season_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(standings)
    }

    async fn commit_match(&self, commit: &MatchCommit) -> LeagueResult<bool> {
        let mut tx = self.pool.begin().await?;

        let flipped = sqlx::query("UPDATE matches SET played = 1 WHERE id = ? AND played = 0")
            .bind(commit.match_id())
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if flipped == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            "INSERT INTO match_results (match_id, home_score, guest_score, winner_team_id)
             VALUES (?, ?, ?, ?)",
        )
        .bind(commit.result.match_id)
        .bind(commit.result.home_score)
        .bind(commit.result.guest_score)
        .bind(commit.result.winner_team_id)
        .execute(&mut *tx)
        .await?;

        apply_delta(&mut tx, commit.season_id, commit.home_team_id, &commit.home_delta).await?;
        apply_delta(&mut tx, commit.season_id, commit.guest_team_id, &commit.guest_delta).await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn overwrite_result(
        &self,
        result: &MatchResult,
        standings: &[Standing],
    ) -> LeagueResult<()> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE matches SET played = 1 WHERE id = ?")
            .bind(result.match_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if updated == 0 {
            return Err(LeagueError::not_found(format!("Match {}", result.match_id)));
        }
        upsert_result(&mut tx, result).await?;
        for standing in standings {
            store_standing(&mut tx, standing).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn reset_to_year(&self, year: i64) -> LeagueResult<Season> {
        let mut tx = self.pool.begin().await?;

        for statement in [
            "DELETE FROM match_results",
            "DELETE FROM matches",
            "DELETE FROM standings",
            "DELETE FROM game_states",
        ] {
            sqlx::query(statement).execute(&mut *tx).await?;
        }

        sqlx::query("DELETE FROM seasons WHERE year != ?")
            .bind(year)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "DELETE FROM seasons WHERE year = ? AND id != (SELECT MIN(id) FROM seasons WHERE year = ?)",
        )
        .bind(year)
        .bind(year)
        .execute(&mut *tx)
        .await?;

        let existing = sqlx::query_scalar::<_, i64>("SELECT id FROM seasons WHERE year = ?")
            .bind(year)
            .fetch_optional(&mut *tx)
            .await?;
        let season_id = match existing {
            Some(id) => id,
            None => {
                sqlx::query_scalar::<_, i64>(
                    "INSERT INTO seasons (year, is_current, is_complete, created_at)
                     VALUES (?, 0, 0, ?) RETURNING id",
                )
                .bind(year)
                .bind(Season::created_now())
                .fetch_one(&mut *tx)
                .await?
            }
        };

        sqlx::query("UPDATE seasons SET is_current = 1, is_complete = 0 WHERE id = ?")
            .bind(season_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("INSERT INTO game_states (season_id, current_week) VALUES (?, 1)")
            .bind(season_id)
            .execute(&mut *tx)
            .await?;

        let season = sqlx::query_as::<_, Season>("SELECT * FROM seasons WHERE id = ?")
            .bind(season_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(season)
    }
}
