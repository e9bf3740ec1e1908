//! Integration tests for the SQLite repository

use league_server::{
    create_test_db,
    db::{
        self,
        models::{Fixture, MatchResult, NewTeam, Standing},
        SqliteRepository,
    },
    league::{LeagueRepository, MatchCommit},
};

async fn setup() -> SqliteRepository {
    let pool = create_test_db().await;
    db::seed_teams(&pool).await.unwrap();
    SqliteRepository::new(pool)
}

async fn season_with_match(repo: &SqliteRepository) -> (i64, Fixture) {
    let season = repo.create_season(2025).await.unwrap();
    repo.set_current_season(season.id).await.unwrap();
    repo.init_game_state(season.id).await.unwrap();

    let teams = repo.list_teams().await.unwrap();
    let match_id = repo
        .create_fixture(season.id, 1, teams[0].id, teams[1].id)
        .await
        .unwrap();
    (season.id, repo.get_match(match_id).await.unwrap())
}

#[tokio::test]
async fn test_seeded_roster() {
    let repo = setup().await;

    let teams = repo.list_teams().await.unwrap();
    assert_eq!(teams.len(), 4);

    let city = repo.get_team_by_name("Manchester City").await.unwrap();
    assert_eq!(city.strength, 90);
    assert_eq!(city.budget, 1_000_000);
    assert_eq!(repo.get_team(city.id).await.unwrap(), city);

    assert!(repo.get_team_by_name("Everton").await.unwrap_err().is_not_found());
    assert!(repo.get_team(999).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_seeding_twice_keeps_roster() {
    let pool = create_test_db().await;
    db::seed_teams(&pool).await.unwrap();
    db::seed_teams(&pool).await.unwrap();

    let repo = SqliteRepository::new(pool);
    assert_eq!(repo.list_teams().await.unwrap().len(), 4);

    let team = repo
        .create_team(&NewTeam::new("Everton", 70, 600_000))
        .await
        .unwrap();
    assert_eq!(repo.get_team_by_name("Everton").await.unwrap().id, team.id);
}

#[tokio::test]
async fn test_current_season_is_exclusive() {
    let repo = setup().await;
    assert!(repo.get_current_season().await.unwrap_err().is_not_found());

    let first = repo.create_season(2025).await.unwrap();
    let second = repo.create_season(2026).await.unwrap();
    assert!(!first.is_current);

    repo.set_current_season(first.id).await.unwrap();
    assert_eq!(repo.get_current_season().await.unwrap().id, first.id);

    repo.set_current_season(second.id).await.unwrap();
    assert_eq!(repo.get_current_season().await.unwrap().id, second.id);
    assert!(!repo.get_season(first.id).await.unwrap().is_current);

    assert!(repo.set_current_season(999).await.unwrap_err().is_not_found());
    // A failed switch leaves the current season alone
    assert_eq!(repo.get_current_season().await.unwrap().id, second.id);
}

#[tokio::test]
async fn test_week_cursor() {
    let repo = setup().await;
    let season = repo.create_season(2025).await.unwrap();

    assert!(repo.get_current_week(season.id).await.unwrap_err().is_not_found());

    repo.init_game_state(season.id).await.unwrap();
    repo.increment_week(season.id).await.unwrap();
    // Re-initialising does not rewind the cursor
    repo.init_game_state(season.id).await.unwrap();
    assert_eq!(repo.get_current_week(season.id).await.unwrap(), 2);

    repo.complete_season(season.id).await.unwrap();
    assert!(repo.get_season(season.id).await.unwrap().is_complete);
}

#[tokio::test]
async fn test_fixture_queries() {
    let repo = setup().await;
    let (season_id, fixture) = season_with_match(&repo).await;

    assert_eq!(fixture.week, 1);
    assert!(!fixture.played);
    assert_eq!(fixture.home_team_name, "Manchester City");
    assert_eq!(fixture.guest_team_name, "Liverpool");
    assert_eq!((fixture.home_strength, fixture.guest_strength), (90, 85));

    assert_eq!(repo.count_fixtures(season_id).await.unwrap(), 1);
    assert_eq!(repo.get_unplayed_matches_by_week(season_id, 1).await.unwrap().len(), 1);
    assert!(!repo.all_matches_played_for_week(season_id, 1).await.unwrap());
    assert!(repo.get_matches_by_week(season_id, 2).await.unwrap().is_empty());

    repo.save_result(&MatchResult::decide(fixture.id, fixture.home_team_id, fixture.guest_team_id, 2, 2))
        .await
        .unwrap();
    repo.mark_match_played(fixture.id).await.unwrap();

    assert!(repo.all_matches_played_for_week(season_id, 1).await.unwrap());
    assert!(repo.get_unplayed_matches_by_week(season_id, 1).await.unwrap().is_empty());
    assert_eq!(repo.get_match_result(fixture.id).await.unwrap().winner_team_id, None);
}

#[tokio::test]
async fn test_commit_match_applies_once() {
    let repo = setup().await;
    let (season_id, fixture) = season_with_match(&repo).await;

    let result = MatchResult::decide(fixture.id, fixture.home_team_id, fixture.guest_team_id, 3, 1);
    let commit = MatchCommit::new(&fixture, result);

    assert!(repo.commit_match(&commit).await.unwrap());
    assert!(!repo.commit_match(&commit).await.unwrap());

    let home = repo.get_standing(season_id, fixture.home_team_id).await.unwrap();
    let guest = repo.get_standing(season_id, fixture.guest_team_id).await.unwrap();
    assert_eq!((home.points, home.wins, home.goal_diff), (3, 1, 2));
    assert_eq!((guest.points, guest.losses, guest.goal_diff), (0, 1, -2));

    assert!(repo.get_match(fixture.id).await.unwrap().played);
    assert_eq!(repo.get_match_result(fixture.id).await.unwrap(), result);
}

#[tokio::test]
async fn test_failed_commit_rolls_back() {
    let repo = setup().await;
    let (season_id, fixture) = season_with_match(&repo).await;

    // A stray result makes the commit's insert fail after `played` flipped
    repo.save_result(&MatchResult::decide(fixture.id, fixture.home_team_id, fixture.guest_team_id, 0, 0))
        .await
        .unwrap();

    let result = MatchResult::decide(fixture.id, fixture.home_team_id, fixture.guest_team_id, 1, 0);
    let err = repo
        .commit_match(&MatchCommit::new(&fixture, result))
        .await
        .unwrap_err();
    assert!(err.is_transient());

    assert!(!repo.get_match(fixture.id).await.unwrap().played);
    assert!(repo.list_standings(season_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_standing_rows() {
    let repo = setup().await;
    let season = repo.create_season(2025).await.unwrap();
    let team = repo.list_teams().await.unwrap()[0].clone();

    assert!(repo.get_standing(season.id, team.id).await.unwrap_err().is_not_found());

    let mut standing = repo.create_standing(season.id, team.id).await.unwrap();
    assert_eq!(standing.played(), 0);

    standing.points = 4;
    standing.wins = 1;
    standing.draws = 1;
    repo.update_standing(&standing).await.unwrap();

    // Creating again keeps the stored row
    assert_eq!(repo.create_standing(season.id, team.id).await.unwrap(), standing);
    assert_eq!(repo.list_standings(season.id).await.unwrap(), vec![standing]);
}

#[tokio::test]
async fn test_overwrite_result_marks_played() {
    let repo = setup().await;
    let (season_id, fixture) = season_with_match(&repo).await;

    let first = MatchResult::decide(fixture.id, fixture.home_team_id, fixture.guest_team_id, 1, 2);
    repo.overwrite_result(&first, &[]).await.unwrap();

    let second = MatchResult::decide(fixture.id, fixture.home_team_id, fixture.guest_team_id, 4, 0);
    let home = Standing {
        points: 3,
        wins: 1,
        goal_diff: 4,
        ..Standing::zeroed(season_id, fixture.home_team_id)
    };
    let guest = Standing {
        losses: 1,
        goal_diff: -4,
        ..Standing::zeroed(season_id, fixture.guest_team_id)
    };
    repo.overwrite_result(&second, &[home, guest]).await.unwrap();

    assert!(repo.get_match(fixture.id).await.unwrap().played);
    assert_eq!(repo.get_match_result(fixture.id).await.unwrap(), second);
    assert_eq!(repo.get_standing(season_id, fixture.home_team_id).await.unwrap(), home);
    assert_eq!(repo.get_standing(season_id, fixture.guest_team_id).await.unwrap(), guest);

    let missing = MatchResult::decide(999, 1, 2, 1, 0);
    assert!(repo.overwrite_result(&missing, &[]).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_failed_overwrite_rolls_back() {
    let repo = setup().await;
    let (season_id, fixture) = season_with_match(&repo).await;

    // The second row points at a season that does not exist
    let result = MatchResult::decide(fixture.id, fixture.home_team_id, fixture.guest_team_id, 2, 0);
    let rows = [
        Standing {
            points: 3,
            ..Standing::zeroed(season_id, fixture.home_team_id)
        },
        Standing::zeroed(999, fixture.guest_team_id),
    ];
    let err = repo.overwrite_result(&result, &rows).await.unwrap_err();
    assert!(err.is_transient());

    assert!(!repo.get_match(fixture.id).await.unwrap().played);
    assert!(repo.get_match_result(fixture.id).await.unwrap_err().is_not_found());
    assert!(repo.list_standings(season_id).await.unwrap().is_empty());
}
