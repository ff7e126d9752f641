//! Tests for database repository operations.

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::NamedTempFile;

use mastermind::{GameRecordUpdate, GameRepository, NewGameRecord, StoredStatus};

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready repository.
fn setup_test_db() -> (NamedTempFile, GameRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let repo = GameRepository::open(db_path).expect("Failed to open repository");
    (db_file, repo)
}

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 14)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .expect("Valid timestamp")
}

fn in_progress(secret: &str, started_at: NaiveDateTime) -> NewGameRecord {
    NewGameRecord::new(
        secret.to_string(),
        10,
        4,
        7,
        StoredStatus::InProgress.to_db_string().to_string(),
        started_at,
        None,
        "[]".to_string(),
    )
}

#[test]
fn test_new_rejects_empty_path() {
    assert!(GameRepository::new("  ".to_string()).is_err());
}

#[test]
fn test_migrations_apply_once() {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let repo = GameRepository::new(db_path).expect("Failed to create repository");

    assert_eq!(repo.run_migrations().expect("First run failed"), 1);
    assert_eq!(repo.run_migrations().expect("Second run failed"), 0);
}

#[test]
fn test_save_game() {
    let (_db, repo) = setup_test_db();
    let saved = repo
        .save_game(in_progress("1 2 3 4", at(10, 0)))
        .expect("Save failed");

    assert!(*saved.id() > 0);
    assert_eq!(saved.secret_code(), "1 2 3 4");
    assert_eq!(*saved.started_at(), at(10, 0));
    assert!(saved.completed_at().is_none());
    assert_eq!(
        saved.parse_status().expect("Known status"),
        StoredStatus::InProgress
    );
}

#[test]
fn test_unknown_status_rejected_by_schema() {
    let (_db, repo) = setup_test_db();
    let record = NewGameRecord::new(
        "1 2 3 4".to_string(),
        10,
        4,
        7,
        "PAUSED".to_string(),
        at(10, 0),
        None,
        "[]".to_string(),
    );
    assert!(repo.save_game(record).is_err());
}

#[test]
fn test_last_game_empty() {
    let (_db, repo) = setup_test_db();
    assert!(repo.last_game().expect("Query failed").is_none());
    assert!(!repo.is_last_game_incomplete().expect("Query failed"));
}

#[test]
fn test_last_game_is_newest_started() {
    let (_db, repo) = setup_test_db();
    repo.save_game(in_progress("5 5 5 5", at(12, 0)))
        .expect("Save failed");
    // Inserted later but started earlier.
    repo.save_game(in_progress("1 1 1 1", at(9, 0)))
        .expect("Save failed");

    let last = repo.last_game().expect("Query failed").expect("Game exists");
    assert_eq!(last.secret_code(), "5 5 5 5");
}

#[test]
fn test_last_game_tie_broken_by_id() {
    let (_db, repo) = setup_test_db();
    repo.save_game(in_progress("1 1 1 1", at(9, 0)))
        .expect("Save failed");
    let second = repo
        .save_game(in_progress("2 2 2 2", at(9, 0)))
        .expect("Save failed");

    let last = repo.last_game().expect("Query failed").expect("Game exists");
    assert_eq!(last.id(), second.id());
}

#[test]
fn test_update_game() {
    let (_db, repo) = setup_test_db();
    let saved = repo
        .save_game(in_progress("1 2 3 4", at(10, 0)))
        .expect("Save failed");
    assert!(repo.is_last_game_incomplete().expect("Query failed"));

    let guesses = r#"[{"guess_text":"1 2 3 4","exact_matches":4,"value_matches":4,"is_win":true}]"#;
    let updated = repo
        .update_game(
            *saved.id(),
            GameRecordUpdate::new(
                StoredStatus::Won.to_db_string().to_string(),
                Some(at(10, 5)),
                guesses.to_string(),
            ),
        )
        .expect("Update failed");

    assert_eq!(updated.id(), saved.id());
    assert_eq!(updated.status(), "WON");
    assert_eq!(*updated.completed_at(), Some(at(10, 5)));
    assert_eq!(updated.guesses().expect("Decodes").len(), 1);
    assert!(!repo.is_last_game_incomplete().expect("Query failed"));
}

#[test]
fn test_update_none_clears_completed_at() {
    let (_db, repo) = setup_test_db();
    let saved = repo
        .save_game(in_progress("1 2 3 4", at(10, 0)))
        .expect("Save failed");
    let id = *saved.id();

    repo.update_game(
        id,
        GameRecordUpdate::new("LOST".to_string(), Some(at(11, 0)), "[]".to_string()),
    )
    .expect("Update failed");
    let reopened = repo
        .update_game(
            id,
            GameRecordUpdate::new("IN_PROGRESS".to_string(), None, "[]".to_string()),
        )
        .expect("Update failed");

    assert!(reopened.completed_at().is_none());
}

#[test]
fn test_update_missing_game_fails() {
    let (_db, repo) = setup_test_db();
    let result = repo.update_game(
        999,
        GameRecordUpdate::new("WON".to_string(), None, "[]".to_string()),
    );
    assert!(result.is_err(), "Updating a missing game should fail");
}

#[test]
fn test_list_games_newest_first() {
    let (_db, repo) = setup_test_db();
    repo.save_game(in_progress("1 1 1 1", at(8, 0)))
        .expect("Save failed");
    repo.save_game(in_progress("3 3 3 3", at(10, 0)))
        .expect("Save failed");
    repo.save_game(in_progress("2 2 2 2", at(9, 0)))
        .expect("Save failed");

    let games = repo.list_games().expect("List failed");
    let secrets: Vec<&str> = games.iter().map(|g| g.secret_code().as_str()).collect();
    assert_eq!(secrets, vec!["3 3 3 3", "2 2 2 2", "1 1 1 1"]);
}

#[test]
fn test_delete_all_games() {
    let (_db, repo) = setup_test_db();
    repo.save_game(in_progress("1 1 1 1", at(8, 0)))
        .expect("Save failed");
    repo.save_game(in_progress("2 2 2 2", at(9, 0)))
        .expect("Save failed");

    assert_eq!(repo.delete_all_games().expect("Delete failed"), 2);
    assert!(repo.list_games().expect("List failed").is_empty());
    assert_eq!(repo.delete_all_games().expect("Delete failed"), 0);
}

#[test]
fn test_record_config() {
    let (_db, repo) = setup_test_db();
    let saved = repo
        .save_game(NewGameRecord::new(
            "9 0 12".to_string(),
            6,
            3,
            12,
            "IN_PROGRESS".to_string(),
            at(10, 0),
            None,
            "[]".to_string(),
        ))
        .expect("Save failed");

    let config = saved.config().expect("Valid rules");
    assert_eq!(config.max_attempts(), 6);
    assert_eq!(config.code_length(), 3);
    assert_eq!(config.max_number(), 12);
}

#[test]
fn test_status_strings() {
    for status in [
        StoredStatus::InProgress,
        StoredStatus::Won,
        StoredStatus::Lost,
        StoredStatus::Abandoned,
    ] {
        assert_eq!(
            StoredStatus::from_db_string(status.to_db_string()).expect("Known status"),
            status
        );
    }
    assert!(StoredStatus::from_db_string("won").is_err());
}
