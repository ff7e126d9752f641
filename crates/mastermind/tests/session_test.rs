//! Scripted end-to-end console sessions.

use std::path::PathBuf;

use mastermind_core::{FixedSource, GameConfig, GameEngine};
use tempfile::{NamedTempFile, TempDir, tempdir};

use mastermind::console::{Console, FAREWELL, INPUT_CLOSED_MESSAGE};
use mastermind::{
    GamePersistenceService, GameRepository, MenuController, RandomSettings, Settings,
    StoredStatus,
};

/// Throwaway database and settings directory shared across runs.
struct Harness {
    _db: NamedTempFile,
    dir: TempDir,
    persistence: GamePersistenceService,
}

impl Harness {
    fn new() -> Self {
        let db = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = db.path().to_str().expect("Invalid path").to_string();
        let repo = GameRepository::open(db_path).expect("Failed to open repository");
        Self {
            _db: db,
            dir: tempdir().expect("Failed to create temp dir"),
            persistence: GamePersistenceService::new(repo),
        }
    }

    fn settings_path(&self) -> PathBuf {
        self.dir.path().join("mastermind.toml")
    }

    /// Runs the menu with `script` as input, returning output and final settings.
    fn run(&self, settings: Settings, script: &str) -> (String, Settings) {
        self.run_bytes(settings, script.as_bytes())
    }

    /// Like [`Harness::run`], for input that need not be valid UTF-8.
    fn run_bytes(&self, settings: Settings, script: &[u8]) -> (String, Settings) {
        let mut out = Vec::new();
        let final_settings = {
            let console = Console::plain(script, &mut out);
            let engine = GameEngine::new(FixedSource::new("1 2 3 4"));
            let mut app = MenuController::new(
                console,
                engine,
                self.persistence.clone(),
                settings,
                self.settings_path(),
            );
            app.run().expect("Session failed");
            app.settings().clone()
        };
        (String::from_utf8(out).expect("UTF-8 output"), final_settings)
    }

    fn statuses(&self) -> Vec<StoredStatus> {
        self.persistence
            .all_games()
            .expect("List failed")
            .iter()
            .map(|g| g.parse_status().expect("Known status"))
            .collect()
    }
}

fn local_settings() -> Settings {
    Settings::new(GameConfig::defaults(), RandomSettings::local())
}

#[test]
fn test_win_then_quit() {
    let h = Harness::new();
    let (out, _) = h.run(local_settings(), "1\n1 2 3 4\n2\n5\n");

    assert!(out.contains("I'm thinking of 4 numbers, each from 0 to 7."));
    assert!(out.contains("You guessed all the numbers correctly!"));
    assert!(out.contains("You cracked the code in 1 attempt."));
    assert!(out.contains("The secret code was: 1 2 3 4"));
    assert!(out.contains(FAREWELL));
    assert_eq!(h.statuses(), vec![StoredStatus::Won]);
}

#[test]
fn test_invalid_guesses_do_not_consume_attempts() {
    let h = Harness::new();
    let (out, _) = h.run(
        local_settings(),
        "1\nfoo\n1 2 3\n1 2 3 8\n\n1 2 3 4\n2\n5\n",
    );

    assert!(out.contains("'foo' is not a valid number."));
    assert!(out.contains("Guess must consist of 4 numbers."));
    assert!(out.contains("Numbers must be between 0 and 7."));
    assert!(out.contains("Please enter your guess."));
    assert!(out.contains("You cracked the code in 1 attempt."));
}

#[test]
fn test_undecodable_guess_asks_again() {
    let h = Harness::new();
    let (out, _) = h.run_bytes(local_settings(), b"1\n1 \xe9 3 4\n1 2 3 4\n2\n5\n");

    assert!(out.contains("'\u{FFFD}' is not a valid number."));
    assert!(out.contains("You cracked the code in 1 attempt."));
    assert!(out.contains(FAREWELL));
    assert_eq!(h.statuses(), vec![StoredStatus::Won]);
}

#[test]
fn test_feedback_after_each_guess() {
    let h = Harness::new();
    let (out, _) = h.run(local_settings(), "1\n0 0 0 0\n4 3 2 1\n1 2 0 0\n1 2 3 4\n2\n5\n");

    assert!(out.contains("All incorrect."));
    assert!(out.contains("4 correct numbers and 0 correct locations."));
    assert!(out.contains("2 correct numbers and 2 correct locations."));
    assert!(out.contains("Attempts remaining: 7"));
    assert!(out.contains("You cracked the code in 4 attempts."));
}

#[test]
fn test_loss_reveals_secret() {
    let h = Harness::new();
    let settings = Settings::new(
        GameConfig::new(2, 4, 7).expect("Valid config"),
        RandomSettings::local(),
    );
    let (out, _) = h.run(settings, "1\n0 0 0 0\n5 5 5 5\n2\n5\n");

    assert!(out.contains("You ran out of attempts."));
    assert!(out.contains("The secret code was: 1 2 3 4"));
    assert_eq!(h.statuses(), vec![StoredStatus::Lost]);
}

#[test]
fn test_play_again_starts_another_round() {
    let h = Harness::new();
    h.run(local_settings(), "1\n1 2 3 4\n1\n1 2 3 4\n2\n5\n");
    assert_eq!(h.statuses(), vec![StoredStatus::Won, StoredStatus::Won]);
}

#[test]
fn test_end_of_input_mid_game_exits_cleanly() {
    let h = Harness::new();
    let (out, _) = h.run(local_settings(), "1\n0 0 0 0\n");

    assert!(out.contains(INPUT_CLOSED_MESSAGE));
    assert!(!out.contains(FAREWELL));
    assert_eq!(h.statuses(), vec![StoredStatus::InProgress]);

    let resumed = h
        .persistence
        .last_incomplete_game()
        .expect("Query failed")
        .expect("Game is resumable");
    assert_eq!(resumed.state().attempts_remaining(), 9);
}

#[test]
fn test_resume_interrupted_game() {
    let h = Harness::new();
    h.run(local_settings(), "1\n0 0 0 0\n");

    let (out, _) = h.run(local_settings(), "1\n1\n1 2 3 4\n2\n5\n");

    assert!(out.contains("You have an unfinished game started"));
    assert!(out.contains("Resuming game"));
    assert!(out.contains("0 0 0 0  All incorrect."));
    assert!(out.contains("You cracked the code in 2 attempts."));
    assert_eq!(h.statuses(), vec![StoredStatus::Won]);
}

#[test]
fn test_abandon_interrupted_game() {
    let h = Harness::new();
    h.run(local_settings(), "1\n0 0 0 0\n");

    let (out, _) = h.run(local_settings(), "1\n2\n1 2 3 4\n2\n5\n");

    assert!(out.contains("Previous game abandoned."));
    assert_eq!(
        h.statuses(),
        vec![StoredStatus::Won, StoredStatus::Abandoned]
    );
}

#[test]
fn test_options_change_is_saved() {
    let h = Harness::new();
    let (out, settings) = h.run(local_settings(), "2\n1\n3\n7\n5\n");

    assert!(out.contains("Settings saved."));
    assert_eq!(settings.game().max_attempts(), 3);

    let stored = Settings::from_file(h.settings_path()).expect("Load failed");
    assert_eq!(stored.game().max_attempts(), 3);
    assert_eq!(stored.random(), settings.random());
}

#[test]
fn test_options_reject_out_of_range_values() {
    let h = Harness::new();
    let (out, settings) = h.run(local_settings(), "2\n2\n0\n101\n6\n7\n5\n");

    assert!(out.contains("Please enter a number between 1 and 100."));
    assert_eq!(settings.game().code_length(), 6);
}

#[test]
fn test_new_rules_apply_to_next_game() {
    let h = Harness::new();
    let (out, _) = h.run(local_settings(), "2\n3\n9\n7\n1\n1 2 3 4\n2\n5\n");

    assert!(out.contains("I'm thinking of 4 numbers, each from 0 to 9."));
    let games = h.persistence.all_games().expect("List failed");
    assert_eq!(*games[0].max_number(), 9);
}

#[test]
fn test_reset_defaults() {
    let h = Harness::new();
    let settings = Settings::new(
        GameConfig::new(3, 2, 2).expect("Valid config"),
        RandomSettings::local(),
    );
    let (_, settings) = h.run(settings, "2\n5\n7\n5\n");
    assert_eq!(*settings.game(), GameConfig::defaults());
}

#[test]
fn test_quota_without_checker() {
    let h = Harness::new();
    let (out, _) = h.run(local_settings(), "2\n4\n7\n5\n");
    assert!(out.contains("Quota check is unavailable with the local random source."));
}

#[test]
fn test_history_and_clear() {
    let h = Harness::new();
    let (out, _) = h.run(local_settings(), "3\n5\n");
    assert!(out.contains("No games played yet."));

    let (out, _) = h.run(local_settings(), "1\n4 3 2 1\n1 2 3 4\n2\n3\n5\n");
    assert!(out.contains("=== Game History ==="));
    assert!(out.contains("[won]"));
    assert!(out.contains("4 3 2 1  -> 4 correct numbers, 0 correct locations"));

    let (out, _) = h.run(local_settings(), "2\n6\nn\n6\ny\n7\n5\n");
    assert!(out.contains("History kept."));
    assert!(out.contains("Deleted 1 games."));
    assert!(h.statuses().is_empty());
}

#[test]
fn test_about() {
    let h = Harness::new();
    let (out, _) = h.run(local_settings(), "4\n5\n");
    assert!(out.contains("=== About ==="));
    assert!(out.contains("You have 10 attempts to guess it."));
    assert!(out.contains("for example: 0 1 2 3"));
}
