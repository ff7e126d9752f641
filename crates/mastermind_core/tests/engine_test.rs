//! Tests for GameEngine secret acquisition and turn processing.

use mastermind_core::{
    FixedSource, GameConfig, GameEngine, GameStatus, GuessError, LocalRandom, RandomError,
    RandomSource, ValidationError, validate,
};

/// Source that returns text regardless of the request.
#[derive(Debug)]
struct RawText(&'static str);

impl RandomSource for RawText {
    fn generate(&self, _quantity: u32, _min: i64, _max: i64) -> Result<String, RandomError> {
        Ok(self.0.to_string())
    }

    fn name(&self) -> &'static str {
        "raw"
    }
}

fn assert_conforms(digits: &[u32], config: &GameConfig) {
    assert_eq!(digits.len() as u32, config.code_length());
    assert!(digits.iter().all(|&d| d <= config.max_number()));
}

#[test]
fn test_secret_from_primary_source() {
    let engine = GameEngine::new(FixedSource::new("1 2 3 4"));
    let state = engine.create_new_game(GameConfig::defaults());
    assert_eq!(state.secret_code(), "1 2 3 4");
    assert_eq!(state.status(), GameStatus::Active);
    assert_eq!(state.attempts_remaining(), 10);
}

#[test]
fn test_failing_source_falls_back() {
    let engine = GameEngine::new(FixedSource::failing());
    let config = GameConfig::defaults();
    let state = engine.create_new_game(config);
    assert_conforms(state.secret_digits(), &config);
    assert!(!state.is_game_ended());
}

#[test]
fn test_unusable_secret_falls_back() {
    let config = GameConfig::defaults();
    for text in ["", "1 2 3", "1 2 3 99", "a b c d", "1 2 3 4 5"] {
        let engine = GameEngine::new(RawText(text));
        let state = engine.create_new_game(config);
        assert_conforms(state.secret_digits(), &config);
    }
}

#[test]
fn test_seeded_fallback_is_reproducible() {
    let config = GameConfig::new(10, 6, 9).expect("Valid config");
    let a = GameEngine::with_fallback(FixedSource::failing(), LocalRandom::seeded(42));
    let b = GameEngine::with_fallback(FixedSource::failing(), LocalRandom::seeded(42));
    assert_eq!(
        a.create_new_game(config).secret_code(),
        b.create_new_game(config).secret_code()
    );
}

#[test]
fn test_boxed_source_accepted() {
    let source: Box<dyn RandomSource> = Box::new(FixedSource::from_digits(&[0, 7, 0, 7]));
    let engine = GameEngine::new(source);
    let state = engine.create_new_game(GameConfig::defaults());
    assert_eq!(state.secret_code(), "0 7 0 7");
}

#[test]
fn test_process_guess_scores() {
    let engine = GameEngine::new(FixedSource::new("1 1 2 2"));
    let state = engine.create_new_game(GameConfig::defaults());
    let next = engine.process_guess(&state, "1 2 1 2").expect("Valid guess");

    let result = next.last_result().expect("Guess recorded");
    assert_eq!(*result.exact_matches(), 2);
    assert_eq!(*result.value_matches(), 4);
    assert_eq!(next.attempts_remaining(), 9);
}

#[test]
fn test_invalid_input_consumes_no_attempt() {
    let engine = GameEngine::new(FixedSource::new("1 2 3 4"));
    let state = engine.create_new_game(GameConfig::defaults());

    let err = engine.process_guess(&state, "1 2 x 4").unwrap_err();
    assert_eq!(err, GuessError::InvalidInput("'x' is not a valid number.".to_string()));

    let err = engine.process_guess(&state, "").unwrap_err();
    assert_eq!(err, GuessError::InvalidInput("Please enter your guess.".to_string()));

    assert_eq!(state.attempts_remaining(), 10);
    assert!(state.history().is_empty());
}

#[test]
fn test_guess_after_win_is_invalid_state() {
    let engine = GameEngine::new(FixedSource::new("1 2 3 4"));
    let state = engine.create_new_game(GameConfig::defaults());
    let won = engine.process_guess(&state, "1 2 3 4").expect("Valid guess");
    assert!(won.has_player_won());

    let err = engine.process_guess(&won, "1 2 3 4").unwrap_err();
    assert_eq!(err, GuessError::InvalidState(GameStatus::Won));
    assert_eq!(err.to_string(), "Cannot process guess: game already won");
    assert_eq!(won.history().len(), 1);
}

#[test]
fn test_ten_misses_lose() {
    let engine = GameEngine::new(FixedSource::new("1 2 3 4"));
    let mut state = engine.create_new_game(GameConfig::defaults());
    for _ in 0..10 {
        state = engine.process_guess(&state, "0 0 0 0").expect("Valid guess");
    }
    assert_eq!(state.status(), GameStatus::Lost);

    let err = engine.process_guess(&state, "1 2 3 4").unwrap_err();
    assert_eq!(err, GuessError::InvalidState(GameStatus::Lost));
    assert_eq!(state.history().len(), 10);
}

#[test]
fn test_is_valid_guess() {
    let engine = GameEngine::new(FixedSource::new("1 2 3 4"));
    let state = engine.create_new_game(GameConfig::defaults());
    assert!(engine.is_valid_guess(&state, "7 0 7 0"));
    assert!(!engine.is_valid_guess(&state, "8 0 7 0"));
    assert!(!engine.is_valid_guess(&state, "7 0 7"));
}

#[test]
fn test_local_random_respects_bounds() {
    let local = LocalRandom::seeded(7);
    let text = local.generate(50, -3, 3).expect("Valid request");
    let values: Vec<i64> = text
        .split_whitespace()
        .map(|t| t.parse().expect("Integer"))
        .collect();
    assert_eq!(values.len(), 50);
    assert!(values.iter().all(|v| (-3..=3).contains(v)));
}

#[test]
fn test_local_random_rejects_inverted_range() {
    let local = LocalRandom::seeded(7);
    assert!(matches!(
        local.generate(4, 5, 1),
        Err(RandomError::InvalidRequest(_))
    ));
}

#[test]
fn test_local_random_zero_quantity_is_empty() {
    let local = LocalRandom::seeded(1);
    assert_eq!(local.generate(0, 0, 7), Ok(String::new()));

    // An empty draw never validates as a code.
    assert_eq!(validate("", 0, 7), Err(ValidationError::EmptyInput));
}
