//! Text rendering of stored games.

use tracing::instrument;

use crate::db::GameRecord;

/// Describes one stored game: rules, status, times, and every guess.
#[instrument(skip(record), fields(game_id = record.id()))]
pub fn format_game_record(record: &GameRecord) -> String {
    let status = match record.parse_status() {
        Ok(status) => status.to_string(),
        Err(_) => record.status().to_lowercase(),
    };

    let mut text = format!(
        "Game #{} [{}] started {}\n  {} attempts, {} numbers from 0 to {}",
        record.id(),
        status,
        record.started_at().format("%Y-%m-%d %H:%M:%S"),
        record.max_attempts(),
        record.code_length(),
        record.max_number(),
    );
    if let Some(completed) = record.completed_at() {
        text.push_str(&format!(
            "\n  finished {}",
            completed.format("%Y-%m-%d %H:%M:%S")
        ));
    }

    match record.guesses() {
        Ok(guesses) if guesses.is_empty() => text.push_str("\n  no guesses"),
        Ok(guesses) => {
            for (n, guess) in guesses.iter().enumerate() {
                text.push_str(&format!(
                    "\n  {:>3}. {}  -> {} correct numbers, {} correct locations",
                    n + 1,
                    guess.guess_text(),
                    guess.value_matches(),
                    guess.exact_matches(),
                ));
            }
        }
        Err(_) => text.push_str("\n  guess history unreadable"),
    }
    text
}
