//! SQLite persistence for played and in-progress games.

mod error;
mod models;
mod repository;
mod schema;

pub use error::DbError;
pub(crate) use models::to_column;
pub use models::{GameRecord, GameRecordUpdate, NewGameRecord, StoredStatus};
pub use repository::{GameRepository, MIGRATIONS};
