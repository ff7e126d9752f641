//! Console front end: prompts, menus, banners.

mod banner;
mod history;
mod io;
mod menu;

pub use banner::{FAREWELL, TITLE, YOU_LOSE, YOU_WIN};
pub use history::format_game_record;
pub use io::{Console, INPUT_CLOSED_MESSAGE, UiError};
pub use menu::{MainMenuChoice, OptionsChoice, ResumeChoice, RoundEndChoice, choose};
