// Library interface for wordle-assistant
// This allows integration tests to access internal modules

pub mod autoplay;
pub mod cli;
pub mod constraints;
pub mod feedback;
pub mod game_state;
pub mod logging;
pub mod tui;
pub mod word;
pub mod wordbank;

// Re-export commonly used items for easier testing
pub use constraints::{Clue, ClueHistory, count_matches, filter, par_filter, respects, respects_all};
pub use feedback::{FormatError, Verdict, format_feedback, parse_feedback, score_guess};
pub use game_state::{GameInterface, GameOutcome, SessionConfig, game_loop};
pub use word::{Word, WordError, is_candidate_word};
pub use wordbank::{load_default_wordbank, load_wordbank_from_file, load_wordbank_from_str};
