use crate::constraints::ClueHistory;
use crate::debug_log;
use crate::feedback::{FormatError, parse_feedback};
use crate::game_state::{
    DEFAULT_MAX_GUESSES, DEFAULT_SAMPLE_SIZE, DEFAULT_STARTING_WORD, FeedbackInput, GameInterface,
    GameOutcome, SessionConfig, UserAction,
};
use crate::word::{DEFAULT_WORD_LENGTH, Word, WordError};
use clap::Parser;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const CANDIDATES_PER_ROW: usize = 5;

/// Wordle assistant CLI options
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a whitespace-separated dictionary file
    #[arg(short = 'i', long = "input")]
    pub wordbank_path: Option<PathBuf>,

    /// First word to play
    #[arg(short, long, default_value = DEFAULT_STARTING_WORD)]
    pub start: String,

    /// Number of letters per word
    #[arg(short, long, default_value_t = DEFAULT_WORD_LENGTH, value_parser = parse_positive)]
    pub length: usize,

    /// Guesses allowed per game
    #[arg(short, long, default_value_t = DEFAULT_MAX_GUESSES, value_parser = parse_positive)]
    pub max_guesses: usize,

    /// Candidates listed after each round
    #[arg(short = 'n', long, default_value_t = DEFAULT_SAMPLE_SIZE, value_parser = parse_positive)]
    pub sample_size: usize,

    /// Use the full-screen terminal interface
    #[arg(long, conflicts_with = "answer")]
    pub tui: bool,

    /// Play automatically against a known answer
    #[arg(long)]
    pub answer: Option<String>,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

fn parse_positive(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

impl Cli {
    /// # Errors
    /// Returns [`WordError`] if the starting word is not `length` lowercase letters.
    pub fn session_config(&self) -> Result<SessionConfig, WordError> {
        Ok(SessionConfig::new(&self.start, self.length)?
            .with_max_guesses(self.max_guesses)
            .with_sample_size(self.sample_size))
    }

    /// # Errors
    /// Returns [`WordError`] if `--answer` is not `length` lowercase letters.
    pub fn answer_word(&self) -> Result<Option<Word>, WordError> {
        self.answer
            .as_deref()
            .map(|answer| Word::new(answer, self.length))
            .transpose()
    }
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// What a line typed at a prompt asks for, before any game-specific parsing.
enum Command<'a> {
    Exit,
    NewGame,
    Other(&'a str),
}

fn classify(input: &str) -> Command<'_> {
    match input.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => Command::Exit,
        "next" => Command::NewGame,
        _ => Command::Other(input),
    }
}

/// Line-oriented front end over any reader and writer.
pub struct CliInterface<R: BufRead, W: Write> {
    reader: R,
    writer: W,
}

impl<R: BufRead> CliInterface<R, io::Stdout> {
    pub fn new(reader: R) -> Self {
        Self::with_writer(reader, io::stdout())
    }
}

impl<R: BufRead, W: Write> CliInterface<R, W> {
    pub fn with_writer(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn say(&mut self, args: fmt::Arguments<'_>) {
        if let Err(e) = self.writer.write_fmt(args).and_then(|()| self.writer.flush()) {
            debug_log!("Write failed: {}", e);
        }
    }

    /// Prints `prompt` and reads one trimmed line. `None` on end of input.
    fn prompt(&mut self, prompt: &str) -> Option<String> {
        self.say(format_args!("{prompt}"));
        let mut input = String::new();
        match self.reader.read_line(&mut input) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(input.trim().to_string()),
        }
    }

    fn read_manual_guess(&mut self, word_length: usize) -> Option<UserAction> {
        let input = self.prompt("\nOriginal guess> ")?;
        match classify(&input) {
            Command::Exit => Some(UserAction::Exit),
            Command::NewGame => Some(UserAction::NewGame),
            Command::Other(text) => self.parse_guess(text, word_length),
        }
    }

    fn parse_guess(&mut self, text: &str, word_length: usize) -> Option<UserAction> {
        match Word::new(text, word_length) {
            Ok(word) => Some(UserAction::Guess(word)),
            Err(e) => {
                self.say(format_args!("Invalid guess: {e}\n"));
                None
            }
        }
    }
}

impl<R: BufRead, W: Write> GameInterface for CliInterface<R, W> {
    fn display_intro(&mut self, pool_size: usize, config: &SessionConfig) {
        self.say(format_args!(
            "Loaded {pool_size} words of {} letters.\n\
             Enter feedback as G (green), Y (yellow) or X (gray), e.g. GYXXG. \
             'q' quits, 'next' starts a new game.\n",
            config.word_length
        ));
    }

    fn read_feedback(&mut self, guess: &Word, round: usize) -> FeedbackInput {
        self.say(format_args!("\n[{round}] GUESS:  {guess}\n"));
        let Some(input) = self.prompt("RESULT> ") else {
            return FeedbackInput::Exit;
        };
        match classify(&input) {
            Command::Exit => FeedbackInput::Exit,
            Command::NewGame => FeedbackInput::NewGame,
            Command::Other(text) => match parse_feedback(&text.to_uppercase(), guess.len()) {
                Ok(verdicts) => FeedbackInput::Verdicts(verdicts),
                Err(e) => FeedbackInput::Invalid(e),
            },
        }
    }

    fn display_invalid_feedback(&mut self, error: &FormatError) {
        self.say(format_args!("Invalid RESULT format: {error}\n"));
    }

    fn display_candidates(&mut self, _history: &ClueHistory, sample: &[&Word], total: usize) {
        self.say(format_args!("\nPossible candidates ({total}):"));
        for (i, word) in sample.iter().enumerate() {
            if i % CANDIDATES_PER_ROW == 0 {
                self.say(format_args!("\n"));
            }
            self.say(format_args!("{i:3}: {word}    "));
        }
        self.say(format_args!("\n"));
        if total > sample.len() {
            self.say(format_args!("...and {} more\n", total - sample.len()));
        }
    }

    fn read_selection(&mut self, sample: &[&Word], word_length: usize) -> Option<UserAction> {
        let Some(input) = self.prompt("CHOOSE> ") else {
            return Some(UserAction::Exit);
        };
        match classify(&input) {
            Command::Exit => Some(UserAction::Exit),
            Command::NewGame => Some(UserAction::NewGame),
            Command::Other(text) => match text.parse::<usize>() {
                Ok(index) => match sample.get(index) {
                    Some(&word) => Some(UserAction::Guess(word.clone())),
                    None => self.read_manual_guess(word_length),
                },
                Err(_) => self.parse_guess(text, word_length),
            },
        }
    }

    fn display_outcome(&mut self, outcome: &GameOutcome) {
        match outcome {
            GameOutcome::Solved { answer, guesses } => {
                self.say(format_args!("Solved: {answer} in {guesses} guesses.\n"));
            }
            GameOutcome::NoCandidates => {
                self.say(format_args!("No candidates remain. Check your inputs.\n"));
            }
            GameOutcome::OutOfGuesses => self.say(format_args!("Out of guesses.\n")),
            GameOutcome::Quit => self.say(format_args!("Exiting.\n")),
        }
    }

    fn display_new_game_message(&mut self, pool_size: usize) {
        self.say(format_args!("New game started. Loaded {pool_size} words.\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::Verdict;
    use std::io::Cursor;

    fn interface(input: &str) -> CliInterface<Cursor<&str>, Vec<u8>> {
        CliInterface::with_writer(Cursor::new(input), Vec::new())
    }

    fn output(ui: CliInterface<Cursor<&str>, Vec<u8>>) -> String {
        String::from_utf8(ui.into_writer()).unwrap()
    }

    fn word(text: &str) -> Word {
        Word::new(text, 5).unwrap()
    }

    #[test]
    fn test_parse_cli_defaults() {
        let cli = Cli::try_parse_from(["wordle-assistant"]).unwrap();
        assert_eq!(cli.wordbank_path, None);
        assert_eq!(cli.start, "crane");
        assert_eq!(cli.length, 5);
        assert_eq!(cli.max_guesses, 10);
        assert_eq!(cli.sample_size, 15);
        assert!(!cli.tui);
        assert_eq!(cli.answer, None);
    }

    #[test]
    fn test_parse_cli_with_options() {
        let cli = Cli::try_parse_from([
            "wordle-assistant",
            "-i",
            "/usr/share/dict/words",
            "--start",
            "slate",
            "-m",
            "6",
            "-n",
            "10",
        ])
        .unwrap();
        assert_eq!(cli.wordbank_path, Some(PathBuf::from("/usr/share/dict/words")));
        let config = cli.session_config().unwrap();
        assert_eq!(config.starting_word.as_str(), "slate");
        assert_eq!(config.max_guesses, 6);
        assert_eq!(config.sample_size, 10);
    }

    #[test]
    fn test_parse_cli_rejects_zero() {
        assert!(Cli::try_parse_from(["wordle-assistant", "--max-guesses", "0"]).is_err());
        assert!(Cli::try_parse_from(["wordle-assistant", "-l", "zero"]).is_err());
    }

    #[test]
    fn test_tui_conflicts_with_answer() {
        assert!(Cli::try_parse_from(["wordle-assistant", "--tui", "--answer", "slate"]).is_err());
    }

    #[test]
    fn test_session_config_validates_start_word() {
        let cli = Cli::try_parse_from(["wordle-assistant", "--start", "Crane"]).unwrap();
        assert!(cli.session_config().is_err());
        let cli = Cli::try_parse_from(["wordle-assistant", "-s", "planet", "-l", "6"]).unwrap();
        assert_eq!(cli.session_config().unwrap().word_length, 6);
    }

    #[test]
    fn test_answer_word() {
        let cli = Cli::try_parse_from(["wordle-assistant", "--answer", "spite"]).unwrap();
        assert_eq!(cli.answer_word(), Ok(Some(word("spite"))));
        let cli = Cli::try_parse_from(["wordle-assistant", "--answer", "spit"]).unwrap();
        assert!(cli.answer_word().is_err());
        let cli = Cli::try_parse_from(["wordle-assistant"]).unwrap();
        assert_eq!(cli.answer_word(), Ok(None));
    }

    #[test]
    fn test_read_feedback_valid() {
        let mut ui = interface("GYXXG\n");
        assert_eq!(
            ui.read_feedback(&word("crane"), 1),
            FeedbackInput::Verdicts(vec![
                Verdict::Correct,
                Verdict::Present,
                Verdict::Absent,
                Verdict::Absent,
                Verdict::Correct
            ])
        );
        assert!(output(ui).contains("GUESS:  crane"));
    }

    #[test]
    fn test_read_feedback_lowercase_and_whitespace() {
        let mut ui = interface("  gyxxg  \n");
        assert!(matches!(
            ui.read_feedback(&word("crane"), 1),
            FeedbackInput::Verdicts(_)
        ));
    }

    #[test]
    fn test_read_feedback_invalid() {
        let mut ui = interface("GGG\nGGGGA\n");
        assert!(matches!(
            ui.read_feedback(&word("crane"), 1),
            FeedbackInput::Invalid(FormatError::WrongLength { .. })
        ));
        assert!(matches!(
            ui.read_feedback(&word("crane"), 1),
            FeedbackInput::Invalid(FormatError::InvalidSymbol { symbol: 'A', .. })
        ));
    }

    #[test]
    fn test_read_feedback_commands() {
        let mut ui = interface("q\nNEXT\n");
        assert_eq!(ui.read_feedback(&word("crane"), 1), FeedbackInput::Exit);
        assert_eq!(ui.read_feedback(&word("crane"), 1), FeedbackInput::NewGame);
        // End of input
        assert_eq!(ui.read_feedback(&word("crane"), 1), FeedbackInput::Exit);
    }

    #[test]
    fn test_read_selection_by_index() {
        let spite = word("spite");
        let those = word("those");
        let sample = [&spite, &those];
        let mut ui = interface("1\n");
        assert_eq!(
            ui.read_selection(&sample, 5),
            Some(UserAction::Guess(those.clone()))
        );
    }

    #[test]
    fn test_read_selection_out_of_range_asks_for_word() {
        let spite = word("spite");
        let sample = [&spite];
        let mut ui = interface("99\nmoist\n");
        assert_eq!(
            ui.read_selection(&sample, 5),
            Some(UserAction::Guess(word("moist")))
        );
        assert!(output(ui).contains("Original guess>"));
    }

    #[test]
    fn test_read_selection_typed_word() {
        let spite = word("spite");
        let sample = [&spite];
        let mut ui = interface("smote\nSMOTE\n");
        assert_eq!(
            ui.read_selection(&sample, 5),
            Some(UserAction::Guess(word("smote")))
        );
        assert_eq!(ui.read_selection(&sample, 5), None);
        assert!(output(ui).contains("Invalid guess"));
    }

    #[test]
    fn test_read_selection_commands() {
        let spite = word("spite");
        let sample = [&spite];
        let mut ui = interface("exit\nnext\n");
        assert_eq!(ui.read_selection(&sample, 5), Some(UserAction::Exit));
        assert_eq!(ui.read_selection(&sample, 5), Some(UserAction::NewGame));
        assert_eq!(ui.read_selection(&sample, 5), Some(UserAction::Exit));
    }

    #[test]
    fn test_display_candidates_rows() {
        let words: Vec<Word> = ["spite", "those", "smote", "shine", "stove", "suite"]
            .into_iter()
            .map(word)
            .collect();
        let sample: Vec<&Word> = words.iter().collect();
        let mut ui = interface("");
        ui.display_candidates(&ClueHistory::new(), &sample, 8);
        let text = output(ui);
        assert!(text.contains("Possible candidates (8):"));
        assert!(text.contains("  0: spite    "));
        assert!(text.contains("\n  5: suite"));
        assert!(text.contains("...and 2 more"));
    }
}
