//! Non-interactive front end that plays against a known answer.
//!
//! Feedback comes from [`score_guess`] and the first listed candidate is
//! always played next, so a run shows how quickly the clues alone narrow the
//! pool down.

use crate::constraints::ClueHistory;
use crate::debug_log;
use crate::feedback::{FormatError, format_feedback, score_guess};
use crate::game_state::{FeedbackInput, GameInterface, GameOutcome, SessionConfig, UserAction};
use crate::word::Word;
use std::io::{self, Write};

pub struct Autoplay<W: Write> {
    answer: Word,
    writer: W,
    transcript: Vec<String>,
}

impl Autoplay<io::Stdout> {
    #[must_use]
    pub fn new(answer: Word) -> Self {
        Self::with_writer(answer, io::stdout())
    }
}

impl<W: Write> Autoplay<W> {
    pub fn with_writer(answer: Word, writer: W) -> Self {
        Self {
            answer,
            writer,
            transcript: Vec::new(),
        }
    }

    /// `guess feedback` lines, one per round played.
    #[must_use]
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    fn say(&mut self, line: &str) {
        if let Err(e) = writeln!(self.writer, "{line}") {
            debug_log!("Write failed: {}", e);
        }
    }
}

impl<W: Write> GameInterface for Autoplay<W> {
    fn display_intro(&mut self, pool_size: usize, config: &SessionConfig) {
        self.say(&format!(
            "Auto-playing against {} with {pool_size} words, starting from {}.",
            self.answer, config.starting_word
        ));
    }

    fn read_feedback(&mut self, guess: &Word, round: usize) -> FeedbackInput {
        // Unscorable for the rest of the game
        if guess.len() != self.answer.len() {
            self.display_invalid_feedback(&FormatError::WrongLength {
                expected: guess.len(),
                found: self.answer.len(),
            });
            return FeedbackInput::Exit;
        }
        let verdicts = score_guess(guess, &self.answer);
        let line = format!("{guess} {}", format_feedback(&verdicts));
        self.say(&format!("[{round}] {line}"));
        self.transcript.push(line);
        FeedbackInput::Verdicts(verdicts)
    }

    fn display_invalid_feedback(&mut self, error: &FormatError) {
        self.say(&format!("Cannot score guess: {error}"));
    }

    fn display_candidates(&mut self, _history: &ClueHistory, sample: &[&Word], total: usize) {
        let shown: Vec<&str> = sample.iter().map(|w| w.as_str()).collect();
        self.say(&format!("    {total} candidates: {}", shown.join(" ")));
    }

    fn read_selection(&mut self, sample: &[&Word], _word_length: usize) -> Option<UserAction> {
        Some(match sample.first() {
            Some(&word) => UserAction::Guess(word.clone()),
            None => UserAction::Exit,
        })
    }

    fn display_outcome(&mut self, outcome: &GameOutcome) {
        let message = match outcome {
            GameOutcome::Solved { answer, guesses } => format!("Solved {answer} in {guesses}."),
            GameOutcome::NoCandidates => format!("{} is not in the word list.", self.answer),
            GameOutcome::OutOfGuesses => "Out of guesses.".to_string(),
            GameOutcome::Quit => "Stopped.".to_string(),
        };
        self.say(&message);
    }

    fn display_new_game_message(&mut self, _pool_size: usize) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::game_loop;
    use crate::wordbank::{EMBEDDED_WORDBANK, load_wordbank_from_str};

    fn word(text: &str) -> Word {
        Word::new(text, 5).unwrap()
    }

    #[test]
    fn test_autoplay_solves_pool_word() {
        let pool = load_wordbank_from_str(EMBEDDED_WORDBANK, 5);
        let config = SessionConfig::new("crane", 5).unwrap();
        let mut player = Autoplay::with_writer(word("spite"), Vec::new());
        let outcome = game_loop(&pool, &config, &mut player);
        match outcome {
            GameOutcome::Solved { answer, guesses } => {
                assert_eq!(answer, word("spite"));
                assert_eq!(guesses, player.transcript().len());
            }
            other => panic!("Expected Solved, got {other:?}"),
        }
        assert_eq!(player.transcript()[0], "crane XXXXG");
        assert!(player.transcript().last().unwrap().ends_with("GGGGG"));
    }

    #[test]
    fn test_autoplay_answer_missing_from_pool() {
        let pool: Vec<Word> = ["slate", "spite", "those"].into_iter().map(word).collect();
        let config = SessionConfig::new("crane", 5).unwrap();
        let mut player = Autoplay::with_writer(word("zesty"), Vec::new());
        assert_eq!(
            game_loop(&pool, &config, &mut player),
            GameOutcome::NoCandidates
        );
    }

    #[test]
    fn test_autoplay_answer_length_mismatch_stops() {
        let pool: Vec<Word> = ["crane", "spite"].into_iter().map(word).collect();
        let config = SessionConfig::new("crane", 5).unwrap();
        let answer = Word::new("planet", 6).unwrap();
        let mut player = Autoplay::with_writer(answer, Vec::new());
        assert_eq!(game_loop(&pool, &config, &mut player), GameOutcome::Quit);
        assert!(player.transcript().is_empty());

        let output = String::from_utf8(player.writer).unwrap();
        assert!(output.contains("Cannot score guess"));
        assert!(output.contains("Stopped."));
    }

    #[test]
    fn test_autoplay_starting_word_is_answer() {
        let pool: Vec<Word> = ["crane"].into_iter().map(word).collect();
        let config = SessionConfig::new("crane", 5).unwrap();
        let mut player = Autoplay::with_writer(word("crane"), Vec::new());
        assert!(matches!(
            game_loop(&pool, &config, &mut player),
            GameOutcome::Solved { guesses: 1, .. }
        ));
    }
}
