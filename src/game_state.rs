use crate::constraints::{Clue, ClueHistory, count_matches, filter};
use crate::feedback::{FormatError, Verdict, format_feedback, is_solved};
use crate::word::{Word, WordError};
use log::{debug, info};

pub const DEFAULT_STARTING_WORD: &str = "crane";
pub const DEFAULT_MAX_GUESSES: usize = 10;
pub const DEFAULT_SAMPLE_SIZE: usize = 15;

/// Settings shared by every game of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub starting_word: Word,
    pub word_length: usize,
    pub max_guesses: usize,
    pub sample_size: usize,
}

impl SessionConfig {
    /// # Errors
    /// Returns [`WordError`] if `starting_word` would not be accepted into a
    /// pool of `word_length`-letter words.
    pub fn new(starting_word: &str, word_length: usize) -> Result<Self, WordError> {
        Ok(Self {
            starting_word: Word::new(starting_word, word_length)?,
            word_length,
            max_guesses: DEFAULT_MAX_GUESSES,
            sample_size: DEFAULT_SAMPLE_SIZE,
        })
    }

    #[must_use]
    pub fn with_max_guesses(mut self, max_guesses: usize) -> Self {
        self.max_guesses = max_guesses;
        self
    }

    #[must_use]
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Guess(Word),
    Exit,
    NewGame,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackInput {
    Verdicts(Vec<Verdict>),
    Invalid(FormatError),
    Exit,
    NewGame,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameOutcome {
    Solved { answer: Word, guesses: usize },
    NoCandidates,
    OutOfGuesses,
    Quit,
}

/// Front end driven by [`game_loop`].
///
/// Readers return what the user asked for; the loop owns all game state and
/// only hands out borrowed views of it.
pub trait GameInterface {
    fn display_intro(&mut self, pool_size: usize, config: &SessionConfig);
    fn read_feedback(&mut self, guess: &Word, round: usize) -> FeedbackInput;
    fn display_invalid_feedback(&mut self, error: &FormatError);
    fn display_candidates(&mut self, history: &ClueHistory, sample: &[&Word], total: usize);
    /// `None` means the input was rejected and should be asked for again.
    fn read_selection(&mut self, sample: &[&Word], word_length: usize) -> Option<UserAction>;
    fn display_outcome(&mut self, outcome: &GameOutcome);
    fn display_new_game_message(&mut self, pool_size: usize);

    /// Asked after a game ends. Front ends that can start over say so here.
    fn play_again(&mut self) -> bool {
        false
    }
}

/// State of one game: the clues so far and the word about to be played.
#[derive(Debug, Clone)]
pub struct Session {
    history: ClueHistory,
    guess: Word,
    max_guesses: usize,
}

impl Session {
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            history: ClueHistory::new(),
            guess: config.starting_word.clone(),
            max_guesses: config.max_guesses,
        }
    }

    #[must_use]
    pub fn guess(&self) -> &Word {
        &self.guess
    }

    #[must_use]
    pub fn history(&self) -> &ClueHistory {
        &self.history
    }

    /// 1-based number of the guess currently being played.
    #[must_use]
    pub fn round(&self) -> usize {
        self.history.len() + 1
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.history.len() >= self.max_guesses
    }

    /// Appends the clue for the current guess.
    pub fn record_feedback(&mut self, feedback: Vec<Verdict>) -> &Clue {
        self.history.push(Clue::new(self.guess.clone(), feedback))
    }

    pub fn choose_guess(&mut self, word: Word) {
        debug_assert_eq!(word.len(), self.guess.len());
        self.guess = word;
    }

    /// First `limit` words of `pool` that fit every clue so far.
    #[must_use]
    pub fn sample<'a>(&self, pool: &'a [Word], limit: usize) -> Vec<&'a Word> {
        filter(pool, &self.history, Some(limit))
    }

    #[must_use]
    pub fn remaining(&self, pool: &[Word]) -> usize {
        count_matches(pool, &self.history)
    }
}

/// Plays games until one ends and the front end does not ask to play again.
/// Returns the outcome of the last game.
pub fn game_loop<I: GameInterface + ?Sized>(
    pool: &[Word],
    config: &SessionConfig,
    interface: &mut I,
) -> GameOutcome {
    interface.display_intro(pool.len(), config);
    loop {
        match play_game(pool, config, interface) {
            Some(outcome) => {
                info!("Game finished: {outcome:?}");
                interface.display_outcome(&outcome);
                if outcome == GameOutcome::Quit || !interface.play_again() {
                    return outcome;
                }
            }
            None => info!("New game requested"),
        }
        interface.display_new_game_message(pool.len());
    }
}

/// Plays a single game. `None` means the user asked for a new game.
pub fn play_game<I: GameInterface + ?Sized>(
    pool: &[Word],
    config: &SessionConfig,
    interface: &mut I,
) -> Option<GameOutcome> {
    let mut session = Session::new(config);

    loop {
        if session.is_exhausted() {
            return Some(GameOutcome::OutOfGuesses);
        }

        let feedback = loop {
            match interface.read_feedback(session.guess(), session.round()) {
                FeedbackInput::Verdicts(verdicts) => break verdicts,
                FeedbackInput::Invalid(error) => {
                    debug!("Rejected feedback: {error}");
                    interface.display_invalid_feedback(&error);
                }
                FeedbackInput::Exit => return Some(GameOutcome::Quit),
                FeedbackInput::NewGame => return None,
            }
        };

        let round = session.round();
        let clue = session.record_feedback(feedback);
        info!(
            "Round {round}: {} -> {}",
            clue.guess(),
            format_feedback(clue.feedback())
        );
        if is_solved(clue.feedback()) {
            return Some(GameOutcome::Solved {
                answer: clue.guess().clone(),
                guesses: round,
            });
        }

        let total = session.remaining(pool);
        let sample = session.sample(pool, config.sample_size);
        debug!("{total} candidates remain, showing {}", sample.len());
        interface.display_candidates(session.history(), &sample, total);

        if total == 0 {
            return Some(GameOutcome::NoCandidates);
        }
        if session.is_exhausted() {
            return Some(GameOutcome::OutOfGuesses);
        }

        let next = loop {
            match interface.read_selection(&sample, config.word_length) {
                Some(UserAction::Guess(word)) => break word,
                Some(UserAction::Exit) => return Some(GameOutcome::Quit),
                Some(UserAction::NewGame) => return None,
                None => {}
            }
        };
        session.choose_guess(next);
    }
}
