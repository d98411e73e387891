use crate::word::Word;
use std::fmt;
use thiserror::Error;

/// Per-letter outcome of a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Green: right letter, right position.
    Correct,
    /// Yellow: right letter, wrong position.
    Present,
    /// Gray: no unaccounted occurrence of the letter.
    Absent,
}

impl Verdict {
    pub const CORRECT_SYMBOL: char = 'G';
    pub const PRESENT_SYMBOL: char = 'Y';
    pub const ABSENT_SYMBOL: char = 'X';

    #[must_use]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            Self::CORRECT_SYMBOL => Some(Self::Correct),
            Self::PRESENT_SYMBOL => Some(Self::Present),
            Self::ABSENT_SYMBOL => Some(Self::Absent),
            _ => None,
        }
    }

    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Self::Correct => Self::CORRECT_SYMBOL,
            Self::Present => Self::PRESENT_SYMBOL,
            Self::Absent => Self::ABSENT_SYMBOL,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Raw feedback text that cannot be turned into verdicts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("feedback must be exactly {expected} symbols, got {found}")]
    WrongLength { expected: usize, found: usize },

    #[error("invalid feedback symbol '{symbol}' at position {position} (use G, Y or X)")]
    InvalidSymbol { symbol: char, position: usize },
}

/// Parses one symbol per letter into verdicts. All or nothing.
///
/// # Errors
/// [`FormatError::WrongLength`] if `text` is not `expected_length` characters,
/// otherwise [`FormatError::InvalidSymbol`] for the first unrecognised symbol.
pub fn parse_feedback(text: &str, expected_length: usize) -> Result<Vec<Verdict>, FormatError> {
    let found = text.chars().count();
    if found != expected_length {
        return Err(FormatError::WrongLength {
            expected: expected_length,
            found,
        });
    }
    text.chars()
        .enumerate()
        .map(|(position, symbol)| {
            Verdict::from_symbol(symbol).ok_or(FormatError::InvalidSymbol { symbol, position })
        })
        .collect()
}

#[must_use]
pub fn format_feedback(verdicts: &[Verdict]) -> String {
    verdicts.iter().map(|v| v.symbol()).collect()
}

#[must_use]
pub fn is_solved(verdicts: &[Verdict]) -> bool {
    verdicts.iter().all(|&v| v == Verdict::Correct)
}

/// Feedback the game would give for `guess` when the hidden word is `answer`.
///
/// Greens are claimed first; each remaining guess letter then takes the first
/// unclaimed matching letter of the answer, if any.
///
/// # Panics
/// Panics if the words differ in length.
#[must_use]
pub fn score_guess(guess: &Word, answer: &Word) -> Vec<Verdict> {
    assert_eq!(guess.len(), answer.len(), "guess and answer lengths differ");
    let mut verdicts = vec![Verdict::Absent; guess.len()];
    let mut remaining: Vec<Option<u8>> = answer.letters().iter().copied().map(Some).collect();

    for (i, (&g, &a)) in guess.letters().iter().zip(answer.letters()).enumerate() {
        if g == a {
            verdicts[i] = Verdict::Correct;
            remaining[i] = None;
        }
    }
    for (i, &g) in guess.letters().iter().enumerate() {
        if verdicts[i] == Verdict::Correct {
            continue;
        }
        if let Some(slot) = remaining.iter_mut().find(|slot| **slot == Some(g)) {
            verdicts[i] = Verdict::Present;
            *slot = None;
        }
    }
    verdicts
}
