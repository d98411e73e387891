//! Fixed-length lowercase words.
//!
//! Every word that reaches the constraint engine, whether it came from the
//! dictionary, the starting-word option or a guess typed by hand, goes
//! through [`is_candidate_word`] first.

use std::fmt;
use thiserror::Error;

pub const DEFAULT_WORD_LENGTH: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordError {
    #[error("word must be exactly {expected} letters, got {found}")]
    InvalidLength { expected: usize, found: usize },

    #[error("word \"{0}\" must contain only lowercase letters a-z")]
    InvalidCharacters(String),
}

/// Returns true if `text` is exactly `length` letters, all in `a..=z`.
#[must_use]
pub fn is_candidate_word(text: &str, length: usize) -> bool {
    text.len() == length && text.bytes().all(|b| b.is_ascii_lowercase())
}

/// A validated word of lowercase ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Word(String);

impl Word {
    /// Validates `text` against the pool predicate for words of `length` letters.
    ///
    /// # Errors
    /// Returns [`WordError`] if `text` has the wrong number of characters or
    /// contains anything other than lowercase ASCII letters.
    pub fn new(text: impl Into<String>, length: usize) -> Result<Self, WordError> {
        let text = text.into();
        let found = text.chars().count();
        if found != length {
            return Err(WordError::InvalidLength {
                expected: length,
                found,
            });
        }
        if !is_candidate_word(&text, length) {
            return Err(WordError::InvalidCharacters(text));
        }
        Ok(Self(text))
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn letters(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// # Panics
    /// Panics if `position >= self.len()`.
    #[inline]
    #[must_use]
    pub fn letter_at(&self, position: usize) -> u8 {
        self.0.as_bytes()[position]
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
