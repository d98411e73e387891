//! Clue interpretation and candidate filtering.
//!
//! A [`Clue`] is checked against a word in three passes over a *ledger*, a
//! scratch copy of the word whose letters get consumed as verdicts account
//! for them:
//!
//! 1. `Correct` verdicts must match in place and consume their slot.
//! 2. `Present` verdicts must not match in place and consume the first
//!    remaining copy of the letter elsewhere.
//! 3. `Absent` verdicts require that no unconsumed copy of the letter is left.
//!
//! Absent has to run last. A guess like `sheep` can mark one `e` green and
//! the other gray; the gray only means "no *further* e", so it must see the
//! ledger after the green has claimed its copy.

use crate::feedback::Verdict;
use crate::word::Word;
use rayon::prelude::*;

/// A guess paired with the feedback it received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clue {
    guess: Word,
    feedback: Vec<Verdict>,
}

impl Clue {
    /// # Panics
    /// Panics if `feedback` does not have one verdict per letter of `guess`.
    #[must_use]
    pub fn new(guess: Word, feedback: Vec<Verdict>) -> Self {
        assert_eq!(
            guess.len(),
            feedback.len(),
            "clue feedback must have one verdict per guess letter"
        );
        Self { guess, feedback }
    }

    #[must_use]
    pub fn guess(&self) -> &Word {
        &self.guess
    }

    #[must_use]
    pub fn feedback(&self) -> &[Verdict] {
        &self.feedback
    }

    fn positions(&self, verdict: Verdict) -> impl Iterator<Item = (usize, u8)> + '_ {
        self.feedback
            .iter()
            .zip(self.guess.letters())
            .enumerate()
            .filter(move |(_, (v, _))| **v == verdict)
            .map(|(i, (_, &letter))| (i, letter))
    }
}

/// Clues gathered so far in one game, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClueHistory {
    clues: Vec<Clue>,
}

impl ClueHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `clue` and returns it.
    pub fn push(&mut self, clue: Clue) -> &Clue {
        self.clues.push(clue);
        &self.clues[self.clues.len() - 1]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clues.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clues.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Clue> {
        self.clues.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Clue> {
        self.clues.iter()
    }
}

impl<'a> IntoIterator for &'a ClueHistory {
    type Item = &'a Clue;
    type IntoIter = std::slice::Iter<'a, Clue>;

    fn into_iter(self) -> Self::IntoIter {
        self.clues.iter()
    }
}

impl FromIterator<Clue> for ClueHistory {
    fn from_iter<T: IntoIterator<Item = Clue>>(iter: T) -> Self {
        Self {
            clues: iter.into_iter().collect(),
        }
    }
}

/// Whether `word` could be the answer given `clue`.
///
/// # Panics
/// Panics if `word` and the clue's guess differ in length.
#[must_use]
pub fn respects(word: &Word, clue: &Clue) -> bool {
    assert_eq!(
        word.len(),
        clue.guess.len(),
        "candidate and guess lengths differ"
    );
    let letters = word.letters();
    let mut ledger: Vec<Option<u8>> = letters.iter().copied().map(Some).collect();

    for (i, guessed) in clue.positions(Verdict::Correct) {
        if letters[i] != guessed {
            return false;
        }
        ledger[i] = None;
    }

    for (i, guessed) in clue.positions(Verdict::Present) {
        if letters[i] == guessed {
            return false;
        }
        match ledger.iter_mut().find(|slot| **slot == Some(guessed)) {
            Some(slot) => *slot = None,
            None => return false,
        }
    }

    for (_, guessed) in clue.positions(Verdict::Absent) {
        if ledger.contains(&Some(guessed)) {
            return false;
        }
    }

    true
}

#[must_use]
pub fn respects_all(word: &Word, history: &ClueHistory) -> bool {
    history.iter().all(|clue| respects(word, clue))
}

/// Words of `pool` consistent with every clue, in pool order, stopping after
/// `limit` matches when one is given.
pub fn filter<'a, I>(pool: I, history: &ClueHistory, limit: Option<usize>) -> Vec<&'a Word>
where
    I: IntoIterator<Item = &'a Word>,
{
    let matches = pool
        .into_iter()
        .filter(|word| respects_all(word, history));
    match limit {
        Some(limit) => matches.take(limit).collect(),
        None => matches.collect(),
    }
}

/// Parallel [`filter`] over a slice. Same output, same order.
#[must_use]
pub fn par_filter<'a>(
    pool: &'a [Word],
    history: &ClueHistory,
    limit: Option<usize>,
) -> Vec<&'a Word> {
    let mut matches: Vec<&Word> = pool
        .par_iter()
        .filter(|word| respects_all(word, history))
        .collect();
    if let Some(limit) = limit {
        matches.truncate(limit);
    }
    matches
}

/// Number of words in `pool` consistent with every clue.
#[must_use]
pub fn count_matches(pool: &[Word], history: &ClueHistory) -> usize {
    pool.par_iter()
        .filter(|word| respects_all(word, history))
        .count()
}
