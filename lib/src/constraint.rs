use crate::results::get_markup_for_guess;
use crate::results::MarkupType;
use crate::results::WordleError;
use std::result::Result;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Determines how much of a [`Constraint`] is used when deciding whether a candidate is still
/// allowed.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConstraintPolicy {
    /// Every candidate is allowed.
    Ignore,
    /// Candidates must produce the same number of exact and included letters against the
    /// constraint's guess.
    Aggregated,
    /// Exact letters must be kept in place and included letters must be used somewhere else in
    /// the candidate. Letters marked [`MarkupType::No`] are unrestricted. This is Wordle's "hard
    /// mode".
    Positive,
    /// Everything in [`ConstraintPolicy::Positive`], plus included letters must move and letters
    /// marked [`MarkupType::No`] may not appear beyond the count already claimed. A candidate allowed
    /// under this policy could be the secret.
    All,
}

/// The recorded outcome of one past guess.
///
/// The exact and included counts are derived from the markup and cannot be set directly.
#[derive(Debug, Eq, PartialEq, Hash, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "ConstraintRecord", into = "ConstraintRecord")
)]
pub struct Constraint {
    candidate: Arc<str>,
    letters: Box<[char]>,
    markup: Vec<MarkupType>,
    exact: usize,
    included: usize,
}

impl Constraint {
    /// Creates a constraint from a guess and its per-letter markup.
    ///
    /// Fails with [`WordleError::WordLength`] if the markup does not have one entry per letter,
    /// and with [`WordleError::InvalidArgument`] if the guess is empty.
    pub fn new(candidate: &str, markup: Vec<MarkupType>) -> Result<Constraint, WordleError> {
        let letters: Box<[char]> = candidate.chars().collect();
        if letters.is_empty() {
            return Err(WordleError::InvalidArgument(
                "a constraint needs a non-empty guess".to_string(),
            ));
        }
        if letters.len() != markup.len() {
            return Err(WordleError::WordLength(letters.len()));
        }
        let exact = markup.iter().filter(|m| **m == MarkupType::Exact).count();
        let included = markup
            .iter()
            .filter(|m| **m == MarkupType::Included)
            .count();
        Ok(Constraint {
            candidate: Arc::from(candidate),
            letters,
            markup,
            exact,
            included,
        })
    }

    /// Creates the constraint that results from guessing `guess` when the secret is `secret`.
    ///
    /// ```
    /// use rs_wordle_deduction::Constraint;
    ///
    /// let constraint = Constraint::from_secret("AABB", "ABCD").unwrap();
    ///
    /// assert_eq!(constraint.exact(), 1);
    /// assert_eq!(constraint.included(), 1);
    /// assert!(!constraint.is_correct());
    /// ```
    pub fn from_secret(guess: &str, secret: &str) -> Result<Constraint, WordleError> {
        let markup = get_markup_for_guess(secret, guess)?;
        Constraint::new(guess, markup)
    }

    /// The guessed string.
    pub fn candidate(&self) -> &str {
        &self.candidate
    }

    /// The guessed letters, in order.
    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    /// The markup of each letter, in the same order as the guess.
    pub fn markup(&self) -> &[MarkupType] {
        &self.markup
    }

    /// The number of letters in the guess.
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    /// Always `false`: constraints cannot be built from empty guesses.
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// The number of letters marked [`MarkupType::Exact`].
    pub fn exact(&self) -> usize {
        self.exact
    }

    /// The number of letters marked [`MarkupType::Included`].
    pub fn included(&self) -> usize {
        self.included
    }

    /// Whether this guess was the secret.
    pub fn is_correct(&self) -> bool {
        self.exact == self.letters.len()
    }

    /// Returns `true` iff this constraint still permits `candidate` under the given policy.
    pub fn allows(&self, candidate: &str, policy: ConstraintPolicy) -> bool {
        if policy == ConstraintPolicy::Ignore {
            return true;
        }
        let word: Vec<char> = candidate.chars().collect();
        if word.len() != self.letters.len() {
            return false;
        }
        match policy {
            ConstraintPolicy::Ignore => true,
            ConstraintPolicy::Aggregated => {
                count_matches(&word, &self.letters) == (self.exact, self.included)
            }
            ConstraintPolicy::Positive => self.allows_markup(&word, false),
            ConstraintPolicy::All => self.allows_markup(&word, true),
        }
    }

    fn allows_markup(&self, word: &[char], strict: bool) -> bool {
        let mut available = LetterCounts::default();
        for ((guessed, markup), letter) in self.letters.iter().zip(&self.markup).zip(word) {
            if *markup == MarkupType::Exact {
                if guessed != letter {
                    return false;
                }
            } else {
                available.add(*letter);
            }
        }
        for ((guessed, markup), letter) in self.letters.iter().zip(&self.markup).zip(word) {
            if *markup != MarkupType::Included {
                continue;
            }
            if strict && guessed == letter {
                return false;
            }
            if !available.take(*guessed) {
                return false;
            }
        }
        if !strict {
            return true;
        }
        self.letters
            .iter()
            .zip(&self.markup)
            .zip(word)
            .all(|((guessed, markup), letter)| {
                *markup != MarkupType::No || (guessed != letter && available.count(*guessed) == 0)
            })
    }
}

/// Counts the letters of `guess` that are exact and included matches against `secret`.
///
/// Included letters are matched against the multiset of the secret's non-exact letters, so a
/// repeated letter is counted at most as many times as the secret still has it.
pub(crate) fn count_matches(secret: &[char], guess: &[char]) -> (usize, usize) {
    let mut unused = LetterCounts::default();
    let mut exact = 0;
    for (secret_letter, guess_letter) in secret.iter().zip(guess) {
        if secret_letter == guess_letter {
            exact += 1;
        } else {
            unused.add(*secret_letter);
        }
    }
    let included = secret
        .iter()
        .zip(guess)
        .filter(|(secret_letter, guess_letter)| {
            secret_letter != guess_letter && unused.take(**guess_letter)
        })
        .count();
    (exact, included)
}

/// A small multiset of letters.
///
/// Words are short and alphabets are small, so a flat list beats hashing here.
#[derive(Debug, Default, Clone)]
pub(crate) struct LetterCounts {
    counts: Vec<(char, usize)>,
}

impl LetterCounts {
    pub fn from_letters(letters: &[char]) -> LetterCounts {
        let mut counts = LetterCounts::default();
        for letter in letters {
            counts.add(*letter);
        }
        counts
    }

    pub fn add(&mut self, letter: char) {
        match self.counts.iter_mut().find(|(l, _)| *l == letter) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((letter, 1)),
        }
    }

    /// Removes one instance of `letter`, returning `false` if none was left.
    pub fn take(&mut self, letter: char) -> bool {
        match self.counts.iter_mut().find(|(l, _)| *l == letter) {
            Some((_, count)) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn count(&self, letter: char) -> usize {
        self.counts
            .iter()
            .find(|(l, _)| *l == letter)
            .map_or(0, |(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, usize)> + '_ {
        self.counts.iter().copied()
    }
}

/// The serialized form of a [`Constraint`]; counts are re-derived on load.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct ConstraintRecord {
    candidate: String,
    markup: Vec<MarkupType>,
}

#[cfg(feature = "serde")]
impl TryFrom<ConstraintRecord> for Constraint {
    type Error = WordleError;

    fn try_from(record: ConstraintRecord) -> Result<Self, Self::Error> {
        Constraint::new(&record.candidate, record.markup)
    }
}

#[cfg(feature = "serde")]
impl From<Constraint> for ConstraintRecord {
    fn from(constraint: Constraint) -> Self {
        ConstraintRecord {
            candidate: constraint.candidate.to_string(),
            markup: constraint.markup,
        }
    }
}
