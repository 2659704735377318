use crate::results::WordleError;
use std::io::BufRead;
use std::ops::Deref;
use std::result::Result;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Contains all the words of a vocabulary, such as the legal guesses or the possible secrets.
///
/// Words are trimmed and blank lines are skipped. Case is kept as given, so the vocabulary must
/// use the same case as the guesses that are checked against it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordBank {
    all_words: Vec<Arc<str>>,
    word_length: usize,
}

impl WordBank {
    /// Constructs a new `WordBank` struct by reading words from the given reader.
    ///
    /// The reader should provide one word per line.
    pub fn from_reader<R: BufRead>(word_reader: R) -> Result<Self, WordleError> {
        let words = word_reader
            .lines()
            .collect::<std::io::Result<Vec<String>>>()
            .map_err(|err| WordleError::InvalidArgument(format!("failed to read words: {err}")))?;
        WordBank::from_iterator(words)
    }

    /// Constructs a new `WordBank` from the given words.
    ///
    /// All words must have the same number of characters, else this fails with
    /// [`WordleError::WordLength`] holding the length of the first word.
    pub fn from_iterator<S>(words: impl IntoIterator<Item = S>) -> Result<Self, WordleError>
    where
        S: AsRef<str>,
    {
        let mut word_length = 0;
        let mut all_words = Vec::new();
        for word in words {
            let word = word.as_ref().trim();
            if word.is_empty() {
                continue;
            }
            let length = word.chars().count();
            if word_length == 0 {
                word_length = length;
            } else if word_length != length {
                return Err(WordleError::WordLength(word_length));
            }
            all_words.push(Arc::from(word));
        }
        Ok(WordBank {
            all_words,
            word_length,
        })
    }

    /// Returns the number of words in the bank.
    pub fn len(&self) -> usize {
        self.all_words.len()
    }

    /// Returns whether the bank is empty.
    pub fn is_empty(&self) -> bool {
        self.all_words.is_empty()
    }

    /// Returns the length of each word in the bank, or 0 if the bank is empty.
    pub fn word_length(&self) -> usize {
        self.word_length
    }
}

impl Deref for WordBank {
    type Target = [Arc<str>];

    fn deref(&self) -> &Self::Target {
        &self.all_words
    }
}

/// The legal next guesses and the possible secrets for a given constraint history.
///
/// `solutions` is usually a subset of the secret space, while `guesses` may be wider (for
/// example when guesses do not have to respect earlier hints).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Candidates {
    pub guesses: Vec<Arc<str>>,
    pub solutions: Vec<Arc<str>>,
}

impl Candidates {
    pub fn new(guesses: Vec<Arc<str>>, solutions: Vec<Arc<str>>) -> Candidates {
        Candidates { guesses, solutions }
    }

    /// A single code that is both the only guess and the only solution.
    pub fn single(code: Arc<str>) -> Candidates {
        Candidates {
            guesses: vec![Arc::clone(&code)],
            solutions: vec![code],
        }
    }

    /// Whether there is no legal move left.
    pub fn is_empty(&self) -> bool {
        self.guesses.is_empty() || self.solutions.is_empty()
    }

    /// The number of guess/solution pairs, saturating at `usize::MAX`.
    pub fn product(&self) -> usize {
        self.guesses.len().saturating_mul(self.solutions.len())
    }
}
