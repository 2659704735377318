use crate::feedback::FeedbackPolicy;
use std::collections::HashMap;
use std::result::Result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The result of a given letter at a specific location.
///
/// Markup types are ordered from least to most specific, so that `Exact > Included > No`. Wherever
/// two facts about the same letter are merged, the most specific one wins.
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MarkupType {
    /// This letter does not appear in the secret, or not as many times as it appears in the guess.
    No,
    /// This letter is in the secret, but not at this location.
    Included,
    /// This letter is in the secret at exactly this location.
    Exact,
}

/// Indicates that an error occurred while building or querying the deduction engine.
#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
pub enum WordleError {
    /// Indicates that the given constraints are impossible due to some inconsistency.
    #[error("the given constraints contradict each other")]
    InvalidResults,
    /// Indicates that one or more given characters are not in the supported set.
    #[error("unsupported character {0:?}")]
    UnsupportedCharacter(char),
    /// Indicates that a word or markup had the wrong length. Contains the expected length.
    #[error("expected a length of {0}")]
    WordLength(usize),
    /// Indicates that an engine component was configured with inconsistent arguments.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Indicates that a feedback provider cannot infer hints under the given disclosure policy.
    #[error("feedback policy {0:?} is not supported by this provider")]
    UnsupportedPolicy(FeedbackPolicy),
}

/// Determines the markup of the given `guess` when applied to the given `secret`.
///
/// Letters in the right place are marked [`MarkupType::Exact`] first. Remaining letters are then
/// matched from left to right against the secret's unused letters, so a repeated letter is only
/// marked [`MarkupType::Included`] as many times as it is still available in the secret.
///
/// ```
/// use rs_wordle_deduction::get_markup_for_guess;
/// use rs_wordle_deduction::MarkupType;
///
/// assert_eq!(
///     get_markup_for_guess("ABCD", "AABB").unwrap(),
///     vec![MarkupType::Exact, MarkupType::No, MarkupType::Included, MarkupType::No]
/// );
/// ```
pub fn get_markup_for_guess(secret: &str, guess: &str) -> Result<Vec<MarkupType>, WordleError> {
    let secret: Vec<char> = secret.chars().collect();
    let guess: Vec<char> = guess.chars().collect();
    if secret.len() != guess.len() {
        return Err(WordleError::WordLength(secret.len()));
    }
    let mut markup = vec![MarkupType::No; guess.len()];
    let mut unused: HashMap<char, usize> = HashMap::new();
    for (index, (secret_letter, guess_letter)) in secret.iter().zip(guess.iter()).enumerate() {
        if secret_letter == guess_letter {
            markup[index] = MarkupType::Exact;
        } else {
            *unused.entry(*secret_letter).or_insert(0) += 1;
        }
    }
    for (index, letter) in guess.iter().enumerate() {
        if markup[index] == MarkupType::Exact {
            continue;
        }
        if let Some(count) = unused.get_mut(letter) {
            if *count > 0 {
                *count -= 1;
                markup[index] = MarkupType::Included;
            }
        }
    }
    Ok(markup)
}
