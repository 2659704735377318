use crate::constraint::ConstraintPolicy;
use crate::data::WordBank;
use crate::feedback::validate_board;
use crate::feedback::FeedbackPolicy;
use crate::generators::max_occurrences_filter;
use crate::generators::CandidateGenerator;
use crate::generators::EnumerationGenerator;
use crate::generators::SingleCodeGenerator;
use crate::generators::VocabularyGenerator;
use crate::inference::InferredMarkupFeedbackProvider;
use crate::results::WordleError;
use std::result::Result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The static parameters of one game.
///
/// The defaults describe classic Wordle: five letters from `A` to `Z`, any word may be guessed,
/// and every letter's markup is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct GameSettings {
    pub code_length: usize,
    pub alphabet: Vec<char>,
    /// How earlier constraints restrict the next guess.
    pub guess_policy: ConstraintPolicy,
    /// How earlier constraints restrict the possible secrets.
    pub solution_policy: ConstraintPolicy,
    /// What the player is shown about each guess.
    pub feedback_policy: FeedbackPolicy,
    /// The most times any one character may appear in a code.
    pub max_occurrences: Option<usize>,
    pub seed: u64,
    /// Whether enumerated codes are shuffled with `seed`.
    pub shuffle: bool,
    /// Stops enumerating codes once `guesses * solutions` reaches this.
    pub truncation: Option<usize>,
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettings {
            code_length: 5,
            alphabet: ('A'..='Z').collect(),
            guess_policy: ConstraintPolicy::Ignore,
            solution_policy: ConstraintPolicy::All,
            feedback_policy: FeedbackPolicy::CharacterMarkup,
            max_occurrences: None,
            seed: 0,
            shuffle: false,
            truncation: None,
        }
    }
}

impl GameSettings {
    /// Checks that the settings describe a playable board.
    pub fn validate(&self) -> Result<(), WordleError> {
        validate_board(&self.alphabet, self.code_length)?;
        if self.max_occurrences == Some(0) {
            return Err(WordleError::InvalidArgument(
                "max_occurrences must be at least 1".to_string(),
            ));
        }
        if self.truncation == Some(0) {
            return Err(WordleError::InvalidArgument(
                "truncation must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the candidate generator for these settings.
    ///
    /// Filters `vocabulary` when one is given, else enumerates every code over the alphabet.
    pub fn candidate_generator(
        &self,
        vocabulary: Option<&WordBank>,
    ) -> Result<Box<dyn CandidateGenerator>, WordleError> {
        self.validate()?;
        match vocabulary {
            Some(vocabulary) => {
                self.check_vocabulary(vocabulary)?;
                let mut generator =
                    VocabularyGenerator::new(vocabulary, self.guess_policy, self.solution_policy);
                if let Some(max) = self.max_occurrences {
                    generator = generator.with_filter(max_occurrences_filter(max));
                }
                Ok(Box::new(generator))
            }
            None => {
                let mut generator = EnumerationGenerator::new(
                    &self.alphabet,
                    self.code_length,
                    self.guess_policy,
                    self.solution_policy,
                )?;
                if self.shuffle {
                    generator = generator.shuffled(self.seed)?;
                }
                if let Some(threshold) = self.truncation {
                    generator = generator.with_truncation(threshold)?;
                }
                if let Some(max) = self.max_occurrences {
                    generator = generator.with_filter(max_occurrences_filter(max));
                }
                Ok(Box::new(generator))
            }
        }
    }

    /// Picks the secret for these settings from `vocabulary`, or from the alphabet if none is
    /// given, using the seed.
    pub fn secret_generator(
        &self,
        vocabulary: Option<&WordBank>,
    ) -> Result<SingleCodeGenerator, WordleError> {
        self.validate()?;
        match vocabulary {
            Some(vocabulary) => {
                self.check_vocabulary(vocabulary)?;
                SingleCodeGenerator::from_vocabulary(vocabulary, self.seed)
            }
            None => SingleCodeGenerator::from_alphabet(&self.alphabet, self.code_length, self.seed),
        }
    }

    /// Builds the feedback provider for this board.
    pub fn feedback_provider(&self) -> Result<InferredMarkupFeedbackProvider, WordleError> {
        self.validate()?;
        InferredMarkupFeedbackProvider::new(&self.alphabet, self.code_length)
    }

    fn check_vocabulary(&self, vocabulary: &WordBank) -> Result<(), WordleError> {
        if !vocabulary.is_empty() && vocabulary.word_length() != self.code_length {
            return Err(WordleError::WordLength(self.code_length));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(GameSettings::default().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_bad_settings() {
        let settings = GameSettings {
            code_length: 0,
            ..GameSettings::default()
        };
        assert!(settings.validate().is_err());

        let settings = GameSettings {
            alphabet: vec!['A', 'A'],
            ..GameSettings::default()
        };
        assert!(settings.validate().is_err());

        let settings = GameSettings {
            max_occurrences: Some(0),
            ..GameSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn vocabulary_length_must_match() -> Result<(), WordleError> {
        let settings = GameSettings::default();
        let bank = WordBank::from_iterator(["ABCD"])?;

        assert!(matches!(
            settings.candidate_generator(Some(&bank)),
            Err(WordleError::WordLength(5))
        ));
        Ok(())
    }
}
