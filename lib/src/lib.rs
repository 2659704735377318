#![cfg_attr(feature = "unstable", feature(test))]

//! A deduction engine for Wordle-style and Mastermind-style code-breaking games.
//!
//! Given the [`Constraint`]s revealed by past guesses, this crate:
//!
//! * produces the legal next guesses and the possible secrets, with the
//!   [`generators`](crate::generators) module, and
//! * infers what the player knows about each position and letter under different disclosure
//!   policies, with the [`feedback`](crate::feedback) and [`inference`](crate::inference)
//!   modules.
//!
//! ```
//! use rs_wordle_deduction::feedback::FeedbackPolicy;
//! use rs_wordle_deduction::feedback::FeedbackProvider;
//! use rs_wordle_deduction::generators::CandidateGenerator;
//! use rs_wordle_deduction::*;
//!
//! let settings = GameSettings::default();
//! let bank = WordBank::from_iterator(["RAISE", "ARISE", "STARE", "CRANE"])?;
//! let generator = settings.candidate_generator(Some(&bank))?;
//! let provider = settings.feedback_provider()?;
//!
//! let constraints = vec![Constraint::from_secret("RAISE", "ARISE")?];
//! let candidates = generator.generate_candidates(&constraints);
//! let hints = provider.get_character_feedback(FeedbackPolicy::CharacterMarkup, &constraints)?;
//!
//! assert_eq!(candidates.solutions.len(), 1);
//! assert_eq!(hints[&'S'].markup, Some(MarkupType::Exact));
//! # Ok::<(), WordleError>(())
//! ```

mod cache;
mod config;
mod constraint;
mod data;
pub mod feedback;
pub mod generators;
pub mod inference;
mod results;

pub use config::GameSettings;
pub use constraint::Constraint;
pub use constraint::ConstraintPolicy;
pub use data::Candidates;
pub use data::WordBank;
pub use results::*;

/// Building blocks for custom generators and providers.
pub mod details {
    pub use crate::cache::CacheMiss;
    pub use crate::cache::CacheMode;
    pub use crate::cache::ConstraintCache;
}
