//! Per-position and per-letter hints derived from a constraint history.
//!
//! A [`FeedbackProvider`] turns the constraints of a game into [`Feedback`] (which letters can
//! still be at each position, and how many times each letter can occur) and into
//! [`CharacterFeedback`] for keyboard-style hinting. How much can be deduced depends on the
//! [`FeedbackPolicy`], i.e. on what the game disclosed to the player about each guess.

use crate::cache::CacheMiss;
use crate::cache::CacheMode;
use crate::cache::ConstraintCache;
use crate::constraint::Constraint;
use crate::constraint::LetterCounts;
use crate::generators::validate_alphabet;
use crate::results::MarkupType;
use crate::results::WordleError;
use log::debug;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::result::Result;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How much of each constraint the game disclosed to the player.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FeedbackPolicy {
    /// The markup of every letter is shown.
    CharacterMarkup,
    /// Only the number of exact and included letters is shown.
    AggregatedMarkup,
    /// Only the number of letters in common with the secret (exact plus included) is shown.
    CountIncluded,
    /// Only the number of exact letters is shown.
    CountExact,
}

/// An inclusive range for the number of times a letter occurs in the secret.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "OccurrenceRangeRecord")
)]
pub struct OccurrenceRange {
    min: usize,
    max: usize,
}

impl OccurrenceRange {
    /// Returns `None` if `min > max`.
    pub fn new(min: usize, max: usize) -> Option<OccurrenceRange> {
        if min > max {
            return None;
        }
        Some(OccurrenceRange { min, max })
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn contains(&self, count: usize) -> bool {
        self.min <= count && count <= self.max
    }

    /// Whether this range is at least as tight as `other`.
    pub fn is_within(&self, other: &OccurrenceRange) -> bool {
        other.min <= self.min && self.max <= other.max
    }
}

/// The serialized form of an [`OccurrenceRange`], checked on load.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct OccurrenceRangeRecord {
    min: usize,
    max: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<OccurrenceRangeRecord> for OccurrenceRange {
    type Error = WordleError;

    fn try_from(record: OccurrenceRangeRecord) -> Result<Self, Self::Error> {
        OccurrenceRange::new(record.min, record.max).ok_or_else(|| {
            WordleError::InvalidArgument(format!(
                "occurrence range {}..={} is empty",
                record.min, record.max
            ))
        })
    }
}

/// What is known about the secret as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Feedback {
    /// The letters that may still be at each position.
    pub candidates: Vec<BTreeSet<char>>,
    /// The number of times each letter of the alphabet may occur.
    pub occurrences: BTreeMap<char, OccurrenceRange>,
}

/// What is known about one letter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CharacterFeedback {
    pub character: char,
    pub occurrences: OccurrenceRange,
    /// Positions known to hold this letter.
    pub positions: BTreeSet<usize>,
    /// Positions known not to hold this letter.
    pub absent_positions: BTreeSet<usize>,
    /// The most specific markup known for this letter, if any.
    pub markup: Option<MarkupType>,
}

/// Derives hints from a constraint history.
pub trait FeedbackProvider: Send + Sync {
    /// Whether this provider can infer hints under `policy`.
    fn supports(&self, policy: FeedbackPolicy) -> bool;

    /// Returns what is known about each position and each letter's occurrences.
    ///
    /// Fails with [`WordleError::UnsupportedPolicy`] if the policy is not supported, with
    /// [`WordleError::WordLength`] or [`WordleError::UnsupportedCharacter`] if a constraint does
    /// not fit the provider's board, and with [`WordleError::InvalidResults`] if the constraints
    /// contradict each other.
    fn get_feedback(
        &self,
        policy: FeedbackPolicy,
        constraints: &[Constraint],
    ) -> Result<Feedback, WordleError>;

    /// Returns what is known about each letter of the alphabet.
    fn get_character_feedback(
        &self,
        policy: FeedbackPolicy,
        constraints: &[Constraint],
    ) -> Result<BTreeMap<char, CharacterFeedback>, WordleError>;
}

/// Which markup types may be synthesized from deduced facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MarkupGates {
    pub exact: bool,
    pub included: bool,
    pub no: bool,
}

impl MarkupGates {
    /// The player never learns positions under [`FeedbackPolicy::CountIncluded`], nor presence
    /// under [`FeedbackPolicy::CountExact`], so those hints are not synthesized.
    pub fn for_policy(policy: FeedbackPolicy) -> MarkupGates {
        match policy {
            FeedbackPolicy::CharacterMarkup | FeedbackPolicy::AggregatedMarkup => MarkupGates {
                exact: true,
                included: true,
                no: true,
            },
            FeedbackPolicy::CountIncluded => MarkupGates {
                exact: false,
                included: true,
                no: true,
            },
            FeedbackPolicy::CountExact => MarkupGates {
                exact: true,
                included: false,
                no: true,
            },
        }
    }
}

/// The mutable knowledge state shared by the providers.
///
/// Every update only ever shrinks a position's candidate set, narrows an occurrence range, or
/// strengthens a markup. Updates return whether anything changed, and fail with
/// [`WordleError::InvalidResults`] instead of leaving an empty set or an inverted range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Deductions {
    alphabet: Vec<char>,
    positions: Vec<BTreeSet<char>>,
    occurrences: BTreeMap<char, OccurrenceRange>,
    markup: BTreeMap<char, MarkupType>,
}

impl Deductions {
    pub fn new(alphabet: &[char], length: usize) -> Deductions {
        let all: BTreeSet<char> = alphabet.iter().copied().collect();
        Deductions {
            alphabet: alphabet.to_vec(),
            positions: vec![all; length],
            occurrences: alphabet
                .iter()
                .map(|letter| (*letter, OccurrenceRange { min: 0, max: length }))
                .collect(),
            markup: BTreeMap::new(),
        }
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    pub fn length(&self) -> usize {
        self.positions.len()
    }

    pub fn range(&self, letter: char) -> OccurrenceRange {
        self.occurrences
            .get(&letter)
            .copied()
            .unwrap_or(OccurrenceRange { min: 0, max: 0 })
    }

    pub fn is_possible(&self, index: usize, letter: char) -> bool {
        self.positions[index].contains(&letter)
    }

    pub fn is_fixed(&self, index: usize, letter: char) -> bool {
        self.positions[index].len() == 1 && self.positions[index].contains(&letter)
    }

    fn fixed_count(&self, letter: char) -> usize {
        (0..self.length())
            .filter(|index| self.is_fixed(*index, letter))
            .count()
    }

    fn possible_count(&self, letter: char) -> usize {
        self.positions
            .iter()
            .filter(|candidates| candidates.contains(&letter))
            .count()
    }

    /// Checks that the constraint fits this board.
    pub fn check_supported(&self, constraint: &Constraint) -> Result<(), WordleError> {
        if constraint.len() != self.length() {
            return Err(WordleError::WordLength(self.length()));
        }
        match constraint
            .letters()
            .iter()
            .find(|letter| !self.occurrences.contains_key(letter))
        {
            Some(letter) => Err(WordleError::UnsupportedCharacter(*letter)),
            None => Ok(()),
        }
    }

    pub fn set_exact(&mut self, index: usize, letter: char) -> Result<bool, WordleError> {
        let candidates = &mut self.positions[index];
        if !candidates.contains(&letter) {
            return Err(WordleError::InvalidResults);
        }
        if candidates.len() == 1 {
            return Ok(false);
        }
        candidates.retain(|candidate| *candidate == letter);
        Ok(true)
    }

    pub fn exclude(&mut self, index: usize, letter: char) -> Result<bool, WordleError> {
        let candidates = &mut self.positions[index];
        if !candidates.remove(&letter) {
            return Ok(false);
        }
        if candidates.is_empty() {
            return Err(WordleError::InvalidResults);
        }
        Ok(true)
    }

    pub fn bound_min(&mut self, letter: char, min: usize) -> Result<bool, WordleError> {
        let range = self.range_mut(letter)?;
        if min <= range.min {
            return Ok(false);
        }
        if min > range.max {
            return Err(WordleError::InvalidResults);
        }
        range.min = min;
        Ok(true)
    }

    pub fn bound_max(&mut self, letter: char, max: usize) -> Result<bool, WordleError> {
        let range = self.range_mut(letter)?;
        if max >= range.max {
            return Ok(false);
        }
        if max < range.min {
            return Err(WordleError::InvalidResults);
        }
        range.max = max;
        Ok(true)
    }

    fn range_mut(&mut self, letter: char) -> Result<&mut OccurrenceRange, WordleError> {
        self.occurrences
            .get_mut(&letter)
            .ok_or(WordleError::UnsupportedCharacter(letter))
    }

    /// Records `markup` for `letter` if it is more specific than what is known.
    pub fn strengthen_markup(&mut self, letter: char, markup: MarkupType) -> bool {
        match self.markup.get(&letter) {
            Some(known) if *known >= markup => false,
            _ => {
                self.markup.insert(letter, markup);
                true
            }
        }
    }

    /// Applies what a constraint's per-letter markup says directly.
    pub fn apply_markup(&mut self, constraint: &Constraint) -> Result<bool, WordleError> {
        let mut changed = false;
        for (index, (letter, markup)) in constraint
            .letters()
            .iter()
            .zip(constraint.markup())
            .enumerate()
        {
            changed |= match markup {
                MarkupType::Exact => self.set_exact(index, *letter)?,
                MarkupType::Included | MarkupType::No => self.exclude(index, *letter)?,
            };
            changed |= self.strengthen_markup(*letter, *markup);
        }
        let mut present = LetterCounts::default();
        let mut absent = LetterCounts::default();
        for (letter, markup) in constraint.letters().iter().zip(constraint.markup()) {
            match markup {
                MarkupType::No => absent.add(*letter),
                _ => present.add(*letter),
            }
        }
        for (letter, count) in present.iter() {
            changed |= self.bound_min(letter, count)?;
        }
        for (letter, _) in absent.iter() {
            // Every other occurrence was already marked exact or included.
            changed |= self.bound_max(letter, present.count(letter))?;
        }
        Ok(changed)
    }

    /// Bounds each letter's occurrences by the positions that hold it or could hold it.
    pub fn bound_by_positions(&mut self) -> Result<bool, WordleError> {
        let mut changed = false;
        for letter in self.alphabet.clone() {
            changed |= self.bound_min(letter, self.fixed_count(letter))?;
            changed |= self.bound_max(letter, self.possible_count(letter))?;
        }
        Ok(changed)
    }

    /// Makes positions and occurrence ranges agree with each other.
    ///
    /// A letter whose maximum is used up by fixed positions is removed everywhere else, and a
    /// letter whose minimum needs every position it could still be at is fixed there. The
    /// minimums of the other letters also cap each letter's maximum.
    pub fn settle(&mut self) -> Result<bool, WordleError> {
        let mut changed = self.bound_by_positions()?;
        let length = self.length();
        for letter in self.alphabet.clone() {
            let range = self.range(letter);
            if range.max == self.fixed_count(letter) {
                for index in 0..length {
                    if !self.is_fixed(index, letter) {
                        changed |= self.exclude(index, letter)?;
                    }
                }
            } else if range.min == self.possible_count(letter) {
                for index in 0..length {
                    if self.is_possible(index, letter) {
                        changed |= self.set_exact(index, letter)?;
                    }
                }
            }
        }
        let total_min: usize = self.occurrences.values().map(|range| range.min).sum();
        if total_min > length {
            return Err(WordleError::InvalidResults);
        }
        for letter in self.alphabet.clone() {
            let others_min = total_min - self.range(letter).min;
            changed |= self.bound_max(letter, length - others_min)?;
        }
        Ok(changed)
    }

    /// Derives markup from the current facts, limited to the markup types in `gates`.
    pub fn synthesize_markup(&mut self, gates: MarkupGates) -> bool {
        let mut changed = false;
        for letter in self.alphabet.clone() {
            let range = self.range(letter);
            if range.min > 0 {
                if gates.included {
                    changed |= self.strengthen_markup(letter, MarkupType::Included);
                }
                if gates.exact && self.fixed_count(letter) > 0 {
                    changed |= self.strengthen_markup(letter, MarkupType::Exact);
                }
            } else if range.max == 0 && gates.no {
                changed |= self.strengthen_markup(letter, MarkupType::No);
            }
        }
        changed
    }

    pub fn to_feedback(&self) -> Feedback {
        Feedback {
            candidates: self.positions.clone(),
            occurrences: self.occurrences.clone(),
        }
    }

    pub fn to_character_feedback(&self) -> BTreeMap<char, CharacterFeedback> {
        self.alphabet
            .iter()
            .map(|letter| {
                let feedback = CharacterFeedback {
                    character: *letter,
                    occurrences: self.range(*letter),
                    positions: (0..self.length())
                        .filter(|index| self.is_fixed(*index, *letter))
                        .collect(),
                    absent_positions: (0..self.length())
                        .filter(|index| !self.is_possible(*index, *letter))
                        .collect(),
                    markup: self.markup.get(letter).copied(),
                };
                (*letter, feedback)
            })
            .collect()
    }
}

/// Validates the board shared by both providers.
pub(crate) fn validate_board(alphabet: &[char], length: usize) -> Result<(), WordleError> {
    validate_alphabet(alphabet)?;
    if length == 0 {
        return Err(WordleError::InvalidArgument(
            "code length must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Reports only what the markup of each constraint says directly, without any inference across
/// letters or constraints.
///
/// Supports [`FeedbackPolicy::CharacterMarkup`] only.
pub struct DirectMarkupFeedbackProvider {
    alphabet: Vec<char>,
    length: usize,
    cache: ConstraintCache<FeedbackPolicy, Arc<Deductions>>,
}

impl DirectMarkupFeedbackProvider {
    pub fn new(alphabet: &[char], length: usize) -> Result<DirectMarkupFeedbackProvider, WordleError> {
        validate_board(alphabet, length)?;
        Ok(DirectMarkupFeedbackProvider {
            alphabet: alphabet.to_vec(),
            length,
            cache: ConstraintCache::new(CacheMode::Monotonic),
        })
    }

    fn deductions(
        &self,
        policy: FeedbackPolicy,
        constraints: &[Constraint],
    ) -> Result<Arc<Deductions>, WordleError> {
        if !self.supports(policy) {
            return Err(WordleError::UnsupportedPolicy(policy));
        }
        self.cache
            .try_get_or_update(&policy, constraints, |miss| -> Result<_, WordleError> {
                let (mut deductions, to_apply) = match miss {
                    CacheMiss::Fresh => (
                        Deductions::new(&self.alphabet, self.length),
                        constraints.iter().collect(),
                    ),
                    CacheMiss::Narrow { previous, added } => ((**previous).clone(), added),
                };
                for constraint in to_apply {
                    deductions.check_supported(constraint)?;
                    deductions.apply_markup(constraint)?;
                }
                deductions.bound_by_positions()?;
                debug!("Direct feedback from {} constraints", constraints.len());
                Ok(Arc::new(deductions))
            })
    }
}

impl FeedbackProvider for DirectMarkupFeedbackProvider {
    fn supports(&self, policy: FeedbackPolicy) -> bool {
        policy == FeedbackPolicy::CharacterMarkup
    }

    fn get_feedback(
        &self,
        policy: FeedbackPolicy,
        constraints: &[Constraint],
    ) -> Result<Feedback, WordleError> {
        Ok(self.deductions(policy, constraints)?.to_feedback())
    }

    fn get_character_feedback(
        &self,
        policy: FeedbackPolicy,
        constraints: &[Constraint],
    ) -> Result<BTreeMap<char, CharacterFeedback>, WordleError> {
        Ok(self.deductions(policy, constraints)?.to_character_feedback())
    }
}
