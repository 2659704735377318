//! Fixed-point inference of hints under every [`FeedbackPolicy`].
//!
//! Each policy contributes its own rules for what one constraint implies. The rules are applied
//! to one constraint until nothing changes, then to the next, and the whole list is swept again
//! until a full sweep changes nothing. Every rule only removes possibilities, so the number of
//! sweeps is bounded by the size of the knowledge state.

use crate::cache::CacheMiss;
use crate::cache::CacheMode;
use crate::cache::ConstraintCache;
use crate::constraint::Constraint;
use crate::constraint::LetterCounts;
use crate::feedback::validate_board;
use crate::feedback::CharacterFeedback;
use crate::feedback::Deductions;
use crate::feedback::Feedback;
use crate::feedback::FeedbackPolicy;
use crate::feedback::FeedbackProvider;
use crate::feedback::MarkupGates;
use crate::results::WordleError;
use log::debug;
use log::warn;
use std::collections::BTreeMap;
use std::result::Result;
use std::sync::Arc;

/// Infers everything the player could have deduced from the disclosed feedback.
///
/// Unlike [`DirectMarkupFeedbackProvider`](crate::feedback::DirectMarkupFeedbackProvider), facts
/// learned from one constraint are used to tighten what the others imply. With
/// [`FeedbackPolicy::AggregatedMarkup`] this turns bare exact/included counts into per-position
/// and per-letter facts:
///
/// ```
/// use rs_wordle_deduction::feedback::FeedbackPolicy;
/// use rs_wordle_deduction::feedback::FeedbackProvider;
/// use rs_wordle_deduction::inference::InferredMarkupFeedbackProvider;
/// use rs_wordle_deduction::Constraint;
///
/// let provider = InferredMarkupFeedbackProvider::new(&['A', 'B', 'C', 'D'], 4).unwrap();
/// // Nothing in "AABB" is in the secret.
/// let constraints = [Constraint::from_secret("AABB", "CDDC").unwrap()];
///
/// let hints = provider
///     .get_character_feedback(FeedbackPolicy::AggregatedMarkup, &constraints)
///     .unwrap();
///
/// assert_eq!(hints[&'A'].occurrences.max(), 0);
/// assert_eq!(hints[&'C'].occurrences.min(), 0);
/// ```
pub struct InferredMarkupFeedbackProvider {
    alphabet: Vec<char>,
    length: usize,
    cache: ConstraintCache<FeedbackPolicy, Arc<Deductions>>,
}

impl InferredMarkupFeedbackProvider {
    pub fn new(
        alphabet: &[char],
        length: usize,
    ) -> Result<InferredMarkupFeedbackProvider, WordleError> {
        validate_board(alphabet, length)?;
        Ok(InferredMarkupFeedbackProvider {
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
        self.cache
            .try_get_or_update(&policy, constraints, |miss| -> Result<_, WordleError> {
                // Earlier facts stay true when constraints are added, but they may unlock new
                // deductions from old constraints, so every constraint is swept again.
                let start = match miss {
                    CacheMiss::Fresh => Deductions::new(&self.alphabet, self.length),
                    CacheMiss::Narrow { previous, .. } => (**previous).clone(),
                };
                let (deductions, sweeps) = propagate(policy, start, constraints)?;
                debug!(
                    "Inferred {policy:?} feedback from {} constraints in {sweeps} sweeps",
                    constraints.len()
                );
                Ok(Arc::new(deductions))
            })
    }
}

impl FeedbackProvider for InferredMarkupFeedbackProvider {
    fn supports(&self, _policy: FeedbackPolicy) -> bool {
        true
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

/// The most sweeps that can change anything, plus the final sweep that confirms the fixed point.
///
/// Each changing sweep removes at least one letter from a position, narrows a range by at least
/// one, or strengthens one letter's markup by at least one step.
fn max_sweeps(alphabet_size: usize, length: usize) -> usize {
    let position_removals = alphabet_size * length;
    let range_narrowing = alphabet_size * length;
    let markup_steps = alphabet_size * 3;
    position_removals + range_narrowing + markup_steps + 1
}

/// Applies the rules of `policy` for every constraint to `deductions` until nothing changes.
///
/// Returns the final state and the number of sweeps over the constraint list.
pub(crate) fn propagate(
    policy: FeedbackPolicy,
    mut deductions: Deductions,
    constraints: &[Constraint],
) -> Result<(Deductions, usize), WordleError> {
    for constraint in constraints {
        deductions.check_supported(constraint)?;
    }
    let gates = MarkupGates::for_policy(policy);
    let limit = max_sweeps(deductions.alphabet().len(), deductions.length());
    for sweep in 1..=limit {
        let mut changed = false;
        for constraint in constraints {
            while apply_rules(policy, &mut deductions, constraint)? | deductions.settle()? {
                changed = true;
            }
        }
        changed |= deductions.settle()?;
        changed |= deductions.synthesize_markup(gates);
        if !changed {
            return Ok((deductions, sweep));
        }
    }
    warn!("Feedback inference stopped after {limit} sweeps without converging");
    Ok((deductions, limit))
}

fn apply_rules(
    policy: FeedbackPolicy,
    deductions: &mut Deductions,
    constraint: &Constraint,
) -> Result<bool, WordleError> {
    match policy {
        FeedbackPolicy::CharacterMarkup => deductions.apply_markup(constraint),
        FeedbackPolicy::AggregatedMarkup => {
            Ok(apply_exact_count(deductions, constraint)?
                | apply_common_count(deductions, constraint)?)
        }
        FeedbackPolicy::CountIncluded => apply_common_count(deductions, constraint),
        FeedbackPolicy::CountExact => apply_exact_count(deductions, constraint),
    }
}

/// Uses the number of exact letters to settle the positions of the guess.
///
/// If the positions already known to match account for every exact letter, none of the
/// undecided positions match. If every undecided position is needed to reach the count, they
/// all match.
fn apply_exact_count(
    deductions: &mut Deductions,
    constraint: &Constraint,
) -> Result<bool, WordleError> {
    let mut known = 0;
    let mut undecided = Vec::new();
    for (index, letter) in constraint.letters().iter().enumerate() {
        if deductions.is_fixed(index, *letter) {
            known += 1;
        } else if deductions.is_possible(index, *letter) {
            undecided.push((index, *letter));
        }
    }
    let exact = constraint.exact();
    if known > exact || known + undecided.len() < exact {
        return Err(WordleError::InvalidResults);
    }
    let mut changed = false;
    if known == exact {
        for (index, letter) in undecided {
            changed |= deductions.exclude(index, letter)?;
        }
    } else if known + undecided.len() == exact {
        for (index, letter) in undecided {
            changed |= deductions.set_exact(index, letter)?;
        }
    }
    Ok(changed)
}

/// Uses the number of letters in common with the secret to bound each guessed letter's
/// occurrences.
///
/// A letter guessed `n` times contributes `min(n, occurrences)` to the count. The known minimums
/// of the other letters cap how much is left for this one; when that cap is below `n`, it also
/// caps the letter's occurrences. Likewise the other letters' maximums force a minimum
/// contribution.
fn apply_common_count(
    deductions: &mut Deductions,
    constraint: &Constraint,
) -> Result<bool, WordleError> {
    let common = constraint.exact() + constraint.included();
    let guessed = LetterCounts::from_letters(constraint.letters());
    let contributions: Vec<(char, usize, usize, usize)> = guessed
        .iter()
        .map(|(letter, count)| {
            let range = deductions.range(letter);
            (
                letter,
                count,
                count.min(range.min()),
                count.min(range.max()),
            )
        })
        .collect();
    let total_min: usize = contributions.iter().map(|(_, _, min, _)| min).sum();
    let total_max: usize = contributions.iter().map(|(_, _, _, max)| max).sum();
    if common < total_min || common > total_max {
        return Err(WordleError::InvalidResults);
    }
    let mut changed = false;
    for (letter, count, min, max) in contributions {
        // Overrepresented: the others already use up most of the count.
        let most = common - (total_min - min);
        if most < count {
            changed |= deductions.bound_max(letter, most)?;
        }
        // Necessary: the others cannot make up the count without this letter.
        let least = common.saturating_sub(total_max - max);
        changed |= deductions.bound_min(letter, least)?;
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::MarkupType;

    const ABCD: [char; 4] = ['A', 'B', 'C', 'D'];

    fn constraint(guess: &str, secret: &str) -> Constraint {
        Constraint::from_secret(guess, secret).unwrap()
    }

    #[test]
    fn max_sweeps_grows_with_board() {
        assert!(max_sweeps(4, 4) < max_sweeps(26, 5));
        assert_eq!(max_sweeps(4, 4), 16 + 16 + 12 + 1);
    }

    #[test]
    fn exact_count_zero_excludes_every_position() -> Result<(), WordleError> {
        let mut deductions = Deductions::new(&ABCD, 4);

        assert!(apply_exact_count(&mut deductions, &constraint("ABCD", "BADC"))?);

        for (index, letter) in ABCD.iter().enumerate() {
            assert!(!deductions.is_possible(index, *letter));
        }
        Ok(())
    }

    #[test]
    fn exact_count_full_fixes_every_position() -> Result<(), WordleError> {
        let mut deductions = Deductions::new(&ABCD, 4);

        apply_exact_count(&mut deductions, &constraint("ABCD", "ABCD"))?;

        for (index, letter) in ABCD.iter().enumerate() {
            assert!(deductions.is_fixed(index, *letter));
        }
        Ok(())
    }

    #[test]
    fn exact_count_uses_known_positions() -> Result<(), WordleError> {
        let mut deductions = Deductions::new(&ABCD, 4);
        deductions.set_exact(0, 'A')?;

        // One exact letter, and it is already known to be the 'A'.
        apply_exact_count(&mut deductions, &constraint("ABBC", "ACDB"))?;

        assert!(!deductions.is_possible(1, 'B'));
        assert!(!deductions.is_possible(2, 'B'));
        assert!(!deductions.is_possible(3, 'C'));
        Ok(())
    }

    #[test]
    fn common_count_zero_removes_letters() -> Result<(), WordleError> {
        let mut deductions = Deductions::new(&ABCD, 4);

        apply_common_count(&mut deductions, &constraint("AABB", "CDDC"))?;

        assert_eq!(deductions.range('A').max(), 0);
        assert_eq!(deductions.range('B').max(), 0);
        assert_eq!(deductions.range('C').max(), 4);
        Ok(())
    }

    #[test]
    fn common_count_full_requires_letters() -> Result<(), WordleError> {
        let mut deductions = Deductions::new(&ABCD, 4);

        apply_common_count(&mut deductions, &constraint("ABCD", "DCBA"))?;

        for letter in ABCD {
            assert_eq!(deductions.range(letter).min(), 1);
        }
        Ok(())
    }

    #[test]
    fn common_count_overrepresented_letter() -> Result<(), WordleError> {
        let mut deductions = Deductions::new(&ABCD, 4);
        deductions.bound_min('C', 1)?;

        // Only one letter in common, and 'C' is known to be in the secret, so the guessed 'A's
        // cannot be.
        apply_common_count(&mut deductions, &constraint("AAAC", "CBBB"))?;

        assert_eq!(deductions.range('A').max(), 0);
        Ok(())
    }

    #[test]
    fn propagate_character_markup_reaches_fixed_point() -> Result<(), WordleError> {
        let (deductions, sweeps) = propagate(
            FeedbackPolicy::CharacterMarkup,
            Deductions::new(&ABCD, 4),
            &[constraint("AABB", "ABCD")],
        )?;

        // 'B' can only be at position 1 once 'A' is pinned to position 0.
        assert!(deductions.is_fixed(0, 'A'));
        assert!(deductions.is_fixed(1, 'B'));
        let feedback = deductions.to_character_feedback();
        assert_eq!(feedback[&'B'].markup, Some(MarkupType::Exact));
        assert!(sweeps <= max_sweeps(4, 4));
        Ok(())
    }

    fn all_codes(length: usize) -> Vec<String> {
        let mut codes = vec![String::new()];
        for _ in 0..length {
            codes = codes
                .iter()
                .flat_map(|prefix| ABCD.iter().map(move |letter| format!("{prefix}{letter}")))
                .collect();
        }
        codes
    }

    #[test]
    fn propagate_converges_within_board_size() -> Result<(), WordleError> {
        let histories: [&[&str]; 4] = [
            &["AABB"],
            &["AABB", "CDCD"],
            &["ABCD", "AAAA", "DCBA"],
            &["BBBB", "ACAD", "CABA"],
        ];
        let bound = ABCD.len() * 4;
        for policy in [
            FeedbackPolicy::CharacterMarkup,
            FeedbackPolicy::AggregatedMarkup,
            FeedbackPolicy::CountIncluded,
            FeedbackPolicy::CountExact,
        ] {
            for secret in all_codes(4) {
                for guesses in histories {
                    let constraints: Vec<Constraint> = guesses
                        .iter()
                        .map(|guess| constraint(guess, &secret))
                        .collect();

                    let (_, sweeps) = propagate(policy, Deductions::new(&ABCD, 4), &constraints)?;

                    assert!(
                        sweeps <= bound,
                        "{policy:?} {guesses:?} {secret}: {sweeps} sweeps"
                    );
                }
            }
        }
        Ok(())
    }

    #[test]
    fn propagate_detects_contradictions() {
        let result = propagate(
            FeedbackPolicy::AggregatedMarkup,
            Deductions::new(&ABCD, 4),
            &[constraint("ABCD", "ABCD"), constraint("ABCD", "DCBA")],
        );

        assert_eq!(result.err(), Some(WordleError::InvalidResults));
    }
}
