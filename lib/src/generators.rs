//! Strategies that produce the legal guesses and possible solutions for a constraint history.
//!
//! Each generator is a pure function of the constraints it is given. Generators that scan a large
//! source (a vocabulary or every code over an alphabet) memoize their last result in a monotonic
//! [`ConstraintCache`], so that adding one constraint per round only filters the previous
//! candidates instead of rescanning the whole source.

use crate::cache::CacheMiss;
use crate::cache::CacheMode;
use crate::cache::ConstraintCache;
use crate::constraint::Constraint;
use crate::constraint::ConstraintPolicy;
use crate::constraint::LetterCounts;
use crate::data::Candidates;
use crate::data::WordBank;
use crate::results::WordleError;
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::result::Result;
use std::sync::Arc;

/// Word lists at least this long are filtered in parallel.
const PARALLEL_FILTER_THRESHOLD: usize = 2048;

/// The largest code space that can be enumerated in a shuffled order.
pub const MAX_SHUFFLED_CODES: usize = 1 << 22;

/// An extra predicate that every candidate must satisfy, on top of the constraints.
pub type CandidateFilter = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Produces the legal guesses and possible solutions for a list of constraints.
pub trait CandidateGenerator: Send + Sync {
    /// Returns the candidates that remain after the given constraints.
    ///
    /// The result only depends on the set of constraints given, not on their order or on earlier
    /// calls.
    fn generate_candidates(&self, constraints: &[Constraint]) -> Arc<Candidates>;
}

/// Returns a filter that rejects candidates using any one character more than
/// `max_occurrences` times.
///
/// ```
/// use rs_wordle_deduction::generators::max_occurrences_filter;
///
/// let filter = max_occurrences_filter(2);
///
/// assert!(filter("AABC"));
/// assert!(!filter("AAAB"));
/// ```
pub fn max_occurrences_filter(max_occurrences: usize) -> CandidateFilter {
    Arc::new(move |word: &str| {
        let letters: Vec<char> = word.chars().collect();
        LetterCounts::from_letters(&letters)
            .iter()
            .all(|(_, count)| count <= max_occurrences)
    })
}

/// The checks shared by every filtering generator.
#[derive(Clone)]
struct CandidateCriteria {
    guess_policy: ConstraintPolicy,
    solution_policy: ConstraintPolicy,
    filter: Option<CandidateFilter>,
}

impl CandidateCriteria {
    fn new(guess_policy: ConstraintPolicy, solution_policy: ConstraintPolicy) -> CandidateCriteria {
        CandidateCriteria {
            guess_policy,
            solution_policy,
            filter: None,
        }
    }

    fn passes_filter(&self, word: &str) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(word))
    }

    fn is_guess(&self, word: &str, constraints: &[&Constraint]) -> bool {
        is_permitted(word, self.guess_policy, constraints)
    }

    fn is_solution(&self, word: &str, constraints: &[&Constraint]) -> bool {
        is_permitted(word, self.solution_policy, constraints)
    }

    /// Keeps the guesses and solutions of `previous` that are still permitted by `added`.
    fn narrow(&self, previous: &Candidates, added: &[&Constraint]) -> Candidates {
        Candidates::new(
            filter_words(&previous.guesses, |word| self.is_guess(word, added)),
            filter_words(&previous.solutions, |word| self.is_solution(word, added)),
        )
    }
}

fn is_permitted(word: &str, policy: ConstraintPolicy, constraints: &[&Constraint]) -> bool {
    constraints
        .iter()
        .all(|constraint| constraint.candidate() != word && constraint.allows(word, policy))
}

/// Filters `words` in order, in parallel for long lists.
fn filter_words<F>(words: &[Arc<str>], keep: F) -> Vec<Arc<str>>
where
    F: Fn(&str) -> bool + Sync + Send,
{
    if words.len() >= PARALLEL_FILTER_THRESHOLD {
        words
            .par_iter()
            .filter(|word| keep(&word[..]))
            .cloned()
            .collect()
    } else {
        words.iter().filter(|word| keep(&word[..])).cloned().collect()
    }
}

/// Filters fixed word lists by the constraints.
///
/// Guesses and solutions can come from different lists, and be checked against different
/// policies. For example, with [`ConstraintPolicy::Ignore`] for guesses and
/// [`ConstraintPolicy::All`] for solutions, any word may be guessed while the solutions narrow
/// down to the words that could still be the secret.
///
/// ```
/// use rs_wordle_deduction::generators::CandidateGenerator;
/// use rs_wordle_deduction::generators::VocabularyGenerator;
/// use rs_wordle_deduction::Constraint;
/// use rs_wordle_deduction::ConstraintPolicy;
/// use rs_wordle_deduction::WordBank;
///
/// let bank = WordBank::from_iterator(["RAISE", "ARISE", "STARE"]).unwrap();
/// let generator = VocabularyGenerator::new(&bank, ConstraintPolicy::All, ConstraintPolicy::All);
///
/// let candidates =
///     generator.generate_candidates(&[Constraint::from_secret("RAISE", "ARISE").unwrap()]);
///
/// assert_eq!(candidates.solutions.len(), 1);
/// assert_eq!(&*candidates.solutions[0], "ARISE");
/// ```
pub struct VocabularyGenerator {
    guesses: Vec<Arc<str>>,
    solutions: Option<Vec<Arc<str>>>,
    criteria: CandidateCriteria,
    cache: ConstraintCache<(), Arc<Candidates>>,
}

impl VocabularyGenerator {
    /// Creates a generator that draws both guesses and solutions from `vocabulary`.
    pub fn new(
        vocabulary: &WordBank,
        guess_policy: ConstraintPolicy,
        solution_policy: ConstraintPolicy,
    ) -> VocabularyGenerator {
        VocabularyGenerator {
            guesses: vocabulary.to_vec(),
            solutions: None,
            criteria: CandidateCriteria::new(guess_policy, solution_policy),
            cache: ConstraintCache::new(CacheMode::Monotonic),
        }
    }

    /// Creates a generator with a separate solution vocabulary.
    ///
    /// Fails with [`WordleError::WordLength`] if the two vocabularies use different word lengths.
    pub fn with_solutions(
        guesses: &WordBank,
        solutions: &WordBank,
        guess_policy: ConstraintPolicy,
        solution_policy: ConstraintPolicy,
    ) -> Result<VocabularyGenerator, WordleError> {
        if !guesses.is_empty()
            && !solutions.is_empty()
            && guesses.word_length() != solutions.word_length()
        {
            return Err(WordleError::WordLength(guesses.word_length()));
        }
        let mut generator = VocabularyGenerator::new(guesses, guess_policy, solution_policy);
        generator.solutions = Some(solutions.to_vec());
        Ok(generator)
    }

    /// Adds a filter that every guess and solution must pass.
    pub fn with_filter(mut self, filter: CandidateFilter) -> VocabularyGenerator {
        self.criteria.filter = Some(filter);
        self.cache.clear();
        self
    }

    fn generate_fresh(&self, constraints: &[&Constraint]) -> Candidates {
        let criteria = &self.criteria;
        let guesses = filter_words(&self.guesses, |word| {
            criteria.passes_filter(word) && criteria.is_guess(word, constraints)
        });
        let solutions = filter_words(
            self.solutions.as_deref().unwrap_or(&self.guesses),
            |word| criteria.passes_filter(word) && criteria.is_solution(word, constraints),
        );
        Candidates::new(guesses, solutions)
    }
}

impl CandidateGenerator for VocabularyGenerator {
    fn generate_candidates(&self, constraints: &[Constraint]) -> Arc<Candidates> {
        let candidates = self.cache.get_or_update(&(), constraints, |miss| match miss {
            CacheMiss::Fresh => {
                let all: Vec<&Constraint> = constraints.iter().collect();
                Arc::new(self.generate_fresh(&all))
            }
            CacheMiss::Narrow { previous, added } => {
                Arc::new(self.criteria.narrow(previous, &added))
            }
        });
        debug!(
            "Vocabulary generator: {} guesses, {} solutions",
            candidates.guesses.len(),
            candidates.solutions.len()
        );
        candidates
    }
}

#[derive(Clone)]
struct EnumeratedCandidates {
    candidates: Arc<Candidates>,
    truncated: bool,
}

/// Generates every code of a fixed length over a finite alphabet, then filters them like
/// [`VocabularyGenerator`].
///
/// Codes are produced in alphabet order unless shuffled with a seed. With a truncation
/// threshold, enumeration stops as soon as the number of guesses times the number of solutions
/// reaches it.
pub struct EnumerationGenerator {
    alphabet: Vec<char>,
    length: usize,
    num_codes: usize,
    order: Option<Vec<u32>>,
    truncation: Option<usize>,
    criteria: CandidateCriteria,
    cache: ConstraintCache<(), EnumeratedCandidates>,
}

impl EnumerationGenerator {
    /// Creates a generator for every code of `length` characters from `alphabet`.
    ///
    /// Fails if the alphabet is empty or has duplicates, if the length is zero, or if the number
    /// of codes does not fit in a `usize`.
    pub fn new(
        alphabet: &[char],
        length: usize,
        guess_policy: ConstraintPolicy,
        solution_policy: ConstraintPolicy,
    ) -> Result<EnumerationGenerator, WordleError> {
        validate_alphabet(alphabet)?;
        if length == 0 {
            return Err(WordleError::InvalidArgument(
                "code length must be positive".to_string(),
            ));
        }
        let num_codes = u32::try_from(length)
            .ok()
            .and_then(|length| alphabet.len().checked_pow(length))
            .ok_or_else(|| {
                WordleError::InvalidArgument(format!(
                    "{} codes of length {length} cannot be enumerated",
                    alphabet.len()
                ))
            })?;
        Ok(EnumerationGenerator {
            alphabet: alphabet.to_vec(),
            length,
            num_codes,
            order: None,
            truncation: None,
            criteria: CandidateCriteria::new(guess_policy, solution_policy),
            cache: ConstraintCache::new(CacheMode::Monotonic),
        })
    }

    /// Enumerates codes in an order shuffled by the given seed.
    pub fn shuffled(mut self, seed: u64) -> Result<EnumerationGenerator, WordleError> {
        if self.num_codes > MAX_SHUFFLED_CODES {
            return Err(WordleError::InvalidArgument(format!(
                "cannot shuffle {} codes",
                self.num_codes
            )));
        }
        // Bounded by MAX_SHUFFLED_CODES, so every index fits in a u32.
        let mut order: Vec<u32> = (0..self.num_codes as u32).collect();
        order.shuffle(&mut StdRng::seed_from_u64(seed));
        self.order = Some(order);
        self.cache.clear();
        Ok(self)
    }

    /// Stops enumerating once `guesses * solutions` reaches `threshold`.
    pub fn with_truncation(mut self, threshold: usize) -> Result<EnumerationGenerator, WordleError> {
        if threshold == 0 {
            return Err(WordleError::InvalidArgument(
                "truncation threshold must be positive".to_string(),
            ));
        }
        self.truncation = Some(threshold);
        self.cache.clear();
        Ok(self)
    }

    /// Adds a filter that every guess and solution must pass.
    pub fn with_filter(mut self, filter: CandidateFilter) -> EnumerationGenerator {
        self.criteria.filter = Some(filter);
        self.cache.clear();
        self
    }

    /// The number of codes in the full code space.
    pub fn num_codes(&self) -> usize {
        self.num_codes
    }

    /// Whether the last generated result was cut short by the truncation threshold.
    pub fn was_truncated(&self, constraints: &[Constraint]) -> bool {
        self.generate(constraints).truncated
    }

    fn code_at(&self, mut index: usize) -> String {
        let base = self.alphabet.len();
        let mut letters = vec![self.alphabet[0]; self.length];
        for letter in letters.iter_mut().rev() {
            *letter = self.alphabet[index % base];
            index /= base;
        }
        letters.into_iter().collect()
    }

    fn codes(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        match &self.order {
            Some(order) => Box::new(order.iter().map(|index| *index as usize)),
            None => Box::new(0..self.num_codes),
        }
    }

    fn enumerate(&self, constraints: &[&Constraint]) -> EnumeratedCandidates {
        let mut guesses = Vec::new();
        let mut solutions = Vec::new();
        let mut truncated = false;
        for index in self.codes() {
            let code = self.code_at(index);
            if !self.criteria.passes_filter(&code) {
                continue;
            }
            let is_guess = self.criteria.is_guess(&code, constraints);
            let is_solution = self.criteria.is_solution(&code, constraints);
            if !is_guess && !is_solution {
                continue;
            }
            let code: Arc<str> = Arc::from(code);
            if is_guess {
                guesses.push(Arc::clone(&code));
            }
            if is_solution {
                solutions.push(code);
            }
            if let Some(threshold) = self.truncation {
                if guesses.len().saturating_mul(solutions.len()) >= threshold {
                    truncated = true;
                    break;
                }
            }
        }
        debug!(
            "Enumerated {} guesses and {} solutions (truncated: {truncated})",
            guesses.len(),
            solutions.len()
        );
        EnumeratedCandidates {
            candidates: Arc::new(Candidates::new(guesses, solutions)),
            truncated,
        }
    }

    fn generate(&self, constraints: &[Constraint]) -> EnumeratedCandidates {
        self.cache.get_or_update(&(), constraints, |miss| match miss {
            CacheMiss::Narrow { previous, added } if !previous.truncated => EnumeratedCandidates {
                candidates: Arc::new(self.criteria.narrow(&previous.candidates, &added)),
                truncated: false,
            },
            _ => {
                let all: Vec<&Constraint> = constraints.iter().collect();
                self.enumerate(&all)
            }
        })
    }
}

impl CandidateGenerator for EnumerationGenerator {
    fn generate_candidates(&self, constraints: &[Constraint]) -> Arc<Candidates> {
        self.generate(constraints).candidates
    }
}

/// Always returns exactly one code, as both the only guess and the only solution.
///
/// Used once the secret has been committed to and there is nothing left to narrow.
pub struct SingleCodeGenerator {
    candidates: Arc<Candidates>,
}

impl SingleCodeGenerator {
    pub fn new(code: &str) -> Result<SingleCodeGenerator, WordleError> {
        if code.is_empty() {
            return Err(WordleError::InvalidArgument(
                "the code must not be empty".to_string(),
            ));
        }
        Ok(SingleCodeGenerator {
            candidates: Arc::new(Candidates::single(Arc::from(code))),
        })
    }

    /// Picks the code from `vocabulary` using the given seed.
    pub fn from_vocabulary(
        vocabulary: &WordBank,
        seed: u64,
    ) -> Result<SingleCodeGenerator, WordleError> {
        if vocabulary.is_empty() {
            return Err(WordleError::InvalidArgument(
                "cannot pick a code from an empty vocabulary".to_string(),
            ));
        }
        let index = StdRng::seed_from_u64(seed).gen_range(0..vocabulary.len());
        Ok(SingleCodeGenerator {
            candidates: Arc::new(Candidates::single(Arc::clone(&vocabulary[index]))),
        })
    }

    /// Builds a random code of `length` characters from `alphabet` using the given seed.
    pub fn from_alphabet(
        alphabet: &[char],
        length: usize,
        seed: u64,
    ) -> Result<SingleCodeGenerator, WordleError> {
        validate_alphabet(alphabet)?;
        let mut rng = StdRng::seed_from_u64(seed);
        let code: String = (0..length)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
            .collect();
        SingleCodeGenerator::new(&code)
    }

    pub fn code(&self) -> &str {
        &self.candidates.solutions[0]
    }
}

impl CandidateGenerator for SingleCodeGenerator {
    fn generate_candidates(&self, _constraints: &[Constraint]) -> Arc<Candidates> {
        Arc::clone(&self.candidates)
    }
}

/// The minimum sizes a [`CascadingGenerator`] stage's result must reach to be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeThresholds {
    pub guesses: usize,
    pub solutions: usize,
    /// The minimum of `guesses * solutions`.
    pub product: usize,
}

impl CascadeThresholds {
    fn are_met_by(&self, candidates: &Candidates) -> bool {
        candidates.guesses.len() >= self.guesses
            && candidates.solutions.len() >= self.solutions
            && candidates.product() >= self.product
    }
}

/// Tries a list of generators, ordered from cheapest to most thorough.
///
/// The result of each generator but the last is used if it meets the thresholds. Otherwise the
/// next generator is tried, and the last one is used unconditionally. This lets early rounds use
/// small, pre-truncated word lists, and only fall back to the full vocabulary once the candidates
/// become scarce.
pub struct CascadingGenerator {
    thresholds: CascadeThresholds,
    generators: Vec<Box<dyn CandidateGenerator>>,
}

impl CascadingGenerator {
    pub fn new(
        thresholds: CascadeThresholds,
        generators: Vec<Box<dyn CandidateGenerator>>,
    ) -> Result<CascadingGenerator, WordleError> {
        if generators.is_empty() {
            return Err(WordleError::InvalidArgument(
                "a cascade needs at least one generator".to_string(),
            ));
        }
        Ok(CascadingGenerator {
            thresholds,
            generators,
        })
    }
}

impl CandidateGenerator for CascadingGenerator {
    fn generate_candidates(&self, constraints: &[Constraint]) -> Arc<Candidates> {
        let (last, rest) = match self.generators.split_last() {
            Some(split) => split,
            None => return Arc::new(Candidates::default()),
        };
        for (stage, generator) in rest.iter().enumerate() {
            let candidates = generator.generate_candidates(constraints);
            if self.thresholds.are_met_by(&candidates) {
                debug!("Cascade using stage {stage}");
                return candidates;
            }
        }
        debug!("Cascade using final stage {}", rest.len());
        last.generate_candidates(constraints)
    }
}

pub(crate) fn validate_alphabet(alphabet: &[char]) -> Result<(), WordleError> {
    if alphabet.is_empty() {
        return Err(WordleError::InvalidArgument(
            "the alphabet must not be empty".to_string(),
        ));
    }
    for (index, letter) in alphabet.iter().enumerate() {
        if alphabet[..index].contains(letter) {
            return Err(WordleError::InvalidArgument(format!(
                "the alphabet repeats {letter:?}"
            )));
        }
    }
    Ok(())
}
