#[macro_use]
extern crate assert_matches;

use rs_wordle_deduction::*;

use std::result::Result;

const PAIRS: [(&str, &str); 8] = [
    ("AABB", "ABCD"),
    ("AABB", "AAAA"),
    ("ABCD", "DCBA"),
    ("ABBA", "BAAB"),
    ("DDDD", "ABCD"),
    ("CABA", "ABAC"),
    ("BBBB", "BBBB"),
    ("ACAD", "CADA"),
];

fn all_codes(alphabet: &[char], length: usize) -> Vec<String> {
    let mut codes = vec![String::new()];
    for _ in 0..length {
        codes = codes
            .iter()
            .flat_map(|prefix| {
                alphabet.iter().map(move |letter| {
                    let mut code = prefix.clone();
                    code.push(*letter);
                    code
                })
            })
            .collect();
    }
    codes
}

#[test]
fn from_secret_counts_repeated_letters() -> Result<(), WordleError> {
    let constraint = Constraint::from_secret("AABB", "ABCD")?;

    assert_eq!(
        constraint.markup(),
        &[
            MarkupType::Exact,
            MarkupType::No,
            MarkupType::Included,
            MarkupType::No
        ]
    );
    assert_eq!(constraint.exact(), 1);
    assert_eq!(constraint.included(), 1);
    assert!(!constraint.is_correct());
    Ok(())
}

#[test]
fn from_secret_correct_guess() -> Result<(), WordleError> {
    let constraint = Constraint::from_secret("CRANE", "CRANE")?;

    assert!(constraint.is_correct());
    assert_eq!(constraint.exact(), 5);
    assert_eq!(constraint.included(), 0);
    Ok(())
}

#[test]
fn from_secret_mismatched_lengths_fails() {
    assert_matches!(
        Constraint::from_secret("ABC", "ABCD"),
        Err(WordleError::WordLength(4))
    );
}

#[test]
fn constraint_allows_its_own_secret() -> Result<(), WordleError> {
    for (guess, secret) in PAIRS {
        let constraint = Constraint::from_secret(guess, secret)?;

        assert!(constraint.allows(secret, ConstraintPolicy::All), "{guess} {secret}");
        assert!(constraint.allows(secret, ConstraintPolicy::Positive));
        assert!(constraint.allows(secret, ConstraintPolicy::Aggregated));
        assert!(constraint.allows(guess, ConstraintPolicy::Ignore));
        assert!(constraint.allows("anything", ConstraintPolicy::Ignore));
    }
    Ok(())
}

#[test]
fn markup_round_trip_keeps_counts() -> Result<(), WordleError> {
    for (guess, secret) in PAIRS {
        let derived = Constraint::from_secret(guess, secret)?;
        let rebuilt = Constraint::new(guess, derived.markup().to_vec())?;

        assert_eq!(rebuilt.exact(), derived.exact());
        assert_eq!(rebuilt.included(), derived.included());
        assert_eq!(rebuilt, derived);
    }
    Ok(())
}

#[test]
fn allows_aggregated_matches_counts() -> Result<(), WordleError> {
    let constraint = Constraint::from_secret("AABB", "ABCD")?;

    assert!(constraint.allows("ABCD", ConstraintPolicy::Aggregated));
    assert!(constraint.allows("BACD", ConstraintPolicy::Aggregated));
    // Two exact letters.
    assert!(!constraint.allows("AAAA", ConstraintPolicy::Aggregated));
    // No letters in common.
    assert!(!constraint.allows("CCDD", ConstraintPolicy::Aggregated));
    Ok(())
}

#[test]
fn allows_all_matches_recomputed_markup() -> Result<(), WordleError> {
    let codes = all_codes(&['A', 'B', 'C', 'D'], 4);
    for (guess, secret) in PAIRS {
        let constraint = Constraint::from_secret(guess, secret)?;
        for code in &codes {
            let same_markup = get_markup_for_guess(code, guess)? == constraint.markup();
            assert_eq!(
                constraint.allows(code, ConstraintPolicy::All),
                same_markup,
                "{code} against {guess} (secret {secret})"
            );
        }
    }
    Ok(())
}

#[test]
fn policies_are_nested() -> Result<(), WordleError> {
    let codes = all_codes(&['A', 'B', 'C'], 4);
    for (guess, secret) in [("AABB", "ABCA"), ("CABA", "ABAC"), ("BBBB", "CCCC")] {
        let constraint = Constraint::from_secret(guess, secret)?;
        for code in &codes {
            if constraint.allows(code, ConstraintPolicy::All) {
                assert!(constraint.allows(code, ConstraintPolicy::Positive), "{code}");
                assert!(constraint.allows(code, ConstraintPolicy::Aggregated), "{code}");
            }
        }
    }
    Ok(())
}
