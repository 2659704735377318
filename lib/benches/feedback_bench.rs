#![feature(test)]

extern crate test;

use rs_wordle_deduction::feedback::*;
use rs_wordle_deduction::inference::InferredMarkupFeedbackProvider;
use rs_wordle_deduction::*;
use test::Bencher;

fn bench_policy(b: &mut Bencher, policy: FeedbackPolicy) -> Result<(), WordleError> {
    let alphabet: Vec<char> = ('A'..='Z').collect();
    let constraints: Vec<Constraint> = ["RAISE", "CLOUT", "NYMPH", "STERN"]
        .iter()
        .map(|guess| Constraint::from_secret(guess, "TERSE"))
        .collect::<Result<_, _>>()?;

    b.iter(|| {
        let provider = InferredMarkupFeedbackProvider::new(&alphabet, 5)?;
        provider.get_feedback(policy, &constraints)
    });
    Ok(())
}

#[bench]
fn bench_inferred_character_markup(b: &mut Bencher) -> Result<(), WordleError> {
    bench_policy(b, FeedbackPolicy::CharacterMarkup)
}

#[bench]
fn bench_inferred_aggregated_markup(b: &mut Bencher) -> Result<(), WordleError> {
    bench_policy(b, FeedbackPolicy::AggregatedMarkup)
}

#[bench]
fn bench_inferred_count_included(b: &mut Bencher) -> Result<(), WordleError> {
    bench_policy(b, FeedbackPolicy::CountIncluded)
}
