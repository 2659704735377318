#[macro_use]
extern crate assert_matches;

use rs_wordle_deduction::*;

use std::io::Cursor;
use std::result::Result;
use std::sync::Arc;

macro_rules! assert_arc_eq {
    ($arc_vec:expr, $non_arc_vec:expr) => {
        assert_eq!(
            $arc_vec as &[Arc<str>],
            $non_arc_vec
                .iter()
                .map(|thing| Arc::from(*thing))
                .collect::<Vec<Arc<_>>>()
        );
    };
}

#[test]
fn word_bank_from_reader_succeeds() -> Result<(), WordleError> {
    let mut cursor = Cursor::new(String::from("\n\nRAISE\n ARISE\n"));

    let word_bank = WordBank::from_reader(&mut cursor)?;

    assert_eq!(word_bank.len(), 2);
    assert_arc_eq!(&word_bank, &["RAISE", "ARISE"]);
    assert_eq!(word_bank.word_length(), 5);
    Ok(())
}

#[test]
fn word_bank_keeps_case() -> Result<(), WordleError> {
    let word_bank = WordBank::from_iterator(vec!["", "worda", "Wordb "])?;

    assert_arc_eq!(&word_bank, &["worda", "Wordb"]);
    Ok(())
}

#[test]
fn word_bank_from_string_iterator_succeeds() -> Result<(), WordleError> {
    let word_bank = WordBank::from_iterator(vec!["".to_string(), "ABBA".to_string()])?;

    assert_eq!(word_bank.len(), 1);
    assert_eq!(word_bank.word_length(), 4);
    Ok(())
}

#[test]
fn word_bank_counts_characters_not_bytes() -> Result<(), WordleError> {
    let word_bank = WordBank::from_iterator(["ÅBÇD", "ABCD"])?;

    assert_eq!(word_bank.word_length(), 4);
    Ok(())
}

#[test]
fn word_bank_from_reader_mismatched_word_length_fails() {
    let mut cursor = Cursor::new(String::from("\n\nRAISE\n ARISES\n"));

    assert_matches!(
        WordBank::from_reader(&mut cursor),
        Err(WordleError::WordLength(5))
    );
}

#[test]
fn word_bank_empty() -> Result<(), WordleError> {
    let word_bank = WordBank::from_iterator(Vec::<&str>::new())?;

    assert!(word_bank.is_empty());
    assert_eq!(word_bank.word_length(), 0);
    Ok(())
}

#[test]
fn candidates_is_empty() {
    let word: Arc<str> = Arc::from("ABCD");

    assert!(Candidates::default().is_empty());
    assert!(Candidates::new(vec![Arc::clone(&word)], Vec::new()).is_empty());
    assert!(!Candidates::single(word).is_empty());
}
