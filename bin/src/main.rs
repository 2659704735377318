use clap::{Parser, Subcommand};
use log::{debug, LevelFilter};
use rs_wordle_deduction::feedback::FeedbackProvider;
use rs_wordle_deduction::generators::CandidateGenerator;
use rs_wordle_deduction::*;
use std::error::Error;
use std::fs;
use std::fs::File;
use std::io;
use std::time::Instant;

/// Replays a code-breaking game and shows what can be deduced after each guess.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Path to a file that contains a list of possible words, with one word on each line. If not
    /// given, every code over the alphabet is considered.
    #[clap(short = 'f', long)]
    words_file: Option<String>,

    /// Path to a RON file with the game settings. Missing fields keep their defaults.
    #[clap(short = 's', long)]
    settings: Option<String>,

    /// Log what the engine is doing.
    #[clap(short, long)]
    verbose: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show how many guesses and solutions remain after each guess.
    Candidates {
        /// The secret. If not given, one is picked using the seed from the settings.
        #[clap(long)]
        secret: Option<String>,
        guesses: Vec<String>,
    },
    /// Show what is known about each position and letter after the given guesses.
    Hints {
        /// The secret. If not given, one is picked using the seed from the settings.
        #[clap(long)]
        secret: Option<String>,
        guesses: Vec<String>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let start_time = Instant::now();
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .init();

    let settings = match &args.settings {
        Some(path) => ron::from_str::<GameSettings>(&fs::read_to_string(path)?)?,
        None => GameSettings::default(),
    };
    settings.validate()?;
    debug!("Settings: {settings:?}");

    let word_bank = match &args.words_file {
        Some(path) => {
            let mut words_reader = io::BufReader::new(File::open(path)?);
            let word_bank = WordBank::from_reader(&mut words_reader)?;
            println!("There are {} possible words.", word_bank.len());
            Some(word_bank)
        }
        None => None,
    };

    match args.command {
        Command::Candidates { secret, guesses } => {
            let secret = pick_secret(&settings, word_bank.as_ref(), secret)?;
            show_candidates(&settings, word_bank.as_ref(), &secret, &guesses)?
        }
        Command::Hints { secret, guesses } => {
            let secret = pick_secret(&settings, word_bank.as_ref(), secret)?;
            show_hints(&settings, &secret, &guesses)?
        }
    }

    println!(
        "Command executed in {:.3}s.",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

fn pick_secret(
    settings: &GameSettings,
    word_bank: Option<&WordBank>,
    secret: Option<String>,
) -> Result<String, WordleError> {
    match secret {
        Some(secret) => Ok(secret),
        None => Ok(settings.secret_generator(word_bank)?.code().to_string()),
    }
}

fn replay(secret: &str, guesses: &[String]) -> Result<Vec<Constraint>, WordleError> {
    guesses
        .iter()
        .map(|guess| Constraint::from_secret(guess, secret))
        .collect()
}

fn format_markup(markup: &[MarkupType]) -> String {
    markup
        .iter()
        .map(|markup| match markup {
            MarkupType::Exact => '+',
            MarkupType::Included => '~',
            MarkupType::No => '-',
        })
        .collect()
}

fn show_candidates(
    settings: &GameSettings,
    word_bank: Option<&WordBank>,
    secret: &str,
    guesses: &[String],
) -> Result<(), WordleError> {
    let generator = settings.candidate_generator(word_bank)?;
    let constraints = replay(secret, guesses)?;

    let candidates = generator.generate_candidates(&[]);
    println!(
        "Before guessing: {} guesses, {} solutions",
        candidates.guesses.len(),
        candidates.solutions.len()
    );
    for round in 1..=constraints.len() {
        let constraint = &constraints[round - 1];
        let candidates = generator.generate_candidates(&constraints[..round]);
        println!(
            "{} {}: {} guesses, {} solutions",
            constraint.candidate(),
            format_markup(constraint.markup()),
            candidates.guesses.len(),
            candidates.solutions.len()
        );
        if candidates.solutions.len() <= 10 {
            for solution in candidates.solutions.iter() {
                println!("\t{}", solution);
            }
        }
    }
    Ok(())
}

fn show_hints(settings: &GameSettings, secret: &str, guesses: &[String]) -> Result<(), WordleError> {
    let provider = settings.feedback_provider()?;
    let constraints = replay(secret, guesses)?;
    for constraint in constraints.iter() {
        println!(
            "{} {}",
            constraint.candidate(),
            format_markup(constraint.markup())
        );
    }

    let policy = settings.feedback_policy;
    let feedback = provider.get_feedback(policy, &constraints)?;
    println!("Possible letters under {policy:?}:");
    for (index, letters) in feedback.candidates.iter().enumerate() {
        println!("\t{}: {}", index, letters.iter().collect::<String>());
    }

    println!("|Letter|Occurrences|Markup|Positions|");
    println!("|------|-----------|------|---------|");
    for hint in provider.get_character_feedback(policy, &constraints)?.values() {
        if hint.markup.is_none() && hint.occurrences.min() == 0 {
            continue;
        }
        println!(
            "|{}|{}..={}|{:?}|{:?}|",
            hint.character,
            hint.occurrences.min(),
            hint.occurrences.max(),
            hint.markup,
            hint.positions
        );
    }
    Ok(())
}
