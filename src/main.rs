//! Debug/demo CLI harness for the swipe-typing engine: loads a layout and a
//! dictionary, then predicts, commits, or resets learning state. The
//! `predict` subcommand and the interactive REPL both synthesize a path by
//! walking each character's key centroid — there is no touchscreen here,
//! only a terminal — so typed text stands in for a finger trace.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use swipe_core::SwipeEngine;
use swipe_types::{Candidate, Point};

#[derive(Parser, Debug)]
#[command(author, version, about = "Swipe-typing gesture prediction engine")]
struct Cli {
    /// Keyboard layout document (JSON)
    #[arg(short, long, default_value = "layout.json")]
    layout: PathBuf,

    /// Newline-delimited dictionary word list
    #[arg(short, long, default_value = "words.txt")]
    words: PathBuf,

    /// Optional tab-separated "word\tfreq" file
    #[arg(long)]
    freq: Option<PathBuf>,

    /// Learning-store persistence file
    #[arg(long, default_value = "user_data.mkld")]
    user_data: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Predict candidates for one swipe, synthesized from a typed word
    Predict {
        /// Word to synthesize a path from (demo convenience: no real
        /// touchscreen is attached to a terminal)
        word: String,
        /// Previous committed word, for the learning-boost bigram lookup
        #[arg(long)]
        previous: Option<String>,
    },
    /// Record a committed word to the learning store
    Commit {
        word: String,
        #[arg(long)]
        previous: Option<String>,
    },
    /// Clear the learning store, in memory and on disk
    Reset,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let mut engine = SwipeEngine::with_user_data_path(&cli.user_data);
    engine
        .load_layout(&cli.layout)
        .with_context(|| format!("failed to load layout {:?}", cli.layout))?;
    engine
        .load_dictionary(&cli.words, cli.freq.as_deref())
        .with_context(|| format!("failed to load dictionary {:?}", cli.words))?;

    println!("{}", "Loaded layout and dictionary.".dimmed());

    match cli.command {
        Some(Command::Predict { word, previous }) => {
            run_predict(&engine, &word, previous.as_deref());
        }
        Some(Command::Commit { word, previous }) => {
            engine.record_commit(&word, previous.as_deref());
            engine.save_user_data().context("failed to save learning store")?;
            println!("{}", format!("Recorded commit: {word}").green());
        }
        Some(Command::Reset) => {
            engine.reset_user_data().context("failed to reset learning store")?;
            println!("{}", "Learning store reset.".yellow());
        }
        None => run_repl(&engine)?,
    }

    Ok(())
}

fn run_repl(engine: &SwipeEngine) -> Result<()> {
    println!("{}", "Interactive mode. Type a word to predict; 'exit' or 'quit' to stop.".yellow().bold());
    let mut previous: Option<String> = None;

    loop {
        print!("{}", "swipe> ".blue().bold());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input == "exit" || input == "quit" {
            break;
        }
        if input.is_empty() {
            continue;
        }

        run_predict(engine, input, previous.as_deref());
        previous = Some(input.to_lowercase());
    }

    Ok(())
}

fn run_predict(engine: &SwipeEngine, word: &str, previous: Option<&str>) {
    let Some(path) = synth_path(word, engine) else {
        println!("{}", "No alphabetic keys on the layout match this word.".red());
        return;
    };

    let candidates = engine.predict(&path, previous);
    print_candidates(word, &candidates);
}

/// Demo-only helper: walk each character of `word` to its key centroid,
/// standing in for a real swipe-path sample stream. Unknown characters are
/// skipped; `None` when nothing resolved.
fn synth_path(word: &str, engine: &SwipeEngine) -> Option<Vec<Point>> {
    let points: Vec<Point> = word
        .to_lowercase()
        .chars()
        .filter_map(|c| engine.key_centroid(&c.to_string()))
        .collect();
    if points.is_empty() {
        None
    } else {
        Some(points)
    }
}

fn print_candidates(label: &str, candidates: &[Candidate]) {
    println!("\n{}", format!("Predictions for '{label}'").bold().cyan());
    println!("{}", "-".repeat(60));
    println!("{:<5} | {:<15} | {:<8} | {:<4} | {:<5}", "Rank", "Word", "Score", "Ed", "Bgm");
    println!("{}", "-".repeat(60));

    if candidates.is_empty() {
        println!("{}", "(no candidates)".dimmed());
        return;
    }

    for (i, c) in candidates.iter().enumerate() {
        println!(
            "{} | {} | {} | {} | {}",
            format!("{:<5}", i + 1).yellow(),
            format!("{:<15}", c.word).magenta(),
            format!("{:<8.4}", c.score).green(),
            format!("{:<4}", c.edit_distance).cyan(),
            format!("{:<5}", c.bigram_overlap).cyan(),
        );
    }
}
