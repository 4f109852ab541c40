//! Command-line entry point: harmonize a progression and write MusicXML.

mod difficulty;
mod musicxml;

use anyhow::{Context, Result};
use chorale_core::harmony::{draft_progression_seeded, named_progression};
use chorale_core::{Harmonizer, Key};
use clap::Parser;
use colored::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chorale", about = "Harmonize a chord progression into notated music")]
struct Args {
    /// Comma-separated roman numerals (e.g. "I,vi,IV,V7"), a named
    /// progression (pop, pachelbel, jazz, blues, ...), or "draft"
    #[arg(short, long, default_value = "I,IV,V7,I")]
    progression: String,

    /// Key, e.g. "C", "Gm", "F#m"
    #[arg(short, long, default_value = "C")]
    key: String,

    /// Meter as beats/unit with a power-of-two unit
    #[arg(short, long, default_value = "4/4")]
    meter: String,

    /// Number of measures to generate (the progression cycles)
    #[arg(short = 'n', long, default_value_t = 8)]
    measures: usize,

    /// Difficulty 0-10, mapped onto generation settings
    #[arg(short, long, default_value_t = 4)]
    difficulty: u8,

    /// Random seed for reproducible output
    #[arg(short, long)]
    seed: Option<u64>,

    /// Length of a drafted progression (with --progression draft)
    #[arg(long, default_value_t = 8)]
    draft_length: usize,

    /// Output path
    #[arg(short, long, default_value = "chorale.musicxml")]
    output: PathBuf,
}

fn resolve_progression(args: &Args) -> Result<Vec<String>> {
    let key: Key = args.key.parse()?;

    if args.progression == "draft" {
        let seed = args.seed.unwrap_or(0);
        let tokens = draft_progression_seeded(&key, args.draft_length, seed)?;
        eprintln!("drafted: {}", tokens.join(" ").cyan());
        return Ok(tokens);
    }

    if let Some(tokens) = named_progression(&args.progression, &key) {
        return Ok(tokens);
    }

    Ok(args
        .progression
        .split(',')
        .map(|t| t.trim().to_string())
        .collect())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let progression = resolve_progression(&args)?;
    let settings = difficulty::settings_for_difficulty(args.difficulty);

    let mut harmonizer = match args.seed {
        Some(seed) => Harmonizer::with_seed(settings, seed)?,
        None => Harmonizer::new(settings)?,
    };

    let piece = harmonizer
        .harmonize(&progression, &args.key, &args.meter, args.measures)
        .context("harmonization failed")?;

    let title = format!("Chorale in {}", piece.key);
    let xml = musicxml::to_musicxml(&piece, &title);
    std::fs::write(&args.output, xml)
        .with_context(|| format!("writing {}", args.output.display()))?;

    println!(
        "{} {} measures in {} ({}) -> {}",
        "wrote".green().bold(),
        piece.measures.len(),
        piece.key,
        piece.meter,
        args.output.display()
    );

    if piece.diagnostics.is_empty() {
        println!("{}", "no voice-leading findings".green());
    } else {
        println!(
            "{} {}",
            piece.diagnostics.len().to_string().yellow().bold(),
            "findings:".yellow()
        );
        for diagnostic in &piece.diagnostics {
            println!("  {}", diagnostic);
        }
    }

    Ok(())
}
