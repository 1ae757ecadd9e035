use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::Stylize;
use std::io::{stdin, stdout, BufRead, Write};
use std::path::PathBuf;
use swipe_core::core::geometry::distance;
use swipe_core::lexicon::default_sources;
use swipe_core::persistence::save_snapshot;
use swipe_core::{DecoderConfig, Decoder, DictionaryCache, KeyLayout, Point};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const KEY_WIDTH: f64 = 36.0;
const KEY_HEIGHT: f64 = 54.0;
/// Spacing of synthesized touch samples along each stroke.
const SAMPLE_STEP: f64 = 3.0;
/// Samples emitted while "dwelling" on each key.
const DWELL_SAMPLES: usize = 4;
const JITTER: f64 = 4.0;
const SUGGESTION_COUNT: usize = 5;

/// Swipe typing demo: type a word, watch it be swiped and decoded.
#[derive(Parser, Debug)]
#[command(name = "swipe_engine", version)]
struct Args {
    /// Extra newline-delimited word list merged into the dictionary
    #[arg(long)]
    words: Option<PathBuf>,

    /// Compiled dictionary snapshot (defaults to the per-user location)
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Write the loaded dictionary to the snapshot path and exit
    #[arg(long)]
    compile: bool,

    /// Decoder tuning file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &args.config {
        Some(path) => DecoderConfig::load(path)
            .with_context(|| format!("Failed to load decoder config: {}", path.display()))?,
        None => DecoderConfig::default(),
    };

    let snapshot_path = args.snapshot.clone().or_else(swipe_core::persistence::default_snapshot_path);
    let cache = DictionaryCache::new(default_sources(args.words.as_deref(), snapshot_path.as_deref()));
    let decoder = Decoder::new(cache).with_config(config)?;

    if args.compile {
        let path = snapshot_path.context("No snapshot path available on this platform")?;
        let dictionary = decoder.dictionary().snapshot().context("Failed to load dictionary")?;
        save_snapshot(&dictionary, &path)
            .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;
        println!("Compiled {} words into '{}'", dictionary.len(), path.display());
        return Ok(());
    }

    let layout = KeyLayout::qwerty(KEY_WIDTH, KEY_HEIGHT)?;
    let words = decoder.dictionary().snapshot().context("Failed to load dictionary")?.len();

    println!("{}", "Swipe Typing Demo".bold());
    println!("---------------------------------------------------------------");
    println!("Dictionary: {} words. Type a word and press [Enter]; 'exit' quits.\n", words);
    prompt()?;

    for line in stdin().lock().lines() {
        let input = line.context("Failed to read stdin")?;
        let word = input.trim().to_ascii_lowercase();
        match word.as_str() {
            "exit" => break,
            "" => {}
            _ => run_one(&decoder, &layout, &word),
        }
        prompt()?;
    }
    Ok(())
}

fn prompt() -> Result<()> {
    print!("\n> ");
    stdout().flush().context("Failed to flush stdout")
}

fn run_one(decoder: &Decoder, layout: &KeyLayout, word: &str) {
    let path = synthesize_swipe(layout, word);
    println!("Swiped '{}' as {} touch points", word, path.len());

    match decoder.decode(&path, layout) {
        Some(predicted) if predicted == word => println!("Prediction: {}", predicted.green().bold()),
        Some(predicted) => println!("Prediction: {}", predicted.yellow().bold()),
        None => println!("Prediction: {}", "(none)".red()),
    }

    let suggestions = decoder.suggestions(&path, layout, SUGGESTION_COUNT);
    if !suggestions.is_empty() {
        println!("\nSuggestions:");
        for (i, candidate) in suggestions.iter().enumerate() {
            println!(
                "  {}: {:<14} total {:>8.3}  spatial {:>8.3}  freq {:>6.0}",
                i + 1,
                candidate.word,
                candidate.total,
                candidate.spatial,
                candidate.frequency
            );
        }
    }
}

/// A touch trace through the word's key centers: a short dwell on each key,
/// evenly spaced samples along each stroke, and a deterministic wobble.
fn synthesize_swipe(layout: &KeyLayout, word: &str) -> Vec<Point> {
    let centers = layout.ideal_path(word);
    let mut path = Vec::new();
    let mut n = 0usize;
    let mut push = |path: &mut Vec<Point>, p: Point| {
        let wobble = (n as f64 * 0.7).sin() * JITTER;
        path.push(Point::new(p.x + wobble, p.y - wobble / 2.0));
        n += 1;
    };

    for (i, &center) in centers.iter().enumerate() {
        for _ in 0..DWELL_SAMPLES {
            push(&mut path, center);
        }
        let Some(&next) = centers.get(i + 1) else {
            break;
        };
        let steps = (distance(&center, &next) / SAMPLE_STEP).ceil() as usize;
        for s in 1..steps {
            let t = s as f64 / steps as f64;
            push(
                &mut path,
                Point::new(center.x + (next.x - center.x) * t, center.y + (next.y - center.y) * t),
            );
        }
    }
    path
}
