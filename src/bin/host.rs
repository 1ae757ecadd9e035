// Line-protocol bridge for a keyboard front end.
//
// Requests on stdin, one per line:
//   LAYOUT <file.json> | QWERTY <key_width> <key_height>
//   BEGIN | POINT <x> <y> | END
//   RELOAD | EXIT
// Replies on stdout:
//   OK | ERROR <message> | COMMIT_TEXT <word> | NO_PREDICTION | RELOADED <words>
use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{channel, Sender};
use std::sync::Arc;
use std::thread;
use swipe_core::lexicon::default_sources;
use swipe_core::persistence::default_snapshot_path;
use swipe_core::{DecoderConfig, Decoder, DictionaryCache, KeyLayout, Point};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "swipe_host", version, about = "Swipe decoder line-protocol host")]
struct Args {
    /// Extra newline-delimited word list merged into the dictionary
    #[arg(long)]
    words: Option<PathBuf>,

    /// Compiled dictionary snapshot (defaults to the per-user location)
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Decoder tuning file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Key layout file (JSON list of {label, x, y, width, height})
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

enum Reply {
    Line(String),
    Decoded { gesture: u64, word: Option<String> },
}

/// Per-gesture capture state on the input thread.
struct Session {
    decoder: Decoder,
    layout: KeyLayout,
    points: Vec<Point>,
    gesture: Arc<AtomicU64>,
    replies: Sender<Reply>,
}

impl Session {
    fn reply(&self, line: impl Into<String>) {
        let _ = self.replies.send(Reply::Line(line.into()));
    }

    fn handle(&mut self, input: &str) -> bool {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let command = parts.first().copied().unwrap_or("");

        match command {
            "LAYOUT" => match parts.get(1).map(|p| load_layout(Path::new(p))) {
                Some(Ok(layout)) => {
                    info!(keys = layout.len(), "layout loaded");
                    self.layout = layout;
                    self.reply("OK");
                }
                Some(Err(e)) => self.reply(format!("ERROR {:#}", e)),
                None => self.reply("ERROR LAYOUT needs a file path"),
            },
            "QWERTY" => {
                let width = parts.get(1).and_then(|s| s.parse().ok());
                let height = parts.get(2).and_then(|s| s.parse().ok());
                match (width, height) {
                    (Some(w), Some(h)) => match KeyLayout::qwerty(w, h) {
                        Ok(layout) => {
                            self.layout = layout;
                            self.reply("OK");
                        }
                        Err(e) => self.reply(format!("ERROR {}", e)),
                    },
                    _ => self.reply("ERROR QWERTY needs <key_width> <key_height>"),
                }
            }
            "BEGIN" => {
                // Any decode still running for the previous gesture is now stale.
                self.gesture.fetch_add(1, Ordering::SeqCst);
                self.points.clear();
            }
            "POINT" => {
                let x = parts.get(1).and_then(|s| s.parse().ok());
                let y = parts.get(2).and_then(|s| s.parse().ok());
                match (x, y) {
                    (Some(x), Some(y)) => self.points.push(Point::new(x, y)),
                    _ => debug!(input, "ignoring malformed POINT"),
                }
            }
            "END" => {
                let gesture = self.gesture.load(Ordering::SeqCst);
                let points = std::mem::take(&mut self.points);
                let replies = self.replies.clone();
                debug!(gesture, points = points.len(), "dispatching decode");
                self.decoder
                    .decode_with_callback(points, self.layout.clone(), move |word| {
                        let _ = replies.send(Reply::Decoded { gesture, word });
                    });
            }
            "RELOAD" => {
                let replies = self.replies.clone();
                self.decoder.refresh_with_callback(move |result| {
                    let line = match result {
                        Ok(words) => format!("RELOADED {}", words),
                        Err(e) => format!("ERROR {}", e),
                    };
                    let _ = replies.send(Reply::Line(line));
                });
            }
            "EXIT" => return false,
            "" => {}
            _ => warn!(command, "unknown command"),
        }
        true
    }
}

fn load_layout(path: &Path) -> Result<KeyLayout> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read layout file: {}", path.display()))?;
    let layout: KeyLayout = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse layout file: {}", path.display()))?;
    Ok(layout)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = match &args.config {
        Some(path) => DecoderConfig::load(path)
            .with_context(|| format!("Failed to load decoder config: {}", path.display()))?,
        None => DecoderConfig::default(),
    };
    let layout = match &args.layout {
        Some(path) => load_layout(path)?,
        None => KeyLayout::empty(),
    };

    let snapshot_path = args.snapshot.clone().or_else(default_snapshot_path);
    let cache = DictionaryCache::new(default_sources(args.words.as_deref(), snapshot_path.as_deref()));
    let decoder = Decoder::new(cache).with_config(config)?;

    // Warm the cache off the input path so the first gesture is not slowed down.
    let warm = decoder.clone();
    thread::spawn(move || {
        if let Err(e) = warm.dictionary().snapshot() {
            warn!(error = %e, "initial dictionary load failed");
        }
    });

    let gesture = Arc::new(AtomicU64::new(0));
    let (replies, inbox) = channel::<Reply>();

    // All stdout writes go through one thread so replies never interleave.
    let current = Arc::clone(&gesture);
    let writer = thread::spawn(move || -> io::Result<()> {
        let mut stdout = io::stdout();
        for reply in inbox {
            let line = match reply {
                Reply::Line(line) => line,
                Reply::Decoded { gesture, .. } if gesture != current.load(Ordering::SeqCst) => {
                    debug!(gesture, "dropping stale decode result");
                    continue;
                }
                Reply::Decoded { word: Some(word), .. } => format!("COMMIT_TEXT {}", word),
                Reply::Decoded { word: None, .. } => "NO_PREDICTION".to_string(),
            };
            writeln!(stdout, "{}", line)?;
            stdout.flush()?;
        }
        Ok(())
    });

    info!("swipe host ready");
    let mut session = Session {
        decoder,
        layout,
        points: Vec::new(),
        gesture,
        replies,
    };

    for line in io::stdin().lock().lines() {
        let input = line.context("Failed to read stdin")?;
        if !session.handle(input.trim()) {
            break;
        }
    }

    info!("shutting down");
    drop(session);
    match writer.join() {
        Ok(result) => result.context("Failed to write reply"),
        Err(_) => anyhow::bail!("reply writer panicked"),
    }
}
