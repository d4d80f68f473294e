// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! qrlogic CLI entrypoint.
//!
//! Developer harness for the transport and the rule engine:
//!
//! ```text
//! qrlogic encode <doc.json> [--budget N] [--wire-bytes]   one frame per line
//! qrlogic decode [frames.txt]                              canonical document
//! qrlogic eval <doc.json> --temperature T --light L [--motion] [--ticks N]
//! ```
//!
//! Settings come from the platform config dir unless `--config-dir` is
//! given. Logs go to stderr (`RUST_LOG` overrides the `info` default);
//! stdout carries only results.

// The CLI is expected to print to stdout.
#![allow(clippy::print_stdout)]

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use qrlogic_app_core::{Settings, SettingsService};
use qrlogic_config_fs::FsSettingsStore;
use qrlogic_doc::LogicDocument;
use qrlogic_engine::{ActionEvent, Clock, SensorSnapshot, SystemClock, TickOutcome};
use qrlogic_transport::{ChunkEncoder, ScanOutcome, Sizing};
use std::cell::Cell;
use std::io::{self, BufRead, Read};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Chunked QR transport and rule engine harness")]
struct Args {
    /// Directory holding settings.json (defaults to the platform config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split a document into chunk frames, one per line
    Encode {
        /// Document file, or `-` for stdin
        doc: PathBuf,
        /// Per-frame budget (overrides settings). Counted in characters, so
        /// frames of quote-heavy documents may exceed it; add --wire-bytes
        /// when the budget is a hard byte limit
        #[arg(long)]
        budget: Option<usize>,
        /// Count escaped wire bytes so every frame fits the budget
        #[arg(long)]
        wire_bytes: bool,
    },
    /// Reassemble a document from frames, one per line, in any order
    Decode {
        /// Frames file (defaults to stdin)
        frames: Option<PathBuf>,
    },
    /// Run a document against a fixed sensor snapshot and print fired events
    Eval {
        /// Document file, or `-` for stdin
        doc: PathBuf,
        /// Temperature reading
        #[arg(long, allow_hyphen_values = true)]
        temperature: f64,
        /// Light reading
        #[arg(long)]
        light: f64,
        /// Motion detected
        #[arg(long)]
        motion: bool,
        /// Number of simulated ticks
        #[arg(long, default_value_t = 1)]
        ticks: u32,
        /// Simulated time between ticks in milliseconds
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
        /// Local hour to evaluate `timeOfDay` at (defaults to the wall clock)
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
        hour: Option<u32>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?)
        .init();

    let settings = load_settings(args.config_dir.as_deref())?;
    match args.cmd {
        Command::Encode {
            doc,
            budget,
            wire_bytes,
        } => encode(&settings, &doc, budget, wire_bytes),
        Command::Decode { frames } => decode(&settings, frames.as_deref()),
        Command::Eval {
            doc,
            temperature,
            light,
            motion,
            ticks,
            interval_ms,
            hour,
        } => eval(
            &settings,
            &doc,
            SensorSnapshot {
                temperature,
                light,
                motion,
            },
            ticks,
            SimulatedClock::new(Duration::from_millis(interval_ms), hour),
        ),
    }
}

fn load_settings(config_dir: Option<&Path>) -> Result<Settings> {
    let store = match config_dir {
        Some(dir) => FsSettingsStore::at(dir),
        None => FsSettingsStore::new(),
    }
    .context("opening settings store")?;
    let settings = SettingsService::new(store)
        .load_settings()
        .context("loading settings")?;
    Ok(settings)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).context("reading stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn read_document(path: &Path) -> Result<LogicDocument> {
    let text = read_input(path)?;
    LogicDocument::from_json_str(&text)
        .with_context(|| format!("{} is not a valid logic document", path.display()))
}

fn encode(settings: &Settings, doc: &Path, budget: Option<usize>, wire_bytes: bool) -> Result<()> {
    let document = read_document(doc)?;
    let mut encoder = settings.encoder();
    if let Some(budget) = budget {
        encoder = ChunkEncoder::new(budget).with_min_chunk_size(settings.transport.min_chunk_size);
    }
    if wire_bytes {
        encoder = encoder.with_sizing(Sizing::WireBytes);
    }
    let encoded = encoder.encode(&document)?;
    info!(
        session = %encoded.session_id,
        chunks = encoded.len(),
        budget = encoder.budget(),
        "document encoded"
    );
    for frame in encoded.frames() {
        println!("{frame}");
    }
    Ok(())
}

fn decode(settings: &Settings, frames: Option<&Path>) -> Result<()> {
    let reader: Box<dyn BufRead> = match frames {
        Some(path) => Box::new(io::BufReader::new(
            std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let mut decoder = settings.decoder();
    for line in reader.lines() {
        let line = line.context("reading frames")?;
        if line.trim().is_empty() {
            continue;
        }
        match decoder.scan(&line, Instant::now()) {
            ScanOutcome::Loaded(loaded) => {
                println!("{}", loaded.document.to_canonical_json());
                return Ok(());
            }
            ScanOutcome::Progress(p) => {
                info!(received = p.received, total = p.total, missing = ?p.missing, "progress");
            }
            ScanOutcome::Rejected(rejection) => warn!(%rejection, "frame rejected"),
            ScanOutcome::AssemblyFailed(err) => warn!(%err, "assembly failed"),
            ScanOutcome::Duplicate(_) | ScanOutcome::AlreadyLoaded | ScanOutcome::Ignored => {}
        }
    }
    match decoder.finish() {
        Ok(loaded) => {
            println!("{}", loaded.document.to_canonical_json());
            Ok(())
        }
        Err(err) => Err(anyhow::Error::new(err).context("no document reassembled")),
    }
}

fn eval(
    settings: &Settings,
    doc: &Path,
    snapshot: SensorSnapshot,
    ticks: u32,
    clock: SimulatedClock,
) -> Result<()> {
    if ticks == 0 {
        bail!("--ticks must be at least 1");
    }
    let document = read_document(doc)?;
    let mut engine = settings.engine(&clock);
    engine.load(document);

    let mut printed = Ok(());
    let mut print = |event: &ActionEvent| {
        if printed.is_ok() {
            printed = serde_json::to_string(event).map(|line| println!("{line}"));
        }
    };
    for tick in 0..ticks {
        if let TickOutcome::Fired { warnings, .. } = engine.tick(&snapshot, &mut print) {
            for warning in warnings {
                warn!(tick, "{warning}");
            }
        }
        clock.advance();
    }
    printed.context("serializing action event")
}

/// Clock that moves a fixed step per tick, so several simulated ticks can
/// cross debounce windows without waiting.
struct SimulatedClock {
    start: Instant,
    elapsed: Cell<Duration>,
    step: Duration,
    hour: Option<u32>,
}

impl SimulatedClock {
    fn new(step: Duration, hour: Option<u32>) -> Self {
        Self {
            start: Instant::now(),
            elapsed: Cell::new(Duration::ZERO),
            step,
            hour,
        }
    }

    fn advance(&self) {
        self.elapsed.set(self.elapsed.get() + self.step);
    }
}

impl Clock for SimulatedClock {
    fn now(&self) -> Instant {
        self.start + self.elapsed.get()
    }

    fn local_hour(&self) -> u32 {
        self.hour.unwrap_or_else(|| SystemClock.local_hour())
    }
}
