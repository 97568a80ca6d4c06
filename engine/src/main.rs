//! airtouch-replay - run recorded hand landmarks through the gesture engine
//!
//! Reads one s-expression frame per line (file or stdin) and prints one
//! s-expression per emitted gesture event.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use airtouch_engine::gesture::{EngineConfig, GestureEngine};
use airtouch_engine::replay;

#[derive(Parser, Debug)]
#[command(name = "airtouch-replay", about = "Replay recorded hand landmarks through the gesture engine")]
struct Cli {
    /// Recording to replay (default: stdin)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Thumb-index / thumb-middle pinch distance
    #[arg(long)]
    pinch_threshold: Option<f32>,

    /// Index-middle pinch distance
    #[arg(long)]
    two_finger_threshold: Option<f32>,

    /// Seconds a right-hand pinch is held before drag
    #[arg(long)]
    hold_time: Option<f64>,

    /// Frames kept in the history buffer
    #[arg(long)]
    buffer_len: Option<usize>,

    /// Minimum seconds between two events of the same type
    #[arg(long)]
    cooldown: Option<f64>,

    /// Events below this confidence are dropped
    #[arg(long)]
    confidence_threshold: Option<f32>,

    /// Weight of the newest wrist sample in the EMA (1.0 = off)
    #[arg(long)]
    smoothing_factor: Option<f32>,

    /// Seconds before state of a vanished hand is dropped
    #[arg(long)]
    track_ttl: Option<f64>,

    /// Print engine status after the replay
    #[arg(long)]
    status: bool,

    /// Show version and exit
    #[arg(long)]
    version: bool,
}

impl Cli {
    fn engine_config(&self) -> EngineConfig {
        let d = EngineConfig::default();
        EngineConfig {
            pinch_threshold: self.pinch_threshold.unwrap_or(d.pinch_threshold),
            two_finger_threshold: self.two_finger_threshold.unwrap_or(d.two_finger_threshold),
            hold_time_s: self.hold_time.unwrap_or(d.hold_time_s),
            buffer_len: self.buffer_len.unwrap_or(d.buffer_len),
            cooldown_s: self.cooldown.unwrap_or(d.cooldown_s),
            confidence_threshold: self.confidence_threshold.unwrap_or(d.confidence_threshold),
            smoothing_factor: self.smoothing_factor.unwrap_or(d.smoothing_factor),
            track_ttl_s: self.track_ttl.unwrap_or(d.track_ttl_s),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("airtouch-replay {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Events go to stdout, logs to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "airtouch_engine=info,airtouch_replay=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let mut engine =
        GestureEngine::try_new(cli.engine_config()).context("invalid engine configuration")?;
    info!(
        "airtouch-replay v{} config {}",
        env!("CARGO_PKG_VERSION"),
        engine.config().config_sexp()
    );

    let reader: Box<dyn BufRead> = match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open recording {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(io::stdin())),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut frames = 0u64;
    let mut emitted = 0u64;

    for (i, line) in reader.lines().enumerate() {
        let line = line.context("failed to read recording")?;
        if replay::is_skippable(&line) {
            continue;
        }
        let frame = match replay::parse_frame(&line) {
            Ok(f) => f,
            Err(e) => {
                warn!(line = i + 1, "skipping malformed frame: {:#}", e);
                continue;
            }
        };
        frames += 1;
        for event in engine.classify(frame.timestamp, &frame.hands) {
            emitted += 1;
            writeln!(out, "{}", replay::format_event(&event))?;
        }
    }

    info!("replayed {} frames, {} events", frames, emitted);
    if cli.status {
        writeln!(out, "{}", engine.status_sexp())?;
    }
    Ok(())
}
