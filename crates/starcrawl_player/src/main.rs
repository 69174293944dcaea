// SPDX-License-Identifier: MIT OR Apache-2.0
//! `StarCrawl` Player - headless host for the crawl playback engine
//!
//! Plays a crawl in real time without rendering it:
//! - Loads authored content from JSON or RON
//! - Loads timing configuration from RON
//! - Feeds a script of timed host actions (pause, seek, skip, keys, taps)
//! - Logs phase changes, progress and completion
//!
//! ## Architecture
//!
//! Everything runs on a current-thread `tokio` runtime. A script task sends
//! host actions over a channel; the player task sleeps until the engine's
//! next deadline, the next animation frame or the next action.

mod error;
mod load;
mod player;
mod script;

use clap::{Parser, Subcommand};
use error::{PlayerError, Result};
use player::{PlaybackSummary, Player};
use script::{HostAction, Script};
use starcrawl_playback::{format_time, CrawlContent, Environment, TimingConfig};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_LOG_FILTER: &str = "starcrawl_player=info,starcrawl_playback=debug";

#[derive(Parser)]
#[command(name = "starcrawl")]
#[command(about = "Play a scrolling-text crawl headlessly and log its timeline")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a crawl in real time
    Play(PlayArgs),

    /// Write the default timing config as RON
    InitConfig {
        /// Output file path
        #[arg(short, long, default_value = "timing.ron")]
        output: PathBuf,
    },
}

#[derive(clap::Args)]
struct PlayArgs {
    /// Crawl content file (.json or .ron)
    content: PathBuf,

    /// Timing config file (.ron)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Script of timed host actions (.json or .ron)
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Play the short reduced-motion sequence
    #[arg(long)]
    reduced_motion: bool,

    /// Treat the host as having a precise pointer
    #[arg(long)]
    fine_pointer: bool,

    /// Playback speed multiplier
    #[arg(long)]
    speed: Option<f64>,

    /// Render frame interval in milliseconds while a tween is running
    #[arg(long, default_value = "16")]
    frame_ms: f64,
}

fn main() {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting StarCrawl player v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli) {
        tracing::error!("Player failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(PlayerError::Runtime)?;

    rt.block_on(async {
        match cli.command {
            Commands::Play(args) => {
                let summary = play(args).await?;
                tracing::info!(
                    completed = summary.completed,
                    phases = ?summary.phases,
                    wall = %format_time(summary.wall_ms / 1000.0),
                    "Playback finished"
                );
                Ok(())
            }
            Commands::InitConfig { output } => {
                load::write_default_config(&output).await?;
                tracing::info!("Wrote default timing config to {}", output.display());
                Ok(())
            }
        }
    })
}

async fn play(args: PlayArgs) -> Result<PlaybackSummary> {
    let config = match &args.config {
        Some(path) => load::load_config(path).await?,
        None => TimingConfig::default(),
    };
    let content: CrawlContent = load::load_document(&args.content).await?;
    let script = match &args.script {
        Some(path) => load::load_document::<Script>(path).await?.validated()?,
        None => Script::default(),
    };

    if content.is_empty() {
        tracing::warn!("Crawl content is empty");
    }
    tracing::info!(logo = %content.logo_text, steps = script.steps.len(), "Loaded crawl");
    tracing::debug!("Transcript:\n{}", content.transcript());

    let environment = Environment {
        reduced_motion: args.reduced_motion,
        fine_pointer: args.fine_pointer,
    };
    let mut player = Player::new(config, environment, args.frame_ms)?;
    player.load_content(content);
    if let Some(speed) = args.speed {
        player.set_speed(speed)?;
    }

    let start = Instant::now();
    let (tx, rx) = mpsc::unbounded_channel();
    let interrupt_tx = tx.clone();
    let feeder = (!script.is_empty()).then(|| tokio::spawn(script::feed(script, start, tx)));
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted");
            let _ = interrupt_tx.send(HostAction::Stop);
        }
    });

    let summary = player.run(rx, start).await;
    if let Some(feeder) = feeder {
        feeder.abort();
    }
    interrupt.abort();
    summary
}
