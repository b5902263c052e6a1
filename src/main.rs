use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use vr_snake::game::GameConfig;
use vr_snake::modes::{HeadlessConfig, HeadlessMode, HumanMode};

#[derive(Parser)]
#[command(name = "vr_snake")]
#[command(version, about = "Snake with path-following body segments")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// JSON game configuration; defaults are used for missing fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulation steps for headless mode
    #[arg(long, default_value = "600")]
    ticks: u64,

    /// Seconds per simulation step for headless mode
    #[arg(long, default_value = "0.0166667")]
    dt: f32,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (human mode logs nothing otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Human,
    /// Run a scripted game and print a JSON summary
    Headless,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.mode, cli.log_file.as_deref())?;

    let config = match &cli.config {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::default(),
    };

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(config, cli.seed);
            human_mode.run().await?;
        }
        Mode::Headless => {
            let headless_config = HeadlessConfig {
                ticks: cli.ticks,
                dt: cli.dt,
                seed: cli.seed,
                ..HeadlessConfig::new(config)
            };
            let summary = HeadlessMode::new(headless_config).run()?;
            let json =
                serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
            println!("{json}");
        }
    }

    info!("exiting");
    Ok(())
}

/// The terminal UI owns stderr, so human mode only logs to a file.
fn init_tracing(mode: &Mode, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match (mode, log_file) {
        (_, Some(path)) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        (Mode::Headless, None) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
        }
        (Mode::Human, None) => {}
    }

    Ok(())
}
