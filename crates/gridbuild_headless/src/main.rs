//! Headless placement driver binary.
//!
//! Runs placement sessions without graphics, controlled via JSON on
//! stdin/stdout.
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode - read commands from stdin
//! cargo run -p gridbuild_headless -- run
//!
//! # Custom grid and a visuals config
//! cargo run -p gridbuild_headless -- run --width 16 --height 16 --visuals tiles.ron
//! ```
//!
//! # Protocol
//!
//! Input (stdin): JSON commands, one per line
//! Output (stdout): JSON responses, one per line
//! Logs (stderr): Debug information
//!
//! See the protocol module for command/response format.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gridbuild_core::grid::{GridLayer, GridStore, TileState};
use gridbuild_core::math::Fixed;
use gridbuild_core::visuals::TileVisuals;
use gridbuild_headless::runner::HeadlessRunner;

#[derive(Parser)]
#[command(name = "gridbuild_headless")]
#[command(about = "Headless grid placement driver for scripted testing")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive session on stdin/stdout
    Run {
        /// Grid width in cells
        #[arg(long, default_value = "8")]
        width: u32,

        /// Grid height in cells
        #[arg(long, default_value = "8")]
        height: u32,

        /// RON file mapping tile states to asset names
        #[arg(long)]
        visuals: Option<PathBuf>,

        /// Start with the main grid empty instead of fully buildable
        #[arg(long)]
        empty: bool,
    },
}

/// Errors that prevent the driver from starting.
#[derive(Debug, Error)]
enum StartupError {
    /// Failed to read the visuals file.
    #[error("Failed to read visuals file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Failed to parse the visuals file.
    #[error("Failed to parse visuals file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },
}

fn load_visuals(path: Option<&PathBuf>) -> Result<TileVisuals, StartupError> {
    let Some(path) = path else {
        return Ok(TileVisuals::default());
    };

    let text = std::fs::read_to_string(path).map_err(|source| StartupError::Io {
        path: path.display().to_string(),
        source,
    })?;
    TileVisuals::from_ron(&text).map_err(|source| StartupError::Parse {
        path: path.display().to_string(),
        source,
    })
}

fn cmd_run(width: u32, height: u32, visuals: Option<PathBuf>, empty: bool) -> ExitCode {
    let visuals = match load_visuals(visuals.as_ref()) {
        Ok(visuals) => visuals,
        Err(err) => {
            tracing::error!(error = %err, "startup failed");
            return ExitCode::FAILURE;
        }
    };

    let mut store = GridStore::new(width, height, Fixed::ONE, visuals);
    if !empty {
        let bounds = store.bounds();
        if let Err(err) = store.fill_block(bounds, TileState::Buildable, GridLayer::Main) {
            tracing::error!(error = %err, "grid setup failed");
            return ExitCode::FAILURE;
        }
    }

    tracing::info!(width, height, "headless driver listening on stdin");

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut runner = HeadlessRunner::new(store);
    match runner.run(stdin.lock(), &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "driver terminated");
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging to stderr (stdout is for protocol)
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match cli.command {
        Some(Commands::Run {
            width,
            height,
            visuals,
            empty,
        }) => cmd_run(width, height, visuals, empty),
        None => cmd_run(8, 8, None, false),
    }
}
