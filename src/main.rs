//! # Canopy - A virtual project explorer
//!
//! Drives an in-memory editor workbench from the command line: files and
//! folders live only in memory until they are exported as a zip archive.
//!
//! ## Quick Start
//!
//! ```bash
//! # Interactive prompt
//! cargo run
//!
//! # Run a script and write project.zip into ./dist
//! cargo run -- setup.canopy --output dist
//! ```

use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use canopy_core::{Config, EventHandler, Outcome, Workbench};

/// Canopy - an in-memory project explorer
#[derive(Parser, Debug)]
#[command(name = "canopy")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Command script to run (reads stdin when omitted)
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Directory exported archives are written to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output: PathBuf,

    /// Config file (defaults to the user config directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tracing::info!("Starting Canopy v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => Config::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", path.display(), e))?,
        None => Config::load(),
    };
    let mut workbench = Workbench::with_config(config).with_output_dir(&args.output);

    let mut events = EventHandler::new(workbench.subscribe());
    tokio::spawn(async move {
        while let Some(event) = events.next().await {
            tracing::debug!(?event, "explorer changed");
        }
    });

    let failures = match &args.script {
        Some(script) => run_script(&mut workbench, script).await?,
        None => run_interactive(&mut workbench).await?,
    };
    if failures > 0 {
        tracing::warn!("{} commands failed", failures);
    }

    Ok(())
}

/// Runs every line of a script file, returning how many lines failed.
async fn run_script(workbench: &mut Workbench, script: &Path) -> anyhow::Result<usize> {
    let source = tokio::fs::read_to_string(script)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", script.display(), e))?;

    let mut failures = 0;
    for (number, line) in source.lines().enumerate() {
        if !run_line(workbench, line).await {
            tracing::warn!("{}:{} failed", script.display(), number + 1);
            failures += 1;
        }
    }
    Ok(failures)
}

async fn run_interactive(workbench: &mut Workbench) -> anyhow::Result<usize> {
    println!("canopy: type `help` for commands, Ctrl-D to quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut failures = 0;
    while let Some(line) = lines.next_line().await? {
        if !run_line(workbench, &line).await {
            failures += 1;
        }
    }
    Ok(failures)
}

/// Executes one line and prints its result. Returns false on error.
///
/// Errors never abort the session: a stale path is reported and the next
/// line runs as usual.
async fn run_line(workbench: &mut Workbench, line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return true;
    }

    match workbench.run_line(line).await {
        Ok(Outcome::Done) => true,
        Ok(Outcome::Text(text)) => {
            if !text.is_empty() {
                println!("{text}");
            }
            true
        }
        Ok(Outcome::Exported { path, entries }) => {
            println!("exported {entries} files to {}", path.display());
            true
        }
        Err(e) => {
            eprintln!("error: {e}");
            false
        }
    }
}
