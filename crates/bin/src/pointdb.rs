//! pointdb - runs a command file against a fresh point database

use std::fs::File;
use std::io::{self, BufReader};

use anyhow::Context;
use engine::{CommandProcessor, Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "pointdb.toml";

fn main() -> anyhow::Result<()> {
    // Logs on stderr; stdout carries responses only
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    info!("pointdb v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load(CONFIG_PATH)?;
    info!("Loaded configuration");
    info!("  World width: {}", config.world.width);
    match config.skiplist.seed {
        Some(seed) => info!("  Skip list seed: {}", seed),
        None => info!("  Skip list seed: random"),
    }

    let mut processor = CommandProcessor::from_config(&config)?;
    let stdout = io::stdout().lock();

    let executed = match std::env::args().nth(1) {
        Some(path) => {
            info!("Reading commands from {}", path);
            let file = File::open(&path).with_context(|| format!("failed to open command file {path}"))?;
            processor.run(BufReader::new(file), stdout)?
        }
        None => {
            info!("Reading commands from stdin");
            processor.run(io::stdin().lock(), stdout)?
        }
    };

    info!("Executed {} commands, {} records held", executed, processor.database().len());
    Ok(())
}
