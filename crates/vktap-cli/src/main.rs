mod messages;
mod sync;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "vktap")]
#[command(about = "Extract VK community analytics as Singer streams")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the stream catalog as JSON
    Discover {
        /// Path to the JSON or YAML tap config
        #[arg(long, env = "VKTAP_CONFIG")]
        config: PathBuf,
    },
    /// Run streams and write SCHEMA/RECORD/STATE messages to stdout
    Sync {
        /// Path to the JSON or YAML tap config
        #[arg(long, env = "VKTAP_CONFIG")]
        config: PathBuf,

        /// Restrict the run to the named stream (repeatable)
        #[arg(long = "stream")]
        streams: Vec<String>,
    },
}

impl Commands {
    fn config_path(&self) -> &Path {
        match self {
            Commands::Discover { config } | Commands::Sync { config, .. } => config.as_path(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.command.config_path();
    let config = vktap_core::load_tap_config(config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    // stdout carries the message stream; logs go to stderr.
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Commands::Discover { .. } => sync::run_discover(&config, &mut out)?,
        Commands::Sync { streams, .. } => {
            let summary = sync::run_sync(&config, &streams, &mut out).await?;
            tracing::info!(
                streams = summary.streams,
                records = summary.records,
                "sync complete"
            );
        }
    }
    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests;
