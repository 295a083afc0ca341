//! Platinum-tool interactive binary
//!
//! Checks an access key, then runs the menu shell on the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Prompt for the access key
//! platinum-tool
//!
//! # Supply the key and a config file
//! platinum-tool --key PLATINUM2025-2025-10-30 --config platinum.toml
//!
//! # Print a key valid for 90 days
//! platinum-tool generate-key --days 90
//! ```
//!
//! # Environment Variables
//!
//! - `PLATINUM_CONFIG`: Config file path
//! - `PLATINUM_CACHE_DIR`: Ephemeris cache directory
//! - `PLATINUM_LICENSE_KEY`: Access key, skips the prompt
//! - `RUST_LOG`: Log filter (default: warn), written to stderr

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use platinum_tool::cache::FileCache;
use platinum_tool::config::{AppConfig, AstroSettings};
use platinum_tool::services::astro::{Ephemeris, KeplerSource};
use platinum_tool::services::license::{generate_key, DEFAULT_PREFIX, DEFAULT_VALID_DAYS};
use platinum_tool::shell::Shell;

#[derive(Parser, Debug)]
#[command(name = "platinum-tool")]
#[command(about = "Date difference, scaling and planetary longitude calculator")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Access key
    #[arg(short, long)]
    key: Option<String>,

    /// Ephemeris cache directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Disable the ephemeris cache
    #[arg(long)]
    no_cache: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a new access key
    GenerateKey {
        #[arg(long, default_value = DEFAULT_PREFIX)]
        prefix: String,

        /// Days until the key expires
        #[arg(long, default_value_t = DEFAULT_VALID_DAYS)]
        days: i64,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let today = Local::now().date_naive();

    if let Some(Command::GenerateKey { prefix, days }) = cli.command {
        let key = generate_key(&prefix, today, days).context("Failed to generate key")?;
        println!("{key}");
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(dir) = cli.cache_dir {
        config.astro.cache_dir = dir;
    }
    if cli.no_cache {
        config.astro.use_cache = false;
    }
    if let Some(key) = cli.key {
        config.license.key = Some(key);
    }

    let gate = config.license_gate()?;
    let registry = config.scale_registry()?;
    let ephemeris = build_ephemeris(&config.astro)?;
    info!("Ephemeris source: {}", ephemeris.source_name());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(stdin.lock(), stdout.lock(), registry, ephemeris)
        .with_export(config.export.clone())
        .with_step_days(config.astro.default_step_days);

    if !shell.unlock(&gate, config.license.key.as_deref(), today)? {
        return Ok(ExitCode::FAILURE);
    }
    shell.run().context("Terminal I/O failed")?;
    Ok(ExitCode::SUCCESS)
}

fn build_ephemeris(settings: &AstroSettings) -> anyhow::Result<Ephemeris> {
    let ephemeris = Ephemeris::new(KeplerSource);
    if !settings.use_cache {
        return Ok(ephemeris);
    }

    let cache = FileCache::new(&settings.cache_dir).with_context(|| {
        format!(
            "Failed to open cache directory {}",
            settings.cache_dir.display()
        )
    })?;
    info!("Caching ephemeris tables in {}", settings.cache_dir.display());
    Ok(ephemeris.with_cache(cache))
}
