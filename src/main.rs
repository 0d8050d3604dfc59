//! randquote - store, delete and print quotes
//!
//! Run with `randquote --help` for usage.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use randquote::{config::Config, store::QuoteStore, APP_NAME, VERSION};

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(version = VERSION)]
#[command(about = "Store, delete and print quotes")]
#[command(long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a quote
    Set {
        /// The label of the quote
        label: String,

        /// The quote itself (default: the configured default quote)
        quote: Option<String>,
    },

    /// Remove a quote
    Rm {
        /// The label of the quote
        label: String,
    },

    /// Print a given quote
    Get {
        /// The label of the quote
        label: String,
    },

    /// Show configuration
    Config {
        /// Initialize config file with defaults
        #[arg(long)]
        init: bool,
    },
}

fn setup_logging(debug: bool, log_file: Option<&Path>) -> Result<()> {
    // stdout carries quotes, so only warnings reach stderr by default
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(file).with_target(false))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .with(filter)
            .init();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre error hooks
    color_eyre::install()?;

    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::config_file_path()?,
    };

    // Load configuration
    let config = Config::load_from(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config, using defaults: {}", e);
        Config::default()
    });

    setup_logging(cli.debug || config.debug, config.log_file.as_deref())?;
    debug!("Starting {} v{}", APP_NAME, VERSION);

    match cli.command {
        Commands::Set { label, quote } => {
            let quote = quote.unwrap_or_else(|| config.default_quote.clone());
            let mut store = QuoteStore::from_config(&config).await?;
            store.set(&label, &quote).await?;
        }

        Commands::Rm { label } => {
            let mut store = QuoteStore::from_config(&config).await?;
            store.remove(&label).await?;
        }

        Commands::Get { label } => {
            let store = QuoteStore::from_config(&config).await?;
            if let Some(quote) = store.get(&label) {
                println!("{}", quote);
            }
        }

        Commands::Config { init } => {
            if init {
                config.save_to(&config_path)?;
                println!("Configuration initialized at {:?}", config_path);
            } else {
                println!("Configuration:");
                println!("{}", toml::to_string_pretty(&config)?);
                println!("\nConfig file: {:?}", config_path);
                println!("Quote file: {:?}", config.store_path()?);
            }
        }
    }

    Ok(())
}
