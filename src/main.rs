mod config;
mod database;
mod entities;
mod genres;
mod http_server;
mod logging;
mod services;
#[cfg(test)]
mod test_utils;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::Context};

use crate::{
    config::Config, database::Database, http_server::app::HttpServerConfig,
    logging::setup_logging,
};

const DEFAULT_ERROR_LOG: &str = "error.log";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "FYYUR_CONFIG")]
    config: Option<PathBuf>,

    /// Console log level (default: info)
    #[arg(long, default_value = "info", global = true, env = "LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// File log level (default: info)
    #[arg(long, default_value = "info", global = true)]
    log_file_level: log::LevelFilter,

    /// Path to log file. Defaults to `error.log` when debug is off
    #[arg(long, env = "FYYUR_LOG_FILE", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the booking site
    Serve {
        /// The port to run the server on (overrides the config file)
        #[arg(short, long, env = "FYYUR_PORT")]
        port: Option<u16>,
    },
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let config = {
        if let Some(config) = &args.config {
            Config::from_file(config)
        } else {
            Config::load()
        }
    }
    .with_context(|| "Failed to load fyyur config")?;

    let log_file = match args.log_file {
        Some(path) => Some(path),
        None if !config.debug => Some(PathBuf::from(DEFAULT_ERROR_LOG)),
        None => None,
    };
    setup_logging(args.log_level, log_file, args.log_file_level)?;

    log::debug!("Fyyur starting");

    match args.command {
        Commands::Config(config_commands) => match config_commands {
            ConfigCommands::CreateDefault => {
                log::debug!("Creating default config");
                let path = Config::create_default()?;
                log::info!("Default config written to {}", path.display());
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            },
        },
        Commands::Serve { port } => {
            log::debug!("Opening database at: {}", config.database_path().display());
            let database = Database::open(&config.database_path()).await?;

            let port = port.unwrap_or(config.port);
            log::info!("Starting HTTP server on port: {}", port);
            http_server::app::start(HttpServerConfig { port, database }).await?;
        }
    }

    Ok(())
}
