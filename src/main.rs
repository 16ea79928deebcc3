//! UGT - streaming selection translator
//!
//! Main entry point for the UGT CLI.

mod cli;
mod cmd_config;
mod cmd_translate;
mod register;

use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use ugt_config::{Config, ConfigLoader, LoggingConfig};

use cli::{Cli, Commands};
use cmd_translate::TranslateArgs;
use register::Overrides;

/// Console output goes to stderr; stdout carries documents and prompts.
fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let console = fmt::layer()
        .with_target(true)
        .with_ansi(true)
        .with_writer(std::io::stderr);

    let file = if logging.file {
        let log_dir = log_directory(logging);
        std::fs::create_dir_all(&log_dir)?;

        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("ugt")
            .filename_suffix("log")
            .max_log_files(30)
            .build(&log_dir)?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
            std::sync::OnceLock::new();
        let _ = GUARD.set(guard);

        Some(fmt::layer().with_writer(non_blocking).with_ansi(false).boxed())
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file)
        .init();

    Ok(())
}

fn log_directory(logging: &LoggingConfig) -> PathBuf {
    match &logging.directory {
        Some(dir) => PathBuf::from(ConfigLoader::expand_path(dir)),
        None => ConfigLoader::home_dir().join("logs"),
    }
}

fn load_config(path: &std::path::Path) -> Result<Config, Box<dyn std::error::Error>> {
    let config = ConfigLoader::load_or_default(path)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // check-config reports problems itself, before anything else uses the file.
    if let Commands::CheckConfig = cli.command {
        return cmd_config::handle_check_config(&cli.config);
    }

    let config = load_config(&cli.config)?;
    init_tracing(&config.logging)?;
    debug!(config = %cli.config.display(), "Configuration loaded");
    if !cli.config.exists() {
        warn!("{} not found, using defaults", cli.config.display());
    }

    match cli.command {
        Commands::Translate {
            file,
            element_id,
            output,
            provider,
            model,
            target,
            no_stream,
            keep_placeholders,
            snapshot,
        } => {
            let args = TranslateArgs {
                file,
                element_id,
                output,
                snapshot,
                overrides: Overrides {
                    provider,
                    model,
                    target,
                    no_stream,
                    keep_placeholders,
                },
            };
            cmd_translate::handle_translate(&config, args).await
        }
        Commands::Prompt {
            file,
            element_id,
            target,
        } => cmd_translate::handle_prompt(&config, file, element_id, target).await,
        Commands::CheckConfig => cmd_config::handle_check_config(&cli.config),
    }
}
