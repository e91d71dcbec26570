pub mod config;
pub mod daemon;
pub mod dispatch;
pub mod error;
pub mod frames;
pub mod language;
pub mod models;
pub mod orchestrator;
pub mod recognize;
pub mod reconcile;
pub mod resolver;
pub mod server;
pub mod session;
pub mod translate;

use anyhow::Context;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Application-specific environment variable for log filtering (overrides config).
const LOG_ENV_VAR: &str = "NAC_LOG";

/// Entry point for the server process: configures logging and launches the server.
pub async fn run() -> anyhow::Result<()> {
    let config = config::Config::load().context("Failed to load configuration")?;

    // Keeps the non-blocking file writer flushing until the server exits.
    let mut _guard = None;
    let (writer, ansi) = match &config.logging.file {
        Some(path) => {
            let log_dir = path
                .parent()
                .context("Log file path has no parent directory")?;
            let log_filename = path
                .file_name()
                .context("Log file path has no file name")?;
            std::fs::create_dir_all(log_dir).context("Failed to create log directory")?;

            let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            _guard = Some(guard);
            (BoxMakeWriter::new(non_blocking), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    // NAC_LOG env var overrides config file level
    let filter = match std::env::var(LOG_ENV_VAR) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives)?,
        _ => EnvFilter::try_new(config.logging.level.as_directive())?,
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(ansi))
        .with(filter)
        .init();

    daemon::run_with_config(config).await
}
