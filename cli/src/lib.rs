//! `nacctl`: submit recordings to a nactranslate server and inspect its setup.

pub mod audio;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nactranslate_common::client::{Client, is_server_running};
use nactranslate_daemon::config::Config;
use nactranslate_daemon::models::{self, ModelStatus};
use nactranslate_daemon::resolver::LanguageResolver;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "nacctl")]
#[command(about = "nactranslate CLI - offline speech recognition and translation")]
#[command(version)]
pub struct Cli {
    /// Server URL (defaults to the configured port on localhost)
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transcribe (and optionally translate) a recording
    Transcribe {
        /// WAV file (16-bit mono) or raw 16-bit PCM
        file: PathBuf,
        /// Spoken language (server default when omitted)
        #[arg(long)]
        from: Option<String>,
        /// Target language (server default when omitted)
        #[arg(long)]
        to: Option<String>,
    },
    /// Show server status
    Status,
    /// List languages the server can recognize and translate
    Languages,
    /// Check that configured recognition models are installed
    Models,
    /// Print the effective configuration
    Config,
}

/// Base URL for the server described by `config`.
pub fn server_url(config: &Config) -> String {
    let host = match config.server.host.as_str() {
        "0.0.0.0" | "::" | "" => "127.0.0.1",
        host => host,
    };
    format!("http://{}:{}", host, config.server.port)
}

pub async fn run() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load().context("Failed to load configuration")?;
    let url = cli.url.clone().unwrap_or_else(|| server_url(&config));

    match cli.command {
        Commands::Transcribe { file, from, to } => {
            let payload = audio::load_payload(&file, config.audio.sample_rate)?;
            tracing::debug!(bytes = payload.len(), url = %url, "Submitting recording");
            let text = Client::new(url)
                .process_audio(payload, from.as_deref(), to.as_deref())
                .await?;
            println!("{}", text);
        }
        Commands::Status => {
            if !is_server_running(&url).await {
                println!("Server not running at {}", url);
                return Ok(());
            }
            let health = Client::new(&url).health().await?;
            println!("Server at {}: {} (version {})", url, health.status, health.version);
        }
        Commands::Languages => {
            let languages = Client::new(url).languages().await?;
            println!("Recognition: {}", languages.recognition.join(", "));
            println!("Translation: {}", languages.translation.join(", "));
        }
        Commands::Models => {
            let models_dir = config.models_dir()?;
            let resolver = LanguageResolver::new(&models_dir, &config.models.languages)?;
            println!("Models directory: {}", models_dir.display());
            for (model, status) in models::audit(&resolver).await {
                let state = match status {
                    ModelStatus::Ready(_) => "ready".to_string(),
                    ModelStatus::Missing => "missing".to_string(),
                    ModelStatus::Incomplete { reason } => format!("incomplete ({})", reason),
                };
                println!("  {:<6} {:<40} {}", model.language().as_str(), model.name(), state);
            }
        }
        Commands::Config => {
            println!("# {}", Config::config_path()?.display());
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
