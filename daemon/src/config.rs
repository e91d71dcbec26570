//! Configuration management for the nactranslate server.
//!
//! Handles loading, saving, validating and providing defaults. The loaded
//! configuration is immutable for the lifetime of the process.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV_VAR: &str = "NAC_CONFIG";

/// Main configuration struct for the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub audio: AudioConfig,
    pub models: ModelsConfig,
    pub translation: TranslationConfig,
    pub request: RequestConfig,
    pub logging: LoggingConfig,
}

/// HTTP transport settings, including backpressure limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Requests processed at once; further requests wait for a slot.
    pub max_concurrent_requests: usize,
    /// Upper bound on one request's processing time. Unset means no limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    /// Largest accepted audio payload.
    pub max_body_bytes: usize,
}

/// Format of incoming audio and how it is fed to the recognizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Sample rate of the 16-bit mono PCM payload, in Hz.
    pub sample_rate: u32,
    /// Bytes fed to the recognizer per call.
    pub frame_size: usize,
}

/// Recognition models, one per spoken language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Root directory holding model directories. Defaults to the XDG data dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Language code to model directory name.
    pub languages: BTreeMap<String, String>,
}

/// Translation server connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// Base URL of a LibreTranslate-compatible server.
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

/// Defaults applied when a request omits its language headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    pub default_from: String,
    /// Target language when `Lang-To` is absent. Unset means "same as source".
    /// Set `default_to = "ru"` for the classic English-to-Russian setup where
    /// clients send no target header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_to: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: LogLevel,
    /// Write logs to this file instead of stderr.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Log verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to a tracing filter directive for the server crate and HTTP layer.
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "nactranslate_daemon=error",
            LogLevel::Warn => "nactranslate_daemon=warn",
            LogLevel::Info => "nactranslate_daemon=info",
            LogLevel::Debug => "nactranslate_daemon=debug,tower_http=debug",
            LogLevel::Trace => "nactranslate_daemon=trace,tower_http=trace",
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_concurrent_requests: 16,
            request_timeout_secs: None,
            max_body_bytes: 32 * 1024 * 1024,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            frame_size: 4096,
        }
    }
}

impl AudioConfig {
    /// Frame size as the non-zero quantity the frame buffer requires.
    pub fn frame_size(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.frame_size).context("audio.frame_size must be positive")
    }
}

/// Vosk model directories known to work for each supported language.
const DEFAULT_MODELS: &[(&str, &str)] = &[
    ("ar", "vosk-model-ar-mgb2-0.4"),
    ("de", "vosk-model-small-de-0.15"),
    ("en", "vosk-model-small-en-us-0.15"),
    ("es", "vosk-model-small-es-0.42"),
    ("fr", "vosk-model-small-fr-0.22"),
    ("pt", "vosk-model-small-pt-0.3"),
    ("ru", "vosk-model-small-ru-0.22"),
    ("tl", "vosk-model-small-tl-ph-generic-0.6"),
    ("uk", "vosk-model-small-uk-v3-small"),
];

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            dir: None,
            languages: DEFAULT_MODELS
                .iter()
                .map(|(code, name)| (code.to_string(), name.to_string()))
                .collect(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:5100".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            default_from: "en".to_string(),
            default_to: None,
        }
    }
}

impl Config {
    /// Returns the default config directory path.
    /// `~/.config/nactranslate/`
    pub fn config_dir() -> Result<PathBuf> {
        nactranslate_common::dirs::config_dir()
    }

    /// Returns the config file path: `$NAC_CONFIG` if set, else
    /// `~/.config/nactranslate/config.toml`.
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Ok(PathBuf::from(path));
        }
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    /// Root directory of recognition models, falling back to the XDG data dir.
    pub fn models_dir(&self) -> Result<PathBuf> {
        match &self.models.dir {
            Some(dir) => Ok(dir.clone()),
            None => nactranslate_common::dirs::models_dir(),
        }
    }

    /// Load configuration from the default path.
    /// Returns defaults if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    /// Returns defaults if the file doesn't exist.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).context("Failed to parse config file as TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.audio.sample_rate == 0 {
            anyhow::bail!("audio.sample_rate must be positive");
        }
        let frame_size = self.audio.frame_size()?;
        if frame_size.get() % 2 != 0 {
            anyhow::bail!(
                "audio.frame_size must be even (16-bit samples), got {}",
                frame_size
            );
        }
        if self.server.max_concurrent_requests == 0 {
            anyhow::bail!("server.max_concurrent_requests must be positive");
        }
        if self.request.default_from.trim().is_empty() {
            anyhow::bail!("request.default_from must not be empty");
        }
        if let Some(to) = &self.request.default_to
            && to.trim().is_empty()
        {
            anyhow::bail!("request.default_to must not be empty when set");
        }
        for (code, name) in &self.models.languages {
            if code.trim().is_empty() || name.trim().is_empty() {
                anyhow::bail!("models.languages entries need a code and a model name");
            }
        }
        Ok(())
    }

    /// Render as pretty TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config to TOML")
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = self.to_toml()?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
