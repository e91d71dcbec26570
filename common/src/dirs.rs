//! XDG directory utilities for nactranslate.

use std::path::PathBuf;

use anyhow::{Context, Result};
use xdg::BaseDirectories;

const APP_NAME: &str = "nactranslate";

fn base_dirs() -> BaseDirectories {
    BaseDirectories::with_prefix(APP_NAME)
}

/// Return the XDG config directory (no creation - config may not exist yet).
/// `~/.config/nactranslate/`
pub fn config_dir() -> Result<PathBuf> {
    base_dirs()
        .get_config_home()
        .context("Could not determine config directory (HOME not set?)")
}

/// Return the XDG data directory (no creation - models are provisioned out of band).
/// `~/.local/share/nactranslate/`
pub fn data_dir() -> Result<PathBuf> {
    base_dirs()
        .get_data_home()
        .context("Could not determine data directory (HOME not set?)")
}

/// Default location of recognition model directories.
/// `~/.local/share/nactranslate/models/`
pub fn models_dir() -> Result<PathBuf> {
    Ok(data_dir()?.join("models"))
}
