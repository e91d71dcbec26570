//! Recognition model provisioning checks.
//!
//! Models are installed out of band; this module only reports whether each
//! configured model directory looks usable.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{info, warn};

use crate::resolver::{LanguageResolver, ModelId};

/// File every Kaldi/Vosk model directory ships with.
const ACOUSTIC_MODEL_FILE: &str = "am/final.mdl";

/// Installation status of one model directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelStatus {
    /// Directory present with an acoustic model.
    Ready(PathBuf),
    /// Directory absent.
    Missing,
    /// Path exists but does not look like a complete model.
    Incomplete { reason: String },
}

impl ModelStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, ModelStatus::Ready(_))
    }
}

/// Inspect the directory a model resolves to.
pub async fn check_model(model: &ModelId) -> ModelStatus {
    check_dir(model.path()).await
}

async fn check_dir(dir: &Path) -> ModelStatus {
    let metadata = match fs::metadata(dir).await {
        Ok(metadata) => metadata,
        Err(_) => return ModelStatus::Missing,
    };
    if !metadata.is_dir() {
        return ModelStatus::Incomplete {
            reason: "not a directory".to_string(),
        };
    }

    match fs::metadata(dir.join(ACOUSTIC_MODEL_FILE)).await {
        Ok(am) if am.is_file() => ModelStatus::Ready(dir.to_path_buf()),
        _ => ModelStatus::Incomplete {
            reason: format!("missing {}", ACOUSTIC_MODEL_FILE),
        },
    }
}

/// Check every configured model, in language-code order.
pub async fn audit(resolver: &LanguageResolver) -> Vec<(ModelId, ModelStatus)> {
    let mut report = Vec::with_capacity(resolver.len());
    for model in resolver.models() {
        let status = check_model(model).await;
        report.push((model.clone(), status));
    }
    report
}

/// Log the audit: one warning per unusable model, one summary line.
pub async fn log_audit(resolver: &LanguageResolver) -> usize {
    let report = audit(resolver).await;
    let ready = report.iter().filter(|(_, status)| status.is_ready()).count();

    for (model, status) in &report {
        match status {
            ModelStatus::Ready(_) => {}
            ModelStatus::Missing => warn!(
                language = %model.language(),
                path = %model.path().display(),
                "Recognition model not installed"
            ),
            ModelStatus::Incomplete { reason } => warn!(
                language = %model.language(),
                path = %model.path().display(),
                reason = %reason,
                "Recognition model incomplete"
            ),
        }
    }
    info!(ready, configured = report.len(), "Recognition models checked");
    ready
}

#[cfg(test)]
#[path = "models_test.rs"]
mod tests;
