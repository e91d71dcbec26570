//! Mapping from spoken language to recognition model.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};
use crate::language::LanguageCode;

/// A concrete recognition model for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelId {
    language: LanguageCode,
    name: String,
    path: PathBuf,
}

impl ModelId {
    pub fn new(language: LanguageCode, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            language,
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn language(&self) -> &LanguageCode {
        &self.language
    }

    /// Model directory name, e.g. `vosk-model-small-en-us-0.15`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory the model is loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Closed, read-only table of supported source languages.
///
/// Built once at startup; lookups are exact-match and never fall back to
/// another language.
#[derive(Debug, Clone)]
pub struct LanguageResolver {
    models: BTreeMap<LanguageCode, ModelId>,
}

impl LanguageResolver {
    /// Build the table from `(code, model directory name)` entries rooted at `models_dir`.
    pub fn new<I, C, N>(models_dir: impl AsRef<Path>, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (C, N)>,
        C: AsRef<str>,
        N: AsRef<str>,
    {
        let models_dir = models_dir.as_ref();
        let mut models = BTreeMap::new();
        for (code, name) in entries {
            let language = LanguageCode::parse(code.as_ref())?;
            let name = name.as_ref().trim();
            let model = ModelId::new(language.clone(), name, models_dir.join(name));
            models.insert(language, model);
        }
        Ok(Self { models })
    }

    pub fn resolve(&self, code: &LanguageCode) -> Result<ModelId> {
        self.models
            .get(code)
            .cloned()
            .ok_or_else(|| PipelineError::UnsupportedLanguage {
                code: code.to_string(),
            })
    }

    /// Supported source language codes, sorted.
    pub fn languages(&self) -> impl Iterator<Item = &LanguageCode> {
        self.models.keys()
    }

    /// Every configured model, ordered by language code.
    pub fn models(&self) -> impl Iterator<Item = &ModelId> {
        self.models.values()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
