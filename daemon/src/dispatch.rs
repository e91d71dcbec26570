//! Decides whether a transcript needs translating and hands it to the engine.

use std::sync::Arc;

use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::language::LanguagePair;
use crate::translate::Translator;

/// Response text when recognition produced nothing usable.
pub const NO_SPEECH_DETECTED: &str = "No speech detected";

/// Routes reconciled transcripts through the translation engine when needed.
#[derive(Clone)]
pub struct TranslationDispatcher {
    translator: Arc<dyn Translator>,
}

impl TranslationDispatcher {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self { translator }
    }

    pub fn translator(&self) -> &Arc<dyn Translator> {
        &self.translator
    }

    /// Produce the response text for `transcript`.
    ///
    /// An empty transcript yields [`NO_SPEECH_DETECTED`]; a same-language pair
    /// returns the transcript untouched. Otherwise the engine's output is
    /// returned as-is, including an empty string for uninstalled languages.
    pub async fn dispatch(&self, transcript: &str, pair: &LanguagePair) -> Result<String> {
        if transcript.is_empty() {
            return Ok(NO_SPEECH_DETECTED.to_string());
        }
        if pair.is_passthrough() {
            return Ok(transcript.to_string());
        }

        let translated = self
            .translator
            .translate(&pair.from, &pair.to, transcript)
            .await
            .map_err(PipelineError::translation)?;
        debug!(
            pair = %pair,
            chars_in = transcript.len(),
            chars_out = translated.len(),
            "Transcript translated"
        );
        Ok(translated)
    }
}

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod tests;
