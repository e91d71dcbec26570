//! Error taxonomy of the transcription pipeline.

use thiserror::Error;

use crate::session::SessionState;

/// Failures surfaced by the request pipeline.
///
/// An empty transcript is not an error; it is reported through the
/// dispatcher's sentinel text.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The source language has no recognition model.
    #[error("Unsupported language: {code}")]
    UnsupportedLanguage { code: String },

    /// A language header was empty or whitespace.
    #[error("Invalid language code: {value:?}")]
    InvalidLanguageCode { value: String },

    /// A session was driven outside its state machine. Always a bug.
    #[error("Invalid session state: cannot {operation} while {state:?}")]
    InvalidSessionState {
        operation: &'static str,
        state: SessionState,
    },

    /// The recognition or translation engine failed.
    #[error("{stage} engine failure: {message}")]
    EngineFailure { stage: EngineStage, message: String },
}

/// Which external engine failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStage {
    Recognition,
    Translation,
}

impl std::fmt::Display for EngineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineStage::Recognition => f.write_str("Recognition"),
            EngineStage::Translation => f.write_str("Translation"),
        }
    }
}

impl PipelineError {
    pub fn recognition(err: impl std::fmt::Display) -> Self {
        PipelineError::EngineFailure {
            stage: EngineStage::Recognition,
            message: err.to_string(),
        }
    }

    pub fn translation(err: impl std::fmt::Display) -> Self {
        PipelineError::EngineFailure {
            stage: EngineStage::Translation,
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
