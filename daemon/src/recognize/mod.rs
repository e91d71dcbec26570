//! Speech recognition engine boundary.
//!
//! The pipeline only relies on this contract: an engine opens a recognizer
//! bound to a model and sample rate, the recognizer turns each fed frame into
//! a partial or final hypothesis, and a flush returns whatever text is left.

use anyhow::Result;

use crate::reconcile::Hypothesis;
use crate::resolver::ModelId;

mod scripted;
#[cfg(feature = "vosk")]
mod vosk;

pub use self::scripted::ScriptedEngine;
#[cfg(feature = "vosk")]
pub use self::vosk::VoskEngine;

/// Factory for per-request recognizers. Shared read-only across requests.
pub trait RecognitionEngine: Send + Sync {
    /// Open a fresh recognizer. The returned instance is owned by exactly one session.
    fn open(&self, model: &ModelId, sample_rate: u32) -> Result<Box<dyn Recognizer>>;
}

/// A stateful recognizer fed one frame at a time.
///
/// Dropping the recognizer releases its engine resources.
pub trait Recognizer: Send {
    /// Feed one frame of 16-bit little-endian mono PCM.
    fn feed(&mut self, frame: &[u8]) -> Result<Hypothesis>;

    /// Signal end of input and return the remaining final text.
    fn flush(&mut self) -> Result<String>;
}
