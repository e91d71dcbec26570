//! Recognition session: one recognizer, fed frame by frame, closed once.

use tracing::{debug, trace, warn};

use crate::error::{PipelineError, Result};
use crate::recognize::{RecognitionEngine, Recognizer};
use crate::reconcile::{Reconciler, SessionResult};
use crate::resolver::ModelId;

/// Lifecycle of a [`RecognitionSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Recognizer allocated, no audio fed yet.
    Open,
    /// At least one frame fed.
    Accepting,
    /// Flushed or aborted; the recognizer has been released.
    Closed,
}

/// Owns one recognizer exclusively for the duration of one utterance.
///
/// The recognizer is released when the session closes, when feeding fails,
/// or when the session is dropped, whichever comes first.
pub struct RecognitionSession {
    model: ModelId,
    recognizer: Option<Box<dyn Recognizer>>,
    state: SessionState,
    reconciler: Reconciler,
    frames_fed: usize,
}

impl RecognitionSession {
    /// Allocate a recognizer for `model` at `sample_rate`.
    pub fn open(engine: &dyn RecognitionEngine, model: &ModelId, sample_rate: u32) -> Result<Self> {
        let recognizer = engine
            .open(model, sample_rate)
            .map_err(PipelineError::recognition)?;
        debug!(model = %model, sample_rate, "Recognition session opened");

        Ok(Self {
            model: model.clone(),
            recognizer: Some(recognizer),
            state: SessionState::Open,
            reconciler: Reconciler::new(),
            frames_fed: 0,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn model(&self) -> &ModelId {
        &self.model
    }

    pub fn frames_fed(&self) -> usize {
        self.frames_fed
    }

    /// Feed the next frame. Frames must arrive in payload order.
    ///
    /// An engine failure closes the session and releases the recognizer.
    pub fn feed(&mut self, frame: &[u8]) -> Result<()> {
        let recognizer = self.active_recognizer("feed")?;

        let hypothesis = match recognizer.feed(frame) {
            Ok(hypothesis) => hypothesis,
            Err(e) => {
                warn!(model = %self.model, frame = self.frames_fed, error = %e, "Recognizer failed mid-stream");
                self.release();
                return Err(PipelineError::recognition(e));
            }
        };

        trace!(frame = self.frames_fed, hypothesis = ?hypothesis, "Frame recognized");
        self.reconciler.observe(&hypothesis);
        self.frames_fed += 1;
        self.state = SessionState::Accepting;
        Ok(())
    }

    /// Flush the recognizer, release it, and reconcile the transcript.
    pub fn close(&mut self) -> Result<SessionResult> {
        let recognizer = self.active_recognizer("close")?;
        let flushed = recognizer.flush();
        self.release();
        let flush_text = flushed.map_err(PipelineError::recognition)?;

        let result = std::mem::take(&mut self.reconciler).finish(&flush_text);
        debug!(
            model = %self.model,
            frames = self.frames_fed,
            used_fallback = result.used_fallback,
            chars = result.transcript.len(),
            "Recognition session closed"
        );
        Ok(result)
    }

    fn active_recognizer(&mut self, operation: &'static str) -> Result<&mut Box<dyn Recognizer>> {
        let state = self.state;
        self.recognizer
            .as_mut()
            .ok_or(PipelineError::InvalidSessionState { operation, state })
    }

    fn release(&mut self) {
        self.recognizer = None;
        self.state = SessionState::Closed;
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
