//! In-memory recognition engine replaying a fixed hypothesis script.
//!
//! Used to drive the pipeline without a real model, e.g. in tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use tracing::debug;

use super::{RecognitionEngine, Recognizer};
use crate::reconcile::Hypothesis;
use crate::resolver::ModelId;

/// Engine whose recognizers return scripted hypotheses, one per fed frame.
///
/// Once the script runs out every further frame yields an empty partial.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEngine {
    script: Vec<Hypothesis>,
    flush_text: String,
    fail_at_frame: Option<usize>,
    fail_on_open: bool,
    stats: Arc<ScriptStats>,
}

/// Counters shared between an engine and the recognizers it opened.
#[derive(Debug, Default)]
pub struct ScriptStats {
    opened: AtomicUsize,
    released: AtomicUsize,
    frames: AtomicUsize,
}

impl ScriptStats {
    /// Recognizers opened so far.
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Recognizers dropped so far.
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Frames fed across all recognizers.
    pub fn frames(&self) -> usize {
        self.frames.load(Ordering::SeqCst)
    }
}

impl ScriptedEngine {
    pub fn new(script: impl IntoIterator<Item = Hypothesis>) -> Self {
        Self {
            script: script.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Engine that hears nothing at all.
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn with_flush(mut self, text: impl Into<String>) -> Self {
        self.flush_text = text.into();
        self
    }

    /// Fail when the frame with this zero-based index is fed.
    pub fn failing_at_frame(mut self, index: usize) -> Self {
        self.fail_at_frame = Some(index);
        self
    }

    pub fn failing_on_open(mut self) -> Self {
        self.fail_on_open = true;
        self
    }

    pub fn stats(&self) -> Arc<ScriptStats> {
        self.stats.clone()
    }
}

impl RecognitionEngine for ScriptedEngine {
    fn open(&self, model: &ModelId, sample_rate: u32) -> Result<Box<dyn Recognizer>> {
        if self.fail_on_open {
            anyhow::bail!("scripted engine refused to load {}", model);
        }
        debug!(model = %model, sample_rate, "Opening scripted recognizer");
        self.stats.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedRecognizer {
            remaining: self.script.iter().cloned().collect(),
            flush_text: self.flush_text.clone(),
            fail_at_frame: self.fail_at_frame,
            fed: 0,
            stats: self.stats.clone(),
        }))
    }
}

struct ScriptedRecognizer {
    remaining: VecDeque<Hypothesis>,
    flush_text: String,
    fail_at_frame: Option<usize>,
    fed: usize,
    stats: Arc<ScriptStats>,
}

impl Recognizer for ScriptedRecognizer {
    fn feed(&mut self, _frame: &[u8]) -> Result<Hypothesis> {
        if self.fail_at_frame == Some(self.fed) {
            anyhow::bail!("scripted failure at frame {}", self.fed);
        }
        self.fed += 1;
        self.stats.frames.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .remaining
            .pop_front()
            .unwrap_or_else(|| Hypothesis::Partial(String::new())))
    }

    fn flush(&mut self) -> Result<String> {
        Ok(std::mem::take(&mut self.flush_text))
    }
}

impl Drop for ScriptedRecognizer {
    fn drop(&mut self) {
        self.stats.released.fetch_add(1, Ordering::SeqCst);
    }
}
