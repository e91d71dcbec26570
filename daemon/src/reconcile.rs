//! Reconciliation of partial and final hypotheses into one transcript.
//!
//! Rules:
//! - every `Final` is trimmed and, when non-empty, appended to the transcript
//!   with a single separating space;
//! - a non-empty `Partial` replaces the fallback candidate and is never
//!   appended; an empty or whitespace `Partial` leaves the candidate as it
//!   was, so trailing silence cannot erase the last words heard;
//! - the flush text at end of input is treated exactly like a `Final`;
//! - the transcript wins when non-empty, otherwise the last non-empty partial
//!   is used (`used_fallback = true`), otherwise the result is empty.

/// Output of the recognizer for one fed frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hypothesis {
    /// Provisional text for the audio fed since the last final.
    Partial(String),
    /// Committed text; the recognizer starts a new segment after this.
    Final(String),
}

impl Hypothesis {
    pub fn partial(text: impl Into<String>) -> Self {
        Hypothesis::Partial(text.into())
    }

    pub fn final_text(text: impl Into<String>) -> Self {
        Hypothesis::Final(text.into())
    }
}

/// Reconciled output of one recognition session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionResult {
    pub transcript: String,
    pub used_fallback: bool,
}

/// Incremental form of [`reduce`], fed one hypothesis at a time.
#[derive(Debug, Default)]
pub struct Reconciler {
    transcript: String,
    last_partial: String,
    finals: usize,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, hypothesis: &Hypothesis) {
        match hypothesis {
            Hypothesis::Final(text) => self.append_final(text),
            Hypothesis::Partial(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    self.last_partial.clear();
                    self.last_partial.push_str(text);
                }
            }
        }
    }

    /// Number of non-empty final segments appended so far.
    pub fn final_segments(&self) -> usize {
        self.finals
    }

    fn append_final(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if !self.transcript.is_empty() {
            self.transcript.push(' ');
        }
        self.transcript.push_str(text);
        self.finals += 1;
    }

    /// Apply the end-of-input flush text and produce the session result.
    pub fn finish(mut self, flush_text: &str) -> SessionResult {
        self.append_final(flush_text);

        if !self.transcript.is_empty() {
            SessionResult {
                transcript: self.transcript,
                used_fallback: false,
            }
        } else if !self.last_partial.is_empty() {
            SessionResult {
                transcript: self.last_partial,
                used_fallback: true,
            }
        } else {
            SessionResult::default()
        }
    }
}

/// Reduce a whole hypothesis stream plus the flush text to a session result.
pub fn reduce<'a>(
    hypotheses: impl IntoIterator<Item = &'a Hypothesis>,
    flush_text: &str,
) -> SessionResult {
    let mut reconciler = Reconciler::new();
    for hypothesis in hypotheses {
        reconciler.observe(hypothesis);
    }
    reconciler.finish(flush_text)
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod tests;
