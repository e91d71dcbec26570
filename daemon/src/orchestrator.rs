//! Per-request pipeline: resolve, recognize, reconcile, translate.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::dispatch::TranslationDispatcher;
use crate::error::{PipelineError, Result};
use crate::frames::{AudioPayload, FrameBuffer};
use crate::language::LanguagePair;
use crate::recognize::RecognitionEngine;
use crate::reconcile::SessionResult;
use crate::resolver::{LanguageResolver, ModelId};
use crate::session::RecognitionSession;
use crate::translate::Translator;

/// Audio format and feeding granularity shared by every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioSettings {
    pub sample_rate: u32,
    pub frame_size: NonZeroUsize,
}

/// Wires the pipeline stages for one utterance at a time.
///
/// Holds only read-only state; any number of requests may run concurrently.
#[derive(Clone)]
pub struct Orchestrator {
    resolver: Arc<LanguageResolver>,
    engine: Arc<dyn RecognitionEngine>,
    dispatcher: TranslationDispatcher,
    audio: AudioSettings,
}

impl Orchestrator {
    pub fn new(
        resolver: LanguageResolver,
        engine: Arc<dyn RecognitionEngine>,
        translator: Arc<dyn Translator>,
        audio: AudioSettings,
    ) -> Self {
        Self {
            resolver: Arc::new(resolver),
            engine,
            dispatcher: TranslationDispatcher::new(translator),
            audio,
        }
    }

    pub fn resolver(&self) -> &LanguageResolver {
        &self.resolver
    }

    pub fn dispatcher(&self) -> &TranslationDispatcher {
        &self.dispatcher
    }

    /// Transcribe `payload` and return the (possibly translated) response text.
    ///
    /// Fails with `UnsupportedLanguage` before any recognizer is allocated when
    /// the source language has no model.
    pub async fn process(&self, payload: AudioPayload, pair: &LanguagePair) -> Result<String> {
        self.process_holding(payload, pair, ()).await
    }

    /// Like [`process`](Self::process), keeping `guard` alive for as long as
    /// the request or its recognition runs, whichever ends last.
    ///
    /// Recognition runs on the blocking pool and is not interrupted when the
    /// returned future is dropped; the guard travels with it.
    pub async fn process_holding<G>(
        &self,
        payload: AudioPayload,
        pair: &LanguagePair,
        guard: G,
    ) -> Result<String>
    where
        G: Send + 'static,
    {
        let started = Instant::now();
        let model = self.resolver.resolve(&pair.from)?;
        let bytes = payload.len();
        let frames = FrameBuffer::new(payload.as_bytes(), self.audio.frame_size).frame_count();

        let engine = self.engine.clone();
        let audio = self.audio;
        let (session_result, guard) = tokio::task::spawn_blocking(move || {
            let result = transcribe(engine.as_ref(), &model, audio, &payload);
            (result, guard)
        })
        .await
        .map_err(PipelineError::recognition)?;
        let session_result = session_result?;

        let text = self
            .dispatcher
            .dispatch(&session_result.transcript, pair)
            .await?;
        drop(guard);

        info!(
            bytes,
            frames,
            pair = %pair,
            used_fallback = session_result.used_fallback,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Utterance processed"
        );
        Ok(text)
    }
}

/// Feed the whole payload through a fresh session and reconcile the result.
///
/// Blocking; the session's recognizer is released on every exit path.
pub fn transcribe(
    engine: &dyn RecognitionEngine,
    model: &ModelId,
    audio: AudioSettings,
    payload: &AudioPayload,
) -> Result<SessionResult> {
    let frames = FrameBuffer::new(payload.as_bytes(), audio.frame_size);
    let mut session = RecognitionSession::open(engine, model, audio.sample_rate)?;

    for frame in &frames {
        session.feed(frame)?;
    }
    let result = session.close()?;

    debug!(
        model = %model,
        frames = frames.frame_count(),
        used_fallback = result.used_fallback,
        "Transcription finished"
    );
    Ok(result)
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
