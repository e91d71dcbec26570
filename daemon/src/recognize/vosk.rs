//! Vosk (Kaldi) recognition backend.
//!
//! Each session loads its model from the resolved directory and owns its own
//! recognizer; nothing is cached across requests.

use anyhow::{Context, Result};
use tracing::{debug, info};
use vosk::{DecodingState, Model, Recognizer as KaldiRecognizer};

use super::{RecognitionEngine, Recognizer};
use crate::reconcile::Hypothesis;
use crate::resolver::ModelId;

/// Opens Vosk recognizers for resolved models.
#[derive(Debug, Default)]
pub struct VoskEngine;

impl VoskEngine {
    pub fn new() -> Self {
        // Kaldi logs every model load to stderr at its default level.
        vosk::set_log_level(vosk::LogLevel::Error);
        Self
    }
}

impl RecognitionEngine for VoskEngine {
    fn open(&self, model: &ModelId, sample_rate: u32) -> Result<Box<dyn Recognizer>> {
        let path = model.path();
        info!(model = %model, path = %path.display(), sample_rate, "Loading Vosk model");

        let path_str = path.to_str().context("Model path is not valid UTF-8")?;
        let vosk_model = Model::new(path_str)
            .with_context(|| format!("Failed to load Vosk model from {}", path.display()))?;
        let recognizer = KaldiRecognizer::new(&vosk_model, sample_rate as f32)
            .context("Failed to create Vosk recognizer")?;

        Ok(Box::new(VoskRecognizer {
            recognizer,
            _model: vosk_model,
            samples: Vec::new(),
        }))
    }
}

/// Field order matters: the recognizer is dropped before its model.
struct VoskRecognizer {
    recognizer: KaldiRecognizer,
    _model: Model,
    samples: Vec<i16>,
}

impl Recognizer for VoskRecognizer {
    fn feed(&mut self, frame: &[u8]) -> Result<Hypothesis> {
        decode_pcm16(frame, &mut self.samples);
        if frame.len() % 2 != 0 {
            debug!(bytes = frame.len(), "Dropping trailing half sample");
        }

        let state = self
            .recognizer
            .accept_waveform(&self.samples)
            .map_err(|e| anyhow::anyhow!("Vosk rejected waveform: {e:?}"))?;

        match state {
            DecodingState::Finalized => {
                let text = self
                    .recognizer
                    .result()
                    .single()
                    .map(|r| r.text.to_string())
                    .unwrap_or_default();
                Ok(Hypothesis::Final(text))
            }
            DecodingState::Running => {
                let partial = self.recognizer.partial_result();
                Ok(Hypothesis::Partial(partial.partial.to_string()))
            }
            DecodingState::Failed => anyhow::bail!("Vosk decoding failed"),
        }
    }

    fn flush(&mut self) -> Result<String> {
        Ok(self
            .recognizer
            .final_result()
            .single()
            .map(|r| r.text.to_string())
            .unwrap_or_default())
    }
}

/// Decode little-endian 16-bit PCM into `out`, replacing its contents.
fn decode_pcm16(bytes: &[u8], out: &mut Vec<i16>) {
    out.clear();
    out.extend(
        bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]])),
    );
}
