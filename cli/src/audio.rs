//! Loading recordings into the raw PCM payload the server expects.

use std::path::Path;

use anyhow::{Context, Result};

/// Read `path` as a request body.
///
/// WAV files are decoded and must be 16-bit integer mono at `sample_rate`;
/// their samples are sent as little-endian PCM. Anything else is sent as-is.
pub fn load_payload(path: &Path, sample_rate: u32) -> Result<Vec<u8>> {
    if is_wav(path) {
        wav_to_pcm(path, sample_rate)
    } else {
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"))
}

/// Decode a 16-bit mono WAV file into little-endian PCM bytes.
pub fn wav_to_pcm(path: &Path, sample_rate: u32) -> Result<Vec<u8>> {
    let reader = hound::WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file {}", path.display()))?;
    let spec = reader.spec();

    if spec.channels != 1 {
        anyhow::bail!("Expected mono audio, got {} channels", spec.channels);
    }
    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        anyhow::bail!(
            "Expected 16-bit integer samples, got {}-bit {:?}",
            spec.bits_per_sample,
            spec.sample_format
        );
    }
    if spec.sample_rate != sample_rate {
        anyhow::bail!(
            "Expected {} Hz audio, got {} Hz",
            sample_rate,
            spec.sample_rate
        );
    }

    let samples = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to decode WAV samples")?;
    Ok(samples.iter().flat_map(|s| s.to_le_bytes()).collect())
}

#[cfg(test)]
#[path = "audio_test.rs"]
mod tests;
