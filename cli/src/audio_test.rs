use super::*;
use tempfile::TempDir;

fn write_wav(dir: &TempDir, name: &str, spec: hound::WavSpec, samples: &[i16]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for sample in samples {
        writer.write_sample(*sample).unwrap();
    }
    writer.finalize().unwrap();
    path
}

fn mono_16k() -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate: 16_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

#[test]
fn test_wav_samples_become_little_endian_pcm() {
    let dir = TempDir::new().unwrap();
    let path = write_wav(&dir, "clip.wav", mono_16k(), &[1, -1, 256]);

    let pcm = load_payload(&path, 16_000).unwrap();
    assert_eq!(pcm, vec![0x01, 0x00, 0xFF, 0xFF, 0x00, 0x01]);
}

#[test]
fn test_wav_extension_is_case_insensitive() {
    let dir = TempDir::new().unwrap();
    let path = write_wav(&dir, "CLIP.WAV", mono_16k(), &[7]);

    assert_eq!(load_payload(&path, 16_000).unwrap(), vec![7, 0]);
}

#[test]
fn test_wav_rejects_stereo() {
    let dir = TempDir::new().unwrap();
    let spec = hound::WavSpec {
        channels: 2,
        ..mono_16k()
    };
    let path = write_wav(&dir, "stereo.wav", spec, &[0, 0]);

    let err = load_payload(&path, 16_000).unwrap_err();
    assert!(err.to_string().contains("mono"), "{err}");
}

#[test]
fn test_wav_rejects_wrong_rate() {
    let dir = TempDir::new().unwrap();
    let spec = hound::WavSpec {
        sample_rate: 44_100,
        ..mono_16k()
    };
    let path = write_wav(&dir, "hifi.wav", spec, &[0]);

    let err = load_payload(&path, 16_000).unwrap_err();
    assert!(err.to_string().contains("16000 Hz"), "{err}");
}

#[test]
fn test_raw_file_is_sent_verbatim() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("clip.raw");
    std::fs::write(&path, [1u8, 2, 3]).unwrap();

    assert_eq!(load_payload(&path, 16_000).unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(load_payload(&dir.path().join("nope.raw"), 16_000).is_err());
}
