//! WAV artifact writing for the synthesized signal.

use std::path::Path;

use super::synth::{SynthesisError, SAMPLE_RATE};

/// Write mono 16-bit PCM at [`SAMPLE_RATE`] to `path`.
pub fn write_wav(path: &Path, samples: &[i16]) -> Result<(), SynthesisError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    tracing::debug!("wrote {} samples to {}", samples.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_readable_wav() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("signal.wav");
        let samples = vec![i16::MAX, i16::MIN, i16::MAX, i16::MIN];

        write_wav(&path, &samples).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, SAMPLE_RATE);
        assert_eq!(spec.bits_per_sample, 16);

        let back: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(back, samples);
    }

    #[test]
    fn writes_empty_buffer_without_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.wav");
        write_wav(&path, &[]).unwrap();
        assert!(path.exists());
    }
}
