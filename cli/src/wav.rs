use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tritone_core::resample::downmix;
use tritone_core::{ToneModemError, Waveform, WaveformSink, WaveformSource};

#[derive(Debug, Error)]
pub enum WavError {
    #[error("WAV I/O error on {path}: {source}")]
    Hound {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("Unsupported WAV format: {bits}-bit {format:?}")]
    UnsupportedFormat { bits: u16, format: SampleFormat },

    #[error(transparent)]
    Modem(#[from] ToneModemError),
}

/// WAV file on disk, read through hound
///
/// Writes are always mono 32-bit float so encoder output keeps its full
/// amplitude. Reads accept integer PCM up to 32 bits or 32-bit float with any
/// channel count; channels are averaged to mono.
pub struct WavFile {
    path: PathBuf,
}

impl WavFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn hound_error(&self, source: hound::Error) -> WavError {
        WavError::Hound {
            path: self.path.clone(),
            source,
        }
    }
}

impl WaveformSource for WavFile {
    type Error = WavError;

    fn load(&mut self) -> Result<Waveform, WavError> {
        let mut reader = WavReader::open(&self.path).map_err(|e| self.hound_error(e))?;
        let spec = reader.spec();
        log::info!(
            "Read WAV: {} Hz, {} channels, {} bits",
            spec.sample_rate,
            spec.channels,
            spec.bits_per_sample
        );

        let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Float, 32) => reader
                .samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(|e| self.hound_error(e))?,
            (SampleFormat::Int, bits @ 1..=32) => {
                let scale = (1u64 << (bits - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|s| s as f32 / scale))
                    .collect::<Result<_, _>>()
                    .map_err(|e| self.hound_error(e))?
            }
            (format, bits) => return Err(WavError::UnsupportedFormat { bits, format }),
        };

        let samples = downmix(&interleaved, spec.channels as usize)?;
        Ok(Waveform::new(samples, spec.sample_rate))
    }
}

impl WaveformSink for WavFile {
    type Error = WavError;

    fn store(&mut self, samples: &[f32], sample_rate: u32) -> Result<(), WavError> {
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };

        let mut writer = WavWriter::create(&self.path, spec).map_err(|e| self.hound_error(e))?;
        for &sample in samples {
            writer
                .write_sample(sample)
                .map_err(|e| self.hound_error(e))?;
        }
        writer.finalize().map_err(|e| self.hound_error(e))?;

        log::info!("Wrote {} samples to {}", samples.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tritone-wav-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_float_roundtrip_keeps_amplitude() {
        let path = temp_path("float.wav");
        let samples = vec![0.0, 2.75, -2.5, 1.0];

        WavFile::new(&path).store(&samples, 44100).unwrap();
        let loaded = WavFile::new(&path).load().unwrap();

        assert_eq!(loaded.samples, samples);
        assert_eq!(loaded.sample_rate, 44100);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_reads_16_bit_stereo() {
        let path = temp_path("stereo16.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for s in [16384i16, 0, -16384, -16384] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let loaded = WavFile::new(&path).load().unwrap();
        assert_eq!(loaded.sample_rate, 22050);
        assert_eq!(loaded.samples.len(), 2);
        assert!((loaded.samples[0] - 0.25).abs() < 1e-6);
        assert!((loaded.samples[1] + 0.5).abs() < 1e-6);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_reads_24_bit() {
        let path = temp_path("mono24.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 24,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        writer.write_sample(4_194_304i32).unwrap();
        writer.finalize().unwrap();

        let loaded = WavFile::new(&path).load().unwrap();
        assert!((loaded.samples[0] - 0.5).abs() < 1e-6);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file() {
        let result = WavFile::new(temp_path("does-not-exist.wav")).load();
        assert!(matches!(result, Err(WavError::Hound { .. })));
    }
}
