//! Boundaries to whatever stores or plays the audio
//!
//! The engine only produces and consumes sample buffers. File formats, audio
//! devices and UIs sit behind these traits.

use std::convert::Infallible;

/// Samples plus the rate they were captured or generated at
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Something a waveform can be read from
pub trait WaveformSource {
    type Error;

    fn load(&mut self) -> Result<Waveform, Self::Error>;
}

/// Something a waveform can be written to, verbatim
pub trait WaveformSink {
    type Error;

    fn store(&mut self, samples: &[f32], sample_rate: u32) -> Result<(), Self::Error>;
}

/// In-memory source and sink
///
/// `load` returns the most recently stored waveform, or an empty one at the
/// protocol rate if nothing has been stored.
#[derive(Debug, Clone, Default)]
pub struct MemoryChannel {
    stored: Option<Waveform>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored(&self) -> Option<&Waveform> {
        self.stored.as_ref()
    }
}

impl WaveformSink for MemoryChannel {
    type Error = Infallible;

    fn store(&mut self, samples: &[f32], sample_rate: u32) -> Result<(), Self::Error> {
        self.stored = Some(Waveform::new(samples.to_vec(), sample_rate));
        Ok(())
    }
}

impl WaveformSource for MemoryChannel {
    type Error = Infallible;

    fn load(&mut self) -> Result<Waveform, Self::Error> {
        Ok(self
            .stored
            .clone()
            .unwrap_or_else(|| Waveform::new(Vec::new(), crate::SAMPLE_RATE as u32)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_channel_roundtrip() {
        let mut channel = MemoryChannel::new();
        let samples = vec![0.0, 2.5, -3.0, 1.0];
        channel.store(&samples, 44100).unwrap();
        let loaded = channel.load().unwrap();
        assert_eq!(loaded.samples, samples);
        assert_eq!(loaded.sample_rate, 44100);
    }

    #[test]
    fn test_memory_channel_empty() {
        let mut channel = MemoryChannel::new();
        assert!(channel.stored().is_none());
        let loaded = channel.load().unwrap();
        assert!(loaded.samples.is_empty());
        assert_eq!(loaded.sample_rate, 44100);
    }

    #[test]
    fn test_waveform_duration() {
        let waveform = Waveform::new(vec![0.0; 1764], 44100);
        assert!((waveform.duration_secs() - 0.04).abs() < 1e-12);
        assert_eq!(Waveform::new(vec![0.0; 10], 0).duration_secs(), 0.0);
    }
}
