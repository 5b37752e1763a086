//! Three-tone text modem
//!
//! Every character of a 27-symbol alphabet (a-z and space) is sent as the sum of
//! three sinusoids held for a fixed symbol duration. Two independent demodulators
//! recover the text: spectral peak picking and a Butterworth bandpass filter bank.

pub mod error;
pub mod config;
pub mod alphabet;
pub mod tone;
pub mod encoder;
pub mod segment;
pub mod spectrogram;
pub mod decoder_spectral;
pub mod butterworth;
pub mod decoder_filter;
pub mod compare;
pub mod channel;
pub mod resample;

pub use alphabet::{FrequencyTable, FrequencyTriple};
pub use channel::{MemoryChannel, Waveform, WaveformSink, WaveformSource};
pub use compare::{compare, Comparator, ComparisonReport};
pub use config::ModemConfig;
pub use decoder_filter::FilterBankDecoder;
pub use decoder_spectral::SpectralDecoder;
pub use encoder::Encoder;
pub use error::{Result, ToneModemError};
pub use tone::synthesize;

// Protocol constants
pub const SAMPLE_RATE: usize = 44100;
pub const SYMBOL_DURATION_SECS: f64 = 0.04;
pub const SAMPLES_PER_SYMBOL: usize = 1764; // floor(44100 * 0.04)

// Filter bank configuration
pub const BANDPASS_HALF_WIDTH_HZ: f64 = 25.0;
pub const BUTTERWORTH_ORDER: usize = 3;

// Spectral analysis configuration
pub const MAX_SPECTROGRAM_WINDOW: usize = 4096;
pub const PEAKS_PER_SYMBOL: usize = 3;

/// Character emitted for a segment when no table entry can be scored
pub const FALLBACK_CHAR: char = ' ';
