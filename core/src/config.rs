use crate::error::{Result, ToneModemError};
use crate::{
    BANDPASS_HALF_WIDTH_HZ, BUTTERWORTH_ORDER, MAX_SPECTROGRAM_WINDOW, SAMPLE_RATE,
    SYMBOL_DURATION_SECS,
};

/// Highest Butterworth order the filter designer accepts
pub const MAX_FILTER_ORDER: usize = 10;

/// Modem parameters shared by the encoder and both decoders
///
/// The defaults are the wire contract: 44.1 kHz, 40 ms per character,
/// 3rd-order Butterworth bands of +/-25 Hz and a spectrogram window of at most
/// 4096 samples. Changing any of them produces audio that a default-configured
/// peer will not decode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModemConfig {
    pub sample_rate: u32,
    pub symbol_duration: f64,
    pub bandpass_half_width: f64,
    pub filter_order: usize,
    pub max_window: usize,
}

impl ModemConfig {
    /// Samples per character segment, `floor(sample_rate * symbol_duration)`
    pub fn segment_length(&self) -> usize {
        (self.sample_rate as f64 * self.symbol_duration).floor() as usize
    }

    /// Spectrogram window length used by the spectral decoder
    pub fn window_size(&self) -> usize {
        self.segment_length().min(self.max_window)
    }

    pub fn nyquist(&self) -> f64 {
        self.sample_rate as f64 / 2.0
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(ToneModemError::InvalidConfig(
                "sample rate must be positive".into(),
            ));
        }
        if !(self.symbol_duration > 0.0) {
            return Err(ToneModemError::InvalidConfig(format!(
                "symbol duration must be positive, got {}",
                self.symbol_duration
            )));
        }
        if self.segment_length() == 0 {
            return Err(ToneModemError::InvalidConfig(format!(
                "{} s at {} Hz is shorter than one sample",
                self.symbol_duration, self.sample_rate
            )));
        }
        if self.filter_order == 0 || self.filter_order > MAX_FILTER_ORDER {
            return Err(ToneModemError::InvalidConfig(format!(
                "filter order must be 1-{}, got {}",
                MAX_FILTER_ORDER, self.filter_order
            )));
        }
        if !(self.bandpass_half_width > 0.0) {
            return Err(ToneModemError::InvalidConfig(format!(
                "bandpass half width must be positive, got {}",
                self.bandpass_half_width
            )));
        }
        if self.max_window == 0 {
            return Err(ToneModemError::InvalidConfig(
                "spectrogram window must hold at least one sample".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ModemConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE as u32,
            symbol_duration: SYMBOL_DURATION_SECS,
            bandpass_half_width: BANDPASS_HALF_WIDTH_HZ,
            filter_order: BUTTERWORTH_ORDER,
            max_window: MAX_SPECTROGRAM_WINDOW,
        }
    }
}
