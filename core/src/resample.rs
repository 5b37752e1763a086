//! Bringing foreign recordings to the modem's format
//! Multichannel audio is averaged to mono and other rates are linearly interpolated

use crate::channel::Waveform;
use crate::error::{Result, ToneModemError};

/// Average interleaved multichannel audio down to mono
///
/// # Arguments
/// * `samples` - Interleaved frames [c0, c1, ..., c0, c1, ...]
/// * `channels` - Channels per frame
///
/// # Errors
/// `InvalidSignal` if `channels` is zero or does not divide the sample count
pub fn downmix(samples: &[f32], channels: usize) -> Result<Vec<f32>> {
    if channels == 0 {
        return Err(ToneModemError::InvalidSignal("zero channels".into()));
    }
    if channels == 1 {
        return Ok(samples.to_vec());
    }
    if samples.len() % channels != 0 {
        return Err(ToneModemError::InvalidSignal(format!(
            "{} samples do not split into {}-channel frames",
            samples.len(),
            channels
        )));
    }

    Ok(samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect())
}

/// Resample audio to a target sample rate using linear interpolation
///
/// # Example
/// ```ignore
/// let audio_48k = vec![0.1, 0.2, 0.3, ...]; // audio at 48kHz
/// let audio_44k = resample_audio(&audio_48k, 48000, 44100);
/// ```
pub fn resample_audio(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() || from_rate == 0 {
        return samples.to_vec();
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let new_length = (samples.len() as u64 * to_rate as u64).div_ceil(from_rate as u64) as usize;
    let last = samples.len() - 1;

    (0..new_length)
        .map(|i| {
            let src = i as f64 / ratio;
            let floor = (src.floor() as usize).min(last);
            let fraction = (src - floor as f64) as f32;
            if floor < last {
                samples[floor] * (1.0 - fraction) + samples[floor + 1] * fraction
            } else {
                samples[last]
            }
        })
        .collect()
}

/// Mono samples of `waveform` at `target_rate`
pub fn conform(waveform: &Waveform, target_rate: u32) -> Vec<f32> {
    if waveform.sample_rate != target_rate {
        log::warn!(
            "Resampling from {} Hz to {} Hz; tone positions may drift",
            waveform.sample_rate,
            target_rate
        );
    }
    resample_audio(&waveform.samples, waveform.sample_rate, target_rate)
}
