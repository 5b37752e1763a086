//! Short-time power spectrum of a segment
//!
//! Mirrors the conventional default spectrogram estimate: periodic Tukey window
//! (shape 0.25), one-eighth overlap, per-frame mean removal, one-sided power
//! spectral density scaling. Frequencies fall on `k * fs / nperseg`.

use crate::error::{Result, ToneModemError};
use realfft::RealFftPlanner;
use std::f64::consts::PI;

/// Tukey taper fraction used for each analysis frame
const TUKEY_ALPHA: f64 = 0.25;

/// Time-frequency power estimate
#[derive(Debug, Clone)]
pub struct Spectrogram {
    /// Bin centre frequencies in Hz, `nperseg / 2 + 1` of them
    pub frequencies: Vec<f64>,
    /// Frame centre times in seconds
    pub times: Vec<f64>,
    /// Power spectral density indexed `[frame][bin]`
    pub power: Vec<Vec<f64>>,
}

impl Spectrogram {
    /// Compute the spectrogram of `samples`
    ///
    /// A segment shorter than `nperseg` is analysed as a single frame of its own
    /// length, with the overlap recomputed for that length. An empty segment
    /// gives an empty spectrogram.
    pub fn compute(
        planner: &mut RealFftPlanner<f64>,
        samples: &[f32],
        sample_rate: f64,
        nperseg: usize,
    ) -> Result<Self> {
        let nperseg = nperseg.min(samples.len());
        if nperseg == 0 {
            return Ok(Self {
                frequencies: Vec::new(),
                times: Vec::new(),
                power: Vec::new(),
            });
        }

        let noverlap = nperseg / 8;
        let step = nperseg - noverlap;
        let num_frames = (samples.len() - noverlap) / step;

        let window = tukey_window(nperseg, TUKEY_ALPHA);
        let scale = 1.0 / (sample_rate * window.iter().map(|w| w * w).sum::<f64>());

        let r2c = planner.plan_fft_forward(nperseg);
        let mut frame = r2c.make_input_vec();
        let mut spectrum = r2c.make_output_vec();
        let num_bins = spectrum.len();

        // DC, plus Nyquist for even lengths, appear once in a one-sided spectrum
        let doubled_end = if nperseg % 2 == 0 { num_bins - 1 } else { num_bins };

        let mut power = Vec::with_capacity(num_frames);
        let mut times = Vec::with_capacity(num_frames);

        for f in 0..num_frames {
            let start = f * step;
            let chunk = &samples[start..start + nperseg];

            let mean = chunk.iter().map(|&s| s as f64).sum::<f64>() / nperseg as f64;
            for ((slot, &sample), &w) in frame.iter_mut().zip(chunk).zip(&window) {
                *slot = (sample as f64 - mean) * w;
            }

            r2c.process(&mut frame, &mut spectrum)
                .map_err(|e| ToneModemError::FftError(e.to_string()))?;

            let row: Vec<f64> = spectrum
                .iter()
                .enumerate()
                .map(|(k, bin)| {
                    let psd = bin.norm_sqr() * scale;
                    if k >= 1 && k < doubled_end {
                        psd * 2.0
                    } else {
                        psd
                    }
                })
                .collect();

            power.push(row);
            times.push((start as f64 + nperseg as f64 / 2.0) / sample_rate);
        }

        let frequencies = (0..num_bins)
            .map(|k| k as f64 * sample_rate / nperseg as f64)
            .collect();

        Ok(Self {
            frequencies,
            times,
            power,
        })
    }

    /// Per-bin maximum power across all frames
    pub fn peak_salience(&self) -> Vec<f64> {
        let mut salience = vec![f64::NEG_INFINITY; self.frequencies.len()];
        for row in &self.power {
            for (best, &p) in salience.iter_mut().zip(row) {
                *best = best.max(p);
            }
        }
        salience
    }

    /// Frequencies of the `count` most salient bins, sorted ascending
    ///
    /// Equal salience prefers the lower bin. This departs from taking the tail
    /// of an ascending argsort, which favours the higher bin: on a silent
    /// segment every bin ties, so this picks 0/25/50 Hz (decoding as 'a')
    /// where the tail pick would choose the top of the spectrum. Fewer than
    /// `count` frequencies are returned when the spectrum has fewer bins.
    pub fn strongest_frequencies(&self, count: usize) -> Vec<f64> {
        if self.power.is_empty() {
            return Vec::new();
        }

        let salience = self.peak_salience();
        let mut order: Vec<usize> = (0..salience.len()).collect();
        order.sort_by(|&a, &b| salience[b].total_cmp(&salience[a]));

        let mut peaks: Vec<f64> = order
            .into_iter()
            .take(count)
            .map(|k| self.frequencies[k])
            .collect();
        peaks.sort_by(|a, b| a.total_cmp(b));
        peaks
    }
}

/// Periodic Tukey (tapered cosine) window
fn tukey_window(len: usize, alpha: f64) -> Vec<f64> {
    if len <= 1 {
        return vec![1.0; len];
    }

    // Periodic: design one sample longer and drop the last point
    let m = len + 1;
    let denom = (m - 1) as f64;
    let width = (alpha * denom / 2.0).floor() as usize;

    (0..len)
        .map(|i| {
            let n = i as f64;
            if i <= width {
                0.5 * (1.0 + (PI * (-1.0 + 2.0 * n / alpha / denom)).cos())
            } else if i >= m - width - 1 {
                0.5 * (1.0 + (PI * (-2.0 / alpha + 1.0 + 2.0 * n / alpha / denom)).cos())
            } else {
                1.0
            }
        })
        .collect()
}
