//! Butterworth bandpass design and stateless forward filtering
//!
//! The analog prototype is shifted to the band with the usual low-pass to
//! band-pass substitution, mapped to the z-plane with a pre-warped bilinear
//! transform and realised as cascaded second-order sections. Filtering is
//! causal and single-pass (no zero-phase correction), starting from rest on
//! every call.

use crate::config::MAX_FILTER_ORDER;
use crate::error::{Result, ToneModemError};
use num_complex::Complex64;
use std::f64::consts::PI;

/// A second-order section
///
/// Transfer function: H(z) = (b0 + b1*z^-1 + b2*z^-2) / (1 + a1*z^-1 + a2*z^-2)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Biquad {
    /// Numerator coefficients [b0, b1, b2]
    b: [f64; 3],
    /// Denominator coefficients [a1, a2] (a0 is normalized to 1)
    a: [f64; 2],
}

impl Biquad {
    fn new(b: [f64; 3], a: [f64; 2]) -> Self {
        Self { b, a }
    }

    /// Poles inside the unit circle
    pub fn is_stable(&self) -> bool {
        self.a[1].abs() < 1.0 && self.a[0].abs() < 1.0 + self.a[1]
    }

    fn response(&self, z_inv: Complex64) -> Complex64 {
        let z_inv2 = z_inv * z_inv;
        let num = self.b[0] + self.b[1] * z_inv + self.b[2] * z_inv2;
        let den = 1.0 + self.a[0] * z_inv + self.a[1] * z_inv2;
        num / den
    }
}

/// Butterworth bandpass filter as cascaded biquads
#[derive(Debug, Clone)]
pub struct BandpassFilter {
    sections: Vec<Biquad>,
    order: usize,
    low_hz: f64,
    high_hz: f64,
}

impl BandpassFilter {
    /// Design an `order`-th order Butterworth bandpass between `low_hz` and `high_hz`
    ///
    /// The resulting filter has order `2 * order`, -3 dB at both band edges and
    /// unity gain at the band centre.
    pub fn butterworth(order: usize, low_hz: f64, high_hz: f64, sample_rate: f64) -> Result<Self> {
        let nyquist = sample_rate / 2.0;
        if !(low_hz > 0.0 && low_hz < high_hz && high_hz < nyquist) {
            return Err(ToneModemError::InvalidPassband {
                low: low_hz,
                high: high_hz,
                nyquist,
            });
        }
        if order == 0 || order > MAX_FILTER_ORDER {
            return Err(ToneModemError::InvalidConfig(format!(
                "filter order must be 1-{}, got {}",
                MAX_FILTER_ORDER, order
            )));
        }

        let fs2 = 2.0 * sample_rate;
        let w1 = prewarp(low_hz, sample_rate);
        let w2 = prewarp(high_hz, sample_rate);
        let bandwidth = w2 - w1;
        let centre_sq = w1 * w2;

        // Each prototype pole splits into two band-pass poles
        let mut poles = Vec::with_capacity(2 * order);
        for p in butterworth_poles(order) {
            let shifted = p * (bandwidth / 2.0);
            let offset = (shifted * shifted - centre_sq).sqrt();
            poles.push(shifted + offset);
            poles.push(shifted - offset);
        }

        // Bilinear transform: the `order` analog zeros at s = 0 land on z = 1,
        // the zeros at infinity on z = -1.
        let mut gain = Complex64::new((bandwidth * fs2).powi(order as i32), 0.0);
        let digital: Vec<Complex64> = poles
            .iter()
            .map(|&p| {
                gain /= fs2 - p;
                (fs2 + p) / (fs2 - p)
            })
            .collect();

        let sections = pair_sections(&digital, gain.re, order);

        Ok(Self {
            sections,
            order,
            low_hz,
            high_hz,
        })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn passband(&self) -> (f64, f64) {
        (self.low_hz, self.high_hz)
    }

    pub fn num_sections(&self) -> usize {
        self.sections.len()
    }

    pub fn is_stable(&self) -> bool {
        self.sections.iter().all(Biquad::is_stable)
    }

    /// Filter `samples` from zero initial state
    ///
    /// Causal and single-pass, so any length is accepted; an empty input gives
    /// an empty output.
    pub fn apply(&self, samples: &[f32]) -> Vec<f64> {
        let mut output: Vec<f64> = samples.iter().map(|&s| s as f64).collect();
        for section in &self.sections {
            // Direct Form II Transposed
            let mut state = [0.0f64; 2];
            for sample in output.iter_mut() {
                let input = *sample;
                let y = section.b[0] * input + state[0];
                state[0] = section.b[1] * input - section.a[0] * y + state[1];
                state[1] = section.b[2] * input - section.a[1] * y;
                *sample = y;
            }
        }
        output
    }

    /// Sum of absolute filtered samples, the in-band energy proxy
    pub fn energy(&self, samples: &[f32]) -> f64 {
        self.apply(samples).iter().map(|y| y.abs()).sum()
    }

    /// Magnitude response at `freq_hz`
    pub fn magnitude_response(&self, freq_hz: f64, sample_rate: f64) -> f64 {
        let omega = 2.0 * PI * freq_hz / sample_rate;
        let z_inv = Complex64::new(omega.cos(), -omega.sin());
        self.sections
            .iter()
            .fold(Complex64::new(1.0, 0.0), |acc, s| acc * s.response(z_inv))
            .norm()
    }
}

/// Pre-warp frequency for bilinear transform.
fn prewarp(freq_hz: f64, sample_rate: f64) -> f64 {
    2.0 * sample_rate * (PI * freq_hz / sample_rate).tan()
}

/// Calculate Butterworth analog prototype poles.
fn butterworth_poles(order: usize) -> Vec<Complex64> {
    (0..order)
        .map(|k| {
            let theta = PI * (2 * k + order + 1) as f64 / (2 * order) as f64;
            Complex64::from_polar(1.0, theta)
        })
        .collect()
}

/// Group z-plane poles into biquads, each carrying one zero at z = 1 and one at z = -1
///
/// Conjugate pairs share a section; any real poles are paired in ascending
/// order. The overall gain is spread evenly across the sections.
fn pair_sections(poles: &[Complex64], gain: f64, order: usize) -> Vec<Biquad> {
    let tolerance = 1e-12;
    let mut denominators = Vec::with_capacity(order);

    for p in poles.iter().filter(|p| p.im > tolerance) {
        denominators.push([-2.0 * p.re, p.norm_sqr()]);
    }

    let mut real: Vec<f64> = poles
        .iter()
        .filter(|p| p.im.abs() <= tolerance)
        .map(|p| p.re)
        .collect();
    real.sort_by(|a, b| a.total_cmp(b));
    for pair in real.chunks(2) {
        let p1 = pair[0];
        let p2 = pair.get(1).copied().unwrap_or(0.0);
        denominators.push([-(p1 + p2), p1 * p2]);
    }

    let per_section = gain.abs().powf(1.0 / denominators.len() as f64);
    denominators
        .into_iter()
        .enumerate()
        .map(|(i, a)| {
            let g = if i == 0 && gain < 0.0 { -per_section } else { per_section };
            Biquad::new([g, 0.0, -g], a)
        })
        .collect()
}
