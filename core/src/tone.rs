use std::f64::consts::PI;

/// Generate one multi-tone segment
///
/// Produces `floor(sample_rate * duration)` samples at times `i * duration / N`
/// (the end point is excluded), each the plain sum of a unit sine per frequency.
/// No amplitude scaling is applied, so three tones peak near +/-3.
///
/// Any number of frequencies is accepted; an empty slice yields silence and a
/// non-positive rate or duration yields an empty segment.
pub fn synthesize(frequencies: &[f64], sample_rate: f64, duration: f64) -> Vec<f32> {
    let n = (sample_rate * duration).floor() as usize;
    if n == 0 {
        return Vec::new();
    }

    let step = duration / n as f64;
    (0..n)
        .map(|i| {
            let t = i as f64 * step;
            frequencies
                .iter()
                .map(|&freq| (2.0 * PI * freq * t).sin())
                .sum::<f64>() as f32
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SAMPLES_PER_SYMBOL, SAMPLE_RATE, SYMBOL_DURATION_SECS};

    #[test]
    fn test_synthesize_length() {
        let samples = synthesize(&[100.0, 1100.0, 2500.0], SAMPLE_RATE as f64, SYMBOL_DURATION_SECS);
        assert_eq!(samples.len(), SAMPLES_PER_SYMBOL);
    }

    #[test]
    fn test_synthesize_starts_at_zero_phase() {
        let samples = synthesize(&[440.0, 880.0], 8000.0, 0.01);
        assert_eq!(samples[0], 0.0);
    }

    #[test]
    fn test_synthesize_deterministic() {
        let a = synthesize(&[300.0, 1300.0, 3000.0], 44100.0, 0.04);
        let b = synthesize(&[300.0, 1300.0, 3000.0], 44100.0, 0.04);
        assert_eq!(a, b);
    }

    #[test]
    fn test_synthesize_single_tone_matches_sine() {
        let sample_rate = 8000.0;
        let samples = synthesize(&[1000.0], sample_rate, 0.01);
        assert_eq!(samples.len(), 80);
        for (i, &sample) in samples.iter().enumerate() {
            let expected = (2.0 * PI * 1000.0 * i as f64 / sample_rate).sin() as f32;
            assert!((sample - expected).abs() < 1e-5, "sample {} differs", i);
        }
    }

    #[test]
    fn test_synthesize_no_normalization() {
        // Three in-phase tones add up well past unity
        let samples = synthesize(&[100.0, 1100.0, 2500.0], 44100.0, 0.04);
        let peak = samples.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
        assert!(peak > 2.0, "peak {} should exceed a single tone", peak);
        assert!(peak <= 3.0 + 1e-5);
    }

    #[test]
    fn test_synthesize_any_tone_count() {
        assert_eq!(synthesize(&[], 1000.0, 0.1), vec![0.0; 100]);
        let five = synthesize(&[10.0, 20.0, 30.0, 40.0, 50.0], 1000.0, 0.1);
        assert_eq!(five.len(), 100);
    }

    #[test]
    fn test_synthesize_degenerate_duration() {
        assert!(synthesize(&[100.0], 44100.0, 0.0).is_empty());
        assert!(synthesize(&[100.0], 44100.0, -1.0).is_empty());
    }
}
