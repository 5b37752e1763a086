use crate::alphabet::{FrequencyTable, FrequencyTriple};
use crate::config::ModemConfig;
use crate::error::Result;
use crate::segment::{segment_count, segments};
use crate::spectrogram::Spectrogram;
use crate::{FALLBACK_CHAR, PEAKS_PER_SYMBOL};
use realfft::RealFftPlanner;
use std::sync::Arc;

/// Decoder using spectral peak picking
///
/// Every segment is reduced to its three most salient spectrogram bins and
/// matched against the table with a greedy nearest-carrier cost.
pub struct SpectralDecoder {
    table: Arc<FrequencyTable>,
    config: ModemConfig,
}

impl SpectralDecoder {
    pub fn new() -> Result<Self> {
        Self::with_table(Arc::new(FrequencyTable::standard()), ModemConfig::default())
    }

    pub fn with_table(table: Arc<FrequencyTable>, config: ModemConfig) -> Result<Self> {
        config.validate()?;
        table.validate(config.nyquist())?;
        Ok(Self { table, config })
    }

    /// Decode a whole signal, one character per segment
    ///
    /// Returns `ceil(len / segment_length)` characters; an empty signal decodes
    /// to an empty string.
    pub fn decode(&self, signal: &[f32]) -> Result<String> {
        let segment_length = self.config.segment_length();
        let mut planner = RealFftPlanner::<f64>::new();
        let mut decoded = String::with_capacity(segment_count(signal.len(), segment_length));

        for (index, segment) in segments(signal, segment_length).enumerate() {
            let c = self.decode_segment_with(&mut planner, segment)?;
            log::debug!("spectral segment {}: {:?}", index, c);
            decoded.push(c);
        }

        Ok(decoded)
    }

    /// Classify a single segment
    pub fn decode_segment(&self, segment: &[f32]) -> Result<char> {
        let mut planner = RealFftPlanner::<f64>::new();
        self.decode_segment_with(&mut planner, segment)
    }

    /// The ascending carrier estimate for a segment
    pub fn observed_frequencies(&self, segment: &[f32]) -> Result<Vec<f64>> {
        let mut planner = RealFftPlanner::<f64>::new();
        self.observe(&mut planner, segment)
    }

    fn observe(&self, planner: &mut RealFftPlanner<f64>, segment: &[f32]) -> Result<Vec<f64>> {
        let spectrogram = Spectrogram::compute(
            planner,
            segment,
            self.config.sample_rate as f64,
            self.config.window_size(),
        )?;
        Ok(spectrogram.strongest_frequencies(PEAKS_PER_SYMBOL))
    }

    fn decode_segment_with(
        &self,
        planner: &mut RealFftPlanner<f64>,
        segment: &[f32],
    ) -> Result<char> {
        let observed = self.observe(planner, segment)?;
        log::trace!("observed peaks {:?}", observed);
        Ok(self.closest_char(&observed))
    }

    /// Cheapest table entry for the observed peaks, first entry on ties
    fn closest_char(&self, observed: &[f64]) -> char {
        let mut closest = None;
        let mut min_cost = f64::INFINITY;

        for (c, triple) in self.table.iter() {
            let cost = matching_cost(observed, triple);
            if cost < min_cost {
                min_cost = cost;
                closest = Some(c);
            }
        }

        closest.unwrap_or(FALLBACK_CHAR)
    }
}

/// Greedy nearest-carrier distance
///
/// Each observed frequency is charged its distance to the nearest carrier of
/// the candidate. Several observations may land on the same carrier.
pub fn matching_cost(observed: &[f64], carriers: &FrequencyTriple) -> f64 {
    observed
        .iter()
        .map(|&freq| {
            carriers
                .iter()
                .map(|&carrier| (freq - carrier).abs())
                .fold(f64::INFINITY, f64::min)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Encoder;
    use crate::tone::synthesize;
    use crate::SAMPLES_PER_SYMBOL;

    #[test]
    fn test_matching_cost_exact() {
        assert_eq!(matching_cost(&[100.0, 1100.0, 2500.0], &[100.0, 1100.0, 2500.0]), 0.0);
    }

    #[test]
    fn test_matching_cost_is_greedy() {
        // Both low observations map onto the 100 Hz carrier
        let cost = matching_cost(&[100.0, 125.0, 2500.0], &[100.0, 1100.0, 2500.0]);
        assert_eq!(cost, 25.0);
    }

    #[test]
    fn test_matching_cost_no_observations() {
        assert_eq!(matching_cost(&[], &[100.0, 1100.0, 2500.0]), 0.0);
    }

    #[test]
    fn test_decode_every_character() {
        let encoder = Encoder::new().unwrap();
        let decoder = SpectralDecoder::new().unwrap();
        let alphabet = crate::alphabet::STANDARD_ALPHABET;
        let decoded = decoder.decode(&encoder.encode(alphabet)).unwrap();
        assert_eq!(decoded, alphabet);
    }

    #[test]
    fn test_observed_frequencies() {
        let decoder = SpectralDecoder::new().unwrap();
        let segment = synthesize(&[500.0, 1300.0, 3000.0], 44100.0, 0.04);
        assert_eq!(
            decoder.observed_frequencies(&segment).unwrap(),
            vec![500.0, 1300.0, 3000.0]
        );
        assert_eq!(decoder.decode_segment(&segment).unwrap(), 'w');
    }

    #[test]
    fn test_decode_empty_signal() {
        let decoder = SpectralDecoder::new().unwrap();
        assert_eq!(decoder.decode(&[]).unwrap(), "");
    }

    #[test]
    fn test_decode_partial_tail_segment() {
        let encoder = Encoder::new().unwrap();
        let decoder = SpectralDecoder::new().unwrap();
        let mut signal = encoder.encode("hi");
        signal.truncate(SAMPLES_PER_SYMBOL + 500);
        let decoded = decoder.decode(&signal).unwrap();
        assert_eq!(decoded.chars().count(), 2);
        assert!(decoded.starts_with('h'));
    }

    #[test]
    fn test_empty_table_falls_back_to_space() {
        let table = Arc::new(FrequencyTable::from_entries(std::iter::empty()).unwrap());
        let decoder = SpectralDecoder::with_table(table, ModemConfig::default()).unwrap();
        let signal = Encoder::new().unwrap().encode("abc");
        assert_eq!(decoder.decode(&signal).unwrap(), "   ");
    }

    #[test]
    fn test_tie_goes_to_first_entry() {
        let triple = [300.0, 1300.0, 3000.0];
        let table = Arc::new(FrequencyTable::from_entries([('q', triple), ('b', triple)]).unwrap());
        let decoder = SpectralDecoder::with_table(table, ModemConfig::default()).unwrap();
        let segment = synthesize(&triple, 44100.0, 0.04);
        for _ in 0..3 {
            assert_eq!(decoder.decode_segment(&segment).unwrap(), 'q');
        }
    }

    #[test]
    fn test_rejects_invalid_table() {
        let config = ModemConfig::default();
        let above_nyquist =
            Arc::new(FrequencyTable::from_entries([('a', [100.0, 1100.0, 22050.0])]).unwrap());
        assert!(matches!(
            SpectralDecoder::with_table(above_nyquist, config),
            Err(crate::error::ToneModemError::InvalidConfig(_))
        ));

        let repeated =
            Arc::new(FrequencyTable::from_entries([('a', [100.0, 100.0, 2500.0])]).unwrap());
        assert!(SpectralDecoder::with_table(repeated, config).is_err());
    }

    #[test]
    fn test_equidistant_candidates_tie_break() {
        // 200 Hz sits halfway between the 100 Hz and 300 Hz carriers
        let table = Arc::new(
            FrequencyTable::from_entries([
                ('m', [300.0, 1300.0, 2500.0]),
                ('d', [100.0, 1300.0, 2500.0]),
            ])
            .unwrap(),
        );
        let decoder = SpectralDecoder::with_table(table, ModemConfig::default()).unwrap();
        let segment = synthesize(&[200.0, 1300.0, 2500.0], 44100.0, 0.04);
        assert_eq!(decoder.observed_frequencies(&segment).unwrap(), vec![200.0, 1300.0, 2500.0]);
        assert_eq!(decoder.decode_segment(&segment).unwrap(), 'm');
    }
}
