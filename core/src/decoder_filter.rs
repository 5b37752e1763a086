use crate::alphabet::FrequencyTable;
use crate::butterworth::BandpassFilter;
use crate::config::ModemConfig;
use crate::error::Result;
use crate::segment::{segment_count, segments};
use crate::FALLBACK_CHAR;
use std::sync::Arc;

/// Decoder using a bank of Butterworth bandpass filters
///
/// Each character's strength in a segment is the summed output magnitude of
/// the three filters centred on its carriers. One filter is designed per
/// distinct carrier when the decoder is built; every application starts from
/// rest, so neither segments nor candidates influence each other.
pub struct FilterBankDecoder {
    config: ModemConfig,
    filters: Vec<BandpassFilter>,
    /// Table entries with the indices of their three filters, in table order
    candidates: Vec<(char, [usize; 3])>,
}

impl FilterBankDecoder {
    pub fn new() -> Result<Self> {
        Self::with_table(Arc::new(FrequencyTable::standard()), ModemConfig::default())
    }

    pub fn with_table(table: Arc<FrequencyTable>, config: ModemConfig) -> Result<Self> {
        config.validate()?;
        table.validate(config.nyquist())?;

        let sample_rate = config.sample_rate as f64;
        let half_width = config.bandpass_half_width;

        let carriers = table.carriers();
        let filters = carriers
            .iter()
            .map(|&freq| {
                BandpassFilter::butterworth(
                    config.filter_order,
                    freq - half_width,
                    freq + half_width,
                    sample_rate,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        let candidates = table
            .iter()
            .map(|(c, triple)| {
                let mut indices = [0usize; 3];
                for (slot, freq) in indices.iter_mut().zip(triple) {
                    // carriers() lists every frequency of the table
                    *slot = carriers.iter().position(|f| f == freq).unwrap_or_default();
                }
                (c, indices)
            })
            .collect();

        Ok(Self {
            config,
            filters,
            candidates,
        })
    }

    /// Decode a whole signal, one character per segment
    ///
    /// A short trailing segment is filtered like any other and still yields a
    /// character.
    pub fn decode(&self, signal: &[f32]) -> Result<String> {
        let segment_length = self.config.segment_length();
        let mut decoded = String::with_capacity(segment_count(signal.len(), segment_length));

        for (index, segment) in segments(signal, segment_length).enumerate() {
            let c = self.decode_segment(segment);
            log::debug!("filter bank segment {}: {:?}", index, c);
            decoded.push(c);
        }

        Ok(decoded)
    }

    /// Classify a single segment: strongest candidate, first entry on ties
    pub fn decode_segment(&self, segment: &[f32]) -> char {
        let strengths = self.strengths(segment);

        let mut strongest = None;
        let mut max_strength = f64::NEG_INFINITY;
        for (c, strength) in strengths {
            if strength > max_strength {
                max_strength = strength;
                strongest = Some(c);
            }
        }

        log::trace!("winning strength {}", max_strength);
        strongest.unwrap_or(FALLBACK_CHAR)
    }

    /// Strength of every table entry for `segment`, in table order
    pub fn strengths(&self, segment: &[f32]) -> Vec<(char, f64)> {
        let energies: Vec<f64> = self
            .filters
            .iter()
            .map(|filter| filter.energy(segment))
            .collect();

        self.candidates
            .iter()
            .map(|(c, indices)| (*c, indices.iter().map(|&i| energies[i]).sum()))
            .collect()
    }
}
