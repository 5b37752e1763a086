use crate::alphabet::FrequencyTable;
use crate::config::ModemConfig;
use crate::error::Result;
use crate::tone::synthesize;
use std::sync::Arc;

/// Text to three-tone audio encoder
///
/// Each supported character becomes one segment of `segment_length` samples.
/// Characters missing from the table are logged and dropped without a
/// placeholder, so the audio no longer lines up with the text positions once
/// anything is skipped.
pub struct Encoder {
    table: Arc<FrequencyTable>,
    config: ModemConfig,
}

impl Encoder {
    /// Encoder for the standard alphabet at the protocol defaults
    pub fn new() -> Result<Self> {
        Self::with_table(Arc::new(FrequencyTable::standard()), ModemConfig::default())
    }

    pub fn with_table(table: Arc<FrequencyTable>, config: ModemConfig) -> Result<Self> {
        config.validate()?;
        table.validate(config.nyquist())?;
        Ok(Self { table, config })
    }

    pub fn table(&self) -> &FrequencyTable {
        &self.table
    }

    pub fn config(&self) -> &ModemConfig {
        &self.config
    }

    /// Encode text into one concatenated waveform
    pub fn encode(&self, text: &str) -> Vec<f32> {
        let sample_rate = self.config.sample_rate as f64;
        let mut samples = Vec::with_capacity(self.encoded_len(text));

        for c in text.chars() {
            match self.table.get(c) {
                Some(triple) => {
                    samples.extend(synthesize(triple, sample_rate, self.config.symbol_duration));
                }
                None => {
                    log::warn!("Character {:?} not in frequency table, skipping", c);
                }
            }
        }

        samples
    }

    /// Number of samples `encode` will produce for `text`
    pub fn encoded_len(&self, text: &str) -> usize {
        let supported = text.chars().filter(|&c| self.table.contains(c)).count();
        supported * self.config.segment_length()
    }
}
