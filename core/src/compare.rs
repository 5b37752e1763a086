use crate::alphabet::FrequencyTable;
use crate::config::ModemConfig;
use crate::decoder_filter::FilterBankDecoder;
use crate::decoder_spectral::SpectralDecoder;
use crate::error::{Result, ToneModemError};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Outcome of running both decoders over the same signal
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    pub spectral: String,
    pub filter_bank: String,
    pub spectral_elapsed: Duration,
    pub filter_bank_elapsed: Duration,
    /// Fraction of positions where the two decoders agree
    pub accuracy: f64,
}

impl ComparisonReport {
    /// Positions where both decoders produced the same character
    pub fn agreeing(&self) -> usize {
        self.spectral
            .chars()
            .zip(self.filter_bank.chars())
            .filter(|(a, b)| a == b)
            .count()
    }

    /// Number of decoded positions
    pub fn total(&self) -> usize {
        self.spectral.chars().count()
    }

    /// Per-decoder accuracy against the text that was actually sent
    ///
    /// Returns `(spectral, filter_bank)`, or `None` when there is nothing to
    /// compare.
    pub fn accuracy_against(&self, reference: &str) -> Option<(f64, f64)> {
        Some((
            positional_accuracy(&self.spectral, reference)?,
            positional_accuracy(&self.filter_bank, reference)?,
        ))
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Decoded (spectral):\n{}", self.spectral)?;
        writeln!(
            f,
            "Spectral decoding time: {:.4} seconds",
            self.spectral_elapsed.as_secs_f64()
        )?;
        writeln!(f, "Decoded (filter bank):\n{}", self.filter_bank)?;
        writeln!(
            f,
            "Filter bank decoding time: {:.4} seconds",
            self.filter_bank_elapsed.as_secs_f64()
        )?;
        write!(
            f,
            "Decoder agreement: {:.2}% ({}/{})",
            self.accuracy * 100.0,
            self.agreeing(),
            self.total()
        )
    }
}

/// Fraction of positions where `a` and `b` hold the same character
///
/// Positions past the end of the shorter string count as mismatches. `None`
/// when both are empty.
pub fn positional_accuracy(a: &str, b: &str) -> Option<f64> {
    let total = a.chars().count().max(b.chars().count());
    if total == 0 {
        return None;
    }
    let same = a.chars().zip(b.chars()).filter(|(x, y)| x == y).count();
    Some(same as f64 / total as f64)
}

/// Runs and times both decoders
pub struct Comparator {
    spectral: SpectralDecoder,
    filter_bank: FilterBankDecoder,
}

impl Comparator {
    pub fn new() -> Result<Self> {
        Self::with_table(Arc::new(FrequencyTable::standard()), ModemConfig::default())
    }

    pub fn with_table(table: Arc<FrequencyTable>, config: ModemConfig) -> Result<Self> {
        Ok(Self {
            spectral: SpectralDecoder::with_table(table.clone(), config)?,
            filter_bank: FilterBankDecoder::with_table(table, config)?,
        })
    }

    pub fn spectral(&self) -> &SpectralDecoder {
        &self.spectral
    }

    pub fn filter_bank(&self) -> &FilterBankDecoder {
        &self.filter_bank
    }

    /// Decode `signal` both ways and measure how often the results agree
    pub fn compare(&self, signal: &[f32]) -> Result<ComparisonReport> {
        if signal.is_empty() {
            return Err(ToneModemError::EmptySignal);
        }

        let start = Instant::now();
        let spectral = self.spectral.decode(signal)?;
        let spectral_elapsed = start.elapsed();

        let start = Instant::now();
        let filter_bank = self.filter_bank.decode(signal)?;
        let filter_bank_elapsed = start.elapsed();

        // Same segmentation on both sides, so the lengths match
        let accuracy =
            positional_accuracy(&spectral, &filter_bank).ok_or(ToneModemError::EmptySignal)?;

        log::debug!(
            "spectral {:?} in {:?}, filter bank {:?} in {:?}",
            spectral,
            spectral_elapsed,
            filter_bank,
            filter_bank_elapsed
        );

        Ok(ComparisonReport {
            spectral,
            filter_bank,
            spectral_elapsed,
            filter_bank_elapsed,
            accuracy,
        })
    }
}

/// Compare both decoders with the standard table and protocol defaults
pub fn compare(signal: &[f32]) -> Result<ComparisonReport> {
    Comparator::new()?.compare(signal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Encoder;

    #[test]
    fn test_positional_accuracy() {
        assert_eq!(positional_accuracy("abcd", "abcd"), Some(1.0));
        assert_eq!(positional_accuracy("abcd", "abxd"), Some(0.75));
        assert_eq!(positional_accuracy("ab", "abcd"), Some(0.5));
        assert_eq!(positional_accuracy("", ""), None);
    }

    #[test]
    fn test_compare_empty_signal() {
        let comparator = Comparator::new().unwrap();
        assert!(matches!(
            comparator.compare(&[]),
            Err(ToneModemError::EmptySignal)
        ));
    }

    #[test]
    fn test_compare_clean_signal() {
        let encoder = Encoder::new().unwrap();
        let report = compare(&encoder.encode("abc")).unwrap();
        assert_eq!(report.spectral, "abc");
        assert_eq!(report.filter_bank, "abc");
        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.agreeing(), 3);
        assert_eq!(report.total(), 3);
        assert_eq!(report.accuracy_against("abc"), Some((1.0, 1.0)));
    }

    #[test]
    fn test_report_display() {
        let report = ComparisonReport {
            spectral: "hi".into(),
            filter_bank: "ho".into(),
            spectral_elapsed: Duration::from_millis(12),
            filter_bank_elapsed: Duration::from_millis(340),
            accuracy: 0.5,
        };
        let text = report.to_string();
        assert!(text.contains("Decoded (spectral):\nhi"));
        assert!(text.contains("Spectral decoding time: 0.0120 seconds"));
        assert!(text.contains("Filter bank decoding time: 0.3400 seconds"));
        assert!(text.contains("Decoder agreement: 50.00% (1/2)"));
    }
}
