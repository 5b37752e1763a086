use crate::error::{Result, ToneModemError};

/// Three carrier frequencies (Hz) sent together for one character
pub type FrequencyTriple = [f64; 3];

/// Standard alphabet in table order
///
/// Table order doubles as the decoders' tie-break order.
pub const STANDARD_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz ";

/// Low carrier band
const LOW_BAND: [f64; 3] = [100.0, 300.0, 500.0];

/// Middle carrier band
const MID_BAND: [f64; 3] = [1100.0, 1300.0, 1500.0];

/// High carrier band
const HIGH_BAND: [f64; 3] = [2500.0, 3000.0, 3500.0];

/// Character to carrier-triple mapping
///
/// Built once and handed by reference to the encoder and decoders. Iteration
/// follows insertion order, which for [`FrequencyTable::standard`] is a-z then
/// space.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyTable {
    entries: Vec<(char, FrequencyTriple)>,
}

impl FrequencyTable {
    /// The 27-entry table: one frequency from each band per character
    ///
    /// Symbol index i maps to low band i / 9, middle band (i / 3) % 3 and
    /// high band i % 3, so 'a' = (100, 1100, 2500) and ' ' = (500, 1500, 3500).
    pub fn standard() -> Self {
        let entries = STANDARD_ALPHABET
            .chars()
            .enumerate()
            .map(|(i, c)| (c, [LOW_BAND[i / 9], MID_BAND[(i / 3) % 3], HIGH_BAND[i % 3]]))
            .collect();
        Self { entries }
    }

    /// Build a custom table, keeping the given order
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (char, FrequencyTriple)>,
    {
        let mut table = Self { entries: Vec::new() };
        for (c, triple) in entries {
            if table.contains(c) {
                return Err(ToneModemError::InvalidConfig(format!(
                    "character {:?} mapped twice",
                    c
                )));
            }
            table.entries.push((c, triple));
        }
        Ok(table)
    }

    pub fn get(&self, c: char) -> Option<&FrequencyTriple> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == c)
            .map(|(_, triple)| triple)
    }

    pub fn contains(&self, c: char) -> bool {
        self.get(c).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &FrequencyTriple)> {
        self.entries.iter().map(|(c, triple)| (*c, triple))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every distinct carrier used by the table, in first-seen order
    pub fn carriers(&self) -> Vec<f64> {
        let mut carriers: Vec<f64> = Vec::new();
        for (_, triple) in self.iter() {
            for &freq in triple {
                if !carriers.contains(&freq) {
                    carriers.push(freq);
                }
            }
        }
        carriers
    }

    /// Characters of `text` the table cannot encode, with their char positions
    pub fn unsupported(&self, text: &str) -> Vec<(usize, char)> {
        text.chars()
            .enumerate()
            .filter(|(_, c)| !self.contains(*c))
            .collect()
    }

    /// Check every carrier is positive, below Nyquist and distinct within its triple
    pub fn validate(&self, nyquist: f64) -> Result<()> {
        for (c, triple) in self.iter() {
            for (i, &freq) in triple.iter().enumerate() {
                if !(freq > 0.0 && freq < nyquist) {
                    return Err(ToneModemError::InvalidConfig(format!(
                        "carrier {} Hz for {:?} outside (0, {}) Hz",
                        freq, c, nyquist
                    )));
                }
                if triple[..i].contains(&freq) {
                    return Err(ToneModemError::InvalidConfig(format!(
                        "carrier {} Hz repeated for {:?}",
                        freq, c
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::standard()
    }
}
