//! Fixed-length segmentation shared by both decoders
//!
//! Segments are consecutive and non-overlapping; the last one is shorter when
//! the signal length is not a multiple of `segment_length`.

/// Split a signal into per-character segments
///
/// # Panics
/// If `segment_length` is zero
pub fn segments(signal: &[f32], segment_length: usize) -> std::slice::Chunks<'_, f32> {
    signal.chunks(segment_length)
}

/// Number of segments a signal of `len` samples splits into
pub fn segment_count(len: usize, segment_length: usize) -> usize {
    len.div_ceil(segment_length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_multiple() {
        let signal = vec![0.0f32; 30];
        let parts: Vec<_> = segments(&signal, 10).collect();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.len() == 10));
        assert_eq!(segment_count(30, 10), 3);
    }

    #[test]
    fn test_short_tail() {
        let signal: Vec<f32> = (0..25).map(|i| i as f32).collect();
        let parts: Vec<_> = segments(&signal, 10).collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[2], &[20.0, 21.0, 22.0, 23.0, 24.0]);
        assert_eq!(segment_count(25, 10), 3);
    }

    #[test]
    fn test_empty_signal() {
        assert_eq!(segments(&[], 10).count(), 0);
        assert_eq!(segment_count(0, 10), 0);
    }
}
