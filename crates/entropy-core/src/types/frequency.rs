//! Saturating frequency counters.

use std::fmt;

use crate::error::{CoreError, CoreResult};

/// A fixed-width vector of 16-bit counters.
///
/// Counters never overflow: incrementing one that sits at `u16::MAX` first
/// halves every counter in the vector, which keeps relative frequencies while
/// bounding counter width.
#[derive(Clone, PartialEq, Eq)]
pub struct FrequencyVector {
    counts: Vec<u16>,
}

impl FrequencyVector {
    /// An all-zero vector.
    pub fn zeros(width: usize) -> Self {
        Self {
            counts: vec![0; width],
        }
    }

    /// Wrap existing counters.
    ///
    /// # Errors
    /// - `CoreError::WidthMismatch` if `counts.len() != width`
    pub fn from_counts(counts: Vec<u16>, width: usize) -> CoreResult<Self> {
        if counts.len() != width {
            return Err(CoreError::WidthMismatch {
                expected: width,
                actual: counts.len(),
            });
        }
        Ok(Self { counts })
    }

    /// Number of counters.
    #[inline]
    pub fn width(&self) -> usize {
        self.counts.len()
    }

    /// The raw counters.
    #[inline]
    pub fn counts(&self) -> &[u16] {
        &self.counts
    }

    /// Counter at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> u16 {
        self.counts[index]
    }

    /// Increment the counter for `symbol`, halving all counters first if it
    /// is saturated.
    ///
    /// # Panics
    /// Panics if `symbol >= width`.
    pub fn increment(&mut self, symbol: usize) {
        if self.counts[symbol] == u16::MAX {
            for count in self.counts.iter_mut() {
                *count >>= 1;
            }
        }
        self.counts[symbol] += 1;
    }

    /// True if every counter is zero.
    pub fn is_zero(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Sum of all counters.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Counters as floats scaled to unit L2 norm. An all-zero vector stays zero.
    pub fn unit_normalized(&self) -> Vec<f64> {
        let sum: f64 = self.counts.iter().map(|&c| (c as f64) * (c as f64)).sum();
        let length = if sum == 0.0 { 1.0 } else { sum.sqrt() };
        self.counts.iter().map(|&c| c as f64 / length).collect()
    }
}

impl fmt::Debug for FrequencyVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nonzero = self.counts.iter().filter(|&&c| c != 0).count();
        f.debug_struct("FrequencyVector")
            .field("width", &self.width())
            .field("nonzero", &nonzero)
            .field("total", &self.total())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment() {
        let mut v = FrequencyVector::zeros(256);
        v.increment(b'a' as usize);
        v.increment(b'a' as usize);
        v.increment(b'b' as usize);
        assert_eq!(v.get(b'a' as usize), 2);
        assert_eq!(v.get(b'b' as usize), 1);
        assert_eq!(v.total(), 3);
    }

    #[test]
    fn test_decay_on_saturation() {
        let mut counts = vec![0u16; 256];
        counts[0] = u16::MAX;
        counts[1] = 100;
        counts[2] = 1;
        let mut v = FrequencyVector::from_counts(counts, 256).unwrap();

        v.increment(0);

        assert_eq!(v.get(0), u16::MAX / 2 + 1);
        assert_eq!(v.get(1), 50);
        assert_eq!(v.get(2), 0);
        assert!(v.counts().iter().all(|&c| c <= u16::MAX));
    }

    #[test]
    fn test_saturation_never_overflows() {
        let mut v = FrequencyVector::zeros(256);
        for _ in 0..(3 * u16::MAX as usize) {
            v.increment(9);
        }
        assert!(v.get(9) > u16::MAX / 2);
    }

    #[test]
    fn test_from_counts_width_mismatch() {
        let result = FrequencyVector::from_counts(vec![0; 10], 256);
        assert!(matches!(
            result,
            Err(CoreError::WidthMismatch {
                expected: 256,
                actual: 10
            })
        ));
    }

    #[test]
    fn test_unit_normalized() {
        let mut counts = vec![0u16; 4];
        counts[0] = 3;
        counts[1] = 4;
        let v = FrequencyVector::from_counts(counts, 4).unwrap();
        let n = v.unit_normalized();
        assert!((n[0] - 0.6).abs() < 1e-12);
        assert!((n[1] - 0.8).abs() < 1e-12);

        let zero = FrequencyVector::zeros(4).unit_normalized();
        assert!(zero.iter().all(|&x| x == 0.0));
    }
}
