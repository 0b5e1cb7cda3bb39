//! Fixed-length symbol context keys.

use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Longest supported context.
pub const MAX_ORDER: usize = 16;

/// An ordered, fixed-length sequence of byte symbols.
///
/// Stored inline so keys are `Copy` and hash without allocation. Position 0
/// is the oldest symbol; [`SymbolContext::push`] shifts left and appends.
/// Backoff zeroes a prefix of the oldest positions, see [`SymbolContext::masked`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolContext {
    len: u8,
    symbols: [u8; MAX_ORDER],
}

impl SymbolContext {
    /// An all-zero context of the given order.
    ///
    /// # Errors
    /// - `CoreError::InvalidContextLength` if order is 0 or above [`MAX_ORDER`]
    pub fn zeroed(order: usize) -> CoreResult<Self> {
        if order == 0 || order > MAX_ORDER {
            return Err(CoreError::InvalidContextLength {
                actual: order,
                max: MAX_ORDER,
            });
        }
        Ok(Self {
            len: order as u8,
            symbols: [0; MAX_ORDER],
        })
    }

    /// Copy a context from a byte slice; its length becomes the order.
    ///
    /// # Errors
    /// - `CoreError::InvalidContextLength` if the slice is empty or longer than [`MAX_ORDER`]
    pub fn from_slice(bytes: &[u8]) -> CoreResult<Self> {
        let mut context = Self::zeroed(bytes.len())?;
        context.symbols[..bytes.len()].copy_from_slice(bytes);
        Ok(context)
    }

    /// The `order`-wide window of `input` starting at `start`.
    ///
    /// # Panics
    /// Panics if the window runs past the end of `input`.
    pub fn window(input: &[u8], start: usize, order: usize) -> CoreResult<Self> {
        Self::from_slice(&input[start..start + order])
    }

    /// Number of symbols in the context.
    #[inline]
    pub fn order(&self) -> usize {
        self.len as usize
    }

    /// The raw key bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.symbols[..self.len as usize]
    }

    /// Copy with the first `level` (oldest) positions zeroed.
    ///
    /// Level 0 is the full context; each level shortens the effective order
    /// by one.
    #[must_use]
    pub fn masked(&self, level: usize) -> Self {
        let mut masked = *self;
        let level = level.min(self.order());
        masked.symbols[..level].fill(0);
        masked
    }

    /// Drop the oldest symbol and append `symbol` as the newest.
    pub fn push(&mut self, symbol: u8) {
        let order = self.order();
        self.symbols.copy_within(1..order, 0);
        self.symbols[order - 1] = symbol;
    }

    /// Newest symbol in the context.
    #[inline]
    pub fn last(&self) -> u8 {
        self.symbols[self.order() - 1]
    }
}

impl fmt::Debug for SymbolContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolContext({:?})", self.as_bytes())
    }
}

impl AsRef<[u8]> for SymbolContext {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_rejects_bad_order() {
        assert!(SymbolContext::zeroed(0).is_err());
        assert!(SymbolContext::zeroed(MAX_ORDER + 1).is_err());
        let context = SymbolContext::zeroed(4).unwrap();
        assert_eq!(context.as_bytes(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_masked_zeroes_oldest_positions() {
        let context = SymbolContext::from_slice(b"abcd").unwrap();
        assert_eq!(context.masked(0).as_bytes(), b"abcd");
        assert_eq!(context.masked(1).as_bytes(), &[0, b'b', b'c', b'd']);
        assert_eq!(context.masked(3).as_bytes(), &[0, 0, 0, b'd']);
        assert_eq!(context.masked(10).as_bytes(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_push_shifts_left() {
        let mut context = SymbolContext::zeroed(3).unwrap();
        context.push(1);
        context.push(2);
        assert_eq!(context.as_bytes(), &[0, 1, 2]);
        context.push(3);
        context.push(4);
        assert_eq!(context.as_bytes(), &[2, 3, 4]);
        assert_eq!(context.last(), 4);
    }

    #[test]
    fn test_window() {
        let context = SymbolContext::window(b"hello world", 6, 4).unwrap();
        assert_eq!(context.as_bytes(), b"worl");
    }

    #[test]
    fn test_equal_bytes_equal_keys() {
        let a = SymbolContext::from_slice(&[7, 0, 0, 0]).unwrap();
        let mut b = SymbolContext::zeroed(4).unwrap();
        b.push(7);
        b.push(0);
        b.push(0);
        b.push(0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_ordering_is_bytewise_within_order() {
        let a = SymbolContext::from_slice(&[0, 9]).unwrap();
        let b = SymbolContext::from_slice(&[1, 0]).unwrap();
        assert!(a < b);
    }
}
