//! Complex-valued matrices for the complex representation.

use num_complex::Complex64;

/// A rectangular `Complex64` buffer stored row-major.
///
/// Follows the same shape rules as [`super::Matrix`]. Products do not
/// conjugate.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexMatrix {
    cols: usize,
    rows: usize,
    data: Vec<Complex64>,
}

impl ComplexMatrix {
    pub fn from_rows<R: AsRef<[Complex64]>>(cols: usize, rows: &[R]) -> Self {
        let mut data = Vec::with_capacity(cols * rows.len());
        for row in rows {
            let row = row.as_ref();
            assert_eq!(
                row.len(),
                cols,
                "[MATRIX] complex row length {} does not match {} columns",
                row.len(),
                cols
            );
            data.extend_from_slice(row);
        }
        Self {
            cols,
            rows: rows.len(),
            data,
        }
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn data(&self) -> &[Complex64] {
        &self.data
    }

    #[inline]
    pub fn row(&self, index: usize) -> &[Complex64] {
        &self.data[index * self.cols..(index + 1) * self.cols]
    }

    /// Row-wise division by `sqrt(Σx²)`.
    pub fn normalize(&self) -> ComplexMatrix {
        let mut out = self.clone();
        if self.cols > 0 {
            for row in out.data.chunks_exact_mut(self.cols) {
                complex_normalize_in_place(row);
            }
        }
        out
    }
}

pub fn complex_spherical_in_place(values: &mut [Complex64]) {
    let mut sum = Complex64::new(0.0, 0.0);
    for v in values.iter_mut() {
        *v = *v * *v;
        sum += *v;
    }
    if sum == Complex64::new(0.0, 0.0) {
        sum = Complex64::new(1.0, 0.0);
    }
    for v in values.iter_mut() {
        *v /= sum;
    }
}

pub fn complex_normalize_in_place(values: &mut [Complex64]) {
    let sum: Complex64 = values.iter().map(|v| v * v).sum();
    let length = if sum == Complex64::new(0.0, 0.0) {
        Complex64::new(1.0, 0.0)
    } else {
        sum.sqrt()
    };
    for v in values.iter_mut() {
        *v /= length;
    }
}

pub fn complex_shannon(values: &[Complex64]) -> Complex64 {
    -values
        .iter()
        .filter(|v| v.norm_sqr() > 0.0)
        .map(|v| v * v.ln())
        .sum::<Complex64>()
}
