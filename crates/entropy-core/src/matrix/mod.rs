//! Dense row-major matrices and the vector operations used for scoring.
//!
//! Every operation returns a new matrix. Shape mismatches are configuration
//! errors (e.g. a width disagreement between the store and the scorer) and
//! panic with a `[MATRIX]` message rather than returning `Result`.
//!
//! # Shape convention
//!
//! `a.mul(&b)` requires `a.cols() == b.cols()` and yields a matrix with
//! `cols = a.rows()` and `rows = b.rows()`: entry `(row r, col c)` is the dot
//! product of row `r` of `b` with row `c` of `a`. `w.mul(&w)` is therefore
//! the Gram matrix of the rows of `w`.

pub mod complex;

#[cfg(test)]
mod tests;

pub use complex::ComplexMatrix;

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// A rectangular `f64` buffer stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    cols: usize,
    rows: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// An all-zero matrix.
    pub fn zeros(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            data: vec![0.0; cols * rows],
        }
    }

    /// Stack equal-length rows.
    ///
    /// # Panics
    /// Panics if any row length differs from `cols`.
    pub fn from_rows<R: AsRef<[f64]>>(cols: usize, rows: &[R]) -> Self {
        let mut data = Vec::with_capacity(cols * rows.len());
        for row in rows {
            let row = row.as_ref();
            assert_eq!(
                row.len(),
                cols,
                "[MATRIX] row length {} does not match {} columns",
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

    /// He-initialised random matrix: `N(0, 1) * sqrt(2 / cols)`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, cols: usize, rows: usize) -> Self {
        let factor = (2.0 / cols as f64).sqrt();
        let data = (0..cols * rows)
            .map(|_| {
                let sample: f64 = StandardNormal.sample(rng);
                sample * factor
            })
            .collect();
        Self { cols, rows, data }
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
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    /// Row `index` as a slice.
    #[inline]
    pub fn row(&self, index: usize) -> &[f64] {
        &self.data[index * self.cols..(index + 1) * self.cols]
    }

    /// Entry at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Pairwise row dot products, see the module docs for the shape rule.
    ///
    /// # Panics
    /// Panics if the column counts differ.
    pub fn mul(&self, other: &Matrix) -> Matrix {
        assert_eq!(
            self.cols, other.cols,
            "[MATRIX] mul column mismatch: {} != {}",
            self.cols, other.cols
        );
        let mut data = Vec::with_capacity(self.rows * other.rows);
        for n in other.data.chunks_exact(other.cols.max(1)) {
            for m in self.data.chunks_exact(self.cols.max(1)) {
                data.push(dot(m, n));
            }
        }
        Matrix {
            cols: self.rows,
            rows: other.rows,
            data,
        }
    }

    /// Row-wise softmax.
    pub fn softmax(&self) -> Matrix {
        self.map_rows(softmax_in_place)
    }

    /// Scale each row to unit L2 norm. All-zero rows are left unchanged.
    pub fn normalize(&self) -> Matrix {
        self.map_rows(normalize_in_place)
    }

    fn map_rows(&self, f: fn(&mut [f64])) -> Matrix {
        let mut out = self.clone();
        if self.cols > 0 {
            for row in out.data.chunks_exact_mut(self.cols) {
                f(row);
            }
        }
        out
    }

    /// Shannon entropy (natural log) of each row, as a single-row matrix with
    /// one column per input row.
    pub fn entropy(&self) -> Matrix {
        let data: Vec<f64> = if self.cols == 0 {
            vec![0.0; self.rows]
        } else {
            self.data.chunks_exact(self.cols).map(shannon).collect()
        };
        Matrix {
            cols: self.rows,
            rows: 1,
            data,
        }
    }

    /// Transpose.
    pub fn transpose(&self) -> Matrix {
        let mut data = Vec::with_capacity(self.data.len());
        for i in 0..self.cols {
            for j in 0..self.rows {
                data.push(self.data[j * self.cols + i]);
            }
        }
        Matrix {
            cols: self.rows,
            rows: self.cols,
            data,
        }
    }
}

/// Dot product of two equal-length slices.
#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Softmax with a max shift for stability.
pub fn softmax_in_place(values: &mut [f64]) {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return;
    }
    let mut sum = 0.0;
    for v in values.iter_mut() {
        *v = (*v - max).exp();
        sum += *v;
    }
    for v in values.iter_mut() {
        *v /= sum;
    }
}

/// `x ↦ (x²/2 + x + 1) / Σ`. The numerator is always at least 1/2, so the
/// sum is only zero for an empty slice.
pub fn spherical_in_place(values: &mut [f64]) {
    let mut sum = 0.0;
    for v in values.iter_mut() {
        *v = *v * *v / 2.0 + *v + 1.0;
        sum += *v;
    }
    if sum == 0.0 {
        sum = 1.0;
    }
    for v in values.iter_mut() {
        *v /= sum;
    }
}

/// Unit L2 norm; a zero-length vector uses length 1.
pub fn normalize_in_place(values: &mut [f64]) {
    let sum: f64 = values.iter().map(|v| v * v).sum();
    let length = if sum == 0.0 { 1.0 } else { sum.sqrt() };
    for v in values.iter_mut() {
        *v /= length;
    }
}

/// `−Σ p·ln p`, treating `p = 0` as contributing nothing.
pub fn shannon(distribution: &[f64]) -> f64 {
    -distribution
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| p * p.ln())
        .sum::<f64>()
}
