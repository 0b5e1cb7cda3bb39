//! Self-entropy kernels.
//!
//! The attention-like kernel scores a stack of unit vectors against itself:
//! each key row is dotted with every query row, the scores are normalized into
//! weights over the value rows, the weighted values are normalized again and
//! the Shannon entropy of that distribution is accumulated, weighted by the
//! row's importance.

use num_complex::Complex64;

use crate::config::Normalization;
use crate::matrix::{
    complex::{complex_shannon, complex_spherical_in_place},
    dot, shannon, softmax_in_place, spherical_in_place, ComplexMatrix, Matrix,
};

/// Aggregate self-entropy of `q`, `k`, `v` weighted by `importance`.
///
/// Returns `Σ_i entropy_i × importance[i]` over the rows of `k`, where
/// `entropy_i = −Σ p·ln p` and `p` is the doubly normalized projection of
/// row `i`.
///
/// # Panics
/// Panics if `q` and `k` differ in width, `v` and `q` differ in row count, or
/// `importance` is shorter than `k.rows()`.
pub fn self_entropy_kernel(
    q: &Matrix,
    k: &Matrix,
    v: &Matrix,
    importance: &[f64],
    normalization: Normalization,
) -> f64 {
    assert_eq!(
        q.cols(),
        k.cols(),
        "[KERNEL] query width {} != key width {}",
        q.cols(),
        k.cols()
    );
    assert_eq!(
        v.rows(),
        q.rows(),
        "[KERNEL] value rows {} != query rows {}",
        v.rows(),
        q.rows()
    );
    assert!(
        importance.len() >= k.rows(),
        "[KERNEL] importance has {} entries for {} key rows",
        importance.len(),
        k.rows()
    );

    let normalize: fn(&mut [f64]) = match normalization {
        Normalization::Softmax => softmax_in_place,
        Normalization::Spherical => spherical_in_place,
    };

    let mut scores = vec![0.0; q.rows()];
    let mut projected = vec![0.0; v.cols()];
    let mut total = 0.0;
    for i in 0..k.rows() {
        let key = k.row(i);
        for (j, score) in scores.iter_mut().enumerate() {
            *score = dot(key, q.row(j));
        }
        normalize(&mut scores);

        for (c, out) in projected.iter_mut().enumerate() {
            *out = scores
                .iter()
                .enumerate()
                .map(|(r, w)| w * v.get(r, c))
                .sum();
        }
        normalize(&mut projected);

        total += shannon(&projected) * importance[i];
    }
    total
}

/// Unweighted per-row entropy of `Softmax(Wᵀ · Softmax(W · W))`.
pub fn direct_entropy(weights: &Matrix) -> Vec<f64> {
    let l1 = weights.mul(weights).softmax();
    let l2 = weights.transpose().mul(&l1).softmax();
    l2.entropy().into_data()
}

/// Complex counterpart of [`self_entropy_kernel`] using `x²/Σx²`
/// normalization. The score is the real part of the accumulated entropy.
pub fn complex_self_entropy_kernel(
    q: &ComplexMatrix,
    k: &ComplexMatrix,
    v: &ComplexMatrix,
    importance: &[f64],
) -> f64 {
    assert_eq!(
        q.cols(),
        k.cols(),
        "[KERNEL] complex query width {} != key width {}",
        q.cols(),
        k.cols()
    );
    assert_eq!(
        v.rows(),
        q.rows(),
        "[KERNEL] complex value rows {} != query rows {}",
        v.rows(),
        q.rows()
    );

    let zero = Complex64::new(0.0, 0.0);
    let mut scores = vec![zero; q.rows()];
    let mut projected = vec![zero; v.cols()];
    let mut total = zero;
    for i in 0..k.rows() {
        let key = k.row(i);
        for (j, score) in scores.iter_mut().enumerate() {
            *score = key.iter().zip(q.row(j)).map(|(a, b)| a * b).sum();
        }
        complex_spherical_in_place(&mut scores);

        for (c, out) in projected.iter_mut().enumerate() {
            *out = scores
                .iter()
                .enumerate()
                .map(|(r, w)| w * v.row(r)[c])
                .sum();
        }
        complex_spherical_in_place(&mut projected);

        total += complex_shannon(&projected) * importance[i];
    }
    total.re
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identical(width: usize, positions: usize) -> Matrix {
        let mut row = vec![0.0; width];
        row[0] = 1.0;
        Matrix::from_rows(width, &vec![row; positions])
    }

    fn orthogonal(width: usize, positions: usize) -> Matrix {
        let rows: Vec<Vec<f64>> = (0..positions)
            .map(|i| {
                let mut row = vec![0.0; width];
                row[i] = 1.0;
                row
            })
            .collect();
        Matrix::from_rows(width, &rows)
    }

    #[test]
    fn test_identical_context_has_lower_entropy_softmax() {
        println!("=== TEST: identical vs orthogonal (softmax) ===");
        let importance = [1.0; 3];
        let same = identical(4, 3);
        let diff = orthogonal(4, 3);

        let low = self_entropy_kernel(&same, &same, &same, &importance, Normalization::Softmax);
        let high = self_entropy_kernel(&diff, &diff, &diff, &importance, Normalization::Softmax);
        println!("identical={:.6} orthogonal={:.6}", low, high);

        assert!(low < high);
        assert!(low > 0.0);
    }

    #[test]
    fn test_identical_context_has_lower_entropy_spherical() {
        let importance = [1.0; 3];
        let same = identical(4, 3);
        let diff = orthogonal(4, 3);

        let low = self_entropy_kernel(&same, &same, &same, &importance, Normalization::Spherical);
        let high =
            self_entropy_kernel(&diff, &diff, &diff, &importance, Normalization::Spherical);

        assert!(low < high, "identical={} orthogonal={}", low, high);
    }

    #[test]
    fn test_importance_scales_contribution() {
        let w = orthogonal(4, 3);
        let unit = self_entropy_kernel(&w, &w, &w, &[1.0; 3], Normalization::Softmax);
        let half = self_entropy_kernel(&w, &w, &w, &[0.5; 3], Normalization::Softmax);
        assert!((unit - 2.0 * half).abs() < 1e-12);
    }

    #[test]
    fn test_zero_vectors_do_not_produce_nan() {
        let w = Matrix::zeros(4, 3);
        let score = self_entropy_kernel(&w, &w, &w, &[1.0; 3], Normalization::Softmax);
        assert!(score.is_finite());
        let uniform = (4.0f64).ln() * 3.0;
        assert!((score - uniform).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "[KERNEL]")]
    fn test_width_mismatch_panics() {
        let q = Matrix::zeros(4, 2);
        let k = Matrix::zeros(8, 2);
        self_entropy_kernel(&q, &k, &q, &[1.0; 2], Normalization::Softmax);
    }

    #[test]
    fn test_direct_entropy_per_row() {
        let w = orthogonal(4, 3);
        let per_row = direct_entropy(&w);
        assert_eq!(per_row.len(), 3);
        assert!(per_row.iter().all(|e| e.is_finite() && *e > 0.0));
        // Orthogonal rows are symmetric under permutation.
        assert!((per_row[0] - per_row[1]).abs() < 1e-12);
        assert!((per_row[1] - per_row[2]).abs() < 1e-12);
    }

    #[test]
    fn test_complex_kernel_is_finite() {
        let rows: Vec<Vec<Complex64>> = (0..3)
            .map(|i| {
                (0..4)
                    .map(|c| Complex64::new((i + c) as f64 * 0.25 + 0.1, 0.05 * c as f64))
                    .collect()
            })
            .collect();
        let w = ComplexMatrix::from_rows(4, &rows).normalize();
        let score = complex_self_entropy_kernel(&w, &w, &w, &[1.0; 3]);
        assert!(score.is_finite());
    }
}
