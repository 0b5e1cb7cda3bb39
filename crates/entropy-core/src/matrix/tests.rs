use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::*;

// =============================================================================
// Shape
// =============================================================================

#[test]
fn test_mul_shape_and_values() {
    // a: 2 rows of width 3, b: 1 row of width 3
    let a = Matrix::from_rows(3, &[[1.0, 0.0, 0.0], [0.0, 2.0, 0.0]]);
    let b = Matrix::from_rows(3, &[[3.0, 4.0, 5.0]]);

    let out = a.mul(&b);
    assert_eq!(out.cols(), 2);
    assert_eq!(out.rows(), 1);
    assert_eq!(out.data(), &[3.0, 8.0]);
}

#[test]
fn test_gram_matrix_is_symmetric() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let w = Matrix::random(&mut rng, 8, 5);
    let gram = w.mul(&w);
    assert_eq!((gram.cols(), gram.rows()), (5, 5));
    for r in 0..5 {
        for c in 0..5 {
            assert!((gram.get(r, c) - gram.get(c, r)).abs() < 1e-12);
        }
    }
}

#[test]
#[should_panic(expected = "[MATRIX] mul column mismatch")]
fn test_mul_mismatch_panics() {
    let a = Matrix::zeros(3, 2);
    let b = Matrix::zeros(4, 2);
    a.mul(&b);
}

#[test]
fn test_transpose() {
    let m = Matrix::from_rows(3, &[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    let t = m.transpose();
    assert_eq!((t.cols(), t.rows()), (2, 3));
    assert_eq!(t.data(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    assert_eq!(t.transpose(), m);
}

// =============================================================================
// Normalization
// =============================================================================

#[test]
fn test_softmax_rows_sum_to_one() {
    let m = Matrix::from_rows(3, &[[1.0, 2.0, 3.0], [1000.0, 1000.0, 1000.0]]);
    let s = m.softmax();
    for r in 0..2 {
        let sum: f64 = s.row(r).iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }
    assert!(s.row(0)[2] > s.row(0)[1]);
    assert!((s.row(1)[0] - 1.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_normalize_zero_row_uses_unit_length() {
    let m = Matrix::from_rows(2, &[[3.0, 4.0], [0.0, 0.0]]);
    let n = m.normalize();
    assert_eq!(n.row(0), &[0.6, 0.8]);
    assert_eq!(n.row(1), &[0.0, 0.0]);
}

#[test]
fn test_entropy_per_row() {
    let m = Matrix::from_rows(2, &[[0.5, 0.5], [1.0, 0.0]]);
    let e = m.entropy();
    assert_eq!((e.cols(), e.rows()), (2, 1));
    assert!((e.data()[0] - std::f64::consts::LN_2).abs() < 1e-12);
    assert_eq!(e.data()[1], 0.0);
}

#[test]
fn test_random_is_seeded() {
    let a = Matrix::random(&mut ChaCha8Rng::seed_from_u64(3), 16, 4);
    let b = Matrix::random(&mut ChaCha8Rng::seed_from_u64(3), 16, 4);
    assert_eq!(a, b);
}

// =============================================================================
// Complex
// =============================================================================

#[test]
fn test_spherical_in_place() {
    let mut row = [0.0, 1.0];
    spherical_in_place(&mut row);
    // f(0) = 1, f(1) = 2.5
    assert!((row[0] - 1.0 / 3.5).abs() < 1e-12);
    assert!((row[1] - 2.5 / 3.5).abs() < 1e-12);
}

#[test]
fn test_entropy_of_transposed_product() {
    let w = Matrix::from_rows(2, &[[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]);
    let l1 = w.mul(&w).softmax();
    let l2 = w.transpose().mul(&l1).softmax();
    let e = l2.entropy();
    assert_eq!((e.cols(), e.rows()), (3, 1));
    for r in 0..l2.rows() {
        assert!((e.data()[r] - shannon(l2.row(r))).abs() < 1e-12);
    }
}

// =============================================================================
// Complex
// =============================================================================

#[test]
fn test_complex_spherical_rows_sum_to_one() {
    use num_complex::Complex64;
    let mut row = [Complex64::new(1.0, 1.0), Complex64::new(0.5, -0.25)];
    complex::complex_spherical_in_place(&mut row);
    let sum: Complex64 = row.iter().sum();
    assert!((sum - Complex64::new(1.0, 0.0)).norm() < 1e-12);
}

#[test]
fn test_complex_normalize_matches_real_on_real_input() {
    use num_complex::Complex64;
    let real = Matrix::from_rows(2, &[[3.0, 4.0], [0.0, 0.0]]).normalize();
    let complex = ComplexMatrix::from_rows(
        2,
        &[
            [Complex64::new(3.0, 0.0), Complex64::new(4.0, 0.0)],
            [Complex64::new(0.0, 0.0), Complex64::new(0.0, 0.0)],
        ],
    )
    .normalize();
    for (a, b) in real.data().iter().zip(complex.data()) {
        assert!((a - b.re).abs() < 1e-12);
        assert_eq!(b.im, 0.0);
    }
}

#[test]
fn test_complex_shannon_of_real_distribution() {
    use num_complex::Complex64;
    let p = [Complex64::new(0.5, 0.0), Complex64::new(0.5, 0.0), Complex64::new(0.0, 0.0)];
    let h = complex::complex_shannon(&p);
    assert!((h.re - std::f64::consts::LN_2).abs() < 1e-12);
    assert!(h.im.abs() < 1e-12);
}
