//! Fixed-size 2x2 linear algebra used by the filter.
//!
//! The filter state is exactly (latitude, longitude), so every matrix in the
//! recursion is 2x2 and every vector has length 2. Shapes are enforced by the
//! types; there is no runtime shape checking.

use crate::{Error, Result};

/// 2x2 matrix of `f64` (row, column indexing).
pub type Matrix2 = nalgebra::Matrix2<f64>;

/// Length-2 column vector of `f64`.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Build a matrix from its rows.
#[inline]
pub fn matrix(a: f64, b: f64, c: f64, d: f64) -> Matrix2 {
    Matrix2::new(a, b, c, d)
}

/// Build a diagonal matrix.
#[inline]
pub fn diag(a: f64, d: f64) -> Matrix2 {
    Matrix2::new(a, 0.0, 0.0, d)
}

/// The 2x2 identity.
#[inline]
pub fn identity() -> Matrix2 {
    Matrix2::identity()
}

#[inline]
pub fn add(a: &Matrix2, b: &Matrix2) -> Matrix2 {
    a + b
}

#[inline]
pub fn subtract(a: &Matrix2, b: &Matrix2) -> Matrix2 {
    a - b
}

#[inline]
pub fn multiply(a: &Matrix2, b: &Matrix2) -> Matrix2 {
    a * b
}

#[inline]
pub fn multiply_vector(a: &Matrix2, v: &Vector2) -> Vector2 {
    a * v
}

#[inline]
pub fn transpose(a: &Matrix2) -> Matrix2 {
    a.transpose()
}

/// Determinant `ad - bc`.
#[inline]
pub fn determinant(a: &Matrix2) -> f64 {
    a[(0, 0)] * a[(1, 1)] - a[(0, 1)] * a[(1, 0)]
}

/// Invert a 2x2 matrix via its adjugate.
///
/// Only an exactly-zero determinant is treated as singular; tiny but non-zero
/// determinants are inverted as-is.
///
/// # Errors
/// `Error::SingularMatrix` when the determinant is `0.0`.
pub fn invert(a: &Matrix2) -> Result<Matrix2> {
    let det = determinant(a);
    if det == 0.0 {
        return Err(Error::SingularMatrix {
            context: format!("determinant is zero for {:?}", a.as_slice()),
        });
    }

    Ok(Matrix2::new(
        a[(1, 1)] / det,
        -a[(0, 1)] / det,
        -a[(1, 0)] / det,
        a[(0, 0)] / det,
    ))
}
