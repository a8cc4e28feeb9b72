#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! Vectors and matrices over [`Complex`] rationals. Elimination, determinants, inverses,
//! ranks, bases, QR and equation solving are exact. Eigenvalues of non-triangular matrices
//! come from power iteration and are approximate, see [`eigen`].
//!
//! ```rust
//! use quotient_linalg::{Complex, Matrix};
//!
//! let a = Matrix::from_strings(&["1 3", "2 -4"]).unwrap();
//! assert_eq!(a.determinant().unwrap(), &Complex::from(-10));
//! assert!(a.null_space_basis().is_empty());
//! ```

/// Row, column and null space bases.
pub mod basis;

pub mod eigen;

/// Gauss–Jordan elimination.
pub mod elimination;

/// Error types for vector and matrix operations.
pub mod error;

/// The matrix type and its cached properties.
pub mod matrix;

/// Gram–Schmidt and QR.
pub mod orthogonal;

/// Linear systems and least squares.
pub mod solve;

/// The vector type.
pub mod vector;

pub use basis::{pivot_columns, pivot_rows, spans_same_space, unique_vectors};
pub use eigen::{Diagonalization, Eigenspace, PowerIterationParams};
pub use elimination::{eliminate, Elimination};
pub use error::{LinalgError, Result};
pub use matrix::{Matrix, Triangularity};
pub use orthogonal::{
    gram_schmidt, gram_schmidt_normalized, is_orthogonal_set, is_orthonormal_set, QrDecomposition,
};
pub use solve::{least_squares, solve};
pub use vector::Vector;

pub use quotient_scalar::{Complex, Rational};
