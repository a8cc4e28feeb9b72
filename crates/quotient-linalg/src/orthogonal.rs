use quotient_scalar::{Complex, Rational, Zero};

use crate::error::{LinalgError, Result};
use crate::matrix::Matrix;
use crate::vector::Vector;

/// `A = Q · R` with orthonormal columns in `Q`.
#[derive(Debug, Clone, PartialEq)]
pub struct QrDecomposition {
    /// Orthonormal columns spanning the column space.
    pub q: Matrix,
    /// Square upper triangular factor, `R[j][i] = ⟨a_i, q_j⟩`.
    pub r: Matrix,
}

/// Classical Gram–Schmidt.
///
/// Each vector has its projections onto the vectors accepted so far removed. Results that
/// reduce to zero are linearly dependent on earlier vectors and are dropped. Exact.
pub fn gram_schmidt(vectors: &[Vector]) -> Result<Vec<Vector>> {
    let mut accepted: Vec<Vector> = Vec::with_capacity(vectors.len());
    for v in vectors {
        let mut w = v.clone();
        for u in &accepted {
            w = w.checked_sub(&v.project_onto(u)?)?;
        }
        if !w.is_zero() {
            accepted.push(w);
        }
    }
    Ok(accepted)
}

/// Gram–Schmidt followed by normalization. Approximate unless every norm is rational.
pub fn gram_schmidt_normalized(vectors: &[Vector]) -> Result<Vec<Vector>> {
    gram_schmidt(vectors)?.iter().map(Vector::unit).collect()
}

/// Whether the vectors are pairwise orthogonal within `tolerance`.
pub fn is_orthogonal_set(vectors: &[Vector], tolerance: &Rational) -> Result<bool> {
    for (i, a) in vectors.iter().enumerate() {
        for b in &vectors[i + 1..] {
            if !a.is_orthogonal(b, tolerance)? {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// Whether the vectors are pairwise orthogonal and of unit length within `tolerance`.
pub fn is_orthonormal_set(vectors: &[Vector], tolerance: &Rational) -> Result<bool> {
    Ok(vectors.iter().all(|v| v.is_unit(tolerance)) && is_orthogonal_set(vectors, tolerance)?)
}

impl Matrix {
    /// QR decomposition through normalized Gram–Schmidt.
    ///
    /// # Errors
    ///
    /// [`LinalgError::NotLinearlyIndependent`] if the columns are dependent.
    pub fn qr(&self) -> Result<QrDecomposition> {
        let q_cols = gram_schmidt_normalized(self.columns())?;
        if q_cols.len() < self.ncols() {
            return Err(LinalgError::NotLinearlyIndependent);
        }

        let n = self.ncols();
        let mut r_grid = vec![vec![Complex::zero(); n]; n];
        for (i, a) in self.columns().iter().enumerate() {
            for (j, q) in q_cols.iter().enumerate().take(i + 1) {
                r_grid[j][i] = a.dot(q)?;
            }
        }

        Ok(QrDecomposition {
            q: Matrix::new(q_cols)?,
            r: Matrix::from_row_grid(r_grid),
        })
    }
}
