use quotient_scalar::Zero;

use crate::error::Result;
use crate::matrix::Matrix;
use crate::vector::Vector;

/// Indices of the non-zero rows of a reduced matrix.
pub fn pivot_rows(reduced: &Matrix) -> Vec<usize> {
    reduced
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| !row.is_zero())
        .map(|(i, _)| i)
        .collect()
}

/// Column index of the leading entry of each non-zero row of a reduced matrix.
pub fn pivot_columns(reduced: &Matrix) -> Vec<usize> {
    reduced
        .rows()
        .iter()
        .filter_map(|row| row.iter().position(|x| !x.is_zero()))
        .collect()
}

/// Drop exact duplicates, keeping the first occurrence.
pub fn unique_vectors(vectors: impl IntoIterator<Item = Vector>) -> Vec<Vector> {
    let mut unique: Vec<Vector> = Vec::new();
    for v in vectors {
        if !unique.contains(&v) {
            unique.push(v);
        }
    }
    unique
}

/// Whether two sets of vectors span the same subspace.
///
/// The spans agree when the ranks agree and every vector of `b` lies in the span of `a`,
/// which holds when the row operations reducing `a` send `b` to zero on the zero rows.
pub fn spans_same_space(a: &[Vector], b: &[Vector]) -> Result<bool> {
    if a.is_empty() || b.is_empty() {
        return Ok(a.iter().chain(b).all(Vector::is_zero));
    }
    let u = Matrix::new(a.to_vec())?;
    let v = Matrix::new(b.to_vec())?;
    if u.rank() != v.rank() {
        return Ok(false);
    }
    let projected = u.transform().matmul(&v)?;
    let zero_rows = u
        .reduced_form()
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| row.is_zero())
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    Ok(zero_rows
        .into_iter()
        .all(|i| projected.row(i).is_ok_and(|row| row.is_zero())))
}

impl Matrix {
    /// The non-zero rows of the reduced form.
    pub fn row_space_basis(&self) -> Vec<Vector> {
        self.reduced_form()
            .rows()
            .into_iter()
            .filter(|row| !row.is_zero())
            .collect()
    }

    /// The original columns at the pivot columns of the reduced form.
    pub fn column_space_basis(&self) -> Vec<Vector> {
        self.elimination()
            .pivot_columns
            .iter()
            .map(|&c| self.columns()[c].clone())
            .collect()
    }

    /// A basis of `{x : A x = 0}`, empty when the nullity is zero.
    ///
    /// Read off the transpose: a row of its transform that produces a zero row of its
    /// reduced form is orthogonal, without conjugation, to every row of `A`.
    pub fn null_space_basis(&self) -> Vec<Vector> {
        if self.nullity() == 0 {
            return Vec::new();
        }
        let transposed = self.transpose();
        let transform = transposed.transform().rows();
        transposed
            .reduced_form()
            .rows()
            .iter()
            .zip(transform)
            .filter(|(row, _)| row.is_zero())
            .map(|(_, t)| t)
            .collect()
    }
}
