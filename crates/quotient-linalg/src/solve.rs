use crate::error::{check_dims, LinalgError, Result};
use crate::matrix::Matrix;
use crate::vector::Vector;

/// Solve `A · X = B` exactly by reducing the augmented matrix `[A | B]`.
///
/// # Errors
///
/// - [`LinalgError::NotSquare`] if `A` is not square.
/// - [`LinalgError::DimensionMismatch`] if `B` has a different number of rows.
/// - [`LinalgError::SingularMatrix`] if the left block does not reduce to the identity.
///
/// # Example
///
/// ```rust
/// use quotient_linalg::{solve, Matrix};
///
/// let a = Matrix::from_strings(&["2 1", "1 3"]).unwrap();
/// let b = Matrix::from_strings(&["3", "5"]).unwrap();
/// let x = solve(&a, &b).unwrap();
/// assert_eq!(x, Matrix::from_strings(&["4/5", "7/5"]).unwrap());
/// ```
pub fn solve(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    let (rows, cols) = a.shape();
    if rows != cols {
        return Err(LinalgError::NotSquare { rows, cols });
    }
    check_dims("right-hand side must have one row per equation", rows, b.nrows())?;

    let augmented = Matrix::new(a.columns().iter().chain(b.columns()).cloned().collect())?;
    let reduced = augmented.reduced_form();
    let (left, right) = reduced.columns().split_at(cols);
    if Matrix::new(left.to_vec())? != Matrix::identity(rows)? {
        return Err(LinalgError::SingularMatrix);
    }
    Matrix::new(right.to_vec())
}

/// The `x` minimizing `|A x - b|`, from the normal equations `(Aᴴ A)⁻¹ Aᴴ b`.
///
/// # Errors
///
/// [`LinalgError::SingularMatrix`] if the columns of `A` are dependent.
pub fn least_squares(a: &Matrix, b: &Vector) -> Result<Vector> {
    check_dims("right-hand side must have one entry per row", a.nrows(), b.len())?;
    let ah = a.hermitian();
    let normal = ah.matmul(a)?;
    normal.try_inverse()?.matmul(&ah)?.mul_vector(b)
}
