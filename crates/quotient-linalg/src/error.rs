use quotient_scalar::ScalarError;

/// Error type for vector and matrix operations.
///
/// Every failure is reported at the point of violation; nothing is coerced into a default
/// value. The approximate algorithms (power iteration, lossy scalar functions) do not fail on
/// imprecision.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LinalgError {
    /// Operands have incompatible shapes.
    ///
    /// # Examples
    /// - dot product of vectors with different lengths
    /// - `A * B` where the columns of `A` differ from the rows of `B`
    /// - cross product outside three dimensions
    #[error("Dimension mismatch: {message}. Expected: {expected}, got: {actual}")]
    DimensionMismatch {
        /// Human-readable description of the mismatch
        message: &'static str,
        /// Expected size
        expected: usize,
        /// Actual size
        actual: usize,
    },

    /// A matrix was built from an empty or ragged set of columns.
    #[error("Invalid construction: {0}")]
    InvalidConstruction(String),

    /// Row, column or coordinate index outside the valid range.
    #[error("Index {index} out of bounds for dimension of size {size}")]
    IndexOutOfBounds {
        /// The invalid index
        index: usize,
        /// Size of the dimension being indexed
        size: usize,
    },

    /// The operation is only defined for square matrices.
    #[error("Matrix must be square, got {rows}x{cols}")]
    NotSquare {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },

    /// The zero vector has no direction.
    #[error("Cannot normalize or compare against the zero vector")]
    ZeroVector,

    /// The matrix has no inverse.
    #[error("Matrix is singular")]
    SingularMatrix,

    /// QR decomposition of linearly dependent columns.
    #[error("Columns are not linearly independent")]
    NotLinearlyIndependent,

    /// The eigenvectors do not span the whole space.
    #[error("Matrix is not diagonalizable: found {found} independent eigenvectors, need {required}")]
    NotDiagonalizable {
        /// Number of independent eigenvectors found
        found: usize,
        /// Matrix dimension
        required: usize,
    },

    /// Definiteness is only defined for Hermitian matrices.
    #[error("Matrix is not Hermitian and has no real quadratic form")]
    NotHermitian,

    /// Scalar arithmetic failed.
    #[error("Scalar error: {0}")]
    Scalar(#[from] ScalarError),
}

/// Result type alias for linear algebra operations.
pub type Result<T> = std::result::Result<T, LinalgError>;

pub(crate) fn check_dims(message: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(LinalgError::DimensionMismatch {
            message,
            expected,
            actual,
        });
    }
    Ok(())
}
