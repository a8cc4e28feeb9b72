use std::fmt;
use std::ops::Index;
use std::sync::OnceLock;

use quotient_scalar::{Complex, One, Rational, Zero};
use rand::Rng;

use crate::elimination::{eliminate, Elimination};
use crate::error::{check_dims, LinalgError, Result};
use crate::vector::Vector;

/// Shape class of a square matrix, computed once and branched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Triangularity {
    /// Only the diagonal may be non-zero.
    Diagonal,
    /// Every entry below the diagonal is zero.
    Upper,
    /// Every entry above the diagonal is zero.
    Lower,
    /// Not triangular, or not square.
    General,
}

impl Triangularity {
    /// Whether the eigenvalues can be read off the diagonal.
    pub fn is_triangular(self) -> bool {
        self != Self::General
    }
}

/// Write-once derived properties.
#[derive(Clone, Default)]
struct Cache {
    elimination: OnceLock<Box<Elimination>>,
    triangularity: OnceLock<Triangularity>,
    symmetric: OnceLock<bool>,
    orthogonal: OnceLock<bool>,
    eigenvalues: OnceLock<Result<Vec<Complex>>>,
}

/// A dense matrix of complex rationals stored as a sequence of columns.
///
/// A matrix is never empty and all its columns have the same length. Values never change
/// after construction; every transform returns a new matrix. Derived properties (the
/// reduced form, determinant, inverse, rank, triangularity and eigenvalues) are computed on
/// first access and cached for the lifetime of the instance.
///
/// # Example
///
/// ```rust
/// use quotient_linalg::{Complex, Matrix};
///
/// let a = Matrix::from_strings(&["2 9 0", "1 3 5", "2 4 7"]).unwrap();
/// assert_eq!(a.determinant().unwrap(), &Complex::from(29));
///
/// let inv = a.inverse().unwrap();
/// assert_eq!(a.matmul(inv).unwrap(), Matrix::identity(3).unwrap());
/// ```
#[derive(Clone)]
pub struct Matrix {
    cols: Vec<Vector>,
    nrows: usize,
    cache: Cache,
}

impl Matrix {
    /// Create a matrix from its columns.
    ///
    /// # Errors
    ///
    /// [`LinalgError::InvalidConstruction`] if there are no columns, the columns are empty,
    /// or the columns differ in length.
    pub fn new(cols: Vec<Vector>) -> Result<Self> {
        let nrows = cols.first().map(Vector::len).unwrap_or(0);
        if nrows == 0 {
            return Err(LinalgError::InvalidConstruction(
                "a matrix needs at least one non-empty column".to_string(),
            ));
        }
        if let Some((j, col)) = cols.iter().enumerate().find(|(_, c)| c.len() != nrows) {
            return Err(LinalgError::InvalidConstruction(format!(
                "column {j} has {} entries, expected {nrows}",
                col.len()
            )));
        }
        Ok(Self::from_columns_unchecked(cols, nrows))
    }

    fn from_columns_unchecked(cols: Vec<Vector>, nrows: usize) -> Self {
        Self {
            cols,
            nrows,
            cache: Cache::default(),
        }
    }

    /// Create a matrix from its rows.
    pub fn from_rows(rows: Vec<Vector>) -> Result<Self> {
        Ok(Self::new(rows)?.transpose())
    }

    /// Build a matrix from a rectangular row-major grid produced inside the crate.
    pub(crate) fn from_row_grid(grid: Vec<Vec<Complex>>) -> Self {
        let nrows = grid.len();
        let ncols = grid.first().map(Vec::len).unwrap_or(0);
        let cols = (0..ncols)
            .map(|c| grid.iter().map(|row| row[c].clone()).collect())
            .collect();
        Self::from_columns_unchecked(cols, nrows)
    }

    pub(crate) fn to_row_grid(&self) -> Vec<Vec<Complex>> {
        (0..self.nrows)
            .map(|r| self.cols.iter().map(|c| c[r].clone()).collect())
            .collect()
    }

    /// Create an `rows x cols` matrix whose entry `(r, c)` is `f(r, c)`.
    pub fn from_fn(
        rows: usize,
        cols: usize,
        mut f: impl FnMut(usize, usize) -> Complex,
    ) -> Result<Self> {
        Self::new(
            (0..cols)
                .map(|c| (0..rows).map(|r| f(r, c)).collect())
                .collect(),
        )
    }

    /// The `n x n` identity.
    pub fn identity(n: usize) -> Result<Self> {
        Self::scaled_identity(n, &Complex::one())
    }

    /// `k` times the `n x n` identity.
    pub fn scaled_identity(n: usize, k: &Complex) -> Result<Self> {
        Self::from_fn(n, n, |r, c| if r == c { k.clone() } else { Complex::zero() })
    }

    /// Create a diagonal matrix.
    pub fn from_diagonal(diagonal: &[Complex]) -> Result<Self> {
        let n = diagonal.len();
        Self::from_fn(n, n, |r, c| {
            if r == c {
                diagonal[r].clone()
            } else {
                Complex::zero()
            }
        })
    }

    /// The zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        Self::from_fn(rows, cols, |_, _| Complex::zero())
    }

    /// A real matrix of random integers in `min..=max`.
    pub fn random_int<R: Rng>(
        rows: usize,
        cols: usize,
        min: i64,
        max: i64,
        rng: &mut R,
    ) -> Result<Self> {
        if min > max {
            return Err(LinalgError::InvalidConstruction(format!(
                "empty range {min}..={max}"
            )));
        }
        Self::from_fn(rows, cols, |_, _| Complex::from(rng.random_range(min..=max)))
    }

    /// Parse one string per row of space-separated scalars, e.g. `["1 -2+i3", "i4 0"]`.
    ///
    /// A scalar is `<real>`, `i<imag>` or `<real>[+-]i<imag>`.
    pub fn from_strings<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let rows = rows
            .iter()
            .map(|row| row.as_ref().parse::<Vector>())
            .collect::<Result<Vec<_>>>()?;
        Self::from_rows(rows)
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.cols.len())
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.cols.len()
    }

    /// Whether rows equal columns.
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols()
    }

    fn require_square(&self) -> Result<usize> {
        if !self.is_square() {
            return Err(LinalgError::NotSquare {
                rows: self.nrows,
                cols: self.ncols(),
            });
        }
        Ok(self.nrows)
    }

    /// Entry at row `r`, column `c`.
    pub fn get(&self, r: usize, c: usize) -> Option<&Complex> {
        self.cols.get(c).and_then(|col| col.get(r))
    }

    /// The columns.
    pub fn columns(&self) -> &[Vector] {
        &self.cols
    }

    /// Column `c`.
    pub fn col(&self, c: usize) -> Result<&Vector> {
        self.cols.get(c).ok_or(LinalgError::IndexOutOfBounds {
            index: c,
            size: self.ncols(),
        })
    }

    /// Row `r` as a vector.
    pub fn row(&self, r: usize) -> Result<Vector> {
        self.check_row(r)?;
        Ok(self.row_unchecked(r))
    }

    fn row_unchecked(&self, r: usize) -> Vector {
        self.cols.iter().map(|c| c[r].clone()).collect()
    }

    /// All rows as vectors.
    pub fn rows(&self) -> Vec<Vector> {
        (0..self.nrows).map(|r| self.row_unchecked(r)).collect()
    }

    /// The main diagonal.
    pub fn diagonal(&self) -> Vec<Complex> {
        (0..self.nrows.min(self.ncols()))
            .map(|i| self.cols[i][i].clone())
            .collect()
    }

    fn check_row(&self, r: usize) -> Result<()> {
        if r >= self.nrows {
            return Err(LinalgError::IndexOutOfBounds {
                index: r,
                size: self.nrows,
            });
        }
        Ok(())
    }

    fn check_col(&self, c: usize) -> Result<()> {
        self.col(c).map(|_| ())
    }

    fn map(&self, mut f: impl FnMut(&Complex) -> Complex) -> Self {
        let cols = self
            .cols
            .iter()
            .map(|col| col.iter().map(&mut f).collect())
            .collect();
        Self::from_columns_unchecked(cols, self.nrows)
    }

    fn map_rows(&self, mut f: impl FnMut(usize, Vector) -> Vector) -> Self {
        let rows = (0..self.nrows)
            .map(|r| f(r, self.row_unchecked(r)))
            .collect();
        Self::from_columns_unchecked(rows, self.ncols()).transpose()
    }

    /// A copy with entry `(r, c)` replaced.
    pub fn set(&self, r: usize, c: usize, value: Complex) -> Result<Self> {
        self.check_row(r)?;
        self.check_col(c)?;
        let mut cols = self.cols.clone();
        cols[c] = cols[c].set(r, value)?;
        Ok(Self::from_columns_unchecked(cols, self.nrows))
    }

    /// A copy with entry `(r, c)` negated.
    pub fn negate_entry(&self, r: usize, c: usize) -> Result<Self> {
        let value = -self.col(c)?.get(r).ok_or(LinalgError::IndexOutOfBounds {
            index: r,
            size: self.nrows,
        })?;
        self.set(r, c, value)
    }

    /// Swap rows `i` and `j`.
    pub fn swap_rows(&self, i: usize, j: usize) -> Result<Self> {
        self.check_row(i)?;
        self.check_row(j)?;
        let mut grid = self.to_row_grid();
        grid.swap(i, j);
        Ok(Self::from_row_grid(grid))
    }

    /// Swap columns `i` and `j`.
    pub fn swap_cols(&self, i: usize, j: usize) -> Result<Self> {
        self.check_col(i)?;
        self.check_col(j)?;
        let mut cols = self.cols.clone();
        cols.swap(i, j);
        Ok(Self::from_columns_unchecked(cols, self.nrows))
    }

    /// Multiply row `i` by `k`.
    pub fn scale_row(&self, i: usize, k: &Complex) -> Result<Self> {
        self.check_row(i)?;
        Ok(self.map_rows(|r, row| if r == i { row.scale(k) } else { row }))
    }

    /// Add row `source` to row `target`.
    pub fn add_row(&self, target: usize, source: usize) -> Result<Self> {
        self.add_scaled_row(target, source, &Complex::one())
    }

    /// Add `k` times row `source` to row `target`.
    pub fn add_scaled_row(&self, target: usize, source: usize, k: &Complex) -> Result<Self> {
        self.check_row(target)?;
        let addend = self.row(source)?.scale(k);
        let mut grid = self.to_row_grid();
        for (x, a) in grid[target].iter_mut().zip(addend.iter()) {
            *x = &*x + a;
        }
        Ok(Self::from_row_grid(grid))
    }

    /// Truncate every entry toward negative infinity at `digits` decimals.
    pub fn truncate(&self, digits: u32) -> Result<Self> {
        let scale = Rational::from(10).powi(i64::from(digits))?;
        let inv = scale.recip()?;
        Ok(self.map(|x| x.scale_real(&scale).floor().scale_real(&inv)))
    }

    /// The transpose.
    pub fn transpose(&self) -> Self {
        Self::from_columns_unchecked(self.rows(), self.ncols())
    }

    /// Entry-wise complex conjugate.
    pub fn conj(&self) -> Self {
        self.map(Complex::conj)
    }

    /// The conjugate transpose.
    pub fn hermitian(&self) -> Self {
        self.transpose().conj()
    }

    /// `self + rhs`.
    pub fn checked_add(&self, rhs: &Self) -> Result<Self> {
        self.check_same_shape(rhs)?;
        let cols = self
            .cols
            .iter()
            .zip(&rhs.cols)
            .map(|(a, b)| a.checked_add(b))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_columns_unchecked(cols, self.nrows))
    }

    /// `self - rhs`.
    pub fn checked_sub(&self, rhs: &Self) -> Result<Self> {
        self.check_same_shape(rhs)?;
        let cols = self
            .cols
            .iter()
            .zip(&rhs.cols)
            .map(|(a, b)| a.checked_sub(b))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_columns_unchecked(cols, self.nrows))
    }

    fn check_same_shape(&self, rhs: &Self) -> Result<()> {
        check_dims("row counts differ", self.nrows, rhs.nrows)?;
        check_dims("column counts differ", self.ncols(), rhs.ncols())
    }

    /// Matrix product `self · rhs`.
    pub fn matmul(&self, rhs: &Self) -> Result<Self> {
        check_dims(
            "left column count must equal right row count",
            self.ncols(),
            rhs.nrows,
        )?;
        let cols = rhs
            .cols
            .iter()
            .map(|c| self.mul_vector(c))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_columns_unchecked(cols, self.nrows))
    }

    /// Matrix-vector product `self · v`.
    pub fn mul_vector(&self, v: &Vector) -> Result<Vector> {
        check_dims(
            "vector length must equal column count",
            self.ncols(),
            v.len(),
        )?;
        Ok((0..self.nrows)
            .map(|r| {
                self.cols
                    .iter()
                    .zip(v.iter())
                    .map(|(c, x)| &c[r] * x)
                    .sum::<Complex>()
            })
            .collect())
    }

    /// Multiply every entry by `k`.
    pub fn scale(&self, k: &Complex) -> Self {
        self.map(|x| x * k)
    }

    /// Multiply every entry by a rational.
    pub fn scale_real(&self, k: &Rational) -> Self {
        self.map(|x| x.scale_real(k))
    }

    /// Sum of the diagonal.
    pub fn trace(&self) -> Result<Complex> {
        self.require_square()?;
        Ok(self.diagonal().into_iter().sum())
    }

    /// The matrix without its first row and first column.
    pub fn submatrix_along_first_entry(&self) -> Result<Self> {
        let cols = self
            .cols
            .iter()
            .skip(1)
            .map(|c| c.iter().skip(1).cloned().collect())
            .collect();
        Self::new(cols)
    }

    /// The Gauss–Jordan reduction of this matrix, computed once.
    pub fn elimination(&self) -> &Elimination {
        self.cache
            .elimination
            .get_or_init(|| Box::new(eliminate(self)))
    }

    /// The reduced row-echelon form.
    pub fn reduced_form(&self) -> &Matrix {
        &self.elimination().reduced_form
    }

    /// The matrix of accumulated row operations, see [`Elimination::transform`].
    pub fn transform(&self) -> &Matrix {
        &self.elimination().transform
    }

    /// The determinant, exact.
    pub fn determinant(&self) -> Result<&Complex> {
        self.require_square()?;
        Ok(&self.elimination().determinant)
    }

    /// Number of non-zero rows in the reduced form.
    pub fn rank(&self) -> usize {
        self.reduced_form()
            .rows()
            .iter()
            .filter(|row| !row.is_zero())
            .count()
    }

    /// Number of columns minus the rank.
    pub fn nullity(&self) -> usize {
        self.ncols() - self.rank()
    }

    /// The inverse, absent for singular or non-square matrices.
    pub fn inverse(&self) -> Option<&Matrix> {
        let e = self.elimination();
        (self.is_square() && !e.determinant.is_zero()).then_some(&e.transform)
    }

    /// The inverse, or an error saying why there is none.
    pub fn try_inverse(&self) -> Result<Matrix> {
        self.require_square()?;
        self.inverse().cloned().ok_or(LinalgError::SingularMatrix)
    }

    /// Whether an inverse exists.
    pub fn is_invertible(&self) -> bool {
        self.inverse().is_some()
    }

    /// `det(A - λI)`.
    pub fn characteristic_polynomial_at(&self, lambda: &Complex) -> Result<Complex> {
        let n = self.require_square()?;
        let shifted = self.checked_sub(&Self::scaled_identity(n, lambda)?)?;
        Ok(shifted.determinant()?.clone())
    }

    /// `(A x) · x`, which is `xᴴ A x` and real for Hermitian `A`.
    pub fn quadratic_form(&self, x: &Vector) -> Result<Complex> {
        self.require_square()?;
        self.mul_vector(x)?.dot(x)
    }

    pub(crate) fn cached_eigenvalues(
        &self,
        compute: impl FnOnce() -> Result<Vec<Complex>>,
    ) -> &Result<Vec<Complex>> {
        self.cache.eigenvalues.get_or_init(compute)
    }

    /// Shape class, computed once. Non-square matrices are [`Triangularity::General`].
    pub fn triangularity(&self) -> Triangularity {
        *self.cache.triangularity.get_or_init(|| self.classify())
    }

    fn classify(&self) -> Triangularity {
        if !self.is_square() {
            return Triangularity::General;
        }
        let (mut upper, mut lower) = (true, true);
        for (c, col) in self.cols.iter().enumerate() {
            for (r, x) in col.iter().enumerate() {
                if x.is_zero() {
                    continue;
                }
                upper &= r <= c;
                lower &= r >= c;
            }
        }
        match (upper, lower) {
            (true, true) => Triangularity::Diagonal,
            (true, false) => Triangularity::Upper,
            (false, true) => Triangularity::Lower,
            (false, false) => Triangularity::General,
        }
    }

    /// Whether every off-diagonal entry is zero.
    pub fn is_diagonal(&self) -> bool {
        self.triangularity() == Triangularity::Diagonal
    }

    /// Whether every entry below the diagonal is zero.
    pub fn is_upper_triangular(&self) -> bool {
        matches!(
            self.triangularity(),
            Triangularity::Upper | Triangularity::Diagonal
        )
    }

    /// Whether every entry above the diagonal is zero.
    pub fn is_lower_triangular(&self) -> bool {
        matches!(
            self.triangularity(),
            Triangularity::Lower | Triangularity::Diagonal
        )
    }

    /// `A == Aᵀ`.
    pub fn is_symmetric(&self) -> bool {
        *self
            .cache
            .symmetric
            .get_or_init(|| self.is_square() && *self == self.transpose())
    }

    /// `A == Aᴴ`.
    pub fn is_hermitian(&self) -> bool {
        self.is_square() && *self == self.hermitian()
    }

    /// Whether the inverse exists and equals the transpose.
    pub fn is_orthogonal(&self) -> bool {
        *self
            .cache
            .orthogonal
            .get_or_init(|| self.inverse().is_some_and(|inv| *inv == self.transpose()))
    }

    /// Entry-wise comparison within `tolerance`.
    pub fn approx_eq(&self, rhs: &Self, tolerance: &Rational) -> Result<bool> {
        self.check_same_shape(rhs)?;
        for (a, b) in self.cols.iter().zip(&rhs.cols) {
            if !a.approx_eq(b, tolerance)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Round every entry to `digits` decimals.
    pub fn round_to(&self, digits: u32) -> Self {
        self.map(|x| x.round_to(digits))
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("nrows", &self.nrows)
            .field("cols", &self.cols)
            .finish()
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.nrows == other.nrows && self.cols == other.cols
    }
}

impl Eq for Matrix {}

impl Index<(usize, usize)> for Matrix {
    type Output = Complex;

    /// Entry at `(row, col)`.
    fn index(&self, (r, c): (usize, usize)) -> &Self::Output {
        &self.cols[c][r]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.nrows {
            writeln!(f, "{}", self.row_unchecked(r))?;
        }
        Ok(())
    }
}

impl approx::AbsDiffEq for Matrix {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        <f64 as approx::AbsDiffEq>::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.shape() == other.shape()
            && self
                .cols
                .iter()
                .zip(&other.cols)
                .all(|(a, b)| approx::AbsDiffEq::abs_diff_eq(a, b, epsilon))
    }
}
