//! Eigenvalues by power iteration with deflation, eigenspaces and diagonalization.
//!
//! Triangular matrices have their eigenvalues read off the diagonal and are exact. Every
//! other matrix goes through power iteration, which is an approximation with no correctness
//! guarantee: it converges toward the dominant eigenvalue at the rate of the ratio between
//! the two largest magnitudes, so it is reliable only for well separated eigenvalues. The
//! deflation step shifts by the eigenvalues found so far and can return a repeated value
//! instead of a missing one once three or more eigenvalues are involved. Diagonalization
//! inherits these limits: an eigenvalue that is not exactly right has an empty exact
//! eigenspace and the matrix is reported as not diagonalizable.

use log::{debug, warn};
use quotient_scalar::{Complex, Rational, Zero};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::basis::unique_vectors;
use crate::error::{LinalgError, Result};
use crate::matrix::Matrix;
use crate::vector::Vector;

/// Parameters of power iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerIterationParams {
    /// Matrix-vector products per eigenvalue.
    pub iterations: usize,
    /// Decimals kept in the iterate after each renormalization, bounding the size of the
    /// exact rationals.
    pub precision_digits: u32,
    /// Decimals kept in each eigenvalue, so that values which converged to a short decimal
    /// come out exact.
    pub eigenvalue_digits: u32,
    /// Fresh random starts allowed when the iterate collapses to zero.
    pub max_restarts: usize,
    /// Seed for the random start vectors, entropy from the OS when `None`.
    pub random_seed: Option<u64>,
}

impl Default for PowerIterationParams {
    fn default() -> Self {
        Self {
            iterations: 50,
            precision_digits: 30,
            eigenvalue_digits: 12,
            max_restarts: 3,
            random_seed: None,
        }
    }
}

/// One eigenvalue with a basis of its eigenspace.
#[derive(Debug, Clone, PartialEq)]
pub struct Eigenspace {
    /// The eigenvalue `λ`.
    pub eigenvalue: Complex,
    /// A basis of the null space of `λI - A`.
    pub basis: Vec<Vector>,
}

/// `A = P · D · P⁻¹` with `D` diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagonalization {
    /// Eigenvectors as columns.
    pub p: Matrix,
    /// Eigenvalues on the diagonal, `P⁻¹ · A · P`.
    pub d: Matrix,
    /// The inverse of `p`.
    pub p_inv: Matrix,
}

/// All `n` eigenvalues of a square matrix, in diagonal order for triangular input and in
/// order of discovery otherwise.
pub fn eigenvalues(matrix: &Matrix, params: &PowerIterationParams) -> Result<Vec<Complex>> {
    if !matrix.is_square() {
        return Err(LinalgError::NotSquare {
            rows: matrix.nrows(),
            cols: matrix.ncols(),
        });
    }
    if matrix.triangularity().is_triangular() {
        return Ok(matrix.diagonal());
    }

    let mut rng = match params.random_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    deflate(matrix, Vec::with_capacity(matrix.nrows()), &mut rng, params)
}

/// Find the dominant eigenvalue of `shifted`, undo the shift, subtract it and recurse.
///
/// `shifted` is the input minus the sum of `found` times the identity.
fn deflate(
    shifted: &Matrix,
    mut found: Vec<Complex>,
    rng: &mut StdRng,
    params: &PowerIterationParams,
) -> Result<Vec<Complex>> {
    let n = shifted.nrows();
    if found.len() == n {
        return Ok(found);
    }

    let shift: Complex = found.iter().sum();
    let dominant = dominant_eigenvalue(shifted, rng, params)?;
    let eigenvalue = (dominant + &shift).round_to(params.eigenvalue_digits);
    debug!(
        "power iteration level {}: shift {shift}, eigenvalue {eigenvalue}",
        found.len()
    );

    let next = shifted.checked_sub(&Matrix::scaled_identity(n, &eigenvalue)?)?;
    found.push(eigenvalue);
    deflate(&next, found, rng, params)
}

fn dominant_eigenvalue(
    matrix: &Matrix,
    rng: &mut StdRng,
    params: &PowerIterationParams,
) -> Result<Complex> {
    let n = matrix.nrows();
    'restart: for attempt in 0..=params.max_restarts {
        let mut b = Vector::random(n, rng);
        for _ in 0..params.iterations {
            let product = matrix.mul_vector(&b)?;
            let norm = product.norm()?.round_to(params.precision_digits);
            if norm.is_zero() {
                debug!("power iteration collapsed on attempt {attempt}");
                continue 'restart;
            }
            b = product.div_real(&norm)?.round_to(params.precision_digits);
        }
        let product = matrix.mul_vector(&b)?;
        // read the ratio at the largest coordinate of b, smaller ones may have rounded to zero
        let Some(k) = (0..n).max_by(|&i, &j| b[i].sqr_mag().cmp(&b[j].sqr_mag())) else {
            break;
        };
        if product.is_zero() || b[k].is_zero() {
            continue;
        }
        return Ok(product[k].checked_div(&b[k])?);
    }
    warn!(
        "power iteration vanished after {} restarts, using a zero eigenvalue",
        params.max_restarts
    );
    Ok(Complex::zero())
}

impl Matrix {
    /// All eigenvalues with default [`PowerIterationParams`], computed once.
    ///
    /// Exact for triangular matrices, approximate otherwise; see the [module
    /// docs](crate::eigen).
    pub fn eigenvalues(&self) -> Result<Vec<Complex>> {
        self.cached_eigenvalues(|| eigenvalues(self, &PowerIterationParams::default()))
            .clone()
    }

    /// All eigenvalues with explicit parameters. Not cached.
    pub fn eigenvalues_with(&self, params: &PowerIterationParams) -> Result<Vec<Complex>> {
        eigenvalues(self, params)
    }

    /// The eigenspace of each eigenvalue, the null space of `λI - A`.
    pub fn eigenspace_bases(&self) -> Result<Vec<Eigenspace>> {
        self.eigenspaces_of(self.eigenvalues()?)
    }

    fn eigenspaces_of(&self, eigenvalues: Vec<Complex>) -> Result<Vec<Eigenspace>> {
        eigenvalues
            .into_iter()
            .map(|eigenvalue| {
                let shifted =
                    Matrix::scaled_identity(self.nrows(), &eigenvalue)?.checked_sub(self)?;
                Ok(Eigenspace {
                    basis: shifted.null_space_basis(),
                    eigenvalue,
                })
            })
            .collect()
    }

    /// Diagonalize with default [`PowerIterationParams`].
    ///
    /// # Errors
    ///
    /// [`LinalgError::NotDiagonalizable`] when the eigenspaces do not contain `n`
    /// independent vectors.
    pub fn diagonalize(&self) -> Result<Diagonalization> {
        self.diagonalize_from(self.eigenvalues()?)
    }

    /// Diagonalize with explicit parameters.
    pub fn diagonalize_with(&self, params: &PowerIterationParams) -> Result<Diagonalization> {
        self.diagonalize_from(self.eigenvalues_with(params)?)
    }

    fn diagonalize_from(&self, eigenvalues: Vec<Complex>) -> Result<Diagonalization> {
        let n = self.nrows();
        let vectors = unique_vectors(
            self.eigenspaces_of(eigenvalues)?
                .into_iter()
                .flat_map(|space| space.basis),
        );
        if vectors.len() != n {
            debug!("found {} eigenvectors for a {n}x{n} matrix", vectors.len());
            return Err(LinalgError::NotDiagonalizable {
                found: vectors.len(),
                required: n,
            });
        }

        let p = Matrix::new(vectors)?;
        let Some(p_inv) = p.inverse().cloned() else {
            debug!("eigenvectors of a {n}x{n} matrix are dependent");
            return Err(LinalgError::NotDiagonalizable {
                found: p.rank(),
                required: n,
            });
        };
        let d = p_inv.matmul(self)?.matmul(&p)?;
        Ok(Diagonalization { p, d, p_inv })
    }

    /// Exact integer power by repeated squaring, through the inverse for negative exponents.
    pub fn powi(&self, exp: i64) -> Result<Matrix> {
        let n = self.nrows();
        if !self.is_square() {
            return Err(LinalgError::NotSquare {
                rows: n,
                cols: self.ncols(),
            });
        }
        let mut base = if exp < 0 {
            self.try_inverse()?
        } else {
            self.clone()
        };
        let mut remaining = exp.unsigned_abs();
        let mut acc = Matrix::identity(n)?;
        while remaining > 0 {
            if remaining & 1 == 1 {
                acc = acc.matmul(&base)?;
            }
            remaining >>= 1;
            if remaining > 0 {
                base = base.matmul(&base)?;
            }
        }
        Ok(acc)
    }

    /// `A^w` for any complex exponent.
    ///
    /// Real integer exponents use [`Self::powi`] and are exact. Otherwise a diagonal matrix
    /// is raised entry-wise and any other matrix through its diagonalization, `P · Dʷ · P⁻¹`,
    /// with the lossy [`Complex::pow`].
    pub fn pow(&self, w: &Complex) -> Result<Matrix> {
        if w.is_real() && w.re().is_integer() {
            let exp = num_traits::ToPrimitive::to_i64(w.re().numer()).ok_or(
                quotient_scalar::ScalarError::UndefinedPower("exponent too large"),
            )?;
            return self.powi(exp);
        }
        if self.is_diagonal() {
            return diagonal_pow(self, w);
        }
        let Diagonalization { p, d, p_inv } = self.diagonalize()?;
        p.matmul(&diagonal_pow(&d, w)?)?.matmul(&p_inv)
    }

    fn hermitian_eigenvalues(&self) -> Result<Vec<Complex>> {
        if !self.is_hermitian() {
            return Err(LinalgError::NotHermitian);
        }
        self.eigenvalues()
    }

    /// Every eigenvalue is positive.
    pub fn is_positive_definite(&self) -> Result<bool> {
        let zero = Rational::zero();
        Ok(self.hermitian_eigenvalues()?.iter().all(|l| l.re_gt(&zero)))
    }

    /// Every eigenvalue is non-negative.
    pub fn is_positive_semi_definite(&self) -> Result<bool> {
        let zero = Rational::zero();
        Ok(self.hermitian_eigenvalues()?.iter().all(|l| l.re_ge(&zero)))
    }

    /// Every eigenvalue is negative.
    pub fn is_negative_definite(&self) -> Result<bool> {
        let zero = Rational::zero();
        Ok(self.hermitian_eigenvalues()?.iter().all(|l| l.re_lt(&zero)))
    }

    /// Every eigenvalue is non-positive.
    pub fn is_negative_semi_definite(&self) -> Result<bool> {
        let zero = Rational::zero();
        Ok(self.hermitian_eigenvalues()?.iter().all(|l| l.re_le(&zero)))
    }

    /// At least one positive and one negative eigenvalue.
    pub fn is_indefinite(&self) -> Result<bool> {
        let zero = Rational::zero();
        let values = self.hermitian_eigenvalues()?;
        Ok(values.iter().any(|l| l.re_gt(&zero)) && values.iter().any(|l| l.re_lt(&zero)))
    }
}

/// Raise the diagonal entries; the off-diagonal entries are taken to be zero.
fn diagonal_pow(d: &Matrix, w: &Complex) -> Result<Matrix> {
    let diagonal = d
        .diagonal()
        .iter()
        .map(|x| x.pow(w))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Matrix::from_diagonal(&diagonal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn m(rows: &[&str]) -> Result<Matrix> {
        Matrix::from_strings(rows)
    }

    fn seeded(seed: u64) -> PowerIterationParams {
        PowerIterationParams {
            random_seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn triangular_eigenvalues_are_exact() -> Result<()> {
        let d = m(&["2 0 0", "0 3 0", "0 0 5"])?;
        assert_eq!(d.eigenvalues()?, vec![Complex::from(2), Complex::from(3), Complex::from(5)]);
        let u = m(&["1 7", "0 -4"])?;
        assert_eq!(u.eigenvalues()?, vec![Complex::from(1), Complex::from(-4)]);
        Ok(())
    }

    #[test]
    fn symmetric_power_iteration() -> Result<()> {
        let a = m(&["2 1", "1 2"])?;
        let values = a.eigenvalues_with(&seeded(42))?;
        assert_eq!(values.len(), 2);
        assert_abs_diff_eq!(values[0], Complex::from(3), epsilon = 1e-9);
        assert_abs_diff_eq!(values[1], Complex::from(1), epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn dominant_eigenvector_with_zero_coordinate() -> Result<()> {
        // the eigenvector of 9 is (0, 1, 1)
        let a = m(&["1 1 -1", "0 5 4", "0 4 5"])?;
        for seed in 0..8 {
            let values = a.eigenvalues_with(&seeded(seed))?;
            assert_eq!(values.len(), 3);
            assert_abs_diff_eq!(values[0], Complex::from(9), epsilon = 1e-9);
        }
        Ok(())
    }

    #[test]
    fn tridiagonal_four_by_four_converges() -> Result<()> {
        let a = m(&["4 1 0 0", "1 3 1 0", "0 1 2 1", "0 0 1 1"])?;
        let values = a.eigenvalues_with(&seeded(3))?;
        assert_eq!(values.len(), 4);
        // the largest eigenvalue exceeds the largest diagonal entry
        assert!(values[0].re_gt(&Rational::from(4)));
        Ok(())
    }

    #[test]
    fn seeded_runs_repeat() -> Result<()> {
        let a = m(&["4 1", "2 3"])?;
        assert_eq!(a.eigenvalues_with(&seeded(1))?, a.eigenvalues_with(&seeded(1))?);
        Ok(())
    }

    #[test]
    fn nilpotent_falls_back_to_zero() -> Result<()> {
        // a non-triangular nilpotent matrix: every eigenvalue is zero
        let a = m(&["1 1", "-1 -1"])?;
        let values = a.eigenvalues_with(&seeded(3))?;
        assert_eq!(values.len(), 2);
        for v in values {
            assert_abs_diff_eq!(v, Complex::zero(), epsilon = 1e-6);
        }
        Ok(())
    }

    #[test]
    fn non_square_has_no_eigenvalues() -> Result<()> {
        let a = m(&["1 2 3", "4 5 6"])?;
        assert!(matches!(a.eigenvalues(), Err(LinalgError::NotSquare { .. })));
        Ok(())
    }

    #[test]
    fn eigenspaces() -> Result<()> {
        let a = m(&["1 2", "0 3"])?;
        let spaces = a.eigenspace_bases()?;
        assert_eq!(spaces.len(), 2);
        for space in &spaces {
            assert_eq!(space.basis.len(), 1);
            let v = &space.basis[0];
            assert_eq!(a.mul_vector(v)?, v.scale(&space.eigenvalue));
        }
        Ok(())
    }

    #[test]
    fn diagonalize_triangular() -> Result<()> {
        let a = m(&["1 2", "0 3"])?;
        let Diagonalization { p, d, p_inv } = a.diagonalize()?;
        assert!(d.is_diagonal());
        assert_eq!(p.matmul(&d)?.matmul(&p_inv)?, a);
        Ok(())
    }

    #[test]
    fn repeated_eigenvalue_with_full_eigenspace() -> Result<()> {
        let a = m(&["2 0", "0 2"])?;
        let diag = a.diagonalize()?;
        assert_eq!(diag.d, a);
        Ok(())
    }

    #[test]
    fn defective_matrix() -> Result<()> {
        let a = m(&["2 1", "0 2"])?;
        assert_eq!(
            a.diagonalize(),
            Err(LinalgError::NotDiagonalizable {
                found: 1,
                required: 2
            })
        );
        Ok(())
    }

    #[test]
    fn diagonalize_symmetric() -> Result<()> {
        let a = m(&["2 1", "1 2"])?;
        let Diagonalization { p, d, p_inv } = a.diagonalize_with(&seeded(9))?;
        assert!(d.is_diagonal());
        assert_eq!(p.matmul(&d)?.matmul(&p_inv)?, a);
        Ok(())
    }

    #[test]
    fn integer_powers() -> Result<()> {
        let a = m(&["1 1", "1 0"])?;
        assert_eq!(a.powi(10)?, m(&["89 55", "55 34"])?);
        assert_eq!(a.powi(0)?, Matrix::identity(2)?);
        assert_eq!(a.powi(-1)?, a.try_inverse()?);
        assert_eq!(a.pow(&Complex::from(3))?, a.matmul(&a)?.matmul(&a)?);

        let jordan = m(&["2 1", "0 2"])?;
        assert_eq!(jordan.powi(3)?, m(&["8 12", "0 8"])?);
        assert_eq!(m(&["1 2", "2 4"])?.powi(-2), Err(LinalgError::SingularMatrix));
        Ok(())
    }

    #[test]
    fn fractional_powers() -> Result<()> {
        let half = Complex::from_real(Rational::new(1, 2)?);
        let d = m(&["4 0", "0 9"])?;
        assert_abs_diff_eq!(d.pow(&half)?, m(&["2 0", "0 3"])?, epsilon = 1e-12);

        let a = m(&["1 2", "0 3"])?;
        let root = a.pow(&half)?;
        assert_abs_diff_eq!(root.matmul(&root)?, a, epsilon = 1e-9);

        let jordan = m(&["2 1", "0 2"])?;
        assert!(matches!(
            jordan.pow(&half),
            Err(LinalgError::NotDiagonalizable { .. })
        ));
        Ok(())
    }

    #[test]
    fn definiteness() -> Result<()> {
        let pd = m(&["2 1", "1 2"])?;
        assert!(pd.is_positive_definite()?);
        assert!(pd.is_positive_semi_definite()?);
        assert!(!pd.is_indefinite()?);

        let saddle = m(&["1 0", "0 -1"])?;
        assert!(saddle.is_indefinite()?);
        assert!(!saddle.is_positive_semi_definite()?);

        let nsd = m(&["0 0", "0 -3"])?;
        assert!(nsd.is_negative_semi_definite()?);
        assert!(!nsd.is_negative_definite()?);

        let hermitian = m(&["2 i1", "-i1 2"])?;
        assert!(hermitian.is_positive_definite()?);

        assert_eq!(m(&["1 2", "3 4"])?.is_positive_definite(), Err(LinalgError::NotHermitian));
        Ok(())
    }
}
