use log::trace;
use quotient_scalar::{Complex, One, Zero};

use crate::matrix::Matrix;

/// Output of Gauss–Jordan reduction.
#[derive(Debug, Clone, PartialEq)]
pub struct Elimination {
    /// The reduced row-echelon form.
    pub reduced_form: Matrix,
    /// The product of every row operation, so that `transform · A == reduced_form`.
    ///
    /// Equal to the inverse when the input is invertible.
    pub transform: Matrix,
    /// The determinant for square inputs, zero for non-square inputs.
    pub determinant: Complex,
    /// Number of row swaps performed.
    pub swaps: usize,
    /// Column index of each pivot, in row order.
    pub pivot_columns: Vec<usize>,
}

impl Elimination {
    /// Number of pivots, equal to the rank of the input.
    pub fn rank(&self) -> usize {
        self.pivot_columns.len()
    }
}

/// Reduce `matrix` to reduced row-echelon form.
///
/// Every row operation is applied to an identity matrix in lock-step to build the
/// transform. The determinant is negated on each swap and multiplied by each pivot before
/// the pivot row is normalized. A square matrix with fewer pivots than rows has a zero
/// determinant.
///
/// # Example
///
/// ```rust
/// use quotient_linalg::{eliminate, Complex, Matrix};
///
/// let a = Matrix::from_strings(&["1 3", "2 -4"]).unwrap();
/// let e = eliminate(&a);
/// assert_eq!(e.determinant, Complex::from(-10));
/// assert_eq!(e.reduced_form, Matrix::identity(2).unwrap());
/// assert_eq!(e.transform.matmul(&a).unwrap(), e.reduced_form);
/// ```
pub fn eliminate(matrix: &Matrix) -> Elimination {
    let (m, n) = matrix.shape();
    let mut work = matrix.to_row_grid();
    let mut transform: Vec<Vec<Complex>> = (0..m)
        .map(|r| {
            (0..m)
                .map(|c| if r == c { Complex::one() } else { Complex::zero() })
                .collect()
        })
        .collect();

    let mut determinant = if m == n { Complex::one() } else { Complex::zero() };
    let mut swaps = 0;
    let mut pivot_columns = Vec::with_capacity(m.min(n));
    let mut pivot_row = 0;

    // forward phase
    for col in 0..n {
        if pivot_row == m {
            break;
        }
        let Some((row, inv)) =
            (pivot_row..m).find_map(|r| work[r][col].recip().ok().map(|inv| (r, inv)))
        else {
            continue;
        };

        if row != pivot_row {
            work.swap(row, pivot_row);
            transform.swap(row, pivot_row);
            determinant = -determinant;
            swaps += 1;
            trace!("swap rows {pivot_row} and {row} for pivot column {col}");
        }

        determinant = determinant * &work[pivot_row][col];
        scale_row(&mut work[pivot_row], &inv);
        scale_row(&mut transform[pivot_row], &inv);

        for r in pivot_row + 1..m {
            let factor = work[r][col].clone();
            if factor.is_zero() {
                continue;
            }
            subtract_scaled_row(&mut work, r, pivot_row, &factor);
            subtract_scaled_row(&mut transform, r, pivot_row, &factor);
        }

        pivot_columns.push(col);
        pivot_row += 1;
    }

    // backward phase
    for (p, &col) in pivot_columns.iter().enumerate().rev() {
        for r in 0..p {
            let factor = work[r][col].clone();
            if factor.is_zero() {
                continue;
            }
            subtract_scaled_row(&mut work, r, p, &factor);
            subtract_scaled_row(&mut transform, r, p, &factor);
        }
    }

    if m == n && pivot_columns.len() < n {
        determinant = Complex::zero();
    }

    Elimination {
        reduced_form: Matrix::from_row_grid(work),
        transform: Matrix::from_row_grid(transform),
        determinant,
        swaps,
        pivot_columns,
    }
}

fn scale_row(row: &mut [Complex], k: &Complex) {
    for x in row.iter_mut() {
        *x = &*x * k;
    }
}

/// `grid[target] -= k * grid[source]`
fn subtract_scaled_row(grid: &mut [Vec<Complex>], target: usize, source: usize, k: &Complex) {
    let source = grid[source].clone();
    for (x, s) in grid[target].iter_mut().zip(&source) {
        *x = &*x - &(k * s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    #[test]
    fn reduces_invertible_matrix() -> Result<()> {
        let a = Matrix::from_strings(&["2 9 0", "1 3 5", "2 4 7"])?;
        let e = eliminate(&a);
        assert_eq!(e.reduced_form, Matrix::identity(3)?);
        assert_eq!(a.matmul(&e.transform)?, Matrix::identity(3)?);
        assert_eq!(e.rank(), 3);
        // 2(21 - 20) - 9(7 - 10) + 0 = 29
        assert_eq!(e.determinant, Complex::from(29));
        Ok(())
    }

    #[test]
    fn swap_flips_determinant() -> Result<()> {
        let a = Matrix::from_strings(&["0 1", "1 0"])?;
        let e = eliminate(&a);
        assert_eq!(e.swaps, 1);
        assert_eq!(e.determinant, Complex::from(-1));

        let b = Matrix::from_strings(&["0 0 1", "1 0 0", "0 1 0"])?;
        let e = eliminate(&b);
        assert_eq!(e.swaps, 2);
        assert_eq!(e.determinant, Complex::one());
        Ok(())
    }

    #[test]
    fn singular_square_has_zero_determinant() -> Result<()> {
        let a = Matrix::from_strings(&["1 2 3", "2 4 6", "1 0 1"])?;
        let e = eliminate(&a);
        assert_eq!(e.rank(), 2);
        assert!(e.determinant.is_zero());
        assert_eq!(e.pivot_columns, vec![0, 1]);
        Ok(())
    }

    #[test]
    fn skips_zero_columns() -> Result<()> {
        let a = Matrix::from_strings(&["0 1 2", "0 2 4"])?;
        let e = eliminate(&a);
        assert_eq!(e.pivot_columns, vec![1]);
        assert_eq!(e.reduced_form, Matrix::from_strings(&["0 1 2", "0 0 0"])?);
        assert!(e.determinant.is_zero());
        assert_eq!(e.transform.matmul(&a)?, e.reduced_form);
        Ok(())
    }

    #[test]
    fn backward_phase_clears_above_pivots() -> Result<()> {
        let a = Matrix::from_strings(&["1 2 1", "0 1 3", "0 0 1"])?;
        let e = eliminate(&a);
        assert_eq!(e.reduced_form, Matrix::identity(3)?);
        assert_eq!(e.determinant, Complex::one());
        Ok(())
    }

    #[test]
    fn complex_pivots() -> Result<()> {
        let a = Matrix::from_strings(&["i1 1", "0 2"])?;
        let e = eliminate(&a);
        assert_eq!(e.determinant, "i2".parse::<Complex>()?);
        assert_eq!(e.transform.matmul(&a)?, Matrix::identity(2)?);
        Ok(())
    }

    #[test]
    fn idempotent() -> Result<()> {
        let a = Matrix::from_strings(&["1 2 3 4", "2 4 7 9", "0 0 1 5"])?;
        let once = eliminate(&a).reduced_form;
        let twice = eliminate(&once).reduced_form;
        assert_eq!(once, twice);
        Ok(())
    }
}
