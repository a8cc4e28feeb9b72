use std::fmt;
use std::ops::{Index, Neg};
use std::str::FromStr;

use quotient_scalar::{Complex, One, Rational, Zero};
use rand::Rng;

use crate::error::{check_dims, LinalgError, Result};

/// A fixed-length column of complex rationals.
///
/// The dimension is fixed at construction and every binary operation requires equal
/// dimensions. The type is immutable: operations that look like mutation (`set`,
/// `negate_entry`, `add_to_entry`) return a new vector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Vector {
    coords: Vec<Complex>,
}

impl Vector {
    /// Create a new vector from its coordinates.
    pub fn new(coords: Vec<Complex>) -> Self {
        Self { coords }
    }

    /// Create a real vector.
    ///
    /// ```rust
    /// use quotient_linalg::Vector;
    /// use quotient_linalg::Rational;
    ///
    /// let v = Vector::from_reals([3, 4]);
    /// assert_eq!(v.sqr_norm(), Rational::from(25));
    /// ```
    pub fn from_reals<T: Into<Rational>>(values: impl IntoIterator<Item = T>) -> Self {
        values
            .into_iter()
            .map(|x| Complex::from_real(x.into()))
            .collect()
    }

    /// The zero vector of dimension `n`.
    pub fn zeros(n: usize) -> Self {
        Self::new(vec![Complex::zero(); n])
    }

    /// A vector whose real and imaginary parts are random integers in `0..=10`.
    pub fn random<R: Rng>(n: usize, rng: &mut R) -> Self {
        (0..n)
            .map(|_| {
                Complex::new(
                    Rational::from(rng.random_range(0i64..=10)),
                    Rational::from(rng.random_range(0i64..=10)),
                )
            })
            .collect()
    }

    /// Number of coordinates.
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Whether the vector has no coordinates.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// The coordinates.
    pub fn as_slice(&self) -> &[Complex] {
        &self.coords
    }

    /// Iterate over the coordinates.
    pub fn iter(&self) -> std::slice::Iter<'_, Complex> {
        self.coords.iter()
    }

    /// Coordinate `i`, if in bounds.
    pub fn get(&self, i: usize) -> Option<&Complex> {
        self.coords.get(i)
    }

    fn check_index(&self, i: usize) -> Result<()> {
        if i >= self.len() {
            return Err(LinalgError::IndexOutOfBounds {
                index: i,
                size: self.len(),
            });
        }
        Ok(())
    }

    /// A copy with coordinate `i` replaced.
    pub fn set(&self, i: usize, value: Complex) -> Result<Self> {
        self.check_index(i)?;
        let mut coords = self.coords.clone();
        coords[i] = value;
        Ok(Self::new(coords))
    }

    /// A copy with coordinate `i` negated.
    pub fn negate_entry(&self, i: usize) -> Result<Self> {
        self.check_index(i)?;
        self.set(i, -&self.coords[i])
    }

    /// A copy with `value` added to coordinate `i`.
    pub fn add_to_entry(&self, i: usize, value: &Complex) -> Result<Self> {
        self.check_index(i)?;
        self.set(i, &self.coords[i] + value)
    }

    /// Hermitian inner product `Σ self_k · conj(rhs_k)`, conjugate-linear in `rhs`.
    pub fn dot(&self, rhs: &Self) -> Result<Complex> {
        check_dims("dot product operands differ", self.len(), rhs.len())?;
        Ok(self
            .coords
            .iter()
            .zip(&rhs.coords)
            .map(|(a, b)| a * &b.conj())
            .sum())
    }

    /// Cross product of two three-dimensional vectors.
    pub fn cross(&self, rhs: &Self) -> Result<Self> {
        check_dims("cross product requires 3 dimensions", 3, self.len())?;
        check_dims("cross product requires 3 dimensions", 3, rhs.len())?;
        let (a, b) = (&self.coords, &rhs.coords);
        Ok(Self::new(vec![
            &a[1] * &b[2] - &a[2] * &b[1],
            &a[2] * &b[0] - &a[0] * &b[2],
            &a[0] * &b[1] - &a[1] * &b[0],
        ]))
    }

    /// Sum of squared magnitudes, exact.
    pub fn sqr_norm(&self) -> Rational {
        self.coords.iter().map(Complex::sqr_mag).sum()
    }

    /// Euclidean norm, approximate unless the squared norm is a perfect square.
    pub fn norm(&self) -> Result<Rational> {
        Ok(self.sqr_norm().sqrt()?)
    }

    /// The vector scaled to unit norm.
    ///
    /// # Errors
    ///
    /// [`LinalgError::ZeroVector`] for the zero vector.
    pub fn unit(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(LinalgError::ZeroVector);
        }
        self.div_real(&self.norm()?)
    }

    /// Whether every coordinate is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.coords.iter().all(Zero::is_zero)
    }

    /// `self + rhs`.
    pub fn checked_add(&self, rhs: &Self) -> Result<Self> {
        check_dims("cannot add vectors of different dimensions", self.len(), rhs.len())?;
        Ok(self.coords.iter().zip(&rhs.coords).map(|(a, b)| a + b).collect())
    }

    /// `self - rhs`.
    pub fn checked_sub(&self, rhs: &Self) -> Result<Self> {
        check_dims("cannot subtract vectors of different dimensions", self.len(), rhs.len())?;
        Ok(self.coords.iter().zip(&rhs.coords).map(|(a, b)| a - b).collect())
    }

    /// Multiply every coordinate by a complex scalar.
    pub fn scale(&self, k: &Complex) -> Self {
        self.coords.iter().map(|x| x * k).collect()
    }

    /// Multiply every coordinate by a rational.
    pub fn scale_real(&self, k: &Rational) -> Self {
        self.coords.iter().map(|x| x.scale_real(k)).collect()
    }

    /// Divide every coordinate by a complex scalar.
    pub fn div(&self, k: &Complex) -> Result<Self> {
        let inv = k.recip()?;
        Ok(self.scale(&inv))
    }

    /// Divide every coordinate by a rational.
    pub fn div_real(&self, k: &Rational) -> Result<Self> {
        let inv = k.recip()?;
        Ok(self.scale_real(&inv))
    }

    /// Complex conjugate of every coordinate.
    pub fn conj(&self) -> Self {
        self.coords.iter().map(Complex::conj).collect()
    }

    /// Round every coordinate to `digits` decimals.
    pub fn round_to(&self, digits: u32) -> Self {
        self.coords.iter().map(|x| x.round_to(digits)).collect()
    }

    /// The `k` with `self = k · rhs`, read off the first non-zero coordinate of `self`.
    ///
    /// The caller must know that the vectors are parallel; no check is made beyond the
    /// witnessing coordinate.
    ///
    /// # Errors
    ///
    /// [`LinalgError::ZeroVector`] if `self` is zero, since no coordinate can witness `k`.
    pub fn find_multiplier(&self, rhs: &Self) -> Result<Complex> {
        check_dims("cannot compare vectors of different dimensions", self.len(), rhs.len())?;
        let (a, b) = self
            .coords
            .iter()
            .zip(&rhs.coords)
            .find(|(a, _)| !a.is_zero())
            .ok_or(LinalgError::ZeroVector)?;
        Ok(a.checked_div(b)?)
    }

    /// Orthogonal projection of `self` onto `onto`.
    pub fn project_onto(&self, onto: &Self) -> Result<Self> {
        if onto.is_zero() {
            return Err(LinalgError::ZeroVector);
        }
        let k = self.dot(onto)?.div_real(&onto.sqr_norm())?;
        Ok(onto.scale(&k))
    }

    /// Whether the vectors point the same way: `self · rhs == |self| |rhs|`.
    ///
    /// Evaluated exactly as a real non-negative dot product whose square equals the product
    /// of the squared norms, so no square root is taken.
    pub fn is_aligned(&self, rhs: &Self) -> Result<bool> {
        let dot = self.dot(rhs)?;
        Ok(dot.is_real()
            && !dot.re().is_negative()
            && dot.re().square() == self.sqr_norm() * rhs.sqr_norm())
    }

    /// Whether the inner product is zero within `tolerance`.
    pub fn is_orthogonal(&self, rhs: &Self, tolerance: &Rational) -> Result<bool> {
        Ok(self.dot(rhs)?.approx_eq(&Complex::zero(), tolerance))
    }

    /// Whether the squared norm is one within `tolerance`.
    pub fn is_unit(&self, tolerance: &Rational) -> bool {
        self.sqr_norm().approx_eq(&Rational::one(), tolerance)
    }

    /// `(self · rhs) / (|self| |rhs|)`, the cosine of the angle for real vectors.
    pub fn cos_angle(&self, rhs: &Self) -> Result<Complex> {
        if self.is_zero() || rhs.is_zero() {
            return Err(LinalgError::ZeroVector);
        }
        let norms = self.norm()? * rhs.norm()?;
        Ok(self.dot(rhs)?.div_real(&norms)?)
    }

    /// Component-wise comparison: every `|self_k - rhs_k| <= tolerance`.
    ///
    /// A zero tolerance is exact equality.
    pub fn approx_eq(&self, rhs: &Self, tolerance: &Rational) -> Result<bool> {
        check_dims("cannot compare vectors of different dimensions", self.len(), rhs.len())?;
        Ok(self
            .coords
            .iter()
            .zip(&rhs.coords)
            .all(|(a, b)| a.approx_eq(b, tolerance)))
    }
}

impl FromIterator<Complex> for Vector {
    fn from_iter<I: IntoIterator<Item = Complex>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<Vec<Complex>> for Vector {
    fn from(coords: Vec<Complex>) -> Self {
        Self::new(coords)
    }
}

impl Index<usize> for Vector {
    type Output = Complex;

    fn index(&self, index: usize) -> &Self::Output {
        &self.coords[index]
    }
}

impl Neg for &Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        self.coords.iter().map(|x| -x).collect()
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        self.coords.into_iter().map(|x| -x).collect()
    }
}

impl FromStr for Vector {
    type Err = LinalgError;

    /// Parse space-separated scalars, e.g. `"1 -2+i3 i4"`.
    fn from_str(s: &str) -> Result<Self> {
        s.split_whitespace()
            .map(|token| token.parse::<Complex>().map_err(LinalgError::from))
            .collect()
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "[]");
        }
        write!(f, "[ ")?;
        for (i, x) in self.coords.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{x}")?;
        }
        write!(f, " ]")
    }
}

impl approx::AbsDiffEq for Vector {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        <f64 as approx::AbsDiffEq>::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.len() == other.len()
            && self
                .coords
                .iter()
                .zip(&other.coords)
                .all(|(a, b)| approx::AbsDiffEq::abs_diff_eq(a, b, epsilon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use quotient_scalar::ScalarError;

    fn c(re: i64, im: i64) -> Complex {
        Complex::new(Rational::from(re), Rational::from(im))
    }

    #[test]
    fn dot_is_hermitian() -> Result<()> {
        let a = Vector::new(vec![c(1, 1), c(2, 0)]);
        let b = Vector::new(vec![c(0, 1), c(1, -1)]);
        // (1+i)(-i) + 2(1+i) = 1 - i + 2 + 2i
        assert_eq!(a.dot(&b)?, c(3, 1));
        assert_eq!(a.dot(&a)?, Complex::from_real(a.sqr_norm()));
        assert_eq!(b.dot(&a)?, a.dot(&b)?.conj());
        Ok(())
    }

    #[test]
    fn dimension_mismatch() {
        let a = Vector::from_reals([1, 2]);
        let b = Vector::from_reals([1, 2, 3]);
        assert!(matches!(
            a.dot(&b),
            Err(LinalgError::DimensionMismatch { expected: 2, actual: 3, .. })
        ));
        assert!(a.checked_add(&b).is_err());
        assert!(a.checked_sub(&b).is_err());
        assert!(a.cross(&a).is_err());
    }

    #[test]
    fn cross_product() -> Result<()> {
        let x = Vector::from_reals([1, 0, 0]);
        let y = Vector::from_reals([0, 1, 0]);
        assert_eq!(x.cross(&y)?, Vector::from_reals([0, 0, 1]));
        assert_eq!(y.cross(&x)?, Vector::from_reals([0, 0, -1]));
        Ok(())
    }

    #[test]
    fn norms_and_units() -> Result<()> {
        let v = Vector::from_reals([3, 4]);
        assert_eq!(v.norm()?, Rational::from(5));
        let u = v.unit()?;
        assert_eq!(u, Vector::new(vec![
            Complex::from_real(Rational::new(3, 5)?),
            Complex::from_real(Rational::new(4, 5)?),
        ]));
        assert!(u.is_unit(&Rational::zero()));
        assert_eq!(Vector::zeros(3).unit(), Err(LinalgError::ZeroVector));
        Ok(())
    }

    #[test]
    fn immutable_updates() -> Result<()> {
        let v = Vector::from_reals([1, 2, 3]);
        let w = v.set(1, c(0, 1))?;
        assert_eq!(v[1], c(2, 0));
        assert_eq!(w[1], c(0, 1));
        assert_eq!(v.negate_entry(0)?, Vector::from_reals([-1, 2, 3]));
        assert_eq!(v.add_to_entry(2, &c(1, 0))?, Vector::from_reals([1, 2, 4]));
        assert_eq!(-&v, Vector::from_reals([-1, -2, -3]));
        assert!(matches!(
            v.set(3, c(0, 0)),
            Err(LinalgError::IndexOutOfBounds { index: 3, size: 3 })
        ));
        Ok(())
    }

    #[test]
    fn multiplier() -> Result<()> {
        let k = c(2, -1);
        let v = Vector::new(vec![c(0, 0), c(1, 2), c(3, 0)]);
        let kv = v.scale(&k);
        assert_eq!(kv.find_multiplier(&v)?, k);
        assert_eq!(
            Vector::zeros(3).find_multiplier(&v),
            Err(LinalgError::ZeroVector)
        );
        let w = Vector::from_reals([1, 0]);
        assert_eq!(
            w.find_multiplier(&Vector::from_reals([0, 1])),
            Err(LinalgError::Scalar(ScalarError::DivisionByZero))
        );
        Ok(())
    }

    #[test]
    fn projection_and_alignment() -> Result<()> {
        let v = Vector::from_reals([2, 2]);
        let x = Vector::from_reals([1, 0]);
        assert_eq!(v.project_onto(&x)?, Vector::from_reals([2, 0]));
        assert!(v.is_aligned(&Vector::from_reals([1, 1]))?);
        assert!(!v.is_aligned(&Vector::from_reals([-1, -1]))?);
        assert!(!v.is_aligned(&x)?);
        assert!(x.is_orthogonal(&Vector::from_reals([0, 5]), &Rational::zero())?);
        assert_eq!(v.project_onto(&Vector::zeros(2)), Err(LinalgError::ZeroVector));
        Ok(())
    }

    #[test]
    fn cosine_of_angle() -> Result<()> {
        let a = Vector::from_reals([1, 0]);
        let b = Vector::from_reals([1, 1]);
        let cos = a.cos_angle(&b)?;
        assert_abs_diff_eq!(
            cos,
            Complex::from_real(Rational::from_f64(std::f64::consts::FRAC_1_SQRT_2)?),
            epsilon = 1e-12
        );
        Ok(())
    }

    #[test]
    fn tolerance_equality() -> Result<()> {
        let a = Vector::from_reals([Rational::from(1), Rational::new(1, 3)?]);
        let b = Vector::from_reals([Rational::from(1), Rational::from_f64(0.3333333)?]);
        assert!(!a.approx_eq(&b, &Rational::zero())?);
        assert!(a.approx_eq(&b, &Rational::from_f64(1e-6)?)?);
        assert_abs_diff_eq!(a, b, epsilon = 1e-6);
        assert!(a.approx_eq(&Vector::zeros(3), &Rational::one()).is_err());
        Ok(())
    }

    #[test]
    fn parse_and_display() -> Result<()> {
        let v: Vector = "1 -2+i3 i4".parse()?;
        assert_eq!(v, Vector::new(vec![c(1, 0), c(-2, 3), c(0, 4)]));
        assert_eq!(v.to_string(), "[ 1, -2 + 3i, 4i ]");
        assert_eq!(Vector::zeros(0).to_string(), "[]");
        Ok(())
    }
}
