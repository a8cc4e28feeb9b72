use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use num_traits::{One, Zero};

use crate::error::{Result, ScalarError};
use crate::rational::Rational;

/// A complex number with exact rational parts.
///
/// This is the scalar field every vector and matrix is defined over; real values are the
/// special case `im == 0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Complex {
    re: Rational,
    im: Rational,
}

impl Complex {
    /// Create a new complex number `re + im·i`.
    pub fn new(re: Rational, im: Rational) -> Self {
        Self { re, im }
    }

    /// A real number.
    pub fn from_real(re: Rational) -> Self {
        Self {
            re,
            im: Rational::zero(),
        }
    }

    /// A purely imaginary number.
    pub fn from_imag(im: Rational) -> Self {
        Self {
            re: Rational::zero(),
            im,
        }
    }

    /// The imaginary unit.
    pub fn i() -> Self {
        Self::from_imag(Rational::one())
    }

    /// The real part.
    pub fn re(&self) -> &Rational {
        &self.re
    }

    /// The imaginary part.
    pub fn im(&self) -> &Rational {
        &self.im
    }

    /// Whether the imaginary part is zero.
    pub fn is_real(&self) -> bool {
        self.im.is_zero()
    }

    /// `re^2 + im^2`, exact.
    pub fn sqr_mag(&self) -> Rational {
        self.re.square() + self.im.square()
    }

    /// The modulus. Approximate unless `sqr_mag` is a perfect square, see [`Rational::sqrt`].
    pub fn mag(&self) -> Result<Rational> {
        self.sqr_mag().sqrt()
    }

    /// The complex conjugate.
    pub fn conj(&self) -> Self {
        Self {
            re: self.re.clone(),
            im: -&self.im,
        }
    }

    /// Multiply both parts by a rational.
    pub fn scale_real(&self, k: &Rational) -> Self {
        Self {
            re: &self.re * k,
            im: &self.im * k,
        }
    }

    /// Divide both parts by a rational.
    pub fn div_real(&self, k: &Rational) -> Result<Self> {
        Ok(Self {
            re: self.re.checked_div(k)?,
            im: self.im.checked_div(k)?,
        })
    }

    /// Exact complex division: multiply by the conjugate, divide by the squared modulus.
    ///
    /// # Errors
    ///
    /// [`ScalarError::DivisionByZero`] if `rhs` is zero.
    pub fn checked_div(&self, rhs: &Self) -> Result<Self> {
        if rhs.is_zero() {
            return Err(ScalarError::DivisionByZero);
        }
        (self * &rhs.conj()).div_real(&rhs.sqr_mag())
    }

    /// The multiplicative inverse.
    pub fn recip(&self) -> Result<Self> {
        Self::one().checked_div(self)
    }

    /// The argument in `(-π, π]`. Lossy: computed in `f64`.
    ///
    /// # Errors
    ///
    /// [`ScalarError::UndefinedArgument`] for zero.
    pub fn arg(&self) -> Result<Rational> {
        if self.is_zero() {
            return Err(ScalarError::UndefinedArgument);
        }
        self.im.atan2(&self.re)
    }

    /// Exact integer power by repeated squaring.
    ///
    /// # Errors
    ///
    /// [`ScalarError::UndefinedPower`] for `0^0` and zero to a negative power.
    pub fn powi(&self, exp: i64) -> Result<Self> {
        if self.is_zero() {
            return match exp {
                e if e < 0 => Err(ScalarError::UndefinedPower("zero to a negative power")),
                0 => Err(ScalarError::UndefinedPower("zero to the power of zero")),
                _ => Ok(Self::zero()),
            };
        }
        let mut base = if exp < 0 { self.recip()? } else { self.clone() };
        let mut remaining = exp.unsigned_abs();
        let mut acc = Self::one();
        while remaining > 0 {
            if remaining & 1 == 1 {
                acc = &acc * &base;
            }
            base = &base * &base;
            remaining >>= 1;
        }
        Ok(acc)
    }

    /// `self^w`.
    ///
    /// Real integer exponents are exact and go through [`Self::powi`]. Every other exponent
    /// uses the polar form `z^w = e^(Re(w)·ln|z| − Im(w)·arg z) · cis(Im(w)·ln|z| + Re(w)·arg z)`,
    /// which is evaluated with the lossy functions of [`Rational`].
    ///
    /// # Errors
    ///
    /// [`ScalarError::UndefinedPower`] for zero raised to anything but a positive real.
    pub fn pow(&self, w: &Self) -> Result<Self> {
        if w.is_real() && w.re.is_integer() {
            let exp = num_traits::ToPrimitive::to_i64(w.re.numer())
                .ok_or(ScalarError::UndefinedPower("exponent too large"))?;
            return self.powi(exp);
        }
        if self.is_zero() {
            if w.is_real() && w.re.is_positive() {
                return Ok(Self::zero());
            }
            return Err(ScalarError::UndefinedPower("zero to a non-positive or complex power"));
        }

        let theta = self.arg()?;
        let half = Rational::new(1, 2)?;
        let ln_r = &self.sqr_mag().ln()? * &half;
        let magnitude = (&w.re * &ln_r - &w.im * &theta).exp()?;
        let angle = &w.im * &ln_r + &w.re * &theta;
        Ok(Self {
            re: &magnitude * &angle.cos()?,
            im: &magnitude * &angle.sin()?,
        })
    }

    /// `|self - rhs|^2`, exact.
    pub fn sqr_dist(&self, rhs: &Self) -> Rational {
        (self - rhs).sqr_mag()
    }

    /// `|self - rhs|`, approximate.
    pub fn dist(&self, rhs: &Self) -> Result<Rational> {
        (self - rhs).mag()
    }

    /// `|self - rhs| <= tolerance`, evaluated exactly as `|self - rhs|^2 <= tolerance^2`.
    ///
    /// A zero tolerance is exact equality; a negative tolerance only accepts equal values.
    pub fn approx_eq(&self, rhs: &Self, tolerance: &Rational) -> bool {
        if tolerance.is_zero() || tolerance.is_negative() {
            return self == rhs;
        }
        self.sqr_dist(rhs) <= tolerance.square()
    }

    /// Floor of both parts.
    pub fn floor(&self) -> Self {
        Self::new(self.re.floor(), self.im.floor())
    }

    /// Ceiling of both parts.
    pub fn ceil(&self) -> Self {
        Self::new(self.re.ceil(), self.im.ceil())
    }

    /// Round both parts, see [`Rational::round_to`].
    pub fn round_to(&self, digits: u32) -> Self {
        Self::new(self.re.round_to(digits), self.im.round_to(digits))
    }

    /// `Re(self) < x`.
    pub fn re_lt(&self, x: &Rational) -> bool {
        self.re < *x
    }

    /// `Re(self) <= x`.
    pub fn re_le(&self, x: &Rational) -> bool {
        self.re <= *x
    }

    /// `Re(self) > x`.
    pub fn re_gt(&self, x: &Rational) -> bool {
        self.re > *x
    }

    /// `Re(self) >= x`.
    pub fn re_ge(&self, x: &Rational) -> bool {
        self.re >= *x
    }
}

impl From<Rational> for Complex {
    fn from(re: Rational) -> Self {
        Self::from_real(re)
    }
}

impl From<i64> for Complex {
    fn from(n: i64) -> Self {
        Self::from_real(Rational::from(n))
    }
}

impl From<i32> for Complex {
    fn from(n: i32) -> Self {
        Self::from_real(Rational::from(n))
    }
}

impl Zero for Complex {
    fn zero() -> Self {
        Self::from_real(Rational::zero())
    }

    fn is_zero(&self) -> bool {
        self.re.is_zero() && self.im.is_zero()
    }
}

impl One for Complex {
    fn one() -> Self {
        Self::from_real(Rational::one())
    }
}

fn add_ref(a: &Complex, b: &Complex) -> Complex {
    Complex::new(&a.re + &b.re, &a.im + &b.im)
}

fn sub_ref(a: &Complex, b: &Complex) -> Complex {
    Complex::new(&a.re - &b.re, &a.im - &b.im)
}

// (a + bi)(c + di) = (ac - bd) + (ad + bc)i
fn mul_ref(a: &Complex, b: &Complex) -> Complex {
    if a.is_real() && b.is_real() {
        return Complex::from_real(&a.re * &b.re);
    }
    Complex::new(
        &a.re * &b.re - &a.im * &b.im,
        &a.re * &b.im + &a.im * &b.re,
    )
}

macro_rules! forward_binop {
    ($imp:ident, $method:ident, $f:ident) => {
        impl $imp<&Complex> for &Complex {
            type Output = Complex;

            #[inline]
            fn $method(self, rhs: &Complex) -> Complex {
                $f(self, rhs)
            }
        }

        impl $imp<Complex> for Complex {
            type Output = Complex;

            #[inline]
            fn $method(self, rhs: Complex) -> Complex {
                $f(&self, &rhs)
            }
        }

        impl $imp<&Complex> for Complex {
            type Output = Complex;

            #[inline]
            fn $method(self, rhs: &Complex) -> Complex {
                $f(&self, rhs)
            }
        }

        impl $imp<Complex> for &Complex {
            type Output = Complex;

            #[inline]
            fn $method(self, rhs: Complex) -> Complex {
                $f(self, &rhs)
            }
        }
    };
}

forward_binop!(Add, add, add_ref);
forward_binop!(Sub, sub, sub_ref);
forward_binop!(Mul, mul, mul_ref);

impl Neg for Complex {
    type Output = Complex;

    fn neg(self) -> Complex {
        Complex::new(-self.re, -self.im)
    }
}

impl Neg for &Complex {
    type Output = Complex;

    fn neg(self) -> Complex {
        Complex::new(-&self.re, -&self.im)
    }
}

impl Sum for Complex {
    fn sum<I: Iterator<Item = Complex>>(iter: I) -> Self {
        iter.fold(Complex::zero(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Complex> for Complex {
    fn sum<I: Iterator<Item = &'a Complex>>(iter: I) -> Self {
        iter.fold(Complex::zero(), |acc, x| acc + x)
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.re.is_zero(), self.im.is_zero()) {
            (_, true) => write!(f, "{}", self.re),
            (true, false) => write!(f, "{}i", self.im),
            (false, false) if self.im.is_negative() => {
                write!(f, "{} - {}i", self.re, self.im.abs())
            }
            (false, false) => write!(f, "{} + {}i", self.re, self.im),
        }
    }
}

impl FromStr for Complex {
    type Err = ScalarError;

    /// Parse `<real>[+-]i<imag>`, e.g. `3`, `-2.5+i4`, `1-i1/2` or `i3`.
    ///
    /// The parts are split at the last `+` or `-` that is directly followed by `i`, so a
    /// leading minus belongs to the real part.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .char_indices()
            .filter(|&(idx, c)| idx > 0 && (c == '+' || c == '-'))
            .filter(|&(idx, _)| s[idx + 1..].starts_with('i'))
            .last();

        if let Some((idx, sign)) = split {
            let re: Rational = s[..idx].parse()?;
            let im: Rational = s[idx + 2..].parse()?;
            let im = if sign == '-' { -im } else { im };
            return Ok(Self::new(re, im));
        }

        if let Some(im) = s.strip_prefix('i') {
            return Ok(Self::from_imag(im.parse()?));
        }
        if let Some(im) = s.strip_prefix("-i") {
            return Ok(Self::from_imag(-im.parse::<Rational>()?));
        }
        Ok(Self::from_real(s.parse()?))
    }
}

impl approx::AbsDiffEq for Complex {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        <f64 as approx::AbsDiffEq>::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        Rational::from_f64(epsilon).is_ok_and(|tol| self.approx_eq(other, &tol))
    }
}
