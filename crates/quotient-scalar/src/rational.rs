use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::error::{Result, ScalarError};

/// An exact arbitrary-precision fraction.
///
/// A `Rational` is always stored in lowest terms with a strictly positive denominator,
/// the sign being carried by the numerator. Equality and hashing are therefore exact and
/// structural: `2/4 == 1/2` and `-1/2 == 1/-2`.
///
/// Every operation returns a new reduced value. The arithmetic operators `+ - *` and unary
/// `-` never fail; division, roots and powers can, and are exposed as methods returning
/// [`Result`].
///
/// # Example
///
/// ```rust
/// use quotient_scalar::Rational;
///
/// let a = Rational::new(1, 3).unwrap();
/// let b = Rational::new(1, 6).unwrap();
/// assert_eq!(&a + &b, Rational::new(1, 2).unwrap());
/// assert_eq!(a.checked_div(&b).unwrap(), Rational::from(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rational {
    numer: BigInt,
    denom: BigInt,
}

impl Rational {
    /// Digits kept after the decimal point of the exponential representation of a float.
    pub const FLOAT_DIGITS: usize = 15;

    /// Newton steps used to refine an nth root from its float seed.
    pub const NEWTON_ITERATIONS: usize = 4;

    /// Create a new rational `numer / denom` in lowest terms.
    ///
    /// # Errors
    ///
    /// [`ScalarError::InvalidRational`] if `denom` is zero.
    pub fn new(numer: impl Into<BigInt>, denom: impl Into<BigInt>) -> Result<Self> {
        let denom = denom.into();
        if denom.is_zero() {
            return Err(ScalarError::InvalidRational);
        }
        Ok(Self::reduced(numer.into(), denom))
    }

    /// Create a rational from an integer.
    pub fn from_integer(n: impl Into<BigInt>) -> Self {
        Self {
            numer: n.into(),
            denom: BigInt::one(),
        }
    }

    // Callers guarantee `denom != 0`.
    fn reduced(numer: BigInt, denom: BigInt) -> Self {
        let g = numer.gcd(&denom);
        let (mut numer, mut denom) = if g.is_zero() || g.is_one() {
            (numer, denom)
        } else {
            (numer / &g, denom / &g)
        };
        if denom.is_negative() {
            numer = -numer;
            denom = -denom;
        }
        if numer.is_zero() {
            denom = BigInt::one();
        }
        Self { numer, denom }
    }

    /// The numerator, carrying the sign.
    pub fn numer(&self) -> &BigInt {
        &self.numer
    }

    /// The denominator, always positive.
    pub fn denom(&self) -> &BigInt {
        &self.denom
    }

    /// Whether the value is a whole number.
    pub fn is_integer(&self) -> bool {
        self.denom.is_one()
    }

    /// Whether the value is strictly positive.
    pub fn is_positive(&self) -> bool {
        self.numer.is_positive()
    }

    /// Whether the value is strictly negative.
    pub fn is_negative(&self) -> bool {
        self.numer.is_negative()
    }

    /// The sign of the value: -1, 0 or 1.
    pub fn signum(&self) -> i8 {
        match self.numer.sign() {
            num_bigint::Sign::Minus => -1,
            num_bigint::Sign::NoSign => 0,
            num_bigint::Sign::Plus => 1,
        }
    }

    /// Absolute value.
    pub fn abs(&self) -> Self {
        Self {
            numer: self.numer.abs(),
            denom: self.denom.clone(),
        }
    }

    /// The multiplicative inverse.
    ///
    /// # Errors
    ///
    /// [`ScalarError::DivisionByZero`] for zero.
    pub fn recip(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(ScalarError::DivisionByZero);
        }
        Ok(Self::reduced(self.denom.clone(), self.numer.clone()))
    }

    /// Exact division.
    ///
    /// # Errors
    ///
    /// [`ScalarError::DivisionByZero`] if `rhs` is zero.
    pub fn checked_div(&self, rhs: &Self) -> Result<Self> {
        if rhs.is_zero() {
            return Err(ScalarError::DivisionByZero);
        }
        Ok(Self::reduced(
            &self.numer * &rhs.denom,
            &self.denom * &rhs.numer,
        ))
    }

    /// `self * self`.
    pub fn square(&self) -> Self {
        self * self
    }

    /// `|self - rhs|`.
    pub fn dist(&self, rhs: &Self) -> Self {
        (self - rhs).abs()
    }

    /// `(self - rhs)^2`.
    pub fn sqr_dist(&self, rhs: &Self) -> Self {
        (self - rhs).square()
    }

    /// Compare with a tolerance: values closer than `tolerance` compare as equal.
    ///
    /// A zero tolerance gives the exact ordering. Negative tolerances never widen equality.
    pub fn fuzzy_cmp(&self, rhs: &Self, tolerance: &Self) -> Ordering {
        if self.dist(rhs) <= *tolerance {
            Ordering::Equal
        } else {
            self.cmp(rhs)
        }
    }

    /// `|self - rhs| <= tolerance`.
    pub fn approx_eq(&self, rhs: &Self, tolerance: &Self) -> bool {
        self.fuzzy_cmp(rhs, tolerance) == Ordering::Equal
    }

    /// Largest integer not greater than the value.
    pub fn floor(&self) -> Self {
        Self::from_integer(self.numer.div_floor(&self.denom))
    }

    /// Smallest integer not less than the value.
    pub fn ceil(&self) -> Self {
        Self::from_integer(-((-&self.numer).div_floor(&self.denom)))
    }

    /// Integer part, rounding toward zero.
    pub fn trunc(&self) -> Self {
        Self::from_integer(self.to_integer())
    }

    /// Integer part as a big integer, rounding toward zero.
    pub fn to_integer(&self) -> BigInt {
        &self.numer / &self.denom
    }

    /// Round to the nearest multiple of `10^-digits`, ties toward positive infinity.
    pub fn round_to(&self, digits: u32) -> Self {
        let scale = BigInt::from(10).pow(digits);
        let two = BigInt::from(2);
        let scaled = Self::reduced(&self.numer * &scale * &two + &self.denom, &self.denom * &two);
        Self::reduced(scaled.floor().numer, scale)
    }

    /// Closest `f64` to the value.
    ///
    /// Very large numerators and denominators are scaled down together before conversion so
    /// the quotient stays finite whenever the value itself is representable.
    pub fn to_f64(&self) -> f64 {
        const MAX_BITS: u64 = 1000;
        let bits = self.numer.bits().max(self.denom.bits());
        let (n, d) = if bits <= MAX_BITS {
            (self.numer.to_f64(), self.denom.to_f64())
        } else {
            let shift = (bits - MAX_BITS) as usize;
            ((&self.numer >> shift).to_f64(), (&self.denom >> shift).to_f64())
        };
        n.unwrap_or(f64::NAN) / d.unwrap_or(f64::NAN)
    }

    /// Exact rational of the decimal text of `x`.
    ///
    /// The float is written in exponential notation with [`Self::FLOAT_DIGITS`] digits after
    /// the point and that text is converted exactly, so `0.1` becomes `1/10`. The result is
    /// lossy relative to the binary value of `x` but exact relative to its decimal text.
    ///
    /// # Errors
    ///
    /// [`ScalarError::NotFinite`] for NaN and infinities.
    pub fn from_f64(x: f64) -> Result<Self> {
        if !x.is_finite() {
            return Err(ScalarError::NotFinite(x));
        }
        let text = format!("{:.*e}", Self::FLOAT_DIGITS, x);
        let (mantissa, exponent) = text.split_once('e').ok_or(ScalarError::NotFinite(x))?;
        let exponent: i64 = exponent.parse().map_err(|_| ScalarError::NotFinite(x))?;
        let digits: BigInt = mantissa
            .replace('.', "")
            .parse()
            .map_err(|_| ScalarError::NotFinite(x))?;
        let shift = Self::FLOAT_DIGITS as i64 - exponent;
        Ok(Self::reduced(digits, BigInt::one()).mul_pow10(-shift))
    }

    // self * 10^exp
    fn mul_pow10(self, exp: i64) -> Self {
        let factor = BigInt::from(10).pow(exp.unsigned_abs() as u32);
        if exp >= 0 {
            Self::reduced(self.numer * factor, self.denom)
        } else {
            Self::reduced(self.numer, self.denom * factor)
        }
    }

    /// Approximate nth root by Newton iteration.
    ///
    /// The iteration is seeded from a float estimate and refined
    /// [`Self::NEWTON_ITERATIONS`] times in exact arithmetic. Perfect powers whose root
    /// survives the float seed exactly (`4`, `1/4`, `27`) come back exact.
    ///
    /// # Errors
    ///
    /// [`ScalarError::UndefinedPower`] for `n == 0` or an even root of a negative value.
    pub fn nth_root(&self, n: u32) -> Result<Self> {
        if n == 0 {
            return Err(ScalarError::UndefinedPower("zeroth root"));
        }
        if n == 1 || self.is_zero() || self.is_one() {
            return Ok(self.clone());
        }
        if self.is_negative() {
            if n % 2 == 0 {
                return Err(ScalarError::UndefinedPower("even root of a negative value"));
            }
            return Ok(-self.abs().nth_root(n)?);
        }

        let mut root = self.root_seed(n)?;

        let n_rat = Self::from(n);
        let n_minus_one = Self::from(n - 1);
        for _ in 0..Self::NEWTON_ITERATIONS {
            let tail = self.checked_div(&root.powi(i64::from(n) - 1)?)?;
            root = (&n_minus_one * &root + tail).checked_div(&n_rat)?;
        }
        Ok(root)
    }

    // Float estimate of the positive nth root. Values outside the f64 range are split into
    // decimal mantissa and exponent first.
    fn root_seed(&self, n: u32) -> Result<Self> {
        let x = self.to_f64();
        if x.is_normal() {
            return Self::from_f64(x.powf(1.0 / f64::from(n)));
        }
        let k = self.floor_log10()?;
        let mantissa = self.clone().mul_pow10(-k).to_f64();
        let log = (k as f64 + mantissa.log10()) / f64::from(n);
        let whole = log.floor();
        Ok(Self::from_f64(10f64.powf(log - whole))?.mul_pow10(whole as i64))
    }

    /// Approximate square root, see [`Self::nth_root`].
    pub fn sqrt(&self) -> Result<Self> {
        self.nth_root(2)
    }

    /// Exact integer power.
    ///
    /// # Errors
    ///
    /// [`ScalarError::UndefinedPower`] for `0^0` and zero to a negative power.
    pub fn powi(&self, exp: i64) -> Result<Self> {
        if self.is_zero() {
            return match exp.cmp(&0) {
                Ordering::Less => Err(ScalarError::UndefinedPower("zero to a negative power")),
                Ordering::Equal => Err(ScalarError::UndefinedPower("zero to the power of zero")),
                Ordering::Greater => Ok(Self::zero()),
            };
        }
        let magnitude = u32::try_from(exp.unsigned_abs())
            .map_err(|_| ScalarError::UndefinedPower("exponent too large"))?;
        let pos = Self::reduced(self.numer.pow(magnitude), self.denom.pow(magnitude));
        if exp < 0 {
            pos.recip()
        } else {
            Ok(pos)
        }
    }

    /// Rational power.
    ///
    /// Integer exponents are exact. For `p/q` the `q`th root is taken with
    /// [`Self::nth_root`] and raised to `p`, so the result is approximate.
    ///
    /// # Errors
    ///
    /// [`ScalarError::UndefinedPower`] for `0^0`, zero to a negative power, an even root of
    /// a negative base, or an exponent whose numerator or denominator does not fit in 32 bits.
    pub fn pow(&self, exp: &Self) -> Result<Self> {
        if self.is_zero() {
            return match exp.signum() {
                -1 => Err(ScalarError::UndefinedPower("zero to a negative power")),
                0 => Err(ScalarError::UndefinedPower("zero to the power of zero")),
                _ => Ok(Self::zero()),
            };
        }
        let p = exp
            .numer
            .to_i64()
            .ok_or(ScalarError::UndefinedPower("exponent too large"))?;
        if exp.is_integer() {
            return self.powi(p);
        }
        let q = exp
            .denom
            .to_u32()
            .ok_or(ScalarError::UndefinedPower("exponent too large"))?;
        self.nth_root(q)?.powi(p)
    }

    /// `floor(log10(|self|))`.
    ///
    /// # Errors
    ///
    /// [`ScalarError::UndefinedPower`] for zero.
    pub fn floor_log10(&self) -> Result<i64> {
        if self.is_zero() {
            return Err(ScalarError::UndefinedPower("logarithm of zero"));
        }
        let value = self.abs();
        let digits = |n: &BigInt| n.to_string().len() as i64;
        let mut k = digits(&value.numer) - digits(&value.denom);
        if value < Self::one().mul_pow10(k) {
            k -= 1;
        }
        Ok(k)
    }

    // Lossy escape hatch: through f64 and back.
    fn lossy(&self, f: impl FnOnce(f64) -> f64) -> Result<Self> {
        Self::from_f64(f(self.to_f64()))
    }

    /// Sine. Lossy: computed in `f64`.
    pub fn sin(&self) -> Result<Self> {
        self.lossy(f64::sin)
    }

    /// Cosine. Lossy: computed in `f64`.
    pub fn cos(&self) -> Result<Self> {
        self.lossy(f64::cos)
    }

    /// Tangent. Lossy: computed in `f64`.
    pub fn tan(&self) -> Result<Self> {
        self.lossy(f64::tan)
    }

    /// Hyperbolic sine. Lossy: computed in `f64`.
    pub fn sinh(&self) -> Result<Self> {
        self.lossy(f64::sinh)
    }

    /// Hyperbolic cosine. Lossy: computed in `f64`.
    pub fn cosh(&self) -> Result<Self> {
        self.lossy(f64::cosh)
    }

    /// Hyperbolic tangent. Lossy: computed in `f64`.
    pub fn tanh(&self) -> Result<Self> {
        self.lossy(f64::tanh)
    }

    /// Arcsine. Lossy: computed in `f64`, fails outside `[-1, 1]`.
    pub fn asin(&self) -> Result<Self> {
        self.lossy(f64::asin)
    }

    /// Arccosine. Lossy: computed in `f64`, fails outside `[-1, 1]`.
    pub fn acos(&self) -> Result<Self> {
        self.lossy(f64::acos)
    }

    /// Arctangent. Lossy: computed in `f64`.
    pub fn atan(&self) -> Result<Self> {
        self.lossy(f64::atan)
    }

    /// Four-quadrant arctangent of `self / x`. Lossy: computed in `f64`.
    pub fn atan2(&self, x: &Self) -> Result<Self> {
        let x = x.to_f64();
        self.lossy(|y| y.atan2(x))
    }

    /// Natural exponential. Lossy: computed in `f64`.
    pub fn exp(&self) -> Result<Self> {
        self.lossy(f64::exp)
    }

    /// Natural logarithm. Lossy: computed in `f64`, fails for non-positive values.
    pub fn ln(&self) -> Result<Self> {
        self.lossy(f64::ln)
    }
}

impl Zero for Rational {
    fn zero() -> Self {
        Self::from_integer(0)
    }

    fn is_zero(&self) -> bool {
        self.numer.is_zero()
    }
}

impl One for Rational {
    fn one() -> Self {
        Self::from_integer(1)
    }

    fn is_one(&self) -> bool {
        self.numer.is_one() && self.denom.is_one()
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::zero()
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        // denominators are positive, cross multiplication keeps the order
        (&self.numer * &other.denom).cmp(&(&other.numer * &self.denom))
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

macro_rules! impl_from_int {
    ($($t:ty),+) => {
        $(
            impl From<$t> for Rational {
                #[inline]
                fn from(n: $t) -> Self {
                    Self::from_integer(n)
                }
            }
        )+
    };
}

impl_from_int!(i32, i64, u32, u64, usize, BigInt);

fn add_ref(a: &Rational, b: &Rational) -> Rational {
    if a.denom == b.denom {
        return Rational::reduced(&a.numer + &b.numer, a.denom.clone());
    }
    Rational::reduced(
        &a.numer * &b.denom + &b.numer * &a.denom,
        &a.denom * &b.denom,
    )
}

fn sub_ref(a: &Rational, b: &Rational) -> Rational {
    if a.denom == b.denom {
        return Rational::reduced(&a.numer - &b.numer, a.denom.clone());
    }
    Rational::reduced(
        &a.numer * &b.denom - &b.numer * &a.denom,
        &a.denom * &b.denom,
    )
}

fn mul_ref(a: &Rational, b: &Rational) -> Rational {
    Rational::reduced(&a.numer * &b.numer, &a.denom * &b.denom)
}

macro_rules! forward_binop {
    ($imp:ident, $method:ident, $f:ident) => {
        impl $imp<&Rational> for &Rational {
            type Output = Rational;

            #[inline]
            fn $method(self, rhs: &Rational) -> Rational {
                $f(self, rhs)
            }
        }

        impl $imp<Rational> for Rational {
            type Output = Rational;

            #[inline]
            fn $method(self, rhs: Rational) -> Rational {
                $f(&self, &rhs)
            }
        }

        impl $imp<&Rational> for Rational {
            type Output = Rational;

            #[inline]
            fn $method(self, rhs: &Rational) -> Rational {
                $f(&self, rhs)
            }
        }

        impl $imp<Rational> for &Rational {
            type Output = Rational;

            #[inline]
            fn $method(self, rhs: Rational) -> Rational {
                $f(self, &rhs)
            }
        }
    };
}

forward_binop!(Add, add, add_ref);
forward_binop!(Sub, sub, sub_ref);
forward_binop!(Mul, mul, mul_ref);

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational {
            numer: -self.numer,
            denom: self.denom,
        }
    }
}

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational {
            numer: -&self.numer,
            denom: self.denom.clone(),
        }
    }
}

impl Sum for Rational {
    fn sum<I: Iterator<Item = Rational>>(iter: I) -> Self {
        iter.fold(Rational::zero(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Rational> for Rational {
    fn sum<I: Iterator<Item = &'a Rational>>(iter: I) -> Self {
        iter.fold(Rational::zero(), |acc, x| acc + x)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom.is_one() {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

// Largest accepted `e` exponent in decimal text.
const MAX_DECIMAL_EXPONENT: u64 = 10_000;

fn parse_decimal(input: &str) -> Result<Rational> {
    let err = |reason| ScalarError::Parse {
        input: input.to_string(),
        reason,
    };

    let (mantissa, exponent) = match input.find(['e', 'E']) {
        Some(idx) => (&input[..idx], Some(&input[idx + 1..])),
        None => (input, None),
    };
    let exponent: i64 = match exponent {
        Some(e) => e.parse().map_err(|_| err("invalid exponent"))?,
        None => 0,
    };

    let (negative, unsigned) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa.strip_prefix('+').unwrap_or(mantissa)),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(err("missing digits"));
    }
    if !int_part
        .chars()
        .chain(frac_part.chars())
        .all(|c| c.is_ascii_digit())
    {
        return Err(err("invalid digit"));
    }

    let digits: BigInt = format!("{int_part}{frac_part}")
        .parse()
        .map_err(|_| err("invalid digit"))?;
    let digits = if negative { -digits } else { digits };
    if exponent.unsigned_abs() > MAX_DECIMAL_EXPONENT {
        return Err(err("exponent too large"));
    }
    Ok(Rational::from_integer(digits).mul_pow10(exponent - frac_part.len() as i64))
}

impl FromStr for Rational {
    type Err = ScalarError;

    /// Parse `7`, `-2.25`, `1e-3` or `3/4`. Decimal text is converted exactly.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.split_once('/') {
            Some((numer, denom)) => {
                let numer = parse_decimal(numer.trim())?;
                let denom = parse_decimal(denom.trim())?;
                if denom.is_zero() {
                    return Err(ScalarError::InvalidRational);
                }
                numer.checked_div(&denom)
            }
            None => parse_decimal(s),
        }
    }
}

impl approx::AbsDiffEq for Rational {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        <f64 as approx::AbsDiffEq>::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        Rational::from_f64(epsilon).is_ok_and(|tol| self.approx_eq(other, &tol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: i64, d: i64) -> Rational {
        Rational::new(n, d).unwrap()
    }

    #[test]
    fn constructor_reduces() -> Result<()> {
        let a = Rational::new(6, -4)?;
        assert_eq!(a.numer(), &BigInt::from(-3));
        assert_eq!(a.denom(), &BigInt::from(2));
        assert_eq!(Rational::new(0, -7)?, Rational::zero());
        assert_eq!(Rational::new(1, 0), Err(ScalarError::InvalidRational));
        Ok(())
    }

    #[test]
    fn arithmetic() -> Result<()> {
        let a = r(1, 3);
        let b = r(-1, 6);
        assert_eq!(&a + &b, r(1, 6));
        assert_eq!(&a - &b, r(1, 2));
        assert_eq!(&a * &b, r(-1, 18));
        assert_eq!(a.checked_div(&b)?, r(-2, 1));
        assert_eq!(-a.clone(), r(-1, 3));
        assert_eq!(b.abs(), r(1, 6));
        assert_eq!(b.signum(), -1);
        assert_eq!(Rational::zero().signum(), 0);
        Ok(())
    }

    #[test]
    fn division_round_trip() -> Result<()> {
        let values = [r(3, 7), r(-22, 5), r(1, 1), r(-9, 13)];
        for a in &values {
            for b in &values {
                assert_eq!(&a.checked_div(b)? * b, *a);
            }
        }
        Ok(())
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(
            r(1, 2).checked_div(&Rational::zero()),
            Err(ScalarError::DivisionByZero)
        );
        assert_eq!(Rational::zero().recip(), Err(ScalarError::DivisionByZero));
    }

    #[test]
    fn ordering() {
        assert!(r(1, 3) < r(1, 2));
        assert!(r(-1, 2) < r(-1, 3));
        assert!(r(2, 4) >= r(1, 2));
        let tol = r(1, 100);
        assert_eq!(r(100, 1000).fuzzy_cmp(&r(101, 1000), &tol), Ordering::Equal);
        assert_eq!(r(1, 10).fuzzy_cmp(&r(2, 10), &tol), Ordering::Less);
        assert!(!r(1, 10).approx_eq(&r(2, 10), &Rational::zero()));
    }

    #[test]
    fn floor_and_ceil() {
        assert_eq!(r(7, 2).floor(), r(3, 1));
        assert_eq!(r(7, 2).ceil(), r(4, 1));
        assert_eq!(r(-7, 2).floor(), r(-4, 1));
        assert_eq!(r(-7, 2).ceil(), r(-3, 1));
        assert_eq!(r(-7, 2).trunc(), r(-3, 1));
        assert_eq!(r(4, 1).floor(), r(4, 1));
        assert_eq!(r(4, 1).ceil(), r(4, 1));
    }

    #[test]
    fn round_to_digits() {
        assert_eq!(r(1, 3).round_to(2), r(33, 100));
        assert_eq!(r(2, 3).round_to(2), r(67, 100));
        assert_eq!(r(-2, 3).round_to(1), r(-7, 10));
    }

    #[test]
    fn float_conversion() -> Result<()> {
        assert_eq!(Rational::from_f64(0.1)?, r(1, 10));
        assert_eq!(Rational::from_f64(-2.5)?, r(-5, 2));
        assert_eq!(Rational::from_f64(1e20)?, Rational::from(10).powi(20)?);
        assert_eq!(Rational::from_f64(0.0)?, Rational::zero());
        assert!(matches!(
            Rational::from_f64(f64::NAN),
            Err(ScalarError::NotFinite(_))
        ));
        assert_eq!(r(1, 4).to_f64(), 0.25);
        assert_eq!(r(-3, 2).to_f64(), -1.5);
        Ok(())
    }

    #[test]
    fn to_f64_huge_terms() -> Result<()> {
        let big = BigInt::from(10).pow(400);
        let y = Rational::new(&big * 3 + 1, &big * 4)?;
        assert!((y.to_f64() - 0.75).abs() < 1e-12);
        assert!((y.recip()?.to_f64() - 4.0 / 3.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn roots() -> Result<()> {
        assert_eq!(r(4, 1).sqrt()?, r(2, 1));
        assert_eq!(r(1, 4).sqrt()?, r(1, 2));
        assert_eq!(r(27, 1).nth_root(3)?, r(3, 1));
        assert_eq!(r(-8, 1).nth_root(3)?, r(-2, 1));
        let root2 = r(2, 1).sqrt()?;
        assert!(root2.square().approx_eq(&r(2, 1), &Rational::from_f64(1e-30)?));
        assert!(matches!(r(-4, 1).sqrt(), Err(ScalarError::UndefinedPower(_))));
        Ok(())
    }

    #[test]
    fn roots_outside_float_range() -> Result<()> {
        let ten = Rational::from(10);
        let tol = Rational::from_f64(1e-12)?;

        let huge = ten.powi(400)?;
        let root = huge.sqrt()?;
        assert_eq!(root.floor_log10()?, 200);
        assert!(root.checked_div(&ten.powi(200)?)?.approx_eq(&Rational::one(), &tol));

        let tiny = ten.powi(-400)?;
        let root = tiny.sqrt()?;
        assert_eq!(root.floor_log10()?, -200);
        assert!(root.checked_div(&ten.powi(-200)?)?.approx_eq(&Rational::one(), &tol));

        let base = r(3, 1) * ten.powi(333)?;
        let root = base.powi(3)?.nth_root(3)?;
        assert!(root.checked_div(&base)?.approx_eq(&Rational::one(), &tol));
        Ok(())
    }

    #[test]
    fn powers() -> Result<()> {
        assert_eq!(r(2, 3).powi(3)?, r(8, 27));
        assert_eq!(r(2, 3).powi(-2)?, r(9, 4));
        assert_eq!(r(5, 1).powi(0)?, Rational::one());
        assert_eq!(r(4, 1).pow(&r(3, 2))?, r(8, 1));
        assert_eq!(r(9, 1).pow(&r(-1, 2))?, r(1, 3));
        assert!(matches!(
            Rational::zero().pow(&r(-1, 1)),
            Err(ScalarError::UndefinedPower(_))
        ));
        assert!(matches!(
            Rational::zero().pow(&Rational::zero()),
            Err(ScalarError::UndefinedPower(_))
        ));
        assert!(matches!(
            r(-4, 1).pow(&r(-1, 2)),
            Err(ScalarError::UndefinedPower(_))
        ));
        assert_eq!(Rational::zero().pow(&r(1, 2))?, Rational::zero());
        Ok(())
    }

    #[test]
    fn floor_log10() -> Result<()> {
        assert_eq!(r(1, 1).floor_log10()?, 0);
        assert_eq!(r(999, 1).floor_log10()?, 2);
        assert_eq!(r(1000, 1).floor_log10()?, 3);
        assert_eq!(r(1, 10).floor_log10()?, -1);
        assert_eq!(r(1, 2).floor_log10()?, -1);
        assert_eq!(r(-3, 1000).floor_log10()?, -3);
        assert!(Rational::zero().floor_log10().is_err());
        Ok(())
    }

    #[test]
    fn lossy_functions() -> Result<()> {
        let tol = Rational::from_f64(1e-12)?;
        assert!(Rational::zero().cos()?.approx_eq(&Rational::one(), &tol));
        assert!(Rational::zero().sin()?.approx_eq(&Rational::zero(), &tol));
        assert!(Rational::one().atan2(&Rational::zero())?.approx_eq(
            &Rational::from_f64(std::f64::consts::FRAC_PI_2)?,
            &tol
        ));
        assert!(matches!(r(2, 1).acos(), Err(ScalarError::NotFinite(_))));
        Ok(())
    }

    #[test]
    fn parse() -> Result<()> {
        assert_eq!("7".parse::<Rational>()?, r(7, 1));
        assert_eq!("-2.25".parse::<Rational>()?, r(-9, 4));
        assert_eq!(".5".parse::<Rational>()?, r(1, 2));
        assert_eq!("1e-3".parse::<Rational>()?, r(1, 1000));
        assert_eq!("1.5E2".parse::<Rational>()?, r(150, 1));
        assert_eq!(" 3/-4 ".parse::<Rational>()?, r(-3, 4));
        assert_eq!("1/0".parse::<Rational>(), Err(ScalarError::InvalidRational));
        assert!(matches!("x".parse::<Rational>(), Err(ScalarError::Parse { .. })));
        assert!(matches!("-".parse::<Rational>(), Err(ScalarError::Parse { .. })));
        assert_eq!("1e400".parse::<Rational>()?, Rational::from(10).powi(400)?);
        assert!(matches!(
            "1e4000000000".parse::<Rational>(),
            Err(ScalarError::Parse { reason: "exponent too large", .. })
        ));
        Ok(())
    }

    #[test]
    fn display() {
        assert_eq!(r(3, 1).to_string(), "3");
        assert_eq!(r(-3, 4).to_string(), "-3/4");
    }
}
