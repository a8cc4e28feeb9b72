#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Scalars
//!
//! - [`Rational`]: an exact fraction of arbitrary-precision integers, always reduced.
//! - [`Complex`]: a pair of rationals, the field all linear algebra is defined over.
//!
//! Arithmetic (`+ - *`, negation, division, integer powers) is exact. Roots are refined
//! by Newton iteration and are exact only for perfect powers. The transcendental functions
//! (`sin`, `cos`, `atan2`, `exp`, `ln`, ...) go through `f64` and back and lose precision;
//! they exist as a clearly named escape hatch and are never used by the exact paths.
//!
//! ## Example
//!
//! ```rust
//! use quotient_scalar::{Complex, Rational};
//!
//! let z: Complex = "1+i2".parse().unwrap();
//! let w = z.checked_div(&z.conj()).unwrap();
//! assert_eq!(w.re(), &Rational::new(-3, 5).unwrap());
//! assert_eq!(w.im(), &Rational::new(4, 5).unwrap());
//! ```

/// Complex numbers over exact rationals.
pub mod complex;

/// Error types for scalar arithmetic.
pub mod error;

/// Exact arbitrary-precision rationals.
pub mod rational;

pub use complex::Complex;
pub use error::{Result, ScalarError};
pub use rational::Rational;

pub use num_traits::{One, Zero};
