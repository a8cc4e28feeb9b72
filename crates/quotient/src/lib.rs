#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use quotient_scalar as scalar;

#[doc(inline)]
pub use quotient_linalg as linalg;
