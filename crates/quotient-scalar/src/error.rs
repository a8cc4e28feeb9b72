/// An error type for scalar arithmetic.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScalarError {
    /// A rational was built with a zero denominator.
    #[error("Invalid rational: denominator must not be zero")]
    InvalidRational,

    /// A division, reciprocal or inversion had a zero divisor.
    #[error("Division by zero")]
    DivisionByZero,

    /// The power or root has no value in the rationals.
    ///
    /// # Examples
    /// - `0^0` and `0^-1`
    /// - an even root of a negative rational
    #[error("Undefined power: {0}")]
    UndefinedPower(&'static str),

    /// The argument of the complex zero has no value.
    #[error("Argument of zero is undefined")]
    UndefinedArgument,

    /// A float conversion produced a NaN or an infinity.
    ///
    /// This is the failure mode of the lossy transcendental functions, e.g. `acos(2)`.
    #[error("Cannot represent {0} as a rational")]
    NotFinite(f64),

    /// A scalar literal could not be parsed.
    #[error("Failed to parse '{input}': {reason}")]
    Parse {
        /// The text that failed to parse
        input: String,
        /// What was wrong with it
        reason: &'static str,
    },
}

/// Result type alias for scalar operations.
pub type Result<T> = std::result::Result<T, ScalarError>;
