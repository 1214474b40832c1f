use thiserror::Error;

/// Errors raised by the concentrated-liquidity math.
///
/// Every variant is an input-data bug on the caller's side. Nothing here is
/// transient, so callers should never retry on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("Math error - domain: {0}")]
    Domain(&'static str),
    #[error("Math error - division by zero: {0}")]
    DivisionByZero(&'static str),
    #[error("Math error - overflow")]
    Overflow,
}

pub type MathResult<T> = Result<T, MathError>;
