//! Sanity checks on human input before it reaches the math.
//!
//! The math itself rejects degenerate values with [`MathError`]; these checks
//! catch the mistakes that are still mathematically valid but almost surely
//! wrong, like an upside-down price range.

use super::error::{MathError, MathResult};
use super::tick_math::{price_from_tick, MAX_TICK, MIN_TICK};

// ============================================
// Validation Constants
// ============================================

/// Lowest price a tick can express, 1.0001^MIN_TICK (about 2.9e-39).
pub fn min_price() -> f64 {
    price_from_tick(MIN_TICK).unwrap_or(0.0)
}

/// Highest price a tick can express, 1.0001^MAX_TICK (about 3.4e38).
pub fn max_price() -> f64 {
    price_from_tick(MAX_TICK).unwrap_or(f64::MAX)
}

// ============================================
// Validation Helpers
// ============================================

/// A price must be finite, positive and inside the tick range.
#[inline]
pub fn validate_price(price: f64) -> MathResult<f64> {
    if !price.is_finite() || price <= 0.0 {
        return Err(MathError::Domain("price must be finite and positive"));
    }
    if price < min_price() || price > max_price() {
        return Err(MathError::Domain("price outside the pool's tick range"));
    }
    Ok(price)
}

/// `lower < current < upper`, all valid prices.
///
/// The current price sitting exactly on a bound would zero one of the
/// liquidity denominators, so the inequalities are strict.
pub fn validate_price_range(lower: f64, current: f64, upper: f64) -> MathResult<()> {
    validate_price(lower)?;
    validate_price(current)?;
    validate_price(upper)?;

    if lower >= upper {
        return Err(MathError::Domain("lower price must be below upper price"));
    }
    if current <= lower || current >= upper {
        return Err(MathError::Domain("current price must lie strictly inside the range"));
    }
    Ok(())
}

/// Human token amount: finite and non-negative.
#[inline]
pub fn validate_amount(amount: f64) -> MathResult<f64> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(MathError::Domain("token amount must be finite and non-negative"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_range_is_valid() {
        assert!(validate_price_range(4545.0, 5000.0, 5500.0).is_ok());
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert!(matches!(
            validate_price_range(5500.0, 5000.0, 4545.0),
            Err(MathError::Domain(_))
        ));
    }

    #[test]
    fn test_current_price_on_bound_rejected() {
        assert!(validate_price_range(4545.0, 4545.0, 5500.0).is_err());
        assert!(validate_price_range(4545.0, 5500.0, 5500.0).is_err());
        assert!(validate_price_range(4545.0, 6000.0, 5500.0).is_err());
    }

    #[test]
    fn test_price_bounds() {
        assert!(validate_price(0.0).is_err());
        assert!(validate_price(-1.0).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(1e-45).is_err());
        assert!(validate_price(1e39).is_err());
        assert_eq!(validate_price(5000.0).unwrap(), 5000.0);
    }

    #[test]
    fn test_amount_validation() {
        assert!(validate_amount(0.0).is_ok());
        assert!(validate_amount(1.5).is_ok());
        assert!(validate_amount(-0.1).is_err());
        assert!(validate_amount(f64::INFINITY).is_err());
    }
}
