//! Price conversion utilities.
//!
//! Prices follow the pool's convention: token0 per token1 (USDC per ETH for
//! the reference pool), and `sqrtPriceX96 = floor(sqrt(price) * 2^96)`.

use alloy::primitives::U256;
use num_bigint::BigUint;

use super::conversion::{biguint_to_u256, f64_scaled_floor, ratio_to_f64, u256_to_biguint};
use super::error::{MathError, MathResult};

// ============================================
// Constants
// ============================================

/// Fixed point resolution of sqrtPriceX96.
pub const RESOLUTION: u32 = 96;

/// 2^96 as U256.
pub const Q96: U256 = U256::from_limbs([0, 4294967296, 0, 0]);

// ============================================
// Reserves to Price
// ============================================

/// Square root of the price implied by two reserves: `sqrt(token0 / token1)`.
///
/// With token0 = USDC and token1 = ETH this is sqrt(USDC per ETH).
pub fn sqrt_price(token0_reserve: f64, token1_reserve: f64) -> MathResult<f64> {
    if !token0_reserve.is_finite() || !token1_reserve.is_finite() {
        return Err(MathError::Domain("reserves must be finite"));
    }
    if token0_reserve < 0.0 || token1_reserve < 0.0 {
        return Err(MathError::Domain("reserves must be non-negative"));
    }
    if token1_reserve == 0.0 {
        return Err(MathError::DivisionByZero("token1 reserve is zero"));
    }

    Ok((token0_reserve / token1_reserve).sqrt())
}

// ============================================
// Price <-> sqrtPriceX96
// ============================================

/// Convert a price to its Q64.96 square root: `floor(sqrt(price) * 2^96)`.
///
/// The square root is taken in double precision; scaling by 2^96 and the
/// truncation are exact, so the result is the integer the double encodes.
pub fn sqrt_price_q96_from_price(price: f64) -> MathResult<U256> {
    if price.is_nan() || price < 0.0 {
        return Err(MathError::Domain("price must be non-negative"));
    }
    if price.is_infinite() {
        return Err(MathError::Domain("price must be finite"));
    }

    let scaled = f64_scaled_floor(price.sqrt(), RESOLUTION)?;
    biguint_to_u256(&scaled)
}

/// Convert a Q64.96 square root back to a price: `(sqrtPriceX96 / 2^96)^2`.
///
/// Squared exactly in integers and rounded once to the nearest double.
pub fn price_from_sqrt_price_q96(sqrt_price_x96: U256) -> MathResult<f64> {
    let sqrt = u256_to_biguint(sqrt_price_x96);
    let squared = &sqrt * &sqrt;
    let q192 = BigUint::from(1u8) << (2 * RESOLUTION as usize);
    ratio_to_f64(&squared, &q192)
}

/// Price adjusted for token decimals, i.e. whole token0 per whole token1.
///
/// Base-unit price is token0 units per token1 unit, so a token0 with fewer
/// decimals than token1 scales the price up.
pub fn adjusted_price(
    sqrt_price_x96: U256,
    token0_decimals: u8,
    token1_decimals: u8,
) -> MathResult<f64> {
    let raw_price = price_from_sqrt_price_q96(sqrt_price_x96)?;
    let decimal_diff = i32::from(token1_decimals) - i32::from(token0_decimals);

    let adjusted = raw_price * 10f64.powi(decimal_diff);
    if adjusted.is_finite() {
        Ok(adjusted)
    } else {
        Err(MathError::Overflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_q96_constant() {
        assert_eq!(Q96, U256::from(1u8) << 96usize);
        assert_eq!(Q96.to_string(), "79228162514264337593543950336");
    }

    #[test]
    fn test_sqrt_price_from_reserves() {
        assert_eq!(sqrt_price(5000.0, 1.0).unwrap(), 5000f64.sqrt());
        assert_eq!(sqrt_price(4.0, 1.0).unwrap(), 2.0);
        assert_eq!(sqrt_price(0.0, 1.0).unwrap(), 0.0);
    }

    #[test]
    fn test_sqrt_price_zero_token1_reserve() {
        assert_eq!(
            sqrt_price(5000.0, 0.0),
            Err(MathError::DivisionByZero("token1 reserve is zero"))
        );
    }

    #[test]
    fn test_sqrt_price_rejects_negative_and_non_finite() {
        assert!(matches!(sqrt_price(-1.0, 1.0), Err(MathError::Domain(_))));
        assert!(matches!(sqrt_price(1.0, -1.0), Err(MathError::Domain(_))));
        assert!(matches!(sqrt_price(f64::NAN, 1.0), Err(MathError::Domain(_))));
        assert!(matches!(sqrt_price(1.0, f64::INFINITY), Err(MathError::Domain(_))));
    }

    #[test]
    fn test_sqrt_price_q96_reference_values() {
        let cases = [
            (4545.0, "5341294542274603406682713227264"),
            (5000.0, "5602277097478614198912276234240"),
            (5500.0, "5875717789736564987741329162240"),
            (1.0, "79228162514264337593543950336"),
            (0.25, "39614081257132168796771975168"),
        ];
        for (price, expected) in cases {
            assert_eq!(
                sqrt_price_q96_from_price(price).unwrap(),
                U256::from_str(expected).unwrap(),
                "price {price}"
            );
        }
    }

    #[test]
    fn test_sqrt_price_q96_of_zero_is_zero() {
        assert_eq!(sqrt_price_q96_from_price(0.0).unwrap(), U256::ZERO);
    }

    #[test]
    fn test_sqrt_price_q96_rejects_negative() {
        assert!(matches!(sqrt_price_q96_from_price(-0.5), Err(MathError::Domain(_))));
        assert!(matches!(sqrt_price_q96_from_price(f64::NAN), Err(MathError::Domain(_))));
        assert!(matches!(
            sqrt_price_q96_from_price(f64::INFINITY),
            Err(MathError::Domain(_))
        ));
    }

    #[test]
    fn test_sqrt_price_q96_squares_back_to_price() {
        let prices = [1e-12, 3.3e-6, 0.5, 1.0, 1.0001, 42.0, 4545.0, 5000.0, 1e9, 7.5e15];
        for price in prices {
            let q = sqrt_price_q96_from_price(price).unwrap();
            let back = price_from_sqrt_price_q96(q).unwrap();
            let rel = ((back - price) / price).abs();
            assert!(rel < 1e-9, "price {price} came back as {back}");
        }
    }

    #[test]
    fn test_adjusted_price_for_mixed_decimals() {
        // 1 ETH (18 decimals) = 2000 USDC (6 decimals) in base units is 2000e6 / 1e18
        let raw = 2000.0 * 1e6 / 1e18;
        let q = sqrt_price_q96_from_price(raw).unwrap();
        let adjusted = adjusted_price(q, 6, 18).unwrap();
        assert!((adjusted - 2000.0).abs() / 2000.0 < 1e-9);

        // same decimals leave the price untouched
        let q = sqrt_price_q96_from_price(5000.0).unwrap();
        let same = adjusted_price(q, 18, 18).unwrap();
        assert!((same - 5000.0).abs() / 5000.0 < 1e-9);
    }
}
