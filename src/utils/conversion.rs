//! Type conversion and formatting utilities.
//!
//! Bridges between alloy's `U256`, arbitrary-precision `BigUint` and `f64`
//! without losing precision on the way, plus ether/wei unit handling.

use alloy::primitives::U256;
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{ToPrimitive, Zero};
use once_cell::sync::Lazy;

use super::error::{MathError, MathResult};

/// Decimals of ETH and of the 18-decimal test tokens the pool is deployed with.
pub const ETHER_DECIMALS: u8 = 18;

// ============================================
// U256 <-> BigUint
// ============================================

/// Convert alloy U256 to BigUint via little-endian bytes.
pub fn u256_to_biguint(value: U256) -> BigUint {
    let bytes: [u8; 32] = value.to_le_bytes();
    BigUint::from_bytes_le(&bytes)
}

/// Convert BigUint back to U256, failing with `Overflow` above 2^256 - 1.
pub fn biguint_to_u256(value: &BigUint) -> MathResult<U256> {
    let bytes = value.to_bytes_le();
    U256::try_from_le_slice(&bytes).ok_or(MathError::Overflow)
}

// ============================================
// f64 <-> BigUint
// ============================================

/// Compute `floor(value * 2^shift)` exactly.
///
/// Scaling a double by a power of two is exact, so the only rounding is the
/// final truncation to an integer. `value` must be finite and non-negative.
pub fn f64_scaled_floor(value: f64, shift: u32) -> MathResult<BigUint> {
    if !value.is_finite() || value < 0.0 {
        return Err(MathError::Domain("value must be finite and non-negative"));
    }

    let bits = value.to_bits();
    let biased_exponent = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & ((1u64 << 52) - 1);

    // zero and subnormals
    let (mantissa, exponent) = if biased_exponent == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased_exponent - 1075)
    };

    let exponent = exponent + i64::from(shift);
    if exponent >= 0 {
        Ok(BigUint::from(mantissa) << (exponent as usize))
    } else if exponent <= -64 {
        Ok(BigUint::zero())
    } else {
        Ok(BigUint::from(mantissa >> ((-exponent) as u32)))
    }
}

/// Divide two integers, rounding the quotient to the nearest double
/// (ties to even), the way true division of integers behaves in scripting
/// languages with big integers.
///
/// The quotient is first taken with at least 66 significant bits plus a
/// sticky bit for the remainder, so the single rounding step in
/// `BigUint::to_f64` lands on the correctly rounded result.
pub fn ratio_to_f64(numerator: &BigUint, denominator: &BigUint) -> MathResult<f64> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero("ratio denominator is zero"));
    }
    if numerator.is_zero() {
        return Ok(0.0);
    }

    let shift = 66 + denominator.bits() as i64 - numerator.bits() as i64;
    let (scaled_num, scaled_den) = if shift >= 0 {
        (numerator << (shift as usize), denominator.clone())
    } else {
        (numerator.clone(), denominator << ((-shift) as usize))
    };

    let mut quotient = &scaled_num / &scaled_den;
    if !(&scaled_num % &scaled_den).is_zero() {
        quotient.set_bit(0, true);
    }

    let approx = quotient.to_f64().ok_or(MathError::Overflow)?;
    let result = approx * 2f64.powi(-(shift as i32));
    if result.is_finite() {
        Ok(result)
    } else {
        Err(MathError::Overflow)
    }
}

// ============================================
// Unit Conversions
// ============================================

/// Exact powers of ten representable as f64 (10^22 is the last one).
const F64_POW10: [f64; 23] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16,
    1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

static POW10_CACHE: Lazy<[BigUint; 25]> =
    Lazy::new(|| std::array::from_fn(|i| BigUint::from(10u32).pow(i as u32)));

/// Compute 10^exp as BigUint.
pub(crate) fn big_pow10(exp: u8) -> BigUint {
    if (exp as usize) < POW10_CACHE.len() {
        POW10_CACHE[exp as usize].clone()
    } else {
        BigUint::from(10u32).pow(exp as u32)
    }
}

/// Convert a human token amount to base units: `trunc(amount * 10^decimals)`.
///
/// The multiplication happens in double precision, so e.g. `0.1` ether maps to
/// the integer nearest the double `0.1 * 1e18`, not to exactly 10^17 in every
/// case.
pub fn to_base_units(amount: f64, decimals: u8) -> MathResult<U256> {
    let scale = F64_POW10
        .get(decimals as usize)
        .copied()
        .ok_or(MathError::Domain("decimals above 22 lose precision"))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(MathError::Domain("token amount must be finite and non-negative"));
    }

    let units = f64_scaled_floor(amount * scale, 0)?;
    biguint_to_u256(&units)
}

/// Convert base units to a human token amount, correctly rounded.
pub fn from_base_units(value: U256, decimals: u8) -> f64 {
    // a non-zero power of ten is always a valid denominator
    ratio_to_f64(&u256_to_biguint(value), &big_pow10(decimals)).unwrap_or(f64::INFINITY)
}

/// Ether (or any 18-decimal token) to wei.
pub fn ether_to_wei(amount: f64) -> MathResult<U256> {
    to_base_units(amount, ETHER_DECIMALS)
}

/// Wei to ether (or any 18-decimal token).
pub fn wei_to_ether(value: U256) -> f64 {
    from_base_units(value, ETHER_DECIMALS)
}

/// Render base units as an exact decimal string, e.g. `0.998976618347425273`.
pub fn format_units(value: U256, decimals: u8) -> String {
    let digits = BigInt::from_biguint(Sign::Plus, u256_to_biguint(value));
    let rendered = BigDecimal::new(digits, i64::from(decimals)).to_string();
    if rendered.contains('.') {
        rendered.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u256_biguint_roundtrip_preserves_max() {
        let big = u256_to_biguint(U256::MAX);
        assert_eq!(big.bits(), 256);
        assert_eq!(biguint_to_u256(&big).unwrap(), U256::MAX);
    }

    #[test]
    fn test_biguint_above_u256_overflows() {
        let too_big = BigUint::from(1u8) << 256usize;
        assert_eq!(biguint_to_u256(&too_big), Err(MathError::Overflow));
    }

    #[test]
    fn test_scaled_floor_is_exact_for_powers_of_two() {
        assert_eq!(f64_scaled_floor(1.0, 96).unwrap(), BigUint::from(1u8) << 96usize);
        assert_eq!(f64_scaled_floor(0.25, 96).unwrap(), BigUint::from(1u8) << 94usize);
        assert_eq!(f64_scaled_floor(2.75, 0).unwrap(), BigUint::from(2u8));
        assert_eq!(f64_scaled_floor(0.0, 96).unwrap(), BigUint::zero());
    }

    #[test]
    fn test_scaled_floor_truncates_tiny_values() {
        assert_eq!(f64_scaled_floor(1e-40, 96).unwrap(), BigUint::zero());
        assert_eq!(f64_scaled_floor(f64::MIN_POSITIVE / 2.0, 0).unwrap(), BigUint::zero());
    }

    #[test]
    fn test_scaled_floor_rejects_negative_and_nan() {
        assert!(matches!(f64_scaled_floor(-1.0, 0), Err(MathError::Domain(_))));
        assert!(matches!(f64_scaled_floor(f64::NAN, 0), Err(MathError::Domain(_))));
        assert!(matches!(f64_scaled_floor(f64::INFINITY, 0), Err(MathError::Domain(_))));
    }

    #[test]
    fn test_ratio_to_f64_matches_native_division_for_small_values() {
        let cases = [(1u64, 3u64), (2, 3), (10, 7), (123_456_789, 1_000), (5, 10)];
        for (n, d) in cases {
            let got = ratio_to_f64(&BigUint::from(n), &BigUint::from(d)).unwrap();
            assert_eq!(got, n as f64 / d as f64, "{n}/{d}");
        }
    }

    #[test]
    fn test_ratio_to_f64_rounds_large_quotients_correctly() {
        // (2^60 + 1) / 1 needs rounding: nearest double is 2^60
        let n = (BigUint::from(1u8) << 60usize) + BigUint::from(1u8);
        assert_eq!(ratio_to_f64(&n, &BigUint::from(1u8)).unwrap(), 2f64.powi(60));

        // 2^53 + 1 is a tie; ties go to even (2^53)
        let tie = (BigUint::from(1u8) << 53usize) + BigUint::from(1u8);
        assert_eq!(ratio_to_f64(&tie, &BigUint::from(1u8)).unwrap(), 2f64.powi(53));

        // just above the tie rounds up
        let above = ((BigUint::from(1u8) << 54usize) + BigUint::from(3u8)) * BigUint::from(7u8);
        assert_eq!(
            ratio_to_f64(&above, &BigUint::from(14u8)).unwrap(),
            2f64.powi(53) + 2.0
        );
    }

    #[test]
    fn test_ratio_to_f64_zero_denominator() {
        assert!(matches!(
            ratio_to_f64(&BigUint::from(1u8), &BigUint::zero()),
            Err(MathError::DivisionByZero(_))
        ));
    }

    #[test]
    fn test_ether_to_wei_whole_and_fractional() {
        assert_eq!(
            ether_to_wei(1.0).unwrap(),
            U256::from(1_000_000_000_000_000_000u128)
        );
        assert_eq!(
            ether_to_wei(5000.0).unwrap(),
            U256::from(5_000_000_000_000_000_000_000u128)
        );
        assert_eq!(
            ether_to_wei(0.5).unwrap(),
            U256::from(500_000_000_000_000_000u128)
        );
    }

    #[test]
    fn test_ether_to_wei_rejects_negative() {
        assert!(matches!(ether_to_wei(-1.0), Err(MathError::Domain(_))));
    }

    #[test]
    fn test_to_base_units_six_decimals() {
        assert_eq!(to_base_units(12.5, 6).unwrap(), U256::from(12_500_000u64));
        assert!(to_base_units(1.0, 30).is_err());
    }

    #[test]
    fn test_wei_to_ether() {
        assert_eq!(wei_to_ether(U256::from(1_000_000_000_000_000_000u128)), 1.0);
        assert_eq!(wei_to_ether(U256::from(250_000_000_000_000_000u128)), 0.25);
        assert_eq!(wei_to_ether(U256::ZERO), 0.0);
    }

    #[test]
    fn test_format_units_is_exact() {
        assert_eq!(
            format_units(U256::from(998_976_618_347_425_273u128), 18),
            "0.998976618347425273"
        );
        assert_eq!(format_units(U256::from(12_500_000u64), 6), "12.5");
    }
}
