//! Liquidity and token amount calculations for a bounded price range.
//!
//! Token naming follows the pool: token0 is the quote side (USDC, "y") and
//! token1 the base side (ETH, "x"). All sqrt prices are Q64.96 values with
//! `sqrt_pa <= sqrt_pc <= sqrt_pb` (lower bound, current, upper bound).

use alloy::primitives::U256;
use num_bigint::BigUint;
use num_traits::Zero;
use serde::Deserialize;

use super::conversion::{biguint_to_u256, f64_scaled_floor, ratio_to_f64, u256_to_biguint};
use super::error::{MathError, MathResult};
use super::price::RESOLUTION;

/// How intermediate quotients are rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// Integer arithmetic with floor division at each quotient, as a contract
    /// would compute it. Never over-commits either token.
    #[default]
    Exact,
    /// Each quotient rounded to the nearest double before truncation.
    /// Reproduces the numbers printed by the original liquidity scripts, but a
    /// round trip can come out one rounding step above the deposit.
    Float64,
}

/// Token amounts backing a position, in base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountPair {
    /// token1 (ETH, "amount_x")
    pub amount_token1: U256,
    /// token0 (USDC, "amount_y")
    pub amount_token0: U256,
}

impl AmountPair {
    /// `(amount_token1, amount_token0)`, the order the scripts print them in.
    pub fn as_tuple(&self) -> (U256, U256) {
        (self.amount_token1, self.amount_token0)
    }

    /// True when neither amount exceeds the matching deposit.
    pub fn fits_within(&self, amount_token0: U256, amount_token1: U256) -> bool {
        self.amount_token0 <= amount_token0 && self.amount_token1 <= amount_token1
    }
}

fn q96() -> BigUint {
    BigUint::from(1u8) << (RESOLUTION as usize)
}

fn abs_diff(a: &BigUint, b: &BigUint) -> BigUint {
    if a >= b {
        a - b
    } else {
        b - a
    }
}

/// `floor(numerator / denominator)` under the requested precision.
fn divide(numerator: &BigUint, denominator: &BigUint, precision: Precision) -> MathResult<BigUint> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero("quotient denominator is zero"));
    }
    match precision {
        Precision::Exact => Ok(numerator / denominator),
        Precision::Float64 => f64_scaled_floor(ratio_to_f64(numerator, denominator)?, 0),
    }
}

// ============================================
// Amounts to Liquidity
// ============================================

/// Liquidity supportable by the given deposits over `[sqrt_pa, sqrt_pb]`
/// with the pool currently at `sqrt_pc`, using [`Precision::Exact`].
///
/// `amount_token0` funds the `[pa, pc]` leg and `amount_token1` the
/// `[pc, pb]` leg; the smaller of the two liquidities is the binding one.
pub fn compute_liquidity(
    amount_token0: U256,
    amount_token1: U256,
    sqrt_pa: U256,
    sqrt_pc: U256,
    sqrt_pb: U256,
) -> MathResult<U256> {
    compute_liquidity_with(
        Precision::Exact,
        amount_token0,
        amount_token1,
        sqrt_pa,
        sqrt_pc,
        sqrt_pb,
    )
}

/// [`compute_liquidity`] with an explicit rounding mode.
///
/// - `Lx = amount_token1 * sqrt_pb * sqrt_pc / (|sqrt_pb - sqrt_pc| * 2^96)`
/// - `Ly = amount_token0 * 2^96 / |sqrt_pc - sqrt_pa|`
/// - `L = floor(min(Lx, Ly))`
pub fn compute_liquidity_with(
    precision: Precision,
    amount_token0: U256,
    amount_token1: U256,
    sqrt_pa: U256,
    sqrt_pc: U256,
    sqrt_pb: U256,
) -> MathResult<U256> {
    if sqrt_pb == sqrt_pc {
        return Err(MathError::Domain("current price sits on the upper range bound"));
    }
    if sqrt_pc == sqrt_pa {
        return Err(MathError::Domain("current price sits on the lower range bound"));
    }

    let (a, c, b) = (
        u256_to_biguint(sqrt_pa),
        u256_to_biguint(sqrt_pc),
        u256_to_biguint(sqrt_pb),
    );
    let amount0 = u256_to_biguint(amount_token0);
    let amount1 = u256_to_biguint(amount_token1);

    let liquidity_x = divide(&(amount1 * &b * &c), &(abs_diff(&b, &c) * q96()), precision)?;
    let liquidity_y = divide(&(amount0 * q96()), &abs_diff(&c, &a), precision)?;

    biguint_to_u256(&liquidity_x.min(liquidity_y))
}

// ============================================
// Liquidity to Amounts
// ============================================

/// Token amounts a position of `liquidity` needs over `[sqrt_pa, sqrt_pb]`
/// at the current `sqrt_pc`, using [`Precision::Exact`].
pub fn compute_amounts(
    liquidity: U256,
    sqrt_pa: U256,
    sqrt_pc: U256,
    sqrt_pb: U256,
) -> MathResult<AmountPair> {
    compute_amounts_with(Precision::Exact, liquidity, sqrt_pa, sqrt_pc, sqrt_pb)
}

/// [`compute_amounts`] with an explicit rounding mode.
///
/// - `amount_token1 = floor(L * |sqrt_pb - sqrt_pc| * 2^96 / (sqrt_pb * sqrt_pc))`
/// - `amount_token0 = floor(L * |sqrt_pc - sqrt_pa| / 2^96)`
pub fn compute_amounts_with(
    precision: Precision,
    liquidity: U256,
    sqrt_pa: U256,
    sqrt_pc: U256,
    sqrt_pb: U256,
) -> MathResult<AmountPair> {
    if sqrt_pb.is_zero() || sqrt_pc.is_zero() {
        return Err(MathError::Domain("sqrt price bound is zero"));
    }

    let (a, c, b) = (
        u256_to_biguint(sqrt_pa),
        u256_to_biguint(sqrt_pc),
        u256_to_biguint(sqrt_pb),
    );
    let liquidity = u256_to_biguint(liquidity);

    let amount1 = divide(&(&liquidity * abs_diff(&b, &c) * q96()), &(&b * &c), precision)?;
    let amount0 = divide(&(&liquidity * abs_diff(&c, &a)), &q96(), precision)?;

    Ok(AmountPair {
        amount_token1: biguint_to_u256(&amount1)?,
        amount_token0: biguint_to_u256(&amount0)?,
    })
}
