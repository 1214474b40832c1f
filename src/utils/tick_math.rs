//! Tick math for Uniswap V3.
//!
//! A tick `i` identifies the price `1.0001^i`. Going from price to tick is a
//! floating point logarithm, going back uses the same bit decomposition as
//! Uniswap V3's TickMath.sol.

use super::error::{MathError, MathResult};

/// Lowest tick a Uniswap V3 pool accepts.
pub const MIN_TICK: i32 = -887272;
/// Highest tick a Uniswap V3 pool accepts.
pub const MAX_TICK: i32 = -MIN_TICK;

/// Base of the tick geometry.
pub const TICK_BASE: f64 = 1.0001;

// ============================================
// Precomputed Constants
// ============================================

// 1.0001^(-2^i / 2) for i = 0..19, one factor per bit of |tick|.
// Rounded to nearest from a 60 digit decimal expansion.
const TICK_MULTIPLIERS: [f64; 20] = [
    0.9999500037496876,
    0.9999000099990001,
    0.9998000299960005,
    0.9996000999800035,
    0.999200359880033,
    0.9984013591843874,
    0.9968052740212322,
    0.9936207543165438,
    0.9872822034085776,
    0.974726149167296,
    0.950091065870506,
    0.902673033446954,
    0.8148186053123259,
    0.6639293595631239,
    0.4408021944898999,
    0.19430657466711154,
    0.037755044958865794,
    0.0014254434198459772,
    2.031888943182195e-06,
    4.128572677426057e-12,
];

// ============================================
// Price to Tick
// ============================================

/// Tick at or below a price: `floor(log_1.0001(price))`.
///
/// Computed as `ln(price) / ln(1.0001)`. Right on a tick boundary the double
/// quotient can land a hair on either side of the integer, so a price built
/// as `1.0001^i` may map to `i - 1`; callers comparing against exact ticks
/// should allow for that one-tick slack.
pub fn tick_from_price(price: f64) -> MathResult<i32> {
    if price.is_nan() || price <= 0.0 {
        return Err(MathError::Domain("price must be positive"));
    }
    if price.is_infinite() {
        return Err(MathError::Domain("price must be finite"));
    }

    let tick = (price.ln() / TICK_BASE.ln()).floor();
    // ln of any finite positive double is within +-745, so this always fits
    Ok(tick as i32)
}

// ============================================
// Tick to Price
// ============================================

/// `sqrt(1.0001^tick)` as a plain float.
///
/// Ticks outside [`MIN_TICK`, `MAX_TICK`] are rejected rather than clamped.
pub fn sqrt_ratio_at_tick(tick: i32) -> MathResult<f64> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(MathError::Domain("tick outside the pool's tick range"));
    }

    let abs_tick = tick.unsigned_abs();
    let ratio = TICK_MULTIPLIERS
        .iter()
        .enumerate()
        .filter(|(bit, _)| abs_tick & (1 << bit) != 0)
        .fold(1.0_f64, |ratio, (_, multiplier)| ratio * multiplier);

    if tick > 0 {
        Ok(1.0 / ratio)
    } else {
        Ok(ratio)
    }
}

/// Price a tick stands for: `1.0001^tick`.
pub fn price_from_tick(tick: i32) -> MathResult<f64> {
    let sqrt_ratio = sqrt_ratio_at_tick(tick)?;
    Ok(sqrt_ratio * sqrt_ratio)
}
