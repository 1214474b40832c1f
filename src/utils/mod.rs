//! Concentrated-liquidity math.
//!
//! Pure functions only: nothing in here touches the network. Organized into
//! focused submodules:
//!
//! - [`error`] - `MathError`, the typed failure of every function below
//! - [`conversion`] - U256 / BigUint / f64 conversions and ether-wei units
//! - [`price`] - reserves to price, price to and from sqrtPriceX96
//! - [`tick_math`] - price to tick and tick to price
//! - [`liquidity`] - liquidity from amounts and amounts from liquidity
//! - [`bit_math`] - most significant bit
//! - [`validation`] - range and amount sanity checks

mod bit_math;
mod conversion;
mod error;
mod liquidity;
mod price;
mod tick_math;
mod validation;

// ============================================
// Re-exports
// ============================================

// Errors
pub use error::{MathError, MathResult};

// Conversion utilities
pub use conversion::{
    biguint_to_u256, ether_to_wei, f64_scaled_floor, format_units, from_base_units,
    ratio_to_f64, to_base_units, u256_to_biguint, wei_to_ether, ETHER_DECIMALS,
};

// Price conversion utilities
pub use price::{
    adjusted_price, price_from_sqrt_price_q96, sqrt_price, sqrt_price_q96_from_price, Q96,
    RESOLUTION,
};

// Tick math utilities
pub use tick_math::{
    price_from_tick, sqrt_ratio_at_tick, tick_from_price, MAX_TICK, MIN_TICK, TICK_BASE,
};

// Liquidity utilities
pub use liquidity::{
    compute_amounts, compute_amounts_with, compute_liquidity, compute_liquidity_with, AmountPair,
    Precision,
};

// Bit math
pub use bit_math::most_significant_bit;

// Validation utilities
pub use validation::{max_price, min_price, validate_amount, validate_price, validate_price_range};
