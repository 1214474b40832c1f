use alloy::primitives::U256;

use super::error::{MathError, MathResult};

/// Index (0-255) of the most significant set bit, found by the same
/// halving search the pool contracts use (128, 64, ... 1 bit steps).
pub fn most_significant_bit(x: U256) -> MathResult<u8> {
    if x.is_zero() {
        return Err(MathError::Domain("most significant bit of zero"));
    }

    let mut x = x;
    let mut msb: u8 = 0;
    for shift in [128usize, 64, 32, 16, 8, 4, 2, 1] {
        if x >= (U256::from(1u8) << shift) {
            x >>= shift;
            msb += shift as u8;
        }
    }

    Ok(msb)
}
