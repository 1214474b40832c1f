use std::time::Duration;

use alloy::primitives::aliases::U160;
use alloy::primitives::{Address, U256};
use alloy::providers::DynProvider;
use anyhow::{bail, Result};
use log::debug;

use crate::abis::{IUniswapV3Quoter, QuoteParams};
use crate::chain::with_timeout;
use crate::position::{QuoteRequest, QuoteResult};

/// Largest value a uint160 can hold, 2^160 - 1.
const U160_MAX: U256 = U256::from_limbs([u64::MAX, u64::MAX, u32::MAX as u64, 0]);

/// Calls the quoter contract, which simulates a swap and reports the outcome.
#[derive(Clone)]
pub struct QuoterClient {
    provider: DynProvider,
    quoter: Address,
    call_timeout: Duration,
}

impl QuoterClient {
    pub fn new(provider: DynProvider, quoter: Address, call_timeout: Duration) -> Self {
        Self {
            provider,
            quoter,
            call_timeout,
        }
    }

    pub async fn quote(&self, request: &QuoteRequest) -> Result<QuoteResult> {
        let params = quote_params(request)?;
        let quoter = IUniswapV3Quoter::new(self.quoter, &self.provider);

        let result = with_timeout(self.call_timeout, "quote()", quoter.quote(params).call()).await?;

        let quote = QuoteResult {
            amount_out: result.amountOut,
            sqrt_price_x96_after: U256::from(result.sqrtPriceX96After),
            tick_after: result.tickAfter.as_i32(),
        };
        debug!(
            "Quote for {} in (zero_for_one {}): {} out, tick after {}",
            request.amount_in, request.zero_for_one, quote.amount_out, quote.tick_after
        );

        Ok(quote)
    }
}

fn quote_params(request: &QuoteRequest) -> Result<QuoteParams> {
    if request.sqrt_price_limit_x96 > U160_MAX {
        bail!(
            "sqrt price limit {} does not fit in uint160",
            request.sqrt_price_limit_x96
        );
    }

    Ok(QuoteParams {
        pool: request.pool,
        amountIn: request.amount_in,
        zeroForOne: request.zero_for_one,
        sqrtPriceLimitX96: U160::from(request.sqrt_price_limit_x96),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u160_max() {
        assert_eq!(U160_MAX, (U256::from(1u8) << 160usize) - U256::from(1u8));
    }

    #[test]
    fn test_quote_params_from_request() {
        let request = QuoteRequest::new(Address::repeat_byte(0x55), 0.01337, false, 5004.0).unwrap();
        let params = quote_params(&request).unwrap();

        assert_eq!(params.pool, request.pool);
        assert_eq!(params.amountIn, request.amount_in);
        assert!(!params.zeroForOne);
        assert_eq!(U256::from(params.sqrtPriceLimitX96), request.sqrt_price_limit_x96);
    }

    #[test]
    fn test_quote_params_reject_oversized_limit() {
        let request = QuoteRequest {
            pool: Address::ZERO,
            amount_in: U256::from(1u8),
            zero_for_one: true,
            sqrt_price_limit_x96: U256::from(1u8) << 200usize,
        };
        assert!(quote_params(&request).is_err());
    }
}
