use alloy::primitives::{Address, U256};
use serde::Deserialize;

use crate::utils::{
    compute_amounts_with, compute_liquidity_with, ether_to_wei, price_from_sqrt_price_q96,
    price_from_tick, sqrt_price_q96_from_price, tick_from_price, validate_amount,
    validate_price_range, AmountPair, MathError, MathResult, Precision,
};

/// Snapshot of the pool fields the planner needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolState {
    pub sqrt_price_x96: U256,
    pub tick: i32,
    pub liquidity: u128,
}

impl PoolState {
    /// Current price, token0 per token1.
    pub fn price(&self) -> MathResult<f64> {
        price_from_sqrt_price_q96(self.sqrt_price_x96)
    }
}

/// What the user wants to deposit, in whole tokens, and over which prices.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PositionRequest {
    pub lower_price: f64,
    pub upper_price: f64,
    /// token0 (USDC) to deposit
    pub amount0: f64,
    /// token1 (ETH) to deposit
    pub amount1: f64,
}

/// Everything derived from a [`PositionRequest`] at a given pool price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityPlan {
    pub lower_tick: i32,
    pub upper_tick: i32,
    pub sqrt_price_lower: U256,
    pub sqrt_price_current: U256,
    pub sqrt_price_upper: U256,
    /// Deposits in base units, token0 then token1.
    pub deposit0: U256,
    pub deposit1: U256,
    pub liquidity: U256,
    /// What `liquidity` actually commits; never above the deposits in
    /// [`Precision::Exact`].
    pub amounts: AmountPair,
}

impl LiquidityPlan {
    /// Arguments for the manager's `mint`: desired amounts are the full
    /// deposits, minimums are zero.
    pub fn mint_request(&self, pool: Address) -> MintRequest {
        MintRequest {
            pool,
            lower_tick: self.lower_tick,
            upper_tick: self.upper_tick,
            amount0_desired: self.deposit0,
            amount1_desired: self.deposit1,
            amount0_min: U256::ZERO,
            amount1_min: U256::ZERO,
        }
    }

    /// Prices the two ticks stand for, which sit at or just below the
    /// requested bounds.
    pub fn tick_prices(&self) -> MathResult<(f64, f64)> {
        Ok((price_from_tick(self.lower_tick)?, price_from_tick(self.upper_tick)?))
    }
}

/// Plan a position for a pool whose current sqrt price is `sqrt_price_current`.
pub fn plan_liquidity(
    request: &PositionRequest,
    sqrt_price_current: U256,
    precision: Precision,
) -> MathResult<LiquidityPlan> {
    let current_price = price_from_sqrt_price_q96(sqrt_price_current)?;
    validate_price_range(request.lower_price, current_price, request.upper_price)?;
    validate_amount(request.amount0)?;
    validate_amount(request.amount1)?;

    let lower_tick = tick_from_price(request.lower_price)?;
    let upper_tick = tick_from_price(request.upper_price)?;
    if lower_tick >= upper_tick {
        return Err(MathError::Domain("price range is narrower than one tick"));
    }

    let sqrt_price_lower = sqrt_price_q96_from_price(request.lower_price)?;
    let sqrt_price_upper = sqrt_price_q96_from_price(request.upper_price)?;

    let deposit0 = ether_to_wei(request.amount0)?;
    let deposit1 = ether_to_wei(request.amount1)?;

    let liquidity = compute_liquidity_with(
        precision,
        deposit0,
        deposit1,
        sqrt_price_lower,
        sqrt_price_current,
        sqrt_price_upper,
    )?;
    let amounts = compute_amounts_with(
        precision,
        liquidity,
        sqrt_price_lower,
        sqrt_price_current,
        sqrt_price_upper,
    )?;

    Ok(LiquidityPlan {
        lower_tick,
        upper_tick,
        sqrt_price_lower,
        sqrt_price_current,
        sqrt_price_upper,
        deposit0,
        deposit1,
        liquidity,
        amounts,
    })
}

/// Arguments of the manager's `mint` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintRequest {
    pub pool: Address,
    pub lower_tick: i32,
    pub upper_tick: i32,
    pub amount0_desired: U256,
    pub amount1_desired: U256,
    pub amount0_min: U256,
    pub amount1_min: U256,
}

/// Swap quote against a pool, with a price limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteRequest {
    pub pool: Address,
    pub amount_in: U256,
    pub zero_for_one: bool,
    pub sqrt_price_limit_x96: U256,
}

impl QuoteRequest {
    /// `amount` is in whole tokens of the input side, `price_limit` in
    /// token0 per token1.
    pub fn new(pool: Address, amount: f64, zero_for_one: bool, price_limit: f64) -> MathResult<Self> {
        Ok(Self {
            pool,
            amount_in: ether_to_wei(amount)?,
            zero_for_one,
            sqrt_price_limit_x96: sqrt_price_q96_from_price(price_limit)?,
        })
    }
}

/// Outcome of a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteResult {
    pub amount_out: U256,
    pub sqrt_price_x96_after: U256,
    pub tick_after: i32,
}

impl QuoteResult {
    pub fn price_after(&self) -> MathResult<f64> {
        price_from_sqrt_price_q96(self.sqrt_price_x96_after)
    }
}
