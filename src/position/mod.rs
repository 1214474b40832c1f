//! Turning a human position request into a mint, and the seams to the chain.

pub mod plan;
pub mod provision;

pub use plan::{
    plan_liquidity, LiquidityPlan, MintRequest, PoolState, PositionRequest, QuoteRequest,
    QuoteResult,
};
pub use provision::{add_liquidity, log_plan, LiquiditySink, MintReceipt, PoolStateSource};
