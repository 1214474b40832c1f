//! Uniswap V3 concentrated-liquidity math, and the glue to plan and mint a
//! position against a pool on a local node.
//!
//! - [`utils`] - the pure math: prices, sqrtPriceX96, ticks, liquidity
//! - [`position`] - position planning and the pool/mint seams
//! - [`chain`] - alloy implementations of those seams
//! - [`abis`] - contract bindings

pub mod abis;
pub mod chain;
pub mod config;
pub mod position;
pub mod utils;

pub use config::Settings;
pub use position::{add_liquidity, plan_liquidity, LiquidityPlan, PositionRequest};
pub use utils::{MathError, Precision};
