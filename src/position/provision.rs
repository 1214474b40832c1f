use std::future::Future;

use alloy::primitives::{Address, B256, U256};
use anyhow::{Context, Result};
use log::info;

use crate::position::plan::{plan_liquidity, LiquidityPlan, MintRequest, PoolState, PositionRequest};
use crate::utils::{format_units, Precision, ETHER_DECIMALS};

/// Source of the pool's current on-chain state.
pub trait PoolStateSource {
    fn pool_state(&self) -> impl Future<Output = Result<PoolState>> + Send;
}

/// Takes a mint request and gets it executed.
pub trait LiquiditySink {
    fn submit_mint(&self, request: &MintRequest) -> impl Future<Output = Result<MintReceipt>> + Send;
}

/// What a successful mint reported back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintReceipt {
    pub tx_hash: B256,
    /// Liquidity minted, from the pool's `Mint` event (0 if not found).
    pub liquidity: u128,
    pub amount0: U256,
    pub amount1: U256,
}

/// Read the pool, plan the position at its current price, and submit it.
pub async fn add_liquidity<S, K>(
    source: &S,
    sink: &K,
    pool: Address,
    request: &PositionRequest,
    precision: Precision,
) -> Result<(LiquidityPlan, MintReceipt)>
where
    S: PoolStateSource + Sync,
    K: LiquiditySink + Sync,
{
    let state = source.pool_state().await.context("Failed to read pool state")?;

    let plan = plan_liquidity(request, state.sqrt_price_x96, precision)
        .context("Failed to plan liquidity position")?;
    log_plan(&plan);

    let receipt = sink
        .submit_mint(&plan.mint_request(pool))
        .await
        .context("Failed to submit mint")?;

    info!(
        "Minted liquidity {} in tx {}: amount0 {} amount1 {}",
        receipt.liquidity,
        receipt.tx_hash,
        format_units(receipt.amount0, ETHER_DECIMALS),
        format_units(receipt.amount1, ETHER_DECIMALS),
    );

    Ok((plan, receipt))
}

/// Log a plan in human units.
pub fn log_plan(plan: &LiquidityPlan) {
    info!(
        "Position ticks [{}, {}], sqrtPriceX96 lower {} current {} upper {}",
        plan.lower_tick,
        plan.upper_tick,
        plan.sqrt_price_lower,
        plan.sqrt_price_current,
        plan.sqrt_price_upper
    );
    if let Ok((lower, upper)) = plan.tick_prices() {
        info!("Ticks stand for prices [{:.6}, {:.6}]", lower, upper);
    }
    info!(
        "Liquidity {} uses amount0 {} of {} and amount1 {} of {}",
        plan.liquidity,
        format_units(plan.amounts.amount_token0, ETHER_DECIMALS),
        format_units(plan.deposit0, ETHER_DECIMALS),
        format_units(plan.amounts.amount_token1, ETHER_DECIMALS),
        format_units(plan.deposit1, ETHER_DECIMALS),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::sqrt_price_q96_from_price;
    use anyhow::anyhow;
    use std::sync::Mutex;

    struct FixedPool {
        state: PoolState,
    }

    impl PoolStateSource for FixedPool {
        async fn pool_state(&self) -> Result<PoolState> {
            Ok(self.state)
        }
    }

    struct FailingPool;

    impl PoolStateSource for FailingPool {
        async fn pool_state(&self) -> Result<PoolState> {
            Err(anyhow!("node unreachable"))
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        submitted: Mutex<Vec<MintRequest>>,
    }

    impl LiquiditySink for RecordingSink {
        async fn submit_mint(&self, request: &MintRequest) -> Result<MintReceipt> {
            self.submitted.lock().unwrap().push(*request);
            Ok(MintReceipt {
                tx_hash: B256::repeat_byte(0xab),
                liquidity: 42,
                amount0: request.amount0_desired,
                amount1: request.amount1_desired,
            })
        }
    }

    fn pool_at(price: f64) -> FixedPool {
        FixedPool {
            state: PoolState {
                sqrt_price_x96: sqrt_price_q96_from_price(price).unwrap(),
                tick: 0,
                liquidity: 0,
            },
        }
    }

    fn reference_request() -> PositionRequest {
        PositionRequest {
            lower_price: 4545.0,
            upper_price: 5500.0,
            amount0: 5000.0,
            amount1: 1.0,
        }
    }

    #[tokio::test]
    async fn test_add_liquidity_submits_planned_mint() {
        let source = pool_at(5000.0);
        let sink = RecordingSink::default();
        let pool = Address::repeat_byte(0x33);

        let (plan, receipt) =
            add_liquidity(&source, &sink, pool, &reference_request(), Precision::Exact)
                .await
                .unwrap();

        let submitted = sink.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0], plan.mint_request(pool));
        assert_eq!(submitted[0].lower_tick, 84222);
        assert_eq!(submitted[0].upper_tick, 86129);
        assert_eq!(receipt.tx_hash, B256::repeat_byte(0xab));
    }

    #[tokio::test]
    async fn test_add_liquidity_skips_submit_when_price_out_of_range() {
        let source = pool_at(6000.0);
        let sink = RecordingSink::default();

        let res = add_liquidity(
            &source,
            &sink,
            Address::ZERO,
            &reference_request(),
            Precision::Exact,
        )
        .await;

        assert!(res.is_err());
        assert!(sink.submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_liquidity_propagates_source_failure() {
        let sink = RecordingSink::default();
        let err = add_liquidity(
            &FailingPool,
            &sink,
            Address::ZERO,
            &reference_request(),
            Precision::Exact,
        )
        .await
        .unwrap_err();

        assert!(format!("{err:#}").contains("node unreachable"));
        assert!(sink.submitted.lock().unwrap().is_empty());
    }
}
