use std::time::Duration;

use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, Provider};
use anyhow::Result;
use log::debug;

use crate::abis::{IUniswapV3Pool, IERC20};
use crate::chain::with_timeout;
use crate::position::{PoolState, PoolStateSource};
use crate::utils::{from_base_units, ETHER_DECIMALS};

/// Balance of one token held by an account.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenBalance {
    pub symbol: String,
    pub raw: U256,
    pub decimals: u8,
}

impl TokenBalance {
    /// Balance in whole tokens.
    pub fn amount(&self) -> f64 {
        from_base_units(self.raw, self.decimals)
    }
}

/// Reads pool and token state over RPC.
#[derive(Clone)]
pub struct PoolReader {
    provider: DynProvider,
    pool: Address,
    call_timeout: Duration,
}

impl PoolReader {
    pub fn new(provider: DynProvider, pool: Address, call_timeout: Duration) -> Self {
        Self {
            provider,
            pool,
            call_timeout,
        }
    }

    pub fn pool(&self) -> Address {
        self.pool
    }

    /// In-range liquidity of the pool.
    pub async fn liquidity(&self) -> Result<u128> {
        let pool = IUniswapV3Pool::new(self.pool, &self.provider);
        let liquidity = with_timeout(self.call_timeout, "liquidity()", pool.liquidity().call()).await?;
        debug!("Pool {} liquidity {}", self.pool, liquidity);
        Ok(liquidity)
    }

    /// `(token0, token1)` addresses of the pool.
    pub async fn tokens(&self) -> Result<(Address, Address)> {
        let pool = IUniswapV3Pool::new(self.pool, &self.provider);
        let token0 = with_timeout(self.call_timeout, "token0()", pool.token0().call()).await?;
        let token1 = with_timeout(self.call_timeout, "token1()", pool.token1().call()).await?;
        Ok((token0, token1))
    }

    /// Native balance of an account, in ether.
    pub async fn native_balance(&self, account: Address) -> Result<f64> {
        let raw = with_timeout(
            self.call_timeout,
            "eth_getBalance",
            self.provider.get_balance(account),
        )
        .await?;
        Ok(from_base_units(raw, ETHER_DECIMALS))
    }

    /// ERC20 balance of an account along with the token's symbol and decimals.
    pub async fn token_balance(&self, token: Address, account: Address) -> Result<TokenBalance> {
        let contract = IERC20::new(token, &self.provider);

        let raw = with_timeout(
            self.call_timeout,
            "balanceOf()",
            contract.balanceOf(account).call(),
        )
        .await?;
        let decimals = with_timeout(self.call_timeout, "decimals()", contract.decimals().call()).await?;

        // symbol is cosmetic, some tokens don't implement it
        let symbol = tokio::time::timeout(self.call_timeout, contract.symbol().call())
            .await
            .ok()
            .and_then(|r| r.ok())
            .unwrap_or_default();

        debug!("Balance of {} in {} ({}): {}", account, token, symbol, raw);

        Ok(TokenBalance {
            symbol,
            raw,
            decimals,
        })
    }
}

impl PoolStateSource for PoolReader {
    async fn pool_state(&self) -> Result<PoolState> {
        let pool = IUniswapV3Pool::new(self.pool, &self.provider);
        let slot0 = with_timeout(self.call_timeout, "slot0()", pool.slot0().call()).await?;
        let liquidity = self.liquidity().await?;

        let state = PoolState {
            sqrt_price_x96: U256::from(slot0.sqrtPriceX96),
            tick: slot0.tick.as_i32(),
            liquidity,
        };
        debug!(
            "Pool {} at sqrtPriceX96 {} tick {}",
            self.pool, state.sqrt_price_x96, state.tick
        );

        Ok(state)
    }
}
