use std::time::Duration;

use alloy::network::ReceiptResponse;
use alloy::primitives::aliases::I24;
use alloy::primitives::{Address, U256};
use alloy::providers::DynProvider;
use anyhow::{anyhow, bail, Result};
use log::{error, info, warn};

use crate::abis::{IUniswapV3Manager, MintParams, V3Mint};
use crate::chain::with_timeout;
use crate::position::{LiquiditySink, MintReceipt, MintRequest};

/// How long to wait for a sent transaction to be mined.
const RECEIPT_TIMEOUT: Duration = Duration::from_secs(120);

/// Sends `mint` to the manager contract from a node-managed account.
#[derive(Clone)]
pub struct ManagerSubmitter {
    provider: DynProvider,
    manager: Address,
    sender: Address,
    call_timeout: Duration,
}

impl ManagerSubmitter {
    pub fn new(
        provider: DynProvider,
        manager: Address,
        sender: Address,
        call_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            manager,
            sender,
            call_timeout,
        }
    }

    /// Replay a failed mint as a call to surface the revert reason.
    async fn revert_reason(&self, params: MintParams) -> String {
        let manager = IUniswapV3Manager::new(self.manager, &self.provider);
        match manager.mint(params).from(self.sender).call().await {
            Ok(_) => "no revert when replayed".to_string(),
            Err(e) => e.to_string(),
        }
    }
}

impl LiquiditySink for ManagerSubmitter {
    async fn submit_mint(&self, request: &MintRequest) -> Result<MintReceipt> {
        let params = mint_params(request)?;
        let manager = IUniswapV3Manager::new(self.manager, &self.provider);

        // a mint that would revert fails here, before anything is sent
        let gas = with_timeout(
            self.call_timeout,
            "mint() gas estimate",
            manager.mint(params.clone()).from(self.sender).estimate_gas(),
        )
        .await?;

        let pending = with_timeout(
            self.call_timeout,
            "mint() send",
            manager.mint(params.clone()).from(self.sender).gas(gas).send(),
        )
        .await?;
        let tx_hash = *pending.tx_hash();

        info!(
            "Sent mint tx {}, from: {} to: {}, gas: {}",
            tx_hash, self.sender, self.manager, gas
        );

        let receipt = with_timeout(RECEIPT_TIMEOUT, "mint() receipt", pending.get_receipt()).await?;

        if !receipt.status() {
            let reason = self.revert_reason(params).await;
            error!("Transaction {} reverted, reason: {}", tx_hash, reason);
            bail!("mint transaction {tx_hash} reverted: {reason}");
        }

        let minted = receipt
            .inner
            .logs()
            .iter()
            .find_map(|log| log.log_decode::<V3Mint>().ok())
            .map(|log| log.inner.data);

        let receipt = match minted {
            Some(event) => {
                info!(
                    "Mint event: owner {} ticks [{}, {}] liquidity {} amount0 {} amount1 {}",
                    event.owner,
                    event.tickLower,
                    event.tickUpper,
                    event.amount,
                    event.amount0,
                    event.amount1
                );
                MintReceipt {
                    tx_hash,
                    liquidity: event.amount,
                    amount0: event.amount0,
                    amount1: event.amount1,
                }
            },
            None => {
                warn!("No Mint event in receipt of {}", tx_hash);
                MintReceipt {
                    tx_hash,
                    liquidity: 0,
                    amount0: U256::ZERO,
                    amount1: U256::ZERO,
                }
            },
        };

        Ok(receipt)
    }
}

fn mint_params(request: &MintRequest) -> Result<MintParams> {
    let lower_tick = I24::try_from(request.lower_tick)
        .map_err(|_| anyhow!("lower tick {} does not fit in int24", request.lower_tick))?;
    let upper_tick = I24::try_from(request.upper_tick)
        .map_err(|_| anyhow!("upper tick {} does not fit in int24", request.upper_tick))?;

    Ok(MintParams {
        poolAddress: request.pool,
        lowerTick: lower_tick,
        upperTick: upper_tick,
        amount0Desired: request.amount0_desired,
        amount1Desired: request.amount1_desired,
        amount0Min: request.amount0_min,
        amount1Min: request.amount1_min,
    })
}
