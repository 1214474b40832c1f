use anyhow::{Context, Result};
use jemallocator::Jemalloc;
use log::{info, warn};
use simple_logger::SimpleLogger;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use v3lp::{
    chain::{self, ManagerSubmitter, PoolReader, QuoterClient},
    position::{log_plan, PoolStateSource, QuoteRequest},
    utils::{format_units, ETHER_DECIMALS},
    add_liquidity, plan_liquidity, Settings,
};

#[tokio::main()]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new()
        .context("Failed to load config.yaml. Please ensure it exists and is valid")?;

    SimpleLogger::new()
        .with_level(settings.level_filter()?)
        .init()
        .context("Failed to initialize logger")?;

    tokio::select! {
        res = run(settings) => res,
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal (Ctrl+C), exiting...");
            Ok(())
        },
    }
}

async fn run(settings: Settings) -> Result<()> {
    let provider = chain::connect(&settings.rpc.url)?;
    let timeout = settings.rpc.call_timeout();
    let contracts = &settings.contracts;

    let reader = PoolReader::new(provider.clone(), contracts.pool, timeout);

    let (token0, token1) = reader.tokens().await?;
    if (token0, token1) != (contracts.token0, contracts.token1) {
        warn!(
            "Pool {} trades ({}, {}), config names ({}, {})",
            reader.pool(),
            token0,
            token1,
            contracts.token0,
            contracts.token1
        );
    }

    if let Some(sender) = settings.sender {
        let eth = reader.native_balance(sender).await?;
        info!("Account {} holds {} ETH", sender, eth);
        for token in [contracts.token0, contracts.token1] {
            let balance = reader.token_balance(token, sender).await?;
            info!(
                "Account {} holds {} {}",
                sender,
                format_units(balance.raw, balance.decimals),
                balance.symbol
            );
        }
    }

    let state = reader
        .pool_state()
        .await
        .context("Failed to read pool state")?;
    info!(
        "Pool {} at price {:.6} (tick {}), liquidity {}",
        contracts.pool,
        state.price()?,
        state.tick,
        state.liquidity
    );

    if let Some(quote) = &settings.quote {
        let request =
            QuoteRequest::new(contracts.pool, quote.amount, quote.zero_for_one, quote.price_limit)?;
        let quoter = QuoterClient::new(provider.clone(), contracts.quoter, timeout);
        let result = quoter.quote(&request).await.context("Quote failed")?;
        info!(
            "Quote: {} in -> {} out, price after {:.6} (tick {})",
            quote.amount,
            format_units(result.amount_out, ETHER_DECIMALS),
            result.price_after()?,
            result.tick_after
        );
    }

    if !settings.submit {
        let plan = plan_liquidity(&settings.position, state.sqrt_price_x96, settings.precision)
            .context("Failed to plan liquidity position")?;
        log_plan(&plan);
        info!("Dry run, set `submit: true` to send the mint");
        return Ok(());
    }

    let Some(sender) = settings.sender else {
        warn!("`submit` is set without a `sender`, nothing sent");
        return Ok(());
    };

    let submitter = ManagerSubmitter::new(provider, contracts.manager, sender, timeout);
    add_liquidity(
        &reader,
        &submitter,
        contracts.pool,
        &settings.position,
        settings.precision,
    )
    .await?;

    info!("Pool liquidity is now {}", reader.liquidity().await?);
    Ok(())
}
