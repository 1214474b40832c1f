//! alloy-backed implementations of the position seams.
//!
//! Nothing here signs: transactions go out through `eth_sendTransaction`
//! from an account the node itself manages.

mod pool_reader;
mod quoter;
mod submitter;

pub use pool_reader::{PoolReader, TokenBalance};
pub use quoter::QuoterClient;
pub use submitter::ManagerSubmitter;

use std::time::Duration;

use alloy::providers::{DynProvider, ProviderBuilder};
use anyhow::{Context, Result};
use url::Url;

/// Timeout for individual RPC calls when none is configured.
pub const DEFAULT_RPC_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP provider for the given node URL.
pub fn connect(rpc_url: &str) -> Result<DynProvider> {
    let url = Url::parse(rpc_url).with_context(|| format!("Invalid RPC URL {rpc_url}"))?;
    let client = ProviderBuilder::new().connect_http(url);
    Ok(DynProvider::new(client))
}

/// Await an RPC future, failing after `timeout`.
pub(crate) async fn with_timeout<T, E, F>(timeout: Duration, what: &str, fut: F) -> Result<T>
where
    F: std::future::IntoFuture<Output = std::result::Result<T, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    tokio::time::timeout(timeout, fut)
        .await
        .with_context(|| format!("{what} timed out after {timeout:?}"))?
        .with_context(|| format!("{what} failed"))
}
