#[allow(clippy::module_inception)]
mod config;

pub use config::{ContractSettings, QuoteSettings, RpcSettings, Settings};
