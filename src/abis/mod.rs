pub mod erc20;
pub mod manager;
pub mod quoter;
pub mod v3;

pub use erc20::IERC20;
pub use manager::{IUniswapV3Manager, MintParams};
pub use quoter::{IUniswapV3Quoter, QuoteParams};
pub use v3::{IUniswapV3Pool, Mint as V3Mint};
