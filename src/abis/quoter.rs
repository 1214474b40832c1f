use alloy::sol;

sol! {
    struct QuoteParams {
        address pool;
        uint256 amountIn;
        bool zeroForOne;
        uint160 sqrtPriceLimitX96;
    }

    #[sol(rpc)]
    interface IUniswapV3Quoter {
        function quote(QuoteParams memory params) external returns (uint256 amountOut, uint160 sqrtPriceX96After, int24 tickAfter);
    }
}
