use alloy::sol;

sol! {
    struct MintParams {
        address poolAddress;
        int24 lowerTick;
        int24 upperTick;
        uint256 amount0Desired;
        uint256 amount1Desired;
        uint256 amount0Min;
        uint256 amount1Min;
    }

    #[sol(rpc)]
    interface IUniswapV3Manager {
        function mint(MintParams calldata params) external returns (uint256 amount0, uint256 amount1);
    }
}
