use alloy::sol;

sol! {
#[sol(rpc)]
interface IToken {
    function approve(address spender, uint256 value) external returns (bool);
}

#[sol(rpc)]
interface ITracking {
    function owner() external view returns (address);
}

}
