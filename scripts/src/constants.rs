//! Constants used in the deploy scripts

use std::time::Duration;

use alloy::primitives::U256;

/// Default PRC endpoints
pub const DEFAULT_RPC: &str = "https://sepolia-rollup.arbitrum.io/rpc";

/// Default directory holding the compiled Hardhat artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// Sub directory of the artifacts dir holding the per-source artifacts
pub const CONTRACTS_PATH_SEGMENT: &str = "contracts";

/// Name of the token contract, as found in the artifacts
pub const TOKEN_CONTRACT_NAME: &str = "Token";

/// Name of the tracking contract, as found in the artifacts
pub const TRACKING_CONTRACT_NAME: &str = "Tracking";

/// Default token name
pub const DEFAULT_TOKEN_NAME: &str = "InnovaTkn";

/// Default token symbol
pub const DEFAULT_TOKEN_SYMBOL: &str = "INN";

/// Allowance granted to the tracking owner on the token
pub const MAX_ALLOWANCE: U256 = U256::MAX;

/// Etherscan v2 multichain API endpoint
pub const DEFAULT_ETHERSCAN_API_URL: &str = "https://api.etherscan.io/v2/api";

/// Delay between two verification status checks
pub const VERIFY_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Number of status checks before giving up on a pending verification
pub const VERIFY_MAX_POLLS: u32 = 20;

/// Timeout applied to every Etherscan HTTP request
pub const ETHERSCAN_HTTP_TIMEOUT: Duration = Duration::from_secs(30);
