//! Runtime configuration of the deploy scripts

use std::{env, time::Duration};

use crate::constants::{
    DEFAULT_ETHERSCAN_API_URL, DEFAULT_TOKEN_NAME, DEFAULT_TOKEN_SYMBOL, VERIFY_MAX_POLLS,
    VERIFY_POLL_INTERVAL,
};

/// What to deploy, and what to do once deployed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentConfig {
    /// Name given to the token
    pub token_name: String,
    /// Symbol given to the token
    pub token_symbol: String,
    /// Deploy the tracking contract on top of the token
    pub enable_tracking: bool,
    /// Log the deployed addresses at info level
    pub show_output: bool,
    /// Submit the deployed contracts to the block explorer
    pub enable_verify: bool,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            token_name: DEFAULT_TOKEN_NAME.to_string(),
            token_symbol: DEFAULT_TOKEN_SYMBOL.to_string(),
            enable_tracking: true,
            show_output: true,
            enable_verify: true,
        }
    }
}

/// Settings for the Etherscan verification API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtherscanConfig {
    /// Endpoint of the verification API
    pub api_url: String,
    /// API key, mandatory as soon as a verification is submitted
    pub api_key: Option<String>,
    /// Delay between two status checks of a submitted verification
    pub poll_interval: Duration,
    /// Max number of status checks for a single submission
    pub max_polls: u32,
}

impl Default for EtherscanConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_ETHERSCAN_API_URL.to_string(),
            api_key: None,
            poll_interval: VERIFY_POLL_INTERVAL,
            max_polls: VERIFY_MAX_POLLS,
        }
    }
}

impl EtherscanConfig {
    /// Read `ETHERSCAN_API_URL` and `ETHERSCAN_API_KEY` from the environment
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: non_empty_var("ETHERSCAN_API_URL").unwrap_or(defaults.api_url),
            api_key: non_empty_var("ETHERSCAN_API_KEY"),
            ..defaults
        }
    }
}

/// Read an env var, treating an empty value as unset
pub(crate) fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_bootstrap() {
        let config = DeploymentConfig::default();
        assert_eq!(config.token_name, "InnovaTkn");
        assert_eq!(config.token_symbol, "INN");
        assert!(config.enable_tracking);
        assert!(config.show_output);
        assert!(config.enable_verify);
    }

    #[test]
    fn etherscan_defaults() {
        let config = EtherscanConfig::default();
        assert_eq!(config.api_url, DEFAULT_ETHERSCAN_API_URL);
        assert!(config.api_key.is_none());
        assert_eq!(config.max_polls, VERIFY_MAX_POLLS);
    }
}
