//! Deployment of the Token and Tracking contracts

use std::fmt::{self, Display, Formatter};

use alloy::{
    primitives::{Address, TxHash, U256},
    sol_types::SolValue,
};
use async_trait::async_trait;

use crate::{
    constants::{TOKEN_CONTRACT_NAME, TRACKING_CONTRACT_NAME},
    errors::ScriptError,
};

/// Deployment through the signing RPC client
mod deployer;
/// Ordering of the deployment steps
mod orchestrator;

pub use deployer::{compute_create_address, deploy_contract, RpcDeployer};
pub use orchestrator::{deploy_smart_contracts, DeploymentReport};

/// Constructor arguments of the contracts we deploy, the variant decides the contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructorArgs {
    /// `Token(string name, string symbol)`
    Token {
        /// Token name
        name: String,
        /// Token symbol
        symbol: String,
    },
    /// `Tracking(address token)`
    Tracking {
        /// Address of the tracked token
        token: Address,
    },
}

impl ConstructorArgs {
    /// Name of the contract these arguments construct
    pub fn contract_name(&self) -> &'static str {
        match self {
            ConstructorArgs::Token { .. } => TOKEN_CONTRACT_NAME,
            ConstructorArgs::Tracking { .. } => TRACKING_CONTRACT_NAME,
        }
    }

    /// ABI encoding of the arguments, appended to the creation bytecode
    pub fn abi_encode(&self) -> Vec<u8> {
        match self {
            ConstructorArgs::Token { name, symbol } => {
                (name.clone(), symbol.clone()).abi_encode_params()
            }
            ConstructorArgs::Tracking { token } => (*token,).abi_encode_params(),
        }
    }
}

impl Display for ConstructorArgs {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConstructorArgs::Token { name, symbol } => write!(f, "[{:?}, {:?}]", name, symbol),
            ConstructorArgs::Tracking { token } => write!(f, "[{}]", token),
        }
    }
}

/// A contract whose deployment transaction is confirmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedContract {
    /// Address assigned by the chain
    pub address: Address,
    /// Arguments it was constructed with
    pub args: ConstructorArgs,
}

impl DeployedContract {
    /// Name of the deployed contract
    pub fn name(&self) -> &'static str {
        self.args.contract_name()
    }
}

/// Everything the deployment needs from the chain
#[async_trait]
pub trait ContractDeployer: Send + Sync {
    /// Deploy the contract described by `args` and wait for its confirmation
    async fn deploy(&self, args: &ConstructorArgs) -> Result<Address, ScriptError>;

    /// Query the owner of a deployed tracking contract
    async fn tracking_owner(&self, tracking: Address) -> Result<Address, ScriptError>;

    /// Approve `spender` for `amount` of `token`, on behalf of the deployer
    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHash, ScriptError>;
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;

    #[test]
    fn tracking_args_encode_a_single_word() {
        let token = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
        let encoded = ConstructorArgs::Tracking { token }.abi_encode();

        assert_eq!(encoded.len(), 32);
        assert_eq!(&encoded[..12], &[0u8; 12]);
        assert_eq!(&encoded[12..], token.as_slice());
    }

    #[test]
    fn token_args_encode_two_dynamic_strings() {
        let encoded = ConstructorArgs::Token {
            name: "Foo".to_string(),
            symbol: "FOO".to_string(),
        }
        .abi_encode();

        // Two offsets, then (length, data) for each string
        assert_eq!(encoded.len(), 6 * 32);
        assert_eq!(U256::from_be_slice(&encoded[0..32]), U256::from(0x40));
        assert_eq!(U256::from_be_slice(&encoded[32..64]), U256::from(0x80));
        assert_eq!(U256::from_be_slice(&encoded[64..96]), U256::from(3));
        assert_eq!(&encoded[96..99], b"Foo");
        assert_eq!(U256::from_be_slice(&encoded[128..160]), U256::from(3));
        assert_eq!(&encoded[160..163], b"FOO");
    }

    #[test]
    fn contract_names_and_display() {
        let token = ConstructorArgs::Token {
            name: "Foo".to_string(),
            symbol: "FOO".to_string(),
        };
        assert_eq!(token.contract_name(), "Token");
        assert_eq!(token.to_string(), r#"["Foo", "FOO"]"#);

        let tracking = ConstructorArgs::Tracking {
            token: Address::ZERO,
        };
        assert_eq!(tracking.contract_name(), "Tracking");
    }
}
