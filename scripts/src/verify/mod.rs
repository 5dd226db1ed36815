//! Source verification of the deployed contracts on the block explorer

use std::sync::Arc;

use alloy::primitives::Address;
use async_trait::async_trait;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::{
    deploy::{ConstructorArgs, DeployedContract},
    errors::ScriptError,
};

/// Etherscan API client
mod etherscan;

pub use etherscan::EtherscanVerifier;

/// Submits a deployed contract for source verification
#[async_trait]
pub trait ContractVerifier: Send + Sync {
    /// Verify the contract at `address`, constructed with `args`
    async fn verify(&self, address: Address, args: &ConstructorArgs) -> Result<(), ScriptError>;
}

/// A pending verification, captured once its contract is deployed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationTask {
    /// Address of the deployed contract
    pub address: Address,
    /// Arguments the contract was constructed with
    pub args: ConstructorArgs,
}

impl From<&DeployedContract> for VerificationTask {
    fn from(contract: &DeployedContract) -> Self {
        Self {
            address: contract.address,
            args: contract.args.clone(),
        }
    }
}

/// How a verification task settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationOutcome {
    /// Name of the verified contract
    pub contract: &'static str,
    /// Address of the verified contract
    pub address: Address,
    /// Success, or the reason of the failure
    pub result: Result<(), ScriptError>,
}

impl VerificationOutcome {
    /// Whether the explorer accepted the contract
    pub fn is_verified(&self) -> bool {
        self.result.is_ok()
    }
}

/// Run every task concurrently and wait for all of them to settle.
///
/// Outcomes come back in the order of `tasks`. A failing, or even panicking,
/// task only settles its own outcome.
pub async fn run_verification_tasks(
    tasks: Vec<VerificationTask>,
    verifier: Arc<dyn ContractVerifier>,
) -> Vec<VerificationOutcome> {
    let handles = tasks
        .into_iter()
        .map(|task| {
            let verifier = verifier.clone();
            let contract = task.args.contract_name();
            let span = info_span!("verify", contract);
            let handle = tokio::spawn(
                async move { verifier.verify(task.address, &task.args).await }.instrument(span),
            );
            (contract, task.address, handle)
        })
        .collect::<Vec<_>>();

    let mut outcomes = Vec::with_capacity(handles.len());
    for (contract, address, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(ScriptError::Verification(format!(
                "verification task aborted: {}",
                e
            ))),
        };

        match &result {
            Ok(()) => {
                info!("{} verified", contract);
                debug!("{} verified at {}", contract, address);
            }
            Err(e) => warn!("{} at {} not verified: {}", contract, address, e),
        }

        outcomes.push(VerificationOutcome {
            contract,
            address,
            result,
        });
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use std::{sync::Mutex, time::Duration};

    use super::*;

    /// Fails for `failing`, panics for `panicking`, records every call
    #[derive(Default)]
    struct ScriptedVerifier {
        failing: Option<Address>,
        panicking: Option<Address>,
        calls: Mutex<Vec<Address>>,
    }

    #[async_trait]
    impl ContractVerifier for ScriptedVerifier {
        async fn verify(
            &self,
            address: Address,
            _args: &ConstructorArgs,
        ) -> Result<(), ScriptError> {
            self.calls.lock().unwrap().push(address);
            // Let the sibling task get scheduled
            tokio::time::sleep(Duration::from_millis(10)).await;
            if self.panicking == Some(address) {
                panic!("explorer exploded");
            }
            if self.failing == Some(address) {
                return Err(ScriptError::Verification("explorer unavailable".to_string()));
            }
            Ok(())
        }
    }

    fn tasks() -> Vec<VerificationTask> {
        vec![
            VerificationTask {
                address: Address::repeat_byte(0x22),
                args: ConstructorArgs::Tracking {
                    token: Address::repeat_byte(0x11),
                },
            },
            VerificationTask {
                address: Address::repeat_byte(0x11),
                args: ConstructorArgs::Token {
                    name: "Foo".to_string(),
                    symbol: "FOO".to_string(),
                },
            },
        ]
    }

    #[tokio::test]
    async fn no_tasks_no_calls() {
        let verifier = Arc::new(ScriptedVerifier::default());
        let outcomes = run_verification_tasks(Vec::new(), verifier.clone()).await;

        assert!(outcomes.is_empty());
        assert!(verifier.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failure_is_isolated() {
        let verifier = Arc::new(ScriptedVerifier {
            failing: Some(Address::repeat_byte(0x22)),
            ..Default::default()
        });
        let outcomes = run_verification_tasks(tasks(), verifier.clone()).await;

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].contract, "Tracking");
        assert!(!outcomes[0].is_verified());
        assert_eq!(outcomes[1].contract, "Token");
        assert!(outcomes[1].is_verified());
        assert_eq!(verifier.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn panic_is_isolated() {
        let verifier = Arc::new(ScriptedVerifier {
            panicking: Some(Address::repeat_byte(0x11)),
            ..Default::default()
        });
        let outcomes = run_verification_tasks(tasks(), verifier).await;

        assert!(outcomes[0].is_verified());
        assert!(matches!(
            outcomes[1].result,
            Err(ScriptError::Verification(_))
        ));
    }
}
