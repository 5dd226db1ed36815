use std::sync::Arc;

use alloy::primitives::TxHash;
use tracing::{debug, info};

use crate::{
    config::DeploymentConfig,
    constants::MAX_ALLOWANCE,
    deploy::{ConstructorArgs, ContractDeployer, DeployedContract},
    errors::ScriptError,
    verify::{run_verification_tasks, ContractVerifier, VerificationOutcome, VerificationTask},
};

/// Result of a full deployment run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentReport {
    /// The deployed token
    pub token: DeployedContract,
    /// The deployed tracking contract, if enabled
    pub tracking: Option<DeployedContract>,
    /// Hash of the approve transaction granting the tracking owner its allowance
    pub approval: Option<TxHash>,
    /// One outcome per submitted verification, tracking first
    pub verifications: Vec<VerificationOutcome>,
}

impl DeploymentReport {
    /// Whether every submitted verification went through
    pub fn all_verified(&self) -> bool {
        self.verifications.iter().all(VerificationOutcome::is_verified)
    }
}

/// Deploy the token, then the tracking contract wired to it, then verify them.
///
/// Every step up to the verifications is awaited in order and the first error
/// aborts the run. Verifications run concurrently once everything is deployed,
/// their failures are reported but never fail the run.
pub async fn deploy_smart_contracts(
    config: &DeploymentConfig,
    deployer: &dyn ContractDeployer,
    verifier: Arc<dyn ContractVerifier>,
) -> Result<DeploymentReport, ScriptError> {
    let mut tasks: Vec<VerificationTask> = Vec::new();

    let token = deploy_token(config, deployer).await?;

    let (tracking, approval) = if config.enable_tracking {
        let tracking = deploy_tracking(config, &token, deployer).await?;
        let approval = grant_tracking_allowance(&token, &tracking, deployer).await?;

        if config.enable_verify {
            tasks.push(VerificationTask::from(&tracking));
        }
        (Some(tracking), Some(approval))
    } else {
        (None, None)
    };

    if config.enable_verify {
        tasks.push(VerificationTask::from(&token));
    }

    let verifications = run_verification_tasks(tasks, verifier).await;

    Ok(DeploymentReport {
        token,
        tracking,
        approval,
        verifications,
    })
}

/// Deploy the token with the configured name and symbol
async fn deploy_token(
    config: &DeploymentConfig,
    deployer: &dyn ContractDeployer,
) -> Result<DeployedContract, ScriptError> {
    let args = ConstructorArgs::Token {
        name: config.token_name.clone(),
        symbol: config.token_symbol.clone(),
    };
    let address = deployer.deploy(&args).await?;
    report_deployment(config, "Token", &address);

    Ok(DeployedContract { address, args })
}

/// Deploy the tracking contract on top of a deployed token
async fn deploy_tracking(
    config: &DeploymentConfig,
    token: &DeployedContract,
    deployer: &dyn ContractDeployer,
) -> Result<DeployedContract, ScriptError> {
    let args = ConstructorArgs::Tracking {
        token: token.address,
    };
    let address = deployer.deploy(&args).await?;
    report_deployment(config, "Tracking", &address);

    Ok(DeployedContract { address, args })
}

/// Let the tracking owner move an unbounded amount of the deployer's tokens
async fn grant_tracking_allowance(
    token: &DeployedContract,
    tracking: &DeployedContract,
    deployer: &dyn ContractDeployer,
) -> Result<TxHash, ScriptError> {
    let owner = deployer.tracking_owner(tracking.address).await?;
    debug!("Tracking owner: {}", owner);

    deployer.approve(token.address, owner, MAX_ALLOWANCE).await
}

/// Log where a contract landed, at `info` only when the output is shown
fn report_deployment(config: &DeploymentConfig, name: &str, address: &impl std::fmt::Display) {
    if config.show_output {
        info!("{} deployed to: {}", name, address);
    } else {
        debug!("{} deployed to: {}", name, address);
    }
}
