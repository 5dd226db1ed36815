use std::path::PathBuf;

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, TxHash, U256},
    providers::{Provider, WalletProvider},
    rpc::types::eth::TransactionRequest,
};
use async_trait::async_trait;
use ethers::{types::H160, utils::get_contract_address};
use tracing::{debug, info, warn};

use crate::{
    build::ContractArtifact,
    deploy::{ConstructorArgs, ContractDeployer},
    errors::ScriptError,
    tx::{client::RpcProvider, reader::get_tracking_owner, sender::send_approve},
};

/// Deploys the hardhat artifacts of `artifacts_dir` through the signing RPC client
pub struct RpcDeployer {
    /// Signing client
    client: RpcProvider,
    /// Root of the compiled artifacts
    artifacts_dir: PathBuf,
}

impl RpcDeployer {
    /// Build a new deployer
    pub fn new(client: RpcProvider, artifacts_dir: PathBuf) -> Self {
        Self {
            client,
            artifacts_dir,
        }
    }
}

#[async_trait]
impl ContractDeployer for RpcDeployer {
    async fn deploy(&self, args: &ConstructorArgs) -> Result<Address, ScriptError> {
        let artifact = ContractArtifact::load(&self.artifacts_dir, args.contract_name())?;
        deploy_contract(&artifact, args, self.client.clone()).await
    }

    async fn tracking_owner(&self, tracking: Address) -> Result<Address, ScriptError> {
        get_tracking_owner(tracking, self.client.clone()).await
    }

    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHash, ScriptError> {
        send_approve(token, spender, amount, self.client.clone()).await
    }
}

/// Deploy a compiled contract with the given constructor arguments
pub async fn deploy_contract(
    artifact: &ContractArtifact,
    args: &ConstructorArgs,
    client: RpcProvider,
) -> Result<Address, ScriptError> {
    // Predict the contract address
    let expected_address = predict_contract_address(client.clone()).await?;
    debug!(
        "Deploying {} with {} (expected at {})",
        artifact.contract_name, args, expected_address
    );

    // Creation code followed by the encoded constructor arguments
    let mut deploy_code = artifact.bytecode.to_vec();
    deploy_code.extend_from_slice(&args.abi_encode());

    let tx_request = TransactionRequest::default().with_deploy_code(deploy_code);

    let pending_tx = client
        .send_transaction(tx_request)
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;
    info!(
        "Pending {} deployment... {}",
        artifact.contract_name,
        pending_tx.tx_hash()
    );

    // Wait for the deployment to be included
    let receipt = pending_tx
        .get_receipt()
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

    if !receipt.status() {
        return Err(ScriptError::ContractDeployment(format!(
            "{} deployment {} reverted",
            artifact.contract_name, receipt.transaction_hash
        )));
    }

    let contract_address = receipt.contract_address.ok_or_else(|| {
        ScriptError::ContractDeployment(format!(
            "no contract address in the receipt of {}",
            receipt.transaction_hash
        ))
    })?;

    // Another transaction from the deployer got in between
    if contract_address != expected_address {
        warn!(
            "{} deployed at {} instead of the predicted {}",
            artifact.contract_name, contract_address, expected_address
        );
    }

    Ok(contract_address)
}

/// Predict the address of the next contract deployed by the client signer
async fn predict_contract_address(client: RpcProvider) -> Result<Address, ScriptError> {
    // Get signer
    let signer = client.default_signer_address();

    // Get the signer nonce
    let signer_nonce = client
        .get_transaction_count(signer)
        .await
        .map_err(|e| ScriptError::NonceFetching(e.to_string()))?;

    Ok(compute_create_address(signer, signer_nonce))
}

/// Address of a contract created by `deployer` at `nonce`, i.e. `keccak256(rlp([deployer, nonce]))[12..]`
pub fn compute_create_address(deployer: Address, nonce: u64) -> Address {
    let predicted = get_contract_address(H160::from_slice(deployer.as_slice()), nonce);
    Address::from_slice(predicted.as_bytes())
}
