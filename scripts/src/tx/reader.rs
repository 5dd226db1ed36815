use alloy::primitives::Address;

use crate::{
    errors::ScriptError,
    tx::{abi::ITracking, client::RpcProvider},
};

/// Get the privileged caller of the tracking contract
pub async fn get_tracking_owner(
    tracking_address: Address,
    client: RpcProvider,
) -> Result<Address, ScriptError> {
    // Build our contract
    let contract = ITracking::new(tracking_address, client);

    // Read the smart contract
    let owner = contract
        .owner()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    Ok(owner._0)
}
