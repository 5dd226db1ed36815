use alloy::{
    network::TransactionBuilder,
    primitives::{Address, TxHash, U256},
    providers::Provider,
    rpc::types::eth::TransactionRequest,
};
use tracing::info;

use crate::{
    errors::ScriptError,
    tx::{abi::IToken::approveCall, client::RpcProvider},
};

/// Allow `spender` to move `amount` of the deployer's tokens
pub async fn send_approve(
    token: Address,
    spender: Address,
    amount: U256,
    client: RpcProvider,
) -> Result<TxHash, ScriptError> {
    // Build the tx
    let tx_request = TransactionRequest::default()
        .with_to(token)
        .with_call(&approveCall {
            spender,
            value: amount,
        })
        .with_value(U256::ZERO);

    // Send it
    let pending_tx = client
        .send_transaction(tx_request)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    info!("Pending approve transaction... {}", pending_tx.tx_hash());

    // Wait for the transaction to be included.
    let receipt = pending_tx
        .get_receipt()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    if !receipt.status() {
        return Err(ScriptError::ContractInteraction(format!(
            "approve transaction {} reverted",
            receipt.transaction_hash
        )));
    }
    info!(
        "Approve tx done on block: {}",
        receipt.block_number.unwrap_or_default()
    );

    Ok(receipt.transaction_hash)
}
