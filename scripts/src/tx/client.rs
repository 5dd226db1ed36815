use std::str::FromStr;

use alloy::{
    network::{Ethereum, EthereumWallet},
    providers::{
        fillers::{ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller, WalletFiller},
        Identity, Provider, ProviderBuilder, ReqwestProvider,
    },
    signers::local::PrivateKeySigner,
};
use reqwest::{Client, Url};
use tracing::info;

use crate::{config::non_empty_var, constants::DEFAULT_RPC, errors::ScriptError};

/// Re-export from alloy recommend filter
type RecommendFiller =
    JoinFill<JoinFill<JoinFill<Identity, GasFiller>, NonceFiller>, ChainIdFiller>;

/// An alloy provider that uses a local private key to sign transactions
/// & interfaces with the RPC endpoint over HTTP
pub type RpcProvider = FillProvider<
    JoinFill<RecommendFiller, WalletFiller<EthereumWallet>>,
    ReqwestProvider,
    alloy::transports::http::Http<Client>,
    Ethereum,
>;

/// Build the signing RPC client.
///
/// The private key and RPC url given on the command line take precedence over
/// the `PRIVATE_KEY` and `RPC_URL` env variables, the RPC url finally falls back
/// to [`DEFAULT_RPC`].
pub async fn create_rpc_provider(
    rpc_url: Option<&str>,
    priv_key: Option<&str>,
) -> Result<RpcProvider, ScriptError> {
    let private_key = match priv_key {
        Some(key) => key.to_string(),
        None => non_empty_var("PRIVATE_KEY").ok_or_else(|| {
            ScriptError::ClientInitialization(String::from("no private key provided"))
        })?,
    };
    // Create our signer
    let signer = PrivateKeySigner::from_str(private_key.trim())
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    info!("Deployer address: {}", signer.address());

    let wallet = EthereumWallet::from(signer);

    let rpc_url = rpc_url
        .map(str::to_string)
        .or_else(|| non_empty_var("RPC_URL"))
        .unwrap_or_else(|| DEFAULT_RPC.to_string());
    let rpc_url = rpc_url
        .parse::<Url>()
        .map_err(|e| ScriptError::ClientInitialization(format!("invalid rpc url: {}", e)))?;

    // Create our provider with the rpc client + signer
    let provider = ProviderBuilder::new()
        .with_recommended_fillers()
        .wallet(wallet)
        .on_http(rpc_url);

    // Fetch chain id
    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    info!("Build client on chain ID: {}", chain_id);

    Ok(provider)
}
