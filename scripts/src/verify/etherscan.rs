use std::path::PathBuf;

use alloy::primitives::Address;
use async_trait::async_trait;
use json::JsonValue;
use reqwest::Client;
use tracing::debug;

use crate::{
    build::ContractArtifact,
    config::EtherscanConfig,
    constants::ETHERSCAN_HTTP_TIMEOUT,
    deploy::ConstructorArgs,
    errors::ScriptError,
    utils::to_hex_no_prefix,
    verify::ContractVerifier,
};

/// Code format of a submission made from the hardhat build info
const STANDARD_JSON_CODE_FORMAT: &str = "solidity-standard-json-input";

/// Verifies contracts through the Etherscan `verifysourcecode` API
pub struct EtherscanVerifier {
    /// HTTP client
    client: Client,
    /// API settings
    config: EtherscanConfig,
    /// Chain the contracts are deployed on
    chain_id: u64,
    /// Root of the compiled artifacts
    artifacts_dir: PathBuf,
}

/// Answer to a verification submission
#[derive(Debug, PartialEq, Eq)]
enum Submission {
    /// Queued under the given guid
    Queued(String),
    /// Nothing to do
    AlreadyVerified,
}

/// Answer to a status check
#[derive(Debug, PartialEq, Eq)]
enum VerificationStatus {
    /// Still being processed
    Pending,
    /// Source matched the deployed bytecode
    Verified,
}

impl EtherscanVerifier {
    /// Build a verifier for the contracts of `artifacts_dir`, deployed on `chain_id`
    pub fn new(
        config: EtherscanConfig,
        chain_id: u64,
        artifacts_dir: PathBuf,
    ) -> Result<Self, ScriptError> {
        let client = Client::builder()
            .timeout(ETHERSCAN_HTTP_TIMEOUT)
            .build()
            .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

        Ok(Self {
            client,
            config,
            chain_id,
            artifacts_dir,
        })
    }

    /// Submit the source of a deployed contract
    async fn submit(
        &self,
        api_key: &str,
        address: Address,
        args: &ConstructorArgs,
    ) -> Result<Submission, ScriptError> {
        let artifact = ContractArtifact::load(&self.artifacts_dir, args.contract_name())?;
        let build_info = artifact.build_info()?;

        let address = address.to_string();
        let contract_name = artifact.fully_qualified_name();
        let compiler_version = format!("v{}", build_info.solc_version);
        let constructor_args = to_hex_no_prefix(&args.abi_encode());
        let chain_id = self.chain_id.to_string();

        let response = self
            .client
            .post(&self.config.api_url)
            .query(&[("chainid", chain_id.as_str())])
            .form(&[
                ("apikey", api_key),
                ("module", "contract"),
                ("action", "verifysourcecode"),
                ("contractaddress", address.as_str()),
                ("sourceCode", build_info.input.as_str()),
                ("codeformat", STANDARD_JSON_CODE_FORMAT),
                ("contractname", contract_name.as_str()),
                ("compilerversion", compiler_version.as_str()),
                // Sic, this is the name Etherscan expects
                ("constructorArguements", constructor_args.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ScriptError::Verification(e.to_string()))?;

        let body = read_body(response).await?;
        parse_submission(&body)
    }

    /// Check where a submission stands
    async fn check_status(
        &self,
        api_key: &str,
        guid: &str,
    ) -> Result<VerificationStatus, ScriptError> {
        let chain_id = self.chain_id.to_string();

        let response = self
            .client
            .get(&self.config.api_url)
            .query(&[
                ("chainid", chain_id.as_str()),
                ("apikey", api_key),
                ("module", "contract"),
                ("action", "checkverifystatus"),
                ("guid", guid),
            ])
            .send()
            .await
            .map_err(|e| ScriptError::Verification(e.to_string()))?;

        let body = read_body(response).await?;
        parse_status(&body)
    }
}

#[async_trait]
impl ContractVerifier for EtherscanVerifier {
    async fn verify(&self, address: Address, args: &ConstructorArgs) -> Result<(), ScriptError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            ScriptError::Configuration(String::from("ETHERSCAN_API_KEY is not set"))
        })?;

        debug!("Submitting {} at {} with {}", args.contract_name(), address, args);
        let guid = match self.submit(api_key, address, args).await? {
            Submission::AlreadyVerified => return Ok(()),
            Submission::Queued(guid) => guid,
        };
        debug!("Verification queued with guid {}", guid);

        for _ in 0..self.config.max_polls {
            tokio::time::sleep(self.config.poll_interval).await;
            if self.check_status(api_key, &guid).await? == VerificationStatus::Verified {
                return Ok(());
            }
        }

        Err(ScriptError::Verification(format!(
            "verification {} still pending after {} checks",
            guid, self.config.max_polls
        )))
    }
}

/// Read the body of an API response, failing on HTTP errors
async fn read_body(response: reqwest::Response) -> Result<String, ScriptError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ScriptError::Verification(format!(
            "Etherscan API request failed: {}",
            status
        )));
    }

    response
        .text()
        .await
        .map_err(|e| ScriptError::Verification(e.to_string()))
}

/// Parse the `{ status, message, result }` envelope of every Etherscan answer
fn parse_envelope(body: &str) -> Result<(bool, String), ScriptError> {
    let parsed: JsonValue = json::parse(body).map_err(|e| {
        ScriptError::Verification(format!("invalid Etherscan response {}: {}", body, e))
    })?;

    let success = parsed["status"].as_str() == Some("1");
    let result = parsed["result"]
        .as_str()
        .or_else(|| parsed["message"].as_str())
        .unwrap_or_default()
        .to_string();

    Ok((success, result))
}

/// Interpret the answer to `verifysourcecode`
fn parse_submission(body: &str) -> Result<Submission, ScriptError> {
    let (success, result) = parse_envelope(body)?;

    if success {
        Ok(Submission::Queued(result))
    } else if is_already_verified(&result) {
        Ok(Submission::AlreadyVerified)
    } else {
        Err(ScriptError::Verification(result))
    }
}

/// Interpret the answer to `checkverifystatus`
fn parse_status(body: &str) -> Result<VerificationStatus, ScriptError> {
    let (success, result) = parse_envelope(body)?;

    if result.to_lowercase().contains("pending in queue") {
        Ok(VerificationStatus::Pending)
    } else if success || is_already_verified(&result) {
        Ok(VerificationStatus::Verified)
    } else {
        Err(ScriptError::Verification(result))
    }
}

/// Etherscan's way of saying there is nothing to do
fn is_already_verified(result: &str) -> bool {
    result.to_lowercase().contains("already verified")
}
