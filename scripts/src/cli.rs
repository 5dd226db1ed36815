//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{deploy_contracts, verify_contracts},
    config::DeploymentConfig,
    constants::{DEFAULT_ARTIFACTS_DIR, DEFAULT_TOKEN_NAME, DEFAULT_TOKEN_SYMBOL},
    errors::ScriptError,
    tx::client::RpcProvider,
};

/// Scripts for deploying & verifying the Innova Token and Tracking contracts
#[derive(Parser)]
pub struct Cli {
    /// Private key of the deployer, defaults to the `PRIVATE_KEY` env variable
    #[arg(short, long)]
    pub priv_key: Option<String>,

    /// Network RPC URL, defaults to the `RPC_URL` env variable
    #[arg(short, long)]
    pub rpc_url: Option<String>,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The possible CLI commands
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the token, the tracking contract, and verify them
    DeployContracts(DeployContractsArgs),
    /// Verify already deployed contracts
    VerifyContracts(VerifyContractsArgs),
}

impl Command {
    /// Run the command
    pub async fn run(self, client: RpcProvider) -> Result<(), ScriptError> {
        match self {
            Command::DeployContracts(args) => deploy_contracts(args, client).await,
            Command::VerifyContracts(args) => verify_contracts(args, client).await,
        }
    }
}

/// Deploy contracts
#[derive(Args)]
pub struct DeployContractsArgs {
    /// Name of the token
    #[arg(long, default_value = DEFAULT_TOKEN_NAME)]
    pub token_name: String,
    /// Symbol of the token
    #[arg(long, default_value = DEFAULT_TOKEN_SYMBOL)]
    pub token_symbol: String,
    /// Only deploy the token
    #[arg(long)]
    pub no_tracking: bool,
    /// Don't print the deployed addresses
    #[arg(short, long)]
    pub quiet: bool,
    /// Skip the explorer verification
    #[arg(long)]
    pub no_verify: bool,
    /// Directory holding the hardhat artifacts
    #[arg(short, long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts: PathBuf,
}

impl DeployContractsArgs {
    /// The deployment these arguments describe
    pub fn config(&self) -> DeploymentConfig {
        DeploymentConfig {
            token_name: self.token_name.clone(),
            token_symbol: self.token_symbol.clone(),
            enable_tracking: !self.no_tracking,
            show_output: !self.quiet,
            enable_verify: !self.no_verify,
        }
    }
}

/// Verify contracts
#[derive(Args)]
pub struct VerifyContractsArgs {
    /// Address of the deployed token
    #[arg(long)]
    pub token: String,
    /// Address of the deployed tracking contract
    #[arg(long)]
    pub tracking: Option<String>,
    /// Name the token was deployed with
    #[arg(long, default_value = DEFAULT_TOKEN_NAME)]
    pub token_name: String,
    /// Symbol the token was deployed with
    #[arg(long, default_value = DEFAULT_TOKEN_SYMBOL)]
    pub token_symbol: String,
    /// Directory holding the hardhat artifacts
    #[arg(short, long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts: PathBuf,
}
