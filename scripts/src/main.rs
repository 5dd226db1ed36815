use std::process::ExitCode;

use clap::Parser;
use dotenv::dotenv;
use scripts::{cli::Cli, tx::client::create_rpc_provider};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file
    dotenv().ok();

    let Cli {
        priv_key,
        rpc_url,
        command,
    } = Cli::parse();

    tracing_subscriber::fmt().pretty().init();

    // Build our RPC client with signer
    let result = match create_rpc_provider(rpc_url.as_deref(), priv_key.as_deref()).await {
        Ok(client) => command.run(client).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
