//! Bodies of the CLI commands

use std::{path::Path, sync::Arc};

use alloy::{primitives::Address, providers::Provider};
use tracing::{debug, info, warn};

use crate::{
    cli::{DeployContractsArgs, VerifyContractsArgs},
    config::EtherscanConfig,
    deploy::{deploy_smart_contracts, ConstructorArgs, DeploymentReport, RpcDeployer},
    errors::ScriptError,
    tx::client::RpcProvider,
    verify::{run_verification_tasks, EtherscanVerifier, VerificationOutcome, VerificationTask},
};

/// Deploy the token and tracking contracts
pub async fn deploy_contracts(
    args: DeployContractsArgs,
    client: RpcProvider,
) -> Result<(), ScriptError> {
    let config = args.config();

    // Check the verification settings before sending anything
    let etherscan = EtherscanConfig::from_env();
    if config.enable_verify && etherscan.api_key.is_none() {
        return Err(ScriptError::Configuration(String::from(
            "ETHERSCAN_API_KEY must be set to verify the contracts, or use --no-verify",
        )));
    }
    let verifier = build_verifier(etherscan, &args.artifacts, &client).await?;
    let deployer = RpcDeployer::new(client, args.artifacts);

    info!("Deploying contracts...");
    let report = deploy_smart_contracts(&config, &deployer, verifier).await?;
    info!("Deployed with success");

    log_report(&report, config.show_output);

    Ok(())
}

/// Verify contracts deployed by a previous run
pub async fn verify_contracts(
    args: VerifyContractsArgs,
    client: RpcProvider,
) -> Result<(), ScriptError> {
    let etherscan = EtherscanConfig::from_env();
    if etherscan.api_key.is_none() {
        return Err(ScriptError::Configuration(String::from(
            "ETHERSCAN_API_KEY must be set to verify the contracts",
        )));
    }

    let tasks = verification_tasks(&args)?;
    let verifier = build_verifier(etherscan, &args.artifacts, &client).await?;
    let outcomes = run_verification_tasks(tasks, verifier).await;

    // Any unverified contract fails the command
    ensure_all_verified(&outcomes)
}

/// The verifications asked on the command line, tracking first like a deploy run does
pub fn verification_tasks(args: &VerifyContractsArgs) -> Result<Vec<VerificationTask>, ScriptError> {
    let token = parse_address(&args.token)?;

    let mut tasks = Vec::new();
    if let Some(tracking) = &args.tracking {
        tasks.push(VerificationTask {
            address: parse_address(tracking)?,
            args: ConstructorArgs::Tracking { token },
        });
    }
    tasks.push(VerificationTask {
        address: token,
        args: ConstructorArgs::Token {
            name: args.token_name.clone(),
            symbol: args.token_symbol.clone(),
        },
    });

    Ok(tasks)
}

/// Fail with the names of the contracts the explorer refused
pub fn ensure_all_verified(outcomes: &[VerificationOutcome]) -> Result<(), ScriptError> {
    let failed = outcomes
        .iter()
        .filter(|outcome| !outcome.is_verified())
        .map(|outcome| outcome.contract)
        .collect::<Vec<_>>();

    if failed.is_empty() {
        Ok(())
    } else {
        Err(ScriptError::Verification(format!(
            "failed to verify {}",
            failed.join(", ")
        )))
    }
}

/// Build the Etherscan verifier, on the chain the client is connected to
async fn build_verifier(
    config: EtherscanConfig,
    artifacts_dir: &Path,
    client: &RpcProvider,
) -> Result<Arc<EtherscanVerifier>, ScriptError> {
    let chain_id = client
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    Ok(Arc::new(EtherscanVerifier::new(
        config,
        chain_id,
        artifacts_dir.to_path_buf(),
    )?))
}

/// Parse an address given on the command line
fn parse_address(value: &str) -> Result<Address, ScriptError> {
    value
        .parse::<Address>()
        .map_err(|e| ScriptError::Configuration(format!("invalid address {}: {}", value, e)))
}

/// Summary of a deploy run, addresses only reach `info` when `show_output` is set
fn log_report(report: &DeploymentReport, show_output: bool) {
    let mut lines = vec![format!("Token: {}", report.token.address)];
    if let Some(tracking) = &report.tracking {
        lines.push(format!("Tracking: {}", tracking.address));
    }
    for line in lines {
        if show_output {
            info!("{}", line);
        } else {
            debug!("{}", line);
        }
    }

    if let Some(approval) = &report.approval {
        info!("Allowance granted in tx {}", approval);
    }

    if !report.all_verified() {
        let failed = report
            .verifications
            .iter()
            .filter(|outcome| !outcome.is_verified())
            .map(|VerificationOutcome { contract, address, .. }| format!("{contract} ({address})"))
            .collect::<Vec<_>>();
        warn!(
            "Not verified: {}, run `verify-contracts` to retry",
            failed.join(", ")
        );
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::{self, Write},
        path::PathBuf,
        sync::Mutex,
    };

    use alloy::primitives::TxHash;

    use super::*;
    use crate::deploy::DeployedContract;

    const TOKEN: Address = Address::repeat_byte(0x11);
    const TRACKING: Address = Address::repeat_byte(0x22);

    /// Log sink shared with the fmt subscriber
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Run `f` with every `info` and above event written to the returned logs
    fn capture_info(f: impl FnOnce()) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        logs.contents()
    }

    fn report() -> DeploymentReport {
        DeploymentReport {
            token: DeployedContract {
                address: TOKEN,
                args: ConstructorArgs::Token {
                    name: "Foo".to_string(),
                    symbol: "FOO".to_string(),
                },
            },
            tracking: Some(DeployedContract {
                address: TRACKING,
                args: ConstructorArgs::Tracking { token: TOKEN },
            }),
            approval: Some(TxHash::repeat_byte(0xaa)),
            verifications: Vec::new(),
        }
    }

    fn verify_args(tracking: Option<&str>) -> VerifyContractsArgs {
        VerifyContractsArgs {
            token: TOKEN.to_string(),
            tracking: tracking.map(str::to_string),
            token_name: "Foo".to_string(),
            token_symbol: "FOO".to_string(),
            artifacts: PathBuf::from("artifacts"),
        }
    }

    #[test]
    fn quiet_report_keeps_addresses_out_of_info() {
        let logs = capture_info(|| log_report(&report(), false));

        assert!(!logs.contains(&TOKEN.to_string()), "{logs}");
        assert!(!logs.contains(&TRACKING.to_string()), "{logs}");
        assert!(logs.contains("Allowance granted"));
    }

    #[test]
    fn report_prints_addresses_with_output() {
        let logs = capture_info(|| log_report(&report(), true));

        assert!(logs.contains(&format!("Token: {}", TOKEN)), "{logs}");
        assert!(logs.contains(&format!("Tracking: {}", TRACKING)), "{logs}");
    }

    #[test]
    fn tasks_put_tracking_first() {
        let tasks = verification_tasks(&verify_args(Some(&TRACKING.to_string()))).unwrap();

        assert_eq!(
            tasks,
            vec![
                VerificationTask {
                    address: TRACKING,
                    args: ConstructorArgs::Tracking { token: TOKEN },
                },
                VerificationTask {
                    address: TOKEN,
                    args: ConstructorArgs::Token {
                        name: "Foo".to_string(),
                        symbol: "FOO".to_string(),
                    },
                },
            ]
        );
    }

    #[test]
    fn tasks_without_tracking() {
        let tasks = verification_tasks(&verify_args(None)).unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].address, TOKEN);
        assert_eq!(tasks[0].args.contract_name(), "Token");
    }

    #[test]
    fn tasks_reject_invalid_addresses() {
        let err = verification_tasks(&verify_args(Some("0xnothex"))).unwrap_err();
        assert!(matches!(err, ScriptError::Configuration(_)));

        let mut args = verify_args(None);
        args.token = "token".to_string();
        assert!(matches!(
            verification_tasks(&args),
            Err(ScriptError::Configuration(_))
        ));
    }

    #[test]
    fn any_failed_verification_fails_the_command() {
        let verified = VerificationOutcome {
            contract: "Token",
            address: TOKEN,
            result: Ok(()),
        };
        let failed = VerificationOutcome {
            contract: "Tracking",
            address: TRACKING,
            result: Err(ScriptError::Verification("explorer unavailable".to_string())),
        };

        assert_eq!(ensure_all_verified(&[]), Ok(()));
        assert_eq!(ensure_all_verified(&[verified.clone()]), Ok(()));
        assert_eq!(
            ensure_all_verified(&[failed, verified]),
            Err(ScriptError::Verification("failed to verify Tracking".to_string()))
        );
    }
}
