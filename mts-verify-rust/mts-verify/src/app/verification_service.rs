use std::process::Stdio;

use async_trait::async_trait;
use mts_wallet_core::shared::utils::is_valid_hex_address;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use crate::domain::error::VerifyError;
use crate::infrastructure::config::VerifyConfig;

/// One contract to verify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    pub contract_address: String,
    pub constructor_args: Vec<String>,
}

impl VerificationRequest {
    pub fn new(contract_address: &str, constructor_args: Vec<String>) -> Result<Self, VerifyError> {
        let contract_address = contract_address.trim();
        if contract_address.is_empty() {
            return Err(VerifyError::validation("contractAddress is required"));
        }
        if !is_valid_hex_address(contract_address) {
            return Err(VerifyError::validation(format!(
                "Invalid contractAddress format: '{contract_address}'. Expected: 0x followed by 40 hex characters"
            )));
        }
        // Arguments are passed as argv, so the only way to subvert the command is a flag
        if let Some(flag) = constructor_args.iter().find(|arg| arg.starts_with("--")) {
            return Err(VerifyError::validation(format!("Constructor argument looks like a flag: '{flag}'")));
        }
        Ok(Self { contract_address: contract_address.to_string(), constructor_args })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationOutput {
    pub stdout: String,
    pub stderr: String,
}

#[async_trait]
pub trait VerificationRunner: Send + Sync {
    async fn verify(&self, request: &VerificationRequest) -> Result<VerificationOutput, VerifyError>;
}

/// `hardhat verify --network <network> <address> [args... --force]`, without the tool itself.
pub fn verify_args(network: &str, request: &VerificationRequest) -> Vec<String> {
    let mut args = vec![
        "hardhat".to_string(),
        "verify".to_string(),
        "--network".to_string(),
        network.to_string(),
        request.contract_address.clone(),
    ];
    if !request.constructor_args.is_empty() {
        args.extend(request.constructor_args.iter().cloned());
        args.push("--force".to_string());
    }
    args
}

/// Read at most `cap` bytes, then drain the rest so the child never blocks on a full pipe.
async fn read_capped<R: AsyncRead + Unpin>(mut reader: R, cap: usize) -> std::io::Result<String> {
    let mut buf = Vec::new();
    (&mut reader).take(cap as u64).read_to_end(&mut buf).await?;
    tokio::io::copy(&mut reader, &mut tokio::io::sink()).await?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Runs the verification tool as a child process in the hardhat project directory.
pub struct ProcessRunner {
    config: VerifyConfig,
}

impl ProcessRunner {
    pub fn new(config: VerifyConfig) -> Self {
        Self { config }
    }

    fn command_line(&self, args: &[String]) -> String {
        std::iter::once(self.config.tool.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl VerificationRunner for ProcessRunner {
    async fn verify(&self, request: &VerificationRequest) -> Result<VerificationOutput, VerifyError> {
        let args = verify_args(&self.config.network, request);
        let command_line = self.command_line(&args);
        tracing::info!(command = %command_line, "Executing verification");

        let mut child = Command::new(&self.config.tool)
            .args(&args)
            .current_dir(&self.config.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| VerifyError::verification(format!("Failed to start {}: {e}", self.config.tool), None))?;

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            return Err(VerifyError::verification("Child process has no output pipes", None));
        };

        let cap = self.config.max_output_bytes;
        let run = async {
            tokio::try_join!(read_capped(stdout, cap), read_capped(stderr, cap), child.wait())
        };
        let (stdout, stderr, status) = match tokio::time::timeout(self.config.timeout, run).await {
            Ok(Ok(done)) => done,
            Ok(Err(e)) => {
                let _ = child.kill().await;
                return Err(VerifyError::verification(format!("Command failed: {command_line}\n{e}"), None));
            }
            Err(_) => {
                let _ = child.kill().await;
                tracing::error!(command = %command_line, "Verification timed out");
                return Err(VerifyError::verification(
                    format!("Command timed out after {}s: {command_line}", self.config.timeout.as_secs()),
                    None,
                ));
            }
        };

        tracing::info!(stdout = %stdout, "Verification tool finished");
        if !stderr.is_empty() {
            tracing::warn!(stderr = %stderr, "Verification tool wrote to stderr");
        }

        if !status.success() {
            let details = if stderr.is_empty() { stdout } else { stderr };
            return Err(VerifyError::verification(
                format!("Command failed: {command_line} ({status})"),
                Some(details),
            ));
        }
        Ok(VerificationOutput { stdout, stderr })
    }
}
