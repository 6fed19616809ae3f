//! gopass command-line provider.
//!
//! Resolves a lookup path by running `gopass show -o <path>` and capturing
//! stdout. The output is returned verbatim; gopass prints the bare password
//! when its stdout is not a terminal.

use super::{ProviderError, SecretProvider};
use crate::config::{GopassConfig, DEFAULT_GOPASS_BIN, DEFAULT_MAX_OUTPUT_BYTES, DEFAULT_TIMEOUT_SECS};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Resolves secrets through the gopass CLI.
#[derive(Debug, Clone)]
pub struct GopassProvider {
    /// Program to execute, looked up on `PATH` when not absolute.
    binary: String,
    timeout: Duration,
    max_output_bytes: usize,
}

impl GopassProvider {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }

    pub fn from_config(config: &GopassConfig) -> Self {
        Self::new(config.binary.clone())
            .with_timeout(Duration::from_secs(config.timeout_secs))
            .with_max_output_bytes(config.max_output_bytes)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_output_bytes(mut self, limit: usize) -> Self {
        self.max_output_bytes = limit;
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    fn command_line(&self, path: &str) -> String {
        format!("{} show -o {}", self.binary, path)
    }
}

impl Default for GopassProvider {
    fn default() -> Self {
        Self::new(DEFAULT_GOPASS_BIN)
    }
}

#[async_trait]
impl SecretProvider for GopassProvider {
    fn name(&self) -> &str {
        "gopass"
    }

    async fn lookup(&self, path: &str) -> Result<String, ProviderError> {
        let command = self.command_line(path);

        let mut cmd = Command::new(&self.binary);
        cmd.args(["show", "-o", path]);

        // gopass may prompt for a passphrase; never let it read our stdin,
        // which carries the resource stream.
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        debug!("Running \"{}\"", command);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => return Err(ProviderError::Spawn { command, source }),
            Err(_) => {
                return Err(ProviderError::Timeout {
                    command,
                    secs: self.timeout.as_secs(),
                })
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(
                "\"{}\" failed with status {}: {}",
                command, output.status, stderr
            );
            return Err(ProviderError::Failed {
                command,
                status: output.status.to_string(),
                stderr,
            });
        }

        if output.stdout.len() > self.max_output_bytes {
            return Err(ProviderError::OutputTooLarge {
                command,
                limit: self.max_output_bytes,
            });
        }

        String::from_utf8(output.stdout).map_err(|_| ProviderError::InvalidOutput { command })
    }
}
