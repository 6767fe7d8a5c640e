/*
 *  Copyright 2025-2026 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! The external signing command boundary.
//!
//! The signing backend is an untrusted subprocess: it receives the
//! unsigned RPM on stdin and must write the signed RPM to stdout. All
//! interaction with it (spawn, stream, wait, capture) sits behind the
//! [`SignCommand`] trait so the pipeline can be driven against a canned
//! double in tests.
//!
//! [`ExternalSignCommand`] is the production implementation. The child
//! process environment is stripped to the locale variables (`LANG` and
//! `LC_*`) and an empty `PATH`, so its behavior cannot depend on, or be
//! hijacked through, ambient environment state. The configured argv must
//! therefore name the executable by absolute path.

use async_trait::async_trait;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

use crate::config::SignerConfig;

/// Errors from running the signing command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// No argv was configured.
    #[error("signing command is not configured")]
    EmptyCommand,

    /// Spawning the child or talking to it failed.
    #[error("failed to run signing command: {0}")]
    Io(#[from] std::io::Error),

    /// The child ran and reported failure.
    #[error("signing command failed ({status}): {stderr}")]
    NonZeroExit { status: ExitStatus, stderr: String },

    /// The child exceeded the configured timeout and was killed.
    #[error("signing command timed out after {0:?}")]
    TimedOut(Duration),
}

/// Captured output of a successful signing command run.
#[derive(Debug, Clone)]
pub struct SignOutput {
    /// Stdout: the candidate signed RPM bytes
    pub signed_bytes: Vec<u8>,
    /// Stderr: diagnostics, kept for logging
    pub stderr: String,
}

/// The signing backend as seen by the pipeline.
#[async_trait]
pub trait SignCommand: Send + Sync {
    /// Sign the RPM at `rpm_path`, returning the signed bytes.
    async fn sign(&self, rpm_path: &Path) -> Result<SignOutput, CommandError>;
}

/// Production [`SignCommand`] wrapping the configured subprocess.
#[derive(Debug, Clone)]
pub struct ExternalSignCommand {
    argv: Vec<String>,
    timeout: Duration,
}

impl ExternalSignCommand {
    pub fn new(argv: Vec<String>, timeout: Duration) -> Result<Self, CommandError> {
        if argv.is_empty() {
            return Err(CommandError::EmptyCommand);
        }
        Ok(Self { argv, timeout })
    }

    pub fn from_config(config: &SignerConfig) -> Result<Self, CommandError> {
        Self::new(config.sign_command().to_vec(), config.sign_timeout())
    }
}

#[async_trait]
impl SignCommand for ExternalSignCommand {
    async fn sign(&self, rpm_path: &Path) -> Result<SignOutput, CommandError> {
        let stdin = std::fs::File::open(rpm_path)?;

        let mut command = Command::new(&self.argv[0]);
        command
            .args(&self.argv[1..])
            .env_clear()
            .envs(allowlisted_env(std::env::vars()))
            .env("PATH", "")
            .stdin(Stdio::from(stdin))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(command = %self.argv.join(" "), rpm = %rpm_path.display(), "Invoking signing command");

        let child = command.spawn()?;
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            // Dropping the timed-out future kills the child.
            Err(_) => return Err(CommandError::TimedOut(self.timeout)),
        };

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Err(CommandError::NonZeroExit {
                status: output.status,
                stderr,
            });
        }

        Ok(SignOutput {
            signed_bytes: output.stdout,
            stderr,
        })
    }
}

/// Keep only the locale variables from the parent environment.
fn allowlisted_env(
    vars: impl Iterator<Item = (String, String)>,
) -> impl Iterator<Item = (String, String)> {
    vars.filter(|(key, _)| key == "LANG" || key.starts_with("LC_"))
}
