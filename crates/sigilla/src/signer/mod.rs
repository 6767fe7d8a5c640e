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

//! Per-artifact signing pipeline.
//!
//! [`ArtifactSigner`] drives one RPM through the signing states: resolve
//! its path, stream it to the external signer, validate the returned
//! signature header, check for a previously stored signature under the
//! derived key, and persist the accepted signature. The outcome is a
//! value, [`ArtifactOutcome`], so the orchestrator branches with a plain
//! match; only genuine failures are errors.
//!
//! The candidate signed bytes live in a uniquely named temporary file
//! owned by one pipeline invocation. The file is removed when the
//! invocation returns, on the success, skip, and failure paths alike.

mod command;

pub use command::{CommandError, ExternalSignCommand, SignCommand, SignOutput};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

use crate::config::SignerConfig;
use crate::error::SignError;
use crate::hub::{RepositoryLayout, SignatureStore};
use crate::models::{Build, NewRpmSignature, RpmInfo};
use crate::rpm::{sigpacket_key_id, SignatureHeader};

/// Outcome of signing one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactOutcome {
    /// The signature was validated and stored.
    Signed { sigkey: String },
    /// A signature under the same key was already stored; nothing was
    /// written. Expected when a build is re-tagged or a run is repeated
    /// after a partial success.
    AlreadySigned { sigkey: String },
}

/// Signs a single RPM artifact end to end.
pub struct ArtifactSigner {
    command: Arc<dyn SignCommand>,
    store: Arc<dyn SignatureStore>,
    layout: Arc<dyn RepositoryLayout>,
    write_signed_copies: bool,
    spool_dir: Option<std::path::PathBuf>,
}

impl ArtifactSigner {
    pub fn new(
        command: Arc<dyn SignCommand>,
        store: Arc<dyn SignatureStore>,
        layout: Arc<dyn RepositoryLayout>,
        config: &SignerConfig,
    ) -> Self {
        Self {
            command,
            store,
            layout,
            write_signed_copies: config.write_signed_copies(),
            spool_dir: config.spool_dir().cloned(),
        }
    }

    /// Run the signing pipeline for one RPM of a build.
    ///
    /// Errors carry the artifact's basename; raw subprocess and store
    /// errors never escape this method.
    pub async fn sign_rpm(
        &self,
        build: &Build,
        rpm: &RpmInfo,
    ) -> Result<ArtifactOutcome, SignError> {
        let basename = rpm.basename();

        let rpm_path = self.layout.rpm_path(build, rpm);
        if !rpm_path.exists() {
            return Err(SignError::FileNotFound {
                rpm: basename,
                path: rpm_path,
            });
        }

        let output = self
            .command
            .sign(&rpm_path)
            .await
            .map_err(|e| SignError::SigningCommand {
                rpm: basename.clone(),
                detail: e.to_string(),
            })?;
        if !output.stderr.is_empty() {
            tracing::debug!(rpm = %basename, stderr = %output.stderr, "Signing command diagnostics");
        }

        // The candidate signed artifact. Dropping the handle removes the
        // file on every exit path below.
        let candidate = self.write_candidate(&output.signed_bytes, &basename)?;
        let signed_bytes =
            std::fs::read(candidate.path()).map_err(|e| SignError::SigningCommand {
                rpm: basename.clone(),
                detail: e.to_string(),
            })?;

        let header =
            SignatureHeader::parse(&signed_bytes).map_err(|source| {
                SignError::CorruptSignedArtifact {
                    rpm: basename.clone(),
                    source,
                }
            })?;
        let packet = header
            .signature_packet()
            .ok_or_else(|| SignError::UnsignedResponse {
                rpm: basename.clone(),
            })?;
        let sigkey = sigpacket_key_id(packet).map_err(|source| SignError::CorruptSignedArtifact {
            rpm: basename.clone(),
            source,
        })?;

        let existing = self
            .store
            .query_rpm_sigs(rpm.id, &sigkey)
            .await
            .map_err(|source| SignError::Persist {
                rpm: basename.clone(),
                source,
            })?;
        if !existing.is_empty() {
            return Ok(ArtifactOutcome::AlreadySigned { sigkey });
        }

        let sighdr = BASE64.encode(header.raw());
        self.store
            .add_rpm_sig(NewRpmSignature::new(rpm.id, sigkey.clone(), sighdr))
            .await
            .map_err(|source| SignError::Persist {
                rpm: basename.clone(),
                source,
            })?;

        if self.write_signed_copies {
            self.store
                .write_signed_rpm(rpm, &sigkey)
                .await
                .map_err(|source| SignError::Persist {
                    rpm: basename.clone(),
                    source,
                })?;
        }

        Ok(ArtifactOutcome::Signed { sigkey })
    }

    /// Write the signer's stdout to a fresh temporary file, unique per
    /// invocation and never reused across artifacts.
    fn write_candidate(&self, bytes: &[u8], basename: &str) -> Result<NamedTempFile, SignError> {
        let as_sign_error = |e: std::io::Error| SignError::SigningCommand {
            rpm: basename.to_string(),
            detail: e.to_string(),
        };

        let mut candidate = match &self.spool_dir {
            Some(dir) => NamedTempFile::new_in(dir),
            None => NamedTempFile::new(),
        }
        .map_err(as_sign_error)?;
        candidate.write_all(bytes).map_err(as_sign_error)?;
        candidate.flush().map_err(as_sign_error)?;
        Ok(candidate)
    }
}
