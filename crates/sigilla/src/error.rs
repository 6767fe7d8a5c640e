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

//! Failure taxonomy of the signing workflow.
//!
//! Every variant is fatal for the artifact it names and aborts the rest of
//! the batch; none is retried here. The already-signed condition is not an
//! error at all, it is an [`ArtifactOutcome`] variant.
//!
//! Each variant carries the artifact's basename so the event system
//! receives one descriptive failure instead of a raw low-level error.
//!
//! [`ArtifactOutcome`]: crate::signer::ArtifactOutcome

use std::path::PathBuf;
use thiserror::Error;

use crate::hub::HubError;
use crate::rpm::RpmParseError;

/// Errors raised by the per-artifact pipeline and the batch orchestrator.
#[derive(Debug, Error)]
pub enum SignError {
    /// The artifact is missing from the repository tree. Indicates a
    /// build/storage inconsistency, never a transient condition.
    #[error("could not sign {rpm}: file {path} does not exist")]
    FileNotFound { rpm: String, path: PathBuf },

    /// The external signing command failed: spawn error, I/O error while
    /// streaming, non-zero exit, or timeout.
    #[error("could not sign {rpm}: {detail}")]
    SigningCommand { rpm: String, detail: String },

    /// The signing backend returned bytes that do not parse as an RPM.
    #[error("signing backend returned a corrupt package for {rpm}: {source}")]
    CorruptSignedArtifact {
        rpm: String,
        #[source]
        source: RpmParseError,
    },

    /// The signing backend returned a package with neither signature slot
    /// populated.
    #[error("signing backend returned an unsigned package for {rpm}")]
    UnsignedResponse { rpm: String },

    /// The signature store failed after the signer already ran. Needs
    /// operator attention; re-running would invoke the signer again.
    #[error("could not persist the signature for {rpm}: {source}")]
    Persist {
        rpm: String,
        #[source]
        source: HubError,
    },

    /// The build's artifact list could not be fetched. Fatal for the whole
    /// run before any artifact is touched.
    #[error("could not list RPMs for build {build_id}: {source}")]
    Lookup {
        build_id: u32,
        #[source]
        source: HubError,
    },
}
