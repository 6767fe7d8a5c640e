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

//! Collaborator contracts for the surrounding build system.
//!
//! Sigilla owns none of the state it operates on. The build tracker knows
//! which RPMs a build produced, the repository layout knows where they live
//! on disk, and the signature store holds accepted signatures. Each is
//! consumed through a narrow trait so tests can substitute in-memory
//! doubles:
//!
//! - [`BuildTracker`] enumerates a build's RPM artifacts
//! - [`RepositoryLayout`] resolves an artifact's on-disk path
//! - [`SignatureStore`] queries and persists signature records
//!
//! [`TreeLayout`] is the stock [`RepositoryLayout`] for the conventional
//! `<topdir>/packages/<name>/<version>/<release>/<arch>/` tree.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{Build, NewRpmSignature, RpmInfo, RpmSignature};

/// Errors surfaced by the external collaborators.
#[derive(Debug, Error)]
pub enum HubError {
    /// The service could not be reached or the call failed in transit.
    #[error("hub call failed: {0}")]
    Transport(String),

    /// The service answered and refused the request.
    #[error("hub rejected the request: {0}")]
    Rejected(String),
}

/// Read access to the external build tracker.
#[async_trait]
pub trait BuildTracker: Send + Sync {
    /// List the RPM artifacts produced by a build.
    ///
    /// The returned order is preserved by the signing batch, so it must be
    /// deterministic for a given build.
    async fn list_build_rpms(&self, build_id: u32) -> Result<Vec<RpmInfo>, HubError>;
}

/// Path resolution for built artifacts.
///
/// Pure and deterministic; the caller performs the existence check.
pub trait RepositoryLayout: Send + Sync {
    fn rpm_path(&self, build: &Build, rpm: &RpmInfo) -> PathBuf;
}

/// Signature persistence in the external signature store.
#[async_trait]
pub trait SignatureStore: Send + Sync {
    /// Existing signature records for an RPM under one signer key.
    ///
    /// Used as the pre-write duplicate check; a non-empty result means the
    /// package is already signed under that key.
    async fn query_rpm_sigs(&self, rpm_id: u32, sigkey: &str)
        -> Result<Vec<RpmSignature>, HubError>;

    /// Persist a new signature record.
    async fn add_rpm_sig(&self, sig: NewRpmSignature) -> Result<(), HubError>;

    /// Materialize a signed copy of the RPM under the given key.
    async fn write_signed_rpm(&self, rpm: &RpmInfo, sigkey: &str) -> Result<(), HubError>;
}

/// The conventional on-disk repository tree.
///
/// Builds live under `<topdir>/packages/<name>/<version>/<release>` and
/// each RPM under `<arch>/<basename>` inside its build directory.
#[derive(Debug, Clone)]
pub struct TreeLayout {
    topdir: PathBuf,
}

impl TreeLayout {
    pub fn new(topdir: impl Into<PathBuf>) -> Self {
        Self {
            topdir: topdir.into(),
        }
    }

    /// The directory holding all artifacts of one build.
    pub fn build_dir(&self, build: &Build) -> PathBuf {
        self.topdir
            .join("packages")
            .join(&build.name)
            .join(&build.version)
            .join(&build.release)
    }

    pub fn topdir(&self) -> &Path {
        &self.topdir
    }
}

impl RepositoryLayout for TreeLayout {
    fn rpm_path(&self, build: &Build, rpm: &RpmInfo) -> PathBuf {
        self.build_dir(build).join(&rpm.arch).join(rpm.basename())
    }
}
