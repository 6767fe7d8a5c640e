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

//! Batch orchestration over one build.
//!
//! [`BuildSigner`] enumerates a build's RPMs and drives each through the
//! per-artifact pipeline, strictly sequentially and in listing order.
//! Already-signed packages are counted and skipped; the first real failure
//! aborts the remaining batch. A mid-batch signer failure almost always
//! means a systemic problem (signer unreachable, misconfigured key) that
//! would recur for every remaining package, so continuing wastes the
//! signing backend's time and buries the root cause in repeated noise.

use std::sync::Arc;

use crate::audit;
use crate::error::SignError;
use crate::hub::BuildTracker;
use crate::models::Build;
use crate::signer::{ArtifactOutcome, ArtifactSigner};

/// Outcome of signing one build's batch of RPMs.
#[derive(Debug)]
pub enum BatchOutcome {
    /// Every RPM was signed or skipped as already signed.
    AllSigned { signed: usize, skipped: usize },
    /// An artifact failed; the rest of the batch was not processed.
    /// `completed` counts the artifacts signed or skipped before the
    /// failure.
    PartialFailure { completed: usize, error: SignError },
    /// The artifact list could not be fetched; nothing was processed.
    Aborted { error: SignError },
}

impl BatchOutcome {
    /// Collapse into a `Result` for callers that only need pass/fail.
    pub fn into_result(self) -> Result<(), SignError> {
        match self {
            BatchOutcome::AllSigned { .. } => Ok(()),
            BatchOutcome::PartialFailure { error, .. } | BatchOutcome::Aborted { error } => {
                Err(error)
            }
        }
    }
}

/// Signs every RPM of a build.
pub struct BuildSigner {
    tracker: Arc<dyn BuildTracker>,
    signer: ArtifactSigner,
}

impl BuildSigner {
    pub fn new(tracker: Arc<dyn BuildTracker>, signer: ArtifactSigner) -> Self {
        Self { tracker, signer }
    }

    /// Sign all RPMs of `build`, fail-fast.
    pub async fn sign_build(&self, build: &Build) -> BatchOutcome {
        let rpms = match self.tracker.list_build_rpms(build.id).await {
            Ok(rpms) => rpms,
            Err(source) => {
                let error = SignError::Lookup {
                    build_id: build.id,
                    source,
                };
                audit::log_build_sign_aborted(build.id, &error.to_string());
                return BatchOutcome::Aborted { error };
            }
        };

        audit::log_build_sign_started(build.id, &build.nvr(), rpms.len());

        let mut signed = 0;
        let mut skipped = 0;
        for rpm in &rpms {
            match self.signer.sign_rpm(build, rpm).await {
                Ok(ArtifactOutcome::Signed { sigkey }) => {
                    audit::log_rpm_signed(&rpm.basename(), &sigkey);
                    signed += 1;
                }
                Ok(ArtifactOutcome::AlreadySigned { sigkey }) => {
                    audit::log_rpm_sign_skipped(&rpm.basename(), &sigkey);
                    skipped += 1;
                }
                Err(error) => {
                    audit::log_rpm_sign_failed(&rpm.basename(), &error.to_string());
                    audit::log_build_sign_aborted(build.id, &error.to_string());
                    return BatchOutcome::PartialFailure {
                        completed: signed + skipped,
                        error,
                    };
                }
            }
        }

        audit::log_build_sign_completed(build.id, signed, skipped);
        BatchOutcome::AllSigned { signed, skipped }
    }
}
