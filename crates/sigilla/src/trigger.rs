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

//! Post-tag trigger gate and entry point.
//!
//! The external event system invokes [`PostTagHook::handle`] for every
//! tag application. The gate is a pure membership test against the
//! configured allow-list: no configuration means no signing, so a missing
//! or empty tag set fails closed rather than signing unintended builds.

use std::collections::HashSet;
use std::sync::Arc;

use crate::audit;
use crate::config::SignerConfig;
use crate::error::SignError;
use crate::hub::{BuildTracker, RepositoryLayout, SignatureStore};
use crate::models::Build;
use crate::orchestrator::BuildSigner;
use crate::signer::{ArtifactSigner, SignCommand};

/// Whether builds tagged into `tag_name` get signed.
///
/// Pure membership test with no failure modes; an empty set signs
/// nothing.
pub fn should_sign(tag_name: &str, tags: &HashSet<String>) -> bool {
    tags.contains(tag_name)
}

/// Entry point wired into the external event system's post-tag callback.
pub struct PostTagHook {
    config: SignerConfig,
    signer: BuildSigner,
}

impl PostTagHook {
    pub fn new(
        config: SignerConfig,
        tracker: Arc<dyn BuildTracker>,
        store: Arc<dyn SignatureStore>,
        layout: Arc<dyn RepositoryLayout>,
        command: Arc<dyn SignCommand>,
    ) -> Self {
        let artifact_signer = ArtifactSigner::new(command, store, layout, &config);
        let signer = BuildSigner::new(tracker, artifact_signer);
        Self { config, signer }
    }

    /// Handle one tag application.
    ///
    /// Returns immediately with no observable effect when the tag is not
    /// on the allow-list. Otherwise runs the signing batch and propagates
    /// its fatal failure, if any; logging and alerting on that failure is
    /// the event system's job.
    pub async fn handle(
        &self,
        tag_name: &str,
        build: &Build,
        user: Option<&str>,
        force: bool,
    ) -> Result<(), SignError> {
        if !should_sign(tag_name, self.config.tags()) {
            audit::log_trigger_skipped(tag_name, &build.nvr());
            return Ok(());
        }

        tracing::info!(
            tag = %tag_name,
            nvr = %build.nvr(),
            user = ?user,
            force = force,
            "Post-tag signing triggered"
        );

        self.signer.sign_build(build).await.into_result()
    }
}
