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

//! # Sigilla
//!
//! Automated RPM signing for build pipelines. When a release tag is
//! applied to a completed build, sigilla locates each built RPM, streams
//! it to an external signing backend, validates the signature header the
//! backend returns, skips packages already signed under the same key, and
//! persists accepted signatures to the external signature store.
//!
//! ## Architecture
//!
//! - [`trigger`]: the post-tag entry point and the tag allow-list gate
//! - [`orchestrator`]: sequential, fail-fast batch processing of one
//!   build's RPMs
//! - [`signer`]: the per-artifact pipeline and the untrusted subprocess
//!   boundary around the external signing command
//! - [`rpm`]: pure parsing of RPM signature headers and OpenPGP signature
//!   packets
//! - [`hub`]: trait contracts for the surrounding build system (build
//!   tracker, repository layout, signature store)
//!
//! Sigilla has no CLI or network surface; it is embedded in the build
//! system's event handler and every collaborator is injectable.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sigilla::{ExternalSignCommand, PostTagHook, SignerConfig, TreeLayout};
//! use std::sync::Arc;
//!
//! let config = SignerConfig::builder()
//!     .tag("f42-updates")
//!     .sign_command(vec!["/usr/local/bin/sign-rpm".into()])
//!     .build();
//!
//! let command = Arc::new(ExternalSignCommand::from_config(&config)?);
//! let layout = Arc::new(TreeLayout::new("/mnt/build"));
//! let hook = PostTagHook::new(config, tracker, store, layout, command);
//!
//! // Invoked by the event system for every tag application.
//! hook.handle("f42-updates", &build, Some("releng"), false).await?;
//! ```

pub mod audit;
pub mod config;
pub mod error;
pub mod hub;
pub mod models;
pub mod orchestrator;
pub mod rpm;
pub mod signer;
pub mod trigger;

// Re-export commonly used types
pub use config::SignerConfig;
pub use error::SignError;
pub use hub::{BuildTracker, HubError, RepositoryLayout, SignatureStore, TreeLayout};
pub use models::{Build, NewRpmSignature, RpmInfo, RpmSignature};
pub use orchestrator::{BatchOutcome, BuildSigner};
pub use signer::{
    ArtifactOutcome, ArtifactSigner, CommandError, ExternalSignCommand, SignCommand, SignOutput,
};
pub use trigger::{should_sign, PostTagHook};
