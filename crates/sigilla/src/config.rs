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

//! Configuration for the signing workflow.
//!
//! [`SignerConfig`] is constructed once at startup and passed into the
//! components that need it; nothing in this crate reads ambient global
//! state at call time, so tests run against injected configurations.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the signing workflow.
///
/// # Construction
///
/// Use [`SignerConfig::builder()`]:
///
/// ```rust
/// use sigilla::SignerConfig;
/// use std::time::Duration;
///
/// let config = SignerConfig::builder()
///     .tag("f42-updates")
///     .sign_command(vec!["/usr/local/bin/sign-rpm".into()])
///     .sign_timeout(Duration::from_secs(120))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct SignerConfig {
    tags: HashSet<String>,
    sign_command: Vec<String>,
    sign_timeout: Duration,
    write_signed_copies: bool,
    spool_dir: Option<PathBuf>,
}

impl SignerConfig {
    /// Creates a new configuration builder with default values.
    pub fn builder() -> SignerConfigBuilder {
        SignerConfigBuilder::default()
    }

    /// Tags whose builds get signed. Builds tagged with anything else are
    /// ignored; an empty set signs nothing.
    pub fn tags(&self) -> &HashSet<String> {
        &self.tags
    }

    /// Argv of the external signing command.
    ///
    /// The command runs with an empty `PATH`, so the first element must be
    /// an absolute path to the executable.
    pub fn sign_command(&self) -> &[String] {
        &self.sign_command
    }

    /// Maximum time one signing subprocess may run before it is killed.
    pub fn sign_timeout(&self) -> Duration {
        self.sign_timeout
    }

    /// Whether to materialize a signed copy of each RPM after its
    /// signature is stored.
    pub fn write_signed_copies(&self) -> bool {
        self.write_signed_copies
    }

    /// Directory for the temporary signed candidates; `None` uses the
    /// system temp directory.
    pub fn spool_dir(&self) -> Option<&PathBuf> {
        self.spool_dir.as_ref()
    }
}

/// Builder for [`SignerConfig`].
#[derive(Debug, Clone)]
pub struct SignerConfigBuilder {
    tags: HashSet<String>,
    sign_command: Vec<String>,
    sign_timeout: Duration,
    write_signed_copies: bool,
    spool_dir: Option<PathBuf>,
}

impl Default for SignerConfigBuilder {
    fn default() -> Self {
        Self {
            tags: HashSet::new(),
            sign_command: Vec::new(),
            sign_timeout: Duration::from_secs(300),
            write_signed_copies: true,
            spool_dir: None,
        }
    }
}

impl SignerConfigBuilder {
    /// Add one tag to the allow-list.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Add several tags to the allow-list.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Set the signing command argv. The executable must be named by
    /// absolute path.
    pub fn sign_command(mut self, argv: Vec<String>) -> Self {
        self.sign_command = argv;
        self
    }

    /// Set the signing subprocess timeout (default 300 seconds).
    pub fn sign_timeout(mut self, timeout: Duration) -> Self {
        self.sign_timeout = timeout;
        self
    }

    /// Enable or disable materializing signed copies (default enabled).
    pub fn write_signed_copies(mut self, enabled: bool) -> Self {
        self.write_signed_copies = enabled;
        self
    }

    /// Place temporary signed candidates in a specific directory instead
    /// of the system temp directory.
    pub fn spool_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.spool_dir = Some(dir.into());
        self
    }

    pub fn build(self) -> SignerConfig {
        SignerConfig {
            tags: self.tags,
            sign_command: self.sign_command,
            sign_timeout: self.sign_timeout,
            write_signed_copies: self.write_signed_copies,
            spool_dir: self.spool_dir,
        }
    }
}
