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

use serde::{Deserialize, Serialize};

/// One RPM artifact produced by a build.
///
/// The on-disk location is derived from the owning [`Build`] and this
/// metadata by the repository layout collaborator; source RPMs use the
/// pseudo-arch `src`.
///
/// [`Build`]: super::Build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpmInfo {
    /// RPM id in the external tracker
    pub id: u32,
    pub name: String,
    pub version: String,
    pub release: String,
    pub arch: String,
}

impl RpmInfo {
    /// The name-version-release.arch string for this package.
    pub fn nvra(&self) -> String {
        format!(
            "{}-{}-{}.{}",
            self.name, self.version, self.release, self.arch
        )
    }

    /// The package file name, used in every diagnostic about this RPM.
    pub fn basename(&self) -> String {
        format!("{}.rpm", self.nvra())
    }
}
