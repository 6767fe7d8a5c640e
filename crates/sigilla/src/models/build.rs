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

/// A completed build as known to the external build tracker.
///
/// Sigilla holds a read-only reference for the duration of one signing
/// run; it never creates or mutates build records. The destination tag is
/// not part of the build itself, it arrives with the trigger event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Build {
    /// Build id in the external tracker
    pub id: u32,
    pub name: String,
    pub version: String,
    pub release: String,
}

impl Build {
    /// The name-version-release string identifying this build in logs.
    pub fn nvr(&self) -> String {
        format!("{}-{}-{}", self.name, self.version, self.release)
    }
}
