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

//! Signature record models.
//!
//! A signature record ties an RPM to the raw signature header produced by
//! the signing backend under one signer key. The store holds at most one
//! record per `(rpm_id, sigkey)` pair; that invariant is enforced by a
//! pre-write existence check in the pipeline, not by the store itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A signature record persisted by the external signature store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpmSignature {
    /// RPM id in the external tracker
    pub rpm_id: u32,
    /// Short signer key id, 8 lowercase hex characters
    pub sigkey: String,
    /// Raw RPM signature header bytes
    pub sighdr: Vec<u8>,
    pub signed_at: DateTime<Utc>,
}

/// Model for submitting a new signature record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRpmSignature {
    pub rpm_id: u32,
    /// Short signer key id, 8 lowercase hex characters
    pub sigkey: String,
    /// Base64-encoded raw signature header bytes
    pub sighdr: String,
}

impl NewRpmSignature {
    pub fn new(rpm_id: u32, sigkey: String, sighdr: String) -> Self {
        Self {
            rpm_id,
            sigkey,
            sighdr,
        }
    }
}
