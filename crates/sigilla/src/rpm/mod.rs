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

//! # RPM signature header parsing
//!
//! Pure functions over byte buffers for the small slice of the RPM file
//! format the signing workflow needs:
//!
//! - [`SignatureHeader`] parses the lead and the signature header of a
//!   package and exposes the two legacy signature slots
//! - [`sigpacket_key_id`] derives the short signer key id from an OpenPGP
//!   signature packet
//!
//! An RPM file starts with a fixed 96-byte lead, followed by the signature
//! header, followed by the main header and payload. The signature header is
//! a standard RPM header structure: an 8-byte preamble (3 magic bytes,
//! version, 4 reserved), a 4-byte index entry count, a 4-byte data store
//! size, `count` 16-byte index entries, and the data store. The region is
//! aligned to 8 bytes before the main header begins; the stored signature
//! header submitted to the signature store includes that padding.
//!
//! No native RPM library is involved; everything here operates on in-memory
//! buffers and returns [`RpmParseError`] on malformed input.

mod sighdr;
mod sigpacket;

pub use sighdr::SignatureHeader;
pub use sigpacket::sigpacket_key_id;

use thiserror::Error;

/// Size of the RPM lead preceding the signature header.
pub const RPM_LEAD_SIZE: usize = 96;

/// Signature header tag for the OpenPGP signature slot (preferred).
pub const RPMSIGTAG_GPG: u32 = 1005;

/// Signature header tag for the alternate PGP signature slot.
pub const RPMSIGTAG_PGP: u32 = 1002;

/// Errors raised while parsing RPM structures.
///
/// All failures are terminal for the artifact being processed; the pipeline
/// reports them as a corrupt signing response.
#[derive(Debug, Error)]
pub enum RpmParseError {
    #[error("buffer of {len} bytes is too small to be an RPM")]
    Truncated { len: usize },

    #[error("bad RPM lead magic")]
    LeadMagic,

    #[error("bad signature header magic")]
    HeaderMagic,

    #[error("signature header ({entries} entries, {store} byte store) does not fit the buffer")]
    HeaderOutOfBounds { entries: u32, store: u32 },

    #[error("signature entry for tag {tag} lies outside the header store")]
    EntryOutOfBounds { tag: u32 },

    #[error("malformed signature packet: {0}")]
    SignaturePacket(&'static str),

    #[error("unsupported signature packet version {0}")]
    SignatureVersion(u8),
}
