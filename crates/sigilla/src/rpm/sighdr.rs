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

//! Signature header extraction.

use super::{RpmParseError, RPMSIGTAG_GPG, RPMSIGTAG_PGP, RPM_LEAD_SIZE};

const LEAD_MAGIC: [u8; 4] = [0xed, 0xab, 0xee, 0xdb];
const HEADER_MAGIC: [u8; 3] = [0x8e, 0xad, 0xe8];
const HEADER_VERSION: u8 = 0x01;

/// Preamble: magic, version, reserved, entry count, store size.
const PREAMBLE_SIZE: usize = 16;
const ENTRY_SIZE: usize = 16;

/// RPM header entry type for opaque binary data.
const TYPE_BIN: u32 = 7;

/// The parsed signature header of an RPM package.
///
/// Holds the raw header region (including the 8-byte alignment padding
/// that precedes the main header) together with its decoded index, and
/// resolves the two legacy signature slots.
#[derive(Debug, Clone)]
pub struct SignatureHeader {
    /// Raw signature header region as it appears on disk
    raw: Vec<u8>,
    entries: Vec<IndexEntry>,
    /// Offset of the data store within `raw`
    store_offset: usize,
}

#[derive(Debug, Clone, Copy)]
struct IndexEntry {
    tag: u32,
    kind: u32,
    offset: usize,
    count: usize,
}

impl SignatureHeader {
    /// Parse the signature header out of a complete RPM buffer.
    ///
    /// `data` must contain at least the lead and the full signature header
    /// region; the main header and payload may be truncated or absent. An
    /// empty or malformed buffer is an error, never an empty header.
    pub fn parse(data: &[u8]) -> Result<Self, RpmParseError> {
        if data.len() < RPM_LEAD_SIZE + PREAMBLE_SIZE {
            return Err(RpmParseError::Truncated { len: data.len() });
        }
        if data[..4] != LEAD_MAGIC {
            return Err(RpmParseError::LeadMagic);
        }

        let hdr = &data[RPM_LEAD_SIZE..];
        if hdr[..3] != HEADER_MAGIC || hdr[3] != HEADER_VERSION {
            return Err(RpmParseError::HeaderMagic);
        }

        let entry_count = be_u32(&hdr[8..12]);
        let store_size = be_u32(&hdr[12..16]);

        let out_of_bounds = || RpmParseError::HeaderOutOfBounds {
            entries: entry_count,
            store: store_size,
        };

        let index_size = (entry_count as usize)
            .checked_mul(ENTRY_SIZE)
            .ok_or_else(out_of_bounds)?;
        let unpadded = PREAMBLE_SIZE
            .checked_add(index_size)
            .and_then(|v| v.checked_add(store_size as usize))
            .ok_or_else(out_of_bounds)?;
        // The main header starts on an 8-byte boundary; the padding belongs
        // to the signature header region.
        let padded = unpadded + (8 - unpadded % 8) % 8;

        if hdr.len() < padded {
            return Err(out_of_bounds());
        }

        let raw = hdr[..padded].to_vec();
        let store_offset = PREAMBLE_SIZE + index_size;

        let mut entries = Vec::with_capacity(entry_count as usize);
        for i in 0..entry_count as usize {
            let base = PREAMBLE_SIZE + i * ENTRY_SIZE;
            let entry = IndexEntry {
                tag: be_u32(&raw[base..base + 4]),
                kind: be_u32(&raw[base + 4..base + 8]),
                offset: be_u32(&raw[base + 8..base + 12]) as usize,
                count: be_u32(&raw[base + 12..base + 16]) as usize,
            };
            // For BIN entries the count is a byte length; both ends must
            // land inside the data store.
            if entry.kind == TYPE_BIN
                && entry
                    .offset
                    .checked_add(entry.count)
                    .map(|end| end > store_size as usize)
                    .unwrap_or(true)
            {
                return Err(RpmParseError::EntryOutOfBounds { tag: entry.tag });
            }
            entries.push(entry);
        }

        Ok(Self {
            raw,
            entries,
            store_offset,
        })
    }

    /// The raw signature header region, including alignment padding.
    ///
    /// This is the byte range submitted to the signature store.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// The signature packet from whichever legacy slot is populated.
    ///
    /// The OpenPGP slot (tag 1005) wins over the alternate PGP slot
    /// (tag 1002). Returns `None` when neither slot carries data, which
    /// means the signing backend returned an unsigned package.
    pub fn signature_packet(&self) -> Option<&[u8]> {
        self.slot_data(RPMSIGTAG_GPG)
            .or_else(|| self.slot_data(RPMSIGTAG_PGP))
    }

    fn slot_data(&self, tag: u32) -> Option<&[u8]> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.tag == tag && e.kind == TYPE_BIN)?;
        let start = self.store_offset + entry.offset;
        let data = &self.raw[start..start + entry.count];
        if data.is_empty() {
            None
        } else {
            Some(data)
        }
    }
}

fn be_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
