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

//! Signer key id derivation from OpenPGP signature packets.
//!
//! The signature slots of an RPM hold a single OpenPGP signature packet
//! (RFC 4880 section 5.2). The signer key identifier used to select and
//! deduplicate signing keys is the trailing 4 bytes of the 8-byte issuer
//! key id, hex-encoded lowercase. Version 3 packets carry the key id at a
//! fixed offset; version 4 packets carry it in an issuer subpacket.

use super::RpmParseError;

/// OpenPGP packet tag for a signature packet.
const TAG_SIGNATURE: u8 = 2;

/// Subpacket type carrying the 8-byte issuer key id.
const SUBPACKET_ISSUER: u8 = 16;

/// Derive the short signer key id from a raw signature packet.
///
/// Returns the fixed-width identifier (8 lowercase hex characters) used as
/// the dedup key in the signature store and as the key selector for signed
/// copies.
pub fn sigpacket_key_id(packet: &[u8]) -> Result<String, RpmParseError> {
    let body = packet_body(packet)?;
    let version = *body
        .first()
        .ok_or(RpmParseError::SignaturePacket("empty packet body"))?;

    let key_id = match version {
        3 => v3_key_id(body)?,
        4 => v4_key_id(body)?,
        v => return Err(RpmParseError::SignatureVersion(v)),
    };

    Ok(hex::encode(&key_id[4..]))
}

/// Strip the packet framing and return the packet body.
///
/// Both old-format and new-format packet headers appear in the wild;
/// partial body lengths do not (a signature slot always holds one complete
/// packet).
fn packet_body(packet: &[u8]) -> Result<&[u8], RpmParseError> {
    let first = *packet
        .first()
        .ok_or(RpmParseError::SignaturePacket("empty packet"))?;
    if first & 0x80 == 0 {
        return Err(RpmParseError::SignaturePacket("missing framing bit"));
    }

    let (tag, header_len, body_len): (u8, usize, usize) = if first & 0x40 == 0 {
        // Old format: tag in bits 5..2, length type in bits 1..0.
        let tag = (first >> 2) & 0x0f;
        match first & 0x03 {
            0 => {
                let len = *packet
                    .get(1)
                    .ok_or(RpmParseError::SignaturePacket("truncated length"))?;
                (tag, 2, len as usize)
            }
            1 => {
                let len = packet
                    .get(1..3)
                    .ok_or(RpmParseError::SignaturePacket("truncated length"))?;
                (tag, 3, u16::from_be_bytes([len[0], len[1]]) as usize)
            }
            2 => {
                let len = packet
                    .get(1..5)
                    .ok_or(RpmParseError::SignaturePacket("truncated length"))?;
                (
                    tag,
                    5,
                    u32::from_be_bytes([len[0], len[1], len[2], len[3]]) as usize,
                )
            }
            // Indeterminate length: the body runs to the end of the slot.
            _ => (tag, 1, packet.len() - 1),
        }
    } else {
        let tag = first & 0x3f;
        let b1 = *packet
            .get(1)
            .ok_or(RpmParseError::SignaturePacket("truncated length"))?;
        match b1 {
            0..=191 => (tag, 2, b1 as usize),
            192..=223 => {
                let b2 = *packet
                    .get(2)
                    .ok_or(RpmParseError::SignaturePacket("truncated length"))?;
                (tag, 3, ((b1 as usize - 192) << 8) + b2 as usize + 192)
            }
            255 => {
                let len = packet
                    .get(2..6)
                    .ok_or(RpmParseError::SignaturePacket("truncated length"))?;
                (
                    tag,
                    6,
                    u32::from_be_bytes([len[0], len[1], len[2], len[3]]) as usize,
                )
            }
            _ => {
                return Err(RpmParseError::SignaturePacket(
                    "partial body lengths are not supported",
                ))
            }
        }
    };

    if tag != TAG_SIGNATURE {
        return Err(RpmParseError::SignaturePacket("not a signature packet"));
    }

    let end = header_len
        .checked_add(body_len)
        .ok_or(RpmParseError::SignaturePacket("length overflow"))?;
    packet
        .get(header_len..end)
        .ok_or(RpmParseError::SignaturePacket("body truncated"))
}

/// Version 3: the key id sits at a fixed offset after the hashed material
/// (version, hashed length, signature type, creation time).
fn v3_key_id(body: &[u8]) -> Result<[u8; 8], RpmParseError> {
    let bytes = body
        .get(7..15)
        .ok_or(RpmParseError::SignaturePacket("v3 packet too short"))?;
    let mut key_id = [0u8; 8];
    key_id.copy_from_slice(bytes);
    Ok(key_id)
}

/// Version 4: scan the hashed then the unhashed subpacket area for an
/// issuer subpacket.
fn v4_key_id(body: &[u8]) -> Result<[u8; 8], RpmParseError> {
    let hashed_len = body
        .get(4..6)
        .map(|b| u16::from_be_bytes([b[0], b[1]]) as usize)
        .ok_or(RpmParseError::SignaturePacket("v4 packet too short"))?;
    let hashed = body
        .get(6..6 + hashed_len)
        .ok_or(RpmParseError::SignaturePacket("hashed area truncated"))?;

    let unhashed_at = 6 + hashed_len;
    let unhashed_len = body
        .get(unhashed_at..unhashed_at + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]) as usize)
        .ok_or(RpmParseError::SignaturePacket("v4 packet too short"))?;
    let unhashed = body
        .get(unhashed_at + 2..unhashed_at + 2 + unhashed_len)
        .ok_or(RpmParseError::SignaturePacket("unhashed area truncated"))?;

    find_issuer(hashed)
        .or_else(|| find_issuer(unhashed))
        .ok_or(RpmParseError::SignaturePacket("no issuer subpacket"))
}

fn find_issuer(area: &[u8]) -> Option<[u8; 8]> {
    let mut rest = area;
    while !rest.is_empty() {
        let (len, advance) = match rest[0] {
            0..=191 => (rest[0] as usize, 1),
            192..=254 => {
                let b2 = *rest.get(1)?;
                (((rest[0] as usize - 192) << 8) + b2 as usize + 192, 2)
            }
            255 => {
                let len = rest.get(1..5)?;
                (
                    u32::from_be_bytes([len[0], len[1], len[2], len[3]]) as usize,
                    5,
                )
            }
        };
        // A zero-length subpacket cannot carry a type byte and would stall
        // the scan.
        if len == 0 {
            return None;
        }
        let sub = rest.get(advance..advance + len)?;
        if sub[0] & 0x7f == SUBPACKET_ISSUER && sub.len() >= 9 {
            let mut key_id = [0u8; 8];
            key_id.copy_from_slice(&sub[1..9]);
            return Some(key_id);
        }
        rest = &rest[advance + len..];
    }
    None
}
