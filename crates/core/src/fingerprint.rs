// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Canonical-JSON fingerprinting for idempotent meeting-record upserts.
//!
//! spec.md SS4.6.3 requires that compiling the same source document twice
//! produce the same fingerprint, so a second `compile` run over an
//! unchanged PDF is a no-op upsert rather than a duplicate row.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// 12 hex characters, the same width the teacher's content-addressed
/// records use for their short ids.
const FINGERPRINT_LEN: usize = 12;

/// Compute a stable fingerprint for `value`.
///
/// Serializes to JSON with sorted keys (via `serde_json::to_value`, whose
/// `Map` is a `BTreeMap`-backed `serde_json::Map` when the `preserve_order`
/// feature is off) and hashes the canonical bytes with SHA-256, truncated
/// to 12 hex characters. Collisions are acceptable at this width: the
/// fingerprint only needs to disambiguate documents within one site.
pub fn fingerprint<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let canonical = serde_json::to_value(value)?;
    let bytes = serde_json::to_vec(&canonical)?;
    let digest = Sha256::digest(&bytes);
    Ok(hex_prefix(&digest, FINGERPRINT_LEN))
}

fn hex_prefix(digest: &[u8], len: usize) -> String {
    let mut out = String::with_capacity(len);
    for byte in digest {
        if out.len() >= len {
            break;
        }
        out.push_str(&format!("{byte:02x}"));
    }
    out.truncate(len);
    out
}
