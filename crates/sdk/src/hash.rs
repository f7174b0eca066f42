//! Integrity signature over a field map and the merchant's shared secret.
//!
//! Both directions of the wire protocol are protected the same way: the
//! text values of every field except `hash` are concatenated in map
//! order, the integration key is appended, and the SHA-512 digest of the
//! UTF-8 bytes is sent as uppercase hex. Any divergence here (order,
//! trimming, encoding) breaks authentication silently, so the canonical
//! string form lives in [`FieldMap`] and this module only ever sees
//! already-canonicalized text.

use paynow_types::FieldMap;
use sha2::{Digest, Sha512};

/// Name of the signature field on the wire.
pub const HASH_FIELD: &str = "hash";

/// Compute the integrity signature for a field map.
///
/// Values are taken in map order, the `hash` field itself is skipped,
/// and empty values participate as empty strings. Returns 128 uppercase
/// hex characters.
pub fn make(fields: &FieldMap, integration_key: &str) -> String {
    let mut message = String::new();
    for (key, value) in fields.iter() {
        if key.eq_ignore_ascii_case(HASH_FIELD) {
            continue;
        }
        message.push_str(value);
    }
    message.push_str(integration_key);

    let digest = Sha512::digest(message.as_bytes());
    format!("{:X}", digest)
}

/// Verify the `hash` field of an inbound map.
///
/// Recomputes the signature over every other field, in the order the
/// map holds them, and compares case-insensitively. Returns false on
/// any mismatch and on a missing `hash` field; callers that need to
/// distinguish the unsigned case check presence first.
pub fn verify(fields: &FieldMap, integration_key: &str) -> bool {
    match fields.get(HASH_FIELD) {
        Some(transmitted) => make(fields, integration_key).eq_ignore_ascii_case(transmitted),
        None => false,
    }
}
