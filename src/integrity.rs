use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Envelope for cached JSON payloads with a SHA-256 integrity checksum.
///
/// The store persists values as opaque text; a corrupted or truncated row must
/// read back as a cache miss rather than crash the caller. Sealing a payload
/// records a checksum of its canonical serialization, and opening verifies it
/// before the payload is handed back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealedValue {
    payload: Value,
    checksum: String,
}

impl SealedValue {
    /// Wraps a payload and serializes the envelope for storage.
    pub fn seal(payload: &Value) -> String {
        let sealed = SealedValue {
            payload: payload.clone(),
            checksum: checksum_of(payload),
        };
        serde_json::to_string(&sealed).unwrap_or_default()
    }

    /// Parses a stored envelope and verifies its checksum.
    ///
    /// Returns `None` for unparseable rows or checksum mismatches; the caller
    /// treats both as absent.
    pub fn open(stored: &str) -> Option<Value> {
        let sealed: SealedValue = serde_json::from_str(stored).ok()?;

        if checksum_of(&sealed.payload) == sealed.checksum {
            Some(sealed.payload)
        } else {
            tracing::warn!(
                "Cache entry failed integrity check (expected checksum {})",
                sealed.checksum
            );
            None
        }
    }
}

fn checksum_of(payload: &Value) -> String {
    let serialized = serde_json::to_vec(payload).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(&serialized);
    hex::encode(hasher.finalize())
}
