use crate::models::SkipTraceQuery;
use md5::{Digest, Md5};
use serde_json::json;

/// Derives the cache fingerprint for a normalized query.
///
/// Every query field is written into a canonical JSON object — absent facts as
/// explicit nulls, keys sorted by the serializer — so that two semantically
/// identical queries digest to the same key and any field change produces a
/// different one. The digest is a 128-bit MD5, hex encoded; collision
/// resistance is not a security requirement here, only avoidance of accidental
/// collisions between distinct queries.
///
/// Pure function. Callers are expected to pass the output of
/// [`SkipTraceQuery::normalized`] so that formatting variants of the same
/// query ("tx" vs "TX") share a fingerprint.
pub fn derive_fingerprint(query: &SkipTraceQuery) -> String {
    // serde_json's default Map keeps keys in sorted order, which makes the
    // serialization canonical.
    let canonical = json!({
        "first_name": query.first_name,
        "last_name": query.last_name,
        "email": query.email,
        "phone": query.phone,
        "address": query.address,
        "unit": query.unit,
        "city": query.city,
        "state": query.state,
        "zip": query.zip,
        "require_phone": query.require_phone,
        "require_email": query.require_email,
    });

    let serialized =
        serde_json::to_vec(&canonical).expect("canonical query map always serializes");
    hex::encode(Md5::digest(&serialized))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable_hex() {
        let query = SkipTraceQuery {
            last_name: Some("Smith".to_string()),
            ..Default::default()
        };
        let key = derive_fingerprint(&query);
        assert_eq!(key.len(), 32);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key, derive_fingerprint(&query));
    }

    #[test]
    fn test_fingerprint_changes_with_any_field() {
        let base = SkipTraceQuery {
            last_name: Some("Smith".to_string()),
            ..Default::default()
        };
        let base_key = derive_fingerprint(&base);

        let mut with_unit = base.clone();
        with_unit.unit = Some("4B".to_string());
        assert_ne!(base_key, derive_fingerprint(&with_unit));

        let mut with_flag = base.clone();
        with_flag.require_phone = true;
        assert_ne!(base_key, derive_fingerprint(&with_flag));
    }
}
