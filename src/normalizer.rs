use crate::models::{
    AddressHistoryEntry, Demographics, IdentityAddress, IdentityEmail, IdentityName,
    IdentityPhone, IdentitySection, NormalizedIdentity,
};
use serde_json::Value;

/// Maps a raw provider payload into the fixed [`NormalizedIdentity`] schema.
///
/// Pure mapping, no I/O. Every field prefers the source value when present and
/// non-null, and otherwise falls back to the documented default — empty
/// string, empty list, `false`, zero, or `"primary"`/`"personal"` for type
/// fields. A payload missing the `output.identity` or `output.demographics`
/// sections (or any nesting level in between) produces the corresponding
/// default shape instead of an error, and wrong-typed fields degrade the same
/// way. List order follows the payload.
///
/// The confidence label is left at its default; callers score the result with
/// [`crate::confidence::score`].
pub fn normalize(raw: &Value) -> NormalizedIdentity {
    let identity = raw.get("output").and_then(|o| o.get("identity"));
    let demographics = raw.get("output").and_then(|o| o.get("demographics"));

    NormalizedIdentity {
        is_match: raw.get("match").and_then(Value::as_bool).unwrap_or(false),
        request_id: text(raw, "requestId"),
        request_date: text(raw, "requestDate"),
        credits: raw.get("credits").and_then(Value::as_i64).unwrap_or(0),
        identity: identity.map(normalize_identity).unwrap_or_default(),
        demographics: demographics.map(normalize_demographics).unwrap_or_default(),
        match_confidence: Default::default(),
    }
}

fn normalize_identity(identity: &Value) -> IdentitySection {
    IdentitySection {
        names: items(identity, "names")
            .iter()
            .map(|name| IdentityName {
                first_name: text(name, "firstName"),
                last_name: text(name, "lastName"),
                full_name: text(name, "fullName"),
                name_type: text_or(name, "type", "primary"),
                last_seen: text(name, "lastSeen"),
            })
            .collect(),
        address: identity
            .get("address")
            .map(normalize_address)
            .unwrap_or_default(),
        address_history: items(identity, "addressHistory")
            .iter()
            .map(|addr| AddressHistoryEntry {
                formatted_address: text(addr, "formattedAddress"),
                last_seen: text(addr, "lastSeen"),
            })
            .collect(),
        phones: items(identity, "phones")
            .iter()
            .map(|phone| IdentityPhone {
                number: text(phone, "phone"),
                phone_type: text(phone, "phoneType"),
                is_connected: phone
                    .get("isConnected")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                last_seen: text(phone, "lastSeen"),
            })
            .collect(),
        emails: items(identity, "emails")
            .iter()
            .map(|email| IdentityEmail {
                email: text(email, "email"),
                email_type: text_or(email, "emailType", "personal"),
            })
            .collect(),
    }
}

fn normalize_address(addr: &Value) -> IdentityAddress {
    IdentityAddress {
        formatted_address: text(addr, "formattedAddress"),
        street: compose_street(addr),
        city: text(addr, "city"),
        state: text(addr, "state"),
        zip: text(addr, "zip"),
        last_seen: text(addr, "lastSeen"),
    }
}

fn normalize_demographics(demo: &Value) -> Demographics {
    Demographics {
        age: scalar_text(demo, "age"),
        gender: text(demo, "gender"),
        dob: text(demo, "dob"),
    }
}

/// Re-composes the street line from the provider's component tokens,
/// collapsing runs of whitespace left by absent pieces.
fn compose_street(addr: &Value) -> String {
    let tokens = [
        text(addr, "house"),
        text(addr, "preDir"),
        text(addr, "street"),
        text(addr, "postDir"),
        text(addr, "strType"),
    ];

    tokens
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// ---- optional nested accessors ----
//
// The provider payload is loosely typed; these helpers fold absence, null,
// and wrong types into the schema defaults so the mapping above stays free
// of presence checks.

fn text(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

fn text_or(value: &Value, key: &str, default: &str) -> String {
    match value.get(key).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => default.to_string(),
    }
}

/// Like [`text`], but also stringifies numeric values. Some providers report
/// `age` as a number.
fn scalar_text(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn items<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_street_composition_collapses_whitespace() {
        let addr = json!({
            "house": "123",
            "street": "Main",
            "strType": "St"
        });
        assert_eq!(compose_street(&addr), "123 Main St");
    }

    #[test]
    fn test_street_composition_with_directionals() {
        let addr = json!({
            "house": "456",
            "preDir": "N",
            "street": "Lamar",
            "postDir": "SB",
            "strType": "Blvd"
        });
        assert_eq!(compose_street(&addr), "456 N Lamar SB Blvd");
    }

    #[test]
    fn test_street_composition_all_absent() {
        assert_eq!(compose_street(&json!({})), "");
    }

    #[test]
    fn test_scalar_text_accepts_numbers() {
        let demo = json!({"age": 42});
        assert_eq!(scalar_text(&demo, "age"), "42");

        let demo = json!({"age": "42"});
        assert_eq!(scalar_text(&demo, "age"), "42");

        let demo = json!({"age": null});
        assert_eq!(scalar_text(&demo, "age"), "");
    }

    #[test]
    fn test_wrong_typed_fields_degrade_to_defaults() {
        let raw = json!({
            "match": "yes",
            "credits": "three",
            "output": {
                "identity": {
                    "names": "not a list",
                    "phones": [{"phone": 5551234567u64, "isConnected": "true"}]
                }
            }
        });

        let record = normalize(&raw);
        assert!(!record.is_match);
        assert_eq!(record.credits, 0);
        assert!(record.identity.names.is_empty());
        assert_eq!(record.identity.phones.len(), 1);
        assert_eq!(record.identity.phones[0].number, "");
        assert!(!record.identity.phones[0].is_connected);
    }
}
