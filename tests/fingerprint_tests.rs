/// Unit tests for cache-key derivation
/// Covers permutation invariance, field sensitivity, and interaction with
/// query normalization
use skip_trace_api::fingerprint::derive_fingerprint;
use skip_trace_api::models::SkipTraceQuery;
use std::collections::HashSet;

fn base_query() -> SkipTraceQuery {
    SkipTraceQuery {
        first_name: Some("Jane".to_string()),
        last_name: Some("Doe".to_string()),
        city: Some("Austin".to_string()),
        state: Some("TX".to_string()),
        ..Default::default()
    }
}

#[test]
fn test_field_insertion_order_does_not_matter() {
    // The same query submitted with fields in different orders must derive
    // the same key.
    let orderings = [
        r#"{"first_name":"Jane","last_name":"Doe","city":"Austin","state":"TX"}"#,
        r#"{"state":"TX","city":"Austin","last_name":"Doe","first_name":"Jane"}"#,
        r#"{"city":"Austin","first_name":"Jane","state":"TX","last_name":"Doe"}"#,
        r#"{"last_name":"Doe","state":"TX","first_name":"Jane","city":"Austin"}"#,
    ];

    let keys: HashSet<String> = orderings
        .iter()
        .map(|json| {
            let query: SkipTraceQuery = serde_json::from_str(json).unwrap();
            derive_fingerprint(&query.normalized().unwrap())
        })
        .collect();

    assert_eq!(keys.len(), 1);
}

#[test]
fn test_each_field_contributes_to_the_key() {
    let base = base_query();
    let mut keys = vec![derive_fingerprint(&base)];

    let variants: Vec<SkipTraceQuery> = vec![
        SkipTraceQuery {
            first_name: Some("John".to_string()),
            ..base.clone()
        },
        SkipTraceQuery {
            last_name: Some("Smith".to_string()),
            ..base.clone()
        },
        SkipTraceQuery {
            email: Some("jane@example.com".to_string()),
            ..base.clone()
        },
        SkipTraceQuery {
            phone: Some("5551234567".to_string()),
            ..base.clone()
        },
        SkipTraceQuery {
            address: Some("123 Main St".to_string()),
            ..base.clone()
        },
        SkipTraceQuery {
            unit: Some("4B".to_string()),
            ..base.clone()
        },
        SkipTraceQuery {
            city: Some("Dallas".to_string()),
            ..base.clone()
        },
        SkipTraceQuery {
            state: Some("OK".to_string()),
            ..base.clone()
        },
        SkipTraceQuery {
            zip: Some("78701".to_string()),
            ..base.clone()
        },
        SkipTraceQuery {
            require_phone: true,
            ..base.clone()
        },
        SkipTraceQuery {
            require_email: true,
            ..base.clone()
        },
    ];

    for variant in variants {
        keys.push(derive_fingerprint(&variant));
    }

    // Base plus eleven single-field variants: all keys distinct.
    let distinct: HashSet<&String> = keys.iter().collect();
    assert_eq!(distinct.len(), keys.len());
}

#[test]
fn test_normalization_equivalent_queries_share_a_key() {
    let loose = SkipTraceQuery {
        phone: Some("555-123-4567".to_string()),
        state: Some("tx".to_string()),
        zip: Some("78701-1234".to_string()),
        ..Default::default()
    };
    let canonical = SkipTraceQuery {
        phone: Some("5551234567".to_string()),
        state: Some("TX".to_string()),
        zip: Some("787011234".to_string()),
        ..Default::default()
    };

    assert_eq!(
        derive_fingerprint(&loose.normalized().unwrap()),
        derive_fingerprint(&canonical.normalized().unwrap())
    );
}

#[test]
fn test_absent_and_blank_fields_are_equivalent() {
    let with_blank: SkipTraceQuery =
        serde_json::from_str(r#"{"last_name":"Doe","city":""}"#).unwrap();
    let without: SkipTraceQuery = serde_json::from_str(r#"{"last_name":"Doe"}"#).unwrap();

    assert_eq!(
        derive_fingerprint(&with_blank.normalized().unwrap()),
        derive_fingerprint(&without.normalized().unwrap())
    );
}
