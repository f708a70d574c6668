use crate::models::{IdentitySection, MatchConfidence};

/// Derives the match-confidence label from an already-normalized identity.
///
/// Counts the recovered facets — phones, emails, and the address (which
/// counts when any of its location fields is non-empty). Two or more facets
/// score high, exactly one medium, none low. Deterministic, no other inputs.
pub fn score(identity: &IdentitySection) -> MatchConfidence {
    let mut facets = 0;

    if !identity.phones.is_empty() {
        facets += 1;
    }
    if !identity.emails.is_empty() {
        facets += 1;
    }
    if identity.address.is_present() {
        facets += 1;
    }

    match facets {
        0 => MatchConfidence::Low,
        1 => MatchConfidence::Medium,
        _ => MatchConfidence::High,
    }
}
