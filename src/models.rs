use crate::errors::QueryError;
use serde::{Deserialize, Serialize};

// ============ Query ============

/// A skip-trace query: the set of identity facts the operator supplied plus
/// the match-requirement flags forwarded to the provider.
///
/// All facts are optional, but at least one must be present. Use
/// [`SkipTraceQuery::normalized`] to validate and canonicalize before deriving
/// a fingerprint or calling upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipTraceQuery {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Street address line.
    #[serde(default)]
    pub address: Option<String>,
    /// Apartment/unit number.
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    /// Require the provider match to include at least one phone.
    #[serde(default)]
    pub require_phone: bool,
    /// Require the provider match to include at least one email.
    #[serde(default)]
    pub require_email: bool,
}

impl SkipTraceQuery {
    /// Validates the query and returns its canonical form.
    ///
    /// Blank fields become absent, the phone is reduced to its digits (must be
    /// exactly 10), the zip to its digits (must be 5 or 9), and the state is
    /// upper-cased (must be exactly 2 letters). Fails if no identifying fact
    /// remains after normalization.
    pub fn normalized(&self) -> Result<SkipTraceQuery, QueryError> {
        let first_name = non_blank(&self.first_name);
        let last_name = non_blank(&self.last_name);
        let email = non_blank(&self.email);
        let address = non_blank(&self.address);
        let unit = non_blank(&self.unit);
        let city = non_blank(&self.city);

        let phone = match non_blank(&self.phone) {
            Some(raw) => {
                let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
                if digits.len() != 10 {
                    return Err(QueryError::InvalidPhone);
                }
                Some(digits)
            }
            None => None,
        };

        let zip = match non_blank(&self.zip) {
            Some(raw) => {
                let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
                if digits.len() != 5 && digits.len() != 9 {
                    return Err(QueryError::InvalidZip);
                }
                Some(digits)
            }
            None => None,
        };

        let state = match non_blank(&self.state) {
            Some(raw) => {
                if raw.len() != 2 || !raw.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(QueryError::InvalidState);
                }
                Some(raw.to_ascii_uppercase())
            }
            None => None,
        };

        let normalized = SkipTraceQuery {
            first_name,
            last_name,
            email,
            phone,
            address,
            unit,
            city,
            state,
            zip,
            require_phone: self.require_phone,
            require_email: self.require_email,
        };

        if !normalized.has_identifier() {
            return Err(QueryError::MissingIdentifier);
        }

        Ok(normalized)
    }

    /// Whether any identifying fact is present. The match-requirement flags do
    /// not count.
    pub fn has_identifier(&self) -> bool {
        [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.phone,
            &self.address,
            &self.unit,
            &self.city,
            &self.state,
            &self.zip,
        ]
        .iter()
        .any(|f| f.is_some())
    }
}

fn non_blank(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ============ Normalized identity ============

/// Coarse three-level match-confidence label derived from which identity
/// facets were recovered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchConfidence {
    High,
    Medium,
    #[default]
    Low,
}

/// The fixed-shape internal representation of a skip-trace result.
///
/// Every field is always populated; absent upstream data maps to empty
/// strings, empty lists, `false`, or zero — never to a missing key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedIdentity {
    /// Whether the provider reported a match.
    #[serde(rename = "match")]
    pub is_match: bool,
    #[serde(rename = "requestId")]
    pub request_id: String,
    #[serde(rename = "requestDate")]
    pub request_date: String,
    /// Credits consumed by the upstream call.
    pub credits: i64,
    pub identity: IdentitySection,
    pub demographics: Demographics,
    pub match_confidence: MatchConfidence,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentitySection {
    pub names: Vec<IdentityName>,
    pub address: IdentityAddress,
    #[serde(rename = "addressHistory")]
    pub address_history: Vec<AddressHistoryEntry>,
    pub phones: Vec<IdentityPhone>,
    pub emails: Vec<IdentityEmail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentityName {
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    /// Name type as reported by the provider, `"primary"` when absent.
    #[serde(rename = "type")]
    pub name_type: String,
    pub last_seen: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentityAddress {
    #[serde(rename = "formattedAddress")]
    pub formatted_address: String,
    /// Street line re-composed from the provider's house/preDir/street/
    /// postDir/strType tokens, whitespace-collapsed.
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub last_seen: String,
}

impl IdentityAddress {
    /// An address counts as present when any of the location fields carry a
    /// value.
    pub fn is_present(&self) -> bool {
        !self.formatted_address.is_empty()
            || !self.city.is_empty()
            || !self.state.is_empty()
            || !self.zip.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressHistoryEntry {
    #[serde(rename = "formattedAddress")]
    pub formatted_address: String,
    pub last_seen: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentityPhone {
    pub number: String,
    #[serde(rename = "phoneType")]
    pub phone_type: String,
    #[serde(rename = "isConnected")]
    pub is_connected: bool,
    pub last_seen: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentityEmail {
    pub email: String,
    /// Email type as reported by the provider, `"personal"` when absent.
    #[serde(rename = "emailType")]
    pub email_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub age: String,
    pub gender: String,
    pub dob: String,
}
