//! Value types shared by commands and responses

use serde::{Deserialize, Serialize};

/// Status flags a registry attaches to a domain object.
///
/// The wire carries these as camelCase strings; anything this engine does
/// not recognize is dropped by [`DomainStatus::parse_list`], because status
/// information is advisory rather than load-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DomainStatus {
    Ok,
    Inactive,
    Linked,
    ClientHold,
    ServerHold,
    ClientDeleteProhibited,
    ServerDeleteProhibited,
    ClientUpdateProhibited,
    ServerUpdateProhibited,
    ClientTransferProhibited,
    ServerTransferProhibited,
    PendingCreate,
    PendingDelete,
    PendingTransfer,
}

impl DomainStatus {
    pub fn is_hold(self) -> bool {
        matches!(self, DomainStatus::ClientHold | DomainStatus::ServerHold)
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(s.to_string())).ok()
    }

    /// Decode a raw status list. A malformed entry makes the whole fact
    /// resolve to empty, since statuses are advisory rather than load-bearing.
    pub fn parse_list(raw: &[String]) -> Vec<DomainStatus> {
        raw.iter()
            .map(|s| Self::from_wire(s))
            .collect::<Option<Vec<_>>>()
            .unwrap_or_default()
    }
}

/// Role under which a contact is associated with a domain.
///
/// Each role is a singleton per domain. The registrant is linked through
/// the domain object's registrant field; the other three through contact
/// associations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactRole {
    Registrant,
    #[serde(rename = "admin")]
    Administrative,
    Security,
    #[serde(rename = "tech")]
    Technical,
}

impl ContactRole {
    /// Roles linked to the domain via contact associations (everything but
    /// the registrant).
    pub const LINKED: [ContactRole; 3] = [
        ContactRole::Administrative,
        ContactRole::Security,
        ContactRole::Technical,
    ];

    /// All four roles, registrant first.
    pub const ALL: [ContactRole; 4] = [
        ContactRole::Registrant,
        ContactRole::Administrative,
        ContactRole::Security,
        ContactRole::Technical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContactRole::Registrant => "registrant",
            ContactRole::Administrative => "admin",
            ContactRole::Security => "security",
            ContactRole::Technical => "tech",
        }
    }
}

/// A contact association carried on domain info and update commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainContact {
    pub id: String,
    pub role: ContactRole,
}

impl DomainContact {
    pub fn new(id: impl Into<String>, role: ContactRole) -> Self {
        Self { id: id.into(), role }
    }
}

/// Postal block of a contact record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPostal {
    pub name: String,
    pub org: Option<String>,
    /// Up to three street lines; empty entries are omitted on the wire.
    pub streets: Vec<String>,
    pub city: String,
    /// State or province
    pub sp: String,
    /// Postal code
    pub pc: String,
    /// Country code
    pub cc: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_camel_case() {
        assert_eq!(DomainStatus::from_wire("clientHold"), Some(DomainStatus::ClientHold));
        assert_eq!(DomainStatus::from_wire("serverHold"), Some(DomainStatus::ServerHold));
        assert_eq!(DomainStatus::from_wire("banana"), None);
    }

    #[test]
    fn malformed_status_list_resolves_empty() {
        let raw = vec!["ok".to_string(), "definitely-not-a-status".to_string()];
        assert!(DomainStatus::parse_list(&raw).is_empty());

        let good = vec!["ok".to_string(), "linked".to_string()];
        assert_eq!(
            DomainStatus::parse_list(&good),
            vec![DomainStatus::Ok, DomainStatus::Linked]
        );
    }

    #[test]
    fn roles_use_registry_names() {
        assert_eq!(ContactRole::Administrative.as_str(), "admin");
        assert_eq!(ContactRole::Technical.as_str(), "tech");
        assert_eq!(
            serde_json::to_string(&ContactRole::Administrative).unwrap(),
            "\"admin\""
        );
    }
}
