//! Commands sent to the registry
//!
//! One variant per request/response unit. The engine constructs these; the
//! transport serializes them. Equality is derived so tests can assert the
//! exact command sequence a reconciliation produced.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::dnssec::DnssecData;
use crate::epp::types::{ContactPostal, DomainContact, DomainStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    CheckDomain {
        names: Vec<String>,
    },
    InfoDomain {
        name: String,
    },
    CreateDomain {
        name: String,
        registrant: String,
        auth_pw: String,
    },
    UpdateDomain(UpdateDomain),
    DeleteDomain {
        name: String,
    },
    RenewDomain {
        name: String,
        current_expiration: NaiveDate,
        years: u32,
    },
    InfoHost {
        name: String,
    },
    CreateHost {
        name: String,
        addrs: Vec<IpAddr>,
    },
    UpdateHost {
        name: String,
        add: Vec<IpAddr>,
        rem: Vec<IpAddr>,
    },
    DeleteHost {
        name: String,
    },
    InfoContact {
        id: String,
    },
    CreateContact(ContactCommand),
    UpdateContact(ContactCommand),
    DeleteContact {
        id: String,
    },
}

/// Domain-level update. Host links, contact associations, status flags,
/// registrant change, and the DNSSEC extension all ride on the same
/// command; a reconciliation batches its changes into one of these.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateDomain {
    pub name: String,
    pub add_hosts: Vec<String>,
    pub rem_hosts: Vec<String>,
    pub add_contacts: Vec<DomainContact>,
    pub rem_contacts: Vec<DomainContact>,
    pub add_statuses: Vec<DomainStatus>,
    pub rem_statuses: Vec<DomainStatus>,
    pub registrant: Option<String>,
    pub dnssec: Option<DnssecUpdate>,
}

impl UpdateDomain {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// An update that would change nothing must not be sent.
    pub fn is_noop(&self) -> bool {
        self.add_hosts.is_empty()
            && self.rem_hosts.is_empty()
            && self.add_contacts.is_empty()
            && self.rem_contacts.is_empty()
            && self.add_statuses.is_empty()
            && self.rem_statuses.is_empty()
            && self.registrant.is_none()
            && self.dnssec.is_none()
    }
}

/// DNSSEC extension payload on a domain update: data to add, previously
/// known data to remove, and the registry's remove-everything escape hatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnssecUpdate {
    pub add: Option<DnssecData>,
    pub remove: Option<DnssecData>,
    pub remove_all: bool,
}

/// Contact payload shared by create and update commands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactCommand {
    pub id: String,
    pub postal: ContactPostal,
    pub email: String,
    pub voice: Option<String>,
    pub fax: Option<String>,
    pub auth_pw: String,
    /// Whether the email field is publicly visible.
    pub disclose_email: bool,
}

impl Command {
    /// True for commands with registry-side side effects. Used by the
    /// idempotence assertions in tests and by write logging in the facade.
    pub fn is_write(&self) -> bool {
        !matches!(
            self,
            Command::CheckDomain { .. }
                | Command::InfoDomain { .. }
                | Command::InfoHost { .. }
                | Command::InfoContact { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_update_is_noop() {
        let update = UpdateDomain::new("igorville.gov");
        assert!(update.is_noop());

        let mut with_host = UpdateDomain::new("igorville.gov");
        with_host.add_hosts.push("ns1.example.com".to_string());
        assert!(!with_host.is_noop());
    }

    #[test]
    fn reads_are_not_writes() {
        assert!(!Command::InfoDomain { name: "a.gov".into() }.is_write());
        assert!(!Command::CheckDomain { names: vec!["a.gov".into()] }.is_write());
        assert!(Command::DeleteHost { name: "ns1.a.gov".into() }.is_write());
        assert!(Command::UpdateDomain(UpdateDomain::new("a.gov")).is_write());
    }
}
