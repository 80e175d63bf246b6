//! Per-domain attribute cache
//!
//! Registry-sourced facts, populated read-through and cleared wholesale.
//! An absent entry means "unknown, fetch on demand", never "empty": a
//! fact is only ever present after it has round-tripped through the
//! registry client since the last invalidation. The facade invalidates
//! *after* a remote write succeeds, so a failed write leaves the previous
//! cache valid.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::net::IpAddr;

use crate::dnssec::DnssecData;
use crate::epp::responses::DomainInfo;
use crate::epp::types::{ContactRole, DomainStatus};

#[derive(Debug, Clone, Default)]
pub struct DomainCache {
    pub auth_pw: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub expiration: Option<NaiveDate>,
    pub statuses: Option<Vec<DomainStatus>>,
    /// Host names as reported by domain info; addresses live in `hosts`.
    pub host_names: Option<Vec<String>>,
    /// Host name → IP list, filled by one host-info call per name.
    pub hosts: Option<BTreeMap<String, Vec<IpAddr>>>,
    /// Role → registry id. A role absent from the inner map has no
    /// contact; an absent outer map means contacts were never fetched.
    pub contact_ids: Option<BTreeMap<ContactRole, String>>,
    /// Present after any domain-info fetch; an empty set is "known none".
    pub dnssec: Option<DnssecData>,
}

impl DomainCache {
    /// Clear every fact unconditionally.
    pub fn invalidate(&mut self) {
        *self = Self::default();
    }

    /// Whether a domain-info response has been absorbed since the last
    /// invalidation.
    pub fn has_domain_info(&self) -> bool {
        self.host_names.is_some()
    }

    /// Absorb everything one domain-info response carries. Statuses decode
    /// leniently: a malformed list resolves to empty rather than failing
    /// the fetch.
    pub fn absorb_domain_info(&mut self, info: &DomainInfo) {
        self.auth_pw = info.auth_pw.clone();
        self.created = info.created;
        self.expiration = info.expiration;
        self.statuses = Some(DomainStatus::parse_list(&info.statuses));
        self.host_names = Some(info.hosts.clone());
        // host addresses are stale once the name list changes
        self.hosts = None;
        let mut ids: BTreeMap<ContactRole, String> = info
            .contacts
            .iter()
            .map(|c| (c.role, c.id.clone()))
            .collect();
        if let Some(registrant) = &info.registrant {
            ids.insert(ContactRole::Registrant, registrant.clone());
        }
        self.contact_ids = Some(ids);
        self.dnssec = Some(info.dnssec.clone().unwrap_or_default());
    }
}
