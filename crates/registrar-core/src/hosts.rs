//! Nameserver validation and the host diff algorithm
//!
//! Everything here is pure: validation rejects bad input before any remote
//! call, and the diff compares a freshly fetched current host map against
//! the validated desired set. The facade turns the resulting change set
//! into commands.

use std::collections::{BTreeMap, BTreeSet};
use std::net::IpAddr;

use crate::error::NameserverError;

/// A caller-supplied nameserver entry: hostname plus optional IP glue.
/// Addresses arrive as strings so that unparseable input is reported as a
/// validation error instead of a panic at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredNameserver {
    pub name: String,
    pub addrs: Option<Vec<String>>,
}

impl DesiredNameserver {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            addrs: None,
        }
    }

    pub fn with_addrs<S: Into<String>>(name: impl Into<String>, addrs: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            addrs: Some(addrs.into_iter().map(Into::into).collect()),
        }
    }
}

/// A desired entry that passed validation: normalized name, parsed IPs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedNameserver {
    pub name: String,
    pub addrs: Vec<IpAddr>,
}

/// Hostname validation for nameservers: total length ≤ 253, at least three
/// labels, each label 1-63 chars of alphanumerics and hyphens with no
/// leading or trailing hyphen.
pub fn is_valid_host(name: &str) -> bool {
    if name.len() > 253 {
        return false;
    }
    let labels: Vec<&str> = name.split('.').collect();
    if labels.len() < 3 {
        return false;
    }
    labels.iter().all(|label| is_valid_label(label))
}

/// Domain names follow the same label rules but need only two labels.
pub fn is_valid_domain(name: &str) -> bool {
    if name.len() > 253 {
        return false;
    }
    let labels: Vec<&str> = name.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    labels.iter().all(|label| is_valid_label(label))
}

fn is_valid_label(label: &str) -> bool {
    if label.is_empty() || label.len() > 63 {
        return false;
    }
    if label.starts_with('-') || label.ends_with('-') {
        return false;
    }
    label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// A host is subordinate when its name is a strict subdomain of the domain
/// it serves.
pub fn is_subordinate(host: &str, domain: &str) -> bool {
    host.len() > domain.len() + 1 && host.ends_with(&format!(".{domain}"))
}

/// Validate a desired nameserver set against the subordinate-host rules
/// and the registry's entry ceiling. Runs before any remote call.
pub fn validate_desired(
    domain: &str,
    desired: &[DesiredNameserver],
    max: usize,
) -> Result<Vec<ValidatedNameserver>, NameserverError> {
    if desired.len() > max {
        return Err(NameserverError::TooMany {
            count: desired.len(),
            max,
        });
    }

    let mut validated = Vec::with_capacity(desired.len());
    for entry in desired {
        let name = entry.name.trim().to_ascii_lowercase();
        if !is_valid_host(&name) {
            return Err(NameserverError::InvalidHost(entry.name.clone()));
        }

        let raw_addrs = entry.addrs.as_deref().unwrap_or_default();
        let mut addrs = Vec::with_capacity(raw_addrs.len());
        for raw in raw_addrs {
            let addr: IpAddr = raw.parse().map_err(|_| NameserverError::InvalidIp {
                host: name.clone(),
                addr: raw.clone(),
            })?;
            addrs.push(addr);
        }

        if is_subordinate(&name, domain) {
            if addrs.is_empty() {
                return Err(NameserverError::SubordinateNeedsIp(name));
            }
        } else if !addrs.is_empty() {
            return Err(NameserverError::GlueNotAllowed(name));
        }

        validated.push(ValidatedNameserver { name, addrs });
    }
    Ok(validated)
}

/// IP-set change for one existing host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIpDiff {
    pub name: String,
    pub add: Vec<IpAddr>,
    pub rem: Vec<IpAddr>,
}

/// Partition of the desired set against the current registry host map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostChanges {
    pub to_create: Vec<ValidatedNameserver>,
    pub to_update: Vec<HostIpDiff>,
    pub to_delete: Vec<String>,
    pub unchanged: Vec<String>,
}

impl HostChanges {
    /// An idempotent desired set produces no writes at all.
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }
}

/// Diff the current host map (name → IP list, registry truth) against the
/// validated desired set. Input ordering of the desired set is irrelevant.
pub fn diff_hosts(
    current: &BTreeMap<String, Vec<IpAddr>>,
    desired: &[ValidatedNameserver],
) -> HostChanges {
    let mut changes = HostChanges::default();
    let desired_names: BTreeSet<&str> = desired.iter().map(|ns| ns.name.as_str()).collect();

    for ns in desired {
        match current.get(&ns.name) {
            None => changes.to_create.push(ns.clone()),
            Some(current_addrs) => {
                let old: BTreeSet<IpAddr> = current_addrs.iter().copied().collect();
                let new: BTreeSet<IpAddr> = ns.addrs.iter().copied().collect();
                if old == new {
                    changes.unchanged.push(ns.name.clone());
                } else {
                    changes.to_update.push(HostIpDiff {
                        name: ns.name.clone(),
                        add: new.difference(&old).copied().collect(),
                        rem: old.difference(&new).copied().collect(),
                    });
                }
            }
        }
    }

    for name in current.keys() {
        if !desired_names.contains(name.as_str()) {
            changes.to_delete.push(name.clone());
        }
    }

    changes
}
