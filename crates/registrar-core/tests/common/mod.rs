//! Test doubles and common utilities for reconciliation contract tests
//!
//! The mock registry keeps a tiny in-memory model of one domain so that a
//! reconciliation's writes are visible to its own re-fetches, and records
//! every command sent so tests can assert the exact sequence.

use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use registrar_core::epp::commands::ContactCommand;
use registrar_core::epp::responses::{ContactInfo, DomainInfo, HostInfo};
use registrar_core::epp::{Command, Response};
use registrar_core::error::{ErrorCode, RegistryError};
use registrar_core::traits::RegistryClient;

/// A mock RegistryClient backed by an in-memory model of one domain.
pub struct MockRegistryClient {
    /// Registry-side domain object; `None` means the registry has never
    /// seen the name (info answers 2303).
    domain: Mutex<Option<DomainInfo>>,
    /// Host name → IP list for host-info answers.
    hosts: Mutex<HashMap<String, Vec<IpAddr>>>,
    /// Contact id → contact-info payload.
    contacts: Mutex<HashMap<String, ContactInfo>>,
    /// Availability answers for check commands (default: available).
    availability: Mutex<HashMap<String, bool>>,
    /// Forced rejections keyed by command kind, e.g. "delete_domain".
    failures: Mutex<HashMap<&'static str, RegistryError>>,
    /// Every command sent, in order.
    sent: Mutex<Vec<Command>>,
    /// Call counter for send()
    call_count: Arc<AtomicUsize>,
    /// Call counter for commands with side effects
    write_count: Arc<AtomicUsize>,
}

impl MockRegistryClient {
    pub fn new() -> Self {
        Self {
            domain: Mutex::new(None),
            hosts: Mutex::new(HashMap::new()),
            contacts: Mutex::new(HashMap::new()),
            availability: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
            call_count: Arc::new(AtomicUsize::new(0)),
            write_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Seed the registry-side domain object.
    pub fn with_domain(self, info: DomainInfo) -> Self {
        *self.domain.lock().unwrap() = Some(info);
        self
    }

    /// Seed one host record.
    pub fn with_host(self, name: &str, addrs: &[&str]) -> Self {
        self.hosts.lock().unwrap().insert(
            name.to_string(),
            addrs.iter().map(|a| a.parse().unwrap()).collect(),
        );
        self
    }

    /// Seed one contact record.
    pub fn with_contact(self, id: &str, info: ContactInfo) -> Self {
        self.contacts.lock().unwrap().insert(id.to_string(), info);
        self
    }

    pub fn set_available(&self, name: &str, available: bool) {
        self.availability
            .lock()
            .unwrap()
            .insert(name.to_string(), available);
    }

    /// Force every command of `kind` to be rejected with `error`.
    pub fn fail_on(&self, kind: &'static str, error: RegistryError) {
        self.failures.lock().unwrap().insert(kind, error);
    }

    pub fn clear_failure(&self, kind: &'static str) {
        self.failures.lock().unwrap().remove(kind);
    }

    /// Get the number of times send() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Get the number of write commands sent
    pub fn write_count(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }

    /// Get the full command log, in send order
    pub fn sent_commands(&self) -> Vec<Command> {
        self.sent.lock().unwrap().clone()
    }

    /// Get only the commands with side effects, in send order
    pub fn sent_writes(&self) -> Vec<Command> {
        self.sent_commands()
            .into_iter()
            .filter(Command::is_write)
            .collect()
    }

    /// Registry-side contact record, for post-reconciliation assertions
    pub fn contact(&self, id: &str) -> Option<ContactInfo> {
        self.contacts.lock().unwrap().get(id).cloned()
    }

    /// Registry-side domain object, for post-reconciliation assertions
    pub fn domain(&self) -> Option<DomainInfo> {
        self.domain.lock().unwrap().clone()
    }

    fn kind(command: &Command) -> &'static str {
        match command {
            Command::CheckDomain { .. } => "check_domain",
            Command::InfoDomain { .. } => "info_domain",
            Command::CreateDomain { .. } => "create_domain",
            Command::UpdateDomain(_) => "update_domain",
            Command::DeleteDomain { .. } => "delete_domain",
            Command::RenewDomain { .. } => "renew_domain",
            Command::InfoHost { .. } => "info_host",
            Command::CreateHost { .. } => "create_host",
            Command::UpdateHost { .. } => "update_host",
            Command::DeleteHost { .. } => "delete_host",
            Command::InfoContact { .. } => "info_contact",
            Command::CreateContact(_) => "create_contact",
            Command::UpdateContact(_) => "update_contact",
            Command::DeleteContact { .. } => "delete_contact",
        }
    }

    fn not_found(what: &str) -> RegistryError {
        RegistryError::new(ErrorCode::ObjectDoesNotExist, format!("{what} does not exist"))
    }

    fn store_contact(&self, payload: &ContactCommand) {
        self.contacts.lock().unwrap().insert(
            payload.id.clone(),
            ContactInfo {
                id: Some(payload.id.clone()),
                role: None,
                postal: Some(payload.postal.clone()),
                email: Some(payload.email.clone()),
                voice: payload.voice.clone(),
                fax: payload.fax.clone(),
                auth_pw: Some(payload.auth_pw.clone()),
            },
        );
    }

    fn handle(&self, command: &Command) -> Result<Response, RegistryError> {
        match command {
            Command::CheckDomain { names } => {
                let name = names.first().cloned().unwrap_or_default();
                let available = self
                    .availability
                    .lock()
                    .unwrap()
                    .get(&name)
                    .copied()
                    .unwrap_or(true);
                Ok(Response::DomainCheck { name, available, reason: None })
            }
            Command::InfoDomain { name } => match self.domain.lock().unwrap().clone() {
                Some(info) => Ok(Response::DomainInfo(Box::new(info))),
                None => Err(Self::not_found(name)),
            },
            Command::CreateDomain { name, registrant, auth_pw } => {
                *self.domain.lock().unwrap() = Some(DomainInfo {
                    name: name.clone(),
                    auth_pw: Some(auth_pw.clone()),
                    registrant: Some(registrant.clone()),
                    ..DomainInfo::default()
                });
                Ok(Response::Completed)
            }
            Command::UpdateDomain(update) => {
                let mut guard = self.domain.lock().unwrap();
                let domain = guard.as_mut().ok_or_else(|| Self::not_found(&update.name))?;
                domain.hosts.retain(|h| !update.rem_hosts.contains(h));
                domain.hosts.extend(update.add_hosts.iter().cloned());
                domain
                    .contacts
                    .retain(|c| !update.rem_contacts.contains(c));
                domain.contacts.extend(update.add_contacts.iter().cloned());
                if let Some(registrant) = &update.registrant {
                    domain.registrant = Some(registrant.clone());
                }
                for status in &update.rem_statuses {
                    let wire = wire_status(*status);
                    domain.statuses.retain(|s| *s != wire);
                }
                for status in &update.add_statuses {
                    domain.statuses.push(wire_status(*status));
                }
                if let Some(dnssec) = &update.dnssec {
                    let mut data = domain.dnssec.clone().unwrap_or_default();
                    if dnssec.remove_all {
                        data = Default::default();
                    } else if let Some(rem) = &dnssec.remove {
                        data.ds_records.retain(|r| !rem.ds_records.contains(r));
                        data.key_records.retain(|r| !rem.key_records.contains(r));
                    }
                    if let Some(add) = &dnssec.add {
                        data.ds_records = add.ds_records.clone();
                        data.key_records = add.key_records.clone();
                        data.max_sig_life = add.max_sig_life;
                    }
                    domain.dnssec = if data.is_empty() { None } else { Some(data) };
                }
                Ok(Response::Completed)
            }
            Command::DeleteDomain { name } => {
                let mut guard = self.domain.lock().unwrap();
                if guard.is_none() {
                    return Err(Self::not_found(name));
                }
                *guard = None;
                Ok(Response::Completed)
            }
            Command::RenewDomain { current_expiration, years, .. } => {
                let expiration = current_expiration
                    .with_year(current_expiration.year() + *years as i32)
                    .unwrap();
                if let Some(domain) = self.domain.lock().unwrap().as_mut() {
                    domain.expiration = Some(expiration);
                }
                Ok(Response::DomainRenewed { expiration })
            }
            Command::InfoHost { name } => {
                let addrs = self
                    .hosts
                    .lock()
                    .unwrap()
                    .get(name)
                    .cloned()
                    .ok_or_else(|| Self::not_found(name))?;
                Ok(Response::HostInfo(HostInfo {
                    name: name.clone(),
                    addrs,
                    created: None,
                }))
            }
            Command::CreateHost { name, addrs } => {
                let mut hosts = self.hosts.lock().unwrap();
                if hosts.contains_key(name) {
                    return Err(RegistryError::new(
                        ErrorCode::ObjectExists,
                        format!("{name} already exists"),
                    ));
                }
                hosts.insert(name.clone(), addrs.clone());
                Ok(Response::Completed)
            }
            Command::UpdateHost { name, add, rem } => {
                let mut hosts = self.hosts.lock().unwrap();
                let entry = hosts.get_mut(name).ok_or_else(|| Self::not_found(name))?;
                entry.retain(|a| !rem.contains(a));
                entry.extend(add.iter().copied());
                Ok(Response::Completed)
            }
            Command::DeleteHost { name } => {
                self.hosts
                    .lock()
                    .unwrap()
                    .remove(name)
                    .ok_or_else(|| Self::not_found(name))?;
                Ok(Response::Completed)
            }
            Command::InfoContact { id } => {
                let info = self
                    .contacts
                    .lock()
                    .unwrap()
                    .get(id)
                    .cloned()
                    .ok_or_else(|| Self::not_found(id))?;
                Ok(Response::ContactInfo(info))
            }
            Command::CreateContact(payload) | Command::UpdateContact(payload) => {
                self.store_contact(payload);
                Ok(Response::Completed)
            }
            Command::DeleteContact { id } => {
                self.contacts
                    .lock()
                    .unwrap()
                    .remove(id)
                    .ok_or_else(|| Self::not_found(id))?;
                Ok(Response::Completed)
            }
        }
    }
}

#[async_trait::async_trait]
impl RegistryClient for MockRegistryClient {
    async fn send(&self, command: Command) -> Result<Response, RegistryError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if command.is_write() {
            self.write_count.fetch_add(1, Ordering::SeqCst);
        }
        self.sent.lock().unwrap().push(command.clone());

        if let Some(error) = self.failures.lock().unwrap().get(Self::kind(&command)) {
            return Err(error.clone());
        }
        self.handle(&command)
    }
}

fn wire_status(status: registrar_core::DomainStatus) -> String {
    // statuses travel as camelCase strings on the wire
    serde_json::to_value(status)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap()
}

/// Helper to build a registry-side domain object with the given hosts
pub fn domain_with_hosts(name: &str, hosts: &[&str]) -> DomainInfo {
    DomainInfo {
        name: name.to_string(),
        auth_pw: Some("2fooBAR".to_string()),
        expiration: NaiveDate::from_ymd_opt(2027, 5, 25),
        statuses: vec!["ok".to_string()],
        hosts: hosts.iter().map(|h| h.to_string()).collect(),
        ..DomainInfo::default()
    }
}
