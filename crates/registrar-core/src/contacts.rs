//! Role-bound contact records and the disclosure policy
//!
//! Contacts live in the registry; this module maps between the registry's
//! contact-info payloads and the engine's typed representation, fills in
//! the registrar-operated defaults, and decides whether an email address
//! is publicly disclosed.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::{Config, ContactTemplate};
use crate::epp::commands::{Command, ContactCommand};
use crate::epp::responses::ContactInfo;
use crate::epp::types::{ContactPostal, ContactRole};
use crate::error::{ContactError, ContactErrorKind};

/// A registry-side contact record bound to a domain by role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicContact {
    pub role: ContactRole,
    /// Opaque registry identifier; empty until one is assigned.
    pub registry_id: String,
    pub name: String,
    pub org: Option<String>,
    pub street1: String,
    pub street2: Option<String>,
    pub street3: Option<String>,
    pub city: String,
    pub sp: String,
    pub pc: String,
    pub cc: String,
    pub email: String,
    pub voice: Option<String>,
    pub fax: Option<String>,
    pub auth_pw: String,
}

impl PublicContact {
    /// Build a role's default contact from the configured template.
    pub fn from_template(role: ContactRole, template: &ContactTemplate, auth_pw: &str) -> Self {
        Self {
            role,
            registry_id: String::new(),
            name: template.name.clone(),
            org: Some(template.org.clone()),
            street1: template.street.clone(),
            street2: None,
            street3: None,
            city: template.city.clone(),
            sp: template.sp.clone(),
            pc: template.pc.clone(),
            cc: template.cc.clone(),
            email: template.email.clone(),
            voice: Some(template.voice.clone()),
            fax: None,
            auth_pw: auth_pw.to_string(),
        }
    }

    pub fn default_for(role: ContactRole, config: &Config) -> Self {
        Self::from_template(role, &config.default_contact, &config.contact_auth_pw)
    }

    /// Same registrant-visible data, ignoring the registry id and auth
    /// password. Used for the no-rewrite idempotence check.
    pub fn same_data(&self, other: &PublicContact) -> bool {
        self.role == other.role
            && self.name == other.name
            && self.org == other.org
            && self.street1 == other.street1
            && self.street2 == other.street2
            && self.street3 == other.street3
            && self.city == other.city
            && self.sp == other.sp
            && self.pc == other.pc
            && self.cc == other.cc
            && self.email == other.email
            && self.voice == other.voice
            && self.fax == other.fax
    }

    fn postal(&self) -> ContactPostal {
        let streets = [Some(&self.street1), self.street2.as_ref(), self.street3.as_ref()]
            .into_iter()
            .flatten()
            .cloned()
            .collect();
        ContactPostal {
            name: self.name.clone(),
            org: self.org.clone(),
            streets,
            city: self.city.clone(),
            sp: self.sp.clone(),
            pc: self.pc.clone(),
            cc: self.cc.clone(),
        }
    }

    fn to_payload(&self, disclose_email: bool) -> ContactCommand {
        ContactCommand {
            id: self.registry_id.clone(),
            postal: self.postal(),
            email: self.email.clone(),
            voice: self.voice.clone(),
            fax: self.fax.clone(),
            auth_pw: self.auth_pw.clone(),
            disclose_email,
        }
    }

    pub fn to_create_command(&self, disclose_email: bool) -> Command {
        Command::CreateContact(self.to_payload(disclose_email))
    }

    pub fn to_update_command(&self, disclose_email: bool) -> Command {
        Command::UpdateContact(self.to_payload(disclose_email))
    }
}

/// Disclosure policy: only security and technical emails are ever public,
/// and only when the registrant supplied something other than the
/// registrar-operated default.
pub fn disclose_email(contact: &PublicContact, default_email: &str) -> bool {
    matches!(contact.role, ContactRole::Security | ContactRole::Technical)
        && contact.email != default_email
}

/// Map a raw contact-info response into the typed representation.
///
/// Contact identifiers are load-bearing, so shape problems surface as
/// classified errors rather than being swallowed: each condition carries a
/// distinct [`ContactErrorKind`] for callers to react to.
pub fn map_contact_info(
    info: &ContactInfo,
    registry_id: Option<&str>,
    role: Option<ContactRole>,
    max_id_len: usize,
) -> Result<PublicContact, ContactError> {
    let id = registry_id.ok_or_else(|| {
        ContactError::new(ContactErrorKind::IdMissing, "contact registry id is required")
    })?;
    if id.len() > max_id_len {
        return Err(ContactError::new(
            ContactErrorKind::IdTooLong,
            format!("contact id {id} exceeds the registry maximum of {max_id_len} characters"),
        ));
    }
    let role = role.ok_or_else(|| {
        ContactError::new(ContactErrorKind::RoleMissing, "contact role is required")
    })?;
    let postal = info.postal.as_ref().ok_or_else(|| {
        ContactError::new(
            ContactErrorKind::InvalidShape,
            "payload is not a recognized contact-info shape",
        )
    })?;

    let mut streets = postal.streets.iter().cloned();
    Ok(PublicContact {
        role,
        registry_id: id.to_string(),
        name: postal.name.clone(),
        org: postal.org.clone(),
        street1: streets.next().unwrap_or_default(),
        street2: streets.next(),
        street3: streets.next(),
        city: postal.city.clone(),
        sp: postal.sp.clone(),
        pc: postal.pc.clone(),
        cc: postal.cc.clone(),
        email: info.email.clone().unwrap_or_default(),
        voice: info.voice.clone(),
        fax: info.fax.clone(),
        auth_pw: info.auth_pw.clone().unwrap_or_default(),
    })
}

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate an opaque registry identifier within the registry's length
/// ceiling. Uniqueness comes from the timestamp plus a process-local
/// counter; the registry rejects collisions with an object-exists error.
pub fn generate_registry_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let seq = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    let id = format!("C{:x}{:04x}", nanos, seq & 0xffff);
    id.chars().take(16).collect()
}
