//! Responses returned by the registry
//!
//! A tagged union of the response shapes the engine expects, decoded
//! through one method per category. Commands that only acknowledge
//! (creates, updates, deletes) return [`Response::Completed`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::dnssec::DnssecData;
use crate::epp::types::{ContactPostal, ContactRole, DomainContact};
use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "response", rename_all = "snake_case")]
pub enum Response {
    /// Command completed with no data to report.
    Completed,
    DomainCheck {
        name: String,
        available: bool,
        reason: Option<String>,
    },
    DomainInfo(Box<DomainInfo>),
    DomainRenewed {
        expiration: NaiveDate,
    },
    HostInfo(HostInfo),
    ContactInfo(ContactInfo),
}

/// Everything a domain-info response carries. Statuses arrive as raw
/// strings; the cache decodes them leniently because they are advisory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainInfo {
    pub name: String,
    pub auth_pw: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub expiration: Option<NaiveDate>,
    pub statuses: Vec<String>,
    /// Host names only; addresses require a host-info call per name.
    pub hosts: Vec<String>,
    pub contacts: Vec<DomainContact>,
    pub registrant: Option<String>,
    pub dnssec: Option<DnssecData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostInfo {
    pub name: String,
    pub addrs: Vec<IpAddr>,
    pub created: Option<DateTime<Utc>>,
}

/// Raw contact-info payload. Field-level validation (identifier length,
/// required role) happens in the contact mapper, which is where the
/// classified contact errors come from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub id: Option<String>,
    pub role: Option<ContactRole>,
    pub postal: Option<ContactPostal>,
    pub email: Option<String>,
    pub voice: Option<String>,
    pub fax: Option<String>,
    pub auth_pw: Option<String>,
}

impl Response {
    pub fn into_domain_info(self) -> Result<DomainInfo, Error> {
        match self {
            Response::DomainInfo(info) => Ok(*info),
            _ => Err(Error::UnexpectedResponse { expected: "domain info" }),
        }
    }

    pub fn into_host_info(self) -> Result<HostInfo, Error> {
        match self {
            Response::HostInfo(info) => Ok(info),
            _ => Err(Error::UnexpectedResponse { expected: "host info" }),
        }
    }

    pub fn into_contact_info(self) -> Result<ContactInfo, Error> {
        match self {
            Response::ContactInfo(info) => Ok(info),
            _ => Err(Error::UnexpectedResponse { expected: "contact info" }),
        }
    }

    pub fn into_domain_check(self) -> Result<bool, Error> {
        match self {
            Response::DomainCheck { available, .. } => Ok(available),
            _ => Err(Error::UnexpectedResponse { expected: "domain check" }),
        }
    }

    pub fn into_renewal(self) -> Result<NaiveDate, Error> {
        match self {
            Response::DomainRenewed { expiration } => Ok(expiration),
            _ => Err(Error::UnexpectedResponse { expected: "domain renewal" }),
        }
    }
}
