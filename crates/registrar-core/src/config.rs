//! Configuration for the synchronization engine
//!
//! Registry-imposed ceilings and the registrar-operated default contact
//! template. Defaults match the CISA-operated values the production
//! registry expects; deployments override them through the usual config
//! file deserialization.

use serde::{Deserialize, Serialize};

use crate::epp::ContactRole;

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Registry ceiling on nameservers per domain.
    #[serde(default = "default_max_nameservers")]
    pub max_nameservers: usize,

    /// Registry ceiling on contact identifier length.
    #[serde(default = "default_max_registry_id_len")]
    pub max_registry_id_len: usize,

    /// Auth password stamped on contact records created by this engine.
    #[serde(default = "default_contact_auth_pw")]
    pub contact_auth_pw: String,

    /// Template for registrar-operated default contacts.
    #[serde(default)]
    pub default_contact: ContactTemplate,
}

impl Config {
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.max_nameservers == 0 {
            return Err(crate::Error::config("max_nameservers must be > 0"));
        }
        if self.max_registry_id_len == 0 {
            return Err(crate::Error::config("max_registry_id_len must be > 0"));
        }
        if self.default_contact.email.is_empty() {
            return Err(crate::Error::config("default contact email cannot be empty"));
        }
        if self.contact_auth_pw.is_empty() {
            return Err(crate::Error::config("contact auth password cannot be empty"));
        }
        Ok(())
    }

    /// The default email for a role. Disclosure policy compares supplied
    /// emails against this value.
    pub fn default_email(&self, _role: ContactRole) -> &str {
        &self.default_contact.email
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_nameservers: default_max_nameservers(),
            max_registry_id_len: default_max_registry_id_len(),
            contact_auth_pw: default_contact_auth_pw(),
            default_contact: ContactTemplate::default(),
        }
    }
}

/// Contact values used whenever the registrant supplies none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactTemplate {
    pub name: String,
    pub org: String,
    pub street: String,
    pub city: String,
    pub sp: String,
    pub pc: String,
    pub cc: String,
    pub voice: String,
    pub email: String,
}

impl Default for ContactTemplate {
    fn default() -> Self {
        Self {
            name: "Registry Customer Service".to_string(),
            org: "Cybersecurity and Infrastructure Security Agency".to_string(),
            street: "4200 Wilson Blvd.".to_string(),
            city: "Arlington".to_string(),
            sp: "VA".to_string(),
            pc: "22201".to_string(),
            cc: "US".to_string(),
            voice: "+1.8882820870".to_string(),
            email: "dotgov@cisa.dhs.gov".to_string(),
        }
    }
}

fn default_max_nameservers() -> usize {
    13
}

fn default_max_registry_id_len() -> usize {
    16
}

fn default_contact_auth_pw() -> String {
    "2fooBAR123fooBaz".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn zero_ceiling_is_rejected() {
        let config = Config {
            max_nameservers: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_default_email_is_rejected() {
        let mut config = Config::default();
        config.default_contact.email.clear();
        assert!(config.validate().is_err());
    }
}
