//! DNSSEC record sets and the reconciliation diff
//!
//! The desired record set entirely replaces whatever the registry holds.
//! The diff is computed against a baseline freshly fetched by the facade,
//! never against a stale local copy.

use serde::{Deserialize, Serialize};

use crate::epp::commands::DnssecUpdate;

/// A delegation-signer record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DsRecord {
    pub key_tag: u16,
    pub alg: u8,
    pub digest_type: u8,
    pub digest: String,
}

/// A DNSKEY record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyRecord {
    pub flags: u16,
    pub protocol: u8,
    pub alg: u8,
    pub pub_key: String,
}

/// A domain's signing data: DS entries, key entries, and an optional
/// maximum signature lifetime in seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnssecData {
    pub max_sig_life: Option<u32>,
    pub ds_records: Vec<DsRecord>,
    pub key_records: Vec<KeyRecord>,
}

impl DnssecData {
    pub fn is_empty(&self) -> bool {
        self.ds_records.is_empty() && self.key_records.is_empty()
    }

    /// Order-insensitive equality on the record material.
    fn same_records(&self, other: &DnssecData) -> bool {
        let mut a_ds = self.ds_records.clone();
        let mut b_ds = other.ds_records.clone();
        a_ds.sort();
        b_ds.sort();
        let mut a_key = self.key_records.clone();
        let mut b_key = other.key_records.clone();
        a_key.sort();
        b_key.sort();
        a_ds == b_ds && a_key == b_key
    }
}

/// Compute the extension payload needed to move the registry from
/// `baseline` to `desired`. `None` means the registry already matches and
/// no update command should be sent.
pub fn diff(baseline: &DnssecData, desired: Option<&DnssecData>) -> Option<DnssecUpdate> {
    match desired {
        None => {
            if baseline.is_empty() {
                None
            } else {
                Some(DnssecUpdate {
                    add: None,
                    remove: Some(baseline.clone()),
                    remove_all: false,
                })
            }
        }
        Some(d) if d.is_empty() => diff(baseline, None),
        Some(d) => {
            if baseline.same_records(d) && baseline.max_sig_life == d.max_sig_life {
                return None;
            }
            Some(DnssecUpdate {
                add: Some(d.clone()),
                remove: if baseline.is_empty() {
                    None
                } else {
                    Some(baseline.clone())
                },
                remove_all: false,
            })
        }
    }
}
