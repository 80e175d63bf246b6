//! Domain lifecycle state machine
//!
//! The registry is the system of record for a domain's existence; this
//! state machine tracks the registrar's coarse view of it and gates which
//! reconciliation operations are legal at any point. Transitions happen in
//! two ways: explicit operator actions (hold, revert, delete) and the side
//! effect of nameserver reconciliation crossing the two-nameserver
//! threshold.
//!
//! The table is checked *before* any command is sent, so an illegal
//! operation never reaches the registry.

use serde::{Deserialize, Serialize};

/// Number of active nameservers required for a domain to resolve.
pub const MIN_ACTIVE_NAMESERVERS: usize = 2;

/// Coarse-grained domain status as tracked by this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    /// Registry facts never fetched, or the fetch returned nothing conclusive.
    Unknown,
    /// Domain exists in the registry with fewer than two active nameservers.
    DnsNeeded,
    /// Domain exists, has two or more nameservers, and carries no hold status.
    Ready,
    /// A client or server hold status is present.
    OnHold,
    /// Terminal. All further reconciliation is forbidden.
    Deleted,
}

/// Operations gated by the state table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SetNameservers,
    SetContact,
    SetDnssec,
    PlaceHold,
    RevertHold,
    Delete,
    Renew,
}

impl Operation {
    pub fn describe(self) -> &'static str {
        match self {
            Operation::SetNameservers => "set nameservers",
            Operation::SetContact => "set contact",
            Operation::SetDnssec => "set DNSSEC data",
            Operation::PlaceHold => "place hold",
            Operation::RevertHold => "revert hold",
            Operation::Delete => "delete domain",
            Operation::Renew => "renew domain",
        }
    }
}

impl State {
    /// Whether `op` may be dispatched from this state.
    ///
    /// `Deleted` is handled separately by the facade (it maps to a
    /// domain-not-mutable error rather than an illegal transition) but the
    /// table still answers `false` for it.
    pub fn allows(self, op: Operation) -> bool {
        use Operation::*;
        use State::*;
        match (self, op) {
            (Deleted, _) => false,
            (OnHold, SetNameservers) => false,
            (_, SetNameservers) => true,
            (_, SetContact) => true,
            (_, SetDnssec) => true,
            // place_hold is a no-op when already held, so OnHold is legal
            (Ready | OnHold, PlaceHold) => true,
            (_, PlaceHold) => false,
            (Ready | OnHold, RevertHold) => true,
            (_, RevertHold) => false,
            (Unknown | DnsNeeded | OnHold, Delete) => true,
            (_, Delete) => false,
            (DnsNeeded | Ready | OnHold, Renew) => true,
            (_, Renew) => false,
        }
    }

    /// Re-derive Ready vs DnsNeeded from the nameserver count after a
    /// reconciliation run. Hold and deleted states are never overridden
    /// here.
    pub fn after_nameserver_count(self, active: usize) -> State {
        match self {
            State::OnHold | State::Deleted => self,
            _ if active >= MIN_ACTIVE_NAMESERVERS => State::Ready,
            _ => State::DnsNeeded,
        }
    }

    pub fn is_deleted(self) -> bool {
        self == State::Deleted
    }
}
