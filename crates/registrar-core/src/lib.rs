// # registrar-core
//
// Core library for the registrar domain-synchronization engine.
//
// ## Architecture Overview
//
// This library keeps a registrar's view of a domain converged with the
// registry of record:
// - **RegistryClient**: Trait for the transport boundary (one command, one
//   round trip, classified rejections)
// - **Domain**: Facade that owns the attribute cache and the lifecycle
//   state and drives every reconciliation
// - **DomainCache**: Read-through cache of registry facts, invalidated
//   wholesale after any successful write
// - **hosts / contacts / dnssec**: Pure validation and diff logic, one
//   module per reconciler
// - **lifecycle**: State table consulted before any command is sent
//
// ## Design Principles
//
// 1. **Registry as source of truth**: Reconciliations diff against a fresh
//    fetch, never against local state
// 2. **Validate before the wire**: Configuration and transition errors
//    never cost a round trip
// 3. **Idempotency**: Re-submitting the current desired state issues no
//    write commands
// 4. **Classified failures**: Registry rejections carry their numeric code
//    end to end

pub mod cache;
pub mod config;
pub mod contacts;
pub mod dnssec;
pub mod domain;
pub mod epp;
pub mod error;
pub mod hosts;
pub mod lifecycle;
pub mod traits;

// Re-export core types for convenience
pub use cache::DomainCache;
pub use config::{Config, ContactTemplate};
pub use contacts::PublicContact;
pub use dnssec::{DnssecData, DsRecord, KeyRecord};
pub use domain::Domain;
pub use epp::{Command, ContactRole, DomainStatus, Response, UpdateDomain};
pub use error::{ContactErrorKind, Error, ErrorCode, NameserverError, RegistryError, Result};
pub use hosts::DesiredNameserver;
pub use lifecycle::{Operation, State, MIN_ACTIVE_NAMESERVERS};
pub use traits::RegistryClient;
