//! Wire-level command and response shapes
//!
//! The transport layer owns serialization and the session; this module owns
//! the *shapes*. Commands form one tagged union, responses another, and each
//! response category is decoded through an explicit method rather than
//! introspected, so a wrong-shape response is a typed error instead of a
//! surprise at a call site.

pub mod commands;
pub mod responses;
pub mod types;

pub use commands::{Command, DnssecUpdate, UpdateDomain};
pub use responses::{ContactInfo, DomainInfo, HostInfo, Response};
pub use types::{ContactPostal, ContactRole, DomainContact, DomainStatus};
