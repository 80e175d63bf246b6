//! Boundary traits
//!
//! The engine talks to exactly one external system: the registry. The
//! trait here is the seam where the transport/session layer plugs in.

pub mod registry_client;

pub use registry_client::RegistryClient;
