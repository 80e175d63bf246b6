//! Registry client trait
//!
//! Defines the interface to the transport/session layer that serializes
//! commands and returns structured responses.
//!
//! # Responsibility boundaries
//!
//! Implementations are transport only:
//!
//! - one `send` call is one round trip, nothing batched, nothing cached;
//! - no retry or backoff (the engine decides what to re-issue; a duplicated
//!   write here would break the reconcilers' idempotence guarantees);
//! - no interpretation of responses beyond decoding the wire shape;
//! - rejections surface as [`RegistryError`] with the registry's own
//!   classified code, untranslated.
//!
//! The engine in turn never opens sessions, never sees the wire encoding,
//! and assumes a command that returned an error had no observable effect
//! it needs to unwind; partial completion of a multi-step reconciliation
//! is recovered by the next run's fresh fetch, not rolled back.

use async_trait::async_trait;

use crate::epp::{Command, Response};
use crate::error::RegistryError;

/// Interface to the authoritative registry.
///
/// # Thread safety
///
/// Implementations must be usable across async tasks; the engine holds one
/// behind an `Arc` and different domains may share it concurrently.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Send one command and await its response.
    ///
    /// # Returns
    ///
    /// - `Ok(Response)`: the registry accepted the command
    /// - `Err(RegistryError)`: the registry rejected it, with its
    ///   classified result code
    async fn send(&self, command: Command) -> Result<Response, RegistryError>;
}
