//! Error types for the synchronization engine
//!
//! Three families flow through the reconcilers:
//! - validation errors, raised before any remote call;
//! - illegal-transition errors, also raised before any remote call;
//! - registry errors, raised by the transport boundary with a classified
//!   numeric code that round-trips to the caller untouched.
//!
//! Data-shape problems in registry responses are a fourth, smaller family:
//! advisory facts (statuses) swallow them, load-bearing facts (contact
//! identifiers) surface them as classified contact errors.

use thiserror::Error;

use crate::lifecycle::State;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the synchronization engine
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid nameserver configuration, detected before any remote call
    #[error("nameserver error: {0}")]
    Nameserver(#[from] NameserverError),

    /// Contact mapping or reconciliation error
    #[error("contact error: {0}")]
    Contact(#[from] ContactError),

    /// The registry rejected a command
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Operation not legal in the domain's current lifecycle state
    #[error("cannot {action} while domain is in state {state:?}")]
    TransitionNotAllowed { action: &'static str, state: State },

    /// Domain has been deleted in the registry; no further mutation is possible
    #[error("domain {0} is deleted and can no longer be modified")]
    DomainNotMutable(String),

    /// Malformed domain name supplied by the caller
    #[error("invalid domain name: {0}")]
    InvalidDomainName(String),

    /// A registry response did not have the shape the command implies
    #[error("expected a {expected} response from the registry")]
    UnexpectedResponse { expected: &'static str },

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

/// Nameserver configuration problems, all detectable without I/O.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameserverError {
    #[error("{count} nameservers supplied, registry allows at most {max}")]
    TooMany { count: usize, max: usize },

    #[error("{0} is not a valid nameserver hostname")]
    InvalidHost(String),

    #[error("{0} is subordinate to this domain and requires at least one IP address")]
    SubordinateNeedsIp(String),

    #[error("{0} is not subordinate to this domain and must not carry IP addresses")]
    GlueNotAllowed(String),

    #[error("{addr} is not a valid IP address for nameserver {host}")]
    InvalidIp { host: String, addr: String },
}

/// Classified codes for contact mapping failures. Calling code reacts to
/// the code, not the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactErrorKind {
    /// Registry identifier exceeds the registry's maximum length
    IdTooLong,
    /// Registry identifier absent from the payload
    IdMissing,
    /// Contact role/type absent
    RoleMissing,
    /// Payload is not a recognized contact-info shape
    InvalidShape,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ContactError {
    pub kind: ContactErrorKind,
    message: String,
}

impl ContactError {
    pub fn new(kind: ContactErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ContactErrorKind {
        self.kind
    }
}

/// Structured error code carried on every registry rejection.
///
/// The values mirror the provisioning protocol's numeric result codes, so
/// the classification predicates below round-trip exactly what the
/// transport reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    CommandSyntaxError = 2001,
    CommandUseError = 2002,
    RequiredParameterMissing = 2003,
    ParameterValueRangeError = 2004,
    ParameterValueSyntaxError = 2005,
    UnimplementedCommand = 2101,
    AuthorizationError = 2201,
    ObjectExists = 2302,
    ObjectDoesNotExist = 2303,
    ObjectStatusProhibitsOperation = 2304,
    ObjectAssociationProhibitsOperation = 2305,
    ParameterValuePolicyError = 2306,
    CommandFailed = 2400,
    CommandFailedServerClosingConnection = 2500,
    AuthenticationErrorServerClosingConnection = 2501,
    SessionLimitExceededServerClosingConnection = 2502,
}

impl ErrorCode {
    pub fn code(self) -> u16 {
        self as u16
    }
}

/// Error raised by the transport boundary when a command is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("registry error {code}: {message}", code = self.code.code())]
pub struct RegistryError {
    pub code: ErrorCode,
    pub message: String,
}

impl RegistryError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// 2000-2308: the command itself was at fault.
    pub fn is_client_error(&self) -> bool {
        (2000..=2308).contains(&self.code.code())
    }

    /// 2500-2502: the session is gone and must be re-established.
    pub fn is_session_error(&self) -> bool {
        (2500..=2502).contains(&self.code.code())
    }

    /// 2400: the registry failed internally.
    pub fn is_server_error(&self) -> bool {
        self.code.code() == 2400
    }
}
