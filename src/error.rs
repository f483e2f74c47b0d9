use derive_more::Display;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Defines the library's custom error types.
///
/// Transport failures (connection, URL, decoding) and domain errors reported
/// by the hypervisor API (`Api`, `NotFound`) are separate variants, so callers
/// can branch on the family they care about.
///
#[derive(Debug, Error)]
pub enum Error {
    #[error("Error: {0}")]
    Any(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Workstation API error: {0}: code {1}, message: {2}")]
    Api(ApiErrorKind, i32, String),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Failed to set logger: {0}")]
    Logger(#[from] tracing_log::log::SetLoggerError),
    #[error("Telemetry error: {0}")]
    Telemetry(#[from] tracing::dispatcher::SetGlobalDefaultError),
    #[error("URL parse error: {0}")]
    ParseUrl(#[from] url::ParseError),
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl Error {
    /// Builds a domain error from the API's `{code, message}` envelope.
    ///
    pub fn from_envelope(code: i32, message: String) -> Self {
        Self::Api(ApiErrorKind::from_code(code), code, message)
    }

    /// Whether this error is one of the transient lock codes (`109`, `147`)
    /// that the hypervisor clears once the competing operation finishes.
    ///
    pub fn is_lock(&self) -> bool {
        matches!(
            self,
            Error::Api(ApiErrorKind::SourceLocked | ApiErrorKind::Locked, ..)
        )
    }
}

/// Classification of the numeric error codes the hypervisor API is known to
/// return. Unrecognized codes fall back to `Other` and still carry the raw
/// code and message in the `Error::Api` variant.
///
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Code 107, the source VM of a clone is not powered off.
    SourceNotPoweredOff,
    /// Code 108, a VM with the requested name already exists.
    AlreadyExists,
    /// Code 109, the source VM of a clone is locked.
    SourceLocked,
    /// Code 118, guest tools are missing so the network query is unavailable.
    GuestToolsMissing,
    /// Code 121, a NIC with the requested settings conflicts.
    NicConflict,
    /// Code 147, the VM is locked by another operation.
    Locked,
    Other,
}

impl ApiErrorKind {
    pub fn from_code(code: i32) -> Self {
        match code {
            107 => Self::SourceNotPoweredOff,
            108 => Self::AlreadyExists,
            109 => Self::SourceLocked,
            118 => Self::GuestToolsMissing,
            121 => Self::NicConflict,
            147 => Self::Locked,
            _ => Self::Other,
        }
    }
}
