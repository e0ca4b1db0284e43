//! Shared error type across demogen crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Burn level outside the accepted range.
    InvalidLevel,
    /// Invalid input / malformed request or config.
    BadRequest,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::InvalidLevel => "INVALID_LEVEL",
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, DemoGenError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum DemoGenError {
    #[error("invalid burn level {0}: must be between 0 and 10")]
    InvalidLevel(i64),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl DemoGenError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            DemoGenError::InvalidLevel(_) => ClientCode::InvalidLevel,
            DemoGenError::BadRequest(_) => ClientCode::BadRequest,
            DemoGenError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            DemoGenError::Internal(_) => ClientCode::Internal,
        }
    }

    /// Whether the caller (rather than the process) is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DemoGenError::InvalidLevel(_) | DemoGenError::BadRequest(_)
        )
    }
}
