//! Error types used throughout the provider

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Dynext
///
/// Every failure that crosses a crate boundary is one of these variants. The
/// remote variants keep the HTTP status and the raw response body, which is
/// usually the only diagnostic the platform gives back.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DynextError {
    /// Missing, unresolved or malformed provider configuration.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Connection failure, timeout or other transport-level problem.
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The platform answered with a non-success status.
    #[error("Remote API error (status {status}): {body}")]
    RemoteApi { status: u16, body: String },

    /// The addressed entity does not exist on the platform.
    #[error("Not found (status {status}): {body}")]
    NotFound { status: u16, body: String },

    /// A success response whose body does not have the expected shape.
    #[error("Decoding error: {message}")]
    Decoding { message: String },

    /// The requested lifecycle operation is not supported by the active policy.
    #[error("Unsupported operation: {operation}")]
    Unsupported { operation: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DynextError {
    /// Build a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// Build a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }

    /// Build a decoding error.
    pub fn decoding(message: impl Into<String>) -> Self {
        Self::Decoding { message: message.into() }
    }

    /// Build an unsupported-operation error.
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported { operation: operation.into() }
    }

    /// Classify a non-success status.
    ///
    /// 404 becomes [`DynextError::NotFound`]; everything else is a generic
    /// [`DynextError::RemoteApi`]. The body is kept verbatim.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        if status == 404 {
            Self::NotFound { status, body }
        } else {
            Self::RemoteApi { status, body }
        }
    }

    /// HTTP status carried by remote errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteApi { status, .. } | Self::NotFound { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body carried by remote errors.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::RemoteApi { body, .. } | Self::NotFound { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether retrying the same call could succeed without operator action.
    ///
    /// Only transport failures qualify; status responses are surfaced as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Stable label suitable for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::Transport { .. } => "transport",
            Self::RemoteApi { .. } => "remote_api",
            Self::NotFound { .. } => "not_found",
            Self::Decoding { .. } => "decoding",
            Self::Unsupported { .. } => "unsupported",
            Self::InvalidInput(_) => "invalid_input",
            Self::Cancelled => "cancelled",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for Dynext operations
pub type Result<T> = std::result::Result<T, DynextError>;
