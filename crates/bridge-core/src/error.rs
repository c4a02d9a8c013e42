//! Error types for the bridge.

use thiserror::Error;

/// Result type alias using BridgeError.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors that can occur while serving a tool call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// Required input missing or empty. Never forwarded to the backend.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Backend answered 404 for a document lookup.
    #[error("Document not found: {id} (collection '{collection}')")]
    NotFound { collection: String, id: String },

    /// Backend answered with an error status.
    #[error("Backend HTTP error {status}: {message}")]
    BackendHttp { status: u16, message: String },

    /// Backend answered successfully but its envelope reports failure.
    #[error("Backend error: {message}")]
    BackendLogical { message: String },

    /// Backend could not be reached (connect failure, timeout).
    #[error("Backend unavailable: {message}")]
    BackendUnavailable { message: String },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl BridgeError {
    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a not-found error for a document id.
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Create a backend HTTP error.
    pub fn backend_http(status: u16, message: impl Into<String>) -> Self {
        Self::BackendHttp {
            status,
            message: message.into(),
        }
    }

    /// Create a backend logical error.
    pub fn backend_logical(message: impl Into<String>) -> Self {
        Self::BackendLogical {
            message: message.into(),
        }
    }

    /// Create a backend unavailable error.
    pub fn backend_unavailable(message: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get the error code for MCP responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::BackendHttp { .. } => "BACKEND_HTTP_ERROR",
            Self::BackendLogical { .. } => "BACKEND_LOGICAL_ERROR",
            Self::BackendUnavailable { .. } => "BACKEND_UNAVAILABLE",
            Self::Config { .. } => "CONFIG_ERROR",
        }
    }

    /// Whether the caller may reasonably retry the same call later.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::BackendUnavailable { .. })
    }
}
