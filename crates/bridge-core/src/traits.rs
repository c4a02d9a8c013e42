//! Core traits defining the interfaces between components.

use async_trait::async_trait;

use crate::error::Result;
use crate::request::BackendRequest;

/// Raw backend reply before envelope decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendResponse {
    /// HTTP status code.
    pub status: u16,

    /// Response body as text.
    pub body: String,
}

impl BackendResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Transport to the vector-store backend.
///
/// Implementations issue exactly one request per call and report network
/// failures and timeouts as `BridgeError::BackendUnavailable`. Any HTTP
/// status, including errors, is returned as a `BackendResponse`; status
/// classification belongs to the envelope parser.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn send(&self, request: BackendRequest) -> Result<BackendResponse>;
}
