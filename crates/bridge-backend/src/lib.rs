//! bridge-backend - HTTP transport for memory-bridge
//!
//! Implements the `Backend` trait over `reqwest`, with separate timeouts for
//! read (GET) and write (POST) calls. Timeouts and connection failures are
//! reported as `BridgeError::BackendUnavailable`; nothing is retried.

mod http;

pub use http::HttpBackend;

// Re-export the Backend trait for convenience
pub use bridge_core::Backend;
