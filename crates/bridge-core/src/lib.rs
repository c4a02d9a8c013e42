//! bridge-core - Core of the memory-bridge tool server
//!
//! This crate validates tool arguments, builds backend requests, decodes the
//! backend's response envelopes and maps them into tool results. The HTTP
//! transport and the MCP adapter live in their own crates.

pub mod base_url;
pub mod bridge;
pub mod config;
pub mod envelope;
pub mod error;
pub mod mapping;
pub mod mock;
pub mod request;
pub mod traits;
pub mod types;
pub mod validate;

pub use base_url::BaseUrl;
pub use bridge::Bridge;
pub use config::*;
pub use envelope::{parse_response, BackendEnvelope};
pub use error::{BridgeError, Result};
pub use mock::MockBackend;
pub use request::{BackendRequest, Endpoint, Method};
pub use traits::*;
pub use types::*;
