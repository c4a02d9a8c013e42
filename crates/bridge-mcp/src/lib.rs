//! bridge-mcp - MCP server implementation
//!
//! This crate provides an MCP (Model Context Protocol) server that exposes
//! a remote vector-store backend as tools for AI assistants.
//!
//! # Tools
//!
//! - `search` - Search a collection
//! - `fetch` - Fetch one document by id
//! - `list_collections` - List all collections
//! - `stats` - Get statistics for a collection

mod server;

pub use server::{to_mcp_error, BridgeMcpServer, FetchParams, SearchParams, StatsParams};
