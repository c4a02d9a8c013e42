//! Request and result types for the bridge tools.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw `search` arguments as received from the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchArgs {
    /// Collection to search (defaults to the configured collection).
    #[serde(default)]
    pub collection: Option<String>,

    /// Search query.
    #[serde(default)]
    pub query: Option<String>,

    /// Maximum number of results. Integer, numeric string, or anything else
    /// (which falls back to the default).
    #[serde(default, alias = "k")]
    pub limit: Option<Value>,
}

/// Raw `fetch` arguments as received from the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchArgs {
    /// Collection holding the document.
    #[serde(default)]
    pub collection: Option<String>,

    /// Document identifier.
    #[serde(default, alias = "id")]
    pub document_id: Option<String>,
}

/// Raw `stats` arguments as received from the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsArgs {
    #[serde(default)]
    pub collection: Option<String>,
}

/// Validated search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub collection: String,
    pub query: String,
    /// Always within `[1, max_limit]`.
    pub limit: u32,
}

/// Validated fetch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub collection: String,
    pub document_id: String,
}

/// Validated stats request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsRequest {
    pub collection: String,
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub url: String,
}

/// Result of the `search` tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Hits in backend order.
    pub results: Vec<SearchHit>,
}

/// Result of the `fetch` tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchedDocument {
    pub id: String,
    pub title: String,
    pub text: String,
    pub url: String,
    pub metadata: Map<String, Value>,
}

/// Result of the `list_collections` tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionList {
    pub collections: Vec<String>,
}

/// Result of the `stats` tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionStats {
    pub collection: String,
    /// Backend statistics, passed through unchanged.
    pub stats: Map<String, Value>,
}
