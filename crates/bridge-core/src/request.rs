//! Backend request building.

use serde_json::{json, Value};

use crate::types::{FetchRequest, SearchRequest, StatsRequest};

/// HTTP method of a backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Backend endpoints the bridge talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Query,
    Doc,
    Collections,
    Stats,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Query => "/query",
            Self::Doc => "/doc",
            Self::Collections => "/collections",
            Self::Stats => "/stats",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Self::Query => Method::Post,
            Self::Doc | Self::Collections | Self::Stats => Method::Get,
        }
    }
}

/// A fully built backend call.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendRequest {
    pub endpoint: Endpoint,

    /// Query string parameters, in order.
    pub query: Vec<(String, String)>,

    /// JSON body for POST calls.
    pub body: Option<Value>,
}

impl BackendRequest {
    pub fn method(&self) -> Method {
        self.endpoint.method()
    }

    pub fn path(&self) -> &'static str {
        self.endpoint.path()
    }

    /// `POST /query` with `{collection, query, k}`.
    pub fn search(req: &SearchRequest) -> Self {
        Self {
            endpoint: Endpoint::Query,
            query: Vec::new(),
            body: Some(json!({
                "collection": req.collection,
                "query": req.query,
                "k": req.limit,
            })),
        }
    }

    /// `GET /doc?collection=..&id=..`.
    pub fn fetch(req: &FetchRequest) -> Self {
        Self {
            endpoint: Endpoint::Doc,
            query: vec![
                ("collection".to_string(), req.collection.clone()),
                ("id".to_string(), req.document_id.clone()),
            ],
            body: None,
        }
    }

    /// `GET /collections`.
    pub fn list_collections() -> Self {
        Self {
            endpoint: Endpoint::Collections,
            query: Vec::new(),
            body: None,
        }
    }

    /// `GET /stats?collection=..`.
    pub fn stats(req: &StatsRequest) -> Self {
        Self {
            endpoint: Endpoint::Stats,
            query: vec![("collection".to_string(), req.collection.clone())],
            body: None,
        }
    }
}
