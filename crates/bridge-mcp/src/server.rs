//! MCP server implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::transport::stdio;
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::info;

use bridge_backend::HttpBackend;
use bridge_core::{
    Backend, Bridge, BridgeConfig, BridgeError, FetchArgs, SearchArgs, StatsArgs,
};

/// Memory bridge MCP server state.
#[derive(Clone)]
pub struct BridgeMcpServer {
    /// Tool operations.
    bridge: Bridge<dyn Backend>,

    /// Tool router.
    tool_router: ToolRouter<Self>,
}

/// Search request parameters.
#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct SearchParams {
    /// Collection to search (defaults to the configured collection).
    #[serde(default)]
    pub collection: Option<String>,

    /// The search query. Must not be blank.
    pub query: String,

    /// Maximum number of results, clamped to the configured maximum.
    // Numeric strings are still accepted; the schema advertises an integer.
    #[serde(default, alias = "k")]
    #[schemars(with = "Option<i64>")]
    pub limit: Option<serde_json::Value>,
}

impl From<SearchParams> for SearchArgs {
    fn from(params: SearchParams) -> Self {
        Self {
            collection: params.collection,
            query: Some(params.query),
            limit: params.limit,
        }
    }
}

/// Fetch request parameters.
#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct FetchParams {
    /// Collection holding the document (defaults to the configured collection).
    #[serde(default)]
    pub collection: Option<String>,

    /// Identifier of the document, as returned by `search`.
    #[serde(alias = "id")]
    pub document_id: String,
}

impl From<FetchParams> for FetchArgs {
    fn from(params: FetchParams) -> Self {
        Self {
            collection: params.collection,
            document_id: Some(params.document_id),
        }
    }
}

/// Stats parameters.
#[derive(Debug, Default, Deserialize, Serialize, schemars::JsonSchema)]
pub struct StatsParams {
    /// Collection to get stats for (defaults to the configured collection).
    #[serde(default)]
    pub collection: Option<String>,
}

impl From<StatsParams> for StatsArgs {
    fn from(params: StatsParams) -> Self {
        Self {
            collection: params.collection,
        }
    }
}

#[tool_router]
impl BridgeMcpServer {
    /// Create a server over any backend.
    pub fn new(bridge: Bridge<dyn Backend>) -> Self {
        Self {
            bridge,
            tool_router: Self::tool_router(),
        }
    }

    /// Create a server talking HTTP to the configured backend.
    pub fn from_config(config: BridgeConfig) -> Result<Self, BridgeError> {
        let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(&config.backend)?);
        let bridge = Bridge::new(backend, Arc::new(config))?;
        info!("Initializing memory bridge MCP server for {}", bridge.base_url());
        Ok(Self::new(bridge))
    }

    /// Names of the registered tools.
    pub fn tool_names(&self) -> Vec<String> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect()
    }

    #[tool(
        description = "Search a collection of the memory store. Returns ranked results with id, title and url; pass an id to `fetch` for the full text."
    )]
    pub async fn search(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let results = self.bridge.search(params.into()).await.map_err(to_mcp_error)?;
        structured(&results)
    }

    #[tool(description = "Fetch one document by id: title, full text, url and metadata.")]
    pub async fn fetch(
        &self,
        Parameters(params): Parameters<FetchParams>,
    ) -> Result<CallToolResult, McpError> {
        let doc = self.bridge.fetch(params.into()).await.map_err(to_mcp_error)?;
        structured(&doc)
    }

    #[tool(description = "List the collections available in the memory store.")]
    pub async fn list_collections(&self) -> Result<CallToolResult, McpError> {
        let list = self.bridge.list_collections().await.map_err(to_mcp_error)?;
        structured(&list)
    }

    #[tool(description = "Get statistics for a collection of the memory store.")]
    pub async fn stats(
        &self,
        Parameters(params): Parameters<StatsParams>,
    ) -> Result<CallToolResult, McpError> {
        let stats = self.bridge.stats(params.into()).await.map_err(to_mcp_error)?;
        structured(&stats)
    }
}

#[tool_handler]
impl ServerHandler for BridgeMcpServer {
    fn get_info(&self) -> ServerInfo {
        let server = &self.bridge.config().server;
        ServerInfo {
            instructions: Some(server.instructions.clone()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: server.name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

impl BridgeMcpServer {
    /// Serve over stdin/stdout until the client disconnects.
    pub async fn serve_stdio(self) -> Result<(), Box<dyn std::error::Error>> {
        info!("Serving MCP over stdio");
        let running = self.serve(stdio()).await?;
        let reason = running.waiting().await?;
        info!("MCP session ended: {:?}", reason);
        Ok(())
    }

    /// Streamable-HTTP service handing each MCP session a clone of this
    /// server.
    pub fn http_service(self) -> StreamableHttpService<Self, LocalSessionManager> {
        StreamableHttpService::new(
            move || Ok(self.clone()),
            Arc::new(LocalSessionManager::default()),
            StreamableHttpServerConfig::default(),
        )
    }

    /// Serve over streamable HTTP at `http://<addr>/mcp` until Ctrl-C.
    pub async fn serve_http(self, addr: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
        let listener = TcpListener::bind(addr).await?;
        self.serve_listener(listener).await
    }

    /// Serve over streamable HTTP on an already bound listener.
    pub async fn serve_listener(
        self,
        listener: TcpListener,
    ) -> Result<(), Box<dyn std::error::Error>> {
        info!("Serving MCP over HTTP at http://{}/mcp", listener.local_addr()?);
        let router = axum::Router::new().nest_service("/mcp", self.http_service());
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await?;
        info!("HTTP transport stopped");
        Ok(())
    }
}

/// Convert a bridge error into an MCP error, keeping its classification in
/// the error data.
pub fn to_mcp_error(err: BridgeError) -> McpError {
    let mut data = json!({
        "code": err.error_code(),
        "transient": err.is_transient(),
    });
    if let BridgeError::BackendHttp { status, .. } = &err {
        data["status"] = json!(status);
    }

    let message = err.to_string();
    match err {
        BridgeError::InvalidArgument { .. } => McpError::invalid_params(message, Some(data)),
        BridgeError::NotFound { .. } => McpError::resource_not_found(message, Some(data)),
        _ => McpError::internal_error(message, Some(data)),
    }
}

fn structured<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let value = serde_json::to_value(value)
        .map_err(|e| McpError::internal_error(format!("failed to encode result: {}", e), None))?;
    Ok(CallToolResult::structured(value))
}
