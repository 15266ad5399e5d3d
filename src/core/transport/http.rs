//! HTTP transport implementation.
//!
//! JSON-RPC 2.0 over POST at the configured path, a `/` index listing the
//! tool catalog, and `/health`. Unknown paths answer 404 with a pointer back
//! to the index. The transport is stateless apart from the handshake flag;
//! tool state lives in the server's shared context.

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, instrument, warn};

use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;
use crate::domains::tools::ToolRegistry;

/// Protocol revision answered to `initialize`.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// Seconds a client should wait before following the 404 redirect.
const NOT_FOUND_REDIRECT_SECS: u64 = 3;

pub struct HttpTransport {
    config: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}

/// Why a request could not be answered with a result.
#[derive(Debug, PartialEq, Eq)]
enum RpcFailure {
    InvalidRequest,
    MethodNotFound,
    InvalidParams(String),
}

impl RpcFailure {
    fn into_response(self, id: Option<Value>) -> JsonRpcResponse {
        match self {
            Self::InvalidRequest => JsonRpcResponse::error(id, -32600, "Invalid Request"),
            Self::MethodNotFound => JsonRpcResponse::error(id, -32601, "Method not found"),
            Self::InvalidParams(msg) => JsonRpcResponse::error(id, -32602, msg),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    server: McpServer,
    rpc_path: Arc<str>,
    /// Set by `initialize`; plain HTTP has no per-client session.
    handshake: Arc<RwLock<Option<Handshake>>>,
}

#[derive(Debug, Clone)]
struct Handshake {
    initialized: bool,
    protocol_version: &'static str,
}

impl HttpTransport {
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    fn router(&self, server: McpServer) -> Router {
        let state = AppState {
            server,
            rpc_path: Arc::from(self.config.rpc_path.as_str()),
            handshake: Arc::new(RwLock::new(None)),
        };

        let app = Router::new()
            .route(&self.config.rpc_path, post(handle_rpc))
            .route("/health", get(health_check))
            .route("/", get(root_handler))
            .fallback(not_found)
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        if self.config.enable_cors {
            app.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
        } else {
            app
        }
    }

    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let app = self.router(server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!(
            "Ready - listening on {} (JSON-RPC at POST {}, CORS {})",
            addr,
            self.config.rpc_path,
            if self.config.enable_cors { "on" } else { "off" }
        );

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))
    }
}

/// Index: server identity, endpoints and the tool catalog.
async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "name": state.server.name(),
        "version": state.server.version(),
        "protocol": "JSON-RPC 2.0",
        "endpoints": {
            "rpc": &*state.rpc_path,
            "health": "/health"
        },
        "tools": ToolRegistry::catalog()
    }))
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "notifications": state.server.context().notifications().list().len(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Fallback for unknown paths.
async fn not_found(uri: Uri) -> impl IntoResponse {
    warn!("No route for {}", uri.path());
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not found",
            "path": uri.path(),
            "redirect": "/",
            "redirect_after_secs": NOT_FOUND_REDIRECT_SECS
        })),
    )
}

#[instrument(skip_all, fields(method))]
async fn handle_rpc(
    State(state): State<AppState>,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    tracing::Span::current().record("method", request.method.as_str());
    (StatusCode::OK, Json(process_request(&state, request).await))
}

async fn process_request(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    let id = request.id.clone();
    match dispatch(state, &request).await {
        Ok(result) => JsonRpcResponse::success(id, result),
        Err(failure) => {
            debug!("JSON-RPC {} failed: {:?}", request.method, failure);
            failure.into_response(id)
        }
    }
}

async fn dispatch(state: &AppState, request: &JsonRpcRequest) -> Result<Value, RpcFailure> {
    if request.jsonrpc != "2.0" {
        return Err(RpcFailure::InvalidRequest);
    }

    let server = &state.server;
    let params = request.params.as_ref();

    match request.method.as_str() {
        "initialize" => Ok(initialize(state).await),
        "ping" => Ok(json!({})),

        "tools/list" => Ok(json!({ "tools": server.list_tools() })),
        "tools/call" => {
            let name = required_str(params, "name", "tool name")?;
            let arguments = params
                .and_then(|p| p.get("arguments"))
                .cloned()
                .unwrap_or_else(|| json!({}));
            info!("Calling tool {}", name);
            server
                .call_tool(name, arguments)
                .await
                .map_err(RpcFailure::InvalidParams)
        }

        "resources/list" => Ok(json!({ "resources": server.list_resources().await })),
        "resources/templates/list" => Ok(json!({
            "resourceTemplates": server.list_resource_templates().await
        })),
        "resources/read" => {
            let uri = required_str(params, "uri", "resource URI")?;
            server
                .read_resource(uri)
                .await
                .map_err(RpcFailure::InvalidParams)
        }

        "prompts/list" => Ok(json!({ "prompts": server.list_prompts().await })),
        "prompts/get" => {
            let name = required_str(params, "name", "prompt name")?;
            let arguments = params.and_then(|p| p.get("arguments")).cloned();
            server
                .get_prompt(name, arguments)
                .await
                .map_err(RpcFailure::InvalidParams)
        }

        method if method.starts_with("notifications/") => {
            if method == "notifications/initialized" {
                if let Some(handshake) = state.handshake.write().await.as_mut() {
                    handshake.initialized = true;
                }
            }
            debug!("Client notification: {}", method);
            Ok(Value::Null)
        }

        method => {
            warn!("Unknown method: {}", method);
            Err(RpcFailure::MethodNotFound)
        }
    }
}

async fn initialize(state: &AppState) -> Value {
    *state.handshake.write().await = Some(Handshake {
        initialized: false,
        protocol_version: PROTOCOL_VERSION,
    });

    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": {},
            "resources": {},
            "prompts": {}
        },
        "serverInfo": {
            "name": state.server.name(),
            "version": state.server.version()
        },
        "instructions": McpServer::instructions()
    })
}

fn required_str<'a>(
    params: Option<&'a Value>,
    key: &str,
    what: &str,
) -> Result<&'a str, RpcFailure> {
    let params = params.ok_or_else(|| RpcFailure::InvalidParams("Missing params".to_string()))?;
    params
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| RpcFailure::InvalidParams(format!("Missing {what}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ToolContext;

    fn state() -> AppState {
        AppState {
            server: McpServer::with_context(ToolContext::in_memory()),
            rpc_path: Arc::from("/mcp"),
            handshake: Arc::new(RwLock::new(None)),
        }
    }

    fn request(method: &str, params: Value) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params: Some(params),
        }
    }

    #[tokio::test]
    async fn test_initialize_then_initialized() {
        let state = state();
        let response = process_request(&state, request("initialize", json!({}))).await;
        let result = response.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], "devkit-mcp-server");
        assert_eq!(result["instructions"], McpServer::instructions());

        process_request(&state, request("notifications/initialized", json!({}))).await;
        let handshake = state.handshake.read().await.clone().unwrap();
        assert!(handshake.initialized);
        assert_eq!(handshake.protocol_version, PROTOCOL_VERSION);
    }

    #[tokio::test]
    async fn test_tools_call_round_trip() {
        let response = process_request(
            &state(),
            request(
                "tools/call",
                json!({"name": "hash_generate", "arguments": {"input": "hello"}}),
            ),
        )
        .await;
        let result = response.result.unwrap();
        assert_eq!(
            result["structuredContent"]["hash"],
            "5d41402abc4b2a76b9719d911017c592"
        );
    }

    #[tokio::test]
    async fn test_missing_params_are_invalid() {
        let response = process_request(&state(), request("resources/read", json!({}))).await;
        let error = response.error.unwrap();
        assert_eq!(error.code, -32602);
        assert_eq!(error.message, "Missing resource URI");
    }

    #[tokio::test]
    async fn test_unknown_method_and_bad_version() {
        let state = state();
        let response = process_request(&state, request("tools/frobnicate", json!({}))).await;
        assert_eq!(response.error.unwrap().code, -32601);

        let mut bad = request("tools/list", json!({}));
        bad.jsonrpc = "1.0".to_string();
        assert_eq!(process_request(&state, bad).await.error.unwrap().code, -32600);
    }

    #[tokio::test]
    async fn test_not_found_points_back_to_index() {
        let response = not_found(Uri::from_static("/missing")).await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
