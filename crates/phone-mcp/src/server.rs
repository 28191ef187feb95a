//! MCP Server implementation
//!
//! Reads newline-delimited JSON-RPC requests, dispatches them, and writes one
//! response line per request. Notifications get no response.

use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use phone_tools::DeviceTools;

use crate::handlers::handle_tool_call;
use crate::protocol::{
    InitializeResult, JsonRpcRequest, JsonRpcResponse, ServerCapabilities, ServerInfo,
    ToolCallParams, ToolsCapability, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST,
    METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION,
};
use crate::tools::{get_tool_definitions, ToolDefinition, ToolResult, SERVER_INSTRUCTIONS};
use crate::{Error, Result};

/// MCP server exposing the device tools
pub struct PhoneMcpServer {
    tools: DeviceTools,
    definitions: Vec<ToolDefinition>,
}

impl PhoneMcpServer {
    pub fn new(tools: DeviceTools) -> Self {
        Self {
            tools,
            definitions: get_tool_definitions(),
        }
    }

    pub fn device_tools(&self) -> &DeviceTools {
        &self.tools
    }

    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    /// Serve requests from stdin until it closes
    pub async fn run(&self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();

        tracing::info!("MCP server ready, listening on stdio");
        self.serve(stdin, stdout).await
    }

    /// Serve requests from any line-oriented reader
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            tracing::debug!(request = %line, "Received message");

            let response = match self.handle_message(&line).await {
                Ok(response) => response,
                Err(e) => {
                    let code = match e {
                        Error::Json(_) => PARSE_ERROR,
                        _ => INTERNAL_ERROR,
                    };
                    let error_response = JsonRpcResponse::error(None, code, format!("{}", e));
                    Some(serde_json::to_string(&error_response)?)
                }
            };

            if let Some(response) = response {
                writer.write_all(response.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }

        tracing::info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle a single MCP message
    ///
    /// Returns the serialized response, or `None` for notifications. Unparseable
    /// input is an error; JSON that is not a request gets an invalid-request reply.
    pub async fn handle_message(&self, message: &str) -> Result<Option<String>> {
        let raw: Value = serde_json::from_str(message)?;
        let request: JsonRpcRequest = match serde_json::from_value(raw.clone()) {
            Ok(request) => request,
            Err(e) => {
                let id = raw.get("id").cloned();
                let response =
                    JsonRpcResponse::error(id, INVALID_REQUEST, format!("Invalid request: {}", e));
                return Ok(Some(serde_json::to_string(&response)?));
            }
        };

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id)?,
            "initialized" | "notifications/initialized" => return Ok(None),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await?,
            method if method.starts_with("notifications/") => return Ok(None),
            _ => JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };

        Ok(Some(serde_json::to_string(&response)?))
    }

    fn handle_initialize(&self, id: Option<Value>) -> Result<JsonRpcResponse> {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: "phone-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
        };

        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(id, json!({ "tools": self.definitions }))
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        let params: ToolCallParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                return Ok(JsonRpcResponse::error(
                    id,
                    INVALID_PARAMS,
                    format!("Invalid params: {}", e),
                ))
            }
        };

        let tool_result = match handle_tool_call(&self.tools, &params.name, params.arguments).await {
            Ok(value) => ToolResult::text(serde_json::to_string(&value)?),
            Err(e) => {
                tracing::warn!(tool = %params.name, error = %e, "Tool call rejected");
                ToolResult::error(e.to_string())
            }
        };

        Ok(JsonRpcResponse::success(id, serde_json::to_value(tool_result)?))
    }
}
