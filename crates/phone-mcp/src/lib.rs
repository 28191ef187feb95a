//! MCP Server for phone automation
//!
//! Exposes the `phone_tools` device facade as Model Context Protocol tools so
//! an agent can drive Android devices step by step.
//!
//! # Architecture
//!
//! ```text
//! [ MCP Client (agent) ]
//!        | (JSON-RPC over stdio)
//!        v
//! [ phone-mcp (MCP Server) ]
//!        | (DeviceTools facade, object registry)
//!        v
//! [ phone_tools backends ]
//!        +--> [ adb (devices, screencap, input) ]
//!        +--> [ OCR engine (text recognition) ]
//! ```
//!
//! Tools hand out opaque ids (controller, resource, session) that later
//! calls pass back in; see [`tools`] for the full list.

pub mod error;
pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;

pub use error::{Error, Result};
pub use server::PhoneMcpServer;
pub use tools::{get_tool_definitions, ToolContent, ToolDefinition, ToolResult};
