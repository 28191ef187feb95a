//! MCP tool definitions
//!
//! ## Devices
//! - `find_device_list` - Scan for connectable devices
//! - `connect_device` - Connect to a device, yielding a controller id
//!
//! ## Recognition
//! - `load_resource` - Load a resource bundle, yielding a resource id
//! - `create_session` - Bind a controller to a resource, yielding a session id
//! - `ocr` - Capture the screen and recognize text
//!
//! ## Input
//! - `click`, `swipe`, `input_text`
//!
//! ## Housekeeping
//! - `screencap` - Save the screen to the screenshots directory
//! - `release` - Drop an object by id

use serde::{Deserialize, Serialize};
use serde_json::json;

/// Workflow summary sent with the initialize response
pub const SERVER_INSTRUCTIONS: &str = "\
phone-mcp controls Android devices over ADB: screen capture, OCR, tap, swipe and text input.

Standard workflow:
1. Call find_device_list. If it returns an object with several candidates, stop and ask the \
user which device to use. Never choose one yourself.
2. Call connect_device(device_name) to get a controller_id.
3. Call load_resource(resource_path) with the resource bundle directory to get a resource_id.
4. Call create_session(controller_id, resource_id) to get a session_id.
5. Loop: call ocr(session_id), then click/swipe/input_text with the controller_id based on the \
recognized text boxes, until the task is done.

All ids are opaque strings. Failed operations return null or false; retry or ask the user \
rather than guessing ids. Coordinates are pixels with the origin at the top-left corner.";

/// Tool definition for MCP protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

/// Result from a tool invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// Content types for tool results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl ToolResult {
    /// Create a successful text result
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: content.into(),
            }],
            is_error: None,
        }
    }

    /// Create an error result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: Some(true),
        }
    }
}

fn id_property(description: &str) -> serde_json::Value {
    json!({ "type": "string", "description": description })
}

fn pixel_property(description: &str) -> serde_json::Value {
    json!({ "type": "integer", "minimum": 0, "description": description })
}

/// Get all available tool definitions
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "find_device_list".to_string(),
            description: "Scan for available ADB devices. Returns [] when none are found, the \
                device name when exactly one is found, or {\"candidates\": [...], \"prompt\": ...} \
                when several are found. In that last case, stop and ask the user to choose; \
                never pick a device automatically."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
        ToolDefinition {
            name: "connect_device".to_string(),
            description: "Connect to a device returned by find_device_list. Returns a \
                controller_id for click, swipe, input_text and create_session, or null on failure."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "device_name": id_property("Device name from find_device_list")
                },
                "required": ["device_name"]
            }),
        },
        ToolDefinition {
            name: "load_resource".to_string(),
            description: "Load a resource bundle directory (OCR data lives under model/ocr). \
                Returns a resource_id, or null if the path does not exist or cannot be loaded."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "resource_path": {
                        "type": "string",
                        "description": "Path to the resource bundle directory"
                    }
                },
                "required": ["resource_path"]
            }),
        },
        ToolDefinition {
            name: "create_session".to_string(),
            description: "Bind a controller to a resource bundle for recognition. Returns a \
                session_id, or null if either id is invalid or binding fails. Calling again with \
                the same pair returns the same session_id."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "controller_id": id_property("Controller id from connect_device"),
                    "resource_id": id_property("Resource id from load_resource")
                },
                "required": ["controller_id", "resource_id"]
            }),
        },
        ToolDefinition {
            name: "ocr".to_string(),
            description: "Capture the device screen and recognize text. Returns a list of \
                {text, box: {x, y, width, height}, score}, or null if capture or recognition fails."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "session_id": id_property("Session id from create_session")
                },
                "required": ["session_id"]
            }),
        },
        ToolDefinition {
            name: "click".to_string(),
            description: "Tap a point on the screen. Origin is the top-left corner, x grows \
                rightward and y downward. Returns true on success, false otherwise."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "controller_id": id_property("Controller id from connect_device"),
                    "x": pixel_property("X coordinate in pixels"),
                    "y": pixel_property("Y coordinate in pixels")
                },
                "required": ["controller_id", "x", "y"]
            }),
        },
        ToolDefinition {
            name: "swipe".to_string(),
            description: "Swipe from a start point to an end point. duration is in \
                milliseconds; larger values swipe more slowly. Returns true on success, false \
                otherwise."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "controller_id": id_property("Controller id from connect_device"),
                    "start_x": pixel_property("Start X coordinate in pixels"),
                    "start_y": pixel_property("Start Y coordinate in pixels"),
                    "end_x": pixel_property("End X coordinate in pixels"),
                    "end_y": pixel_property("End Y coordinate in pixels"),
                    "duration": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "Gesture duration in milliseconds"
                    }
                },
                "required": ["controller_id", "start_x", "start_y", "end_x", "end_y", "duration"]
            }),
        },
        ToolDefinition {
            name: "input_text".to_string(),
            description: "Type text into the focused field (printable ASCII). Returns true on \
                success, false otherwise."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "controller_id": id_property("Controller id from connect_device"),
                    "text": { "type": "string", "description": "Text to type" }
                },
                "required": ["controller_id", "text"]
            }),
        },
        ToolDefinition {
            name: "screencap".to_string(),
            description: "Save the current screen as a PNG in the screenshots directory. \
                Returns the file path, or null on failure."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "controller_id": id_property("Controller id from connect_device")
                },
                "required": ["controller_id"]
            }),
        },
        ToolDefinition {
            name: "release".to_string(),
            description: "Release an object by id. Releasing a controller or resource also \
                releases the sessions built on it. Returns true if something was released."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "object_id": id_property("Any id returned by another tool")
                },
                "required": ["object_id"]
            }),
        },
    ]
}
