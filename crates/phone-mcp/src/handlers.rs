//! MCP Tool Handlers
//!
//! Decodes tool arguments and forwards them to the device facade. Facade
//! outcomes (ids, `null`, `false`) are returned as plain JSON values; only
//! malformed arguments and unknown tool names are errors.

use phone_tools::{DeviceTools, Swipe};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{Error, Result};

#[derive(Debug, Deserialize)]
struct ConnectArgs {
    device_name: String,
}

#[derive(Debug, Deserialize)]
struct LoadResourceArgs {
    resource_path: String,
}

#[derive(Debug, Deserialize)]
struct CreateSessionArgs {
    controller_id: String,
    resource_id: String,
}

#[derive(Debug, Deserialize)]
struct SessionArgs {
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct ControllerArgs {
    controller_id: String,
}

#[derive(Debug, Deserialize)]
struct ClickArgs {
    controller_id: String,
    x: i64,
    y: i64,
}

#[derive(Debug, Deserialize)]
struct SwipeArgs {
    controller_id: String,
    start_x: i64,
    start_y: i64,
    end_x: i64,
    end_y: i64,
    duration: i64,
}

#[derive(Debug, Deserialize)]
struct InputTextArgs {
    controller_id: String,
    text: String,
}

#[derive(Debug, Deserialize)]
struct ReleaseArgs {
    object_id: String,
}

fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    let arguments = if arguments.is_null() {
        json!({})
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| Error::InvalidArguments {
        message: e.to_string(),
    })
}

fn pixel(value: i64) -> Option<i32> {
    i32::try_from(value).ok().filter(|v| *v >= 0)
}

fn duration_ms(value: i64) -> Option<u32> {
    u32::try_from(value).ok().filter(|v| *v > 0)
}

impl SwipeArgs {
    fn gesture(&self) -> Option<Swipe> {
        Some(Swipe {
            start_x: pixel(self.start_x)?,
            start_y: pixel(self.start_y)?,
            end_x: pixel(self.end_x)?,
            end_y: pixel(self.end_y)?,
            duration_ms: duration_ms(self.duration)?,
        })
    }
}

/// Handle a tool call by dispatching to the appropriate facade operation
pub async fn handle_tool_call(tools: &DeviceTools, tool_name: &str, arguments: Value) -> Result<Value> {
    tracing::debug!(tool = tool_name, %arguments, "Tool call");

    let value = match tool_name {
        // Devices
        "find_device_list" => serde_json::to_value(tools.find_endpoints().await)?,
        "connect_device" => {
            let args: ConnectArgs = parse_args(arguments)?;
            json!(tools.connect(&args.device_name).await)
        }

        // Recognition
        "load_resource" => {
            let args: LoadResourceArgs = parse_args(arguments)?;
            json!(tools.load_resource(&args.resource_path).await)
        }
        "create_session" => {
            let args: CreateSessionArgs = parse_args(arguments)?;
            json!(tools.create_session(&args.controller_id, &args.resource_id).await)
        }
        "ocr" => {
            let args: SessionArgs = parse_args(arguments)?;
            serde_json::to_value(tools.recognize(&args.session_id).await)?
        }

        // Input
        "click" => {
            let args: ClickArgs = parse_args(arguments)?;
            match pixel(args.x).zip(pixel(args.y)) {
                Some((x, y)) => json!(tools.click(&args.controller_id, x, y).await),
                None => {
                    tracing::warn!("Click at ({}, {}) is off screen", args.x, args.y);
                    json!(false)
                }
            }
        }
        "swipe" => {
            let args: SwipeArgs = parse_args(arguments)?;
            match args.gesture() {
                Some(gesture) => json!(tools.swipe(&args.controller_id, gesture).await),
                None => {
                    tracing::warn!(?args, "Swipe rejected: coordinates or duration out of range");
                    json!(false)
                }
            }
        }
        "input_text" => {
            let args: InputTextArgs = parse_args(arguments)?;
            json!(tools.input_text(&args.controller_id, &args.text).await)
        }

        // Housekeeping
        "screencap" => {
            let args: ControllerArgs = parse_args(arguments)?;
            json!(tools
                .screencap(&args.controller_id)
                .await
                .map(|path| path.display().to_string()))
        }
        "release" => {
            let args: ReleaseArgs = parse_args(arguments)?;
            json!(tools.release(&args.object_id))
        }

        _ => return Err(Error::UnknownTool(tool_name.to_string())),
    };

    Ok(value)
}
