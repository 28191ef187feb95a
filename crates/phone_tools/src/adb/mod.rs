//! ADB (Android Debug Bridge) backend for device control
//!
//! This module provides:
//! - `connection`: Device discovery and connection (`AdbEndpoint`)
//! - `device`: Input injection (`AdbController`)
//! - `screenshot`: Screen capture

mod command;
mod connection;
mod device;
mod screenshot;

pub use connection::{list_devices, parse_device_list, AdbEndpoint, ConnectionType, DeviceInfo};
pub use device::{escape_input_text, AdbController};
pub use screenshot::get_screenshot;
