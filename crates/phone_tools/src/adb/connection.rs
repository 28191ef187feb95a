//! Device discovery and connection over ADB

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::command::{adb_command, combined_output, run, run_checked};
use super::device::AdbController;
use crate::config::CommandTimingConfig;
use crate::error::{Error, Result};
use crate::sdk::{Controller, Endpoint};

/// Type of ADB connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionType {
    Usb,
    Emulator,
    Remote,
}

/// One row of `adb devices -l`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub serial: String,
    pub status: String,
    pub connection_type: ConnectionType,
    pub model: Option<String>,
}

impl DeviceInfo {
    /// Whether adb reports the device as online and authorized
    pub fn is_ready(&self) -> bool {
        self.status == "device"
    }
}

/// Parse the output of `adb devices -l`
pub fn parse_device_list(output: &str) -> Vec<DeviceInfo> {
    let mut devices = Vec::new();

    for line in output.lines() {
        let line = line.trim();
        // Header and daemon chatter ("* daemon started successfully")
        if line.is_empty() || line.starts_with("List of devices") || line.starts_with('*') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            continue;
        }

        let serial = parts[0].to_string();
        let connection_type = if serial.contains(':') {
            ConnectionType::Remote
        } else if serial.starts_with("emulator-") {
            ConnectionType::Emulator
        } else {
            ConnectionType::Usb
        };

        let model = parts[2..]
            .iter()
            .find_map(|part| part.strip_prefix("model:"))
            .map(|s| s.to_string());

        devices.push(DeviceInfo {
            serial,
            status: parts[1].to_string(),
            connection_type,
            model,
        });
    }

    devices
}

/// List every device adb knows about, ready or not
pub async fn list_devices(adb_path: &str, timing: &CommandTimingConfig) -> Result<Vec<DeviceInfo>> {
    let mut cmd = adb_command(adb_path, None);
    cmd.arg("devices").arg("-l");

    let output = run_checked(cmd, timing.command(), "adb devices").await?;
    let stdout = String::from_utf8(output.stdout)?;
    Ok(parse_device_list(&stdout))
}

/// A device seen by `adb devices`, registered under its serial
pub struct AdbEndpoint {
    info: DeviceInfo,
    adb_path: String,
    timing: CommandTimingConfig,
}

impl AdbEndpoint {
    pub fn new(info: DeviceInfo, adb_path: impl Into<String>, timing: CommandTimingConfig) -> Self {
        Self {
            info,
            adb_path: adb_path.into(),
            timing,
        }
    }

    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }
}

#[async_trait]
impl Endpoint for AdbEndpoint {
    fn name(&self) -> &str {
        &self.info.serial
    }

    async fn connect(&self) -> Result<Arc<dyn Controller>> {
        let serial = &self.info.serial;

        if self.info.connection_type == ConnectionType::Remote {
            // TCP devices drop off after an adb server restart; reconnect is idempotent
            let mut cmd = adb_command(&self.adb_path, None);
            cmd.arg("connect").arg(serial);
            let output = run(cmd, self.timing.command(), "adb connect").await?;
            debug!("adb connect output: {}", combined_output(&output));
        }

        let mut cmd = adb_command(&self.adb_path, Some(serial));
        cmd.arg("get-state");
        let output = run(cmd, self.timing.command(), "adb get-state").await?;
        let state = combined_output(&output);

        if !output.status.success() || state != "device" {
            return Err(Error::DeviceNotFound(format!("{} ({})", serial, state)));
        }

        info!("Connected to device {}", serial);
        Ok(Arc::new(AdbController::new(
            self.adb_path.clone(),
            serial.clone(),
            self.timing.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEVICES_OUTPUT: &str = "\
* daemon not running; starting now at tcp:5037
* daemon started successfully
List of devices attached
emulator-5554          device product:sdk_gphone64 model:sdk_gphone64_x86_64 device:emu64x transport_id:1
192.168.1.20:5555      device product:raven model:Pixel_6_Pro device:raven transport_id:3
R58M123ABC             unauthorized usb:1-1 transport_id:2

";

    #[test]
    fn test_parse_device_list() {
        let devices = parse_device_list(DEVICES_OUTPUT);
        assert_eq!(devices.len(), 3);

        assert_eq!(devices[0].serial, "emulator-5554");
        assert_eq!(devices[0].connection_type, ConnectionType::Emulator);
        assert_eq!(devices[0].model.as_deref(), Some("sdk_gphone64_x86_64"));
        assert!(devices[0].is_ready());

        assert_eq!(devices[1].connection_type, ConnectionType::Remote);
        assert_eq!(devices[1].model.as_deref(), Some("Pixel_6_Pro"));

        assert_eq!(devices[2].connection_type, ConnectionType::Usb);
        assert_eq!(devices[2].status, "unauthorized");
        assert_eq!(devices[2].model, None);
        assert!(!devices[2].is_ready());
    }

    #[test]
    fn test_parse_empty_device_list() {
        assert!(parse_device_list("List of devices attached\n\n").is_empty());
        assert!(parse_device_list("").is_empty());
    }

    #[test]
    fn test_endpoint_name_is_serial() {
        let info = parse_device_list(DEVICES_OUTPUT).remove(1);
        let endpoint = AdbEndpoint::new(info, "adb", CommandTimingConfig::default());
        assert_eq!(endpoint.name(), "192.168.1.20:5555");
    }
}
