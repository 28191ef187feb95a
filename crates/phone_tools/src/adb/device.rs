//! Input injection for a connected Android device

use async_trait::async_trait;
use image::DynamicImage;
use tracing::debug;

use super::command::{adb_command, run_checked};
use super::screenshot::get_screenshot;
use crate::config::CommandTimingConfig;
use crate::error::{Error, Result};
use crate::sdk::{Controller, Swipe};

/// Characters the device shell would otherwise interpret
const SHELL_SPECIAL: &[char] = &[
    '\\', '\'', '"', '`', '$', '&', '|', ';', '<', '>', '(', ')', '*', '?', '~', '#', '!', '[',
    ']', '{', '}',
];

/// Encode text for `adb shell input text`
///
/// Spaces become `%s`; shell metacharacters are backslash-escaped. The input
/// command only handles printable ASCII, so anything else is rejected.
pub fn escape_input_text(text: &str) -> Result<String> {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ' ' => escaped.push_str("%s"),
            '%' => escaped.push_str("\\%"),
            c if SHELL_SPECIAL.contains(&c) => {
                escaped.push('\\');
                escaped.push(c);
            }
            c if c.is_ascii_graphic() => escaped.push(c),
            c => {
                return Err(Error::InvalidInput(format!(
                    "character {:?} cannot be sent with adb input",
                    c
                )))
            }
        }
    }
    Ok(escaped)
}

/// Controller for one device, addressed by serial
pub struct AdbController {
    adb_path: String,
    serial: String,
    timing: CommandTimingConfig,
}

impl AdbController {
    pub fn new(adb_path: String, serial: String, timing: CommandTimingConfig) -> Self {
        Self {
            adb_path,
            serial,
            timing,
        }
    }

    pub fn serial(&self) -> &str {
        &self.serial
    }

    async fn shell_input(&self, args: &[String], what: &str) -> Result<()> {
        let mut cmd = adb_command(&self.adb_path, Some(&self.serial));
        cmd.arg("shell").arg("input").args(args);

        run_checked(cmd, self.timing.command(), what).await?;

        tokio::time::sleep(self.timing.action_delay()).await;
        Ok(())
    }
}

fn check_point(x: i32, y: i32) -> Result<()> {
    if x < 0 || y < 0 {
        return Err(Error::InvalidInput(format!(
            "coordinates ({}, {}) are off screen",
            x, y
        )));
    }
    Ok(())
}

#[async_trait]
impl Controller for AdbController {
    async fn screenshot(&self) -> Result<DynamicImage> {
        get_screenshot(&self.adb_path, &self.serial, self.timing.screencap()).await
    }

    async fn click(&self, x: i32, y: i32) -> Result<()> {
        check_point(x, y)?;
        debug!("Tap ({}, {}) on {}", x, y, self.serial);

        self.shell_input(&["tap".to_string(), x.to_string(), y.to_string()], "adb tap")
            .await
    }

    async fn swipe(&self, gesture: Swipe) -> Result<()> {
        check_point(gesture.start_x, gesture.start_y)?;
        check_point(gesture.end_x, gesture.end_y)?;
        if gesture.duration_ms == 0 {
            return Err(Error::InvalidInput("swipe duration must be positive".to_string()));
        }
        debug!("Swipe {:?} on {}", gesture, self.serial);

        let args = [
            "swipe".to_string(),
            gesture.start_x.to_string(),
            gesture.start_y.to_string(),
            gesture.end_x.to_string(),
            gesture.end_y.to_string(),
            gesture.duration_ms.to_string(),
        ];
        self.shell_input(&args, "adb swipe").await
    }

    async fn input_text(&self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let escaped = escape_input_text(text)?;
        debug!("Input text {:?} on {}", escaped, self.serial);

        self.shell_input(&["text".to_string(), escaped], "adb input text")
            .await
    }
}
