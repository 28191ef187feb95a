//! Screenshot capture from an Android device

use std::time::Duration;

use image::DynamicImage;
use tracing::debug;

use super::command::{adb_command, combined_output, run};
use crate::error::{Error, Result};

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Capture the current screen as a decoded image
///
/// Uses `exec-out` so the PNG streams straight back without a temp file on
/// the device. Secure windows make screencap print an error instead of an
/// image; that is reported as a failure rather than a blank frame.
pub async fn get_screenshot(adb_path: &str, serial: &str, timeout: Duration) -> Result<DynamicImage> {
    debug!("Capturing screenshot from {}", serial);

    let mut cmd = adb_command(adb_path, Some(serial));
    cmd.arg("exec-out").arg("screencap").arg("-p");

    let output = run(cmd, timeout, "screencap").await?;

    if !output.status.success() {
        return Err(Error::CommandFailed(format!(
            "screencap failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let start = find_png_start(&output.stdout).ok_or_else(|| {
        let text = combined_output(&output);
        let preview: String = text.chars().take(200).collect();
        Error::CommandFailed(format!(
            "screencap returned no image ({} bytes): {}",
            output.stdout.len(),
            preview
        ))
    })?;

    let img = image::load_from_memory_with_format(&output.stdout[start..], image::ImageFormat::Png)?;
    debug!("Screenshot dimensions: {}x{}", img.width(), img.height());

    Ok(img)
}

/// Some devices prefix warnings before the PNG stream
fn find_png_start(data: &[u8]) -> Option<usize> {
    data.windows(PNG_SIGNATURE.len())
        .position(|window| window == PNG_SIGNATURE)
}
