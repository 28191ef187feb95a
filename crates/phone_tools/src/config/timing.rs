//! Timing configuration for device and recognition commands

use lazy_static::lazy_static;
use std::env;
use std::time::Duration;

const DEFAULT_COMMAND_TIMEOUT: f64 = 10.0;
const DEFAULT_SCREENCAP_TIMEOUT: f64 = 10.0;
const DEFAULT_OCR_TIMEOUT: f64 = 30.0;
const DEFAULT_ACTION_DELAY: f64 = 0.0;

/// Seconds read from `key`; `default` when unset or not representable as a `Duration`
fn env_secs(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|v: &f64| Duration::try_from_secs_f64(*v).is_ok())
        .unwrap_or(default)
}

/// Out-of-range values set directly on the struct fall back to `default`
fn secs_or(secs: f64, default: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or_else(|_| Duration::from_secs_f64(default))
}

/// Timeouts for external commands, in seconds
#[derive(Debug, Clone)]
pub struct CommandTimingConfig {
    /// Plain adb invocations (devices, get-state, input)
    pub command_timeout: f64,
    pub screencap_timeout: f64,
    pub ocr_timeout: f64,
    /// Pause after an input event so the screen can settle
    pub action_delay: f64,
}

impl Default for CommandTimingConfig {
    fn default() -> Self {
        Self {
            command_timeout: env_secs("PHONE_MCP_COMMAND_TIMEOUT", DEFAULT_COMMAND_TIMEOUT),
            screencap_timeout: env_secs("PHONE_MCP_SCREENCAP_TIMEOUT", DEFAULT_SCREENCAP_TIMEOUT),
            ocr_timeout: env_secs("PHONE_MCP_OCR_TIMEOUT", DEFAULT_OCR_TIMEOUT),
            action_delay: env_secs("PHONE_MCP_ACTION_DELAY", DEFAULT_ACTION_DELAY),
        }
    }
}

impl CommandTimingConfig {
    pub fn command(&self) -> Duration {
        secs_or(self.command_timeout, DEFAULT_COMMAND_TIMEOUT)
    }

    pub fn screencap(&self) -> Duration {
        secs_or(self.screencap_timeout, DEFAULT_SCREENCAP_TIMEOUT)
    }

    pub fn ocr(&self) -> Duration {
        secs_or(self.ocr_timeout, DEFAULT_OCR_TIMEOUT)
    }

    pub fn action_delay(&self) -> Duration {
        secs_or(self.action_delay, DEFAULT_ACTION_DELAY)
    }
}

/// Master timing configuration
#[derive(Debug, Clone, Default)]
pub struct TimingConfig {
    pub command: CommandTimingConfig,
}

lazy_static! {
    /// Global timing configuration instance
    pub static ref TIMING_CONFIG: TimingConfig = TimingConfig::default();
}
