//! Configuration module for phone_tools
//!
//! This module contains:
//! - `timing`: Timeouts and delays for device and OCR commands
//! - `paths`: Data directory layout (resources, debug output)

mod paths;
mod timing;

pub use paths::DataPaths;
pub use timing::{CommandTimingConfig, TimingConfig, TIMING_CONFIG};
