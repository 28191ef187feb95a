//! Data directory layout
//!
//! ```text
//! <data>/
//!   resource/model/ocr/   OCR engine data for the default bundle
//!   config/
//!   debug/screenshots/    images written by the screencap tool
//! ```

use std::path::{Path, PathBuf};

const APP_DIR: &str = "phone-mcp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    data_dir: PathBuf,
}

impl DataPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Platform data directory, falling back to `./.phone-mcp`
    pub fn platform_default() -> Self {
        match dirs::data_local_dir() {
            Some(dir) => Self::new(dir.join(APP_DIR)),
            None => Self::new(PathBuf::from(format!(".{}", APP_DIR))),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn resource_dir(&self) -> PathBuf {
        self.data_dir.join("resource")
    }

    pub fn model_dir(&self) -> PathBuf {
        self.resource_dir().join("model")
    }

    pub fn ocr_dir(&self) -> PathBuf {
        self.model_dir().join("ocr")
    }

    pub fn config_dir(&self) -> PathBuf {
        self.data_dir.join("config")
    }

    pub fn debug_dir(&self) -> PathBuf {
        self.data_dir.join("debug")
    }

    pub fn screenshots_dir(&self) -> PathBuf {
        self.debug_dir().join("screenshots")
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::platform_default()
    }
}
