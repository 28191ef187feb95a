//! Backend wiring ADB devices to the OCR engine

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::adb::{list_devices, AdbEndpoint};
use crate::config::{CommandTimingConfig, TIMING_CONFIG};
use crate::error::Result;
use crate::ocr::{OcrBundle, OcrEngine, OcrSession};
use crate::sdk::{AutomationSdk, Controller, Endpoint, Resource, Session};

/// [`AutomationSdk`] backed by the `adb` tool and an external OCR command
#[derive(Debug, Clone)]
pub struct AdbSdk {
    adb_path: String,
    ocr: OcrEngine,
    timing: CommandTimingConfig,
}

impl AdbSdk {
    pub fn new(adb_path: impl Into<String>, ocr: OcrEngine) -> Self {
        Self {
            adb_path: adb_path.into(),
            ocr,
            timing: TIMING_CONFIG.command.clone(),
        }
    }

    /// Override the timing read from the environment
    pub fn with_timing(mut self, timing: CommandTimingConfig) -> Self {
        self.timing = timing;
        self
    }

    pub fn adb_path(&self) -> &str {
        &self.adb_path
    }
}

impl Default for AdbSdk {
    fn default() -> Self {
        let timing = TIMING_CONFIG.command.clone();
        Self::new("adb", OcrEngine::new("tesseract", "eng", timing.ocr()))
    }
}

#[async_trait]
impl AutomationSdk for AdbSdk {
    async fn discover(&self) -> Result<Vec<Arc<dyn Endpoint>>> {
        let devices = list_devices(&self.adb_path, &self.timing).await?;
        debug!("adb reports {} devices", devices.len());

        Ok(devices
            .into_iter()
            .filter(|d| d.is_ready())
            .map(|d| {
                Arc::new(AdbEndpoint::new(d, self.adb_path.clone(), self.timing.clone()))
                    as Arc<dyn Endpoint>
            })
            .collect())
    }

    async fn load_bundle(&self, path: &Path) -> Result<Arc<dyn Resource>> {
        Ok(Arc::new(OcrBundle::load(path).await?))
    }

    async fn bind(
        &self,
        resource: Arc<dyn Resource>,
        controller: Arc<dyn Controller>,
    ) -> Result<Arc<dyn Session>> {
        Ok(Arc::new(OcrSession::bind(
            self.ocr.clone(),
            resource,
            controller,
        )?))
    }
}
