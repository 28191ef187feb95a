//! External OCR engine and the sessions bound to it

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use image::DynamicImage;
use tempfile::tempdir;
use tokio::process::Command;
use tracing::debug;

use super::tsv::parse_tsv;
use crate::error::{Error, Result};
use crate::sdk::{Controller, Recognition, Resource, Session};

/// How to invoke the OCR engine (Tesseract command-line interface)
#[derive(Debug, Clone)]
pub struct OcrEngine {
    command: String,
    lang: String,
    timeout: Duration,
}

impl OcrEngine {
    pub fn new(command: impl Into<String>, lang: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            lang: lang.into(),
            timeout,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Locate the engine binary on `PATH` (or as a literal path)
    pub fn resolve(&self) -> Result<PathBuf> {
        which::which(&self.command)
            .map_err(|e| Error::OcrUnavailable(format!("{}: {}", self.command, e)))
    }

    /// Run recognition over `frame` using data from `model_dir`
    pub async fn recognize(
        &self,
        binary: &Path,
        model_dir: Option<&Path>,
        frame: &DynamicImage,
    ) -> Result<Recognition> {
        // Engine reads from a file; the temp dir is removed on drop
        let temp_dir = tempdir()?;
        let image_path = temp_dir.path().join("frame.png");
        frame.save_with_format(&image_path, image::ImageFormat::Png)?;

        let mut cmd = Command::new(binary);
        cmd.arg(&image_path).arg("stdout");
        if let Some(dir) = model_dir {
            cmd.arg("--tessdata-dir").arg(dir);
        }
        cmd.arg("-l").arg(&self.lang).arg("tsv");
        cmd.kill_on_drop(true);

        debug!("Running OCR: {:?}", cmd.as_std());

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| Error::Timeout(format!("OCR timeout after {:?}", self.timeout)))?
            .map_err(Error::Io)?;

        if !output.status.success() {
            return Err(Error::CommandFailed(format!(
                "OCR engine failed ({}): {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8(output.stdout)?;
        let result = parse_tsv(&stdout)?;
        debug!("OCR found {} text lines", result.len());

        Ok(result)
    }
}

/// A controller bound to a resource bundle and a resolved OCR engine
pub struct OcrSession {
    controller: Arc<dyn Controller>,
    resource: Arc<dyn Resource>,
    engine: OcrEngine,
    binary: PathBuf,
}

impl OcrSession {
    /// Bind, failing when the engine binary cannot be found
    pub fn bind(
        engine: OcrEngine,
        resource: Arc<dyn Resource>,
        controller: Arc<dyn Controller>,
    ) -> Result<Self> {
        let binary = engine.resolve()?;
        Ok(Self {
            controller,
            resource,
            engine,
            binary,
        })
    }
}

#[async_trait]
impl Session for OcrSession {
    fn controller(&self) -> Arc<dyn Controller> {
        Arc::clone(&self.controller)
    }

    async fn recognize(&self, frame: &DynamicImage) -> Result<Recognition> {
        self.engine
            .recognize(&self.binary, self.resource.model_dir(), frame)
            .await
    }
}
