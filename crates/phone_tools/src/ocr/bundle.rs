//! Resource bundles on disk

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::sdk::Resource;

/// A resource directory; `model/ocr` inside it, when present, holds the
/// OCR engine's language data
#[derive(Debug, Clone)]
pub struct OcrBundle {
    root: PathBuf,
    model_dir: Option<PathBuf>,
}

impl OcrBundle {
    pub async fn load(path: &Path) -> Result<Self> {
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_dir() {
            return Err(Error::InvalidBundle(format!(
                "{} is not a directory",
                path.display()
            )));
        }

        let candidate = path.join("model").join("ocr");
        let model_dir = match tokio::fs::metadata(&candidate).await {
            Ok(meta) if meta.is_dir() => Some(candidate),
            _ => None,
        };
        debug!("Loaded bundle {} (model dir: {:?})", path.display(), model_dir);

        Ok(Self {
            root: path.to_path_buf(),
            model_dir,
        })
    }
}

impl Resource for OcrBundle {
    fn root(&self) -> &Path {
        &self.root
    }

    fn model_dir(&self) -> Option<&Path> {
        self.model_dir.as_deref()
    }
}
