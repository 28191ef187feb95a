//! OCR backend for recognition sessions
//!
//! This module provides:
//! - `bundle`: Resource bundles (`OcrBundle`)
//! - `engine`: The external OCR command and bound sessions (`OcrSession`)
//! - `tsv`: Parsing engine TSV output into text boxes

mod bundle;
mod engine;
mod tsv;

pub use bundle::OcrBundle;
pub use engine::{OcrEngine, OcrSession};
pub use tsv::parse_tsv;
