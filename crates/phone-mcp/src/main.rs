//! phone-mcp server
//!
//! Usage:
//!     phone-mcp [OPTIONS]
//!
//! Environment Variables:
//!     PHONE_MCP_ADB_PATH: adb executable (default: adb)
//!     PHONE_MCP_OCR_COMMAND: OCR engine executable (default: tesseract)
//!     PHONE_MCP_OCR_LANG: OCR language (default: eng)
//!     PHONE_MCP_DATA_DIR: Data directory for screenshots and default resources
//!     RUST_LOG: Log verbosity (default: phone_mcp=info,phone_tools=info)
//!
//! The server speaks JSON-RPC 2.0 over stdio; logs go to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use phone_mcp::PhoneMcpServer;
use phone_tools::{AdbSdk, DataPaths, DeviceTools, OcrEngine, TIMING_CONFIG};
use tracing_subscriber::EnvFilter;

/// MCP server for Android device automation
#[derive(Parser, Debug)]
#[command(name = "phone-mcp")]
#[command(about = "MCP server for Android device automation")]
#[command(version)]
struct Cli {
    /// Path to the adb executable
    #[arg(long, env = "PHONE_MCP_ADB_PATH", default_value = "adb")]
    adb_path: String,

    /// OCR engine executable (Tesseract-compatible)
    #[arg(long, env = "PHONE_MCP_OCR_COMMAND", default_value = "tesseract")]
    ocr_command: String,

    /// OCR language, e.g. eng or chi_sim
    #[arg(long, env = "PHONE_MCP_OCR_LANG", default_value = "eng")]
    ocr_lang: String,

    /// Data directory (default: platform data dir)
    #[arg(long, env = "PHONE_MCP_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

fn check_executable(name: &str, what: &str) {
    match which::which(name) {
        Ok(path) => tracing::info!("Using {} at {}", what, path.display()),
        Err(e) => tracing::warn!("{} not found ({}): {}", what, name, e),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout is reserved for the protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("phone_mcp=info,phone_tools=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    check_executable(&cli.adb_path, "adb");
    check_executable(&cli.ocr_command, "OCR engine");

    let paths = cli
        .data_dir
        .map(DataPaths::new)
        .unwrap_or_else(DataPaths::platform_default);
    tracing::info!(data_dir = %paths.data_dir().display(), "Starting phone-mcp server");

    let ocr = OcrEngine::new(cli.ocr_command, cli.ocr_lang, TIMING_CONFIG.command.ocr());
    let sdk = AdbSdk::new(cli.adb_path, ocr);

    let server = PhoneMcpServer::new(DeviceTools::new(Arc::new(sdk), paths));
    server.run().await?;

    Ok(())
}
