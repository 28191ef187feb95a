//! phone_tools: stateful device automation behind stateless tool calls
//!
//! This library provides:
//! - An object registry mapping opaque identifiers to live handles
//! - A tool facade (`DeviceTools`) chaining device, resource and session ids
//! - An ADB backend for screen capture, tap, swipe and text input
//! - An OCR backend driving an external recognition engine
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use phone_tools::{AdbSdk, DataPaths, DeviceTools, Discovery};
//!
//! #[tokio::main]
//! async fn main() {
//!     let tools = DeviceTools::new(Arc::new(AdbSdk::default()), DataPaths::platform_default());
//!
//!     if let Discovery::Single(name) = tools.find_endpoints().await {
//!         let controller = tools.connect(&name).await.unwrap();
//!         let resource = tools.load_resource("assets/resource").await.unwrap();
//!         let session = tools.create_session(&controller, &resource).await.unwrap();
//!         println!("{:?}", tools.recognize(&session).await);
//!     }
//! }
//! ```

// Core modules
pub mod error;
pub mod registry;
pub mod sdk;

// Configuration module
pub mod config;

// Backends
pub mod adb;
pub mod backend;
pub mod ocr;

// Facade
pub mod tools;

pub use error::{Error, Result};

pub use config::{CommandTimingConfig, DataPaths, TimingConfig, TIMING_CONFIG};

pub use registry::{Handle, ObjectRegistry};

pub use sdk::{AutomationSdk, Controller, Endpoint, Recognition, Rect, Resource, Session, Swipe, TextBox};

pub use backend::AdbSdk;
pub use ocr::OcrEngine;

pub use tools::{session_key, DeviceTools, Discovery, MULTIPLE_DEVICES_PROMPT};
