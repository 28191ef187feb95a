//! Scripted in-memory backend for facade tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::{DynamicImage, RgbImage};
use phone_tools::{
    AutomationSdk, Controller, Endpoint, Error, Recognition, Rect, Resource, Result, Session,
    Swipe, TextBox,
};

/// Shared knobs and call log for one fake device farm
#[derive(Default)]
pub struct Script {
    pub devices: Mutex<Vec<String>>,
    pub discover_fails: AtomicBool,
    pub connect_fails: AtomicBool,
    pub capture_fails: AtomicBool,
    pub input_fails: AtomicBool,
    pub bind_fails: AtomicBool,
    pub binds: AtomicUsize,
    pub actions: Mutex<Vec<String>>,
}

impl Script {
    pub fn with_devices(names: &[&str]) -> Arc<Self> {
        let script = Self::default();
        *script.devices.lock().unwrap() = names.iter().map(|n| n.to_string()).collect();
        Arc::new(script)
    }

    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().unwrap().clone()
    }

    fn record(&self, action: String) -> Result<()> {
        if self.input_fails.load(Ordering::SeqCst) {
            return Err(Error::CommandFailed("injected input failure".to_string()));
        }
        self.actions.lock().unwrap().push(action);
        Ok(())
    }
}

pub fn sample_recognition() -> Recognition {
    vec![TextBox {
        text: "Settings".to_string(),
        bbox: Rect::new(40, 100, 200, 60),
        score: 0.97,
    }]
}

pub struct FakeSdk {
    pub script: Arc<Script>,
}

impl FakeSdk {
    pub fn new(script: Arc<Script>) -> Arc<Self> {
        Arc::new(Self { script })
    }
}

#[async_trait]
impl AutomationSdk for FakeSdk {
    async fn discover(&self) -> Result<Vec<Arc<dyn Endpoint>>> {
        if self.script.discover_fails.load(Ordering::SeqCst) {
            return Err(Error::CommandFailed("adb not running".to_string()));
        }
        let names = self.script.devices.lock().unwrap().clone();
        Ok(names
            .into_iter()
            .map(|name| {
                Arc::new(FakeEndpoint {
                    name,
                    script: Arc::clone(&self.script),
                }) as Arc<dyn Endpoint>
            })
            .collect())
    }

    async fn load_bundle(&self, path: &Path) -> Result<Arc<dyn Resource>> {
        if !path.join("model").is_dir() {
            return Err(Error::InvalidBundle(path.display().to_string()));
        }
        Ok(Arc::new(FakeResource {
            root: path.to_path_buf(),
        }))
    }

    async fn bind(
        &self,
        _resource: Arc<dyn Resource>,
        controller: Arc<dyn Controller>,
    ) -> Result<Arc<dyn Session>> {
        if self.script.bind_fails.load(Ordering::SeqCst) {
            return Err(Error::OcrUnavailable("no engine".to_string()));
        }
        self.script.binds.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(FakeSession { controller }))
    }
}

pub struct FakeEndpoint {
    name: String,
    script: Arc<Script>,
}

#[async_trait]
impl Endpoint for FakeEndpoint {
    fn name(&self) -> &str {
        &self.name
    }

    async fn connect(&self) -> Result<Arc<dyn Controller>> {
        if self.script.connect_fails.load(Ordering::SeqCst) {
            return Err(Error::DeviceNotFound(self.name.clone()));
        }
        Ok(Arc::new(FakeController {
            script: Arc::clone(&self.script),
        }))
    }
}

pub struct FakeController {
    script: Arc<Script>,
}

#[async_trait]
impl Controller for FakeController {
    async fn screenshot(&self) -> Result<DynamicImage> {
        if self.script.capture_fails.load(Ordering::SeqCst) {
            return Err(Error::CommandFailed("screencap returned no image".to_string()));
        }
        Ok(DynamicImage::ImageRgb8(RgbImage::new(4, 8)))
    }

    async fn click(&self, x: i32, y: i32) -> Result<()> {
        self.script.record(format!("click {} {}", x, y))
    }

    async fn swipe(&self, gesture: Swipe) -> Result<()> {
        self.script.record(format!(
            "swipe {} {} {} {} {}",
            gesture.start_x, gesture.start_y, gesture.end_x, gesture.end_y, gesture.duration_ms
        ))
    }

    async fn input_text(&self, text: &str) -> Result<()> {
        self.script.record(format!("text {}", text))
    }
}

pub struct FakeResource {
    root: PathBuf,
}

impl Resource for FakeResource {
    fn root(&self) -> &Path {
        &self.root
    }
}

pub struct FakeSession {
    controller: Arc<dyn Controller>,
}

#[async_trait]
impl Session for FakeSession {
    fn controller(&self) -> Arc<dyn Controller> {
        Arc::clone(&self.controller)
    }

    async fn recognize(&self, frame: &DynamicImage) -> Result<Recognition> {
        assert_eq!((frame.width(), frame.height()), (4, 8));
        Ok(sample_recognition())
    }
}
