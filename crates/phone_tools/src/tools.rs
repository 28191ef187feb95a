//! Tool facade over the object registry
//!
//! Every operation takes identifiers, resolves them through the registry,
//! performs one backend call, and parks any new object back in the registry.
//! Failures never escape as errors: they are logged and reported as `None`,
//! `false`, or an empty discovery, so a planner can treat them as ordinary
//! control flow.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use tracing::{debug, info, warn};

use crate::config::DataPaths;
use crate::registry::{Handle, ObjectRegistry};
use crate::sdk::{AutomationSdk, Controller, Recognition, Resource, Session, Swipe};

/// Shown to the caller whenever more than one device is available
pub const MULTIPLE_DEVICES_PROMPT: &str =
    "Multiple devices found. Ask the user which device to use; do not pick one automatically.";

const SESSION_PREFIX: &str = "_session_";

/// Outcome of device discovery
///
/// Serializes as `[]`, a bare name, or `{"candidates": [...], "prompt": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    Empty,
    Single(String),
    Multiple {
        candidates: Vec<String>,
        prompt: String,
    },
}

impl Discovery {
    pub fn from_names(mut names: Vec<String>) -> Self {
        match names.len() {
            0 => Self::Empty,
            1 => Self::Single(names.remove(0)),
            _ => Self::Multiple {
                candidates: names,
                prompt: MULTIPLE_DEVICES_PROMPT.to_string(),
            },
        }
    }
}

impl Serialize for Discovery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Empty => serializer.serialize_seq(Some(0))?.end(),
            Self::Single(name) => serializer.serialize_str(name),
            Self::Multiple { candidates, prompt } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("candidates", candidates)?;
                map.serialize_entry("prompt", prompt)?;
                map.end()
            }
        }
    }
}

/// Registry key under which the session for a controller/resource pair lives
pub fn session_key(controller_id: &str, resource_id: &str) -> String {
    format!("{}{}_{}", SESSION_PREFIX, controller_id, resource_id)
}

fn session_depends_on(key: &str, id: &str) -> bool {
    key.strip_prefix(SESSION_PREFIX).is_some_and(|rest| {
        rest.starts_with(&format!("{}_", id)) || rest.ends_with(&format!("_{}", id))
    })
}

/// Context object owning the registry and the automation backend
pub struct DeviceTools {
    registry: ObjectRegistry<Handle>,
    sdk: Arc<dyn AutomationSdk>,
    paths: DataPaths,
}

impl DeviceTools {
    pub fn new(sdk: Arc<dyn AutomationSdk>, paths: DataPaths) -> Self {
        Self {
            registry: ObjectRegistry::new(),
            sdk,
            paths,
        }
    }

    pub fn registry(&self) -> &ObjectRegistry<Handle> {
        &self.registry
    }

    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    fn resolve<T>(&self, id: &str, kind: &str, pick: fn(&Handle) -> Option<T>) -> Option<T> {
        match self.registry.get(id) {
            Some(handle) => {
                let resolved = pick(&handle);
                if resolved.is_none() {
                    warn!("{} is a {}, not a {}", id, handle.kind(), kind);
                }
                resolved
            }
            None => {
                warn!("Unknown {} id: {}", kind, id);
                None
            }
        }
    }

    fn controller(&self, id: &str) -> Option<Arc<dyn Controller>> {
        self.resolve(id, "controller", Handle::as_controller)
    }

    fn resource(&self, id: &str) -> Option<Arc<dyn Resource>> {
        self.resolve(id, "resource", Handle::as_resource)
    }

    fn session(&self, id: &str) -> Option<Arc<dyn Session>> {
        self.resolve(id, "session", Handle::as_session)
    }

    /// Scan for devices and register each one under its name
    ///
    /// Never picks a device when several are found.
    pub async fn find_endpoints(&self) -> Discovery {
        let endpoints = match self.sdk.discover().await {
            Ok(endpoints) => endpoints,
            Err(e) => {
                warn!("Device discovery failed: {}", e);
                return Discovery::Empty;
            }
        };

        let names = endpoints
            .into_iter()
            .map(|endpoint| {
                let name = endpoint.name().to_string();
                self.registry
                    .register_by_name(name, Handle::Endpoint(endpoint))
            })
            .collect();

        Discovery::from_names(names)
    }

    /// Connect to a discovered device, returning a controller id
    pub async fn connect(&self, name: &str) -> Option<String> {
        let endpoint = self.resolve(name, "device", Handle::as_endpoint)?;

        match endpoint.connect().await {
            Ok(controller) => {
                let id = self.registry.register(Handle::Controller(controller));
                info!("Device {} connected as controller {}", name, id);
                Some(id)
            }
            Err(e) => {
                warn!("Failed to connect to {}: {}", name, e);
                None
            }
        }
    }

    /// Load a resource bundle, returning a resource id
    pub async fn load_resource(&self, path: impl AsRef<Path>) -> Option<String> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Resource path does not exist: {}", path.display());
            return None;
        }

        match self.sdk.load_bundle(path).await {
            Ok(resource) => {
                let id = self.registry.register(Handle::Resource(resource));
                info!("Loaded resource {} as {}", path.display(), id);
                Some(id)
            }
            Err(e) => {
                warn!("Failed to load resource {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Bind a controller to a resource, returning a session id
    ///
    /// Sessions are cached per pair: while both inputs are still registered,
    /// repeat calls return the same id without rebinding.
    pub async fn create_session(&self, controller_id: &str, resource_id: &str) -> Option<String> {
        let key = session_key(controller_id, resource_id);
        let controller = self.controller(controller_id);
        let resource = self.resource(resource_id);

        if let Some(cached) = self.registry.get(&key) {
            if controller.is_some() && resource.is_some() && cached.as_session().is_some() {
                debug!("Reusing session {}", key);
                return Some(key);
            }
            warn!("Dropping stale session {}", key);
            self.registry.unregister(&key);
        }

        let (controller, resource) = controller.zip(resource)?;

        match self.sdk.bind(resource, controller).await {
            Ok(session) => {
                let id = self.registry.register_by_name(key, Handle::Session(session));
                info!("Created session {}", id);
                Some(id)
            }
            Err(e) => {
                warn!(
                    "Failed to bind controller {} to resource {}: {}",
                    controller_id, resource_id, e
                );
                None
            }
        }
    }

    /// Capture the screen and run text recognition on it
    pub async fn recognize(&self, session_id: &str) -> Option<Recognition> {
        let session = self.session(session_id)?;

        let frame = match session.controller().screenshot().await {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Screen capture failed for session {}: {}", session_id, e);
                return None;
            }
        };

        match session.recognize(&frame).await {
            Ok(result) => Some(result),
            Err(e) => {
                warn!("Recognition failed for session {}: {}", session_id, e);
                None
            }
        }
    }

    pub async fn click(&self, controller_id: &str, x: i32, y: i32) -> bool {
        let Some(controller) = self.controller(controller_id) else {
            return false;
        };

        match controller.click(x, y).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Click at ({}, {}) failed: {}", x, y, e);
                false
            }
        }
    }

    pub async fn swipe(&self, controller_id: &str, gesture: Swipe) -> bool {
        let Some(controller) = self.controller(controller_id) else {
            return false;
        };

        match controller.swipe(gesture).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Swipe {:?} failed: {}", gesture, e);
                false
            }
        }
    }

    pub async fn input_text(&self, controller_id: &str, text: &str) -> bool {
        let Some(controller) = self.controller(controller_id) else {
            return false;
        };

        match controller.input_text(text).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Text input failed: {}", e);
                false
            }
        }
    }

    /// Save the current screen as a PNG under the screenshots directory
    pub async fn screencap(&self, controller_id: &str) -> Option<PathBuf> {
        let controller = self.controller(controller_id)?;

        let frame = match controller.screenshot().await {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Screen capture failed: {}", e);
                return None;
            }
        };

        let mut buffer = Vec::new();
        if let Err(e) = frame.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png) {
            warn!("Failed to encode screenshot: {}", e);
            return None;
        }

        let dir = self.paths.screenshots_dir();
        let file_path = dir.join(format!(
            "screencap_{}.png",
            Local::now().format("%Y-%m-%d_%H-%M-%S-%3f")
        ));

        let written = async {
            tokio::fs::create_dir_all(&dir).await?;
            tokio::fs::write(&file_path, &buffer).await
        };
        match written.await {
            Ok(()) => {
                debug!("Saved screenshot to {}", file_path.display());
                Some(file_path)
            }
            Err(e) => {
                warn!("Failed to save screenshot {}: {}", file_path.display(), e);
                None
            }
        }
    }

    /// Drop an object from the registry
    ///
    /// Releasing a controller or resource also drops the cached sessions
    /// built on it.
    pub fn release(&self, id: &str) -> bool {
        let Some(handle) = self.registry.get(id) else {
            return false;
        };
        let removed = self.registry.unregister(id);

        if matches!(handle, Handle::Controller(_) | Handle::Resource(_)) {
            for key in self.registry.list() {
                if session_depends_on(&key, id) && self.registry.unregister(&key) {
                    debug!("Released dependent session {}", key);
                }
            }
        }

        if removed {
            info!("Released {} {}", handle.kind(), id);
        }
        removed
    }
}
