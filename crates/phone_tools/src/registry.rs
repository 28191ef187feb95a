//! Process-local handle table shared by the tool facade
//!
//! Tool calls are stateless, so every stateful object (endpoint, controller,
//! resource bundle, session) is parked here and referred to by an opaque
//! string identifier. The registry owns the handles; callers only ever see
//! identifiers.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::sdk::{Controller, Endpoint, Resource, Session};

/// A live object stored in the registry
#[derive(Clone)]
pub enum Handle {
    Endpoint(Arc<dyn Endpoint>),
    Controller(Arc<dyn Controller>),
    Resource(Arc<dyn Resource>),
    Session(Arc<dyn Session>),
}

impl Handle {
    /// Short name of the handle kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Endpoint(_) => "endpoint",
            Self::Controller(_) => "controller",
            Self::Resource(_) => "resource",
            Self::Session(_) => "session",
        }
    }

    pub fn as_endpoint(&self) -> Option<Arc<dyn Endpoint>> {
        match self {
            Self::Endpoint(endpoint) => Some(Arc::clone(endpoint)),
            _ => None,
        }
    }

    pub fn as_controller(&self) -> Option<Arc<dyn Controller>> {
        match self {
            Self::Controller(controller) => Some(Arc::clone(controller)),
            _ => None,
        }
    }

    pub fn as_resource(&self) -> Option<Arc<dyn Resource>> {
        match self {
            Self::Resource(resource) => Some(Arc::clone(resource)),
            _ => None,
        }
    }

    pub fn as_session(&self) -> Option<Arc<dyn Session>> {
        match self {
            Self::Session(session) => Some(Arc::clone(session)),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Endpoint(endpoint) => f.debug_tuple("Endpoint").field(&endpoint.name()).finish(),
            _ => f.debug_tuple(self.kind()).finish(),
        }
    }
}

/// Keyed store mapping identifiers to handles
///
/// Generic over the stored value so the table can be exercised without real
/// devices; the facade uses [`Handle`]. All access goes through one lock, so
/// concurrent tool calls see a consistent table.
#[derive(Debug)]
pub struct ObjectRegistry<T = Handle> {
    objects: RwLock<HashMap<String, T>>,
}

impl<T: Clone> ObjectRegistry<T> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Store a handle under a freshly generated identifier
    pub fn register(&self, object: T) -> String {
        let id = Uuid::new_v4().to_string();
        self.write().insert(id.clone(), object);
        id
    }

    /// Store a handle under a caller-chosen name, replacing any previous entry
    pub fn register_by_name(&self, name: impl Into<String>, object: T) -> String {
        let name = name.into();
        self.write().insert(name.clone(), object);
        name
    }

    /// Remove an entry, reporting whether one was present
    pub fn unregister(&self, id: &str) -> bool {
        self.write().remove(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.read().get(id).cloned()
    }

    /// All live identifiers, in no particular order
    pub fn list(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    pub fn exists(&self, id: &str) -> bool {
        self.read().contains_key(id)
    }

    pub fn count(&self) -> usize {
        self.read().len()
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    // Entries are independent values, so a panic while holding the lock
    // cannot leave the map half-updated.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, T>> {
        self.objects.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, T>> {
        self.objects.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl<T: Clone> Default for ObjectRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_register_and_get() {
        let registry = ObjectRegistry::new();
        let obj = Arc::new("value".to_string());
        let id = registry.register(Arc::clone(&obj));

        let stored = registry.get(&id).unwrap();
        assert!(Arc::ptr_eq(&stored, &obj));
    }

    #[test]
    fn test_register_by_name_returns_name() {
        let registry = ObjectRegistry::new();
        let name = registry.register_by_name("my_object", 7);

        assert_eq!(name, "my_object");
        assert_eq!(registry.get("my_object"), Some(7));
    }

    #[test]
    fn test_register_by_name_overwrites() {
        let registry = ObjectRegistry::new();
        registry.register_by_name("emulator-5554", "first");
        let before = registry.count();
        registry.register_by_name("emulator-5554", "second");

        assert_eq!(registry.get("emulator-5554"), Some("second"));
        assert_eq!(registry.count(), before);
    }

    #[test]
    fn test_unregister_twice() {
        let registry = ObjectRegistry::new();
        let id = registry.register("value");

        assert!(registry.unregister(&id));
        assert_eq!(registry.get(&id), None);
        assert!(!registry.unregister(&id));
    }

    #[test]
    fn test_get_missing_is_none() {
        let registry: ObjectRegistry<u32> = ObjectRegistry::new();
        assert_eq!(registry.get("nonexistent"), None);
    }

    #[test]
    fn test_list_and_count() {
        let registry = ObjectRegistry::new();
        assert_eq!(registry.count(), 0);

        let id1 = registry.register("obj1");
        let id2 = registry.register("obj2");

        assert_eq!(registry.count(), 2);
        let ids = registry.list();
        assert!(ids.contains(&id1));
        assert!(ids.contains(&id2));
    }

    #[test]
    fn test_exists() {
        let registry = ObjectRegistry::new();
        let id = registry.register("test");

        assert!(registry.exists(&id));
        assert!(!registry.exists("nonexistent"));
    }

    #[test]
    fn test_clear() {
        let registry = ObjectRegistry::new();
        registry.register("obj1");
        registry.register_by_name("named", "obj2");

        registry.clear();
        assert_eq!(registry.count(), 0);
        assert!(registry.list().is_empty());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let registry = ObjectRegistry::new();
        let ids: HashSet<String> = (0..256).map(|i| registry.register(i)).collect();

        assert_eq!(ids.len(), 256);
        assert_eq!(registry.count(), 256);
    }

    #[test]
    fn test_concurrent_register() {
        let registry = Arc::new(ObjectRegistry::new());
        let threads: Vec<_> = (0..8)
            .map(|t| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        registry.register(t * 100 + i);
                    }
                })
            })
            .collect();

        for thread in threads {
            thread.join().unwrap();
        }
        assert_eq!(registry.count(), 400);
    }
}
