//! Name and container bookkeeping for live applications.

use std::collections::BTreeMap;

use micro_dom::NodeId;

use crate::app::AppHandle;
use crate::error::MicroAppError;

#[derive(Debug)]
struct Entry {
    app: AppHandle,
    container: NodeId,
}

/// Live applications by name. A name and a container belong to at most one
/// live application at a time.
#[derive(Debug, Default)]
pub struct AppRegistry {
    entries: BTreeMap<String, Entry>,
}

impl AppRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `app`, which must have a fresh name and container.
    ///
    /// # Errors
    ///
    /// [`MicroAppError::DuplicateName`] or [`MicroAppError::ContainerInUse`].
    pub fn insert(&mut self, app: AppHandle) -> Result<(), MicroAppError> {
        let (name, container) = {
            let app = app.borrow();
            (app.name().to_string(), app.container())
        };
        if self.entries.contains_key(&name) {
            return Err(MicroAppError::DuplicateName(name));
        }
        if let Some((owner, _)) = self.entries.iter().find(|(_, e)| e.container == container) {
            return Err(MicroAppError::ContainerInUse {
                container,
                owner: owner.clone(),
            });
        }
        let _ = self.entries.insert(name, Entry { app, container });
        Ok(())
    }

    /// Look up an application by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<AppHandle> {
        self.entries.get(name).map(|e| AppHandle::clone(&e.app))
    }

    /// Whether `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Unregister an application, freeing its name and container.
    pub fn remove(&mut self, name: &str) -> Option<AppHandle> {
        self.entries.remove(name).map(|e| e.app)
    }

    /// Registered names in order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Number of registered applications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
