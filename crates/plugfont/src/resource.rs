// this_file: crates/plugfont/src/resource.rs

//! Handle bookkeeping
//!
//! Every font and image the host hands out lives in one table. A handle is
//! a number from a counter that starts at 1 and never repeats, so a stale
//! handle can never alias a newer resource. Entries remember the module
//! that created them and a reference count; the entry disappears when the
//! count reaches zero or the module is released.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use plugfont_core::{
    error::{FontError, Result},
    ImageData, Module, Resource,
};

use crate::font::FontInstance;

/// What a handle refers to
#[derive(Debug, Clone)]
pub enum ResourceKind {
    Font(Arc<FontInstance>),
    ImageData(Arc<Mutex<ImageData>>),
}

impl ResourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Font(_) => "font",
            ResourceKind::ImageData(_) => "image data",
        }
    }
}

#[derive(Debug)]
struct Entry {
    module: Module,
    refcount: u32,
    kind: ResourceKind,
}

/// Table of live resources
#[derive(Debug)]
pub struct ResourceTracker {
    next_id: AtomicU32,
    entries: RwLock<HashMap<u32, Entry>>,
}

impl Default for ResourceTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceTracker {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU32::new(1),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Register a resource owned by `module` with one reference
    ///
    /// Returns the null handle once the id space is exhausted.
    pub fn insert(&self, module: Module, kind: ResourceKind) -> Resource {
        let Ok(id) = self
            .next_id
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |id| id.checked_add(1))
        else {
            log::error!("Resource ids exhausted");
            return Resource::NULL;
        };

        log::trace!("New {} resource #{} for module {}", kind.name(), id, module.0);
        self.entries.write().insert(
            id,
            Entry {
                module,
                refcount: 1,
                kind,
            },
        );
        Resource(id)
    }

    /// What `resource` refers to, if it is alive
    pub fn get(&self, resource: Resource) -> Option<ResourceKind> {
        self.entries
            .read()
            .get(&resource.id())
            .map(|entry| entry.kind.clone())
    }

    pub fn font(&self, resource: Resource) -> Result<Arc<FontInstance>> {
        match self.get(resource) {
            Some(ResourceKind::Font(font)) => Ok(font),
            Some(other) => Err(FontError::WrongResourceKind {
                resource,
                expected: "font",
                actual: other.name(),
            }),
            None => Err(FontError::InvalidResource(resource)),
        }
    }

    pub fn image_data(&self, resource: Resource) -> Result<Arc<Mutex<ImageData>>> {
        match self.get(resource) {
            Some(ResourceKind::ImageData(image)) => Ok(image),
            Some(other) => Err(FontError::WrongResourceKind {
                resource,
                expected: "image data",
                actual: other.name(),
            }),
            None => Err(FontError::InvalidResource(resource)),
        }
    }

    /// Module that created `resource`
    pub fn owner(&self, resource: Resource) -> Option<Module> {
        self.entries
            .read()
            .get(&resource.id())
            .map(|entry| entry.module)
    }

    pub fn refcount(&self, resource: Resource) -> Option<u32> {
        self.entries
            .read()
            .get(&resource.id())
            .map(|entry| entry.refcount)
    }

    /// Take another reference; false for dead handles
    pub fn add_ref(&self, resource: Resource) -> bool {
        match self.entries.write().get_mut(&resource.id()) {
            Some(entry) => {
                entry.refcount = entry.refcount.saturating_add(1);
                true
            },
            None => false,
        }
    }

    /// Drop one reference, freeing the entry at zero; false for dead handles
    pub fn release(&self, resource: Resource) -> bool {
        let mut entries = self.entries.write();
        let Some(entry) = entries.get_mut(&resource.id()) else {
            return false;
        };
        entry.refcount -= 1;
        if entry.refcount == 0 {
            entries.remove(&resource.id());
            log::trace!("Resource {} freed", resource);
        }
        true
    }

    /// Free everything `module` created, returning how many entries went away
    pub fn release_module(&self, module: Module) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.module != module);
        let freed = before - entries.len();
        if freed > 0 {
            log::debug!("Released {} resources of module {}", freed, module.0);
        }
        freed
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugfont_core::{ImageDataFormat, Size};

    fn image() -> ResourceKind {
        let data = ImageData::new(ImageDataFormat::native(), Size::new(2, 2)).unwrap();
        ResourceKind::ImageData(Arc::new(Mutex::new(data)))
    }

    #[test]
    fn test_handles_start_at_one_and_never_repeat() {
        let tracker = ResourceTracker::new();
        let a = tracker.insert(Module(1), image());
        assert_eq!(a, Resource(1));
        assert!(tracker.release(a));
        let b = tracker.insert(Module(1), image());
        assert_eq!(b, Resource(2));
        assert!(tracker.get(a).is_none());
    }

    #[test]
    fn test_refcounting() {
        let tracker = ResourceTracker::new();
        let res = tracker.insert(Module(1), image());
        assert!(tracker.add_ref(res));
        assert_eq!(tracker.refcount(res), Some(2));
        assert!(tracker.release(res));
        assert!(tracker.get(res).is_some());
        assert!(tracker.release(res));
        assert!(tracker.get(res).is_none());
        assert!(!tracker.release(res));
        assert!(!tracker.add_ref(res));
    }

    #[test]
    fn test_release_module_only_frees_its_own() {
        let tracker = ResourceTracker::new();
        let mine = tracker.insert(Module(1), image());
        let theirs = tracker.insert(Module(2), image());
        tracker.add_ref(mine);
        assert_eq!(tracker.release_module(Module(1)), 1);
        assert!(tracker.get(mine).is_none());
        assert_eq!(tracker.owner(theirs), Some(Module(2)));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_wrong_kind_is_reported() {
        let tracker = ResourceTracker::new();
        let res = tracker.insert(Module(1), image());
        let err = tracker.font(res).unwrap_err();
        assert!(matches!(
            err,
            FontError::WrongResourceKind {
                expected: "font",
                ..
            }
        ));
        assert!(matches!(
            tracker.font(Resource::NULL),
            Err(FontError::InvalidResource(_))
        ));
        assert!(tracker.image_data(res).is_ok());
    }
}
