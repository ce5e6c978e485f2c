//! Named singleton objects
//!
//! Unlike classes, singletons may come and go while the program runs, so the
//! table carries its own lock.

use bindery_sdk::{ObjectHandle, StringName};
use parking_lot::Mutex;
use tracing::debug;

use crate::error::{RegistrationError, RegistrationResult};
use crate::registry::FxIndexMap;

/// Table of named objects
#[derive(Debug, Default)]
pub struct SingletonRegistry {
    singletons: Mutex<FxIndexMap<StringName, ObjectHandle>>,
}

impl SingletonRegistry {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `object` under `name`
    pub fn register(&self, name: impl Into<StringName>, object: ObjectHandle) -> RegistrationResult<()> {
        let name = name.into();
        let mut singletons = self.singletons.lock();
        if singletons.contains_key(&name) {
            return Err(RegistrationError::DuplicateSingleton(name));
        }
        debug!(singleton = %name, object = %object, "registered singleton");
        singletons.insert(name, object);
        Ok(())
    }

    /// Withdraw a singleton, returning its handle
    pub fn unregister(&self, name: &str) -> Option<ObjectHandle> {
        let removed = self.singletons.lock().shift_remove(name);
        if removed.is_some() {
            debug!(singleton = name, "unregistered singleton");
        }
        removed
    }

    /// Handle published under `name`
    pub fn get(&self, name: &str) -> Option<ObjectHandle> {
        self.singletons.lock().get(name).cloned()
    }

    /// Whether `name` is published
    pub fn contains(&self, name: &str) -> bool {
        self.singletons.lock().contains_key(name)
    }

    /// Published names in registration order
    pub fn names(&self) -> Vec<StringName> {
        self.singletons.lock().keys().cloned().collect()
    }
}
