//! Live object table
//!
//! Maps `ObjectId`s handed across the boundary back to the instances they
//! name. Each instance sits behind its own lock; the table lock is released
//! before a call runs, so a method may look up other objects.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bindery_sdk::{ObjectHandle, ObjectId, StringName};
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::trace;

use crate::error::{DispatchError, DispatchResult};
use crate::instance::ClassInstance;

type Slot = Arc<Mutex<Box<dyn ClassInstance>>>;

/// Registry of live objects
pub struct ObjectDb {
    next_id: AtomicU64,
    objects: DashMap<ObjectId, (StringName, Slot)>,
}

impl ObjectDb {
    /// Empty table; ids start at 1
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            objects: DashMap::new(),
        }
    }

    fn allocate_id(&self) -> ObjectId {
        loop {
            if let Some(id) = ObjectId::from_raw(self.next_id.fetch_add(1, Ordering::Relaxed)) {
                return id;
            }
        }
    }

    /// Store an instance and hand out its handle
    pub fn insert(&self, instance: Box<dyn ClassInstance>) -> ObjectHandle {
        let id = self.allocate_id();
        let class = instance.class_name();
        trace!(%id, %class, "object created");
        self.objects
            .insert(id, (class.clone(), Arc::new(Mutex::new(instance))));
        ObjectHandle::new(id, class)
    }

    /// Drop an object from the table.
    ///
    /// Returns the instance unless a call on it is still in flight, in which
    /// case it is freed when that call returns.
    pub fn remove(&self, id: ObjectId) -> Option<Box<dyn ClassInstance>> {
        let (_, (class, slot)) = self.objects.remove(&id)?;
        trace!(%id, %class, "object freed");
        Arc::try_unwrap(slot).ok().map(Mutex::into_inner)
    }

    /// Whether `id` names a live object
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Handle for a live object
    pub fn handle(&self, id: ObjectId) -> Option<ObjectHandle> {
        self.objects
            .get(&id)
            .map(|entry| ObjectHandle::new(id, entry.0.clone()))
    }

    /// Run `f` with exclusive access to the object.
    ///
    /// Never waits: an object already inside a call, on this thread or
    /// another, fails with `InstanceBusy`.
    pub fn with_instance<R>(
        &self,
        id: ObjectId,
        f: impl FnOnce(&mut dyn ClassInstance) -> R,
    ) -> DispatchResult<R> {
        let slot = self
            .objects
            .get(&id)
            .map(|entry| entry.1.clone())
            .ok_or(DispatchError::UnknownObject(id))?;
        let mut instance = slot.try_lock().ok_or(DispatchError::InstanceBusy(id))?;
        Ok(f(instance.as_mut()))
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Ids of all live objects
    pub fn ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|entry| *entry.key()).collect()
    }
}

impl Default for ObjectDb {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ObjectDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectDb")
            .field("objects", &self.objects.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_instance;
    use crate::error::RegistrationError;
    use crate::instance::{downcast_mut, NativeClass};
    use crate::registry::ClassBuilder;

    struct Cell {
        value: i64,
    }

    impl NativeClass for Cell {
        const CLASS_NAME: &'static str = "Cell";
        const PARENT_NAME: &'static str = "Object";

        fn bind(_builder: &mut ClassBuilder<'_, Self>) -> Result<(), RegistrationError> {
            Ok(())
        }
    }

    class_instance!(Cell);

    #[test]
    fn test_insert_and_access() {
        let db = ObjectDb::new();
        let handle = db.insert(Box::new(Cell { value: 1 }));
        assert_eq!(handle.class_name, "Cell");
        assert!(db.contains(handle.id));
        assert_eq!(db.len(), 1);

        db.with_instance(handle.id, |instance| {
            if let Some(cell) = downcast_mut::<Cell>(instance) {
                cell.value += 41;
            }
        })
        .unwrap();
        let value = db
            .with_instance(handle.id, |instance| {
                downcast_mut::<Cell>(instance).map(|c| c.value)
            })
            .unwrap();
        assert_eq!(value, Some(42));
        assert_eq!(db.handle(handle.id), Some(handle));
    }

    #[test]
    fn test_ids_are_unique() {
        let db = ObjectDb::new();
        let a = db.insert(Box::new(Cell { value: 0 }));
        let b = db.insert(Box::new(Cell { value: 0 }));
        assert_ne!(a.id, b.id);
        assert_eq!(db.ids().len(), 2);
    }

    #[test]
    fn test_remove() {
        let db = ObjectDb::new();
        let handle = db.insert(Box::new(Cell { value: 3 }));
        let removed = db.remove(handle.id);
        assert!(removed.is_some());
        assert!(db.is_empty());
        assert!(db.remove(handle.id).is_none());
        assert_eq!(
            db.with_instance(handle.id, |_| ()),
            Err(DispatchError::UnknownObject(handle.id))
        );
    }

    #[test]
    fn test_nested_lookup_does_not_deadlock() {
        let db = ObjectDb::new();
        let outer = db.insert(Box::new(Cell { value: 1 }));
        let inner = db.insert(Box::new(Cell { value: 2 }));
        let sum = db
            .with_instance(outer.id, |a| {
                let a = downcast_mut::<Cell>(a).map_or(0, |c| c.value);
                let b = db
                    .with_instance(inner.id, |b| downcast_mut::<Cell>(b).map_or(0, |c| c.value))
                    .unwrap_or(0);
                a + b
            })
            .unwrap();
        assert_eq!(sum, 3);
    }

    #[test]
    fn test_reentrant_access_reports_busy() {
        let db = ObjectDb::new();
        let cell = db.insert(Box::new(Cell { value: 1 }));
        let inner = db.with_instance(cell.id, |_| db.with_instance(cell.id, |_| ()));
        assert_eq!(inner, Ok(Err(DispatchError::InstanceBusy(cell.id))));

        // The lock is released once the outer call returns
        assert_eq!(db.with_instance(cell.id, |_| ()), Ok(()));
    }
}
