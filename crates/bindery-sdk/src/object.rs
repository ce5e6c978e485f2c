//! Object handles and references
//!
//! Objects never cross the boundary by pointer. The host and the extension
//! agree on opaque `ObjectId`s; the object table on the extension side maps
//! them back to instances.

use std::fmt;
use std::num::NonZeroU64;

use crate::string_name::StringName;

/// Opaque, non-zero object identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ObjectId(NonZeroU64);

impl ObjectId {
    /// Wrap a raw id. Zero is the null handle and yields `None`.
    #[inline]
    pub const fn from_raw(raw: u64) -> Option<Self> {
        match NonZeroU64::new(raw) {
            Some(id) => Some(ObjectId(id)),
            None => None,
        }
    }

    /// Raw id (never zero)
    #[inline]
    pub const fn to_raw(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Live object reference: the id plus the most-derived class name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectHandle {
    /// Object id
    pub id: ObjectId,
    /// Most-derived class of the object
    pub class_name: StringName,
}

impl ObjectHandle {
    /// Create a handle
    pub fn new(id: ObjectId, class_name: impl Into<StringName>) -> Self {
        ObjectHandle {
            id,
            class_name: class_name.into(),
        }
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}#{}>", self.class_name, self.id)
    }
}

/// Opaque resource id owned by a host server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct Rid(pub u64);

impl Rid {
    /// Whether the id refers to a resource
    pub fn is_valid(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for Rid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RID({})", self.0)
    }
}

/// Reference to a method on an object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Callable {
    /// Target object, `None` for an unbound callable
    pub object: Option<ObjectId>,
    /// Method name
    pub method: StringName,
}

impl Callable {
    /// Create a callable
    pub fn new(object: Option<ObjectId>, method: impl Into<StringName>) -> Self {
        Callable {
            object,
            method: method.into(),
        }
    }

    /// Whether the callable names neither an object nor a method
    pub fn is_null(&self) -> bool {
        self.object.is_none() && self.method.is_empty()
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.object {
            Some(id) => write!(f, "Object#{}::{}", id, self.method),
            None => write!(f, "::{}", self.method),
        }
    }
}

/// Reference to a signal on an object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Signal {
    /// Emitting object
    pub object: Option<ObjectId>,
    /// Signal name
    pub name: StringName,
}

impl Signal {
    /// Create a signal reference
    pub fn new(object: Option<ObjectId>, name: impl Into<StringName>) -> Self {
        Signal {
            object,
            name: name.into(),
        }
    }

    /// Whether the reference is empty
    pub fn is_null(&self) -> bool {
        self.object.is_none() && self.name.is_empty()
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.object {
            Some(id) => write!(f, "Object#{}::[signal]{}", id, self.name),
            None => write!(f, "[signal]{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_null() {
        assert!(ObjectId::from_raw(0).is_none());
        assert_eq!(ObjectId::from_raw(7).map(ObjectId::to_raw), Some(7));
    }

    #[test]
    fn test_option_id_is_pointer_sized() {
        assert_eq!(std::mem::size_of::<Option<ObjectId>>(), 8);
    }

    #[test]
    fn test_handle_display() {
        let id = ObjectId::from_raw(3).unwrap();
        assert_eq!(ObjectHandle::new(id, "Node").to_string(), "<Node#3>");
        assert_eq!(Callable::new(Some(id), "run").to_string(), "Object#3::run");
    }

    #[test]
    fn test_null_references() {
        assert!(Callable::default().is_null());
        assert!(Signal::default().is_null());
        assert!(!Rid::default().is_valid());
    }
}
