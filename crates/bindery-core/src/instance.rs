//! Native class instances
//!
//! A `ClassInstance` is the object-safe view the registry has of a native
//! object. Inheritance is composition: a derived struct embeds its base and
//! exposes it through `base` / `base_mut`, so methods bound on a base class
//! can find their receiver inside a derived instance.

use std::any::Any;
use std::marker::PhantomData;

use bindery_sdk::{BoundType, ConversionError, ObjectHandle, StringName, Value, ValueKind};

use crate::error::RegistrationError;
use crate::registry::ClassBuilder;

/// Class flags
pub mod class_flags {
    /// Hidden from the host's class lists
    pub const VIRTUAL: u32 = 1 << 0;
    /// Cannot be instantiated
    pub const ABSTRACT: u32 = 1 << 1;
    /// Visible to scripts
    pub const EXPOSED: u32 = 1 << 2;
}

/// Object-safe view of a native instance
pub trait ClassInstance: Any + Send {
    /// Most-derived class name
    fn class_name(&self) -> StringName;

    /// Upcast for downcasting to the concrete type
    fn as_any(&self) -> &dyn Any;

    /// Upcast for downcasting to the concrete type
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Embedded base instance, `None` at the root
    fn base(&self) -> Option<&dyn ClassInstance> {
        None
    }

    /// Embedded base instance, `None` at the root
    fn base_mut(&mut self) -> Option<&mut dyn ClassInstance> {
        None
    }
}

/// A native class the registry can describe and bind.
pub trait NativeClass: ClassInstance + Sized {
    /// Registered name
    const CLASS_NAME: &'static str;

    /// Parent class name; empty for a root class
    const PARENT_NAME: &'static str;

    /// `class_flags` bits
    const FLAGS: u32 = class_flags::EXPOSED;

    /// Bind methods, properties, signals and constants
    fn bind(builder: &mut ClassBuilder<'_, Self>) -> Result<(), RegistrationError>;

    /// Default-construct an instance, `None` when the class has no constructor
    fn create() -> Option<Self> {
        None
    }
}

/// Find `C` in the instance or its base chain
pub fn downcast_ref<C: 'static>(instance: &dyn ClassInstance) -> Option<&C> {
    if let Some(c) = instance.as_any().downcast_ref::<C>() {
        return Some(c);
    }
    instance.base().and_then(downcast_ref::<C>)
}

/// Find `C` in the instance or its base chain
pub fn downcast_mut<C: 'static>(instance: &mut dyn ClassInstance) -> Option<&mut C> {
    if instance.as_any().is::<C>() {
        return instance.as_any_mut().downcast_mut::<C>();
    }
    instance.base_mut().and_then(downcast_mut::<C>)
}

/// Implement `ClassInstance` for a struct.
///
/// ```ignore
/// class_instance!(Node);               // root class
/// class_instance!(Sprite, base: node); // embeds its base in field `node`
/// ```
#[macro_export]
macro_rules! class_instance {
    ($ty:ty) => {
        impl $crate::instance::ClassInstance for $ty {
            fn class_name(&self) -> $crate::__sdk::StringName {
                $crate::__sdk::StringName::new(<$ty as $crate::instance::NativeClass>::CLASS_NAME)
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    };
    ($ty:ty, base: $field:ident) => {
        impl $crate::instance::ClassInstance for $ty {
            fn class_name(&self) -> $crate::__sdk::StringName {
                $crate::__sdk::StringName::new(<$ty as $crate::instance::NativeClass>::CLASS_NAME)
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            fn base(&self) -> Option<&dyn $crate::instance::ClassInstance> {
                Some(&self.$field)
            }

            fn base_mut(&mut self) -> Option<&mut dyn $crate::instance::ClassInstance> {
                Some(&mut self.$field)
            }
        }
    };
}

// ============================================================================
// Typed handles
// ============================================================================

/// Object handle statically known to refer to a `T`.
///
/// Crosses the boundary as an `Object` value; its reported class is
/// `T::CLASS_NAME`.
pub struct Instance<T> {
    handle: ObjectHandle,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Instance<T> {
    /// Wrap a handle without checking its class
    pub fn from_handle_unchecked(handle: ObjectHandle) -> Self {
        Instance {
            handle,
            _marker: PhantomData,
        }
    }

    /// Underlying handle
    pub fn handle(&self) -> &ObjectHandle {
        &self.handle
    }

    /// Unwrap the handle
    pub fn into_handle(self) -> ObjectHandle {
        self.handle
    }
}

impl<T> Clone for Instance<T> {
    fn clone(&self) -> Self {
        Instance::from_handle_unchecked(self.handle.clone())
    }
}

impl<T> std::fmt::Debug for Instance<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Instance").field(&self.handle).finish()
    }
}

impl<T> PartialEq for Instance<T> {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl<T: NativeClass> BoundType for Instance<T> {
    const KIND: ValueKind = ValueKind::Object;

    fn from_exact(value: &Value) -> Option<Self> {
        value
            .as_object()
            .filter(|h| h.class_name == T::CLASS_NAME)
            .cloned()
            .map(Instance::from_handle_unchecked)
    }

    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        Self::from_exact(value).ok_or_else(|| ConversionError::new(value.kind(), ValueKind::Object))
    }

    fn into_value(self) -> Value {
        Value::from(self.handle)
    }

    fn class_name() -> StringName {
        StringName::new(T::CLASS_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bindery_sdk::ObjectId;

    struct Base {
        hits: i64,
    }

    struct Derived {
        base: Base,
        name: &'static str,
    }

    impl NativeClass for Base {
        const CLASS_NAME: &'static str = "Base";
        const PARENT_NAME: &'static str = "Object";

        fn bind(_builder: &mut ClassBuilder<'_, Self>) -> Result<(), RegistrationError> {
            Ok(())
        }
    }

    impl NativeClass for Derived {
        const CLASS_NAME: &'static str = "Derived";
        const PARENT_NAME: &'static str = "Base";

        fn bind(_builder: &mut ClassBuilder<'_, Self>) -> Result<(), RegistrationError> {
            Ok(())
        }
    }

    class_instance!(Base);
    class_instance!(Derived, base: base);

    #[test]
    fn test_downcast_walks_base_chain() {
        let mut derived = Derived {
            base: Base { hits: 0 },
            name: "d",
        };
        let instance: &mut dyn ClassInstance = &mut derived;
        assert_eq!(instance.class_name(), "Derived");

        if let Some(base) = downcast_mut::<Base>(instance) {
            base.hits += 1;
        }
        assert_eq!(downcast_ref::<Base>(instance).map(|b| b.hits), Some(1));
        assert_eq!(downcast_ref::<Derived>(instance).map(|d| d.name), Some("d"));
        assert!(downcast_ref::<String>(instance).is_none());
    }

    #[test]
    fn test_typed_instance_checks_class() {
        let id = ObjectId::from_raw(3).unwrap();
        let value = Value::from(ObjectHandle::new(id, "Base"));
        assert!(Instance::<Base>::from_value(&value).is_ok());
        assert!(Instance::<Derived>::from_value(&value).is_err());
        assert!(Instance::<Base>::from_value(&Value::Nil).is_err());
        assert_eq!(<Instance<Derived> as BoundType>::class_name(), "Derived");
    }
}
