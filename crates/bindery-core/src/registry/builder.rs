//! Typed registration front end
//!
//! `ClassBuilder<C>` is handed to `NativeClass::bind`. It fixes the class so
//! methods are bound with plain Rust functions and virtual overrides are
//! checked against `Overrides<V>` at compile time.

use std::marker::PhantomData;

use bindery_sdk::{PropertyInfo, ReturnValue, StringName, Value};

use crate::binding::{ArgTuple, ConstMethodFn, MethodBinding, MethodFn, StaticFn};
use crate::error::{DispatchError, RegistrationError};
use crate::instance::NativeClass;
use crate::virtuals::{slot_for, Overrides, VirtualFn, VirtualMethod};

use super::ClassRegistry;

type BuildResult<'b, 'r, C> = Result<&'b mut ClassBuilder<'r, C>, RegistrationError>;

/// Binds members of `C` into a registry
pub struct ClassBuilder<'r, C> {
    registry: &'r mut ClassRegistry,
    class: StringName,
    _class: PhantomData<fn() -> C>,
}

impl<'r, C: NativeClass> ClassBuilder<'r, C> {
    /// Builder for an already registered class
    pub fn new(registry: &'r mut ClassRegistry) -> Result<Self, RegistrationError> {
        if !registry.class_exists(C::CLASS_NAME) {
            return Err(RegistrationError::UnknownClass(StringName::new(C::CLASS_NAME)));
        }
        Ok(ClassBuilder {
            registry,
            class: StringName::new(C::CLASS_NAME),
            _class: PhantomData,
        })
    }

    /// Class being bound
    pub fn class_name(&self) -> &StringName {
        &self.class
    }

    /// Registry being bound into
    pub fn registry(&self) -> &ClassRegistry {
        &*self.registry
    }

    /// Bind a prepared binding
    pub fn bind(&mut self, binding: MethodBinding) -> BuildResult<'_, 'r, C> {
        self.registry.bind_method(self.class.as_str(), binding)?;
        Ok(self)
    }

    /// Bind `f(&mut C, ..)`
    pub fn method<F, Args, R>(&mut self, name: &str, f: F) -> BuildResult<'_, 'r, C>
    where
        F: MethodFn<C, Args, R>,
        Args: ArgTuple,
        R: ReturnValue,
    {
        self.bind(MethodBinding::method::<C, F, Args, R>(name, f))
    }

    /// Bind `f(&C, ..)`
    pub fn const_method<F, Args, R>(&mut self, name: &str, f: F) -> BuildResult<'_, 'r, C>
    where
        F: ConstMethodFn<C, Args, R>,
        Args: ArgTuple,
        R: ReturnValue,
    {
        self.bind(MethodBinding::const_method::<C, F, Args, R>(name, f))
    }

    /// Bind `f(..)` with no receiver
    pub fn static_method<F, Args, R>(&mut self, name: &str, f: F) -> BuildResult<'_, 'r, C>
    where
        F: StaticFn<Args, R>,
        Args: ArgTuple,
        R: ReturnValue,
    {
        self.bind(MethodBinding::static_method::<F, Args, R>(name, f))
    }

    /// Bind a variadic method
    pub fn vararg<F>(&mut self, name: &str, f: F) -> BuildResult<'_, 'r, C>
    where
        F: Fn(&mut C, &[Value]) -> Result<Value, DispatchError> + Send + Sync + 'static,
    {
        self.bind(MethodBinding::vararg::<C, F>(name, f))
    }

    /// Add a property; pass an empty setter for a read-only one
    pub fn property(&mut self, info: PropertyInfo, setter: &str, getter: &str) -> BuildResult<'_, 'r, C> {
        self.registry.add_property(self.class.as_str(), info, setter, getter)?;
        Ok(self)
    }

    /// Add a property whose accessors take `index` first
    pub fn indexed_property(
        &mut self,
        info: PropertyInfo,
        setter: &str,
        getter: &str,
        index: i64,
    ) -> BuildResult<'_, 'r, C> {
        self.registry
            .add_indexed_property(self.class.as_str(), info, setter, getter, index)?;
        Ok(self)
    }

    /// Open a property group
    pub fn group(&mut self, name: &str, prefix: &str) -> BuildResult<'_, 'r, C> {
        self.registry.add_property_group(self.class.as_str(), name, prefix)?;
        Ok(self)
    }

    /// Open a property subgroup
    pub fn subgroup(&mut self, name: &str, prefix: &str) -> BuildResult<'_, 'r, C> {
        self.registry.add_property_subgroup(self.class.as_str(), name, prefix)?;
        Ok(self)
    }

    /// Add a signal
    pub fn signal(&mut self, name: &str, arguments: Vec<PropertyInfo>) -> BuildResult<'_, 'r, C> {
        self.registry.add_signal(self.class.as_str(), name, arguments)?;
        Ok(self)
    }

    /// Bind an integer constant; an empty `enum_name` leaves it loose
    pub fn constant(&mut self, enum_name: &str, name: &str, value: i64) -> BuildResult<'_, 'r, C> {
        self.registry
            .bind_integer_constant(self.class.as_str(), enum_name, name, value, false)?;
        Ok(self)
    }

    /// Bind a bitfield flag
    pub fn bitfield_flag(&mut self, enum_name: &str, name: &str, value: i64) -> BuildResult<'_, 'r, C> {
        self.registry
            .bind_integer_constant(self.class.as_str(), enum_name, name, value, true)?;
        Ok(self)
    }

    /// Declare `V` as overridable on this class
    pub fn declare_virtual<V: VirtualMethod>(&mut self) -> BuildResult<'_, 'r, C> {
        self.registry
            .add_virtual_method(self.class.as_str(), V::method_info())?;
        Ok(self)
    }

    /// Install this class's body for `V`
    pub fn override_virtual<V>(&mut self) -> BuildResult<'_, 'r, C>
    where
        V: VirtualMethod,
        C: Overrides<V>,
    {
        self.registry
            .bind_virtual(self.class.as_str(), V::NAME, slot_for::<C, V>())?;
        Ok(self)
    }

    /// Install a hand-written trampoline
    pub fn bind_virtual_raw(&mut self, name: &str, function: VirtualFn, hash: u32) -> BuildResult<'_, 'r, C> {
        self.registry
            .bind_virtual_raw(self.class.as_str(), name, function, hash)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_instance;
    use bindery_sdk::{NullHost, ValueKind};
    use std::sync::Arc;

    struct Lamp {
        on: bool,
    }

    impl NativeClass for Lamp {
        const CLASS_NAME: &'static str = "Lamp";
        const PARENT_NAME: &'static str = "Object";

        fn bind(builder: &mut ClassBuilder<'_, Self>) -> Result<(), RegistrationError> {
            builder
                .method("toggle", |lamp: &mut Lamp| lamp.on = !lamp.on)?
                .const_method("is_on", |lamp: &Lamp| lamp.on)?
                .static_method("wattage", || 60i64)?
                .group("Light", "light_")?
                .property(PropertyInfo::new(ValueKind::Bool, "light_on"), "", "is_on")?
                .signal("toggled", vec![PropertyInfo::new(ValueKind::Bool, "on")])?
                .bitfield_flag("Mode", "MODE_DIM", 1)?
                .bitfield_flag("Mode", "MODE_WARM", 2)?;
            Ok(())
        }
    }

    class_instance!(Lamp);

    #[test]
    fn test_builder_chains_registration() {
        let mut registry = ClassRegistry::new(Arc::new(NullHost)).unwrap();
        registry.register::<Lamp>().unwrap();

        let mut lamp = Lamp { on: false };
        registry.call(&mut lamp, "toggle", &[]).unwrap();
        assert_eq!(registry.call(&mut lamp, "is_on", &[]), Ok(Value::Bool(true)));
        assert_eq!(registry.call_static("Lamp", "wattage", &[]), Ok(Value::Int(60)));
        assert_eq!(registry.property_list("Lamp").len(), 2);
        assert_eq!(registry.signal_list("Lamp")[0].name, "toggled");
        assert_eq!(
            registry.enum_constants("Lamp", "Mode"),
            vec![StringName::new("MODE_DIM"), StringName::new("MODE_WARM")]
        );
        assert!(matches!(
            registry.set_property(&mut lamp, "light_on", Value::Bool(false)),
            Err(DispatchError::ReadOnlyProperty { .. })
        ));
    }

    #[test]
    fn test_builder_requires_registered_class() {
        let mut registry = ClassRegistry::new(Arc::new(NullHost)).unwrap();
        assert!(matches!(
            ClassBuilder::<Lamp>::new(&mut registry),
            Err(RegistrationError::UnknownClass(_))
        ));
    }
}
