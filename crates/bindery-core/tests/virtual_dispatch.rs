//! Override resolution through the parent chain

mod common;

use std::mem::MaybeUninit;

use bindery_core::{
    class_instance, ClassBuilder, ClassDescriptor, ClassInstance, ClassRegistry, MethodBinding, NativeClass, Overrides,
    RegistrationError, VirtualFn, VirtualMethod,
};
use bindery_core::virtuals::slot_for;
use bindery_sdk::{GString, NativePtrMut, StringName};
use common::recording_registry;

struct Speak;

impl VirtualMethod for Speak {
    const NAME: &'static str = "speak";
    const IS_CONST: bool = false;
    type Args = ();
    type Ret = GString;
}

struct Base;

impl NativeClass for Base {
    const CLASS_NAME: &'static str = "Base";
    const PARENT_NAME: &'static str = "Object";

    fn bind(builder: &mut ClassBuilder<'_, Self>) -> Result<(), RegistrationError> {
        builder.declare_virtual::<Speak>()?.override_virtual::<Speak>()?;
        Ok(())
    }
}

impl Overrides<Speak> for Base {
    fn call_virtual(&mut self, _: ()) -> GString {
        GString::from("base")
    }
}

class_instance!(Base);

struct Middle {
    base: Base,
}

impl NativeClass for Middle {
    const CLASS_NAME: &'static str = "Middle";
    const PARENT_NAME: &'static str = "Base";

    fn bind(_builder: &mut ClassBuilder<'_, Self>) -> Result<(), RegistrationError> {
        Ok(())
    }
}

class_instance!(Middle, base: base);

struct Derived {
    base: Middle,
}

impl NativeClass for Derived {
    const CLASS_NAME: &'static str = "Derived";
    const PARENT_NAME: &'static str = "Middle";

    fn bind(builder: &mut ClassBuilder<'_, Self>) -> Result<(), RegistrationError> {
        builder.override_virtual::<Speak>()?;
        Ok(())
    }
}

impl Overrides<Speak> for Derived {
    fn call_virtual(&mut self, _: ()) -> GString {
        GString::from("derived")
    }
}

class_instance!(Derived, base: base);

fn registry() -> ClassRegistry {
    let (mut registry, _) = recording_registry();
    registry.register::<Base>().unwrap();
    registry.register::<Middle>().unwrap();
    registry.register::<Derived>().unwrap();
    registry
}

fn speak(function: VirtualFn, instance: &mut dyn ClassInstance) -> String {
    let mut ret = MaybeUninit::<GString>::uninit();
    unsafe {
        function(instance, &[], ret.as_mut_ptr() as NativePtrMut).unwrap();
        ret.assume_init().to_string()
    }
}

#[test]
fn test_each_class_resolves_its_own_override() {
    let registry = registry();
    let hash = Speak::hash();

    let derived = registry.resolve_virtual("Derived", "speak", hash).unwrap();
    let base = registry.resolve_virtual("Base", "speak", hash).unwrap();

    let mut instance = Derived {
        base: Middle { base: Base },
    };
    assert_eq!(speak(derived, &mut instance), "derived");
    assert_eq!(speak(base, &mut instance), "base");
    assert_eq!(speak(base, &mut Base), "base");
}

#[test]
fn test_class_without_slot_inherits() {
    let registry = registry();
    assert!(registry.class("Middle").unwrap().virtual_slot("speak").is_none());

    let resolved = registry.resolve_virtual("Middle", "speak", Speak::hash()).unwrap();
    let mut middle = Middle { base: Base };
    assert_eq!(speak(resolved, &mut middle), "base");
}

#[test]
fn test_hash_mismatch_is_not_overridden() {
    let registry = registry();
    let wrong = Speak::hash().wrapping_add(1);
    assert!(registry.resolve_virtual("Derived", "speak", wrong).is_none());
    assert!(registry.resolve_virtual("Base", "speak", wrong).is_none());
    assert!(registry.resolve_virtual("Base", "listen", Speak::hash()).is_none());
    assert!(registry.resolve_virtual("Nobody", "speak", Speak::hash()).is_none());
}

#[test]
fn test_mismatched_slot_falls_back_to_parent() {
    let mut registry = registry();
    registry
        .register_class(ClassDescriptor::new("Stale", "Derived"))
        .unwrap();
    let stale = slot_for::<Derived, Speak>();
    registry
        .bind_virtual_raw("Stale", "speak", stale.function, Speak::hash().wrapping_add(1))
        .unwrap();

    // Stale's own slot is skipped; Derived's matching slot is the next one up
    let resolved = registry.resolve_virtual("Stale", "speak", Speak::hash()).unwrap();
    let mut instance = Derived {
        base: Middle { base: Base },
    };
    assert_eq!(speak(resolved, &mut instance), "derived");
}

#[test]
fn test_matching_base_slot_behind_mismatched_override() {
    let (mut registry, _) = recording_registry();
    registry.register::<Base>().unwrap();
    registry
        .register_class(ClassDescriptor::new("Legacy", "Base"))
        .unwrap();
    let base = slot_for::<Base, Speak>();
    registry
        .bind_virtual_raw("Legacy", "speak", base.function, 222)
        .unwrap();

    assert!(registry.resolve_virtual("Legacy", "speak", 222).is_some());
    let resolved = registry.resolve_virtual("Legacy", "speak", Speak::hash()).unwrap();
    assert_eq!(speak(resolved, &mut Base), "base");
    assert!(registry.resolve_virtual("Legacy", "speak", 111).is_none());
}

#[test]
fn test_declaration_reaches_host() {
    let (mut registry, host) = recording_registry();
    registry.register::<Base>().unwrap();
    assert!(host.events().contains(&"virtual Base.speak".to_string()));

    let declared = registry.virtual_methods("Base");
    assert_eq!(declared.len(), 1);
    assert_eq!(declared[0].hash, Speak::hash());
}

#[test]
fn test_virtual_and_method_names_collide() {
    let mut classes = registry();
    let result = classes.bind_method(
        "Base",
        MethodBinding::method("speak", |_: &mut Base| GString::from("plain")),
    );
    assert_eq!(
        result,
        Err(RegistrationError::VirtualCollision {
            class: StringName::new("Base"),
            name: StringName::new("speak"),
        })
    );

    classes
        .bind_method("Middle", MethodBinding::static_method("shout", || 1i64))
        .unwrap();
    let slot = slot_for::<Base, Speak>();
    assert!(matches!(
        classes.bind_virtual_raw("Middle", "shout", slot.function, slot.hash),
        Err(RegistrationError::VirtualCollision { .. })
    ));
}
