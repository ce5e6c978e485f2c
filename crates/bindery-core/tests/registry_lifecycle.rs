//! Class registration, host notification and teardown

mod common;

use std::sync::Arc;

use bindery_core::{
    class_instance, ClassBuilder, ClassDescriptor, ClassRegistry, ExtensionLibrary, InitLevel, NativeClass,
    RegistrationError, RegistryConfig,
};
use bindery_sdk::{NullHost, PropertyInfo, StringName, ValueKind};
use common::recording_registry;

struct Node2D {
    x: f64,
}

impl Node2D {
    fn get_x(&self) -> f64 {
        self.x
    }

    fn set_x(&mut self, x: f64) {
        self.x = x;
    }
}

impl NativeClass for Node2D {
    const CLASS_NAME: &'static str = "Node2D";
    const PARENT_NAME: &'static str = "Object";

    fn bind(builder: &mut ClassBuilder<'_, Self>) -> Result<(), RegistrationError> {
        builder
            .const_method("get_x", Node2D::get_x)?
            .method("set_x", Node2D::set_x)?
            .property(PropertyInfo::new(ValueKind::Float, "x"), "set_x", "get_x")?
            .signal("moved", vec![PropertyInfo::new(ValueKind::Float, "x")])?;
        Ok(())
    }

    fn create() -> Option<Self> {
        Some(Node2D { x: 0.0 })
    }
}

class_instance!(Node2D);

struct Sprite {
    base: Node2D,
    frame: i64,
}

impl NativeClass for Sprite {
    const CLASS_NAME: &'static str = "Sprite";
    const PARENT_NAME: &'static str = "Node2D";

    fn bind(builder: &mut ClassBuilder<'_, Self>) -> Result<(), RegistrationError> {
        builder.const_method("get_frame", |s: &Sprite| s.frame)?;
        Ok(())
    }

    fn create() -> Option<Self> {
        Some(Sprite {
            base: Node2D { x: 0.0 },
            frame: 0,
        })
    }
}

class_instance!(Sprite, base: base);

#[test]
fn test_host_sees_registration_in_order() {
    let (mut registry, host) = recording_registry();
    registry.register::<Node2D>().unwrap();
    registry.register::<Sprite>().unwrap();

    assert_eq!(
        host.events(),
        vec![
            "class Node2D : Object",
            "method Node2D.get_x/0",
            "method Node2D.set_x/1",
            "property Node2D.x [get_x set_x]",
            "signal Node2D.moved/1",
            "class Sprite : Node2D",
            "method Sprite.get_frame/0",
        ]
    );
}

#[test]
fn test_repeated_registration_binds_once() {
    let (mut registry, host) = recording_registry();
    let first = registry.register::<Node2D>().unwrap();
    let events = host.events().len();

    assert_eq!(registry.register::<Node2D>(), Ok(first));
    assert_eq!(host.events().len(), events);
    assert_eq!(registry.method_names("Node2D").len(), 2);
}

#[test]
fn test_strict_policy_rejects_duplicates() {
    let mut registry = ClassRegistry::with_config(Arc::new(NullHost), RegistryConfig::strict()).unwrap();
    registry.register::<Node2D>().unwrap();
    assert_eq!(
        registry.register::<Node2D>(),
        Err(RegistrationError::DuplicateClass(StringName::new("Node2D")))
    );
}

#[test]
fn test_parent_must_exist() {
    let (mut registry, _) = recording_registry();
    assert!(matches!(
        registry.register::<Sprite>(),
        Err(RegistrationError::MissingParent { .. })
    ));

    registry
        .register_class(ClassDescriptor::new("Resource", "RefCounted"))
        .unwrap();
    assert_eq!(registry.parent_of("Resource"), Some(StringName::new("RefCounted")));
    assert!(registry.is_parent_class("Resource", "RefCounted"));
    assert!(!registry.is_parent_class("Resource", "Node2D"));
}

#[test]
fn test_inherited_bind_function_is_not_rerun() {
    fn bind_base(registry: &mut ClassRegistry) -> Result<(), RegistrationError> {
        registry.bind_method(
            "Base",
            bindery_core::MethodBinding::static_method("version", || 3i64),
        )
    }

    let (mut registry, _) = recording_registry();
    registry
        .register_class(ClassDescriptor::new("Base", "Object").with_bind(bind_base))
        .unwrap();
    registry
        .register_class(ClassDescriptor::new("Child", "Base").with_bind(bind_base))
        .unwrap();

    assert_eq!(registry.method_names("Base").len(), 1);
    assert!(registry.method_names("Child").is_empty());
    assert!(registry.lookup_method("Child", "version").is_some());
}

#[test]
fn test_levels_tear_down_in_reverse() {
    let (mut registry, host) = recording_registry();
    let mut library = ExtensionLibrary::new()
        .with_minimum_level(InitLevel::Scene)
        .on_initialize(|registry, level| {
            match level {
                InitLevel::Scene => {
                    registry.register::<Node2D>()?;
                    registry.register::<Sprite>()?;
                }
                InitLevel::Editor => {
                    registry.register_class(ClassDescriptor::new("SpriteEditor", "Sprite"))?;
                }
                _ => {}
            }
            Ok(())
        });

    library.initialize_all(&mut registry).unwrap();
    assert_eq!(registry.class_level("SpriteEditor"), Some(InitLevel::Editor));
    assert_eq!(registry.class_level("Node2D"), Some(InitLevel::Scene));

    library.deinitialize_all(&mut registry);
    let teardown: Vec<String> = host
        .events()
        .into_iter()
        .filter(|e| e.starts_with("unclass"))
        .collect();
    assert_eq!(
        teardown,
        vec!["unclass SpriteEditor", "unclass Sprite", "unclass Node2D"]
    );
    assert!(registry.class_names().is_empty());
}

#[test]
fn test_instantiate_and_downcast() {
    let (mut registry, _) = recording_registry();
    registry.register::<Node2D>().unwrap();
    registry.register::<Sprite>().unwrap();

    let mut sprite = registry.instantiate("Sprite").unwrap();
    assert_eq!(sprite.class_name(), "Sprite");
    registry
        .call(sprite.as_mut(), "set_x", &[bindery_sdk::Value::Float(2.5)])
        .unwrap();
    let node = bindery_core::downcast_ref::<Node2D>(sprite.as_ref()).unwrap();
    assert_eq!(node.x, 2.5);
}
