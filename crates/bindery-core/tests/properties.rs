//! Property registration rules and accessor dispatch

mod common;

use bindery_core::{
    class_instance, ClassBuilder, ClassRegistry, DispatchError, NativeClass, RegistrationError,
};
use bindery_sdk::{PropertyInfo, PropertyUsage, StringName, Value, ValueKind};
use common::recording_registry;

struct Player {
    health: i64,
    stats: [i64; 3],
}

impl Player {
    fn get_health(&self) -> i64 {
        self.health
    }

    fn set_health(&mut self, health: i64) {
        self.health = health.clamp(0, 100);
    }

    fn set_health_scaled(&mut self, health: i64, scale: i64) {
        self.health = health * scale;
    }

    fn get_stat(&self, index: i64) -> i64 {
        self.stats.get(index as usize).copied().unwrap_or(0)
    }

    fn set_stat(&mut self, index: i64, value: i64) {
        if let Some(slot) = self.stats.get_mut(index as usize) {
            *slot = value;
        }
    }
}

impl NativeClass for Player {
    const CLASS_NAME: &'static str = "Player";
    const PARENT_NAME: &'static str = "Object";

    fn bind(builder: &mut ClassBuilder<'_, Self>) -> Result<(), RegistrationError> {
        builder
            .const_method("get_health", Player::get_health)?
            .method("set_health", Player::set_health)?
            .method("set_health_scaled", Player::set_health_scaled)?
            .const_method("get_stat", Player::get_stat)?
            .method("set_stat", Player::set_stat)?
            .property(PropertyInfo::new(ValueKind::Int, "health"), "set_health", "get_health")?
            .group("Stats", "stat_")?
            .indexed_property(PropertyInfo::new(ValueKind::Int, "stat_strength"), "set_stat", "get_stat", 0)?
            .indexed_property(PropertyInfo::new(ValueKind::Int, "stat_agility"), "set_stat", "get_stat", 1)?
            .subgroup("Derived", "stat_max_")?
            .indexed_property(PropertyInfo::new(ValueKind::Int, "stat_max_luck"), "", "get_stat", 2)?;
        Ok(())
    }

    fn create() -> Option<Self> {
        Some(Player {
            health: 100,
            stats: [5, 7, 9],
        })
    }
}

class_instance!(Player);

fn registry() -> ClassRegistry {
    let (mut registry, _) = recording_registry();
    registry.register::<Player>().unwrap();
    registry
}

#[test]
fn test_two_argument_setter_is_rejected() {
    let mut registry = registry();
    let result = registry.add_property(
        "Player",
        PropertyInfo::new(ValueKind::Int, "scaled_health"),
        "set_health_scaled",
        "get_health",
    );
    assert_eq!(
        result,
        Err(RegistrationError::AccessorSignature {
            class: StringName::new("Player"),
            property: StringName::new("scaled_health"),
            accessor: StringName::new("set_health_scaled"),
            expected: 1,
            got: 2,
        })
    );
    assert!(registry.lookup_property("Player", "scaled_health").is_none());
}

#[test]
fn test_getter_rules() {
    let mut registry = registry();
    assert!(matches!(
        registry.add_property("Player", PropertyInfo::new(ValueKind::Int, "mana"), "", "get_mana"),
        Err(RegistrationError::MissingAccessor { .. })
    ));
    assert!(matches!(
        registry.add_property("Player", PropertyInfo::new(ValueKind::Int, "stat"), "", "get_stat"),
        Err(RegistrationError::AccessorSignature { expected: 0, got: 1, .. })
    ));
    assert!(matches!(
        registry.add_property("Player", PropertyInfo::new(ValueKind::Int, "health"), "", "get_health"),
        Err(RegistrationError::DuplicateProperty { .. })
    ));
}

#[test]
fn test_get_and_set_through_accessors() {
    let registry = registry();
    let mut player = registry.instantiate("Player").unwrap();

    assert_eq!(registry.get_property(player.as_mut(), "health"), Ok(Value::Int(100)));
    registry
        .set_property(player.as_mut(), "health", Value::Int(250))
        .unwrap();
    assert_eq!(registry.get_property(player.as_mut(), "health"), Ok(Value::Int(100)));
    registry
        .set_property(player.as_mut(), "health", Value::Int(42))
        .unwrap();
    assert_eq!(registry.get_property(player.as_mut(), "health"), Ok(Value::Int(42)));

    assert!(matches!(
        registry.set_property(player.as_mut(), "health", Value::from("lots")),
        Err(DispatchError::InvalidArgument { .. })
    ));
}

#[test]
fn test_indexed_properties() {
    let registry = registry();
    let mut player = registry.instantiate("Player").unwrap();

    assert_eq!(registry.get_property(player.as_mut(), "stat_agility"), Ok(Value::Int(7)));
    registry
        .set_property(player.as_mut(), "stat_strength", Value::Int(11))
        .unwrap();
    assert_eq!(registry.get_property(player.as_mut(), "stat_strength"), Ok(Value::Int(11)));
    assert_eq!(registry.get_property(player.as_mut(), "stat_max_luck"), Ok(Value::Int(9)));
    assert_eq!(
        registry.set_property(player.as_mut(), "stat_max_luck", Value::Int(1)),
        Err(DispatchError::ReadOnlyProperty {
            class: StringName::new("Player"),
            property: StringName::new("stat_max_luck"),
        })
    );
}

#[test]
fn test_property_list_order() {
    let registry = registry();
    let list = registry.property_list("Player");
    let names: Vec<&str> = list.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["health", "Stats", "stat_strength", "stat_agility", "Derived", "stat_max_luck"]
    );
    assert!(list[1].usage.contains(PropertyUsage::GROUP));
    assert!(list[4].usage.contains(PropertyUsage::SUBGROUP));
    assert_eq!(list[4].hint_string, "stat_max_");
}
