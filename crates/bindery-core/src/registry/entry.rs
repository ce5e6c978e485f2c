//! Per-class metadata records

use std::hash::BuildHasherDefault;

use bindery_sdk::{MethodInfo, PropertyInfo, StringName};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHasher};

use crate::binding::MethodBinding;
use crate::init::InitLevel;
use crate::instance::{class_flags, ClassInstance};
use crate::virtuals::VirtualSlot;

pub(crate) type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// Index of a class in the registry arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub(crate) u32);

impl ClassId {
    /// Arena index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Creates a default instance of a class
pub type Constructor = fn() -> Option<Box<dyn ClassInstance>>;

/// Binds a class's members into the registry
pub type BindFn = fn(&mut super::ClassRegistry) -> Result<(), crate::error::RegistrationError>;

/// Everything needed to register a class
#[derive(Clone)]
pub struct ClassDescriptor {
    /// Class name
    pub name: StringName,
    /// Parent name; empty for a root class
    pub parent: StringName,
    /// `class_flags` bits
    pub flags: u32,
    /// Default constructor
    pub constructor: Option<Constructor>,
    /// Member binding, run once when the class is registered
    pub bind: Option<BindFn>,
}

impl ClassDescriptor {
    /// Exposed class with no constructor and no bind function
    pub fn new(name: impl Into<StringName>, parent: impl Into<StringName>) -> Self {
        ClassDescriptor {
            name: name.into(),
            parent: parent.into(),
            flags: class_flags::EXPOSED,
            constructor: None,
            bind: None,
        }
    }

    /// Set the class flags
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Set the constructor
    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// Set the bind function
    pub fn with_bind(mut self, bind: BindFn) -> Self {
        self.bind = Some(bind);
        self
    }
}

impl std::fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("flags", &self.flags)
            .field("constructor", &self.constructor.is_some())
            .field("bind", &self.bind.is_some())
            .finish()
    }
}

/// A property and its accessors
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyEntry {
    /// Description
    pub info: PropertyInfo,
    /// Setter method, empty when read-only
    pub setter: StringName,
    /// Getter method
    pub getter: StringName,
    /// Index passed first to indexed accessors
    pub index: Option<i64>,
}

/// An integer constant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantEntry {
    /// Value
    pub value: i64,
    /// Member of a bitfield enum
    pub is_bitfield: bool,
}

/// Ordered item of a class's property list
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PropertyListItem {
    Group { name: String, prefix: String },
    Subgroup { name: String, prefix: String },
    Property(StringName),
}

/// A signal and its parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SignalInfo {
    /// Signal name
    pub name: StringName,
    /// Parameters in order
    pub arguments: Vec<PropertyInfo>,
}

/// One registered class
pub struct ClassEntry {
    pub(crate) name: StringName,
    pub(crate) parent_name: StringName,
    pub(crate) parent: Option<ClassId>,
    pub(crate) flags: u32,
    pub(crate) level: InitLevel,
    pub(crate) constructor: Option<Constructor>,
    pub(crate) bind: Option<BindFn>,
    pub(crate) methods: FxHashMap<StringName, MethodBinding>,
    pub(crate) method_order: Vec<StringName>,
    pub(crate) properties: FxHashMap<StringName, PropertyEntry>,
    pub(crate) property_list: Vec<PropertyListItem>,
    pub(crate) signals: FxIndexMap<StringName, SignalInfo>,
    pub(crate) constants: FxIndexMap<StringName, ConstantEntry>,
    /// Constant names grouped by enum; the empty name holds loose constants
    pub(crate) enums: FxIndexMap<StringName, Vec<StringName>>,
    pub(crate) virtual_slots: FxHashMap<StringName, VirtualSlot>,
    pub(crate) virtual_methods: FxIndexMap<StringName, MethodInfo>,
}

impl ClassEntry {
    pub(crate) fn new(desc: &ClassDescriptor, parent: Option<ClassId>, level: InitLevel) -> Self {
        ClassEntry {
            name: desc.name.clone(),
            parent_name: desc.parent.clone(),
            parent,
            flags: desc.flags,
            level,
            constructor: desc.constructor,
            bind: desc.bind,
            methods: FxHashMap::default(),
            method_order: Vec::new(),
            properties: FxHashMap::default(),
            property_list: Vec::new(),
            signals: FxIndexMap::default(),
            constants: FxIndexMap::default(),
            enums: FxIndexMap::default(),
            virtual_slots: FxHashMap::default(),
            virtual_methods: FxIndexMap::default(),
        }
    }

    /// Class name
    pub fn name(&self) -> &StringName {
        &self.name
    }

    /// Parent name (may be a host-only class)
    pub fn parent_name(&self) -> &StringName {
        &self.parent_name
    }

    /// Registered parent, `None` at the root or when the parent is host-only
    pub fn parent(&self) -> Option<ClassId> {
        self.parent
    }

    /// `class_flags` bits
    pub fn flags(&self) -> u32 {
        self.flags
    }

    /// Level the class was registered at
    pub fn level(&self) -> InitLevel {
        self.level
    }

    /// Whether the class cannot be instantiated
    pub fn is_abstract(&self) -> bool {
        self.flags & class_flags::ABSTRACT != 0
    }

    /// Own method, ignoring parents
    pub fn method(&self, name: &str) -> Option<&MethodBinding> {
        self.methods.get(name)
    }

    /// Own property, ignoring parents
    pub fn property(&self, name: &str) -> Option<&PropertyEntry> {
        self.properties.get(name)
    }

    /// Own override slot, ignoring parents
    pub fn virtual_slot(&self, name: &str) -> Option<&VirtualSlot> {
        self.virtual_slots.get(name)
    }

    /// Whether `name` is an override slot or a virtual declaration here
    pub(crate) fn has_virtual(&self, name: &str) -> bool {
        self.virtual_slots.contains_key(name) || self.virtual_methods.contains_key(name)
    }
}

impl std::fmt::Debug for ClassEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassEntry")
            .field("name", &self.name)
            .field("parent", &self.parent_name)
            .field("level", &self.level)
            .field("methods", &self.methods.len())
            .field("properties", &self.properties.len())
            .field("signals", &self.signals.len())
            .field("virtual_slots", &self.virtual_slots.len())
            .finish()
    }
}
