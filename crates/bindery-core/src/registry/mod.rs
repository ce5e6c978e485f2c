//! Class registry
//!
//! `ClassRegistry` is the process-lifetime class database. Classes live in an
//! arena indexed by `ClassId`; each entry links to its parent by id, resolved
//! once at registration. Registration needs `&mut self` and happens during
//! initialization; lookup and dispatch take `&self` and are safe to run from
//! any thread afterwards.

mod builder;
mod entry;

use std::sync::Arc;

use bindery_sdk::{
    method_flags, ClassDescription, HostInterface, MethodInfo, NativePtr, NativePtrMut, ObjectId,
    PropertyHint, PropertyInfo, PropertyUsage, StringName, Value, ValueKind,
};
use rustc_hash::FxHashMap;
use tracing::{debug, error, trace, warn};

pub use builder::ClassBuilder;
pub use entry::{
    BindFn, ClassDescriptor, ClassEntry, ClassId, ConstantEntry, Constructor, PropertyEntry,
    SignalInfo,
};

pub(crate) use entry::FxIndexMap;
use entry::PropertyListItem;

use crate::binding::MethodBinding;
use crate::config::{DuplicateClassPolicy, RegistryConfig};
use crate::error::{DispatchError, DispatchResult, RegistrationError, RegistrationResult};
use crate::init::InitLevel;
use crate::instance::{class_flags, ClassInstance, NativeClass};
use crate::object_db::ObjectDb;
use crate::virtuals::{VirtualFn, VirtualSlot};

/// The class database
pub struct ClassRegistry {
    host: Arc<dyn HostInterface>,
    config: RegistryConfig,
    /// Arena; torn-down classes leave a hole so ids stay stable
    classes: Vec<Option<ClassEntry>>,
    by_name: FxHashMap<StringName, ClassId>,
    /// Live classes in registration order
    order: Vec<ClassId>,
    current_level: InitLevel,
}

impl std::fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassRegistry")
            .field("classes", &self.order.len())
            .field("current_level", &self.current_level)
            .field("config", &self.config)
            .finish()
    }
}

/// Walks a class and its registered parents, most-derived first
pub struct Ancestors<'a> {
    registry: &'a ClassRegistry,
    next: Option<ClassId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a ClassEntry;

    fn next(&mut self) -> Option<&'a ClassEntry> {
        let entry = self.registry.entry(self.next?)?;
        self.next = entry.parent;
        Some(entry)
    }
}

fn construct<T: NativeClass>() -> Option<Box<dyn ClassInstance>> {
    T::create().map(|instance| Box::new(instance) as Box<dyn ClassInstance>)
}

fn bind_class<T: NativeClass>(registry: &mut ClassRegistry) -> RegistrationResult<()> {
    let mut builder = ClassBuilder::<T>::new(registry)?;
    T::bind(&mut builder)
}

impl ClassRegistry {
    /// Create a registry with the default configuration
    pub fn new(host: Arc<dyn HostInterface>) -> RegistrationResult<Self> {
        Self::with_config(host, RegistryConfig::default())
    }

    /// Create a registry, negotiating the host's ABI version
    pub fn with_config(host: Arc<dyn HostInterface>, config: RegistryConfig) -> RegistrationResult<Self> {
        let host_abi = host.abi_version();
        if !host_abi.is_compatible(&config.required_abi) {
            error!(host = %host_abi, required = %config.required_abi, "incompatible host ABI");
            return Err(RegistrationError::AbiMismatch {
                host: host_abi,
                required: config.required_abi,
            });
        }
        debug!(host = %host_abi, "class registry created");
        Ok(ClassRegistry {
            host,
            config,
            classes: Vec::new(),
            by_name: FxHashMap::default(),
            order: Vec::new(),
            current_level: InitLevel::Core,
        })
    }

    /// Registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Host this registry reports to
    pub fn host(&self) -> &Arc<dyn HostInterface> {
        &self.host
    }

    /// Level newly registered classes belong to
    pub fn current_level(&self) -> InitLevel {
        self.current_level
    }

    /// Set the level newly registered classes belong to
    pub fn set_current_level(&mut self, level: InitLevel) {
        self.current_level = level;
    }

    // ========================================================================
    // Arena access
    // ========================================================================

    fn entry(&self, id: ClassId) -> Option<&ClassEntry> {
        self.classes.get(id.index()).and_then(Option::as_ref)
    }

    fn id_of(&self, class: &str) -> Option<ClassId> {
        self.by_name.get(class).copied()
    }

    fn entry_mut(&mut self, class: &str) -> RegistrationResult<&mut ClassEntry> {
        let id = self
            .id_of(class)
            .ok_or_else(|| RegistrationError::UnknownClass(StringName::new(class)))?;
        self.classes
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or_else(|| RegistrationError::UnknownClass(StringName::new(class)))
    }

    fn notify(&self, f: impl FnOnce(&dyn HostInterface)) {
        if self.config.notify_host {
            f(self.host.as_ref());
        }
    }

    /// Entry of a registered class
    pub fn class(&self, class: &str) -> Option<&ClassEntry> {
        self.id_of(class).and_then(|id| self.entry(id))
    }

    /// Entry by arena id
    pub fn class_by_id(&self, id: ClassId) -> Option<&ClassEntry> {
        self.entry(id)
    }

    /// `class` and its registered parents, most-derived first
    pub fn ancestors(&self, class: &str) -> Ancestors<'_> {
        Ancestors {
            registry: self,
            next: self.id_of(class),
        }
    }

    // ========================================================================
    // Class registration
    // ========================================================================

    /// Register a class.
    ///
    /// The parent must be registered already or known to the host. The bind
    /// function runs once, when the entry is created; a bind function shared
    /// with the parent is not run again. If it fails the class is removed.
    pub fn register_class(&mut self, desc: ClassDescriptor) -> RegistrationResult<ClassId> {
        if let Some(id) = self.id_of(desc.name.as_str()) {
            return match self.config.duplicate_class_policy {
                DuplicateClassPolicy::Ignore => {
                    warn!(class = %desc.name, "class already registered; ignoring");
                    Ok(id)
                }
                DuplicateClassPolicy::Error => Err(RegistrationError::DuplicateClass(desc.name)),
            };
        }

        let parent = if desc.parent.is_empty() {
            None
        } else if let Some(id) = self.id_of(desc.parent.as_str()) {
            Some(id)
        } else if self.host.has_class(&desc.parent) {
            None
        } else {
            return Err(RegistrationError::MissingParent {
                class: desc.name,
                parent: desc.parent,
            });
        };

        let id = ClassId(self.classes.len() as u32);
        self.classes
            .push(Some(ClassEntry::new(&desc, parent, self.current_level)));
        self.by_name.insert(desc.name.clone(), id);
        self.order.push(id);
        debug!(class = %desc.name, parent = %desc.parent, level = ?self.current_level, "registered class");

        self.notify(|host| {
            host.register_class(&ClassDescription {
                name: desc.name.clone(),
                parent: desc.parent.clone(),
                is_virtual: desc.flags & class_flags::VIRTUAL != 0,
                is_abstract: desc.flags & class_flags::ABSTRACT != 0,
                is_exposed: desc.flags & class_flags::EXPOSED != 0,
            })
        });

        if let Some(bind) = desc.bind {
            let inherited = parent
                .and_then(|p| self.entry(p))
                .and_then(|p| p.bind)
                .is_some_and(|p| p as usize == bind as usize);
            if !inherited {
                if let Err(err) = bind(self) {
                    warn!(class = %desc.name, %err, "bind failed; class removed");
                    self.remove_class(id);
                    return Err(err);
                }
            }
        }
        Ok(id)
    }

    /// Register a native class, deriving the descriptor from the trait
    pub fn register<T: NativeClass>(&mut self) -> RegistrationResult<ClassId> {
        self.register_class(ClassDescriptor {
            name: StringName::new(T::CLASS_NAME),
            parent: StringName::new(T::PARENT_NAME),
            flags: T::FLAGS,
            constructor: Some(construct::<T>),
            bind: Some(bind_class::<T>),
        })
    }

    fn remove_class(&mut self, id: ClassId) {
        let Some(entry) = self.classes.get_mut(id.index()).and_then(Option::take) else {
            return;
        };
        self.by_name.remove(entry.name.as_str());
        self.order.retain(|&live| live != id);
        debug!(class = %entry.name, "unregistered class");
        self.notify(|host| host.unregister_class(&entry.name));
    }

    /// Tear down every class registered at `level`, newest first
    pub fn unregister_level(&mut self, level: InitLevel) {
        let doomed: Vec<ClassId> = self
            .order
            .iter()
            .rev()
            .copied()
            .filter(|&id| self.entry(id).is_some_and(|e| e.level == level))
            .collect();
        for id in doomed {
            self.remove_class(id);
        }
    }

    // ========================================================================
    // Member registration
    // ========================================================================

    /// Bind a method on `class`.
    ///
    /// Fails if the name is already a method, an override slot or a virtual
    /// declaration of this class. Parents' names may be shadowed.
    pub fn bind_method(&mut self, class: &str, mut binding: MethodBinding) -> RegistrationResult<()> {
        binding.validate_defaults(self.config.validate_default_kinds)?;
        if !self.class_exists(class) {
            return Err(RegistrationError::UnknownClass(StringName::new(class)));
        }
        if let Some(receiver) = binding.receiver() {
            if !self.is_parent_class(class, receiver.as_str()) {
                return Err(RegistrationError::ClassMismatch {
                    expected: StringName::new(class),
                    got: receiver.clone(),
                });
            }
        }

        let notify = self.config.notify_host;
        let entry = self.entry_mut(class)?;
        let name = binding.name().clone();
        if entry.methods.contains_key(&name) {
            return Err(RegistrationError::DuplicateMethod {
                class: entry.name.clone(),
                name,
            });
        }
        if entry.has_virtual(name.as_str()) {
            return Err(RegistrationError::VirtualCollision {
                class: entry.name.clone(),
                name,
            });
        }

        trace!(class = %entry.name, method = %name, args = binding.argument_count(), "bound method");
        let info = notify.then(|| binding.method_info());
        let class_name = entry.name.clone();
        entry.method_order.push(name.clone());
        entry.methods.insert(name, binding);

        if let Some(info) = info {
            self.host.register_method(&class_name, &info);
        }
        Ok(())
    }

    /// Add a property backed by a getter and an optional setter.
    ///
    /// The getter must take no arguments and the setter exactly one. An empty
    /// setter makes the property read-only. Accessors may be inherited.
    pub fn add_property(
        &mut self,
        class: &str,
        info: PropertyInfo,
        setter: &str,
        getter: &str,
    ) -> RegistrationResult<()> {
        self.add_property_entry(class, info, setter, getter, None)
    }

    /// Add a property whose accessors take `index` as their first argument
    pub fn add_indexed_property(
        &mut self,
        class: &str,
        info: PropertyInfo,
        setter: &str,
        getter: &str,
        index: i64,
    ) -> RegistrationResult<()> {
        self.add_property_entry(class, info, setter, getter, Some(index))
    }

    fn add_property_entry(
        &mut self,
        class: &str,
        info: PropertyInfo,
        setter: &str,
        getter: &str,
        index: Option<i64>,
    ) -> RegistrationResult<()> {
        let class_name = self
            .class(class)
            .map(|e| e.name.clone())
            .ok_or_else(|| RegistrationError::UnknownClass(StringName::new(class)))?;
        let property = info.name.clone();
        if self.class(class).is_some_and(|e| e.properties.contains_key(&property)) {
            return Err(RegistrationError::DuplicateProperty {
                class: class_name,
                name: property,
            });
        }

        let extra = index.is_some() as usize;
        let getter_binding = self.lookup_method(class, getter).ok_or_else(|| {
            RegistrationError::MissingAccessor {
                class: class_name.clone(),
                property: property.clone(),
                accessor: StringName::new(getter),
            }
        })?;
        if getter_binding.argument_count() != extra {
            return Err(RegistrationError::AccessorSignature {
                class: class_name,
                property,
                accessor: StringName::new(getter),
                expected: extra,
                got: getter_binding.argument_count(),
            });
        }
        if !setter.is_empty() {
            let setter_binding = self.lookup_method(class, setter).ok_or_else(|| {
                RegistrationError::MissingAccessor {
                    class: class_name.clone(),
                    property: property.clone(),
                    accessor: StringName::new(setter),
                }
            })?;
            if setter_binding.argument_count() != extra + 1 {
                return Err(RegistrationError::AccessorSignature {
                    class: class_name,
                    property,
                    accessor: StringName::new(setter),
                    expected: extra + 1,
                    got: setter_binding.argument_count(),
                });
            }
        }

        let setter = StringName::new(setter);
        let getter = StringName::new(getter);
        trace!(class = %class_name, %property, %getter, %setter, "added property");
        self.notify(|host| host.register_property(&class_name, &info, &setter, &getter));

        let entry = self.entry_mut(class)?;
        entry.property_list.push(PropertyListItem::Property(property.clone()));
        entry.properties.insert(
            property,
            PropertyEntry {
                info,
                setter,
                getter,
                index,
            },
        );
        Ok(())
    }

    /// Open a property group; later properties whose names start with
    /// `prefix` belong to it
    pub fn add_property_group(&mut self, class: &str, name: &str, prefix: &str) -> RegistrationResult<()> {
        self.add_group_item(class, name, prefix, false)
    }

    /// Open a property subgroup within the current group
    pub fn add_property_subgroup(&mut self, class: &str, name: &str, prefix: &str) -> RegistrationResult<()> {
        self.add_group_item(class, name, prefix, true)
    }

    fn add_group_item(&mut self, class: &str, name: &str, prefix: &str, subgroup: bool) -> RegistrationResult<()> {
        let entry = self.entry_mut(class)?;
        let (name, prefix) = (name.to_string(), prefix.to_string());
        let class_name = entry.name.clone();
        entry.property_list.push(if subgroup {
            PropertyListItem::Subgroup {
                name: name.clone(),
                prefix: prefix.clone(),
            }
        } else {
            PropertyListItem::Group {
                name: name.clone(),
                prefix: prefix.clone(),
            }
        });
        self.notify(|host| host.register_property_group(&class_name, &name, &prefix, subgroup));
        Ok(())
    }

    /// Add a signal
    pub fn add_signal(
        &mut self,
        class: &str,
        name: impl Into<StringName>,
        arguments: Vec<PropertyInfo>,
    ) -> RegistrationResult<()> {
        let name = name.into();
        let entry = self.entry_mut(class)?;
        if entry.signals.contains_key(&name) {
            return Err(RegistrationError::DuplicateSignal {
                class: entry.name.clone(),
                name,
            });
        }
        let class_name = entry.name.clone();
        trace!(class = %class_name, signal = %name, args = arguments.len(), "added signal");
        entry.signals.insert(
            name.clone(),
            SignalInfo {
                name: name.clone(),
                arguments,
            },
        );
        if let Some(signal) = self.class(class).and_then(|e| e.signals.get(&name)) {
            self.notify(|host| host.register_signal(&class_name, &name, &signal.arguments));
        }
        Ok(())
    }

    /// Bind an integer constant, optionally as a member of an enum
    pub fn bind_integer_constant(
        &mut self,
        class: &str,
        enum_name: impl Into<StringName>,
        name: impl Into<StringName>,
        value: i64,
        is_bitfield: bool,
    ) -> RegistrationResult<()> {
        let (enum_name, name) = (enum_name.into(), name.into());
        let entry = self.entry_mut(class)?;
        if entry.constants.contains_key(&name) {
            return Err(RegistrationError::DuplicateConstant {
                class: entry.name.clone(),
                name,
            });
        }
        let class_name = entry.name.clone();
        entry.constants.insert(name.clone(), ConstantEntry { value, is_bitfield });
        entry.enums.entry(enum_name.clone()).or_default().push(name.clone());
        trace!(class = %class_name, constant = %name, value, "bound constant");
        self.notify(|host| host.register_integer_constant(&class_name, &enum_name, &name, value, is_bitfield));
        Ok(())
    }

    /// Declare a method the host may override.
    ///
    /// Collides with a regular method of the same name in this class.
    pub fn add_virtual_method(&mut self, class: &str, mut info: MethodInfo) -> RegistrationResult<()> {
        info.flags |= method_flags::VIRTUAL;
        let entry = self.entry_mut(class)?;
        let name = info.name.clone();
        if entry.virtual_methods.contains_key(&name) {
            return Err(RegistrationError::DuplicateVirtual {
                class: entry.name.clone(),
                name,
            });
        }
        if entry.methods.contains_key(&name) {
            return Err(RegistrationError::VirtualCollision {
                class: entry.name.clone(),
                name,
            });
        }
        let class_name = entry.name.clone();
        trace!(class = %class_name, method = %name, hash = info.hash, "declared virtual method");
        entry.virtual_methods.insert(name.clone(), info);
        if let Some(info) = self.class(class).and_then(|e| e.virtual_methods.get(&name)) {
            self.notify(|host| host.register_virtual_method(&class_name, info));
        }
        Ok(())
    }

    /// Install an override slot in `class`'s own entry
    pub fn bind_virtual(&mut self, class: &str, name: impl Into<StringName>, slot: VirtualSlot) -> RegistrationResult<()> {
        let name = name.into();
        let entry = self.entry_mut(class)?;
        if entry.methods.contains_key(&name) {
            return Err(RegistrationError::VirtualCollision {
                class: entry.name.clone(),
                name,
            });
        }
        if entry.virtual_slots.contains_key(&name) {
            return Err(RegistrationError::DuplicateVirtual {
                class: entry.name.clone(),
                name,
            });
        }
        trace!(class = %entry.name, method = %name, hash = slot.hash, "bound virtual override");
        entry.virtual_slots.insert(name, slot);
        Ok(())
    }

    /// Install a hand-made override slot
    pub fn bind_virtual_raw(
        &mut self,
        class: &str,
        name: impl Into<StringName>,
        function: VirtualFn,
        hash: u32,
    ) -> RegistrationResult<()> {
        self.bind_virtual(class, name, VirtualSlot { function, hash })
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Whether `class` is registered
    pub fn class_exists(&self, class: &str) -> bool {
        self.by_name.contains_key(class)
    }

    /// Level `class` was registered at
    pub fn class_level(&self, class: &str) -> Option<InitLevel> {
        self.class(class).map(|e| e.level)
    }

    /// Parent name of `class`
    pub fn parent_of(&self, class: &str) -> Option<StringName> {
        self.class(class)
            .map(|e| e.parent_name.clone())
            .filter(|p| !p.is_empty())
    }

    /// Whether `ancestor` is `class` or one of its parents (host-only
    /// parents included)
    pub fn is_parent_class(&self, class: &str, ancestor: &str) -> bool {
        self.ancestors(class)
            .any(|e| e.name == ancestor || e.parent_name == ancestor)
    }

    /// Registered class names in registration order
    pub fn class_names(&self) -> Vec<StringName> {
        self.order
            .iter()
            .filter_map(|&id| self.entry(id))
            .map(|e| e.name.clone())
            .collect()
    }

    /// Method binding on `class` or its nearest parent that binds it
    pub fn lookup_method(&self, class: &str, method: &str) -> Option<&MethodBinding> {
        self.ancestors(class).find_map(|e| e.methods.get(method))
    }

    /// Property on `class` or its nearest parent that has it
    pub fn lookup_property(&self, class: &str, property: &str) -> Option<&PropertyEntry> {
        self.ancestors(class).find_map(|e| e.properties.get(property))
    }

    /// Signal on `class` or its parents
    pub fn lookup_signal(&self, class: &str, signal: &str) -> Option<&SignalInfo> {
        self.ancestors(class).find_map(|e| e.signals.get(signal))
    }

    /// Integer constant on `class` or its parents
    pub fn integer_constant(&self, class: &str, name: &str) -> Option<i64> {
        self.ancestors(class)
            .find_map(|e| e.constants.get(name))
            .map(|c| c.value)
    }

    /// Constant names of one enum of `class`, in declaration order
    pub fn enum_constants(&self, class: &str, enum_name: &str) -> Vec<StringName> {
        self.class(class)
            .and_then(|e| e.enums.get(enum_name))
            .cloned()
            .unwrap_or_default()
    }

    /// Own method names of `class`, in bind order
    pub fn method_names(&self, class: &str) -> Vec<StringName> {
        self.class(class)
            .map(|e| e.method_order.clone())
            .unwrap_or_default()
    }

    /// Own properties of `class` with group and subgroup markers, in
    /// declaration order
    pub fn property_list(&self, class: &str) -> Vec<PropertyInfo> {
        let Some(entry) = self.class(class) else {
            return Vec::new();
        };
        entry
            .property_list
            .iter()
            .filter_map(|item| match item {
                PropertyListItem::Group { name, prefix } => Some(
                    PropertyInfo::new(ValueKind::Nil, name.as_str())
                        .with_hint(PropertyHint::None, prefix.as_str())
                        .with_usage(PropertyUsage::GROUP),
                ),
                PropertyListItem::Subgroup { name, prefix } => Some(
                    PropertyInfo::new(ValueKind::Nil, name.as_str())
                        .with_hint(PropertyHint::None, prefix.as_str())
                        .with_usage(PropertyUsage::SUBGROUP),
                ),
                PropertyListItem::Property(name) => entry.properties.get(name).map(|p| p.info.clone()),
            })
            .collect()
    }

    /// Own signals of `class`, in declaration order
    pub fn signal_list(&self, class: &str) -> Vec<SignalInfo> {
        self.class(class)
            .map(|e| e.signals.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Own virtual declarations of `class`
    pub fn virtual_methods(&self, class: &str) -> Vec<MethodInfo> {
        self.class(class)
            .map(|e| e.virtual_methods.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Find the override of `name` that applies to `class`.
    ///
    /// Walks from `class` towards the root and returns the first slot whose
    /// hash matches `expected_hash`. A slot with a different hash is skipped
    /// and the walk continues with the parent.
    pub fn resolve_virtual(&self, class: &str, name: &str, expected_hash: u32) -> Option<VirtualFn> {
        for entry in self.ancestors(class) {
            let Some(slot) = entry.virtual_slots.get(name) else {
                continue;
            };
            if slot.hash == expected_hash {
                return Some(slot.function);
            }
            warn!(
                class = %entry.name,
                method = name,
                expected = expected_hash,
                found = slot.hash,
                "virtual signature hash mismatch; skipping slot"
            );
        }
        None
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    fn method_for(&self, class: &StringName, method: &str) -> DispatchResult<&MethodBinding> {
        if !self.class_exists(class.as_str()) {
            return Err(DispatchError::UnknownClass(class.clone()));
        }
        self.lookup_method(class.as_str(), method)
            .ok_or_else(|| DispatchError::InvalidMethod {
                class: class.clone(),
                method: StringName::new(method),
            })
    }

    /// Call a method on an instance by name
    pub fn call(
        &self,
        instance: &mut dyn ClassInstance,
        method: &str,
        args: &[Value],
    ) -> DispatchResult<Value> {
        let class = instance.class_name();
        self.method_for(&class, method)?.call(Some(instance), args)
    }

    /// Call a method without an instance
    pub fn call_static(&self, class: &str, method: &str, args: &[Value]) -> DispatchResult<Value> {
        self.method_for(&StringName::new(class), method)?.call(None, args)
    }

    /// Direct call on an instance by name.
    ///
    /// # Safety
    /// Same contract as [`MethodBinding::ptrcall`].
    pub unsafe fn ptrcall(
        &self,
        instance: &mut dyn ClassInstance,
        method: &str,
        args: &[NativePtr],
        ret: NativePtrMut,
    ) -> DispatchResult<()> {
        let class = instance.class_name();
        self.method_for(&class, method)?.ptrcall(Some(instance), args, ret)
    }

    /// Call a method on a live object by id
    pub fn call_object(
        &self,
        objects: &ObjectDb,
        id: ObjectId,
        method: &str,
        args: &[Value],
    ) -> DispatchResult<Value> {
        objects.with_instance(id, |instance| self.call(instance, method, args))?
    }

    /// Read a property through its getter
    pub fn get_property(&self, instance: &mut dyn ClassInstance, property: &str) -> DispatchResult<Value> {
        let class = instance.class_name();
        let entry = self.property_for(&class, property)?;
        let getter = self.method_for(&class, entry.getter.as_str())?;
        match entry.index {
            Some(index) => getter.call(Some(instance), &[Value::Int(index)]),
            None => getter.call(Some(instance), &[]),
        }
    }

    /// Write a property through its setter
    pub fn set_property(
        &self,
        instance: &mut dyn ClassInstance,
        property: &str,
        value: Value,
    ) -> DispatchResult<()> {
        let class = instance.class_name();
        let entry = self.property_for(&class, property)?;
        if entry.setter.is_empty() {
            return Err(DispatchError::ReadOnlyProperty {
                class,
                property: StringName::new(property),
            });
        }
        let setter = self.method_for(&class, entry.setter.as_str())?;
        match entry.index {
            Some(index) => setter.call(Some(instance), &[Value::Int(index), value]),
            None => setter.call(Some(instance), &[value]),
        }?;
        Ok(())
    }

    fn property_for(&self, class: &StringName, property: &str) -> DispatchResult<&PropertyEntry> {
        if !self.class_exists(class.as_str()) {
            return Err(DispatchError::UnknownClass(class.clone()));
        }
        self.lookup_property(class.as_str(), property)
            .ok_or_else(|| DispatchError::PropertyNotFound {
                class: class.clone(),
                property: StringName::new(property),
            })
    }

    /// Create an instance through the class's constructor
    pub fn instantiate(&self, class: &str) -> DispatchResult<Box<dyn ClassInstance>> {
        let entry = self
            .class(class)
            .ok_or_else(|| DispatchError::UnknownClass(StringName::new(class)))?;
        if entry.is_abstract() {
            return Err(DispatchError::NotInstantiable(entry.name.clone()));
        }
        entry
            .constructor
            .and_then(|construct| construct())
            .ok_or_else(|| DispatchError::NotInstantiable(entry.name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_instance;
    use crate::config::RegistryConfig;
    use bindery_sdk::{AbiVersion, NullHost};

    struct Counter {
        count: i64,
    }

    impl Counter {
        fn increment(&mut self, by: i64) -> i64 {
            self.count += by;
            self.count
        }

        fn get_count(&self) -> i64 {
            self.count
        }

        fn set_count(&mut self, count: i64) {
            self.count = count;
        }
    }

    impl NativeClass for Counter {
        const CLASS_NAME: &'static str = "Counter";
        const PARENT_NAME: &'static str = "Object";

        fn bind(builder: &mut ClassBuilder<'_, Self>) -> RegistrationResult<()> {
            builder
                .method("increment", Counter::increment)?
                .const_method("get_count", Counter::get_count)?
                .method("set_count", Counter::set_count)?
                .property(PropertyInfo::new(ValueKind::Int, "count"), "set_count", "get_count")?
                .constant("", "MAX", 99)?;
            Ok(())
        }

        fn create() -> Option<Self> {
            Some(Counter { count: 0 })
        }
    }

    class_instance!(Counter);

    fn registry() -> ClassRegistry {
        ClassRegistry::new(Arc::new(NullHost)).unwrap()
    }

    #[test]
    fn test_registry_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ClassRegistry>();
    }

    #[test]
    fn test_abi_negotiation() {
        let config = RegistryConfig {
            required_abi: AbiVersion::new(2, 0, 0),
            ..Default::default()
        };
        let result = ClassRegistry::with_config(Arc::new(NullHost), config);
        assert!(matches!(result, Err(RegistrationError::AbiMismatch { .. })));
    }

    #[test]
    fn test_register_and_call() {
        let mut registry = registry();
        registry.register::<Counter>().unwrap();
        assert!(registry.class_exists("Counter"));
        assert_eq!(registry.parent_of("Counter"), Some(StringName::new("Object")));
        assert!(registry.is_parent_class("Counter", "Object"));

        let mut instance = registry.instantiate("Counter").unwrap();
        assert_eq!(
            registry.call(instance.as_mut(), "increment", &[Value::Int(4)]),
            Ok(Value::Int(4))
        );
        assert_eq!(
            registry.call(instance.as_mut(), "missing", &[]),
            Err(DispatchError::InvalidMethod {
                class: StringName::new("Counter"),
                method: StringName::new("missing"),
            })
        );
        assert_eq!(registry.integer_constant("Counter", "MAX"), Some(99));
    }

    #[test]
    fn test_properties_dispatch_through_accessors() {
        let mut registry = registry();
        registry.register::<Counter>().unwrap();
        let mut instance = registry.instantiate("Counter").unwrap();

        registry.set_property(instance.as_mut(), "count", Value::Int(12)).unwrap();
        assert_eq!(registry.get_property(instance.as_mut(), "count"), Ok(Value::Int(12)));
        assert!(matches!(
            registry.get_property(instance.as_mut(), "nope"),
            Err(DispatchError::PropertyNotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_policy() {
        let mut registry = registry();
        let first = registry.register::<Counter>().unwrap();
        assert_eq!(registry.register::<Counter>(), Ok(first));
        assert_eq!(registry.method_names("Counter").len(), 3);

        let mut strict = ClassRegistry::with_config(Arc::new(NullHost), RegistryConfig::strict()).unwrap();
        strict.register::<Counter>().unwrap();
        assert_eq!(
            strict.register::<Counter>(),
            Err(RegistrationError::DuplicateClass(StringName::new("Counter")))
        );
    }

    #[test]
    fn test_missing_parent() {
        let mut registry = registry();
        assert_eq!(
            registry.register_class(ClassDescriptor::new("Orphan", "Nowhere")),
            Err(RegistrationError::MissingParent {
                class: StringName::new("Orphan"),
                parent: StringName::new("Nowhere"),
            })
        );
        assert!(!registry.class_exists("Orphan"));
    }

    #[test]
    fn test_failed_bind_removes_class() {
        fn failing(_: &mut ClassRegistry) -> RegistrationResult<()> {
            Err(RegistrationError::UnknownClass(StringName::new("x")))
        }
        let mut registry = registry();
        let result = registry.register_class(ClassDescriptor::new("Broken", "Object").with_bind(failing));
        assert!(result.is_err());
        assert!(!registry.class_exists("Broken"));
        assert!(registry.class_names().is_empty());
    }

    #[test]
    fn test_abstract_not_instantiable() {
        let mut registry = registry();
        registry
            .register_class(
                ClassDescriptor::new("Shape", "Object")
                    .with_flags(class_flags::ABSTRACT)
                    .with_constructor(construct::<Counter>),
            )
            .unwrap();
        registry.register_class(ClassDescriptor::new("Plain", "Object")).unwrap();
        assert!(matches!(
            registry.instantiate("Shape"),
            Err(DispatchError::NotInstantiable(_))
        ));
        assert!(matches!(
            registry.instantiate("Plain"),
            Err(DispatchError::NotInstantiable(_))
        ));
        assert!(matches!(
            registry.instantiate("Ghost"),
            Err(DispatchError::UnknownClass(_))
        ));
    }

    #[test]
    fn test_property_list_keeps_groups() {
        let mut registry = registry();
        registry.register::<Counter>().unwrap();
        registry.add_property_group("Counter", "Stats", "stat_").unwrap();
        registry
            .add_property(
                "Counter",
                PropertyInfo::new(ValueKind::Int, "stat_total"),
                "",
                "get_count",
            )
            .unwrap();

        let list = registry.property_list("Counter");
        let names: Vec<&str> = list.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["count", "Stats", "stat_total"]);
        assert_eq!(list[1].usage, PropertyUsage::GROUP);
        assert_eq!(list[1].hint_string, "stat_");
    }

    #[test]
    fn test_unregister_level_reverse_order() {
        let mut registry = registry();
        registry.set_current_level(InitLevel::Scene);
        registry.register_class(ClassDescriptor::new("A", "Object")).unwrap();
        registry.register_class(ClassDescriptor::new("B", "A")).unwrap();
        registry.set_current_level(InitLevel::Editor);
        registry.register_class(ClassDescriptor::new("Tool", "B")).unwrap();

        registry.unregister_level(InitLevel::Editor);
        assert_eq!(
            registry.class_names(),
            vec![StringName::new("A"), StringName::new("B")]
        );
        registry.unregister_level(InitLevel::Scene);
        assert!(registry.class_names().is_empty());
    }
}
