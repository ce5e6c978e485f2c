//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use bindery_core::ClassRegistry;
use bindery_sdk::{
    AbiVersion, ClassDescription, HostInterface, MethodInfo, PropertyInfo, StringName,
};
use parking_lot::Mutex;

/// Host that records every notification as a short string
#[derive(Default)]
pub struct RecordingHost {
    pub events: Mutex<Vec<String>>,
}

impl RecordingHost {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().push(event);
    }
}

impl HostInterface for RecordingHost {
    fn abi_version(&self) -> AbiVersion {
        AbiVersion::CURRENT
    }

    fn has_class(&self, name: &StringName) -> bool {
        *name == "Object" || *name == "RefCounted"
    }

    fn register_class(&self, class: &ClassDescription) {
        self.push(format!("class {} : {}", class.name, class.parent));
    }

    fn unregister_class(&self, name: &StringName) {
        self.push(format!("unclass {}", name));
    }

    fn register_method(&self, class: &StringName, method: &MethodInfo) {
        self.push(format!("method {}.{}/{}", class, method.name, method.arguments.len()));
    }

    fn register_property(&self, class: &StringName, info: &PropertyInfo, setter: &StringName, getter: &StringName) {
        self.push(format!("property {}.{} [{} {}]", class, info.name, getter, setter));
    }

    fn register_signal(&self, class: &StringName, name: &StringName, args: &[PropertyInfo]) {
        self.push(format!("signal {}.{}/{}", class, name, args.len()));
    }

    fn register_virtual_method(&self, class: &StringName, method: &MethodInfo) {
        self.push(format!("virtual {}.{}", class, method.name));
    }
}

/// Registry wired to a fresh recording host
pub fn recording_registry() -> (ClassRegistry, Arc<RecordingHost>) {
    let host = Arc::new(RecordingHost::default());
    let registry = ClassRegistry::new(host.clone()).expect("current ABI is compatible");
    (registry, host)
}
