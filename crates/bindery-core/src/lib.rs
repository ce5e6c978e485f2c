//! Bindery core - class registry and method dispatch
//!
//! Native Rust classes are registered into a `ClassRegistry` with typed
//! method bindings. The host then calls them by name with `Value` arguments,
//! or directly through pointers when both sides agree on the native layout.
//! Overridable methods are resolved through per-class slots guarded by a
//! signature hash.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use bindery_core::{class_instance, ClassBuilder, ClassRegistry, NativeClass, RegistrationError};
//! use bindery_sdk::{NullHost, Value};
//!
//! struct Counter { count: i64 }
//!
//! impl NativeClass for Counter {
//!     const CLASS_NAME: &'static str = "Counter";
//!     const PARENT_NAME: &'static str = "Object";
//!
//!     fn bind(builder: &mut ClassBuilder<'_, Self>) -> Result<(), RegistrationError> {
//!         builder.method("add", |c: &mut Counter, n: i64| { c.count += n; c.count })?;
//!         Ok(())
//!     }
//! }
//! class_instance!(Counter);
//!
//! let mut registry = ClassRegistry::new(Arc::new(NullHost))?;
//! registry.register::<Counter>()?;
//! let mut counter = Counter { count: 1 };
//! assert_eq!(registry.call(&mut counter, "add", &[Value::Int(2)])?, Value::Int(3));
//! ```

#![warn(missing_docs)]

pub mod abi;
pub mod binding;
pub mod config;
pub mod error;
pub mod init;
pub mod instance;
pub mod object_db;
pub mod registry;
pub mod singletons;
pub mod virtuals;

#[doc(hidden)]
pub use bindery_sdk as __sdk;

pub use abi::{dispatch_call, dispatch_ptrcall, CallErrorCode, CallErrorRecord};
pub use binding::{argument, ArgTuple, ArgumentSpec, MethodBinding};
pub use config::{ConfigError, DuplicateClassPolicy, RegistryConfig};
pub use error::{DispatchError, DispatchResult, RegistrationError, RegistrationResult};
pub use init::{ExtensionLibrary, InitLevel};
pub use instance::{class_flags, downcast_mut, downcast_ref, ClassInstance, Instance, NativeClass};
pub use object_db::ObjectDb;
pub use registry::{ClassBuilder, ClassDescriptor, ClassEntry, ClassId, ClassRegistry};
pub use singletons::SingletonRegistry;
pub use virtuals::{signature_hash, Overrides, VirtualFn, VirtualMethod, VirtualSlot};
