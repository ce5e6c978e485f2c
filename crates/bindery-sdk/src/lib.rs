//! Bindery SDK - boundary types for native extensions
//!
//! This crate holds everything that crosses the boundary between a native
//! extension and its dynamically typed host: the universal `Value` container,
//! its math and collection kinds, and the compile-time metadata (`BoundType`)
//! that maps native Rust types onto value kinds. The registry and dispatch
//! machinery live in `bindery-core`.
//!
//! # Example
//!
//! ```ignore
//! use bindery_sdk::{BoundType, Value, ValueKind};
//!
//! let v = Value::from(42);
//! assert_eq!(v.kind(), ValueKind::Int);
//! assert_eq!(f64::from_value(&v), Ok(42.0));
//! ```

#![warn(missing_docs)]

pub mod bound;
pub mod collections;
pub mod error;
pub mod host;
pub mod info;
pub mod kind;
pub mod math;
pub mod node_path;
pub mod object;
pub mod string_name;
pub mod value;

pub use bound::{BoundType, NativePtr, NativePtrMut, ReturnValue};
pub use collections::{
    Array, Dictionary, PackedArray, PackedByteArray, PackedColorArray, PackedElement,
    PackedFloat32Array, PackedFloat64Array, PackedInt32Array, PackedInt64Array, PackedStringArray,
    PackedVector2Array, PackedVector3Array, PackedVector4Array,
};
pub use error::{ConversionError, OperatorError};
pub use host::{AbiVersion, ClassDescription, HostInterface, NullHost, ParseAbiVersionError};
pub use info::{method_flags, ArgumentMetadata, MethodInfo, PropertyHint, PropertyInfo, PropertyUsage};
pub use kind::{Operator, ValueKind, VALUE_KIND_COUNT};
pub use math::{
    Aabb, Basis, Color, Plane, Projection, Quaternion, Rect2, Rect2i, Transform2D, Transform3D,
    Vector2, Vector2i, Vector3, Vector3i, Vector4, Vector4i,
};
pub use node_path::NodePath;
pub use object::{Callable, ObjectHandle, ObjectId, Rid, Signal};
pub use string_name::{GString, StringName};
pub use value::Value;
