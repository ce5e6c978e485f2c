//! Compile-time type metadata for boundary types
//!
//! `BoundType` maps a native Rust type to its `ValueKind`, its precision
//! metadata, and its two calling conventions: conversion through `Value` for
//! dynamic calls, and raw pointer reads/writes for direct calls. Types without
//! an impl cannot appear in a bound method signature.

use std::ffi::c_void;

use crate::collections::{
    Array, Dictionary, PackedByteArray, PackedColorArray, PackedFloat32Array, PackedFloat64Array,
    PackedInt32Array, PackedInt64Array, PackedStringArray, PackedVector2Array, PackedVector3Array,
    PackedVector4Array,
};
use crate::error::ConversionError;
use crate::info::{ArgumentMetadata, PropertyHint, PropertyInfo};
use crate::kind::ValueKind;
use crate::math::{
    Aabb, Basis, Color, Plane, Projection, Quaternion, Rect2, Rect2i, Transform2D, Transform3D,
    Vector2, Vector2i, Vector3, Vector3i, Vector4, Vector4i,
};
use crate::node_path::NodePath;
use crate::object::{Callable, ObjectHandle, Rid, Signal};
use crate::string_name::{GString, StringName};
use crate::value::Value;

/// Pointer to an initialized argument of the agreed native type
pub type NativePtr = *const c_void;

/// Pointer to storage for a native return value
pub type NativePtrMut = *mut c_void;

/// A native type that can cross the boundary.
pub trait BoundType: Sized + Clone + 'static {
    /// Kind of the corresponding `Value`. `Nil` means "any value".
    const KIND: ValueKind;

    /// Native precision reported to the host
    const ARG_METADATA: ArgumentMetadata = ArgumentMetadata::None;

    /// Extract from a value of exactly `KIND`
    fn from_exact(value: &Value) -> Option<Self>;

    /// Wrap as a value
    fn into_value(self) -> Value;

    /// Argument conversion: exact kind match, or a strict conversion.
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        if let Some(v) = Self::from_exact(value) {
            return Ok(v);
        }
        let (converted, ok) = value.convert_strict(Self::KIND);
        if ok {
            if let Some(v) = Self::from_exact(&converted) {
                return Ok(v);
            }
        }
        Err(ConversionError::new(value.kind(), Self::KIND))
    }

    /// Class denoted by object-like types
    fn class_name() -> StringName {
        StringName::empty()
    }

    /// Editor hint for properties of this type
    fn property_hint() -> (PropertyHint, String) {
        (PropertyHint::None, String::new())
    }

    /// Property description for an argument or property of this type
    fn property_info(name: &str) -> PropertyInfo {
        let (hint, hint_string) = Self::property_hint();
        PropertyInfo::new(Self::KIND, name)
            .with_class_name(Self::class_name())
            .with_hint(hint, hint_string)
    }

    /// Read an argument for a direct call.
    ///
    /// # Safety
    /// `ptr` must point to a live, initialized `Self`.
    #[inline]
    unsafe fn read_ptr(ptr: NativePtr) -> Self {
        (*(ptr as *const Self)).clone()
    }

    /// Write a return value for a direct call.
    ///
    /// # Safety
    /// `ptr` must point to writable, properly aligned storage for `Self`. Any
    /// previous contents are overwritten without being dropped.
    #[inline]
    unsafe fn write_ptr(self, ptr: NativePtrMut) {
        std::ptr::write(ptr as *mut Self, self)
    }
}

/// A native return type: `()` or any `BoundType`.
pub trait ReturnValue: 'static {
    /// Whether the method produces a value
    const HAS_RETURN: bool;

    /// Return kind (`Nil` when there is none)
    const KIND: ValueKind;

    /// Return precision
    const METADATA: ArgumentMetadata;

    /// Convert for a dynamic call
    fn into_return(self) -> Value;

    /// Return description, `None` for `()`
    fn return_info() -> Option<PropertyInfo>;

    /// Store for a direct call.
    ///
    /// # Safety
    /// Same contract as [`BoundType::write_ptr`]. Ignored for `()`.
    unsafe fn write_return(self, ret: NativePtrMut);
}

impl ReturnValue for () {
    const HAS_RETURN: bool = false;
    const KIND: ValueKind = ValueKind::Nil;
    const METADATA: ArgumentMetadata = ArgumentMetadata::None;

    fn into_return(self) -> Value {
        Value::Nil
    }

    fn return_info() -> Option<PropertyInfo> {
        None
    }

    unsafe fn write_return(self, _ret: NativePtrMut) {}
}

impl<T: BoundType> ReturnValue for T {
    const HAS_RETURN: bool = true;
    const KIND: ValueKind = T::KIND;
    const METADATA: ArgumentMetadata = T::ARG_METADATA;

    fn into_return(self) -> Value {
        self.into_value()
    }

    fn return_info() -> Option<PropertyInfo> {
        Some(T::property_info(""))
    }

    unsafe fn write_return(self, ret: NativePtrMut) {
        self.write_ptr(ret)
    }
}

impl Value {
    /// Extract a native value using argument conversion rules
    pub fn try_to<T: BoundType>(&self) -> Result<T, ConversionError> {
        T::from_value(self)
    }
}

// ============================================================================
// Impls
// ============================================================================

impl BoundType for Value {
    const KIND: ValueKind = ValueKind::Nil;

    fn from_exact(value: &Value) -> Option<Self> {
        Some(value.clone())
    }

    fn into_value(self) -> Value {
        self
    }

    fn property_info(name: &str) -> PropertyInfo {
        PropertyInfo::new(ValueKind::Nil, name)
    }
}

impl BoundType for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn from_exact(value: &Value) -> Option<Self> {
        value.as_bool()
    }

    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

macro_rules! bound_int {
    ($($t:ty => $meta:ident),+ $(,)?) => {
        $(
            impl BoundType for $t {
                const KIND: ValueKind = ValueKind::Int;
                const ARG_METADATA: ArgumentMetadata = ArgumentMetadata::$meta;

                fn from_exact(value: &Value) -> Option<Self> {
                    // Narrowing is two's-complement truncation.
                    value.as_int().map(|i| i as $t)
                }

                fn into_value(self) -> Value {
                    Value::Int(self as i64)
                }
            }
        )+
    };
}

bound_int!(
    i8 => IntIsInt8,
    i16 => IntIsInt16,
    i32 => IntIsInt32,
    i64 => IntIsInt64,
    u8 => IntIsUint8,
    u16 => IntIsUint16,
    u32 => IntIsUint32,
    u64 => IntIsUint64,
);

impl BoundType for f32 {
    const KIND: ValueKind = ValueKind::Float;
    const ARG_METADATA: ArgumentMetadata = ArgumentMetadata::RealIsFloat;

    fn from_exact(value: &Value) -> Option<Self> {
        value.as_float().map(|f| f as f32)
    }

    fn into_value(self) -> Value {
        Value::Float(self as f64)
    }
}

impl BoundType for f64 {
    const KIND: ValueKind = ValueKind::Float;
    const ARG_METADATA: ArgumentMetadata = ArgumentMetadata::RealIsDouble;

    fn from_exact(value: &Value) -> Option<Self> {
        value.as_float()
    }

    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl BoundType for String {
    const KIND: ValueKind = ValueKind::String;

    fn from_exact(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.as_str().to_string()),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::from(self)
    }
}

macro_rules! bound_inline {
    ($($t:ty => $variant:ident),+ $(,)?) => {
        $(
            impl BoundType for $t {
                const KIND: ValueKind = ValueKind::$variant;

                fn from_exact(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }
        )+
    };
}

macro_rules! bound_boxed {
    ($($t:ty => $variant:ident),+ $(,)?) => {
        $(
            impl BoundType for $t {
                const KIND: ValueKind = ValueKind::$variant;

                fn from_exact(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some((**v).clone()),
                        _ => None,
                    }
                }

                fn into_value(self) -> Value {
                    Value::$variant(Box::new(self))
                }
            }
        )+
    };
}

bound_inline!(
    GString => String,
    Vector2 => Vector2,
    Vector2i => Vector2i,
    Rect2 => Rect2,
    Rect2i => Rect2i,
    Vector3 => Vector3,
    Vector3i => Vector3i,
    Vector4 => Vector4,
    Vector4i => Vector4i,
    Plane => Plane,
    Quaternion => Quaternion,
    Color => Color,
    StringName => StringName,
    NodePath => NodePath,
    Rid => Rid,
    Dictionary => Dictionary,
    Array => Array,
    PackedByteArray => PackedByteArray,
    PackedInt32Array => PackedInt32Array,
    PackedInt64Array => PackedInt64Array,
    PackedFloat32Array => PackedFloat32Array,
    PackedFloat64Array => PackedFloat64Array,
    PackedStringArray => PackedStringArray,
    PackedVector2Array => PackedVector2Array,
    PackedVector3Array => PackedVector3Array,
    PackedColorArray => PackedColorArray,
    PackedVector4Array => PackedVector4Array,
);

bound_boxed!(
    Transform2D => Transform2D,
    Aabb => Aabb,
    Basis => Basis,
    Transform3D => Transform3D,
    Projection => Projection,
    Callable => Callable,
    Signal => Signal,
);

impl BoundType for ObjectHandle {
    const KIND: ValueKind = ValueKind::Object;

    fn from_exact(value: &Value) -> Option<Self> {
        value.as_object().cloned()
    }

    fn into_value(self) -> Value {
        Value::from(self)
    }

    fn class_name() -> StringName {
        StringName::new("Object")
    }
}

impl BoundType for Option<ObjectHandle> {
    const KIND: ValueKind = ValueKind::Object;

    fn from_exact(value: &Value) -> Option<Self> {
        match value {
            Value::Object(h) => Some(h.as_deref().cloned()),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::from(self)
    }

    fn class_name() -> StringName {
        StringName::new("Object")
    }
}
