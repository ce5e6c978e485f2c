//! The universal value container
//!
//! `Value` is a closed, tagged enum over every kind that can cross the
//! boundary. Small math types are stored inline; types larger than 16 bytes are
//! boxed so a `Value` never exceeds 24 bytes. Strings, collections and node
//! paths are `Arc`-backed and copy-on-write.
//!
//! # Equality
//!
//! `PartialEq`/`Eq`/`Hash` use *key* semantics so a `Value` can be a
//! `Dictionary` key: floats compare by normalized bits and values of different
//! kinds are never equal. Script-level equality (IEEE floats, `Int == Float`,
//! `String == StringName`) goes through [`Value::evaluate`].

mod convert;
mod ops;

pub use convert::{can_convert, can_convert_strict};

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::collections::{
    Array, Dictionary, PackedByteArray, PackedColorArray, PackedFloat32Array, PackedFloat64Array,
    PackedInt32Array, PackedInt64Array, PackedStringArray, PackedVector2Array, PackedVector3Array,
    PackedVector4Array,
};
use crate::error::OperatorError;
use crate::kind::{Operator, ValueKind};
use crate::math::{
    fmt_real, Aabb, Basis, Color, KeyCompare, Plane, Projection, Quaternion, Rect2, Rect2i,
    Transform2D, Transform3D, Vector2, Vector2i, Vector3, Vector3i, Vector4, Vector4i,
};
use crate::node_path::NodePath;
use crate::object::{Callable, ObjectHandle, Rid, Signal};
use crate::string_name::{GString, StringName};

/// Universal tagged value.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// No value
    #[default]
    Nil,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// Copy-on-write string
    String(GString),
    #[allow(missing_docs)]
    Vector2(Vector2),
    #[allow(missing_docs)]
    Vector2i(Vector2i),
    #[allow(missing_docs)]
    Rect2(Rect2),
    #[allow(missing_docs)]
    Rect2i(Rect2i),
    #[allow(missing_docs)]
    Vector3(Vector3),
    #[allow(missing_docs)]
    Vector3i(Vector3i),
    #[allow(missing_docs)]
    Transform2D(Box<Transform2D>),
    #[allow(missing_docs)]
    Vector4(Vector4),
    #[allow(missing_docs)]
    Vector4i(Vector4i),
    #[allow(missing_docs)]
    Plane(Plane),
    #[allow(missing_docs)]
    Quaternion(Quaternion),
    #[allow(missing_docs)]
    Aabb(Box<Aabb>),
    #[allow(missing_docs)]
    Basis(Box<Basis>),
    #[allow(missing_docs)]
    Transform3D(Box<Transform3D>),
    #[allow(missing_docs)]
    Projection(Box<Projection>),
    #[allow(missing_docs)]
    Color(Color),
    /// Interned symbol
    StringName(StringName),
    #[allow(missing_docs)]
    NodePath(NodePath),
    #[allow(missing_docs)]
    Rid(Rid),
    /// Object handle, `None` for a null object
    Object(Option<Box<ObjectHandle>>),
    #[allow(missing_docs)]
    Callable(Box<Callable>),
    #[allow(missing_docs)]
    Signal(Box<Signal>),
    #[allow(missing_docs)]
    Dictionary(Dictionary),
    #[allow(missing_docs)]
    Array(Array),
    #[allow(missing_docs)]
    PackedByteArray(PackedByteArray),
    #[allow(missing_docs)]
    PackedInt32Array(PackedInt32Array),
    #[allow(missing_docs)]
    PackedInt64Array(PackedInt64Array),
    #[allow(missing_docs)]
    PackedFloat32Array(PackedFloat32Array),
    #[allow(missing_docs)]
    PackedFloat64Array(PackedFloat64Array),
    #[allow(missing_docs)]
    PackedStringArray(PackedStringArray),
    #[allow(missing_docs)]
    PackedVector2Array(PackedVector2Array),
    #[allow(missing_docs)]
    PackedVector3Array(PackedVector3Array),
    #[allow(missing_docs)]
    PackedColorArray(PackedColorArray),
    #[allow(missing_docs)]
    PackedVector4Array(PackedVector4Array),
}

const _: () = assert!(std::mem::size_of::<Value>() <= 24);

impl Value {
    // ========================================================================
    // Kind
    // ========================================================================

    /// The active kind
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Nil => ValueKind::Nil,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Vector2(_) => ValueKind::Vector2,
            Value::Vector2i(_) => ValueKind::Vector2i,
            Value::Rect2(_) => ValueKind::Rect2,
            Value::Rect2i(_) => ValueKind::Rect2i,
            Value::Vector3(_) => ValueKind::Vector3,
            Value::Vector3i(_) => ValueKind::Vector3i,
            Value::Transform2D(_) => ValueKind::Transform2D,
            Value::Vector4(_) => ValueKind::Vector4,
            Value::Vector4i(_) => ValueKind::Vector4i,
            Value::Plane(_) => ValueKind::Plane,
            Value::Quaternion(_) => ValueKind::Quaternion,
            Value::Aabb(_) => ValueKind::Aabb,
            Value::Basis(_) => ValueKind::Basis,
            Value::Transform3D(_) => ValueKind::Transform3D,
            Value::Projection(_) => ValueKind::Projection,
            Value::Color(_) => ValueKind::Color,
            Value::StringName(_) => ValueKind::StringName,
            Value::NodePath(_) => ValueKind::NodePath,
            Value::Rid(_) => ValueKind::Rid,
            Value::Object(_) => ValueKind::Object,
            Value::Callable(_) => ValueKind::Callable,
            Value::Signal(_) => ValueKind::Signal,
            Value::Dictionary(_) => ValueKind::Dictionary,
            Value::Array(_) => ValueKind::Array,
            Value::PackedByteArray(_) => ValueKind::PackedByteArray,
            Value::PackedInt32Array(_) => ValueKind::PackedInt32Array,
            Value::PackedInt64Array(_) => ValueKind::PackedInt64Array,
            Value::PackedFloat32Array(_) => ValueKind::PackedFloat32Array,
            Value::PackedFloat64Array(_) => ValueKind::PackedFloat64Array,
            Value::PackedStringArray(_) => ValueKind::PackedStringArray,
            Value::PackedVector2Array(_) => ValueKind::PackedVector2Array,
            Value::PackedVector3Array(_) => ValueKind::PackedVector3Array,
            Value::PackedColorArray(_) => ValueKind::PackedColorArray,
            Value::PackedVector4Array(_) => ValueKind::PackedVector4Array,
        }
    }

    /// Default value of a kind
    pub fn default_for(kind: ValueKind) -> Value {
        match kind {
            ValueKind::Nil => Value::Nil,
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Int => Value::Int(0),
            ValueKind::Float => Value::Float(0.0),
            ValueKind::String => Value::String(GString::new()),
            ValueKind::Vector2 => Value::Vector2(Vector2::ZERO),
            ValueKind::Vector2i => Value::Vector2i(Vector2i::ZERO),
            ValueKind::Rect2 => Value::Rect2(Rect2::default()),
            ValueKind::Rect2i => Value::Rect2i(Rect2i::default()),
            ValueKind::Vector3 => Value::Vector3(Vector3::ZERO),
            ValueKind::Vector3i => Value::Vector3i(Vector3i::ZERO),
            ValueKind::Transform2D => Value::Transform2D(Box::default()),
            ValueKind::Vector4 => Value::Vector4(Vector4::ZERO),
            ValueKind::Vector4i => Value::Vector4i(Vector4i::ZERO),
            ValueKind::Plane => Value::Plane(Plane::default()),
            ValueKind::Quaternion => Value::Quaternion(Quaternion::IDENTITY),
            ValueKind::Aabb => Value::Aabb(Box::default()),
            ValueKind::Basis => Value::Basis(Box::default()),
            ValueKind::Transform3D => Value::Transform3D(Box::default()),
            ValueKind::Projection => Value::Projection(Box::default()),
            ValueKind::Color => Value::Color(Color::default()),
            ValueKind::StringName => Value::StringName(StringName::empty()),
            ValueKind::NodePath => Value::NodePath(NodePath::default()),
            ValueKind::Rid => Value::Rid(Rid::default()),
            ValueKind::Object => Value::Object(None),
            ValueKind::Callable => Value::Callable(Box::default()),
            ValueKind::Signal => Value::Signal(Box::default()),
            ValueKind::Dictionary => Value::Dictionary(Dictionary::new()),
            ValueKind::Array => Value::Array(Array::new()),
            ValueKind::PackedByteArray => Value::PackedByteArray(Default::default()),
            ValueKind::PackedInt32Array => Value::PackedInt32Array(Default::default()),
            ValueKind::PackedInt64Array => Value::PackedInt64Array(Default::default()),
            ValueKind::PackedFloat32Array => Value::PackedFloat32Array(Default::default()),
            ValueKind::PackedFloat64Array => Value::PackedFloat64Array(Default::default()),
            ValueKind::PackedStringArray => Value::PackedStringArray(Default::default()),
            ValueKind::PackedVector2Array => Value::PackedVector2Array(Default::default()),
            ValueKind::PackedVector3Array => Value::PackedVector3Array(Default::default()),
            ValueKind::PackedColorArray => Value::PackedColorArray(Default::default()),
            ValueKind::PackedVector4Array => Value::PackedVector4Array(Default::default()),
        }
    }

    /// Whether this is `Nil`
    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Move the value out, leaving `Nil` behind
    #[inline]
    pub fn take(&mut self) -> Value {
        std::mem::take(self)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Boolean payload
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer payload
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Float payload
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Text of a `String` or `StringName`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            Value::StringName(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Object handle, `None` for null objects and other kinds
    pub fn as_object(&self) -> Option<&ObjectHandle> {
        match self {
            Value::Object(Some(h)) => Some(&**h),
            _ => None,
        }
    }

    /// Array payload
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Dictionary payload
    pub fn as_dictionary(&self) -> Option<&Dictionary> {
        match self {
            Value::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Null object value
    pub fn null_object() -> Value {
        Value::Object(None)
    }

    // ========================================================================
    // Truthiness and operators
    // ========================================================================

    /// Truthiness: zero, empty, null and default-valued math types are false.
    pub fn booleanize(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Vector2(v) => !v.is_zero(),
            Value::Vector2i(v) => !v.is_zero(),
            Value::Rect2(r) => *r != Rect2::default(),
            Value::Rect2i(r) => *r != Rect2i::default(),
            Value::Vector3(v) => !v.is_zero(),
            Value::Vector3i(v) => !v.is_zero(),
            Value::Transform2D(t) => **t != Transform2D::IDENTITY,
            Value::Vector4(v) => !v.is_zero(),
            Value::Vector4i(v) => !v.is_zero(),
            Value::Plane(p) => *p != Plane::default(),
            Value::Quaternion(q) => *q != Quaternion::IDENTITY,
            Value::Aabb(a) => **a != Aabb::default(),
            Value::Basis(b) => **b != Basis::IDENTITY,
            Value::Transform3D(t) => **t != Transform3D::IDENTITY,
            Value::Projection(p) => **p != Projection::IDENTITY,
            Value::Color(c) => *c != Color::default(),
            Value::StringName(s) => !s.is_empty(),
            Value::NodePath(p) => !p.is_empty(),
            Value::Rid(r) => r.is_valid(),
            Value::Object(h) => h.is_some(),
            Value::Callable(c) => !c.is_null(),
            Value::Signal(s) => !s.is_null(),
            Value::Dictionary(d) => !d.is_empty(),
            Value::Array(a) => !a.is_empty(),
            Value::PackedByteArray(p) => !p.is_empty(),
            Value::PackedInt32Array(p) => !p.is_empty(),
            Value::PackedInt64Array(p) => !p.is_empty(),
            Value::PackedFloat32Array(p) => !p.is_empty(),
            Value::PackedFloat64Array(p) => !p.is_empty(),
            Value::PackedStringArray(p) => !p.is_empty(),
            Value::PackedVector2Array(p) => !p.is_empty(),
            Value::PackedVector3Array(p) => !p.is_empty(),
            Value::PackedColorArray(p) => !p.is_empty(),
            Value::PackedVector4Array(p) => !p.is_empty(),
        }
    }

    /// Evaluate `lhs op rhs`. Unary operators ignore `rhs`.
    pub fn evaluate(op: Operator, lhs: &Value, rhs: &Value) -> Result<Value, OperatorError> {
        ops::evaluate(op, lhs, rhs)
    }
}

// ============================================================================
// Key equality and hashing
// ============================================================================

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.key_eq(b),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Vector2(a), Value::Vector2(b)) => a.key_eq(b),
            (Value::Vector2i(a), Value::Vector2i(b)) => a == b,
            (Value::Rect2(a), Value::Rect2(b)) => a.key_eq(b),
            (Value::Rect2i(a), Value::Rect2i(b)) => a == b,
            (Value::Vector3(a), Value::Vector3(b)) => a.key_eq(b),
            (Value::Vector3i(a), Value::Vector3i(b)) => a == b,
            (Value::Transform2D(a), Value::Transform2D(b)) => a.key_eq(b),
            (Value::Vector4(a), Value::Vector4(b)) => a.key_eq(b),
            (Value::Vector4i(a), Value::Vector4i(b)) => a == b,
            (Value::Plane(a), Value::Plane(b)) => a.key_eq(b),
            (Value::Quaternion(a), Value::Quaternion(b)) => a.key_eq(b),
            (Value::Aabb(a), Value::Aabb(b)) => a.key_eq(b),
            (Value::Basis(a), Value::Basis(b)) => a.key_eq(b),
            (Value::Transform3D(a), Value::Transform3D(b)) => a.key_eq(b),
            (Value::Projection(a), Value::Projection(b)) => a.key_eq(b),
            (Value::Color(a), Value::Color(b)) => a.key_eq(b),
            (Value::StringName(a), Value::StringName(b)) => a == b,
            (Value::NodePath(a), Value::NodePath(b)) => a == b,
            (Value::Rid(a), Value::Rid(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.as_ref().map(|h| h.id) == b.as_ref().map(|h| h.id),
            (Value::Callable(a), Value::Callable(b)) => a == b,
            (Value::Signal(a), Value::Signal(b)) => a == b,
            (Value::Dictionary(a), Value::Dictionary(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::PackedByteArray(a), Value::PackedByteArray(b)) => a == b,
            (Value::PackedInt32Array(a), Value::PackedInt32Array(b)) => a == b,
            (Value::PackedInt64Array(a), Value::PackedInt64Array(b)) => a == b,
            (Value::PackedFloat32Array(a), Value::PackedFloat32Array(b)) => a == b,
            (Value::PackedFloat64Array(a), Value::PackedFloat64Array(b)) => a == b,
            (Value::PackedStringArray(a), Value::PackedStringArray(b)) => a == b,
            (Value::PackedVector2Array(a), Value::PackedVector2Array(b)) => a == b,
            (Value::PackedVector3Array(a), Value::PackedVector3Array(b)) => a == b,
            (Value::PackedColorArray(a), Value::PackedColorArray(b)) => a == b,
            (Value::PackedVector4Array(a), Value::PackedVector4Array(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.kind().to_raw());
        match self {
            Value::Nil => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => f.key_hash(state),
            Value::String(s) => s.as_str().hash(state),
            Value::Vector2(v) => v.key_hash(state),
            Value::Vector2i(v) => v.key_hash(state),
            Value::Rect2(r) => r.key_hash(state),
            Value::Rect2i(r) => r.key_hash(state),
            Value::Vector3(v) => v.key_hash(state),
            Value::Vector3i(v) => v.key_hash(state),
            Value::Transform2D(t) => t.key_hash(state),
            Value::Vector4(v) => v.key_hash(state),
            Value::Vector4i(v) => v.key_hash(state),
            Value::Plane(p) => p.key_hash(state),
            Value::Quaternion(q) => q.key_hash(state),
            Value::Aabb(a) => a.key_hash(state),
            Value::Basis(b) => b.key_hash(state),
            Value::Transform3D(t) => t.key_hash(state),
            Value::Projection(p) => p.key_hash(state),
            Value::Color(c) => c.key_hash(state),
            Value::StringName(s) => s.hash(state),
            Value::NodePath(p) => p.hash(state),
            Value::Rid(r) => r.hash(state),
            Value::Object(h) => h.as_ref().map(|h| h.id).hash(state),
            Value::Callable(c) => c.hash(state),
            Value::Signal(s) => s.hash(state),
            Value::Dictionary(d) => d.hash(state),
            Value::Array(a) => a.hash(state),
            Value::PackedByteArray(p) => p.hash(state),
            Value::PackedInt32Array(p) => p.hash(state),
            Value::PackedInt64Array(p) => p.hash(state),
            Value::PackedFloat32Array(p) => p.hash(state),
            Value::PackedFloat64Array(p) => p.hash(state),
            Value::PackedStringArray(p) => p.hash(state),
            Value::PackedVector2Array(p) => p.hash(state),
            Value::PackedVector3Array(p) => p.hash(state),
            Value::PackedColorArray(p) => p.hash(state),
            Value::PackedVector4Array(p) => p.hash(state),
        }
    }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => fmt_real(*x, f),
            Value::String(s) => f.write_str(s),
            Value::Vector2(v) => fmt::Display::fmt(v, f),
            Value::Vector2i(v) => fmt::Display::fmt(v, f),
            Value::Rect2(r) => fmt::Display::fmt(r, f),
            Value::Rect2i(r) => fmt::Display::fmt(r, f),
            Value::Vector3(v) => fmt::Display::fmt(v, f),
            Value::Vector3i(v) => fmt::Display::fmt(v, f),
            Value::Transform2D(t) => fmt::Display::fmt(t, f),
            Value::Vector4(v) => fmt::Display::fmt(v, f),
            Value::Vector4i(v) => fmt::Display::fmt(v, f),
            Value::Plane(p) => fmt::Display::fmt(p, f),
            Value::Quaternion(q) => fmt::Display::fmt(q, f),
            Value::Aabb(a) => fmt::Display::fmt(a, f),
            Value::Basis(b) => fmt::Display::fmt(b, f),
            Value::Transform3D(t) => fmt::Display::fmt(t, f),
            Value::Projection(p) => fmt::Display::fmt(p, f),
            Value::Color(c) => fmt::Display::fmt(c, f),
            Value::StringName(s) => f.write_str(s.as_str()),
            Value::NodePath(p) => f.write_str(p.as_str()),
            Value::Rid(r) => fmt::Display::fmt(r, f),
            Value::Object(Some(h)) => fmt::Display::fmt(h, f),
            Value::Object(None) => f.write_str("<null>"),
            Value::Callable(c) => fmt::Display::fmt(c, f),
            Value::Signal(s) => fmt::Display::fmt(s, f),
            Value::Dictionary(d) => fmt::Display::fmt(d, f),
            Value::Array(a) => fmt::Display::fmt(a, f),
            Value::PackedByteArray(p) => fmt::Display::fmt(p, f),
            Value::PackedInt32Array(p) => fmt::Display::fmt(p, f),
            Value::PackedInt64Array(p) => fmt::Display::fmt(p, f),
            Value::PackedFloat32Array(p) => fmt::Display::fmt(p, f),
            Value::PackedFloat64Array(p) => fmt::Display::fmt(p, f),
            Value::PackedStringArray(p) => fmt::Display::fmt(p, f),
            Value::PackedVector2Array(p) => fmt::Display::fmt(p, f),
            Value::PackedVector3Array(p) => fmt::Display::fmt(p, f),
            Value::PackedColorArray(p) => fmt::Display::fmt(p, f),
            Value::PackedVector4Array(p) => fmt::Display::fmt(p, f),
        }
    }
}

/// Write a value nested inside a collection listing. Text kinds are quoted.
pub(crate) fn fmt_element(value: &Value, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        Value::String(s) => write!(f, "\"{}\"", s),
        Value::StringName(s) => write!(f, "&\"{}\"", s),
        Value::NodePath(p) => write!(f, "^\"{}\"", p),
        other => fmt::Display::fmt(other, f),
    }
}

// ============================================================================
// Construction
// ============================================================================

macro_rules! from_inline {
    ($($t:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$t> for Value {
                #[inline]
                fn from(v: $t) -> Self {
                    Value::$variant(v)
                }
            }
        )+
    };
}

macro_rules! from_boxed {
    ($($t:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$t> for Value {
                #[inline]
                fn from(v: $t) -> Self {
                    Value::$variant(Box::new(v))
                }
            }
        )+
    };
}

macro_rules! from_int {
    ($($t:ty),+) => {
        $(
            impl From<$t> for Value {
                #[inline]
                fn from(v: $t) -> Self {
                    Value::Int(v as i64)
                }
            }
        )+
    };
}

from_inline!(
    bool => Bool,
    i64 => Int,
    f64 => Float,
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

from_boxed!(
    Transform2D => Transform2D,
    Aabb => Aabb,
    Basis => Basis,
    Transform3D => Transform3D,
    Projection => Projection,
    Callable => Callable,
    Signal => Signal,
);

from_int!(i8, i16, i32, u8, u16, u32, u64, usize, isize);

impl From<f32> for Value {
    #[inline]
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(GString::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(GString::from(s))
    }
}

impl From<ObjectHandle> for Value {
    fn from(h: ObjectHandle) -> Self {
        Value::Object(Some(Box::new(h)))
    }
}

impl From<Option<ObjectHandle>> for Value {
    fn from(h: Option<ObjectHandle>) -> Self {
        Value::Object(h.map(Box::new))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(Array::from(items))
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Nil
    }
}
