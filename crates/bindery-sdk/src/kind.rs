//! Value kinds and operators
//!
//! `ValueKind` is the discriminator that crosses the binary boundary. Its
//! numeric values are part of the ABI and must never be reordered.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Number of distinct value kinds.
pub const VALUE_KIND_COUNT: usize = 39;

/// Discriminator identifying which type a `Value` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, TryFromPrimitive, IntoPrimitive)]
#[repr(u32)]
pub enum ValueKind {
    /// No value
    Nil = 0,
    /// Boolean
    Bool,
    /// 64-bit signed integer
    Int,
    /// 64-bit IEEE-754 float
    Float,
    /// Copy-on-write string
    String,
    /// 2D float vector
    Vector2,
    /// 2D integer vector
    Vector2i,
    /// 2D float rectangle
    Rect2,
    /// 2D integer rectangle
    Rect2i,
    /// 3D float vector
    Vector3,
    /// 3D integer vector
    Vector3i,
    /// 2D affine transform
    Transform2D,
    /// 4D float vector
    Vector4,
    /// 4D integer vector
    Vector4i,
    /// 3D plane
    Plane,
    /// Rotation quaternion
    Quaternion,
    /// Axis-aligned bounding box
    Aabb,
    /// 3x3 matrix
    Basis,
    /// 3D affine transform
    Transform3D,
    /// 4x4 projection matrix
    Projection,
    /// RGBA color
    Color,
    /// Interned string
    StringName,
    /// Parsed node path
    NodePath,
    /// Opaque resource id
    Rid,
    /// Object handle (possibly null)
    Object,
    /// Bound method reference
    Callable,
    /// Signal reference
    Signal,
    /// Ordered key/value map
    Dictionary,
    /// Heterogeneous array
    Array,
    /// Packed `u8` array
    PackedByteArray,
    /// Packed `i32` array
    PackedInt32Array,
    /// Packed `i64` array
    PackedInt64Array,
    /// Packed `f32` array
    PackedFloat32Array,
    /// Packed `f64` array
    PackedFloat64Array,
    /// Packed string array
    PackedStringArray,
    /// Packed `Vector2` array
    PackedVector2Array,
    /// Packed `Vector3` array
    PackedVector3Array,
    /// Packed `Color` array
    PackedColorArray,
    /// Packed `Vector4` array
    PackedVector4Array,
}

impl ValueKind {
    /// All kinds, in tag order.
    pub const ALL: [ValueKind; VALUE_KIND_COUNT] = [
        ValueKind::Nil,
        ValueKind::Bool,
        ValueKind::Int,
        ValueKind::Float,
        ValueKind::String,
        ValueKind::Vector2,
        ValueKind::Vector2i,
        ValueKind::Rect2,
        ValueKind::Rect2i,
        ValueKind::Vector3,
        ValueKind::Vector3i,
        ValueKind::Transform2D,
        ValueKind::Vector4,
        ValueKind::Vector4i,
        ValueKind::Plane,
        ValueKind::Quaternion,
        ValueKind::Aabb,
        ValueKind::Basis,
        ValueKind::Transform3D,
        ValueKind::Projection,
        ValueKind::Color,
        ValueKind::StringName,
        ValueKind::NodePath,
        ValueKind::Rid,
        ValueKind::Object,
        ValueKind::Callable,
        ValueKind::Signal,
        ValueKind::Dictionary,
        ValueKind::Array,
        ValueKind::PackedByteArray,
        ValueKind::PackedInt32Array,
        ValueKind::PackedInt64Array,
        ValueKind::PackedFloat32Array,
        ValueKind::PackedFloat64Array,
        ValueKind::PackedStringArray,
        ValueKind::PackedVector2Array,
        ValueKind::PackedVector3Array,
        ValueKind::PackedColorArray,
        ValueKind::PackedVector4Array,
    ];

    /// Decode a raw tag received from the other side of the boundary.
    ///
    /// A tag outside the known range means the two binaries disagree about the
    /// value layout. Continuing would corrupt data on both sides, so the
    /// process aborts.
    pub fn from_raw(raw: u32) -> ValueKind {
        match ValueKind::try_from(raw) {
            Ok(kind) => kind,
            Err(_) => {
                tracing::error!(raw, "value kind tag out of range; aborting");
                std::process::abort();
            }
        }
    }

    /// Decode a raw tag without aborting.
    pub fn try_from_raw(raw: u32) -> Option<ValueKind> {
        ValueKind::try_from(raw).ok()
    }

    /// Raw tag value
    pub fn to_raw(self) -> u32 {
        self.into()
    }

    /// Human-readable kind name
    pub const fn name(self) -> &'static str {
        match self {
            ValueKind::Nil => "Nil",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::String => "String",
            ValueKind::Vector2 => "Vector2",
            ValueKind::Vector2i => "Vector2i",
            ValueKind::Rect2 => "Rect2",
            ValueKind::Rect2i => "Rect2i",
            ValueKind::Vector3 => "Vector3",
            ValueKind::Vector3i => "Vector3i",
            ValueKind::Transform2D => "Transform2D",
            ValueKind::Vector4 => "Vector4",
            ValueKind::Vector4i => "Vector4i",
            ValueKind::Plane => "Plane",
            ValueKind::Quaternion => "Quaternion",
            ValueKind::Aabb => "AABB",
            ValueKind::Basis => "Basis",
            ValueKind::Transform3D => "Transform3D",
            ValueKind::Projection => "Projection",
            ValueKind::Color => "Color",
            ValueKind::StringName => "StringName",
            ValueKind::NodePath => "NodePath",
            ValueKind::Rid => "RID",
            ValueKind::Object => "Object",
            ValueKind::Callable => "Callable",
            ValueKind::Signal => "Signal",
            ValueKind::Dictionary => "Dictionary",
            ValueKind::Array => "Array",
            ValueKind::PackedByteArray => "PackedByteArray",
            ValueKind::PackedInt32Array => "PackedInt32Array",
            ValueKind::PackedInt64Array => "PackedInt64Array",
            ValueKind::PackedFloat32Array => "PackedFloat32Array",
            ValueKind::PackedFloat64Array => "PackedFloat64Array",
            ValueKind::PackedStringArray => "PackedStringArray",
            ValueKind::PackedVector2Array => "PackedVector2Array",
            ValueKind::PackedVector3Array => "PackedVector3Array",
            ValueKind::PackedColorArray => "PackedColorArray",
            ValueKind::PackedVector4Array => "PackedVector4Array",
        }
    }

    /// Whether this kind is one of the packed array kinds
    pub const fn is_packed_array(self) -> bool {
        matches!(
            self,
            ValueKind::PackedByteArray
                | ValueKind::PackedInt32Array
                | ValueKind::PackedInt64Array
                | ValueKind::PackedFloat32Array
                | ValueKind::PackedFloat64Array
                | ValueKind::PackedStringArray
                | ValueKind::PackedVector2Array
                | ValueKind::PackedVector3Array
                | ValueKind::PackedColorArray
                | ValueKind::PackedVector4Array
        )
    }

    /// Whether values of this kind are backed by shared, copy-on-write storage
    pub const fn is_ref_counted(self) -> bool {
        matches!(
            self,
            ValueKind::String
                | ValueKind::NodePath
                | ValueKind::Dictionary
                | ValueKind::Array
        ) || self.is_packed_array()
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Operators understood by `Value::evaluate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u32)]
pub enum Operator {
    /// `==`
    Equal = 0,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// unary `-`
    Negate,
    /// unary `+`
    Positive,
    /// `%`
    Module,
    /// `**`
    Power,
    /// `<<`
    ShiftLeft,
    /// `>>`
    ShiftRight,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `~`
    BitNegate,
    /// `and`
    And,
    /// `or`
    Or,
    /// `xor`
    Xor,
    /// `not`
    Not,
    /// `in`
    In,
}

impl Operator {
    /// Whether the operator takes a single operand
    pub const fn is_unary(self) -> bool {
        matches!(
            self,
            Operator::Negate | Operator::Positive | Operator::BitNegate | Operator::Not
        )
    }

    /// Operator symbol for diagnostics
    pub const fn symbol(self) -> &'static str {
        match self {
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::Less => "<",
            Operator::LessEqual => "<=",
            Operator::Greater => ">",
            Operator::GreaterEqual => ">=",
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Negate => "unary-",
            Operator::Positive => "unary+",
            Operator::Module => "%",
            Operator::Power => "**",
            Operator::ShiftLeft => "<<",
            Operator::ShiftRight => ">>",
            Operator::BitAnd => "&",
            Operator::BitOr => "|",
            Operator::BitXor => "^",
            Operator::BitNegate => "~",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Xor => "xor",
            Operator::Not => "not",
            Operator::In => "in",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
