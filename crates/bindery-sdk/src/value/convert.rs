//! Kind-to-kind conversion
//!
//! `can_convert` is the permissive table used by soft conversion and default
//! argument validation. `can_convert_strict` is the lossless subset accepted
//! for arguments at the dynamic call boundary.

use crate::collections::PackedArray;
use crate::error::ConversionError;
use crate::kind::ValueKind;
use crate::math::{Basis, Color, Projection, Quaternion, Rect2, Rect2i, Transform2D, Transform3D};
use crate::math::{Vector2, Vector2i, Vector3, Vector3i, Vector4, Vector4i};
use crate::node_path::NodePath;
use crate::string_name::{GString, StringName};

use super::Value;

/// Whether a value of kind `from` may be converted to `to`.
pub fn can_convert(from: ValueKind, to: ValueKind) -> bool {
    use ValueKind::*;

    if from == to || to == Nil {
        return true;
    }
    match to {
        Bool => matches!(from, Int | Float | String),
        Int => matches!(from, Bool | Float | String),
        Float => matches!(from, Bool | Int | String),
        String => !matches!(from, Nil | Object),
        StringName | NodePath => from == String,
        Vector2 => from == Vector2i,
        Vector2i => from == Vector2,
        Vector3 => from == Vector3i,
        Vector3i => from == Vector3,
        Vector4 => from == Vector4i,
        Vector4i => from == Vector4,
        Rect2 => from == Rect2i,
        Rect2i => from == Rect2,
        Transform2D => from == Transform3D,
        Quaternion => from == Basis,
        Basis => from == Quaternion,
        Transform3D => matches!(from, Transform2D | Quaternion | Basis | Projection),
        Projection => from == Transform3D,
        Color => matches!(from, String | Int),
        Object => from == Nil,
        Array => from.is_packed_array(),
        k if k.is_packed_array() => from == Array,
        _ => false,
    }
}

/// Whether a value of kind `from` converts to `to` without loss.
pub fn can_convert_strict(from: ValueKind, to: ValueKind) -> bool {
    use ValueKind::*;

    if from == to || to == Nil {
        return true;
    }
    match to {
        Bool => matches!(from, Int | Float),
        Int => from == Bool,
        Float => matches!(from, Bool | Int),
        String => matches!(from, StringName | NodePath),
        StringName | NodePath => from == String,
        Vector2 => from == Vector2i,
        Vector3 => from == Vector3i,
        Vector4 => from == Vector4i,
        Rect2 => from == Rect2i,
        Transform2D => from == Transform3D,
        Quaternion => from == Basis,
        Basis => from == Quaternion,
        Transform3D => matches!(from, Transform2D | Quaternion | Basis | Projection),
        Projection => from == Transform3D,
        Color => matches!(from, String | Int),
        Object => from == Nil,
        Array => from.is_packed_array(),
        k if k.is_packed_array() => from == Array,
        _ => false,
    }
}

impl Value {
    /// Whether this value may be converted to `kind`
    pub fn can_convert(&self, kind: ValueKind) -> bool {
        can_convert(self.kind(), kind)
    }

    /// Whether this value converts to `kind` without loss
    pub fn can_convert_strict(&self, kind: ValueKind) -> bool {
        can_convert_strict(self.kind(), kind)
    }

    /// Convert to `kind`, failing when the table does not allow it.
    pub fn convert_to(&self, kind: ValueKind) -> Result<Value, ConversionError> {
        if self.kind() == kind {
            return Ok(self.clone());
        }
        if !self.can_convert(kind) {
            return Err(ConversionError::new(self.kind(), kind));
        }
        Ok(self.convert_unchecked(kind))
    }

    /// Convert to `kind`, yielding the kind's default when not allowed.
    pub fn convert(&self, kind: ValueKind) -> Value {
        self.convert_to(kind).unwrap_or_else(|_| Value::default_for(kind))
    }

    /// Lossless conversion. The flag reports whether it was allowed; on failure
    /// the value is the kind's default.
    pub fn convert_strict(&self, kind: ValueKind) -> (Value, bool) {
        if self.kind() == kind {
            (self.clone(), true)
        } else if self.can_convert_strict(kind) {
            (self.convert_unchecked(kind), true)
        } else {
            (Value::default_for(kind), false)
        }
    }

    /// Perform a conversion the table allows. Pairs the table rejects fall
    /// through to the default value.
    fn convert_unchecked(&self, to: ValueKind) -> Value {
        match (to, self) {
            (ValueKind::Nil, _) => Value::Nil,

            (ValueKind::Bool, Value::Int(i)) => Value::Bool(*i != 0),
            (ValueKind::Bool, Value::Float(f)) => Value::Bool(*f != 0.0),
            (ValueKind::Bool, Value::String(s)) => Value::Bool(parse_bool(s)),

            (ValueKind::Int, Value::Bool(b)) => Value::Int(*b as i64),
            (ValueKind::Int, Value::Float(f)) => Value::Int(*f as i64),
            (ValueKind::Int, Value::String(s)) => Value::Int(parse_int(s)),

            (ValueKind::Float, Value::Bool(b)) => Value::Float(if *b { 1.0 } else { 0.0 }),
            (ValueKind::Float, Value::Int(i)) => Value::Float(*i as f64),
            (ValueKind::Float, Value::String(s)) => Value::Float(parse_float(s)),

            (ValueKind::String, v) => Value::String(GString::from(v.to_string())),
            (ValueKind::StringName, Value::String(s)) => Value::StringName(StringName::new(s)),
            (ValueKind::NodePath, Value::String(s)) => Value::NodePath(NodePath::new(s)),

            (ValueKind::Vector2, Value::Vector2i(v)) => Value::Vector2(Vector2::from(*v)),
            (ValueKind::Vector2i, Value::Vector2(v)) => Value::Vector2i(Vector2i::from(*v)),
            (ValueKind::Vector3, Value::Vector3i(v)) => Value::Vector3(Vector3::from(*v)),
            (ValueKind::Vector3i, Value::Vector3(v)) => Value::Vector3i(Vector3i::from(*v)),
            (ValueKind::Vector4, Value::Vector4i(v)) => Value::Vector4(Vector4::from(*v)),
            (ValueKind::Vector4i, Value::Vector4(v)) => Value::Vector4i(Vector4i::from(*v)),
            (ValueKind::Rect2, Value::Rect2i(r)) => Value::Rect2(Rect2::from(*r)),
            (ValueKind::Rect2i, Value::Rect2(r)) => Value::Rect2i(Rect2i::from(*r)),

            (ValueKind::Transform2D, Value::Transform3D(t)) => Transform2D::from(**t).into(),
            (ValueKind::Quaternion, Value::Basis(b)) => Quaternion::from(**b).into(),
            (ValueKind::Basis, Value::Quaternion(q)) => Basis::from(*q).into(),
            (ValueKind::Transform3D, Value::Transform2D(t)) => Transform3D::from(**t).into(),
            (ValueKind::Transform3D, Value::Quaternion(q)) => Transform3D::from(*q).into(),
            (ValueKind::Transform3D, Value::Basis(b)) => Transform3D::from(**b).into(),
            (ValueKind::Transform3D, Value::Projection(p)) => Transform3D::from(**p).into(),
            (ValueKind::Projection, Value::Transform3D(t)) => Projection::from(**t).into(),

            (ValueKind::Color, Value::String(s)) => {
                Value::Color(Color::from_html(s.trim()).unwrap_or_default())
            }
            (ValueKind::Color, Value::Int(i)) => Value::Color(Color::from_rgba32(*i as u32)),

            (ValueKind::Object, Value::Nil) => Value::Object(None),

            (ValueKind::Array, v) => packed_to_array(v).unwrap_or_else(|| Value::default_for(to)),
            (k, Value::Array(a)) if k.is_packed_array() => array_to_packed(k, a),

            _ => Value::default_for(to),
        }
    }
}

fn packed_to_array(value: &Value) -> Option<Value> {
    let array = match value {
        Value::PackedByteArray(p) => p.to_array(),
        Value::PackedInt32Array(p) => p.to_array(),
        Value::PackedInt64Array(p) => p.to_array(),
        Value::PackedFloat32Array(p) => p.to_array(),
        Value::PackedFloat64Array(p) => p.to_array(),
        Value::PackedStringArray(p) => p.to_array(),
        Value::PackedVector2Array(p) => p.to_array(),
        Value::PackedVector3Array(p) => p.to_array(),
        Value::PackedColorArray(p) => p.to_array(),
        Value::PackedVector4Array(p) => p.to_array(),
        _ => return None,
    };
    Some(Value::Array(array))
}

fn array_to_packed(kind: ValueKind, array: &crate::collections::Array) -> Value {
    match kind {
        ValueKind::PackedByteArray => Value::PackedByteArray(PackedArray::from_array(array)),
        ValueKind::PackedInt32Array => Value::PackedInt32Array(PackedArray::from_array(array)),
        ValueKind::PackedInt64Array => Value::PackedInt64Array(PackedArray::from_array(array)),
        ValueKind::PackedFloat32Array => Value::PackedFloat32Array(PackedArray::from_array(array)),
        ValueKind::PackedFloat64Array => Value::PackedFloat64Array(PackedArray::from_array(array)),
        ValueKind::PackedStringArray => Value::PackedStringArray(PackedArray::from_array(array)),
        ValueKind::PackedVector2Array => Value::PackedVector2Array(PackedArray::from_array(array)),
        ValueKind::PackedVector3Array => Value::PackedVector3Array(PackedArray::from_array(array)),
        ValueKind::PackedColorArray => Value::PackedColorArray(PackedArray::from_array(array)),
        ValueKind::PackedVector4Array => Value::PackedVector4Array(PackedArray::from_array(array)),
        other => Value::default_for(other),
    }
}

fn parse_bool(s: &str) -> bool {
    let s = s.trim();
    s.eq_ignore_ascii_case("true") || parse_float(s) != 0.0
}

fn parse_int(s: &str) -> i64 {
    let s = s.trim();
    s.parse::<i64>()
        .unwrap_or_else(|_| s.parse::<f64>().map(|f| f as i64).unwrap_or(0))
}

fn parse_float(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::{Array, PackedInt32Array};
    use crate::math::Vector2;

    fn sample(kind: ValueKind) -> Value {
        match kind {
            ValueKind::Int => Value::Int(42),
            ValueKind::Float => Value::Float(f64::NAN),
            ValueKind::String => Value::from("hello"),
            ValueKind::Array => Value::from(vec![Value::Int(1), Value::from("x")]),
            other => Value::default_for(other),
        }
    }

    #[test]
    fn test_identity_conversion_for_every_kind() {
        for kind in ValueKind::ALL {
            let v = sample(kind);
            assert_eq!(v.convert_to(kind), Ok(v.clone()), "kind {}", kind);
            assert_eq!(v.convert_strict(kind), (v.clone(), true));
        }
    }

    #[test]
    fn test_strict_forbids_narrowing() {
        assert!(can_convert(ValueKind::Float, ValueKind::Int));
        assert!(!can_convert_strict(ValueKind::Float, ValueKind::Int));
        assert!(can_convert_strict(ValueKind::Int, ValueKind::Float));

        let (v, ok) = Value::Float(2.5).convert_strict(ValueKind::Int);
        assert!(!ok);
        assert_eq!(v, Value::Int(0));
    }

    #[test]
    fn test_strict_is_subset_of_permissive() {
        for from in ValueKind::ALL {
            for to in ValueKind::ALL {
                if can_convert_strict(from, to) {
                    assert!(can_convert(from, to), "{} -> {}", from, to);
                }
            }
        }
    }

    #[test]
    fn test_float_to_int_truncates_and_saturates() {
        assert_eq!(Value::Float(-2.9).convert(ValueKind::Int), Value::Int(-2));
        assert_eq!(Value::Float(1e300).convert(ValueKind::Int), Value::Int(i64::MAX));
        assert_eq!(Value::Float(f64::NAN).convert(ValueKind::Int), Value::Int(0));
    }

    #[test]
    fn test_string_parsing_is_soft() {
        assert_eq!(Value::from(" 12 ").convert(ValueKind::Int), Value::Int(12));
        assert_eq!(Value::from("3.7").convert(ValueKind::Int), Value::Int(3));
        assert_eq!(Value::from("abc").convert(ValueKind::Float), Value::Float(0.0));
        assert_eq!(Value::from("TRUE").convert(ValueKind::Bool), Value::Bool(true));
        assert_eq!(Value::from("0").convert(ValueKind::Bool), Value::Bool(false));
        assert_eq!(Value::from("2").convert(ValueKind::Bool), Value::Bool(true));
    }

    #[test]
    fn test_disallowed_conversion() {
        let err = Value::from(Vector2::new(1.0, 1.0)).convert_to(ValueKind::Int);
        assert_eq!(err, Err(ConversionError::new(ValueKind::Vector2, ValueKind::Int)));
        assert_eq!(Value::from(Vector2::ZERO).convert(ValueKind::Bool), Value::Bool(false));
        assert!(Value::null_object().convert_to(ValueKind::String).is_err());
    }

    #[test]
    fn test_color_sources() {
        let red = Color::rgb(1.0, 0.0, 0.0);
        assert_eq!(Value::from("#ff0000").convert(ValueKind::Color), Value::Color(red));
        assert_eq!(Value::Int(0xff0000ff).convert(ValueKind::Color), Value::Color(red));
        assert_eq!(Value::from("nope").convert(ValueKind::Color), Value::Color(Color::default()));
    }

    #[test]
    fn test_to_string() {
        assert_eq!(Value::Float(1.0).convert(ValueKind::String), Value::from("1.0"));
        assert_eq!(
            Value::StringName(StringName::new("sym")).convert_strict(ValueKind::String),
            (Value::from("sym"), true)
        );
    }

    #[test]
    fn test_transform_conversions() {
        let t2 = Transform2D::IDENTITY;
        let t3 = Value::from(t2).convert(ValueKind::Transform3D);
        assert_eq!(t3, Value::from(Transform3D::IDENTITY));
        let p = t3.convert(ValueKind::Projection);
        assert_eq!(p, Value::from(Projection::IDENTITY));
    }

    #[test]
    fn test_nil_to_object() {
        assert_eq!(Value::Nil.convert_strict(ValueKind::Object), (Value::null_object(), true));
    }

    #[test]
    fn test_array_packed_conversion() {
        let packed: PackedInt32Array = vec![1, 2].into();
        let array = Value::from(packed.clone()).convert(ValueKind::Array);
        assert_eq!(array, Value::from(vec![Value::Int(1), Value::Int(2)]));
        assert_eq!(array.convert(ValueKind::PackedInt32Array), Value::from(packed));
    }

    #[test]
    fn test_converting_shared_array_leaves_copy_intact() {
        let original = Value::from(Array::from(vec![Value::Int(1)]));
        let copy = original.clone();
        let text = copy.convert(ValueKind::String);
        assert_eq!(text, Value::from("[1]"));
        assert_eq!(original, Value::from(vec![Value::Int(1)]));
        assert_eq!(copy.kind(), ValueKind::Array);
    }
}
