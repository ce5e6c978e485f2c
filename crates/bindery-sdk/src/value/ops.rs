//! Operator evaluation
//!
//! Script-level semantics: IEEE float comparison, numeric promotion, and
//! `String`/`StringName` interchangeability. Integer arithmetic wraps.

use std::cmp::Ordering;

use crate::collections::{PackedArray, PackedElement};
use crate::error::OperatorError;
use crate::kind::Operator;
use crate::math::{Vector2, Vector2i, Vector3, Vector3i, Vector4, Vector4i};
use crate::string_name::GString;

use super::Value;

pub(super) fn evaluate(op: Operator, lhs: &Value, rhs: &Value) -> Result<Value, OperatorError> {
    match op {
        Operator::Equal => Ok(Value::Bool(equals(lhs, rhs))),
        Operator::NotEqual => Ok(Value::Bool(!equals(lhs, rhs))),
        Operator::Less | Operator::LessEqual | Operator::Greater | Operator::GreaterEqual => {
            let ord = compare(lhs, rhs).ok_or_else(|| invalid(op, lhs, rhs))?;
            let result = match op {
                Operator::Less => ord == Some(Ordering::Less),
                Operator::LessEqual => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
                Operator::Greater => ord == Some(Ordering::Greater),
                _ => matches!(ord, Some(Ordering::Greater | Ordering::Equal)),
            };
            Ok(Value::Bool(result))
        }
        Operator::And => Ok(Value::Bool(lhs.booleanize() && rhs.booleanize())),
        Operator::Or => Ok(Value::Bool(lhs.booleanize() || rhs.booleanize())),
        Operator::Xor => Ok(Value::Bool(lhs.booleanize() != rhs.booleanize())),
        Operator::Not => Ok(Value::Bool(!lhs.booleanize())),
        Operator::Negate | Operator::Positive | Operator::BitNegate => unary(op, lhs),
        Operator::In => contains(lhs, rhs)
            .map(Value::Bool)
            .ok_or_else(|| invalid(op, lhs, rhs)),
        _ => binary(op, lhs, rhs),
    }
}

fn invalid(op: Operator, lhs: &Value, rhs: &Value) -> OperatorError {
    OperatorError::InvalidOperands {
        op,
        lhs: lhs.kind(),
        rhs: rhs.kind(),
    }
}

fn as_number(v: &Value) -> Option<f64> {
    match v {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

// ============================================================================
// Comparison
// ============================================================================

fn equals(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => *a as f64 == *b,
        (Value::Vector2(a), Value::Vector2(b)) => a == b,
        (Value::Vector3(a), Value::Vector3(b)) => a == b,
        (Value::Vector4(a), Value::Vector4(b)) => a == b,
        (Value::Rect2(a), Value::Rect2(b)) => a == b,
        (Value::Transform2D(a), Value::Transform2D(b)) => a == b,
        (Value::Plane(a), Value::Plane(b)) => a == b,
        (Value::Quaternion(a), Value::Quaternion(b)) => a == b,
        (Value::Aabb(a), Value::Aabb(b)) => a == b,
        (Value::Basis(a), Value::Basis(b)) => a == b,
        (Value::Transform3D(a), Value::Transform3D(b)) => a == b,
        (Value::Projection(a), Value::Projection(b)) => a == b,
        (Value::Color(a), Value::Color(b)) => a == b,
        (Value::Nil, Value::Object(None)) | (Value::Object(None), Value::Nil) => true,
        _ if lhs.kind() == rhs.kind() => lhs == rhs,
        _ => match (lhs.as_str(), rhs.as_str()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

/// `None` when the kinds cannot be ordered; `Some(None)` for unordered floats.
fn compare(lhs: &Value, rhs: &Value) -> Option<Option<Ordering>> {
    let ord = match (lhs, rhs) {
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Vector2(a), Value::Vector2(b)) => a.partial_cmp(b),
        (Value::Vector2i(a), Value::Vector2i(b)) => a.partial_cmp(b),
        (Value::Vector3(a), Value::Vector3(b)) => a.partial_cmp(b),
        (Value::Vector3i(a), Value::Vector3i(b)) => a.partial_cmp(b),
        (Value::Vector4(a), Value::Vector4(b)) => a.partial_cmp(b),
        (Value::Vector4i(a), Value::Vector4i(b)) => a.partial_cmp(b),
        (Value::Rid(a), Value::Rid(b)) => Some(a.cmp(b)),
        _ => {
            if let (Some(a), Some(b)) = (as_number(lhs), as_number(rhs)) {
                a.partial_cmp(&b)
            } else if let (Some(a), Some(b)) = (lhs.as_str(), rhs.as_str()) {
                Some(a.cmp(b))
            } else {
                return None;
            }
        }
    };
    Some(ord)
}

fn contains(needle: &Value, haystack: &Value) -> Option<bool> {
    fn packed<T: PackedElement>(needle: &Value, p: &PackedArray<T>) -> bool {
        p.iter().any(|e| equals(&e.to_value(), needle))
    }

    Some(match haystack {
        Value::Array(a) => a.iter().any(|v| equals(v, needle)),
        Value::Dictionary(d) => d.contains_key(needle),
        Value::String(_) | Value::StringName(_) => {
            let (Some(n), Some(h)) = (needle.as_str(), haystack.as_str()) else {
                return None;
            };
            h.contains(n)
        }
        Value::PackedByteArray(p) => packed(needle, p),
        Value::PackedInt32Array(p) => packed(needle, p),
        Value::PackedInt64Array(p) => packed(needle, p),
        Value::PackedFloat32Array(p) => packed(needle, p),
        Value::PackedFloat64Array(p) => packed(needle, p),
        Value::PackedStringArray(p) => packed(needle, p),
        Value::PackedVector2Array(p) => packed(needle, p),
        Value::PackedVector3Array(p) => packed(needle, p),
        Value::PackedColorArray(p) => packed(needle, p),
        Value::PackedVector4Array(p) => packed(needle, p),
        _ => return None,
    })
}

// ============================================================================
// Unary
// ============================================================================

fn unary(op: Operator, v: &Value) -> Result<Value, OperatorError> {
    let result = match (op, v) {
        (Operator::Negate, Value::Int(i)) => Value::Int(i.wrapping_neg()),
        (Operator::Negate, Value::Float(f)) => Value::Float(-f),
        (Operator::Negate, Value::Vector2(a)) => Value::Vector2(-*a),
        (Operator::Negate, Value::Vector2i(a)) => Value::Vector2i(-*a),
        (Operator::Negate, Value::Vector3(a)) => Value::Vector3(-*a),
        (Operator::Negate, Value::Vector3i(a)) => Value::Vector3i(-*a),
        (Operator::Negate, Value::Vector4(a)) => Value::Vector4(-*a),
        (Operator::Negate, Value::Vector4i(a)) => Value::Vector4i(-*a),
        (Operator::Negate, Value::Quaternion(q)) => Value::Quaternion(-*q),
        (
            Operator::Positive,
            Value::Int(_)
            | Value::Float(_)
            | Value::Vector2(_)
            | Value::Vector2i(_)
            | Value::Vector3(_)
            | Value::Vector3i(_)
            | Value::Vector4(_)
            | Value::Vector4i(_)
            | Value::Quaternion(_),
        ) => v.clone(),
        (Operator::BitNegate, Value::Int(i)) => Value::Int(!i),
        _ => return Err(invalid(op, v, &Value::Nil)),
    };
    Ok(result)
}

// ============================================================================
// Binary arithmetic
// ============================================================================

fn binary(op: Operator, lhs: &Value, rhs: &Value) -> Result<Value, OperatorError> {
    if let (Value::Int(a), Value::Int(b)) = (lhs, rhs) {
        return int_op(op, *a, *b).ok_or_else(|| invalid(op, lhs, rhs))?;
    }
    if let (Some(a), Some(b)) = (as_number(lhs), as_number(rhs)) {
        return float_op(op, a, b).ok_or_else(|| invalid(op, lhs, rhs));
    }

    let result = match (op, lhs, rhs) {
        (Operator::Add, Value::String(_) | Value::StringName(_), Value::String(_) | Value::StringName(_)) => {
            let mut out = GString::from(lhs.as_str().unwrap_or_default());
            out.push_str(rhs.as_str().unwrap_or_default());
            Some(Value::String(out))
        }
        (Operator::Add, Value::Array(a), Value::Array(b)) => {
            let mut out = a.clone();
            out.extend_from(b);
            Some(Value::Array(out))
        }
        _ => float_vector_op(op, lhs, rhs)
            .or_else(|| color_op(op, lhs, rhs))
            .or_else(|| transform_op(op, lhs, rhs))
            .or_else(|| packed_concat(op, lhs, rhs)),
    };
    if let Some(v) = result {
        return Ok(v);
    }
    int_vector_op(op, lhs, rhs).ok_or_else(|| invalid(op, lhs, rhs))?
}

fn int_op(op: Operator, a: i64, b: i64) -> Option<Result<Value, OperatorError>> {
    let v = match op {
        Operator::Add => a.wrapping_add(b),
        Operator::Subtract => a.wrapping_sub(b),
        Operator::Multiply => a.wrapping_mul(b),
        Operator::Divide | Operator::Module if b == 0 => {
            return Some(Err(OperatorError::DivisionByZero));
        }
        Operator::Divide => a.wrapping_div(b),
        Operator::Module => a.wrapping_rem(b),
        Operator::Power if b < 0 => return Some(Ok(Value::Float((a as f64).powf(b as f64)))),
        Operator::Power => a.wrapping_pow(b.min(u32::MAX as i64) as u32),
        Operator::ShiftLeft | Operator::ShiftRight if !(0..64).contains(&b) => {
            return Some(Err(OperatorError::InvalidShift(b)));
        }
        Operator::ShiftLeft => a << b,
        Operator::ShiftRight => a >> b,
        Operator::BitAnd => a & b,
        Operator::BitOr => a | b,
        Operator::BitXor => a ^ b,
        _ => return None,
    };
    Some(Ok(Value::Int(v)))
}

fn float_op(op: Operator, a: f64, b: f64) -> Option<Value> {
    let v = match op {
        Operator::Add => a + b,
        Operator::Subtract => a - b,
        Operator::Multiply => a * b,
        Operator::Divide => a / b,
        Operator::Module => a % b,
        Operator::Power => a.powf(b),
        _ => return None,
    };
    Some(Value::Float(v))
}

macro_rules! float_vectors {
    ($op:expr, $lhs:expr, $rhs:expr, [$($v:ident),+]) => {
        match ($op, $lhs, $rhs) {
            $(
                (Operator::Add, Value::$v(a), Value::$v(b)) => Some(Value::$v(*a + *b)),
                (Operator::Subtract, Value::$v(a), Value::$v(b)) => Some(Value::$v(*a - *b)),
                (Operator::Multiply, Value::$v(a), Value::$v(b)) => Some(Value::$v(*a * *b)),
                (Operator::Divide, Value::$v(a), Value::$v(b)) => Some(Value::$v(*a / *b)),
                (Operator::Multiply, Value::$v(a), s) | (Operator::Multiply, s, Value::$v(a))
                    if as_number(s).is_some() =>
                {
                    as_number(s).map(|s| Value::$v(*a * s as f32))
                }
                (Operator::Divide, Value::$v(a), s) if as_number(s).is_some() => {
                    as_number(s).map(|s| Value::$v(*a / s as f32))
                }
            )+
            _ => None,
        }
    };
}

fn float_vector_op(op: Operator, lhs: &Value, rhs: &Value) -> Option<Value> {
    float_vectors!(op, lhs, rhs, [Vector2, Vector3, Vector4])
}

macro_rules! int_vectors {
    ($op:expr, $lhs:expr, $rhs:expr, [$($v:ident => $f:ident { $($field:ident),+ }),+]) => {
        match ($op, $lhs, $rhs) {
            $(
                (Operator::Add, Value::$v(a), Value::$v(b)) => Some(Ok(Value::$v(*a + *b))),
                (Operator::Subtract, Value::$v(a), Value::$v(b)) => Some(Ok(Value::$v(*a - *b))),
                (Operator::Multiply, Value::$v(a), Value::$v(b)) => Some(Ok(Value::$v(*a * *b))),
                (Operator::Divide | Operator::Module, Value::$v(_), Value::$v(b)) if b.has_zero_component() => {
                    Some(Err(OperatorError::DivisionByZero))
                }
                (Operator::Divide, Value::$v(a), Value::$v(b)) => Some(Ok(Value::$v(*a / *b))),
                (Operator::Module, Value::$v(a), Value::$v(b)) => {
                    Some(Ok(Value::$v($v::new($(a.$field.wrapping_rem(b.$field)),+))))
                }
                (Operator::Multiply, Value::$v(a), Value::Int(s))
                | (Operator::Multiply, Value::Int(s), Value::$v(a)) => {
                    Some(Ok(Value::$v(*a * (*s as i32))))
                }
                (Operator::Multiply, Value::$v(a), Value::Float(s))
                | (Operator::Multiply, Value::Float(s), Value::$v(a)) => {
                    Some(Ok(Value::$f($f::from(*a) * (*s as f32))))
                }
                (Operator::Divide | Operator::Module, Value::$v(_), Value::Int(s)) if *s as i32 == 0 => {
                    Some(Err(OperatorError::DivisionByZero))
                }
                (Operator::Divide, Value::$v(a), Value::Int(s)) => Some(Ok(Value::$v(*a / (*s as i32)))),
                (Operator::Module, Value::$v(a), Value::Int(s)) => {
                    let s = *s as i32;
                    Some(Ok(Value::$v($v::new($(a.$field.wrapping_rem(s)),+))))
                }
                (Operator::Divide, Value::$v(a), Value::Float(s)) => {
                    Some(Ok(Value::$f($f::from(*a) / (*s as f32))))
                }
            )+
            _ => None,
        }
    };
}

fn int_vector_op(op: Operator, lhs: &Value, rhs: &Value) -> Option<Result<Value, OperatorError>> {
    int_vectors!(op, lhs, rhs, [
        Vector2i => Vector2 { x, y },
        Vector3i => Vector3 { x, y, z },
        Vector4i => Vector4 { x, y, z, w }
    ])
}

fn color_op(op: Operator, lhs: &Value, rhs: &Value) -> Option<Value> {
    match (op, lhs, rhs) {
        (Operator::Add, Value::Color(a), Value::Color(b)) => Some(Value::Color(*a + *b)),
        (Operator::Subtract, Value::Color(a), Value::Color(b)) => Some(Value::Color(*a - *b)),
        (Operator::Multiply, Value::Color(a), Value::Color(b)) => Some(Value::Color(*a * *b)),
        (Operator::Multiply, Value::Color(c), s) | (Operator::Multiply, s, Value::Color(c)) => {
            as_number(s).map(|s| Value::Color(*c * s as f32))
        }
        (Operator::Divide, Value::Color(c), s) => as_number(s).map(|s| Value::Color(*c / s as f32)),
        (Operator::Add, Value::Quaternion(a), Value::Quaternion(b)) => Some(Value::Quaternion(*a + *b)),
        (Operator::Subtract, Value::Quaternion(a), Value::Quaternion(b)) => {
            Some(Value::Quaternion(*a - *b))
        }
        (Operator::Multiply, Value::Quaternion(a), Value::Quaternion(b)) => {
            Some(Value::Quaternion(*a * *b))
        }
        (Operator::Multiply, Value::Quaternion(q), s) if as_number(s).is_some() => {
            as_number(s).map(|s| Value::Quaternion(*q * s as f32))
        }
        _ => None,
    }
}

fn transform_op(op: Operator, lhs: &Value, rhs: &Value) -> Option<Value> {
    if op != Operator::Multiply {
        return None;
    }
    match (lhs, rhs) {
        (Value::Quaternion(q), Value::Vector3(v)) => Some(Value::Vector3(q.xform(*v))),
        (Value::Basis(a), Value::Basis(b)) => Some((**a * **b).into()),
        (Value::Basis(b), Value::Vector3(v)) => Some(Value::Vector3(**b * *v)),
        (Value::Transform2D(a), Value::Transform2D(b)) => Some((**a * **b).into()),
        (Value::Transform2D(t), Value::Vector2(v)) => Some(Value::Vector2(**t * *v)),
        (Value::Transform3D(a), Value::Transform3D(b)) => Some((**a * **b).into()),
        (Value::Transform3D(t), Value::Vector3(v)) => Some(Value::Vector3(**t * *v)),
        _ => None,
    }
}

fn packed_concat(op: Operator, lhs: &Value, rhs: &Value) -> Option<Value> {
    fn concat<T: PackedElement>(a: &PackedArray<T>, b: &PackedArray<T>) -> PackedArray<T> {
        let mut out = a.clone();
        out.extend_from(b);
        out
    }

    if op != Operator::Add {
        return None;
    }
    let v = match (lhs, rhs) {
        (Value::PackedByteArray(a), Value::PackedByteArray(b)) => Value::PackedByteArray(concat(a, b)),
        (Value::PackedInt32Array(a), Value::PackedInt32Array(b)) => Value::PackedInt32Array(concat(a, b)),
        (Value::PackedInt64Array(a), Value::PackedInt64Array(b)) => Value::PackedInt64Array(concat(a, b)),
        (Value::PackedFloat32Array(a), Value::PackedFloat32Array(b)) => {
            Value::PackedFloat32Array(concat(a, b))
        }
        (Value::PackedFloat64Array(a), Value::PackedFloat64Array(b)) => {
            Value::PackedFloat64Array(concat(a, b))
        }
        (Value::PackedStringArray(a), Value::PackedStringArray(b)) => {
            Value::PackedStringArray(concat(a, b))
        }
        (Value::PackedVector2Array(a), Value::PackedVector2Array(b)) => {
            Value::PackedVector2Array(concat(a, b))
        }
        (Value::PackedVector3Array(a), Value::PackedVector3Array(b)) => {
            Value::PackedVector3Array(concat(a, b))
        }
        (Value::PackedColorArray(a), Value::PackedColorArray(b)) => Value::PackedColorArray(concat(a, b)),
        (Value::PackedVector4Array(a), Value::PackedVector4Array(b)) => {
            Value::PackedVector4Array(concat(a, b))
        }
        _ => return None,
    };
    Some(v)
}
