use bindery_sdk::{
    Array, BoundType, Dictionary, Operator, PackedInt32Array, StringName, Value, ValueKind,
    Vector2i,
};

// ============================================================================
// Conversion
// ============================================================================

#[test]
fn test_every_kind_converts_to_itself() {
    for kind in ValueKind::ALL {
        let v = Value::default_for(kind);
        assert_eq!(v.kind(), kind);
        assert_eq!(v.convert_to(kind), Ok(v.clone()), "kind {:?}", kind);
        assert_eq!(v.convert_strict(kind), (v.clone(), true));
    }
}

#[test]
fn test_lossy_conversion_needs_permissive_table() {
    let v = Value::Float(2.75);
    assert!(v.can_convert(ValueKind::Int));
    assert!(!v.can_convert_strict(ValueKind::Int));
    assert_eq!(v.convert(ValueKind::Int), Value::Int(2));
    assert!(i32::from_value(&v).is_err());
}

#[test]
fn test_soft_conversion_falls_back_to_default() {
    let v = Value::from(Vector2i::new(1, 2));
    assert_eq!(v.convert(ValueKind::Color), Value::default_for(ValueKind::Color));
    assert_eq!(Value::from("nope").convert(ValueKind::Int), Value::Int(0));
}

// ============================================================================
// Copy-on-write
// ============================================================================

#[test]
fn test_converting_shared_array_leaves_other_copy() {
    let mut array = Array::new();
    array.push(1);
    array.push("two");
    let a = Value::from(array);
    let b = a.clone();

    let s = b.convert(ValueKind::String);
    assert_eq!(s.kind(), ValueKind::String);
    assert_eq!(a, b);
    assert_eq!(a.as_array().map(|x| x.len()), Some(2));
}

#[test]
fn test_mutating_clone_never_touches_source() {
    let mut dict = Dictionary::new();
    dict.insert("hp", 10);
    let source = Value::from(dict);

    let mut copy = source.clone();
    if let Value::Dictionary(d) = &mut copy {
        d.insert("hp", 0);
        d.insert("mp", 5);
    }
    let original = source.as_dictionary().map(|d| d.get(&Value::from("hp")).cloned());
    assert_eq!(original, Some(Some(Value::Int(10))));
    assert_ne!(source, copy);

    let mut packed = PackedInt32Array::new();
    packed.push(7);
    let shared = packed.clone();
    assert!(packed.ptr_eq(&shared));
    packed.set(0, 8);
    assert!(!packed.ptr_eq(&shared));
    assert_eq!(shared.get(0), Some(&7));
}

#[test]
fn test_take_leaves_nil() {
    let mut v = Value::from(StringName::new("moved"));
    let taken = v.take();
    assert!(v.is_nil());
    assert_eq!(taken.kind(), ValueKind::StringName);
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_evaluate_membership_and_arithmetic() {
    let array = Value::from(vec![Value::Int(1), Value::Int(2)]);
    assert_eq!(
        Value::evaluate(Operator::In, &Value::Int(2), &array),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        Value::evaluate(Operator::Add, &Value::Int(2), &Value::Float(0.5)),
        Ok(Value::Float(2.5))
    );
    assert!(Value::evaluate(Operator::Divide, &Value::Int(1), &Value::Int(0)).is_err());
    assert_eq!(
        Value::evaluate(Operator::Equal, &Value::Int(1), &Value::from("1")),
        Ok(Value::Bool(false))
    );
}
