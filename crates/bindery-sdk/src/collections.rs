//! Copy-on-write collections
//!
//! `Array`, `Dictionary` and the packed arrays are `Arc`-backed. Cloning shares
//! the storage; every mutator goes through `Arc::make_mut`, so a shared backing
//! store is copied before the first write and callers never observe shared
//! mutation.

use std::fmt;
use std::hash::{BuildHasherDefault, Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHasher;

use crate::kind::ValueKind;
use crate::math::{Color, KeyCompare, Vector2, Vector3, Vector4};
use crate::string_name::GString;
use crate::value::{fmt_element, Value};

type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

// ============================================================================
// Array
// ============================================================================

/// Heterogeneous array of values.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Array(Arc<Vec<Value>>);

impl Array {
    /// Create an empty array
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the array is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Element at `index`
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// Borrow the elements
    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    /// Iterate the elements
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    /// Append an element
    pub fn push(&mut self, value: impl Into<Value>) {
        self.make_mut().push(value.into());
    }

    /// Remove and return the last element
    pub fn pop(&mut self) -> Option<Value> {
        if self.0.is_empty() {
            return None;
        }
        self.make_mut().pop()
    }

    /// Replace the element at `index`. Returns false when out of range.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> bool {
        if index >= self.0.len() {
            return false;
        }
        self.make_mut()[index] = value.into();
        true
    }

    /// Insert at `index`, shifting later elements. Returns false when out of range.
    pub fn insert(&mut self, index: usize, value: impl Into<Value>) -> bool {
        if index > self.0.len() {
            return false;
        }
        self.make_mut().insert(index, value.into());
        true
    }

    /// Remove the element at `index`
    pub fn remove(&mut self, index: usize) -> Option<Value> {
        if index >= self.0.len() {
            return None;
        }
        Some(self.make_mut().remove(index))
    }

    /// Whether any element equals `value` (key semantics)
    pub fn contains(&self, value: &Value) -> bool {
        self.0.iter().any(|v| v == value)
    }

    /// Append every element of `other`
    pub fn extend_from(&mut self, other: &Array) {
        if other.is_empty() {
            return;
        }
        self.make_mut().extend(other.iter().cloned());
    }

    /// Mutable access to the elements. Copies shared storage first.
    pub fn make_mut(&mut self) -> &mut Vec<Value> {
        Arc::make_mut(&mut self.0)
    }

    /// Whether both arrays share storage
    pub fn ptr_eq(&self, other: &Array) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Copy into fresh storage. A deep copy also duplicates nested collections.
    pub fn duplicate(&self, deep: bool) -> Array {
        let items = if deep {
            self.0.iter().map(duplicate_value).collect()
        } else {
            self.0.as_ref().clone()
        };
        Array(Arc::new(items))
    }
}

impl From<Vec<Value>> for Array {
    fn from(items: Vec<Value>) -> Self {
        Array(Arc::new(items))
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Array(Arc::new(iter.into_iter().collect()))
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            fmt_element(v, f)?;
        }
        f.write_str("]")
    }
}

// ============================================================================
// Dictionary
// ============================================================================

/// Insertion-ordered map from values to values.
#[derive(Clone, Default)]
pub struct Dictionary(Arc<FxIndexMap<Value, Value>>);

impl Dictionary {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the dictionary is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value stored under `key`
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether `key` is present
    pub fn contains_key(&self, key: &Value) -> bool {
        self.0.contains_key(key)
    }

    /// Insert or replace. Returns the previous value.
    pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> Option<Value> {
        self.make_mut().insert(key.into(), value.into())
    }

    /// Remove `key`, keeping the order of the remaining entries
    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        if !self.0.contains_key(key) {
            return None;
        }
        self.make_mut().shift_remove(key)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.0.keys()
    }

    /// Values in insertion order
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.values()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.0.iter()
    }

    /// Copy entries from `other`. Existing keys are replaced only when `overwrite` is set.
    pub fn merge(&mut self, other: &Dictionary, overwrite: bool) {
        let map = self.make_mut();
        for (k, v) in other.iter() {
            if overwrite || !map.contains_key(k) {
                map.insert(k.clone(), v.clone());
            }
        }
    }

    /// Mutable access to the map. Copies shared storage first.
    pub fn make_mut(&mut self) -> &mut FxIndexMap<Value, Value> {
        Arc::make_mut(&mut self.0)
    }

    /// Whether both dictionaries share storage
    pub fn ptr_eq(&self, other: &Dictionary) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Copy into fresh storage. A deep copy also duplicates nested collections.
    pub fn duplicate(&self, deep: bool) -> Dictionary {
        let map = if deep {
            self.0
                .iter()
                .map(|(k, v)| (duplicate_value(k), duplicate_value(v)))
                .collect()
        } else {
            self.0.as_ref().clone()
        };
        Dictionary(Arc::new(map))
    }
}

impl PartialEq for Dictionary {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0 == *other.0
    }
}

impl Eq for Dictionary {}

impl Hash for Dictionary {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Order-independent, matching `PartialEq`.
        let mut sum: u64 = 0;
        for (k, v) in self.0.iter() {
            let mut h = FxHasher::default();
            k.hash(&mut h);
            v.hash(&mut h);
            sum = sum.wrapping_add(h.finish());
        }
        state.write_usize(self.0.len());
        state.write_u64(sum);
    }
}

impl FromIterator<(Value, Value)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        Dictionary(Arc::new(iter.into_iter().collect()))
    }
}

impl fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("{}");
        }
        f.write_str("{ ")?;
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            fmt_element(k, f)?;
            f.write_str(": ")?;
            fmt_element(v, f)?;
        }
        f.write_str(" }")
    }
}

fn duplicate_value(value: &Value) -> Value {
    match value {
        Value::Array(a) => Value::Array(a.duplicate(true)),
        Value::Dictionary(d) => Value::Dictionary(d.duplicate(true)),
        other => other.clone(),
    }
}

// ============================================================================
// Packed arrays
// ============================================================================

/// Element type of a packed array.
pub trait PackedElement: Clone + Default + KeyCompare + fmt::Debug + Send + Sync + 'static {
    /// Kind of the packed array holding this element
    const ARRAY_KIND: ValueKind;
    /// Kind of a single element as a `Value`
    const ELEMENT_KIND: ValueKind;

    /// Wrap one element
    fn to_value(&self) -> Value;

    /// Unwrap one element, converting softly (unconvertible values become the default)
    fn from_value(value: &Value) -> Self;

    /// Write one element inside a collection listing
    fn fmt_element(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

/// Homogeneous, contiguous array.
#[derive(Clone)]
pub struct PackedArray<T: PackedElement>(Arc<Vec<T>>);

impl<T: PackedElement> PackedArray<T> {
    /// Create an empty array
    pub fn new() -> Self {
        PackedArray(Arc::new(Vec::new()))
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the array is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Element at `index`
    pub fn get(&self, index: usize) -> Option<&T> {
        self.0.get(index)
    }

    /// Borrow the elements
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    /// Iterate the elements
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    /// Append an element
    pub fn push(&mut self, value: T) {
        self.make_mut().push(value);
    }

    /// Replace the element at `index`. Returns false when out of range.
    pub fn set(&mut self, index: usize, value: T) -> bool {
        if index >= self.0.len() {
            return false;
        }
        self.make_mut()[index] = value;
        true
    }

    /// Whether any element equals `value` (key semantics)
    pub fn contains(&self, value: &T) -> bool {
        self.0.iter().any(|v| v.key_eq(value))
    }

    /// Append every element of `other`
    pub fn extend_from(&mut self, other: &PackedArray<T>) {
        if other.is_empty() {
            return;
        }
        self.make_mut().extend_from_slice(other.as_slice());
    }

    /// Mutable access to the elements. Copies shared storage first.
    pub fn make_mut(&mut self) -> &mut Vec<T> {
        Arc::make_mut(&mut self.0)
    }

    /// Whether both arrays share storage
    pub fn ptr_eq(&self, other: &PackedArray<T>) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Copy into fresh storage
    pub fn duplicate(&self) -> PackedArray<T> {
        PackedArray(Arc::new(self.0.as_ref().clone()))
    }

    /// Convert to a heterogeneous array
    pub fn to_array(&self) -> Array {
        self.0.iter().map(T::to_value).collect()
    }

    /// Convert from a heterogeneous array, element by element
    pub fn from_array(array: &Array) -> Self {
        PackedArray(Arc::new(array.iter().map(T::from_value).collect()))
    }
}

impl<T: PackedElement> Default for PackedArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PackedElement> From<Vec<T>> for PackedArray<T> {
    fn from(items: Vec<T>) -> Self {
        PackedArray(Arc::new(items))
    }
}

impl<T: PackedElement> FromIterator<T> for PackedArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        PackedArray(Arc::new(iter.into_iter().collect()))
    }
}

impl<T: PackedElement> PartialEq for PackedArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a.key_eq(b)))
    }
}

impl<T: PackedElement> Eq for PackedArray<T> {}

impl<T: PackedElement> Hash for PackedArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for item in self.iter() {
            item.key_hash(state);
        }
    }
}

impl<T: PackedElement> fmt::Debug for PackedArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl<T: PackedElement> fmt::Display for PackedArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            v.fmt_element(f)?;
        }
        f.write_str("]")
    }
}

impl KeyCompare for u8 {
    fn key_eq(&self, other: &Self) -> bool {
        self == other
    }

    fn key_hash<H: Hasher>(&self, state: &mut H) {
        state.write_u8(*self)
    }
}

impl KeyCompare for i64 {
    fn key_eq(&self, other: &Self) -> bool {
        self == other
    }

    fn key_hash<H: Hasher>(&self, state: &mut H) {
        state.write_i64(*self)
    }
}

impl KeyCompare for GString {
    fn key_eq(&self, other: &Self) -> bool {
        self == other
    }

    fn key_hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state)
    }
}

macro_rules! packed_element {
    ($t:ty, $array:ident, $elem:ident, |$s:ident| $to:expr, $v:ident => $from:expr) => {
        impl PackedElement for $t {
            const ARRAY_KIND: ValueKind = ValueKind::$array;
            const ELEMENT_KIND: ValueKind = ValueKind::$elem;

            fn to_value(&self) -> Value {
                let $s = self;
                $to
            }

            fn from_value(value: &Value) -> Self {
                match value.convert(ValueKind::$elem) {
                    Value::$elem($v) => $from,
                    _ => Self::default(),
                }
            }

            fn fmt_element(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt_element(&self.to_value(), f)
            }
        }
    };
}

packed_element!(u8, PackedByteArray, Int, |s| Value::Int(*s as i64), i => i as u8);
packed_element!(i32, PackedInt32Array, Int, |s| Value::Int(*s as i64), i => i as i32);
packed_element!(i64, PackedInt64Array, Int, |s| Value::Int(*s), i => i);
packed_element!(f32, PackedFloat32Array, Float, |s| Value::Float(*s as f64), x => x as f32);
packed_element!(f64, PackedFloat64Array, Float, |s| Value::Float(*s), x => x);
packed_element!(GString, PackedStringArray, String, |s| Value::String(s.clone()), s => s);
packed_element!(Vector2, PackedVector2Array, Vector2, |s| Value::Vector2(*s), v => v);
packed_element!(Vector3, PackedVector3Array, Vector3, |s| Value::Vector3(*s), v => v);
packed_element!(Color, PackedColorArray, Color, |s| Value::Color(*s), c => c);
packed_element!(Vector4, PackedVector4Array, Vector4, |s| Value::Vector4(*s), v => v);

/// Packed `u8` array
pub type PackedByteArray = PackedArray<u8>;
/// Packed `i32` array
pub type PackedInt32Array = PackedArray<i32>;
/// Packed `i64` array
pub type PackedInt64Array = PackedArray<i64>;
/// Packed `f32` array
pub type PackedFloat32Array = PackedArray<f32>;
/// Packed `f64` array
pub type PackedFloat64Array = PackedArray<f64>;
/// Packed string array
pub type PackedStringArray = PackedArray<GString>;
/// Packed `Vector2` array
pub type PackedVector2Array = PackedArray<Vector2>;
/// Packed `Vector3` array
pub type PackedVector3Array = PackedArray<Vector3>;
/// Packed `Color` array
pub type PackedColorArray = PackedArray<Color>;
/// Packed `Vector4` array
pub type PackedVector4Array = PackedArray<Vector4>;
