//! Math value types
//!
//! Plain `#[repr(C)]` structs with `f32` ("real") or `i32` components. They are
//! stored inline in `Value` when small and boxed when large.

mod basis;
mod color;
mod rect;
mod transform;
mod vector;

pub use basis::{Basis, Quaternion};
pub use color::Color;
pub use rect::{Aabb, Plane, Rect2, Rect2i};
pub use transform::{Projection, Transform2D, Transform3D};
pub use vector::{Vector2, Vector2i, Vector3, Vector3i, Vector4, Vector4i};

use std::fmt;
use std::hash::Hasher;

/// Key semantics for values used as dictionary keys.
///
/// Floats compare by normalized bits: NaN equals NaN and `-0.0` equals `0.0`.
/// IEEE comparison lives in the operator evaluator instead.
pub trait KeyCompare {
    /// Key equality
    fn key_eq(&self, other: &Self) -> bool;

    /// Feed the key hash
    fn key_hash<H: Hasher>(&self, state: &mut H);
}

pub(crate) fn f32_key_bits(x: f32) -> u32 {
    if x == 0.0 {
        0
    } else if x.is_nan() {
        0x7fc0_0000
    } else {
        x.to_bits()
    }
}

pub(crate) fn f64_key_bits(x: f64) -> u64 {
    if x == 0.0 {
        0
    } else if x.is_nan() {
        0x7ff8_0000_0000_0000
    } else {
        x.to_bits()
    }
}

impl KeyCompare for f32 {
    fn key_eq(&self, other: &Self) -> bool {
        f32_key_bits(*self) == f32_key_bits(*other)
    }

    fn key_hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(f32_key_bits(*self))
    }
}

impl KeyCompare for f64 {
    fn key_eq(&self, other: &Self) -> bool {
        f64_key_bits(*self) == f64_key_bits(*other)
    }

    fn key_hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(f64_key_bits(*self))
    }
}

impl KeyCompare for i32 {
    fn key_eq(&self, other: &Self) -> bool {
        self == other
    }

    fn key_hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(*self)
    }
}

/// Implement `KeyCompare` field by field.
macro_rules! impl_key_compare {
    ($ty:ty { $($field:ident),+ }) => {
        impl $crate::math::KeyCompare for $ty {
            fn key_eq(&self, other: &Self) -> bool {
                true $(&& $crate::math::KeyCompare::key_eq(&self.$field, &other.$field))+
            }

            fn key_hash<H: std::hash::Hasher>(&self, state: &mut H) {
                $($crate::math::KeyCompare::key_hash(&self.$field, state);)+
            }
        }
    };
}
pub(crate) use impl_key_compare;

/// Vector component arithmetic. Integer components wrap instead of panicking.
pub trait Component: Copy + PartialOrd + Default + fmt::Debug + KeyCompare + 'static {
    /// Additive identity
    const ZERO: Self;
    /// Addition
    fn c_add(self, rhs: Self) -> Self;
    /// Subtraction
    fn c_sub(self, rhs: Self) -> Self;
    /// Multiplication
    fn c_mul(self, rhs: Self) -> Self;
    /// Division. Integer callers must rule out zero first.
    fn c_div(self, rhs: Self) -> Self;
    /// Negation
    fn c_neg(self) -> Self;
    /// Write the component for display
    fn fmt_component(self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl Component for f32 {
    const ZERO: Self = 0.0;

    fn c_add(self, rhs: Self) -> Self {
        self + rhs
    }

    fn c_sub(self, rhs: Self) -> Self {
        self - rhs
    }

    fn c_mul(self, rhs: Self) -> Self {
        self * rhs
    }

    fn c_div(self, rhs: Self) -> Self {
        self / rhs
    }

    fn c_neg(self) -> Self {
        -self
    }

    fn fmt_component(self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_real(self as f64, f)
    }
}

impl Component for i32 {
    const ZERO: Self = 0;

    fn c_add(self, rhs: Self) -> Self {
        self.wrapping_add(rhs)
    }

    fn c_sub(self, rhs: Self) -> Self {
        self.wrapping_sub(rhs)
    }

    fn c_mul(self, rhs: Self) -> Self {
        self.wrapping_mul(rhs)
    }

    fn c_div(self, rhs: Self) -> Self {
        self.wrapping_div(rhs)
    }

    fn c_neg(self) -> Self {
        self.wrapping_neg()
    }

    fn fmt_component(self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Format a real number, keeping a trailing `.0` on integral values.
pub fn fmt_real(x: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if x.is_nan() {
        f.write_str("nan")
    } else if x.is_infinite() {
        f.write_str(if x > 0.0 { "inf" } else { "-inf" })
    } else if x.fract() == 0.0 && x.abs() < 1e15 {
        write!(f, "{:.1}", x)
    } else {
        write!(f, "{}", x)
    }
}

/// Tolerance used by approximate comparisons in the math types
pub const CMP_EPSILON: f32 = 0.00001;

/// Approximate float equality
pub fn is_equal_approx(a: f32, b: f32) -> bool {
    if a == b {
        return true;
    }
    let tolerance = (CMP_EPSILON * a.abs()).max(CMP_EPSILON);
    (a - b).abs() < tolerance
}
