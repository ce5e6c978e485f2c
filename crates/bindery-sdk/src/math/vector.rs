use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use super::{impl_key_compare, Component};

macro_rules! vector_type {
    ($(#[$meta:meta])* $name:ident, $t:ty, [$($field:ident),+]) => {
        $(#[$meta])*
        #[repr(C)]
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
        pub struct $name {
            $(
                #[allow(missing_docs)]
                pub $field: $t,
            )+
        }

        impl $name {
            /// All components zero
            pub const ZERO: Self = Self { $($field: <$t as Component>::ZERO),+ };

            /// Create from components
            pub const fn new($($field: $t),+) -> Self {
                Self { $($field),+ }
            }

            /// All components set to `v`
            pub const fn splat(v: $t) -> Self {
                Self { $($field: v),+ }
            }

            /// Whether every component is zero
            pub fn is_zero(&self) -> bool {
                *self == Self::ZERO
            }

            /// Whether any component is zero (integer division guard)
            pub fn has_zero_component(&self) -> bool {
                false $(|| self.$field == <$t as Component>::ZERO)+
            }
        }

        impl Add for $name {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self { $($field: self.$field.c_add(rhs.$field)),+ }
            }
        }

        impl Sub for $name {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                Self { $($field: self.$field.c_sub(rhs.$field)),+ }
            }
        }

        impl Mul for $name {
            type Output = Self;

            fn mul(self, rhs: Self) -> Self {
                Self { $($field: self.$field.c_mul(rhs.$field)),+ }
            }
        }

        impl Mul<$t> for $name {
            type Output = Self;

            fn mul(self, rhs: $t) -> Self {
                Self { $($field: self.$field.c_mul(rhs)),+ }
            }
        }

        impl Div for $name {
            type Output = Self;

            fn div(self, rhs: Self) -> Self {
                Self { $($field: self.$field.c_div(rhs.$field)),+ }
            }
        }

        impl Div<$t> for $name {
            type Output = Self;

            fn div(self, rhs: $t) -> Self {
                Self { $($field: self.$field.c_div(rhs)),+ }
            }
        }

        impl Neg for $name {
            type Output = Self;

            fn neg(self) -> Self {
                Self { $($field: self.$field.c_neg()),+ }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("(")?;
                for (i, component) in [$(self.$field),+].into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    component.fmt_component(f)?;
                }
                f.write_str(")")
            }
        }

        impl_key_compare!($name { $($field),+ });
    };
}

vector_type!(
    /// 2D vector of reals
    Vector2, f32, [x, y]
);
vector_type!(
    /// 2D vector of integers
    Vector2i, i32, [x, y]
);
vector_type!(
    /// 3D vector of reals
    Vector3, f32, [x, y, z]
);
vector_type!(
    /// 3D vector of integers
    Vector3i, i32, [x, y, z]
);
vector_type!(
    /// 4D vector of reals
    Vector4, f32, [x, y, z, w]
);
vector_type!(
    /// 4D vector of integers
    Vector4i, i32, [x, y, z, w]
);

macro_rules! int_float_conversions {
    ($float:ident, $int:ident, [$($field:ident),+]) => {
        impl From<$float> for $int {
            /// Truncates toward zero, saturating at the `i32` bounds.
            fn from(v: $float) -> Self {
                $int { $($field: v.$field as i32),+ }
            }
        }

        impl From<$int> for $float {
            fn from(v: $int) -> Self {
                $float { $($field: v.$field as f32),+ }
            }
        }
    };
}

int_float_conversions!(Vector2, Vector2i, [x, y]);
int_float_conversions!(Vector3, Vector3i, [x, y, z]);
int_float_conversions!(Vector4, Vector4i, [x, y, z, w]);

impl Vector2 {
    /// Dot product
    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y
    }

    /// Euclidean length
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }
}

impl Vector3 {
    /// Unit X axis
    pub const RIGHT: Vector3 = Vector3::new(1.0, 0.0, 0.0);
    /// Unit Y axis
    pub const UP: Vector3 = Vector3::new(0.0, 1.0, 0.0);
    /// Unit Z axis
    pub const BACK: Vector3 = Vector3::new(0.0, 0.0, 1.0);

    /// Dot product
    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Cross product
    pub fn cross(self, rhs: Self) -> Self {
        Vector3::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    /// Euclidean length
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit-length copy (zero stays zero)
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len == 0.0 {
            self
        } else {
            self / len
        }
    }

    /// Component by index (0 = x, 1 = y, 2 = z)
    pub fn get(self, axis: usize) -> f32 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }
}

impl Vector4 {
    /// Dot product
    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z + self.w * rhs.w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::KeyCompare;

    #[test]
    fn test_vector_arithmetic() {
        let a = Vector2::new(1.0, 2.0);
        let b = Vector2::new(3.0, 4.0);
        assert_eq!(a + b, Vector2::new(4.0, 6.0));
        assert_eq!(b - a, Vector2::new(2.0, 2.0));
        assert_eq!(a * 2.0, Vector2::new(2.0, 4.0));
        assert_eq!(-a, Vector2::new(-1.0, -2.0));
        assert_eq!(a.dot(b), 11.0);
    }

    #[test]
    fn test_lexicographic_order() {
        assert!(Vector3i::new(1, 5, 0) < Vector3i::new(2, 0, 0));
        assert!(Vector3i::new(1, 0, 0) < Vector3i::new(1, 0, 1));
    }

    #[test]
    fn test_float_to_int_truncates() {
        let v = Vector2i::from(Vector2::new(1.9, -1.9));
        assert_eq!(v, Vector2i::new(1, -1));
        assert_eq!(Vector2::from(v), Vector2::new(1.0, -1.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Vector2::new(1.0, 2.5).to_string(), "(1.0, 2.5)");
        assert_eq!(Vector4i::new(1, 2, 3, 4).to_string(), "(1, 2, 3, 4)");
    }

    #[test]
    fn test_cross_product() {
        assert_eq!(Vector3::RIGHT.cross(Vector3::UP), Vector3::BACK);
    }

    #[test]
    fn test_key_compare_nan() {
        let a = Vector2::new(f32::NAN, 0.0);
        let b = Vector2::new(f32::NAN, -0.0);
        assert!(a.key_eq(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_component_guard() {
        assert!(Vector2i::new(3, 0).has_zero_component());
        assert!(!Vector2i::new(3, 1).has_zero_component());
    }
}
