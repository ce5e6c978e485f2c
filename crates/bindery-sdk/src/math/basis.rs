use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use super::{fmt_real, impl_key_compare, is_equal_approx, KeyCompare, Vector3};

/// Rotation quaternion
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    #[allow(missing_docs)]
    pub x: f32,
    #[allow(missing_docs)]
    pub y: f32,
    #[allow(missing_docs)]
    pub z: f32,
    #[allow(missing_docs)]
    pub w: f32,
}

impl Quaternion {
    /// No rotation
    pub const IDENTITY: Quaternion = Quaternion::new(0.0, 0.0, 0.0, 1.0);

    /// Create from components
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle` radians around a unit `axis`
    pub fn from_axis_angle(axis: Vector3, angle: f32) -> Self {
        let (s, c) = (angle * 0.5).sin_cos();
        Quaternion::new(axis.x * s, axis.y * s, axis.z * s, c)
    }

    /// Squared length
    pub fn length_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }

    /// Length
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Unit-length copy
    pub fn normalized(&self) -> Self {
        let len = self.length();
        if len == 0.0 {
            *self
        } else {
            Quaternion::new(self.x / len, self.y / len, self.z / len, self.w / len)
        }
    }

    /// Rotate a vector
    pub fn xform(&self, v: Vector3) -> Vector3 {
        let u = Vector3::new(self.x, self.y, self.z);
        let uv = u.cross(v);
        v + ((uv * self.w) + u.cross(uv)) * 2.0
    }

    /// Component-wise approximate equality
    pub fn is_equal_approx(&self, other: &Quaternion) -> bool {
        is_equal_approx(self.x, other.x)
            && is_equal_approx(self.y, other.y)
            && is_equal_approx(self.z, other.z)
            && is_equal_approx(self.w, other.w)
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Quaternion::IDENTITY
    }
}

impl Add for Quaternion {
    type Output = Self;

    fn add(self, q: Self) -> Self {
        Quaternion::new(self.x + q.x, self.y + q.y, self.z + q.z, self.w + q.w)
    }
}

impl Sub for Quaternion {
    type Output = Self;

    fn sub(self, q: Self) -> Self {
        Quaternion::new(self.x - q.x, self.y - q.y, self.z - q.z, self.w - q.w)
    }
}

impl Neg for Quaternion {
    type Output = Self;

    fn neg(self) -> Self {
        Quaternion::new(-self.x, -self.y, -self.z, -self.w)
    }
}

impl Mul for Quaternion {
    type Output = Self;

    /// Hamilton product: applies `q` first, then `self`.
    fn mul(self, q: Self) -> Self {
        Quaternion::new(
            self.w * q.x + self.x * q.w + self.y * q.z - self.z * q.y,
            self.w * q.y + self.y * q.w + self.z * q.x - self.x * q.z,
            self.w * q.z + self.z * q.w + self.x * q.y - self.y * q.x,
            self.w * q.w - self.x * q.x - self.y * q.y - self.z * q.z,
        )
    }
}

impl Mul<f32> for Quaternion {
    type Output = Self;

    fn mul(self, s: f32) -> Self {
        Quaternion::new(self.x * s, self.y * s, self.z * s, self.w * s)
    }
}

impl From<Basis> for Quaternion {
    fn from(basis: Basis) -> Self {
        let m = &basis.rows;
        let r = |i: usize, j: usize| m[i].get(j);
        let trace = r(0, 0) + r(1, 1) + r(2, 2);
        let mut temp = [0.0f32; 4];

        if trace > 0.0 {
            let mut s = (trace + 1.0).sqrt();
            temp[3] = s * 0.5;
            s = 0.5 / s;
            temp[0] = (r(2, 1) - r(1, 2)) * s;
            temp[1] = (r(0, 2) - r(2, 0)) * s;
            temp[2] = (r(1, 0) - r(0, 1)) * s;
        } else {
            let i = if r(0, 0) < r(1, 1) {
                if r(1, 1) < r(2, 2) {
                    2
                } else {
                    1
                }
            } else if r(0, 0) < r(2, 2) {
                2
            } else {
                0
            };
            let j = (i + 1) % 3;
            let k = (i + 2) % 3;

            let mut s = (r(i, i) - r(j, j) - r(k, k) + 1.0).sqrt();
            temp[i] = s * 0.5;
            s = 0.5 / s;
            temp[3] = (r(k, j) - r(j, k)) * s;
            temp[j] = (r(j, i) + r(i, j)) * s;
            temp[k] = (r(k, i) + r(i, k)) * s;
        }

        Quaternion::new(temp[0], temp[1], temp[2], temp[3])
    }
}

/// 3x3 matrix stored as rows
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    /// Matrix rows
    pub rows: [Vector3; 3],
}

impl Basis {
    /// Identity matrix
    pub const IDENTITY: Basis = Basis {
        rows: [Vector3::RIGHT, Vector3::UP, Vector3::BACK],
    };

    /// Create from rows
    pub const fn from_rows(x: Vector3, y: Vector3, z: Vector3) -> Self {
        Basis { rows: [x, y, z] }
    }

    /// Column `i` as a vector
    pub fn column(&self, i: usize) -> Vector3 {
        Vector3::new(self.rows[0].get(i), self.rows[1].get(i), self.rows[2].get(i))
    }

    /// Transposed copy
    pub fn transposed(&self) -> Basis {
        Basis::from_rows(self.column(0), self.column(1), self.column(2))
    }

    /// Determinant
    pub fn determinant(&self) -> f32 {
        self.rows[0].dot(self.rows[1].cross(self.rows[2]))
    }

    /// Transform a vector
    pub fn xform(&self, v: Vector3) -> Vector3 {
        Vector3::new(self.rows[0].dot(v), self.rows[1].dot(v), self.rows[2].dot(v))
    }

    /// Element-wise approximate equality
    pub fn is_equal_approx(&self, other: &Basis) -> bool {
        (0..3).all(|i| {
            (0..3).all(|j| is_equal_approx(self.rows[i].get(j), other.rows[i].get(j)))
        })
    }
}

impl Default for Basis {
    fn default() -> Self {
        Basis::IDENTITY
    }
}

impl Mul for Basis {
    type Output = Basis;

    fn mul(self, rhs: Basis) -> Basis {
        let row = |r: Vector3| {
            Vector3::new(r.dot(rhs.column(0)), r.dot(rhs.column(1)), r.dot(rhs.column(2)))
        };
        Basis::from_rows(row(self.rows[0]), row(self.rows[1]), row(self.rows[2]))
    }
}

impl Mul<Vector3> for Basis {
    type Output = Vector3;

    fn mul(self, v: Vector3) -> Vector3 {
        self.xform(v)
    }
}

impl From<Quaternion> for Basis {
    fn from(q: Quaternion) -> Self {
        let d = q.length_squared();
        if d == 0.0 {
            return Basis::IDENTITY;
        }
        let s = 2.0 / d;
        let (xs, ys, zs) = (q.x * s, q.y * s, q.z * s);
        let (wx, wy, wz) = (q.w * xs, q.w * ys, q.w * zs);
        let (xx, xy, xz) = (q.x * xs, q.x * ys, q.x * zs);
        let (yy, yz, zz) = (q.y * ys, q.y * zs, q.z * zs);
        Basis::from_rows(
            Vector3::new(1.0 - (yy + zz), xy - wz, xz + wy),
            Vector3::new(xy + wz, 1.0 - (xx + zz), yz - wx),
            Vector3::new(xz - wy, yz + wx, 1.0 - (xx + yy)),
        )
    }
}

impl_key_compare!(Quaternion { x, y, z, w });

impl KeyCompare for Basis {
    fn key_eq(&self, other: &Self) -> bool {
        self.rows.iter().zip(other.rows.iter()).all(|(a, b)| a.key_eq(b))
    }

    fn key_hash<H: std::hash::Hasher>(&self, state: &mut H) {
        for row in &self.rows {
            row.key_hash(state);
        }
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, c) in [self.x, self.y, self.z, self.w].into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            fmt_real(c as f64, f)?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[X: {}, Y: {}, Z: {}]", self.column(0), self.column(1), self.column(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_identity_roundtrip() {
        let q = Quaternion::from(Basis::IDENTITY);
        assert!(q.is_equal_approx(&Quaternion::IDENTITY));
        assert!(Basis::from(Quaternion::IDENTITY).is_equal_approx(&Basis::IDENTITY));
    }

    #[test]
    fn test_rotation_roundtrip() {
        let q = Quaternion::from_axis_angle(Vector3::UP, FRAC_PI_2);
        let b = Basis::from(q);
        let back = Quaternion::from(b);
        assert!(back.is_equal_approx(&q));
    }

    #[test]
    fn test_basis_and_quaternion_agree() {
        let q = Quaternion::from_axis_angle(Vector3::BACK, FRAC_PI_2);
        let v = Vector3::RIGHT;
        let by_quat = q.xform(v);
        let by_basis = Basis::from(q).xform(v);
        assert!((by_quat - by_basis).length() < 1e-5);
        assert!((by_quat - Vector3::UP).length() < 1e-5);
    }

    #[test]
    fn test_basis_product_with_identity() {
        let b = Basis::from(Quaternion::from_axis_angle(Vector3::RIGHT, 0.3));
        assert!((b * Basis::IDENTITY).is_equal_approx(&b));
        assert!((b.determinant() - 1.0).abs() < 1e-5);
    }
}
