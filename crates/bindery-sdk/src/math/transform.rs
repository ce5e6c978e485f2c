use std::fmt;
use std::ops::Mul;

use super::{Basis, KeyCompare, Quaternion, Vector2, Vector3, Vector4};

/// 2D affine transform stored as three columns: x axis, y axis, origin
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    /// Columns: x, y, origin
    pub columns: [Vector2; 3],
}

impl Transform2D {
    /// Identity transform
    pub const IDENTITY: Transform2D = Transform2D {
        columns: [Vector2::new(1.0, 0.0), Vector2::new(0.0, 1.0), Vector2::ZERO],
    };

    /// Create from axes and origin
    pub const fn from_columns(x: Vector2, y: Vector2, origin: Vector2) -> Self {
        Transform2D { columns: [x, y, origin] }
    }

    /// Translation part
    pub fn origin(&self) -> Vector2 {
        self.columns[2]
    }

    /// Transform a point
    pub fn xform(&self, v: Vector2) -> Vector2 {
        self.columns[0] * v.x + self.columns[1] * v.y + self.columns[2]
    }

    /// Transform a direction (ignores the origin)
    fn basis_xform(&self, v: Vector2) -> Vector2 {
        self.columns[0] * v.x + self.columns[1] * v.y
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Transform2D::IDENTITY
    }
}

impl Mul for Transform2D {
    type Output = Transform2D;

    fn mul(self, rhs: Transform2D) -> Transform2D {
        Transform2D::from_columns(
            self.basis_xform(rhs.columns[0]),
            self.basis_xform(rhs.columns[1]),
            self.xform(rhs.columns[2]),
        )
    }
}

impl Mul<Vector2> for Transform2D {
    type Output = Vector2;

    fn mul(self, v: Vector2) -> Vector2 {
        self.xform(v)
    }
}

impl From<Transform3D> for Transform2D {
    /// Keeps the XY part of the basis and the XY of the origin.
    fn from(t: Transform3D) -> Self {
        let r = &t.basis.rows;
        Transform2D::from_columns(
            Vector2::new(r[0].x, r[1].x),
            Vector2::new(r[0].y, r[1].y),
            Vector2::new(t.origin.x, t.origin.y),
        )
    }
}

/// 3D affine transform
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform3D {
    /// Rotation/scale part
    pub basis: Basis,
    /// Translation part
    pub origin: Vector3,
}

impl Transform3D {
    /// Identity transform
    pub const IDENTITY: Transform3D = Transform3D {
        basis: Basis::IDENTITY,
        origin: Vector3::ZERO,
    };

    /// Create from basis and origin
    pub const fn new(basis: Basis, origin: Vector3) -> Self {
        Transform3D { basis, origin }
    }

    /// Transform a point
    pub fn xform(&self, v: Vector3) -> Vector3 {
        self.basis.xform(v) + self.origin
    }
}

impl Mul for Transform3D {
    type Output = Transform3D;

    fn mul(self, rhs: Transform3D) -> Transform3D {
        Transform3D::new(self.basis * rhs.basis, self.xform(rhs.origin))
    }
}

impl Mul<Vector3> for Transform3D {
    type Output = Vector3;

    fn mul(self, v: Vector3) -> Vector3 {
        self.xform(v)
    }
}

impl From<Transform2D> for Transform3D {
    fn from(t: Transform2D) -> Self {
        let [x, y, origin] = t.columns;
        let basis = Basis::from_rows(
            Vector3::new(x.x, y.x, 0.0),
            Vector3::new(x.y, y.y, 0.0),
            Vector3::BACK,
        );
        Transform3D::new(basis, Vector3::new(origin.x, origin.y, 0.0))
    }
}

impl From<Basis> for Transform3D {
    fn from(basis: Basis) -> Self {
        Transform3D::new(basis, Vector3::ZERO)
    }
}

impl From<Quaternion> for Transform3D {
    fn from(q: Quaternion) -> Self {
        Transform3D::new(Basis::from(q), Vector3::ZERO)
    }
}

impl From<Projection> for Transform3D {
    /// Drops the projective row.
    fn from(p: Projection) -> Self {
        let c = &p.columns;
        let basis = Basis::from_rows(
            Vector3::new(c[0].x, c[1].x, c[2].x),
            Vector3::new(c[0].y, c[1].y, c[2].y),
            Vector3::new(c[0].z, c[1].z, c[2].z),
        );
        Transform3D::new(basis, Vector3::new(c[3].x, c[3].y, c[3].z))
    }
}

/// 4x4 matrix stored as columns
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Matrix columns
    pub columns: [Vector4; 4],
}

impl Projection {
    /// Identity matrix
    pub const IDENTITY: Projection = Projection {
        columns: [
            Vector4::new(1.0, 0.0, 0.0, 0.0),
            Vector4::new(0.0, 1.0, 0.0, 0.0),
            Vector4::new(0.0, 0.0, 1.0, 0.0),
            Vector4::new(0.0, 0.0, 0.0, 1.0),
        ],
    };

    /// Create from columns
    pub const fn from_columns(x: Vector4, y: Vector4, z: Vector4, w: Vector4) -> Self {
        Projection { columns: [x, y, z, w] }
    }
}

impl Default for Projection {
    fn default() -> Self {
        Projection::IDENTITY
    }
}

impl From<Transform3D> for Projection {
    fn from(t: Transform3D) -> Self {
        let r = &t.basis.rows;
        Projection::from_columns(
            Vector4::new(r[0].x, r[1].x, r[2].x, 0.0),
            Vector4::new(r[0].y, r[1].y, r[2].y, 0.0),
            Vector4::new(r[0].z, r[1].z, r[2].z, 0.0),
            Vector4::new(t.origin.x, t.origin.y, t.origin.z, 1.0),
        )
    }
}

impl KeyCompare for Transform2D {
    fn key_eq(&self, other: &Self) -> bool {
        self.columns.iter().zip(other.columns.iter()).all(|(a, b)| a.key_eq(b))
    }

    fn key_hash<H: std::hash::Hasher>(&self, state: &mut H) {
        for c in &self.columns {
            c.key_hash(state);
        }
    }
}

impl KeyCompare for Transform3D {
    fn key_eq(&self, other: &Self) -> bool {
        self.basis.key_eq(&other.basis) && self.origin.key_eq(&other.origin)
    }

    fn key_hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.basis.key_hash(state);
        self.origin.key_hash(state);
    }
}

impl KeyCompare for Projection {
    fn key_eq(&self, other: &Self) -> bool {
        self.columns.iter().zip(other.columns.iter()).all(|(a, b)| a.key_eq(b))
    }

    fn key_hash<H: std::hash::Hasher>(&self, state: &mut H) {
        for c in &self.columns {
            c.key_hash(state);
        }
    }
}

impl fmt::Display for Transform2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[X: {}, Y: {}, O: {}]", self.columns[0], self.columns[1], self.columns[2])
    }
}

impl fmt::Display for Transform3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, O: {}]", self.basis, self.origin)
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.columns;
        write!(f, "\n{}\n{}\n{}\n{}\n", c[0], c[1], c[2], c[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_2d() -> Transform2D {
        Transform2D::from_columns(Vector2::new(0.0, 1.0), Vector2::new(-1.0, 0.0), Vector2::new(3.0, 4.0))
    }

    #[test]
    fn test_transform2d_xform() {
        let t = sample_2d();
        assert_eq!(t.xform(Vector2::new(1.0, 0.0)), Vector2::new(3.0, 5.0));
        assert_eq!(Transform2D::IDENTITY * t, t);
    }

    #[test]
    fn test_2d_3d_roundtrip() {
        let t = sample_2d();
        let t3 = Transform3D::from(t);
        assert_eq!(Transform2D::from(t3), t);
        assert_eq!(t3.xform(Vector3::new(1.0, 0.0, 0.0)), Vector3::new(3.0, 5.0, 0.0));
    }

    #[test]
    fn test_projection_roundtrip() {
        let t = Transform3D::new(Basis::IDENTITY, Vector3::new(1.0, 2.0, 3.0));
        let p = Projection::from(t);
        assert_eq!(Transform3D::from(p), t);
        assert_eq!(Projection::from(Transform3D::IDENTITY), Projection::IDENTITY);
    }

    #[test]
    fn test_transform3d_compose() {
        let a = Transform3D::new(Basis::IDENTITY, Vector3::new(1.0, 0.0, 0.0));
        let b = Transform3D::new(Basis::IDENTITY, Vector3::new(0.0, 2.0, 0.0));
        assert_eq!((a * b).origin, Vector3::new(1.0, 2.0, 0.0));
    }
}
