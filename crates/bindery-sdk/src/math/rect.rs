use std::fmt;

use super::{fmt_real, impl_key_compare, Vector2, Vector2i, Vector3};

/// Axis-aligned 2D rectangle of reals
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect2 {
    /// Top-left corner
    pub position: Vector2,
    /// Extent
    pub size: Vector2,
}

impl Rect2 {
    /// Create from position and size
    pub const fn new(position: Vector2, size: Vector2) -> Self {
        Self { position, size }
    }

    /// Bottom-right corner
    pub fn end(&self) -> Vector2 {
        self.position + self.size
    }

    /// Whether the point lies inside (end exclusive)
    pub fn has_point(&self, point: Vector2) -> bool {
        let end = self.end();
        point.x >= self.position.x && point.y >= self.position.y && point.x < end.x && point.y < end.y
    }

    /// Area
    pub fn area(&self) -> f32 {
        self.size.x * self.size.y
    }
}

/// Axis-aligned 2D rectangle of integers
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect2i {
    /// Top-left corner
    pub position: Vector2i,
    /// Extent
    pub size: Vector2i,
}

impl Rect2i {
    /// Create from position and size
    pub const fn new(position: Vector2i, size: Vector2i) -> Self {
        Self { position, size }
    }

    /// Bottom-right corner
    pub fn end(&self) -> Vector2i {
        self.position + self.size
    }

    /// Whether the point lies inside (end exclusive)
    pub fn has_point(&self, point: Vector2i) -> bool {
        let end = self.end();
        point.x >= self.position.x && point.y >= self.position.y && point.x < end.x && point.y < end.y
    }
}

impl From<Rect2> for Rect2i {
    fn from(r: Rect2) -> Self {
        Rect2i::new(r.position.into(), r.size.into())
    }
}

impl From<Rect2i> for Rect2 {
    fn from(r: Rect2i) -> Self {
        Rect2::new(r.position.into(), r.size.into())
    }
}

/// Axis-aligned 3D bounding box
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    /// Minimum corner
    pub position: Vector3,
    /// Extent
    pub size: Vector3,
}

impl Aabb {
    /// Create from position and size
    pub const fn new(position: Vector3, size: Vector3) -> Self {
        Self { position, size }
    }

    /// Maximum corner
    pub fn end(&self) -> Vector3 {
        self.position + self.size
    }

    /// Whether the point lies inside (inclusive)
    pub fn has_point(&self, p: Vector3) -> bool {
        let end = self.end();
        p.x >= self.position.x
            && p.y >= self.position.y
            && p.z >= self.position.z
            && p.x <= end.x
            && p.y <= end.y
            && p.z <= end.z
    }

    /// Volume
    pub fn volume(&self) -> f32 {
        self.size.x * self.size.y * self.size.z
    }
}

/// Plane in Hessian normal form: `normal · p = d`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Plane {
    /// Plane normal
    pub normal: Vector3,
    /// Distance from the origin along the normal
    pub d: f32,
}

impl Plane {
    /// Create from a normal and distance
    pub const fn new(normal: Vector3, d: f32) -> Self {
        Self { normal, d }
    }

    /// Signed distance from the plane to a point
    pub fn distance_to(&self, point: Vector3) -> f32 {
        self.normal.dot(point) - self.d
    }
}

impl_key_compare!(Rect2 { position, size });
impl_key_compare!(Rect2i { position, size });
impl_key_compare!(Aabb { position, size });
impl_key_compare!(Plane { normal, d });

impl fmt::Display for Rect2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[P: {}, S: {}]", self.position, self.size)
    }
}

impl fmt::Display for Rect2i {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[P: {}, S: {}]", self.position, self.size)
    }
}

impl fmt::Display for Aabb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[P: {}, S: {}]", self.position, self.size)
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[N: {}, D: ", self.normal)?;
        fmt_real(self.d as f64, f)?;
        f.write_str("]")
    }
}
