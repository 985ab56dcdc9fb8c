use std::{
    fmt,
    ops::{Add, AddAssign, Div, Index, IndexMut, Mul, Neg, Sub},
};

pub fn vec3(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, y, z)
}

pub fn point3(x: f32, y: f32, z: f32) -> Point3 {
    Point3::new(x, y, z)
}

/// Represents a 3D vector. Each component is a `f32` number.
/// Components can be accessed using `v.x` `v.y` `v.z`,
/// or indices `v[i]` where i is 0, 1, or 2.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(2);
        write!(
            f,
            "({:.p$}, {:.p$}, {:.p$})",
            self.x,
            self.y,
            self.z,
            p = precision
        )
    }
}
impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(2);
        write!(
            f,
            "[{:.p$}, {:.p$}, {:.p$}]",
            self.x,
            self.y,
            self.z,
            p = precision
        )
    }
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Vec3 {
        Vec3 { x, y, z }
    }
    pub const X: Vec3 = Self::new(1.0, 0.0, 0.0);
    pub const Y: Vec3 = Self::new(0.0, 1.0, 0.0);
    pub const Z: Vec3 = Self::new(0.0, 0.0, 1.0);
    pub const ZERO: Vec3 = Self::new(0.0, 0.0, 0.0);

    pub fn dot(self, v: Vec3) -> f32 {
        self.x * v.x + self.y * v.y + self.z * v.z
    }
    pub fn cross(self, v: Vec3) -> Vec3 {
        // x1 y1 z1
        // x2 y2 z2
        // i  j  k
        Vec3::new(
            self.y * v.z - self.z * v.y,
            self.z * v.x - self.x * v.z,
            self.x * v.y - self.y * v.x,
        )
    }

    pub fn norm_squared(self) -> f32 {
        self.dot(self)
    }
    pub fn norm(self) -> f32 {
        f32::sqrt(self.norm_squared())
    }

    /// Returns a normalized (unit-length) `self` vector.
    /// Panics if the vector length is zero, NaN or infinite.
    pub fn hat(self) -> Vec3 {
        let norm2 = self.norm_squared();
        assert!(norm2 != 0.0 && norm2.is_finite());
        let inv_sqrt = 1.0 / self.norm();
        self * inv_sqrt
    }
    pub fn try_hat(self) -> Option<Self> {
        let inv_length = 1.0 / self.norm();
        (inv_length.is_finite() && inv_length != 0.0).then(|| inv_length * self)
    }

    // Returns the index to the element with minimum magnitude.
    pub fn abs_min_dimension(self) -> usize {
        let abs = [self.x.abs(), self.y.abs(), self.z.abs()];
        let res = if abs[0] < abs[1] { 0 } else { 1 };
        if abs[res] < abs[2] {
            res
        } else {
            2
        }
    }

    pub fn max_dimension(self) -> usize {
        let res = if self.x > self.y { 0 } else { 1 };
        if self[2] > self[res] {
            2
        } else {
            res
        }
    }

    /// Rotates `self` around a principal axis (0 = x, 1 = y, 2 = z) and returns
    /// the rotated vector. Panics on any other axis index.
    pub fn rotated(self, angle: crate::Angle, axis: usize) -> Vec3 {
        let (sin, cos) = angle.sin_cos();
        let Vec3 { x, y, z } = self;
        match axis {
            0 => Vec3::new(x, y * cos - z * sin, y * sin + z * cos),
            1 => Vec3::new(x * cos + z * sin, y, -x * sin + z * cos),
            2 => Vec3::new(x * cos - y * sin, x * sin + y * cos, z),
            _ => panic!("axis must be 0 (x), 1 (y), or 2 (z)"),
        }
    }

    pub fn has_nan(self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}
impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
impl Add<Point3> for Vec3 {
    type Output = Point3;
    fn add(self, other: Point3) -> Point3 {
        Point3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}
impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}
impl Index<usize> for Vec3 {
    type Output = f32;
    fn index(&self, i: usize) -> &f32 {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("invalid index"),
        }
    }
}
impl IndexMut<usize> for Vec3 {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("invalid index"),
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, s: f32) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }
}
impl Mul<Vec3> for f32 {
    type Output = Vec3;
    fn mul(self, v: Vec3) -> Vec3 {
        v * self
    }
}
impl Div<f32> for Vec3 {
    type Output = Self;
    fn div(self, s: f32) -> Vec3 {
        Vec3::new(self.x / s, self.y / s, self.z / s)
    }
}

// Implementation of Points
impl Point3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Point3 {
        Point3 { x, y, z }
    }
    pub const ORIGIN: Point3 = Point3::new(0.0, 0.0, 0.0);

    pub fn distance_to(self, p: Self) -> f32 {
        (self - p).norm()
    }
    pub fn squared_distance_to(self, p: Self) -> f32 {
        (self - p).norm_squared()
    }
    pub fn has_nan(self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
}

impl Add<Vec3> for Point3 {
    type Output = Point3;
    fn add(self, v: Vec3) -> Point3 {
        Point3::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }
}

impl Sub for Point3 {
    type Output = Vec3;
    fn sub(self, from: Point3) -> Vec3 {
        Vec3::new(self.x - from.x, self.y - from.y, self.z - from.z)
    }
}
impl Sub<Vec3> for Point3 {
    type Output = Point3;
    fn sub(self, t: Vec3) -> Point3 {
        Point3::new(self.x - t.x, self.y - t.y, self.z - t.z)
    }
}
impl Index<usize> for Point3 {
    type Output = f32;
    fn index(&self, i: usize) -> &f32 {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("invalid index"),
        }
    }
}
impl IndexMut<usize> for Point3 {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("invalid index"),
        }
    }
}

// Explicit conversion between Vec3 and Point3.
// -------------------------------------------------------------------------------------------------
impl From<Vec3> for Point3 {
    fn from(v: Vec3) -> Self {
        Point3::new(v.x, v.y, v.z)
    }
}

impl From<Point3> for Vec3 {
    fn from(p: Point3) -> Self {
        Vec3::new(p.x, p.y, p.z)
    }
}

/// Computes a pair of unit-vectors that forms an orthonormal basis with `v`
/// (assumed unit-length). The first basis vector is built by zeroing the
/// component of `v` with the smallest magnitude and swapping/negating the other
/// two, which keeps the construction well-conditioned for any input.
pub fn make_coord_system(v: Vec3) -> (Vec3, Vec3) {
    let i0 = v.abs_min_dimension();
    let (i1, i2) = ((i0 + 1) % 3, (i0 + 2) % 3);
    let mut v1 = Vec3::ZERO;
    // v = [x, y, z] -> [x, 0, z], v1 = [-z, 0, x]
    v1[i1] = v[i2];
    v1[i2] = -v[i1];
    assert!(v1.dot(v).abs() < 1e-6);
    let v2 = v.cross(v1);
    (v1.hat(), v2.hat())
}

/// Reflects the incident direction `d` about `normal`: `d - 2(d.n)n`.
/// The incident direction points *towards* the surface; the result points away
/// from it on the same side as `-d`. `normal` need not be unit length.
pub fn reflect(normal: Vec3, d: Vec3) -> Vec3 {
    d - 2.0 * d.dot(normal) * normal / normal.norm_squared()
}

pub enum Refract {
    FullReflect(Vec3),
    Transmit(Vec3),
}

pub use Refract::FullReflect;
pub use Refract::Transmit;

/// Refracts the incident direction `d` through a surface with unit `normal`
/// using Snell's law in vector form.
/// - `d` points towards the surface and `normal` against it (`d.n <= 0`).
/// - `ni_over_no` is the ratio of refraction indices (incident medium over
///   transmission medium).
/// When the discriminant under the square root is negative the interface
/// reflects totally and the `FullReflect` variant carries the mirrored
/// direction instead.
pub fn refract(normal: Vec3, d: Vec3, ni_over_no: f32) -> Refract {
    let d = d.hat();
    let cos_theta_i = -d.dot(normal);
    crate::assert_ge!(cos_theta_i, 0.0);
    let sin2_theta_i = (1.0 - cos_theta_i.powi(2)).max(0.0);
    // sin_i * ni = sin_o * no => sin_o = sin_i * ni_over_no
    let sin2_theta_o = sin2_theta_i * ni_over_no.powi(2);
    if sin2_theta_o >= 1.0 {
        FullReflect(reflect(normal, d))
    } else {
        let cos_theta_o = (1.0 - sin2_theta_o).sqrt();
        let refracted = ni_over_no * d + (ni_over_no * cos_theta_i - cos_theta_o) * normal;
        Transmit(refracted)
    }
}

#[cfg(test)]
mod test {
    use crate::assert_close;
    type Vec3 = super::Vec3;

    #[test]
    fn normalized_vector_is_unit_length() {
        let v = Vec3::new(0.3, -2.0, 5.5).hat();
        assert!((v.norm_squared() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_reflect() {
        let normal = Vec3::Y;
        let d = Vec3::new(2.0, -1.0, 0.5);
        let expected = Vec3::new(2.0, 1.0, 0.5);
        let reflected = super::reflect(normal, d);
        assert!((reflected - expected).norm_squared() < f32::EPSILON);
    }

    #[test]
    fn reflect_twice_restores_direction() {
        let normal = Vec3::new(0.3, 0.8, -0.1).hat();
        let d = Vec3::new(0.7, -0.6, 0.2).hat();
        let back = super::reflect(-normal, super::reflect(normal, d));
        assert_close!(back, d);
    }

    #[test]
    fn test_refract() {
        let normal = Vec3::Y;
        let d = Vec3::new(1.0, -1.0, 0.0).hat();
        let expected = Vec3::new(0.5, -0.5 * 3.0f32.sqrt(), 0.0);
        match super::refract(normal, d, 0.5f32.sqrt()) {
            super::FullReflect(_) => panic!("should transmit"),
            super::Transmit(v) => {
                assert!((expected - v).norm_squared() < f32::EPSILON, "{} vs {}", v, expected)
            }
        }

        // The critical angle for a "glass"-to-air ratio of 2.0 is 30 degrees.
        // One incident direction right beyond it is (0.51, -sqrt(0.75), 0).
        let blocked = Vec3::new(0.51, -(0.75f32.sqrt()), 0.0).hat();
        let passing = Vec3::new(0.49, -(0.75f32.sqrt()), 0.0).hat();
        assert!(matches!(
            super::refract(normal, blocked, 2.0),
            super::FullReflect(_)
        ));
        assert!(matches!(
            super::refract(normal, passing, 2.0),
            super::Transmit(_)
        ));
    }

    #[test]
    fn rotation_about_principal_axes() {
        let quarter = crate::new_deg(90.0);
        assert_close!(Vec3::X.rotated(quarter, 2), Vec3::Y);
        assert_close!(Vec3::Y.rotated(quarter, 0), Vec3::Z);
        assert_close!(Vec3::Z.rotated(quarter, 1), Vec3::X);
    }

    #[test]
    fn coord_system_is_orthonormal() {
        let v0 = Vec3::new(0.3, 0.4, -0.6).hat();
        let (v1, v2) = super::make_coord_system(v0);
        assert!(v0.dot(v1).abs() < 1e-6);
        assert!(v0.dot(v2).abs() < 1e-6);
        assert!(v1.dot(v2).abs() < 1e-6);
        assert!((v1.norm_squared() - 1.0).abs() < 1e-6);
        assert!((v2.norm_squared() - 1.0).abs() < 1e-6);
    }
}
