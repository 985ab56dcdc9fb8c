use std::fmt::{Debug, Display, Formatter, Result};

use crate::ray::Ray;
use math::{
    float::min_max,
    hcm::{Point3, Vec3},
};

/// 3D axis-aligned bounding box. Once built, `min[i] <= max[i]` on all axes.
/// - Build one from 2 `Point3`s;
/// - Expand it with `b.union()` / `union(b1, b2)`;
/// - Intersect it with a `Ray`, obtaining the entry distance.
#[derive(Debug, Clone, Copy)]
pub struct BBox {
    min: Point3,
    max: Point3,
}

impl BBox {
    /// The identity element of `union`: contains nothing, `min > max` on all
    /// axes until a point is folded in.
    pub fn empty() -> BBox {
        BBox {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(-f32::INFINITY, -f32::INFINITY, -f32::INFINITY),
        }
    }
    pub fn new(p0: Point3, p1: Point3) -> BBox {
        let (xmin, xmax) = min_max(p0.x, p1.x);
        let (ymin, ymax) = min_max(p0.y, p1.y);
        let (zmin, zmax) = min_max(p0.z, p1.z);
        BBox {
            min: Point3::new(xmin, ymin, zmin),
            max: Point3::new(xmax, ymax, zmax),
        }
    }

    pub fn union(self, p: Point3) -> BBox {
        let mut result = self;
        for i in 0..3 {
            result.min[i] = self.min[i].min(p[i]);
            result.max[i] = self.max[i].max(p[i]);
        }
        result
    }

    pub fn diag(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn min(&self) -> Point3 {
        self.min
    }
    pub fn max(&self) -> Point3 {
        self.max
    }

    /// Intersects the box with a ray using the slab method. Returns the entry
    /// distance along the ray, or `None` if the ray misses the box or the box
    /// lies entirely beyond the ray's extent.
    ///
    /// The entry distance is negative when the ray starts inside the box;
    /// callers compare it against a best-hit distance to prune traversal, so
    /// the sign is preserved rather than clamped.
    pub fn intersect(&self, r: &Ray) -> Option<f32> {
        let (mut t_enter, mut t_exit) = (-f32::INFINITY, r.t_max);
        for axis in 0..3 {
            let inv_dir = 1.0 / r.dir[axis];
            let t0 = (self.min[axis] - r.origin[axis]) * inv_dir;
            let t1 = (self.max[axis] - r.origin[axis]) * inv_dir;
            let (t0, t1) = min_max(t0, t1);
            // Shrinks [t_enter, t_exit] by intersecting it with [t0, t1].
            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_exit < t_enter || t_exit < 0.0 {
                return None;
            }
        }
        Some(t_enter)
    }

    pub fn encloses(&self, other: Self) -> bool {
        for axis in 0..3 {
            if self.min[axis] > other.min[axis] {
                return false;
            }
            if self.max[axis] < other.max[axis] {
                return false;
            }
        }
        true
    }
}

impl Display for BBox {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "box[{} -> {}]", self.min, self.max)
    }
}

pub fn union(b0: BBox, b1: BBox) -> BBox {
    b0.union(b1.min).union(b1.max)
}
