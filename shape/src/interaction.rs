use geometry::ray::Ray;
use math::hcm::{Point3, Vec3};
use radiometry::color::Color;
use std::fmt::{Display, Formatter, Result};

/// Contains geometric information on a ray-surface intersection:
///  - `pos`: position of intersection.
///  - `ray_t`: t-value of the ray at the intersection (>= 0).
///  - `normal`: unit normal of the surface. Its orientation follows the
///    geometry (outward for spheres, vertex-blend for meshes), not the ray;
///    callers resolve the sign against the ray direction.
///  - `uv`: shape-specific surface parameterization.
///  - `tex_color`: albedo sampled from a mesh texture at the hit, when the
///    hit triangle's material group carries one.
#[derive(Debug, Clone, Copy)]
pub struct Interaction {
    pub pos: Point3,
    pub ray_t: f32,
    pub uv: (f32, f32),
    pub normal: Vec3,
    pub tex_color: Option<Color>,
}

impl Interaction {
    pub fn new(pos: Point3, ray_t: f32, uv: (f32, f32), normal: Vec3) -> Interaction {
        Interaction {
            pos,
            ray_t,
            uv,
            normal,
            tex_color: None,
        }
    }

    pub fn with_texture_color(self, tex_color: Option<Color>) -> Interaction {
        Interaction { tex_color, ..self }
    }

    /// Spawns a secondary ray from the hit point, with the origin nudged along
    /// the normal (on the side `dir` leaves from) so that floating-point error
    /// cannot make the new ray re-hit the surface it starts on.
    pub fn spawn_ray(&self, dir: Vec3) -> Ray {
        let out_normal = dir.dot(self.normal).signum() * self.normal;
        Ray::new(self.pos + out_normal * 1e-3, dir)
    }

    /// Spawns a ray towards `target`, with its extent stopping just short of
    /// the target so that the target surface itself does not count as an
    /// occluder.
    pub fn spawn_limited_ray_to(&self, target: Point3) -> Ray {
        let dir = (target - self.pos).hat();
        let distance = target.distance_to(self.pos);
        self.spawn_ray(dir).with_extent(distance * 0.999)
    }
}

impl Display for Interaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let (u, v) = self.uv;
        write!(
            f,
            "pos = {}, t = {:.2}, uv = ({:.2}, {:.2}), normal = {}",
            self.pos, self.ray_t, u, v, self.normal
        )
    }
}
