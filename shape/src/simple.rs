use std::f32::consts::PI;

use crate::{Interaction, Shape};
use geometry::bvh::BBox;
use geometry::ray::Ray;
use math::hcm::{Point3, Vec3};

#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    center: Point3,
    radius: f32,
}

impl Sphere {
    pub fn new(center: Point3, radius: f32) -> Sphere {
        assert!(!center.has_nan() && radius > 0.0);
        Sphere { center, radius }
    }
    pub fn center(&self) -> Point3 {
        self.center
    }
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Solves |o + td - c|^2 = r^2 for the two roots, assuming a normalized
    /// ray direction. Returns them in ascending order, or `None` if the ray
    /// line misses the sphere entirely.
    fn quadratic_roots(&self, r: &Ray) -> Option<(f32, f32)> {
        let oc = r.origin - self.center;
        let b = 2.0 * r.dir.dot(oc);
        let c = oc.norm_squared() - self.radius * self.radius;
        let delta = b * b - 4.0 * c;
        if delta < 0.0 {
            return None;
        }
        let sqrt_delta = delta.sqrt();
        Some(((-b - sqrt_delta) / 2.0, (-b + sqrt_delta) / 2.0))
    }
}

impl Shape for Sphere {
    fn summary(&self) -> String {
        format!("Sphere{{ {}, radius = {} }}", self.center, self.radius)
    }

    fn bbox(&self) -> BBox {
        let half_diagonal = Vec3::new(1.0, 1.0, 1.0) * self.radius;
        BBox::new(self.center - half_diagonal, self.center + half_diagonal)
    }

    fn intersect(&self, r: &Ray) -> Option<Interaction> {
        let (t_low, t_high) = self.quadratic_roots(r)?;
        if t_high < 0.0 {
            // The whole sphere lies behind the ray origin.
            return None;
        }
        // Prefers the nearer root; the farther one applies when the origin is
        // inside the sphere.
        let t = if t_low > 0.0 { t_low } else { t_high };
        let ray_t = r.truncated_t(t)?;

        let pos = r.position_at(ray_t);
        let normal = (pos - self.center).hat();

        // Spherical surface parameterization, mostly useful for debugging.
        let theta = normal.y.acos();
        let phi = normal.z.atan2(normal.x) + PI;
        let uv = (phi / (2.0 * PI), theta / PI);

        Some(Interaction::new(pos, ray_t, uv, normal))
    }

    fn occludes(&self, r: &Ray) -> bool {
        match self.quadratic_roots(r) {
            None => false,
            Some((t_low, t_high)) => {
                r.truncated_t(t_low).is_some() || r.truncated_t(t_high).is_some()
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use math::hcm::{point3, vec3};

    #[test]
    fn head_on_hit_from_outside() {
        let sphere = Sphere::new(Point3::ORIGIN, 1.0);
        let r = Ray::new(point3(0.0, 0.0, 5.0), vec3(0.0, 0.0, -1.0));
        let hit = sphere.intersect(&r).expect("head-on ray must hit");
        assert!((hit.ray_t - 4.0).abs() < 1e-5);
        math::assert_close!(hit.pos, point3(0.0, 0.0, 1.0));
        math::assert_close!(hit.normal, vec3(0.0, 0.0, 1.0));
    }

    #[test]
    fn distance_equals_center_distance_minus_radius() {
        let sphere = Sphere::new(point3(3.0, -2.0, 7.0), 2.5);
        let origin = point3(-4.0, 6.0, 1.0);
        let dir = (sphere.center() - origin).hat();
        let hit = sphere.intersect(&Ray::new(origin, dir)).unwrap();
        let expected = origin.distance_to(sphere.center()) - sphere.radius();
        assert!((hit.ray_t - expected).abs() < 1e-3);
    }

    #[test]
    fn miss_when_ray_line_passes_outside() {
        let sphere = Sphere::new(Point3::ORIGIN, 1.0);
        let r = Ray::new(point3(0.0, 1.5, 5.0), vec3(0.0, 0.0, -1.0));
        assert!(sphere.intersect(&r).is_none());
        assert!(!sphere.occludes(&r));
    }

    #[test]
    fn miss_when_sphere_is_behind() {
        let sphere = Sphere::new(point3(0.0, 0.0, 10.0), 1.0);
        let r = Ray::new(Point3::ORIGIN, vec3(0.0, 0.0, -1.0));
        assert!(sphere.intersect(&r).is_none());
    }

    #[test]
    fn inside_origin_uses_far_root() {
        let sphere = Sphere::new(Point3::ORIGIN, 2.0);
        let r = Ray::new(point3(0.0, 0.0, 0.5), vec3(0.0, 0.0, 1.0));
        let hit = sphere.intersect(&r).unwrap();
        assert!((hit.ray_t - 1.5).abs() < 1e-5);
        // The outward normal points away from the center even when exiting.
        math::assert_close!(hit.normal, vec3(0.0, 0.0, 1.0));
    }

    #[test]
    fn occlusion_respects_ray_extent() {
        let sphere = Sphere::new(point3(0.0, 0.0, -10.0), 1.0);
        let r = Ray::new(Point3::ORIGIN, vec3(0.0, 0.0, -1.0));
        assert!(sphere.occludes(&r));
        assert!(!sphere.occludes(&r.with_extent(5.0)));
    }
}
