use crate::ray::Ray;
use math::hcm::{Point3, Vec3};
use math::Angle;

/// A pinhole camera holding an origin and an orthonormal frame in world space:
/// `front` towards the scene, `up` towards the top of the image, and `right`
/// derived from the two. Image-plane geometry (resolution, field of view) is
/// supplied per ray so that the same camera serves any render configuration.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    origin: Point3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
}

impl Camera {
    /// Builds a camera at `origin` looking along `front`. Both `front` and
    /// `up` should be unit length and perpendicular; the third basis vector is
    /// derived from their cross product.
    pub fn new(origin: Point3, front: Vec3, up: Vec3) -> Camera {
        Camera {
            origin,
            front,
            up,
            right: front.cross(up),
        }
    }

    pub fn origin(&self) -> Point3 {
        self.origin
    }

    /// Rotates the viewing frame around a principal world axis (0 = x, 1 = y,
    /// 2 = z) and re-derives the `right` vector.
    pub fn rotate(&mut self, angle: Angle, axis: usize) {
        self.front = self.front.rotated(angle, axis);
        self.up = self.up.rotated(angle, axis);
        self.right = self.front.cross(self.up);
    }

    /// Maps a continuous pixel coordinate (jitter already applied) to a
    /// world-space primary ray with a normalized direction.
    ///
    /// The image plane is centered on the optical axis at a depth derived from
    /// the vertical field of view: `height / (2 tan(fov/2))`, so a pixel's
    /// offset from the image center directly gives the direction in the
    /// camera frame.
    pub fn primary_ray(
        &self, (col, row): (f32, f32), (width, height): (u32, u32), fov_y: Angle,
    ) -> Ray {
        let x = col - width as f32 / 2.0;
        let y = height as f32 / 2.0 - row;
        let plane_depth = height as f32 / (2.0 * (fov_y * 0.5).tan());
        let dir = x * self.right + y * self.up + plane_depth * self.front;
        Ray::new(self.origin, dir.hat())
    }

    /// Applies depth-of-field to a primary ray: offsets the ray origin on the
    /// aperture plane by `(lens_dx, lens_dy)` and retargets it through the
    /// point where the original ray pierces the focus plane, so only objects
    /// near `focus_distance` stay sharp.
    pub fn defocused_ray(
        &self, primary: &Ray, (lens_dx, lens_dy): (f32, f32), focus_distance: f32,
    ) -> Ray {
        let focal_point = primary.origin + primary.dir * focus_distance;
        let origin = self.origin + lens_dx * self.right + lens_dy * self.up;
        Ray::new(origin, (focal_point - origin).hat())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use math::hcm::{point3, vec3};

    fn axis_aligned_camera() -> Camera {
        Camera::new(point3(0.0, 0.0, 0.0), vec3(0.0, 0.0, -1.0), vec3(0.0, 1.0, 0.0))
    }

    #[test]
    fn center_pixel_looks_along_front() {
        let camera = axis_aligned_camera();
        let r = camera.primary_ray((320.0, 240.0), (640, 480), math::new_deg(60.0));
        math::assert_close!(r.dir, vec3(0.0, 0.0, -1.0));
    }

    #[test]
    fn upper_left_pixel_goes_up_and_left() {
        let camera = axis_aligned_camera();
        let r = camera.primary_ray((0.0, 0.0), (640, 480), math::new_deg(60.0));
        // right = front x up = (1, 0, 0); left half of the image has x < 0.
        assert!(r.dir.x < 0.0 && r.dir.y > 0.0 && r.dir.z < 0.0);
    }

    #[test]
    fn defocus_preserves_focal_point() {
        let camera = axis_aligned_camera();
        let primary = camera.primary_ray((100.0, 100.0), (640, 480), math::new_deg(60.0));
        let focus = 12.5;
        let focal_point = primary.origin + primary.dir * focus;
        let jittered = camera.defocused_ray(&primary, (0.4, -0.2), focus);
        let t = (focal_point - jittered.origin).norm();
        math::assert_close!(jittered.position_at(t), focal_point);
    }

    #[test]
    fn rotation_keeps_frame_orthonormal() {
        let mut camera = axis_aligned_camera();
        camera.rotate(math::new_deg(-10.0), 0);
        let r = camera.primary_ray((320.0, 240.0), (640, 480), math::new_deg(60.0));
        assert!((r.dir.norm_squared() - 1.0).abs() < 1e-5);
        // Tilting down about x turns the view direction downward.
        assert!(r.dir.y < 0.0);
    }
}
