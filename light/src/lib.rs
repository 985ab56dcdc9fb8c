//! Spherical area lighting. A scene carries exactly one `SphereLight`; the
//! integrator samples points on its surface for direct illumination and reads
//! its uniform emitted radiance when a camera or indirect ray hits it.

use geometry::sampling::cosine_hemisphere;
use math::hcm::{Point3, Vec3};
use radiometry::color::Color;
use rand::Rng;

/// Floor applied to the sampling density so that grazing samples do not
/// produce infinite contribution.
const MIN_PDF: f32 = 1e-8;

/// A point sampled on the light's surface, with the surface normal there and
/// the density with which it was chosen.
#[derive(Debug, Clone, Copy)]
pub struct LightSample {
    pub pos: Point3,
    pub normal: Vec3,
    pub pdf: f32,
}

/// An emissive sphere with a given total radiant power, distributed uniformly
/// over its surface. The emitted radiance works out to `power / (4 pi^2 r^2)`
/// on every channel.
#[derive(Debug, Clone, Copy)]
pub struct SphereLight {
    center: Point3,
    radius: f32,
    power: f32,
}

impl SphereLight {
    pub fn new(center: Point3, radius: f32, power: f32) -> Self {
        assert!(radius > 0.0);
        assert!(power >= 0.0);
        SphereLight {
            center,
            radius,
            power,
        }
    }

    pub fn center(&self) -> Point3 {
        self.center
    }
    pub fn radius(&self) -> f32 {
        self.radius
    }
    pub fn power(&self) -> f32 {
        self.power
    }

    /// Radiance leaving any point of the light surface, in any direction.
    pub fn radiance(&self) -> Color {
        let area_term = 4.0 * std::f32::consts::PI.powi(2) * self.radius.powi(2);
        Color::gray(self.power / area_term)
    }

    /// Samples a point on the hemisphere of the light facing `target`, with a
    /// cosine-weighted density about the axis from the light center towards
    /// the target. The returned pdf is that cosine, floored to keep the
    /// estimator finite at the silhouette.
    pub fn sample_towards<R: Rng>(&self, target: Point3, rng: &mut R) -> LightSample {
        let axis = (target - self.center).hat();
        let normal = cosine_hemisphere(axis, rng);
        LightSample {
            pos: self.center + normal * self.radius,
            normal,
            pdf: axis.dot(normal).max(MIN_PDF),
        }
    }
}
