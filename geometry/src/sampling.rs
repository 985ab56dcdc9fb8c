use math::hcm::{make_coord_system, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

/// Draws a pair of independent Gaussian variates with the given standard
/// deviation, via a Box-Muller transform on two uniform draws.
pub fn gaussian_pair<R: Rng>(rng: &mut R, std_dev: f32) -> (f32, f32) {
    // 1 - u lies in (0, 1], keeping the logarithm finite.
    let u1: f32 = 1.0 - rng.gen::<f32>();
    let u2: f32 = rng.gen();
    let radius = (-2.0 * u1.ln()).sqrt() * std_dev;
    let (sin, cos) = (TAU * u2).sin_cos();
    (radius * cos, radius * sin)
}

/// Draws a cosine-weighted direction on the hemisphere around `axis`
/// (unit length). The density of the returned direction is `cos(theta) / pi`
/// with `theta` measured from `axis`.
pub fn cosine_hemisphere<R: Rng>(axis: Vec3, rng: &mut R) -> Vec3 {
    let (r1, r2): (f32, f32) = (rng.gen(), rng.gen());
    let (sin_phi, cos_phi) = (TAU * r1).sin_cos();
    let sin_theta = (1.0 - r2).sqrt();
    let cos_theta = r2.sqrt();
    let (tangent, bitangent) = make_coord_system(axis);
    sin_theta * cos_phi * tangent + sin_theta * sin_phi * bitangent + cos_theta * axis
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn hemisphere_samples_face_the_axis() {
        let mut rng = StdRng::seed_from_u64(7);
        let axis = Vec3::new(0.3, -0.5, 0.8).hat();
        for _ in 0..256 {
            let dir = cosine_hemisphere(axis, &mut rng);
            assert!((dir.norm_squared() - 1.0).abs() < 1e-4);
            assert!(dir.dot(axis) >= 0.0);
        }
    }

    #[test]
    fn gaussian_pair_is_centered() {
        let mut rng = StdRng::seed_from_u64(99);
        let n = 4096;
        let (mut sum_x, mut sum_y) = (0.0f64, 0.0f64);
        for _ in 0..n {
            let (x, y) = gaussian_pair(&mut rng, 2.0);
            sum_x += x as f64;
            sum_y += y as f64;
        }
        // Means concentrate around 0 with sigma/sqrt(n) ~ 0.03.
        assert!((sum_x / n as f64).abs() < 0.2);
        assert!((sum_y / n as f64).abs() < 0.2);
    }
}
