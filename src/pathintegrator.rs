//! The recursive radiance estimator. Dispatches on the hit material's flags:
//! light / transparent / mirror / diffuse, in that order. Diffuse surfaces
//! combine an explicit light sample with one cosine-weighted indirect bounce;
//! the light's emission is only returned to primary and specular paths so the
//! two strategies never double-count it.

use geometry::ray::Ray;
use geometry::sampling::cosine_hemisphere;
use math::hcm::{self, Vec3};
use radiometry::color::Color;
use rand::Rng;
use scene::Scene;
use shape::Interaction;

fn inv_4_pi_squared() -> f32 {
    1.0 / (4.0 * std::f32::consts::PI.powi(2))
}

/// Estimated radiance arriving along `ray`, with at most `depth` more
/// surface interactions. `indirect` marks rays spawned by a diffuse bounce;
/// such rays ignore light-source hits (the diffuse parent already sampled the
/// light explicitly).
pub fn radiance<R: Rng>(
    scene: &Scene, ray: Ray, depth: i32, rng: &mut R, indirect: bool,
) -> Color {
    if depth <= 0 {
        return Color::black();
    }
    let (hit, material) = match scene.intersect(&ray) {
        None => return Color::black(),
        Some(pair) => pair,
    };

    if material.is_light {
        return if indirect {
            Color::black()
        } else {
            scene.light().radiance()
        };
    }
    // Specular bounces re-arm emission: the diffuse parent's explicit light
    // sample only covers the straight-line path, so a mirror or dielectric
    // facing the lamp must deliver it through recursion.
    if material.transparent {
        let dir = transmitted_direction(&ray, &hit, material.optical_index, rng);
        return radiance(scene, hit.spawn_ray(dir), depth - 1, rng, false);
    }
    if material.mirrors {
        let reflected = hcm::reflect(hit.normal, ray.dir);
        return radiance(scene, hit.spawn_ray(reflected), depth - 1, rng, false);
    }

    let albedo = material.albedo_at(&hit);
    let direct = direct_light(scene, &hit, albedo, rng);
    let bounce = cosine_hemisphere(hit.normal, rng);
    let indirect_term =
        albedo * radiance(scene, hit.spawn_ray(bounce), depth - 1, rng, true);
    indirect_term + direct
}

/// Samples the light surface and evaluates the unoccluded direct-lighting
/// term: `power * cos_surface * cos_light / (d^2 * pdf) * albedo / (4 pi^2)`.
fn direct_light<R: Rng>(scene: &Scene, hit: &Interaction, albedo: Color, rng: &mut R) -> Color {
    let light = scene.light();
    let sample = light.sample_towards(hit.pos, rng);

    let shadow_ray = hit.spawn_limited_ray_to(sample.pos);
    if scene.occluded(&shadow_ray) {
        return Color::black();
    }

    let to_light = sample.pos - hit.pos;
    let distance_squared = to_light.norm_squared();
    let wi = to_light / distance_squared.sqrt();
    let cos_surface = hit.normal.dot(wi).max(0.0);
    let cos_light = sample.normal.dot(-wi).max(0.0);
    let geometric = cos_surface * cos_light / (distance_squared * sample.pdf);
    albedo * (light.power() * geometric * inv_4_pi_squared())
}

/// Chooses between reflection and refraction at a dielectric boundary with the
/// Schlick reflectance as the coin weight. Total internal reflection takes the
/// mirror branch regardless of the coin.
fn transmitted_direction<R: Rng>(
    ray: &Ray, hit: &Interaction, optical_index: f32, rng: &mut R,
) -> Vec3 {
    let d = ray.dir.hat();
    let entering = d.dot(hit.normal) < 0.0;
    let (n_incident, n_transmit, normal) = if entering {
        (1.0, optical_index, hit.normal)
    } else {
        (optical_index, 1.0, -hit.normal)
    };

    let k0 = ((n_incident - n_transmit) / (n_incident + n_transmit)).powi(2);
    let cos_incident = -d.dot(normal);
    let reflectance = k0 + (1.0 - k0) * (1.0 - cos_incident).powi(5);
    if rng.gen::<f32>() < reflectance {
        return hcm::reflect(normal, d);
    }
    match hcm::refract(normal, d, n_incident / n_transmit) {
        hcm::Transmit(t) => t,
        hcm::FullReflect(r) => r,
    }
}
