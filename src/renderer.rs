//! Parallel tile-free renderer: rayon distributes whole rows, each row owns
//! its slice of the pixel buffer and its own deterministically seeded RNG, so
//! workers never synchronize on anything but the progress bar.

use crate::config::Config;
use crate::pathintegrator;
use geometry::sampling::gaussian_pair;
use indicatif::ProgressBar;
use math::Angle;
use radiometry::color::Color;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use scene::Scene;

/// Base of the per-row seeds. Row `r` renders with `StdRng` seeded at
/// `BASE_SEED + r`, making a render reproducible end to end.
const BASE_SEED: u64 = 0x05ee_d000;

/// Renders the scene into a row-major buffer of linear radiance values,
/// `config.width * config.height` long.
pub fn render(scene: &Scene, config: &Config) -> Vec<Color> {
    let width = config.width as usize;
    let height = config.height as usize;
    let fov = math::new_deg(config.fov_degrees);

    let progress = ProgressBar::new(height as u64);
    let mut pixels = vec![Color::black(); width * height];
    pixels
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, row_pixels)| {
            let mut rng = StdRng::seed_from_u64(BASE_SEED + row as u64);
            for (col, pixel) in row_pixels.iter_mut().enumerate() {
                *pixel = render_pixel(scene, config, fov, (col, row), &mut rng);
            }
            progress.inc(1);
        });
    progress.finish_and_clear();
    pixels
}

/// Averages `rays_per_pixel` jittered samples for one pixel: a Gaussian
/// offset inside the pixel footprint for antialiasing, and an independent
/// Gaussian lens offset retargeted through the focus plane for depth of
/// field.
pub fn render_pixel(
    scene: &Scene, config: &Config, fov: Angle, (col, row): (usize, usize), rng: &mut StdRng,
) -> Color {
    let resolution = (config.width as u32, config.height as u32);
    let mut sum = Color::black();
    for _ in 0..config.rays_per_pixel {
        let (dx, dy) = gaussian_pair(rng, config.aa_stddev);
        let primary = scene
            .camera
            .primary_ray((col as f32 + dx, row as f32 + dy), resolution, fov);
        let lens_offset = gaussian_pair(rng, config.lens_stddev);
        let ray = scene
            .camera
            .defocused_ray(&primary, lens_offset, config.focus_distance);
        sum += pathintegrator::radiance(scene, ray, config.max_bounce, rng, false);
    }
    sum / config.rays_per_pixel as f32
}
