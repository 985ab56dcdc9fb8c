//! PNG output: gamma-encode the linear radiance buffer and write it as 8-bit
//! RGB.

use radiometry::color::Color;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

pub fn write_png(
    path: &Path, pixels: &[Color], (width, height): (u32, u32),
) -> Result<(), png::EncodingError> {
    assert_eq!(pixels.len(), (width * height) as usize);
    // Radiance is kept in display units: a value of 255^2.2 maps to full
    // white, so `(x / scale).gamma_encoded()` equals `min(255, x^(1/2.2))` on
    // the 8-bit output scale.
    let inv_scale = 255f32.powf(2.2).recip();
    let mut data = Vec::with_capacity(pixels.len() * 3);
    for color in pixels.iter() {
        data.extend_from_slice(&(*color * inv_scale).gamma_encoded().to_u8());
    }

    let writer = BufWriter::new(File::create(path)?);
    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::RGB);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.write_header()?.write_image_data(&data)?;
    Ok(())
}
