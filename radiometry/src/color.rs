/// Linear (pre-gamma) RGB radiance triple. All rendering math happens on this
/// type; conversion to displayable 8-bit values happens once at output time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// Clamps an f32 value to [0, 1], multiplies it by 255 and casts it to u8.
/// Returns 0 if `f` is NaN.
fn saturate_cast_u8(f: f32) -> u8 {
    if f > 1.0 {
        255
    } else if f >= 0.0 {
        (f * 255.0) as u8
    } else {
        0
    }
}

impl Color {
    pub const ONE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Color {
        Color { r, g, b }
    }
    pub fn black() -> Color {
        Color::new(0.0, 0.0, 0.0)
    }
    pub fn white() -> Color {
        Color::ONE
    }
    /// An achromatic color with the given intensity on all three channels.
    pub fn gray(level: f32) -> Color {
        Color::new(level, level, level)
    }
    pub fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub fn is_black(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }
    pub fn has_nan(&self) -> bool {
        self.r.is_nan() || self.g.is_nan() || self.b.is_nan()
    }
    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    /// Applies the display transfer curve (power 1/2.2) channel-wise. Negative
    /// channels are clamped to zero first so the power is well defined.
    pub fn gamma_encoded(self) -> Color {
        const INV_GAMMA: f32 = 1.0 / 2.2;
        Color::new(
            self.r.max(0.0).powf(INV_GAMMA),
            self.g.max(0.0).powf(INV_GAMMA),
            self.b.max(0.0).powf(INV_GAMMA),
        )
    }

    /// Undoes the 2.2 display curve on an 8-bit channel, giving back a linear
    /// intensity in [0, 1]. Texture bytes are stored gamma-encoded.
    pub fn linearize_u8(byte: u8) -> f32 {
        (byte as f32 / 255.0).powf(2.2)
    }

    pub fn to_u8(&self) -> [u8; 3] {
        [
            saturate_cast_u8(self.r),
            saturate_cast_u8(self.g),
            saturate_cast_u8(self.b),
        ]
    }
}

impl std::ops::Add for Color {
    type Output = Color;
    fn add(self, rhs: Self) -> Self {
        Color::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl std::ops::AddAssign for Color {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::Mul<f32> for Color {
    type Output = Color;
    fn mul(self, s: f32) -> Self {
        Color::new(self.r * s, self.g * s, self.b * s)
    }
}

impl std::ops::Mul<Color> for f32 {
    type Output = Color;
    fn mul(self, c: Color) -> Color {
        c * self
    }
}

// Component-wise product: albedo modulation.
impl std::ops::Mul<Color> for Color {
    type Output = Color;
    fn mul(self, rhs: Color) -> Color {
        Color::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b)
    }
}

impl std::ops::Div<f32> for Color {
    type Output = Color;
    fn div(self, s: f32) -> Self {
        Color::new(self.r / s, self.g / s, self.b / s)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({:.3}, {:.3}, {:.3})", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn saturating_cast() {
        assert_eq!(Color::new(2.0, -0.5, f32::NAN).to_u8(), [255, 0, 0]);
        assert_eq!(Color::gray(0.5).to_u8(), [127, 127, 127]);
    }

    #[test]
    fn gamma_round_trip() {
        let level = Color::linearize_u8(180);
        let encoded = Color::gray(level).gamma_encoded();
        let byte = encoded.to_u8()[0] as i32;
        assert!((byte - 180).abs() <= 1, "round-tripped to {}", byte);
    }

    #[test]
    fn albedo_modulation() {
        let c = Color::new(0.5, 1.0, 0.25) * Color::new(1.0, 0.5, 0.0);
        assert_eq!(c, Color::new(0.5, 0.5, 0.0));
    }
}
