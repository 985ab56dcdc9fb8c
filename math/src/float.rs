/// Represents an angle with the unit (degree / radian) kept explicit, so that
/// call sites never pass a bare `f32` of ambiguous meaning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angle {
    rad: f32,
}

impl Angle {
    pub fn new_rad(rad: f32) -> Self {
        Angle { rad }
    }
    pub fn new_deg(deg: f32) -> Self {
        Angle {
            rad: deg.to_radians(),
        }
    }
    pub fn to_rad(self) -> f32 {
        self.rad
    }
    pub fn sin_cos(self) -> (f32, f32) {
        self.rad.sin_cos()
    }
    pub fn tan(self) -> f32 {
        self.rad.tan()
    }
}

impl std::ops::Mul<f32> for Angle {
    type Output = Angle;
    fn mul(self, s: f32) -> Angle {
        Angle { rad: self.rad * s }
    }
}

impl std::fmt::Display for Angle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}rad", self.rad)
    }
}

/// Computes the barycentric interpolation given 3 attribute values and 3 barycentric coordinates.
///
/// The attribute can be of various types: as long as `a-b` can be scaled by a
/// `f32` and the difference can be added back to `T`, interpolation works.
/// `Point3` can't be scaled but the difference type `Vec3` can, and
/// point + vector is a point, so positions interpolate fine.
pub fn barycentric_lerp<T, U>(values: (T, T, T), bc_coeffs: (f32, f32, f32)) -> T
where
    T: Copy + std::ops::Sub<T, Output = U>,
    U: Copy
        + std::ops::Mul<f32, Output = U>
        + std::ops::Add<T, Output = T>
        + std::ops::Add<U, Output = U>,
{
    let (a, b, c) = values;
    let (bc0, bc1, _) = bc_coeffs;
    //   bc0 * a + bc1 * b + (1 - bc0 - bc1) * c
    // = bc0 * (a-c) + bc1 * (b-c) + c
    (a - c) * bc0 + (b - c) * bc1 + c
}

pub fn min_max(a: f32, b: f32) -> (f32, f32) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

pub trait Inside
where
    Self: std::cmp::PartialOrd + Sized + Copy,
{
    fn inside(self, interval: (Self, Self)) -> bool {
        let (left, right) = interval;
        left <= self && self <= right
    }
}

impl Inside for f32 {}

#[macro_export]
macro_rules! assert_close {
    ($left:expr, $right:expr) => {
        if ($left - $right).norm_squared() > 1e-4 {
            panic!(
                "Assertion failed: Close({}, {}) values: {} vs. {}, dist = {}",
                stringify!($left),
                stringify!($right),
                $left,
                $right,
                ($left - $right).norm()
            )
        }
    };
}

#[macro_export]
macro_rules! assert_ge {
    ($left:expr, $right:expr) => {
        if $left < $right {
            panic!(
                "Assertion failed: {} >= {} (values: {} vs. {})",
                stringify!($left),
                stringify!($right),
                $left,
                $right
            )
        }
    };
}

#[cfg(test)]
mod test {
    #[test]
    fn angle_units() {
        let quarter = super::Angle::new_deg(90.0);
        assert!((quarter.to_rad() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        let (sin, cos) = quarter.sin_cos();
        assert!((sin - 1.0).abs() < 1e-6);
        assert!(cos.abs() < 1e-6);
    }

    #[test]
    fn barycentric_midpoint() {
        let third = 1.0 / 3.0;
        let mid = super::barycentric_lerp((0.0f32, 3.0, 6.0), (third, third, third));
        assert!((mid - 3.0).abs() < 1e-5);
    }
}
