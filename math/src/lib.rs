/// Defines useful functions for common math operations and tools:
/// - The `Angle` type to represent angles unambiguously.
/// - Barycentric interpolation on not only primitive types.
/// - Macros to check if two math quantities are close to each other.
pub mod float;

/// Cartesian maths module.
/// - Types: 3D points and vectors.
/// - Function `make_coord_system()` to build an orthonormal base from a `Vec3`.
/// - Functions `reflect()` and `refract()` to compute surface interactions.
pub mod hcm;

pub use float::Angle;
pub fn new_rad(rad: f32) -> float::Angle {
    float::Angle::new_rad(rad)
}
pub fn new_deg(deg: f32) -> float::Angle {
    float::Angle::new_deg(deg)
}
