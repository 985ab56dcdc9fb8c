/// Defines the `BBox` bounding-box type.
pub mod bvh;

/// Defines the `Camera` type mapping pixel coordinates to primary rays, with
/// antialiasing and depth-of-field jitter.
pub mod camera;

/// Defines the `Ray` type.
pub mod ray;

/// Monte Carlo sampling helpers: Gaussian pairs, cosine-weighted hemisphere.
pub mod sampling;
