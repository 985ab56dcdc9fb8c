mod blas;
mod interaction;
mod simple;

pub use blas::{Texture, TriangleIndices, TriangleMesh, NO_GROUP};
pub use interaction::Interaction;
pub use simple::Sphere;

use geometry::bvh::BBox;
use geometry::ray::Ray;

/// The capability of being intersected by a ray. Implemented by every concrete
/// geometry kind; a single-level trait is the only polymorphism needed.
pub trait Shape {
    /// Computes the nearest intersection within the ray's extent, if any.
    fn intersect(&self, r: &Ray) -> Option<Interaction>;

    /// Answers whether *any* intersection exists within the ray's extent.
    /// Shadow rays only need this cheaper query.
    fn occludes(&self, r: &Ray) -> bool;

    fn bbox(&self) -> BBox;

    fn summary(&self) -> String;
}
