//! The primitive capability set and its intersection record.
//!
//! Everything the accelerator can hold implements [`Primitive`]: a
//! bounding box, an any-hit kernel, a closest-hit kernel, and an opaque
//! material handle. [`Bvh`](crate::Bvh) implements the trait itself, so
//! whole hierarchies nest inside other hierarchies like any leaf
//! primitive.

mod sphere;
mod triangle;

pub use sphere::Sphere;
pub use triangle::Triangle;

use std::fmt::Debug;

use glint_geom::{Bbox3, MaterialId};
use glint_math::Vec3;

use crate::Ray;

/// Record of the closest hit found so far along a ray.
///
/// Starts empty (`t` infinite, no primitive) and is overwritten in place
/// each time a kernel accepts a strictly closer hit. A query that finds
/// nothing leaves the record untouched, so a record can be reused across
/// queries and still name the best hit seen.
#[derive(Debug, Clone, Copy)]
pub struct Intersection<'p> {
    /// Parameter along the ray where the hit occurs.
    pub t: f64,
    /// The primitive that produced the hit.
    pub primitive: Option<&'p dyn Primitive>,
    /// Surface normal at the hit point. Barycentric-interpolated and
    /// flipped toward the ray origin for triangles, outward for spheres.
    /// Not guaranteed to be unit length.
    pub normal: Vec3,
    /// Material handle of the hit surface.
    pub material: Option<MaterialId>,
}

impl Intersection<'_> {
    /// True once any hit has been recorded.
    pub fn is_hit(&self) -> bool {
        self.primitive.is_some()
    }
}

impl Default for Intersection<'_> {
    fn default() -> Self {
        Self {
            t: f64::INFINITY,
            primitive: None,
            normal: Vec3::zeros(),
            material: None,
        }
    }
}

/// Capability set for anything a ray can be traced against.
///
/// Both kernels share one acceptance rule: a candidate parameter counts
/// only strictly inside the open interval `(ray.min_t, ray.max_t)`, and
/// on acceptance the kernel clamps `ray.max_t` down to it. Strictness at
/// `max_t` doubles as the tie-break: of two hits at exactly the same
/// distance, the one found first in traversal order is kept.
pub trait Primitive: Send + Sync + Debug {
    /// Axis-aligned box enclosing the primitive.
    fn bounds(&self) -> Bbox3;

    /// Test whether the ray hits the primitive anywhere inside its
    /// interval. Clamps `ray.max_t` on acceptance; a miss leaves the ray
    /// untouched.
    fn intersect_any(&self, ray: &mut Ray) -> bool;

    /// Find the closest hit inside the ray's interval. On acceptance
    /// clamps `ray.max_t` and fills `isect`; a miss leaves both
    /// untouched.
    fn intersect_closest<'p>(&'p self, ray: &mut Ray, isect: &mut Intersection<'p>) -> bool;

    /// Material handle for shading. `None` for aggregates, which defer
    /// to the primitive actually hit.
    fn material(&self) -> Option<MaterialId>;
}
