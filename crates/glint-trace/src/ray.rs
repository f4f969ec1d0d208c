//! Ray representation and the slab test against bounding boxes.

use glint_geom::Bbox3;
use glint_math::{Dir3, Point3, Vec3};

/// A ray in 3D space with a valid parameter interval.
///
/// The interval `(min_t, max_t)` is open at both ends: intersection
/// kernels accept a candidate parameter only strictly inside it, and on
/// acceptance they clamp `max_t` down to the hit. `max_t` therefore only
/// ever shrinks while a query runs, which is what prunes far work during
/// traversal. A ray must not be queried with `min_t > max_t`; the
/// interval is not re-validated per call.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Unit direction of the ray.
    pub direction: Dir3,
    /// Lower bound of the valid parameter interval (exclusive).
    pub min_t: f64,
    /// Upper bound of the valid parameter interval (exclusive).
    /// Intersection kernels clamp this to each accepted hit.
    pub max_t: f64,
    /// Precomputed reciprocal of direction components for fast box tests.
    inv_direction: Vec3,
    /// Sign of direction components (0 if positive, 1 if negative).
    sign: [usize; 3],
}

impl Ray {
    /// Create a ray with the interval spanning 0 to infinity.
    ///
    /// The direction will be normalized.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        Self::with_interval(origin, direction, 0.0, f64::INFINITY)
    }

    /// Create a ray restricted to the parameter interval `(min_t, max_t)`.
    ///
    /// The direction will be normalized.
    pub fn with_interval(origin: Point3, direction: Vec3, min_t: f64, max_t: f64) -> Self {
        let dir = Dir3::new_normalize(direction);
        let inv = Vec3::new(1.0 / dir.x, 1.0 / dir.y, 1.0 / dir.z);
        let sign = [
            if inv.x < 0.0 { 1 } else { 0 },
            if inv.y < 0.0 { 1 } else { 0 },
            if inv.z < 0.0 { 1 } else { 0 },
        ];
        Self {
            origin,
            direction: dir,
            min_t,
            max_t,
            inv_direction: inv,
            sign,
        }
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + t * self.direction.as_ref()
    }

    /// Slab test against a bounding box, seeded with the interval
    /// `(t0, t1)`.
    ///
    /// Returns `Some((entry, exit))` for the ray segment inside the box,
    /// narrowed into the seed interval, or `None` when the segment is
    /// empty. The seed interval is never widened, so passing the ray's
    /// own `(min_t, max_t)` discards boxes that lie entirely behind
    /// `min_t` or beyond the current closest hit.
    ///
    /// Axis-parallel rays work through the infinite reciprocals; an
    /// origin exactly on a slab of such a ray produces a NaN product
    /// that `f64::max`/`min` ignore, which counts the origin as inside
    /// the slab. An empty box never intersects.
    #[inline]
    pub fn intersect_bbox(&self, bbox: &Bbox3, t0: f64, t1: f64) -> Option<(f64, f64)> {
        let bounds = [bbox.min, bbox.max];

        let tx1 = (bounds[self.sign[0]].x - self.origin.x) * self.inv_direction.x;
        let tx2 = (bounds[1 - self.sign[0]].x - self.origin.x) * self.inv_direction.x;

        let mut t_min = t0.max(tx1);
        let mut t_max = t1.min(tx2);

        let ty1 = (bounds[self.sign[1]].y - self.origin.y) * self.inv_direction.y;
        let ty2 = (bounds[1 - self.sign[1]].y - self.origin.y) * self.inv_direction.y;

        t_min = t_min.max(ty1);
        t_max = t_max.min(ty2);

        let tz1 = (bounds[self.sign[2]].z - self.origin.z) * self.inv_direction.z;
        let tz2 = (bounds[1 - self.sign[2]].z - self.origin.z) * self.inv_direction.z;

        t_min = t_min.max(tz1);
        t_max = t_max.min(tz2);

        if t_max >= t_min {
            Some((t_min, t_max))
        } else {
            None
        }
    }
}
