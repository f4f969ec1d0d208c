//! Axis-aligned bounding boxes for primitive bounds and tree nodes.
//!
//! Boxes start inverted (empty) and grow by inclusion, so the empty box
//! is the identity for union. The split-cost helpers keep degenerate
//! boxes finite: an empty box has zero surface area and a zero-extent
//! axis reports offset 0.

use glint_math::{Point3, Vec3};

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy)]
pub struct Bbox3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Bbox3 {
    /// Create a box from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) box suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// True if the box contains no points (some axis still inverted).
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Expand this box to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Expand this box to include another box. Including an empty box
    /// leaves `self` unchanged.
    pub fn include_box(&mut self, other: &Bbox3) {
        self.min.x = self.min.x.min(other.min.x);
        self.min.y = self.min.y.min(other.min.y);
        self.min.z = self.min.z.min(other.min.z);
        self.max.x = self.max.x.max(other.max.x);
        self.max.y = self.max.y.max(other.max.y);
        self.max.z = self.max.z.max(other.max.z);
    }

    /// Center point of the box.
    pub fn centroid(&self) -> Point3 {
        Point3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    /// Side lengths of the box, or the zero vector for an empty box.
    pub fn extent(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::zeros();
        }
        self.max - self.min
    }

    /// Total surface area of the box, zero for an empty box.
    ///
    /// A box that is flat along one axis keeps the area of its remaining
    /// faces, so split costs stay meaningful for planar geometry.
    pub fn surface_area(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let e = self.max - self.min;
        2.0 * (e.x * e.y + e.y * e.z + e.z * e.x)
    }

    /// Position of `p` relative to the corners, per axis: 0 at `min`,
    /// 1 at `max`. An axis with zero extent reports 0.
    pub fn offset(&self, p: &Point3) -> Vec3 {
        let e = self.extent();
        let mut o = Vec3::zeros();
        if e.x > 0.0 {
            o.x = (p.x - self.min.x) / e.x;
        }
        if e.y > 0.0 {
            o.y = (p.y - self.min.y) / e.y;
        }
        if e.z > 0.0 {
            o.z = (p.z - self.min.z) / e.z;
        }
        o
    }
}
