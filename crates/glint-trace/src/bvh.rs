//! Bounding volume hierarchy built with the surface area heuristic.
//!
//! Construction buckets primitive centroids along each axis, sweeps
//! every bucket boundary on all three axes for the cheapest split, and
//! falls back to a leaf whenever splitting would cost more than testing
//! the primitives directly. The finished tree is a flat arena of nodes
//! with the root at index 0, over a primitive array reordered so every
//! leaf owns a contiguous range.

use std::sync::Arc;

use glint_geom::{Bbox3, MaterialId};
use glint_math::Point3;

use crate::{Intersection, Primitive, Ray};

/// Default number of primitives at or below which a range becomes a
/// leaf.
pub const DEFAULT_MAX_LEAF_SIZE: usize = 4;

/// Centroid buckets per axis considered by the SAH sweep.
const SAH_BUCKETS: usize = 12;

/// Relative cost of one traversal step against one primitive test.
const SAH_TRAVERSAL_COST: f64 = 0.125;

/// Ranges smaller than this build sequentially; fork overhead outweighs
/// the subtree work below it.
const PARALLEL_SPLIT_THRESHOLD: usize = 4096;

/// One node of the flattened hierarchy.
#[derive(Debug, Clone)]
pub enum BvhNode {
    /// Leaf owning a contiguous range of the reordered primitive array.
    Leaf {
        /// Box enclosing every primitive in the range.
        bounds: Bbox3,
        /// First index of the range.
        start: usize,
        /// Number of primitives in the range.
        count: usize,
    },
    /// Interior node with two children.
    Interior {
        /// Box enclosing both children.
        bounds: Bbox3,
        /// Arena index of the left child.
        left: usize,
        /// Arena index of the right child.
        right: usize,
    },
}

impl BvhNode {
    /// Bounding box of the node.
    pub fn bounds(&self) -> Bbox3 {
        match self {
            BvhNode::Leaf { bounds, .. } => *bounds,
            BvhNode::Interior { bounds, .. } => *bounds,
        }
    }
}

/// Per-primitive construction data, discarded once the build finishes.
struct PrimitiveInfo {
    index: usize,
    bounds: Bbox3,
    centroid: Point3,
}

/// Pointer tree produced by the recursive build, flattened into the
/// arena afterwards.
enum BuildNode {
    Leaf {
        bounds: Bbox3,
        start: usize,
        count: usize,
    },
    Interior {
        bounds: Bbox3,
        left: Box<BuildNode>,
        right: Box<BuildNode>,
    },
}

/// Bounding volume hierarchy over a fixed set of primitives.
///
/// Built once, immutable afterwards. Queries take no mutable access to
/// the tree, so a finished hierarchy serves rays from any number of
/// threads at once. The arena always holds at least the root at
/// index 0; an empty scene builds a single leaf with an empty box.
#[derive(Debug, Clone)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    primitives: Vec<Arc<dyn Primitive>>,
}

impl Bvh {
    /// Build a hierarchy with [`DEFAULT_MAX_LEAF_SIZE`].
    pub fn build(primitives: Vec<Arc<dyn Primitive>>) -> Self {
        Self::build_with_leaf_size(primitives, DEFAULT_MAX_LEAF_SIZE)
    }

    /// Build a hierarchy that stops splitting ranges of `max_leaf_size`
    /// primitives or fewer. Values below 1 are treated as 1.
    pub fn build_with_leaf_size(primitives: Vec<Arc<dyn Primitive>>, max_leaf_size: usize) -> Self {
        let max_leaf_size = max_leaf_size.max(1);

        let mut info: Vec<PrimitiveInfo> = primitives
            .iter()
            .enumerate()
            .map(|(index, primitive)| {
                let bounds = primitive.bounds();
                PrimitiveInfo {
                    index,
                    bounds,
                    centroid: bounds.centroid(),
                }
            })
            .collect();

        let root = build_range(&mut info, 0, max_leaf_size);

        let mut nodes = Vec::new();
        flatten_node(root, &mut nodes);

        // The build permuted `info` in place; mapping it back through
        // the original indices gives the array the leaves range over.
        let primitives = info
            .iter()
            .map(|pi| Arc::clone(&primitives[pi.index]))
            .collect();

        Self { nodes, primitives }
    }

    /// Find the closest hit along `ray`, filling `isect`.
    ///
    /// Children are visited nearer entry first, and the farther child
    /// is skipped once the best hit lies closer than its entry point.
    /// Returns whether this call narrowed `ray.max_t`, so a record
    /// already holding a hit from an earlier query never turns a miss
    /// into a false positive.
    pub fn intersect_closest<'p>(&'p self, ray: &mut Ray, isect: &mut Intersection<'p>) -> bool {
        let root_bounds = self.nodes[0].bounds();
        if ray
            .intersect_bbox(&root_bounds, ray.min_t, ray.max_t)
            .is_none()
        {
            return false;
        }
        let prev_max = ray.max_t;
        self.closest_from(0, ray, isect);
        ray.max_t < prev_max
    }

    /// Test whether `ray` hits anything at all, stopping at the first
    /// accepted hit. `ray.max_t` is clamped to that hit.
    pub fn intersect_any(&self, ray: &mut Ray) -> bool {
        let root_bounds = self.nodes[0].bounds();
        if ray
            .intersect_bbox(&root_bounds, ray.min_t, ray.max_t)
            .is_none()
        {
            return false;
        }
        self.any_from(0, ray)
    }

    /// The flattened node arena. The root is index 0.
    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    /// Primitives reordered so each leaf owns a contiguous range.
    pub fn primitives(&self) -> &[Arc<dyn Primitive>] {
        &self.primitives
    }

    /// Box enclosing the whole hierarchy.
    pub fn bounds(&self) -> Bbox3 {
        self.nodes[0].bounds()
    }

    fn closest_from<'p>(&'p self, index: usize, ray: &mut Ray, isect: &mut Intersection<'p>) {
        match &self.nodes[index] {
            BvhNode::Leaf { start, count, .. } => {
                for primitive in &self.primitives[*start..*start + *count] {
                    primitive.intersect_closest(ray, isect);
                }
            }
            BvhNode::Interior { left, right, .. } => {
                let (left, right) = (*left, *right);
                let hit_left = ray.intersect_bbox(&self.nodes[left].bounds(), ray.min_t, ray.max_t);
                let hit_right =
                    ray.intersect_bbox(&self.nodes[right].bounds(), ray.min_t, ray.max_t);
                match (hit_left, hit_right) {
                    (Some((left_entry, _)), Some((right_entry, _))) => {
                        let (near, far, far_entry) = if left_entry <= right_entry {
                            (left, right, right_entry)
                        } else {
                            (right, left, left_entry)
                        };
                        self.closest_from(near, ray, isect);
                        // Kernels shrank max_t; the far child may now
                        // lie entirely beyond the best hit.
                        if far_entry < ray.max_t {
                            self.closest_from(far, ray, isect);
                        }
                    }
                    (Some(_), None) => self.closest_from(left, ray, isect),
                    (None, Some(_)) => self.closest_from(right, ray, isect),
                    (None, None) => {}
                }
            }
        }
    }

    fn any_from(&self, index: usize, ray: &mut Ray) -> bool {
        match &self.nodes[index] {
            BvhNode::Leaf { start, count, .. } => {
                for primitive in &self.primitives[*start..*start + *count] {
                    if primitive.intersect_any(ray) {
                        return true;
                    }
                }
                false
            }
            BvhNode::Interior { left, right, .. } => {
                let (left, right) = (*left, *right);
                if ray
                    .intersect_bbox(&self.nodes[left].bounds(), ray.min_t, ray.max_t)
                    .is_some()
                    && self.any_from(left, ray)
                {
                    return true;
                }
                ray.intersect_bbox(&self.nodes[right].bounds(), ray.min_t, ray.max_t)
                    .is_some()
                    && self.any_from(right, ray)
            }
        }
    }
}

impl Primitive for Bvh {
    fn bounds(&self) -> Bbox3 {
        Bvh::bounds(self)
    }

    fn intersect_any(&self, ray: &mut Ray) -> bool {
        Bvh::intersect_any(self, ray)
    }

    fn intersect_closest<'p>(&'p self, ray: &mut Ray, isect: &mut Intersection<'p>) -> bool {
        Bvh::intersect_closest(self, ray, isect)
    }

    fn material(&self) -> Option<MaterialId> {
        None
    }
}

/// Build the subtree for `info`, a range starting at absolute offset
/// `first` of the reordered primitive array.
fn build_range(info: &mut [PrimitiveInfo], first: usize, max_leaf_size: usize) -> BuildNode {
    let count = info.len();
    let mut bounds = Bbox3::empty();
    for pi in info.iter() {
        bounds.include_box(&pi.bounds);
    }

    if count <= max_leaf_size {
        return BuildNode::Leaf {
            bounds,
            start: first,
            count,
        };
    }

    let mut centroid_bounds = Bbox3::empty();
    for pi in info.iter() {
        centroid_bounds.include_point(&pi.centroid);
    }

    // Split only when the sweep found a boundary cheaper than testing
    // every primitive in one leaf. Coincident centroids never produce a
    // candidate, so pathological ranges stop here instead of recursing
    // forever.
    let (axis, split_bucket) = match find_best_split(info, &bounds, &centroid_bounds) {
        Some((axis, bucket, cost)) if cost < count as f64 => (axis, bucket),
        _ => {
            return BuildNode::Leaf {
                bounds,
                start: first,
                count,
            };
        }
    };

    let mid = partition_by_bucket(info, &centroid_bounds, axis, split_bucket);
    // The chosen boundary had primitives on both sides, and the
    // partition uses the same bucket function, so the midpoint is
    // interior.
    debug_assert!(mid > 0 && mid < count);

    let (left_info, right_info) = info.split_at_mut(mid);
    let (left, right) = if count >= PARALLEL_SPLIT_THRESHOLD {
        rayon::join(
            || build_range(left_info, first, max_leaf_size),
            || build_range(right_info, first + mid, max_leaf_size),
        )
    } else {
        (
            build_range(left_info, first, max_leaf_size),
            build_range(right_info, first + mid, max_leaf_size),
        )
    };

    BuildNode::Interior {
        bounds,
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// Sweep every bucket boundary on all three axes and return the
/// cheapest `(axis, boundary bucket, cost)` among boundaries with
/// primitives on both sides, if any.
fn find_best_split(
    info: &[PrimitiveInfo],
    bounds: &Bbox3,
    centroid_bounds: &Bbox3,
) -> Option<(usize, usize, f64)> {
    let total_area = bounds.surface_area();
    if total_area == 0.0 {
        return None;
    }

    let mut best: Option<(usize, usize, f64)> = None;

    for axis in 0..3 {
        // All centroids share this coordinate; no boundary on this axis
        // can separate them.
        if centroid_bounds.extent()[axis] <= 0.0 {
            continue;
        }

        let mut counts = [0usize; SAH_BUCKETS];
        let mut bucket_bounds = [Bbox3::empty(); SAH_BUCKETS];
        for pi in info {
            let b = bucket_index(centroid_bounds, &pi.centroid, axis);
            counts[b] += 1;
            bucket_bounds[b].include_box(&pi.bounds);
        }

        for split in 0..SAH_BUCKETS - 1 {
            let mut left_bounds = Bbox3::empty();
            let mut left_count = 0;
            for i in 0..=split {
                left_count += counts[i];
                left_bounds.include_box(&bucket_bounds[i]);
            }

            let mut right_bounds = Bbox3::empty();
            let mut right_count = 0;
            for i in split + 1..SAH_BUCKETS {
                right_count += counts[i];
                right_bounds.include_box(&bucket_bounds[i]);
            }

            if left_count == 0 || right_count == 0 {
                continue;
            }

            let cost = SAH_TRAVERSAL_COST
                + (left_count as f64 * left_bounds.surface_area()
                    + right_count as f64 * right_bounds.surface_area())
                    / total_area;

            if best.map_or(true, |(_, _, best_cost)| cost < best_cost) {
                best = Some((axis, split, cost));
            }
        }
    }

    best
}

/// Bucket of a centroid along `axis`. The same function drives both the
/// cost sweep and the partition, which is what guarantees the partition
/// point matches the counted split.
fn bucket_index(centroid_bounds: &Bbox3, centroid: &Point3, axis: usize) -> usize {
    let offset = centroid_bounds.offset(centroid)[axis];
    ((offset * SAH_BUCKETS as f64) as usize).min(SAH_BUCKETS - 1)
}

/// Two-pointer partition moving primitives whose bucket is at or below
/// `split_bucket` to the front. Returns the partition point.
fn partition_by_bucket(
    info: &mut [PrimitiveInfo],
    centroid_bounds: &Bbox3,
    axis: usize,
    split_bucket: usize,
) -> usize {
    let mut left = 0;
    let mut right = info.len();
    while left < right {
        if bucket_index(centroid_bounds, &info[left].centroid, axis) <= split_bucket {
            left += 1;
        } else {
            right -= 1;
            info.swap(left, right);
        }
    }
    left
}

/// Emit `node` and its subtree into the arena depth-first, left before
/// right, returning the node's arena index.
fn flatten_node(node: BuildNode, nodes: &mut Vec<BvhNode>) -> usize {
    let index = nodes.len();
    match node {
        BuildNode::Leaf {
            bounds,
            start,
            count,
        } => {
            nodes.push(BvhNode::Leaf {
                bounds,
                start,
                count,
            });
        }
        BuildNode::Interior {
            bounds,
            left,
            right,
        } => {
            // Place the node first, patch child indices after recursing.
            nodes.push(BvhNode::Interior {
                bounds,
                left: 0,
                right: 0,
            });
            let left_index = flatten_node(*left, nodes);
            let right_index = flatten_node(*right, nodes);
            if let BvhNode::Interior { left, right, .. } = &mut nodes[index] {
                *left = left_index;
                *right = right_index;
            }
        }
    }
    index
}
