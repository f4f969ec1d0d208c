#![warn(missing_docs)]

//! Ray tracing acceleration for the glint renderer.
//!
//! This crate holds the hot path of the renderer: a bounding volume
//! hierarchy built once per scene with the surface area heuristic, and
//! the ray-primitive intersection kernels it dispatches to. Primitives
//! arrive pre-transformed into one common space and never change after
//! the build; the finished tree is immutable and can be queried from any
//! number of threads at once.
//!
//! # Architecture
//!
//! - [`Ray`] - Ray with a shrinking valid parameter interval
//! - [`Intersection`] - Closest-hit record filled in place
//! - [`Primitive`] - Capability set the accelerator works against
//! - [`Triangle`], [`Sphere`] - Intersection kernels
//! - [`Bvh`] - SAH-built hierarchy with any-hit and closest-hit queries
//!
//! # Example
//!
//! ```ignore
//! use glint_trace::{Bvh, Intersection, Ray};
//! use glint_math::{Point3, Vec3};
//!
//! let bvh = Bvh::build(primitives);
//!
//! let mut ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
//! let mut isect = Intersection::default();
//! if bvh.intersect_closest(&mut ray, &mut isect) {
//!     shade(isect.material, isect.normal);
//! }
//! ```

mod ray;
pub mod bvh;
pub mod primitive;

pub use bvh::{Bvh, BvhNode};
pub use primitive::{Intersection, Primitive, Sphere, Triangle};
pub use ray::Ray;
