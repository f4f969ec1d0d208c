#![warn(missing_docs)]

//! Geometry storage for the glint render kernels.
//!
//! Bounding boxes, triangle mesh buffers, and the opaque material
//! handle that travels from primitives into intersection records.

pub mod bbox;
pub mod mesh;

pub use bbox::Bbox3;
pub use mesh::{MeshError, TriMesh};

/// Opaque handle to a surface's shading description.
///
/// The tracer never interprets the handle. It is carried from the hit
/// primitive into the intersection record for the shading system to
/// resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);
