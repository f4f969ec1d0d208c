//! Triangle mesh vertex storage.
//!
//! A `TriMesh` owns the position and normal buffers that triangle
//! primitives index into. Buffers are validated on construction and
//! immutable afterwards, so indices checked once stay valid for the
//! lifetime of the mesh.

use glint_math::{Point3, Vec3};
use thiserror::Error;

use crate::MaterialId;

/// Errors from mesh and triangle construction.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The normal buffer length does not match the vertex buffer length.
    #[error("normal count {normals} does not match vertex count {vertices}")]
    MismatchedNormals {
        /// Number of vertex positions supplied.
        vertices: usize,
        /// Number of vertex normals supplied.
        normals: usize,
    },
    /// A triangle references a vertex index outside the mesh.
    #[error("vertex index {index} out of range for mesh with {vertices} vertices")]
    IndexOutOfRange {
        /// The offending vertex index.
        index: usize,
        /// Number of vertices in the mesh.
        vertices: usize,
    },
}

/// Vertex positions and per-vertex normals for a set of triangles, with
/// one material shared by the whole mesh.
#[derive(Debug, Clone)]
pub struct TriMesh {
    positions: Vec<Point3>,
    normals: Vec<Vec3>,
    material: MaterialId,
}

impl TriMesh {
    /// Create a mesh from parallel position and normal buffers.
    pub fn new(
        positions: Vec<Point3>,
        normals: Vec<Vec3>,
        material: MaterialId,
    ) -> Result<Self, MeshError> {
        if normals.len() != positions.len() {
            return Err(MeshError::MismatchedNormals {
                vertices: positions.len(),
                normals: normals.len(),
            });
        }
        Ok(Self {
            positions,
            normals,
            material,
        })
    }

    /// Vertex positions.
    pub fn positions(&self) -> &[Point3] {
        &self.positions
    }

    /// Per-vertex normals, parallel to `positions`.
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Material shared by every triangle of this mesh.
    pub fn material(&self) -> MaterialId {
        self.material
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_construction() {
        let mesh = TriMesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![Vec3::z(), Vec3::z(), Vec3::z()],
            MaterialId(7),
        )
        .unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.material(), MaterialId(7));
        assert!((mesh.positions()[1].x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mesh_rejects_mismatched_normals() {
        let result = TriMesh::new(
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)],
            vec![Vec3::z()],
            MaterialId(0),
        );
        assert!(matches!(
            result,
            Err(MeshError::MismatchedNormals {
                vertices: 2,
                normals: 1
            })
        ));
    }
}
