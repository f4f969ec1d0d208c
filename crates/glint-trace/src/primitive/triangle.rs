//! Ray-triangle intersection (Moller-Trumbore).

use std::sync::Arc;

use glint_geom::{Bbox3, MaterialId, MeshError, TriMesh};

use crate::{Intersection, Primitive, Ray};

/// Determinant magnitude below which the ray is treated as parallel to
/// the triangle plane and reported as a miss. A robustness tunable;
/// degenerate (zero-area) triangles fall under it too.
const DET_EPSILON: f64 = 1e-12;

/// One triangle of a [`TriMesh`], indexing into the mesh's vertex
/// buffers.
#[derive(Debug, Clone)]
pub struct Triangle {
    mesh: Arc<TriMesh>,
    indices: [usize; 3],
}

impl Triangle {
    /// Create a triangle over three vertices of `mesh`.
    ///
    /// Indices are validated here once; the mesh is immutable, so the
    /// kernels index without re-checking.
    pub fn new(mesh: Arc<TriMesh>, indices: [usize; 3]) -> Result<Self, MeshError> {
        for &index in &indices {
            if index >= mesh.vertex_count() {
                return Err(MeshError::IndexOutOfRange {
                    index,
                    vertices: mesh.vertex_count(),
                });
            }
        }
        Ok(Self { mesh, indices })
    }

    /// Moller-Trumbore solve. Returns barycentric `(u, v)` and the
    /// parameter `t` for a hit strictly inside the ray interval.
    fn solve(&self, ray: &Ray) -> Option<(f64, f64, f64)> {
        let positions = self.mesh.positions();
        let p0 = positions[self.indices[0]];
        let p1 = positions[self.indices[1]];
        let p2 = positions[self.indices[2]];

        let e1 = p1 - p0;
        let e2 = p2 - p0;
        let d = ray.direction.as_ref();

        // Two-sided: only the determinant's magnitude is tested.
        let p_vec = d.cross(&e2);
        let det = e1.dot(&p_vec);
        if det.abs() < DET_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let t_vec = ray.origin - p0;
        let u = t_vec.dot(&p_vec) * inv_det;
        if u < 0.0 || u > 1.0 {
            return None;
        }

        let q_vec = t_vec.cross(&e1);
        let v = d.dot(&q_vec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = e2.dot(&q_vec) * inv_det;
        if t <= ray.min_t || t >= ray.max_t {
            return None;
        }
        Some((u, v, t))
    }
}

impl Primitive for Triangle {
    fn bounds(&self) -> Bbox3 {
        let positions = self.mesh.positions();
        let mut bounds = Bbox3::empty();
        bounds.include_point(&positions[self.indices[0]]);
        bounds.include_point(&positions[self.indices[1]]);
        bounds.include_point(&positions[self.indices[2]]);
        bounds
    }

    fn intersect_any(&self, ray: &mut Ray) -> bool {
        match self.solve(ray) {
            Some((_, _, t)) => {
                ray.max_t = t;
                true
            }
            None => false,
        }
    }

    fn intersect_closest<'p>(&'p self, ray: &mut Ray, isect: &mut Intersection<'p>) -> bool {
        let (u, v, t) = match self.solve(ray) {
            Some(hit) => hit,
            None => return false,
        };

        let normals = self.mesh.normals();
        let n0 = normals[self.indices[0]];
        let n1 = normals[self.indices[1]];
        let n2 = normals[self.indices[2]];
        let mut normal = (1.0 - u - v) * n0 + u * n1 + v * n2;
        // Flip toward the ray origin.
        if ray.direction.as_ref().dot(&normal) > 0.0 {
            normal = -normal;
        }

        ray.max_t = t;
        isect.t = t;
        isect.primitive = Some(self);
        isect.normal = normal;
        isect.material = Some(self.mesh.material());
        true
    }

    fn material(&self) -> Option<MaterialId> {
        Some(self.mesh.material())
    }
}
