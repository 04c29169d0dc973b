//! Manifold and boundary-edge validation helpers.

use crate::mesh::ReliefMesh;
use hashbrown::HashMap;

impl ReliefMesh {
    /// Count of undirected edges per occurrence across all triangles.
    fn edge_counts(&self) -> HashMap<(u32, u32), u32> {
        let mut counts: HashMap<(u32, u32), u32> = HashMap::new();
        for tri in &self.triangles {
            for i in 0..3 {
                let a = tri[i];
                let b = tri[(i + 1) % 3];
                let key = if a < b { (a, b) } else { (b, a) };
                *counts.entry(key).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Number of open boundary edges (edges used by exactly one triangle).
    ///
    /// A sealed relief solid reports 0; with a hanging hole enabled the
    /// bore rim is the only expected boundary.
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_counts()
            .values()
            .filter(|&&count| count == 1)
            .count()
    }

    /// Checks if the mesh is manifold: every edge shared by exactly two
    /// triangles.
    pub fn is_manifold(&self) -> bool {
        !self.is_empty() && self.edge_counts().values().all(|&count| count == 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float_types::Real;
    use nalgebra::Point3;

    fn tetrahedron() -> ReliefMesh {
        let mut mesh = ReliefMesh::new();
        let p: Vec<u32> = [
            Point3::<Real>::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ]
        .into_iter()
        .map(|v| mesh.push_vertex(v))
        .collect();
        mesh.push_triangle(p[0], p[2], p[1]);
        mesh.push_triangle(p[0], p[1], p[3]);
        mesh.push_triangle(p[1], p[2], p[3]);
        mesh.push_triangle(p[0], p[3], p[2]);
        mesh
    }

    #[test]
    fn tetrahedron_is_closed() {
        let mesh = tetrahedron();
        assert!(mesh.is_manifold());
        assert_eq!(mesh.boundary_edge_count(), 0);
    }

    #[test]
    fn single_triangle_has_three_boundary_edges() {
        let mut mesh = ReliefMesh::new();
        let a = mesh.push_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.push_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.push_vertex(Point3::new(0.0, 1.0, 0.0));
        mesh.push_triangle(a, b, c);
        assert!(!mesh.is_manifold());
        assert_eq!(mesh.boundary_edge_count(), 3);
    }

    #[test]
    fn empty_mesh_is_not_manifold() {
        assert!(!ReliefMesh::new().is_manifold());
    }
}
