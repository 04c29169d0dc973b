//! `ReliefMesh`: the indexed triangle mesh produced by the builder.

use crate::float_types::Real;
use crate::triangulated::Triangulated3D;
use nalgebra::{Point3, Vector3};

#[cfg(feature = "hashmap")]
pub mod manifold;

/// Axis-aligned bounding box over mesh vertices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub mins: Point3<Real>,
    pub maxs: Point3<Real>,
}

impl Aabb {
    #[inline]
    pub const fn new(mins: Point3<Real>, maxs: Point3<Real>) -> Self {
        Self { mins, maxs }
    }

    /// Grow the box to cover `p`.
    pub fn take_point(&mut self, p: &Point3<Real>) {
        self.mins.x = self.mins.x.min(p.x);
        self.mins.y = self.mins.y.min(p.y);
        self.mins.z = self.mins.z.min(p.z);
        self.maxs.x = self.maxs.x.max(p.x);
        self.maxs.y = self.maxs.y.max(p.y);
        self.maxs.z = self.maxs.z.max(p.z);
    }

    pub fn extents(&self) -> Vector3<Real> {
        self.maxs - self.mins
    }
}

/// An indexed triangle mesh in physical model units.
///
/// Invariants the builder maintains: every triangle's three indices are
/// distinct and in range, and the mesh is a 2-manifold whose only open
/// boundary (if any) is the hanging-hole rim.
#[derive(Debug, Clone, Default)]
pub struct ReliefMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3<Real>>,
    /// Counter-clockwise index triples, outward-facing.
    pub triangles: Vec<[u32; 3]>,
}

impl ReliefMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Append a vertex, returning its index.
    pub fn push_vertex(&mut self, p: Point3<Real>) -> u32 {
        let idx = self.vertices.len() as u32;
        self.vertices.push(p);
        idx
    }

    pub fn push_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        debug_assert!(i0 != i1 && i1 != i2 && i0 != i2, "degenerate triangle");
        self.triangles.push([i0, i1, i2]);
    }

    /// The three corner positions of triangle `t`.
    pub fn triangle_points(&self, t: usize) -> [Point3<Real>; 3] {
        let [a, b, c] = self.triangles[t];
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }

    /// Axis-aligned bounds over all vertices; `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<Aabb> {
        let first = self.vertices.first()?;
        let mut aabb = Aabb::new(*first, *first);
        for v in &self.vertices[1..] {
            aabb.take_point(v);
        }
        Some(aabb)
    }

    /// Flatten into an unindexed triangle list. The serializer accepts
    /// either representation; this is for callers that want triangle
    /// soup.
    pub fn to_triangle_list(&self) -> Vec<[Point3<Real>; 3]> {
        (0..self.triangles.len())
            .map(|t| self.triangle_points(t))
            .collect()
    }
}

impl Triangulated3D for ReliefMesh {
    fn visit_triangles<F>(&self, mut f: F)
    where
        F: FnMut([Point3<Real>; 3]),
    {
        for t in 0..self.triangles.len() {
            f(self.triangle_points(t));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_spans_all_vertices() {
        let mut mesh = ReliefMesh::new();
        let a = mesh.push_vertex(Point3::new(-1.0, 0.0, 2.0));
        let b = mesh.push_vertex(Point3::new(3.0, -2.0, 0.0));
        let c = mesh.push_vertex(Point3::new(0.0, 5.0, 1.0));
        mesh.push_triangle(a, b, c);
        let aabb = mesh.bounding_box().unwrap();
        assert_eq!(aabb.mins, Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.maxs, Point3::new(3.0, 5.0, 2.0));
    }

    #[test]
    fn empty_mesh_has_no_bounds() {
        assert!(ReliefMesh::new().bounding_box().is_none());
    }

    #[test]
    fn triangle_list_matches_the_indexed_form() {
        let mut mesh = ReliefMesh::new();
        let a = mesh.push_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.push_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.push_vertex(Point3::new(0.0, 1.0, 0.0));
        mesh.push_triangle(a, b, c);
        let soup = mesh.to_triangle_list();
        assert_eq!(soup.len(), 1);
        assert_eq!(soup[0], mesh.triangle_points(0));
    }
}
