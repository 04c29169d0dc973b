/// A trait for any shape which can be represented by triangles
use crate::float_types::Real;
use nalgebra::Point3;

/// A triangulated 3D surface.
///
/// Anything that can present itself as a bunch of triangles in 3D can use
/// the triangle-based IO backends, whether it stores an indexed mesh or a
/// flat triangle list.
pub trait Triangulated3D {
    /// Call `f` for each triangle.
    ///
    /// Corners are passed in winding order; facet normals are derived by
    /// the consumer.
    fn visit_triangles<F>(&self, f: F)
    where
        F: FnMut([Point3<Real>; 3]);
}

impl Triangulated3D for [[Point3<Real>; 3]] {
    fn visit_triangles<F>(&self, mut f: F)
    where
        F: FnMut([Point3<Real>; 3]),
    {
        for tri in self {
            f(*tri);
        }
    }
}

impl Triangulated3D for Vec<[Point3<Real>; 3]> {
    fn visit_triangles<F>(&self, f: F)
    where
        F: FnMut([Point3<Real>; 3]),
    {
        self.as_slice().visit_triangles(f);
    }
}
