//! STL export/import and the mesh statistics query.
//!
//! The binary layout is the classic STL contract: an 80-byte free-form
//! header, a little-endian `u32` triangle count, then 50 bytes per
//! triangle (f32 normal, three f32 vertices in winding order, and a
//! zeroed `u16` attribute) - `84 + 50*T` bytes total.

use crate::float_types::{Real, tolerance};
use crate::mesh::Aabb;
use crate::triangulated::Triangulated3D;
use nalgebra::{Point3, Vector3};

/// Facet normal: normalized `(v2-v1) x (v3-v1)`. Degenerate triangles get
/// a zero normal rather than NaN.
pub fn facet_normal(tri: &[Point3<Real>; 3]) -> Vector3<Real> {
    let n = (tri[1] - tri[0]).cross(&(tri[2] - tri[0]));
    let len = n.norm();
    if len > tolerance() { n / len } else { Vector3::zeros() }
}

/// Summary statistics consumed by user-facing feedback surfaces. Not part
/// of the mesh's correctness contract.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshStats {
    pub triangle_count: u32,
    /// Min/max per axis over all referenced vertices; `None` when empty.
    pub bounding_box: Option<Aabb>,
    /// Exact size of the binary STL stream for this mesh.
    pub estimated_bytes: usize,
}

/// Compute [`MeshStats`] for any triangulated shape.
pub fn stats<T: Triangulated3D>(shape: &T) -> MeshStats {
    let mut count: u32 = 0;
    let mut bounding_box: Option<Aabb> = None;
    shape.visit_triangles(|tri| {
        count += 1;
        for p in &tri {
            match &mut bounding_box {
                None => bounding_box = Some(Aabb::new(*p, *p)),
                Some(aabb) => aabb.take_point(p),
            }
        }
    });
    MeshStats {
        triangle_count: count,
        bounding_box,
        estimated_bytes: 80 + 4 + 50 * count as usize,
    }
}

/// Convert this shape to an **ASCII STL** string with the given `name`.
pub fn to_stl_ascii<T: Triangulated3D>(shape: &T, name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("solid {name}\n"));

    shape.visit_triangles(|tri| {
        let n = facet_normal(&tri);
        out.push_str(&format!(
            "  facet normal {:.6} {:.6} {:.6}\n",
            n.x, n.y, n.z
        ));
        out.push_str("    outer loop\n");
        for p in &tri {
            out.push_str(&format!(
                "      vertex {:.6} {:.6} {:.6}\n",
                p.x, p.y, p.z
            ));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    });

    out.push_str(&format!("endsolid {name}\n"));
    out
}

/// Convert this shape to a **binary STL** byte vector.
///
/// The resulting `Vec<u8>` can then be written to a file or handled in
/// memory:
///
/// ```no_run
/// # use reliefcast::{ReliefConfig, generate};
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([255; 4]));
/// let mesh = generate(&img, &ReliefConfig::default())?;
/// let bytes = mesh.to_stl_binary()?;
/// std::fs::write("relief.stl", bytes)?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "stl-io")]
pub fn to_stl_binary<T: Triangulated3D>(shape: &T) -> std::io::Result<Vec<u8>> {
    use stl_io::{Normal, Triangle, Vertex, write_stl};

    let mut triangles = Vec::<Triangle>::new();

    shape.visit_triangles(|tri| {
        let n = facet_normal(&tri);
        #[allow(clippy::unnecessary_cast)]
        {
            triangles.push(Triangle {
                normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: tri.map(|p| Vertex::new([p.x as f32, p.y as f32, p.z as f32])),
            });
        }
    });

    let mut cursor = std::io::Cursor::new(Vec::new());
    write_stl(&mut cursor, triangles.iter())?;
    Ok(cursor.into_inner())
}

/// Read a binary STL stream back into a flat triangle list. Used for
/// round-trip validation; normals are recomputed by consumers.
#[cfg(feature = "stl-io")]
pub fn from_stl_binary(data: &[u8]) -> std::io::Result<Vec<[Point3<Real>; 3]>> {
    let mut cursor = std::io::Cursor::new(data);
    let indexed = stl_io::read_stl(&mut cursor)?;
    #[allow(clippy::unnecessary_cast)]
    let triangles = indexed
        .faces
        .iter()
        .map(|face| {
            face.vertices.map(|vi| {
                let v = indexed.vertices[vi];
                Point3::new(v[0] as Real, v[1] as Real, v[2] as Real)
            })
        })
        .collect();
    Ok(triangles)
}

impl crate::mesh::ReliefMesh {
    pub fn to_stl_ascii(&self, name: &str) -> String {
        self::to_stl_ascii(self, name)
    }

    #[cfg(feature = "stl-io")]
    pub fn to_stl_binary(&self) -> std::io::Result<Vec<u8>> {
        self::to_stl_binary(self)
    }

    pub fn stats(&self) -> MeshStats {
        self::stats(self)
    }
}
