//! Mesh construction: relief top, flat base, sealing walls, and the
//! optional hanging-hole bore.
//!
//! Grid convention: cell `(0, 0)` is the image's top-left pixel, mapped to
//! physical `x = 0`, `y = (rows-1)/resolution` so the model is
//! right-handed with +Z up and the image's top edge at far +Y. Winding is
//! counter-clockwise seen from outside the solid.

use crate::config::{HangingHole, ReliefConfig};
use crate::float_types::{Real, TAU};
use crate::heightfield::HeightField;
use crate::mesh::ReliefMesh;
use nalgebra::Point3;
use tracing::debug;

/// Fixed segment count of the hanging-hole bore.
pub const HOLE_SEGMENTS: usize = 16;

/// Build the watertight solid for a regularized height field.
///
/// An all-absent field (or a grid with no interior 2x2 block) produces an
/// empty mesh rather than an error; rejecting degenerate output is the
/// caller's call.
pub fn build(field: &HeightField, config: &ReliefConfig) -> ReliefMesh {
    Builder::new(field, config).run()
}

struct Builder<'a> {
    field: &'a HeightField,
    config: &'a ReliefConfig,
    mesh: ReliefMesh,
    /// Memoized vertex indices per grid cell.
    top: Vec<Option<u32>>,
    bottom: Vec<Option<u32>>,
    base_z: Real,
    w: usize,
    h: usize,
    /// Quad-grid dimensions (`w-1 x h-1`, saturating).
    qw: usize,
    qh: usize,
}

impl<'a> Builder<'a> {
    fn new(field: &'a HeightField, config: &'a ReliefConfig) -> Self {
        let w = field.width();
        let h = field.height();
        Builder {
            field,
            config,
            mesh: ReliefMesh::new(),
            top: vec![None; w * h],
            bottom: vec![None; w * h],
            base_z: config
                .wall_style
                .base_z(config.total_height, config.wall_height),
            w,
            h,
            qw: w.saturating_sub(1),
            qh: h.saturating_sub(1),
        }
    }

    fn run(mut self) -> ReliefMesh {
        // surface quads: every fully-present 2x2 block
        let mut quads = vec![false; self.qw * self.qh];
        for y in 0..self.qh {
            for x in 0..self.qw {
                quads[y * self.qw + x] = self.field.is_present(x, y)
                    && self.field.is_present(x + 1, y)
                    && self.field.is_present(x, y + 1)
                    && self.field.is_present(x + 1, y + 1);
            }
        }

        // quads whose center falls inside the hanging hole get no surface
        let mut skipped = vec![false; self.qw * self.qh];
        let mut removed = 0usize;
        if let Some(hole) = &self.config.hole {
            let res = self.config.resolution;
            let hx = (self.w as Real - 1.0) / 2.0;
            let hy = hole.edge_offset * res;
            let r = hole.diameter / 2.0 * res;
            for y in 0..self.qh {
                for x in 0..self.qw {
                    if !quads[y * self.qw + x] {
                        continue;
                    }
                    let dx = x as Real + 0.5 - hx;
                    let dy = y as Real + 0.5 - hy;
                    if dx * dx + dy * dy <= r * r {
                        skipped[y * self.qw + x] = true;
                        removed += 1;
                    }
                }
            }
        }

        self.emit_surfaces(&quads, &skipped);
        let wall_quads = self.emit_walls(&quads);
        if removed > 0 {
            if let Some(hole) = self.config.hole {
                self.emit_bore(&hole);
            }
        }

        debug!(
            triangles = self.mesh.triangle_count(),
            wall_quads,
            hole_quads_removed = removed,
            "relief mesh built"
        );
        self.mesh
    }

    /// Physical X of grid column `x`.
    fn px(&self, x: Real) -> Real {
        x / self.config.resolution
    }

    /// Physical Y of grid row `y` (row 0 is the far edge).
    fn py(&self, y: Real) -> Real {
        (self.h as Real - 1.0 - y) / self.config.resolution
    }

    fn vertex_z(&self, surface: Real) -> Real {
        self.config
            .wall_style
            .vertex_z(surface, self.config.total_height, self.config.wall_height)
            + self.config.base_thickness
    }

    fn top_index(&mut self, x: usize, y: usize) -> u32 {
        if let Some(idx) = self.top[y * self.w + x] {
            return idx;
        }
        let surface = self
            .field
            .get(x, y)
            .expect("top vertex requested for an absent cell");
        let p = Point3::new(self.px(x as Real), self.py(y as Real), self.vertex_z(surface));
        let idx = self.mesh.push_vertex(p);
        self.top[y * self.w + x] = Some(idx);
        idx
    }

    fn bottom_index(&mut self, x: usize, y: usize) -> u32 {
        if let Some(idx) = self.bottom[y * self.w + x] {
            return idx;
        }
        let p = Point3::new(self.px(x as Real), self.py(y as Real), self.base_z);
        let idx = self.mesh.push_vertex(p);
        self.bottom[y * self.w + x] = Some(idx);
        idx
    }

    /// Top and bottom surfaces: two triangles per kept quad, the bottom
    /// set mirrored with reversed winding so its normals face down.
    fn emit_surfaces(&mut self, quads: &[bool], skipped: &[bool]) {
        for y in 0..self.qh {
            for x in 0..self.qw {
                if !quads[y * self.qw + x] || skipped[y * self.qw + x] {
                    continue;
                }
                let a = self.top_index(x, y);
                let b = self.top_index(x + 1, y);
                let c = self.top_index(x, y + 1);
                let d = self.top_index(x + 1, y + 1);
                self.mesh.push_triangle(a, c, d);
                self.mesh.push_triangle(a, d, b);

                let a = self.bottom_index(x, y);
                let b = self.bottom_index(x + 1, y);
                let c = self.bottom_index(x, y + 1);
                let d = self.bottom_index(x + 1, y + 1);
                self.mesh.push_triangle(a, d, c);
                self.mesh.push_triangle(a, b, d);
            }
        }
    }

    /// Seal every boundary edge of the top surface down to the base.
    ///
    /// A grid edge between two present cells is a boundary when exactly
    /// one of its two flanking surface quads exists - which covers the
    /// crop outline and the image's outer border alike. The wall quad is
    /// wound so its outward normal points away from the solid: vertices
    /// are ordered A->B with the solid on the right-hand side.
    fn emit_walls(&mut self, quads: &[bool]) -> usize {
        let mut count = 0usize;

        // horizontal edges (between (x, y) and (x+1, y))
        for y in 0..self.h {
            for x in 0..self.qw {
                if !(self.field.is_present(x, y) && self.field.is_present(x + 1, y)) {
                    continue;
                }
                let above = y > 0 && quads[(y - 1) * self.qw + x];
                let below = y < self.qh && quads[y * self.qw + x];
                match (above, below) {
                    (true, false) => {
                        self.emit_wall((x + 1, y), (x, y));
                        count += 1;
                    },
                    (false, true) => {
                        self.emit_wall((x, y), (x + 1, y));
                        count += 1;
                    },
                    _ => {},
                }
            }
        }

        // vertical edges (between (x, y) and (x, y+1))
        for y in 0..self.qh {
            for x in 0..self.w {
                if !(self.field.is_present(x, y) && self.field.is_present(x, y + 1)) {
                    continue;
                }
                let west = x > 0 && quads[y * self.qw + x - 1];
                let east = x < self.qw && quads[y * self.qw + x];
                match (west, east) {
                    (true, false) => {
                        self.emit_wall((x, y), (x, y + 1));
                        count += 1;
                    },
                    (false, true) => {
                        self.emit_wall((x, y + 1), (x, y));
                        count += 1;
                    },
                    _ => {},
                }
            }
        }

        count
    }

    fn emit_wall(&mut self, a: (usize, usize), b: (usize, usize)) {
        let ta = self.top_index(a.0, a.1);
        let tb = self.top_index(b.0, b.1);
        let ba = self.bottom_index(a.0, a.1);
        let bb = self.bottom_index(b.0, b.1);
        self.mesh.push_triangle(ta, tb, bb);
        self.mesh.push_triangle(ta, bb, ba);
    }

    /// The hanging-hole bore: an inward-facing cylinder band from the
    /// local top surface down to `max(base_z, top - loop_depth)`. Both
    /// ends stay open so a cord can pass through.
    fn emit_bore(&mut self, hole: &HangingHole) {
        let res = self.config.resolution;
        let r = hole.diameter / 2.0;
        let pcx = self.px((self.w as Real - 1.0) / 2.0);
        let pcy = self.py(hole.edge_offset * res);

        // top ring follows the surface; the band floor is uniform
        let mut ring_surface = Vec::with_capacity(HOLE_SEGMENTS);
        for i in 0..HOLE_SEGMENTS {
            let phi = TAU * (i as Real) / (HOLE_SEGMENTS as Real);
            let x = pcx + r * phi.cos();
            let y = pcy + r * phi.sin();
            let gx = (x * res).round().clamp(0.0, self.w as Real - 1.0) as usize;
            let gy = (self.h as Real - 1.0 - y * res)
                .round()
                .clamp(0.0, self.h as Real - 1.0) as usize;
            let surface = self
                .field
                .get(gx, gy)
                .map_or(self.base_z, |s| self.vertex_z(s));
            ring_surface.push((x, y, surface));
        }
        let top_min = ring_surface
            .iter()
            .map(|&(_, _, z)| z)
            .fold(Real::INFINITY, Real::min);
        let floor_z = (top_min - hole.loop_depth).max(self.base_z);

        let top_ring: Vec<u32> = ring_surface
            .iter()
            .map(|&(x, y, z)| self.mesh.push_vertex(Point3::new(x, y, z)))
            .collect();
        let bottom_ring: Vec<u32> = ring_surface
            .iter()
            .map(|&(x, y, _)| self.mesh.push_vertex(Point3::new(x, y, floor_z)))
            .collect();

        for i in 0..HOLE_SEGMENTS {
            let j = (i + 1) % HOLE_SEGMENTS;
            self.mesh.push_triangle(top_ring[i], top_ring[j], bottom_ring[j]);
            self.mesh.push_triangle(top_ring[i], bottom_ring[j], bottom_ring[i]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HangingHole, ReliefConfig, WallStyle};

    fn flat_field(w: usize, h: usize, value: Real) -> HeightField {
        let mut field = HeightField::new(w, h);
        for y in 0..h {
            for x in 0..w {
                field.set(x, y, value);
            }
        }
        field
    }

    fn cfg() -> ReliefConfig {
        ReliefConfig {
            total_height: 5.0,
            min_height: 0.0,
            wall_height: 10.0,
            wall_style: WallStyle::FlushBottom,
            resolution: 1.0,
            ..ReliefConfig::default()
        }
    }

    #[test]
    fn empty_field_builds_an_empty_mesh() {
        let mesh = build(&HeightField::new(8, 8), &cfg());
        assert!(mesh.is_empty());
    }

    #[test]
    fn one_pixel_wide_grids_produce_no_geometry() {
        for (w, h) in [(1, 6), (6, 1), (1, 1)] {
            let mesh = build(&flat_field(w, h, 5.0), &cfg());
            assert!(mesh.is_empty(), "{w}x{h} should be degenerate");
        }
    }

    #[test]
    fn four_by_four_flat_relief_counts() {
        // 3x3 quads on top and bottom, 12 boundary edge segments
        let mesh = build(&flat_field(4, 4, 5.0), &cfg());
        assert_eq!(mesh.triangle_count(), 18 + 18 + 24);
        for v in &mesh.vertices {
            assert!(
                v.z == 0.0 || v.z == 15.0,
                "unexpected Z {} in flush-bottom build",
                v.z
            );
        }
    }

    #[test]
    fn flush_top_places_the_relief_below_the_wall_top() {
        let config = ReliefConfig {
            wall_style: WallStyle::FlushTop,
            ..cfg()
        };
        let mesh = build(&flat_field(4, 4, 5.0), &config);
        let aabb = mesh.bounding_box().unwrap();
        // relief top lands exactly at wall height, base at wall - total
        assert_eq!(aabb.maxs.z, 10.0);
        assert_eq!(aabb.mins.z, 5.0);
    }

    #[test]
    fn base_thickness_lifts_the_top_surface_only() {
        let config = ReliefConfig {
            base_thickness: 2.0,
            ..cfg()
        };
        let mesh = build(&flat_field(4, 4, 5.0), &config);
        let aabb = mesh.bounding_box().unwrap();
        assert_eq!(aabb.mins.z, 0.0);
        assert_eq!(aabb.maxs.z, 17.0);
    }

    #[test]
    fn hole_removes_surface_quads_and_adds_the_bore() {
        let plain = build(&flat_field(20, 20, 5.0), &cfg());
        let config = ReliefConfig {
            hole: Some(HangingHole {
                diameter: 4.0,
                loop_depth: 50.0,
                edge_offset: 5.0,
            }),
            ..cfg()
        };
        let holed = build(&flat_field(20, 20, 5.0), &config);

        // count the quads the skip rule removes, by the same circle test
        let (hx, hy, r) = (9.5, 5.0, 2.0);
        let mut removed = 0;
        for y in 0..19 {
            for x in 0..19 {
                let dx = x as Real + 0.5 - hx;
                let dy = y as Real + 0.5 - hy;
                if dx * dx + dy * dy <= r * r {
                    removed += 1;
                }
            }
        }
        assert!(removed > 0);
        assert_eq!(
            holed.triangle_count(),
            plain.triangle_count() - 4 * removed + 2 * HOLE_SEGMENTS
        );
        // the bore floor reaches the base: a full through-hole
        let low = holed
            .vertices
            .iter()
            .map(|v| v.z)
            .fold(Real::INFINITY, Real::min);
        assert_eq!(low, 0.0);
    }
}
