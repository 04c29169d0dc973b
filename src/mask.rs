//! Crop masking: classify each pixel as inside or outside the configured
//! planar shape.
//!
//! Polygon containment goes through `geo`'s ray-casting point-in-polygon
//! test rather than a per-shape analytic formula, so arbitrary future
//! shapes drop in without new math.

use crate::config::{CropShape, ReliefConfig};
use crate::float_types::{FRAC_PI_2, Real, TAU};
use geo::{Contains, LineString, Polygon, point};

/// The containment test for one shape, with the per-build work (polygon
/// vertex list) done once.
enum Region {
    Rect { rx: Real, ry: Real },
    Ellipse { rx: Real, ry: Real },
    Poly(Polygon<Real>),
}

impl Region {
    fn new(width: usize, height: usize, config: &ReliefConfig) -> Self {
        let w = width as Real;
        let h = height as Real;
        let rx = w * config.crop_width / 2.0;
        let ry = h * config.crop_height / 2.0;
        match config.crop_shape {
            CropShape::Rectangle => Region::Rect { rx, ry },
            CropShape::Ellipse => Region::Ellipse { rx, ry },
            CropShape::Circle => {
                let r = rx.min(ry);
                Region::Ellipse { rx: r, ry: r }
            },
            CropShape::Polygon { sides, rotation_deg } => {
                let r = rx.min(ry);
                let rot = rotation_deg.to_radians();
                let coords: Vec<(Real, Real)> = (0..sides)
                    .map(|k| {
                        let theta = rot + TAU * (k as Real) / (sides as Real) - FRAC_PI_2;
                        (r * theta.cos(), r * theta.sin())
                    })
                    .collect();
                Region::Poly(Polygon::new(LineString::from(coords), vec![]))
            },
        }
    }

    /// `dx`/`dy` are offsets from the image center.
    fn contains(&self, dx: Real, dy: Real) -> bool {
        match self {
            Region::Rect { rx, ry } => dx.abs() <= *rx && dy.abs() <= *ry,
            Region::Ellipse { rx, ry } => {
                if *rx <= 0.0 || *ry <= 0.0 {
                    return false;
                }
                (dx * dx) / (rx * rx) + (dy * dy) / (ry * ry) <= 1.0
            },
            Region::Poly(poly) => poly.contains(&point!(x: dx, y: dy)),
        }
    }
}

/// One-shot containment test for the pixel at `(x, y)` of a
/// `width x height` image. Deterministic, and invariant under the
/// configured shape's own symmetry group.
pub fn contains(x: usize, y: usize, width: usize, height: usize, config: &ReliefConfig) -> bool {
    let region = Region::new(width, height, config);
    let dx = (x as Real + 0.5) - width as Real / 2.0;
    let dy = (y as Real + 0.5) - height as Real / 2.0;
    region.contains(dx, dy)
}

/// Boolean membership grid, derived once from shape + dimensions and never
/// mutated.
#[derive(Debug, Clone)]
pub struct CropMask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl CropMask {
    /// Classify every pixel of a `width x height` grid.
    pub fn build(width: usize, height: usize, config: &ReliefConfig) -> Self {
        let region = Region::new(width, height, config);
        let cx = width as Real / 2.0;
        let cy = height as Real / 2.0;
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let dx = (x as Real + 0.5) - cx;
                let dy = (y as Real + 0.5) - cy;
                cells.push(region.contains(dx, dy));
            }
        }
        CropMask {
            width,
            height,
            cells,
        }
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    /// Membership of pixel `(x, y)`; out-of-grid is outside.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x]
    }

    /// Number of pixels inside the crop.
    pub fn inside_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}
