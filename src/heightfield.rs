//! The height field: a grid of optional physical surface heights.
//!
//! `None` means "outside the crop"; there are no sentinel heights. The
//! grid is constructed once per generation request and mutated in place by
//! the regularization passes; it is never resized.

use crate::config::{ReliefConfig, Rotation};
use crate::depth;
use crate::float_types::Real;
use crate::mask::CropMask;
use image::RgbaImage;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct HeightField {
    width: usize,
    height: usize,
    cells: Vec<Option<Real>>,
}

impl HeightField {
    /// An all-absent field.
    pub fn new(width: usize, height: usize) -> Self {
        HeightField {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    /// Grid dimensions after applying the configured quarter-turn to a
    /// `width x height` source raster.
    pub const fn oriented_dimensions(
        width: usize,
        height: usize,
        rotation: Rotation,
    ) -> (usize, usize) {
        if rotation.swaps_axes() {
            (height, width)
        } else {
            (width, height)
        }
    }

    /// Build the field from a source raster and its crop mask.
    ///
    /// For every grid cell inside the mask the surface height is
    /// `min_height + depth * (total_height - min_height)` - the
    /// authoritative physical relief height before any wall-style offset.
    /// The mask must already use the oriented grid dimensions.
    pub fn from_image(img: &RgbaImage, mask: &CropMask, config: &ReliefConfig) -> Self {
        let (sw, sh) = (img.width() as usize, img.height() as usize);
        let (gw, gh) = Self::oriented_dimensions(sw, sh, config.rotation);
        debug_assert_eq!((mask.width(), mask.height()), (gw, gh));

        let range = config.relief_range();
        let mut field = HeightField::new(gw, gh);
        for gy in 0..gh {
            for gx in 0..gw {
                if !mask.contains(gx, gy) {
                    continue;
                }
                let (sx, sy) = source_pixel(gx, gy, gw, gh, sw, sh, config);
                let d = depth::sample(
                    *img.get_pixel(sx as u32, sy as u32),
                    config.depth_mode,
                    config.contrast_curve,
                    config.invert_depth,
                );
                field.cells[gy * gw + gx] = Some(config.min_height + d * range);
            }
        }

        if config.wall_thickness > 0.0 {
            field.raise_rim(config);
        }
        field
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    /// Surface height of cell `(x, y)`; `None` outside the crop or grid.
    pub fn get(&self, x: usize, y: usize) -> Option<Real> {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            None
        }
    }

    /// Overwrite the height of a present cell. Panics out of bounds.
    pub fn set(&mut self, x: usize, y: usize, value: Real) {
        self.cells[y * self.width + x] = Some(value);
    }

    pub fn is_present(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_some()
    }

    pub fn present_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Min and max over present cells; `None` for an all-absent field.
    pub fn min_max(&self) -> Option<(Real, Real)> {
        let mut bounds: Option<(Real, Real)> = None;
        for h in self.cells.iter().flatten() {
            bounds = Some(match bounds {
                None => (*h, *h),
                Some((lo, hi)) => (lo.min(*h), hi.max(*h)),
            });
        }
        bounds
    }

    pub(crate) fn cells(&self) -> &[Option<Real>] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Option<Real>] {
        &mut self.cells
    }

    /// Force cells within `wall_thickness` of the crop boundary to the
    /// full relief height, forming the surrounding rim ring.
    fn raise_rim(&mut self, config: &ReliefConfig) {
        let rim_cells = (config.wall_thickness * config.resolution).ceil() as usize;
        if rim_cells == 0 {
            return;
        }
        let (w, h) = (self.width, self.height);
        // multi-source BFS from every present cell touching the outside
        let mut dist = vec![usize::MAX; w * h];
        let mut queue = VecDeque::new();
        for y in 0..h {
            for x in 0..w {
                if !self.is_present(x, y) {
                    continue;
                }
                let on_edge = x == 0
                    || y == 0
                    || x + 1 == w
                    || y + 1 == h
                    || !self.is_present(x - 1, y)
                    || !self.is_present(x + 1, y)
                    || !self.is_present(x, y - 1)
                    || !self.is_present(x, y + 1);
                if on_edge {
                    dist[y * w + x] = 1;
                    queue.push_back((x, y));
                }
            }
        }
        while let Some((x, y)) = queue.pop_front() {
            let d = dist[y * w + x];
            if d >= rim_cells {
                continue;
            }
            let neighbors = [
                (x.wrapping_sub(1), y),
                (x + 1, y),
                (x, y.wrapping_sub(1)),
                (x, y + 1),
            ];
            for (nx, ny) in neighbors {
                if nx < w && ny < h && self.is_present(nx, ny) && dist[ny * w + nx] > d + 1 {
                    dist[ny * w + nx] = d + 1;
                    queue.push_back((nx, ny));
                }
            }
        }
        for i in 0..w * h {
            if dist[i] <= rim_cells && self.cells[i].is_some() {
                self.cells[i] = Some(config.total_height);
            }
        }
    }
}

/// Map an oriented grid cell back to its source pixel, applying the
/// configured flips and quarter-turn.
fn source_pixel(
    gx: usize,
    gy: usize,
    gw: usize,
    gh: usize,
    sw: usize,
    sh: usize,
    config: &ReliefConfig,
) -> (usize, usize) {
    let fx = if config.flip_x { gw - 1 - gx } else { gx };
    let fy = if config.flip_y { gh - 1 - gy } else { gy };
    match config.rotation {
        Rotation::R0 => (fx, fy),
        Rotation::R90 => (fy, sh - 1 - fx),
        Rotation::R180 => (sw - 1 - fx, sh - 1 - fy),
        Rotation::R270 => (sw - 1 - fy, fx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CropShape, ReliefConfig};
    use approx::assert_relative_eq;
    use image::Rgba;

    fn gradient_image(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, _| {
            let v = (x * 255 / (w - 1).max(1)) as u8;
            Rgba([v, v, v, 255])
        })
    }

    fn flat_cfg() -> ReliefConfig {
        ReliefConfig {
            total_height: 5.0,
            min_height: 1.0,
            ..ReliefConfig::default()
        }
    }

    #[test]
    fn heights_span_min_to_total() {
        let img = gradient_image(16, 4);
        let cfg = flat_cfg();
        let mask = CropMask::build(16, 4, &cfg);
        let field = HeightField::from_image(&img, &mask, &cfg);
        assert_relative_eq!(field.get(0, 0).unwrap(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(field.get(15, 0).unwrap(), 5.0, epsilon = 1e-9);
        let (lo, hi) = field.min_max().unwrap();
        assert!(lo >= 1.0 && hi <= 5.0);
    }

    #[test]
    fn outside_the_crop_is_absent() {
        let img = gradient_image(20, 20);
        let cfg = ReliefConfig {
            crop_shape: CropShape::Circle,
            ..flat_cfg()
        };
        let mask = CropMask::build(20, 20, &cfg);
        let field = HeightField::from_image(&img, &mask, &cfg);
        assert!(field.get(0, 0).is_none());
        assert!(field.get(10, 10).is_some());
        assert_eq!(field.present_count(), mask.inside_count());
    }

    #[test]
    fn quarter_turn_swaps_grid_dimensions() {
        let img = gradient_image(8, 4);
        let cfg = ReliefConfig {
            rotation: Rotation::R90,
            ..flat_cfg()
        };
        let mask = CropMask::build(4, 8, &cfg);
        let field = HeightField::from_image(&img, &mask, &cfg);
        assert_eq!((field.width(), field.height()), (4, 8));
        // source column 0 (darkest) becomes the top row after a CW turn;
        // grid (0, 0) samples source (0, 3)
        assert_relative_eq!(field.get(0, 0).unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn flip_x_mirrors_the_gradient() {
        let img = gradient_image(16, 4);
        let cfg = ReliefConfig {
            flip_x: true,
            ..flat_cfg()
        };
        let mask = CropMask::build(16, 4, &cfg);
        let field = HeightField::from_image(&img, &mask, &cfg);
        assert_relative_eq!(field.get(0, 0).unwrap(), 5.0, epsilon = 1e-9);
        assert_relative_eq!(field.get(15, 0).unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn rim_ring_is_forced_to_full_height() {
        let img = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        let cfg = ReliefConfig {
            wall_thickness: 2.0,
            resolution: 1.0,
            ..flat_cfg()
        };
        let mask = CropMask::build(10, 10, &cfg);
        let field = HeightField::from_image(&img, &mask, &cfg);
        // boundary cells carry the rim height, interior keeps the relief
        assert_relative_eq!(field.get(0, 0).unwrap(), 5.0, epsilon = 1e-9);
        assert_relative_eq!(field.get(1, 5).unwrap(), 5.0, epsilon = 1e-9);
        assert_relative_eq!(field.get(5, 5).unwrap(), 1.0, epsilon = 1e-9);
    }
}
