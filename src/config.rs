//! The flat configuration record read by every pipeline stage.

use crate::errors::{ReliefError, ReliefResult};
use crate::float_types::Real;

/// How a pixel's channels become a scalar depth in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthMode {
    /// Perceptual luminance `0.299 R + 0.587 G + 0.114 B`.
    #[default]
    Luminance,
    Red,
    Green,
    Blue,
    Alpha,
}

/// Rule placing the relief's height range relative to the surrounding wall.
///
/// The Z placement table is applied uniformly to every surface height `h`:
///
/// | style         | vertex Z                            | base Z                                  |
/// |---------------|-------------------------------------|-----------------------------------------|
/// | `FlushBottom` | `wall_height + h`                   | `0`                                     |
/// | `Centered`    | `wall_height/2 + h`                 | `max(0, wall_height/2 - total_height)`  |
/// | `FlushTop`    | `wall_height - (total_height - h)`  | `max(0, wall_height - total_height)`    |
///
/// Base Z is clamped to `>= 0` so the model never reaches below the print
/// bed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WallStyle {
    #[default]
    FlushBottom,
    Centered,
    FlushTop,
}

impl WallStyle {
    /// Z of a top-surface vertex whose relief height is `h`.
    pub fn vertex_z(self, h: Real, total_height: Real, wall_height: Real) -> Real {
        match self {
            WallStyle::FlushBottom => wall_height + h,
            WallStyle::Centered => wall_height / 2.0 + h,
            WallStyle::FlushTop => wall_height - (total_height - h),
        }
    }

    /// Z of the flat base floor.
    pub fn base_z(self, total_height: Real, wall_height: Real) -> Real {
        match self {
            WallStyle::FlushBottom => 0.0,
            WallStyle::Centered => (wall_height / 2.0 - total_height).max(0.0),
            WallStyle::FlushTop => (wall_height - total_height).max(0.0),
        }
    }
}

/// Planar shape carving the printable region out of the image rectangle.
/// All shapes are centered on the image center and sized by the crop
/// width/height fractions of [`ReliefConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CropShape {
    #[default]
    Rectangle,
    /// Axis-aligned ellipse spanning the cropped extents.
    Ellipse,
    /// Circle with radius `min(w·fw, h·fh) / 2`.
    Circle,
    /// Regular polygon on the circle's circumradius. A hexagon is
    /// `Polygon { sides: 6, .. }`.
    Polygon { sides: u32, rotation_deg: Real },
}

/// Quarter-turn rotation applied when sampling the source raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// Whether this rotation swaps the grid's width and height.
    pub const fn swaps_axes(self) -> bool {
        matches!(self, Rotation::R90 | Rotation::R270)
    }
}

/// Cylindrical bore near the far edge so a cord can pass through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HangingHole {
    /// Bore diameter, model units.
    pub diameter: Real,
    /// How far below the local top surface the bore reaches.
    pub loop_depth: Real,
    /// Distance of the bore center from the far (top) edge, model units.
    pub edge_offset: Real,
}

/// Text embossed along an arc inside the crop, stamped into the raster
/// before height-field construction so it becomes ordinary relief.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBand {
    pub text: String,
    /// Glyph height, model units.
    pub size: Real,
    /// How far the strokes rise above the depth-0 floor, model units.
    pub emboss_depth: Real,
    /// Multiplier on each glyph's measured advance width.
    pub char_spacing: Real,
}

/// Immutable value object read by every stage of the pipeline.
///
/// All lengths are in model units (millimeters by convention). The record
/// is validated once by [`ReliefConfig::validate`] at the pipeline entry;
/// the stages assume validated input and do not re-validate.
#[derive(Debug, Clone, PartialEq)]
pub struct ReliefConfig {
    /// Relief height at depth 1.
    pub total_height: Real,
    /// Relief height at depth 0.
    pub min_height: Real,
    /// Height of the surrounding wall, interpreted per [`WallStyle`].
    pub wall_height: Real,
    /// Extra solid slab under the relief; 0 disables.
    pub base_thickness: Real,
    /// Width of the full-height rim ring just inside the crop boundary;
    /// 0 disables.
    pub wall_thickness: Real,
    pub wall_style: WallStyle,

    pub depth_mode: DepthMode,
    pub invert_depth: bool,
    /// Power-law contrast exponent in `[0.1, 10]`; exponent 1 is identity.
    pub contrast_curve: Real,

    /// Height-per-pixel-step bound for the slope limiter; `<= 0` disables.
    pub max_slope: Real,
    /// Gaussian smoothing radius in pixels; `<= 0` disables.
    pub smooth_radius: Real,

    pub crop_shape: CropShape,
    /// Crop width as a fraction of the image width, in `(0, 1]`.
    pub crop_width: Real,
    /// Crop height as a fraction of the image height, in `(0, 1]`.
    pub crop_height: Real,

    pub flip_x: bool,
    pub flip_y: bool,
    pub rotation: Rotation,

    /// Grid samples per model unit (`> 0`). The grid is 1:1 with source
    /// pixels; resolution sets the physical pitch of one cell.
    pub resolution: Real,

    pub hole: Option<HangingHole>,
    pub text_band: Option<TextBand>,
}

impl Default for ReliefConfig {
    fn default() -> Self {
        ReliefConfig {
            total_height: 3.0,
            min_height: 0.4,
            wall_height: 2.0,
            base_thickness: 0.0,
            wall_thickness: 0.0,
            wall_style: WallStyle::default(),
            depth_mode: DepthMode::default(),
            invert_depth: false,
            contrast_curve: 1.0,
            max_slope: 0.0,
            smooth_radius: 0.0,
            crop_shape: CropShape::default(),
            crop_width: 1.0,
            crop_height: 1.0,
            flip_x: false,
            flip_y: false,
            rotation: Rotation::default(),
            resolution: 4.0,
            hole: None,
            text_band: None,
        }
    }
}

impl ReliefConfig {
    /// The physical span between depth 0 and depth 1.
    pub fn relief_range(&self) -> Real {
        self.total_height - self.min_height
    }

    /// Check finiteness and documented ranges of every numeric field,
    /// reporting the offending field by name. Called once at the pipeline
    /// entry; a config that passes is never re-checked downstream.
    pub fn validate(&self) -> ReliefResult<()> {
        fn finite(field: &'static str, v: Real) -> ReliefResult<()> {
            if v.is_finite() {
                Ok(())
            } else {
                Err(ReliefError::invalid_config(field, "must be finite"))
            }
        }
        fn non_negative(field: &'static str, v: Real) -> ReliefResult<()> {
            finite(field, v)?;
            if v >= 0.0 {
                Ok(())
            } else {
                Err(ReliefError::invalid_config(field, "must be >= 0"))
            }
        }

        non_negative("total_height", self.total_height)?;
        if self.total_height <= 0.0 {
            return Err(ReliefError::invalid_config("total_height", "must be > 0"));
        }
        non_negative("min_height", self.min_height)?;
        if self.min_height > self.total_height {
            return Err(ReliefError::invalid_config(
                "min_height",
                "must not exceed total_height",
            ));
        }
        non_negative("wall_height", self.wall_height)?;
        non_negative("base_thickness", self.base_thickness)?;
        non_negative("wall_thickness", self.wall_thickness)?;

        finite("contrast_curve", self.contrast_curve)?;
        if !(0.1..=10.0).contains(&self.contrast_curve) {
            return Err(ReliefError::invalid_config(
                "contrast_curve",
                "must be within 0.1..=10",
            ));
        }

        finite("max_slope", self.max_slope)?;
        finite("smooth_radius", self.smooth_radius)?;

        finite("crop_width", self.crop_width)?;
        if !(self.crop_width > 0.0 && self.crop_width <= 1.0) {
            return Err(ReliefError::invalid_config(
                "crop_width",
                "must be within (0, 1]",
            ));
        }
        finite("crop_height", self.crop_height)?;
        if !(self.crop_height > 0.0 && self.crop_height <= 1.0) {
            return Err(ReliefError::invalid_config(
                "crop_height",
                "must be within (0, 1]",
            ));
        }
        if let CropShape::Polygon { sides, rotation_deg } = self.crop_shape {
            if !(3..=20).contains(&sides) {
                return Err(ReliefError::invalid_config(
                    "crop_shape.sides",
                    "must be within 3..=20",
                ));
            }
            finite("crop_shape.rotation_deg", rotation_deg)?;
        }

        finite("resolution", self.resolution)?;
        if self.resolution <= 0.0 {
            return Err(ReliefError::invalid_config("resolution", "must be > 0"));
        }

        if let Some(hole) = &self.hole {
            finite("hole.diameter", hole.diameter)?;
            if hole.diameter <= 0.0 {
                return Err(ReliefError::invalid_config("hole.diameter", "must be > 0"));
            }
            non_negative("hole.loop_depth", hole.loop_depth)?;
            non_negative("hole.edge_offset", hole.edge_offset)?;
        }

        if let Some(band) = &self.text_band {
            finite("text_band.size", band.size)?;
            if band.size <= 0.0 {
                return Err(ReliefError::invalid_config("text_band.size", "must be > 0"));
            }
            non_negative("text_band.emboss_depth", band.emboss_depth)?;
            finite("text_band.char_spacing", band.char_spacing)?;
            if band.char_spacing <= 0.0 {
                return Err(ReliefError::invalid_config(
                    "text_band.char_spacing",
                    "must be > 0",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ReliefConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_finite_heights() {
        let cfg = ReliefConfig {
            total_height: Real::NAN,
            ..ReliefConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("total_height"));
    }

    #[test]
    fn rejects_out_of_range_contrast() {
        let cfg = ReliefConfig {
            contrast_curve: 11.0,
            ..ReliefConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("contrast_curve"));
    }

    #[test]
    fn rejects_bad_polygon_sides() {
        for sides in [2, 21] {
            let cfg = ReliefConfig {
                crop_shape: CropShape::Polygon {
                    sides,
                    rotation_deg: 0.0,
                },
                ..ReliefConfig::default()
            };
            assert!(cfg.validate().is_err());
        }
    }

    #[test]
    fn wall_style_z_table() {
        // total 5, wall 10
        assert_eq!(WallStyle::FlushBottom.vertex_z(5.0, 5.0, 10.0), 15.0);
        assert_eq!(WallStyle::FlushBottom.base_z(5.0, 10.0), 0.0);
        assert_eq!(WallStyle::Centered.vertex_z(0.0, 5.0, 10.0), 5.0);
        assert_eq!(WallStyle::Centered.base_z(5.0, 10.0), 0.0);
        assert_eq!(WallStyle::FlushTop.vertex_z(5.0, 5.0, 10.0), 10.0);
        assert_eq!(WallStyle::FlushTop.base_z(5.0, 10.0), 5.0);
        // base Z never dips below the print bed
        assert_eq!(WallStyle::FlushTop.base_z(12.0, 10.0), 0.0);
        assert_eq!(WallStyle::Centered.base_z(12.0, 10.0), 0.0);
    }
}
