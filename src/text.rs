//! Emboss text by stamping Hershey stroke glyphs into the source raster.
//!
//! The characters are laid out along an arc at 85% of the crop radius and
//! drawn as thick bright strokes, so after depth sampling and height-field
//! construction they become ordinary relief: no special-case mesh code.

use crate::config::ReliefConfig;
use crate::depth;
use crate::float_types::{FRAC_PI_2, Real};
use hershey::Vector as GlyphVector;
use image::{Rgba, RgbaImage};
use tracing::debug;

/// Nominal Hershey glyph body height, font units.
const GLYPH_UNITS: Real = 21.0;

/// Pen advance for characters the font cannot render, font units.
const MISSING_ADVANCE: Real = 10.0;

/// The band sits at this fraction of the crop radius.
const BAND_RADIUS_FRACTION: Real = 0.85;

/// Stamp the configured text band onto `img` in place. A missing band or
/// empty string is a no-op.
pub fn stamp_text_band(img: &mut RgbaImage, config: &ReliefConfig) {
    let Some(band) = &config.text_band else {
        return;
    };
    if band.text.is_empty() {
        return;
    }

    let w = img.width() as Real;
    let h = img.height() as Real;
    let crop_radius = (w * config.crop_width).min(h * config.crop_height) / 2.0;
    let arc_radius = BAND_RADIUS_FRACTION * crop_radius;
    if arc_radius <= 1.0 {
        return;
    }

    let font = hershey::fonts::GOTHIC_ENG_SANS;
    let size_px = band.size * config.resolution;
    let scale = size_px / GLYPH_UNITS;
    let thickness = (size_px * 0.08).max(1.0);

    // Stroke luminance chosen so the embossed relief rises emboss_depth
    // over the depth-0 floor after the configured contrast and inversion.
    let target = (band.emboss_depth / config.relief_range().max(Real::EPSILON)).clamp(0.0, 1.0);
    let channel = depth::channel_for_depth(target, config.contrast_curve, config.invert_depth);
    let value = (channel * 255.0).round() as u8;

    // Angular slot per character from its measured advance width.
    let advances: Vec<Real> = band
        .text
        .chars()
        .map(|ch| {
            let units = match font.glyph(ch) {
                Ok(g) => (g.max_x - g.min_x) as Real,
                Err(_) => MISSING_ADVANCE,
            };
            units * scale * band.char_spacing
        })
        .collect();
    let total: Real = advances.iter().sum();

    let cx = w / 2.0;
    let cy = h / 2.0;
    let mut along: Real = 0.0;
    let mut stamped = 0usize;
    for (ch, advance) in band.text.chars().zip(&advances) {
        let slot_mid = along + advance / 2.0;
        along += advance;
        let Ok(glyph) = font.glyph(ch) else {
            continue;
        };

        // In image coordinates (y down) the bottom of the band is at
        // +pi/2; advancing left-to-right walks the angle down.
        let theta = FRAC_PI_2 + (total / 2.0 - slot_mid) / arc_radius;
        let (sin_t, cos_t) = theta.sin_cos();
        let ex = (sin_t, -cos_t); // advance direction
        let er = (cos_t, sin_t); // outward radial; glyph +y points away from center
        let pen = (cx + arc_radius * er.0, cy + arc_radius * er.1);

        let half_width = (glyph.max_x - glyph.min_x) as Real * scale / 2.0;
        let min_x = glyph.min_x;
        let place = |gx: Real, gy: Real| -> (Real, Real) {
            let dx = (gx - min_x as Real) * scale - half_width;
            let dr = gy * scale;
            (
                pen.0 + dx * ex.0 + dr * er.0,
                pen.1 + dx * ex.1 + dr * er.1,
            )
        };

        let mut last: Option<(Real, Real)> = None;
        for cmd in &glyph.vectors {
            match cmd {
                GlyphVector::MoveTo { x, y } => {
                    last = Some(place(*x as Real, *y as Real));
                },
                GlyphVector::LineTo { x, y } => {
                    let p = place(*x as Real, *y as Real);
                    if let Some(q) = last {
                        draw_segment(img, q, p, thickness, value);
                    }
                    last = Some(p);
                },
            }
        }
        stamped += 1;
    }
    debug!(
        characters = stamped,
        arc_radius, "text band stamped onto raster"
    );
}

/// Rasterize one stroke as discs stamped along the segment.
fn draw_segment(
    img: &mut RgbaImage,
    from: (Real, Real),
    to: (Real, Real),
    thickness: Real,
    value: u8,
) {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let steps = ((dx * dx + dy * dy).sqrt() * 2.0).ceil().max(1.0) as usize;
    let radius = thickness / 2.0;
    for i in 0..=steps {
        let t = i as Real / steps as Real;
        stamp_disc(img, from.0 + t * dx, from.1 + t * dy, radius, value);
    }
}

fn stamp_disc(img: &mut RgbaImage, cx: Real, cy: Real, radius: Real, value: u8) {
    let (w, h) = (img.width() as i64, img.height() as i64);
    let r = radius.max(0.5);
    let x0 = ((cx - r).floor() as i64).max(0);
    let x1 = ((cx + r).ceil() as i64).min(w - 1);
    let y0 = ((cy - r).floor() as i64).max(0);
    let y1 = ((cy + r).ceil() as i64).min(h - 1);
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as Real + 0.5 - cx;
            let dy = y as Real + 0.5 - cy;
            if dx * dx + dy * dy <= r * r {
                img.put_pixel(x as u32, y as u32, Rgba([value, value, value, value]));
            }
        }
    }
}
