//! Per-pixel depth sampling: raw RGBA channels to a scalar in `[0, 1]`.

use crate::config::DepthMode;
use crate::float_types::Real;
use image::Rgba;

/// Map one pixel to a depth value in `[0, 1]`.
///
/// Channel selection per `mode`, normalization by 255, power-law contrast
/// (`exponent < 1` compresses toward 1, `> 1` compresses toward 0), then
/// inversion. Pure function of its inputs: identical arguments always
/// yield the identical depth.
pub fn sample(pixel: Rgba<u8>, mode: DepthMode, contrast_curve: Real, invert: bool) -> Real {
    let [r, g, b, a] = pixel.0;
    let raw = match mode {
        DepthMode::Luminance => {
            0.299 * Real::from(r) + 0.587 * Real::from(g) + 0.114 * Real::from(b)
        },
        DepthMode::Red => Real::from(r),
        DepthMode::Green => Real::from(g),
        DepthMode::Blue => Real::from(b),
        DepthMode::Alpha => Real::from(a),
    };
    let depth = (raw / 255.0).powf(contrast_curve);
    if invert { 1.0 - depth } else { depth }
}

/// Invert the contrast curve: the raw channel value (still in `[0, 1]`)
/// that [`sample`] would map to `depth`. Used by the text stamper to pick
/// a stamp luminance that survives the configured curve and inversion.
pub fn channel_for_depth(depth: Real, contrast_curve: Real, invert: bool) -> Real {
    let target = if invert { 1.0 - depth } else { depth };
    target.clamp(0.0, 1.0).powf(1.0 / contrast_curve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn contrast_one_is_identity_on_the_channel() {
        let d = sample(Rgba([128, 128, 128, 255]), DepthMode::Red, 1.0, false);
        assert_relative_eq!(d, 128.0 / 255.0, epsilon = 1e-12);
    }

    #[test]
    fn luminance_weights() {
        let d = sample(Rgba([255, 0, 0, 255]), DepthMode::Luminance, 1.0, false);
        assert_relative_eq!(d, 0.299, epsilon = 1e-12);
        let d = sample(Rgba([0, 255, 0, 255]), DepthMode::Luminance, 1.0, false);
        assert_relative_eq!(d, 0.587, epsilon = 1e-12);
        let d = sample(Rgba([0, 0, 255, 255]), DepthMode::Luminance, 1.0, false);
        assert_relative_eq!(d, 0.114, epsilon = 1e-12);
    }

    #[test]
    fn invert_composed_twice_returns_the_original() {
        let px = Rgba([200, 40, 90, 255]);
        let plain = sample(px, DepthMode::Luminance, 2.0, false);
        let inverted = sample(px, DepthMode::Luminance, 2.0, true);
        assert_relative_eq!(1.0 - inverted, plain, epsilon = 1e-12);
    }

    #[test]
    fn channel_for_depth_round_trips_through_sample() {
        for &(curve, invert) in &[(1.0, false), (2.5, false), (0.4, true)] {
            let c = channel_for_depth(0.7, curve, invert);
            let px = (c * 255.0).round() as u8;
            let d = sample(Rgba([px, px, px, 255]), DepthMode::Red, curve, invert);
            assert_relative_eq!(d, 0.7, epsilon = 0.01);
        }
    }

    #[test]
    fn depth_stays_in_unit_range() {
        for v in [0u8, 1, 127, 254, 255] {
            for &curve in &[0.1, 1.0, 10.0] {
                let d = sample(Rgba([v, v, v, v]), DepthMode::Luminance, curve, false);
                assert!((0.0..=1.0).contains(&d));
            }
        }
    }
}
