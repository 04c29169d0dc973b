//! Height-field regularization: adaptive slope limiting and masked
//! Gaussian smoothing.
//!
//! Both passes operate on present cells only and are order-sensitive:
//! the pipeline limits slopes first, then smooths. Each pass is a no-op
//! when its parameter is `<= 0`.

use crate::float_types::Real;
use crate::heightfield::HeightField;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Fraction of the height range treated as foreground "subject" detail
/// and exempted from slope limiting.
const SUBJECT_BAND: Real = 0.3;

/// Relaxation pass cap for the slope limiter.
const MAX_SLOPE_PASSES: usize = 10;

/// Roll off steep drops from foreground into background without softening
/// the foreground itself.
///
/// `max_slope` bounds the height difference per pixel step. Cells at or
/// above `max - 0.3 * range` are subject cells and never move. Every other
/// present cell may only be *raised*: per pass its floor is
/// `max(0, max over higher 4-neighbors of (neighbor - max_slope))`, and
/// passes repeat (up to a fixed cap) until one changes nothing.
pub fn limit_slope(field: &mut HeightField, max_slope: Real) {
    if max_slope <= 0.0 {
        return;
    }
    let Some((lo, hi)) = field.min_max() else {
        return;
    };
    let subject_floor = hi - SUBJECT_BAND * (hi - lo);

    let (w, h) = (field.width(), field.height());
    for _ in 0..MAX_SLOPE_PASSES {
        let mut changed = false;
        for y in 0..h {
            for x in 0..w {
                let Some(height) = field.get(x, y) else {
                    continue;
                };
                if height >= subject_floor {
                    continue;
                }
                let mut floor: Real = 0.0;
                let neighbors = [
                    (x.wrapping_sub(1), y),
                    (x + 1, y),
                    (x, y.wrapping_sub(1)),
                    (x, y + 1),
                ];
                for (nx, ny) in neighbors {
                    if let Some(n) = field.get(nx, ny) {
                        if n > height {
                            floor = floor.max(n - max_slope);
                        }
                    }
                }
                if floor > height {
                    field.set(x, y, floor);
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }
}

/// Gaussian-smooth the present cells of the field in place.
///
/// Builds a square kernel of size `2*ceil(3r)+1` with weights
/// `exp(-d^2 / (2 r^2))`, then convolves over present cells only: the
/// per-cell result is renormalized by the kernel weight actually covering
/// present neighbors, so the blur never leaks across the mask boundary
/// and absent cells act as "no data", not zero. The pass fully replaces
/// the field in one step.
pub fn gaussian_smooth(field: &mut HeightField, radius: Real) {
    if radius <= 0.0 {
        return;
    }
    let half = (3.0 * radius).ceil() as i64;
    let size = (2 * half + 1) as usize;
    let mut kernel: Vec<Real> = vec![0.0; size * size];
    let mut total: Real = 0.0;
    for ky in -half..=half {
        for kx in -half..=half {
            let d2 = (kx * kx + ky * ky) as Real;
            let w = (-d2 / (2.0 * radius * radius)).exp();
            kernel[((ky + half) as usize) * size + (kx + half) as usize] = w;
            total += w;
        }
    }
    for w in &mut kernel {
        *w /= total;
    }

    let (w, h) = (field.width(), field.height());
    let smooth_row = |y: usize, row: &mut [Option<Real>]| {
        for (x, out) in row.iter_mut().enumerate() {
            let Some(original) = field.get(x, y) else {
                *out = None;
                continue;
            };
            let mut acc: Real = 0.0;
            let mut covered: Real = 0.0;
            for ky in -half..=half {
                let ny = y as i64 + ky;
                if ny < 0 || ny >= h as i64 {
                    continue;
                }
                for kx in -half..=half {
                    let nx = x as i64 + kx;
                    if nx < 0 || nx >= w as i64 {
                        continue;
                    }
                    if let Some(n) = field.get(nx as usize, ny as usize) {
                        let weight =
                            kernel[((ky + half) as usize) * size + (kx + half) as usize];
                        acc += weight * n;
                        covered += weight;
                    }
                }
            }
            *out = if covered > 0.0 {
                Some(acc / covered)
            } else {
                Some(original)
            };
        }
    };

    #[cfg(feature = "parallel")]
    let smoothed: Vec<Option<Real>> = {
        let mut out = vec![None; w * h];
        out.par_chunks_mut(w.max(1))
            .enumerate()
            .for_each(|(y, row)| smooth_row(y, row));
        out
    };

    #[cfg(not(feature = "parallel"))]
    let smoothed: Vec<Option<Real>> = {
        let mut out = vec![None; w * h];
        for (y, row) in out.chunks_mut(w.max(1)).enumerate() {
            smooth_row(y, row);
        }
        out
    };

    field.cells_mut().copy_from_slice(&smoothed);
}
