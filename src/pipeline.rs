//! The generation pipeline: sampling, masking, regularization, meshing.
//!
//! One call = one request. Every invocation allocates its own mask, field
//! and mesh, so concurrent requests can never observe each other's
//! buffers; there are no locks, no blocking IO and no partial results.

use crate::builder;
use crate::config::ReliefConfig;
use crate::errors::{ReliefError, ReliefResult};
use crate::heightfield::HeightField;
use crate::mask::CropMask;
use crate::mesh::ReliefMesh;
use crate::regularize;
use image::RgbaImage;
use tracing::{debug, info};

/// Pixel budget for one request. Inputs beyond this fail fast with
/// [`ReliefError::InputTooLarge`] before any grid is allocated.
pub const MAX_PIXELS: usize = 4096 * 4096;

/// Run the full pipeline: raster in, watertight relief mesh out.
///
/// The configuration is validated once here; degenerate inputs (an empty
/// crop, a 1-pixel-wide image) yield an empty mesh rather than an error.
pub fn generate(image: &RgbaImage, config: &ReliefConfig) -> ReliefResult<ReliefMesh> {
    config.validate()?;

    let pixels = image.width() as usize * image.height() as usize;
    if pixels > MAX_PIXELS {
        return Err(ReliefError::InputTooLarge {
            pixels,
            limit: MAX_PIXELS,
        });
    }

    #[cfg(feature = "hershey-text")]
    let stamped;
    #[cfg(feature = "hershey-text")]
    let image: &RgbaImage = if config.text_band.is_some() {
        let mut clone = image.clone();
        crate::text::stamp_text_band(&mut clone, config);
        stamped = clone;
        &stamped
    } else {
        image
    };

    let (gw, gh) = HeightField::oriented_dimensions(
        image.width() as usize,
        image.height() as usize,
        config.rotation,
    );
    let mask = CropMask::build(gw, gh, config);
    debug!(
        grid_w = gw,
        grid_h = gh,
        inside = mask.inside_count(),
        "crop mask built"
    );

    let mut field = HeightField::from_image(image, &mask, config);
    regularize::limit_slope(&mut field, config.max_slope);
    regularize::gaussian_smooth(&mut field, config.smooth_radius);

    let mesh = builder::build(&field, config);
    info!(
        triangles = mesh.triangle_count(),
        vertices = mesh.vertex_count(),
        "relief generated"
    );
    Ok(mesh)
}
