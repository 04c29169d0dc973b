// main.rs
//
// Small demonstration of the relief pipeline: build a few models from a
// synthetic raster and write them to ./stl as binary STL.

use std::fs;

use image::{Rgba, RgbaImage};
use reliefcast::{
    CropShape, DepthMode, HangingHole, ReliefConfig, TextBand, WallStyle, generate,
};

/// A soft radial gradient, bright in the center.
fn sample_image(size: u32) -> RgbaImage {
    let c = (size as f64 - 1.0) / 2.0;
    RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f64 - c;
        let dy = y as f64 - c;
        let d = (dx * dx + dy * dy).sqrt() / c;
        let v = (255.0 * (1.0 - d).clamp(0.0, 1.0)) as u8;
        Rgba([v, v, v, 255])
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = fs::create_dir_all("stl");

    let img = sample_image(128);

    // 1) plain rectangular relief plate
    let plate = generate(&img, &ReliefConfig::default())?;
    fs::write("stl/plate.stl", plate.to_stl_binary()?)?;
    println!("plate: {:?}", plate.stats());

    // 2) circular medallion, smoothed, with a slope roll-off
    let medallion_cfg = ReliefConfig {
        crop_shape: CropShape::Circle,
        total_height: 4.0,
        min_height: 0.6,
        wall_height: 2.0,
        wall_style: WallStyle::FlushTop,
        max_slope: 0.2,
        smooth_radius: 1.5,
        ..ReliefConfig::default()
    };
    let medallion = generate(&img, &medallion_cfg)?;
    fs::write("stl/medallion.stl", medallion.to_stl_binary()?)?;
    println!("medallion: {:?}", medallion.stats());

    // 3) hexagonal keychain: hanging hole, rim, embossed label
    let keychain_cfg = ReliefConfig {
        crop_shape: CropShape::Polygon {
            sides: 6,
            rotation_deg: 0.0,
        },
        depth_mode: DepthMode::Luminance,
        invert_depth: true,
        contrast_curve: 1.4,
        wall_thickness: 1.2,
        hole: Some(HangingHole {
            diameter: 4.0,
            loop_depth: 20.0,
            edge_offset: 4.0,
        }),
        text_band: Some(TextBand {
            text: "RELIEF".to_string(),
            size: 3.0,
            emboss_depth: 2.0,
            char_spacing: 1.2,
        }),
        ..ReliefConfig::default()
    };
    let keychain = generate(&img, &keychain_cfg)?;
    fs::write("stl/keychain.stl", keychain.to_stl_binary()?)?;
    println!("keychain: {:?}", keychain.stats());

    Ok(())
}
