#![cfg(feature = "hashmap")]

use image::{Rgba, RgbaImage};
use reliefcast::{CropShape, HangingHole, ReliefConfig, generate};

fn gradient(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| {
        let v = ((x + y) * 255 / (w + h - 2).max(1)) as u8;
        Rgba([v, v, v, 255])
    })
}

fn cfg(shape: CropShape) -> ReliefConfig {
    ReliefConfig {
        crop_shape: shape,
        total_height: 4.0,
        min_height: 0.5,
        wall_height: 3.0,
        resolution: 1.0,
        ..ReliefConfig::default()
    }
}

#[test]
fn rectangular_plate_has_zero_open_edges() {
    let mesh = generate(&gradient(12, 9), &cfg(CropShape::Rectangle)).unwrap();
    assert_eq!(mesh.boundary_edge_count(), 0);
    assert!(mesh.is_manifold());
}

#[test]
fn circular_medallion_is_sealed() {
    let mesh = generate(&gradient(25, 25), &cfg(CropShape::Circle)).unwrap();
    assert_eq!(mesh.boundary_edge_count(), 0);
    assert!(mesh.is_manifold());
}

#[test]
fn polygon_crops_are_sealed_for_every_side_count() {
    for sides in [3, 4, 5, 6, 8, 12, 20] {
        let mesh = generate(
            &gradient(31, 31),
            &cfg(CropShape::Polygon {
                sides,
                rotation_deg: 15.0,
            }),
        )
        .unwrap();
        assert!(!mesh.is_empty(), "{sides}-gon produced nothing");
        assert_eq!(
            mesh.boundary_edge_count(),
            0,
            "{sides}-gon left open edges"
        );
    }
}

#[test]
fn smoothing_and_slope_limiting_preserve_closure() {
    let config = ReliefConfig {
        max_slope: 0.3,
        smooth_radius: 1.2,
        ..cfg(CropShape::Ellipse)
    };
    let mesh = generate(&gradient(20, 16), &config).unwrap();
    assert_eq!(mesh.boundary_edge_count(), 0);
}

#[test]
fn hanging_hole_rim_is_the_only_intended_opening() {
    let sealed = generate(&gradient(24, 24), &cfg(CropShape::Rectangle)).unwrap();
    assert_eq!(sealed.boundary_edge_count(), 0);

    let config = ReliefConfig {
        hole: Some(HangingHole {
            diameter: 4.0,
            loop_depth: 50.0,
            edge_offset: 5.0,
        }),
        ..cfg(CropShape::Rectangle)
    };
    let holed = generate(&gradient(24, 24), &config).unwrap();
    assert!(!holed.is_manifold());
    // both rims of the open-ended bore stay unsealed
    assert!(holed.boundary_edge_count() >= 32);
}
