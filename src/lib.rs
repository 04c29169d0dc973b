//! Turn a raster image into a printable, watertight **3D relief solid**,
//! built around a height-field pipeline: per-pixel depth sampling, crop
//! masking, slope limiting and masked Gaussian smoothing, manifold mesh
//! construction (relief top, flat base, sealing walls, optional hanging
//! hole, optional embossed text band) and binary STL export.
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): `.stl` export/import
//! - **hershey-text**: emboss text bands using Hershey stroke fonts
//! - **hashmap**: enables use of hashbrown for boundary-edge helpers and `is_manifold`
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon for multithreading the smoothing convolution
//!
//! # Example
//! ```no_run
//! use reliefcast::{ReliefConfig, generate};
//!
//! let img = image::open("portrait.png").unwrap().to_rgba8();
//! let mesh = generate(&img, &ReliefConfig::default()).unwrap();
//! std::fs::write("portrait.stl", mesh.to_stl_binary().unwrap()).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod errors;
pub mod float_types;
pub mod config;
pub mod depth;
pub mod mask;
pub mod heightfield;
pub mod regularize;
pub mod mesh;
pub mod triangulated;
pub mod builder;
pub mod io;
pub mod pipeline;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use config::{CropShape, DepthMode, HangingHole, ReliefConfig, Rotation, TextBand, WallStyle};
pub use errors::{ReliefError, ReliefResult};
pub use heightfield::HeightField;
pub use mask::CropMask;
pub use mesh::ReliefMesh;
pub use pipeline::generate;
pub use triangulated::Triangulated3D;

#[cfg(feature = "hershey-text")]
pub mod text;
