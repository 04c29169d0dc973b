//! Triangle-based IO backends and mesh statistics.

pub mod stl;

pub use stl::{MeshStats, facet_normal, stats, to_stl_ascii};

#[cfg(feature = "stl-io")]
pub use stl::{from_stl_binary, to_stl_binary};
