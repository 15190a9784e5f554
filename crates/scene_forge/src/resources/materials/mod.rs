//! Material construction
//!
//! Tags, descriptors and per-tag parameters for surface appearance, plus the
//! registry that stores constructed materials.

pub mod material;
pub mod material_params;
pub mod registry;

pub use material::{Material, MaterialDescriptor, MaterialKind, MaterialTag};
pub use material_params::*;
pub use registry::MaterialRegistry;
