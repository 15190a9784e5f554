//! Resource construction and ownership
//!
//! Descriptor parameters, the shape and material registries, and the store
//! that owns every constructed geometry and material.

pub mod geometry;
pub mod materials;
pub mod params;
pub mod store;

pub use geometry::{Geometry, ShapeDescriptor, ShapeParams, ShapeRegistry, ShapeTag};
pub use materials::{Material, MaterialDescriptor, MaterialKind, MaterialRegistry, MaterialTag};
pub use params::{ParamValue, Params};
pub use store::{GeometryHandle, MaterialHandle, ResourceStore, SharedResources};
