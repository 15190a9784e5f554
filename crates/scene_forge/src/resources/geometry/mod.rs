//! Geometry construction
//!
//! A [`Geometry`] is the resolved shape parameters plus the generated mesh and
//! its local bounds. Geometries live in the [`ResourceStore`] and are referred
//! to by [`GeometryHandle`].
//!
//! [`ResourceStore`]: crate::resources::ResourceStore
//! [`GeometryHandle`]: crate::resources::GeometryHandle

pub mod mesh;
pub mod polyhedra;
pub mod primitives;
pub mod registry;
pub mod shape;

pub use mesh::{MeshData, Vertex};
pub use registry::ShapeRegistry;
pub use shape::{ShapeDescriptor, ShapeParams, ShapeTag};

use crate::error::Result;
use crate::foundation::math::Aabb;
use crate::resources::params::Params;
use polyhedra::Solid;

/// Constructed geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    shape: ShapeParams,
    mesh: MeshData,
    bounds: Aabb,
}

impl Geometry {
    /// Validate `params` for `tag` and generate the mesh
    pub fn build(tag: ShapeTag, params: &Params) -> Result<Self> {
        ShapeParams::resolve(tag, params).map(Self::from_shape)
    }

    /// Generate the mesh for already-resolved parameters
    pub fn from_shape(shape: ShapeParams) -> Self {
        let mesh = match &shape {
            ShapeParams::Box(p) => primitives::build_box(p),
            ShapeParams::Sphere(p) => primitives::build_sphere(p),
            ShapeParams::Cone(p) | ShapeParams::Cylinder(p) => primitives::build_cylinder(p),
            ShapeParams::Torus(p) => primitives::build_torus(p),
            ShapeParams::Plane(p) => primitives::build_plane(p),
            ShapeParams::Ring(p) => primitives::build_ring(p),
            ShapeParams::Circle(p) => primitives::build_circle(p),
            ShapeParams::Tetrahedron(p) => polyhedra::build_polyhedron(Solid::Tetrahedron, p),
            ShapeParams::Octahedron(p) => polyhedra::build_polyhedron(Solid::Octahedron, p),
            ShapeParams::Dodecahedron(p) => polyhedra::build_polyhedron(Solid::Dodecahedron, p),
            ShapeParams::Icosahedron(p) => polyhedra::build_polyhedron(Solid::Icosahedron, p),
        };
        let bounds = mesh.bounds();
        Self { shape, mesh, bounds }
    }

    /// Shape tag
    pub fn tag(&self) -> ShapeTag {
        self.shape.tag()
    }

    /// Resolved parameters
    pub fn shape(&self) -> &ShapeParams {
        &self.shape
    }

    /// Generated mesh
    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    /// Local-space bounds of the mesh
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tag_builds_a_mesh() {
        for tag in ShapeTag::ALL {
            let geometry = Geometry::build(tag, &Params::new()).unwrap();
            assert_eq!(geometry.tag(), tag);
            assert!(geometry.mesh().triangle_count() > 0, "{tag} produced no triangles");
        }
    }

    #[test]
    fn test_cone_apex_at_top() {
        let cone = Geometry::build(ShapeTag::Cone, &Params::new()).unwrap();
        let bounds = cone.bounds();
        assert!((bounds.max.y - 0.5).abs() < 1e-6);
        assert!((bounds.min.y + 0.5).abs() < 1e-6);
    }
}
