//! Resource store
//!
//! Owns every constructed geometry and material. Handles are generational
//! `slotmap` keys, so a released handle never aliases a resource created
//! later and a second release is detected instead of silently succeeding.

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

use super::geometry::{Geometry, ShapeTag};
use super::materials::{Material, MaterialTag};
use crate::error::{EngineError, Result};

new_key_type! {
    /// Key of a stored geometry
    pub struct GeometryKey;
    /// Key of a stored material
    pub struct MaterialKey;
}

/// Opaque reference to a geometry in a [`ResourceStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryHandle {
    key: GeometryKey,
    tag: ShapeTag,
}

impl GeometryHandle {
    /// Shape the geometry was built from
    pub fn tag(&self) -> ShapeTag {
        self.tag
    }
}

/// Opaque reference to a material in a [`ResourceStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialHandle {
    key: MaterialKey,
    tag: MaterialTag,
}

impl MaterialHandle {
    /// Tag the material was built from
    pub fn tag(&self) -> MaterialTag {
        self.tag
    }
}

/// Store shared by the factory and the scene graph of one lifecycle manager
pub type SharedResources = Rc<RefCell<ResourceStore>>;

/// Owner of every live geometry and material
#[derive(Debug, Default)]
pub struct ResourceStore {
    geometries: SlotMap<GeometryKey, Geometry>,
    materials: SlotMap<MaterialKey, Material>,
}

impl ResourceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store wrapped for sharing
    pub fn shared() -> SharedResources {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Take ownership of a geometry
    pub fn insert_geometry(&mut self, geometry: Geometry) -> GeometryHandle {
        let tag = geometry.tag();
        let key = self.geometries.insert(geometry);
        GeometryHandle { key, tag }
    }

    /// Look up a live geometry
    pub fn geometry(&self, handle: GeometryHandle) -> Option<&Geometry> {
        self.geometries.get(handle.key)
    }

    /// Release a geometry; fails if it was already released
    pub fn release_geometry(&mut self, handle: GeometryHandle) -> Result<Geometry> {
        self.geometries.remove(handle.key).ok_or_else(|| EngineError::Resource {
            handle: format!("{handle:?}"),
        })
    }

    /// Take ownership of a material
    pub fn insert_material(&mut self, material: Material) -> MaterialHandle {
        let tag = material.tag();
        let key = self.materials.insert(material);
        MaterialHandle { key, tag }
    }

    /// Look up a live material
    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(handle.key)
    }

    /// Release a material; fails if it was already released
    pub fn release_material(&mut self, handle: MaterialHandle) -> Result<Material> {
        self.materials.remove(handle.key).ok_or_else(|| EngineError::Resource {
            handle: format!("{handle:?}"),
        })
    }

    /// Number of live geometries
    pub fn live_geometries(&self) -> usize {
        self.geometries.len()
    }

    /// Number of live materials
    pub fn live_materials(&self) -> usize {
        self.materials.len()
    }

    /// Live geometries plus live materials
    pub fn live_count(&self) -> usize {
        self.live_geometries() + self.live_materials()
    }
}

impl Drop for ResourceStore {
    fn drop(&mut self) {
        if self.live_count() > 0 {
            log::warn!(
                "ResourceStore dropping with {} geometries and {} materials still live",
                self.live_geometries(),
                self.live_materials()
            );
        } else {
            log::debug!("ResourceStore dropping empty");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::params::Params;

    #[test]
    fn test_insert_and_release_geometry() {
        let mut store = ResourceStore::new();
        let handle = store.insert_geometry(Geometry::build(ShapeTag::Box, &Params::new()).unwrap());
        assert_eq!(handle.tag(), ShapeTag::Box);
        assert!(store.geometry(handle).is_some());
        assert_eq!(store.live_geometries(), 1);

        store.release_geometry(handle).unwrap();
        assert!(store.geometry(handle).is_none());
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn test_double_release_is_an_error() {
        let mut store = ResourceStore::new();
        let handle = store.insert_material(Material::resolve(MaterialTag::Unlit, &Params::new()).unwrap());
        store.release_material(handle).unwrap();
        let err = store.release_material(handle).unwrap_err();
        assert!(matches!(err, EngineError::Resource { .. }));
    }

    #[test]
    fn test_stale_handle_does_not_alias_new_resource() {
        let mut store = ResourceStore::new();
        let old = store.insert_geometry(Geometry::build(ShapeTag::Sphere, &Params::new()).unwrap());
        store.release_geometry(old).unwrap();
        let new = store.insert_geometry(Geometry::build(ShapeTag::Sphere, &Params::new()).unwrap());
        assert_ne!(old, new);
        assert!(store.geometry(old).is_none());
        assert!(store.geometry(new).is_some());
    }
}
