//! Drawable: a geometry + material pair placed in the world

use std::borrow::Borrow;
use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::foundation::math::{Aabb, Transform};
use crate::resources::{GeometryHandle, MaterialHandle, ResourceStore};

/// Key of a drawable within one scene graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DrawableId(String);

impl DrawableId {
    /// Id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DrawableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DrawableId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DrawableId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for DrawableId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

bitflags! {
    /// Per-drawable rendering and interaction flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DrawFlags: u32 {
        /// Submitted to the render backend
        const VISIBLE = 1 << 0;
        /// Considered by pointer picking
        const PICKABLE = 1 << 1;
    }
}

impl Default for DrawFlags {
    fn default() -> Self {
        DrawFlags::VISIBLE | DrawFlags::PICKABLE
    }
}

/// A renderable object built by the [`ObjectFactory`](super::ObjectFactory).
///
/// Owns one geometry handle and one material handle. The handles are released
/// by the scene graph that owns the drawable (or by the factory on rollback);
/// a drawable is never cloned, so each handle has exactly one owner.
#[derive(Debug)]
pub struct Drawable {
    pub(crate) id: Option<DrawableId>,
    geometry: GeometryHandle,
    material: MaterialHandle,
    /// World placement
    pub transform: Transform,
    name: Option<String>,
    user_data: Option<serde_json::Value>,
    flags: DrawFlags,
}

impl Drawable {
    pub(crate) fn new(
        geometry: GeometryHandle,
        material: MaterialHandle,
        transform: Transform,
        name: Option<String>,
        user_data: Option<serde_json::Value>,
    ) -> Self {
        Self {
            id: None,
            geometry,
            material,
            transform,
            name,
            user_data,
            flags: DrawFlags::default(),
        }
    }

    /// Id assigned by the scene graph; `None` until added
    pub fn id(&self) -> Option<&DrawableId> {
        self.id.as_ref()
    }

    /// Geometry handle
    pub fn geometry(&self) -> GeometryHandle {
        self.geometry
    }

    /// Material handle
    pub fn material(&self) -> MaterialHandle {
        self.material
    }

    /// Display name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Opaque application data carried from the descriptor
    pub fn user_data(&self) -> Option<&serde_json::Value> {
        self.user_data.as_ref()
    }

    /// Mutable application data
    pub fn user_data_mut(&mut self) -> &mut Option<serde_json::Value> {
        &mut self.user_data
    }

    /// Current flags
    pub fn flags(&self) -> DrawFlags {
        self.flags
    }

    /// Replace the flags
    pub fn set_flags(&mut self, flags: DrawFlags) {
        self.flags = flags;
    }

    /// Whether the backend should draw this
    pub fn is_visible(&self) -> bool {
        self.flags.contains(DrawFlags::VISIBLE)
    }

    /// Show or hide
    pub fn set_visible(&mut self, visible: bool) {
        self.flags.set(DrawFlags::VISIBLE, visible);
    }

    /// Whether picking considers this
    pub fn is_pickable(&self) -> bool {
        self.flags.contains(DrawFlags::PICKABLE)
    }

    /// World-space bounds, or `None` if the geometry is no longer live
    pub fn world_bounds(&self, store: &ResourceStore) -> Option<Aabb> {
        store
            .geometry(self.geometry)
            .map(|g| g.bounds().transformed(&self.transform.to_matrix()))
    }

    /// Release both handles. Both releases are attempted; the first failure is
    /// returned.
    pub(crate) fn release_into(&self, store: &mut ResourceStore) -> Result<()> {
        let geometry = store.release_geometry(self.geometry).map(|_| ());
        let material = store.release_material(self.material).map(|_| ());
        geometry.and(material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::foundation::math::Vec3;
    use crate::resources::{Geometry, Material, MaterialTag, Params, ShapeTag};

    fn drawable(store: &mut ResourceStore) -> Drawable {
        let g = store.insert_geometry(Geometry::build(ShapeTag::Box, &Params::new()).unwrap());
        let m = store.insert_material(Material::resolve(MaterialTag::Unlit, &Params::new()).unwrap());
        Drawable::new(g, m, Transform::identity(), Some("crate".to_string()), None)
    }

    #[test]
    fn test_default_flags() {
        let mut store = ResourceStore::new();
        let mut d = drawable(&mut store);
        assert!(d.is_visible() && d.is_pickable());
        d.set_visible(false);
        assert!(!d.is_visible());
        assert!(d.is_pickable());
        d.release_into(&mut store).unwrap();
    }

    #[test]
    fn test_world_bounds_follow_transform() {
        let mut store = ResourceStore::new();
        let mut d = drawable(&mut store);
        d.transform.position = Vec3::new(5.0, 0.0, 0.0);
        let bounds = d.world_bounds(&store).unwrap();
        assert!((bounds.center().x - 5.0).abs() < 1e-6);
        d.release_into(&mut store).unwrap();
        assert!(d.world_bounds(&store).is_none());
    }

    #[test]
    fn test_release_twice_reports_resource_error() {
        let mut store = ResourceStore::new();
        let d = drawable(&mut store);
        d.release_into(&mut store).unwrap();
        assert!(matches!(d.release_into(&mut store), Err(EngineError::Resource { .. })));
    }
}
