//! Shape registry: tag + params in, geometry handle out

use super::{Geometry, ShapeDescriptor, ShapeTag};
use crate::error::Result;
use crate::resources::params::Params;
use crate::resources::store::{GeometryHandle, SharedResources};

/// Builds geometries into a shared [`ResourceStore`](crate::resources::ResourceStore)
pub struct ShapeRegistry {
    resources: SharedResources,
}

impl ShapeRegistry {
    /// Registry writing into `resources`
    pub fn new(resources: SharedResources) -> Self {
        Self { resources }
    }

    /// Construct a geometry for `tag`, filling missing fields with defaults
    pub fn construct(&self, tag: ShapeTag, params: &Params) -> Result<GeometryHandle> {
        let geometry = Geometry::build(tag, params)?;
        let triangles = geometry.mesh().triangle_count();
        let handle = self.resources.borrow_mut().insert_geometry(geometry);
        log::debug!("Constructed {tag} geometry ({triangles} triangles) as {handle:?}");
        Ok(handle)
    }

    /// Construct from a tag name; unknown names fail with a config error
    pub fn construct_named(&self, name: &str, params: &Params) -> Result<GeometryHandle> {
        self.construct(name.parse()?, params)
    }

    /// Construct from a descriptor
    pub fn construct_descriptor(&self, descriptor: &ShapeDescriptor) -> Result<GeometryHandle> {
        self.construct(descriptor.tag, &descriptor.params)
    }

    /// Release a geometry built by this registry
    pub fn release(&self, handle: GeometryHandle) -> Result<()> {
        self.resources.borrow_mut().release_geometry(handle)?;
        log::debug!("Released geometry {handle:?}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::resources::store::ResourceStore;

    #[test]
    fn test_construct_every_tag() {
        let resources = ResourceStore::shared();
        let registry = ShapeRegistry::new(resources.clone());
        for tag in ShapeTag::ALL {
            let handle = registry.construct(tag, &Params::new()).unwrap();
            assert_eq!(handle.tag(), tag);
        }
        assert_eq!(resources.borrow().live_geometries(), ShapeTag::ALL.len());
    }

    #[test]
    fn test_construct_named_unknown_tag() {
        let resources = ResourceStore::shared();
        let registry = ShapeRegistry::new(resources.clone());
        let err = registry.construct_named("teapot", &Params::new()).unwrap_err();
        assert!(matches!(err, EngineError::Config { ref tag, .. } if tag == "teapot"));
        assert_eq!(resources.borrow().live_count(), 0);
    }

    #[test]
    fn test_invalid_params_allocate_nothing() {
        let resources = ResourceStore::shared();
        let registry = ShapeRegistry::new(resources.clone());
        let descriptor = ShapeDescriptor::new(ShapeTag::Sphere).with("radius", true);
        assert!(registry.construct_descriptor(&descriptor).is_err());
        assert_eq!(resources.borrow().live_count(), 0);
    }
}
