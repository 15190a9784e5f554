//! Material registry: tag + params in, material handle out

use super::{Material, MaterialDescriptor, MaterialTag};
use crate::error::Result;
use crate::resources::params::Params;
use crate::resources::store::{MaterialHandle, SharedResources};

/// Builds materials into a shared [`ResourceStore`](crate::resources::ResourceStore)
pub struct MaterialRegistry {
    resources: SharedResources,
}

impl MaterialRegistry {
    /// Registry writing into `resources`
    pub fn new(resources: SharedResources) -> Self {
        Self { resources }
    }

    /// Construct a material for `tag`, filling missing fields with defaults
    pub fn construct(&self, tag: MaterialTag, params: &Params) -> Result<MaterialHandle> {
        let material = Material::resolve(tag, params)?;
        let handle = self.resources.borrow_mut().insert_material(material);
        log::debug!("Constructed {tag} material as {handle:?}");
        Ok(handle)
    }

    /// Construct from a tag name; unknown names fail with a config error
    pub fn construct_named(&self, name: &str, params: &Params) -> Result<MaterialHandle> {
        self.construct(name.parse()?, params)
    }

    /// Construct from a descriptor
    pub fn construct_descriptor(&self, descriptor: &MaterialDescriptor) -> Result<MaterialHandle> {
        self.construct(descriptor.tag, &descriptor.params)
    }

    /// Release a material built by this registry
    pub fn release(&self, handle: MaterialHandle) -> Result<()> {
        self.resources.borrow_mut().release_material(handle)?;
        log::debug!("Released material {handle:?}");
        Ok(())
    }
}
