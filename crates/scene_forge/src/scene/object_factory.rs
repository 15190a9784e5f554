//! Object factory
//!
//! Turns an [`ObjectDescriptor`] into a [`Drawable`] by running the shape
//! registry, then the material registry, then resolving the transform. If a
//! later step fails, whatever the earlier steps allocated is released before
//! the error is returned, so a failed construction never leaks handles.

use serde::{Deserialize, Serialize};

use super::drawable::Drawable;
use crate::error::{EngineError, Result};
use crate::foundation::math::{Transform, Vec3};
use crate::resources::{
    MaterialDescriptor, MaterialRegistry, ShapeDescriptor, ShapeRegistry, SharedResources,
};

/// Three optional components; a missing axis keeps the default
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxesDescriptor {
    /// X component
    pub x: Option<f32>,
    /// Y component
    pub y: Option<f32>,
    /// Z component
    pub z: Option<f32>,
}

impl AxesDescriptor {
    /// All three axes set
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
        }
    }

    fn resolve(&self, group: &str, default: f32) -> Result<Vec3> {
        let axis = |name: &str, value: Option<f32>| -> Result<f32> {
            let value = value.unwrap_or(default);
            if value.is_finite() {
                Ok(value)
            } else {
                Err(EngineError::config("transform", format!("{group}.{name}"), "must be finite"))
            }
        };
        Ok(Vec3::new(axis("x", self.x)?, axis("y", self.y)?, axis("z", self.z)?))
    }
}

/// Optional placement; rotation is Euler XYZ in radians
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformDescriptor {
    /// Translation (default 0)
    pub position: AxesDescriptor,
    /// Euler XYZ rotation in radians (default 0)
    pub rotation: AxesDescriptor,
    /// Scale (default 1)
    pub scale: AxesDescriptor,
}

impl TransformDescriptor {
    /// Resolve to a concrete transform
    pub fn resolve(&self) -> Result<Transform> {
        Ok(Transform::from_euler_xyz(
            self.position.resolve("position", 0.0)?,
            self.rotation.resolve("rotation", 0.0)?,
            self.scale.resolve("scale", 1.0)?,
        ))
    }
}

/// Everything needed to build one drawable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    /// Geometry to build
    pub shape: ShapeDescriptor,
    /// Material to build
    pub material: MaterialDescriptor,
    /// Placement; identity when absent
    #[serde(default)]
    pub transform: Option<TransformDescriptor>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Opaque application data
    #[serde(default)]
    pub user_data: Option<serde_json::Value>,
}

impl ObjectDescriptor {
    /// Descriptor with no transform, name or user data
    pub fn new(shape: ShapeDescriptor, material: MaterialDescriptor) -> Self {
        Self {
            shape,
            material,
            transform: None,
            name: None,
            user_data: None,
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the transform
    pub fn with_transform(mut self, transform: TransformDescriptor) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Attach application data
    pub fn with_user_data(mut self, user_data: serde_json::Value) -> Self {
        self.user_data = Some(user_data);
        self
    }
}

/// Builds drawables into a shared resource store
pub struct ObjectFactory {
    resources: SharedResources,
    shapes: ShapeRegistry,
    materials: MaterialRegistry,
}

impl ObjectFactory {
    /// Factory whose registries write into `resources`
    pub fn new(resources: SharedResources) -> Self {
        Self {
            shapes: ShapeRegistry::new(resources.clone()),
            materials: MaterialRegistry::new(resources.clone()),
            resources,
        }
    }

    /// Store this factory allocates into
    pub fn resources(&self) -> &SharedResources {
        &self.resources
    }

    /// Shape registry
    pub fn shapes(&self) -> &ShapeRegistry {
        &self.shapes
    }

    /// Material registry
    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    /// Build one drawable
    pub fn create_drawable(&self, descriptor: &ObjectDescriptor) -> Result<Drawable> {
        let geometry = self.shapes.construct_descriptor(&descriptor.shape)?;

        let material = match self.materials.construct_descriptor(&descriptor.material) {
            Ok(material) => material,
            Err(err) => {
                self.rollback(self.shapes.release(geometry));
                return Err(err);
            }
        };

        let transform = match descriptor.transform.as_ref().map(TransformDescriptor::resolve).transpose() {
            Ok(transform) => transform.unwrap_or_default(),
            Err(err) => {
                self.rollback(self.shapes.release(geometry));
                self.rollback(self.materials.release(material));
                return Err(err);
            }
        };

        log::debug!(
            "Created drawable {:?} ({} + {})",
            descriptor.name.as_deref().unwrap_or("<unnamed>"),
            geometry.tag(),
            material.tag()
        );

        Ok(Drawable::new(
            geometry,
            material,
            transform,
            descriptor.name.clone(),
            descriptor.user_data.clone(),
        ))
    }

    /// Build several drawables. On the first failure every drawable built so
    /// far is released and that failure is returned.
    pub fn create_drawables(&self, descriptors: &[ObjectDescriptor]) -> Result<Vec<Drawable>> {
        let mut built = Vec::with_capacity(descriptors.len());
        for (index, descriptor) in descriptors.iter().enumerate() {
            match self.create_drawable(descriptor) {
                Ok(drawable) => built.push(drawable),
                Err(err) => {
                    log::debug!("Descriptor {index} failed, releasing {} drawables", built.len());
                    for drawable in built {
                        self.rollback(self.release(drawable));
                    }
                    return Err(err);
                }
            }
        }
        Ok(built)
    }

    /// Release a drawable that never made it into a scene graph
    pub fn release(&self, drawable: Drawable) -> Result<()> {
        drawable.release_into(&mut self.resources.borrow_mut())
    }

    fn rollback(&self, result: Result<()>) {
        if let Err(err) = result {
            log::warn!("Rollback release failed: {err}");
        }
    }
}
