//! Scene description files
//!
//! A declarative list of objects and lights, loadable from RON or TOML through
//! the [`Config`] trait and spawned into a graph in one step.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::lighting::Light;
use super::object_factory::{ObjectDescriptor, ObjectFactory};
use super::scene_graph::SceneGraph;
use super::DrawableId;
use crate::config::Config;
use crate::error::{EngineError, Result};
use crate::lifecycle::LifecycleState;

/// One object entry with an optional fixed id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Fixed id; generated when absent
    #[serde(default)]
    pub id: Option<String>,
    /// What to build
    pub descriptor: ObjectDescriptor,
}

/// Objects and lights making up a scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    /// Objects in spawn order
    pub objects: Vec<SceneObject>,
    /// Lights added after the objects
    pub lights: Vec<Light>,
}

impl Config for SceneDescription {}

impl SceneDescription {
    /// Build every object and add it, with the lights, to `scene`.
    ///
    /// Either every object is added or none is: ids are checked up front, and
    /// construction failures release everything already built.
    pub fn spawn_into(&self, factory: &ObjectFactory, scene: &mut SceneGraph) -> Result<Vec<DrawableId>> {
        if scene.is_disposed() {
            return Err(EngineError::invalid_state("add", LifecycleState::Disposed));
        }

        let mut requested = HashSet::new();
        for id in self.objects.iter().filter_map(|o| o.id.as_deref()) {
            if !scene.is_id_available(id) || !requested.insert(id) {
                return Err(EngineError::DuplicateId { id: id.to_string() });
            }
        }

        let descriptors: Vec<ObjectDescriptor> = self.objects.iter().map(|o| o.descriptor.clone()).collect();
        let drawables = factory.create_drawables(&descriptors)?;

        let mut ids = Vec::with_capacity(drawables.len());
        let mut pending = self.objects.iter().zip(drawables);
        while let Some((object, drawable)) = pending.next() {
            match scene.add(drawable, object.id.as_deref()) {
                Ok(id) => ids.push(id),
                Err(err) => {
                    for (_, rest) in pending {
                        if let Err(release_err) = factory.release(rest) {
                            log::warn!("Rollback release failed: {release_err}");
                        }
                    }
                    for id in &ids {
                        scene.remove(id.as_str());
                    }
                    return Err(err);
                }
            }
        }

        for light in &self.lights {
            scene.add_light(light.clone());
        }

        log::info!("Spawned {} objects and {} lights", ids.len(), self.lights.len());
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::ResourceStore;
    use crate::scene::Camera;

    const SCENE: &str = r#"
        #![enable(implicit_some)]
        (
            objects: [
                (
                    id: "ground",
                    descriptor: (
                        shape: (tag: plane, params: {"width": 10, "height": 10}),
                        material: (tag: diffuse, params: {"color": 0x336633}),
                        transform: (rotation: (x: -1.5707964)),
                    ),
                ),
                (
                    descriptor: (
                        shape: (tag: icosahedron, params: {"detail": 1}),
                        material: (tag: physical, params: {"metalness": 0.5}),
                        name: "Gem",
                    ),
                ),
            ],
            lights: [
                ambient(intensity: 0.4),
                directional(direction: (0.0, -1.0, -1.0)),
            ],
        )
    "#;

    fn setup() -> (ObjectFactory, SceneGraph) {
        let resources = ResourceStore::shared();
        (ObjectFactory::new(resources.clone()), SceneGraph::new(resources, Camera::default()))
    }

    #[test]
    fn test_spawn_from_ron() {
        let description = SceneDescription::from_ron_str(SCENE).unwrap();
        let (factory, mut scene) = setup();
        let ids = description.spawn_into(&factory, &mut scene).unwrap();

        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0].as_str(), "ground");
        assert_eq!(scene.get(ids[1].as_str()).unwrap().name(), Some("Gem"));
        assert_eq!(scene.lights().len(), 2);
    }

    #[test]
    fn test_spawn_from_toml() {
        let description = SceneDescription::from_toml_str(
            r#"
            [[objects]]
            id = "ball"
            [objects.descriptor.shape]
            tag = "sphere"
            params = { radius = 0.5 }
            [objects.descriptor.material]
            tag = "toon"
            "#,
        )
        .unwrap();
        let (factory, mut scene) = setup();
        description.spawn_into(&factory, &mut scene).unwrap();
        assert!(scene.contains("ball"));
    }

    #[test]
    fn test_failure_spawns_nothing() {
        let mut description = SceneDescription::from_ron_str(SCENE).unwrap();
        description.objects[1].descriptor.material.params.insert("metalness".into(), 3.0.into());

        let (factory, mut scene) = setup();
        assert!(description.spawn_into(&factory, &mut scene).is_err());
        assert!(scene.is_empty());
        assert!(scene.lights().is_empty());
        assert_eq!(factory.resources().borrow().live_count(), 0);
        // Nothing was added, so the fixed id is still free
        assert!(scene.is_id_available("ground"));
    }

    #[test]
    fn test_duplicate_ids_rejected_up_front() {
        let mut description = SceneDescription::from_ron_str(SCENE).unwrap();
        description.objects[1].id = Some("ground".to_string());

        let (factory, mut scene) = setup();
        let err = description.spawn_into(&factory, &mut scene).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateId { ref id } if id == "ground"));
        assert_eq!(factory.resources().borrow().live_count(), 0);
    }
}
