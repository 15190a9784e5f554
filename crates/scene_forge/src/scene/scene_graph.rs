//! Scene graph
//!
//! Owns the drawables of one scene, keyed by [`DrawableId`], together with the
//! scene's lights and camera. The graph is the only place drawable handles are
//! released once a drawable has been added:
//!
//! - `remove` releases one drawable and retires its id
//! - `dispose` releases everything exactly once; later calls do nothing
//! - dropping the graph disposes it
//!
//! Retired ids are never handed out again, so a stale id can't resolve to an
//! unrelated drawable.

use std::collections::{BTreeMap, HashSet};

use super::camera::Camera;
use super::drawable::{Drawable, DrawableId};
use super::lighting::Light;
use crate::error::{EngineError, Result};
use crate::foundation::math::Ray;
use crate::lifecycle::LifecycleState;
use crate::resources::SharedResources;

/// Nearest pickable drawable along a ray
#[derive(Debug, Clone, PartialEq)]
pub struct PickHit {
    /// Drawable that was hit
    pub id: DrawableId,
    /// Distance along the ray to the bounds entry point
    pub distance: f32,
}

/// Keyed collection of drawables plus lights and camera
pub struct SceneGraph {
    resources: SharedResources,
    entries: BTreeMap<DrawableId, Drawable>,
    retired: HashSet<DrawableId>,
    next_id: u64,
    lights: Vec<Light>,
    camera: Camera,
    disposed: bool,
}

impl SceneGraph {
    /// Empty graph releasing into `resources`
    pub fn new(resources: SharedResources, camera: Camera) -> Self {
        Self {
            resources,
            entries: BTreeMap::new(),
            retired: HashSet::new(),
            next_id: 1,
            lights: Vec::new(),
            camera,
            disposed: false,
        }
    }

    /// Take ownership of `drawable` under `id`, or a generated id when `None`.
    ///
    /// On failure the drawable's handles are released, so the caller never
    /// has to clean up after a rejected add.
    pub fn add(&mut self, mut drawable: Drawable, id: Option<&str>) -> Result<DrawableId> {
        let id = match self.claim_id(id) {
            Ok(id) => id,
            Err(err) => {
                self.release(&drawable);
                return Err(err);
            }
        };

        log::debug!("Adding drawable '{id}' ({:?})", drawable.name());
        drawable.id = Some(id.clone());
        self.entries.insert(id.clone(), drawable);
        Ok(id)
    }

    fn claim_id(&mut self, requested: Option<&str>) -> Result<DrawableId> {
        if self.disposed {
            return Err(EngineError::invalid_state("add", LifecycleState::Disposed));
        }
        match requested {
            Some(id) if !self.is_id_available(id) => Err(EngineError::DuplicateId { id: id.to_string() }),
            Some(id) => Ok(DrawableId::from(id)),
            None => loop {
                let candidate = format!("drawable-{}", self.next_id);
                self.next_id += 1;
                if self.is_id_available(&candidate) {
                    break Ok(DrawableId::from(candidate));
                }
            },
        }
    }

    /// True if `id` is neither present nor retired
    pub fn is_id_available(&self, id: &str) -> bool {
        !self.entries.contains_key(id) && !self.retired.contains(id)
    }

    /// Detach and release a drawable. Returns `false` if `id` is not present.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.entries.remove_entry(id) {
            Some((id, drawable)) => {
                log::debug!("Removing drawable '{id}'");
                self.release(&drawable);
                self.retired.insert(id);
                true
            }
            None => false,
        }
    }

    /// Release every owned drawable exactly once. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        let count = self.entries.len();
        for (id, drawable) in std::mem::take(&mut self.entries) {
            self.release(&drawable);
            self.retired.insert(id);
        }
        self.lights.clear();
        self.disposed = true;
        log::info!("Scene graph disposed ({count} drawables released)");
    }

    /// Release every drawable and light and return the graph to its freshly
    /// built state. Unlike `remove`, ids are not retired: every id becomes
    /// available again and generation restarts. The camera is kept.
    pub fn reset(&mut self) {
        let count = self.entries.len();
        for (_, drawable) in std::mem::take(&mut self.entries) {
            self.release(&drawable);
        }
        self.retired.clear();
        self.next_id = 1;
        self.lights.clear();
        log::debug!("Scene graph reset ({count} drawables released)");
    }

    fn release(&self, drawable: &Drawable) {
        if let Err(err) = drawable.release_into(&mut self.resources.borrow_mut()) {
            log::warn!("Ignoring release failure for {:?}: {err}", drawable.id());
        }
    }

    /// Whether `dispose` has run
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Look up a drawable
    pub fn get(&self, id: &str) -> Option<&Drawable> {
        self.entries.get(id)
    }

    /// Look up a drawable mutably
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Drawable> {
        self.entries.get_mut(id)
    }

    /// Whether `id` is present
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of drawables
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no drawables are present
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids in order
    pub fn ids(&self) -> impl Iterator<Item = &DrawableId> {
        self.entries.keys()
    }

    /// Drawables in id order
    pub fn iter(&self) -> impl Iterator<Item = (&DrawableId, &Drawable)> {
        self.entries.iter()
    }

    /// Drawables in id order, mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&DrawableId, &mut Drawable)> {
        self.entries.iter_mut()
    }

    /// Add a light
    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Remove every light
    pub fn clear_lights(&mut self) {
        self.lights.clear();
    }

    /// Lights in insertion order
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Scene camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Scene camera, mutably
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Store the drawables' handles live in
    pub fn resources(&self) -> &SharedResources {
        &self.resources
    }

    /// Nearest pickable drawable whose world bounds the ray enters
    pub fn pick(&self, ray: &Ray) -> Option<PickHit> {
        let store = self.resources.borrow();
        let nearest = self
            .entries
            .iter()
            .filter(|(_, d)| d.is_pickable())
            .filter_map(|(id, d)| {
                let distance = d.world_bounds(&store)?.intersect_ray(ray)?;
                Some(PickHit { id: id.clone(), distance })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance));
        nearest
    }
}

impl Drop for SceneGraph {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::resources::{MaterialDescriptor, MaterialTag, ResourceStore, ShapeDescriptor, ShapeTag};
    use crate::scene::drawable::DrawFlags;
    use crate::scene::object_factory::{ObjectDescriptor, ObjectFactory};

    fn setup() -> (ObjectFactory, SceneGraph) {
        let resources = ResourceStore::shared();
        let scene = SceneGraph::new(resources.clone(), Camera::default());
        (ObjectFactory::new(resources), scene)
    }

    fn cube(factory: &ObjectFactory) -> Drawable {
        factory
            .create_drawable(&ObjectDescriptor::new(
                ShapeDescriptor::new(ShapeTag::Box),
                MaterialDescriptor::new(MaterialTag::Diffuse),
            ))
            .unwrap()
    }

    #[test]
    fn test_add_generates_ids() {
        let (factory, mut scene) = setup();
        let a = scene.add(cube(&factory), None).unwrap();
        let b = scene.add(cube(&factory), None).unwrap();
        assert_ne!(a, b);
        assert_eq!(scene.get(a.as_str()).unwrap().id(), Some(&a));
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_generated_ids_skip_taken_names() {
        let (factory, mut scene) = setup();
        scene.add(cube(&factory), Some("drawable-1")).unwrap();
        let generated = scene.add(cube(&factory), None).unwrap();
        assert_eq!(generated.as_str(), "drawable-2");
    }

    #[test]
    fn test_duplicate_id_rejected_and_released() {
        let (factory, mut scene) = setup();
        scene.add(cube(&factory), Some("hero")).unwrap();
        let err = scene.add(cube(&factory), Some("hero")).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateId { ref id } if id == "hero"));
        assert_eq!(scene.len(), 1);
        assert_eq!(factory.resources().borrow().live_count(), 2);
    }

    #[test]
    fn test_add_remove_restores_size_and_retires_id() {
        let (factory, mut scene) = setup();
        scene.add(cube(&factory), Some("keep")).unwrap();
        let before = scene.len();

        let id = scene.add(cube(&factory), None).unwrap();
        assert!(scene.remove(id.as_str()));
        assert_eq!(scene.len(), before);
        assert!(scene.get(id.as_str()).is_none());
        assert!(!scene.remove(id.as_str()));
        assert!(matches!(
            scene.add(cube(&factory), Some(id.as_str())),
            Err(EngineError::DuplicateId { .. })
        ));
        assert_eq!(factory.resources().borrow().live_count(), 2);
    }

    #[test]
    fn test_dispose_twice_same_as_once() {
        let (factory, mut scene) = setup();
        scene.add(cube(&factory), None).unwrap();
        scene.add(cube(&factory), None).unwrap();
        scene.add_light(Light::ambient(0xffffff, 0.5));

        scene.dispose();
        assert!(scene.is_empty());
        assert!(scene.lights().is_empty());
        assert_eq!(factory.resources().borrow().live_count(), 0);

        scene.dispose();
        assert!(scene.is_disposed());
        assert_eq!(factory.resources().borrow().live_count(), 0);
    }

    #[test]
    fn test_reset_frees_ids() {
        let (factory, mut scene) = setup();
        scene.add(cube(&factory), Some("a")).unwrap();
        let removed = scene.add(cube(&factory), None).unwrap();
        assert!(scene.remove(removed.as_str()));
        scene.add_light(Light::ambient(0xffffff, 1.0));
        scene.reset();

        assert!(scene.is_empty());
        assert!(scene.lights().is_empty());
        assert!(!scene.is_disposed());
        assert!(scene.is_id_available("a"));
        assert!(scene.is_id_available(removed.as_str()));
        assert_eq!(factory.resources().borrow().live_count(), 0);

        scene.add(cube(&factory), Some("a")).unwrap();
        assert_eq!(scene.add(cube(&factory), None).unwrap().as_str(), "drawable-1");
    }

    #[test]
    fn test_remove_and_dispose_tolerate_released_handles() {
        let (factory, mut scene) = setup();
        let first = cube(&factory);
        let first_material = first.material();
        factory.resources().borrow_mut().release_geometry(first.geometry()).unwrap();
        scene.add(first, Some("first")).unwrap();

        let second = cube(&factory);
        factory.resources().borrow_mut().release_geometry(second.geometry()).unwrap();
        scene.add(second, Some("second")).unwrap();

        assert!(scene.remove("first"));
        assert!(factory.resources().borrow().material(first_material).is_none());

        scene.dispose();
        assert!(scene.is_disposed());
        assert_eq!(factory.resources().borrow().live_count(), 0);
    }

    #[test]
    fn test_add_after_dispose() {
        let (factory, mut scene) = setup();
        scene.dispose();
        let err = scene.add(cube(&factory), None).unwrap_err();
        assert!(matches!(err, EngineError::InvalidState { attempted: "add", current: LifecycleState::Disposed }));
        assert_eq!(factory.resources().borrow().live_count(), 0);
    }

    #[test]
    fn test_drop_releases_everything() {
        let (factory, mut scene) = setup();
        scene.add(cube(&factory), None).unwrap();
        drop(scene);
        assert_eq!(factory.resources().borrow().live_count(), 0);
    }

    #[test]
    fn test_pick_nearest_pickable() {
        let (factory, mut scene) = setup();
        let mut near = cube(&factory);
        near.transform.position = Vec3::new(0.0, 0.0, 2.0);
        let far = cube(&factory);
        scene.add(near, Some("near")).unwrap();
        scene.add(far, Some("far")).unwrap();

        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(scene.pick(&ray).unwrap().id.as_str(), "near");

        scene.get_mut("near").unwrap().set_flags(DrawFlags::VISIBLE);
        assert_eq!(scene.pick(&ray).unwrap().id.as_str(), "far");

        let miss = Ray::new(Vec3::new(10.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(scene.pick(&miss).is_none());
    }
}
