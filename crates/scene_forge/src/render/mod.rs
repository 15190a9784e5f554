//! Render backend boundary
//!
//! The engine does not rasterize anything itself. Once per frame the lifecycle
//! manager hands the active [`RenderBackend`] a read-only [`FrameView`] of the
//! scene; what the backend does with it is its own business.
//!
//! [`HeadlessRenderer`] walks the view the way a real backend would (visible
//! drawables only, one draw call each, vertex data taken as raw bytes) and
//! records a [`FrameRecord`] per frame instead of drawing.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{EngineError, Result};
use crate::foundation::math::Mat4;
use crate::resources::ResourceStore;
use crate::scene::SceneGraph;

/// Read-only snapshot handed to the backend each frame
pub struct FrameView<'a> {
    /// Scene being drawn
    pub scene: &'a SceneGraph,
    /// Store holding the scene's geometries and materials
    pub resources: &'a ResourceStore,
    /// Zero-based frame counter since the loop first started
    pub frame_index: u64,
    /// Seconds since the previous frame
    pub delta_time: f32,
}

impl FrameView<'_> {
    /// Projection * view of the scene camera
    pub fn view_projection(&self) -> Mat4 {
        self.scene.camera().view_projection()
    }
}

/// Consumer of frames
pub trait RenderBackend {
    /// Draw one frame
    fn render(&mut self, frame: &FrameView<'_>) -> Result<()>;

    /// Called once when the owning lifecycle manager is disposed
    fn shutdown(&mut self) {}
}

/// What the headless renderer saw in one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    /// Frame counter
    pub frame_index: u64,
    /// One per visible drawable
    pub draw_calls: usize,
    /// Triangles across all draw calls
    pub triangles: usize,
    /// Vertex bytes that would have been uploaded
    pub vertex_bytes: usize,
    /// Lights in the scene
    pub lights: usize,
}

/// Shared handle to the records of a [`HeadlessRenderer`]
pub type FrameLog = Rc<RefCell<Vec<FrameRecord>>>;

/// Backend that records frames instead of drawing them
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    log: FrameLog,
    fail_at: Option<u64>,
    shut_down: bool,
}

impl HeadlessRenderer {
    /// Renderer and a handle to read its records
    pub fn new() -> (Self, FrameLog) {
        let renderer = Self::default();
        let log = renderer.log.clone();
        (renderer, log)
    }

    /// Fail with a backend error when asked to render `frame_index`
    pub fn fail_at_frame(mut self, frame_index: u64) -> Self {
        self.fail_at = Some(frame_index);
        self
    }

    /// Whether `shutdown` was called
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

impl RenderBackend for HeadlessRenderer {
    fn render(&mut self, frame: &FrameView<'_>) -> Result<()> {
        if self.fail_at == Some(frame.frame_index) {
            return Err(EngineError::Backend(format!("simulated failure at frame {}", frame.frame_index)));
        }

        let mut record = FrameRecord {
            frame_index: frame.frame_index,
            draw_calls: 0,
            triangles: 0,
            vertex_bytes: 0,
            lights: frame.scene.lights().len(),
        };

        for (id, drawable) in frame.scene.iter().filter(|(_, d)| d.is_visible()) {
            let geometry = frame
                .resources
                .geometry(drawable.geometry())
                .ok_or_else(|| EngineError::Backend(format!("drawable '{id}' has no live geometry")))?;
            if frame.resources.material(drawable.material()).is_none() {
                return Err(EngineError::Backend(format!("drawable '{id}' has no live material")));
            }
            let mesh = geometry.mesh();
            record.draw_calls += 1;
            record.triangles += mesh.triangle_count();
            record.vertex_bytes += mesh.vertex_bytes().len();
        }

        log::trace!(
            "Frame {}: {} draw calls, {} triangles",
            record.frame_index,
            record.draw_calls,
            record.triangles
        );
        self.log.borrow_mut().push(record);
        Ok(())
    }

    fn shutdown(&mut self) {
        self.shut_down = true;
        log::debug!("Headless renderer shut down after {} frames", self.log.borrow().len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{MaterialDescriptor, MaterialTag, ShapeDescriptor, ShapeTag};
    use crate::scene::{Camera, Light, ObjectDescriptor, ObjectFactory};

    #[test]
    fn test_records_visible_drawables_only() {
        let resources = ResourceStore::shared();
        let factory = ObjectFactory::new(resources.clone());
        let mut scene = SceneGraph::new(resources.clone(), Camera::default());
        let descriptor = ObjectDescriptor::new(
            ShapeDescriptor::new(ShapeTag::Box),
            MaterialDescriptor::new(MaterialTag::Unlit),
        );
        scene.add(factory.create_drawable(&descriptor).unwrap(), Some("shown")).unwrap();
        scene.add(factory.create_drawable(&descriptor).unwrap(), Some("hidden")).unwrap();
        scene.get_mut("hidden").unwrap().set_visible(false);
        scene.add_light(Light::ambient(0xffffff, 1.0));

        let (mut renderer, log) = HeadlessRenderer::new();
        {
            let store = resources.borrow();
            let view = FrameView { scene: &scene, resources: &store, frame_index: 0, delta_time: 0.016 };
            renderer.render(&view).unwrap();
        }

        let records = log.borrow();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].draw_calls, 1);
        assert_eq!(records[0].triangles, 12);
        assert_eq!(records[0].vertex_bytes, 24 * 32);
        assert_eq!(records[0].lights, 1);
    }

    #[test]
    fn test_simulated_failure() {
        let resources = ResourceStore::shared();
        let scene = SceneGraph::new(resources.clone(), Camera::default());
        let (renderer, log) = HeadlessRenderer::new();
        let mut renderer = renderer.fail_at_frame(0);
        let store = resources.borrow();
        let view = FrameView { scene: &scene, resources: &store, frame_index: 0, delta_time: 0.0 };
        assert!(matches!(renderer.render(&view), Err(EngineError::Backend(_))));
        assert!(log.borrow().is_empty());
    }
}
