//! Scene hooks
//!
//! Applications describe their scene by implementing [`SceneHooks`]. The
//! lifecycle manager calls the hooks in a fixed order and hands each one a
//! [`SceneContext`] that borrows the scene for the duration of the call, so
//! nothing else can touch the graph while a hook runs.

use crate::error::Result;
use crate::events::{EventSource, InputEvent};
use crate::scene::{DrawableId, ObjectDescriptor, ObjectFactory, SceneGraph};

/// What a hook may touch while it runs
pub struct SceneContext<'a> {
    /// Factory for building drawables
    pub factory: &'a ObjectFactory,
    /// The scene being built or updated
    pub scene: &'a mut SceneGraph,
    stop_requested: &'a mut bool,
    frame_index: u64,
}

impl<'a> SceneContext<'a> {
    pub(crate) fn new(
        factory: &'a ObjectFactory,
        scene: &'a mut SceneGraph,
        stop_requested: &'a mut bool,
        frame_index: u64,
    ) -> Self {
        Self {
            factory,
            scene,
            stop_requested,
            frame_index,
        }
    }

    /// Build a drawable and add it to the scene in one step
    pub fn spawn(&mut self, descriptor: &ObjectDescriptor, id: Option<&str>) -> Result<DrawableId> {
        let drawable = self.factory.create_drawable(descriptor)?;
        self.scene.add(drawable, id)
    }

    /// Ask the loop to stop once the current frame completes
    pub fn request_stop(&mut self) {
        *self.stop_requested = true;
    }

    /// Whether a stop has been requested this frame
    pub fn stop_requested(&self) -> bool {
        *self.stop_requested
    }

    /// Index of the frame being processed
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}

/// Per-application scene behavior
///
/// `initialize` runs `build_scene`, `build_lighting` and `attach_events` in
/// that order. Each frame runs `handle_event` for every polled event, then
/// `update`, then the render backend.
pub trait SceneHooks {
    /// Create the scene's drawables
    fn build_scene(&mut self, ctx: &mut SceneContext<'_>) -> Result<()>;

    /// Add lights
    fn build_lighting(&mut self, _ctx: &mut SceneContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Connect the event source
    fn attach_events(&mut self, events: &mut dyn EventSource) -> Result<()> {
        events.attach()
    }

    /// React to one input event. By default a close request stops the loop.
    fn handle_event(&mut self, ctx: &mut SceneContext<'_>, event: &InputEvent) -> Result<()> {
        if matches!(event, InputEvent::CloseRequested) {
            ctx.request_stop();
        }
        Ok(())
    }

    /// Advance the scene by `delta_time` seconds
    fn update(&mut self, _ctx: &mut SceneContext<'_>, _delta_time: f32) -> Result<()> {
        Ok(())
    }

    /// Called once before the scene is disposed
    fn dispose(&mut self) {}
}
