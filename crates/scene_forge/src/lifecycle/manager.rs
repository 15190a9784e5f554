//! Lifecycle manager
//!
//! Owns a scene together with its collaborators (render backend, event
//! source, frame clock) and drives them through the states of
//! [`LifecycleState`]. Every collaborator is injected, so the same scene code
//! runs against a real window or a headless backend.

use crate::capabilities::{Capability, CapabilitySet};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::events::{EventSource, InputEvent, QueuedEventSource};
use crate::foundation::time::{FixedStepClock, FrameClock};
use crate::render::{FrameView, HeadlessRenderer, RenderBackend};
use crate::resources::ResourceStore;
use crate::scene::{Camera, ObjectFactory, SceneGraph};

use super::hooks::{SceneContext, SceneHooks};
use super::LifecycleState;

/// Builder for [`LifecycleManager`]
///
/// Collaborators left unset default to a [`HeadlessRenderer`], a detached-queue
/// [`QueuedEventSource`] and a [`FixedStepClock`] at the configured frame rate.
pub struct ManagerBuilder<H: SceneHooks> {
    hooks: H,
    config: EngineConfig,
    renderer: Option<Box<dyn RenderBackend>>,
    events: Option<Box<dyn EventSource>>,
    clock: Option<Box<dyn FrameClock>>,
}

impl<H: SceneHooks> ManagerBuilder<H> {
    /// Engine configuration; validated in [`build`](Self::build)
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Render backend
    pub fn renderer(mut self, renderer: impl RenderBackend + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Event source
    pub fn events(mut self, events: impl EventSource + 'static) -> Self {
        self.events = Some(Box::new(events));
        self
    }

    /// Frame clock
    pub fn clock(mut self, clock: impl FrameClock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Validate the configuration and assemble the manager
    pub fn build(self) -> Result<LifecycleManager<H>> {
        self.config.validate()?;

        let clock: Box<dyn FrameClock> = match self.clock {
            Some(clock) => clock,
            None => {
                let clock = FixedStepClock::from_fps(self.config.target_fps);
                match self.config.max_frames {
                    Some(limit) => Box::new(clock.with_frame_limit(limit)),
                    None => Box::new(clock),
                }
            }
        };
        let renderer: Box<dyn RenderBackend> = match self.renderer {
            Some(renderer) => renderer,
            None => Box::new(HeadlessRenderer::new().0),
        };
        let events: Box<dyn EventSource> = match self.events {
            Some(events) => events,
            None => Box::new(QueuedEventSource::new().0),
        };

        let resources = ResourceStore::shared();
        let camera = Camera::from_config(&self.config.camera, self.config.viewport.aspect());

        log::debug!(
            "Lifecycle manager created ({}x{}, {} fps)",
            self.config.viewport.width,
            self.config.viewport.height,
            self.config.target_fps
        );

        Ok(LifecycleManager {
            state: LifecycleState::Uninitialized,
            hooks: self.hooks,
            factory: ObjectFactory::new(resources.clone()),
            scene: SceneGraph::new(resources, camera),
            config: self.config,
            renderer,
            events,
            clock,
            capabilities: CapabilitySet::new(),
            frame_index: 0,
            stop_requested: false,
            events_attached: false,
        })
    }
}

/// Drives one scene through initialize / start / stop / dispose
pub struct LifecycleManager<H: SceneHooks> {
    state: LifecycleState,
    hooks: H,
    factory: ObjectFactory,
    scene: SceneGraph,
    config: EngineConfig,
    renderer: Box<dyn RenderBackend>,
    events: Box<dyn EventSource>,
    clock: Box<dyn FrameClock>,
    pub(crate) capabilities: CapabilitySet,
    frame_index: u64,
    stop_requested: bool,
    events_attached: bool,
}

impl<H: SceneHooks> LifecycleManager<H> {
    /// Start building a manager around `hooks`
    pub fn builder(hooks: H) -> ManagerBuilder<H> {
        ManagerBuilder {
            hooks,
            config: EngineConfig::default(),
            renderer: None,
            events: None,
            clock: None,
        }
    }

    /// Manager with default collaborators
    pub fn new(hooks: H, config: EngineConfig) -> Result<Self> {
        Self::builder(hooks).config(config).build()
    }

    /// Current state
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Build the scene: `build_scene`, `build_lighting`, then `attach_events`.
    ///
    /// Calling this again once initialized does nothing. If a hook fails, the
    /// drawables and lights it had added are released, the scene graph is reset
    /// so the same ids can be claimed again, and the manager stays
    /// `Uninitialized`; calling `initialize` again retries from scratch.
    pub fn initialize(&mut self) -> Result<()> {
        match self.state {
            LifecycleState::Uninitialized => {}
            LifecycleState::Disposed => return Err(EngineError::invalid_state("initialize", self.state)),
            _ => {
                log::debug!("Already initialized; ignoring initialize");
                return Ok(());
            }
        }

        log::info!("Initializing scene...");
        if let Err(err) = self.run_setup_hooks() {
            log::error!("Scene initialization failed: {err}");
            if self.events_attached {
                self.events.detach();
                self.events_attached = false;
            }
            self.scene.reset();
            return Err(err);
        }

        self.state = LifecycleState::Initialized;
        for capability in self.capabilities.iter_mut() {
            capability.on_initialized(&self.scene);
        }
        log::info!(
            "Scene initialized: {} drawables, {} lights",
            self.scene.len(),
            self.scene.lights().len()
        );
        Ok(())
    }

    fn run_setup_hooks(&mut self) -> Result<()> {
        let mut ctx = SceneContext::new(&self.factory, &mut self.scene, &mut self.stop_requested, 0);
        self.hooks.build_scene(&mut ctx)?;
        self.hooks.build_lighting(&mut ctx)?;
        self.hooks.attach_events(self.events.as_mut())?;
        self.events_attached = true;
        self.stop_requested = false;
        Ok(())
    }

    /// Begin producing frames. Starting a running manager does nothing.
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            LifecycleState::Initialized | LifecycleState::Stopped => {
                self.clock.start();
                self.stop_requested = false;
                self.state = LifecycleState::Running;
                log::info!("Starting main loop...");
                Ok(())
            }
            LifecycleState::Running => Ok(()),
            LifecycleState::Uninitialized | LifecycleState::Disposed => {
                Err(EngineError::invalid_state("start", self.state))
            }
        }
    }

    /// Halt the loop. Stopping a stopped manager does nothing.
    ///
    /// Hooks that want to stop from inside a frame use
    /// [`SceneContext::request_stop`]; the stop then lands after that frame's
    /// render.
    pub fn stop(&mut self) -> Result<()> {
        match self.state {
            LifecycleState::Running => {
                self.state = LifecycleState::Stopped;
                log::info!("Main loop stopped after {} frames", self.frame_index);
                Ok(())
            }
            LifecycleState::Stopped => Ok(()),
            LifecycleState::Uninitialized | LifecycleState::Initialized | LifecycleState::Disposed => {
                Err(EngineError::invalid_state("stop", self.state))
            }
        }
    }

    /// Stop, detach events, shut the backend down and release the scene.
    ///
    /// Every later call on the manager, including another `dispose`, fails.
    pub fn dispose(&mut self) -> Result<()> {
        if self.state == LifecycleState::Disposed {
            return Err(EngineError::invalid_state("dispose", self.state));
        }
        if self.state == LifecycleState::Running {
            self.stop()?;
        }

        log::info!("Disposing scene...");
        if self.events_attached {
            self.events.detach();
            self.events_attached = false;
        }
        for capability in self.capabilities.iter_mut() {
            capability.on_dispose();
        }
        self.hooks.dispose();
        self.renderer.shutdown();
        self.scene.dispose();
        self.state = LifecycleState::Disposed;

        let live = self.factory.resources().borrow().live_count();
        if live > 0 {
            log::warn!("{live} resources still live after dispose");
        }
        log::info!("Engine shutdown complete");
        Ok(())
    }

    /// Produce one frame.
    ///
    /// Returns `Ok(false)` once the loop has stopped, either because the clock
    /// ran out of frames or because a hook requested a stop. A failing hook or
    /// backend stops the loop and the error is returned.
    pub fn tick(&mut self) -> Result<bool> {
        if self.state != LifecycleState::Running {
            return Err(EngineError::invalid_state("tick", self.state));
        }

        let Some(delta_time) = self.clock.next_frame() else {
            log::debug!("Frame clock exhausted");
            self.stop()?;
            return Ok(false);
        };

        if let Err(err) = self.frame(delta_time) {
            log::error!("Frame {} failed: {err}", self.frame_index);
            self.state = LifecycleState::Stopped;
            return Err(err);
        }
        self.frame_index += 1;

        if self.stop_requested {
            self.stop_requested = false;
            self.stop()?;
            return Ok(false);
        }
        Ok(true)
    }

    /// One frame. If an event handler fails, the events still pending from
    /// this poll are discarded.
    fn frame(&mut self, delta_time: f32) -> Result<()> {
        let events = self.events.poll()?;
        for (index, event) in events.iter().enumerate() {
            if let Err(err) = self.dispatch_event(event) {
                let discarded = events.len() - index - 1;
                if discarded > 0 {
                    log::warn!("Discarding {discarded} pending events after a failed event handler");
                }
                return Err(err);
            }
        }

        let mut ctx = SceneContext::new(
            &self.factory,
            &mut self.scene,
            &mut self.stop_requested,
            self.frame_index,
        );
        self.hooks.update(&mut ctx, delta_time)?;

        for capability in self.capabilities.iter_mut() {
            capability.on_update(&self.scene, delta_time);
        }

        let store = self.factory.resources().borrow();
        let view = FrameView {
            scene: &self.scene,
            resources: &store,
            frame_index: self.frame_index,
            delta_time,
        };
        self.renderer.render(&view)
    }

    fn dispatch_event(&mut self, event: &InputEvent) -> Result<()> {
        if let InputEvent::Resized { width, height } = *event {
            self.config.viewport.width = width;
            self.config.viewport.height = height;
            self.scene.camera_mut().set_aspect(self.config.viewport.aspect());
        }

        for capability in self.capabilities.iter_mut() {
            capability.on_event(&self.scene, &self.config.viewport, event);
        }

        let mut ctx = SceneContext::new(
            &self.factory,
            &mut self.scene,
            &mut self.stop_requested,
            self.frame_index,
        );
        self.hooks.handle_event(&mut ctx, event)
    }

    /// Start if needed, then tick until the loop stops
    pub fn run(&mut self) -> Result<()> {
        self.start()?;
        while self.tick()? {}
        Ok(())
    }

    /// Register a capability. One instance per type.
    ///
    /// A capability added after initialization is notified immediately.
    pub fn add_capability<C: Capability>(&mut self, capability: C) -> Result<()> {
        if self.state == LifecycleState::Disposed {
            return Err(EngineError::invalid_state("add capability", self.state));
        }
        let capability = self.capabilities.insert(capability)?;
        if self.state.is_live() {
            capability.on_initialized(&self.scene);
        }
        Ok(())
    }

    /// Registered capability of type `C`
    pub fn capability<C: Capability>(&self) -> Option<&C> {
        self.capabilities.get::<C>()
    }

    /// Registered capability of type `C`, mutably
    pub fn capability_mut<C: Capability>(&mut self) -> Option<&mut C> {
        self.capabilities.get_mut::<C>()
    }

    /// The scene
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// The scene, mutably
    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    /// Factory sharing the scene's resource store
    pub fn factory(&self) -> &ObjectFactory {
        &self.factory
    }

    /// The hooks
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Active configuration, including viewport changes from resize events
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Frames rendered so far
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}

impl<H: SceneHooks> Drop for LifecycleManager<H> {
    fn drop(&mut self) {
        if self.state != LifecycleState::Disposed {
            if let Err(err) = self.dispose() {
                log::warn!("Dispose on drop failed: {err}");
            }
        }
    }
}
