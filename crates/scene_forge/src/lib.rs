//! # Scene Forge
//!
//! Descriptor-driven 3D scene construction with a managed lifecycle.
//!
//! ## Features
//!
//! - **Closed descriptor schema**: shapes and materials are picked by tag and
//!   validated against documented defaults
//! - **Leak-free construction**: partially built objects are rolled back
//! - **Owned scene graph**: every drawable is released exactly once
//! - **Lifecycle state machine**: initialize / start / stop / dispose with
//!   injected render backend, event source and frame clock
//! - **Capabilities**: pointer picking and frame statistics as opt-in extensions
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_forge::prelude::*;
//!
//! struct Spinner;
//!
//! impl SceneHooks for Spinner {
//!     fn build_scene(&mut self, ctx: &mut SceneContext<'_>) -> Result<()> {
//!         let cube = ObjectDescriptor::new(
//!             ShapeDescriptor::new(ShapeTag::Box).with("width", 2.0),
//!             MaterialDescriptor::new(MaterialTag::Unlit).with("color", 0xff0000),
//!         )
//!         .with_name("RedBox");
//!         ctx.spawn(&cube, Some("cube"))?;
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, ctx: &mut SceneContext<'_>, delta_time: f32) -> Result<()> {
//!         for (_, drawable) in ctx.scene.iter_mut() {
//!             drawable.transform.rotate_euler_xyz(Vec3::new(0.0, delta_time, 0.0));
//!         }
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     let config = EngineConfig::default().with_max_frames(10);
//!     let mut manager = LifecycleManager::new(Spinner, config)?;
//!     manager.initialize()?;
//!     manager.run()?;
//!     manager.dispose()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod capabilities;
pub mod config;
pub mod error;
pub mod events;
pub mod foundation;
pub mod lifecycle;
pub mod render;
pub mod resources;
pub mod scene;

#[cfg(test)]
mod tests;

pub use config::{Config, EngineConfig};
pub use error::{EngineError, Result};
pub use lifecycle::{LifecycleManager, LifecycleState, SceneContext, SceneHooks};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        capabilities::{
            Capability, FrameStatistics, FrameStats, PointerEvent, PointerEventKind, PointerInteraction,
        },
        config::{CameraConfig, Config, EngineConfig, ViewportConfig},
        error::{EngineError, Result},
        events::{EventQueue, EventSource, InputEvent, PointerButton, QueuedEventSource},
        foundation::{
            math::{Aabb, Mat4, Ray, Transform, Vec2, Vec3},
            time::{FixedStepClock, FrameClock, SystemClock},
        },
        lifecycle::{LifecycleManager, LifecycleState, SceneContext, SceneHooks},
        render::{FrameRecord, FrameView, HeadlessRenderer, RenderBackend},
        resources::{MaterialDescriptor, MaterialTag, ParamValue, Params, ShapeDescriptor, ShapeTag},
        scene::{
            Camera, DrawFlags, Drawable, DrawableId, Light, ObjectDescriptor, ObjectFactory, SceneDescription,
            SceneGraph, TransformDescriptor,
        },
    };
}
