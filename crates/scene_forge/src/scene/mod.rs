//! Scene management
//!
//! Drawables, the factory that builds them, and the graph that owns them.

pub mod camera;
pub mod description;
pub mod drawable;
pub mod lighting;
pub mod object_factory;
pub mod scene_graph;

pub use camera::Camera;
pub use description::{SceneDescription, SceneObject};
pub use drawable::{DrawFlags, Drawable, DrawableId};
pub use lighting::Light;
pub use object_factory::{AxesDescriptor, ObjectDescriptor, ObjectFactory, TransformDescriptor};
pub use scene_graph::{PickHit, SceneGraph};
