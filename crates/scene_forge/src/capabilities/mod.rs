//! Optional lifecycle extensions
//!
//! A [`Capability`] is attached to a [`LifecycleManager`](crate::lifecycle::LifecycleManager)
//! and observes it through three extension points: after initialization,
//! per input event, and per update. Capabilities only read the scene; they
//! cannot change lifecycle state.
//!
//! The set holds at most one capability per type and dispatches in a fixed
//! order by type, so the order capabilities were added in is not observable.

pub mod pointer;
pub mod statistics;

pub use pointer::{PointerEvent, PointerEventKind, PointerInteraction};
pub use statistics::{FrameStatistics, FrameStats};

use std::any::{Any, TypeId};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::config::ViewportConfig;
use crate::error::{EngineError, Result};
use crate::events::InputEvent;
use crate::scene::SceneGraph;

/// Extension attached to a lifecycle manager
pub trait Capability: Any {
    /// Short name used in errors and logs
    fn name(&self) -> &'static str;

    /// The scene has just been built
    fn on_initialized(&mut self, _scene: &SceneGraph) {}

    /// An input event arrived; runs before the scene hooks see it
    fn on_event(&mut self, _scene: &SceneGraph, _viewport: &ViewportConfig, _event: &InputEvent) {}

    /// The scene hooks have updated the scene for this frame
    fn on_update(&mut self, _scene: &SceneGraph, _delta_time: f32) {}

    /// The manager is being disposed
    fn on_dispose(&mut self) {}

    /// Upcast for downcasting by type
    fn as_any(&self) -> &dyn Any;

    /// Upcast for downcasting by type, mutably
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// At most one capability per type
#[derive(Default)]
pub struct CapabilitySet {
    entries: BTreeMap<TypeId, Box<dyn Capability>>,
}

impl CapabilitySet {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `capability`; fails if one of the same type is already present
    pub fn insert<C: Capability>(&mut self, capability: C) -> Result<&mut dyn Capability> {
        let name = capability.name();
        match self.entries.entry(TypeId::of::<C>()) {
            Entry::Occupied(_) => Err(EngineError::Capability {
                name,
                reason: "already added".to_string(),
            }),
            Entry::Vacant(slot) => {
                log::debug!("Capability '{name}' added");
                Ok(slot.insert(Box::new(capability)).as_mut())
            }
        }
    }

    /// Capability of type `C`
    pub fn get<C: Capability>(&self) -> Option<&C> {
        self.entries
            .get(&TypeId::of::<C>())
            .and_then(|c| c.as_any().downcast_ref::<C>())
    }

    /// Capability of type `C`, mutably
    pub fn get_mut<C: Capability>(&mut self) -> Option<&mut C> {
        self.entries
            .get_mut(&TypeId::of::<C>())
            .and_then(|c| c.as_any_mut().downcast_mut::<C>())
    }

    /// Capability of type `C`, or a capability error naming `name`
    pub fn require_mut<C: Capability>(&mut self, name: &'static str) -> Result<&mut C> {
        self.get_mut::<C>().ok_or_else(|| EngineError::Capability {
            name,
            reason: "capability not added".to_string(),
        })
    }

    /// Whether a capability of type `C` is present
    pub fn contains<C: Capability>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<C>())
    }

    /// Every capability in dispatch order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (dyn Capability + 'static)> {
        self.entries.values_mut().map(|c| c.as_mut())
    }

    /// Names in dispatch order
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.values().map(|c| c.name()).collect()
    }

    /// Number of capabilities
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no capability is present
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
