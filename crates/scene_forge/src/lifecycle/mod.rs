//! Scene lifecycle
//!
//! ```text
//! Uninitialized --initialize--> Initialized --start--> Running
//!                                    Running --stop--> Stopped --start--> Running
//!                       (any state) --dispose--> Disposed (terminal)
//! ```

pub mod hooks;
pub mod manager;

pub use hooks::{SceneContext, SceneHooks};
pub use manager::{LifecycleManager, ManagerBuilder};

/// State of a [`LifecycleManager`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Constructed, scene not built yet
    Uninitialized,
    /// Scene built, loop not running
    Initialized,
    /// Frames are being produced
    Running,
    /// Loop halted; can be restarted
    Stopped,
    /// Everything released; no further calls are accepted
    Disposed,
}

impl LifecycleState {
    /// Whether the scene has been built and not yet disposed
    pub fn is_live(&self) -> bool {
        matches!(
            self,
            LifecycleState::Initialized | LifecycleState::Running | LifecycleState::Stopped
        )
    }
}
