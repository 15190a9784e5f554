//! Engine-level error type
//!
//! Every fallible operation in the crate returns [`Result`]. Nothing here is
//! retried automatically: errors propagate synchronously to the caller of the
//! failing operation.

use crate::config::ConfigFileError;
use crate::lifecycle::LifecycleState;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, EngineError>;

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Unknown tag or invalid parameter at construction time
    #[error("invalid configuration for '{tag}' field '{field}': {reason}")]
    Config {
        /// Tag being constructed (shape, material, or `transform`)
        tag: String,
        /// Offending field (`tag` when the tag itself is unknown)
        field: String,
        /// Human readable reason
        reason: String,
    },

    /// Lifecycle method invoked in an illegal state
    #[error("cannot {attempted} while {current:?}")]
    InvalidState {
        /// Operation that was attempted
        attempted: &'static str,
        /// State the manager (or graph) was in
        current: LifecycleState,
    },

    /// `add()` called with an id already present in the graph
    #[error("drawable id '{id}' is already in use")]
    DuplicateId {
        /// The conflicting id
        id: String,
    },

    /// Release of a handle that was already released
    #[error("resource {handle} was already released")]
    Resource {
        /// Debug representation of the handle
        handle: String,
    },

    /// Capability accessor used without the capability, or added twice
    #[error("capability '{name}': {reason}")]
    Capability {
        /// Capability name
        name: &'static str,
        /// What went wrong
        reason: String,
    },

    /// A scene hook failed
    #[error("scene hook failed: {0}")]
    Hook(String),

    /// Render backend or event source failure
    #[error("backend error: {0}")]
    Backend(String),

    /// Config or scene file could not be read or parsed
    #[error(transparent)]
    ConfigFile(#[from] ConfigFileError),
}

impl EngineError {
    /// Shorthand for a [`EngineError::Config`] error
    pub fn config(tag: impl Into<String>, field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Config {
            tag: tag.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`EngineError::InvalidState`] error
    pub fn invalid_state(attempted: &'static str, current: LifecycleState) -> Self {
        Self::InvalidState { attempted, current }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = EngineError::config("box", "width_segments", "must be a whole number >= 1");
        let display = err.to_string();
        assert!(display.contains("box"));
        assert!(display.contains("width_segments"));
    }

    #[test]
    fn test_invalid_state_display() {
        let err = EngineError::invalid_state("start", LifecycleState::Uninitialized);
        assert_eq!(err.to_string(), "cannot start while Uninitialized");
    }

    #[test]
    fn test_config_file_error_converts() {
        let err: EngineError = ConfigFileError::UnsupportedFormat("scene.xml".to_string()).into();
        assert!(matches!(err, EngineError::ConfigFile(_)));
        assert!(err.to_string().contains("scene.xml"));
    }
}
