//! Configuration system
//!
//! Serializable settings for the engine, plus the [`Config`] trait used to
//! load them (and scene description files) from TOML or RON.

pub use serde::{Serialize, Deserialize};

use crate::error::{EngineError, Result};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> std::result::Result<Self, ConfigFileError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigFileError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            Self::from_toml_str(&contents)
        } else if path.ends_with(".ron") {
            Self::from_ron_str(&contents)
        } else {
            Err(ConfigFileError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> std::result::Result<(), ConfigFileError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigFileError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigFileError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigFileError::Io)
    }

    /// Parse from a TOML document
    fn from_toml_str(contents: &str) -> std::result::Result<Self, ConfigFileError> {
        toml::from_str(contents).map_err(|e| ConfigFileError::Parse(e.to_string()))
    }

    /// Parse from a RON document
    fn from_ron_str(contents: &str) -> std::result::Result<Self, ConfigFileError> {
        ron::from_str(contents).map_err(|e| ConfigFileError::Parse(e.to_string()))
    }
}

/// Configuration file errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigFileError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Viewport size used for the camera aspect ratio and pointer NDC conversion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl ViewportConfig {
    /// Width / height
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Perspective camera settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Camera position in world space
    pub position: [f32; 3],
    /// Look-at target in world space
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, 0.0, 5.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

/// # Engine Configuration
///
/// Core engine behavior: logging, frame pacing, statistics sampling, and the
/// initial camera/viewport the scene is built with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log filter passed to `env_logger` (e.g. `info`, `scene_forge=debug`)
    pub log_level: String,
    /// Target FPS for the wall-clock frame clock
    pub target_fps: u32,
    /// Stop after this many frames (`None` runs until stopped)
    pub max_frames: Option<u64>,
    /// Seconds between frame statistics samples
    pub statistics_interval: f32,
    /// Viewport size
    pub viewport: ViewportConfig,
    /// Camera settings
    pub camera: CameraConfig,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            target_fps: 60,
            max_frames: None,
            statistics_interval: 1.0,
            viewport: ViewportConfig::default(),
            camera: CameraConfig::default(),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set target FPS
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    /// Limit the number of frames the loop runs
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Set viewport size
    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = ViewportConfig { width, height };
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.target_fps == 0 {
            return Err(EngineError::config("engine", "target_fps", "must be at least 1"));
        }
        if !(self.statistics_interval.is_finite() && self.statistics_interval > 0.0) {
            return Err(EngineError::config("engine", "statistics_interval", "must be a positive number of seconds"));
        }
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(EngineError::config("engine", "viewport", "width and height must be non-zero"));
        }
        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(EngineError::config("camera", "fov_degrees", "must be between 0 and 180"));
        }
        if !(camera.near > 0.0 && camera.far > camera.near) {
            return Err(EngineError::config("camera", "far", "near must be positive and far must exceed near"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for EngineConfig {}
