//! Scene lights
//!
//! Lights are plain data owned by the scene graph. Colors are `0xRRGGBB` so
//! they read the same way in scene files as material colors do.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{utils::hex_to_rgb, Vec3};

fn white() -> u32 {
    0xffffff
}

fn one() -> f32 {
    1.0
}

/// A light source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Light {
    /// Uniform light from every direction
    Ambient {
        /// Light color
        #[serde(default = "white")]
        color: u32,
        /// Intensity multiplier
        #[serde(default = "one")]
        intensity: f32,
    },
    /// Parallel rays, like sunlight
    Directional {
        /// Light color
        #[serde(default = "white")]
        color: u32,
        /// Intensity multiplier
        #[serde(default = "one")]
        intensity: f32,
        /// Direction the light travels in, world space
        direction: [f32; 3],
    },
    /// Radiates from a point
    Point {
        /// Light color
        #[serde(default = "white")]
        color: u32,
        /// Intensity multiplier
        #[serde(default = "one")]
        intensity: f32,
        /// World-space position
        position: [f32; 3],
        /// Cutoff distance (0 = unlimited)
        #[serde(default)]
        range: f32,
    },
    /// Sky/ground gradient
    Hemisphere {
        /// Color from above
        #[serde(default = "white")]
        sky_color: u32,
        /// Color from below
        #[serde(default)]
        ground_color: u32,
        /// Intensity multiplier
        #[serde(default = "one")]
        intensity: f32,
    },
}

impl Light {
    /// Ambient light
    pub fn ambient(color: u32, intensity: f32) -> Self {
        Light::Ambient { color, intensity }
    }

    /// Directional light travelling along `direction`
    pub fn directional(color: u32, intensity: f32, direction: Vec3) -> Self {
        Light::Directional {
            color,
            intensity,
            direction: direction.normalize().into(),
        }
    }

    /// Unlimited-range point light
    pub fn point(color: u32, intensity: f32, position: Vec3) -> Self {
        Light::Point {
            color,
            intensity,
            position: position.into(),
            range: 0.0,
        }
    }

    /// Hemisphere light
    pub fn hemisphere(sky_color: u32, ground_color: u32, intensity: f32) -> Self {
        Light::Hemisphere {
            sky_color,
            ground_color,
            intensity,
        }
    }

    /// Intensity multiplier
    pub fn intensity(&self) -> f32 {
        match self {
            Light::Ambient { intensity, .. }
            | Light::Directional { intensity, .. }
            | Light::Point { intensity, .. }
            | Light::Hemisphere { intensity, .. } => *intensity,
        }
    }

    /// Primary color as RGB
    pub fn color_rgb(&self) -> Vec3 {
        match self {
            Light::Ambient { color, .. } | Light::Directional { color, .. } | Light::Point { color, .. } => {
                hex_to_rgb(*color)
            }
            Light::Hemisphere { sky_color, .. } => hex_to_rgb(*sky_color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directional_is_normalized() {
        match Light::directional(0xffffff, 1.0, Vec3::new(0.0, -4.0, 0.0)) {
            Light::Directional { direction, .. } => assert_eq!(direction, [0.0, -1.0, 0.0]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_ron_defaults() {
        let lights: Vec<Light> = ron::from_str(
            "[ambient(intensity: 0.3), point(position: (0.0, 3.0, 0.0)), hemisphere(intensity: 1.0)]",
        )
        .unwrap();
        assert_eq!(lights[0], Light::ambient(0xffffff, 0.3));
        assert_eq!(lights[1], Light::point(0xffffff, 1.0, Vec3::new(0.0, 3.0, 0.0)));
        assert_eq!(lights[2].color_rgb(), Vec3::new(1.0, 1.0, 1.0));
    }
}
