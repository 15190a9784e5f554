//! Material parameter types for each material tag

use crate::foundation::math::Vec3;

/// Options every material shares
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceOptions {
    /// Alpha in [0, 1]
    pub opacity: f32,
    /// Blend with what is behind the surface
    pub transparent: bool,
    /// Draw triangle edges instead of filled faces
    pub wireframe: bool,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            transparent: false,
            wireframe: false,
        }
    }
}

/// Flat color, no lighting
#[derive(Debug, Clone, PartialEq)]
pub struct UnlitParams {
    /// Material color
    pub color: Vec3,
}

/// Lambertian shading
#[derive(Debug, Clone, PartialEq)]
pub struct DiffuseParams {
    /// Diffuse color
    pub color: Vec3,
    /// Self-illumination color
    pub emissive: Vec3,
}

/// Blinn-Phong shading
#[derive(Debug, Clone, PartialEq)]
pub struct SpecularParams {
    /// Diffuse color
    pub color: Vec3,
    /// Highlight color
    pub specular: Vec3,
    /// Highlight exponent
    pub shininess: f32,
    /// Self-illumination color
    pub emissive: Vec3,
}

/// Metallic/roughness PBR
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalParams {
    /// Base color (albedo)
    pub color: Vec3,
    /// Roughness factor (0.0 = mirror, 1.0 = completely rough)
    pub roughness: f32,
    /// Metallic factor (0.0 = dielectric, 1.0 = metallic)
    pub metalness: f32,
    /// Self-illumination color
    pub emissive: Vec3,
}

/// Cel shading with a stepped light ramp
#[derive(Debug, Clone, PartialEq)]
pub struct ToonParams {
    /// Base color
    pub color: Vec3,
    /// Number of discrete light bands
    pub gradient_steps: u32,
}

/// Colors surfaces by their normal
#[derive(Debug, Clone, PartialEq)]
pub struct DebugNormalParams {
    /// Use face normals instead of interpolated ones
    pub flat_shading: bool,
}

/// Colors surfaces by view depth
#[derive(Debug, Clone, PartialEq)]
pub struct DebugDepthParams {
    /// Depth mapped to white
    pub near: f32,
    /// Depth mapped to black
    pub far: f32,
}

/// Edge-only rendering
#[derive(Debug, Clone, PartialEq)]
pub struct WireframeParams {
    /// Line color
    pub color: Vec3,
    /// Line width in pixels
    pub line_width: f32,
}
