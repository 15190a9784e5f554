//! Material tags, descriptors and the resolved material type

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::material_params::{
    DebugDepthParams, DebugNormalParams, DiffuseParams, PhysicalParams, SpecularParams,
    SurfaceOptions, ToonParams, UnlitParams, WireframeParams,
};
use crate::error::{EngineError, Result};
use crate::foundation::math::utils::hex_to_rgb;
use crate::resources::params::{ParamReader, ParamValue, Params};

/// Closed set of constructible materials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialTag {
    /// Flat color, ignores lights
    Unlit,
    /// Lambert shading
    Diffuse,
    /// Blinn-Phong shading
    Specular,
    /// Metallic/roughness PBR
    Physical,
    /// Cel shading
    Toon,
    /// Normal visualisation
    DebugNormal,
    /// Depth visualisation
    DebugDepth,
    /// Edges only
    Wireframe,
}

impl MaterialTag {
    /// Every material tag
    pub const ALL: [MaterialTag; 8] = [
        MaterialTag::Unlit,
        MaterialTag::Diffuse,
        MaterialTag::Specular,
        MaterialTag::Physical,
        MaterialTag::Toon,
        MaterialTag::DebugNormal,
        MaterialTag::DebugDepth,
        MaterialTag::Wireframe,
    ];

    /// Tag name as used in descriptor files
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialTag::Unlit => "unlit",
            MaterialTag::Diffuse => "diffuse",
            MaterialTag::Specular => "specular",
            MaterialTag::Physical => "physical",
            MaterialTag::Toon => "toon",
            MaterialTag::DebugNormal => "debug_normal",
            MaterialTag::DebugDepth => "debug_depth",
            MaterialTag::Wireframe => "wireframe",
        }
    }

    /// Whether lights in the scene affect this material
    pub fn is_lit(&self) -> bool {
        matches!(
            self,
            MaterialTag::Diffuse | MaterialTag::Specular | MaterialTag::Physical | MaterialTag::Toon
        )
    }
}

impl fmt::Display for MaterialTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaterialTag {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| EngineError::config(s, "tag", "unknown material tag"))
    }
}

/// Declarative request for a material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDescriptor {
    /// Which material to build
    pub tag: MaterialTag,
    /// Field overrides; anything missing takes its default
    #[serde(default)]
    pub params: Params,
}

impl MaterialDescriptor {
    /// Descriptor with all defaults
    pub fn new(tag: MaterialTag) -> Self {
        Self {
            tag,
            params: Params::new(),
        }
    }

    /// Set one parameter
    pub fn with(mut self, field: &str, value: impl Into<ParamValue>) -> Self {
        self.params.insert(field.to_string(), value.into());
        self
    }
}

/// Tag-specific material parameters
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialKind {
    /// See [`UnlitParams`]
    Unlit(UnlitParams),
    /// See [`DiffuseParams`]
    Diffuse(DiffuseParams),
    /// See [`SpecularParams`]
    Specular(SpecularParams),
    /// See [`PhysicalParams`]
    Physical(PhysicalParams),
    /// See [`ToonParams`]
    Toon(ToonParams),
    /// See [`DebugNormalParams`]
    DebugNormal(DebugNormalParams),
    /// See [`DebugDepthParams`]
    DebugDepth(DebugDepthParams),
    /// See [`WireframeParams`]
    Wireframe(WireframeParams),
}

/// A constructed material
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Tag-specific parameters
    pub kind: MaterialKind,
    /// Opacity and fill options
    pub surface: SurfaceOptions,
}

impl Material {
    /// Resolve `params` against the schema of `tag`
    pub fn resolve(tag: MaterialTag, params: &Params) -> Result<Self> {
        let mut r = ParamReader::new(tag.as_str(), params);

        let kind = match tag {
            MaterialTag::Unlit => MaterialKind::Unlit(UnlitParams {
                color: rgb(&mut r, "color", 0xffffff)?,
            }),
            MaterialTag::Diffuse => MaterialKind::Diffuse(DiffuseParams {
                color: rgb(&mut r, "color", 0xffffff)?,
                emissive: rgb(&mut r, "emissive", 0x000000)?,
            }),
            MaterialTag::Specular => MaterialKind::Specular(SpecularParams {
                color: rgb(&mut r, "color", 0xffffff)?,
                specular: rgb(&mut r, "specular", 0x111111)?,
                shininess: r.at_least("shininess", 30.0, 0.0)?,
                emissive: rgb(&mut r, "emissive", 0x000000)?,
            }),
            MaterialTag::Physical => MaterialKind::Physical(PhysicalParams {
                color: rgb(&mut r, "color", 0xffffff)?,
                roughness: r.unit_interval("roughness", 1.0)?,
                metalness: r.unit_interval("metalness", 0.0)?,
                emissive: rgb(&mut r, "emissive", 0x000000)?,
            }),
            MaterialTag::Toon => MaterialKind::Toon(ToonParams {
                color: rgb(&mut r, "color", 0xffffff)?,
                gradient_steps: r.segments("gradient_steps", 3, 2)?,
            }),
            MaterialTag::DebugNormal => MaterialKind::DebugNormal(DebugNormalParams {
                flat_shading: r.flag("flat_shading", false)?,
            }),
            MaterialTag::DebugDepth => {
                let near = r.positive("near", 0.1)?;
                let far = r.positive("far", 100.0)?;
                if far <= near {
                    return Err(EngineError::config(tag.as_str(), "far", "must be greater than near"));
                }
                MaterialKind::DebugDepth(DebugDepthParams { near, far })
            }
            MaterialTag::Wireframe => MaterialKind::Wireframe(WireframeParams {
                color: rgb(&mut r, "color", 0xffffff)?,
                line_width: r.positive("line_width", 1.0)?,
            }),
        };

        let surface = SurfaceOptions {
            opacity: r.unit_interval("opacity", 1.0)?,
            transparent: r.flag("transparent", false)?,
            wireframe: if tag == MaterialTag::Wireframe {
                true
            } else {
                r.flag("wireframe", false)?
            },
        };

        r.finish()?;
        Ok(Self { kind, surface })
    }

    /// The tag this material was built from
    pub fn tag(&self) -> MaterialTag {
        match self.kind {
            MaterialKind::Unlit(_) => MaterialTag::Unlit,
            MaterialKind::Diffuse(_) => MaterialTag::Diffuse,
            MaterialKind::Specular(_) => MaterialTag::Specular,
            MaterialKind::Physical(_) => MaterialTag::Physical,
            MaterialKind::Toon(_) => MaterialTag::Toon,
            MaterialKind::DebugNormal(_) => MaterialTag::DebugNormal,
            MaterialKind::DebugDepth(_) => MaterialTag::DebugDepth,
            MaterialKind::Wireframe(_) => MaterialTag::Wireframe,
        }
    }
}

fn rgb(r: &mut ParamReader<'_>, field: &'static str, default: u32) -> Result<crate::foundation::math::Vec3> {
    r.color(field, default).map(hex_to_rgb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_every_tag_resolves_with_defaults() {
        for tag in MaterialTag::ALL {
            let material = Material::resolve(tag, &Params::new()).unwrap();
            assert_eq!(material.tag(), tag);
            assert_eq!(material.surface.opacity, 1.0);
        }
    }

    #[test]
    fn test_unlit_red() {
        let descriptor = MaterialDescriptor::new(MaterialTag::Unlit).with("color", 0xff0000);
        let material = Material::resolve(descriptor.tag, &descriptor.params).unwrap();
        assert_eq!(material.kind, MaterialKind::Unlit(UnlitParams { color: Vec3::new(1.0, 0.0, 0.0) }));
    }

    #[test]
    fn test_physical_range_checked() {
        let params = MaterialDescriptor::new(MaterialTag::Physical).with("roughness", 1.5).params;
        let err = Material::resolve(MaterialTag::Physical, &params).unwrap_err();
        assert!(matches!(err, EngineError::Config { ref tag, ref field, .. } if tag == "physical" && field == "roughness"));
    }

    #[test]
    fn test_wireframe_tag_rejects_wireframe_flag() {
        let params = MaterialDescriptor::new(MaterialTag::Wireframe).with("wireframe", false).params;
        assert!(Material::resolve(MaterialTag::Wireframe, &params).is_err());

        let material = Material::resolve(MaterialTag::Wireframe, &Params::new()).unwrap();
        assert!(material.surface.wireframe);
    }

    #[test]
    fn test_debug_depth_far_after_near() {
        let params = MaterialDescriptor::new(MaterialTag::DebugDepth)
            .with("near", 10.0)
            .with("far", 5.0)
            .params;
        assert!(Material::resolve(MaterialTag::DebugDepth, &params).is_err());
    }

    #[test]
    fn test_toon_steps_must_be_whole() {
        let params = MaterialDescriptor::new(MaterialTag::Toon).with("gradient_steps", 2.5).params;
        assert!(Material::resolve(MaterialTag::Toon, &params).is_err());
    }

    #[test]
    fn test_unknown_tag_name() {
        assert!("metal".parse::<MaterialTag>().is_err());
        assert_eq!("debug_normal".parse::<MaterialTag>().unwrap(), MaterialTag::DebugNormal);
    }
}
