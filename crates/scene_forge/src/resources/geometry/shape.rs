//! Shape tags, descriptors and typed shape parameters

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::resources::params::{ParamReader, ParamValue, Params};

/// Upper bound on polyhedron subdivision
pub const MAX_DETAIL: u32 = 32;

/// Closed set of constructible shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeTag {
    /// Rectangular cuboid
    Box,
    /// UV sphere
    Sphere,
    /// Cone with its apex at +Y
    Cone,
    /// Cylinder or frustum
    Cylinder,
    /// Torus in the XY plane
    Torus,
    /// Flat rectangle facing +Z
    Plane,
    /// Flat annulus facing +Z
    Ring,
    /// Flat disc facing +Z
    Circle,
    /// Four-faced platonic solid
    Tetrahedron,
    /// Eight-faced platonic solid
    Octahedron,
    /// Twelve-faced platonic solid
    Dodecahedron,
    /// Twenty-faced platonic solid
    Icosahedron,
}

impl ShapeTag {
    /// Every shape tag
    pub const ALL: [ShapeTag; 12] = [
        ShapeTag::Box,
        ShapeTag::Sphere,
        ShapeTag::Cone,
        ShapeTag::Cylinder,
        ShapeTag::Torus,
        ShapeTag::Plane,
        ShapeTag::Ring,
        ShapeTag::Circle,
        ShapeTag::Tetrahedron,
        ShapeTag::Octahedron,
        ShapeTag::Dodecahedron,
        ShapeTag::Icosahedron,
    ];

    /// Tag name as used in descriptor files
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeTag::Box => "box",
            ShapeTag::Sphere => "sphere",
            ShapeTag::Cone => "cone",
            ShapeTag::Cylinder => "cylinder",
            ShapeTag::Torus => "torus",
            ShapeTag::Plane => "plane",
            ShapeTag::Ring => "ring",
            ShapeTag::Circle => "circle",
            ShapeTag::Tetrahedron => "tetrahedron",
            ShapeTag::Octahedron => "octahedron",
            ShapeTag::Dodecahedron => "dodecahedron",
            ShapeTag::Icosahedron => "icosahedron",
        }
    }
}

impl fmt::Display for ShapeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeTag {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| EngineError::config(s, "tag", "unknown shape tag"))
    }
}

/// Declarative request for a geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeDescriptor {
    /// Which shape to build
    pub tag: ShapeTag,
    /// Field overrides; anything missing takes its default
    #[serde(default)]
    pub params: Params,
}

impl ShapeDescriptor {
    /// Descriptor with all defaults
    pub fn new(tag: ShapeTag) -> Self {
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

/// Box dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxParams {
    /// Size along X
    pub width: f32,
    /// Size along Y
    pub height: f32,
    /// Size along Z
    pub depth: f32,
    /// Subdivisions along the width
    pub width_segments: u32,
    /// Subdivisions along the height
    pub height_segments: u32,
    /// Subdivisions along the depth
    pub depth_segments: u32,
}

/// Sphere dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereParams {
    /// Radius
    pub radius: f32,
    /// Subdivisions along the width
    pub width_segments: u32,
    /// Subdivisions along the height
    pub height_segments: u32,
}

/// Cylinder (and cone) dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderParams {
    /// Radius at +Y (0 for a cone)
    pub radius_top: f32,
    /// Radius at -Y
    pub radius_bottom: f32,
    /// Size along Y
    pub height: f32,
    /// Segments around the circumference
    pub radial_segments: u32,
    /// Subdivisions along the height
    pub height_segments: u32,
    /// Omit the end caps
    pub open_ended: bool,
}

/// Torus dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorusParams {
    /// Radius
    pub radius: f32,
    /// Tube radius
    pub tube: f32,
    /// Segments around the circumference
    pub radial_segments: u32,
    /// Segments around the tube sweep
    pub tubular_segments: u32,
}

/// Plane dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneParams {
    /// Size along X
    pub width: f32,
    /// Size along Y
    pub height: f32,
    /// Subdivisions along the width
    pub width_segments: u32,
    /// Subdivisions along the height
    pub height_segments: u32,
}

/// Flat annulus dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingParams {
    /// Inner radius
    pub inner_radius: f32,
    /// Outer radius
    pub outer_radius: f32,
    /// Segments around the ring
    pub theta_segments: u32,
    /// Concentric bands
    pub phi_segments: u32,
}

/// Flat disc dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleParams {
    /// Radius
    pub radius: f32,
    /// Rim segments
    pub segments: u32,
}

/// Platonic solid size and subdivision level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolyhedronParams {
    /// Radius
    pub radius: f32,
    /// Subdivision level (0 = base solid)
    pub detail: u32,
}

/// Fully resolved parameters of a constructed shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeParams {
    /// Rectangular cuboid
    Box(BoxParams),
    /// UV sphere
    Sphere(SphereParams),
    /// A cone is a cylinder with a zero top radius
    Cone(CylinderParams),
    /// Cylinder or frustum
    Cylinder(CylinderParams),
    /// Torus in the XY plane
    Torus(TorusParams),
    /// Flat rectangle facing +Z
    Plane(PlaneParams),
    /// Flat annulus facing +Z
    Ring(RingParams),
    /// Flat disc facing +Z
    Circle(CircleParams),
    /// Four-faced platonic solid
    Tetrahedron(PolyhedronParams),
    /// Eight-faced platonic solid
    Octahedron(PolyhedronParams),
    /// Twelve-faced platonic solid
    Dodecahedron(PolyhedronParams),
    /// Twenty-faced platonic solid
    Icosahedron(PolyhedronParams),
}

impl ShapeParams {
    /// Resolve `params` against the schema of `tag`
    pub fn resolve(tag: ShapeTag, params: &Params) -> Result<Self> {
        let mut r = ParamReader::new(tag.as_str(), params);
        let resolved = match tag {
            ShapeTag::Box => ShapeParams::Box(BoxParams {
                width: r.length("width", 1.0)?,
                height: r.length("height", 1.0)?,
                depth: r.length("depth", 1.0)?,
                width_segments: r.segments("width_segments", 1, 1)?,
                height_segments: r.segments("height_segments", 1, 1)?,
                depth_segments: r.segments("depth_segments", 1, 1)?,
            }),
            ShapeTag::Sphere => ShapeParams::Sphere(SphereParams {
                radius: r.length("radius", 1.0)?,
                width_segments: r.segments("width_segments", 32, 3)?,
                height_segments: r.segments("height_segments", 16, 2)?,
            }),
            ShapeTag::Cone => ShapeParams::Cone(CylinderParams {
                radius_top: 0.0,
                radius_bottom: r.length("radius", 1.0)?,
                height: r.length("height", 1.0)?,
                radial_segments: r.segments("radial_segments", 32, 3)?,
                height_segments: r.segments("height_segments", 1, 1)?,
                open_ended: r.flag("open_ended", false)?,
            }),
            ShapeTag::Cylinder => ShapeParams::Cylinder(CylinderParams {
                radius_top: r.length("radius_top", 1.0)?,
                radius_bottom: r.length("radius_bottom", 1.0)?,
                height: r.length("height", 1.0)?,
                radial_segments: r.segments("radial_segments", 32, 3)?,
                height_segments: r.segments("height_segments", 1, 1)?,
                open_ended: r.flag("open_ended", false)?,
            }),
            ShapeTag::Torus => ShapeParams::Torus(TorusParams {
                radius: r.length("radius", 1.0)?,
                tube: r.positive("tube", 0.4)?,
                radial_segments: r.segments("radial_segments", 12, 3)?,
                tubular_segments: r.segments("tubular_segments", 48, 3)?,
            }),
            ShapeTag::Plane => ShapeParams::Plane(PlaneParams {
                width: r.length("width", 1.0)?,
                height: r.length("height", 1.0)?,
                width_segments: r.segments("width_segments", 1, 1)?,
                height_segments: r.segments("height_segments", 1, 1)?,
            }),
            ShapeTag::Ring => {
                let inner_radius = r.length("inner_radius", 0.5)?;
                let outer_radius = r.positive("outer_radius", 1.0)?;
                if inner_radius >= outer_radius {
                    return Err(EngineError::config(
                        tag.as_str(),
                        "inner_radius",
                        "must be smaller than outer_radius",
                    ));
                }
                ShapeParams::Ring(RingParams {
                    inner_radius,
                    outer_radius,
                    theta_segments: r.segments("theta_segments", 32, 3)?,
                    phi_segments: r.segments("phi_segments", 1, 1)?,
                })
            }
            ShapeTag::Circle => ShapeParams::Circle(CircleParams {
                radius: r.length("radius", 1.0)?,
                segments: r.segments("segments", 32, 3)?,
            }),
            ShapeTag::Tetrahedron => ShapeParams::Tetrahedron(read_polyhedron(&mut r)?),
            ShapeTag::Octahedron => ShapeParams::Octahedron(read_polyhedron(&mut r)?),
            ShapeTag::Dodecahedron => ShapeParams::Dodecahedron(read_polyhedron(&mut r)?),
            ShapeTag::Icosahedron => ShapeParams::Icosahedron(read_polyhedron(&mut r)?),
        };
        r.finish()?;
        Ok(resolved)
    }

    /// The tag these parameters were resolved for
    pub fn tag(&self) -> ShapeTag {
        match self {
            ShapeParams::Box(_) => ShapeTag::Box,
            ShapeParams::Sphere(_) => ShapeTag::Sphere,
            ShapeParams::Cone(_) => ShapeTag::Cone,
            ShapeParams::Cylinder(_) => ShapeTag::Cylinder,
            ShapeParams::Torus(_) => ShapeTag::Torus,
            ShapeParams::Plane(_) => ShapeTag::Plane,
            ShapeParams::Ring(_) => ShapeTag::Ring,
            ShapeParams::Circle(_) => ShapeTag::Circle,
            ShapeParams::Tetrahedron(_) => ShapeTag::Tetrahedron,
            ShapeParams::Octahedron(_) => ShapeTag::Octahedron,
            ShapeParams::Dodecahedron(_) => ShapeTag::Dodecahedron,
            ShapeParams::Icosahedron(_) => ShapeTag::Icosahedron,
        }
    }
}

fn read_polyhedron(r: &mut ParamReader<'_>) -> Result<PolyhedronParams> {
    Ok(PolyhedronParams {
        radius: r.length("radius", 1.0)?,
        detail: r.count("detail", 0, 0, MAX_DETAIL)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tag_resolves_with_defaults() {
        for tag in ShapeTag::ALL {
            let resolved = ShapeParams::resolve(tag, &Params::new()).unwrap();
            assert_eq!(resolved.tag(), tag);
        }
    }

    #[test]
    fn test_tag_names_round_trip() {
        for tag in ShapeTag::ALL {
            assert_eq!(tag.as_str().parse::<ShapeTag>().unwrap(), tag);
        }
        let err = "hexagon".parse::<ShapeTag>().unwrap_err();
        assert!(matches!(err, EngineError::Config { ref tag, ref field, .. } if tag == "hexagon" && field == "tag"));
    }

    #[test]
    fn test_box_override() {
        let descriptor = ShapeDescriptor::new(ShapeTag::Box).with("width", 2.0);
        match ShapeParams::resolve(descriptor.tag, &descriptor.params).unwrap() {
            ShapeParams::Box(b) => {
                assert_eq!((b.width, b.height, b.depth), (2.0, 1.0, 1.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_sphere_minimum_segments() {
        let params = ShapeDescriptor::new(ShapeTag::Sphere).with("height_segments", 1).params;
        assert!(ShapeParams::resolve(ShapeTag::Sphere, &params).is_err());
    }

    #[test]
    fn test_segment_and_detail_caps() {
        let params = ShapeDescriptor::new(ShapeTag::Sphere)
            .with("width_segments", f64::from(u32::MAX))
            .with("height_segments", f64::from(u32::MAX))
            .params;
        let err = ShapeParams::resolve(ShapeTag::Sphere, &params).unwrap_err();
        assert!(matches!(err, EngineError::Config { ref tag, ref field, .. } if tag == "sphere" && field == "width_segments"));

        let params = ShapeDescriptor::new(ShapeTag::Icosahedron).with("detail", 4e9).params;
        let err = ShapeParams::resolve(ShapeTag::Icosahedron, &params).unwrap_err();
        assert!(matches!(err, EngineError::Config { ref tag, ref field, .. } if tag == "icosahedron" && field == "detail"));

        let params = ShapeDescriptor::new(ShapeTag::Icosahedron).with("detail", f64::from(MAX_DETAIL)).params;
        assert!(ShapeParams::resolve(ShapeTag::Icosahedron, &params).is_ok());
    }

    #[test]
    fn test_cone_rejects_cylinder_fields() {
        let params = ShapeDescriptor::new(ShapeTag::Cone).with("radius_top", 1.0).params;
        let err = ShapeParams::resolve(ShapeTag::Cone, &params).unwrap_err();
        assert!(matches!(err, EngineError::Config { ref field, .. } if field == "radius_top"));
    }

    #[test]
    fn test_ring_inner_must_be_smaller() {
        let params = ShapeDescriptor::new(ShapeTag::Ring).with("inner_radius", 2.0).params;
        assert!(ShapeParams::resolve(ShapeTag::Ring, &params).is_err());
    }

    #[test]
    fn test_descriptor_from_ron() {
        let descriptor: ShapeDescriptor =
            ron::from_str("(tag: torus, params: {\"tube\": 0.25})").unwrap();
        assert_eq!(descriptor.tag, ShapeTag::Torus);
        assert_eq!(descriptor.params["tube"], ParamValue::Number(0.25));
    }
}
