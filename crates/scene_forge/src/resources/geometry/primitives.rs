//! Mesh generators for the parametric shapes
//!
//! Conventions: right-handed, Y up, flat shapes face +Z. Vertex layout and
//! triangle order follow the usual three.js generators so meshes match what
//! scene authors expect from those tools.

use std::f32::consts::{PI, TAU};

use super::mesh::{MeshData, Vertex};
use super::shape::{BoxParams, CircleParams, CylinderParams, PlaneParams, RingParams, SphereParams, TorusParams};
use crate::foundation::math::Vec3;

/// Axis-aligned cuboid centered at the origin, one grid per face
pub fn build_box(p: &BoxParams) -> MeshData {
    let mut mesh = MeshData::default();

    // (u axis, v axis, w axis, u direction, v direction, face size, grid)
    let mut face = |u: usize, v: usize, w: usize, udir: f32, vdir: f32, size: (f32, f32, f32), grid: (u32, u32)| {
        let (width, height, depth) = size;
        let (grid_x, grid_y) = grid;
        let segment_width = width / grid_x as f32;
        let segment_height = height / grid_y as f32;
        let offset = mesh.vertices.len() as u32;

        for iy in 0..=grid_y {
            let y = iy as f32 * segment_height - height / 2.0;
            for ix in 0..=grid_x {
                let x = ix as f32 * segment_width - width / 2.0;

                let mut position = [0.0f32; 3];
                position[u] = x * udir;
                position[v] = y * vdir;
                position[w] = depth / 2.0;

                let mut normal = [0.0f32; 3];
                normal[w] = if depth > 0.0 { 1.0 } else { -1.0 };

                let uv = [ix as f32 / grid_x as f32, 1.0 - iy as f32 / grid_y as f32];
                mesh.vertices.push(Vertex::new(position, normal, uv));
            }
        }

        let row = grid_x + 1;
        for iy in 0..grid_y {
            for ix in 0..grid_x {
                let a = offset + ix + row * iy;
                let b = offset + ix + row * (iy + 1);
                let c = offset + (ix + 1) + row * (iy + 1);
                let d = offset + (ix + 1) + row * iy;
                mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }
    };

    let (w, h, d) = (p.width, p.height, p.depth);
    // px, nx
    face(2, 1, 0, -1.0, -1.0, (d, h, w), (p.depth_segments, p.height_segments));
    face(2, 1, 0, 1.0, -1.0, (d, h, -w), (p.depth_segments, p.height_segments));
    // py, ny
    face(0, 2, 1, 1.0, 1.0, (w, d, h), (p.width_segments, p.depth_segments));
    face(0, 2, 1, 1.0, -1.0, (w, d, -h), (p.width_segments, p.depth_segments));
    // pz, nz
    face(0, 1, 2, 1.0, -1.0, (w, h, d), (p.width_segments, p.height_segments));
    face(0, 1, 2, -1.0, -1.0, (w, h, -d), (p.width_segments, p.height_segments));

    mesh
}

/// UV sphere; the pole rows emit a single triangle per segment
pub fn build_sphere(p: &SphereParams) -> MeshData {
    let mut mesh = MeshData::default();
    let (ws, hs) = (p.width_segments, p.height_segments);

    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        let phi = v * PI;
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let theta = u * TAU;
            let normal = [-phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin()];
            let position = normal.map(|n| n * p.radius);
            mesh.vertices.push(Vertex::new(position, normal, [u, 1.0 - v]));
        }
    }

    for iy in 0..hs {
        for ix in 0..ws {
            let a = iy * (ws + 1) + ix + 1;
            let b = iy * (ws + 1) + ix;
            let c = (iy + 1) * (ws + 1) + ix;
            let d = (iy + 1) * (ws + 1) + ix + 1;
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != hs - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    mesh
}

/// Cylinder or frustum along Y; a zero top radius yields a cone
pub fn build_cylinder(p: &CylinderParams) -> MeshData {
    let mut mesh = MeshData::default();
    let (rs, hs) = (p.radial_segments, p.height_segments);
    let half_height = p.height / 2.0;
    let slope = if p.height > 0.0 { (p.radius_bottom - p.radius_top) / p.height } else { 0.0 };

    for y in 0..=hs {
        let v = y as f32 / hs as f32;
        let radius = v * (p.radius_bottom - p.radius_top) + p.radius_top;
        for x in 0..=rs {
            let u = x as f32 / rs as f32;
            let theta = u * TAU;
            let (sin, cos) = theta.sin_cos();
            let normal = Vec3::new(sin, slope, cos).normalize();
            mesh.vertices.push(Vertex::new(
                [radius * sin, -v * p.height + half_height, radius * cos],
                normal.into(),
                [u, 1.0 - v],
            ));
        }
    }

    for y in 0..hs {
        for x in 0..rs {
            let a = y * (rs + 1) + x;
            let b = (y + 1) * (rs + 1) + x;
            let c = (y + 1) * (rs + 1) + x + 1;
            let d = y * (rs + 1) + x + 1;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    if !p.open_ended {
        if p.radius_top > 0.0 {
            cylinder_cap(&mut mesh, p.radius_top, half_height, rs);
        }
        if p.radius_bottom > 0.0 {
            cylinder_cap(&mut mesh, p.radius_bottom, -half_height, rs);
        }
    }

    mesh
}

fn cylinder_cap(mesh: &mut MeshData, radius: f32, y: f32, segments: u32) {
    let sign = y.signum();
    let center = mesh.vertices.len() as u32;
    mesh.vertices.push(Vertex::new([0.0, y, 0.0], [0.0, sign, 0.0], [0.5, 0.5]));

    for x in 0..=segments {
        let theta = x as f32 / segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        mesh.vertices.push(Vertex::new(
            [radius * sin, y, radius * cos],
            [0.0, sign, 0.0],
            [0.5 + 0.5 * cos, 0.5 + 0.5 * sin * sign],
        ));
    }

    for x in 0..segments {
        let i = center + 1 + x;
        if sign > 0.0 {
            mesh.indices.extend_from_slice(&[i, i + 1, center]);
        } else {
            mesh.indices.extend_from_slice(&[i + 1, i, center]);
        }
    }
}

/// Torus around the Z axis
pub fn build_torus(p: &TorusParams) -> MeshData {
    let mut mesh = MeshData::default();
    let (rs, ts) = (p.radial_segments, p.tubular_segments);

    for j in 0..=rs {
        let v = j as f32 / rs as f32 * TAU;
        for i in 0..=ts {
            let u = i as f32 / ts as f32 * TAU;
            let ring = p.radius + p.tube * v.cos();
            let position = [ring * u.cos(), ring * u.sin(), p.tube * v.sin()];
            let normal = [v.cos() * u.cos(), v.cos() * u.sin(), v.sin()];
            mesh.vertices.push(Vertex::new(position, normal, [i as f32 / ts as f32, j as f32 / rs as f32]));
        }
    }

    for j in 1..=rs {
        for i in 1..=ts {
            let a = (ts + 1) * j + i - 1;
            let b = (ts + 1) * (j - 1) + i - 1;
            let c = (ts + 1) * (j - 1) + i;
            let d = (ts + 1) * j + i;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    mesh
}

/// Rectangle in the XY plane facing +Z
pub fn build_plane(p: &PlaneParams) -> MeshData {
    let mut mesh = MeshData::default();
    let (gx, gy) = (p.width_segments, p.height_segments);
    let segment_width = p.width / gx as f32;
    let segment_height = p.height / gy as f32;

    for iy in 0..=gy {
        let y = iy as f32 * segment_height - p.height / 2.0;
        for ix in 0..=gx {
            let x = ix as f32 * segment_width - p.width / 2.0;
            mesh.vertices.push(Vertex::new(
                [x, -y, 0.0],
                [0.0, 0.0, 1.0],
                [ix as f32 / gx as f32, 1.0 - iy as f32 / gy as f32],
            ));
        }
    }

    for iy in 0..gy {
        for ix in 0..gx {
            let a = ix + (gx + 1) * iy;
            let b = ix + (gx + 1) * (iy + 1);
            let c = (ix + 1) + (gx + 1) * (iy + 1);
            let d = (ix + 1) + (gx + 1) * iy;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    mesh
}

/// Flat annulus in the XY plane facing +Z
pub fn build_ring(p: &RingParams) -> MeshData {
    let mut mesh = MeshData::default();
    let (ts, ps) = (p.theta_segments, p.phi_segments);
    let step = (p.outer_radius - p.inner_radius) / ps as f32;

    for j in 0..=ps {
        let radius = p.inner_radius + j as f32 * step;
        for i in 0..=ts {
            let theta = i as f32 / ts as f32 * TAU;
            let (x, y) = (radius * theta.cos(), radius * theta.sin());
            mesh.vertices.push(Vertex::new(
                [x, y, 0.0],
                [0.0, 0.0, 1.0],
                [(x / p.outer_radius + 1.0) / 2.0, (y / p.outer_radius + 1.0) / 2.0],
            ));
        }
    }

    for j in 0..ps {
        let level = j * (ts + 1);
        for i in 0..ts {
            let a = level + i;
            let b = a + ts + 1;
            let c = a + ts + 2;
            let d = a + 1;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    mesh
}

/// Disc in the XY plane facing +Z, fanned around a center vertex
pub fn build_circle(p: &CircleParams) -> MeshData {
    let mut mesh = MeshData::default();
    mesh.vertices.push(Vertex::new([0.0; 3], [0.0, 0.0, 1.0], [0.5, 0.5]));

    for s in 0..=p.segments {
        let theta = s as f32 / p.segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        mesh.vertices.push(Vertex::new(
            [p.radius * cos, p.radius * sin, 0.0],
            [0.0, 0.0, 1.0],
            [(cos + 1.0) / 2.0, (sin + 1.0) / 2.0],
        ));
    }

    for i in 1..=p.segments {
        mesh.indices.extend_from_slice(&[i, i + 1, 0]);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> BoxParams {
        BoxParams {
            width: 2.0,
            height: 1.0,
            depth: 1.0,
            width_segments: 1,
            height_segments: 1,
            depth_segments: 1,
        }
    }

    fn assert_indices_in_range(mesh: &MeshData) {
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
    }

    #[test]
    fn test_box_counts_and_bounds() {
        let mesh = build_box(&unit_box());
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert_indices_in_range(&mesh);
        let bounds = mesh.bounds();
        assert_relative_eq!(bounds.size(), Vec3::new(2.0, 1.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_sphere_counts() {
        let mesh = build_sphere(&SphereParams { radius: 1.0, width_segments: 32, height_segments: 16 });
        assert_eq!(mesh.vertices.len(), 33 * 17);
        // Two triangles per quad, minus one per segment at each pole
        assert_eq!(mesh.triangle_count(), 32 * 16 * 2 - 2 * 32);
        assert_indices_in_range(&mesh);
    }

    #[test]
    fn test_cone_has_one_cap() {
        let cone = CylinderParams {
            radius_top: 0.0,
            radius_bottom: 1.0,
            height: 1.0,
            radial_segments: 32,
            height_segments: 1,
            open_ended: false,
        };
        let cylinder = CylinderParams { radius_top: 1.0, ..cone };
        assert_eq!(build_cone_triangles(&cone), 64 + 32);
        assert_eq!(build_cone_triangles(&cylinder), 64 + 64);
        assert_eq!(build_cone_triangles(&CylinderParams { open_ended: true, ..cylinder }), 64);
    }

    fn build_cone_triangles(p: &CylinderParams) -> usize {
        let mesh = build_cylinder(p);
        assert_indices_in_range(&mesh);
        mesh.triangle_count()
    }

    #[test]
    fn test_torus_extent() {
        let mesh = build_torus(&TorusParams { radius: 1.0, tube: 0.4, radial_segments: 12, tubular_segments: 48 });
        assert_eq!(mesh.triangle_count(), 12 * 48 * 2);
        let bounds = mesh.bounds();
        assert_relative_eq!(bounds.max.x, 1.4, epsilon = 1e-5);
        assert_relative_eq!(bounds.max.z, 0.4, epsilon = 1e-2);
    }

    #[test]
    fn test_flat_shapes_face_z() {
        let plane = build_plane(&PlaneParams { width: 1.0, height: 1.0, width_segments: 2, height_segments: 2 });
        assert_eq!(plane.triangle_count(), 8);
        let ring = build_ring(&RingParams { inner_radius: 0.5, outer_radius: 1.0, theta_segments: 32, phi_segments: 1 });
        assert_eq!(ring.triangle_count(), 64);
        let circle = build_circle(&CircleParams { radius: 1.0, segments: 32 });
        assert_eq!(circle.triangle_count(), 32);

        for mesh in [&plane, &ring, &circle] {
            assert_indices_in_range(mesh);
            assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0] && v.position[2] == 0.0));
        }
    }

    #[test]
    fn test_zero_radius_sphere_has_finite_normals() {
        let mesh = build_sphere(&SphereParams { radius: 0.0, width_segments: 3, height_segments: 2 });
        assert!(mesh.vertices.iter().all(|v| v.normal.iter().all(|n| n.is_finite())));
    }
}
