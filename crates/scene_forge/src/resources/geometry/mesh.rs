//! Generated mesh data
//!
//! Plain CPU-side vertex/index buffers. `Vertex` is `Pod` so a backend can
//! upload the vertex buffer as raw bytes without copying.

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::{Aabb, Vec3};

/// 3D vertex with position, normal and texture coordinate
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in local space
    pub position: [f32; 3],

    /// Unit normal
    pub normal: [f32; 3],

    /// Texture coordinates
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Create a new vertex
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coord,
        }
    }
}

/// Triangle list mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex data
    pub vertices: Vec<Vertex>,

    /// Triangle indices, three per triangle
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Create a new mesh
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex buffer as raw bytes
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Local-space bounds; a degenerate box at the origin for an empty mesh
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| Vec3::from(v.position)))
            .unwrap_or_else(|| Aabb::new(Vec3::zeros(), Vec3::zeros()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_bytes_size() {
        let mesh = MeshData::new(
            vec![Vertex::new([0.0; 3], [0.0, 1.0, 0.0], [0.0; 2]); 3],
            vec![0, 1, 2],
        );
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
        assert_eq!(mesh.vertex_bytes().len(), 96);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_empty_bounds() {
        let bounds = MeshData::default().bounds();
        assert_eq!(bounds.min, Vec3::zeros());
        assert_eq!(bounds.max, Vec3::zeros());
    }
}
