//! Platonic solids with optional subdivision
//!
//! Each base face is split into `(detail + 1)^2` triangles and every vertex is
//! pushed out onto the circumscribed sphere. Output is flat shaded: three
//! unshared vertices per triangle with the face normal.

use std::f32::consts::PI;

use super::mesh::{MeshData, Vertex};
use super::shape::PolyhedronParams;
use crate::foundation::math::Vec3;

/// Base solid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Solid {
    /// 4 faces
    Tetrahedron,
    /// 8 faces
    Octahedron,
    /// 36 triangles (12 pentagons)
    Dodecahedron,
    /// 20 faces
    Icosahedron,
}

const TETRAHEDRON_VERTICES: [[f32; 3]; 4] = [
    [1.0, 1.0, 1.0],
    [-1.0, -1.0, 1.0],
    [-1.0, 1.0, -1.0],
    [1.0, -1.0, -1.0],
];

const TETRAHEDRON_INDICES: [u32; 12] = [2, 1, 0, 0, 3, 2, 1, 3, 0, 2, 3, 1];

const OCTAHEDRON_VERTICES: [[f32; 3]; 6] = [
    [1.0, 0.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, -1.0],
];

const OCTAHEDRON_INDICES: [u32; 24] = [
    0, 2, 4, 0, 4, 3, 0, 3, 5, 0, 5, 2,
    1, 2, 5, 1, 5, 3, 1, 3, 4, 1, 4, 2,
];

/// Golden ratio
const PHI: f32 = 1.618_034;
/// Inverse golden ratio
const INV_PHI: f32 = 0.618_034;

const ICOSAHEDRON_VERTICES: [[f32; 3]; 12] = [
    [-1.0, PHI, 0.0],
    [1.0, PHI, 0.0],
    [-1.0, -PHI, 0.0],
    [1.0, -PHI, 0.0],
    [0.0, -1.0, PHI],
    [0.0, 1.0, PHI],
    [0.0, -1.0, -PHI],
    [0.0, 1.0, -PHI],
    [PHI, 0.0, -1.0],
    [PHI, 0.0, 1.0],
    [-PHI, 0.0, -1.0],
    [-PHI, 0.0, 1.0],
];

const ICOSAHEDRON_INDICES: [u32; 60] = [
    0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11,
    1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7, 6, 7, 1, 8,
    3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9,
    4, 9, 5, 2, 4, 11, 6, 2, 10, 8, 6, 7, 9, 8, 1,
];

const DODECAHEDRON_VERTICES: [[f32; 3]; 20] = [
    // (±1, ±1, ±1)
    [-1.0, -1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, 1.0, 1.0],
    [1.0, -1.0, -1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, -1.0],
    [1.0, 1.0, 1.0],
    // (0, ±1/φ, ±φ)
    [0.0, -INV_PHI, -PHI],
    [0.0, -INV_PHI, PHI],
    [0.0, INV_PHI, -PHI],
    [0.0, INV_PHI, PHI],
    // (±1/φ, ±φ, 0)
    [-INV_PHI, -PHI, 0.0],
    [-INV_PHI, PHI, 0.0],
    [INV_PHI, -PHI, 0.0],
    [INV_PHI, PHI, 0.0],
    // (±φ, 0, ±1/φ)
    [-PHI, 0.0, -INV_PHI],
    [PHI, 0.0, -INV_PHI],
    [-PHI, 0.0, INV_PHI],
    [PHI, 0.0, INV_PHI],
];

const DODECAHEDRON_INDICES: [u32; 108] = [
    3, 11, 7, 3, 7, 15, 3, 15, 13,
    7, 19, 17, 7, 17, 6, 7, 6, 15,
    17, 4, 8, 17, 8, 10, 17, 10, 6,
    8, 0, 16, 8, 16, 2, 8, 2, 10,
    0, 12, 1, 0, 1, 18, 0, 18, 16,
    6, 10, 2, 6, 2, 13, 6, 13, 15,
    2, 16, 18, 2, 18, 3, 2, 3, 13,
    18, 1, 9, 18, 9, 11, 18, 11, 3,
    4, 14, 12, 4, 12, 0, 4, 0, 8,
    11, 9, 5, 11, 5, 19, 11, 19, 7,
    19, 5, 14, 19, 14, 4, 19, 4, 17,
    1, 12, 14, 1, 14, 5, 1, 5, 9,
];

impl Solid {
    fn tables(self) -> (&'static [[f32; 3]], &'static [u32]) {
        match self {
            Solid::Tetrahedron => (&TETRAHEDRON_VERTICES, &TETRAHEDRON_INDICES),
            Solid::Octahedron => (&OCTAHEDRON_VERTICES, &OCTAHEDRON_INDICES),
            Solid::Dodecahedron => (&DODECAHEDRON_VERTICES, &DODECAHEDRON_INDICES),
            Solid::Icosahedron => (&ICOSAHEDRON_VERTICES, &ICOSAHEDRON_INDICES),
        }
    }

    /// Triangles in the undivided solid
    pub fn base_triangles(self) -> usize {
        self.tables().1.len() / 3
    }
}

/// Build `solid` scaled to `radius` and subdivided `detail` times
pub fn build_polyhedron(solid: Solid, p: &PolyhedronParams) -> MeshData {
    let (vertices, indices) = solid.tables();
    let mut positions = Vec::new();

    for face in indices.chunks_exact(3) {
        let [a, b, c] = [face[0], face[1], face[2]].map(|i| Vec3::from(vertices[i as usize]));
        subdivide_face(a, b, c, p.detail, &mut positions);
    }

    let mut mesh = MeshData::default();
    for tri in positions.chunks_exact(3) {
        let on_sphere: Vec<Vec3> = tri
            .iter()
            .map(|v| v.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros))
            .collect();
        let mut normal = (on_sphere[1] - on_sphere[0])
            .cross(&(on_sphere[2] - on_sphere[0]))
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vec3::y);
        let centroid = (on_sphere[0] + on_sphere[1] + on_sphere[2]) / 3.0;
        if normal.dot(&centroid) < 0.0 {
            normal = -normal;
        }

        for unit in &on_sphere {
            mesh.indices.push(mesh.vertices.len() as u32);
            mesh.vertices.push(Vertex::new((unit * p.radius).into(), normal.into(), spherical_uv(unit)));
        }
    }

    mesh
}

/// Split triangle `abc` into a `(detail + 1)`-row grid of triangles
fn subdivide_face(a: Vec3, b: Vec3, c: Vec3, detail: u32, out: &mut Vec<Vec3>) {
    let cols = detail as usize + 1;
    let mut grid: Vec<Vec<Vec3>> = Vec::with_capacity(cols + 1);

    for i in 0..=cols {
        let t = i as f32 / cols as f32;
        let aj = a.lerp(&c, t);
        let bj = b.lerp(&c, t);
        let rows = cols - i;
        let row = if rows == 0 {
            vec![aj]
        } else {
            (0..=rows).map(|j| aj.lerp(&bj, j as f32 / rows as f32)).collect()
        };
        grid.push(row);
    }

    for i in 0..cols {
        for j in 0..(2 * (cols - i) - 1) {
            let k = j / 2;
            if j % 2 == 0 {
                out.extend_from_slice(&[grid[i][k + 1], grid[i + 1][k], grid[i][k]]);
            } else {
                out.extend_from_slice(&[grid[i][k + 1], grid[i + 1][k + 1], grid[i + 1][k]]);
            }
        }
    }
}

fn spherical_uv(unit: &Vec3) -> [f32; 2] {
    let u = unit.z.atan2(unit.x) / (2.0 * PI) + 0.5;
    let v = (-unit.y).atan2(unit.x.hypot(unit.z)) / PI + 0.5;
    [u, v]
}
