use bytemuck::{Pod, Zeroable};

/// Maximum number of bones that can influence one vertex.
pub const MAX_BONE_INFLUENCE: usize = 4;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub bone_ids: [i32; MAX_BONE_INFLUENCE],
    pub bone_weights: [f32; MAX_BONE_INFLUENCE],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
        3 => Sint32x4,
        4 => Float32x4,
    ];

    pub fn new(pos: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            pos,
            normal,
            uv,
            bone_ids: [-1; MAX_BONE_INFLUENCE],
            bone_weights: [0.0; MAX_BONE_INFLUENCE],
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// CPU-side geometry. `indices` is empty for non-indexed meshes.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of elements a draw call consumes.
    pub fn element_count(&self) -> u32 {
        if self.is_indexed() {
            self.indices.len() as u32
        } else {
            self.vertices.len() as u32
        }
    }

    /// Fill in smooth normals for meshes imported without them.
    pub fn compute_normals(&mut self) {
        let all = vec![true; self.vertices.len()];
        self.fill_missing_normals(&all);
    }

    /// Smooth normals written only to vertices flagged in `missing`;
    /// the rest keep the normals they were imported with.
    pub fn fill_missing_normals(&mut self, missing: &[bool]) {
        let mut generated = vec![glam::Vec3::ZERO; self.vertices.len()];
        let tris: Vec<[usize; 3]> = if self.is_indexed() {
            self.indices
                .chunks_exact(3)
                .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
                .collect()
        } else {
            (0..self.vertices.len() / 3).map(|i| [3 * i, 3 * i + 1, 3 * i + 2]).collect()
        };
        for [a, b, c] in tris {
            if a >= self.vertices.len() || b >= self.vertices.len() || c >= self.vertices.len() {
                continue;
            }
            let pa = glam::Vec3::from_array(self.vertices[a].pos);
            let pb = glam::Vec3::from_array(self.vertices[b].pos);
            let pc = glam::Vec3::from_array(self.vertices[c].pos);
            let n = (pb - pa).cross(pc - pa);
            for i in [a, b, c] {
                generated[i] += n;
            }
        }
        for (i, (v, n)) in self.vertices.iter_mut().zip(generated).enumerate() {
            if missing.get(i).copied().unwrap_or(false) {
                v.normal = n.normalize_or_zero().to_array();
            }
        }
    }
}

/// Decoded image ready for upload. Pixels are always RGBA8;
/// `channels` records what the source file carried.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub pixels: Vec<u8>,
}

impl TextureImage {
    /// 1x1 opaque black, bound wherever a texture failed to load.
    pub fn placeholder() -> Self {
        Self {
            width: 1,
            height: 1,
            channels: 4,
            pixels: vec![0, 0, 0, 255],
        }
    }
}

// pos, normal, uv for each corner of the 12 cube triangles
const CUBE_VERTICES: [[f32; 8]; 36] = [
    // back
    [-0.5, -0.5, -0.5, 0.0, 0.0, -1.0, 0.0, 0.0],
    [0.5, 0.5, -0.5, 0.0, 0.0, -1.0, 1.0, 1.0],
    [0.5, -0.5, -0.5, 0.0, 0.0, -1.0, 1.0, 0.0],
    [0.5, 0.5, -0.5, 0.0, 0.0, -1.0, 1.0, 1.0],
    [-0.5, -0.5, -0.5, 0.0, 0.0, -1.0, 0.0, 0.0],
    [-0.5, 0.5, -0.5, 0.0, 0.0, -1.0, 0.0, 1.0],
    // front
    [-0.5, -0.5, 0.5, 0.0, 0.0, 1.0, 0.0, 0.0],
    [0.5, -0.5, 0.5, 0.0, 0.0, 1.0, 1.0, 0.0],
    [0.5, 0.5, 0.5, 0.0, 0.0, 1.0, 1.0, 1.0],
    [0.5, 0.5, 0.5, 0.0, 0.0, 1.0, 1.0, 1.0],
    [-0.5, 0.5, 0.5, 0.0, 0.0, 1.0, 0.0, 1.0],
    [-0.5, -0.5, 0.5, 0.0, 0.0, 1.0, 0.0, 0.0],
    // left
    [-0.5, 0.5, 0.5, -1.0, 0.0, 0.0, 1.0, 0.0],
    [-0.5, 0.5, -0.5, -1.0, 0.0, 0.0, 1.0, 1.0],
    [-0.5, -0.5, -0.5, -1.0, 0.0, 0.0, 0.0, 1.0],
    [-0.5, -0.5, -0.5, -1.0, 0.0, 0.0, 0.0, 1.0],
    [-0.5, -0.5, 0.5, -1.0, 0.0, 0.0, 0.0, 0.0],
    [-0.5, 0.5, 0.5, -1.0, 0.0, 0.0, 1.0, 0.0],
    // right
    [0.5, 0.5, 0.5, 1.0, 0.0, 0.0, 1.0, 0.0],
    [0.5, -0.5, -0.5, 1.0, 0.0, 0.0, 0.0, 1.0],
    [0.5, 0.5, -0.5, 1.0, 0.0, 0.0, 1.0, 1.0],
    [0.5, -0.5, -0.5, 1.0, 0.0, 0.0, 0.0, 1.0],
    [0.5, 0.5, 0.5, 1.0, 0.0, 0.0, 1.0, 0.0],
    [0.5, -0.5, 0.5, 1.0, 0.0, 0.0, 0.0, 0.0],
    // bottom
    [-0.5, -0.5, -0.5, 0.0, -1.0, 0.0, 0.0, 1.0],
    [0.5, -0.5, -0.5, 0.0, -1.0, 0.0, 1.0, 1.0],
    [0.5, -0.5, 0.5, 0.0, -1.0, 0.0, 1.0, 0.0],
    [0.5, -0.5, 0.5, 0.0, -1.0, 0.0, 1.0, 0.0],
    [-0.5, -0.5, 0.5, 0.0, -1.0, 0.0, 0.0, 0.0],
    [-0.5, -0.5, -0.5, 0.0, -1.0, 0.0, 0.0, 1.0],
    // top
    [-0.5, 0.5, -0.5, 0.0, 1.0, 0.0, 0.0, 1.0],
    [0.5, 0.5, 0.5, 0.0, 1.0, 0.0, 1.0, 0.0],
    [0.5, 0.5, -0.5, 0.0, 1.0, 0.0, 1.0, 1.0],
    [0.5, 0.5, 0.5, 0.0, 1.0, 0.0, 1.0, 0.0],
    [-0.5, 0.5, -0.5, 0.0, 1.0, 0.0, 0.0, 1.0],
    [-0.5, 0.5, 0.5, 0.0, 1.0, 0.0, 0.0, 0.0],
];

/// Unit cube centred on the origin, 36 vertices, counter-clockwise front faces.
pub fn create_cube_mesh() -> MeshData {
    let vertices = CUBE_VERTICES
        .iter()
        .map(|v| Vertex::new([v[0], v[1], v[2]], [v[3], v[4], v[5]], [v[6], v[7]]))
        .collect();
    MeshData {
        vertices,
        indices: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_vertex_is_64_bytes() {
        assert_eq!(std::mem::size_of::<Vertex>(), 64);
    }

    #[test]
    fn test_cube_faces_wind_counter_clockwise() {
        let cube = create_cube_mesh();
        assert_eq!(cube.element_count(), 36);
        assert!(!cube.is_indexed());
        for tri in cube.vertices.chunks_exact(3) {
            let a = Vec3::from_array(tri[0].pos);
            let b = Vec3::from_array(tri[1].pos);
            let c = Vec3::from_array(tri[2].pos);
            let face_normal = (b - a).cross(c - a).normalize();
            let stored = Vec3::from_array(tri[0].normal);
            assert!(
                face_normal.dot(stored) > 0.99,
                "winding disagrees with stored normal {stored:?}"
            );
        }
    }

    #[test]
    fn test_compute_normals_for_flat_quad() {
        let mut mesh = MeshData {
            vertices: vec![
                Vertex::new([0.0, 0.0, 0.0], [0.0; 3], [0.0, 0.0]),
                Vertex::new([1.0, 0.0, 0.0], [0.0; 3], [1.0, 0.0]),
                Vertex::new([1.0, 1.0, 0.0], [0.0; 3], [1.0, 1.0]),
                Vertex::new([0.0, 1.0, 0.0], [0.0; 3], [0.0, 1.0]),
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
        };
        mesh.compute_normals();
        for v in &mesh.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_fill_missing_normals_leaves_flagged_off_vertices() {
        let mut mesh = MeshData {
            vertices: vec![
                Vertex::new([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0]),
                Vertex::new([1.0, 0.0, 0.0], [0.0; 3], [1.0, 0.0]),
                Vertex::new([0.0, 1.0, 0.0], [0.0; 3], [0.0, 1.0]),
            ],
            indices: Vec::new(),
        };
        mesh.fill_missing_normals(&[false, true, true]);
        assert_eq!(mesh.vertices[0].normal, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[1].normal, [0.0, 0.0, 1.0]);
        assert_eq!(mesh.vertices[2].normal, [0.0, 0.0, 1.0]);
    }
}
