use bytemuck::{Pod, Zeroable};
use thiserror::Error;

/// Interleaved vertex as consumed by the scene pipeline: position, normal,
/// texture coordinate. 32 bytes, attribute locations 0, 1 and 2.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coord,
        }
    }

    /// Vertex without texture coordinates; samples the texel at the origin.
    pub const fn untextured(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self::new(position, normal, [0.0, 0.0])
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    #[error("{shape}: {name} must be at least {min}, got {got}")]
    CountTooSmall {
        shape: &'static str,
        name: &'static str,
        min: u32,
        got: u32,
    },
    #[error("{shape}: {name} must be a finite value {bound}, got {got}")]
    InvalidDimension {
        shape: &'static str,
        name: &'static str,
        bound: &'static str,
        got: f32,
    },
    #[error("{shape}: {vertices} vertices and {indices} indices exceed the u32 index range")]
    TooLarge {
        shape: &'static str,
        vertices: u128,
        indices: u128,
    },
    #[error("{shape}: base and top radius cannot both be zero")]
    DegenerateCylinder { shape: &'static str },
    #[error("index {index} out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds { index: u32, vertex_count: usize },
    #[error("index count {len} is not a multiple of 3")]
    IncompleteTriangle { len: usize },
}

/// CPU-side triangle mesh. Indices are counter-clockwise triples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    pub fn from_parts(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Appends a vertex and returns its index.
    pub fn add_vertex(&mut self, vertex: Vertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Checks the structural invariants: complete triangles, indices in range.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::IncompleteTriangle {
                len: self.indices.len(),
            });
        }

        let vertex_count = self.vertices.len();
        match self
            .indices
            .iter()
            .find(|&&index| index as usize >= vertex_count)
        {
            Some(&index) => Err(MeshError::IndexOutOfBounds {
                index,
                vertex_count,
            }),
            None => Ok(()),
        }
    }

    /// Raw bytes for the vertex buffer.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw bytes for the index buffer (`u32` indices).
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Mesh {
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex(Vertex::untextured([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]));
        let b = mesh.add_vertex(Vertex::untextured([1.0, 0.0, 0.0], [0.0, 0.0, 1.0]));
        let c = mesh.add_vertex(Vertex::untextured([0.0, 1.0, 0.0], [0.0, 0.0, 1.0]));
        mesh.add_triangle(a, b, c);
        mesh
    }

    #[test]
    fn vertex_layout_is_32_bytes() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
        assert_eq!(std::mem::offset_of!(Vertex, normal), 12);
        assert_eq!(std::mem::offset_of!(Vertex, tex_coord), 24);
    }

    #[test]
    fn add_vertex_returns_sequential_indices() {
        let mesh = triangle();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.triangles().next(), Some([0, 1, 2]));
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_index() {
        let mut mesh = triangle();
        mesh.add_triangle(0, 1, 3);
        assert_eq!(
            mesh.validate(),
            Err(MeshError::IndexOutOfBounds {
                index: 3,
                vertex_count: 3
            })
        );
    }

    #[test]
    fn validate_rejects_partial_triangle() {
        let mut mesh = triangle();
        mesh.indices.push(0);
        assert_eq!(mesh.validate(), Err(MeshError::IncompleteTriangle { len: 4 }));
    }

    #[test]
    fn byte_views_cover_all_data() {
        let mesh = triangle();
        assert_eq!(mesh.vertex_bytes().len(), 3 * 32);
        assert_eq!(mesh.index_bytes().len(), 3 * 4);
    }
}
