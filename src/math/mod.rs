pub mod mesh;
pub mod shapes;

pub use mesh::{Mesh, MeshError, Vertex};
pub use shapes::{Cylinder, Shape, Sphere, Torus, cube, plane};
