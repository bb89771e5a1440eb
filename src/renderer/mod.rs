pub mod camera;
pub mod gpu;
pub mod texture;

pub use camera::{Camera, CameraUniform, Projection};
pub use gpu::{GpuMesh, GpuState};
pub use texture::{GpuTexture, TextureImage};
