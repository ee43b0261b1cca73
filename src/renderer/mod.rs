mod gpu;
mod pipelines;
mod resources;

pub use gpu::GpuRenderer;

use anyhow::Result;

use crate::camera::Camera;
use crate::scene::Scene;

/// Something that can draw a frame of the scene from a camera
pub trait SceneRenderer {
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<()>;
}
