// VIEW: rendering backends, shader programs and uniform layouts
pub mod backend;
pub mod gpu_init;
pub mod programs;
#[cfg(test)]
pub(crate) mod recording;
pub mod render;
pub mod uniforms;

pub use backend::{MeshId, ProgramId, ProgramSource, RenderBackend, TextureId};
pub use gpu_init::GpuContext;
pub use render::WgpuRenderer;
