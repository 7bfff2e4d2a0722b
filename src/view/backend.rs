use glam::Vec3;

use crate::error::RenderError;
use crate::ui::UiOverlay;
use crate::utils::{MeshData, TextureImage};
use crate::view::uniforms::{UniformLayout, UniformValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub u32);

/// Number of texture slots a program can sample from.
pub const TEXTURE_SLOTS: usize = 2;

/// Two shader texts plus the uniform struct both stages declare.
#[derive(Debug, Clone)]
pub struct ProgramSource<'a> {
    pub label: &'a str,
    pub vertex: &'a str,
    pub fragment: &'a str,
    pub uniforms: UniformLayout,
    pub texture_slots: usize,
}

/// Immediate-mode drawing interface the frame loop talks to.
///
/// Uniforms are set by name on the bound program and captured at each
/// `draw`, so later writes do not affect earlier draws. Nothing reaches the
/// screen until `present`.
pub trait RenderBackend {
    /// Compile and link a program. A program that fails to build still gets
    /// an id; draws with it are dropped.
    fn create_program(&mut self, source: &ProgramSource<'_>) -> ProgramId;

    fn create_texture(&mut self, label: &str, image: &TextureImage) -> TextureId;

    fn upload_mesh(&mut self, label: &str, mesh: &MeshData) -> MeshId;

    /// The 1x1 black texture sampled by unbound slots and failed loads.
    fn placeholder_texture(&self) -> TextureId;

    /// Framebuffer size in pixels.
    fn viewport_size(&self) -> (u32, u32);

    fn clear(&mut self, color: Vec3);

    fn bind_program(&mut self, program: ProgramId);

    fn set_uniform(&mut self, name: &str, value: UniformValue);

    fn bind_texture(&mut self, slot: usize, texture: TextureId);

    /// Indexed or non-indexed triangle draw, whichever the mesh was uploaded as.
    fn draw(&mut self, mesh: MeshId);

    fn draw_overlay(&mut self, overlay: UiOverlay);

    fn present(&mut self) -> Result<(), RenderError>;
}
