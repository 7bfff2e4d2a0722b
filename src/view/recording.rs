//! Headless [`RenderBackend`] that records every call, for tests.

use glam::Vec3;

use crate::error::RenderError;
use crate::ui::UiOverlay;
use crate::utils::{MeshData, TextureImage};
use crate::view::backend::{MeshId, ProgramId, ProgramSource, RenderBackend, TextureId};
use crate::view::uniforms::{UniformBlock, UniformValue};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateProgram(String),
    CreateTexture(String),
    UploadMesh(String),
    Clear(Vec3),
    BindProgram(ProgramId),
    SetUniform(String, UniformValue),
    BindTexture(usize, TextureId),
    Draw { program: ProgramId, mesh: MeshId },
    DrawOverlay,
    Present,
}

pub struct RecordingBackend {
    pub calls: Vec<Call>,
    pub viewport: (u32, u32),
    /// Uniform writes the bound program's layout refused.
    pub rejected: Vec<String>,
    programs: Vec<(String, UniformBlock)>,
    /// Uploads so far; id 0 is the built-in placeholder.
    textures: u32,
    meshes: u32,
    bound: Option<ProgramId>,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            viewport: (800, 600),
            rejected: Vec::new(),
            programs: Vec::new(),
            textures: 0,
            meshes: 0,
            bound: None,
        }
    }
}

impl RecordingBackend {
    pub fn textures_created(&self) -> usize {
        self.textures as usize
    }

    pub fn program(&self, label: &str) -> Option<ProgramId> {
        self.programs
            .iter()
            .position(|(l, _)| l == label)
            .map(|i| ProgramId(i as u32))
    }

    pub fn draws(&self) -> Vec<(ProgramId, MeshId)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Draw { program, mesh } => Some((*program, *mesh)),
                _ => None,
            })
            .collect()
    }

    /// Most recent value written to `name` on any program.
    pub fn last_uniform(&self, name: &str) -> Option<UniformValue> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::SetUniform(n, v) if n == name => Some(*v),
            _ => None,
        })
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
        self.rejected.clear();
    }
}

impl RenderBackend for RecordingBackend {
    fn create_program(&mut self, source: &ProgramSource<'_>) -> ProgramId {
        let id = ProgramId(self.programs.len() as u32);
        self.programs
            .push((source.label.to_string(), UniformBlock::new(source.uniforms.clone())));
        self.calls.push(Call::CreateProgram(source.label.to_string()));
        id
    }

    fn create_texture(&mut self, label: &str, _image: &TextureImage) -> TextureId {
        self.textures += 1;
        let id = TextureId(self.textures);
        self.calls.push(Call::CreateTexture(label.to_string()));
        id
    }

    fn upload_mesh(&mut self, label: &str, _mesh: &MeshData) -> MeshId {
        let id = MeshId(self.meshes);
        self.meshes += 1;
        self.calls.push(Call::UploadMesh(label.to_string()));
        id
    }

    fn placeholder_texture(&self) -> TextureId {
        TextureId(0)
    }

    fn viewport_size(&self) -> (u32, u32) {
        self.viewport
    }

    fn clear(&mut self, color: Vec3) {
        self.calls.push(Call::Clear(color));
    }

    fn bind_program(&mut self, program: ProgramId) {
        self.bound = Some(program);
        self.calls.push(Call::BindProgram(program));
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        let accepted = self
            .bound
            .and_then(|id| self.programs.get_mut(id.0 as usize))
            .is_some_and(|(_, block)| block.set(name, value).is_ok());
        if !accepted {
            self.rejected.push(name.to_string());
        }
        self.calls.push(Call::SetUniform(name.to_string(), value));
    }

    fn bind_texture(&mut self, slot: usize, texture: TextureId) {
        self.calls.push(Call::BindTexture(slot, texture));
    }

    fn draw(&mut self, mesh: MeshId) {
        if let Some(program) = self.bound {
            self.calls.push(Call::Draw { program, mesh });
        }
    }

    fn draw_overlay(&mut self, _overlay: UiOverlay) {
        self.calls.push(Call::DrawOverlay);
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.calls.push(Call::Present);
        Ok(())
    }
}
