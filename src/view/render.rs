//! wgpu implementation of [`RenderBackend`].
//!
//! Calls between `clear` and `present` are recorded; uniforms are snapshotted
//! into one dynamic-offset buffer per frame and everything is encoded in a
//! single scene pass followed by the egui pass.

use std::collections::HashMap;
use std::num::NonZeroU64;
use std::sync::Arc;

use glam::Vec3;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::error::{InitError, RenderError};
use crate::ui::UiOverlay;
use crate::utils::{MeshData, TextureImage, Vertex};
use crate::view::backend::{MeshId, ProgramId, ProgramSource, RenderBackend, TextureId, TEXTURE_SLOTS};
use crate::view::gpu_init::GpuContext;
use crate::view::uniforms::{UniformBlock, UniformValue};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
const INITIAL_UNIFORM_CAPACITY: u64 = 64 * 1024;

pub fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> (wgpu::Texture, wgpu::TextureView) {
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());
    (depth_texture, depth_view)
}

fn uniform_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    size: u64,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("uniform_bind_group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                size: NonZeroU64::new(size),
            }),
        }],
    })
}

/// Next `alignment`-aligned offset at or after `len`.
fn arena_offset(len: usize, alignment: usize) -> usize {
    len.div_ceil(alignment) * alignment
}

struct GpuProgram {
    label: String,
    /// `None` when compilation or linking failed; draws are dropped.
    pipeline: Option<wgpu::RenderPipeline>,
    block: UniformBlock,
    bind_group: wgpu::BindGroup,
    texture_slots: usize,
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    count: u32,
}

struct GpuTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

struct DrawCommand {
    program: ProgramId,
    mesh: MeshId,
    uniform_offset: u32,
    textures: Option<[TextureId; TEXTURE_SLOTS]>,
}

#[derive(Default)]
struct FrameCommands {
    clear: Vec3,
    draws: Vec<DrawCommand>,
    uniforms: Vec<u8>,
    overlay: Option<UiOverlay>,
}

impl FrameCommands {
    /// Queue a draw with its uniform snapshot at the next aligned offset.
    fn record(
        &mut self,
        program: ProgramId,
        mesh: MeshId,
        textures: Option<[TextureId; TEXTURE_SLOTS]>,
        uniforms: &[u8],
        alignment: usize,
    ) {
        let offset = arena_offset(self.uniforms.len(), alignment);
        self.uniforms.resize(offset, 0);
        self.uniforms.extend_from_slice(uniforms);
        self.draws.push(DrawCommand {
            program,
            mesh,
            uniform_offset: offset as u32,
            textures,
        });
    }
}

pub struct WgpuRenderer {
    gpu: GpuContext,
    depth_view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    uniform_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    uniform_capacity: u64,
    uniform_alignment: usize,
    programs: Vec<GpuProgram>,
    meshes: Vec<Option<GpuMesh>>,
    textures: Vec<GpuTexture>,
    texture_groups: HashMap<[TextureId; TEXTURE_SLOTS], wgpu::BindGroup>,
    placeholder: TextureId,
    bound_program: Option<ProgramId>,
    bound_textures: [Option<TextureId>; TEXTURE_SLOTS],
    frame: FrameCommands,
    egui_renderer: egui_wgpu::Renderer,
}

impl WgpuRenderer {
    pub async fn new(window: Arc<Window>, width: u32, height: u32) -> Result<Self, InitError> {
        let gpu = GpuContext::new(window, width, height).await?;
        let device = gpu.device.clone();

        let (_, depth_view) = create_depth_texture(&device, gpu.config.width, gpu.config.height);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("texture_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniform_buffer"),
            size: INITIAL_UNIFORM_CAPACITY,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_alignment = device.limits().min_uniform_buffer_offset_alignment as usize;

        let egui_renderer = egui_wgpu::Renderer::new(&device, gpu.format, egui_wgpu::RendererOptions::default());

        let mut renderer = Self {
            gpu,
            depth_view,
            sampler,
            uniform_layout,
            texture_layout,
            uniform_buffer,
            uniform_capacity: INITIAL_UNIFORM_CAPACITY,
            uniform_alignment,
            programs: Vec::new(),
            meshes: Vec::new(),
            textures: Vec::new(),
            texture_groups: HashMap::new(),
            placeholder: TextureId(0),
            bound_program: None,
            bound_textures: [None; TEXTURE_SLOTS],
            frame: FrameCommands::default(),
            egui_renderer,
        };
        renderer.placeholder = renderer.create_texture("placeholder", &TextureImage::placeholder());
        Ok(renderer)
    }

    /// Resize the surface and depth buffer. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.gpu.resize(width, height) {
            let (_, depth_view) = create_depth_texture(&self.gpu.device, width, height);
            self.depth_view = depth_view;
            tracing::debug!(width, height, "surface resized");
        }
    }

    fn compile_stage(&self, program: &str, stage: &str, text: &str) -> Option<wgpu::ShaderModule> {
        let device = &self.gpu.device;
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(program),
            source: wgpu::ShaderSource::Wgsl(text.into()),
        });
        match pollster::block_on(device.pop_error_scope()) {
            Some(err) => {
                tracing::error!(program, stage, "shader compilation failed:\n{err}");
                None
            }
            None => Some(module),
        }
    }

    fn build_pipeline(&self, source: &ProgramSource<'_>) -> Option<wgpu::RenderPipeline> {
        let vertex = self.compile_stage(source.label, "VERTEX", source.vertex);
        let fragment = self.compile_stage(source.label, "FRAGMENT", source.fragment);
        let (vertex, fragment) = (vertex?, fragment?);

        let device = &self.gpu.device;
        let mut bind_group_layouts = vec![&self.uniform_layout];
        if source.texture_slots > 0 {
            bind_group_layouts.push(&self.texture_layout);
        }

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(source.label),
            bind_group_layouts: &bind_group_layouts,
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(source.label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.gpu.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            tracing::error!(program = source.label, stage = "PROGRAM", "program linking failed:\n{err}");
            return None;
        }
        Some(pipeline)
    }

    fn ensure_texture_group(&mut self, ids: [TextureId; TEXTURE_SLOTS]) -> bool {
        if self.texture_groups.contains_key(&ids) {
            return true;
        }
        let views: Option<Vec<&wgpu::TextureView>> = ids
            .iter()
            .map(|id| self.textures.get(id.0 as usize).map(|t| &t.view))
            .collect();
        let Some(views) = views else {
            tracing::warn!(?ids, "draw references an unknown texture");
            return false;
        };
        let group = self.gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("texture_bind_group"),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(views[0]),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(views[1]),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        self.texture_groups.insert(ids, group);
        true
    }

    /// Copy this frame's uniform snapshots to the GPU, growing the buffer
    /// (and rebuilding every program's bind group) when needed.
    fn upload_uniforms(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let needed = bytes.len() as u64;
        if needed > self.uniform_capacity {
            let capacity = needed.next_power_of_two();
            self.uniform_buffer = self.gpu.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("uniform_buffer"),
                size: capacity,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            self.uniform_capacity = capacity;
            for program in &mut self.programs {
                program.bind_group = uniform_bind_group(
                    &self.gpu.device,
                    &self.uniform_layout,
                    &self.uniform_buffer,
                    program.block.layout().size() as u64,
                );
            }
            tracing::debug!(capacity, "uniform buffer grown");
        }
        self.gpu.queue.write_buffer(&self.uniform_buffer, 0, bytes);
    }

    fn encode_frame(&mut self, commands: &FrameCommands) -> Result<(), RenderError> {
        let frame = match self.gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost or outdated, skipping frame");
                self.gpu.reconfigure();
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        self.upload_uniforms(&commands.uniforms);

        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("encoder"),
        });

        {
            let mut rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: commands.clear.x as f64,
                            g: commands.clear.y as f64,
                            b: commands.clear.z as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for cmd in &commands.draws {
                let Some(program) = self.programs.get(cmd.program.0 as usize) else {
                    continue;
                };
                let Some(pipeline) = &program.pipeline else {
                    continue;
                };
                let Some(Some(mesh)) = self.meshes.get(cmd.mesh.0 as usize) else {
                    continue;
                };

                rp.set_pipeline(pipeline);
                rp.set_bind_group(0, &program.bind_group, &[cmd.uniform_offset]);
                if let Some(ids) = cmd.textures {
                    let Some(group) = self.texture_groups.get(&ids) else {
                        continue;
                    };
                    rp.set_bind_group(1, group, &[]);
                }
                rp.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                match &mesh.index_buffer {
                    Some(index_buffer) => {
                        rp.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                        rp.draw_indexed(0..mesh.count, 0, 0..1);
                    }
                    None => rp.draw(0..mesh.count, 0..1),
                }
            }
        }

        if let Some(overlay) = &commands.overlay {
            let screen_descriptor = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [self.gpu.config.width, self.gpu.config.height],
                pixels_per_point: overlay.pixels_per_point,
            };
            self.egui_renderer.update_buffers(
                &self.gpu.device,
                &self.gpu.queue,
                &mut encoder,
                &overlay.primitives,
                &screen_descriptor,
            );

            let egui_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.egui_renderer
                .render(&mut egui_pass.forget_lifetime(), &overlay.primitives, &screen_descriptor);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

impl RenderBackend for WgpuRenderer {
    fn create_program(&mut self, source: &ProgramSource<'_>) -> ProgramId {
        let id = ProgramId(self.programs.len() as u32);
        if source.texture_slots > TEXTURE_SLOTS {
            tracing::warn!(program = source.label, slots = source.texture_slots, "only {TEXTURE_SLOTS} texture slots are bound");
        }
        let pipeline = self.build_pipeline(source);
        if pipeline.is_some() {
            tracing::info!(program = source.label, uniforms = source.uniforms.len(), "program ready");
        }
        let block = UniformBlock::new(source.uniforms.clone());
        let bind_group = uniform_bind_group(
            &self.gpu.device,
            &self.uniform_layout,
            &self.uniform_buffer,
            block.layout().size() as u64,
        );
        self.programs.push(GpuProgram {
            label: source.label.to_string(),
            pipeline,
            block,
            bind_group,
            texture_slots: source.texture_slots,
        });
        id
    }

    fn create_texture(&mut self, label: &str, image: &TextureImage) -> TextureId {
        let id = TextureId(self.textures.len() as u32);
        let expected = image.width as usize * image.height as usize * 4;
        let fallback;
        let image = if image.width == 0 || image.height == 0 || image.pixels.len() != expected {
            tracing::warn!(texture = label, "malformed image, using placeholder");
            fallback = TextureImage::placeholder();
            &fallback
        } else {
            image
        };

        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = self.gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.gpu.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.textures.push(GpuTexture { _texture: texture, view });
        id
    }

    fn upload_mesh(&mut self, label: &str, mesh: &MeshData) -> MeshId {
        let id = MeshId(self.meshes.len() as u32);
        if mesh.is_empty() {
            tracing::warn!(mesh = label, "skipping empty mesh");
            self.meshes.push(None);
            return id;
        }
        let device = &self.gpu.device;
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = mesh.is_indexed().then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });
        self.meshes.push(Some(GpuMesh {
            vertex_buffer,
            index_buffer,
            count: mesh.element_count(),
        }));
        id
    }

    fn placeholder_texture(&self) -> TextureId {
        self.placeholder
    }

    fn viewport_size(&self) -> (u32, u32) {
        (self.gpu.config.width, self.gpu.config.height)
    }

    fn clear(&mut self, color: Vec3) {
        self.frame.clear = color;
    }

    fn bind_program(&mut self, program: ProgramId) {
        self.bound_program = Some(program);
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        let Some(program) = self.bound_program.and_then(|id| self.programs.get_mut(id.0 as usize)) else {
            tracing::warn!(uniform = name, "uniform set with no program bound");
            return;
        };
        if let Err(err) = program.block.set(name, value) {
            tracing::warn!(program = %program.label, uniform = name, ?err, "uniform write rejected");
        }
    }

    fn bind_texture(&mut self, slot: usize, texture: TextureId) {
        match self.bound_textures.get_mut(slot) {
            Some(bound) => *bound = Some(texture),
            None => tracing::warn!(slot, "texture slot out of range"),
        }
    }

    fn draw(&mut self, mesh: MeshId) {
        let Some(program_id) = self.bound_program else {
            return;
        };
        let Some(program) = self.programs.get(program_id.0 as usize) else {
            return;
        };
        if program.pipeline.is_none() {
            return;
        }
        let texture_slots = program.texture_slots;

        // rejected draws must not take arena space
        let textures = if texture_slots > 0 {
            let ids = self.bound_textures.map(|t| t.unwrap_or(self.placeholder));
            if !self.ensure_texture_group(ids) {
                return;
            }
            Some(ids)
        } else {
            None
        };

        let Some(program) = self.programs.get(program_id.0 as usize) else {
            return;
        };
        self.frame
            .record(program_id, mesh, textures, program.block.bytes(), self.uniform_alignment);
    }

    fn draw_overlay(&mut self, overlay: UiOverlay) {
        self.frame.overlay = Some(overlay);
    }

    fn present(&mut self) -> Result<(), RenderError> {
        let commands = std::mem::take(&mut self.frame);

        // texture deltas must be applied even when the frame is skipped
        if let Some(overlay) = &commands.overlay {
            for (id, image_delta) in &overlay.textures_delta.set {
                self.egui_renderer
                    .update_texture(&self.gpu.device, &self.gpu.queue, *id, image_delta);
            }
        }

        let result = self.encode_frame(&commands);

        if let Some(overlay) = &commands.overlay {
            for id in &overlay.textures_delta.free {
                self.egui_renderer.free_texture(id);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_offsets_are_aligned() {
        assert_eq!(arena_offset(0, 256), 0);
        assert_eq!(arena_offset(1, 256), 256);
        assert_eq!(arena_offset(256, 256), 256);
        assert_eq!(arena_offset(688, 256), 768);
    }

    #[test]
    fn test_recorded_draws_pack_uniforms_back_to_back() {
        let mut frame = FrameCommands::default();
        frame.record(ProgramId(0), MeshId(0), None, &[1; 208], 256);
        frame.record(ProgramId(1), MeshId(0), Some([TextureId(0); TEXTURE_SLOTS]), &[2; 688], 256);
        assert_eq!(frame.draws.len(), 2);
        assert_eq!(frame.draws[0].uniform_offset, 0);
        assert_eq!(frame.draws[1].uniform_offset, 256);
        assert_eq!(frame.uniforms.len(), 256 + 688);
        assert!(frame.uniforms[208..256].iter().all(|&b| b == 0));
    }
}
