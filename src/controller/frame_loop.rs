use glam::{Mat3, Mat4, Vec3};

use crate::config::SandboxConfig;
use crate::controller::camera_controller::{CameraController, Direction};
use crate::controller::input::{InputEvent, InputState, KeyBindings};
use crate::error::RenderError;
use crate::model::assets::load_image;
use crate::model::{Camera, LightSettings, Model, Scene, Transform};
use crate::ui::{constrain_spot_cone, DebugUi, InspectorPanel};
use crate::utils::create_cube_mesh;
use crate::view::backend::{MeshId, ProgramId, RenderBackend, TextureId};
use crate::view::programs::{light_cube_program, lighting_program};

pub const MATERIAL_SHININESS: f32 = 32.0;

/// What the frame loop needs from the window it runs in.
pub trait WindowControl {
    fn request_close(&mut self);
    /// Grab and hide the cursor, or release and show it.
    fn set_cursor_captured(&mut self, captured: bool);
}

/// Frame timing and camera readout shown in the inspector.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    pub fps: f32,
    pub frame_time_ms: f32,
    pub camera_position: Vec3,
    pub fov: f32,
    frames: u32,
    elapsed: f32,
}

impl FrameStats {
    /// Fold one frame in. The FPS figure refreshes once per second.
    pub fn record(&mut self, dt: f32, camera: &Camera) {
        self.frames += 1;
        self.elapsed += dt;
        if self.elapsed >= 1.0 {
            self.fps = self.frames as f32 / self.elapsed;
            self.frame_time_ms = 1000.0 * self.elapsed / self.frames as f32;
            self.frames = 0;
            self.elapsed = 0.0;
        }
        self.camera_position = camera.position;
        self.fov = camera.fov();
    }
}

/// Normal matrix of `model`. Degenerate (zero scale) models fall back to identity.
fn normal_matrix(model: Mat4) -> Mat3 {
    let m = Mat3::from_mat4(model);
    if m.determinant().abs() <= f32::EPSILON {
        Mat3::IDENTITY
    } else {
        m.inverse().transpose()
    }
}

/// Load a scene texture, falling back to the backend's placeholder on failure.
fn load_texture_or_placeholder<B: RenderBackend + ?Sized>(
    backend: &mut B,
    path: &std::path::Path,
) -> TextureId {
    match load_image(path, true) {
        Ok(image) => backend.create_texture(&path.to_string_lossy(), &image),
        Err(err) => {
            tracing::warn!("Texture failed to load: {err}");
            backend.placeholder_texture()
        }
    }
}

/// Per-frame orchestration: input, camera, lights, draws and the inspector.
pub struct FrameLoop {
    camera: Camera,
    controller: CameraController,
    keys: KeyBindings,
    input: InputState,
    lights: LightSettings,
    scene: Scene,
    lighting: ProgramId,
    light_cube: ProgramId,
    cube: MeshId,
    diffuse: TextureId,
    specular: TextureId,
    placeholder: TextureId,
    mouse_unlocked: bool,
    toggle_held: bool,
    cursor_applied: Option<bool>,
    stats: FrameStats,
}

impl FrameLoop {
    /// Build programs, upload the cube and textures and import the configured
    /// models. Missing assets are logged and skipped.
    pub fn new<B: RenderBackend + ?Sized>(config: &SandboxConfig, backend: &mut B) -> Self {
        let lighting = backend.create_program(&lighting_program());
        let light_cube = backend.create_program(&light_cube_program());
        let cube = backend.upload_mesh("cube", &create_cube_mesh());

        let diffuse = load_texture_or_placeholder(backend, &config.assets.diffuse_texture);
        let specular = load_texture_or_placeholder(backend, &config.assets.specular_texture);
        let placeholder = backend.placeholder_texture();

        let mut scene = Scene::demo();
        for placement in &config.assets.models {
            match Model::load(&placement.path, backend) {
                Ok(model) => {
                    let transform = Transform::default()
                        .with_position(placement.position)
                        .with_rotation(placement.rotation)
                        .with_scale(placement.scale);
                    scene.add_model(model, transform);
                }
                Err(err) => tracing::warn!("Skipping model: {err}"),
            }
        }

        let (width, height) = backend.viewport_size();
        tracing::info!(
            containers = scene.containers.len(),
            models = scene.models.len(),
            "scene ready"
        );

        Self {
            camera: Camera::from_config(&config.camera),
            controller: CameraController::from_config(&config.camera),
            keys: config.keys.clone(),
            input: InputState::new(width, height),
            lights: LightSettings::default(),
            scene,
            lighting,
            light_cube,
            cube,
            diffuse,
            specular,
            placeholder,
            mouse_unlocked: false,
            toggle_held: false,
            cursor_applied: None,
            stats: FrameStats::default(),
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn lights(&self) -> &LightSettings {
        &self.lights
    }

    pub fn lights_mut(&mut self) -> &mut LightSettings {
        &mut self.lights
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// True while the cursor is released for the inspector.
    pub fn is_ui_mode(&self) -> bool {
        self.mouse_unlocked
    }

    /// Finish a frame: drop the motion and scroll it consumed.
    pub fn end_frame(&mut self) {
        self.input.end_frame();
    }

    pub fn handle_event(&mut self, event: &InputEvent) {
        self.input.process_event(event);
    }

    fn binding(&self, direction: Direction) -> winit::keyboard::KeyCode {
        match direction {
            Direction::Forward => self.keys.forward,
            Direction::Backward => self.keys.backward,
            Direction::Left => self.keys.left,
            Direction::Right => self.keys.right,
            Direction::Up => self.keys.up,
            Direction::Down => self.keys.down,
        }
    }

    fn sync_cursor<W: WindowControl + ?Sized>(&mut self, window: &mut W) {
        let captured = !self.mouse_unlocked;
        if self.cursor_applied != Some(captured) {
            window.set_cursor_captured(captured);
            self.input.set_cursor_captured(captured);
            self.cursor_applied = Some(captured);
        }
    }

    /// Apply the frame's input to the camera and the UI mode.
    pub fn update<W: WindowControl + ?Sized>(&mut self, dt: f32, window: &mut W) {
        if self.input.is_key_pressed(self.keys.exit) {
            window.request_close();
        }

        // toggle on the press edge only
        let toggle_down = self.input.is_key_pressed(self.keys.toggle_cursor);
        if toggle_down && !self.toggle_held {
            self.mouse_unlocked = !self.mouse_unlocked;
            tracing::debug!(ui_mode = self.mouse_unlocked, "cursor mode toggled");
        }
        self.toggle_held = toggle_down;
        self.sync_cursor(window);

        if !self.mouse_unlocked {
            for direction in Direction::ALL {
                if self.input.is_key_pressed(self.binding(direction)) {
                    self.controller.process_move(&mut self.camera, direction, dt);
                }
            }
            let delta = self.input.mouse_delta();
            if delta != glam::Vec2::ZERO {
                self.controller.process_look(&mut self.camera, delta.x, delta.y, true);
            }
            let scroll = self.input.scroll_delta().y;
            if scroll != 0.0 {
                self.controller.process_zoom(&mut self.camera, scroll);
            }
        }

        self.stats.record(dt, &self.camera);
    }

    fn set_model<B: RenderBackend + ?Sized>(backend: &mut B, model: Mat4, with_normals: bool) {
        backend.set_uniform("model", model.into());
        if with_normals {
            backend.set_uniform("normal_matrix", normal_matrix(model).into());
        }
    }

    fn set_lighting_uniforms<B: RenderBackend + ?Sized>(&self, backend: &mut B) {
        backend.set_uniform("view_pos", self.camera.position.into());
        backend.set_uniform("material.shininess", MATERIAL_SHININESS.into());

        let dir = self.lights.directional_terms();
        backend.set_uniform("dir_light.direction", self.lights.directional.direction.into());
        backend.set_uniform("dir_light.ambient", dir.ambient.into());
        backend.set_uniform("dir_light.diffuse", dir.diffuse.into());
        backend.set_uniform("dir_light.specular", dir.specular.into());

        let point = self.lights.point_terms();
        let att = self.lights.point.attenuation;
        for (i, position) in self.scene.point_light_positions.iter().enumerate() {
            let name = |field: &str| format!("point_lights[{i}].{field}");
            backend.set_uniform(&name("position"), (*position).into());
            backend.set_uniform(&name("ambient"), point.ambient.into());
            backend.set_uniform(&name("diffuse"), point.diffuse.into());
            backend.set_uniform(&name("specular"), point.specular.into());
            backend.set_uniform(&name("constant"), att.constant.into());
            backend.set_uniform(&name("linear"), att.linear.into());
            backend.set_uniform(&name("quadratic"), att.quadratic.into());
        }

        let spot = &self.lights.spot;
        let terms = self.lights.spot_terms();
        backend.set_uniform("spot_light.position", self.camera.position.into());
        backend.set_uniform("spot_light.direction", self.camera.front().into());
        backend.set_uniform("spot_light.ambient", terms.ambient.into());
        backend.set_uniform("spot_light.diffuse", terms.diffuse.into());
        backend.set_uniform("spot_light.specular", terms.specular.into());
        backend.set_uniform("spot_light.constant", spot.attenuation.constant.into());
        backend.set_uniform("spot_light.linear", spot.attenuation.linear.into());
        backend.set_uniform("spot_light.quadratic", spot.attenuation.quadratic.into());
        backend.set_uniform("spot_light.cut_off", spot.inner_cutoff_deg.to_radians().cos().into());
        backend.set_uniform("spot_light.outer_cut_off", spot.outer_cutoff_deg.to_radians().cos().into());
        backend.set_uniform("spot_light.enabled", spot.enabled.into());
    }

    /// Draw one frame: clear, inspector, lit geometry, lamps, overlay, present.
    pub fn render<B, U>(&mut self, backend: &mut B, ui: &mut U) -> Result<(), RenderError>
    where
        B: RenderBackend + ?Sized,
        U: DebugUi + ?Sized,
    {
        backend.clear(self.lights.clear_color);

        ui.begin_frame();
        ui.render_panel(InspectorPanel {
            clear_color: &mut self.lights.clear_color,
            mouse_unlocked: &mut self.mouse_unlocked,
            directional: &mut self.lights.directional,
            point: &mut self.lights.point,
            spot: &mut self.lights.spot,
            stats: &self.stats,
        });
        constrain_spot_cone(&mut self.lights.spot);

        let (width, height) = backend.viewport_size();
        let view = self.camera.view_matrix();
        let projection = self.camera.projection_matrix(width, height);

        backend.bind_program(self.lighting);
        backend.set_uniform("view", view.into());
        backend.set_uniform("projection", projection.into());
        self.set_lighting_uniforms(backend);

        backend.bind_texture(0, self.diffuse);
        backend.bind_texture(1, self.specular);
        for container in &self.scene.containers {
            Self::set_model(backend, container.model_matrix(), true);
            backend.draw(self.cube);
        }

        for instance in &self.scene.models {
            Self::set_model(backend, instance.transform.model_matrix(), true);
            for mesh in &instance.model.meshes {
                backend.bind_texture(0, mesh.diffuse.unwrap_or(self.placeholder));
                backend.bind_texture(1, mesh.specular.unwrap_or(self.placeholder));
                backend.draw(mesh.mesh);
            }
        }

        backend.bind_program(self.light_cube);
        backend.set_uniform("view", view.into());
        backend.set_uniform("projection", projection.into());
        backend.set_uniform("light_color", self.lights.lamp_color().into());
        for lamp in self.scene.lamps() {
            Self::set_model(backend, lamp.model_matrix(), false);
            backend.draw(self.cube);
        }

        if let Some(overlay) = ui.end_frame() {
            backend.draw_overlay(overlay);
        }
        backend.present()
    }
}
