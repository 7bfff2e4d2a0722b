use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

pub const PITCH_LIMIT: f32 = 89.0;
pub const FOV_MIN: f32 = 1.0;
pub const FOV_MAX: f32 = 45.0;

/// First-person camera. Angles are in degrees. The basis vectors are derived
/// from yaw and pitch and can only change through the orientation setters.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub near: f32,
    pub far: f32,
    /// Fixed at construction; the basis is derived from it.
    world_up: Vec3,
    /// Vertical field of view, always within [FOV_MIN, FOV_MAX].
    fov: f32,
    yaw: f32,
    pitch: f32,
    front: Vec3,
    right: Vec3,
    up: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl Camera {
    pub fn new(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            world_up,
            fov: FOV_MAX,
            near: 0.1,
            far: 100.0,
            yaw,
            pitch,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
        };
        camera.update_basis_vectors();
        camera
    }

    pub fn from_config(cfg: &CameraConfig) -> Self {
        let mut camera = Self::new(cfg.position, Vec3::Y, cfg.yaw, cfg.pitch);
        camera.set_fov(cfg.fov);
        camera.near = cfg.near;
        camera.far = cfg.far;
        camera
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn world_up(&self) -> Vec3 {
        self.world_up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Set yaw and pitch, clamping pitch to +-89 when `constrain_pitch` is set.
    pub fn set_orientation(&mut self, yaw: f32, pitch: f32, constrain_pitch: bool) {
        self.yaw = yaw;
        self.pitch = if constrain_pitch {
            pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT)
        } else {
            pitch
        };
        self.update_basis_vectors();
    }

    /// Recompute front/right/up from the Euler angles.
    pub fn update_basis_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    pub fn set_fov(&mut self, fov: f32) {
        self.fov = fov.clamp(FOV_MIN, FOV_MAX);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Perspective projection for a viewport. A zero height is treated as 1
    /// so minimised windows do not produce a NaN aspect ratio.
    pub fn projection_matrix(&self, width: u32, height: u32) -> Mat4 {
        let aspect = width as f32 / height.max(1) as f32;
        Mat4::perspective_rh(self.fov.to_radians(), aspect, self.near, self.far)
    }
}
