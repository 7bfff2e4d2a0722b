use crate::config::CameraConfig;
use crate::model::Camera;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Forward,
        Direction::Backward,
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];
}

/// Handles camera movement and orientation
#[derive(Debug, Clone)]
pub struct CameraController {
    pub move_speed: f32,
    pub mouse_sensitivity: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            move_speed: 2.5,
            mouse_sensitivity: 0.05,
        }
    }

    pub fn from_config(cfg: &CameraConfig) -> Self {
        Self {
            move_speed: cfg.move_speed,
            mouse_sensitivity: cfg.mouse_sensitivity,
        }
    }

    /// Move along one basis direction for `dt` seconds. Up and down follow
    /// the world up axis, not the camera's.
    pub fn process_move(&self, camera: &mut Camera, direction: Direction, dt: f32) {
        let velocity = self.move_speed * dt;
        let step = match direction {
            Direction::Forward => camera.front(),
            Direction::Backward => -camera.front(),
            Direction::Left => -camera.right(),
            Direction::Right => camera.right(),
            Direction::Up => camera.world_up(),
            Direction::Down => -camera.world_up(),
        };
        camera.position += step * velocity;
    }

    /// Apply a mouse delta (Y up) to yaw and pitch.
    pub fn process_look(&self, camera: &mut Camera, dx: f32, dy: f32, constrain_pitch: bool) {
        let yaw = camera.yaw() + dx * self.mouse_sensitivity;
        let pitch = camera.pitch() + dy * self.mouse_sensitivity;
        camera.set_orientation(yaw, pitch, constrain_pitch);
    }

    /// Scroll up narrows the field of view.
    pub fn process_zoom(&self, camera: &mut Camera, scroll_y: f32) {
        camera.set_fov(camera.fov() - scroll_y);
    }
}
