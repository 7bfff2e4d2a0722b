use std::path::PathBuf;

use glam::Vec3;

use crate::controller::input::KeyBindings;

/// Window creation parameters.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Lightbox".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Starting pose and tuning of the fly camera.
#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub move_speed: f32,
    pub mouse_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            yaw: -90.0,
            pitch: 0.0,
            fov: 45.0,
            near: 0.1,
            far: 100.0,
            move_speed: 2.5,
            mouse_sensitivity: 0.05,
        }
    }
}

/// A model file placed in the scene at startup.
#[derive(Debug, Clone)]
pub struct ModelPlacement {
    pub path: PathBuf,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

#[derive(Debug, Clone)]
pub struct AssetConfig {
    pub diffuse_texture: PathBuf,
    pub specular_texture: PathBuf,
    pub models: Vec<ModelPlacement>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            diffuse_texture: PathBuf::from("assets/textures/container2.png"),
            specular_texture: PathBuf::from("assets/textures/container2_specular.png"),
            models: vec![ModelPlacement {
                path: PathBuf::from("assets/models/backpack/backpack.obj"),
                position: Vec3::new(0.0, -1.5, -6.0),
                rotation: Vec3::ZERO,
                scale: Vec3::splat(0.5),
            }],
        }
    }
}

/// Everything the sandbox needs to start. There is no config file; edit the
/// defaults or build one in code.
#[derive(Debug, Clone, Default)]
pub struct SandboxConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub keys: KeyBindings,
    pub assets: AssetConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_defaults() {
        let cfg = CameraConfig::default();
        assert_eq!(cfg.position, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(cfg.yaw, -90.0);
        assert_eq!(cfg.move_speed, 2.5);
        assert_eq!(cfg.mouse_sensitivity, 0.05);
    }

    #[test]
    fn test_asset_paths_are_relative() {
        let cfg = SandboxConfig::default();
        assert!(cfg.assets.diffuse_texture.is_relative());
        assert!(cfg.assets.models.iter().all(|m| m.path.is_relative()));
    }
}
