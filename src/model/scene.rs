use glam::Vec3;

use crate::model::assets::Model;
use crate::model::transform::Transform;

pub const CONTAINER_POSITIONS: [Vec3; 10] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
    Vec3::new(2.4, -0.4, -3.5),
    Vec3::new(-1.7, 3.0, -7.5),
    Vec3::new(1.3, -2.0, -2.5),
    Vec3::new(1.5, 2.0, -2.5),
    Vec3::new(1.5, 0.2, -1.5),
    Vec3::new(-1.3, 1.0, -1.5),
];

pub const POINT_LIGHT_POSITIONS: [Vec3; 4] = [
    Vec3::new(0.7, 0.2, 2.0),
    Vec3::new(2.3, -3.3, -4.0),
    Vec3::new(-4.0, 2.0, -12.0),
    Vec3::new(0.0, 0.0, -3.0),
];

/// Number of point lights the lighting program declares.
pub const NUM_POINT_LIGHTS: usize = POINT_LIGHT_POSITIONS.len();

const CONTAINER_TILT_AXIS: Vec3 = Vec3::new(1.0, 0.3, 0.5);
const CONTAINER_TILT_STEP_DEG: f32 = 20.0;
const LAMP_SCALE: f32 = 0.2;

#[derive(Debug, Clone)]
pub struct ModelInstance {
    pub model: Model,
    pub transform: Transform,
}

/// Everything drawn each frame, grouped by the program that draws it.
#[derive(Debug, Clone)]
pub struct Scene {
    pub containers: Vec<Transform>,
    pub point_light_positions: [Vec3; NUM_POINT_LIGHTS],
    pub models: Vec<ModelInstance>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::demo()
    }
}

impl Scene {
    /// Ten tilted containers and four point lights.
    pub fn demo() -> Self {
        let containers = CONTAINER_POSITIONS
            .iter()
            .enumerate()
            .map(|(i, pos)| {
                let rotation = Transform::euler_from_axis_angle(CONTAINER_TILT_AXIS, CONTAINER_TILT_STEP_DEG * i as f32);
                Transform::default().with_position(*pos).with_rotation(rotation)
            })
            .collect();
        Self {
            containers,
            point_light_positions: POINT_LIGHT_POSITIONS,
            models: Vec::new(),
        }
    }

    /// One small cube per point light.
    pub fn lamps(&self) -> impl Iterator<Item = Transform> + '_ {
        self.point_light_positions
            .iter()
            .map(|pos| Transform::default().with_position(*pos).with_scale(Vec3::splat(LAMP_SCALE)))
    }

    pub fn add_model(&mut self, model: Model, transform: Transform) {
        self.models.push(ModelInstance { model, transform });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_scene_layout() {
        let scene = Scene::demo();
        assert_eq!(scene.containers.len(), 10);
        assert_eq!(scene.containers[0].rotation, Vec3::ZERO);
        assert_eq!(scene.containers[3].position, Vec3::new(-3.8, -2.0, -12.3));
        assert!(scene.models.is_empty());
    }

    #[test]
    fn test_lamps_follow_point_lights() {
        let mut scene = Scene::demo();
        scene.point_light_positions[1] = Vec3::new(9.0, 9.0, 9.0);
        let lamps: Vec<Transform> = scene.lamps().collect();
        assert_eq!(lamps.len(), NUM_POINT_LIGHTS);
        assert_eq!(lamps[1].position, Vec3::new(9.0, 9.0, 9.0));
        assert_eq!(lamps[1].scale, Vec3::splat(0.2));
    }
}
