// MODEL: scene data, camera, lights and assets
pub mod assets;
pub mod camera;
pub mod light;
pub mod scene;
pub mod transform;

pub use assets::Model;
pub use camera::Camera;
pub use light::{Attenuation, DirectionalLight, LightSettings, PointLight, SpotLight};
pub use scene::Scene;
pub use transform::Transform;
