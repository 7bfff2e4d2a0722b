// CONTROLLER: input, camera movement and the per-frame loop
pub mod camera_controller;
pub mod frame_loop;
pub mod input;

pub use camera_controller::{CameraController, Direction};
pub use frame_loop::{FrameLoop, FrameStats, WindowControl};
pub use input::{InputEvent, InputState, KeyBindings};
