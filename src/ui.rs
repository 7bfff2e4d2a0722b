use std::sync::Arc;

use egui::Context;
use glam::Vec3;
use winit::window::Window;

use crate::controller::frame_loop::FrameStats;
use crate::model::{DirectionalLight, PointLight, SpotLight};

pub const SPOT_INNER_RANGE: (f32, f32) = (1.0, 45.0);
pub const SPOT_OUTER_MAX: f32 = 50.0;

/// Tessellated UI ready for the renderer's overlay pass.
pub struct UiOverlay {
    pub primitives: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

/// Everything the inspector may edit, borrowed for one `render_panel` call.
pub struct InspectorPanel<'a> {
    pub clear_color: &'a mut Vec3,
    pub mouse_unlocked: &'a mut bool,
    pub directional: &'a mut DirectionalLight,
    pub point: &'a mut PointLight,
    pub spot: &'a mut SpotLight,
    pub stats: &'a FrameStats,
}

/// Immediate-mode debug UI driven by the frame loop.
pub trait DebugUi {
    fn begin_frame(&mut self);
    fn render_panel(&mut self, panel: InspectorPanel<'_>);
    /// Finish the frame. `None` means there is nothing to draw.
    fn end_frame(&mut self) -> Option<UiOverlay>;
}

/// Keep the spot cone valid: inner in [1, 45], outer in [inner, 50].
pub fn constrain_spot_cone(spot: &mut SpotLight) {
    spot.inner_cutoff_deg = spot.inner_cutoff_deg.clamp(SPOT_INNER_RANGE.0, SPOT_INNER_RANGE.1);
    spot.outer_cutoff_deg = spot.outer_cutoff_deg.clamp(spot.inner_cutoff_deg, SPOT_OUTER_MAX);
}

fn color_edit(ui: &mut egui::Ui, label: &str, color: &mut Vec3) {
    ui.horizontal(|ui| {
        let mut rgb = color.to_array();
        if ui.color_edit_button_rgb(&mut rgb).changed() {
            *color = Vec3::from_array(rgb);
        }
        ui.label(label);
    });
}

/// Build the "Inspector" window.
pub fn draw_inspector(ctx: &Context, panel: InspectorPanel<'_>) {
    let InspectorPanel {
        clear_color,
        mouse_unlocked,
        directional,
        point,
        spot,
        stats,
    } = panel;

    egui::Window::new("Inspector")
        .default_pos([8.0, 8.0])
        .default_width(260.0)
        .show(ctx, |ui| {
            ui.label(format!("FPS: {:.1} ({:.2} ms)", stats.fps, stats.frame_time_ms));
            ui.label(
                egui::RichText::new(format!(
                    "Pos: {:.2}, {:.2}, {:.2}  FOV: {:.0}",
                    stats.camera_position.x, stats.camera_position.y, stats.camera_position.z, stats.fov
                ))
                .small(),
            );
            color_edit(ui, "Background", clear_color);
            ui.checkbox(mouse_unlocked, "Unlock Mouse (Left Alt)");
            ui.separator();

            egui::CollapsingHeader::new("Directional Light")
                .default_open(true)
                .show(ui, |ui| {
                    ui.checkbox(&mut directional.enabled, "Enable");
                    ui.add(egui::Slider::new(&mut directional.direction.x, -1.0..=1.0).text("Dir X"));
                    ui.add(egui::Slider::new(&mut directional.direction.y, -1.0..=1.0).text("Dir Y"));
                    ui.add(egui::Slider::new(&mut directional.direction.z, -1.0..=1.0).text("Dir Z"));
                    color_edit(ui, "Color", &mut directional.color);
                });

            egui::CollapsingHeader::new("Point Lights")
                .default_open(true)
                .show(ui, |ui| {
                    ui.checkbox(&mut point.enabled, "Enable");
                    color_edit(ui, "Color", &mut point.color);
                    ui.add(
                        egui::Slider::new(&mut point.attenuation.linear, 0.001..=1.0)
                            .logarithmic(true)
                            .text("Linear"),
                    );
                    ui.add(
                        egui::Slider::new(&mut point.attenuation.quadratic, 0.0001..=1.0)
                            .logarithmic(true)
                            .text("Quadratic"),
                    );
                });

            egui::CollapsingHeader::new("Spot Light")
                .default_open(true)
                .show(ui, |ui| {
                    ui.checkbox(&mut spot.enabled, "Enable");
                    color_edit(ui, "Color", &mut spot.color);
                    ui.add(
                        egui::Slider::new(&mut spot.inner_cutoff_deg, SPOT_INNER_RANGE.0..=SPOT_INNER_RANGE.1)
                            .text("Inner Cutoff"),
                    );
                    let inner = spot.inner_cutoff_deg;
                    ui.add(egui::Slider::new(&mut spot.outer_cutoff_deg, inner..=SPOT_OUTER_MAX).text("Outer Cutoff"));
                });
        });

    constrain_spot_cone(spot);
}

/// egui on top of winit; the overlay is drawn by the renderer.
pub struct EguiLayer {
    ctx: Context,
    state: egui_winit::State,
    window: Arc<Window>,
}

impl EguiLayer {
    pub fn new(window: Arc<Window>) -> Self {
        let ctx = Context::default();
        let state = egui_winit::State::new(ctx.clone(), egui::ViewportId::ROOT, &window, None, None, None);
        Self { ctx, state, window }
    }

    /// Feed a window event to egui. Returns true when egui consumed it.
    pub fn on_window_event(&mut self, event: &winit::event::WindowEvent) -> bool {
        self.state.on_window_event(&self.window, event).consumed
    }
}

impl DebugUi for EguiLayer {
    fn begin_frame(&mut self) {
        let raw_input = self.state.take_egui_input(&self.window);
        self.ctx.begin_pass(raw_input);
    }

    fn render_panel(&mut self, panel: InspectorPanel<'_>) {
        draw_inspector(&self.ctx, panel);
    }

    fn end_frame(&mut self) -> Option<UiOverlay> {
        let output = self.ctx.end_pass();
        self.state.handle_platform_output(&self.window, output.platform_output);
        let primitives = self.ctx.tessellate(output.shapes, output.pixels_per_point);
        Some(UiOverlay {
            primitives,
            textures_delta: output.textures_delta,
            pixels_per_point: output.pixels_per_point,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outer_cutoff_follows_inner() {
        let mut spot = SpotLight {
            inner_cutoff_deg: 20.0,
            outer_cutoff_deg: 15.0,
            ..SpotLight::default()
        };
        constrain_spot_cone(&mut spot);
        assert_eq!(spot.inner_cutoff_deg, 20.0);
        assert_eq!(spot.outer_cutoff_deg, 20.0);
    }

    #[test]
    fn test_cutoffs_clamped_to_slider_ranges() {
        let mut spot = SpotLight {
            inner_cutoff_deg: 80.0,
            outer_cutoff_deg: 90.0,
            ..SpotLight::default()
        };
        constrain_spot_cone(&mut spot);
        assert_eq!(spot.inner_cutoff_deg, 45.0);
        assert_eq!(spot.outer_cutoff_deg, 50.0);
    }

    #[test]
    fn test_headless_inspector_keeps_values() {
        let ctx = Context::default();
        let mut clear = Vec3::splat(0.05);
        let mut unlocked = false;
        let mut directional = DirectionalLight::default();
        let mut point = PointLight::default();
        let mut spot = SpotLight {
            inner_cutoff_deg: 30.0,
            outer_cutoff_deg: 10.0,
            ..SpotLight::default()
        };
        let stats = FrameStats::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            draw_inspector(
                ctx,
                InspectorPanel {
                    clear_color: &mut clear,
                    mouse_unlocked: &mut unlocked,
                    directional: &mut directional,
                    point: &mut point,
                    spot: &mut spot,
                    stats: &stats,
                },
            );
        });
        assert_eq!(clear, Vec3::splat(0.05));
        assert!(!unlocked);
        assert_eq!(point, PointLight::default());
        assert!(spot.outer_cutoff_deg >= spot.inner_cutoff_deg);
    }
}
