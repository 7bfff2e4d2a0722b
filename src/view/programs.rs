//! The two shader programs the sandbox draws with.

use crate::model::scene::NUM_POINT_LIGHTS;
use crate::view::backend::{ProgramSource, TEXTURE_SLOTS};
use crate::view::uniforms::{UniformKind, UniformLayout, UniformLayoutBuilder};

const LIGHTING_VERT: &str = include_str!("shaders/lighting.vert.wgsl");
const LIGHTING_FRAG: &str = include_str!("shaders/lighting.frag.wgsl");
const LIGHT_CUBE_VERT: &str = include_str!("shaders/light_cube.vert.wgsl");
const LIGHT_CUBE_FRAG: &str = include_str!("shaders/light_cube.frag.wgsl");

fn transforms(builder: UniformLayoutBuilder) -> UniformLayoutBuilder {
    builder
        .field("model", UniformKind::Mat4)
        .field("view", UniformKind::Mat4)
        .field("projection", UniformKind::Mat4)
}

/// Mirrors `Uniforms` in lighting.frag.wgsl, member for member.
pub fn lighting_layout() -> UniformLayout {
    transforms(UniformLayout::builder())
        .field("normal_matrix", UniformKind::Mat3)
        .field("view_pos", UniformKind::Vec3)
        .structure("material", |s| s.field("shininess", UniformKind::Float))
        .structure("dir_light", |s| {
            s.field("direction", UniformKind::Vec3)
                .field("ambient", UniformKind::Vec3)
                .field("diffuse", UniformKind::Vec3)
                .field("specular", UniformKind::Vec3)
        })
        .array("point_lights", NUM_POINT_LIGHTS, |s| {
            s.field("position", UniformKind::Vec3)
                .field("constant", UniformKind::Float)
                .field("ambient", UniformKind::Vec3)
                .field("linear", UniformKind::Float)
                .field("diffuse", UniformKind::Vec3)
                .field("quadratic", UniformKind::Float)
                .field("specular", UniformKind::Vec3)
        })
        .structure("spot_light", |s| {
            s.field("position", UniformKind::Vec3)
                .field("constant", UniformKind::Float)
                .field("direction", UniformKind::Vec3)
                .field("linear", UniformKind::Float)
                .field("ambient", UniformKind::Vec3)
                .field("quadratic", UniformKind::Float)
                .field("diffuse", UniformKind::Vec3)
                .field("cut_off", UniformKind::Float)
                .field("specular", UniformKind::Vec3)
                .field("outer_cut_off", UniformKind::Float)
                .field("enabled", UniformKind::Bool)
        })
        .build()
}

pub fn light_cube_layout() -> UniformLayout {
    transforms(UniformLayout::builder())
        .field("light_color", UniformKind::Vec3)
        .build()
}

/// Textured Phong shading with one directional, four point and one spot light.
pub fn lighting_program() -> ProgramSource<'static> {
    ProgramSource {
        label: "lighting",
        vertex: LIGHTING_VERT,
        fragment: LIGHTING_FRAG,
        uniforms: lighting_layout(),
        texture_slots: TEXTURE_SLOTS,
    }
}

/// Flat-coloured lamp cubes.
pub fn light_cube_program() -> ProgramSource<'static> {
    ProgramSource {
        label: "light_cube",
        vertex: LIGHT_CUBE_VERT,
        fragment: LIGHT_CUBE_FRAG,
        uniforms: light_cube_layout(),
        texture_slots: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset(layout: &UniformLayout, name: &str) -> u32 {
        layout.field(name).map(|f| f.offset).unwrap_or_else(|| panic!("missing {name}"))
    }

    #[test]
    fn test_lighting_layout_matches_wgsl_offsets() {
        let layout = lighting_layout();
        assert_eq!(offset(&layout, "normal_matrix"), 192);
        assert_eq!(offset(&layout, "view_pos"), 240);
        assert_eq!(offset(&layout, "material.shininess"), 256);
        assert_eq!(offset(&layout, "dir_light.direction"), 272);
        assert_eq!(offset(&layout, "point_lights[0].position"), 336);
        assert_eq!(offset(&layout, "point_lights[1].position"), 400);
        assert_eq!(offset(&layout, "point_lights[3].specular"), 336 + 3 * 64 + 48);
        assert_eq!(offset(&layout, "spot_light.position"), 592);
        assert_eq!(offset(&layout, "spot_light.outer_cut_off"), 592 + 76);
        assert_eq!(offset(&layout, "spot_light.enabled"), 592 + 80);
        assert_eq!(layout.size(), 688);
    }

    #[test]
    fn test_light_cube_layout() {
        let layout = light_cube_layout();
        assert_eq!(offset(&layout, "light_color"), 192);
        assert_eq!(layout.size(), 208);
    }

    #[test]
    fn test_shaders_declare_entry_points() {
        for source in [lighting_program(), light_cube_program()] {
            assert!(source.vertex.contains("fn vs_main"), "{}", source.label);
            assert!(source.fragment.contains("fn fs_main"), "{}", source.label);
        }
        assert!(LIGHTING_FRAG.contains(&format!("array<PointLight, NUM_POINT_LIGHTS>")));
        assert!(LIGHTING_FRAG.contains(&format!("NUM_POINT_LIGHTS: u32 = {}u", NUM_POINT_LIGHTS)));
    }
}
