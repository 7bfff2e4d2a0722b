use std::path::Path;

use glam::{Mat3, Mat4, Vec3};

use super::{MeshSource, ModelData, TextureKind, TextureRef, TextureSource};
use crate::error::AssetError;
use crate::utils::{MeshData, TextureImage, Vertex};

/// Import a `.gltf` or `.glb` file. Node transforms are baked into the
/// vertices so the result can be placed with a single model matrix.
pub fn load_gltf(path: &Path) -> Result<ModelData, AssetError> {
    let (document, buffers, images) = gltf::import(path).map_err(|source| AssetError::Gltf {
        path: path.to_path_buf(),
        source,
    })?;
    let key_prefix = path.to_string_lossy();
    let images: Vec<Option<TextureImage>> = images.iter().map(convert_image).collect();

    let mut model = ModelData::default();
    match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => {
            for node in scene.nodes() {
                process_node(&node, Mat4::IDENTITY, &buffers, &images, &key_prefix, &mut model);
            }
        }
        None => {
            for mesh in document.meshes() {
                process_mesh(&mesh, Mat4::IDENTITY, &buffers, &images, &key_prefix, &mut model);
            }
        }
    }
    Ok(model)
}

fn process_node(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    images: &[Option<TextureImage>],
    key_prefix: &str,
    model: &mut ModelData,
) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        process_mesh(&mesh, world, buffers, images, key_prefix, model);
    }
    for child in node.children() {
        process_node(&child, world, buffers, images, key_prefix, model);
    }
}

fn process_mesh(
    mesh: &gltf::Mesh,
    world: Mat4,
    buffers: &[gltf::buffer::Data],
    images: &[Option<TextureImage>],
    key_prefix: &str,
    model: &mut ModelData,
) {
    let name = mesh.name().unwrap_or("unnamed");
    let normal_matrix = Mat3::from_mat4(world).inverse().transpose();

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            tracing::warn!(mesh = name, mode = ?primitive.mode(), "skipping non-triangle primitive");
            continue;
        }
        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
        let Some(positions) = reader.read_positions() else {
            tracing::warn!(mesh = name, "skipping primitive without positions");
            continue;
        };
        let mut vertices: Vec<Vertex> = positions
            .map(|p| Vertex::new(world.transform_point3(Vec3::from_array(p)).to_array(), [0.0; 3], [0.0; 2]))
            .collect();

        let has_normals = match reader.read_normals() {
            Some(normals) => {
                for (v, n) in vertices.iter_mut().zip(normals) {
                    v.normal = (normal_matrix * Vec3::from_array(n)).normalize_or_zero().to_array();
                }
                true
            }
            None => false,
        };
        if let Some(uvs) = reader.read_tex_coords(0) {
            for (v, uv) in vertices.iter_mut().zip(uvs.into_f32()) {
                v.uv = uv;
            }
        }
        if let Some(joints) = reader.read_joints(0) {
            for (v, j) in vertices.iter_mut().zip(joints.into_u16()) {
                v.bone_ids = j.map(i32::from);
            }
        }
        if let Some(weights) = reader.read_weights(0) {
            for (v, w) in vertices.iter_mut().zip(weights.into_f32()) {
                v.bone_weights = w;
            }
        }
        let indices = reader
            .read_indices()
            .map(|i| i.into_u32().collect())
            .unwrap_or_else(|| (0..vertices.len() as u32).collect());

        let mut data = MeshData { vertices, indices };
        if !has_normals {
            data.compute_normals();
        }

        let material = primitive.material();
        let mut textures = Vec::new();
        let diffuse = material
            .pbr_metallic_roughness()
            .base_color_texture()
            .map(|info| info.texture().source().index());
        let normal = material.normal_texture().map(|info| info.texture().source().index());
        for (kind, index) in [(TextureKind::Diffuse, diffuse), (TextureKind::Normal, normal)] {
            let Some(index) = index else { continue };
            if let Some(Some(image)) = images.get(index) {
                textures.push(TextureRef {
                    kind,
                    source: TextureSource::Embedded {
                        key: format!("{key_prefix}#image{index}"),
                        image: image.clone(),
                    },
                });
            }
        }

        model.meshes.push(MeshSource {
            name: name.to_string(),
            data,
            textures,
        });
    }
}

fn convert_image(image: &gltf::image::Data) -> Option<TextureImage> {
    use gltf::image::Format;

    let (channels, pixels): (u8, Vec<u8>) = match image.format {
        Format::R8 => (1, image.pixels.iter().flat_map(|&r| [r, r, r, 255]).collect()),
        Format::R8G8 => (2, image.pixels.chunks_exact(2).flat_map(|p| [p[0], p[1], 0, 255]).collect()),
        Format::R8G8B8 => (3, image.pixels.chunks_exact(3).flat_map(|p| [p[0], p[1], p[2], 255]).collect()),
        Format::R8G8B8A8 => (4, image.pixels.clone()),
        other => {
            tracing::warn!(format = ?other, "unsupported embedded image format");
            return None;
        }
    };
    Some(TextureImage {
        width: image.width,
        height: image.height,
        channels,
        pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const TRIANGLE_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "mesh": 0, "translation": [0.0, 0.0, 2.0] }],
        "meshes": [{ "name": "tri", "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }] }],
        "buffers": [{ "uri": "tri.bin", "byteLength": 44 }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 6 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ]
    }"#;

    fn triangle_bin() -> Vec<u8> {
        let mut bytes = Vec::new();
        for v in [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        for i in [0u16, 1, 2] {
            bytes.extend_from_slice(&i.to_le_bytes());
        }
        bytes.extend_from_slice(&[0, 0]);
        bytes
    }

    #[test]
    fn test_triangle_with_node_translation() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("tri.gltf"), TRIANGLE_GLTF).unwrap();
        fs::write(dir.path().join("tri.bin"), triangle_bin()).unwrap();

        let model = load_gltf(&dir.path().join("tri.gltf")).unwrap();
        assert_eq!(model.meshes.len(), 1);
        let mesh = &model.meshes[0];
        assert_eq!(mesh.name, "tri");
        assert_eq!(mesh.data.indices, vec![0, 1, 2]);
        assert_eq!(mesh.data.vertices[1].pos, [1.0, 0.0, 2.0]);
        assert_eq!(mesh.data.vertices[0].normal, [0.0, 0.0, 1.0], "missing normals are generated");
        assert!(mesh.textures.is_empty());
    }

    #[test]
    fn test_missing_file_is_gltf_error() {
        let err = load_gltf(Path::new("nowhere/scene.gltf")).unwrap_err();
        assert!(matches!(err, AssetError::Gltf { .. }));
    }

    #[test]
    fn test_rgb_images_gain_alpha() {
        let data = gltf::image::Data {
            pixels: vec![10, 20, 30],
            format: gltf::image::Format::R8G8B8,
            width: 1,
            height: 1,
        };
        let image = convert_image(&data).unwrap();
        assert_eq!(image.pixels, vec![10, 20, 30, 255]);
        assert_eq!(image.channels, 3);
    }
}
