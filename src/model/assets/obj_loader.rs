//! Wavefront OBJ + MTL reader.
//!
//! Supports `v`/`vt`/`vn`, polygon faces (fan triangulated, negative indices
//! allowed), `o`/`g`/`usemtl` mesh splits and the diffuse, specular and bump
//! maps of referenced material libraries. UVs are flipped to a top-left origin.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use glam::{Vec2, Vec3};

use super::{MeshSource, ModelData, TextureKind, TextureRef, TextureSource};
use crate::error::AssetError;
use crate::utils::{MeshData, Vertex};

#[derive(Debug, Clone, Copy)]
struct FaceIndex {
    v: i64,
    vt: Option<i64>,
    vn: Option<i64>,
    line: usize,
}

#[derive(Debug, Default)]
struct ObjGroup {
    name: String,
    material: Option<String>,
    triangles: Vec<[FaceIndex; 3]>,
}

/// Raw contents of one OBJ file.
#[derive(Debug, Default)]
pub struct ParsedObj {
    positions: Vec<Vec3>,
    uvs: Vec<Vec2>,
    normals: Vec<Vec3>,
    groups: Vec<ObjGroup>,
    pub material_libs: Vec<String>,
}

/// Texture maps of one `newmtl` block, relative paths already resolved.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ObjMaterial {
    pub diffuse: Option<PathBuf>,
    pub specular: Option<PathBuf>,
    pub normal: Option<PathBuf>,
}

pub fn load_obj(path: &Path) -> Result<ModelData, AssetError> {
    let source = read(path)?;
    let parsed = parse_obj(&source, path)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));

    let mut materials = HashMap::new();
    for lib in &parsed.material_libs {
        let lib_path = base.join(lib);
        match read(&lib_path) {
            Ok(text) => materials.extend(parse_mtl(&text, lib_path.parent().unwrap_or(base))),
            Err(err) => tracing::warn!("skipping material library: {err}"),
        }
    }

    parsed.into_model(path, &materials)
}

fn read(path: &Path) -> Result<String, AssetError> {
    fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_obj(source: &str, path: &Path) -> Result<ParsedObj, AssetError> {
    let mut obj = ParsedObj::default();
    let mut current = ObjGroup {
        name: "default".to_string(),
        ..Default::default()
    };

    for (line_no, line) in source.lines().enumerate() {
        let line_no = line_no + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut parts = trimmed.split_whitespace();
        let Some(tag) = parts.next() else {
            continue;
        };
        let parse_err = |message: String| AssetError::Parse {
            path: path.to_path_buf(),
            line: line_no,
            message,
        };
        match tag {
            "v" => obj.positions.push(parse_vec3(parts).map_err(parse_err)?),
            "vn" => obj.normals.push(parse_vec3(parts).map_err(parse_err)?),
            "vt" => {
                let values = parse_floats(parts, 1).map_err(parse_err)?;
                obj.uvs.push(Vec2::new(values[0], values.get(1).copied().unwrap_or(0.0)));
            }
            "f" => {
                let polygon = parts
                    .map(|p| parse_face_index(p, line_no))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(parse_err)?;
                if polygon.len() < 3 {
                    return Err(parse_err("faces must reference at least 3 vertices".to_string()));
                }
                for i in 1..polygon.len() - 1 {
                    current.triangles.push([polygon[0], polygon[i], polygon[i + 1]]);
                }
            }
            "o" | "g" => {
                let name = parts.collect::<Vec<_>>().join(" ");
                let material = current.material.clone();
                obj.push_group(&mut current);
                current.name = name;
                current.material = material;
            }
            "usemtl" => {
                let material = parts.next().map(str::to_string);
                if !current.triangles.is_empty() {
                    let name = current.name.clone();
                    obj.push_group(&mut current);
                    current.name = name;
                }
                current.material = material;
            }
            "mtllib" => obj.material_libs.extend(parts.map(str::to_string)),
            _ => {}
        }
    }
    obj.push_group(&mut current);
    Ok(obj)
}

impl ParsedObj {
    fn push_group(&mut self, current: &mut ObjGroup) {
        let group = std::mem::take(current);
        if !group.triangles.is_empty() {
            self.groups.push(group);
        }
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    fn into_model(self, path: &Path, materials: &HashMap<String, ObjMaterial>) -> Result<ModelData, AssetError> {
        let mut meshes = Vec::with_capacity(self.groups.len());
        for group in &self.groups {
            let data = self.build_mesh(group, path)?;
            let mut textures = Vec::new();
            if let Some(material) = group.material.as_ref().and_then(|m| materials.get(m)) {
                let maps = [
                    (TextureKind::Diffuse, &material.diffuse),
                    (TextureKind::Specular, &material.specular),
                    (TextureKind::Normal, &material.normal),
                ];
                for (kind, map) in maps {
                    if let Some(file) = map {
                        textures.push(TextureRef {
                            kind,
                            source: TextureSource::File(file.clone()),
                        });
                    }
                }
            }
            meshes.push(MeshSource {
                name: group.name.clone(),
                data,
                textures,
            });
        }
        Ok(ModelData { meshes })
    }

    fn build_mesh(&self, group: &ObjGroup, path: &Path) -> Result<MeshData, AssetError> {
        let mut lookup: HashMap<(usize, Option<usize>, Option<usize>), u32> = HashMap::new();
        let mut mesh = MeshData::default();
        let mut missing_normals = Vec::new();

        for triangle in &group.triangles {
            for idx in triangle {
                let bad_index = |what: &str| AssetError::Parse {
                    path: path.to_path_buf(),
                    line: idx.line,
                    message: format!("{what} index out of range"),
                };
                let v = resolve_index(idx.v, self.positions.len()).ok_or_else(|| bad_index("vertex"))?;
                let vt = match idx.vt {
                    Some(i) => Some(resolve_index(i, self.uvs.len()).ok_or_else(|| bad_index("texcoord"))?),
                    None => None,
                };
                let vn = match idx.vn {
                    Some(i) => Some(resolve_index(i, self.normals.len()).ok_or_else(|| bad_index("normal"))?),
                    None => None,
                };

                let next = mesh.vertices.len() as u32;
                let index = *lookup.entry((v, vt, vn)).or_insert_with(|| {
                    let uv = vt.map(|i| self.uvs[i]).unwrap_or(Vec2::ZERO);
                    let normal = vn.map(|i| self.normals[i]).unwrap_or(Vec3::ZERO);
                    mesh.vertices.push(Vertex::new(
                        self.positions[v].to_array(),
                        normal.to_array(),
                        [uv.x, 1.0 - uv.y],
                    ));
                    missing_normals.push(vn.is_none());
                    next
                });
                mesh.indices.push(index);
            }
        }

        if missing_normals.contains(&true) {
            mesh.fill_missing_normals(&missing_normals);
        }
        Ok(mesh)
    }
}

/// 1-based positive or end-relative negative index to a 0-based one.
fn resolve_index(index: i64, len: usize) -> Option<usize> {
    if index > 0 {
        let zero_based = (index - 1) as usize;
        (zero_based < len).then_some(zero_based)
    } else if index < 0 {
        let back = index.unsigned_abs() as usize;
        (back <= len).then(|| len - back)
    } else {
        None
    }
}

fn parse_floats<'a>(parts: impl Iterator<Item = &'a str>, min: usize) -> Result<Vec<f32>, String> {
    let values = parts
        .map(|p| p.parse::<f32>().map_err(|e| format!("invalid number '{p}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    if values.len() < min {
        return Err(format!("expected at least {min} components, found {}", values.len()));
    }
    Ok(values)
}

fn parse_vec3<'a>(parts: impl Iterator<Item = &'a str>) -> Result<Vec3, String> {
    let values = parse_floats(parts, 3)?;
    Ok(Vec3::new(values[0], values[1], values[2]))
}

fn parse_face_index(part: &str, line: usize) -> Result<FaceIndex, String> {
    let mut segments = part.split('/');
    let parse = |s: Option<&str>| -> Result<Option<i64>, String> {
        match s {
            None | Some("") => Ok(None),
            Some(s) => s
                .parse::<i64>()
                .map(Some)
                .map_err(|e| format!("invalid face index '{part}': {e}")),
        }
    };
    let v = parse(segments.next())?.ok_or_else(|| format!("missing vertex index in '{part}'"))?;
    let vt = parse(segments.next())?;
    let vn = parse(segments.next())?;
    Ok(FaceIndex { v, vt, vn, line })
}

/// Parse an MTL file. Map paths are resolved against `base`; map options
/// such as `-bm 0.5` are skipped by taking the last token.
pub fn parse_mtl(source: &str, base: &Path) -> HashMap<String, ObjMaterial> {
    let mut materials = HashMap::new();
    let mut current: Option<(String, ObjMaterial)> = None;

    for line in source.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut parts = trimmed.split_whitespace();
        let Some(tag) = parts.next() else {
            continue;
        };
        if tag == "newmtl" {
            if let Some((name, material)) = current.take() {
                materials.insert(name, material);
            }
            let name = parts.collect::<Vec<_>>().join(" ");
            current = Some((name, ObjMaterial::default()));
            continue;
        }
        let Some((_, material)) = current.as_mut() else {
            continue;
        };
        let Some(file) = parts.last() else {
            continue;
        };
        let file = base.join(file.replace('\\', "/"));
        match tag {
            "map_Kd" => material.diffuse = Some(file),
            "map_Ks" => material.specular = Some(file),
            "map_Bump" | "map_bump" | "bump" | "norm" => material.normal = Some(file),
            _ => {}
        }
    }
    if let Some((name, material)) = current {
        materials.insert(name, material);
    }
    materials
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
# a textured quad
mtllib quad.mtl
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
o quad
usemtl wood
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    #[test]
    fn test_quad_is_fan_triangulated_and_deduplicated() {
        let parsed = parse_obj(QUAD, Path::new("quad.obj")).unwrap();
        assert_eq!(parsed.group_count(), 1);
        assert_eq!(parsed.material_libs, vec!["quad.mtl".to_string()]);
        let model = parsed.into_model(Path::new("quad.obj"), &HashMap::new()).unwrap();
        let mesh = &model.meshes[0];
        assert_eq!(mesh.name, "quad");
        assert_eq!(mesh.data.vertices.len(), 4);
        assert_eq!(mesh.data.indices, vec![0, 1, 2, 0, 2, 3]);
        // v is flipped to a top-left origin
        assert_eq!(mesh.data.vertices[0].uv, [0.0, 1.0]);
        assert_eq!(mesh.data.vertices[2].uv, [1.0, 0.0]);
    }

    #[test]
    fn test_generated_normals_keep_authored_ones() {
        let source = "\
v 0 0 0
v 0 1 0
v 0 0 1
v 0 0 0
v 1 0 0
v 0 1 0
vn 1 0 0
f 1//1 2//1 3//1
f 4 5 6
";
        let parsed = parse_obj(source, Path::new("mixed.obj")).unwrap();
        let model = parsed.into_model(Path::new("mixed.obj"), &HashMap::new()).unwrap();
        let vertices = &model.meshes[0].data.vertices;
        assert_eq!(vertices.len(), 6);
        for v in &vertices[..3] {
            assert_eq!(v.normal, [1.0, 0.0, 0.0]);
        }
        for v in &vertices[3..] {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_negative_indices_are_relative() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let parsed = parse_obj(src, Path::new("tri.obj")).unwrap();
        let model = parsed.into_model(Path::new("tri.obj"), &HashMap::new()).unwrap();
        let mesh = &model.meshes[0].data;
        assert_eq!(mesh.vertices[2].pos, [0.0, 1.0, 0.0]);
        // no vn in the file, so normals are generated
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_out_of_range_index_reports_line() {
        let src = "v 0 0 0\nv 1 0 0\n\nf 1 2 9\n";
        let parsed = parse_obj(src, Path::new("bad.obj")).unwrap();
        let err = parsed.into_model(Path::new("bad.obj"), &HashMap::new()).unwrap_err();
        match err {
            AssetError::Parse { line, .. } => assert_eq!(line, 4),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_malformed_vertex_is_rejected() {
        let err = parse_obj("v 1 two 3\n", Path::new("bad.obj")).unwrap_err();
        assert!(matches!(err, AssetError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_usemtl_splits_meshes() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl a\nf 1 2 3\nusemtl b\nf 1 3 2\n";
        let parsed = parse_obj(src, Path::new("two.obj")).unwrap();
        assert_eq!(parsed.group_count(), 2);
    }

    #[test]
    fn test_mtl_maps_resolve_against_base() {
        let mtl = "newmtl wood\nKd 1 1 1\nmap_Kd diffuse.png\nmap_Ks spec.png\nmap_Bump -bm 0.5 normal.png\n";
        let materials = parse_mtl(mtl, Path::new("models/crate"));
        let wood = &materials["wood"];
        assert_eq!(wood.diffuse, Some(PathBuf::from("models/crate/diffuse.png")));
        assert_eq!(wood.specular, Some(PathBuf::from("models/crate/spec.png")));
        assert_eq!(wood.normal, Some(PathBuf::from("models/crate/normal.png")));
    }

    #[test]
    fn test_load_obj_attaches_material_textures() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("quad.obj"), QUAD).unwrap();
        fs::write(dir.path().join("quad.mtl"), "newmtl wood\nmap_Kd wood.png\n").unwrap();

        let model = load_obj(&dir.path().join("quad.obj")).unwrap();
        let textures = &model.meshes[0].textures;
        assert_eq!(textures.len(), 1);
        assert_eq!(textures[0].kind, TextureKind::Diffuse);
        assert_eq!(textures[0].source, TextureSource::File(dir.path().join("wood.png")));
    }
}
