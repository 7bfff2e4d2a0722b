//! Texture and model import.
//!
//! Decoding happens on the CPU into [`TextureImage`] and [`ModelData`];
//! [`Model::load`] then pushes everything through a [`RenderBackend`].

pub mod gltf_loader;
pub mod obj_loader;

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use crate::error::AssetError;
use crate::utils::{MeshData, TextureImage};
use crate::view::backend::{MeshId, RenderBackend, TextureId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Diffuse,
    Specular,
    Normal,
}

/// A texture a mesh wants, resolved against the model's directory.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureRef {
    pub kind: TextureKind,
    pub source: TextureSource,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TextureSource {
    File(PathBuf),
    /// Already decoded by the importer (embedded glTF images).
    Embedded { key: String, image: TextureImage },
}

impl TextureSource {
    fn cache_key(&self) -> String {
        match self {
            TextureSource::File(path) => normalize_path(path).to_string_lossy().into_owned(),
            TextureSource::Embedded { key, .. } => key.clone(),
        }
    }
}

/// Lexically resolve `.` and `..` so different spellings of one file share a key.
fn normalize_path(path: &Path) -> PathBuf {
    let mut resolved = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last = resolved.components().next_back();
                let at_root = matches!(last, Some(Component::RootDir | Component::Prefix(_)));
                let can_pop = matches!(last, Some(Component::Normal(_)));
                if can_pop {
                    resolved.pop();
                } else if !at_root {
                    resolved.push(component);
                }
            }
            other => resolved.push(other),
        }
    }
    resolved
}

#[derive(Debug, Clone, Default)]
pub struct MeshSource {
    pub name: String,
    pub data: MeshData,
    pub textures: Vec<TextureRef>,
}

/// Imported model before upload.
#[derive(Debug, Clone, Default)]
pub struct ModelData {
    pub meshes: Vec<MeshSource>,
}

/// Decode an image file into RGBA8. Set `flip_vertically` for textures
/// addressed with a bottom-left UV origin.
pub fn load_image(path: &Path, flip_vertically: bool) -> Result<TextureImage, AssetError> {
    let decoded = image::open(path).map_err(|source| AssetError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    let channels = decoded.color().channel_count();
    let decoded = if flip_vertically { decoded.flipv() } else { decoded };
    let rgba = decoded.to_rgba8();
    Ok(TextureImage {
        width: rgba.width(),
        height: rgba.height(),
        channels,
        pixels: rgba.into_raw(),
    })
}

/// Import a model, picking the reader from the file extension.
pub fn load_model(path: &Path) -> Result<ModelData, AssetError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    let data = match ext.as_str() {
        "obj" => obj_loader::load_obj(path)?,
        "gltf" | "glb" => gltf_loader::load_gltf(path)?,
        _ => return Err(AssetError::UnsupportedFormat(path.to_path_buf())),
    };
    if data.meshes.iter().all(|m| m.data.is_empty()) {
        return Err(AssetError::Empty(path.to_path_buf()));
    }
    Ok(data)
}

/// Uploads textures once per key; repeats return the first id.
pub struct TextureCache<'a, B: RenderBackend + ?Sized> {
    backend: &'a mut B,
    loaded: HashMap<String, TextureId>,
}

impl<'a, B: RenderBackend + ?Sized> TextureCache<'a, B> {
    pub fn new(backend: &'a mut B) -> Self {
        Self {
            backend,
            loaded: HashMap::new(),
        }
    }

    pub fn backend(&mut self) -> &mut B {
        self.backend
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }

    /// Returns `None` when the file cannot be decoded; the failure is logged.
    pub fn get_or_load(&mut self, source: &TextureSource) -> Option<TextureId> {
        let key = source.cache_key();
        if let Some(id) = self.loaded.get(&key) {
            return Some(*id);
        }
        let image = match source {
            TextureSource::File(path) => match load_image(path, false) {
                Ok(image) => image,
                Err(err) => {
                    tracing::warn!("Texture failed to load: {err}");
                    return None;
                }
            },
            TextureSource::Embedded { image, .. } => image.clone(),
        };
        let id = self.backend.create_texture(&key, &image);
        tracing::debug!(texture = %key, width = image.width, height = image.height, "uploaded texture");
        self.loaded.insert(key, id);
        Some(id)
    }
}

/// One uploaded sub-mesh and the textures it samples.
#[derive(Debug, Clone)]
pub struct ModelMesh {
    pub mesh: MeshId,
    pub diffuse: Option<TextureId>,
    pub specular: Option<TextureId>,
    pub normal: Option<TextureId>,
}

#[derive(Debug, Clone)]
pub struct Model {
    pub path: PathBuf,
    pub meshes: Vec<ModelMesh>,
}

impl Model {
    /// Import `path` and upload its meshes and textures.
    pub fn load<B: RenderBackend + ?Sized>(path: &Path, backend: &mut B) -> Result<Self, AssetError> {
        let data = load_model(path)?;
        Ok(Self::upload(path, &data, backend))
    }

    pub fn upload<B: RenderBackend + ?Sized>(path: &Path, data: &ModelData, backend: &mut B) -> Self {
        let mut cache = TextureCache::new(backend);
        let mut meshes = Vec::with_capacity(data.meshes.len());
        for source in data.meshes.iter().filter(|m| !m.data.is_empty()) {
            let mut uploaded = ModelMesh {
                mesh: cache.backend().upload_mesh(&source.name, &source.data),
                diffuse: None,
                specular: None,
                normal: None,
            };
            for tex in &source.textures {
                let id = cache.get_or_load(&tex.source);
                match tex.kind {
                    TextureKind::Diffuse => uploaded.diffuse = uploaded.diffuse.or(id),
                    TextureKind::Specular => uploaded.specular = uploaded.specular.or(id),
                    TextureKind::Normal => uploaded.normal = uploaded.normal.or(id),
                }
            }
            meshes.push(uploaded);
        }
        tracing::info!(
            model = %path.display(),
            meshes = meshes.len(),
            textures = cache.len(),
            "loaded model"
        );
        Self {
            path: path.to_path_buf(),
            meshes,
        }
    }
}
