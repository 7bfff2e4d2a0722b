//! Named uniform storage laid out with WGSL uniform-buffer rules.
//!
//! Programs describe their uniform struct once with [`UniformLayoutBuilder`];
//! the renderer then accepts `set_uniform("point_lights[2].linear", ..)` style
//! writes and copies the resulting bytes to the GPU per draw.

use std::collections::HashMap;

use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformKind {
    Bool,
    Int,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl UniformKind {
    pub fn align(self) -> u32 {
        match self {
            UniformKind::Bool | UniformKind::Int | UniformKind::Float => 4,
            UniformKind::Vec2 | UniformKind::Mat2 => 8,
            UniformKind::Vec3 | UniformKind::Vec4 | UniformKind::Mat3 | UniformKind::Mat4 => 16,
        }
    }

    pub fn size(self) -> u32 {
        match self {
            UniformKind::Bool | UniformKind::Int | UniformKind::Float => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Vec3 => 12,
            UniformKind::Vec4 | UniformKind::Mat2 => 16,
            UniformKind::Mat3 => 48,
            UniformKind::Mat4 => 64,
        }
    }
}

/// A typed value for one named uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat2(Mat2),
    Mat3(Mat3),
    Mat4(Mat4),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            UniformValue::Bool(_) => UniformKind::Bool,
            UniformValue::Int(_) => UniformKind::Int,
            UniformValue::Float(_) => UniformKind::Float,
            UniformValue::Vec2(_) => UniformKind::Vec2,
            UniformValue::Vec3(_) => UniformKind::Vec3,
            UniformValue::Vec4(_) => UniformKind::Vec4,
            UniformValue::Mat2(_) => UniformKind::Mat2,
            UniformValue::Mat3(_) => UniformKind::Mat3,
            UniformValue::Mat4(_) => UniformKind::Mat4,
        }
    }

    /// Bytes as they sit in a uniform buffer. Bools widen to u32 and mat3
    /// columns are padded to 16 bytes.
    fn write_to(&self, out: &mut [u8]) {
        match self {
            UniformValue::Bool(v) => out[..4].copy_from_slice(&u32::from(*v).to_ne_bytes()),
            UniformValue::Int(v) => out[..4].copy_from_slice(&v.to_ne_bytes()),
            UniformValue::Float(v) => out[..4].copy_from_slice(&v.to_ne_bytes()),
            UniformValue::Vec2(v) => out[..8].copy_from_slice(bytemuck::cast_slice(&v.to_array())),
            UniformValue::Vec3(v) => out[..12].copy_from_slice(bytemuck::cast_slice(&v.to_array())),
            UniformValue::Vec4(v) => out[..16].copy_from_slice(bytemuck::cast_slice(&v.to_array())),
            UniformValue::Mat2(m) => out[..16].copy_from_slice(bytemuck::cast_slice(&m.to_cols_array())),
            UniformValue::Mat3(m) => {
                for (i, col) in [m.x_axis, m.y_axis, m.z_axis].iter().enumerate() {
                    let padded = col.extend(0.0).to_array();
                    out[i * 16..i * 16 + 16].copy_from_slice(bytemuck::cast_slice(&padded));
                }
            }
            UniformValue::Mat4(m) => out[..64].copy_from_slice(bytemuck::cast_slice(&m.to_cols_array())),
        }
    }
}

impl From<bool> for UniformValue {
    fn from(v: bool) -> Self {
        UniformValue::Bool(v)
    }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        UniformValue::Int(v)
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<Vec2> for UniformValue {
    fn from(v: Vec2) -> Self {
        UniformValue::Vec2(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self {
        UniformValue::Vec4(v)
    }
}

impl From<Mat2> for UniformValue {
    fn from(v: Mat2) -> Self {
        UniformValue::Mat2(v)
    }
}

impl From<Mat3> for UniformValue {
    fn from(v: Mat3) -> Self {
        UniformValue::Mat3(v)
    }
}

impl From<Mat4> for UniformValue {
    fn from(v: Mat4) -> Self {
        UniformValue::Mat4(v)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformField {
    pub offset: u32,
    pub kind: UniformKind,
}

/// Name to offset map for one program's uniform struct.
#[derive(Debug, Clone, Default)]
pub struct UniformLayout {
    fields: HashMap<String, UniformField>,
    size: u32,
}

impl UniformLayout {
    pub fn builder() -> UniformLayoutBuilder {
        UniformLayoutBuilder::default()
    }

    pub fn field(&self, name: &str) -> Option<UniformField> {
        self.fields.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Total byte size, a multiple of 16.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn align_up(value: u32, align: u32) -> u32 {
    value.div_ceil(align) * align
}

#[derive(Debug, Default)]
pub struct UniformLayoutBuilder {
    fields: Vec<(String, UniformField)>,
    offset: u32,
}

impl UniformLayoutBuilder {
    pub fn field(mut self, name: &str, kind: UniformKind) -> Self {
        self.offset = align_up(self.offset, kind.align());
        self.fields.push((name.to_string(), UniformField { offset: self.offset, kind }));
        self.offset += kind.size();
        self
    }

    /// Nested struct member. Its fields are addressed as `name.field`.
    pub fn structure(self, name: &str, members: impl FnOnce(Self) -> Self) -> Self {
        let inner = members(Self::default());
        self.push_struct(name, &inner)
    }

    /// Fixed-size array of structs, addressed as `name[i].field`.
    pub fn array(mut self, name: &str, count: usize, members: impl FnOnce(Self) -> Self) -> Self {
        let inner = members(Self::default());
        for i in 0..count {
            self = self.push_struct(&format!("{name}[{i}]"), &inner);
        }
        self
    }

    fn push_struct(mut self, name: &str, inner: &Self) -> Self {
        // Uniform address space: structs align to 16, sizes round to 16
        self.offset = align_up(self.offset, 16);
        for (field_name, field) in &inner.fields {
            self.fields.push((
                format!("{name}.{field_name}"),
                UniformField {
                    offset: self.offset + field.offset,
                    kind: field.kind,
                },
            ));
        }
        self.offset += align_up(inner.offset.max(1), 16);
        self
    }

    pub fn build(self) -> UniformLayout {
        UniformLayout {
            size: align_up(self.offset.max(1), 16),
            fields: self.fields.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformWriteError {
    UnknownName,
    KindMismatch { expected: UniformKind, got: UniformKind },
}

/// CPU staging copy of one program's uniform struct.
#[derive(Debug, Clone)]
pub struct UniformBlock {
    layout: UniformLayout,
    bytes: Vec<u8>,
}

impl UniformBlock {
    pub fn new(layout: UniformLayout) -> Self {
        let bytes = vec![0; layout.size() as usize];
        Self { layout, bytes }
    }

    pub fn layout(&self) -> &UniformLayout {
        &self.layout
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn set(&mut self, name: &str, value: UniformValue) -> Result<(), UniformWriteError> {
        let field = self.layout.field(name).ok_or(UniformWriteError::UnknownName)?;
        if field.kind != value.kind() {
            return Err(UniformWriteError::KindMismatch {
                expected: field.kind,
                got: value.kind(),
            });
        }
        let start = field.offset as usize;
        let end = start + field.kind.size() as usize;
        value.write_to(&mut self.bytes[start..end]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light_like_layout() -> UniformLayout {
        UniformLayout::builder()
            .field("model", UniformKind::Mat4)
            .field("normal_matrix", UniformKind::Mat3)
            .field("view_pos", UniformKind::Vec3)
            .field("shininess", UniformKind::Float)
            .array("lights", 2, |s| {
                s.field("position", UniformKind::Vec3)
                    .field("constant", UniformKind::Float)
                    .field("ambient", UniformKind::Vec3)
            })
            .field("enabled", UniformKind::Bool)
            .build()
    }

    #[test]
    fn test_scalars_pack_into_vec3_tail() {
        let layout = light_like_layout();
        assert_eq!(layout.field("normal_matrix").map(|f| f.offset), Some(64));
        assert_eq!(layout.field("view_pos").map(|f| f.offset), Some(112));
        assert_eq!(layout.field("shininess").map(|f| f.offset), Some(124));
    }

    #[test]
    fn test_struct_array_stride_is_multiple_of_16() {
        let layout = light_like_layout();
        assert_eq!(layout.field("lights[0].position").map(|f| f.offset), Some(128));
        assert_eq!(layout.field("lights[0].constant").map(|f| f.offset), Some(140));
        assert_eq!(layout.field("lights[0].ambient").map(|f| f.offset), Some(144));
        assert_eq!(layout.field("lights[1].position").map(|f| f.offset), Some(160));
        assert_eq!(layout.field("enabled").map(|f| f.offset), Some(192));
        assert_eq!(layout.size(), 208);
    }

    #[test]
    fn test_block_writes_padded_mat3() {
        let layout = UniformLayout::builder().field("m", UniformKind::Mat3).build();
        let mut block = UniformBlock::new(layout);
        block.set("m", Mat3::from_cols(Vec3::X, Vec3::Y, Vec3::Z).into()).unwrap();
        let floats: Vec<f32> = block
            .bytes()
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(floats, vec![1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_block_rejects_unknown_and_mismatched() {
        let mut block = UniformBlock::new(light_like_layout());
        assert_eq!(block.set("nope", 1.0f32.into()), Err(UniformWriteError::UnknownName));
        assert_eq!(
            block.set("shininess", Vec3::ONE.into()),
            Err(UniformWriteError::KindMismatch {
                expected: UniformKind::Float,
                got: UniformKind::Vec3,
            })
        );
    }

    #[test]
    fn test_bool_is_widened() {
        let mut block = UniformBlock::new(light_like_layout());
        block.set("enabled", true.into()).unwrap();
        let start = block.layout().field("enabled").unwrap().offset as usize;
        assert_eq!(&block.bytes()[start..start + 4], &1u32.to_ne_bytes());
    }
}
