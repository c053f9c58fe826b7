use std::collections::BTreeMap;

/// Bind group and binding that hold the program's uniform block.
pub const UNIFORM_GROUP: u32 = 0;
pub const UNIFORM_BINDING: u32 = 0;

/// Host-side type of a uniform member.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UniformKind {
    F32,
    I32,
    U32,
    Vec2,
    Vec3,
    Vec4,
}

impl UniformKind {
    pub fn size(self) -> usize {
        match self {
            UniformKind::F32 | UniformKind::I32 | UniformKind::U32 => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Vec3 => 12,
            UniformKind::Vec4 => 16,
        }
    }

    fn from_naga(inner: &naga::TypeInner) -> Option<Self> {
        use naga::{ScalarKind, TypeInner, VectorSize};

        match inner {
            TypeInner::Scalar(s) if s.width == 4 => match s.kind {
                ScalarKind::Float => Some(UniformKind::F32),
                ScalarKind::Sint => Some(UniformKind::I32),
                ScalarKind::Uint => Some(UniformKind::U32),
                _ => None,
            },
            TypeInner::Vector { size, scalar } if scalar.kind == ScalarKind::Float && scalar.width == 4 => {
                Some(match size {
                    VectorSize::Bi => UniformKind::Vec2,
                    VectorSize::Tri => UniformKind::Vec3,
                    VectorSize::Quad => UniformKind::Vec4,
                })
            }
            _ => None,
        }
    }
}

/// A named member of the uniform block.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniformField {
    pub offset: u32,
    pub kind: UniformKind,
}

/// Reflected layout of the uniform block at `@group(0) @binding(0)`.
///
/// Members of types the host cannot write (matrices, arrays, nested structs)
/// still count towards `size` but are not addressable by name.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UniformLayout {
    /// Block size in bytes, including trailing padding.
    pub size: u32,
    pub fields: BTreeMap<String, UniformField>,
}

impl UniformLayout {
    /// Finds the uniform block in a compiled module, if it declares one.
    pub fn reflect(module: &naga::Module) -> Option<Self> {
        let (_, var) = module.global_variables.iter().find(|(_, var)| {
            var.space == naga::AddressSpace::Uniform
                && var
                    .binding
                    .as_ref()
                    .is_some_and(|b| b.group == UNIFORM_GROUP && b.binding == UNIFORM_BINDING)
        })?;

        let ty = &module.types[var.ty];
        let layout = match &ty.inner {
            naga::TypeInner::Struct { members, span } => {
                let fields = members
                    .iter()
                    .filter_map(|m| {
                        let name = m.name.clone()?;
                        let kind = UniformKind::from_naga(&module.types[m.ty].inner)?;
                        Some((name, UniformField { offset: m.offset, kind }))
                    })
                    .collect();
                UniformLayout { size: *span, fields }
            }
            // A bare `var<uniform> zoom: f32;` is addressed by the variable name.
            inner => {
                let kind = UniformKind::from_naga(inner)?;
                let name = var.name.clone()?;
                // Uniform buffers bind in 16-byte units.
                let size = (kind.size() as u32).next_multiple_of(16);
                UniformLayout { size, fields: BTreeMap::from([(name, UniformField { offset: 0, kind })]) }
            }
        };

        Some(layout)
    }

    pub fn field(&self, name: &str) -> Option<UniformField> {
        self.fields.get(name).copied()
    }
}

/// A value to upload into a named uniform slot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    F32(f32),
    I32(i32),
    U32(u32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            UniformValue::F32(_) => UniformKind::F32,
            UniformValue::I32(_) => UniformKind::I32,
            UniformValue::U32(_) => UniformKind::U32,
            UniformValue::Vec2(_) => UniformKind::Vec2,
            UniformValue::Vec3(_) => UniformKind::Vec3,
            UniformValue::Vec4(_) => UniformKind::Vec4,
        }
    }

    fn bytes(&self) -> &[u8] {
        match self {
            UniformValue::F32(v) => bytemuck::bytes_of(v),
            UniformValue::I32(v) => bytemuck::bytes_of(v),
            UniformValue::U32(v) => bytemuck::bytes_of(v),
            UniformValue::Vec2(v) => bytemuck::bytes_of(v),
            UniformValue::Vec3(v) => bytemuck::bytes_of(v),
            UniformValue::Vec4(v) => bytemuck::bytes_of(v),
        }
    }
}

/// CPU staging copy of the uniform block.
///
/// Slots keep their last written value; a slot never written reads as zero.
#[derive(Debug, Clone)]
pub struct UniformBlock {
    layout: UniformLayout,
    data: Vec<u8>,
}

impl UniformBlock {
    pub fn new(layout: UniformLayout) -> Self {
        let data = vec![0; layout.size as usize];
        Self { layout, data }
    }

    /// An empty block for programs that declare no uniforms; every `set` is a no-op.
    pub fn empty() -> Self {
        Self::new(UniformLayout { size: 0, fields: BTreeMap::new() })
    }

    pub fn layout(&self) -> &UniformLayout {
        &self.layout
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Writes `value` into the slot called `name`.
    ///
    /// Returns `false`, leaving the block untouched, if the program has no such
    /// slot or its type differs. Missing uniforms are an authoring concern, not
    /// a runtime fault.
    pub fn set(&mut self, name: &str, value: UniformValue) -> bool {
        let Some(field) = self.layout.field(name) else {
            log::trace!("uniform `{name}` not in program; ignored");
            return false;
        };
        if field.kind != value.kind() {
            log::trace!("uniform `{name}` is {:?}, got {:?}; ignored", field.kind, value.kind());
            return false;
        }

        let start = field.offset as usize;
        let bytes = value.bytes();
        let Some(slot) = self.data.get_mut(start..start + bytes.len()) else {
            return false;
        };
        slot.copy_from_slice(bytes);
        true
    }
}

/// Something that can fill a program's uniform block, e.g. a per-frame snapshot.
pub trait UniformSource {
    fn write_uniforms(&self, block: &mut UniformBlock);
}
