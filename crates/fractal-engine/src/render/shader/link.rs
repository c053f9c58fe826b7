use std::collections::BTreeMap;

use naga::valid::{Capabilities, ValidationFlags, Validator};

use super::error::{CompileError, ShaderStage};
use super::uniforms::{UniformLayout, UNIFORM_BINDING, UNIFORM_GROUP};

/// One compiled stage: the source (handed to wgpu) and its entry point.
#[derive(Debug, Clone)]
pub(crate) struct StageSource {
    pub source: String,
    pub entry_point: String,
    pub uses_uniforms: bool,
}

/// A vertex + fragment pair that compiled and linked on the CPU.
///
/// The parsed modules are dropped once linking succeeds; only what the GPU
/// program needs is kept.
#[derive(Debug, Clone)]
pub struct LinkedShaders {
    pub(crate) vertex: StageSource,
    pub(crate) fragment: StageSource,
    uniforms: Option<UniformLayout>,
}

impl LinkedShaders {
    /// Uniform block shared by the two stages, if either declares one.
    pub fn uniforms(&self) -> Option<&UniformLayout> {
        self.uniforms.as_ref()
    }

    pub fn vertex_entry_point(&self) -> &str {
        &self.vertex.entry_point
    }

    pub fn fragment_entry_point(&self) -> &str {
        &self.fragment.entry_point
    }
}

/// Compiles both stages independently, then links them.
///
/// Linking requires:
/// - a `@vertex` entry point in the vertex source and a `@fragment` entry
///   point in the fragment source;
/// - every `@location` the fragment stage reads is written by the vertex
///   stage with the same type;
/// - no resource other than a host-writable uniform block at
///   `@group(0) @binding(0)`, laid out identically if both stages declare it.
pub fn link(vertex_source: &str, fragment_source: &str) -> Result<LinkedShaders, CompileError> {
    let vertex = compile_stage(ShaderStage::Vertex, vertex_source)?;
    let fragment = compile_stage(ShaderStage::Fragment, fragment_source)?;

    let vertex_entry = entry_point(&vertex, ShaderStage::Vertex)?;
    let fragment_entry = entry_point(&fragment, ShaderStage::Fragment)?;

    check_interface(&vertex, vertex_entry, &fragment, fragment_entry)?;

    let vertex_uniforms = stage_uniforms(&vertex, ShaderStage::Vertex)?;
    let fragment_uniforms = stage_uniforms(&fragment, ShaderStage::Fragment)?;

    let uniforms = match (vertex_uniforms.clone(), fragment_uniforms.clone()) {
        (Some(v), Some(f)) if v != f => {
            return Err(CompileError::link(format!(
                "uniform block at @group(0) @binding(0) differs between stages\n  \
                 vertex:   {v:?}\n  fragment: {f:?}"
            )));
        }
        (v, f) => f.or(v),
    };

    Ok(LinkedShaders {
        vertex: StageSource {
            source: vertex_source.to_owned(),
            entry_point: vertex_entry.name.clone(),
            uses_uniforms: vertex_uniforms.is_some(),
        },
        fragment: StageSource {
            source: fragment_source.to_owned(),
            entry_point: fragment_entry.name.clone(),
            uses_uniforms: fragment_uniforms.is_some(),
        },
        uniforms,
    })
}

fn compile_stage(stage: ShaderStage, source: &str) -> Result<naga::Module, CompileError> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| CompileError::stage(stage, e.emit_to_string(source), &e))?;

    Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|e| CompileError::stage(stage, e.emit_to_string(source), &e))?;

    Ok(module)
}

fn entry_point(module: &naga::Module, stage: ShaderStage) -> Result<&naga::EntryPoint, CompileError> {
    let wanted = match stage {
        ShaderStage::Vertex => naga::ShaderStage::Vertex,
        ShaderStage::Fragment => naga::ShaderStage::Fragment,
    };

    let mut found = module.entry_points.iter().filter(|ep| ep.stage == wanted);
    match (found.next(), found.next()) {
        (Some(ep), None) => Ok(ep),
        (None, _) => Err(CompileError::link(format!("{stage} source has no @{stage} entry point"))),
        (Some(_), Some(_)) => Err(CompileError::link(format!(
            "{stage} source has more than one @{stage} entry point"
        ))),
    }
}

// ── stage interface ───────────────────────────────────────────────────────

/// `@location` slots of one side of the vertex/fragment interface.
type Locations<'m> = BTreeMap<u32, &'m naga::TypeInner>;

fn check_interface(
    vertex: &naga::Module,
    vertex_entry: &naga::EntryPoint,
    fragment: &naga::Module,
    fragment_entry: &naga::EntryPoint,
) -> Result<(), CompileError> {
    let mut outputs = Locations::new();
    if let Some(result) = vertex_entry.function.result.as_ref() {
        collect_locations(vertex, result.binding.as_ref(), result.ty, &mut outputs);
    }

    let mut inputs = Locations::new();
    for arg in &fragment_entry.function.arguments {
        collect_locations(fragment, arg.binding.as_ref(), arg.ty, &mut inputs);
    }

    for (location, input) in &inputs {
        match outputs.get(location) {
            None => {
                return Err(CompileError::link(format!(
                    "fragment input @location({location}) {} is not written by the vertex stage",
                    type_name(input)
                )));
            }
            Some(output) if output != input => {
                return Err(CompileError::link(format!(
                    "@location({location}) is {} in the vertex stage but {} in the fragment stage",
                    type_name(output),
                    type_name(input)
                )));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Records `@location` bindings of an entry-point argument or result. Structs
/// without a binding of their own carry one per member.
fn collect_locations<'m>(
    module: &'m naga::Module,
    binding: Option<&naga::Binding>,
    ty: naga::Handle<naga::Type>,
    out: &mut Locations<'m>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => {
            out.insert(*location, &module.types[ty].inner);
        }
        Some(_) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    if let Some(naga::Binding::Location { location, .. }) = member.binding.as_ref() {
                        out.insert(*location, &module.types[member.ty].inner);
                    }
                }
            }
        }
    }
}

fn type_name(inner: &naga::TypeInner) -> String {
    fn scalar(s: naga::Scalar) -> String {
        let prefix = match s.kind {
            naga::ScalarKind::Float => "f",
            naga::ScalarKind::Sint => "i",
            naga::ScalarKind::Uint => "u",
            other => return format!("{other:?}"),
        };
        format!("{prefix}{}", u32::from(s.width) * 8)
    }

    match inner {
        naga::TypeInner::Scalar(s) => scalar(*s),
        naga::TypeInner::Vector { size, scalar: s } => format!("vec{}<{}>", *size as u8, scalar(*s)),
        other => format!("{other:?}"),
    }
}

// ── resources ─────────────────────────────────────────────────────────────

/// The stage's uniform block, after checking it is the only bound resource.
fn stage_uniforms(module: &naga::Module, stage: ShaderStage) -> Result<Option<UniformLayout>, CompileError> {
    let mut declares_block = false;

    for (_, var) in module.global_variables.iter() {
        let Some(binding) = var.binding.as_ref() else { continue };
        let name = var.name.as_deref().unwrap_or("<unnamed>");

        let at_block = binding.group == UNIFORM_GROUP && binding.binding == UNIFORM_BINDING;
        if !at_block || var.space != naga::AddressSpace::Uniform {
            return Err(CompileError::link(format!(
                "{stage} stage binds `{name}` at @group({}) @binding({}); only a uniform block at \
                 @group({UNIFORM_GROUP}) @binding({UNIFORM_BINDING}) is supported",
                binding.group, binding.binding
            )));
        }
        declares_block = true;
    }

    match UniformLayout::reflect(module) {
        Some(layout) => Ok(Some(layout)),
        None if declares_block => Err(CompileError::link(format!(
            "{stage} stage uniform at @group({UNIFORM_GROUP}) @binding({UNIFORM_BINDING}) has a type \
             the host cannot write; wrap scalars and vectors in a struct"
        ))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX: &str = r#"
        @vertex
        fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
            return vec4<f32>(position, 1.0);
        }
    "#;

    const FRAGMENT: &str = r#"
        struct Params {
            zoom: f32,
            color: vec3<f32>,
        }
        @group(0) @binding(0) var<uniform> params: Params;

        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return vec4<f32>(params.color / params.zoom, 1.0);
        }
    "#;

    #[test]
    fn valid_pair_links() {
        let linked = link(VERTEX, FRAGMENT).expect("valid pair links");
        assert_eq!(linked.vertex_entry_point(), "vs_main");
        assert_eq!(linked.fragment_entry_point(), "fs_main");
        assert!(linked.uniforms().unwrap().field("color").is_some());
        assert!(!linked.vertex.uses_uniforms);
        assert!(linked.fragment.uses_uniforms);
    }

    #[test]
    fn syntax_error_in_vertex_stage_is_reported() {
        let broken = VERTEX.replace("return", "retrun");
        let err = link(&broken, FRAGMENT).unwrap_err();
        assert!(matches!(err, CompileError::Stage { stage: ShaderStage::Vertex, .. }));
        assert!(!err.diagnostic().trim().is_empty());
    }

    #[test]
    fn syntax_error_in_fragment_stage_is_reported() {
        let broken = FRAGMENT.replace("1.0);", "1.0)");
        let err = link(VERTEX, &broken).unwrap_err();
        assert!(matches!(err, CompileError::Stage { stage: ShaderStage::Fragment, .. }));
        assert!(!err.diagnostic().trim().is_empty());
    }

    #[test]
    fn type_error_is_a_stage_error() {
        let broken = FRAGMENT.replace("params.color / params.zoom", "params.color / params");
        let err = link(VERTEX, &broken).unwrap_err();
        assert!(matches!(err, CompileError::Stage { stage: ShaderStage::Fragment, .. }));
        assert!(!err.diagnostic().is_empty());
    }

    #[test]
    fn swapped_stages_fail_to_link() {
        let err = link(FRAGMENT, VERTEX).unwrap_err();
        assert!(matches!(err, CompileError::Link { .. }));
        assert!(err.diagnostic().contains("entry point"));
    }

    #[test]
    fn disagreeing_uniform_blocks_fail_to_link() {
        let vertex = r#"
            @group(0) @binding(0) var<uniform> zoom: f32;
            @vertex
            fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
                return vec4<f32>(position * zoom, 1.0);
            }
        "#;
        let err = link(vertex, FRAGMENT).unwrap_err();
        assert!(matches!(err, CompileError::Link { .. }));
    }

    #[test]
    fn program_without_uniforms_links() {
        let fragment = "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }";
        let linked = link(VERTEX, fragment).unwrap();
        assert!(linked.uniforms().is_none());
    }

    // ── stage interface ───────────────────────────────────────────────────

    const VERTEX_WITH_UV: &str = r#"
        struct VsOut {
            @builtin(position) clip: vec4<f32>,
            @location(0) uv: vec2<f32>,
        }

        @vertex
        fn vs_main(@location(0) position: vec3<f32>) -> VsOut {
            return VsOut(vec4<f32>(position, 1.0), position.xy);
        }
    "#;

    #[test]
    fn matching_varyings_link() {
        let fragment = r#"
            @fragment
            fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
                return vec4<f32>(uv, 0.0, 1.0);
            }
        "#;
        assert!(link(VERTEX_WITH_UV, fragment).is_ok());
    }

    #[test]
    fn fragment_input_without_vertex_output_fails_to_link() {
        let fragment = r#"
            @fragment
            fn fs_main(@location(3) tint: vec4<f32>) -> @location(0) vec4<f32> {
                return tint;
            }
        "#;
        let err = link(VERTEX_WITH_UV, fragment).unwrap_err();
        assert!(matches!(err, CompileError::Link { .. }));
        assert!(err.diagnostic().contains("@location(3)"), "{}", err.diagnostic());
    }

    #[test]
    fn varying_type_mismatch_fails_to_link() {
        let fragment = r#"
            struct FsIn {
                @location(0) uv: vec4<f32>,
            }

            @fragment
            fn fs_main(input: FsIn) -> @location(0) vec4<f32> {
                return input.uv;
            }
        "#;
        let err = link(VERTEX_WITH_UV, fragment).unwrap_err();
        assert!(matches!(err, CompileError::Link { .. }));
        assert!(err.diagnostic().contains("vec2<f32>"), "{}", err.diagnostic());
        assert!(err.diagnostic().contains("vec4<f32>"), "{}", err.diagnostic());
    }

    // ── resources ─────────────────────────────────────────────────────────

    #[test]
    fn binding_outside_uniform_block_fails_to_link() {
        let fragment = FRAGMENT.replace(
            "@fragment",
            "@group(0) @binding(1) var<uniform> extra: vec4<f32>;\n        @fragment",
        );
        let fragment = fragment.replace("1.0);", "1.0) + extra;");
        let err = link(VERTEX, &fragment).unwrap_err();
        assert!(matches!(err, CompileError::Link { .. }));
        assert!(err.diagnostic().contains("`extra`"), "{}", err.diagnostic());
    }

    #[test]
    fn storage_buffer_at_block_binding_fails_to_link() {
        let fragment = r#"
            @group(0) @binding(0) var<storage, read> data: array<f32>;
            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return vec4<f32>(data[0]);
            }
        "#;
        let err = link(VERTEX, fragment).unwrap_err();
        assert!(matches!(err, CompileError::Link { .. }));
    }

    #[test]
    fn unwritable_uniform_type_fails_to_link() {
        let fragment = r#"
            @group(0) @binding(0) var<uniform> m: mat4x4<f32>;
            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return m[0];
            }
        "#;
        let err = link(VERTEX, fragment).unwrap_err();
        assert!(matches!(err, CompileError::Link { .. }));
        assert!(err.diagnostic().contains("host cannot write"), "{}", err.diagnostic());
    }

    #[test]
    fn matrix_member_inside_block_still_links() {
        let fragment = r#"
            struct Params {
                transform: mat4x4<f32>,
                zoom: f32,
            }
            @group(0) @binding(0) var<uniform> params: Params;
            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return params.transform[0] * params.zoom;
            }
        "#;
        let linked = link(VERTEX, fragment).expect("struct with a matrix member links");
        let uniforms = linked.uniforms().expect("block reflected");
        assert!(uniforms.field("transform").is_none());
        assert_eq!(uniforms.field("zoom").map(|f| f.offset), Some(64));
    }
}
