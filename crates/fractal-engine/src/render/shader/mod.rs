//! Shader programs.
//!
//! A program is a vertex + fragment WGSL pair. Each stage is compiled on the
//! CPU first (parse + validate), which yields readable diagnostics and the
//! reflected uniform block layout; only then are GPU objects created.
//!
//! Uniforms are addressed by member name of the block at
//! `@group(0) @binding(0)`. Names missing from the program are ignored.

mod error;
mod link;
mod program;
mod uniforms;

pub use error::{CompileError, ShaderStage};
pub use link::{link, LinkedShaders};
pub use program::ShaderProgram;
pub use uniforms::{UniformBlock, UniformField, UniformKind, UniformLayout, UniformSource, UniformValue};
