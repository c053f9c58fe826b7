use std::fmt;

use thiserror::Error;

/// Pipeline stage a diagnostic refers to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// Shader stage compile or program link failure.
///
/// `diagnostic` holds the compiler/linker output and is never empty.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{stage} shader failed to compile:\n{diagnostic}")]
    Stage { stage: ShaderStage, diagnostic: String },

    #[error("shader program failed to link:\n{diagnostic}")]
    Link { diagnostic: String },
}

impl CompileError {
    pub fn diagnostic(&self) -> &str {
        match self {
            CompileError::Stage { diagnostic, .. } | CompileError::Link { diagnostic } => diagnostic,
        }
    }

    pub(crate) fn stage(stage: ShaderStage, diagnostic: String, fallback: impl fmt::Display) -> Self {
        CompileError::Stage { stage, diagnostic: non_empty(diagnostic, fallback) }
    }

    pub(crate) fn link(diagnostic: impl Into<String>) -> Self {
        CompileError::Link { diagnostic: non_empty(diagnostic.into(), "link failed") }
    }
}

fn non_empty(diagnostic: String, fallback: impl fmt::Display) -> String {
    if diagnostic.trim().is_empty() { fallback.to_string() } else { diagnostic }
}
