use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::ViewerConfig;

/// A shader source file could not be read.
#[derive(Debug, Error)]
#[error("failed to load {}: {source}", .path.display())]
pub struct ResourceLoadError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Vertex and fragment WGSL text, as read from disk.
#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

pub fn load_text(path: &Path) -> Result<String, ResourceLoadError> {
    std::fs::read_to_string(path).map_err(|source| ResourceLoadError {
        path: path.to_owned(),
        source,
    })
}

pub fn load_shader_sources(config: &ViewerConfig) -> Result<ShaderSources, ResourceLoadError> {
    let vertex = load_text(&config.vertex_shader_path)?;
    let fragment = load_text(&config.fragment_shader_path)?;
    log::info!(
        "loaded shaders {} + {}",
        config.vertex_shader_path.display(),
        config.fragment_shader_path.display()
    );
    Ok(ShaderSources { vertex, fragment })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_shaders_load_and_link() {
        let sources = load_shader_sources(&ViewerConfig::default()).expect("resources present");
        let linked = fractal_engine::render::shader::link(&sources.vertex, &sources.fragment)
            .unwrap_or_else(|e| panic!("{e}"));

        let uniforms = linked.uniforms().expect("fractal declares uniforms");
        for name in ["resolution", "time", "zoom", "iter", "cameraPosition", "color"] {
            assert!(uniforms.field(name).is_some(), "missing uniform {name}");
        }
    }

    #[test]
    fn missing_file_is_a_load_error_naming_the_path() {
        let config = ViewerConfig {
            fragment_shader_path: PathBuf::from("/nonexistent/fractal.frag.wgsl"),
            ..ViewerConfig::default()
        };
        let err = load_shader_sources(&config).unwrap_err();
        assert_eq!(err.path, config.fragment_shader_path);
        assert_eq!(err.source.kind(), std::io::ErrorKind::NotFound);
        assert!(err.to_string().contains("fractal.frag.wgsl"));
    }
}
