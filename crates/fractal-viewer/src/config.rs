use std::path::PathBuf;

use fractal_engine::render::overlay::OverlayConfig;
use winit::dpi::LogicalSize;

/// Fixed startup configuration. There is no config file and no CLI.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub vertex_shader_path: PathBuf,
    pub fragment_shader_path: PathBuf,
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub overlay: OverlayConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let resources = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources");
        Self {
            vertex_shader_path: resources.join("fractal.vert.wgsl"),
            fragment_shader_path: resources.join("fractal.frag.wgsl"),
            title: "Fractal Viewer".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            overlay: OverlayConfig::default(),
        }
    }
}
