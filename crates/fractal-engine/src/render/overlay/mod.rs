//! Diagnostics and controls panel drawn over the fractal.
//!
//! Each frame the app hands the overlay exclusive access to the values it may
//! edit (`OverlayControls`); the overlay applies pointer/wheel/text input,
//! then draws itself on top of whatever the frame already holds.

mod common;
mod glyphs;
mod panel;
mod rects;

use crate::input::{InputFrame, InputState};
use crate::render::{RenderCtx, RenderTarget};
use crate::text::{FontId, FontSystem};

use glyphs::GlyphBatch;
use panel::{PanelLayout, PanelScene, PanelState};
use rects::RectBatch;

pub use panel::{OverlayConfig, OverlayControls, ITERATIONS_MAX, ITERATIONS_MIN};

pub struct Overlay {
    config: OverlayConfig,
    layout: PanelLayout,
    state: PanelState,
    scene: PanelScene,

    fonts: FontSystem,
    font: Option<FontId>,

    rects: RectBatch,
    glyphs: GlyphBatch,
}

impl Overlay {
    /// Creates the overlay, loading a system font for its labels.
    ///
    /// Without a font the controls still work; only text is missing.
    pub fn new(config: OverlayConfig) -> Self {
        let mut fonts = FontSystem::new();
        let font = fonts.load_system_font();
        Self::with_font(config, fonts, font)
    }

    pub fn with_font(config: OverlayConfig, fonts: FontSystem, font: Option<FontId>) -> Self {
        Self {
            layout: PanelLayout::new(&config),
            config,
            state: PanelState::default(),
            scene: PanelScene::default(),
            fonts,
            font,
            rects: RectBatch::default(),
            glyphs: GlyphBatch::default(),
        }
    }

    /// Applies this frame's input to `controls` and rebuilds the draw list.
    pub fn update(&mut self, input: &InputState, frame: &InputFrame, mut controls: OverlayControls<'_>) {
        self.state.update(&self.layout, input, frame, &mut controls);
        self.scene = self.state.scene(&self.layout, &self.config, &controls);
    }

    /// Draws the panel built by the last `update`, loading over the target.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        self.rects.render(ctx, target, &self.scene.quads);
        if let Some(font) = self.font {
            self.glyphs
                .render(ctx, target, &self.scene.labels, &self.fonts, font, self.config.font_size);
        }
    }

    /// Releases GPU resources. The overlay rebuilds them if rendered again.
    pub fn destroy(&mut self) {
        self.rects.destroy();
        self.glyphs.destroy();
        log::debug!("overlay released");
    }
}
