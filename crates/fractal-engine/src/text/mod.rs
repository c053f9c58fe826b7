//! Font loading for overlay text.

mod font_system;

pub use font_system::{find_system_font, FontId, FontLoadError, FontSystem};
