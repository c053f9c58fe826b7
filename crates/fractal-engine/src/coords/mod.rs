//! Logical-pixel geometry used by the overlay.
//!
//! - origin top-left, +X right, +Y down
//! - renderers convert to NDC in shaders using a viewport uniform

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
