//! GPU rendering subsystem.
//!
//! - `geometry`: the static full-screen quad
//! - `shader`: WGSL program compile/link and named-uniform upload
//! - `overlay`: the diagnostics/controls panel drawn on top
//!
//! Each component owns its GPU resources and releases them through an
//! explicit `destroy`, never implicitly on drop.

mod ctx;
mod geometry;
mod handle;
pub mod overlay;
pub mod shader;

pub use ctx::{RenderCtx, RenderTarget};
pub use geometry::{GeometryBuffer, QuadVertex, FULLSCREEN_QUAD};
pub use handle::{QuadHandle, ResourceId, ShaderHandle};
