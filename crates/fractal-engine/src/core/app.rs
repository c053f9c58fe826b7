use winit::dpi::PhysicalSize;

use crate::device::Gpu;

use super::ctx::{FrameCtx, StartCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// Callbacks run on the event-loop thread in this order: `on_start` once the
/// window and GPU exist, then `on_resized` / `on_frame` as events arrive, and
/// finally `on_shutdown` before the GPU and window are dropped.
pub trait App {
    /// Creates GPU resources. An error aborts the runtime and is returned
    /// from `Runtime::run`.
    fn on_start(&mut self, ctx: &mut StartCtx<'_, '_>) -> anyhow::Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called after the surface has been reconfigured for a new size.
    fn on_resized(&mut self, size: PhysicalSize<u32>) {
        let _ = size;
    }

    /// Called once per redraw.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Releases GPU resources. Called at most once.
    fn on_shutdown(&mut self, gpu: &Gpu<'_>) {
        let _ = gpu;
    }
}
