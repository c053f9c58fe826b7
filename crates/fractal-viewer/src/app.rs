use anyhow::Context;
use winit::dpi::PhysicalSize;

use fractal_engine::core::{App, AppControl, FrameCtx, StartCtx};
use fractal_engine::device::Gpu;
use fractal_engine::render::overlay::{Overlay, OverlayControls};
use fractal_engine::render::shader::ShaderProgram;
use fractal_engine::render::GeometryBuffer;

use crate::config::ViewerConfig;
use crate::controls::KeyBindings;
use crate::resources::ShaderSources;
use crate::viewport::{ViewerControl, ViewportController};

const CLEAR: wgpu::Color = wgpu::Color::BLACK;

/// GPU resources exist only between `on_start` and `on_shutdown`.
struct Resources {
    program: ShaderProgram,
    quad: GeometryBuffer,
}

pub struct FractalApp {
    config: ViewerConfig,
    sources: ShaderSources,
    bindings: KeyBindings,
    controller: ViewportController,
    overlay: Overlay,
    resources: Option<Resources>,
}

impl FractalApp {
    pub fn new(config: ViewerConfig, sources: ShaderSources) -> Self {
        let overlay = Overlay::new(config.overlay);
        Self {
            config,
            sources,
            bindings: KeyBindings::default(),
            controller: ViewportController::default(),
            overlay,
            resources: None,
        }
    }
}

impl App for FractalApp {
    fn on_start(&mut self, ctx: &mut StartCtx<'_, '_>) -> anyhow::Result<()> {
        let gpu = ctx.gpu;

        let program = ShaderProgram::compile(
            gpu.device(),
            gpu.surface_format(),
            &self.sources.vertex,
            &self.sources.fragment,
            GeometryBuffer::vertex_layout(),
        )
        .context("fractal shader program")?;
        let quad = GeometryBuffer::create(gpu.device());

        let size = gpu.size();
        self.controller.set_resolution(size.width, size.height);

        let info = gpu.adapter_info();
        ctx.window
            .set_title(&format!("{}: {:?} ({})", self.config.title, info.backend, info.name));

        self.resources = Some(Resources { program, quad });
        Ok(())
    }

    fn on_resized(&mut self, size: PhysicalSize<u32>) {
        self.controller.set_resolution(size.width, size.height);
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let input = self.bindings.sample(ctx.input);
        if self.controller.advance(ctx.time.dt, &input) == ViewerControl::Exit {
            log::info!("exit requested");
            return AppControl::Exit;
        }

        let snapshot = self.controller.snapshot();
        let Some(Resources { program, quad }) = self.resources.as_mut() else {
            return AppControl::Continue;
        };
        program.upload_uniforms(ctx.gpu.queue(), &snapshot);

        // Overlay edits land in the controller and show up in the next snapshot.
        let params = self.controller.parameters_mut();
        self.overlay.update(
            ctx.input,
            ctx.input_frame,
            OverlayControls {
                iterations: &mut params.iterations,
                base_color: &mut params.base_color,
                zoom: snapshot.zoom,
                fps: ctx.time.fps(),
            },
        );

        let overlay = &mut self.overlay;
        ctx.render(CLEAR, |rctx, target| {
            {
                let mut pass = target.begin_pass("fractal pass", wgpu::LoadOp::Load);
                if program.bind(&mut pass) {
                    quad.draw(&mut pass);
                }
            }
            overlay.render(rctx, target);
        })
    }

    fn on_shutdown(&mut self, _gpu: &Gpu<'_>) {
        if let Some(Resources { mut program, mut quad }) = self.resources.take() {
            program.destroy();
            quad.destroy();
        }
        self.overlay.destroy();
    }
}
